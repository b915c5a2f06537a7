// Default URLs
pub static DEFAULT_API_URL: &str = "https://api.dwolla.com";
pub static DEFAULT_SANDBOX_API_URL: &str = "https://api-sandbox.dwolla.com";

// Media types
pub static HAL_JSON_CONTENT_TYPE: &str = "application/vnd.dwolla.v1.hal+json";

// Header names
pub static IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
