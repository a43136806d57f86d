use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Base path of the REST backend, e.g. `http://localhost:8000/api`.
    pub api_base_url: String,
    /// Directory holding the file-backed key/value store.
    pub storage_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub text_model: String,
    pub image_model: String,
    /// Upper bound for every individual generative AI call.
    pub ai_timeout_secs: u64,
    pub max_products: usize,
    pub image_max_dimension: u32,
    pub image_quality: u8,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("api_base_url", &self.api_base_url)
            .field("storage_dir", &self.storage_dir)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_base_url", &self.gemini_base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("ai_timeout_secs", &self.ai_timeout_secs)
            .field("max_products", &self.max_products)
            .field("image_max_dimension", &self.image_max_dimension)
            .field("image_quality", &self.image_quality)
            .finish()
    }
}
