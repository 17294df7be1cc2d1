use std::net::SocketAddr;

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
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub llm_api_key: String,
    pub llm_api_base: String,
    pub llm_model: String,
    pub llm_request_timeout_secs: u64,
    /// Delay before every LLM call after the first in a pipeline run.
    pub llm_call_delay_ms: u64,
    /// Longer delay before the cross-brand comparison call.
    pub llm_compare_delay_ms: u64,
    pub fetch_timeout_secs: u64,
    pub fetch_user_agent: String,
    /// Base URL of the headless-browser rendering service. Unset disables
    /// screenshot capture; audits then run with sentinel visual data.
    pub capture_base_url: Option<String>,
    pub capture_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("llm_api_key", &"[redacted]")
            .field("llm_api_base", &self.llm_api_base)
            .field("llm_model", &self.llm_model)
            .field("llm_request_timeout_secs", &self.llm_request_timeout_secs)
            .field("llm_call_delay_ms", &self.llm_call_delay_ms)
            .field("llm_compare_delay_ms", &self.llm_compare_delay_ms)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("fetch_user_agent", &self.fetch_user_agent)
            .field("capture_base_url", &self.capture_base_url)
            .field("capture_timeout_secs", &self.capture_timeout_secs)
            .finish()
    }
}
