use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    // BLENS_LLM_API_KEY wins; OPENAI_API_KEY is accepted so local setups that
    // already export it keep working.
    let llm_api_key = lookup("BLENS_LLM_API_KEY")
        .or_else(|_| lookup("OPENAI_API_KEY"))
        .map_err(|_| ConfigError::MissingEnvVar("BLENS_LLM_API_KEY".to_string()))?;

    let env = parse_environment(&or_default("BLENS_ENV", "development"));

    let bind_addr = parse_addr("BLENS_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BLENS_LOG_LEVEL", "info");

    let llm_api_base = or_default("BLENS_LLM_API_BASE", "https://api.openai.com/v1");
    let llm_model = or_default("BLENS_LLM_MODEL", "gpt-4o-mini");
    let llm_request_timeout_secs = parse_u64("BLENS_LLM_REQUEST_TIMEOUT_SECS", "120")?;
    let llm_call_delay_ms = parse_u64("BLENS_LLM_CALL_DELAY_MS", "500")?;
    let llm_compare_delay_ms = parse_u64("BLENS_LLM_COMPARE_DELAY_MS", "1000")?;

    let fetch_timeout_secs = parse_u64("BLENS_FETCH_TIMEOUT_SECS", "15")?;
    let fetch_user_agent = or_default("BLENS_FETCH_USER_AGENT", "blens/0.1 (brand-audit)");

    let capture_base_url = lookup("BLENS_CAPTURE_BASE_URL").ok();
    let capture_timeout_secs = parse_u64("BLENS_CAPTURE_TIMEOUT_SECS", "15")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        llm_api_key,
        llm_api_base,
        llm_model,
        llm_request_timeout_secs,
        llm_call_delay_ms,
        llm_compare_delay_ms,
        fetch_timeout_secs,
        fetch_user_agent,
        capture_base_url,
        capture_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}
