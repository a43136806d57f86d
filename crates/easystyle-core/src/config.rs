use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("EASYSTYLE_ENV", "development"))?;
    let log_level = or_default("EASYSTYLE_LOG_LEVEL", "info");
    let api_base_url = or_default("EASYSTYLE_API_BASE_URL", "http://localhost:8000/api");
    let storage_dir = PathBuf::from(or_default("EASYSTYLE_STORAGE_DIR", "./.easystyle"));
    let request_timeout_secs = parse_u64("EASYSTYLE_REQUEST_TIMEOUT_SECS", "30")?;

    let gemini_api_key = lookup("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
    let gemini_base_url = or_default(
        "EASYSTYLE_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    );
    let text_model = or_default("EASYSTYLE_TEXT_MODEL", "gemini-2.5-flash");
    let image_model = or_default("EASYSTYLE_IMAGE_MODEL", "gemini-2.5-flash-image-preview");
    let ai_timeout_secs = parse_u64("EASYSTYLE_AI_TIMEOUT_SECS", "60")?;
    let max_products = parse_usize("EASYSTYLE_MAX_PRODUCTS", "5")?;

    let image_max_dimension = parse_u32("EASYSTYLE_IMAGE_MAX_DIMENSION", "1024")?;
    if image_max_dimension == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "EASYSTYLE_IMAGE_MAX_DIMENSION".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let image_quality = parse_image_quality(&or_default("EASYSTYLE_IMAGE_QUALITY", "85"))?;

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        storage_dir,
        request_timeout_secs,
        gemini_api_key,
        gemini_base_url,
        text_model,
        image_model,
        ai_timeout_secs,
        max_products,
        image_max_dimension,
        image_quality,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "EASYSTYLE_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// JPEG quality is a percentage; 0 would produce an unusable image.
fn parse_image_quality(raw: &str) -> Result<u8, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "EASYSTYLE_IMAGE_QUALITY".to_string(),
        reason,
    };
    let quality = raw.parse::<u8>().map_err(|e| invalid(e.to_string()))?;
    if (1..=100).contains(&quality) {
        Ok(quality)
    } else {
        Err(invalid(format!("{quality} is outside 1..=100")))
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
