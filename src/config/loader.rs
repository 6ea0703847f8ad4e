//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{CatalogConfig, DuplicateNamePolicy, StoreBackend};
use super::secret::secret_string;
use crate::domain::errors::CatalogError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into CatalogConfig
/// 4. Applies environment variable overrides (CATALOG_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns `CatalogError::Configuration` if the file is missing or unreadable,
/// a referenced variable is unset, parsing fails, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use catalog::config::loader::load_config;
///
/// let config = load_config("catalog.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<CatalogConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CatalogError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CatalogError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: CatalogConfig = toml::from_str(&contents)?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        CatalogError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| CatalogError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CatalogError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using CATALOG_* prefix
///
/// Environment variables follow the pattern CATALOG_<SECTION>_<KEY>, for example
/// CATALOG_STORE_PATH or CATALOG_STAFF_UNLOCK_TTL_SECONDS.
fn apply_env_overrides(config: &mut CatalogConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("CATALOG_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Store overrides
    if let Ok(val) = std::env::var("CATALOG_STORE_BACKEND") {
        config.store.backend = match val.to_lowercase().as_str() {
            "file" => StoreBackend::File,
            "memory" => StoreBackend::Memory,
            other => {
                return Err(CatalogError::Configuration(format!(
                    "Invalid CATALOG_STORE_BACKEND '{other}'. Must be one of: file, memory"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("CATALOG_STORE_PATH") {
        config.store.path = val;
    }
    if let Ok(val) = std::env::var("CATALOG_STORE_COUNTER_START") {
        config.store.counter_start = parse_override("CATALOG_STORE_COUNTER_START", &val)?;
    }
    if let Ok(val) = std::env::var("CATALOG_STORE_DUPLICATE_NAMES") {
        config.store.duplicate_names = match val.to_lowercase().as_str() {
            "replace" => DuplicateNamePolicy::Replace,
            "reject" => DuplicateNamePolicy::Reject,
            other => {
                return Err(CatalogError::Configuration(format!(
                    "Invalid CATALOG_STORE_DUPLICATE_NAMES '{other}'. Must be one of: replace, reject"
                )))
            }
        };
    }

    // Staff overrides
    if let Ok(val) = std::env::var("CATALOG_STAFF_PASSCODE_SHA256") {
        config.staff.passcode_sha256 = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("CATALOG_STAFF_AUTH_TIMEOUT_SECONDS") {
        config.staff.auth_timeout_seconds =
            parse_override("CATALOG_STAFF_AUTH_TIMEOUT_SECONDS", &val)?;
    }
    if let Ok(val) = std::env::var("CATALOG_STAFF_UNLOCK_TTL_SECONDS") {
        config.staff.unlock_ttl_seconds = parse_override("CATALOG_STAFF_UNLOCK_TTL_SECONDS", &val)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("CATALOG_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("CATALOG_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("CATALOG_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

fn parse_override<T: std::str::FromStr>(var: &str, val: &str) -> Result<T> {
    val.trim()
        .parse()
        .map_err(|_| CatalogError::Configuration(format!("Invalid {var} '{val}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("CATALOG_LOADER_TEST_VAR", "test_value");
        let input = "path = \"${CATALOG_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "path = \"test_value\"\n");
        std::env::remove_var("CATALOG_LOADER_TEST_VAR");
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(parse_override::<u64>("CATALOG_STORE_COUNTER_START", " 9000 ").unwrap(), 9000);
        assert!(parse_override::<bool>("CATALOG_LOGGING_LOCAL_ENABLED", "true").unwrap());

        let err = parse_override::<u64>("CATALOG_STORE_COUNTER_START", "lots").unwrap_err();
        assert!(matches!(err, CatalogError::Configuration(_)));
        assert!(err.to_string().contains("CATALOG_STORE_COUNTER_START"));
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("CATALOG_LOADER_MISSING_VAR");
        let input = "path = \"${CATALOG_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("CATALOG_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        let input = "# path = \"${CATALOG_LOADER_COMMENTED_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${CATALOG_LOADER_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-catalog.toml");
        assert!(matches!(result, Err(CatalogError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[store]
backend = "memory"
counter_start = 5000
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.store.counter_start, 5000);
    }
}
