//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ChartexConfig;
use super::secret::secret_string;
use crate::domain::errors::ChartexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ChartexConfig
/// 4. Applies environment variable overrides (CHARTEX_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use chartex::config::loader::load_config;
///
/// let config = load_config("chartex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ChartexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ChartexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ChartexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config = parse_config(&contents)?;

    // Relative option paths are resolved against the config file's directory
    if let Some(base_dir) = path.parent() {
        resolve_option_paths(&mut config, base_dir);
    }

    config.validate().map_err(|e| {
        ChartexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Parses configuration text without touching the filesystem
///
/// Performs `${VAR}` substitution and applies `CHARTEX_*` overrides but does
/// not validate.
pub fn parse_config(contents: &str) -> Result<ChartexConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: ChartexConfig = toml::from_str(&contents)
        .map_err(|e| ChartexError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in
/// one error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed_line = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ChartexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_bool(name: &str, fallback: bool) -> Option<bool> {
    std::env::var(name).ok().map(|v| v.parse().unwrap_or(fallback))
}

/// Applies environment variable overrides using CHARTEX_* prefix
///
/// Environment variables follow the pattern: CHARTEX_<SECTION>_<KEY>
/// For example: CHARTEX_SERVER_HOST, CHARTEX_FTP_PASSWORD
fn apply_env_overrides(config: &mut ChartexConfig) -> Result<()> {
    if let Ok(val) = std::env::var("CHARTEX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Ok(val) = std::env::var("CHARTEX_SERVER_HOST") {
        config.server.host = val;
    }
    if let Ok(val) = std::env::var("CHARTEX_SERVER_PORT") {
        config.server.port = val.parse().map_err(|_| {
            ChartexError::Configuration(format!("CHARTEX_SERVER_PORT is not a valid port: {val}"))
        })?;
    }
    if let Some(secure) = env_bool("CHARTEX_SERVER_SECURE", false) {
        config.server.secure = secure;
    }
    if let Some(verify) = env_bool("CHARTEX_SERVER_TLS_VERIFY", true) {
        config.server.tls_verify = verify;
    }
    if let Some(minify) = env_bool("CHARTEX_SERVER_MINIFY_RESOURCES", false) {
        config.server.minify_resources = minify;
    }
    if let Ok(val) = std::env::var("CHARTEX_SERVER_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.server.timeout_seconds = Some(timeout);
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("CHARTEX_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }
    if let Some(unzip) = env_bool("CHARTEX_EXPORT_UNZIP", true) {
        config.export.unzip = unzip;
    }
    if let Some(bulk) = env_bool("CHARTEX_EXPORT_BULK", true) {
        config.export.bulk = bulk;
    }

    if let Ok(val) = std::env::var("CHARTEX_DESTINATION_KIND") {
        config.destination.kind = val.parse().map_err(ChartexError::Configuration)?;
    }

    // Object storage overrides (only if S3 is configured)
    if let Some(ref mut s3) = config.s3 {
        if let Ok(val) = std::env::var("CHARTEX_S3_BUCKET") {
            s3.bucket = val;
        }
        if let Ok(val) = std::env::var("CHARTEX_S3_ACCESS_KEY_ID") {
            s3.access_key_id = val;
        }
        if let Ok(val) = std::env::var("CHARTEX_S3_SECRET_ACCESS_KEY") {
            s3.secret_access_key = secret_string(val);
        }
        if let Ok(val) = std::env::var("CHARTEX_S3_ENDPOINT") {
            s3.endpoint = Some(val);
        }
    }

    // FTP overrides (only if FTP is configured)
    if let Some(ref mut ftp) = config.ftp {
        if let Ok(val) = std::env::var("CHARTEX_FTP_HOST") {
            ftp.host = val;
        }
        if let Ok(val) = std::env::var("CHARTEX_FTP_PORT") {
            if let Ok(port) = val.parse() {
                ftp.port = port;
            }
        }
        if let Ok(val) = std::env::var("CHARTEX_FTP_USERNAME") {
            ftp.username = val;
        }
        if let Ok(val) = std::env::var("CHARTEX_FTP_PASSWORD") {
            ftp.password = secret_string(val);
        }
        if let Ok(val) = std::env::var("CHARTEX_FTP_REMOTE_DIR") {
            ftp.remote_dir = val;
        }
    }

    // Logging overrides
    if let Some(enabled) = env_bool("CHARTEX_LOGGING_LOCAL_ENABLED", false) {
        config.logging.local_enabled = enabled;
    }
    if let Ok(val) = std::env::var("CHARTEX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

/// Makes relative `{ path = ".." }` options relative to `base_dir`
fn resolve_option_paths(config: &mut ChartexConfig, base_dir: &Path) {
    use crate::domain::OptionValue;

    let relative: Vec<(String, std::path::PathBuf)> = config
        .export
        .options
        .iter()
        .filter_map(|(name, value)| match value {
            OptionValue::Path(p) if p.is_relative() => Some((name.to_string(), base_dir.join(p))),
            _ => None,
        })
        .collect();

    for (name, resolved) in relative {
        config.export.options.set(name, resolved);
    }
}
