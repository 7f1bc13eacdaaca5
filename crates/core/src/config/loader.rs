use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix for overrides. Nested keys are separated by a
/// double underscore, e.g. `REELSCOPE_IMPUTER__SENTINEL_THRESHOLD_PERCENT`.
const ENV_PREFIX: &str = "REELSCOPE_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from file if it exists, otherwise from defaults.
/// Environment overrides apply either way.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        return load_config(path);
    }

    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(env_overrides())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn env_overrides() -> Env {
    // REELSCOPE_CONFIG names the file itself and is not a config key.
    Env::prefixed(ENV_PREFIX)
        .ignore(&["CONFIG"])
        .split("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::SkipPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[resolver]
row_limit = 10
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.resolver.row_limit, Some(10));
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[report]
top_n = "ten"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/reelscope.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[catalog]
path = "titles.csv"

[enrichment]
skip_policy = "column_heuristic"
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.catalog.path.to_str().unwrap(), "titles.csv");
        assert_eq!(config.enrichment.skip_policy, SkipPolicy::ColumnHeuristic);
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "reelscope.toml",
                r#"
[report]
top_n = 3
"#,
            )?;
            jail.set_env("REELSCOPE_REPORT__TOP_N", "7");
            jail.set_env("REELSCOPE_IMPUTER__SENTINEL_THRESHOLD_PERCENT", "2.5");
            jail.set_env("REELSCOPE_CONFIG", "ignored.toml");

            let config = load_config(Path::new("reelscope.toml")).unwrap();
            assert_eq!(config.report.top_n, 7);
            assert_eq!(config.imputer.sentinel_threshold_percent, 2.5);
            Ok(())
        });
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REELSCOPE_RESOLVER__ROW_LIMIT", "25");

            let config = load_config_or_default(Path::new("missing.toml")).unwrap();
            assert_eq!(config.resolver.row_limit, Some(25));
            assert_eq!(config.catalog.path.to_str().unwrap(), "Netflix Titles.csv");
            Ok(())
        });
    }
}
