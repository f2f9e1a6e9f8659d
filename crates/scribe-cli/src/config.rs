use std::path::{Path, PathBuf};
use std::{env, fs, io};

use miette::Diagnostic;
use scribe_editor_core::ScribeConfig;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("error reading config file {path}")]
    #[diagnostic(code(scribe::config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error parsing config file {path}")]
    #[diagnostic(
        code(scribe::config::parse),
        help("values may reference environment variables as $NAME")
    )]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// `$CONFIG_DIR/scribe/scribe.toml`, or `./scribe.toml` without a config dir.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("scribe"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scribe.toml")
}

/// Load the config at `path`. A missing file gives the defaults.
pub fn load(path: &Path) -> Result<ScribeConfig, ConfigError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(ScribeConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse(&substitute_env(raw, env::vars()), path)
}

// substitute environment variables in config file
fn substitute_env(mut raw: String, vars: impl IntoIterator<Item = (String, String)>) -> String {
    for (k, v) in vars {
        raw = raw.replace(&format!("${}", k), &v);
    }
    raw
}

fn parse(raw: &str, path: &Path) -> Result<ScribeConfig, ConfigError> {
    toml::from_str(raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ScribeConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scribe.toml");
        fs::write(&path, "history_depth = 5\n\n[pdf]\nfont_size = 12.0\n").unwrap();

        let config = load(&path).unwrap();
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.pdf.font_size, 12.0);
        assert_eq!(config.pdf.page_width, 595.0);
    }

    #[test]
    fn env_vars_are_substituted() {
        let raw = "log_filter = \"$SCRIBE_TEST_LEVEL\"\n".to_string();
        let raw = substitute_env(raw, [("SCRIBE_TEST_LEVEL".into(), "debug".into())]);
        let config = parse(&raw, Path::new("scribe.toml")).unwrap();
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let err = parse("history_depth = \"lots\"", Path::new("scribe.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert_eq!(err.to_string(), "error parsing config file scribe.toml");
    }
}
