use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),

    #[error("config watch error: {0}")]
    WatchError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum UnicliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("ai error: {0}")]
    Ai(String),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("api.model must not be empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: api.model must not be empty"
        );

        let err = ConfigError::WatchError("inotify limit reached".into());
        assert_eq!(err.to_string(), "config watch error: inotify limit reached");
    }

    #[test]
    fn unicli_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: UnicliError = config_err.into();
        assert!(matches!(err, UnicliError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn unicli_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: UnicliError = io_err.into();
        assert!(matches!(err, UnicliError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn unicli_error_other_variants() {
        let err = UnicliError::Ai("model unavailable".into());
        assert_eq!(err.to_string(), "ai error: model unavailable");

        let err = UnicliError::Other("something went wrong".into());
        assert_eq!(err.to_string(), "something went wrong");
    }
}
