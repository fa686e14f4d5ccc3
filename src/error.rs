//! Library error type
//!
//! Only start-up conditions are errors. Anything wrong with an individual
//! file or line is skipped and reported through [`crate::domain::Diagnostic`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// The home directory could not be resolved from the environment.
    #[error("environment variable {var} is not set; cannot resolve the user search roots")]
    MissingEnvironment { var: &'static str },

    #[error("invalid configuration identifier {id:?}: {reason}")]
    InvalidIdentifier { id: String, reason: &'static str },
}

/// Reject identifiers that cannot name a file at all.
///
/// `vendor/app` is accepted and resolves to `~/.config/vendor/app.conf`.
pub(crate) fn validate_identifier(id: &str) -> Result<()> {
    let reason = if id.is_empty() {
        "identifier is empty"
    } else if id.contains('\0') {
        "identifier contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(ConfigError::InvalidIdentifier { id: id.to_string(), reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_accepts_plain_names() {
        assert!(validate_identifier("app").is_ok());
        assert!(validate_identifier("my-app.v2").is_ok());
        assert!(validate_identifier("vendor/app").is_ok());
    }

    #[test]
    fn test_validate_identifier_rejects_bad_names() {
        for bad in ["", "nul\0"] {
            let err = validate_identifier(bad).expect_err("should reject");
            assert!(matches!(err, ConfigError::InvalidIdentifier { .. }), "{bad:?}");
        }
    }

    #[test]
    fn test_missing_environment_message_names_variable() {
        let err = ConfigError::MissingEnvironment { var: "HOME" };
        assert!(err.to_string().contains("HOME"));
    }
}
