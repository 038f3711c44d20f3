// ABOUTME: Application name validation.
// ABOUTME: Names become repository path segments and working directory names.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppNameError {
    #[error("application name cannot be empty")]
    Empty,

    #[error("application name exceeds maximum length of 128 characters")]
    TooLong,

    #[error("application name cannot start with '{0}'")]
    InvalidStart(char),

    #[error("invalid character in application name: '{0}'")]
    InvalidChar(char),
}

/// Name of the application being promoted.
///
/// Used verbatim as `<root>/<app>` in the repository and as the last path
/// component of the working directory, so path separators and whitespace are
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppName(String);

impl AppName {
    pub fn new(value: &str) -> Result<Self, AppNameError> {
        let first = value.chars().next().ok_or(AppNameError::Empty)?;

        if value.len() > 128 {
            return Err(AppNameError::TooLong);
        }

        if first == '.' || first == '-' {
            return Err(AppNameError::InvalidStart(first));
        }

        for c in value.chars() {
            if !c.is_ascii_alphanumeric() && !matches!(c, '.' | '_' | '-') {
                return Err(AppNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_site_names() {
        assert_eq!(AppName::new("www.example.com").unwrap().as_str(), "www.example.com");
        assert!(AppName::new("billing_api-2").is_ok());
    }

    #[test]
    fn rejects_path_like_names() {
        assert_eq!(AppName::new("a/b"), Err(AppNameError::InvalidChar('/')));
        assert_eq!(AppName::new(".."), Err(AppNameError::InvalidStart('.')));
        assert_eq!(AppName::new("my app"), Err(AppNameError::InvalidChar(' ')));
    }

    #[test]
    fn rejects_empty_and_long_names() {
        assert_eq!(AppName::new(""), Err(AppNameError::Empty));
        assert_eq!(AppName::new(&"a".repeat(129)), Err(AppNameError::TooLong));
    }
}
