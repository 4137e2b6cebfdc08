use std::fmt;
use std::str::FromStr;

use crate::error::JsonLibError;

/// Output rendering for values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Parse a format string from CLI flags.
    pub fn from_str_name(s: &str) -> Result<Self, JsonLibError> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            other => Err(JsonLibError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl FromStr for Format {
    type Err = JsonLibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::from_str_name(s)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => write!(f, "json"),
            Format::Yaml => write!(f, "yaml"),
        }
    }
}
