//! Loader errors

use std::fmt;
use std::io;
use std::path::PathBuf;

use sde_hdmi_core::config::ConfigError as RuleError;

/// Configuration loading errors
#[derive(Debug)]
pub enum ConfigError {
    /// File could not be read
    Io { path: PathBuf, source: io::Error },
    /// TOML syntax or schema error
    Toml(toml::de::Error),
    /// A string does not fit its on-device buffer
    TooLong { field: &'static str, max: usize },
    /// More displays than the device supports
    TooManyDisplays { max: usize },
    /// More modes on one display than the device supports
    TooManyModes { display: String, max: usize },
    /// Configuration breaks a validation rule
    Invalid(RuleError),
    /// Blob encoding failed
    Encode(postcard::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, .. } => write!(f, "cannot read {}", path.display()),
            ConfigError::Toml(_) => write!(f, "invalid TOML"),
            ConfigError::TooLong { field, max } => {
                write!(f, "{field} is longer than {max} bytes")
            }
            ConfigError::TooManyDisplays { max } => {
                write!(f, "more than {max} displays configured")
            }
            ConfigError::TooManyModes { display, max } => {
                write!(f, "display {display} has more than {max} modes")
            }
            ConfigError::Invalid(rule) => match rule {
                RuleError::VersionMismatch => write!(f, "unsupported configuration version"),
                RuleError::MissingName => write!(f, "display without a name"),
                RuleError::DuplicateName => write!(f, "display names must be unique"),
                RuleError::DuplicateController => {
                    write!(f, "two displays use the same controller")
                }
                RuleError::NoModes => write!(f, "non-pluggable display needs at least one mode"),
                RuleError::MissingPhysicalSize => {
                    write!(f, "non-pluggable display needs width_mm and height_mm")
                }
                RuleError::InvalidMode(i) => {
                    write!(f, "mode {i} has inconsistent timings or refresh rate")
                }
                RuleError::Deserialize => write!(f, "blob could not be decoded"),
            },
            ConfigError::Encode(_) => write!(f, "cannot encode configuration blob"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Toml(e) => Some(e),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

impl From<RuleError> for ConfigError {
    fn from(e: RuleError) -> Self {
        ConfigError::Invalid(e)
    }
}

impl From<postcard::Error> for ConfigError {
    fn from(e: postcard::Error) -> Self {
        ConfigError::Encode(e)
    }
}
