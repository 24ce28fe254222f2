//! Error types for keyboard lighting operations.

use thiserror::Error;

/// Primary error type for steelkeys operations.
#[derive(Error, Debug)]
pub enum SkError {
    // Descriptor lookups
    #[error("No keyboard model specified")]
    NoModel,

    #[error("Unknown model: {model}")]
    UnknownModel { model: String },

    #[error("Preset {preset} not found for model {model}")]
    UnknownPreset { preset: String, model: String },

    #[error("Invalid descriptor: {0}")]
    DescriptorInvalid(String),

    // Lighting configuration errors
    #[error("{value} is not a valid color")]
    InvalidColor { value: String },

    #[error("Unknown effect '{effect}'")]
    InvalidEffect { effect: String },

    #[error("Invalid reactive speed {speed}: must be an integer that fits a signed 16-bit value")]
    InvalidSpeed { speed: String },

    #[error("Alias cycle detected: {}", chain.join(" -> "))]
    AliasCycle { chain: Vec<String> },

    #[error("'{key}' refers to '{target}', which is not defined in the configuration")]
    UnknownAlias { key: String, target: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    // HID errors
    #[error("Cannot open HIDAPI library: {0}")]
    LibraryUnavailable(String),

    #[error("No keyboard with ID {vendor_id:04x}:{product_id:04x} was found")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("Cannot open keyboard {vendor_id:04x}:{product_id:04x}: {reason}")]
    DeviceOpenFailed {
        vendor_id: u16,
        product_id: u16,
        reason: String,
    },

    #[error("HID transport error: {0}")]
    Transport(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SkError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoModel
                | Self::UnknownModel { .. }
                | Self::UnknownPreset { .. }
                | Self::InvalidColor { .. }
                | Self::InvalidEffect { .. }
                | Self::InvalidSpeed { .. }
                | Self::AliasCycle { .. }
                | Self::UnknownAlias { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigParse(_)
                | Self::LibraryUnavailable(_)
                | Self::DeviceNotFound { .. }
                | Self::DeviceOpenFailed { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::NoModel => Some("Pass --model or set STEELKEYS_MODEL"),
            Self::UnknownModel { .. } => Some("Run: steelkeys --list-models"),
            Self::UnknownPreset { .. } => {
                Some("Use --list-presets for the presets available on this model")
            }
            Self::InvalidColor { value } if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) => Some(
                "Colors are strings: quote all-digit colors such as '112233', YAML reads them as numbers",
            ),
            Self::InvalidColor { .. } => Some("Colors are 6 lowercase hex digits, e.g. ff00aa"),
            Self::InvalidEffect { .. } => Some("Supported effects: steady, reactive, disable"),
            Self::LibraryUnavailable(_) => Some(
                "Make sure libhidapi is installed on your system, then run \"sudo ldconfig\"",
            ),
            Self::DeviceNotFound { .. } => {
                Some("Check that the keyboard is plugged in and that --model matches it")
            }
            Self::DeviceOpenFailed { .. } => Some(
                "Run as root or give yourself read/write permissions on the matching /dev/hidraw*",
            ),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using SkError.
pub type Result<T> = std::result::Result<T, SkError>;
