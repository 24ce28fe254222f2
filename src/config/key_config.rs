//! Per-key lighting configuration and the color/effect parser.
//!
//! A configuration value is either a literal key configuration or the name
//! of another top-level entry whose configuration it reuses:
//!
//! ```json
//! {
//!   "letters": { "color": "ff0000" },
//!   "space": { "fx": "reactive", "active": "ffffff", "rest": "000000", "speed": 500 },
//!   "esc": { "fx": "disable" },
//!   "enter": "letters"
//! }
//! ```

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{Result, SkError};
use crate::layout::EffectTable;
use crate::protocol::{DEFAULT_REACTIVE_SPEED, EffectDescriptor, Rgb};

/// A top-level configuration value.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Reuse the configuration of another top-level name.
    Alias(String),
    /// Literal settings.
    Literal(KeyConfig),
    /// Anything else. Rejected only when the name matches a key or group.
    Other(Value),
}

/// Lighting settings of a key or group.
///
/// Fields are kept as raw values so that badly typed input is reported as
/// an invalid color, effect or speed rather than a parse failure. Unknown
/// fields are kept and ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct KeyConfig {
    /// Effect name; `steady` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fx: Option<Value>,
    /// Color of a steady key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    /// Color of a reactive key while pressed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<Value>,
    /// Color of a reactive key at rest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<Value>,
    /// Reactive speed, signed 16-bit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Value>,
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub unknown: Map<String, Value>,
}

/// Supported lighting effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Effect {
    #[default]
    Steady,
    Disable,
    Reactive,
}

impl FromStr for Effect {
    type Err = SkError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "steady" => Ok(Self::Steady),
            "disable" => Ok(Self::Disable),
            "reactive" => Ok(Self::Reactive),
            other => Err(SkError::InvalidEffect {
                effect: other.to_string(),
            }),
        }
    }
}

impl Display for Effect {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Steady => "steady",
            Self::Disable => "disable",
            Self::Reactive => "reactive",
        })
    }
}

/// Wire-ready lighting fields of one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lighting {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub effect: EffectDescriptor,
}

/// Parse a `rrggbb` color value.
///
/// Anything but a string of exactly six lowercase hex digits fails with
/// `InvalidColor`.
pub fn parse_color(value: Option<&Value>) -> Result<Rgb> {
    match value {
        Some(Value::String(s)) => s.parse().map_err(|_| SkError::InvalidColor { value: s.clone() }),
        Some(other) => Err(SkError::InvalidColor {
            value: other.to_string(),
        }),
        None => Err(SkError::InvalidColor {
            value: "(missing)".to_string(),
        }),
    }
}

impl KeyConfig {
    /// A steady color.
    pub fn steady(color: Rgb) -> Self {
        Self {
            color: Some(Value::String(color.to_string())),
            ..Self::default()
        }
    }

    /// The configured effect.
    pub fn effect(&self) -> Result<Effect> {
        match &self.fx {
            None => Ok(Effect::Steady),
            Some(Value::String(name)) => name.parse(),
            Some(other) => Err(SkError::InvalidEffect {
                effect: other.to_string(),
            }),
        }
    }

    /// Reactive speed as a little-endian `i16`.
    fn speed_bytes(&self) -> Result<[u8; 2]> {
        let speed = match &self.speed {
            None => DEFAULT_REACTIVE_SPEED,
            Some(value) => value.as_i64().ok_or_else(|| SkError::InvalidSpeed {
                speed: value.to_string(),
            })?,
        };
        i16::try_from(speed)
            .map(i16::to_le_bytes)
            .map_err(|_| SkError::InvalidSpeed {
                speed: speed.to_string(),
            })
    }

    /// Convert to wire fields using the layout's effect constants.
    pub fn lighting(&self, effects: &EffectTable) -> Result<Lighting> {
        let effect = self.effect()?;
        trace!(%effect, "Resolving key lighting");
        for field in self.unknown.keys() {
            debug!(field = %field, "Ignoring unknown lighting field");
        }

        match effect {
            Effect::Steady => Ok(Lighting {
                primary: parse_color(self.color.as_ref())?,
                secondary: Rgb::BLACK,
                effect: effects.steady,
            }),
            Effect::Disable => Ok(Lighting {
                primary: Rgb::BLACK,
                secondary: Rgb::BLACK,
                effect: effects.disable,
            }),
            Effect::Reactive => {
                let [lo, hi] = self.speed_bytes()?;
                let [t0, t1] = effects.reactive;

                Ok(Lighting {
                    primary: parse_color(self.active.as_ref())?,
                    secondary: parse_color(self.rest.as_ref())?,
                    effect: [lo, hi, t0, t1],
                })
            }
        }
    }
}
