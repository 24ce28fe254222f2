//! SteelSeries per-key lighting protocol.
//!
//! A lighting request is a list of 12 byte entry fragments grouped by
//! region. Each region is sent as one or more fixed-layout feature reports:
//!
//! ```text
//! [0x0e, 0x00, region, 0x00] [fragment; N] [padding] [trailer]
//! fragment = primary(3) secondary(3) effect(4) [0x00, keycode]
//! ```
//!
//! Changes are committed with a separate refresh output report.

mod encoder;
mod request;

pub use encoder::PacketEncoder;
pub use request::{RequestPlan, SoloJob};

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Report ID of the lighting feature report.
pub const REPORT_ID: u8 = 0x0e;

/// Header length of a lighting packet.
pub const HEADER_LEN: usize = 4;

/// Length of one entry fragment.
pub const FRAGMENT_LEN: usize = 12;

/// Effect bytes of an entry.
pub type EffectDescriptor = [u8; 4];

/// Steady color: default speed (300, little-endian) then the steady mode.
pub const DEFAULT_STEADY: EffectDescriptor = [0x2c, 0x01, 0x00, 0x01];

/// Reactive mode; the 16-bit speed is prepended.
pub const DEFAULT_REACTIVE: [u8; 2] = [0x00, 0x02];

/// A disabled key is steady black.
pub const DEFAULT_DISABLE: EffectDescriptor = DEFAULT_STEADY;

/// Reactive speed used when the configuration omits it.
pub const DEFAULT_REACTIVE_SPEED: i64 = 300;

/// RGB color.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Error returned when a string is not a `rrggbb` color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRgbError;

impl Display for ParseRgbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("expected 6 lowercase hex digits")
    }
}

impl std::error::Error for ParseRgbError {}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    /// Parse exactly six lowercase hex digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid = s.len() == 6
            && s
                .bytes()
                .all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c));
        if !valid {
            return Err(ParseRgbError);
        }

        let channel = |range: std::ops::Range<usize>| {
            s.get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or(ParseRgbError)
        };

        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// One key's lighting, ready to be serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightingEntry {
    pub keycode: u8,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub effect: EffectDescriptor,
}

impl LightingEntry {
    /// Wire fragment of this entry.
    pub fn fragment(&self) -> [u8; FRAGMENT_LEN] {
        let [r1, g1, b1] = self.primary.to_bytes();
        let [r2, g2, b2] = self.secondary.to_bytes();
        let [e0, e1, e2, e3] = self.effect;
        [r1, g1, b1, r2, g2, b2, e0, e1, e2, e3, 0x00, self.keycode]
    }
}
