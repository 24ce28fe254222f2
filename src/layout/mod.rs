//! Keyboard model, layout and preset descriptors.
//!
//! Descriptors are declarative YAML documents loaded once per session and
//! read-only afterwards. A model names its USB IDs and a layout; a layout
//! maps human-readable key names to wire keycodes and regions, declares
//! named groups, and selects the padding policy its packets use.

mod registry;

pub use registry::{DescriptorSource, Registry};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{Result, SkError};
use crate::protocol::{DEFAULT_DISABLE, DEFAULT_REACTIVE, DEFAULT_STEADY, EffectDescriptor};

/// A supported keyboard model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Model {
    /// Lowercase model name used on the command line.
    pub name: String,
    /// USB vendor ID.
    pub vendor_id: u16,
    /// USB product ID.
    pub product_id: u16,
    /// Name of the layout descriptor.
    pub layout: String,
}

/// Per-key metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct KeyInfo {
    /// Region the key belongs to.
    pub region: String,
    /// Identifier of the key in the lighting protocol.
    pub keycode: u8,
    /// When set, the key is sent in its own packet sequence with its entry
    /// repeated this many times.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solo: Option<usize>,
}

/// Per-region metadata.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RegionInfo {
    /// Region code written into the packet header.
    pub code: u8,
    /// Overrides the policy's `min_entries` (repeat-to-minimum layouts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_entries: Option<usize>,
    /// Overrides the policy's `repeat_count` (repeat-to-minimum layouts).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_to_fill: Option<usize>,
}

/// How unused entry slots of a packet are filled, and what closes it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Repeat the last live fragment up to `repeat_count` entries, then
    /// zero-pad up to `min_entries`.
    RepeatToMinimum {
        min_entries: usize,
        repeat_count: usize,
        trailer: Vec<u8>,
    },
    /// Zero-pad every packet up to `capacity` entries.
    ZeroPadToCapacity { capacity: usize, trailer: Vec<u8> },
}

impl PaddingPolicy {
    /// Trailer bytes appended after the entry slots.
    pub fn trailer(&self) -> &[u8] {
        match self {
            Self::RepeatToMinimum { trailer, .. } | Self::ZeroPadToCapacity { trailer, .. } => {
                trailer
            }
        }
    }
}

/// Effect constants used when building entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct EffectTable {
    /// Descriptor for a steady color.
    #[serde(default = "default_steady")]
    pub steady: EffectDescriptor,
    /// Tail appended after the little-endian speed for reactive keys.
    #[serde(default = "default_reactive")]
    pub reactive: [u8; 2],
    /// Descriptor used when a key is switched off.
    #[serde(default = "default_disable")]
    pub disable: EffectDescriptor,
}

const fn default_steady() -> EffectDescriptor {
    DEFAULT_STEADY
}

const fn default_reactive() -> [u8; 2] {
    DEFAULT_REACTIVE
}

const fn default_disable() -> EffectDescriptor {
    DEFAULT_DISABLE
}

impl Default for EffectTable {
    fn default() -> Self {
        Self {
            steady: DEFAULT_STEADY,
            reactive: DEFAULT_REACTIVE,
            disable: DEFAULT_DISABLE,
        }
    }
}

/// A keyboard layout.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Layout {
    /// Maximum live entries per packet; longer region lists are split.
    pub max_entries_per_packet: usize,
    /// Padding and trailer scheme of this protocol version.
    pub padding: PaddingPolicy,
    #[serde(default)]
    pub effects: EffectTable,
    /// Name of the preset descriptor, if the layout has vendor presets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<String>,
    pub regions: IndexMap<String, RegionInfo>,
    pub keys: IndexMap<String, KeyInfo>,
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
}

impl Layout {
    /// Parse and validate a layout descriptor.
    pub fn from_yaml(name: &str, source: &str) -> Result<Self> {
        let layout: Self = serde_yaml::from_str(source)
            .map_err(|e| SkError::DescriptorInvalid(format!("layout '{name}': {e}")))?;
        layout.validate(name)?;
        trace!(
            layout = name,
            keys = layout.keys.len(),
            groups = layout.groups.len(),
            regions = layout.regions.len(),
            "Layout parsed"
        );
        Ok(layout)
    }

    /// Check the cross references of the descriptor.
    pub fn validate(&self, name: &str) -> Result<()> {
        let invalid = |msg: String| Err(SkError::DescriptorInvalid(format!("layout '{name}': {msg}")));

        if self.max_entries_per_packet == 0 {
            return invalid("max_entries_per_packet must be at least 1".to_string());
        }

        if let PaddingPolicy::ZeroPadToCapacity { capacity, .. } = &self.padding {
            if *capacity < self.max_entries_per_packet {
                return invalid(format!(
                    "capacity {capacity} is below max_entries_per_packet {}",
                    self.max_entries_per_packet
                ));
            }
        }

        for (key, info) in &self.keys {
            if !self.regions.contains_key(&info.region) {
                return invalid(format!("key '{key}' uses unknown region '{}'", info.region));
            }
            if info.solo == Some(0) {
                return invalid(format!("key '{key}' has a solo count of 0"));
            }
        }

        for (group, members) in &self.groups {
            if let Some(missing) = members.iter().find(|m| !self.keys.contains_key(*m)) {
                return invalid(format!("group '{group}' references unknown key '{missing}'"));
            }
        }

        Ok(())
    }

    /// Look up a key by name.
    pub fn key(&self, name: &str) -> Option<&KeyInfo> {
        self.keys.get(name)
    }

    /// Look up a group by name.
    pub fn group(&self, name: &str) -> Option<&[String]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Look up a region by id.
    pub fn region(&self, id: &str) -> Result<&RegionInfo> {
        self.regions
            .get(id)
            .ok_or_else(|| SkError::DescriptorInvalid(format!("unknown region '{id}'")))
    }

    /// Key names in declaration order.
    pub fn list_keys(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// Group names in declaration order.
    pub fn list_groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }
}

/// Named vendor presets: raw report payloads sent verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetSet {
    presets: IndexMap<String, Vec<Vec<u8>>>,
}

impl PresetSet {
    /// Parse a preset descriptor, decoding every hex payload.
    pub fn from_yaml(name: &str, source: &str) -> Result<Self> {
        let raw: IndexMap<String, Vec<String>> = serde_yaml::from_str(source)
            .map_err(|e| SkError::DescriptorInvalid(format!("presets '{name}': {e}")))?;

        let mut presets = IndexMap::with_capacity(raw.len());
        for (preset, payloads) in raw {
            let decoded = payloads
                .iter()
                .map(|payload| {
                    let compact: String =
                        payload.chars().filter(|c| !c.is_whitespace()).collect();
                    hex::decode(compact).map_err(|e| {
                        SkError::DescriptorInvalid(format!(
                            "presets '{name}': payload of '{preset}' is not hex: {e}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            presets.insert(preset, decoded);
        }

        Ok(Self { presets })
    }

    /// Payloads of a preset.
    pub fn get(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.presets.get(name).map(Vec::as_slice)
    }

    /// Preset names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}
