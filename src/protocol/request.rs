//! Request builder: lighting configuration to per-region entry lists.

use bytes::Bytes;
use indexmap::IndexMap;
use tracing::{debug, trace};

use super::{LightingEntry, PacketEncoder, Rgb};
use crate::config::{ConfigValue, Lighting, LightingConfig};
use crate::error::{Result, SkError};
use crate::layout::{KeyInfo, Layout};

/// A key that is sent on its own, its entry repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoloJob {
    pub region: String,
    pub entries: Vec<LightingEntry>,
}

/// Entries of one request, grouped by target region.
///
/// Region lists keep configuration order. Solo jobs are never merged and
/// are flushed after every region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestPlan {
    pub regions: IndexMap<String, Vec<LightingEntry>>,
    pub solo: Vec<SoloJob>,
}

impl RequestPlan {
    /// Resolve a lighting configuration against a layout.
    ///
    /// Top-level names that match neither a key nor a group are ignored.
    pub fn from_config(layout: &Layout, config: &LightingConfig) -> Result<Self> {
        let mut plan = Self::default();

        for (name, value) in config.iter() {
            let mut chain = vec![name];
            plan.resolve(layout, name, value, config, &mut chain)?;
        }

        debug!(
            regions = plan.regions.len(),
            entries = plan.entry_count(),
            solo = plan.solo.len(),
            "Built request plan"
        );
        Ok(plan)
    }

    /// Switch every key of the layout off.
    pub fn disable(layout: &Layout) -> Self {
        let lighting = Lighting {
            primary: Rgb::BLACK,
            secondary: Rgb::BLACK,
            effect: layout.effects.disable,
        };

        let mut plan = Self::default();
        for info in layout.keys.values() {
            plan.route(info, lighting);
        }

        debug!(
            regions = plan.regions.len(),
            entries = plan.entry_count(),
            solo = plan.solo.len(),
            "Built disable plan"
        );
        plan
    }

    fn resolve<'c>(
        &mut self,
        layout: &Layout,
        name: &str,
        value: &'c ConfigValue,
        config: &'c LightingConfig,
        chain: &mut Vec<&'c str>,
    ) -> Result<()> {
        let settings = match value {
            ConfigValue::Alias(target) => {
                if chain.contains(&target.as_str()) {
                    let mut cycle: Vec<String> = chain.iter().map(|s| (*s).to_string()).collect();
                    cycle.push(target.clone());
                    return Err(SkError::AliasCycle { chain: cycle });
                }

                let next = config.get(target).ok_or_else(|| SkError::UnknownAlias {
                    key: name.to_string(),
                    target: target.clone(),
                })?;

                trace!(key = name, target = %target, "Following alias");
                chain.push(target.as_str());
                return self.resolve(layout, name, next, config, chain);
            }
            ConfigValue::Literal(settings) => settings,
            ConfigValue::Other(value) => {
                if layout.key(name).is_some() || layout.group(name).is_some() {
                    return Err(SkError::InvalidColor {
                        value: value.to_string(),
                    });
                }
                debug!(key = name, "Ignoring name that matches no key or group");
                return Ok(());
            }
        };

        if let Some(info) = layout.key(name) {
            let lighting = settings.lighting(&layout.effects)?;
            self.route(info, lighting);
        } else if let Some(members) = layout.group(name) {
            let lighting = settings.lighting(&layout.effects)?;
            for member in members {
                let info = layout.key(member).ok_or_else(|| {
                    SkError::DescriptorInvalid(format!(
                        "group '{name}' references unknown key '{member}'"
                    ))
                })?;
                self.route(info, lighting);
            }
        } else {
            debug!(key = name, "Ignoring name that matches no key or group");
        }

        Ok(())
    }

    fn route(&mut self, info: &KeyInfo, lighting: Lighting) {
        let entry = LightingEntry {
            keycode: info.keycode,
            primary: lighting.primary,
            secondary: lighting.secondary,
            effect: lighting.effect,
        };

        match info.solo {
            Some(count) => self.solo.push(SoloJob {
                region: info.region.clone(),
                entries: vec![entry; count],
            }),
            None => self
                .regions
                .entry(info.region.clone())
                .or_default()
                .push(entry),
        }
    }

    /// Serialize the plan: every region's packets, then every solo job's.
    pub fn encode(&self, layout: &Layout) -> Result<Vec<Bytes>> {
        let encoder = PacketEncoder::new(layout);
        let mut packets = Vec::new();

        for (region, entries) in &self.regions {
            packets.extend(encoder.encode(layout.region(region)?, entries));
        }
        for job in &self.solo {
            packets.extend(encoder.encode(layout.region(&job.region)?, &job.entries));
        }

        Ok(packets)
    }

    /// Number of live entries, solo repeats included.
    pub fn entry_count(&self) -> usize {
        self.regions.values().map(Vec::len).sum::<usize>()
            + self.solo.iter().map(|job| job.entries.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty() && self.solo.is_empty()
    }
}
