//! Keyboard model binding and lighting sessions.
//!
//! A [`Keyboard`] holds the immutable model, layout and preset data of one
//! model. Opening it yields a [`Session`] that owns the transport for as
//! long as lighting operations run.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::config::LightingConfig;
use crate::device::{Dispatcher, HidKeyboard, HidTransport, open_keyboard};
use crate::error::{Result, SkError};
use crate::layout::{Layout, Model, PresetSet, Registry};
use crate::protocol::RequestPlan;

/// A keyboard model with its layout and presets.
#[derive(Debug, Clone)]
pub struct Keyboard {
    model: Model,
    layout: Layout,
    presets: PresetSet,
}

impl Keyboard {
    /// Load a model and its descriptors from the registry.
    #[instrument(skip(registry))]
    pub fn load(registry: &Registry, model: &str) -> Result<Self> {
        let model = registry.model(model)?.clone();
        let layout = registry.layout(&model.layout)?;
        let presets = match &layout.presets {
            Some(name) => registry.presets(name)?,
            None => PresetSet::default(),
        };

        debug!(
            model = %model.name,
            keys = layout.keys.len(),
            presets = presets.names().count(),
            "Keyboard loaded"
        );
        Ok(Self {
            model,
            layout,
            presets,
        })
    }

    pub const fn model(&self) -> &Model {
        &self.model
    }

    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn list_keys(&self) -> impl Iterator<Item = &str> {
        self.layout.list_keys()
    }

    pub fn list_groups(&self) -> impl Iterator<Item = &str> {
        self.layout.list_groups()
    }

    pub fn list_presets(&self) -> impl Iterator<Item = &str> {
        self.presets.names()
    }

    /// Raw payloads of a preset.
    pub fn preset(&self, name: &str) -> Result<&[Vec<u8>]> {
        self.presets
            .get(name)
            .ok_or_else(|| SkError::UnknownPreset {
                preset: name.to_string(),
                model: self.model.name.clone(),
            })
    }

    /// Resolve a configuration without touching the device.
    pub fn plan_config(&self, config: &LightingConfig) -> Result<RequestPlan> {
        RequestPlan::from_config(&self.layout, config)
    }

    /// Open the keyboard over hidapi.
    pub fn open(&self) -> Result<Session<'_, HidKeyboard>> {
        let device = open_keyboard(self.model.vendor_id, self.model.product_id)?;
        Ok(self.attach(device))
    }

    /// Bind an already open transport.
    pub fn attach<T: HidTransport>(&self, transport: T) -> Session<'_, T> {
        Session {
            keyboard: self,
            dispatcher: Dispatcher::new(transport),
        }
    }
}

/// A keyboard bound to an open transport.
#[derive(Debug)]
pub struct Session<'kb, T> {
    keyboard: &'kb Keyboard,
    dispatcher: Dispatcher<T>,
}

impl<T: HidTransport> Session<'_, T> {
    /// Override the inter-report delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.dispatcher = self.dispatcher.with_delay(delay);
        self
    }

    pub const fn keyboard(&self) -> &Keyboard {
        self.keyboard
    }

    pub const fn transport(&self) -> &T {
        self.dispatcher.transport()
    }

    pub fn into_transport(self) -> T {
        self.dispatcher.into_inner()
    }

    /// Switch every key off.
    #[instrument(skip(self))]
    pub fn disable(&self) -> Result<()> {
        let plan = RequestPlan::disable(&self.keyboard.layout);
        self.apply(&plan)
    }

    /// Apply a lighting configuration.
    #[instrument(skip(self, config), fields(entries = config.len()))]
    pub fn push_config(&self, config: &LightingConfig) -> Result<()> {
        let plan = self.keyboard.plan_config(config)?;
        self.apply(&plan)
    }

    /// Send a preset verbatim, then refresh.
    #[instrument(skip(self))]
    pub fn push_preset(&self, name: &str) -> Result<()> {
        let payloads = self.keyboard.preset(name)?;
        self.dispatcher.send_feature_reports(payloads)?;
        self.dispatcher.refresh()?;
        info!(preset = name, reports = payloads.len(), "Preset applied");
        Ok(())
    }

    /// Send a resolved plan: region packets, solo packets, then refresh.
    pub fn apply(&self, plan: &RequestPlan) -> Result<()> {
        let packets = plan.encode(&self.keyboard.layout)?;
        self.dispatcher.send_feature_reports(&packets)?;
        self.dispatcher.refresh()?;
        info!(
            packets = packets.len(),
            entries = plan.entry_count(),
            "Lighting applied"
        );
        Ok(())
    }

    /// Commit pending changes.
    pub fn refresh(&self) -> Result<()> {
        self.dispatcher.refresh()
    }
}
