//! Descriptor registry: models, layouts and presets by name.
//!
//! The built-in descriptors are compiled into the binary. A directory with
//! the same structure (`models.yaml`, `layouts/<name>.yaml`,
//! `presets/<name>.yaml`) can be used instead.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{Layout, Model, PresetSet};
use crate::error::{Result, SkError};

const BUILTIN_MODELS: &str = include_str!("../../data/models.yaml");

const BUILTIN_LAYOUTS: &[(&str, &str)] = &[
    ("apex-m800", include_str!("../../data/layouts/apex-m800.yaml")),
    ("msi-perkey", include_str!("../../data/layouts/msi-perkey.yaml")),
];

const BUILTIN_PRESETS: &[(&str, &str)] = &[(
    "msi-perkey",
    include_str!("../../data/presets/msi-perkey.yaml"),
)];

/// Where descriptors are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorSource {
    /// Descriptors compiled into the binary.
    Builtin,
    /// Descriptors read from a directory.
    Directory(PathBuf),
}

#[derive(Debug, Deserialize)]
struct ModelDescriptor {
    id: UsbId,
    layout: String,
}

#[derive(Debug, Deserialize)]
struct UsbId {
    vendor: u16,
    product: u16,
}

/// Model registry plus access to the layout and preset descriptors.
#[derive(Debug, Clone)]
pub struct Registry {
    source: DescriptorSource,
    models: IndexMap<String, Model>,
}

impl Registry {
    /// Registry over the built-in descriptors.
    pub fn builtin() -> Result<Self> {
        Self::from_models(DescriptorSource::Builtin, BUILTIN_MODELS)
    }

    /// Registry over a descriptor directory.
    #[instrument]
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let source = DescriptorSource::Directory(dir.to_path_buf());
        let models = read_descriptor(&dir.join("models.yaml"))?;
        Self::from_models(source, &models)
    }

    fn from_models(source: DescriptorSource, yaml: &str) -> Result<Self> {
        let raw: IndexMap<String, ModelDescriptor> = serde_yaml::from_str(yaml)
            .map_err(|e| SkError::DescriptorInvalid(format!("models: {e}")))?;

        let models: IndexMap<String, Model> = raw
            .into_iter()
            .map(|(name, desc)| {
                let name = name.to_lowercase();
                let model = Model {
                    name: name.clone(),
                    vendor_id: desc.id.vendor,
                    product_id: desc.id.product,
                    layout: desc.layout,
                };
                (name, model)
            })
            .collect();

        debug!(?source, models = models.len(), "Model registry loaded");
        Ok(Self { source, models })
    }

    pub const fn source(&self) -> &DescriptorSource {
        &self.source
    }

    /// Look up a model by name, case-insensitively.
    pub fn model(&self, name: &str) -> Result<&Model> {
        self.models
            .get(&name.to_lowercase())
            .ok_or_else(|| SkError::UnknownModel {
                model: name.to_string(),
            })
    }

    /// All models in declaration order.
    pub fn list_models(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    /// Load and validate a layout descriptor.
    pub fn layout(&self, name: &str) -> Result<Layout> {
        let source = self.read("layouts", BUILTIN_LAYOUTS, name)?;
        Layout::from_yaml(name, &source)
    }

    /// Load a preset descriptor.
    pub fn presets(&self, name: &str) -> Result<PresetSet> {
        let source = self.read("presets", BUILTIN_PRESETS, name)?;
        PresetSet::from_yaml(name, &source)
    }

    fn read(&self, kind: &str, builtin: &[(&str, &str)], name: &str) -> Result<String> {
        match &self.source {
            DescriptorSource::Builtin => builtin
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, yaml)| (*yaml).to_string())
                .ok_or_else(|| {
                    SkError::DescriptorInvalid(format!("no built-in {kind} descriptor '{name}'"))
                }),
            DescriptorSource::Directory(dir) => {
                read_descriptor(&dir.join(kind).join(format!("{name}.yaml")))
            }
        }
    }
}

fn read_descriptor(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "Reading descriptor");
    std::fs::read_to_string(path).map_err(|e| {
        SkError::DescriptorInvalid(format!("cannot read {}: {e}", path.display()))
    })
}
