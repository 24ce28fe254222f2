//! Test fixture helpers for creating temporary descriptor data.
//!
//! The `tiny` model uses the repeat-to-minimum padding scheme with small
//! numbers so packet contents can be checked byte by byte.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const MODELS: &str = "\
tiny:
  id: { vendor: 0x1038, product: 0xfff0 }
  layout: tiny
wide:
  id: { vendor: 0x1038, product: 0xfff1 }
  layout: wide
";

/// Three alphanumeric keys, one solo key, packets of at most two entries.
pub const TINY_LAYOUT: &str = "\
max_entries_per_packet: 2
padding:
  kind: repeat_to_minimum
  min_entries: 3
  repeat_count: 0
  trailer: [0x08, 0x39]
presets: tiny
regions:
  alphanum: { code: 0x2a }
  enter: { code: 0x0b, min_entries: 2, repeat_to_fill: 2 }
keys:
  a: { region: alphanum, keycode: 0x04 }
  b: { region: alphanum, keycode: 0x05 }
  c: { region: alphanum, keycode: 0x06 }
  enter: { region: enter, keycode: 0x28, solo: 2 }
groups:
  letters: [a, b, c]
";

/// Zero-padded layout with custom effect constants and no presets.
pub const WIDE_LAYOUT: &str = "\
max_entries_per_packet: 4
padding:
  kind: zero_pad_to_capacity
  capacity: 4
  trailer: [0, 0, 0]
effects:
  steady: [0x01, 0x02, 0x03, 0x04]
  reactive: [0x05, 0x06]
  disable: [0x07, 0x08, 0x09, 0x0a]
regions:
  main: { code: 0x18 }
keys:
  x: { region: main, keycode: 0x1b }
  y: { region: main, keycode: 0x1c }
";

pub const TINY_PRESETS: &str = "\
glow:
  - 0e 00 2a 00 ff 00 00
  - 0e00 0b00 00ff 00
blank:
  - '0e000000'
";

/// A descriptor directory in a temporary location.
pub struct DescriptorDir {
    pub dir: TempDir,
}

impl DescriptorDir {
    /// Create the `tiny`/`wide` descriptor set.
    ///
    /// # Panics
    ///
    /// Panics if the files cannot be written.
    #[must_use]
    pub fn create() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let root = dir.path();
        std::fs::create_dir(root.join("layouts")).expect("Failed to create layouts dir");
        std::fs::create_dir(root.join("presets")).expect("Failed to create presets dir");

        write(&root.join("models.yaml"), MODELS);
        write(&root.join("layouts/tiny.yaml"), TINY_LAYOUT);
        write(&root.join("layouts/wide.yaml"), WIDE_LAYOUT);
        write(&root.join("presets/tiny.yaml"), TINY_PRESETS);

        Self { dir }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrite or add a file under the directory.
    pub fn write(&self, relative: &str, contents: &str) {
        write(&self.dir.path().join(relative), contents);
    }
}

/// Write a lighting configuration file with the given extension.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
pub fn config_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    write(&path, contents);
    path
}

fn write(path: &Path, contents: &str) {
    std::fs::write(path, contents)
        .unwrap_or_else(|e| panic!("Failed to write {}: {e}", path.display()));
}
