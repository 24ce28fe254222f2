//! steelkeys library - per-key RGB lighting for SteelSeries keyboards.
//!
//! This library exposes the core functionality of the `steelkeys` CLI for use
//! in tests and other applications.
//!
//! # Modules
//!
//! - `layout`: Model, layout and preset descriptors
//! - `config`: Lighting configuration parsing and loading
//! - `protocol`: Request building and packet encoding
//! - `device`: HID transport abstraction and dispatcher
//! - `keyboard`: Keyboard sessions tying it all together
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod keyboard;
pub mod layout;
pub mod logging;
pub mod protocol;
