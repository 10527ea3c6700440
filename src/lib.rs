//! Purr Installer Library
//!
//! Interactive installer core: the picker and line-editor widgets, the
//! configuration wizard, and the install-script synthesizer and executor.

pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod hardware;
pub mod input;
pub mod sanity;
pub mod script;
pub mod scrolling;
pub mod system;
pub mod theme;
pub mod types;
pub mod ui;
pub mod wizard;

// Re-export main types for convenience
pub use config::{InstallConfig, MountSpec, Secret};
pub use error::{InstallerError, Result};
pub use executor::{ScriptOutcome, run_script, write_script};
pub use hardware::{FirmwareMode, detect_firmware_mode};
pub use input::{InputResult, LineEditorState, PickerState};
pub use script::{ScriptOptions, render_install_script};
pub use system::{HostProbe, SystemProbe};
pub use types::{BootMode, Filesystem, InputMode, Toggle};
pub use wizard::{Prompter, WizardOptions, confirm_secret, run_wizard};
