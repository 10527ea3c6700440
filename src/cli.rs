use clap::Parser;
use std::path::PathBuf;

use crate::executor::DEFAULT_SCRIPT_PATH;
use crate::script::ScriptOptions;
use crate::system::{DEFAULT_LOCALE_GEN, DEFAULT_ZONEINFO_DIR, HostProbe};
use crate::types::BootMode;

/// Default log destination; the TUI owns stdout.
pub const DEFAULT_LOG_FILE: &str = "/tmp/purr-installer.log";

/// Purr Installer - interactive installer for Purr Linux
#[derive(Parser, Debug)]
#[command(name = "purr-installer")]
#[command(about = "Interactive terminal installer for Purr Linux")]
#[command(version)]
pub struct Cli {
    /// Where the generated install script is written
    #[arg(long, default_value = DEFAULT_SCRIPT_PATH)]
    pub script_path: PathBuf,

    /// Bootloader branch: auto (decided by the script at run time), uefi or bios
    #[arg(long, default_value = "auto")]
    pub boot_mode: BootMode,

    /// Hostname of the installed system
    #[arg(long, default_value = "purr")]
    pub hostname: String,

    /// Interactive partitioning program, run with the target disk as argument
    #[arg(long, default_value = "cfdisk")]
    pub partition_tool: String,

    /// Root of the timezone database
    #[arg(long, default_value = DEFAULT_ZONEINFO_DIR)]
    pub zoneinfo: PathBuf,

    /// Locale generation list offered in the locale picker
    #[arg(long, default_value = DEFAULT_LOCALE_GEN)]
    pub locale_gen: PathBuf,

    /// Log file (RUST_LOG controls the level)
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Run the wizard and write the script, but do not execute it
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the root and required-program checks (development use)
    #[arg(long)]
    pub skip_sanity: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// System probe reading the configured zoneinfo tree and locale list.
    pub fn probe(&self) -> HostProbe {
        HostProbe::new(&self.zoneinfo, &self.locale_gen)
    }

    /// Synthesizer options from the command line.
    pub fn script_options(&self) -> ScriptOptions {
        ScriptOptions {
            hostname: self.hostname.clone(),
            boot_mode: self.boot_mode,
            ..ScriptOptions::default()
        }
    }
}
