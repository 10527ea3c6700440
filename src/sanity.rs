//! Pre-flight sanity checks for runtime environment
//!
//! Verifies, before the TUI starts, that the installer runs as root and that
//! the programs the wizard and the generated script call are on `PATH`.

use std::env;
use std::ffi::OsStr;
use std::fmt::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

/// Programs needed regardless of the chosen partitioning tool.
pub const REQUIRED_BINARIES: &[&str] = &[
    "bash",        // Script execution
    "lsblk",       // Block device listing (util-linux)
    "pacstrap",    // Base system bootstrap (arch-install-scripts)
    "genfstab",    // fstab generation (arch-install-scripts)
    "arch-chroot", // Target configuration (arch-install-scripts)
];

/// Result of environment verification
#[derive(Debug)]
pub struct SanityCheckResult {
    pub missing_binaries: Vec<String>,
    pub is_root: bool,
}

impl SanityCheckResult {
    /// Returns true if all checks passed
    pub fn is_ok(&self) -> bool {
        self.missing_binaries.is_empty() && self.is_root
    }

    /// Human-readable explanation of every failed check.
    pub fn describe(&self) -> String {
        let mut out = String::from("Pre-flight check failed\n");
        if !self.is_root {
            out.push_str("\n  Root privileges required: run the installer as root.\n");
        }
        if !self.missing_binaries.is_empty() {
            out.push_str("\n  Missing required programs:\n");
            for binary in &self.missing_binaries {
                let _ = writeln!(out, "    {} (pacman -S {})", binary, package_for_binary(binary));
            }
        }
        out
    }
}

/// Arch package providing `binary`.
fn package_for_binary(binary: &str) -> &'static str {
    match binary {
        "bash" => "bash",
        "lsblk" | "cfdisk" | "fdisk" => "util-linux",
        "pacstrap" | "genfstab" | "arch-chroot" => "arch-install-scripts",
        "cgdisk" | "gdisk" => "gptfdisk",
        "parted" => "parted",
        _ => "<unknown>",
    }
}

/// Whether an executable named `name` exists in one of the `path_var` entries.
pub fn binary_in_path(name: &str, path_var: &OsStr) -> bool {
    env::split_paths(path_var).any(|dir| is_executable(&dir.join(name)))
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

fn binary_exists(name: &str) -> bool {
    env::var_os("PATH").is_some_and(|path| binary_in_path(name, &path))
}

/// Check if running as root (EUID 0)
fn is_running_as_root() -> bool {
    nix::unistd::geteuid().is_root()
}

/// Run every check; `partition_tool` joins the required programs.
pub fn verify_environment(partition_tool: &str) -> SanityCheckResult {
    let missing_binaries = REQUIRED_BINARIES
        .iter()
        .copied()
        .chain(std::iter::once(partition_tool))
        .filter(|binary| !binary_exists(binary))
        .map(str::to_string)
        .collect();

    let result = SanityCheckResult {
        missing_binaries,
        is_root: is_running_as_root(),
    };
    if result.is_ok() {
        tracing::info!("Pre-flight checks passed");
    } else {
        tracing::error!("Pre-flight checks failed: {:?}", result);
    }
    result
}
