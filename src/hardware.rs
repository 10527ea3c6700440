//! Firmware environment detection
//!
//! Detects whether the host booted via UEFI or legacy BIOS. The summary screen
//! shows the result so the user can sanity-check the bootloader branch the
//! script will take.

use std::fmt;
use std::path::Path;

/// Directory the kernel exposes only when booted in UEFI mode.
pub const EFI_SYSFS_DIR: &str = "/sys/firmware/efi";

/// Detected firmware mode of the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FirmwareMode {
    /// UEFI firmware
    Uefi,
    /// Legacy BIOS firmware
    Bios,
}

impl fmt::Display for FirmwareMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uefi => write!(f, "UEFI"),
            Self::Bios => write!(f, "BIOS"),
        }
    }
}

/// Detect firmware mode by checking for the EFI sysfs directory.
pub fn detect_firmware_mode() -> FirmwareMode {
    detect_firmware_mode_at(Path::new(EFI_SYSFS_DIR))
}

/// Same as [`detect_firmware_mode`] against an arbitrary marker directory.
pub fn detect_firmware_mode_at(efi_dir: &Path) -> FirmwareMode {
    if efi_dir.is_dir() {
        tracing::info!("UEFI firmware detected ({} exists)", efi_dir.display());
        FirmwareMode::Uefi
    } else {
        tracing::info!("BIOS firmware detected ({} not found)", efi_dir.display());
        FirmwareMode::Bios
    }
}
