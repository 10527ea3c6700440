//! Type-safe value sets for the installer
//!
//! Every choice the wizard offers from a fixed list is a Rust enum here, so the
//! configuration record can never hold a filesystem or boot mode outside the
//! supported set.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Filesystem type for a mounted partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[derive(Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Filesystem {
    #[default]
    #[strum(serialize = "ext4")]
    Ext4,
    #[strum(serialize = "btrfs")]
    Btrfs,
    #[strum(serialize = "xfs")]
    Xfs,
    #[strum(serialize = "f2fs")]
    F2fs,
    #[strum(serialize = "exfat")]
    Exfat,
}

impl Filesystem {
    /// Picker options in display order.
    pub fn options() -> Vec<String> {
        Self::iter().map(|fs| fs.to_string()).collect()
    }

    /// The `mkfs` frontend for this filesystem (e.g. `mkfs.btrfs`).
    pub fn mkfs_command(self) -> String {
        format!("mkfs.{}", self)
    }

    /// Flag that makes `mkfs` overwrite an existing signature without prompting.
    pub fn force_flag(self) -> Option<&'static str> {
        match self {
            Self::Ext4 => Some("-F"),
            Self::Btrfs | Self::Xfs | Self::F2fs => Some("-f"),
            Self::Exfat => None,
        }
    }
}

/// Which bootloader branch the install script carries.
///
/// `Auto` keeps the decision in the script itself (it checks for the firmware
/// interface directory at run time); `Uefi` and `Bios` pin it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum BootMode {
    #[default]
    #[strum(serialize = "Auto")]
    Auto,
    #[strum(serialize = "UEFI")]
    Uefi,
    #[strum(serialize = "BIOS")]
    Bios,
}

/// Generic Yes/No toggle for boolean-like picker questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Display, EnumString, EnumIter)]
pub enum Toggle {
    #[default]
    #[strum(serialize = "Yes")]
    Yes,
    #[strum(serialize = "No")]
    No,
}

impl Toggle {
    /// Picker options in display order.
    pub fn options() -> Vec<String> {
        Self::iter().map(|t| t.to_string()).collect()
    }

    /// Convert to boolean
    pub fn as_bool(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Toggle {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

/// Echo mode of the line editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Characters are echoed as typed; the result is trimmed.
    Visible,
    /// Only a run of mask characters is shown; the result is returned verbatim.
    Masked,
}
