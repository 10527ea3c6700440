//! The installation configuration record
//!
//! One `InstallConfig` lives for a single wizard run. The wizard fills it step
//! by step, the summary screen reads it, and the script synthesizer turns it
//! into shell text. Invariants that must hold before a value is stored are
//! enforced by the setters here rather than by the callers.

use std::fmt;

use zeroize::Zeroizing;

use crate::error::{InstallerError, Result};
use crate::types::Filesystem;

/// Longest username `useradd` accepts.
const MAX_USERNAME_LEN: usize = 32;

// ============================================================================
// Secret
// ============================================================================

/// A password held in memory only as long as needed.
///
/// The buffer is zeroed on drop and `Debug` never prints the contents.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(Zeroizing<String>);

impl Secret {
    /// Wrap a plaintext value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the plaintext.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Whether the secret is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret(<redacted>)")
        }
    }
}

// ============================================================================
// Mounts
// ============================================================================

/// Where and how one partition is mounted in the target system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    /// Absolute mount path inside the target (e.g. `/`, `/boot`).
    pub target: String,
    /// Filesystem created on the partition.
    pub filesystem: Filesystem,
}

impl MountSpec {
    pub fn new(target: impl Into<String>, filesystem: Filesystem) -> Self {
        Self {
            target: target.into(),
            filesystem,
        }
    }

    /// Number of path components; `/` is 0, `/boot/efi` is 2.
    pub fn depth(&self) -> usize {
        self.target.split('/').filter(|c| !c.is_empty()).count()
    }
}

// ============================================================================
// Configuration Record
// ============================================================================

/// Everything the wizard collects.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    disk: String,
    partitions: Vec<String>,
    mounts: Vec<(String, MountSpec)>,
    /// `Region/City`, composed from two picks.
    pub timezone: String,
    /// One line of locale.gen, e.g. `en_US.UTF-8 UTF-8`.
    pub locale: String,
    /// First non-root account.
    pub username: String,
    /// Password of `username`.
    pub user_password: Secret,
    /// Whether `username` joins the `wheel` group.
    pub wheel: bool,
    /// Administrator password.
    pub root_password: Secret,
}

impl InstallConfig {
    /// Start a record for `disk`. The disk cannot change afterwards.
    pub fn new(disk: impl Into<String>) -> Result<Self> {
        let disk = disk.into();
        if disk.trim().is_empty() {
            return Err(InstallerError::validation("target disk must not be empty"));
        }
        Ok(Self {
            disk,
            partitions: Vec::new(),
            mounts: Vec::new(),
            timezone: String::new(),
            locale: String::new(),
            username: String::new(),
            user_password: Secret::default(),
            wheel: false,
            root_password: Secret::default(),
        })
    }

    /// Target block device.
    pub fn disk(&self) -> &str {
        &self.disk
    }

    /// Partitions found on the disk after partitioning, in device order.
    pub fn partitions(&self) -> &[String] {
        &self.partitions
    }

    /// Mount assignments in the order they were made.
    pub fn mounts(&self) -> &[(String, MountSpec)] {
        &self.mounts
    }

    /// Mount assignment of one partition, if any.
    pub fn mount_for(&self, partition: &str) -> Option<&MountSpec> {
        self.mounts
            .iter()
            .find(|(p, _)| p == partition)
            .map(|(_, spec)| spec)
    }

    /// Replace the partition list. Every entry must live on the disk, and
    /// mount assignments for partitions no longer present are dropped.
    pub fn set_partitions(&mut self, partitions: Vec<String>) -> Result<()> {
        if let Some(stray) = partitions.iter().find(|p| !is_child_of(p, &self.disk)) {
            return Err(InstallerError::validation(format!(
                "{} is not a partition of {}",
                stray, self.disk
            )));
        }
        self.mounts.retain(|(p, _)| partitions.contains(p));
        self.partitions = partitions;
        Ok(())
    }

    /// Record that `partition` is mounted per `spec`, replacing any earlier
    /// assignment for it.
    pub fn assign_mount(&mut self, partition: &str, spec: MountSpec) -> Result<()> {
        if !self.partitions.iter().any(|p| p == partition) {
            return Err(InstallerError::validation(format!(
                "{} is not among the partitions of {}",
                partition, self.disk
            )));
        }
        validate_mount_target(&spec.target)?;

        match self.mounts.iter_mut().find(|(p, _)| p == partition) {
            Some((_, existing)) => *existing = spec,
            None => self.mounts.push((partition.to_string(), spec)),
        }
        Ok(())
    }

    /// The language tag of the locale (`en_US.UTF-8` for `en_US.UTF-8 UTF-8`).
    pub fn lang(&self) -> &str {
        self.locale.split_whitespace().next().unwrap_or("")
    }

    /// Check that every field the script needs is populated and consistent.
    pub fn validate(&self) -> Result<()> {
        if self.mounts.iter().any(|(p, _)| !self.partitions.contains(p)) {
            return Err(InstallerError::validation(
                "mount assigned to a partition outside the partition list",
            ));
        }
        if !self.timezone.contains('/') {
            return Err(InstallerError::validation(format!(
                "timezone '{}' is not of the form Region/City",
                self.timezone
            )));
        }
        if self.lang().is_empty() {
            return Err(InstallerError::validation("locale is required"));
        }
        validate_username(&self.username)?;
        if self.user_password.is_empty() || self.root_password.is_empty() {
            return Err(InstallerError::validation("passwords are required"));
        }
        Ok(())
    }
}

/// `/dev/sda1` is a child of `/dev/sda`; `/dev/nvme0n1p2` of `/dev/nvme0n1`.
/// Disks whose name ends in a digit take a `p` before the partition number.
fn is_child_of(partition: &str, disk: &str) -> bool {
    let Some(rest) = partition.strip_prefix(disk) else {
        return false;
    };
    let number = if disk.ends_with(|c: char| c.is_ascii_digit()) {
        match rest.strip_prefix('p') {
            Some(number) => number,
            None => return false,
        }
    } else {
        rest
    };
    !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())
}

/// Compose a timezone from the two picks.
pub fn compose_timezone(region: &str, city: &str) -> String {
    format!("{}/{}", region, city)
}

/// Mount targets are absolute paths without whitespace or `..` components.
pub fn validate_mount_target(target: &str) -> Result<()> {
    if !target.starts_with('/') {
        return Err(InstallerError::validation(format!(
            "mount point '{}' must be an absolute path",
            target
        )));
    }
    if target.chars().any(char::is_whitespace) || target.split('/').any(|c| c == "..") {
        return Err(InstallerError::validation(format!(
            "mount point '{}' contains whitespace or '..'",
            target
        )));
    }
    Ok(())
}

/// Usernames follow the `useradd` convention `[a-z_][a-z0-9_-]*`, at most 32 chars.
pub fn validate_username(username: &str) -> Result<()> {
    let mut chars = username.chars();
    let first_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');

    if !first_ok || !rest_ok || username.len() > MAX_USERNAME_LEN {
        return Err(InstallerError::validation(format!(
            "'{}' is not a valid username (lowercase letters, digits, '_' or '-', starting with a letter or '_')",
            username
        )));
    }
    if username == "root" {
        return Err(InstallerError::validation("the first user cannot be root"));
    }
    Ok(())
}
