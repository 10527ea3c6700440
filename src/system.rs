//! Read-only system probes
//!
//! Everything the wizard learns about the host comes through [`SystemProbe`]:
//! whole disks, the partitions of one disk, the timezone database and the
//! locale-generation list. [`HostProbe`] is the real implementation; tests
//! substitute fakes.
//!
//! Block devices are read from `lsblk --json` so the output shape is checked by
//! `serde` instead of split on whitespace.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;

use crate::error::{InstallerError, Result};

/// Default location of the timezone database.
pub const DEFAULT_ZONEINFO_DIR: &str = "/usr/share/zoneinfo";

/// Default location of the locale-generation list.
pub const DEFAULT_LOCALE_GEN: &str = "/etc/locale.gen";

/// zoneinfo subtrees that duplicate the database under other rules.
const NON_GEOGRAPHIC_TREES: &[&str] = &["posix", "right"];

/// Source of every list the wizard offers.
pub trait SystemProbe {
    /// Whole-disk block devices, as `/dev/<name>` paths.
    fn disks(&self) -> Result<Vec<String>>;

    /// Partitions on `disk`, as `/dev/<name>` paths in device order.
    fn partitions(&self, disk: &str) -> Result<Vec<String>>;

    /// Top-level region directories of the timezone database.
    fn timezone_regions(&self) -> Result<Vec<String>>;

    /// Zones inside `region`, relative to it (e.g. `Berlin`, `Argentina/Salta`).
    fn timezone_cities(&self, region: &str) -> Result<Vec<String>>;

    /// Every locale.gen entry, enabled or not, with the comment marker removed.
    fn locales(&self) -> Result<Vec<String>>;
}

// ============================================================================
// lsblk parsing
// ============================================================================

#[derive(Debug, Deserialize)]
struct LsblkOutput {
    blockdevices: Vec<BlockDevice>,
}

/// One row of `lsblk -J -o NAME,TYPE`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDevice {
    /// Kernel name (`sda`, `nvme0n1p2`).
    pub name: String,
    /// Device type as reported by lsblk (`disk`, `part`, `rom`, `loop`, ...).
    #[serde(rename = "type")]
    pub kind: String,
}

impl BlockDevice {
    /// Device node path.
    pub fn dev_path(&self) -> String {
        format!("/dev/{}", self.name)
    }
}

/// Parse lsblk JSON output into device rows.
pub fn parse_lsblk(json: &str) -> Result<Vec<BlockDevice>> {
    let output: LsblkOutput = serde_json::from_str(json)?;
    Ok(output.blockdevices)
}

/// Device paths of the rows whose type is `kind`, in lsblk order.
pub fn paths_of_kind(devices: &[BlockDevice], kind: &str) -> Vec<String> {
    devices
        .iter()
        .filter(|d| d.kind == kind)
        .map(BlockDevice::dev_path)
        .collect()
}

fn run_lsblk(args: &[&str]) -> Result<String> {
    tracing::debug!("Running lsblk {:?}", args);
    let output = Command::new("lsblk")
        .args(args)
        .output()
        .map_err(|e| InstallerError::enumeration(format!("failed to run lsblk: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(InstallerError::enumeration(format!(
            "lsblk {} failed ({}): {}",
            args.join(" "),
            output.status,
            stderr.trim()
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ============================================================================
// Timezone tree
// ============================================================================

/// Region directories directly under `root`, sorted.
pub fn list_timezone_regions(root: &Path) -> Result<Vec<String>> {
    let mut regions = Vec::new();
    for entry in read_dir(root)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.path().is_dir() && !NON_GEOGRAPHIC_TREES.contains(&name.as_str()) {
            regions.push(name);
        }
    }
    regions.sort();
    Ok(regions)
}

/// Zone files under `root/region`, relative to the region, sorted. Nested
/// directories (e.g. `America/Argentina`) contribute `Argentina/<city>`.
pub fn list_timezone_cities(root: &Path, region: &str) -> Result<Vec<String>> {
    let mut cities = Vec::new();
    collect_zone_files(&root.join(region), "", &mut cities)?;
    cities.sort();
    Ok(cities)
}

fn collect_zone_files(dir: &Path, prefix: &str, out: &mut Vec<String>) -> Result<()> {
    for entry in read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };
        let path = entry.path();
        if path.is_dir() {
            collect_zone_files(&path, &relative, out)?;
        } else if path.is_file() {
            out.push(relative);
        }
    }
    Ok(())
}

fn read_dir(dir: &Path) -> Result<fs::ReadDir> {
    fs::read_dir(dir).map_err(|e| {
        InstallerError::enumeration(format!("cannot read {}: {}", dir.display(), e))
    })
}

// ============================================================================
// locale.gen
// ============================================================================

/// Locale entries of a locale.gen file, with any leading `#` marker stripped.
///
/// Header prose is skipped: an entry is exactly two fields, a locale name that
/// starts with a letter and uses only `[A-Za-z0-9_.@-]`, and a charmap.
pub fn parse_locale_gen(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim().trim_start_matches(|c: char| c == '#' || c.is_whitespace()))
        .filter(|line| is_locale_entry(line))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect()
}

fn is_locale_entry(line: &str) -> bool {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let [name, charmap] = fields.as_slice() else {
        return false;
    };
    let name_ok = name.starts_with(|c: char| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '@' | '-'));
    let charmap_ok = !charmap.is_empty()
        && charmap
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_');
    name_ok && charmap_ok
}

// ============================================================================
// Host probe
// ============================================================================

/// Probes the running system.
#[derive(Debug, Clone)]
pub struct HostProbe {
    zoneinfo_dir: PathBuf,
    locale_gen: PathBuf,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self::new(DEFAULT_ZONEINFO_DIR, DEFAULT_LOCALE_GEN)
    }
}

impl HostProbe {
    pub fn new(zoneinfo_dir: impl Into<PathBuf>, locale_gen: impl Into<PathBuf>) -> Self {
        Self {
            zoneinfo_dir: zoneinfo_dir.into(),
            locale_gen: locale_gen.into(),
        }
    }
}

impl SystemProbe for HostProbe {
    fn disks(&self) -> Result<Vec<String>> {
        let json = run_lsblk(&["-J", "-d", "-o", "NAME,TYPE"])?;
        let disks = paths_of_kind(&parse_lsblk(&json)?, "disk");
        tracing::info!("Found {} disk(s): {:?}", disks.len(), disks);
        Ok(disks)
    }

    fn partitions(&self, disk: &str) -> Result<Vec<String>> {
        let json = run_lsblk(&["-J", "-l", "-o", "NAME,TYPE", disk])?;
        let partitions = paths_of_kind(&parse_lsblk(&json)?, "part");
        tracing::info!("Found {} partition(s) on {}: {:?}", partitions.len(), disk, partitions);
        Ok(partitions)
    }

    fn timezone_regions(&self) -> Result<Vec<String>> {
        list_timezone_regions(&self.zoneinfo_dir)
    }

    fn timezone_cities(&self, region: &str) -> Result<Vec<String>> {
        list_timezone_cities(&self.zoneinfo_dir, region)
    }

    fn locales(&self) -> Result<Vec<String>> {
        let content = fs::read_to_string(&self.locale_gen).map_err(|e| {
            InstallerError::enumeration(format!(
                "cannot read {}: {}",
                self.locale_gen.display(),
                e
            ))
        })?;
        Ok(parse_locale_gen(&content))
    }
}
