//! Read-only summary of the collected configuration
//!
//! Passwords are never shown, only whether they are set.

use crate::config::InstallConfig;
use crate::hardware::FirmwareMode;
use crate::types::{BootMode, Toggle};

/// Lines of the final summary screen, in display order.
pub fn summary_lines(config: &InstallConfig, firmware: FirmwareMode, boot_mode: BootMode) -> Vec<String> {
    let mut lines = vec![format!("Disk: {}", config.disk())];

    if config.partitions().is_empty() {
        lines.push("Partitions: (none)".to_string());
    } else {
        lines.push(format!("Partitions: {}", config.partitions().join(", ")));
    }

    lines.push("Mounts:".to_string());
    if config.mounts().is_empty() {
        lines.push("  (none)".to_string());
    }
    for (partition, spec) in config.mounts() {
        lines.push(format!("  {}: {} ({})", partition, spec.target, spec.filesystem));
    }

    lines.push(format!("Timezone: {}", config.timezone));
    lines.push(format!("Locale: {}", config.locale));
    lines.push(format!("Username: {}", config.username));
    lines.push(format!("Wheel group: {}", Toggle::from(config.wheel)));
    lines.push(format!("User password: {}", set_or_missing(config.user_password.is_empty())));
    lines.push(format!("Root password: {}", set_or_missing(config.root_password.is_empty())));
    lines.push(format!("Firmware: {} (detected)", firmware));
    lines.push(match boot_mode {
        BootMode::Auto => format!("Bootloader: chosen at install time ({} expected)", firmware),
        pinned => format!("Bootloader: {} (forced)", pinned),
    });
    lines
}

fn set_or_missing(empty: bool) -> &'static str {
    if empty { "(missing)" } else { "set" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MountSpec, Secret};
    use crate::types::Filesystem;

    fn config() -> InstallConfig {
        let mut config = InstallConfig::new("/dev/sda").unwrap();
        config.set_partitions(vec!["/dev/sda1".to_string()]).unwrap();
        config
            .assign_mount("/dev/sda1", MountSpec::new("/", Filesystem::Btrfs))
            .unwrap();
        config.timezone = "Europe/Berlin".to_string();
        config.locale = "en_US.UTF-8 UTF-8".to_string();
        config.username = "alice".to_string();
        config.wheel = true;
        config.user_password = Secret::new("pw");
        config.root_password = Secret::new("rootpw");
        config
    }

    #[test]
    fn test_summary_lists_every_field() {
        let lines = summary_lines(&config(), FirmwareMode::Uefi, BootMode::Auto);
        assert_eq!(lines[0], "Disk: /dev/sda");
        assert!(lines.contains(&"  /dev/sda1: / (btrfs)".to_string()));
        assert!(lines.contains(&"Timezone: Europe/Berlin".to_string()));
        assert!(lines.contains(&"Wheel group: Yes".to_string()));
        assert!(lines.contains(&"User password: set".to_string()));
        assert!(lines.last().unwrap().contains("install time"));
    }

    #[test]
    fn test_summary_hides_passwords() {
        let text = summary_lines(&config(), FirmwareMode::Bios, BootMode::Bios).join("\n");
        assert!(!text.contains("rootpw"));
        assert!(!text.contains(": pw"));
        assert!(text.contains("Bootloader: BIOS (forced)"));
    }
}
