//! Integration tests for install script synthesis
//!
//! These tests verify:
//! - Only assigned partitions are formatted and mounted
//! - Boot-mode pinning selects exactly one bootloader branch
//! - The end-to-end command ordering

use purr_installer::config::{InstallConfig, MountSpec, Secret, compose_timezone};
use purr_installer::script::{ScriptOptions, render_install_script};
use purr_installer::types::{BootMode, Filesystem};

fn e2e_config() -> InstallConfig {
    let mut config = InstallConfig::new("/dev/sda").unwrap();
    config.set_partitions(vec!["/dev/sda1".to_string()]).unwrap();
    config
        .assign_mount("/dev/sda1", MountSpec::new("/", Filesystem::Btrfs))
        .unwrap();
    config.timezone = compose_timezone("Europe", "Berlin");
    config.locale = "en_US.UTF-8 UTF-8".to_string();
    config.username = "alice".to_string();
    config.wheel = true;
    config.user_password = Secret::new("pw");
    config.root_password = Secret::new("rootpw");
    config
}

fn render(config: &InstallConfig, boot_mode: BootMode) -> String {
    let options = ScriptOptions {
        boot_mode,
        ..ScriptOptions::default()
    };
    render_install_script(config, &options)
}

fn position(lines: &[&str], pred: impl Fn(&str) -> bool, what: &str) -> usize {
    lines
        .iter()
        .position(|l| pred(l))
        .unwrap_or_else(|| panic!("no line for {}", what))
}

// =============================================================================
// Mount Emission
// =============================================================================

#[test]
fn test_unassigned_partition_is_untouched() {
    let mut config = InstallConfig::new("/dev/sda").unwrap();
    config
        .set_partitions(vec!["/dev/sda1".to_string(), "/dev/sda2".to_string()])
        .unwrap();
    config
        .assign_mount("/dev/sda2", MountSpec::new("/boot", Filesystem::Ext4))
        .unwrap();
    config.timezone = "Etc/UTC".to_string();
    config.locale = "en_US.UTF-8 UTF-8".to_string();
    config.username = "alice".to_string();

    let script = render(&config, BootMode::Auto);
    let mkfs: Vec<&str> = script.lines().filter(|l| l.starts_with("mkfs.")).collect();
    let mounts: Vec<&str> = script.lines().filter(|l| l.starts_with("mount ")).collect();

    assert_eq!(mkfs, vec!["mkfs.ext4 -F /dev/sda2"]);
    assert_eq!(mounts, vec!["mount --mkdir /dev/sda2 /mnt/boot"]);
    assert!(!script.contains("/dev/sda1"));
}

#[test]
fn test_mounts_emitted_parents_first() {
    let mut config = e2e_config();
    config
        .set_partitions(vec![
            "/dev/sda1".to_string(),
            "/dev/sda2".to_string(),
            "/dev/sda3".to_string(),
        ])
        .unwrap();
    config
        .assign_mount("/dev/sda1", MountSpec::new("/boot/efi", Filesystem::Exfat))
        .unwrap();
    config
        .assign_mount("/dev/sda2", MountSpec::new("/", Filesystem::Xfs))
        .unwrap();
    config
        .assign_mount("/dev/sda3", MountSpec::new("/home", Filesystem::F2fs))
        .unwrap();

    let script = render(&config, BootMode::Auto);
    let mkfs: Vec<&str> = script.lines().filter(|l| l.starts_with("mkfs.")).collect();
    assert_eq!(
        mkfs,
        vec!["mkfs.exfat /dev/sda1", "mkfs.xfs -f /dev/sda2", "mkfs.f2fs -f /dev/sda3"]
    );

    let mounts: Vec<&str> = script.lines().filter(|l| l.starts_with("mount ")).collect();
    assert_eq!(
        mounts,
        vec![
            "mount --mkdir /dev/sda2 /mnt",
            "mount --mkdir /dev/sda3 /mnt/home",
            "mount --mkdir /dev/sda1 /mnt/boot/efi",
        ]
    );
}

// =============================================================================
// Boot-Mode Branching
// =============================================================================

#[test]
fn test_uefi_pins_efi_branch() {
    let script = render(&e2e_config(), BootMode::Uefi);
    assert!(script.contains("grub-install --target=x86_64-efi --efi-directory=/boot --bootloader-id=purr"));
    assert!(!script.contains("--target=i386-pc"));
    assert!(!script.contains("if [ \"$boot_mode\" = \"efi\" ]"));
}

#[test]
fn test_bios_pins_disk_branch() {
    let script = render(&e2e_config(), BootMode::Bios);
    assert!(script.contains("grub-install --target=i386-pc --recheck /dev/sda\n"));
    assert!(!script.contains("--target=x86_64-efi"));
    assert!(!script.contains("efibootmgr"));
}

#[test]
fn test_auto_keeps_both_branches() {
    let script = render(&e2e_config(), BootMode::Auto);
    let lines: Vec<&str> = script.lines().collect();
    let branch = position(&lines, |l| l == "if [ \"$boot_mode\" = \"efi\" ]; then", "branch");
    let efi = position(&lines, |l| l.contains("--target=x86_64-efi"), "efi");
    let otherwise = branch + position(&lines[branch..], |l| l == "else", "else");
    let bios = position(&lines, |l| l.contains("--target=i386-pc"), "bios");
    let end = branch + position(&lines[branch..], |l| l == "fi", "fi");
    assert!(branch < efi && efi < otherwise);
    assert!(otherwise < bios && bios < end);
}

// =============================================================================
// End-to-End Ordering
// =============================================================================

#[test]
fn test_end_to_end_order() {
    let script = render(&e2e_config(), BootMode::Auto);
    let lines: Vec<&str> = script.lines().collect();

    let mkfs = position(&lines, |l| l == "mkfs.btrfs -f /dev/sda1", "mkfs");
    let mount = position(&lines, |l| l == "mount --mkdir /dev/sda1 /mnt", "mount");
    let locale = position(&lines, |l| l.contains("en_US.UTF-8") && l.contains("locale.gen"), "locale");
    let timezone = position(&lines, |l| l.starts_with("ln -sf") && l.contains("Europe/Berlin"), "timezone");
    let pacstrap = position(&lines, |l| l.starts_with("pacstrap"), "pacstrap");
    let fstab = position(&lines, |l| l.starts_with("genfstab"), "genfstab");
    let hostname = position(&lines, |l| l.ends_with("/mnt/etc/hostname"), "hostname");
    let chroot = position(&lines, |l| l.starts_with("arch-chroot"), "chroot");
    let useradd = position(&lines, |l| l == "useradd -m -s /usr/bin/fish -G wheel alice", "useradd");

    assert!(mkfs < mount);
    assert!(mount < locale);
    assert!(locale < timezone);
    assert!(timezone < pacstrap);
    assert!(pacstrap < fstab);
    assert!(fstab < hostname);
    assert!(hostname < chroot);
    assert!(chroot < useradd);
    assert_eq!(
        lines.last().copied(),
        Some("echo 'Installation complete! Reboot now.'")
    );
}

#[test]
fn test_chroot_block_configures_target() {
    let script = render(&e2e_config(), BootMode::Auto);
    let (_, inside) = script.split_once("<<'EOF'\n").unwrap();
    let (block, _) = inside.split_once("\nEOF\n").unwrap();

    assert!(block.contains("echo LANG=en_US.UTF-8 > /etc/locale.conf"));
    assert!(block.contains("ln -sf /usr/share/zoneinfo/Europe/Berlin /etc/localtime"));
    assert!(block.contains("pacman -S --noconfirm sddm plasma dolphin ark kate konsole networkmanager opendoas fish"));
    assert!(block.contains("echo 'permit persist :wheel' > /etc/doas.conf"));
    assert!(block.contains("systemctl enable sddm NetworkManager"));
    assert!(!block.contains("rootpw"));
}
