//! Install script synthesis
//!
//! [`render_install_script`] is a pure function of the configuration record:
//! the same record always yields byte-identical text, and nothing is executed.
//!
//! # Security: Password Handling
//!
//! Passwords never appear in the script text. The executor exports them as
//! [`USER_PASSWORD_ENV`] and [`ROOT_PASSWORD_ENV`] (see [`secret_env`]); the
//! chroot block is a quoted heredoc, so the variables are expanded only by the
//! shell inside the target root and piped straight into `chpasswd`. Every other
//! user-derived value is passed through [`shell_quote`].

use crate::config::{InstallConfig, Secret};
use crate::types::BootMode;

/// Environment variable carrying the new user's password into the script.
pub const USER_PASSWORD_ENV: &str = "PURR_USER_PASSWORD";

/// Environment variable carrying the root password into the script.
pub const ROOT_PASSWORD_ENV: &str = "PURR_ROOT_PASSWORD";

/// Packages bootstrapped into the staging root.
pub const BASE_PACKAGES: &[&str] = &["base", "linux", "linux-firmware"];

/// Desktop environment and tooling installed inside the target.
pub const DESKTOP_PACKAGES: &[&str] = &[
    "sddm",
    "plasma",
    "dolphin",
    "ark",
    "kate",
    "konsole",
    "networkmanager",
    "opendoas",
    "fish",
];

/// Services enabled inside the target.
pub const SERVICES: &[&str] = &["sddm", "NetworkManager"];

/// Login shell of the first user.
pub const USER_SHELL: &str = "/usr/bin/fish";

/// Name of the EFI boot entry.
pub const BOOTLOADER_ID: &str = "purr";

/// Message printed by the last line of the script.
pub const COMPLETION_MESSAGE: &str = "Installation complete! Reboot now.";

const EFI_SYSFS_DIR: &str = crate::hardware::EFI_SYSFS_DIR;
const HEREDOC_TAG: &str = "EOF";

/// Synthesizer knobs that are not part of the wizard's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOptions {
    /// Where the target root is assembled before `arch-chroot`.
    pub staging_root: String,
    /// Hostname written to the target.
    pub hostname: String,
    /// Which bootloader branch(es) to emit.
    pub boot_mode: BootMode,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            staging_root: "/mnt".to_string(),
            hostname: "purr".to_string(),
            boot_mode: BootMode::Auto,
        }
    }
}

/// Quote `value` for a POSIX shell. Plain words pass through unchanged;
/// anything else is single-quoted.
pub fn shell_quote(value: &str) -> String {
    shell_escape::unix::escape(value.into()).into_owned()
}

/// Secrets the executor must export for the script, keyed by variable name.
pub fn secret_env(config: &InstallConfig) -> [(&'static str, &Secret); 2] {
    [
        (USER_PASSWORD_ENV, &config.user_password),
        (ROOT_PASSWORD_ENV, &config.root_password),
    ]
}

/// Line-oriented script builder.
#[derive(Default)]
struct ScriptText {
    out: String,
    indent: usize,
}

impl ScriptText {
    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }
}

/// `/` maps to the staging root itself, `/boot` to `<root>/boot`.
fn staged_path(staging_root: &str, target: &str) -> String {
    let root = staging_root.trim_end_matches('/');
    let target = target.trim_end_matches('/');
    if target.is_empty() {
        root.to_string()
    } else {
        format!("{}{}", root, target)
    }
}

/// Render the complete installation script for `config`.
pub fn render_install_script(config: &InstallConfig, options: &ScriptOptions) -> String {
    let root = options.staging_root.trim_end_matches('/');
    let root = if root.is_empty() { "/" } else { root };
    let q_root = shell_quote(root);
    let mut s = ScriptText::default();

    s.line("#!/bin/bash");
    s.line("set -e");
    s.blank();

    // Firmware detection
    s.line(format!("if [ -d {} ]; then", EFI_SYSFS_DIR));
    s.line("  boot_mode=\"efi\"");
    s.line("else");
    s.line("  boot_mode=\"bios\"");
    s.line("fi");
    s.line("export boot_mode");
    s.blank();

    // Filesystems, in partition order
    for partition in config.partitions() {
        if let Some(spec) = config.mount_for(partition) {
            let mut cmd = spec.filesystem.mkfs_command();
            if let Some(flag) = spec.filesystem.force_flag() {
                cmd.push(' ');
                cmd.push_str(flag);
            }
            s.line(format!("{} {}", cmd, shell_quote(partition)));
        }
    }

    // Mounts, parents before children
    let mut mounts: Vec<_> = config.mounts().iter().collect();
    mounts.sort_by_key(|(_, spec)| spec.depth());
    for (partition, spec) in mounts {
        s.line(format!(
            "mount --mkdir {} {}",
            shell_quote(partition),
            shell_quote(&staged_path(root, &spec.target))
        ));
    }
    s.blank();

    emit_locale_and_clock(&mut s, config);
    s.blank();

    s.line(format!("pacstrap {} {}", q_root, BASE_PACKAGES.join(" ")));
    s.line(format!(
        "genfstab -U {} >> {}",
        q_root,
        shell_quote(&staged_path(root, "/etc/fstab"))
    ));
    s.line(format!(
        "echo {} > {}",
        shell_quote(&options.hostname),
        shell_quote(&staged_path(root, "/etc/hostname"))
    ));
    s.blank();

    s.line(format!("mkdir -p {}", shell_quote(&staged_path(root, "/etc/default"))));
    s.line(format!(
        "cp -f /etc/default/grub {}",
        shell_quote(&staged_path(root, "/etc/default/grub"))
    ));
    s.line(format!(
        "cp -f /etc/os-release {}",
        shell_quote(&staged_path(root, "/etc/os-release"))
    ));
    s.line(format!(
        "cp -r /usr/share/pixmaps {}/",
        shell_quote(&staged_path(root, "/usr/share"))
    ));
    s.blank();

    emit_chroot_block(&mut s, config, options, &q_root);
    s.blank();

    // `!` is inert inside single quotes in a non-interactive shell
    s.line(format!("echo '{}'", COMPLETION_MESSAGE));
    s.out
}

fn emit_locale_and_clock(s: &mut ScriptText, config: &InstallConfig) {
    s.line(format!("echo {} >> /etc/locale.gen", shell_quote(&config.locale)));
    s.line(format!(
        "echo {} > /etc/locale.conf",
        shell_quote(&format!("LANG={}", config.lang()))
    ));
    s.line("locale-gen");
    s.line(format!(
        "ln -sf {} /etc/localtime",
        shell_quote(&format!("/usr/share/zoneinfo/{}", config.timezone))
    ));
    s.line("hwclock --systohc");
}

fn emit_chroot_block(s: &mut ScriptText, config: &InstallConfig, options: &ScriptOptions, q_root: &str) {
    let user = shell_quote(&config.username);
    let group = if config.wheel { "wheel" } else { "users" };

    s.line(format!("arch-chroot {} /bin/bash <<'{}'", q_root, HEREDOC_TAG));
    s.line("set -e");
    emit_locale_and_clock(s, config);
    s.line(format!("useradd -m -s {} -G {} {}", USER_SHELL, group, user));
    s.line(format!(
        "printf '%s:%s\\n' {} \"${}\" | chpasswd",
        user, USER_PASSWORD_ENV
    ));
    s.line(format!("printf 'root:%s\\n' \"${}\" | chpasswd", ROOT_PASSWORD_ENV));

    match options.boot_mode {
        BootMode::Auto => {
            s.line("if [ \"$boot_mode\" = \"efi\" ]; then");
            s.indent += 1;
            emit_efi_bootloader(s);
            s.indent -= 1;
            s.line("else");
            s.indent += 1;
            emit_bios_bootloader(s, config.disk());
            s.indent -= 1;
            s.line("fi");
        }
        BootMode::Uefi => emit_efi_bootloader(s),
        BootMode::Bios => emit_bios_bootloader(s, config.disk()),
    }

    s.line(format!("pacman -S --noconfirm {}", DESKTOP_PACKAGES.join(" ")));
    s.line("echo 'permit persist :wheel' > /etc/doas.conf");
    s.line(format!("systemctl enable {}", SERVICES.join(" ")));
    s.line(HEREDOC_TAG);
}

// The live image's /etc/default/grub was copied in already, hence --overwrite.
fn emit_efi_bootloader(s: &mut ScriptText) {
    s.line("pacman -S --noconfirm --overwrite /etc/default/grub grub efibootmgr");
    s.line(format!(
        "grub-install --target=x86_64-efi --efi-directory=/boot --bootloader-id={}",
        BOOTLOADER_ID
    ));
    s.line("grub-mkconfig -o /boot/grub/grub.cfg");
}

fn emit_bios_bootloader(s: &mut ScriptText, disk: &str) {
    s.line("pacman -S --noconfirm --overwrite /etc/default/grub grub");
    s.line(format!("grub-install --target=i386-pc --recheck {}", shell_quote(disk)));
    s.line("grub-mkconfig -o /boot/grub/grub.cfg");
}
