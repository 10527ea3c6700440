//! The configuration wizard
//!
//! A fixed, linear sequence of steps that fills an [`InstallConfig`]. The
//! wizard never touches the terminal or the system directly: it talks to the
//! user through a [`Prompter`] and learns about the host through a
//! [`SystemProbe`], so the whole flow runs against scripted fakes in tests.
//!
//! Enumeration failures are shown in a blocking notice and the wizard carries
//! on with whatever it has. An abort from any prompt surfaces as
//! [`InstallerError::Cancelled`] and ends the run.

use zeroize::Zeroizing;

use crate::config::{InstallConfig, MountSpec, Secret, compose_timezone, validate_mount_target, validate_username};
use crate::error::{InstallerError, Result};
use crate::hardware::FirmwareMode;
use crate::system::SystemProbe;
use crate::types::{BootMode, Filesystem, InputMode, Toggle};
use crate::ui::summary::summary_lines;

/// Used when the timezone database cannot be read.
pub const FALLBACK_TIMEZONE: &str = "Etc/UTC";

/// Used when locale.gen cannot be read.
pub const FALLBACK_LOCALE: &str = "en_US.UTF-8 UTF-8";

/// The wizard's view of the user.
///
/// Every method blocks until the user has answered. Esc or Ctrl+C must come
/// back as `Err(InstallerError::Cancelled)`.
pub trait Prompter {
    /// Pick one of `options` (never empty).
    fn pick(&mut self, title: &str, options: &[String]) -> Result<String>;

    /// Read one line of text.
    fn read_line(&mut self, prompt: &str, mode: InputMode) -> Result<String>;

    /// Show a message and wait for a key.
    fn notice(&mut self, message: &str) -> Result<()>;

    /// Show the final summary and wait for a key.
    fn confirm_summary(&mut self, title: &str, lines: &[String]) -> Result<()>;

    /// Hand the terminal to an interactive program until it exits.
    fn run_external(&mut self, program: &str, args: &[&str]) -> Result<()>;
}

/// Settings the wizard needs besides the prompter and probe.
#[derive(Debug, Clone)]
pub struct WizardOptions {
    /// Interactive partitioning program, run with the disk as its argument.
    pub partition_tool: String,
    /// Bootloader branch selection, shown in the summary.
    pub boot_mode: BootMode,
    /// Firmware of the running host, shown in the summary.
    pub firmware: FirmwareMode,
}

/// Run every step in order and return the completed record.
pub fn run_wizard<P, S>(prompter: &mut P, probe: &S, options: &WizardOptions) -> Result<InstallConfig>
where
    P: Prompter + ?Sized,
    S: SystemProbe + ?Sized,
{
    tracing::info!("Wizard started");

    let disk = select_disk(prompter, probe)?;
    let mut config = InstallConfig::new(disk)?;

    partition_disk(prompter, config.disk(), &options.partition_tool)?;
    discover_partitions(prompter, probe, &mut config)?;
    assign_mounts(prompter, &mut config)?;

    config.timezone = select_timezone(prompter, probe)?;
    config.locale = select_locale(prompter, probe)?;

    config.username = read_username(prompter)?;
    let question = format!("Add {} to the wheel group?", config.username);
    config.wheel = pick_parsed::<Toggle, _>(prompter, &question, &Toggle::options())?.as_bool();
    config.user_password = confirm_secret(prompter, "Enter password:", "Confirm password:")?;
    config.root_password = confirm_secret(prompter, "Enter root password:", "Confirm root password:")?;

    let lines = summary_lines(&config, options.firmware, options.boot_mode);
    prompter.confirm_summary("Installation Summary", &lines)?;

    tracing::info!("Wizard finished: {:?}", config);
    Ok(config)
}

/// Ask for a secret twice until both entries match and are non-empty.
///
/// Mismatched or empty pairs are reported and discarded; only the final
/// matching pair is returned.
pub fn confirm_secret<P>(prompter: &mut P, prompt: &str, confirm_prompt: &str) -> Result<Secret>
where
    P: Prompter + ?Sized,
{
    loop {
        let mut first = Zeroizing::new(prompter.read_line(prompt, InputMode::Masked)?);
        let second = Zeroizing::new(prompter.read_line(confirm_prompt, InputMode::Masked)?);

        if *first != *second {
            tracing::debug!("Password pair mismatch, asking again");
            prompter.notice("Passwords do not match. Press any key to try again.")?;
            continue;
        }
        if first.is_empty() {
            prompter.notice("Password cannot be empty. Press any key to try again.")?;
            continue;
        }
        return Ok(Secret::new(std::mem::take(&mut *first)));
    }
}

fn pick_parsed<T, P>(prompter: &mut P, title: &str, options: &[String]) -> Result<T>
where
    T: std::str::FromStr,
    P: Prompter + ?Sized,
{
    let choice = prompter.pick(title, options)?;
    choice
        .parse()
        .map_err(|_| InstallerError::validation(format!("unexpected choice '{}'", choice)))
}

fn select_disk<P, S>(prompter: &mut P, probe: &S) -> Result<String>
where
    P: Prompter + ?Sized,
    S: SystemProbe + ?Sized,
{
    let disks = match probe.disks() {
        Ok(disks) => disks,
        Err(e) => {
            tracing::error!("Disk enumeration failed: {}", e);
            prompter.notice(&format!("Error listing disks: {}", e))?;
            Vec::new()
        }
    };
    if disks.is_empty() {
        prompter.notice("No installable disk was found.")?;
        return Err(InstallerError::enumeration("no installable disk found"));
    }
    let disk = prompter.pick("Select Disk", &disks)?;
    tracing::info!("Target disk: {}", disk);
    Ok(disk)
}

fn partition_disk<P>(prompter: &mut P, disk: &str, tool: &str) -> Result<()>
where
    P: Prompter + ?Sized,
{
    tracing::info!("Launching {} on {}", tool, disk);
    match prompter.run_external(tool, &[disk]) {
        Ok(()) => Ok(()),
        Err(InstallerError::Cancelled) => Err(InstallerError::Cancelled),
        Err(e) => {
            tracing::error!("Partitioning tool failed: {}", e);
            prompter.notice(&format!("Could not run {}: {}", tool, e))
        }
    }
}

fn discover_partitions<P, S>(prompter: &mut P, probe: &S, config: &mut InstallConfig) -> Result<()>
where
    P: Prompter + ?Sized,
    S: SystemProbe + ?Sized,
{
    let found = match probe.partitions(config.disk()) {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Partition enumeration failed: {}", e);
            prompter.notice(&format!("Error listing partitions: {}", e))?;
            Vec::new()
        }
    };
    if let Err(e) = config.set_partitions(found) {
        tracing::error!("Rejected partition list: {}", e);
        prompter.notice(&format!("Error listing partitions: {}", e))?;
    }
    if config.partitions().is_empty() {
        prompter.notice(&format!("No partitions found on {}.", config.disk()))?;
    }
    Ok(())
}

fn assign_mounts<P>(prompter: &mut P, config: &mut InstallConfig) -> Result<()>
where
    P: Prompter + ?Sized,
{
    for partition in config.partitions().to_vec() {
        let prompt = format!("Mount point for {} (leave empty to skip):", partition);
        let target = loop {
            let target = prompter.read_line(&prompt, InputMode::Visible)?;
            if target.is_empty() {
                break None;
            }
            match validate_mount_target(&target) {
                Ok(()) => break Some(target),
                Err(e) => prompter.notice(&e.to_string())?,
            }
        };
        let Some(target) = target else {
            continue;
        };

        let title = format!("Filesystem for {}", partition);
        let filesystem: Filesystem = pick_parsed(prompter, &title, &Filesystem::options())?;
        tracing::info!("{} -> {} ({})", partition, target, filesystem);
        config.assign_mount(&partition, MountSpec::new(target, filesystem))?;
    }
    Ok(())
}

fn select_timezone<P, S>(prompter: &mut P, probe: &S) -> Result<String>
where
    P: Prompter + ?Sized,
    S: SystemProbe + ?Sized,
{
    let regions = match probe.timezone_regions() {
        Ok(regions) if !regions.is_empty() => regions,
        Ok(_) => {
            prompter.notice(&format!("No timezone regions found, using {}.", FALLBACK_TIMEZONE))?;
            return Ok(FALLBACK_TIMEZONE.to_string());
        }
        Err(e) => {
            tracing::error!("Timezone enumeration failed: {}", e);
            prompter.notice(&format!("Error listing timezones: {}. Using {}.", e, FALLBACK_TIMEZONE))?;
            return Ok(FALLBACK_TIMEZONE.to_string());
        }
    };

    loop {
        let region = prompter.pick("Select Region", &regions)?;
        match probe.timezone_cities(&region) {
            Ok(cities) if !cities.is_empty() => {
                let city = prompter.pick("Select City", &cities)?;
                let timezone = compose_timezone(&region, &city);
                tracing::info!("Timezone: {}", timezone);
                return Ok(timezone);
            }
            Ok(_) => prompter.notice(&format!("No cities found in {}.", region))?,
            Err(e) => {
                tracing::error!("City enumeration failed: {}", e);
                prompter.notice(&format!("Error listing cities in {}: {}", region, e))?;
            }
        }
    }
}

fn select_locale<P, S>(prompter: &mut P, probe: &S) -> Result<String>
where
    P: Prompter + ?Sized,
    S: SystemProbe + ?Sized,
{
    let locales = match probe.locales() {
        Ok(locales) => locales,
        Err(e) => {
            tracing::error!("Locale enumeration failed: {}", e);
            prompter.notice(&format!("Error reading locales: {}", e))?;
            Vec::new()
        }
    };
    if locales.is_empty() {
        prompter.notice(&format!("No locales available, using {}.", FALLBACK_LOCALE))?;
        return Ok(FALLBACK_LOCALE.to_string());
    }
    let locale = prompter.pick("Select Locale", &locales)?;
    tracing::info!("Locale: {}", locale);
    Ok(locale)
}

fn read_username<P>(prompter: &mut P) -> Result<String>
where
    P: Prompter + ?Sized,
{
    loop {
        let username = prompter.read_line("Enter username:", InputMode::Visible)?;
        match validate_username(&username) {
            Ok(()) => return Ok(username),
            Err(e) => prompter.notice(&e.to_string())?,
        }
    }
}
