//! Purr Installer - Main entry point
//!
//! Pre-flight checks, the wizard in a full-screen session, then the generated
//! script in the plain terminal.

use std::fs::OpenOptions;
use std::panic;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use purr_installer::cli::Cli;
use purr_installer::hardware::detect_firmware_mode;
use purr_installer::ui::{TerminalSession, restore_terminal};
use purr_installer::wizard::{WizardOptions, run_wizard};
use purr_installer::{executor, sanity, script};

/// Exit code after the user aborts the wizard (128 + SIGINT).
const EXIT_CANCELLED: u8 = 130;

/// Send tracing output to `path`; stdout belongs to the TUI.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(e) = init_logging(&cli.log_file) {
        eprintln!("Warning: {:#}", e);
    }
    info!("Purr installer starting up");

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<ExitCode> {
    if cli.skip_sanity {
        tracing::warn!("Pre-flight checks skipped");
    } else {
        let result = sanity::verify_environment(&cli.partition_tool);
        if !result.is_ok() {
            eprintln!("{}", result.describe());
            return Ok(ExitCode::FAILURE);
        }
    }

    let options = WizardOptions {
        partition_tool: cli.partition_tool.clone(),
        boot_mode: cli.boot_mode,
        firmware: detect_firmware_mode(),
    };
    let probe = cli.probe();

    // The release profile aborts on panic, so Drop alone cannot restore the tty
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));

    let outcome = {
        let mut session = TerminalSession::enter().context("failed to initialise terminal")?;
        run_wizard(&mut session, &probe, &options)
    };

    let config = match outcome {
        Ok(config) => config,
        Err(e) if e.is_cancelled() => {
            info!("Wizard aborted by user");
            eprintln!("{}", e);
            return Ok(ExitCode::from(EXIT_CANCELLED));
        }
        Err(e) => return Err(e).context("configuration wizard failed"),
    };
    config.validate().context("incomplete configuration")?;

    let text = script::render_install_script(&config, &cli.script_options());
    executor::write_script(&cli.script_path, &text)?;

    if cli.dry_run {
        println!("Install script written to {}\n", cli.script_path.display());
        print!("{}", text);
        return Ok(ExitCode::SUCCESS);
    }

    let result = executor::run_script(&cli.script_path, &config)?;
    let code = u8::try_from(result.process_exit_code()).unwrap_or(1);
    Ok(ExitCode::from(code))
}
