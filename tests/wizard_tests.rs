//! End-to-end wizard tests
//!
//! Drives `run_wizard` through a scripted prompter, with timezone and locale
//! lists read from real files by `HostProbe`, and feeds the result to the
//! script synthesizer.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use purr_installer::error::{InstallerError, Result};
use purr_installer::hardware::FirmwareMode;
use purr_installer::script::{ScriptOptions, render_install_script};
use purr_installer::system::{HostProbe, SystemProbe};
use purr_installer::types::{BootMode, InputMode};
use purr_installer::wizard::{Prompter, WizardOptions, run_wizard};

/// Block devices are faked; everything else comes from the host probe.
struct TreeProbe {
    host: HostProbe,
}

impl SystemProbe for TreeProbe {
    fn disks(&self) -> Result<Vec<String>> {
        Ok(vec!["/dev/sda".to_string()])
    }

    fn partitions(&self, disk: &str) -> Result<Vec<String>> {
        Ok(vec![format!("{}1", disk)])
    }

    fn timezone_regions(&self) -> Result<Vec<String>> {
        self.host.timezone_regions()
    }

    fn timezone_cities(&self, region: &str) -> Result<Vec<String>> {
        self.host.timezone_cities(region)
    }

    fn locales(&self) -> Result<Vec<String>> {
        self.host.locales()
    }
}

#[derive(Default)]
struct Transcript {
    answers: VecDeque<String>,
    titles: Vec<String>,
    masked_prompts: usize,
    summary: Vec<String>,
}

struct ScriptedPrompter(Transcript);

impl ScriptedPrompter {
    fn new(answers: &[&str]) -> Self {
        Self(Transcript {
            answers: answers.iter().map(|a| a.to_string()).collect(),
            ..Transcript::default()
        })
    }

    fn answer(&mut self) -> Result<String> {
        self.0.answers.pop_front().ok_or(InstallerError::Cancelled)
    }
}

impl Prompter for ScriptedPrompter {
    fn pick(&mut self, title: &str, options: &[String]) -> Result<String> {
        self.0.titles.push(title.to_string());
        let answer = self.answer()?;
        assert!(options.contains(&answer), "{:?} not in {:?}", answer, options);
        Ok(answer)
    }

    fn read_line(&mut self, prompt: &str, mode: InputMode) -> Result<String> {
        self.0.titles.push(prompt.to_string());
        if mode == InputMode::Masked {
            self.0.masked_prompts += 1;
        }
        self.answer()
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        panic!("unexpected notice: {}", message);
    }

    fn confirm_summary(&mut self, _title: &str, lines: &[String]) -> Result<()> {
        self.0.summary = lines.to_vec();
        Ok(())
    }

    fn run_external(&mut self, _program: &str, _args: &[&str]) -> Result<()> {
        Ok(())
    }
}

fn system_tree(root: &Path) -> HostProbe {
    let zoneinfo = root.join("zoneinfo");
    fs::create_dir_all(zoneinfo.join("Europe")).unwrap();
    fs::create_dir_all(zoneinfo.join("right/Europe")).unwrap();
    fs::write(zoneinfo.join("Europe/Berlin"), b"TZif").unwrap();
    fs::write(zoneinfo.join("Europe/Lisbon"), b"TZif").unwrap();

    let locale_gen = root.join("locale.gen");
    fs::write(
        &locale_gen,
        "# Configuration file for locale-gen\n#\n#de_DE.UTF-8 UTF-8\n#en_US.UTF-8 UTF-8\n",
    )
    .unwrap();

    HostProbe::new(zoneinfo, locale_gen)
}

#[test]
fn test_wizard_to_script() {
    let dir = tempfile::tempdir().unwrap();
    let probe = TreeProbe {
        host: system_tree(dir.path()),
    };
    let mut prompter = ScriptedPrompter::new(&[
        "/dev/sda",
        "/",
        "btrfs",
        "Europe",
        "Berlin",
        "en_US.UTF-8 UTF-8",
        "alice",
        "Yes",
        "pw",
        "pw",
        "rootpw",
        "rootpw",
    ]);
    let options = WizardOptions {
        partition_tool: "cfdisk".to_string(),
        boot_mode: BootMode::Auto,
        firmware: FirmwareMode::Bios,
    };

    let config = run_wizard(&mut prompter, &probe, &options).unwrap();
    let transcript = prompter.0;

    assert_eq!(
        transcript.titles,
        vec![
            "Select Disk",
            "Mount point for /dev/sda1 (leave empty to skip):",
            "Filesystem for /dev/sda1",
            "Select Region",
            "Select City",
            "Select Locale",
            "Enter username:",
            "Add alice to the wheel group?",
            "Enter password:",
            "Confirm password:",
            "Enter root password:",
            "Confirm root password:",
        ]
    );
    assert_eq!(transcript.masked_prompts, 4);
    assert!(transcript.summary.iter().any(|l| l == "Firmware: BIOS (detected)"));

    let script = render_install_script(&config, &ScriptOptions::default());
    assert!(script.contains("mkfs.btrfs -f /dev/sda1\n"));
    assert!(script.contains("echo 'en_US.UTF-8 UTF-8' >> /etc/locale.gen\n"));
    assert!(script.contains("ln -sf /usr/share/zoneinfo/Europe/Berlin /etc/localtime\n"));
    assert!(script.contains("useradd -m -s /usr/bin/fish -G wheel alice\n"));
    assert!(!script.contains("rootpw"));
}

#[test]
fn test_abort_at_summary_yields_cancelled() {
    struct AbortAtSummary(ScriptedPrompter);

    impl Prompter for AbortAtSummary {
        fn pick(&mut self, title: &str, options: &[String]) -> Result<String> {
            self.0.pick(title, options)
        }
        fn read_line(&mut self, prompt: &str, mode: InputMode) -> Result<String> {
            self.0.read_line(prompt, mode)
        }
        fn notice(&mut self, message: &str) -> Result<()> {
            self.0.notice(message)
        }
        fn confirm_summary(&mut self, _title: &str, _lines: &[String]) -> Result<()> {
            Err(InstallerError::Cancelled)
        }
        fn run_external(&mut self, program: &str, args: &[&str]) -> Result<()> {
            self.0.run_external(program, args)
        }
    }

    let dir = tempfile::tempdir().unwrap();
    let probe = TreeProbe {
        host: system_tree(dir.path()),
    };
    let mut prompter = AbortAtSummary(ScriptedPrompter::new(&[
        "/dev/sda",
        "",
        "Europe",
        "Lisbon",
        "de_DE.UTF-8 UTF-8",
        "bob",
        "No",
        "a",
        "a",
        "b",
        "b",
    ]));
    let options = WizardOptions {
        partition_tool: "cfdisk".to_string(),
        boot_mode: BootMode::Uefi,
        firmware: FirmwareMode::Uefi,
    };

    let err = run_wizard(&mut prompter, &probe, &options).unwrap_err();
    assert!(err.is_cancelled());
}
