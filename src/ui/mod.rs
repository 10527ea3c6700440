//! Terminal UI
//!
//! [`TerminalSession`] owns the full-screen terminal for the wizard's
//! lifetime and implements [`Prompter`] on top of the widget state machines in
//! [`crate::input`]. Every prompt blocks on `crossterm::event::read`; there is
//! no tick loop because nothing changes on screen without a key press.

pub mod summary;
pub mod widgets;

use std::io::{self, Stdout};
use std::process::Command;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::error::{InstallerError, Result};
use crate::input::{InputResult, LineEditorState, PickerState, is_abort_key};
use crate::types::InputMode;
use crate::wizard::Prompter;

/// Leave the alternate screen and raw mode. Safe to call more than once, and
/// from a panic hook.
pub fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
}

/// Run `setup`; if it fails, call `restore` before handing back the error.
/// No session exists yet at that point, so `Drop` cannot do it.
fn restore_on_error<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| restore())
}

/// Exclusive handle on the terminal while the wizard runs.
///
/// Dropping the session restores the terminal.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    /// Switch to raw mode and the alternate screen.
    pub fn enter() -> Result<Self> {
        enable_raw_mode()
            .map_err(|e| InstallerError::terminal(format!("cannot enable raw mode: {}", e)))?;
        let terminal = restore_on_error(
            || {
                execute!(io::stdout(), EnterAlternateScreen)?;
                let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
                terminal.clear()?;
                Ok(terminal)
            },
            restore_terminal,
        )?;
        tracing::debug!("Terminal session started");
        Ok(Self { terminal })
    }

    /// Give the terminal back to the shell so another program can use it.
    fn suspend(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Take the terminal back after [`Self::suspend`].
    fn resume(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        self.terminal.clear()?;
        Ok(())
    }

    /// Block until the next key press. Other events (resize, focus) yield
    /// `None` so the caller redraws.
    fn next_key(&mut self) -> Result<Option<KeyEvent>> {
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key)),
            _ => Ok(None),
        }
    }

    /// Block until any key; Esc and Ctrl+C abort.
    fn wait_for_key(&mut self) -> Result<()> {
        loop {
            if let Some(key) = self.next_key()? {
                if is_abort_key(&key) {
                    return Err(InstallerError::Cancelled);
                }
                return Ok(());
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
        tracing::debug!("Terminal session restored");
    }
}

impl Prompter for TerminalSession {
    fn pick(&mut self, title: &str, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(InstallerError::validation(format!("'{}' has nothing to choose from", title)));
        }
        let mut picker = PickerState::new(title, options.to_vec(), 1);
        loop {
            self.terminal.draw(|frame| {
                picker.set_viewport(widgets::picker_viewport(frame.area().height));
                widgets::render_picker(frame, &picker);
            })?;
            let Some(key) = self.next_key()? else {
                continue;
            };
            match picker.handle_key(key) {
                InputResult::Confirm(choice) => return Ok(choice),
                InputResult::Cancel => return Err(InstallerError::Cancelled),
                InputResult::Continue => {}
            }
        }
    }

    fn read_line(&mut self, prompt: &str, mode: InputMode) -> Result<String> {
        let mut editor = LineEditorState::new(prompt, mode);
        loop {
            self.terminal.draw(|frame| widgets::render_editor(frame, &editor))?;
            let Some(key) = self.next_key()? else {
                continue;
            };
            match editor.handle_key(key) {
                InputResult::Confirm(value) => {
                    self.terminal.hide_cursor()?;
                    return Ok(value);
                }
                InputResult::Cancel => return Err(InstallerError::Cancelled),
                InputResult::Continue => {}
            }
        }
    }

    fn notice(&mut self, message: &str) -> Result<()> {
        self.terminal.draw(|frame| widgets::render_notice(frame, message))?;
        self.wait_for_key()
    }

    fn confirm_summary(&mut self, title: &str, lines: &[String]) -> Result<()> {
        self.terminal.draw(|frame| widgets::render_summary(frame, title, lines))?;
        self.wait_for_key()
    }

    fn run_external(&mut self, program: &str, args: &[&str]) -> Result<()> {
        self.suspend()?;
        let status = Command::new(program).args(args).status();
        self.resume()?;

        match status {
            Ok(status) if status.success() => {
                tracing::info!("{} completed successfully", program);
                Ok(())
            }
            Ok(status) => {
                tracing::warn!("{} exited with {}", program, status);
                Ok(())
            }
            Err(e) => Err(InstallerError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let result: Result<()> = restore_on_error(
            || Err(InstallerError::terminal("no alternate screen")),
            || restored.set(true),
        );
        assert!(matches!(result, Err(InstallerError::Terminal(_))));
        assert!(restored.get());
    }

    #[test]
    fn test_successful_setup_leaves_terminal_alone() {
        let restored = Cell::new(false);
        let value = restore_on_error(|| Ok(7), || restored.set(true)).unwrap();
        assert_eq!(value, 7);
        assert!(!restored.get());
    }
}
