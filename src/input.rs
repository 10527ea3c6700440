//! Input handling module
//!
//! Key-handling state machines for the two widgets the wizard talks through:
//! a searchable list picker and a line editor with an optional masked mode.
//! Neither touches the terminal; [`crate::ui`] feeds them key events and draws
//! their state, which keeps every rule here testable without a TTY.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use zeroize::Zeroizing;

use crate::scrolling::ScrollState;
use crate::types::InputMode;

/// Longest value the visible line editor accepts; extra keystrokes are dropped.
pub const MAX_VISIBLE_INPUT: usize = 64;

/// Character drawn for every buffered character in masked mode.
pub const MASK_CHAR: char = '*';

/// Result of feeding one key event to a widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
    /// User confirmed with a value
    Confirm(String),
    /// User aborted the wizard
    Cancel,
    /// Keep reading keys
    Continue,
}

/// Esc and Ctrl+C abort whichever widget is active.
pub fn is_abort_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('C') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// A key that appends `c` to a text buffer, if any.
fn printable_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !c.is_control()
                && !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

/// Indices of `options` whose lowercase form contains the lowercase `query`,
/// in original order. An empty query keeps everything.
pub fn filter_options(options: &[String], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    options
        .iter()
        .enumerate()
        .filter(|(_, opt)| opt.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

// ============================================================================
// List Picker
// ============================================================================

/// State of one list-picker invocation.
#[derive(Debug, Clone)]
pub struct PickerState {
    /// Title shown on the first row
    pub title: String,
    options: Vec<String>,
    query: String,
    filtered: Vec<usize>,
    /// Cursor and scroll window over the filtered view
    pub scroll: ScrollState,
}

impl PickerState {
    /// Create a picker over `options` with a window of `visible_items` rows.
    pub fn new(title: impl Into<String>, options: Vec<String>, visible_items: usize) -> Self {
        let filtered: Vec<usize> = (0..options.len()).collect();
        let scroll = ScrollState::new(filtered.len(), visible_items);
        Self {
            title: title.into(),
            options,
            query: String::new(),
            filtered,
            scroll,
        }
    }

    /// The full, unfiltered option list.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Current search text.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The filtered view, in original order.
    pub fn filtered(&self) -> Vec<&str> {
        self.filtered
            .iter()
            .map(|&i| self.options[i].as_str())
            .collect()
    }

    /// Option under the cursor, or `None` when nothing matches the search.
    pub fn selected(&self) -> Option<&str> {
        self.filtered
            .get(self.scroll.selected_index)
            .map(|&i| self.options[i].as_str())
    }

    /// The navigation hint is only worth a row when the full list overflows.
    pub fn shows_navigation_hint(&self) -> bool {
        self.options.len() > self.scroll.visible_items
    }

    /// Resize the list window to the rows the screen currently offers.
    pub fn set_viewport(&mut self, visible_items: usize) {
        self.scroll.update_visible_items(visible_items);
    }

    /// Handle keyboard input for the picker
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        if key.kind == KeyEventKind::Release {
            return InputResult::Continue;
        }
        if is_abort_key(&key) {
            return InputResult::Cancel;
        }

        match key.code {
            KeyCode::Up => self.scroll.move_up(),
            KeyCode::Down => self.scroll.move_down(),
            KeyCode::PageUp => self.scroll.page_up(),
            KeyCode::PageDown => self.scroll.page_down(),
            KeyCode::Home => self.scroll.move_to_first(),
            KeyCode::End => self.scroll.move_to_last(),
            KeyCode::Enter => {
                // Enter over an empty filtered view does nothing
                if let Some(choice) = self.selected() {
                    return InputResult::Confirm(choice.to_string());
                }
            }
            KeyCode::Backspace => {
                if self.query.pop().is_some() {
                    self.refilter();
                }
            }
            _ => {
                if let Some(c) = printable_char(&key) {
                    self.query.push(c);
                    self.refilter();
                }
            }
        }
        InputResult::Continue
    }

    fn refilter(&mut self) {
        self.filtered = filter_options(&self.options, &self.query);
        self.scroll.set_total_items(self.filtered.len());
    }
}

// ============================================================================
// Line Editor
// ============================================================================

/// State of one line-editor invocation.
#[derive(Clone)]
pub struct LineEditorState {
    /// Prompt shown above the input field
    pub prompt: String,
    /// Echo mode
    pub mode: InputMode,
    buffer: Zeroizing<String>,
}

impl std::fmt::Debug for LineEditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineEditorState")
            .field("prompt", &self.prompt)
            .field("mode", &self.mode)
            .field("len", &self.len())
            .finish()
    }
}

impl LineEditorState {
    /// Create an empty editor.
    pub fn new(prompt: impl Into<String>, mode: InputMode) -> Self {
        Self {
            prompt: prompt.into(),
            mode,
            buffer: Zeroizing::new(String::new()),
        }
    }

    /// Number of buffered characters.
    pub fn len(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Whether nothing has been typed yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// What the input field shows: the text itself, or one mask per character.
    pub fn display_value(&self) -> String {
        match self.mode {
            InputMode::Visible => self.buffer.to_string(),
            InputMode::Masked => MASK_CHAR.to_string().repeat(self.len()),
        }
    }

    /// Handle keyboard input for the editor
    pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
        if key.kind == KeyEventKind::Release {
            return InputResult::Continue;
        }
        if is_abort_key(&key) {
            return InputResult::Cancel;
        }

        match key.code {
            KeyCode::Enter => {
                let value = match self.mode {
                    InputMode::Visible => self.buffer.trim().to_string(),
                    InputMode::Masked => self.buffer.to_string(),
                };
                return InputResult::Confirm(value);
            }
            KeyCode::Backspace => {
                self.buffer.pop();
            }
            _ => {
                if let Some(c) = printable_char(&key) {
                    let full = self.mode == InputMode::Visible && self.len() >= MAX_VISIBLE_INPUT;
                    if !full {
                        self.buffer.push(c);
                    }
                }
            }
        }
        InputResult::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(editor: &mut LineEditorState, s: &str) {
        for c in s.chars() {
            editor.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let options = opts(&["Europe", "America", "Antarctica", "EUROPA"]);
        assert_eq!(filter_options(&options, "eur"), vec![0, 3]);
        assert_eq!(filter_options(&options, "AN"), vec![1, 2]);
        assert_eq!(filter_options(&options, ""), vec![0, 1, 2, 3]);
        assert!(filter_options(&options, "zzz").is_empty());
    }

    #[test]
    fn test_picker_typing_filters_and_backspace_restores() {
        let mut picker = PickerState::new("Select Region", opts(&["Asia", "Europe", "Africa"]), 10);
        picker.handle_key(key(KeyCode::Char('a')));
        picker.handle_key(key(KeyCode::Char('f')));
        assert_eq!(picker.query(), "af");
        assert_eq!(picker.filtered(), vec!["Africa"]);

        picker.handle_key(key(KeyCode::Backspace));
        picker.handle_key(key(KeyCode::Backspace));
        picker.handle_key(key(KeyCode::Backspace));
        assert_eq!(picker.query(), "");
        assert_eq!(picker.filtered(), vec!["Asia", "Europe", "Africa"]);
    }

    #[test]
    fn test_picker_enter_returns_highlighted_option() {
        let mut picker = PickerState::new("Select Disk", opts(&["/dev/sda", "/dev/nvme0n1"]), 10);
        picker.handle_key(key(KeyCode::Down));
        assert_eq!(
            picker.handle_key(key(KeyCode::Enter)),
            InputResult::Confirm("/dev/nvme0n1".to_string())
        );
    }

    #[test]
    fn test_picker_enter_on_empty_view_is_noop() {
        let mut picker = PickerState::new("Select Locale", opts(&["en_US.UTF-8 UTF-8"]), 10);
        picker.handle_key(key(KeyCode::Char('x')));
        assert!(picker.filtered().is_empty());
        assert_eq!(picker.selected(), None);
        assert_eq!(picker.handle_key(key(KeyCode::Enter)), InputResult::Continue);
    }

    #[test]
    fn test_picker_cursor_clamped_after_filter_shrinks() {
        let mut picker = PickerState::new("t", opts(&["a1", "b2", "a3", "b4"]), 10);
        for _ in 0..3 {
            picker.handle_key(key(KeyCode::Down));
        }
        assert_eq!(picker.selected(), Some("b4"));
        picker.handle_key(key(KeyCode::Char('a')));
        assert_eq!(picker.filtered(), vec!["a1", "a3"]);
        assert_eq!(picker.selected(), Some("a3"));
    }

    #[test]
    fn test_search_from_bottom_of_long_list_shows_every_match() {
        let mut options: Vec<String> = (0..27).map(|i| format!("Zone{:02}", i)).collect();
        options.extend(opts(&["Berlin", "Bern", "Beirut"]));
        let mut picker = PickerState::new("Select City", options, 5);
        picker.handle_key(key(KeyCode::End));
        assert_eq!(picker.selected(), Some("Beirut"));

        picker.handle_key(key(KeyCode::Char('b')));
        picker.handle_key(key(KeyCode::Char('e')));
        assert_eq!(picker.filtered(), vec!["Berlin", "Bern", "Beirut"]);
        assert_eq!(picker.scroll.visible_range(), 0..3);
        assert_eq!(picker.selected(), Some("Beirut"));

        picker.handle_key(key(KeyCode::Home));
        assert_eq!(picker.selected(), Some("Berlin"));
    }

    #[test]
    fn test_picker_abort_keys() {
        let mut picker = PickerState::new("t", opts(&["x"]), 10);
        assert_eq!(picker.handle_key(key(KeyCode::Esc)), InputResult::Cancel);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(picker.handle_key(ctrl_c), InputResult::Cancel);
        assert_eq!(picker.query(), "");
    }

    #[test]
    fn test_navigation_hint_only_when_list_overflows() {
        let few = PickerState::new("t", opts(&["a", "b"]), 5);
        assert!(!few.shows_navigation_hint());
        let many = PickerState::new("t", opts(&["a", "b", "c", "d", "e", "f"]), 5);
        assert!(many.shows_navigation_hint());
    }

    #[test]
    fn test_visible_editor_trims_and_truncates() {
        let mut editor = LineEditorState::new("Mount point", InputMode::Visible);
        type_str(&mut editor, "  /home  ");
        assert_eq!(editor.display_value(), "  /home  ");
        assert_eq!(
            editor.handle_key(key(KeyCode::Enter)),
            InputResult::Confirm("/home".to_string())
        );

        let mut long = LineEditorState::new("Username", InputMode::Visible);
        type_str(&mut long, &"a".repeat(MAX_VISIBLE_INPUT + 10));
        assert_eq!(long.len(), MAX_VISIBLE_INPUT);
    }

    #[test]
    fn test_masked_editor_never_displays_plaintext() {
        let mut editor = LineEditorState::new("Enter password:", InputMode::Masked);
        type_str(&mut editor, "s3cret ");
        assert_eq!(editor.display_value(), "*******");
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.display_value(), "******");
        assert_eq!(
            editor.handle_key(key(KeyCode::Enter)),
            InputResult::Confirm("s3cret".to_string())
        );
    }

    #[test]
    fn test_masked_editor_keeps_surrounding_whitespace() {
        let mut editor = LineEditorState::new("p", InputMode::Masked);
        type_str(&mut editor, " pw ");
        assert_eq!(
            editor.handle_key(key(KeyCode::Enter)),
            InputResult::Confirm(" pw ".to_string())
        );
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut editor = LineEditorState::new("p", InputMode::Visible);
        editor.handle_key(key(KeyCode::Backspace));
        assert!(editor.is_empty());
    }
}
