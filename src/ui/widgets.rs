//! Screen rendering for the picker, line editor, notice and summary
//!
//! Layout is row-based: the title sits on the first row, the widget body starts
//! two rows down and the key hint sits on the second-to-last row.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::input::{LineEditorState, PickerState};
use crate::theme::Styles;

/// Rows the picker reserves for title, search line, hint and spacing.
const PICKER_CHROME_ROWS: u16 = 4;

const PICKER_HINT: &str = "[↑↓] Navigation  [Enter] Select  [Backspace] Delete  [Esc] Exit";
const EDITOR_HINT: &str = "[Enter] Confirm  [Backspace] Delete  [Esc] Exit";
const NOTICE_HINT: &str = "Press any key to continue  [Esc] Exit";
const SUMMARY_HINT: &str = "Press any key to start the installation  [Esc] Abort";
const INPUT_MARKER: &str = "> ";

/// List rows available on a screen `height` rows tall.
pub fn picker_viewport(height: u16) -> usize {
    usize::from(height.saturating_sub(PICKER_CHROME_ROWS)).max(1)
}

/// One-row slice of `area` at `offset`, empty when it falls off screen.
fn row(area: Rect, offset: u16) -> Rect {
    let height = u16::from(offset < area.height);
    Rect::new(area.x, area.y.saturating_add(offset), area.width, height)
}

/// Rows `from..` of `area`, at most `max` tall.
fn rows_from(area: Rect, from: u16, max: u16) -> Rect {
    let available = area.height.saturating_sub(from);
    Rect::new(area.x, area.y.saturating_add(from), area.width, available.min(max))
}

fn render_hint(frame: &mut Frame, area: Rect, hint: &str) {
    if area.height >= 2 {
        frame.render_widget(
            Paragraph::new(Line::styled(hint, Styles::nav_hint())),
            row(area, area.height - 2),
        );
    }
}

fn render_title(frame: &mut Frame, area: Rect, title: &str) {
    frame.render_widget(Paragraph::new(Line::styled(title, Styles::title())), row(area, 0));
}

pub fn render_picker(frame: &mut Frame, picker: &PickerState) {
    let area = frame.area();
    render_title(frame, area, &picker.title);

    let search = Line::from(vec![
        Span::styled("Search: ", Styles::label()),
        Span::styled(picker.query(), Styles::input()),
    ]);
    frame.render_widget(Paragraph::new(search), row(area, 1));

    let range = picker.scroll.visible_range();
    let lines: Vec<Line> = picker
        .filtered()
        .into_iter()
        .enumerate()
        .skip(range.start)
        .take(range.len())
        .map(|(i, option)| {
            let style = if i == picker.scroll.selected_index {
                Styles::selected()
            } else {
                Styles::text()
            };
            Line::styled(option, style)
        })
        .collect();
    let visible = u16::try_from(picker.scroll.visible_items).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines), rows_from(area, 2, visible));

    if picker.shows_navigation_hint() {
        render_hint(frame, area, PICKER_HINT);
    }
}

pub fn render_editor(frame: &mut Frame, editor: &LineEditorState) {
    let area = frame.area();
    render_title(frame, area, &editor.prompt);

    let value = editor.display_value();
    let field = Line::from(vec![
        Span::styled(INPUT_MARKER, Styles::label()),
        Span::styled(value.as_str(), Styles::input()),
    ]);
    let field_area = row(area, 2);
    frame.render_widget(Paragraph::new(field), field_area);

    if field_area.height > 0 {
        let typed = u16::try_from(editor.len()).unwrap_or(u16::MAX);
        let x = field_area
            .x
            .saturating_add(INPUT_MARKER.len() as u16)
            .saturating_add(typed)
            .min(area.right().saturating_sub(1));
        frame.set_cursor_position((x, field_area.y));
    }

    render_hint(frame, area, EDITOR_HINT);
}

pub fn render_notice(frame: &mut Frame, message: &str) {
    let area = frame.area();
    let body = Paragraph::new(Line::styled(message, Styles::error())).wrap(Wrap { trim: false });
    frame.render_widget(body, rows_from(area, 0, area.height.saturating_sub(2)));
    render_hint(frame, area, NOTICE_HINT);
}

pub fn render_summary(frame: &mut Frame, title: &str, lines: &[String]) {
    let area = frame.area();
    render_title(frame, area, title);

    let body: Vec<Line> = lines
        .iter()
        .map(|line| match line.split_once(": ") {
            Some((label, value)) if !line.starts_with(' ') => Line::from(vec![
                Span::styled(format!("{}: ", label), Styles::label()),
                Span::styled(value, Styles::text()),
            ]),
            _ => Line::styled(line.as_str(), Styles::text()),
        })
        .collect();
    frame.render_widget(Paragraph::new(body), rows_from(area, 2, area.height.saturating_sub(4)));

    render_hint(frame, area, SUMMARY_HINT);
}
