//! Cursor and scroll-window bookkeeping for list views
//!
//! Tracks the highlighted row and the first visible row of a list that may be
//! taller than the screen. All movement is clamped: the cursor never leaves
//! `[0, total_items - 1]` and always stays inside the visible window.

use std::ops::Range;

/// Cursor/scroll state for a vertically scrolling list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    /// Index of the highlighted item.
    pub selected_index: usize,
    /// Index of the first visible item.
    pub scroll_offset: usize,
    /// Number of rows available on screen (at least 1).
    pub visible_items: usize,
    /// Number of items in the list.
    pub total_items: usize,
}

impl ScrollState {
    /// Create a new scroll state with the cursor on the first item.
    pub fn new(total_items: usize, visible_items: usize) -> Self {
        Self {
            selected_index: 0,
            scroll_offset: 0,
            visible_items: visible_items.max(1),
            total_items,
        }
    }

    /// Move the cursor one row up, scrolling when it leaves the window.
    pub fn move_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset -= 1;
        }
    }

    /// Move the cursor one row down, scrolling when it leaves the window.
    pub fn move_down(&mut self) {
        if self.selected_index + 1 < self.total_items {
            self.selected_index += 1;
        }
        if self.selected_index >= self.scroll_offset + self.visible_items {
            self.scroll_offset += 1;
        }
    }

    /// Move the cursor one window up.
    pub fn page_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(self.visible_items);
        self.ensure_visible();
    }

    /// Move the cursor one window down.
    pub fn page_down(&mut self) {
        let last = self.total_items.saturating_sub(1);
        self.selected_index = (self.selected_index + self.visible_items).min(last);
        self.ensure_visible();
    }

    /// Jump to the first item.
    pub fn move_to_first(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    /// Jump to the last item.
    pub fn move_to_last(&mut self) {
        self.selected_index = self.total_items.saturating_sub(1);
        self.ensure_visible();
    }

    /// Resize the window (e.g. after a terminal resize).
    pub fn update_visible_items(&mut self, visible_items: usize) {
        self.visible_items = visible_items.max(1);
        self.ensure_visible();
        self.fill_window();
    }

    /// Replace the item count, clamping the cursor into the new range.
    pub fn set_total_items(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.selected_index = self.selected_index.min(total_items.saturating_sub(1));
        self.ensure_visible();
        self.fill_window();
    }

    /// Indices of the items currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.scroll_offset + self.visible_items).min(self.total_items);
        self.scroll_offset.min(end)..end
    }

    fn ensure_visible(&mut self) {
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + self.visible_items {
            self.scroll_offset = self.selected_index + 1 - self.visible_items;
        }
    }

    /// Never leave blank rows below the list while items sit above the window.
    fn fill_window(&mut self) {
        self.scroll_offset = self
            .scroll_offset
            .min(self.total_items.saturating_sub(self.visible_items));
    }
}
