//! Interactive list selection with fuzzy filtering
//!
//! The selection logic is a plain state machine: [`SelectState::apply`] maps
//! one input event to the next state and [`SelectState::render`] produces the
//! frame text, so the whole component is testable with a synthetic event feed.
//! [`select`] drives it from real key presses in a raw-mode terminal loop on
//! stderr, one event processed to completion per iteration.

use std::io::{self, Write};

use crossterm::cursor;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;

use crate::error::{Result, SwitchError};

/// Hint shown in the header while the filter is empty
const FILTER_HINT: &str = "Type to filter...";

/// One input event for the selection state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectEvent {
    /// Move the cursor up one entry, wrapping to the last
    CursorUp,
    /// Move the cursor down one entry, wrapping to the first
    CursorDown,
    /// Move the cursor up a full page, clamped to the first entry
    PageUp,
    /// Move the cursor down a full page, clamped to the last entry
    PageDown,
    /// Jump to the first entry
    First,
    /// Jump to the last entry
    Last,
    /// Append a printable character to the filter
    Input(char),
    /// Remove the last filter character
    Backspace,
    /// Replace the filter with the highlighted option
    PromoteFilter,
    /// Select the highlighted option
    Confirm,
    /// Clear a non-empty filter, or cancel the selection
    Cancel,
    /// Cancel the selection regardless of filter state
    Quit,
}

/// Whether the selection is still running or how it ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectStatus {
    Browsing,
    Confirmed,
    Cancelled,
}

/// State of one interactive selection
#[derive(Debug)]
pub struct SelectState {
    message: String,
    options: Vec<String>,
    filtered: Vec<String>,
    filter: String,
    current: Option<String>,
    cursor: usize,
    offset: usize,
    page_size: usize,
    selected: Option<String>,
    status: SelectStatus,
}

impl SelectState {
    pub fn new(
        message: impl Into<String>,
        options: Vec<String>,
        current: Option<String>,
        page_size: usize,
    ) -> Self {
        let page_size = if page_size == 0 {
            crate::config::defaults::PAGE_SIZE
        } else {
            page_size
        };
        Self {
            message: message.into(),
            filtered: options.clone(),
            options,
            filter: String::new(),
            current,
            cursor: 0,
            offset: 0,
            page_size,
            selected: None,
            status: SelectStatus::Browsing,
        }
    }

    pub fn status(&self) -> SelectStatus {
        self.status
    }

    /// The confirmed option, once the status is `Confirmed`
    pub fn selection(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Apply one event, transitioning to the next state
    pub fn apply(&mut self, event: SelectEvent) {
        if self.status != SelectStatus::Browsing {
            return;
        }

        match event {
            SelectEvent::CursorUp => {
                if !self.filtered.is_empty() {
                    self.cursor = if self.cursor > 0 {
                        self.cursor - 1
                    } else {
                        self.filtered.len() - 1
                    };
                    self.adjust_offset();
                }
            }
            SelectEvent::CursorDown => {
                if !self.filtered.is_empty() {
                    self.cursor = if self.cursor + 1 < self.filtered.len() {
                        self.cursor + 1
                    } else {
                        0
                    };
                    self.adjust_offset();
                }
            }
            SelectEvent::PageUp => {
                self.cursor = self.cursor.saturating_sub(self.page_size);
                self.adjust_offset();
            }
            SelectEvent::PageDown => {
                if !self.filtered.is_empty() {
                    self.cursor = (self.cursor + self.page_size).min(self.filtered.len() - 1);
                    self.adjust_offset();
                }
            }
            SelectEvent::First => {
                self.cursor = 0;
                self.adjust_offset();
            }
            SelectEvent::Last => {
                if !self.filtered.is_empty() {
                    self.cursor = self.filtered.len() - 1;
                    self.adjust_offset();
                }
            }
            SelectEvent::Input(c) => {
                if !c.is_control() {
                    self.filter.push(c);
                    self.update_filter();
                }
            }
            SelectEvent::Backspace => {
                if self.filter.pop().is_some() {
                    self.update_filter();
                }
            }
            SelectEvent::PromoteFilter => {
                if !self.filtered.is_empty() {
                    self.filter = self.filtered[self.cursor].clone();
                    self.update_filter();
                }
            }
            SelectEvent::Confirm => {
                if !self.filtered.is_empty() {
                    self.selected = Some(self.filtered[self.cursor].clone());
                    self.status = SelectStatus::Confirmed;
                }
            }
            SelectEvent::Cancel => {
                if self.filter.is_empty() {
                    self.status = SelectStatus::Cancelled;
                } else {
                    self.filter.clear();
                    self.update_filter();
                }
            }
            SelectEvent::Quit => {
                self.status = SelectStatus::Cancelled;
            }
        }
    }

    /// Render the current state as plain text, one line per row
    pub fn render(&self) -> String {
        let filter_display = if self.filter.is_empty() {
            FILTER_HINT
        } else {
            self.filter.as_str()
        };
        let position = if self.filtered.is_empty() {
            0
        } else {
            self.cursor + 1
        };

        let mut lines = vec![format!(
            "{} {}  ({}/{})",
            self.message,
            filter_display,
            position,
            self.filtered.len()
        )];

        if self.filtered.is_empty() {
            lines.push("  No matches found".to_string());
            return lines.join("\n");
        }

        let end = (self.offset + self.page_size).min(self.filtered.len());
        for (i, option) in self.filtered[self.offset..end].iter().enumerate() {
            let pointer = if self.offset + i == self.cursor { "> " } else { "  " };
            let marker = if self.current.as_deref() == Some(option.as_str()) {
                " (current)"
            } else {
                ""
            };
            lines.push(format!("{}{}{}", pointer, option, marker));
        }

        lines.join("\n")
    }

    /// Recompute the filtered options from scratch; the cursor and viewport
    /// always reset on a filter change
    fn update_filter(&mut self) {
        self.filtered = self
            .options
            .iter()
            .filter(|option| fuzzy_match(option, &self.filter))
            .cloned()
            .collect();
        self.cursor = 0;
        self.offset = 0;
    }

    /// Keep the cursor inside the visible page
    fn adjust_offset(&mut self) {
        if self.cursor < self.offset {
            self.offset = self.cursor;
        }
        if self.cursor >= self.offset + self.page_size {
            self.offset = self.cursor + 1 - self.page_size;
        }
    }
}

/// Case-insensitive ordered-subsequence match: every pattern character must
/// appear in the candidate in order, not necessarily contiguously. The scan is
/// a single greedy left-to-right pass. An empty pattern matches everything.
pub fn fuzzy_match(candidate: &str, pattern: &str) -> bool {
    let mut pattern_chars = pattern.chars().flat_map(char::to_lowercase).peekable();

    for c in candidate.chars().flat_map(char::to_lowercase) {
        match pattern_chars.peek() {
            Some(&p) if p == c => {
                pattern_chars.next();
            }
            Some(_) => {}
            None => return true,
        }
    }

    pattern_chars.peek().is_none()
}

/// Run an interactive selection prompt on stderr.
///
/// Returns the chosen option, or `Ok(None)` if the user cancelled; callers
/// must treat cancellation as a normal outcome.
pub fn select(
    message: &str,
    options: Vec<String>,
    current: Option<String>,
    page_size: usize,
) -> Result<Option<String>> {
    let mut state = SelectState::new(message, options, current, page_size);
    let mut out = io::stderr();

    terminal::enable_raw_mode().map_err(|e| SwitchError::Terminal(e.to_string()))?;
    let outcome = event_loop(&mut out, &mut state);
    let _ = out.queue(cursor::Show).and_then(|o| o.flush().map(|_| o));
    let _ = terminal::disable_raw_mode();

    outcome
}

fn event_loop(out: &mut impl Write, state: &mut SelectState) -> Result<Option<String>> {
    out.queue(cursor::Hide)?;

    loop {
        let frame = state.render();
        let rows = draw(out, &frame)?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if let Some(event) = map_key(&key) {
                    state.apply(event);
                }
            }
        }

        erase(out, rows)?;

        match state.status() {
            SelectStatus::Browsing => {}
            SelectStatus::Confirmed => return Ok(state.selection().map(str::to_string)),
            SelectStatus::Cancelled => return Ok(None),
        }
    }
}

/// Write one frame; raw mode needs explicit carriage returns
fn draw(out: &mut impl Write, frame: &str) -> io::Result<u16> {
    let mut rows = 0u16;
    for line in frame.lines() {
        out.queue(Clear(ClearType::CurrentLine))?;
        out.write_all(line.as_bytes())?;
        out.write_all(b"\r\n")?;
        rows += 1;
    }
    out.flush()?;
    Ok(rows)
}

fn erase(out: &mut impl Write, rows: u16) -> io::Result<()> {
    out.queue(cursor::MoveUp(rows))?;
    out.queue(Clear(ClearType::FromCursorDown))?;
    Ok(())
}

fn map_key(key: &KeyEvent) -> Option<SelectEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(SelectEvent::Quit),
            _ => None,
        };
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        return None;
    }

    match key.code {
        KeyCode::Up => Some(SelectEvent::CursorUp),
        KeyCode::Down => Some(SelectEvent::CursorDown),
        KeyCode::PageUp => Some(SelectEvent::PageUp),
        KeyCode::PageDown => Some(SelectEvent::PageDown),
        KeyCode::Home => Some(SelectEvent::First),
        KeyCode::End => Some(SelectEvent::Last),
        KeyCode::Right => Some(SelectEvent::PromoteFilter),
        KeyCode::Enter => Some(SelectEvent::Confirm),
        KeyCode::Esc => Some(SelectEvent::Cancel),
        KeyCode::Backspace => Some(SelectEvent::Backspace),
        KeyCode::Char(c) => Some(SelectEvent::Input(c)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn numbered(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("option-{:02}", i)).collect()
    }

    #[test]
    fn test_fuzzy_match_in_order() {
        assert!(fuzzy_match("production-cluster", "pc"));
        assert!(fuzzy_match("production-cluster", "prod"));
        assert!(fuzzy_match("production-cluster", "pdcl"));
    }

    #[test]
    fn test_fuzzy_match_order_violation() {
        assert!(!fuzzy_match("production-cluster", "cp"));
        assert!(!fuzzy_match("abc", "ba"));
    }

    #[test]
    fn test_fuzzy_match_empty_pattern_matches_everything() {
        assert!(fuzzy_match("anything", ""));
        assert!(fuzzy_match("", ""));
    }

    #[test]
    fn test_fuzzy_match_case_insensitive() {
        assert!(fuzzy_match("Production-Cluster", "pc"));
        assert!(fuzzy_match("production-cluster", "PC"));
    }

    #[test]
    fn test_fuzzy_match_pattern_longer_than_candidate() {
        assert!(!fuzzy_match("ab", "abc"));
        assert!(!fuzzy_match("", "a"));
    }

    #[test]
    fn test_cursor_down_and_wrap() {
        let mut state = SelectState::new("pick:", options(&["a", "b", "c"]), None, 10);
        state.apply(SelectEvent::CursorDown);
        assert_eq!(state.cursor, 1);
        state.apply(SelectEvent::CursorDown);
        state.apply(SelectEvent::CursorDown);
        assert_eq!(state.cursor, 0); // wrapped
    }

    #[test]
    fn test_cursor_up_wraps_to_last() {
        let mut state = SelectState::new("pick:", options(&["a", "b", "c"]), None, 10);
        state.apply(SelectEvent::CursorUp);
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn test_cursor_noop_on_empty_list() {
        let mut state = SelectState::new("pick:", Vec::new(), None, 10);
        for event in [
            SelectEvent::CursorUp,
            SelectEvent::CursorDown,
            SelectEvent::PageUp,
            SelectEvent::PageDown,
            SelectEvent::Last,
        ] {
            state.apply(event);
            assert_eq!(state.cursor, 0);
            assert_eq!(state.status(), SelectStatus::Browsing);
        }
    }

    #[test]
    fn test_page_down_clamps_to_last() {
        let mut state = SelectState::new("pick:", numbered(25), None, 10);
        state.apply(SelectEvent::PageDown);
        assert_eq!(state.cursor, 10);
        state.apply(SelectEvent::PageDown);
        assert_eq!(state.cursor, 20);
        state.apply(SelectEvent::PageDown);
        assert_eq!(state.cursor, 24); // clamped
    }

    #[test]
    fn test_page_up_clamps_to_first() {
        let mut state = SelectState::new("pick:", numbered(25), None, 10);
        state.apply(SelectEvent::Last);
        state.apply(SelectEvent::PageUp);
        assert_eq!(state.cursor, 14);
        state.apply(SelectEvent::PageUp);
        state.apply(SelectEvent::PageUp);
        assert_eq!(state.cursor, 0); // clamped
    }

    #[test]
    fn test_first_and_last() {
        let mut state = SelectState::new("pick:", numbered(25), None, 10);
        state.apply(SelectEvent::Last);
        assert_eq!(state.cursor, 24);
        assert_eq!(state.offset, 15);
        state.apply(SelectEvent::First);
        assert_eq!(state.cursor, 0);
        assert_eq!(state.offset, 0);
    }

    #[test]
    fn test_viewport_invariant_over_event_sequence() {
        let mut state = SelectState::new("pick:", numbered(25), None, 10);
        let script = [
            SelectEvent::CursorUp, // wraps to 24
            SelectEvent::CursorDown,
            SelectEvent::PageUp,
            SelectEvent::CursorDown,
            SelectEvent::CursorDown,
            SelectEvent::PageDown,
            SelectEvent::Last,
            SelectEvent::CursorDown, // wraps to 0
            SelectEvent::PageDown,
            SelectEvent::CursorUp,
            SelectEvent::First,
            SelectEvent::CursorUp, // wraps to 24
        ];
        for event in script {
            state.apply(event);
            assert!(state.cursor < state.filtered.len());
            assert!(state.offset <= state.cursor);
            assert!(state.cursor < state.offset + state.page_size);
        }
    }

    #[test]
    fn test_filter_narrows_options() {
        let mut state = SelectState::new(
            "pick:",
            options(&["production", "staging", "dev"]),
            None,
            10,
        );
        state.apply(SelectEvent::Input('s'));
        assert_eq!(state.filtered, options(&["staging"]));
        state.apply(SelectEvent::Input('t'));
        assert_eq!(state.filtered, options(&["staging"]));
    }

    #[test]
    fn test_filter_change_resets_cursor_and_offset() {
        let mut state = SelectState::new("pick:", numbered(25), None, 10);
        state.apply(SelectEvent::Last);
        assert!(state.cursor > 0 && state.offset > 0);

        // Every numbered option matches "option", so the old cursor position
        // would still be valid; it must reset anyway
        state.apply(SelectEvent::Input('o'));
        assert_eq!(state.cursor, 0);
        assert_eq!(state.offset, 0);
        assert_eq!(state.filtered.len(), 25);
    }

    #[test]
    fn test_backspace_recomputes_from_all_options() {
        let mut state = SelectState::new("pick:", options(&["alpha", "beta"]), None, 10);
        state.apply(SelectEvent::Input('b'));
        assert_eq!(state.filtered, options(&["beta"]));
        state.apply(SelectEvent::Backspace);
        assert_eq!(state.filtered, options(&["alpha", "beta"]));
    }

    #[test]
    fn test_backspace_on_empty_filter_is_noop() {
        let mut state = SelectState::new("pick:", options(&["alpha"]), None, 10);
        state.apply(SelectEvent::Backspace);
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.status(), SelectStatus::Browsing);
    }

    #[test]
    fn test_promote_filter_uses_highlighted_option() {
        let mut state = SelectState::new("pick:", options(&["alpha", "beta"]), None, 10);
        state.apply(SelectEvent::CursorDown);
        state.apply(SelectEvent::PromoteFilter);
        assert_eq!(state.filter, "beta");
        assert_eq!(state.filtered, options(&["beta"]));
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn test_confirm_selects_cursor_option() {
        let mut state = SelectState::new("pick:", options(&["alpha", "beta"]), None, 10);
        state.apply(SelectEvent::CursorDown);
        state.apply(SelectEvent::Confirm);
        assert_eq!(state.status(), SelectStatus::Confirmed);
        assert_eq!(state.selection(), Some("beta"));
    }

    #[test]
    fn test_confirm_on_empty_filtered_is_noop() {
        let mut state = SelectState::new("pick:", options(&["alpha"]), None, 10);
        state.apply(SelectEvent::Input('z'));
        assert!(state.filtered.is_empty());
        state.apply(SelectEvent::Confirm);
        assert_eq!(state.status(), SelectStatus::Browsing);
        assert!(state.selection().is_none());
    }

    #[test]
    fn test_cancel_clears_filter_before_cancelling() {
        let mut state = SelectState::new("pick:", options(&["alpha"]), None, 10);
        state.apply(SelectEvent::Input('a'));
        state.apply(SelectEvent::Cancel);
        assert_eq!(state.status(), SelectStatus::Browsing);
        assert!(state.filter.is_empty());
        state.apply(SelectEvent::Cancel);
        assert_eq!(state.status(), SelectStatus::Cancelled);
    }

    #[test]
    fn test_quit_cancels_even_with_filter() {
        let mut state = SelectState::new("pick:", options(&["alpha"]), None, 10);
        state.apply(SelectEvent::Input('a'));
        state.apply(SelectEvent::Quit);
        assert_eq!(state.status(), SelectStatus::Cancelled);
    }

    #[test]
    fn test_events_after_terminal_state_are_ignored() {
        let mut state = SelectState::new("pick:", options(&["alpha"]), None, 10);
        state.apply(SelectEvent::Confirm);
        state.apply(SelectEvent::Quit);
        assert_eq!(state.status(), SelectStatus::Confirmed);
        assert_eq!(state.selection(), Some("alpha"));
    }

    #[test]
    fn test_control_chars_do_not_enter_filter() {
        let mut state = SelectState::new("pick:", options(&["alpha"]), None, 10);
        state.apply(SelectEvent::Input('\x07'));
        assert!(state.filter.is_empty());
    }

    #[test]
    fn test_page_size_zero_falls_back_to_default() {
        let state = SelectState::new("pick:", numbered(25), None, 0);
        assert_eq!(state.page_size, crate::config::defaults::PAGE_SIZE);
    }

    #[test]
    fn test_render_header_shows_hint_and_counter() {
        let state = SelectState::new("Choose a context:", options(&["a", "b"]), None, 10);
        let frame = state.render();
        let header = frame.lines().next().unwrap();
        assert!(header.contains("Choose a context:"));
        assert!(header.contains(FILTER_HINT));
        assert!(header.contains("(1/2)"));
    }

    #[test]
    fn test_render_header_shows_live_filter() {
        let mut state = SelectState::new("pick:", options(&["alpha", "beta"]), None, 10);
        state.apply(SelectEvent::Input('b'));
        let header = state.render().lines().next().unwrap().to_string();
        assert!(header.contains(" b "));
        assert!(!header.contains(FILTER_HINT));
        assert!(header.contains("(1/1)"));
    }

    #[test]
    fn test_render_marks_cursor_and_current() {
        let mut state = SelectState::new(
            "pick:",
            options(&["alpha", "beta"]),
            Some("beta".to_string()),
            10,
        );
        let frame = state.render();
        assert!(frame.contains("> alpha"));
        assert!(frame.contains("  beta (current)"));

        // Cursor and current marker may coincide on one line
        state.apply(SelectEvent::CursorDown);
        let frame = state.render();
        assert!(frame.contains("> beta (current)"));
    }

    #[test]
    fn test_render_windows_to_page() {
        let mut state = SelectState::new("pick:", numbered(25), None, 10);
        state.apply(SelectEvent::Last);
        let frame = state.render();
        let rows: Vec<&str> = frame.lines().skip(1).collect();
        assert_eq!(rows.len(), 10);
        assert!(rows[0].contains("option-15"));
        assert!(rows[9].contains("> option-24"));
        assert!(!frame.contains("option-14"));
    }

    #[test]
    fn test_render_no_matches() {
        let mut state = SelectState::new("pick:", options(&["alpha"]), None, 10);
        state.apply(SelectEvent::Input('z'));
        let frame = state.render();
        assert!(frame.contains("(0/0)"));
        assert!(frame.contains("No matches found"));
    }
}
