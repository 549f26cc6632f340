//! Panel content with per-line click targets.
//!
//! [`ClickableList`] keeps rendered lines and their action IDs together, so
//! a button's hit row always follows wherever its line ends up.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};

use crate::input::ClickState;

/// Lines for one panel, some of them bound to actions.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from("Balance: 1,250"));
/// cl.push_button('c', "Claim", true, CLAIM);
/// let inner = block.inner(area);
/// cl.register_targets(inner, &mut cs);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false }), area);
/// ```
pub struct ClickableList<'a> {
    lines: Vec<Line<'a>>,
    /// `(line index, action ID)`
    actions: Vec<(usize, u16)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.lines.push(line);
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.actions.push((self.lines.len(), action_id));
        self.lines.push(line);
    }

    /// A `[k] label` button. Disabled buttons render dimmed but stay
    /// clickable, so a tap still reaches the game and can log why it failed.
    pub fn push_button(
        &mut self,
        key: char,
        label: impl Into<String>,
        enabled: bool,
        action_id: u16,
    ) {
        let (key_style, label_style) = if enabled {
            (
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::White),
            )
        } else {
            (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            )
        };
        let line = Line::from(vec![
            Span::styled(format!(" [{}] ", key.to_ascii_uppercase()), key_style),
            Span::styled(label.into(), label_style),
        ]);
        self.push_clickable(line, action_id);
    }

    /// Visual rows each line takes when `Paragraph` with `Wrap` draws it
    /// `width` cells wide.
    fn line_heights(&self, width: u16) -> Vec<u16> {
        let width = width.max(1) as usize;
        self.lines
            .iter()
            .map(|line| line.width().div_ceil(width).max(1) as u16)
            .collect()
    }

    /// Total visual rows at `width`.
    pub fn rows(&self, width: u16) -> u16 {
        self.line_heights(width).iter().sum()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.lines
    }

    /// Register a target for every visible row of every clickable line.
    ///
    /// `inner` is the content area (inside any borders) the lines are drawn
    /// into; lines wider than it wrap onto several rows.
    pub fn register_targets(&self, inner: Rect, cs: &mut ClickState) {
        let bottom = inner.y.saturating_add(inner.height);
        let heights = self.line_heights(inner.width);
        let mut starts = Vec::with_capacity(heights.len());
        let mut row = inner.y;
        for h in &heights {
            starts.push(row);
            row = row.saturating_add(*h);
        }

        for &(idx, action_id) in &self.actions {
            for screen_row in starts[idx]..starts[idx].saturating_add(heights[idx]) {
                if screen_row >= bottom {
                    break;
                }
                cs.add_row_target(inner, screen_row, action_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn targets_follow_line_positions() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("header"));
        cl.push_clickable(Line::from("claim"), 10);
        cl.push_button('d', "Check in", true, 11);
        cl.push(Line::from("footer"));
        assert_eq!(cl.rows(78), 4);

        // Bordered panel at y=5: content starts at y=6.
        let inner = Rect::new(1, 6, 78, 8);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs);

        assert_eq!(cs.targets.len(), 2);
        assert_eq!(cs.hit_test(10, 6), None);
        assert_eq!(cs.hit_test(10, 7), Some(10));
        assert_eq!(cs.hit_test(10, 8), Some(11));
        assert_eq!(cs.hit_test(10, 9), None);
        // Border column is outside the target.
        assert_eq!(cs.hit_test(0, 7), None);
    }

    #[test]
    fn rows_past_the_panel_are_clipped() {
        let mut cl = ClickableList::new();
        for i in 0..10 {
            cl.push_clickable(Line::from(format!("item {i}")), 50 + i);
        }
        let inner = Rect::new(1, 1, 20, 3);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs);

        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(5, 3), Some(52));
        assert_eq!(cs.hit_test(5, 4), None);
    }

    #[test]
    fn wrapped_line_is_clickable_on_every_row() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("12345678901234567890")); // two rows at width 10
        cl.push_clickable(Line::from("123456789012345"), 42); // two rows
        cl.push_clickable(Line::from("x"), 43);
        let inner = Rect::new(0, 0, 10, 10);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs);

        assert_eq!(cs.hit_test(3, 1), None);
        assert_eq!(cs.hit_test(3, 2), Some(42));
        assert_eq!(cs.hit_test(3, 3), Some(42));
        assert_eq!(cs.hit_test(3, 4), Some(43));
    }

    #[test]
    fn rows_count_wrapped_lines() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("12345678901234567890"));
        cl.push_clickable(Line::from("x"), 1);
        assert_eq!(cl.rows(10), 3);
        assert_eq!(cl.rows(20), 2);
        assert_eq!(cl.rows(0), 21);
    }

    #[test]
    fn empty_line_still_takes_a_row() {
        let mut cl = ClickableList::new();
        cl.push(Line::from(""));
        cl.push_clickable(Line::from("go"), 7);
        let inner = Rect::new(0, 0, 10, 4);
        let mut cs = ClickState::new();
        cl.register_targets(inner, &mut cs);
        assert_eq!(cs.hit_test(0, 1), Some(7));
    }

    #[test]
    fn button_label_shows_key() {
        let mut cl = ClickableList::new();
        cl.push_button('c', "Claim 10", false, 0);
        let lines = cl.into_lines();
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " [C] Claim 10");
    }
}
