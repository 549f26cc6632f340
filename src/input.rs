//! Input normalization: keyboard keys and taps on registered screen regions.

use ratzilla::ratatui::layout::Rect;

/// Keyboard, mouse and touch input reduced to one type.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A tap on a registered target, carrying its action ID (see `miner::actions`).
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets registered by the last frame, plus the terminal size the
/// DOM grid was laid out with.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    /// Called at the start of every frame; render re-registers what is visible.
    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Register a full-width target on `row`, ignored if the row lies
    /// outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if row >= area.y && row < area.y + area.height {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// The topmost (last registered) target containing the cell.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        self.targets.iter().rev().find_map(|t| {
            let r = &t.rect;
            let inside = col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height;
            inside.then_some(t.action_id)
        })
    }
}

/// Below this many columns the screen stacks panels in one column.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Map a pixel offset inside the grid to a cell index along one axis.
/// `None` when outside the grid or when the grid has no size yet.
fn pixel_to_cell(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if extent <= 0.0 || cells == 0 || offset < 0.0 {
        return None;
    }
    let cell = (offset / (extent / cells as f64)) as u16;
    (cell < cells).then_some(cell)
}

pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    pixel_to_cell(click_y, grid_height, terminal_rows)
}

pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    pixel_to_cell(click_x, grid_width, terminal_cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_test_rows() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 10, 80, 1), 1);
        cs.add_click_target(Rect::new(0, 11, 80, 1), 2);
        assert_eq!(cs.hit_test(5, 10), Some(1));
        assert_eq!(cs.hit_test(5, 11), Some(2));
        assert_eq!(cs.hit_test(5, 12), None);
    }

    #[test]
    fn hit_test_overlap_last_wins() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 5, 80, 1), 1);
        cs.add_click_target(Rect::new(5, 5, 10, 1), 2);
        assert_eq!(cs.hit_test(7, 5), Some(2));
        assert_eq!(cs.hit_test(20, 5), Some(1));
    }

    #[test]
    fn row_target_outside_area_is_ignored() {
        let mut cs = ClickState::new();
        let area = Rect::new(5, 10, 30, 5);
        cs.add_row_target(area, 9, 1);
        cs.add_row_target(area, 15, 2);
        cs.add_row_target(area, 12, 3);
        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(6, 12), Some(3));
        assert_eq!(cs.hit_test(4, 12), None);
    }

    #[test]
    fn clear_drops_targets() {
        let mut cs = ClickState::new();
        cs.add_click_target(Rect::new(0, 1, 80, 1), 1);
        cs.clear_targets();
        assert_eq!(cs.hit_test(0, 1), None);
    }

    #[test]
    fn narrow_layout_threshold() {
        assert!(is_narrow_layout(59));
        assert!(!is_narrow_layout(60));
    }

    #[test]
    fn pixel_conversion() {
        assert_eq!(pixel_y_to_row(0.0, 450.0, 30), Some(0));
        assert_eq!(pixel_y_to_row(15.0, 450.0, 30), Some(1));
        assert_eq!(pixel_y_to_row(449.0, 450.0, 30), Some(29));
        assert_eq!(pixel_y_to_row(450.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(-1.0, 450.0, 30), None);
        assert_eq!(pixel_y_to_row(10.0, 0.0, 30), None);
        assert_eq!(pixel_x_to_col(10.0, 800.0, 80), Some(1));
        assert_eq!(pixel_x_to_col(800.0, 800.0, 80), None);
    }

    #[test]
    fn tap_pipeline_hits_target_row() {
        let mut cs = ClickState::new();
        cs.terminal_cols = 40;
        cs.terminal_rows = 30;
        cs.add_click_target(Rect::new(0, 12, 40, 1), 7);

        let grid_height = 30.0 * 15.0;
        let row = pixel_y_to_row(12.0 * 15.0 + 7.5, grid_height, cs.terminal_rows).unwrap();
        let col = pixel_x_to_col(100.0, 40.0 * 9.0, cs.terminal_cols).unwrap();
        assert_eq!(cs.hit_test(col, row), Some(7));
    }
}
