//! Layout helpers shared by the UI components.

use ratatui::prelude::*;

/// Creates a centered rectangular area within a given rectangle.
///
/// This utility function calculates a centered rectangle based on percentage
/// dimensions relative to the parent rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let area = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    area[1]
}

/// Like [`centered_rect`], but the size is clamped between `min` and `max`
/// and never exceeds `r`.
pub fn centered_min_max(percent_x: u16, percent_y: u16, min: Rect, max: Rect, r: Rect) -> Rect {
    let proposed = centered_rect(percent_x, percent_y, r);
    let width = proposed.width.clamp(min.width, max.width.max(min.width)).min(r.width);
    let height = proposed.height.clamp(min.height, max.height.max(min.height)).min(r.height);
    let x = r.x + (r.width - width) / 2;
    let y = r.y + (r.height - height) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max_clamps_then_fits_the_parent() {
        let parent = Rect::new(0, 0, 200, 60);
        let area = centered_min_max(75, 90, Rect::new(0, 0, 60, 14), Rect::new(0, 0, 120, 40), parent);
        assert_eq!(area, Rect::new(40, 10, 120, 40));

        let tiny = Rect::new(0, 0, 40, 10);
        let area = centered_min_max(75, 90, Rect::new(0, 0, 60, 14), Rect::new(0, 0, 120, 40), tiny);
        assert_eq!(area, tiny);
    }
}
