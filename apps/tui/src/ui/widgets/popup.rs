use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rect of `percent_x` by `percent_y` centered inside `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Rect of fixed height directly under `anchor`, clipped to `bounds`.
pub fn dropdown_rect(anchor: Rect, height: u16, bounds: Rect) -> Rect {
    let y = anchor.y.saturating_add(anchor.height);
    let available = bounds.y.saturating_add(bounds.height).saturating_sub(y);
    Rect {
        x: anchor.x,
        y,
        width: anchor.width,
        height: height.min(available),
    }
}
