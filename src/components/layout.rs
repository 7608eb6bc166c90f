//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen areas shared by the catalog and featured screens
pub struct MainLayout {
    pub header: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub status: Option<Rect>,
    pub help: Rect,
}

/// Areas inside the lab view
pub struct LabLayout {
    pub header: Rect,
    pub tabs: Rect,
    pub body: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout
pub fn calculate_main_layout(area: Rect, has_status: bool) -> MainLayout {
    // Vertical: header + body + (optional status) + help bar
    let mut constraints = vec![Constraint::Length(1), Constraint::Min(0)];
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // Sidebar (28%) and content (72%)
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(28), Constraint::Percentage(72)])
        .split(rows[1]);

    let (status, help) = if has_status {
        (Some(rows[2]), rows[3])
    } else {
        (None, rows[2])
    };

    MainLayout {
        header: rows[0],
        sidebar: columns[0],
        content: columns[1],
        status,
        help,
    }
}

/// Split the content area for an open lab: title block, tab bar, tab body
pub fn calculate_lab_layout(area: Rect) -> LabLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    LabLayout {
        header: chunks[0],
        tabs: chunks[1],
        body: chunks[2],
    }
}
