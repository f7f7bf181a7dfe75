use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiLayout {
    pub content: Rect,
    pub status: Rect,
}

pub fn split_layout(area: Rect) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    UiLayout {
        content: chunks[0],
        status: chunks[1],
    }
}

pub(crate) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.max(1).min(area.width);
    let height = height.max(1).min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::{centered_rect, split_layout};

    #[test]
    fn split_layout_reserves_one_status_row() {
        let layout = split_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.content.height, 23);
        assert_eq!(layout.status.height, 1);
        assert_eq!(layout.status.y, 23);
    }

    #[test]
    fn centered_rect_clamps_to_the_containing_area() {
        let area = Rect::new(0, 0, 20, 10);
        let popup = centered_rect(area, 40, 40);
        assert_eq!(popup, area);

        let small = centered_rect(area, 10, 4);
        assert_eq!(small, Rect::new(5, 3, 10, 4));
    }
}
