use ratatui::Frame;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::app::{AppState, Mode};
use crate::query::ProviderKind;

use super::layout::UiLayout;

pub fn draw_chrome(
    frame: &mut Frame<'_>,
    layout: UiLayout,
    app: &AppState,
    provider: ProviderKind,
    index_label: &str,
    segment: Option<&str>,
) {
    let mode = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Overlay => "SEARCH",
    };

    let mut left = format!("{index_label} | provider {}", provider.id());
    if let Some(segment) = segment {
        left.push_str(" | ");
        left.push_str(segment);
    }
    if !app.status.message.is_empty() {
        left.push_str(" | ");
        left.push_str(&app.status.message);
    }

    let width = layout.status.width as usize;
    let padding = width.saturating_sub(left.width() + mode.width());
    let line = Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(padding)),
        Span::styled(mode.to_string(), Style::default().fg(Color::Cyan)),
    ]);

    frame.render_widget(Paragraph::new(line), layout.status);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::app::AppState;
    use crate::query::ProviderKind;
    use crate::ui::split_layout;

    use super::draw_chrome;

    #[test]
    fn chrome_renders_status_without_panic() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).expect("test terminal should initialize");
        let mut app = AppState::default();
        app.status.message = "search opened".to_string();

        terminal
            .draw(|frame| {
                let layout = split_layout(Rect::new(0, 0, 80, 24));
                draw_chrome(
                    frame,
                    layout,
                    &app,
                    ProviderKind::Hexo,
                    "site.json",
                    Some("1\u{2013}10 of 42"),
                );
            })
            .expect("draw should pass");
    }
}
