use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::overlay::OverlayView;

use super::layout::centered_rect;

pub fn draw_search_overlay(frame: &mut Frame<'_>, area: Rect, view: &OverlayView) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let popup_width = area.width.min(76);
    let popup_height = area.height.clamp(9, 26);
    let popup = centered_rect(area, popup_width, popup_height);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" Search ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    if inner.width == 0 || inner.height < 4 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Input
            Constraint::Length(1), // Loading bar
            Constraint::Min(1),    // Results
            Constraint::Length(2), // Footer: metadata/nav + error/brand
        ])
        .split(inner);

    let input_line = build_overlay_input_line(&view.input, view.cursor, chunks[0].width as usize);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    let loading_line = build_loading_line(view, chunks[1].width as usize);
    frame.render_widget(Paragraph::new(loading_line), chunks[1]);

    draw_results(frame, chunks[2], view);
    draw_footer(frame, chunks[3], view);
}

/// The loading bar doubles as the separator under the input: a filled
/// portion proportional to the load percent while a query is in flight, a
/// plain rule otherwise.
fn build_loading_line(view: &OverlayView, width: usize) -> Line<'static> {
    if !view.loading_visible {
        return Line::from(Span::styled(
            "\u{2500}".repeat(width),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let filled = width * usize::from(view.loading_percent.min(100)) / 100;
    Line::from(vec![
        Span::styled("\u{2501}".repeat(filled), Style::default().fg(Color::Cyan)),
        Span::styled(
            "\u{2500}".repeat(width.saturating_sub(filled)),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

fn draw_results(frame: &mut Frame<'_>, area: Rect, view: &OverlayView) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let mut lines = Vec::new();
    for row in view.rows.iter().skip(view.scroll_top) {
        lines.extend(row.lines.iter().cloned());
        lines.push(Line::default());
    }

    let mut paragraph = Paragraph::new(lines);
    if !view.results_loaded {
        // Stale rows stay dimmed until the in-flight query lands.
        paragraph = paragraph.style(Style::default().fg(Color::DarkGray));
    }
    frame.render_widget(paragraph, area);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, view: &OverlayView) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let width = area.width as usize;

    let metadata = view
        .metadata
        .map(|range| format!("{}\u{2013}{} of {}", range.first, range.last, range.total))
        .unwrap_or_default();

    let prev_style = if view.prev_available {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let next_style = if view.next_available {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let prev_text = "\u{2039} PREV";
    let next_text = "NEXT \u{203a}";
    let nav_width = prev_text.width() + 2 + next_text.width();
    let padding = width.saturating_sub(metadata.width() + nav_width);

    let nav_line = Line::from(vec![
        Span::raw(metadata),
        Span::raw(" ".repeat(padding)),
        Span::styled(prev_text, prev_style),
        Span::raw("  "),
        Span::styled(next_text, next_style),
    ]);

    let detail_line = if let Some(error) = &view.error {
        Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(brand) = &view.brand {
        Line::from(Span::styled(
            format!("powered by {} \u{00b7} {}", brand.provider.id(), brand.url),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(vec![nav_line, detail_line]), area);
}

/// Input line with a software caret, so the terminal cursor can stay
/// hidden while the overlay is up. Scrolls long input so the caret is
/// always visible.
fn build_overlay_input_line(input: &str, cursor: usize, width: usize) -> Line<'static> {
    let prefix_spans = vec![
        Span::raw(" ".to_string()),
        Span::styled("> ".to_string(), Style::default().fg(Color::White)),
    ];
    let prefix_width = 3;
    let max_text_width = width.saturating_sub(prefix_width);

    let chars: Vec<char> = input.chars().collect();
    let char_count = chars.len();
    let cursor = cursor.min(char_count);

    let mut start = 0usize;
    if max_text_width > 0 {
        if cursor >= max_text_width {
            start = cursor.saturating_sub(max_text_width.saturating_sub(1));
        }
        if start > char_count {
            start = char_count;
        }
    } else {
        start = char_count;
    }

    let text_width = max_text_width.max(1);
    let end = (start + text_width).min(char_count);
    let mut visible: Vec<char> = chars[start..end].to_vec();
    if visible.len() < text_width {
        visible.extend(std::iter::repeat_n(' ', text_width - visible.len()));
    }

    let caret_idx = cursor
        .saturating_sub(start)
        .min(text_width.saturating_sub(1));

    let mut spans = prefix_spans;
    for (idx, ch) in visible.into_iter().enumerate() {
        if idx == caret_idx {
            spans.push(Span::styled(
                ch.to_string(),
                Style::default().add_modifier(Modifier::REVERSED),
            ));
        } else {
            spans.push(Span::raw(ch.to_string()));
        }
    }
    Line::from(spans)
}
