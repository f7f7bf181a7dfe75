use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::types::ResultRowView;

/// Trailing marker on every result title, standing in for the stock
/// widget's chevron icon.
pub const CHEVRON: &str = "›";

/// Builds the three-line fragment for one result row: linked title with a
/// trailing chevron, digest text, and the target url.
pub fn build_result(url: &str, title: &str, digest: &str) -> ResultRowView {
    let title_line = Line::from(vec![
        Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(CHEVRON.to_string(), Style::default().fg(Color::DarkGray)),
    ]);
    let digest_line = Line::from(Span::styled(
        digest.to_string(),
        Style::default().fg(Color::Gray),
    ));
    let url_line = Line::from(Span::styled(
        url.to_string(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::UNDERLINED),
    ));

    ResultRowView {
        lines: vec![title_line, digest_line, url_line],
    }
}

#[cfg(test)]
mod tests {
    use super::{CHEVRON, build_result};

    fn flatten(row: &super::ResultRowView) -> String {
        row.lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .map(|span| span.content.as_ref())
            .collect()
    }

    #[test]
    fn row_contains_anchor_title_digest_and_chevron() {
        let row = build_result("http://x", "T", "D");
        let text = flatten(&row);

        assert!(text.contains("http://x"));
        assert!(text.contains('T'));
        assert!(text.contains('D'));
        assert!(text.contains(CHEVRON));
    }

    #[test]
    fn title_comes_before_digest_and_url() {
        let row = build_result("https://example.com/a", "Alpha", "first hit");
        assert_eq!(row.lines.len(), 3);
        assert_eq!(row.lines[0].spans[0].content.as_ref(), "Alpha");
        assert_eq!(row.lines[1].spans[0].content.as_ref(), "first hit");
        assert_eq!(
            row.lines[2].spans[0].content.as_ref(),
            "https://example.com/a"
        );
    }
}
