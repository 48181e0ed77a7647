use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use review_insights::text::Segment;

pub fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Styled spans for highlight segments; plain runs keep `base`.
pub fn segment_spans(segments: &[Segment], base: Style) -> Vec<Span<'static>> {
    segments
        .iter()
        .filter(|segment| !segment.text.is_empty())
        .map(|segment| {
            let style = if segment.highlight {
                highlight_style()
            } else {
                base
            };
            Span::styled(segment.text.clone(), style)
        })
        .collect()
}
