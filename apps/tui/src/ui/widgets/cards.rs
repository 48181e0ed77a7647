use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use review_insights::dashboard::{DetailView, ItemCard, SourceBadge};
use review_insights::search::{SearchOrigin, SearchSource};
use review_insights::text::search_snippet;

use super::text::segment_spans;

fn platform_color(key: &str) -> Color {
    match key {
        "reddit" => Color::Rgb(255, 69, 0),
        "appstore" => Color::Rgb(10, 132, 255),
        "trustpilot" => Color::Rgb(0, 182, 122),
        "microsoftstore" | "windows" => Color::Rgb(0, 120, 212),
        "producthunt" => Color::Rgb(218, 85, 47),
        _ => Color::Gray,
    }
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// One toggle chip per platform; the active one is filled, the cursor is bracketed.
pub fn badge_line(badges: &[SourceBadge], cursor: usize) -> TextLine<'static> {
    let mut spans = vec![Span::styled("Sources: ", muted())];
    for (index, badge) in badges.iter().enumerate() {
        let color = platform_color(&badge.key);
        let style = if badge.active {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        let (open, close) = if index == cursor { ("[", "]") } else { (" ", " ") };
        spans.push(Span::raw(open));
        spans.push(Span::styled(format!("{} {}", badge.key, badge.count), style));
        spans.push(Span::raw(close));
    }
    TextLine::from(spans)
}

pub fn card_lines(card: &ItemCard) -> Vec<TextLine<'static>> {
    let mut lines = Vec::new();

    let mut header = vec![Span::styled(
        format!("[{}] ", card.platform),
        Style::default()
            .fg(platform_color(&card.platform))
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(label) = &card.label {
        header.push(Span::styled(label.clone(), Style::default().fg(Color::Magenta)));
    }
    lines.push(TextLine::from(header));

    if let Some(title) = &card.title {
        lines.push(TextLine::from(Span::styled(
            title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    let mut byline = card.byline.clone();
    if let Some(date) = &card.date {
        byline.push_str(" · ");
        byline.push_str(date);
    }
    lines.push(TextLine::from(Span::styled(byline, muted())));

    if let Some(body) = &card.body {
        lines.push(TextLine::from(segment_spans(body, Style::default())));
    }
    if let Some(url) = &card.url {
        lines.push(TextLine::from(Span::styled(
            url.clone(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
        )));
    }
    lines.push(TextLine::from(""));
    lines
}

/// Summary, badges and cards for the detail panel or the expanded view.
pub fn detail_lines(view: &DetailView, badge_cursor: usize) -> Vec<TextLine<'static>> {
    let mut lines = Vec::new();
    if !view.summary.is_empty() {
        lines.push(TextLine::from(Span::styled(
            view.summary.clone(),
            Style::default().fg(Color::White),
        )));
        lines.push(TextLine::from(""));
    }
    if !view.badges.is_empty() {
        lines.push(badge_line(&view.badges, badge_cursor));
        lines.push(TextLine::from(""));
    }
    if view.cards.is_empty() {
        lines.push(TextLine::from(Span::styled("No items in this range", muted())));
    }
    for card in &view.cards {
        lines.extend(card_lines(card));
    }
    if view.is_truncated() {
        lines.push(TextLine::from(Span::styled(
            format!(
                "Showing {} of {} items. Press e for the full list.",
                view.cards.len(),
                view.matching
            ),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines
}

/// A search hit: origin line, optional title, then the highlighted snippet.
pub fn search_result_lines(source: &SearchSource, query: &str) -> Vec<TextLine<'static>> {
    let key = source.platform_key().to_string();
    let origin = match &source.origin {
        SearchOrigin::Reddit {
            kind,
            community,
            upvotes,
        } => {
            let mut parts = Vec::new();
            if let Some(community) = community {
                parts.push(format!("r/{community}"));
            }
            parts.push(kind.as_str().to_string());
            parts.push(format!("{upvotes} upvotes"));
            parts.join(" · ")
        }
        SearchOrigin::Review { platform, rating } => match rating {
            Some(rating) => format!("{platform} · {rating}/5"),
            None => platform.clone(),
        },
    };

    let mut meta = origin;
    if let Some(author) = &source.author {
        meta.push_str(" · ");
        meta.push_str(author);
    }
    if let Some(date) = source.date {
        meta.push_str(" · ");
        meta.push_str(&date.format("%b %-d, %Y").to_string());
    }

    let mut lines = vec![TextLine::from(vec![
        Span::styled(
            format!("[{key}] "),
            Style::default()
                .fg(platform_color(&key))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(meta, muted()),
    ])];
    if let Some(title) = &source.title {
        lines.push(TextLine::from(segment_spans(
            &search_snippet(title, query),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(TextLine::from(segment_spans(
        &search_snippet(&source.body, query),
        Style::default(),
    )));
    if let Some(url) = &source.url {
        lines.push(TextLine::from(Span::styled(
            url.clone(),
            Style::default().fg(Color::Blue),
        )));
    }
    lines.push(TextLine::from(""));
    lines
}
