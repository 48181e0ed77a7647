use crate::app::App;
use crate::ui::widgets::popup::centered_rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use review_insights::TimeAnchor;

const DASHBOARD_KEYS: &[(&str, &str)] = &[
    ("↑/↓  j/k", "Move the bar cursor (hovers the bar)"),
    ("Enter", "Select the bar under the cursor"),
    ("Esc", "Clear the hover"),
    ("o", "Select the uncategorized items"),
    ("t / T", "Next / previous time range"),
    ("1-4  Tab", "Switch data type"),
    ("←/→  Space", "Pick and toggle a source filter"),
    ("PgUp/PgDn", "Scroll the detail panel"),
    ("e", "Open the full item list"),
    ("/", "Search all sources"),
    ("q", "Quit"),
];

const SEARCH_KEYS: &[(&str, &str)] = &[
    ("typing", "Search after a short pause"),
    ("↑/↓", "Walk suggestions"),
    ("Enter", "Run the suggestion or the typed query"),
    ("Tab", "Cycle the result filter"),
    ("PgUp/PgDn", "Scroll results"),
    ("Esc", "Close suggestions, then leave search"),
];

fn key_lines(title: &str, keys: &[(&str, &str)]) -> Vec<TextLine<'static>> {
    let mut lines = vec![TextLine::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    lines.extend(keys.iter().map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(
                format!("  {key:<12}"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw((*action).to_string()),
        ])
    }));
    lines.push(TextLine::from(""));
    lines
}

pub fn render_help_popup(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let mut lines = key_lines("Dashboard", DASHBOARD_KEYS);
    lines.extend(key_lines("Search", SEARCH_KEYS));
    lines.push(TextLine::from(Span::styled(
        format!(
            "Time ranges count back from the {}.",
            match app.anchor {
                TimeAnchor::LatestData => "newest month in the data",
                TimeAnchor::WallClock => "current date",
            }
        ),
        Style::default().fg(Color::Gray),
    )));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(" Help (F1 / Esc to close) ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
