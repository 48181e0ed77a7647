use crate::app::App;
use crate::ui::widgets::cards::detail_lines;
use crate::ui::widgets::popup::centered_rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use review_insights::dashboard::DetailMode;

/// Full item list for the rendered category, drawn over the dashboard.
pub fn render_details(app: &App, f: &mut Frame<'_>) {
    let Some(view) = app
        .dashboard
        .as_ref()
        .and_then(|dashboard| dashboard.detail(DetailMode::Expanded))
    else {
        return;
    };

    let area = centered_rect(90, 90, f.area());
    f.render_widget(Clear, area);

    let mut lines = vec![
        TextLine::from(Span::styled(
            format!("{} items in {}", view.matching, app.time_range.label()),
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(""),
    ];
    lines.extend(detail_lines(&view, app.badge_cursor));

    let block = Block::default()
        .title(format!(" {} ", view.category))
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .title_bottom(
            TextLine::from(" ↑/↓ scroll · ←/→ Space source · Esc close ").centered(),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(paragraph, area);
}
