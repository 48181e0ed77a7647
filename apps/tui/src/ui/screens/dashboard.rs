use crate::app::App;
use crate::ui::widgets::cards::detail_lines;
use crate::ui::widgets::charts::{render_category_bars, render_time_series};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use review_insights::dashboard::{Dashboard, DetailMode};
use review_insights::{DataKind, TimeRange};
use throbber_widgets_tui::Throbber;

pub fn render_dashboard(app: &App, f: &mut Frame<'_>) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Data kind and range tabs
            Constraint::Min(10),   // Charts and details
            Constraint::Length(3), // Status area
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title_section(app, f, main_layout[0]);
    render_content_section(app, f, main_layout[1]);
    render_status_section(app, f, main_layout[2]);
    render_shortcuts(f, main_layout[3]);
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Review Insights ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area.inner(Margin::new(1, 1)));

    let kinds = DataKind::ALL
        .iter()
        .map(|kind| TextLine::from(format!("{} {}", kind.index() + 1, kind.label())))
        .collect::<Vec<_>>();
    let kind_tabs = Tabs::new(kinds)
        .select(app.kind.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(kind_tabs, split[0]);

    let ranges = TimeRange::ALL
        .iter()
        .map(|range| TextLine::from(range.label()))
        .collect::<Vec<_>>();
    let range_tabs = Tabs::new(ranges)
        .select(app.time_range.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(range_tabs, split[1]);
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let split = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    match (&app.dashboard, &app.load_error) {
        (_, Some(error)) => {
            render_load_error(app.kind, error, f, split[0]);
            render_placeholder("Details", "Nothing to show", f, split[1]);
        }
        (Some(dashboard), None) => {
            render_charts(app, dashboard, f, split[0]);
            render_detail_panel(app, dashboard, f, split[1]);
        }
        (None, None) => {
            render_spinner(app, &format!("Loading {}...", app.kind.label()), f, split[0]);
            render_placeholder("Details", "", f, split[1]);
        }
    }
}

fn render_load_error(kind: DataKind, error: &str, f: &mut Frame<'_>, area: Rect) {
    let lines = vec![
        TextLine::from(Span::styled(
            format!("Could not load {}", kind.label()),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(""),
        TextLine::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))),
        TextLine::from(""),
        TextLine::from(Span::styled(
            "Press 1-4 or Tab to switch data type.",
            Style::default().fg(Color::Gray),
        )),
    ];
    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("Charts")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_placeholder(title: &str, message: &str, f: &mut Frame<'_>, area: Rect) {
    let paragraph = Paragraph::new(message.to_string())
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_spinner(app: &App, label: &str, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let throbber = Throbber::default()
        .label(label.to_string())
        .style(Style::default().fg(Color::Gray))
        .throbber_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let mut state = app.throbber.clone();
    f.render_stateful_widget(throbber, Rect { height: 1, ..inner }, &mut state);
}

fn render_charts(app: &App, dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Length(1),
            Constraint::Min(6),
        ])
        .split(area);

    let bars = dashboard.bars();
    let title = format!("{} by category", app.kind.label());
    render_category_bars(&bars, app.bar_cursor, &title, f, split[0]);
    render_other_control(dashboard, f, split[1]);
    render_time_series(dashboard.chart(), f, split[2]);
}

fn render_other_control(dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    let Some(other) = dashboard.data().other_category() else {
        return;
    };
    let count = dashboard.window().filter(&other.items).len();
    let active = dashboard.state().selection.is_other();
    let style = if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let line = TextLine::from(vec![
        Span::styled(" o ", Style::default().fg(Color::Yellow)),
        Span::styled(format!(" Other ({count}) "), style),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_detail_panel(app: &App, dashboard: &Dashboard, f: &mut Frame<'_>, area: Rect) {
    if dashboard.is_loading() {
        let label = format!("Loading {}...", dashboard.state().selection.name());
        render_spinner(app, &label, f, area);
        return;
    }

    let Some(view) = dashboard.detail(DetailMode::Inline) else {
        render_placeholder("Details", "Select a category", f, area);
        return;
    };

    let title = format!(
        " {} · {} of {} items ",
        view.category, view.matching, view.in_window
    );
    let paragraph = Paragraph::new(Text::from(detail_lines(&view, app.badge_cursor)))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.is_loading() {
        let throbber = Throbber::default()
            .label(app.status_message.clone())
            .throbber_style(Style::default().fg(Color::Yellow));
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, inner, &mut state);
    } else {
        let status = Paragraph::new(Span::styled(
            app.status_message.clone(),
            Style::default().fg(Color::Gray),
        ));
        f.render_widget(status, inner);
    }
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let hints = [
        ("↑/↓", "hover"),
        ("Enter", "select"),
        ("o", "other"),
        ("t", "range"),
        ("1-4", "data"),
        ("←/→ Space", "source"),
        ("e", "expand"),
        ("/", "search"),
        ("F1", "help"),
        ("q", "quit"),
    ];
    let spans = hints
        .iter()
        .flat_map(|(keys, action)| {
            [
                Span::styled(*keys, key),
                Span::raw(format!(": {action}  ")),
            ]
        })
        .collect::<Vec<_>>();
    f.render_widget(
        Paragraph::new(TextLine::from(spans)).alignment(Alignment::Center),
        area,
    );
}
