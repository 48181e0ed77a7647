use crate::app::App;
use crate::ui::widgets::cards::search_result_lines;
use crate::ui::widgets::popup::dropdown_rect;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use review_insights::search::{SearchFilter, MAX_SEARCH_RESULTS};
use review_insights::text::MIN_QUERY_CHARS;
use throbber_widgets_tui::Throbber;

pub fn render_search(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Filters
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_input(app, f, layout[0]);
    render_filters(app, f, layout[1]);
    render_results(app, f, layout[2]);
    render_shortcuts(f, layout[3]);
    render_suggestions(app, f, layout[0]);
}

fn render_input(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut spans = vec![
        Span::styled("> ", Style::default().fg(Color::Yellow)),
        Span::raw(app.search.input().to_string()),
        Span::styled("▏", Style::default().fg(Color::Yellow)),
    ];
    if app.search.next_deadline().is_some() {
        spans.push(Span::styled("  searching…", Style::default().fg(Color::DarkGray)));
    }

    let paragraph = Paragraph::new(TextLine::from(spans)).block(
        Block::default()
            .title(" Search sources ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(paragraph, area);
}

fn render_filters(app: &App, f: &mut Frame<'_>, area: Rect) {
    let active = app.search.filter();
    let mut spans = vec![Span::styled("Filter: ", Style::default().fg(Color::DarkGray))];
    for (filter, count) in app.search.available_filters() {
        let style = if &filter == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} {count} ", filter.label()), style));
        spans.push(Span::raw(" "));
    }
    // an active filter with no hits this query stays visible so it can be cleared
    let listed = app
        .search
        .available_filters()
        .iter()
        .any(|(candidate, _)| candidate == active);
    if *active != SearchFilter::All && !listed {
        spans.push(Span::styled(
            format!(" {} 0 ", active.label()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ));
    }
    f.render_widget(Paragraph::new(TextLine::from(spans)), area);
}

fn render_results(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    if let Some(error) = &app.search_error {
        let paragraph = Paragraph::new(Span::styled(
            format!("Could not load search sources: {error}"),
            Style::default().fg(Color::Red),
        ))
        .block(block.title(" Results "))
        .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
        return;
    }

    let Some(results) = app.search.results() else {
        let inner = block.inner(area);
        f.render_widget(block.title(" Results "), area);
        let throbber = Throbber::default()
            .label("Loading sources...")
            .throbber_style(Style::default().fg(Color::Yellow));
        let mut state = app.throbber.clone();
        f.render_stateful_widget(throbber, Rect { height: 1, ..inner }, &mut state);
        return;
    };

    let visible = app.search.visible();
    let searched = results.query.chars().count() >= MIN_QUERY_CHARS;
    let capped = searched && results.hits.len() >= MAX_SEARCH_RESULTS;
    let title = if capped {
        format!(" {} shown · first {MAX_SEARCH_RESULTS} matches ", visible.len())
    } else {
        format!(" {} shown · {} matches ", visible.len(), results.counts.total)
    };

    if visible.is_empty() {
        let message = if searched {
            format!("No sources mention \"{}\"", results.query)
        } else {
            "No sources loaded".to_string()
        };
        let paragraph = Paragraph::new(message)
            .block(block.title(title))
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let lines: Vec<TextLine<'static>> = visible
        .iter()
        .flat_map(|source| search_result_lines(source, &results.query))
        .collect();
    let paragraph = Paragraph::new(Text::from(lines))
        .block(block.title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.search_scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_suggestions(app: &App, f: &mut Frame<'_>, input_area: Rect) {
    let suggestions = app.search.autocomplete().suggestions();
    if suggestions.is_empty() {
        return;
    }

    let height = u16::try_from(suggestions.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area = dropdown_rect(input_area.inner(Margin::new(1, 0)), height, f.area());
    f.render_widget(Clear, area);

    let items: Vec<ListItem<'_>> = suggestions
        .iter()
        .map(|suggestion| ListItem::new(suggestion.label.clone()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(app.search.autocomplete().selected());
    f.render_stateful_widget(list, area, &mut state);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let line = TextLine::from(vec![
        Span::styled("↑/↓", key),
        Span::raw(": suggestions  "),
        Span::styled("Enter", key),
        Span::raw(": search  "),
        Span::styled("Tab", key),
        Span::raw(": filter  "),
        Span::styled("PgUp/PgDn", key),
        Span::raw(": scroll  "),
        Span::styled("Esc", key),
        Span::raw(": back"),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
