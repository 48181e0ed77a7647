use ratatui::layout::{Alignment, Direction, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
};
use ratatui::Frame;
use review_insights::dashboard::{BarEntry, BarVisual, LineRole, TimeSeriesChart};

const BAR_DEFAULT: Color = Color::Rgb(70, 110, 180);
const BAR_HOVERED: Color = Color::Rgb(140, 180, 240);
const BAR_SELECTED: Color = Color::Yellow;
const LINE_HOVER: Color = Color::Cyan;

fn bar_style(visual: BarVisual) -> (Style, Style) {
    match visual {
        BarVisual::Selected => (
            Style::default().fg(BAR_SELECTED),
            Style::default()
                .fg(BAR_SELECTED)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        BarVisual::Hovered => (
            Style::default().fg(BAR_HOVERED),
            Style::default().fg(BAR_HOVERED),
        ),
        BarVisual::Default => (
            Style::default().fg(BAR_DEFAULT),
            Style::default().fg(Color::Gray),
        ),
    }
}

fn empty_panel(f: &mut Frame<'_>, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

/// Horizontal bars in data order. `cursor` marks the keyboard row.
pub fn render_category_bars(
    bars: &[BarEntry],
    cursor: Option<usize>,
    title: &str,
    f: &mut Frame<'_>,
    area: Rect,
) {
    if bars.is_empty() {
        empty_panel(f, area, title, "No categories");
        return;
    }

    let label_width = bars
        .iter()
        .map(|bar| bar.name.chars().count())
        .max()
        .unwrap_or(0);

    let chart_bars: Vec<Bar<'_>> = bars
        .iter()
        .map(|bar| {
            let (fill, label) = bar_style(bar.visual);
            let marker = if cursor == Some(bar.index) { '>' } else { ' ' };
            Bar::default()
                .value(bar.count as u64)
                .label(TextLine::from(Span::styled(
                    format!("{marker} {:<label_width$}", bar.name),
                    label,
                )))
                .text_value(bar.count.to_string())
                .style(fill)
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(fill.fg.unwrap_or(BAR_DEFAULT)),
                )
        })
        .collect();

    let max_value = bars.iter().map(|bar| bar.count as u64).max().unwrap_or(0).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title.to_string())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&chart_bars))
        .max(max_value)
        .bar_gap(0)
        .bar_width(1);

    f.render_widget(chart, area);
}

fn axis_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.clone())],
        [first, .., last] if labels.len() < 5 => {
            vec![Span::raw(first.clone()), Span::raw(last.clone())]
        }
        [first, .., last] => vec![
            Span::raw(first.clone()),
            Span::raw(labels[labels.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
    }
}

/// Line chart of the selected category plus the hover overlay, if any.
#[allow(clippy::cast_precision_loss)]
pub fn render_time_series(chart: &TimeSeriesChart, f: &mut Frame<'_>, area: Rect) {
    let title = "Monthly trend";
    let labels = chart.labels();
    if labels.is_empty() {
        empty_panel(f, area, title, "No dated items");
        return;
    }

    let points: Vec<(LineRole, String, Vec<(f64, f64)>)> = chart
        .lines()
        .map(|line| {
            let data = line
                .data
                .iter()
                .enumerate()
                .map(|(index, value)| (index as f64, f64::from(*value)))
                .collect();
            (line.role, line.name.clone(), data)
        })
        .collect();

    let datasets: Vec<Dataset<'_>> = points
        .iter()
        .map(|(role, name, data)| {
            let color = match role {
                LineRole::Selected => BAR_SELECTED,
                LineRole::Hover => LINE_HOVER,
            };
            Dataset::default()
                .name(name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color))
                .data(data)
        })
        .collect();

    let x_max = (labels.len().saturating_sub(1) as f64).max(1.0);
    let top = chart.max_value();
    let y_max = f64::from(top.max(1));

    let line_chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(axis_labels(labels)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(top.to_string())]),
        );

    f.render_widget(line_chart, area);
}
