use anyhow::{Result, ensure};
use ratatui::{
    layout::Direction,
    text::Line,
    widgets::{Bar, BarChart as BarWidget, BarGroup, Widget},
};

use super::{Panel, format_value, no_data, panel_block, title_width, to_u16};
use crate::{
    analytics::{BarChart, round_half_up},
    style::{self, IconSet},
};

/// Horizontal bar chart with at least `width` cells for the longest bar.
pub fn render(chart: &BarChart, width: u16, icons: &IconSet) -> Result<Panel> {
    ensure!(
        chart.labels.len() == chart.values.len(),
        "{}: {} labels but {} values",
        chart.title,
        chart.labels.len(),
        chart.values.len()
    );

    if chart.is_empty() {
        return Ok(no_data(&chart.title, icons));
    }

    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(&chart.values)
        .map(|(label, value)| {
            let bar = Bar::default().label(Line::from(label.as_str()));
            match value {
                Some(v) if v.is_finite() => {
                    bar.value(bar_length(*v)).text_value(format_value(*v))
                }
                _ => bar.value(0).text_value("-".to_string()),
            }
        })
        .collect();

    let label_width = chart
        .labels
        .iter()
        .map(|l| Line::from(l.as_str()).width())
        .max()
        .unwrap_or(0);
    let panel_width =
        (label_width + 1 + usize::from(width) + 2).max(title_width(&chart.title));
    let panel_height = bars.len() + 2;

    let widget = BarWidget::default()
        .block(panel_block(&chart.title, icons).title_bottom(chart.series_label.clone()))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .bar_set(icons.bars.clone())
        .bar_style(style::BAR)
        .label_style(style::LABEL)
        .data(BarGroup::default().bars(&bars));

    Ok(Panel::new(
        chart.title.clone(),
        to_u16(panel_width),
        to_u16(panel_height),
        |area, buf| widget.render(area, buf),
    ))
}

/// Bar length for a value. Bars cannot be negative.
fn bar_length(value: f64) -> u64 {
    round_half_up(value.max(0.0)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::PresentationStyle;

    fn chart(labels: &[&str], values: &[Option<f64>]) -> BarChart {
        BarChart {
            title: "Top Airlines by Average Price".to_string(),
            series_label: "Avg Price (₹)".to_string(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_one_row_per_bar_inside_border() {
        let icons = PresentationStyle::Compact.icons();
        let panel = render(
            &chart(&["IndiGo", "Air India"], &[Some(5000.0), Some(2500.0)]),
            10,
            icons,
        )
        .unwrap();

        assert_eq!(panel.height(), 4);
        assert_eq!(
            usize::from(panel.width()),
            title_width("Top Airlines by Average Price")
        );

        let lines = panel.lines();
        assert!(lines[0].contains("Top Airlines by Average Price"));
        assert!(lines[1].contains("IndiGo"));
        assert!(lines[2].contains("Air India"));
        assert!(lines[3].contains("Avg Price"));
    }

    #[test]
    fn test_larger_value_draws_longer_bar() {
        let icons = PresentationStyle::Compact.icons();
        let panel = render(
            &chart(&["A", "B"], &[Some(5000.0), Some(1000.0)]),
            20,
            icons,
        )
        .unwrap();

        let lines = panel.lines();
        let filled = |line: &str| line.matches('#').count();
        assert!(filled(&lines[1]) > filled(&lines[2]));
    }

    #[test]
    fn test_empty_chart_says_no_data() {
        let icons = PresentationStyle::Rich.icons();
        let panel = render(&chart(&[], &[]), 10, icons).unwrap();
        assert_eq!(panel.lines()[1].trim_matches(['│', ' ']), "No data");
    }

    #[test]
    fn test_mismatched_series_is_an_error() {
        let icons = PresentationStyle::Rich.icons();
        let result = render(&chart(&["A", "B"], &[Some(1.0)]), 10, icons);
        assert!(result.is_err());
    }

    #[test]
    fn test_bar_length_rounds_and_floors_at_zero() {
        assert_eq!(bar_length(4999.5), 5000);
        assert_eq!(bar_length(-20.0), 0);
        assert_eq!(bar_length(125.4), 125);
    }
}
