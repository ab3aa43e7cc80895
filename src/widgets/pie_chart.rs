use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Gauge, Paragraph, Widget},
};

use super::{Panel, no_data, panel_block, title_width, to_u16};
use crate::{
    analytics::PieChart,
    style::{self, IconSet},
};

/// One gauge per slice showing its share of the total.
pub fn render(chart: &PieChart, width: u16, icons: &IconSet) -> Panel {
    let total = chart.total();
    if total == 0 {
        return no_data(&chart.title, icons);
    }

    let label_width = chart
        .slices
        .iter()
        .map(|(label, _)| Line::from(label.as_str()).width())
        .max()
        .unwrap_or(0);
    let panel_width = (label_width + 1 + usize::from(width) + 2).max(title_width(&chart.title));
    let panel_height = chart.slices.len() + 2;

    let block = panel_block(&chart.title, icons);

    Panel::new(
        chart.title.clone(),
        to_u16(panel_width),
        to_u16(panel_height),
        |area, buf| {
            let inner = block.inner(area);
            block.render(area, buf);

            for (i, (label, count)) in chart.slices.iter().enumerate() {
                let row = Rect::new(inner.x, inner.y.saturating_add(to_u16(i)), inner.width, 1)
                    .intersection(inner);
                let [label_area, gauge_area] = Layout::horizontal([
                    Constraint::Length(to_u16(label_width + 1)),
                    Constraint::Min(0),
                ])
                .areas(row);

                Paragraph::new(Line::styled(label.as_str(), style::LABEL)).render(label_area, buf);

                let share = share_of(*count, total);
                Gauge::default()
                    .ratio(share)
                    .label(format!("{:.1}% ({count})", share * 100.0))
                    .use_unicode(icons.unicode_gauge)
                    .gauge_style(style::GAUGE)
                    .render(gauge_area, buf);
            }
        },
    )
}

/// Fraction of `total`, kept within `0..=1` for the gauge.
fn share_of(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::PresentationStyle;

    fn chart(slices: &[(&str, u64)]) -> PieChart {
        PieChart {
            title: "Flights by Stops".to_string(),
            series_label: "Flights by Stops".to_string(),
            slices: slices.iter().map(|(l, c)| (l.to_string(), *c)).collect(),
        }
    }

    #[test]
    fn test_one_gauge_row_per_slice() {
        let icons = PresentationStyle::Compact.icons();
        let panel = render(&chart(&[("0", 1), ("1", 3)]), 20, icons);
        let lines = panel.lines();

        assert_eq!(panel.height(), 4);
        assert!(lines[1].starts_with("|0 "));
        assert!(lines[1].contains("25.0% (1)"));
        assert!(lines[2].starts_with("|1 "));
        assert!(lines[2].contains("75.0% (3)"));
    }

    #[test]
    fn test_share_of() {
        assert_eq!(share_of(1, 4), 0.25);
        assert_eq!(share_of(4, 4), 1.0);
        assert_eq!(share_of(0, 0), 0.0);
    }

    #[test]
    fn test_zero_total_says_no_data() {
        let icons = PresentationStyle::Compact.icons();
        for slices in [&[("0", 0)][..], &[][..]] {
            let lines = render(&chart(slices), 8, icons).lines();
            assert_eq!(lines[1].trim_matches(['|', ' ']), "No data");
        }
    }
}
