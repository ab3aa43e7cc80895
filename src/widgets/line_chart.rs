use anyhow::{Result, ensure};
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Paragraph, Sparkline, Widget},
};

use super::{Panel, format_value, no_data, panel_block, title_width, to_u16};
use crate::{
    analytics::{LineChart, round_half_up},
    style::{self, IconSet},
};

/// Eighth-cell levels of a one-row sparkline.
const SPARK_TOP: u64 = 8;

/// Sparkline of the series, wrapped every `width` points, plus a range line.
pub fn render(chart: &LineChart, width: u16, icons: &IconSet) -> Result<Panel> {
    ensure!(
        chart.labels.len() == chart.values.len(),
        "{}: {} labels but {} values",
        chart.title,
        chart.labels.len(),
        chart.values.len()
    );

    if chart.values.is_empty() {
        return Ok(no_data(&chart.title, icons));
    }

    let min = chart.values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = chart.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let heights = spark_heights(&chart.values, min, max);

    let summary = format!(
        "{}: min {} / max {} over {} points",
        chart.series_label,
        format_value(min),
        format_value(max),
        chart.values.len()
    );

    let columns = usize::from(width.max(1));
    let rows = heights.len().div_ceil(columns);
    let inner_width = columns.max(Line::from(summary.as_str()).width());
    let panel_width = (inner_width + 2).max(title_width(&chart.title));
    let panel_height = rows + 1 + 2;

    let block = panel_block(&chart.title, icons);
    let summary = Paragraph::new(Line::styled(summary, style::LABEL));

    Ok(Panel::new(
        chart.title.clone(),
        to_u16(panel_width),
        to_u16(panel_height),
        |area, buf| {
            let inner = block.inner(area);
            block.render(area, buf);

            for (i, chunk) in heights.chunks(columns).enumerate() {
                let row = Rect::new(
                    inner.x,
                    inner.y.saturating_add(to_u16(i)),
                    to_u16(chunk.len()),
                    1,
                );
                Sparkline::default()
                    .data(chunk)
                    .max(SPARK_TOP)
                    .bar_set(icons.bars.clone())
                    .style(style::BAR)
                    .render(row.intersection(inner), buf);
            }

            let summary_row = Rect::new(
                inner.x,
                inner.y.saturating_add(to_u16(rows)),
                inner.width,
                1,
            );
            summary.render(summary_row.intersection(inner), buf);
        },
    ))
}

/// Sparkline level per value: the minimum draws the lowest visible glyph
/// and the maximum a full cell. A flat series sits at half height.
fn spark_heights(values: &[f64], min: f64, max: f64) -> Vec<u64> {
    values
        .iter()
        .map(|&v| {
            if max > min {
                let scaled = (v - min) / (max - min) * (SPARK_TOP - 1) as f64;
                1 + round_half_up(scaled) as u64
            } else {
                SPARK_TOP / 2
            }
        })
        .collect()
}
