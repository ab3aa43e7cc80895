use anyhow::{Result, ensure};
use ratatui::{
    layout::Constraint,
    text::Line,
    widgets::{Cell, Row, Table, Widget},
};

use super::{Panel, no_data, panel_block, title_width, to_u16};
use crate::{
    analytics::TableModel,
    style::{self, IconSet},
};

/// Bordered table with a marker column. Highlighted rows carry the marker
/// and the highlight style.
pub fn render(title: &str, table: &TableModel, icons: &IconSet) -> Result<Panel> {
    if table.is_empty() {
        return Ok(no_data(title, icons));
    }

    let columns = table.headers.len();
    for (i, row) in table.rows.iter().enumerate() {
        ensure!(
            row.len() == columns,
            "row {i} has {} cells for {columns} columns",
            row.len()
        );
    }

    let text_width = |s: &str| Line::from(s).width();
    let marker_width = text_width(icons.top_row);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            table
                .rows
                .iter()
                .map(|row| text_width(&row[c]))
                .chain(std::iter::once(text_width(&table.headers[c])))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(table.headers.iter().map(|h| Cell::from(h.as_str()))),
    )
    .style(style::HEADER);

    let rows: Vec<Row> = table
        .rows
        .iter()
        .zip(table.highlighted.iter().copied().chain(std::iter::repeat(false)))
        .map(|(cells, highlighted)| {
            let marker = if highlighted { icons.top_row } else { "" };
            let row = Row::new(
                std::iter::once(Cell::from(marker))
                    .chain(cells.iter().map(|c| Cell::from(c.as_str()))),
            );
            if highlighted {
                row.style(style::HIGHLIGHT)
            } else {
                row
            }
        })
        .collect();

    let constraints: Vec<Constraint> = std::iter::once(marker_width)
        .chain(widths.iter().copied())
        .map(|w| Constraint::Length(to_u16(w)))
        .collect();

    // One spacing cell between neighbouring columns
    let inner_width = marker_width + widths.iter().sum::<usize>() + columns;
    let panel_width = (inner_width + 2).max(title_width(title));
    let panel_height = table.rows.len() + 1 + 2;

    let widget = Table::new(rows, constraints)
        .header(header)
        .column_spacing(1)
        .block(panel_block(title, icons));

    Ok(Panel::new(
        title,
        to_u16(panel_width),
        to_u16(panel_height),
        |area, buf| Widget::render(widget, area, buf),
    ))
}
