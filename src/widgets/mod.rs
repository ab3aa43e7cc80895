//! Ratatui renderers for the dashboard's charts and tables, and the slot that
//! owns a drawn chart between renders.

pub mod bar_chart;
pub mod line_chart;
pub mod pie_chart;
pub mod table;

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::style::{self, IconSet};

/// A drawn chart that holds resources until released.
pub trait ChartHandle {
    fn release(&mut self);
}

/// Single-owner slot for one chart.
///
/// `replace_with` releases the current chart before the next one is created,
/// so at most one live chart exists per slot. Dropping the slot releases it
/// as well.
#[derive(Debug)]
pub struct ChartSlot<H: ChartHandle> {
    current: Option<H>,
}

impl<H: ChartHandle> Default for ChartSlot<H> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<H: ChartHandle> ChartSlot<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&H> {
        self.current.as_ref()
    }

    pub fn is_occupied(&self) -> bool {
        self.current.is_some()
    }

    /// Release the installed chart, then install the one built by `create`.
    ///
    /// If `create` fails the slot is left empty.
    pub fn replace_with<F, E>(&mut self, create: F) -> Result<&H, E>
    where
        F: FnOnce() -> Result<H, E>,
    {
        self.release();
        let handle = create()?;
        Ok(&*self.current.insert(handle))
    }

    pub fn release(&mut self) {
        if let Some(mut old) = self.current.take() {
            old.release();
        }
    }
}

impl<H: ChartHandle> Drop for ChartSlot<H> {
    fn drop(&mut self) {
        self.release();
    }
}

/// A titled region rendered once into its own cell buffer.
///
/// The buffer is the cached drawing; frames copy it instead of re-running
/// the widget. Releasing drops the cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    title: String,
    buffer: Buffer,
}

impl Panel {
    /// Render into a fresh `width` x `height` buffer.
    pub fn new(
        title: impl Into<String>,
        width: u16,
        height: u16,
        draw: impl FnOnce(Rect, &mut Buffer),
    ) -> Self {
        let mut buffer = Buffer::empty(Rect::new(0, 0, width, height));
        draw(buffer.area, &mut buffer);
        Self {
            title: title.into(),
            buffer,
        }
    }

    /// Bordered paragraph sized to its content.
    pub fn text(title: &str, lines: Vec<Line<'static>>, icons: &IconSet) -> Self {
        let width = lines
            .iter()
            .map(Line::width)
            .max()
            .unwrap_or(0)
            .saturating_add(2)
            .max(title_width(title));
        let height = lines.len() + 2;
        let paragraph = Paragraph::new(lines).block(panel_block(title, icons));
        Self::new(title, to_u16(width), to_u16(height), |area, buf| {
            paragraph.render(area, buf)
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn width(&self) -> u16 {
        self.buffer.area.width
    }

    pub fn height(&self) -> u16 {
        self.buffer.area.height
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn is_released(&self) -> bool {
        self.buffer.area.is_empty()
    }

    /// Plain text of every row, trailing blanks trimmed.
    pub fn lines(&self) -> Vec<String> {
        buffer_lines(&self.buffer)
    }

    /// Copy the cached cells into `dst` with the top-left corner at
    /// (`x`, `y`). Cells outside `clip` are skipped.
    pub fn blit(&self, dst: &mut Buffer, x: u16, y: u16, clip: Rect) {
        let clip = clip.intersection(dst.area);
        for row in 0..self.height() {
            for col in 0..self.width() {
                let target = Position::new(x.saturating_add(col), y.saturating_add(row));
                if !clip.contains(target) {
                    continue;
                }
                if let (Some(cell), Some(target)) =
                    (self.buffer.cell((col, row)), dst.cell_mut(target))
                {
                    *target = cell.clone();
                }
            }
        }
    }
}

impl ChartHandle for Panel {
    fn release(&mut self) {
        tracing::trace!(chart = %self.title, "Releasing chart");
        self.buffer = Buffer::empty(Rect::default());
    }
}

/// Border and title shared by every panel.
pub(crate) fn panel_block(title: &str, icons: &IconSet) -> Block<'static> {
    Block::bordered()
        .border_set(icons.border)
        .border_style(style::MUTED)
        .title(Line::styled(format!(" {title} "), style::TITLE))
}

/// Panel shown when a chart or table has nothing to draw.
pub(crate) fn no_data(title: &str, icons: &IconSet) -> Panel {
    Panel::text(title, vec![Line::styled("No data", style::MUTED)], icons)
}

/// Plain text of a buffer, one string per row.
///
/// Cells hidden behind a wide symbol are skipped so emoji are not followed
/// by padding.
pub fn buffer_lines(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            let mut line = String::new();
            let mut hidden = 0;
            for x in area.left()..area.right() {
                if hidden > 0 {
                    hidden -= 1;
                    continue;
                }
                if let Some(cell) = buffer.cell((x, y)) {
                    let symbol = cell.symbol();
                    hidden = Span::raw(symbol).width().saturating_sub(1);
                    line.push_str(symbol);
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

/// Narrowest panel that shows `title` in full.
pub(crate) fn title_width(title: &str) -> usize {
    Line::from(title).width() + 4
}

pub(crate) fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Format a chart value: whole numbers without decimals, others with one.
pub(crate) fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
