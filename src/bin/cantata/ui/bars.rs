//! Terminal drawing surface for the bar visualizer
//!
//! One surface unit across is one terminal column; one unit down is an
//! eighth of a row, so bars can use the partial block glyphs.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use cantata::visual::{Bar, Surface};

const GLYPHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
/// Colour idle bars are blended against
const BACKGROUND: (u8, u8, u8) = (20, 18, 16);

#[derive(Debug, Clone, Copy, Default)]
struct Column {
    eighths: u16,
    rgb: (u8, u8, u8),
}

#[derive(Debug, Default)]
pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    columns: Vec<Column>,
}

impl TerminalSurface {
    /// Match the area the visualizer was given this frame
    pub fn resize(&mut self, cols: u16, rows: u16) {
        if cols != self.cols || rows != self.rows {
            self.cols = cols;
            self.rows = rows;
            self.columns = vec![Column::default(); cols as usize];
        }
    }
}

impl Surface for TerminalSurface {
    fn size(&self) -> (f32, f32) {
        (self.cols as f32, self.rows as f32 * 8.0)
    }

    fn clear(&mut self) {
        self.columns.fill(Column::default());
    }

    fn fill_bar(&mut self, bar: &Bar) {
        let rect = bar.rect;
        let start = rect.x.max(0.0).floor() as usize;
        let end = ((rect.x + rect.width).ceil().max(0.0) as usize).min(self.columns.len());
        let eighths = rect.height.max(0.0).round() as u16;
        let rgb = bar.color.over(BACKGROUND);

        for (c, column) in self.columns.iter_mut().enumerate().take(end).skip(start) {
            // A column belongs to the bar covering its centre
            let centre = c as f32 + 0.5;
            if centre < rect.x || centre >= rect.x + rect.width {
                continue;
            }
            if eighths >= column.eighths {
                *column = Column { eighths, rgb };
            }
        }
    }
}

impl Widget for &TerminalSurface {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.rows.min(area.height);
        for (c, column) in self.columns.iter().enumerate().take(area.width as usize) {
            if column.eighths == 0 {
                continue;
            }
            let (r, g, b) = column.rgb;
            for row in 0..rows {
                let level = (self.rows - 1 - row) * 8;
                let filled = column.eighths.saturating_sub(level).min(8) as usize;
                if filled == 0 {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((area.x + c as u16, area.y + row)) {
                    cell.set_char(GLYPHS[filled]).set_fg(Color::Rgb(r, g, b));
                }
            }
        }
    }
}
