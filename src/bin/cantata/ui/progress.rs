//! Progress track widget
//!
//! A single row: filled part, handle, remainder. Clicks are mapped back
//! through the returned inner area.

use ratatui::{
    layout::Rect,
    style::Color,
    widgets::{Block, Borders},
    Frame,
};

use cantata::progress_track::ProgressTrack;

const FILLED: Color = Color::Rgb(214, 180, 96);

/// Draw the track and return the clickable row
pub fn render_progress(frame: &mut Frame, area: Rect, track: &ProgressTrack) -> Rect {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return inner;
    }

    let width = inner.width as f64;
    let filled = track.fill_width(width).round() as u16;
    let handle = (track.handle_offset(width).floor() as u16).min(inner.width - 1);
    let y = inner.y + inner.height / 2;

    let buf = frame.buffer_mut();
    for col in 0..inner.width {
        let (ch, fg) = if col == handle && track.progress().known_duration().is_some() {
            ('●', Color::White)
        } else if col < filled {
            ('━', FILLED)
        } else {
            ('─', Color::DarkGray)
        };
        if let Some(cell) = buf.cell_mut((inner.x + col, y)) {
            cell.set_char(ch).set_fg(fg);
        }
    }

    Rect::new(inner.x, y, inner.width, 1)
}
