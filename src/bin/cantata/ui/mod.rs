//! TUI module for cantata
//!
//! Header, bar visualizer, clickable progress track and a help line.

mod bars;
mod progress;
mod transport;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cantata::media::MediaBackend;
use cantata::PlayerShell;

pub use bars::TerminalSurface;

use progress::render_progress;
use transport::render_transport;

/// Areas the app needs for hit-testing
pub struct UiLayout {
    pub track: Rect,
}

pub fn render<B: MediaBackend>(
    frame: &mut Frame,
    player: &mut PlayerShell<B, TerminalSurface>,
    status: Option<&str>,
) -> UiLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header
            Constraint::Min(6),    // Visualizer
            Constraint::Length(3), // Progress track
            Constraint::Length(1), // Help bar
        ])
        .split(frame.area());

    render_transport(frame, chunks[0], player);

    let vis_block = Block::default().borders(Borders::ALL);
    let vis_inner = vis_block.inner(chunks[1]);
    frame.render_widget(vis_block, chunks[1]);
    // Painted next frame at the new size
    player.surface_mut().resize(vis_inner.width, vis_inner.height);
    frame.render_widget(player.surface(), vis_inner);

    let track = render_progress(frame, chunks[2], player.track());

    let help = match status {
        Some(message) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(Color::Red),
        )),
        None => {
            let mut spans = vec![Span::styled(
                " [Space] Play/Pause  [←/→] Seek  [Click] Jump  [R] Reload  [Q] Quit",
                Style::default().fg(Color::DarkGray),
            )];
            if let Some(url) = player.download_link() {
                spans.push(Span::styled(
                    format!("  Download: {}", url),
                    Style::default().fg(Color::Cyan),
                ));
            }
            Line::from(spans)
        }
    };
    frame.render_widget(Paragraph::new(help), chunks[3]);

    UiLayout { track }
}
