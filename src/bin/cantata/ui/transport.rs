//! Header widget - title, dedication, play state and times

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use cantata::media::MediaBackend;
use cantata::visual::Surface;
use cantata::{PlaybackState, PlayerShell};

pub fn render_transport<B: MediaBackend, S: Surface>(
    frame: &mut Frame,
    area: Rect,
    player: &PlayerShell<B, S>,
) {
    let props = player.props();
    let block = Block::default()
        .title(format!(" cantata · {} ", props.theme))
        .borders(Borders::ALL);

    let mut title = vec![Span::styled(
        format!(" {}", props.title),
        Style::default()
            .fg(Color::Rgb(214, 180, 96))
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(name) = &props.name {
        title.push(Span::styled(
            format!("  for {}", name),
            Style::default().fg(Color::Gray),
        ));
    }

    let state = player.state();
    let (symbol, color) = match state {
        PlaybackState::Playing => ("▶", Color::Green),
        PlaybackState::Loading => ("…", Color::Yellow),
        PlaybackState::Ended => ("■", Color::DarkGray),
        _ => ("⏸", Color::Yellow),
    };

    let status = Line::from(vec![
        Span::styled(format!(" {} {:<8}", symbol, state.label()), Style::default().fg(color)),
        Span::styled(
            format!("{} / {}", player.current_time_label(), player.duration_label()),
            Style::default().fg(Color::Cyan),
        ),
    ]);

    let paragraph = Paragraph::new(vec![Line::from(title), status]).block(block);
    frame.render_widget(paragraph, area);
}
