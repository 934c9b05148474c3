//! App - host loop around a single PlayerShell

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{layout::Rect, DefaultTerminal, Frame};
use std::time::{Duration, Instant};

use cantata::media::{DeviceBackend, SessionEvent};
use cantata::{PlayOutcome, PlayerConfig, PlayerHooks, PlayerProps, PlayerShell};

use super::ui::{self, TerminalSurface};

/// Arrow-key seek step, seconds
const SEEK_STEP: f64 = 5.0;
/// Input poll timeout; also paces the loop at roughly 60 fps
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct App {
    player: PlayerShell<DeviceBackend, TerminalSurface>,
    started: Instant,
    /// Where the progress track was drawn last frame (for mouse hits)
    track_area: Rect,
    /// Last status message (errors, blocked play)
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(props: PlayerProps, config: PlayerConfig) -> Self {
        let hooks = PlayerHooks::new()
            .on_play(|| log::info!("playback started"))
            .on_pause(|| log::info!("playback paused"));

        Self {
            player: PlayerShell::new(
                DeviceBackend::new(),
                TerminalSurface::default(),
                props,
                hooks,
                config,
            ),
            started: Instant::now(),
            track_area: Rect::default(),
            status: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop until the user quits
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            for event in self.player.tick() {
                self.on_session_event(event);
            }
            self.player.animation_frame(self.started.elapsed());

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }

        self.player.unmount();
        Ok(())
    }

    fn on_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::LoadFailed(err) | SessionEvent::PlayBlocked(err) => {
                self.status = Some(err.to_string());
            }
            SessionEvent::LoadTimedOut => {
                self.status = Some("source did not load; press r to retry".into());
            }
            SessionEvent::Ready { .. } | SessionEvent::Started => self.status = None,
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                if let Some(PlayOutcome::Blocked) = self.player.toggle() {
                    self.status = Some("cannot play yet".into());
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let source = self.player.props().source_url.clone();
                self.player.load(&source);
            }
            KeyCode::Left => {
                self.player.seek_by(-SEEK_STEP);
            }
            KeyCode::Right => {
                self.player.seek_by(SEEK_STEP);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let MouseEventKind::Down(MouseButton::Left) = mouse.kind else {
            return;
        };
        let area = self.track_area;
        let inside = mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height;
        if inside {
            // Centre of the clicked cell
            let x = (mouse.column - area.x) as f64 + 0.5;
            self.player.seek_to_click(x, area.width as f64);
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let layout = ui::render(frame, &mut self.player, self.status.as_deref());
        self.track_area = layout.track;
    }
}
