//! Native platform layer
//!
//! Owns the terminal (raw mode, alternate screen, mouse capture) and turns
//! crossterm events into `InputEvent`s for the session.

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::renderer::Viewport;
use crate::sim::InputEvent;

/// Cap on events drained per poll, so a held key cannot starve the loop
const MAX_EVENTS_PER_POLL: usize = 32;

/// Raw-mode terminal session. Restores the terminal on drop, including
/// when unwinding from a panic.
pub struct TerminalGuard {
    active: bool,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All)
        )?;
        Ok(Self { active: true })
    }

    /// Current terminal size in cells
    pub fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        let mut out = io::stdout();
        execute!(out, DisableMouseCapture, cursor::Show, LeaveAlternateScreen)?;
        out.flush()?;
        terminal::disable_raw_mode()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            log::error!("Failed to restore terminal: {}", e);
        }
    }
}

/// What a poll produced besides game input
#[derive(Debug, Default)]
pub struct Polled {
    pub inputs: Vec<InputEvent>,
    /// New terminal size, if the window was resized
    pub resized: Option<(u16, u16)>,
}

/// Drain pending terminal events, waiting at most `timeout` for the first
pub fn poll(timeout: Duration, view: &Viewport) -> io::Result<Polled> {
    let mut polled = Polled::default();
    let mut wait = timeout;

    while event::poll(wait)? {
        wait = Duration::ZERO;
        match event::read()? {
            Event::Key(key) => polled.inputs.extend(map_key(key)),
            Event::Mouse(mouse) => polled.inputs.extend(map_mouse(mouse, view)),
            Event::Resize(cols, rows) => polled.resized = Some((cols, rows)),
            _ => {}
        }
        if polled.inputs.len() >= MAX_EVENTS_PER_POLL {
            break;
        }
    }
    Ok(polled)
}

/// Keyboard bindings
pub fn map_key(key: KeyEvent) -> Option<InputEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(InputEvent::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char(' ') | KeyCode::Up => Some(InputEvent::Primary),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(InputEvent::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(InputEvent::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(InputEvent::Quit),
        _ => None,
    }
}

/// Left clicks become world-space `Click`s at the centre of the cell hit
pub fn map_mouse(mouse: MouseEvent, view: &Viewport) -> Option<InputEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let p = view.cell_to_world(mouse.column, mouse.row);
            Some(InputEvent::Click { x: p.x, y: p.y })
        }
        _ => None,
    }
}
