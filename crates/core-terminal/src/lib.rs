//! Terminal ownership: raw mode and alternate screen, size queries, and the
//! resize watcher that feeds size changes into the event queue.
//!
//! The backend is restored on drop, so an early return or a panic unwinding
//! through `main` still leaves the user's shell usable.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::{debug, warn};

pub mod resize;
pub use resize::{ResizeTracker, ResizeWatcher};

/// Size used when the terminal cannot be queried (e.g. output is piped).
pub const FALLBACK_SIZE: (u16, u16) = (80, 24);

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    /// Current `(columns, rows)`.
    fn size(&self) -> Result<(u16, u16)>;
}

#[derive(Debug, Default)]
pub struct CrosstermBackend {
    entered: bool,
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Enter raw mode and the alternate screen; leave again when the guard
    /// drops.
    pub fn enter_guard(self) -> Result<TerminalGuard> {
        let mut backend = self;
        backend.enter()?;
        Ok(TerminalGuard { backend })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
            self.entered = true;
            debug!(target: "runtime", "terminal_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "runtime", "terminal_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }

    fn size(&self) -> Result<(u16, u16)> {
        Ok(crossterm::terminal::size()?)
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        if let Err(e) = self.leave() {
            warn!(target: "runtime", error = %e, "terminal_restore_failed");
        }
    }
}

/// Owns an entered backend for the lifetime of the editor loop.
#[derive(Debug)]
pub struct TerminalGuard {
    backend: CrosstermBackend,
}

impl TerminalGuard {
    pub fn backend_mut(&mut self) -> &mut CrosstermBackend {
        &mut self.backend
    }

    pub fn size(&self) -> (u16, u16) {
        terminal_size()
    }
}

/// Terminal size, or [`FALLBACK_SIZE`] when it cannot be determined.
pub fn terminal_size() -> (u16, u16) {
    match crossterm::terminal::size() {
        Ok((w, h)) if w > 0 && h > 0 => (w, h),
        Ok(_) => FALLBACK_SIZE,
        Err(e) => {
            debug!(target: "runtime", error = %e, "terminal_size_fallback");
            FALLBACK_SIZE
        }
    }
}
