#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! [`TerminalSession`] owns raw mode and the alternate screen. It restores
//! the terminal when dropped, when the process panics, and when a terminating
//! signal arrives.
//!
//! # Signals (unix)
//!
//! | Signal | Effect |
//! |--------|--------|
//! | `SIGWINCH` | sets the resize flag, consumed by the input loop |
//! | `SIGINT` | sets the interrupt flag, read as an abort |
//! | `SIGTERM` | restores the terminal and exits |
//!
//! No other asynchronous state is touched; the flags are read and cleared by
//! the terminal driver at the top of each input poll.
//!
//! # External commands
//!
//! [`TerminalSession::suspend`] hands the terminal back (leaving raw mode and
//! the alternate screen) and [`TerminalSession::resume`] takes it again. Use
//! them around a child process that needs the terminal.

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGWINCH};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Terminal session configuration.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Switch to the alternate screen buffer (`CSI ? 1049 h`).
    pub alternate_screen: bool,
    /// Install signal handlers for resize, interrupt and termination.
    pub handle_signals: bool,
}

/// Flags set asynchronously by signal handlers.
#[derive(Debug, Clone, Default)]
pub struct SignalFlags {
    resized: Arc<AtomicBool>,
    interrupted: Arc<AtomicBool>,
}

impl SignalFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the resize flag.
    pub fn take_resize(&self) -> bool {
        self.resized.swap(false, Ordering::AcqRel)
    }

    /// Consume the interrupt flag.
    pub fn take_interrupt(&self) -> bool {
        self.interrupted.swap(false, Ordering::AcqRel)
    }

    pub fn raise_resize(&self) {
        self.resized.store(true, Ordering::Release);
    }

    pub fn raise_interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
    }
}

/// RAII guard for raw mode and the alternate screen.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    flags: SignalFlags,
    raw_enabled: bool,
    alternate_screen_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and optionally the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        let flags = SignalFlags::new();
        let mut session = Self {
            options: options.clone(),
            flags: flags.clone(),
            raw_enabled: false,
            alternate_screen_enabled: false,
            #[cfg(unix)]
            signal_guard: None,
        };
        session.enter()?;

        #[cfg(unix)]
        if options.handle_signals {
            session.signal_guard = Some(SignalGuard::new(flags)?);
        }

        Ok(session)
    }

    /// The flags shared with the signal handlers.
    pub fn signal_flags(&self) -> &SignalFlags {
        &self.flags
    }

    /// Current terminal size (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn is_suspended(&self) -> bool {
        !self.raw_enabled
    }

    /// Give the terminal back to the shell.
    pub fn suspend(&mut self) -> io::Result<()> {
        tracing::debug!("suspending terminal session");
        self.leave()
    }

    /// Take the terminal again after [`suspend`](Self::suspend).
    pub fn resume(&mut self) -> io::Result<()> {
        tracing::debug!("resuming terminal session");
        self.enter()?;
        self.flags.raise_resize();
        Ok(())
    }

    fn enter(&mut self) -> io::Result<()> {
        if !self.raw_enabled {
            crossterm::terminal::enable_raw_mode()?;
            self.raw_enabled = true;
            tracing::info!("terminal raw mode enabled");
        }
        if self.options.alternate_screen && !self.alternate_screen_enabled {
            crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
            self.alternate_screen_enabled = true;
            tracing::info!("alternate screen enabled");
        }
        Ok(())
    }

    fn leave(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        crossterm::execute!(
            stdout,
            crossterm::style::ResetColor,
            crossterm::cursor::Show
        )?;
        if self.alternate_screen_enabled {
            crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
            tracing::info!("alternate screen disabled");
        }
        if self.raw_enabled {
            crossterm::terminal::disable_raw_mode()?;
            self.raw_enabled = false;
            tracing::info!("terminal raw mode disabled");
        }
        stdout.flush()
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();
        if let Err(err) = self.leave() {
            tracing::warn!(error = %err, "terminal cleanup failed");
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();
    let _ = crossterm::execute!(stdout, crossterm::style::ResetColor);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new(flags: SignalFlags) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM, SIGWINCH]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                match signal {
                    SIGWINCH => {
                        tracing::debug!("SIGWINCH received");
                        flags.raise_resize();
                    }
                    SIGINT => {
                        tracing::debug!("SIGINT received");
                        flags.raise_interrupt();
                    }
                    SIGTERM => {
                        tracing::warn!("termination signal received, cleaning up");
                        best_effort_cleanup();
                        std::process::exit(128 + signal);
                    }
                    _ => {}
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_options_default_is_minimal() {
        let opts = SessionOptions::default();
        assert!(!opts.alternate_screen);
        assert!(!opts.handle_signals);
    }

    #[test]
    fn flags_are_consumed_once() {
        let flags = SignalFlags::new();
        assert!(!flags.take_resize());
        flags.raise_resize();
        let shared = flags.clone();
        assert!(shared.take_resize());
        assert!(!flags.take_resize());

        flags.raise_interrupt();
        assert!(flags.take_interrupt());
        assert!(!flags.take_interrupt());
    }
}
