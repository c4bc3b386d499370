//! Terminal lifecycle discipline: enter, enable reporting, and guarantee
//! restoration on any exit path.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

use crate::error::Result;
use crate::geometry::Size;

use super::traits::{Terminal, TerminalOptions};

/// Tracks whether a [`TerminalController`] is currently live, process-wide.
/// A panic hook needs this to decide whether to attempt a best-effort
/// terminal restore before the default panic handler prints its message.
static CONTROLLER_ACTIVE: AtomicBool = AtomicBool::new(false);
static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();
static RESTORE_FN: Mutex<Option<Box<dyn Fn() + Send>>> = Mutex::new(None);

/// Owns a terminal's raw-mode / reporting lifecycle.
///
/// `start` performs the full enable sequence from the spec (capability
/// probe is the caller's responsibility via [`Terminal::capabilities`];
/// this type only sequences mode enables); `stop` reverses it exactly,
/// and is also invoked by a process-wide panic hook so a panicking
/// application never leaves the user's terminal in raw/alternate-screen
/// mode.
pub struct TerminalController<T: Terminal> {
    terminal: T,
    options: TerminalOptions,
    started: bool,
}

impl<T: Terminal + 'static> TerminalController<T> {
    /// Wrap a terminal backend. Does not touch the terminal yet.
    pub fn new(terminal: T, options: TerminalOptions) -> Self {
        Self {
            terminal,
            options,
            started: false,
        }
    }

    /// Current terminal size.
    pub fn size(&self) -> Result<Size> {
        self.terminal.size()
    }

    /// Borrow the underlying terminal backend.
    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    /// Mutably borrow the underlying terminal backend, e.g. to write a frame.
    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Enter raw mode, optionally the alternate screen, and enable the
    /// requested input reporting modes, in the order: raw mode →
    /// alternate screen → mouse → mouse motion → focus → bracketed paste →
    /// Kitty keyboard → cursor visibility.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.terminal.enter_raw_mode()?;
        if self.options.alternate_screen {
            self.terminal.enter_alternate_screen()?;
        }
        if self.options.mouse {
            self.terminal.enable_mouse()?;
            if self.options.mouse_motion {
                self.terminal.enable_mouse_motion()?;
            }
        }
        if self.options.focus_reports {
            self.terminal.enable_focus_reports()?;
        }
        if self.options.bracketed_paste {
            self.terminal.enable_bracketed_paste()?;
        }
        if self.options.kitty_keyboard {
            self.terminal.enable_kitty_keyboard()?;
        }
        if self.options.hide_cursor {
            self.terminal.hide_cursor()?;
        }
        self.started = true;
        CONTROLLER_ACTIVE.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Reverse every step `start` performed, in reverse order, and
    /// restore the cursor to `(0, 0)` and visible. Safe to call more than
    /// once; safe to call without a matching `start`.
    pub fn stop(&mut self) -> Result<()> {
        if !self.started {
            return Ok(());
        }
        if self.options.hide_cursor {
            self.terminal.show_cursor(Some((0, 0)))?;
        } else {
            self.terminal.show_cursor(None)?;
        }
        if self.options.kitty_keyboard {
            self.terminal.disable_kitty_keyboard()?;
        }
        if self.options.bracketed_paste {
            self.terminal.disable_bracketed_paste()?;
        }
        if self.options.focus_reports {
            self.terminal.disable_focus_reports()?;
        }
        if self.options.mouse {
            if self.options.mouse_motion {
                self.terminal.disable_mouse_motion()?;
            }
            self.terminal.disable_mouse()?;
        }
        if self.options.alternate_screen {
            self.terminal.leave_alternate_screen()?;
        }
        self.terminal.exit_raw_mode()?;
        self.started = false;
        CONTROLLER_ACTIVE.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// `true` between a successful `start()` and the matching `stop()`.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Install a process-wide panic hook that best-effort restores the
    /// terminal (registered via `restore`) before delegating to the
    /// previous hook. Idempotent: later calls are no-ops. `restore` is
    /// expected to issue the same disable/leave/show sequence as `stop`;
    /// it cannot call back into this specific controller instance because
    /// panics can occur on any thread.
    pub fn install_panic_restore(restore: impl Fn() + Send + 'static) {
        if let Ok(mut slot) = RESTORE_FN.lock() {
            *slot = Some(Box::new(restore));
        }
        PANIC_HOOK_INSTALLED.get_or_init(|| {
            let previous = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                if CONTROLLER_ACTIVE.load(Ordering::SeqCst)
                    && let Ok(slot) = RESTORE_FN.lock()
                    && let Some(restore) = slot.as_ref()
                {
                    restore();
                    CONTROLLER_ACTIVE.store(false, Ordering::SeqCst);
                }
                previous(info);
            }));
        });
    }
}

impl<T: Terminal + 'static> Drop for TerminalController<T> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}
