//! Crossterm-based terminal backend.

use std::io::{self, Read, Write};
use std::thread;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
        EnableFocusChange, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::error::Result;
use crate::geometry::Size;

use super::traits::{ColorSupport, Terminal, TerminalCapabilities};

/// Mouse motion reporting mode (`CSI ? 1003 h` / `l`), toggled independent
/// of button reporting (`CSI ? 1000 h`). Crossterm's `EnableMouseCapture`
/// bundles both 1000 and 1003, so motion is tracked separately here only to
/// decide whether to re-issue 1003 after a plain `enable_mouse`.
const ENABLE_MOUSE_MOTION: &[u8] = b"\x1b[?1003h";
const DISABLE_MOUSE_MOTION: &[u8] = b"\x1b[?1003l";

/// Terminal backend using crossterm for real terminal I/O.
///
/// Input is read on a dedicated thread and forwarded through a
/// [`crossbeam_channel`] so the main loop's [`Terminal::read_available`]
/// never blocks — the only concurrency this crate permits outside its
/// single-threaded core (see the crate's concurrency model).
pub struct CrosstermBackend {
    capabilities: TerminalCapabilities,
    raw_mode: bool,
    alternate_screen: bool,
    input_rx: Option<crossbeam_channel::Receiver<Vec<u8>>>,
}

impl CrosstermBackend {
    /// Create a new crossterm backend, detecting capabilities.
    pub fn new() -> Self {
        let capabilities = detect_capabilities();
        Self {
            capabilities,
            raw_mode: false,
            alternate_screen: false,
            input_rx: None,
        }
    }

    /// Spawn the background stdin-reader thread, if not already running.
    fn ensure_input_thread(&mut self) {
        if self.input_rx.is_some() {
            return;
        }
        let (tx, rx) = crossbeam_channel::unbounded();
        thread::spawn(move || {
            let mut stdin = io::stdin();
            let mut buf = [0u8; 4096];
            loop {
                match stdin.read(&mut buf) {
                    Ok(0) => break,
                    Ok(n) => {
                        if tx.send(buf[..n].to_vec()).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        });
        self.input_rx = Some(rx);
    }
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for CrosstermBackend {
    fn size(&self) -> Result<Size> {
        let (w, h) = terminal::size()?;
        Ok(Size::new(w, h))
    }

    fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        if !self.raw_mode {
            terminal::enable_raw_mode()?;
            self.raw_mode = true;
        }
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if self.raw_mode {
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        io::stdout().write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        self.ensure_input_thread();
        let mut bytes = Vec::new();
        if let Some(rx) = &self.input_rx {
            while let Ok(chunk) = rx.try_recv() {
                bytes.extend(chunk);
            }
        }
        Ok(bytes)
    }

    fn enable_mouse(&mut self) -> Result<()> {
        execute!(io::stdout(), EnableMouseCapture)?;
        Ok(())
    }

    fn disable_mouse(&mut self) -> Result<()> {
        execute!(io::stdout(), DisableMouseCapture)?;
        Ok(())
    }

    fn enable_mouse_motion(&mut self) -> Result<()> {
        self.write_raw(ENABLE_MOUSE_MOTION)?;
        self.flush()
    }

    fn disable_mouse_motion(&mut self) -> Result<()> {
        self.write_raw(DISABLE_MOUSE_MOTION)?;
        self.flush()
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        if !self.alternate_screen {
            execute!(io::stdout(), EnterAlternateScreen)?;
            self.alternate_screen = true;
        }
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        if self.alternate_screen {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen = false;
        }
        Ok(())
    }

    fn enable_focus_reports(&mut self) -> Result<()> {
        execute!(io::stdout(), EnableFocusChange)?;
        Ok(())
    }

    fn disable_focus_reports(&mut self) -> Result<()> {
        execute!(io::stdout(), DisableFocusChange)?;
        Ok(())
    }

    fn enable_bracketed_paste(&mut self) -> Result<()> {
        execute!(io::stdout(), EnableBracketedPaste)?;
        Ok(())
    }

    fn disable_bracketed_paste(&mut self) -> Result<()> {
        execute!(io::stdout(), DisableBracketedPaste)?;
        Ok(())
    }

    fn enable_kitty_keyboard(&mut self) -> Result<()> {
        execute!(
            io::stdout(),
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                    | KeyboardEnhancementFlags::REPORT_ALTERNATE_KEYS
            )
        )?;
        Ok(())
    }

    fn disable_kitty_keyboard(&mut self) -> Result<()> {
        execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        execute!(io::stdout(), Hide)?;
        Ok(())
    }

    fn show_cursor(&mut self, park_at: Option<(u16, u16)>) -> Result<()> {
        if let Some((col, row)) = park_at {
            execute!(io::stdout(), MoveTo(col, row))?;
        }
        execute!(io::stdout(), Show)?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Detect terminal capabilities from the environment.
fn detect_capabilities() -> TerminalCapabilities {
    let color = detect_color_support();
    TerminalCapabilities {
        color,
        unicode: true,
        synchronized_output: false,
        kitty_keyboard: false,
        mouse: true,
        bracketed_paste: true,
        focus_events: true,
        hyperlinks: true,
        sixel: false,
    }
}

/// Detect color support from environment variables.
fn detect_color_support() -> ColorSupport {
    // Check COLORTERM for truecolor
    if let Ok(ct) = std::env::var("COLORTERM")
        && (ct == "truecolor" || ct == "24bit")
    {
        return ColorSupport::TrueColor;
    }
    // Check TERM for 256-color
    if let Ok(term) = std::env::var("TERM")
        && term.contains("256color")
    {
        return ColorSupport::Extended256;
    }
    // Check NO_COLOR
    if std::env::var("NO_COLOR").is_ok() {
        return ColorSupport::NoColor;
    }
    ColorSupport::Basic16
}
