//! Terminal trait and capability types.

use crate::error::Result;
use crate::geometry::Size;

/// Level of color support available.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ColorSupport {
    /// No color.
    NoColor,
    /// 16 ANSI colors.
    Basic16,
    /// 256 color palette.
    Extended256,
    /// 24-bit true color.
    TrueColor,
}

/// Capabilities detected for the terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalCapabilities {
    /// Color support level.
    pub color: ColorSupport,
    /// Whether the terminal supports Unicode.
    pub unicode: bool,
    /// Whether CSI 2026 synchronized output is supported.
    pub synchronized_output: bool,
    /// Whether the Kitty keyboard protocol is supported.
    pub kitty_keyboard: bool,
    /// Whether mouse events are available.
    pub mouse: bool,
    /// Whether bracketed paste (`CSI 2004`) is supported.
    pub bracketed_paste: bool,
    /// Whether terminal focus in/out reporting (`CSI 1004`) is supported.
    pub focus_events: bool,
    /// Whether OSC 8 hyperlinks are supported.
    pub hyperlinks: bool,
    /// Whether sixel graphics are supported. Always irrelevant to this
    /// crate's cell grid but still detected so a host application can
    /// decide whether to hand off to a pixel-graphics collaborator.
    pub sixel: bool,
}

impl Default for TerminalCapabilities {
    fn default() -> Self {
        Self {
            color: ColorSupport::TrueColor,
            unicode: true,
            synchronized_output: false,
            kitty_keyboard: false,
            mouse: true,
            bracketed_paste: true,
            focus_events: true,
            hyperlinks: false,
            sixel: false,
        }
    }
}

/// Startup options for [`Terminal::start`], mirroring the renderer
/// configuration surface (target FPS lives on the frame loop, not here).
/// Derives `serde::{Serialize, Deserialize}` behind the crate's `serde`
/// feature so a host application can load these from a config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalOptions {
    /// Enter the alternate screen buffer.
    pub alternate_screen: bool,
    /// Enable SGR mouse button reporting.
    pub mouse: bool,
    /// Enable mouse motion reporting (requires `mouse`).
    pub mouse_motion: bool,
    /// Enable terminal focus in/out reporting.
    pub focus_reports: bool,
    /// Enable bracketed paste.
    pub bracketed_paste: bool,
    /// Request Kitty keyboard protocol key-release and modifier events.
    pub kitty_keyboard: bool,
    /// Hide the cursor for the duration of the session.
    pub hide_cursor: bool,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse: false,
            mouse_motion: false,
            focus_reports: false,
            bracketed_paste: false,
            kitty_keyboard: false,
            hide_cursor: true,
        }
    }
}

/// Abstraction over terminal backends.
pub trait Terminal: Send {
    /// Get the current terminal size.
    fn size(&self) -> Result<Size>;

    /// Get the terminal's capabilities.
    fn capabilities(&self) -> &TerminalCapabilities;

    /// Enter raw mode (disable line buffering, echo, etc.).
    fn enter_raw_mode(&mut self) -> Result<()>;

    /// Exit raw mode (restore normal terminal state).
    fn exit_raw_mode(&mut self) -> Result<()>;

    /// Write raw bytes to the terminal.
    fn write_raw(&mut self, data: &[u8]) -> Result<()>;

    /// Flush buffered output to the terminal.
    fn flush(&mut self) -> Result<()>;

    /// Read whatever input bytes are currently available without blocking.
    /// Returns an empty vector if none are ready.
    fn read_available(&mut self) -> Result<Vec<u8>>;

    /// Enable mouse event capture.
    fn enable_mouse(&mut self) -> Result<()>;

    /// Disable mouse event capture.
    fn disable_mouse(&mut self) -> Result<()>;

    /// Enable mouse motion (any-event) reporting.
    fn enable_mouse_motion(&mut self) -> Result<()>;

    /// Disable mouse motion reporting.
    fn disable_mouse_motion(&mut self) -> Result<()>;

    /// Enter the alternate screen buffer.
    fn enter_alternate_screen(&mut self) -> Result<()>;

    /// Leave the alternate screen buffer.
    fn leave_alternate_screen(&mut self) -> Result<()>;

    /// Enable terminal focus in/out reporting.
    fn enable_focus_reports(&mut self) -> Result<()>;

    /// Disable terminal focus in/out reporting.
    fn disable_focus_reports(&mut self) -> Result<()>;

    /// Enable bracketed paste.
    fn enable_bracketed_paste(&mut self) -> Result<()>;

    /// Disable bracketed paste.
    fn disable_bracketed_paste(&mut self) -> Result<()>;

    /// Request Kitty keyboard protocol reporting (key release + modifiers).
    fn enable_kitty_keyboard(&mut self) -> Result<()>;

    /// Disable Kitty keyboard protocol reporting.
    fn disable_kitty_keyboard(&mut self) -> Result<()>;

    /// Hide the terminal cursor.
    fn hide_cursor(&mut self) -> Result<()>;

    /// Show the terminal cursor, optionally parking it at `(col, row)` first
    /// (0-based). Pass `None` to leave the cursor wherever it currently is.
    fn show_cursor(&mut self, park_at: Option<(u16, u16)>) -> Result<()>;
}
