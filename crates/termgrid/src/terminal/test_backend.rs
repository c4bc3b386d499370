//! In-memory terminal backend for testing.

use crate::error::Result;
use crate::geometry::Size;
use std::io;

use super::traits::{Terminal, TerminalCapabilities};

/// In-memory terminal backend for testing.
///
/// All output is captured in a buffer that can be inspected.
pub struct TestBackend {
    size: Size,
    capabilities: TerminalCapabilities,
    buffer: Vec<u8>,
    raw_mode: bool,
    alternate_screen: bool,
    mouse_enabled: bool,
    mouse_motion_enabled: bool,
    focus_reports_enabled: bool,
    bracketed_paste_enabled: bool,
    kitty_keyboard_enabled: bool,
    cursor_visible: bool,
    pending_input: std::collections::VecDeque<u8>,
    fail_next_write: bool,
}

impl TestBackend {
    /// Create a new test backend with the given size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            capabilities: TerminalCapabilities::default(),
            buffer: Vec::new(),
            raw_mode: false,
            alternate_screen: false,
            mouse_enabled: false,
            mouse_motion_enabled: false,
            focus_reports_enabled: false,
            bracketed_paste_enabled: false,
            kitty_keyboard_enabled: false,
            cursor_visible: true,
            pending_input: std::collections::VecDeque::new(),
            fail_next_write: false,
        }
    }

    /// Make the next call to [`Terminal::write_raw`] return an error,
    /// simulating a broken pipe or closed sink. Used to exercise the frame
    /// loop's "force a full redraw next frame" recovery path.
    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }

    /// Get the bytes written to this backend.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the output buffer.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Check if raw mode is active.
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Check if the alternate screen is active.
    pub fn is_alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    /// Check if mouse capture is active.
    pub fn is_mouse_enabled(&self) -> bool {
        self.mouse_enabled
    }

    /// Check if mouse motion reporting is active.
    pub fn is_mouse_motion_enabled(&self) -> bool {
        self.mouse_motion_enabled
    }

    /// Check if focus reporting is active.
    pub fn is_focus_reports_enabled(&self) -> bool {
        self.focus_reports_enabled
    }

    /// Check if bracketed paste is active.
    pub fn is_bracketed_paste_enabled(&self) -> bool {
        self.bracketed_paste_enabled
    }

    /// Check if Kitty keyboard reporting is active.
    pub fn is_kitty_keyboard_enabled(&self) -> bool {
        self.kitty_keyboard_enabled
    }

    /// Check if the cursor is currently shown.
    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Set the terminal size (simulates a resize).
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    /// Queue bytes as if the (simulated) user had typed or pasted them.
    /// Consumed by the next call(s) to [`Terminal::read_available`].
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.pending_input.extend(bytes);
    }
}

impl Terminal for TestBackend {
    fn size(&self) -> Result<Size> {
        Ok(self.size)
    }

    fn capabilities(&self) -> &TerminalCapabilities {
        &self.capabilities
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = true;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = false;
        Ok(())
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(io::Error::other("simulated write failure").into());
        }
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        Ok(self.pending_input.drain(..).collect())
    }

    fn enable_mouse(&mut self) -> Result<()> {
        self.mouse_enabled = true;
        Ok(())
    }

    fn disable_mouse(&mut self) -> Result<()> {
        self.mouse_enabled = false;
        Ok(())
    }

    fn enable_mouse_motion(&mut self) -> Result<()> {
        self.mouse_motion_enabled = true;
        Ok(())
    }

    fn disable_mouse_motion(&mut self) -> Result<()> {
        self.mouse_motion_enabled = false;
        Ok(())
    }

    fn enter_alternate_screen(&mut self) -> Result<()> {
        self.alternate_screen = true;
        Ok(())
    }

    fn leave_alternate_screen(&mut self) -> Result<()> {
        self.alternate_screen = false;
        Ok(())
    }

    fn enable_focus_reports(&mut self) -> Result<()> {
        self.focus_reports_enabled = true;
        Ok(())
    }

    fn disable_focus_reports(&mut self) -> Result<()> {
        self.focus_reports_enabled = false;
        Ok(())
    }

    fn enable_bracketed_paste(&mut self) -> Result<()> {
        self.bracketed_paste_enabled = true;
        Ok(())
    }

    fn disable_bracketed_paste(&mut self) -> Result<()> {
        self.bracketed_paste_enabled = false;
        Ok(())
    }

    fn enable_kitty_keyboard(&mut self) -> Result<()> {
        self.kitty_keyboard_enabled = true;
        Ok(())
    }

    fn disable_kitty_keyboard(&mut self) -> Result<()> {
        self.kitty_keyboard_enabled = false;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<()> {
        self.cursor_visible = false;
        Ok(())
    }

    fn show_cursor(&mut self, _park_at: Option<(u16, u16)>) -> Result<()> {
        self.cursor_visible = true;
        Ok(())
    }
}
