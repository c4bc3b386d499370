//! The byte-level input state machine.

use crate::event::{
    Event, FocusEvent, KeyCode, KeyEvent, KeyEventKind, Modifiers, MouseButton, MouseEvent,
    MouseEventKind, PasteEvent, RawEvent,
};
use tracing::warn;

/// Upper bound on the bytes accumulated inside a single CSI/OSC/DCS
/// sequence before it is considered malformed and aborted back to
/// `Ground`. Real terminal sequences are at most a few dozen bytes; this
/// guards against a runaway or adversarial stream pinning the decoder in
/// an unbounded-growth state (spec.md §7, "Decoder sequence overflow").
const MAX_SEQUENCE_LEN: usize = 4096;

/// Internal parser state.
#[derive(Clone, Debug, PartialEq, Eq)]
enum State {
    /// Not inside any escape sequence.
    Ground,
    /// Just saw ESC (0x1B).
    Escape,
    /// Saw `ESC [`, collecting parameter/intermediate bytes for a CSI sequence.
    Csi { raw: String },
    /// Saw `ESC O`, a single-character SS3 sequence (legacy F1-F4 / app cursor keys).
    Ss3,
    /// Saw `ESC ]`, collecting an OSC string until the ST (`ESC \`) or BEL (`0x07`) terminator.
    Osc { body: String, seen_esc: bool },
    /// Saw `ESC P`, collecting a DCS string until the ST terminator.
    Dcs { body: String, seen_esc: bool },
    /// Inside a bracketed-paste payload (after `ESC [ 200 ~`), accumulating
    /// raw bytes until the `ESC [ 201 ~` terminator is seen.
    Paste { body: String, tail: Vec<u8> },
}

/// Decodes a raw terminal input byte stream into [`Event`]s.
///
/// Feed bytes with [`Decoder::feed`]; each call returns the events that
/// became complete as a result, which may be zero, one, or several (e.g.
/// a fast paste followed immediately by a keystroke).
pub struct Decoder {
    state: State,
    /// Pending UTF-8 continuation bytes collected in `Ground` state.
    utf8_pending: Vec<u8>,
    /// Bytes consumed since the last event was emitted, so each returned
    /// [`RawEvent`] can carry the exact bytes that produced it.
    pending_raw: Vec<u8>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

const PASTE_END: &[u8] = b"\x1b[201~";

impl Decoder {
    /// Create a new decoder in the initial (`Ground`) state.
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            utf8_pending: Vec::new(),
            pending_raw: Vec::new(),
        }
    }

    /// Feed a chunk of raw bytes, returning the events it completed, each
    /// paired with the exact bytes that produced it.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<RawEvent> {
        let mut raw_events = Vec::new();
        for &byte in bytes {
            self.pending_raw.push(byte);
            let mut events = Vec::new();
            self.feed_byte(byte, &mut events);
            if !events.is_empty() {
                let mut raw = Some(std::mem::take(&mut self.pending_raw));
                let last = events.len() - 1;
                for (i, event) in events.into_iter().enumerate() {
                    // A single byte can complete more than one event (e.g.
                    // a flushed UTF-8 run followed immediately by ESC); only
                    // the final one actually consumed this byte's sequence,
                    // so it alone carries the raw bytes.
                    let raw = if i == last { raw.take().unwrap_or_default() } else { Vec::new() };
                    raw_events.push(RawEvent { event, raw });
                }
            }
        }
        raw_events
    }

    fn feed_byte(&mut self, byte: u8, events: &mut Vec<Event>) {
        match std::mem::replace(&mut self.state, State::Ground) {
            State::Ground => self.ground_byte(byte, events),
            State::Escape => self.escape_byte(byte, events),
            State::Csi { raw } => self.csi_byte(raw, byte, events),
            State::Ss3 => self.ss3_byte(byte, events),
            State::Osc { body, seen_esc } => self.osc_byte(body, seen_esc, byte, events),
            State::Dcs { body, seen_esc } => self.dcs_byte(body, seen_esc, byte, events),
            State::Paste { body, tail } => self.paste_byte(body, tail, byte, events),
        }
    }

    fn ground_byte(&mut self, byte: u8, events: &mut Vec<Event>) {
        if byte == 0x1b {
            self.flush_utf8(events);
            self.state = State::Escape;
            return;
        }

        if !self.utf8_pending.is_empty() || byte >= 0x80 {
            self.utf8_pending.push(byte);
            if let Some(ch) = try_decode_utf8(&self.utf8_pending) {
                self.utf8_pending.clear();
                events.push(key_event(KeyCode::Char(ch), Modifiers::NONE));
            } else if self.utf8_pending.len() >= 4 {
                // Malformed: surface the offending bytes and resync.
                events.push(Event::RawInput(std::mem::take(&mut self.utf8_pending)));
            }
            self.state = State::Ground;
            return;
        }

        match byte {
            0x00 => events.push(key_event(KeyCode::Char(' '), ctrl())), // Ctrl+Space / NUL
            0x09 => events.push(key_event(KeyCode::Tab, Modifiers::NONE)),
            0x0d => events.push(key_event(KeyCode::Enter, Modifiers::NONE)),
            0x7f | 0x08 => events.push(key_event(KeyCode::Backspace, Modifiers::NONE)),
            0x01..=0x1a => {
                // Ctrl+<letter>, where the letter is byte + 0x60.
                let ch = (byte + 0x60) as char;
                events.push(key_event(KeyCode::Char(ch), ctrl()));
            }
            _ => {
                if let Some(ch) = char::from_u32(u32::from(byte)) {
                    events.push(key_event(KeyCode::Char(ch), Modifiers::NONE));
                }
            }
        }
        self.state = State::Ground;
    }

    fn flush_utf8(&mut self, events: &mut Vec<Event>) {
        if !self.utf8_pending.is_empty() {
            if let Ok(s) = std::str::from_utf8(&self.utf8_pending) {
                for ch in s.chars() {
                    events.push(key_event(KeyCode::Char(ch), Modifiers::NONE));
                }
            }
            self.utf8_pending.clear();
        }
    }

    fn escape_byte(&mut self, byte: u8, events: &mut Vec<Event>) {
        match byte {
            b'[' => self.state = State::Csi { raw: String::new() },
            b'O' => self.state = State::Ss3,
            b']' => {
                self.state = State::Osc {
                    body: String::new(),
                    seen_esc: false,
                }
            }
            b'P' => {
                self.state = State::Dcs {
                    body: String::new(),
                    seen_esc: false,
                }
            }
            0x1b => self.state = State::Escape, // ESC ESC: restart
            _ => {
                // Alt+<char>: ESC followed directly by a printable byte.
                if byte.is_ascii_graphic() || byte == b' ' {
                    events.push(key_event(KeyCode::Char(byte as char), alt()));
                } else if byte == 0x0d {
                    events.push(key_event(KeyCode::Enter, alt()));
                } else {
                    events.push(Event::RawInput(vec![0x1b, byte]));
                }
                self.state = State::Ground;
            }
        }
    }

    fn ss3_byte(&mut self, byte: u8, events: &mut Vec<Event>) {
        let code = match byte {
            b'P' => Some(KeyCode::F(1)),
            b'Q' => Some(KeyCode::F(2)),
            b'R' => Some(KeyCode::F(3)),
            b'S' => Some(KeyCode::F(4)),
            b'A' => Some(KeyCode::Up),
            b'B' => Some(KeyCode::Down),
            b'C' => Some(KeyCode::Right),
            b'D' => Some(KeyCode::Left),
            b'H' => Some(KeyCode::Home),
            b'F' => Some(KeyCode::End),
            _ => None,
        };
        if let Some(code) = code {
            events.push(key_event(code, Modifiers::NONE));
        } else {
            events.push(Event::RawInput(vec![0x1b, b'O', byte]));
        }
        self.state = State::Ground;
    }

    fn csi_byte(&mut self, mut raw: String, byte: u8, events: &mut Vec<Event>) {
        if raw.len() >= MAX_SEQUENCE_LEN {
            self.abort_sequence("CSI", events);
            return;
        }
        // Parameter / intermediate bytes: 0x20-0x3F.
        if (0x20..=0x3f).contains(&byte) {
            raw.push(byte as char);
            self.state = State::Csi { raw };
            return;
        }
        // Final byte: 0x40-0x7E.
        if (0x40..=0x7e).contains(&byte) {
            self.finish_csi(&raw, byte as char, events);
            return;
        }
        // Anything else (e.g. a stray control char) aborts the sequence.
        self.state = State::Ground;
    }

    fn finish_csi(&mut self, raw: &str, final_byte: char, events: &mut Vec<Event>) {
        self.state = State::Ground;

        // Bracketed paste begin: CSI 200 ~
        if raw == "200" && final_byte == '~' {
            self.state = State::Paste {
                body: String::new(),
                tail: Vec::new(),
            };
            return;
        }

        // Mouse SGR reporting: CSI < params M/m
        if let Some(rest) = raw.strip_prefix('<')
            && (final_byte == 'M' || final_byte == 'm')
        {
            if let Some(ev) = parse_sgr_mouse(rest, final_byte == 'm') {
                events.push(Event::Mouse(ev));
            }
            return;
        }

        // Focus reporting: CSI I / CSI O (no params).
        if raw.is_empty() && final_byte == 'I' {
            events.push(Event::Focus(FocusEvent::Gained));
            return;
        }
        if raw.is_empty() && final_byte == 'O' {
            events.push(Event::Focus(FocusEvent::Lost));
            return;
        }

        // Kitty keyboard protocol: CSI <code>[:modifiers[:event]][;...]u
        if final_byte == 'u' {
            if let Some(ev) = parse_kitty_key(raw) {
                events.push(Event::Key(ev));
            }
            return;
        }

        // Legacy cursor/navigation keys: CSI <letter>, optionally with a
        // leading modifier parameter "1;<mods><letter>".
        let modifiers = parse_legacy_modifiers(raw);
        let code = match final_byte {
            'A' => Some(KeyCode::Up),
            'B' => Some(KeyCode::Down),
            'C' => Some(KeyCode::Right),
            'D' => Some(KeyCode::Left),
            'H' => Some(KeyCode::Home),
            'F' => Some(KeyCode::End),
            'Z' => Some(KeyCode::BackTab),
            '~' => tilde_code(raw),
            _ => None,
        };
        if let Some(code) = code {
            events.push(key_event(code, modifiers));
        } else {
            let mut dropped = vec![0x1b, b'['];
            dropped.extend(raw.bytes());
            dropped.push(final_byte as u8);
            events.push(Event::RawInput(dropped));
        }
    }

    fn osc_byte(&mut self, mut body: String, seen_esc: bool, byte: u8, events: &mut Vec<Event>) {
        if seen_esc {
            // Expect '\\' to complete ST; anything else is malformed, drop.
            self.state = State::Ground;
            return;
        }
        if body.len() >= MAX_SEQUENCE_LEN {
            self.abort_sequence("OSC", events);
            return;
        }
        match byte {
            0x07 => self.state = State::Ground,
            0x1b => self.state = State::Osc { body, seen_esc: true },
            _ => {
                body.push(byte as char);
                self.state = State::Osc { body, seen_esc: false };
            }
        }
    }

    fn dcs_byte(&mut self, mut body: String, seen_esc: bool, byte: u8, events: &mut Vec<Event>) {
        if seen_esc {
            self.state = State::Ground;
            return;
        }
        if body.len() >= MAX_SEQUENCE_LEN {
            self.abort_sequence("DCS", events);
            return;
        }
        match byte {
            0x1b => self.state = State::Dcs { body, seen_esc: true },
            _ => {
                body.push(byte as char);
                self.state = State::Dcs { body, seen_esc: false };
            }
        }
    }

    fn paste_byte(&mut self, mut body: String, mut tail: Vec<u8>, byte: u8, events: &mut Vec<Event>) {
        tail.push(byte);
        if tail.len() > PASTE_END.len() {
            tail.remove(0);
        }
        if tail.ends_with(PASTE_END) {
            body.truncate(body.len() - (tail.len() - 1));
            events.push(Event::Paste(PasteEvent { text: body }));
            self.state = State::Ground;
            return;
        }
        body.push(byte as char);
        self.state = State::Paste { body, tail };
    }

    /// Abort an oversized CSI/OSC/DCS sequence: drop back to `Ground` and
    /// surface the bytes consumed so far as a debug `raw-input` token
    /// instead of silently discarding them or misparsing a key out of
    /// truncated data.
    fn abort_sequence(&mut self, kind: &'static str, events: &mut Vec<Event>) {
        warn!(kind, len = self.pending_raw.len(), "input sequence exceeded max length, aborting");
        self.state = State::Ground;
        events.push(Event::RawInput(self.pending_raw.clone()));
    }
}

fn key_event(code: KeyCode, modifiers: Modifiers) -> Event {
    Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
    })
}

fn ctrl() -> Modifiers {
    Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    }
}

fn alt() -> Modifiers {
    Modifiers {
        alt: true,
        ..Modifiers::NONE
    }
}

/// Attempt to decode a complete UTF-8 codepoint from the pending bytes.
/// Returns `None` while more continuation bytes are still expected.
fn try_decode_utf8(pending: &[u8]) -> Option<char> {
    std::str::from_utf8(pending).ok()?.chars().next()
}

/// Decode the xterm/Kitty modifier parameter convention: `modifier - 1` is
/// a bitmask of Shift(1) Alt(2) Ctrl(4) Super(8) Hyper(16) Meta(32)
/// CapsLock(64) NumLock(128). Legacy xterm CSI sequences only ever set the
/// low four bits; the high four are Kitty-protocol extensions.
fn modifiers_from_param(param: u32) -> Modifiers {
    let bits = param.saturating_sub(1);
    Modifiers {
        shift: bits & 1 != 0,
        alt: bits & 2 != 0,
        ctrl: bits & 4 != 0,
        super_key: bits & 8 != 0,
        hyper: bits & 16 != 0,
        meta: bits & 32 != 0,
        caps_lock: bits & 64 != 0,
        num_lock: bits & 128 != 0,
    }
}

/// Parse the modifier field out of `"1;5"`-style CSI parameters (arrow/home/end).
fn parse_legacy_modifiers(raw: &str) -> Modifiers {
    let parts: Vec<&str> = raw.split(';').collect();
    if parts.len() >= 2
        && let Ok(m) = parts[1].parse::<u32>()
    {
        return modifiers_from_param(m);
    }
    Modifiers::NONE
}

/// Map a `CSI <n>~` navigation-key parameter to a [`KeyCode`].
fn tilde_code(raw: &str) -> Option<KeyCode> {
    let first = raw.split(';').next()?;
    match first.parse::<u32>().ok()? {
        1 | 7 => Some(KeyCode::Home),
        2 => Some(KeyCode::Insert),
        3 => Some(KeyCode::Delete),
        4 | 8 => Some(KeyCode::End),
        5 => Some(KeyCode::PageUp),
        6 => Some(KeyCode::PageDown),
        11..=15 => Some(KeyCode::F((first.parse::<u32>().ok()? - 10) as u8)),
        17..=21 => Some(KeyCode::F((first.parse::<u32>().ok()? - 11) as u8)),
        23 | 24 => Some(KeyCode::F((first.parse::<u32>().ok()? - 12) as u8)),
        _ => None,
    }
}

/// Parse a Kitty protocol `CSI u` payload:
/// `unicode-key-code[:shifted[:base]][;modifiers[:event-type]][;text-codepoints]`.
fn parse_kitty_key(raw: &str) -> Option<KeyEvent> {
    let mut fields = raw.split(';');
    let key_field = fields.next()?;
    let codepoint: u32 = key_field.split(':').next()?.parse().ok()?;

    let mut modifiers = Modifiers::NONE;
    let mut kind = KeyEventKind::Press;
    if let Some(mod_field) = fields.next() {
        let mut parts = mod_field.split(':');
        if let Some(m) = parts.next().and_then(|s| s.parse::<u32>().ok()) {
            modifiers = modifiers_from_param(m);
        }
        if let Some(e) = parts.next().and_then(|s| s.parse::<u32>().ok()) {
            kind = match e {
                2 => KeyEventKind::Repeat,
                3 => KeyEventKind::Release,
                _ => KeyEventKind::Press,
            };
        }
    }

    let code = kitty_functional_code(codepoint)
        .or_else(|| char::from_u32(codepoint).map(KeyCode::Char))
        .unwrap_or(KeyCode::Unknown(codepoint));

    Some(KeyEvent {
        code,
        modifiers,
        kind,
    })
}

/// Kitty protocol functional-key codepoints (from the private-use range
/// defined by the spec) that map to [`KeyCode`] variants other than `Char`.
fn kitty_functional_code(codepoint: u32) -> Option<KeyCode> {
    match codepoint {
        13 => Some(KeyCode::Enter),
        27 => Some(KeyCode::Escape),
        9 => Some(KeyCode::Tab),
        127 => Some(KeyCode::Backspace),
        57_350 => Some(KeyCode::Insert),
        57_351 => Some(KeyCode::Delete),
        57_352 => Some(KeyCode::Left),
        57_353 => Some(KeyCode::Right),
        57_354 => Some(KeyCode::Up),
        57_355 => Some(KeyCode::Down),
        57_356 => Some(KeyCode::PageUp),
        57_357 => Some(KeyCode::PageDown),
        57_358 => Some(KeyCode::Home),
        57_359 => Some(KeyCode::End),
        n @ 57_364..=57_375 => Some(KeyCode::F((n - 57_364 + 1) as u8)),
        _ => None,
    }
}

/// Parse an SGR mouse report's parameter string: `button;x;y`.
/// `released` distinguishes the trailing `m` (button up) from `M` (down/drag).
fn parse_sgr_mouse(params: &str, released: bool) -> Option<MouseEvent> {
    let mut parts = params.split(';');
    let code: u32 = parts.next()?.parse().ok()?;
    let x: u16 = parts.next()?.parse::<u16>().ok()?.checked_sub(1)?;
    let y: u16 = parts.next()?.parse::<u16>().ok()?.checked_sub(1)?;

    let modifiers = Modifiers {
        shift: code & 0x04 != 0,
        alt: code & 0x08 != 0,
        ctrl: code & 0x10 != 0,
        ..Modifiers::NONE
    };

    let motion = code & 0x20 != 0;
    let wheel = code & 0x40 != 0;
    let button_index = code & 0x03;

    let kind = if wheel {
        MouseEventKind::Scroll(if button_index == 0 {
            MouseButton::WheelUp
        } else {
            MouseButton::WheelDown
        })
    } else {
        let button = match button_index {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Left,
        };
        if released {
            MouseEventKind::Up(button)
        } else if motion {
            MouseEventKind::Drag(button)
        } else {
            MouseEventKind::Down(button)
        }
    };

    Some(MouseEvent {
        kind,
        x,
        y,
        modifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<Event> {
        Decoder::new()
            .feed(bytes)
            .into_iter()
            .map(|re| re.event)
            .collect()
    }

    #[test]
    fn feed_preserves_raw_bytes_for_each_event() {
        let raw_events = Decoder::new().feed(b"a\r");
        assert_eq!(raw_events.len(), 2);
        assert_eq!(raw_events[0].raw, b"a");
        assert_eq!(raw_events[1].raw, b"\r");
    }

    #[test]
    fn unrecognized_ss3_byte_becomes_raw_input() {
        let events = decode(b"\x1bOZ");
        assert_eq!(events, vec![Event::RawInput(vec![0x1b, b'O', b'Z'])]);
    }

    #[test]
    fn plain_ascii_char() {
        let events = decode(b"a");
        assert_eq!(events, vec![key_event(KeyCode::Char('a'), Modifiers::NONE)]);
    }

    #[test]
    fn enter_key() {
        let events = decode(b"\r");
        assert_eq!(events, vec![key_event(KeyCode::Enter, Modifiers::NONE)]);
    }

    #[test]
    fn ctrl_c() {
        let events = decode(&[0x03]);
        assert_eq!(events, vec![key_event(KeyCode::Char('c'), ctrl())]);
    }

    #[test]
    fn utf8_multibyte_char() {
        // 世 (U+4E16) is E4 B8 96 in UTF-8.
        let events = decode("\u{4e16}".as_bytes());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], key_event(KeyCode::Char('\u{4e16}'), Modifiers::NONE));
    }

    #[test]
    fn arrow_up() {
        let events = decode(b"\x1b[A");
        assert_eq!(events, vec![key_event(KeyCode::Up, Modifiers::NONE)]);
    }

    #[test]
    fn arrow_with_ctrl_modifier() {
        // CSI 1;5A = Ctrl+Up
        let events = decode(b"\x1b[1;5A");
        assert_eq!(events, vec![key_event(KeyCode::Up, ctrl())]);
    }

    #[test]
    fn ss3_f1() {
        let events = decode(b"\x1bOP");
        assert_eq!(events, vec![key_event(KeyCode::F(1), Modifiers::NONE)]);
    }

    #[test]
    fn delete_tilde() {
        let events = decode(b"\x1b[3~");
        assert_eq!(events, vec![key_event(KeyCode::Delete, Modifiers::NONE)]);
    }

    #[test]
    fn alt_char() {
        let events = decode(b"\x1bx");
        assert_eq!(events, vec![key_event(KeyCode::Char('x'), alt())]);
    }

    #[test]
    fn focus_gained_and_lost() {
        assert_eq!(decode(b"\x1b[I"), vec![Event::Focus(FocusEvent::Gained)]);
        assert_eq!(decode(b"\x1b[O"), vec![Event::Focus(FocusEvent::Lost)]);
    }

    #[test]
    fn bracketed_paste_roundtrip() {
        let events = decode(b"\x1b[200~hello world\x1b[201~");
        assert_eq!(
            events,
            vec![Event::Paste(PasteEvent {
                text: "hello world".into()
            })]
        );
    }

    #[test]
    fn bracketed_paste_fed_in_pieces() {
        let mut decoder = Decoder::new();
        let mut raw_events = decoder.feed(b"\x1b[200~hel");
        raw_events.extend(decoder.feed(b"lo\x1b[201~"));
        let events: Vec<Event> = raw_events.into_iter().map(|re| re.event).collect();
        assert_eq!(
            events,
            vec![Event::Paste(PasteEvent { text: "hello".into() })]
        );
    }

    #[test]
    fn kitty_plain_key_press() {
        // 'a' (97) with no modifier field.
        let events = decode(b"\x1b[97u");
        assert_eq!(events, vec![key_event(KeyCode::Char('a'), Modifiers::NONE)]);
    }

    #[test]
    fn kitty_key_with_modifiers_and_release() {
        // 'a' with ctrl (modifier field 5 = 4+1), event type 3 = release.
        let events = decode(b"\x1b[97;5:3u");
        assert_eq!(
            events,
            vec![Event::Key(KeyEvent {
                code: KeyCode::Char('a'),
                modifiers: ctrl(),
                kind: KeyEventKind::Release,
            })]
        );
    }

    #[test]
    fn kitty_functional_key() {
        // Left arrow (kitty codepoint 57352) with no modifiers.
        let events = decode(b"\x1b[57352u");
        assert_eq!(events, vec![key_event(KeyCode::Left, Modifiers::NONE)]);
    }

    #[test]
    fn mouse_left_click_down() {
        let events = decode(b"\x1b[<0;10;5M");
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                x: 9,
                y: 4,
                modifiers: Modifiers::NONE,
            })]
        );
    }

    #[test]
    fn mouse_drag_reports_motion_bit() {
        let events = decode(b"\x1b[<32;10;5M");
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                kind: MouseEventKind::Drag(MouseButton::Left),
                x: 9,
                y: 4,
                modifiers: Modifiers::NONE,
            })]
        );
    }

    #[test]
    fn mouse_release() {
        let events = decode(b"\x1b[<0;10;5m");
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                kind: MouseEventKind::Up(MouseButton::Left),
                x: 9,
                y: 4,
                modifiers: Modifiers::NONE,
            })]
        );
    }

    #[test]
    fn mouse_wheel_scroll() {
        let events = decode(b"\x1b[<64;3;3M");
        assert_eq!(
            events,
            vec![Event::Mouse(MouseEvent {
                kind: MouseEventKind::Scroll(MouseButton::WheelUp),
                x: 2,
                y: 2,
                modifiers: Modifiers::NONE,
            })]
        );
    }

    #[test]
    fn osc_sequence_consumed_without_events() {
        let events = decode(b"\x1b]0;title\x07a");
        // Only the trailing 'a' should produce an event.
        assert_eq!(events, vec![key_event(KeyCode::Char('a'), Modifiers::NONE)]);
    }

    #[test]
    fn unknown_csi_sequence_becomes_raw_input() {
        // spec.md §4.7: unrecognised sequences surface as `raw-input`
        // debug events, never as a key.
        let events = decode(b"\x1b[999z");
        assert_eq!(events, vec![Event::RawInput(b"\x1b[999z".to_vec())]);
    }

    #[test]
    fn oversized_csi_sequence_aborts_to_raw_input() {
        // Exactly enough param bytes to hit MAX_SEQUENCE_LEN and trigger
        // the abort on the very next byte, with nothing left over for
        // `Ground` to reinterpret as plain characters.
        let mut bytes = vec![0x1b, b'['];
        bytes.extend(std::iter::repeat(b'0').take(MAX_SEQUENCE_LEN + 1));
        let mut decoder = Decoder::new();
        let events: Vec<Event> = decoder.feed(&bytes).into_iter().map(|re| re.event).collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::RawInput(_)));

        // The decoder must have returned to Ground and be ready to parse
        // the next sequence normally.
        let resumed: Vec<Event> =
            decoder.feed(b"\x1b[A").into_iter().map(|re| re.event).collect();
        assert_eq!(resumed, vec![key_event(KeyCode::Up, Modifiers::NONE)]);
    }

    #[test]
    fn backspace_and_tab() {
        assert_eq!(decode(&[0x7f]), vec![key_event(KeyCode::Backspace, Modifiers::NONE)]);
        assert_eq!(decode(&[0x09]), vec![key_event(KeyCode::Tab, Modifiers::NONE)]);
    }
}
