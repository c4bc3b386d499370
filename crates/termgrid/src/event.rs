//! Input event types produced by the terminal input decoder.

/// Keyboard modifier flags. Bitwise-combinable.
///
/// Mirrors the Kitty keyboard protocol's eight-bit modifier field
/// (`shift, alt, ctrl, super, hyper, meta, caps-lock, num-lock`); legacy
/// xterm-style CSI modifiers only ever populate the first four.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift held.
    pub shift: bool,
    /// Alt/Option held.
    pub alt: bool,
    /// Control held.
    pub ctrl: bool,
    /// Super/Cmd/Windows held.
    pub super_key: bool,
    /// Hyper held (Kitty protocol only).
    pub hyper: bool,
    /// Meta held (Kitty protocol only; distinct from Alt).
    pub meta: bool,
    /// Caps Lock active (Kitty protocol only).
    pub caps_lock: bool,
    /// Num Lock active (Kitty protocol only).
    pub num_lock: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
        super_key: false,
        hyper: false,
        meta: false,
        caps_lock: false,
        num_lock: false,
    };

    /// `true` if no modifier is held.
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

/// The logical key identified by a key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Backspace.
    Backspace,
    /// Tab.
    Tab,
    /// Shift+Tab (back-tab).
    BackTab,
    /// Delete.
    Delete,
    /// Insert.
    Insert,
    /// Home.
    Home,
    /// End.
    End,
    /// Page Up.
    PageUp,
    /// Page Down.
    PageDown,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Function key, 1-based (`F(1)` is F1).
    F(u8),
    /// A key the decoder recognized but does not model explicitly, carrying
    /// the Kitty protocol's raw unicode-key-code.
    Unknown(u32),
}

/// The kind of key action, as reported by the Kitty keyboard protocol.
/// Terminals without Kitty support only ever produce [`KeyEventKind::Press`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KeyEventKind {
    /// Key pressed down.
    #[default]
    Press,
    /// Key released.
    Release,
    /// Key auto-repeated while held.
    Repeat,
}

/// A single keyboard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    /// The logical key.
    pub code: KeyCode,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
    /// Press, release, or repeat. Release/repeat only ever appear when the
    /// Kitty keyboard protocol is enabled.
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// Construct a key event with no modifiers and `Press` kind.
    pub fn plain(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    /// Construct a key event with explicit modifiers and `Press` kind.
    pub fn with_modifiers(code: KeyCode, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            kind: KeyEventKind::Press,
        }
    }
}

/// The mouse button or wheel axis involved in a [`MouseEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MouseButton {
    /// Left button.
    Left,
    /// Middle button.
    Middle,
    /// Right button.
    Right,
    /// Scroll wheel up.
    WheelUp,
    /// Scroll wheel down.
    WheelDown,
}

/// The kind of mouse action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    /// Button pressed down.
    Down(MouseButton),
    /// Button released.
    Up(MouseButton),
    /// Mouse moved while a button is held.
    Drag(MouseButton),
    /// Mouse moved with no button held (requires `1003`/any-event tracking).
    Moved,
    /// Wheel scrolled.
    Scroll(MouseButton),
}

/// A single mouse event, in cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    /// What happened.
    pub kind: MouseEventKind,
    /// Column, zero-based.
    pub x: u16,
    /// Row, zero-based.
    pub y: u16,
    /// Modifiers held at the time of the event.
    pub modifiers: Modifiers,
}

/// A bracketed-paste payload, delivered as one event for the whole paste
/// rather than as a stream of key events.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasteEvent {
    /// The pasted text, with bracketed-paste markers stripped.
    pub text: String,
}

/// Terminal focus transition, reported when focus events are enabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FocusEvent {
    /// The terminal gained focus.
    Gained,
    /// The terminal lost focus.
    Lost,
}

/// A terminal resize, reported in cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResizeEvent {
    /// New width in cells.
    pub width: u16,
    /// New height in cells.
    pub height: u16,
}

/// A single decoded input event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// A keyboard event.
    Key(KeyEvent),
    /// A mouse event.
    Mouse(MouseEvent),
    /// A bracketed paste.
    Paste(PasteEvent),
    /// A focus gain/loss.
    Focus(FocusEvent),
    /// A terminal resize.
    Resize(ResizeEvent),
    /// A complete escape sequence the decoder could not map to any other
    /// event, carrying the bytes that produced it. Emitted instead of
    /// silently discarding the sequence, so a host application can log or
    /// replay unrecognized terminal responses.
    RawInput(Vec<u8>),
}

/// An [`Event`] paired with the exact input bytes that produced it.
///
/// [`crate::input::Decoder::feed`] returns these rather than bare events so
/// callers that need byte-exact replay or debugging (e.g. recording a
/// session) don't have to reconstruct the original bytes from the parsed
/// event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    /// The decoded event.
    pub event: Event,
    /// The raw bytes consumed to produce `event`.
    pub raw: Vec<u8>,
}
