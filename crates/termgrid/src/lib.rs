//! termgrid: a cell-buffer terminal UI runtime.
//!
//! Provides the rendering pipeline for retained-mode terminal
//! applications: a packed cell buffer with alpha compositing and a
//! scissor stack, a z-ordered compositor, a diff-and-flush encoder that
//! emits minimal ANSI escape sequences, a hit grid for mouse dispatch,
//! and a byte-level input decoder covering keys, mouse, paste, focus,
//! and the Kitty keyboard protocol.

pub mod buffer;
pub mod cell;
pub mod color;
pub mod compositor;
pub mod error;
pub mod event;
pub mod focus;
pub mod frame_loop;
pub mod geometry;
pub mod hit_grid;
pub mod input;
pub mod layout;
pub mod render_context;
pub mod renderer;
pub mod router;
pub mod segment;
pub mod style;
pub mod terminal;
pub mod text;
pub mod text_buffer;
pub mod tree;
pub mod widget;
pub mod wrap;

pub use buffer::{BorderChars, BorderStyle, BoxSides, CellChange, ScreenBuffer, TitleAlign};
pub use cell::Cell;
pub use color::{Color, NamedColor};
pub use compositor::{Compositor, CompositorError, CompositorRegion, Layer};
pub use error::{Result, TermGridError};
pub use event::{
    Event, FocusEvent, KeyCode, KeyEvent, MouseButton, MouseEvent, PasteEvent, RawEvent,
    ResizeEvent,
};
pub use event::Modifiers;
pub use focus::{FocusManager, WidgetId};
pub use frame_loop::{FrameDriver, FrameLoop, FrameStats};
pub use geometry::{Position, Rect, Size};
pub use hit_grid::HitGrid;
pub use input::Decoder;
pub use layout::{LayoutEngine, LayoutResult, OverflowBehavior, ScrollManager, ScrollState};
pub use render_context::RenderContext;
pub use renderer::{DeltaBatch, Renderer, batch_changes, build_sgr_sequence};
pub use router::EventRouter;
pub use segment::Segment;
pub use style::Style;
pub use terminal::{
    ColorSupport, CrosstermBackend, PaletteCache, Terminal, TerminalCapabilities,
    TerminalController, TerminalOptions, TerminalQuerier, TestBackend,
};
pub use text::{TextConfig, expand_tabs, filter_control_chars, preprocess};
pub use text_buffer::{Selection, TextBuffer};
pub use tree::{NodeId, Renderable, Tree};
pub use widget::{EventResult, InteractiveWidget, SizedWidget, Widget};
pub use wrap::{
    WrapLine, WrapMode, WrapResult, line_number_width, wrap_line, wrap_line_mode, wrap_lines,
    wrap_lines_mode,
};
