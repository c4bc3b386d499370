//! Layout: a taffy-backed flexbox adapter plus scroll-region bookkeeping.

pub mod engine;
pub mod scroll;

pub use engine::{LayoutEngine, LayoutResult};
pub use scroll::{OverflowBehavior, ScrollManager, ScrollState};
