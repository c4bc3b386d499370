//! Error types for termgrid.

use std::io;

/// Error type for termgrid operations.
#[derive(Debug, thiserror::Error)]
pub enum TermGridError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Terminal operation failed.
    #[error("terminal error: {0}")]
    Terminal(String),

    /// Layout calculation failed.
    #[error("layout error: {0}")]
    Layout(String),

    /// Style or color handling error.
    #[error("style error: {0}")]
    Style(String),

    /// Rendering failed.
    #[error("render error: {0}")]
    Render(String),

    /// Renderable tree error (unknown id, cycle, orphaned node).
    #[error("tree error: {0}")]
    Tree(String),

    /// Input decoding error.
    #[error("input decode error: {0}")]
    Input(String),

    /// Unicode handling error.
    #[error("unicode error: {0}")]
    Unicode(String),

    /// Internal error — should not occur in correct usage.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for termgrid operations.
pub type Result<T> = std::result::Result<T, TermGridError>;
