//! Byte-level terminal input decoding.
//!
//! Terminals deliver input as a raw byte stream mixing UTF-8 text,
//! control characters, and ANSI/VT escape sequences (cursor keys, mouse
//! reports, bracketed paste, and — on capable terminals — the Kitty
//! keyboard protocol's `CSI u` key reports). [`Decoder`] turns that
//! stream into [`crate::event::Event`] values one byte at a time, so it
//! can be fed directly from a non-blocking read loop without needing to
//! buffer whole escape sequences up front.

mod decoder;

pub use decoder::Decoder;
