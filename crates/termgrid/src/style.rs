//! Cell-level text styling.

use crate::color::Color;

/// Visual attributes applied to a single cell's grapheme.
///
/// Built with a fluent, chainable API so call sites read as a short
/// description of the desired look: `Style::new().fg(red).bold(true)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Style {
    /// Foreground color, or `None` to inherit the terminal default.
    pub fg: Option<Color>,
    /// Background color, or `None` to inherit the terminal default.
    pub bg: Option<Color>,
    /// Foreground alpha (0 = fully transparent, 255 = fully opaque).
    /// Only meaningful to `set_cell_alpha`/compositing; a cell sitting in
    /// a buffer that is about to be flushed to the terminal is always
    /// fully opaque, since terminals have no notion of partial alpha.
    pub fg_alpha: u8,
    /// Background alpha (0 = fully transparent, 255 = fully opaque).
    pub bg_alpha: u8,
    /// Bold/increased intensity.
    pub bold: bool,
    /// Dim/decreased intensity.
    pub dim: bool,
    /// Italic.
    pub italic: bool,
    /// Underline.
    pub underline: bool,
    /// Reverse video (swap fg/bg).
    pub reverse: bool,
    /// Strikethrough.
    pub strikethrough: bool,
    /// Blink.
    pub blink: bool,
    /// Hidden/concealed text.
    pub hidden: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fg: None,
            bg: None,
            fg_alpha: 255,
            bg_alpha: 255,
            bold: false,
            dim: false,
            italic: false,
            underline: false,
            reverse: false,
            strikethrough: false,
            blink: false,
            hidden: false,
        }
    }
}

impl Style {
    /// Create a new, empty style (no color, no attributes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    /// Set the background color.
    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    /// Set the foreground alpha (0 = transparent, 255 = opaque).
    pub fn fg_alpha(mut self, alpha: u8) -> Self {
        self.fg_alpha = alpha;
        self
    }

    /// Set the background alpha (0 = transparent, 255 = opaque).
    pub fn bg_alpha(mut self, alpha: u8) -> Self {
        self.bg_alpha = alpha;
        self
    }

    /// `true` when both the foreground and background are fully opaque,
    /// matching spec's "a cell is opaque when both fg.a and bg.a are 1".
    pub fn is_opaque(&self) -> bool {
        self.fg_alpha == 255 && self.bg_alpha == 255
    }

    /// Set the bold attribute.
    pub fn bold(mut self, value: bool) -> Self {
        self.bold = value;
        self
    }

    /// Set the dim attribute.
    pub fn dim(mut self, value: bool) -> Self {
        self.dim = value;
        self
    }

    /// Set the italic attribute.
    pub fn italic(mut self, value: bool) -> Self {
        self.italic = value;
        self
    }

    /// Set the underline attribute.
    pub fn underline(mut self, value: bool) -> Self {
        self.underline = value;
        self
    }

    /// Set the reverse-video attribute.
    pub fn reverse(mut self, value: bool) -> Self {
        self.reverse = value;
        self
    }

    /// Set the strikethrough attribute.
    pub fn strikethrough(mut self, value: bool) -> Self {
        self.strikethrough = value;
        self
    }

    /// Set the blink attribute.
    pub fn blink(mut self, value: bool) -> Self {
        self.blink = value;
        self
    }

    /// Set the hidden/concealed attribute.
    pub fn hidden(mut self, value: bool) -> Self {
        self.hidden = value;
        self
    }

    /// `true` if no color or attribute is set — rendering this style
    /// requires no SGR sequence at all.
    pub fn is_empty(&self) -> bool {
        self.fg.is_none()
            && self.bg.is_none()
            && !self.bold
            && !self.dim
            && !self.italic
            && !self.underline
            && !self.reverse
            && !self.strikethrough
            && !self.blink
            && !self.hidden
    }

    /// Merge `other` on top of this style: any attribute `other` sets
    /// explicitly (color, or a `true` boolean) overrides this style's.
    /// Used when compositing a cell painted by an ancestor layer under
    /// one painted by a descendant.
    pub fn merge(&self, other: &Style) -> Style {
        Style {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            fg_alpha: if other.fg.is_some() { other.fg_alpha } else { self.fg_alpha },
            bg_alpha: if other.bg.is_some() { other.bg_alpha } else { self.bg_alpha },
            bold: other.bold || self.bold,
            dim: other.dim || self.dim,
            italic: other.italic || self.italic,
            underline: other.underline || self.underline,
            reverse: other.reverse || self.reverse,
            strikethrough: other.strikethrough || self.strikethrough,
            blink: other.blink || self.blink,
            hidden: other.hidden || self.hidden,
        }
    }
}
