//! Screen buffer — a 2D grid of terminal cells.

use crate::cell::Cell;
use crate::color::Color;
use crate::geometry::{Rect, Size};
use crate::style::Style;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A 2D grid of terminal cells representing one frame of terminal content.
#[derive(Clone, Debug)]
pub struct ScreenBuffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
    /// Stack of clip rectangles; writes through the drawing helpers
    /// (`fill_rect`, `draw_text`, `draw_box`, `blit`) are clamped to the
    /// intersection of all entries. Empty stack means "whole buffer".
    scissor_stack: Vec<Rect>,
}

impl ScreenBuffer {
    /// Create a new screen buffer filled with blank cells.
    pub fn new(size: Size) -> Self {
        let len = usize::from(size.width) * usize::from(size.height);
        Self {
            cells: vec![Cell::blank(); len],
            width: size.width,
            height: size.height,
            scissor_stack: Vec::new(),
        }
    }

    /// Get the buffer dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Get the buffer width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Get the buffer height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Clear the buffer, resetting all cells to blank.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::blank();
        }
    }

    /// Resize the buffer, preserving the region that overlaps the old and
    /// new dimensions and filling every newly exposed cell with blank. A
    /// wide cell whose continuation would no longer fit (because the
    /// resize truncated it, or cut its primary half away) is itself
    /// replaced with blank, matching [`ScreenBuffer::set`]'s rule that a
    /// wide character never appears without its continuation.
    pub fn resize(&mut self, size: Size) {
        let old_width = self.width;
        let old_cells = std::mem::take(&mut self.cells);
        let new_len = usize::from(size.width) * usize::from(size.height);
        let mut new_cells = vec![Cell::blank(); new_len];

        let copy_w = old_width.min(size.width);
        let copy_h = self.height.min(size.height);
        for y in 0..copy_h {
            for x in 0..copy_w {
                let old_idx = usize::from(y) * usize::from(old_width) + usize::from(x);
                let new_idx = usize::from(y) * usize::from(size.width) + usize::from(x);
                if let Some(cell) = old_cells.get(old_idx) {
                    new_cells[new_idx] = cell.clone();
                }
            }
        }

        self.width = size.width;
        self.height = size.height;
        self.cells = new_cells;

        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                if self.cells[idx].is_wide() {
                    let continues = x + 1 < self.width && self.cells[self.index(x + 1, y)].is_continuation();
                    if !continues {
                        self.cells[idx] = Cell::blank();
                    }
                } else if self.cells[idx].is_continuation() {
                    let has_primary = x > 0 && self.cells[self.index(x - 1, y)].is_wide();
                    if !has_primary {
                        self.cells[idx] = Cell::blank();
                    }
                }
            }
        }
    }

    /// Get a reference to the cell at (x, y), or `None` if out of bounds.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells.get(idx)
        } else {
            None
        }
    }

    /// Get a mutable reference to the cell at (x, y), or `None` if out of bounds.
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if x < self.width && y < self.height {
            let idx = self.index(x, y);
            self.cells.get_mut(idx)
        } else {
            None
        }
    }

    /// Set a cell at (x, y). If the cell is wide (width > 1), the next
    /// cell is automatically set to a continuation cell. No-op if out of bounds.
    ///
    /// This method handles wide character edge cases:
    /// - If writing over a continuation cell, the preceding wide character's
    ///   primary cell is blanked to avoid leaving a half-rendered glyph.
    /// - If writing over a wide character's primary cell, the old continuation
    ///   cell at x+1 is blanked.
    /// - If a wide character would place its continuation cell beyond the last
    ///   column, the wide character is replaced with a single space instead.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x >= self.width || y >= self.height {
            return;
        }

        let is_wide = cell.is_wide();

        // If this is a wide character at the last column (continuation would be out of bounds),
        // replace with a space instead of placing a half-visible wide character.
        if is_wide && x + 1 >= self.width {
            let idx = self.index(x, y);
            if let Some(c) = self.cells.get_mut(idx) {
                *c = Cell::blank();
            }
            return;
        }

        // If the cell we are about to overwrite is a continuation cell (width == 0),
        // blank the preceding cell that was the primary half of the wide character.
        let idx = self.index(x, y);
        if let Some(existing) = self.cells.get(idx)
            && existing.is_continuation()
            && x > 0
        {
            let prev_idx = self.index(x - 1, y);
            if let Some(prev) = self.cells.get_mut(prev_idx) {
                *prev = Cell::blank();
            }
        }

        // If the cell we are about to overwrite is a wide character (width > 1),
        // blank the old continuation cell at x+1.
        if let Some(existing) = self.cells.get(idx)
            && existing.is_wide()
        {
            let next_x = x + 1;
            if next_x < self.width {
                let next_idx = self.index(next_x, y);
                if let Some(cont) = self.cells.get_mut(next_idx) {
                    *cont = Cell::blank();
                }
            }
        }

        // Write the new cell
        if let Some(c) = self.cells.get_mut(idx) {
            *c = cell;
        }

        // Set continuation cell for wide characters
        if is_wide {
            let next_x = x + 1;
            if next_x < self.width {
                // If the continuation target is itself a wide character's primary cell,
                // blank that wide character's continuation cell too.
                let next_idx = self.index(next_x, y);
                if let Some(next_cell) = self.cells.get(next_idx)
                    && next_cell.is_wide()
                {
                    let after_next = next_x + 1;
                    if after_next < self.width {
                        let after_idx = self.index(after_next, y);
                        if let Some(after_cell) = self.cells.get_mut(after_idx) {
                            *after_cell = Cell::blank();
                        }
                    }
                }
                if let Some(c) = self.cells.get_mut(next_idx) {
                    *c = Cell::continuation();
                }
            }
        }
    }

    /// Get a row of cells as a slice.
    pub fn get_row(&self, y: u16) -> Option<&[Cell]> {
        if y < self.height {
            let start = self.index(0, y);
            let end = start + usize::from(self.width);
            Some(&self.cells[start..end])
        } else {
            None
        }
    }

    /// Compute the differences between this buffer and a previous buffer.
    /// Returns a list of cell changes needed to update the terminal. When
    /// `force` is set every cell is treated as dirty regardless of
    /// whether it actually changed — used to recover a display whose real
    /// on-screen contents are no longer trusted (after a write failure or
    /// a resize from a zero dimension).
    pub fn diff(&self, previous: &ScreenBuffer, force: bool) -> Vec<CellChange> {
        // If sizes differ, emit all non-blank cells as changes (full redraw)
        if force || self.width != previous.width || self.height != previous.height {
            return self.full_diff();
        }

        let mut changes = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let current = &self.cells[idx];
                let prev = &previous.cells[idx];
                if current != prev {
                    changes.push(CellChange {
                        x,
                        y,
                        cell: current.clone(),
                    });
                }
            }
        }
        changes
    }

    /// Generate changes for every cell (used when sizes differ).
    fn full_diff(&self) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = self.index(x, y);
                let cell = &self.cells[idx];
                changes.push(CellChange {
                    x,
                    y,
                    cell: cell.clone(),
                });
            }
        }
        changes
    }

    /// Convert (x, y) to a linear index.
    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.width) + usize::from(x)
    }

    /// Push a new clip rectangle, intersected with the current one (if any).
    /// Drawing helpers below will not write outside the resulting region.
    pub fn push_scissor(&mut self, rect: Rect) {
        let next = match self.scissor_stack.last() {
            Some(top) => top.intersect(&rect),
            None => rect.intersect(&Rect::new(0, 0, self.width, self.height)),
        };
        self.scissor_stack.push(next);
    }

    /// Pop the most recently pushed clip rectangle.
    pub fn pop_scissor(&mut self) {
        self.scissor_stack.pop();
    }

    /// The currently active clip rectangle, or the full buffer if none is set.
    pub fn current_scissor(&self) -> Rect {
        self.scissor_stack
            .last()
            .copied()
            .unwrap_or(Rect::new(0, 0, self.width, self.height))
    }

    /// Fill a rectangle with a single cell value, clipped to the buffer
    /// bounds and the active scissor region.
    pub fn fill_rect(&mut self, rect: Rect, cell: Cell) {
        let clip = self.current_scissor().intersect(&rect);
        for y in clip.position.y..clip.bottom() {
            for x in clip.position.x..clip.right() {
                self.set(x, y, cell.clone());
            }
        }
    }

    /// Draw a line of text starting at `(x, y)`, clipped to the buffer
    /// bounds and the active scissor region. Graphemes that would straddle
    /// the clip boundary are dropped rather than rendered half-visible.
    /// Returns the number of cells actually written.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style) -> u16 {
        let clip = self.current_scissor();
        if y < clip.position.y || y >= clip.bottom() {
            return 0;
        }
        let mut cursor = x;
        let mut written = 0u16;
        for grapheme in text.graphemes(true) {
            let gw = UnicodeWidthStr::width(grapheme) as u16;
            if gw == 0 {
                continue;
            }
            if cursor < clip.position.x || cursor + gw > clip.right() {
                break;
            }
            self.set(cursor, y, Cell::new(grapheme, style.clone()));
            cursor += gw;
            written += gw;
        }
        written
    }

    /// Draw a box border around `rect` using `chars` for the corner and
    /// edge glyphs, painting only the edges `sides` selects, clipped to the
    /// buffer bounds and the active scissor region. If `title` is given
    /// and the top edge is drawn, the text overwrites the top border,
    /// inset one cell from each corner and aligned per `TitleAlign`,
    /// truncated to fit if the interior is too narrow.
    pub fn draw_box(
        &mut self,
        rect: Rect,
        sides: BoxSides,
        chars: BorderChars,
        style: Style,
        title: Option<(&str, TitleAlign)>,
    ) {
        if rect.size.width < 2 || rect.size.height < 2 {
            return;
        }
        let x0 = rect.position.x;
        let y0 = rect.position.y;
        let x1 = rect.right() - 1;
        let y1 = rect.bottom() - 1;

        if sides.top && sides.left {
            self.draw_text(x0, y0, &chars.top_left.to_string(), style.clone());
        }
        if sides.top && sides.right {
            self.draw_text(x1, y0, &chars.top_right.to_string(), style.clone());
        }
        if sides.bottom && sides.left {
            self.draw_text(x0, y1, &chars.bottom_left.to_string(), style.clone());
        }
        if sides.bottom && sides.right {
            self.draw_text(x1, y1, &chars.bottom_right.to_string(), style.clone());
        }

        if sides.top {
            for x in (x0 + 1)..x1 {
                self.draw_text(x, y0, &chars.horizontal.to_string(), style.clone());
            }
        }
        if sides.bottom {
            for x in (x0 + 1)..x1 {
                self.draw_text(x, y1, &chars.horizontal.to_string(), style.clone());
            }
        }
        if sides.left {
            for y in (y0 + 1)..y1 {
                self.draw_text(x0, y, &chars.vertical.to_string(), style.clone());
            }
        }
        if sides.right {
            for y in (y0 + 1)..y1 {
                self.draw_text(x1, y, &chars.vertical.to_string(), style.clone());
            }
        }

        if sides.top
            && let Some((text, align)) = title
        {
            self.draw_title(x0, x1, y0, text, align, style);
        }
    }

    /// Overwrite the top border between the corners at `x0`/`x1` with
    /// `text`, padded with a one-cell gap and aligned per `align`,
    /// truncated by grapheme to fit the interior span.
    fn draw_title(&mut self, x0: u16, x1: u16, y: u16, text: &str, align: TitleAlign, style: Style) {
        let interior_start = x0 + 1;
        if x1 <= interior_start {
            return;
        }
        let interior_width = x1 - interior_start;

        let padded = format!(" {text} ");
        let mut clipped = String::new();
        let mut width_used = 0u16;
        for grapheme in padded.graphemes(true) {
            let gw = UnicodeWidthStr::width(grapheme) as u16;
            if width_used + gw > interior_width {
                break;
            }
            clipped.push_str(grapheme);
            width_used += gw;
        }
        if clipped.trim().is_empty() {
            return;
        }

        let start_x = match align {
            TitleAlign::Left => interior_start,
            TitleAlign::Center => interior_start + (interior_width - width_used) / 2,
            TitleAlign::Right => x1 - width_used,
        };
        self.draw_text(start_x, y, &clipped, style);
    }

    /// Write a cell at `(x, y)`, alpha-compositing its foreground and
    /// background independently onto whatever is already there using
    /// Porter-Duff "over" (the existing cell is always treated as fully
    /// opaque, matching a terminal grid's lack of a notion of partial
    /// alpha). Attribute bits are replaced wholesale, not merged. Wide
    /// graphemes and scissor clipping behave exactly as in [`Self::set`].
    pub fn set_cell_alpha(&mut self, x: u16, y: u16, grapheme: &str, style: Style) {
        let clip = self.current_scissor();
        if x < clip.position.x || x >= clip.right() || y < clip.position.y || y >= clip.bottom() {
            return;
        }
        let under_style = self.get(x, y).map(|c| c.style.clone()).unwrap_or_default();
        let composited = Style {
            fg: over_color(under_style.fg, style.fg, style.fg_alpha),
            bg: over_color(under_style.bg, style.bg, style.bg_alpha),
            fg_alpha: 255,
            bg_alpha: 255,
            bold: style.bold,
            dim: style.dim,
            italic: style.italic,
            underline: style.underline,
            reverse: style.reverse,
            strikethrough: style.strikethrough,
            blink: style.blink,
            hidden: style.hidden,
        };
        self.set(x, y, Cell::new(grapheme, composited));
    }

    /// Composite another buffer onto this one at `dest`, blending each
    /// source cell with what is already present according to `alpha`
    /// (0 = fully transparent, leaves this buffer untouched; 255 = fully
    /// opaque, behaves like an unclipped overwrite). Clipped to the buffer
    /// bounds and the active scissor region.
    pub fn blit(&mut self, src: &ScreenBuffer, dest: crate::geometry::Position, alpha: u8) {
        let clip = self.current_scissor();
        for sy in 0..src.height {
            let dy = dest.y + sy;
            if dy < clip.position.y || dy >= clip.bottom() {
                continue;
            }
            for sx in 0..src.width {
                let dx = dest.x + sx;
                if dx < clip.position.x || dx >= clip.right() {
                    continue;
                }
                let Some(src_cell) = src.get(sx, sy) else {
                    continue;
                };
                if src_cell.is_continuation() {
                    continue;
                }
                if src_cell.style.fg_alpha == 0 && src_cell.style.bg_alpha == 0 {
                    continue;
                }
                let blended = match self.get(dx, dy) {
                    Some(under) => blend_cell(under, src_cell, alpha),
                    None => src_cell.clone(),
                };
                self.set(dx, dy, blended);
            }
        }
    }
}

/// Blend `over` onto `under` using a single alpha value applied to
/// color channels; boolean attributes and the glyph itself snap to
/// whichever side `alpha` favors (round to nearest, ties to `over`).
fn blend_cell(under: &Cell, over: &Cell, alpha: u8) -> Cell {
    if alpha >= 255 {
        return over.clone();
    }
    if alpha == 0 {
        return under.clone();
    }
    let favor_over = alpha >= 128;
    let grapheme = if favor_over {
        over.grapheme.clone()
    } else {
        under.grapheme.clone()
    };
    let width = if favor_over { over.width } else { under.width };
    let style = Style {
        fg: blend_color(under.style.fg, over.style.fg, alpha),
        bg: blend_color(under.style.bg, over.style.bg, alpha),
        fg_alpha: 255,
        bg_alpha: 255,
        bold: if favor_over { over.style.bold } else { under.style.bold },
        dim: if favor_over { over.style.dim } else { under.style.dim },
        italic: if favor_over { over.style.italic } else { under.style.italic },
        underline: if favor_over { over.style.underline } else { under.style.underline },
        reverse: if favor_over { over.style.reverse } else { under.style.reverse },
        strikethrough: if favor_over {
            over.style.strikethrough
        } else {
            under.style.strikethrough
        },
        blink: if favor_over { over.style.blink } else { under.style.blink },
        hidden: if favor_over { over.style.hidden } else { under.style.hidden },
    };
    Cell {
        grapheme,
        style,
        width,
    }
}

/// Porter-Duff "over" for a single color channel pair, treating `under`
/// as fully opaque: exact at the `alpha` extremes (0 = `under`, 255 =
/// `over`), interpolated between.
fn over_color(under: Option<Color>, over: Option<Color>, alpha: u8) -> Option<Color> {
    match alpha {
        255 => over.or(under),
        0 => under,
        _ => blend_color(under, over, alpha),
    }
}

/// Blend two optional colors. `Rgb` colors are interpolated channel-wise;
/// any other combination snaps to whichever side `alpha` favors.
fn blend_color(under: Option<Color>, over: Option<Color>, alpha: u8) -> Option<Color> {
    match (under, over) {
        (Some(Color::Rgb { r: ur, g: ug, b: ub }), Some(Color::Rgb { r: or, g: og, b: ob })) => {
            let a = u16::from(alpha);
            let lerp = |u: u8, o: u8| -> u8 {
                (((256 - a) * u16::from(u) + a * u16::from(o)) / 256) as u8
            };
            Some(Color::Rgb {
                r: lerp(ur, or),
                g: lerp(ug, og),
                b: lerp(ub, ob),
            })
        }
        _ => {
            if alpha >= 128 {
                over
            } else {
                under
            }
        }
    }
}

/// A single cell change: position + new cell value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellChange {
    /// Column position.
    pub x: u16,
    /// Row position.
    pub y: u16,
    /// New cell value.
    pub cell: Cell,
}

/// Which edges [`ScreenBuffer::draw_box`] paints. A named-bool struct
/// rather than a raw bitmask, matching how [`crate::tree::Capabilities`]
/// models other small fixed sets of flags in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxSides {
    /// Paint the top edge (and the two top corners, if their adjoining
    /// side is also painted).
    pub top: bool,
    /// Paint the bottom edge.
    pub bottom: bool,
    /// Paint the left edge.
    pub left: bool,
    /// Paint the right edge.
    pub right: bool,
}

impl BoxSides {
    /// All four edges.
    pub const ALL: Self = Self {
        top: true,
        bottom: true,
        left: true,
        right: true,
    };
}

impl Default for BoxSides {
    fn default() -> Self {
        Self::ALL
    }
}

/// The six glyphs [`ScreenBuffer::draw_box`] uses for a box's corners and
/// edges. Build one directly for a fully custom border, or convert from a
/// [`BorderStyle`] preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorderChars {
    /// Top-left corner.
    pub top_left: char,
    /// Top-right corner.
    pub top_right: char,
    /// Bottom-left corner.
    pub bottom_left: char,
    /// Bottom-right corner.
    pub bottom_right: char,
    /// Horizontal edge (top and bottom).
    pub horizontal: char,
    /// Vertical edge (left and right).
    pub vertical: char,
}

impl Default for BorderChars {
    fn default() -> Self {
        BorderStyle::Single.into()
    }
}

/// A named border-glyph preset, the "style table" a caller picks from
/// instead of spelling out six characters by hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderStyle {
    /// Light single-line box-drawing characters (`┌─┐│└┘`).
    Single,
    /// Double-line box-drawing characters (`╔═╗║╚╝`).
    Double,
    /// Rounded-corner box-drawing characters (`╭─╮│╰╯`).
    Rounded,
    /// Heavy single-line box-drawing characters (`┏━┓┃┗┛`).
    Heavy,
}

impl From<BorderStyle> for BorderChars {
    fn from(style: BorderStyle) -> Self {
        match style {
            BorderStyle::Single => BorderChars {
                top_left: '\u{250c}',
                top_right: '\u{2510}',
                bottom_left: '\u{2514}',
                bottom_right: '\u{2518}',
                horizontal: '\u{2500}',
                vertical: '\u{2502}',
            },
            BorderStyle::Double => BorderChars {
                top_left: '\u{2554}',
                top_right: '\u{2557}',
                bottom_left: '\u{255a}',
                bottom_right: '\u{255d}',
                horizontal: '\u{2550}',
                vertical: '\u{2551}',
            },
            BorderStyle::Rounded => BorderChars {
                top_left: '\u{256d}',
                top_right: '\u{256e}',
                bottom_left: '\u{2570}',
                bottom_right: '\u{256f}',
                horizontal: '\u{2500}',
                vertical: '\u{2502}',
            },
            BorderStyle::Heavy => BorderChars {
                top_left: '\u{250f}',
                top_right: '\u{2513}',
                bottom_left: '\u{2517}',
                bottom_right: '\u{251b}',
                horizontal: '\u{2501}',
                vertical: '\u{2503}',
            },
        }
    }
}

/// Where [`ScreenBuffer::draw_box`]'s optional title text anchors along
/// the top border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleAlign {
    /// Flush against the top-left corner's one-cell gap.
    Left,
    /// Centered within the top border's interior span.
    Center,
    /// Flush against the top-right corner's one-cell gap.
    Right,
}
