//! Rope-backed text storage with a byte-offset selection model.

use ropey::Rope;
use unicode_width::UnicodeWidthChar;

use crate::buffer::ScreenBuffer;
use crate::cell::Cell;
use crate::color::Color;
use crate::style::Style;
use crate::wrap::{WrapLine, WrapMode, wrap_lines_mode};

/// A single contiguous selection, as byte offsets into the rope.
///
/// `anchor` is where the selection started; `head` is where it currently
/// ends (and where the cursor visually sits). Either may be larger than
/// the other — callers that need a normalized `(start, end)` pair should
/// use [`Selection::range`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Byte offset where the selection was started.
    pub anchor: usize,
    /// Byte offset of the active end (the cursor).
    pub head: usize,
}

impl Selection {
    /// A collapsed selection (cursor with no selected range) at `offset`.
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Whether this selection has no selected range.
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// The normalized `(start, end)` byte range, with `start <= end`.
    pub fn range(&self) -> (usize, usize) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }
}

/// One contiguous run of uniformly-styled text, as a byte range into the
/// buffer's text. Runs are kept sorted, non-overlapping, and covering
/// `[0, len_bytes())` with no gaps; adjacent runs with identical style are
/// merged so the run count stays proportional to the number of distinct
/// styled spans, not the number of edits that produced them.
#[derive(Clone, Debug, PartialEq, Eq)]
struct StyledRun {
    start: usize,
    end: usize,
    style: Style,
}

/// An append-only-flavored styled text store: a rope for the bytes plus a
/// run-length list of (byte range, style) alongside it, so editing at a
/// byte offset only touches the runs that overlap it.
///
/// Selection is a separate overlay — `(start, end, fg, bg)` — applied at
/// draw time on top of whatever style a run assigns; it is never folded
/// into the run list itself.
#[derive(Clone, Debug)]
pub struct TextBuffer {
    rope: Rope,
    runs: Vec<StyledRun>,
    selection: Option<(usize, usize, Color, Color)>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            runs: Vec::new(),
            selection: None,
        }
    }

    /// Build a buffer from existing text, styled uniformly with the
    /// default style.
    pub fn from_text(text: &str) -> Self {
        let runs = if text.is_empty() {
            Vec::new()
        } else {
            vec![StyledRun {
                start: 0,
                end: text.len(),
                style: Style::default(),
            }]
        };
        Self {
            rope: Rope::from_str(text),
            runs,
            selection: None,
        }
    }

    /// Total length in bytes.
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Whether the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Number of logical lines. A trailing newline does not count as
    /// starting an additional empty line.
    pub fn line_count(&self) -> usize {
        let lines = self.rope.len_lines();
        if lines > 1 && self.rope.line(lines - 1).len_bytes() == 0 {
            lines - 1
        } else {
            lines
        }
    }

    /// The text of a single logical line, without its trailing newline.
    pub fn line(&self, index: usize) -> Option<String> {
        if index >= self.line_count() {
            return None;
        }
        let line = self.rope.line(index);
        let text = line.to_string();
        Some(text.trim_end_matches(['\n', '\r']).to_string())
    }

    /// The full text content.
    pub fn to_string(&self) -> String {
        self.rope.to_string()
    }

    /// Convert a byte offset to `(line, column)`, both 0-based, column in
    /// characters.
    pub fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_bytes());
        let line = self.rope.byte_to_line(offset);
        let line_start = self.rope.line_to_byte(line);
        let col = self.rope.byte_slice(line_start..offset).chars().count();
        (line, col)
    }

    /// Convert `(line, column)` (column in characters) to a byte offset,
    /// clamped to the line's actual length.
    pub fn line_col_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_bytes();
        }
        let line_slice = self.rope.line(line);
        let clamped_col = column.min(line_slice.len_chars());
        let line_start = self.rope.line_to_byte(line);
        line_start + line_slice.char_to_byte(clamped_col)
    }

    /// Insert text at a byte offset, inheriting the style already present
    /// at that offset (the style of the run being split, or the default
    /// style in an empty buffer).
    pub fn insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.rope.len_bytes());
        let style = self.style_at(offset);
        self.insert_text_and_runs(offset, text, style);
    }

    /// Remove the byte range `[start, end)`.
    pub fn remove(&mut self, start: usize, end: usize) {
        let len = self.rope.len_bytes();
        let start = start.min(len);
        let end = end.min(len).max(start);
        let char_start = self.rope.byte_to_char(start);
        let char_end = self.rope.byte_to_char(end);
        self.rope.remove(char_start..char_end);
        self.remove_runs(start, end);
        if let Some((sel_start, sel_end, _, _)) = &mut self.selection {
            let removed = end - start;
            if *sel_start >= end {
                *sel_start -= removed;
            } else if *sel_start > start {
                *sel_start = start;
            }
            if *sel_end >= end {
                *sel_end -= removed;
            } else if *sel_end > start {
                *sel_end = start;
            }
        }
    }

    /// Extend the buffer with `text` styled as `style` — the append-only
    /// entry point named by the run store's contract.
    pub fn append(&mut self, text: &str, style: Style) {
        let offset = self.len_bytes();
        self.insert_text_and_runs(offset, text, style);
    }

    /// Replace the byte range `[start, end)` with `text`, styled as `style`.
    pub fn replace(&mut self, start: usize, end: usize, text: &str, style: Style) {
        self.remove(start, end);
        let start = start.min(self.len_bytes());
        self.insert_text_and_runs(start, text, style);
    }

    /// The style in effect at `offset` — the run containing it, or the
    /// last run if `offset` is exactly at the end of the buffer, or the
    /// default style if the buffer has no runs yet.
    pub fn style_at(&self, offset: usize) -> Style {
        let offset = offset.min(self.len_bytes());
        if let Some(run) = self
            .runs
            .iter()
            .find(|run| run.start <= offset && offset < run.end)
        {
            return run.style.clone();
        }
        self.runs
            .last()
            .map(|run| run.style.clone())
            .unwrap_or_default()
    }

    /// Set the selection overlay: bytes in `[start, end)` render with
    /// `sel_fg`/`sel_bg` in place of whatever their run assigns. Offsets
    /// are clamped to the buffer's current length.
    pub fn selection_set(&mut self, start: usize, end: usize, sel_fg: Color, sel_bg: Color) {
        let len = self.len_bytes();
        let start = start.min(len);
        let end = end.min(len).max(start);
        self.selection = Some((start, end, sel_fg, sel_bg));
    }

    /// Remove the selection overlay, if any.
    pub fn selection_clear(&mut self) {
        self.selection = None;
    }

    /// Blit the visible viewport into `dst` at `(x, y)`: wrap the buffer
    /// to `view_w` columns under `wrap_mode`, take the visual lines in
    /// `[scroll_y, scroll_y + view_h)`, shift each by `scroll_x` columns,
    /// and resolve each cell's style from the run list with the selection
    /// overlay applied last.
    pub fn draw(
        &self,
        dst: &mut ScreenBuffer,
        x: u16,
        y: u16,
        scroll_x: usize,
        scroll_y: usize,
        view_w: u16,
        view_h: u16,
        wrap_mode: WrapMode,
    ) {
        if view_w == 0 || view_h == 0 {
            return;
        }
        let wrap_width = match wrap_mode {
            WrapMode::None => usize::MAX,
            _ => view_w as usize,
        };
        let wrapped = wrap_lines_mode(self, wrap_width, wrap_mode);
        for (row, visual_line) in wrapped
            .lines
            .iter()
            .enumerate()
            .skip(scroll_y)
            .take(view_h as usize)
        {
            let dst_y = y + (row - scroll_y) as u16;
            self.draw_visual_line(dst, visual_line, x, dst_y, scroll_x, view_w);
        }
    }

    fn draw_visual_line(
        &self,
        dst: &mut ScreenBuffer,
        vline: &WrapLine,
        x: u16,
        y: u16,
        scroll_x: usize,
        view_w: u16,
    ) {
        let line_byte_start = self.rope.line_to_byte(vline.logical_line);
        let line_slice = self.rope.line(vline.logical_line);
        let mut col_in_view: i64 = -(scroll_x as i64);
        let mut char_col = vline.start_col;
        for ch in vline.text.chars() {
            let ch_width = ch.width().unwrap_or(0) as i64;
            if ch_width > 0 && col_in_view >= 0 && (col_in_view as u16) < view_w {
                let byte_off = line_byte_start + line_slice.char_to_byte(char_col);
                let style = self.resolve_style(byte_off);
                let cell_x = x + col_in_view as u16;
                dst.set(cell_x, y, Cell::new(ch.to_string(), style));
            }
            col_in_view += ch_width;
            char_col += 1;
        }
    }

    /// The run style at `offset`, with the selection overlay's fg/bg
    /// swapped in if `offset` falls inside the active selection.
    fn resolve_style(&self, offset: usize) -> Style {
        let style = self.style_at(offset);
        match &self.selection {
            Some((start, end, sel_fg, sel_bg)) if offset >= *start && offset < *end => {
                style.fg(*sel_fg).bg(*sel_bg)
            }
            _ => style,
        }
    }

    fn insert_text_and_runs(&mut self, offset: usize, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        let char_idx = self.rope.byte_to_char(offset.min(self.rope.len_bytes()));
        self.rope.insert(char_idx, text);
        self.insert_runs(offset, text.len(), style);
    }

    /// Splice a new run of length `ins_len` styled as `style` at `offset`
    /// into the run list, shifting every run (or run fragment) at or after
    /// `offset` forward by `ins_len`.
    fn insert_runs(&mut self, offset: usize, ins_len: usize, style: Style) {
        let mut new_runs = Vec::with_capacity(self.runs.len() + 1);
        let mut inserted = false;
        for run in &self.runs {
            if run.end <= offset {
                new_runs.push(run.clone());
            } else if run.start >= offset {
                if !inserted {
                    new_runs.push(StyledRun {
                        start: offset,
                        end: offset + ins_len,
                        style: style.clone(),
                    });
                    inserted = true;
                }
                new_runs.push(StyledRun {
                    start: run.start + ins_len,
                    end: run.end + ins_len,
                    style: run.style.clone(),
                });
            } else {
                // `offset` falls strictly inside this run: split it.
                new_runs.push(StyledRun {
                    start: run.start,
                    end: offset,
                    style: run.style.clone(),
                });
                new_runs.push(StyledRun {
                    start: offset,
                    end: offset + ins_len,
                    style: style.clone(),
                });
                inserted = true;
                new_runs.push(StyledRun {
                    start: offset + ins_len,
                    end: run.end + ins_len,
                    style: run.style.clone(),
                });
            }
        }
        if !inserted {
            new_runs.push(StyledRun {
                start: offset,
                end: offset + ins_len,
                style,
            });
        }
        self.runs = new_runs;
        self.normalize_runs();
    }

    /// Remove `[start, end)` from the run list, clipping any run that
    /// overlaps it and shifting everything after it back by the removed
    /// length.
    fn remove_runs(&mut self, start: usize, end: usize) {
        let removed = end - start;
        if removed == 0 {
            return;
        }
        let mut new_runs = Vec::with_capacity(self.runs.len());
        for run in &self.runs {
            if run.end <= start {
                new_runs.push(run.clone());
            } else if run.start >= end {
                new_runs.push(StyledRun {
                    start: run.start - removed,
                    end: run.end - removed,
                    style: run.style.clone(),
                });
            } else {
                let left_len = start.saturating_sub(run.start);
                let right_len = run.end.saturating_sub(end);
                if left_len > 0 {
                    new_runs.push(StyledRun {
                        start: run.start,
                        end: run.start + left_len,
                        style: run.style.clone(),
                    });
                }
                if right_len > 0 {
                    new_runs.push(StyledRun {
                        start,
                        end: start + right_len,
                        style: run.style.clone(),
                    });
                }
            }
        }
        self.runs = new_runs;
        self.normalize_runs();
    }

    /// Drop zero-length runs and merge adjacent runs with identical style.
    fn normalize_runs(&mut self) {
        self.runs.retain(|run| run.start < run.end);
        self.runs.sort_by_key(|run| run.start);
        let mut merged: Vec<StyledRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if let Some(last) = merged.last_mut() {
                if last.end == run.start && last.style == run.style {
                    last.end = run.end;
                    continue;
                }
            }
            merged.push(run);
        }
        self.runs = merged;
    }

    /// The text within a byte range.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let len = self.rope.len_bytes();
        let start = start.min(len);
        let end = end.min(len).max(start);
        let char_start = self.rope.byte_to_char(start);
        let char_end = self.rope.byte_to_char(end);
        self.rope.slice(char_start..char_end).to_string()
    }

    /// Replace a selection's range with `text`, returning the new
    /// collapsed selection positioned after the inserted text.
    pub fn replace_selection(&mut self, selection: Selection, text: &str) -> Selection {
        let (start, end) = selection.range();
        self.remove(start, end);
        self.insert(start, text);
        Selection::collapsed(start + text.len())
    }
}
