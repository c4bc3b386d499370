//! Compositor — resolves overlapping widget layers into a flat cell grid.
//!
//! The compositor collects styled segment output from each widget,
//! finds cut boundaries where widget edges meet, selects the topmost
//! visible widget for each region, and writes the result to a screen buffer.

pub mod chop;
pub mod compose;
pub mod cuts;
pub mod layer;
pub mod zorder;

pub use layer::{CompositorError, CompositorRegion, Layer};

use crate::buffer::ScreenBuffer;
use crate::cell::Cell;
use crate::geometry::{Rect, Size};
use crate::segment::Segment;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// The compositor collects widget layers and resolves overlapping regions.
pub struct Compositor {
    layers: Vec<Layer>,
    screen_width: u16,
    screen_height: u16,
}

impl Compositor {
    /// Creates a new compositor with the given screen dimensions.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            layers: Vec::new(),
            screen_width: width,
            screen_height: height,
        }
    }

    /// Removes all layers from the compositor.
    pub fn clear(&mut self) {
        self.layers.clear();
    }

    /// Adds a layer to the compositor stack.
    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Convenience method that creates and adds a layer.
    ///
    /// Creates a new layer from the given parameters and adds it to the stack.
    pub fn add_widget(
        &mut self,
        widget_id: u64,
        region: Rect,
        z_index: i32,
        lines: Vec<Vec<Segment>>,
    ) {
        let layer = Layer::new(widget_id, region, z_index, lines);
        self.add_layer(layer);
    }

    /// Returns the number of layers in the compositor.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Returns the screen size.
    pub fn screen_size(&self) -> Size {
        Size::new(self.screen_width, self.screen_height)
    }

    /// Resizes the compositor screen dimensions.
    ///
    /// Clears all layers since they may no longer be valid for the new size.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.screen_width = width;
        self.screen_height = height;
        self.layers.clear();
    }

    /// Returns a slice of all layers in the compositor.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Compose all layers and write the result to the screen buffer.
    ///
    /// Processes each row by calling `compose_line` to resolve overlapping
    /// layers, then writes the resulting segments as cells to the buffer.
    pub fn compose(&self, buf: &mut ScreenBuffer) {
        for row in 0..self.screen_height {
            let segments = compose::compose_line(&self.layers, row, self.screen_width);
            self.write_segments_to_buffer(buf, row, &segments);
        }
    }

    /// Write segments to a row of the screen buffer, converting each
    /// segment's graphemes to cells with proper style and width handling.
    fn write_segments_to_buffer(&self, buf: &mut ScreenBuffer, row: u16, segments: &[Segment]) {
        let mut x = 0;

        for segment in segments {
            // Skip control segments (they don't render)
            if segment.is_control {
                continue;
            }

            // Process each grapheme in the segment
            for grapheme in segment.text.graphemes(true) {
                if x >= self.screen_width {
                    return; // Reached end of screen width
                }

                let width = UnicodeWidthStr::width(grapheme);
                let cell = Cell::new(grapheme, segment.style.clone());
                buf.set(x, row, cell);
                x += width as u16;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::segment::Segment;

    #[test]
    fn new_compositor_empty() {
        let compositor = Compositor::new(80, 24);
        assert!(compositor.layer_count() == 0);
    }

    #[test]
    fn add_layer_increases_count() {
        let mut compositor = Compositor::new(80, 24);
        let region = Rect::new(0, 0, 10, 5);
        let layer = Layer::new(1, region, 0, vec![]);

        compositor.add_layer(layer);
        assert!(compositor.layer_count() == 1);
    }

    #[test]
    fn add_multiple_layers() {
        let mut compositor = Compositor::new(80, 24);
        let region1 = Rect::new(0, 0, 10, 5);
        let region2 = Rect::new(10, 10, 20, 10);
        let region3 = Rect::new(30, 5, 15, 8);

        compositor.add_layer(Layer::new(1, region1, 0, vec![]));
        compositor.add_layer(Layer::new(2, region2, 1, vec![]));
        compositor.add_layer(Layer::new(3, region3, 2, vec![]));

        assert!(compositor.layer_count() == 3);
    }

    #[test]
    fn add_widget_convenience() {
        let mut compositor = Compositor::new(80, 24);
        let region = Rect::new(5, 10, 20, 15);
        let lines = vec![vec![Segment::new("test")]];

        compositor.add_widget(42, region, 5, lines);

        assert!(compositor.layer_count() == 1);
        let layer_slice = compositor.layers();
        assert!(layer_slice.len() == 1);
        let layer = match layer_slice.first() {
            Some(l) => l,
            None => unreachable!(),
        };
        assert!(layer.widget_id == 42);
        assert!(layer.z_index == 5);
        assert!(layer.region == region);
    }

    #[test]
    fn clear_removes_all() {
        let mut compositor = Compositor::new(80, 24);
        let region1 = Rect::new(0, 0, 10, 5);
        let region2 = Rect::new(10, 10, 20, 10);

        compositor.add_layer(Layer::new(1, region1, 0, vec![]));
        compositor.add_layer(Layer::new(2, region2, 1, vec![]));
        assert!(compositor.layer_count() == 2);

        compositor.clear();
        assert!(compositor.layer_count() == 0);
    }

    #[test]
    fn screen_size_accessible() {
        let compositor = Compositor::new(100, 50);
        let size = compositor.screen_size();
        assert!(size.width == 100);
        assert!(size.height == 50);
    }

    #[test]
    fn layers_accessible() {
        let mut compositor = Compositor::new(80, 24);
        let region1 = Rect::new(0, 0, 10, 5);
        let region2 = Rect::new(10, 10, 20, 10);

        compositor.add_layer(Layer::new(1, region1, 0, vec![]));
        compositor.add_layer(Layer::new(2, region2, 1, vec![]));

        let layers = compositor.layers();
        assert!(layers.len() == 2);
        assert!(layers[0].widget_id == 1);
        assert!(layers[1].widget_id == 2);
    }

    #[test]
    fn compose_single_layer_to_buffer() {
        use crate::geometry::Size;

        let mut compositor = Compositor::new(80, 10);
        let region = Rect::new(0, 0, 80, 10);
        let lines = vec![vec![Segment::new("Hello, World!")]];
        compositor.add_layer(Layer::new(1, region, 0, lines));

        let mut buf = ScreenBuffer::new(Size::new(80, 10));
        compositor.compose(&mut buf);

        // Check that the text appears in the buffer
        assert!(buf.get(0, 0).is_some());
        match buf.get(0, 0) {
            Some(cell) => {
                assert!(cell.grapheme == "H");
            }
            None => unreachable!(),
        }

        // Check second character
        match buf.get(1, 0) {
            Some(cell) => {
                assert!(cell.grapheme == "e");
            }
            None => unreachable!(),
        }
    }

    #[test]
    fn compose_overlapping_layers_to_buffer() {
        use crate::geometry::Size;

        let mut compositor = Compositor::new(80, 10);

        // Background layer (z=0)
        let bg_region = Rect::new(0, 0, 80, 10);
        let bg_lines = vec![vec![Segment::new("Background")]];
        compositor.add_layer(Layer::new(1, bg_region, 0, bg_lines));

        // Overlay layer (z=10) at position (5, 0)
        let overlay_region = Rect::new(5, 0, 20, 10);
        let overlay_lines = vec![vec![Segment::new("Overlay")]];
        compositor.add_layer(Layer::new(2, overlay_region, 10, overlay_lines));

        let mut buf = ScreenBuffer::new(Size::new(80, 10));
        compositor.compose(&mut buf);

        // Position 0 should have 'B' from Background
        match buf.get(0, 0) {
            Some(cell) => {
                assert!(cell.grapheme == "B");
            }
            None => unreachable!(),
        }

        // Position 5 should have 'O' from Overlay (topmost)
        match buf.get(5, 0) {
            Some(cell) => {
                assert!(cell.grapheme == "O");
            }
            None => unreachable!(),
        }
    }

    #[test]
    fn compose_correct_cell_styles() {
        use crate::color::{Color, NamedColor};
        use crate::geometry::Size;
        use crate::style::Style;

        let mut compositor = Compositor::new(80, 10);
        let style = Style {
            fg: Some(Color::Named(NamedColor::Red)),
            bold: true,
            ..Default::default()
        };

        let mut seg = Segment::new("Styled");
        seg.style = style.clone();

        let region = Rect::new(0, 0, 20, 10);
        let lines = vec![vec![seg]];
        compositor.add_layer(Layer::new(1, region, 0, lines));

        let mut buf = ScreenBuffer::new(Size::new(80, 10));
        compositor.compose(&mut buf);

        // Check that the style is preserved
        match buf.get(0, 0) {
            Some(cell) => {
                assert!(cell.style.bold);
                assert!(matches!(cell.style.fg, Some(Color::Named(NamedColor::Red))));
            }
            None => unreachable!(),
        }
    }

    #[test]
    fn compose_empty_compositor_all_blank() {
        use crate::geometry::Size;

        let compositor = Compositor::new(80, 10);
        let mut buf = ScreenBuffer::new(Size::new(80, 10));

        compositor.compose(&mut buf);

        // All cells should be blank (space)
        for y in 0..10 {
            for x in 0..80 {
                match buf.get(x, y) {
                    Some(cell) => {
                        assert!(cell.is_blank());
                    }
                    None => unreachable!(),
                }
            }
        }
    }

    #[test]
    fn compose_wide_characters() {
        use crate::geometry::Size;

        let mut compositor = Compositor::new(80, 10);
        let region = Rect::new(0, 0, 20, 10);
        // 世 is a CJK character with width 2
        let lines = vec![vec![Segment::new("\u{4e16}界")]]; // 世界
        compositor.add_layer(Layer::new(1, region, 0, lines));

        let mut buf = ScreenBuffer::new(Size::new(80, 10));
        compositor.compose(&mut buf);

        // First cell should have the wide character
        match buf.get(0, 0) {
            Some(cell) => {
                assert!(cell.grapheme == "\u{4e16}");
                assert!(cell.width == 2);
            }
            None => unreachable!(),
        }

        // Second cell should be continuation (width 0)
        match buf.get(1, 0) {
            Some(cell) => {
                assert!(cell.width == 0);
            }
            None => unreachable!(),
        }

        // Third cell should have the second character
        match buf.get(2, 0) {
            Some(cell) => {
                assert!(cell.grapheme == "界");
                assert!(cell.width == 2);
            }
            None => unreachable!(),
        }
    }
}
