//! Hit grid: a per-cell map from screen position to the topmost renderable
//! occupying it, rebuilt every frame and used by the event router to
//! resolve mouse coordinates to a node without walking the tree.

use crate::geometry::{Rect, Size};
use crate::tree::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Entry {
    id: NodeId,
    z: i32,
}

/// A width×height grid of `(node id, z-index)` pairs.
///
/// Populated during a compositor pass by calling [`HitGrid::set_rect`]
/// once per visible, mouse-accepting node (in any order — ties are
/// resolved by z-index, and equal z-index favors whichever write
/// happens last, matching "later draws on top" for stacked siblings
/// rendered at the same depth).
#[derive(Clone, Debug)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<Option<Entry>>,
}

impl HitGrid {
    /// A grid of the given size with every cell empty.
    pub fn new(size: Size) -> Self {
        let len = size.area() as usize;
        Self {
            width: size.width,
            height: size.height,
            cells: vec![None; len],
        }
    }

    /// Grid dimensions.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Clear every cell without reallocating.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Resize the grid, clearing all entries.
    pub fn resize(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
        self.cells = vec![None; size.area() as usize];
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Claim every cell in `rect` (clipped to the grid) for `id` at
    /// stacking order `z`, unless a cell already holds an entry with a
    /// strictly higher z — equal or lower z is overwritten, so the last
    /// writer at a given depth wins.
    pub fn set_rect(&mut self, rect: Rect, id: NodeId, z: i32) {
        let x0 = rect.position.x;
        let y0 = rect.position.y;
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(idx) = self.index(x, y) {
                    let should_write = match self.cells[idx] {
                        Some(existing) => z >= existing.z,
                        None => true,
                    };
                    if should_write {
                        self.cells[idx] = Some(Entry { id, z });
                    }
                }
            }
        }
    }

    /// The topmost node id occupying `(x, y)`, if any.
    pub fn query(&self, x: u16, y: u16) -> Option<NodeId> {
        self.index(x, y).and_then(|idx| self.cells[idx]).map(|e| e.id)
    }

    /// A row-major text dump for debugging: each cell renders as its node
    /// id, or `.` if empty, space-separated.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if x > 0 {
                    out.push(' ');
                }
                match self.query(x, y) {
                    Some(id) => out.push_str(&id.to_string()),
                    None => out.push('.'),
                }
            }
            out.push('\n');
        }
        out
    }
}
