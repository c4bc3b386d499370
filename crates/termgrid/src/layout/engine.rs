//! Flexbox layout adapter over [`taffy`].
//!
//! Wraps a [`taffy::TaffyTree`] behind an id-keyed API so the renderable
//! tree can address nodes by the same `u64` ids it already uses, instead
//! of juggling taffy's own [`taffy::NodeId`] handles.

use std::collections::HashMap;

use taffy::prelude::*;

use crate::error::{Result, TermGridError};

/// The computed position and size of a laid-out node, in cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayoutResult {
    /// Left edge, relative to the layout root.
    pub x: u16,
    /// Top edge, relative to the layout root.
    pub y: u16,
    /// Computed width in cells.
    pub width: u16,
    /// Computed height in cells.
    pub height: u16,
}

/// A flexbox layout tree keyed by caller-assigned `u64` node ids.
pub struct LayoutEngine {
    tree: TaffyTree<()>,
    nodes: HashMap<u64, NodeId>,
    root: Option<NodeId>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    /// Create an empty layout engine.
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            nodes: HashMap::new(),
            root: None,
        }
    }

    /// Add a leaf node with the given style.
    pub fn add_node(&mut self, id: u64, style: Style) -> Result<()> {
        let node_id = self
            .tree
            .new_leaf(style)
            .map_err(|e| TermGridError::Layout(e.to_string()))?;
        self.nodes.insert(id, node_id);
        Ok(())
    }

    /// Add a node with children, all of which must already have been added.
    pub fn add_node_with_children(&mut self, id: u64, style: Style, child_ids: &[u64]) -> Result<()> {
        let children = child_ids
            .iter()
            .map(|child| {
                self.nodes
                    .get(child)
                    .copied()
                    .ok_or_else(|| TermGridError::Layout(format!("unknown child node id {child}")))
            })
            .collect::<Result<Vec<_>>>()?;

        let node_id = self
            .tree
            .new_with_children(style, &children)
            .map_err(|e| TermGridError::Layout(e.to_string()))?;
        self.nodes.insert(id, node_id);
        Ok(())
    }

    /// Designate the layout root.
    pub fn set_root(&mut self, id: u64) -> Result<()> {
        let node_id = self
            .nodes
            .get(&id)
            .copied()
            .ok_or_else(|| TermGridError::Layout(format!("unknown root node id {id}")))?;
        self.root = Some(node_id);
        Ok(())
    }

    /// Compute layout for the whole tree against an available viewport.
    pub fn compute(&mut self, width: u16, height: u16) -> Result<()> {
        let root = self
            .root
            .ok_or_else(|| TermGridError::Layout("layout root not set".into()))?;
        let available = Size {
            width: AvailableSpace::Definite(f32::from(width)),
            height: AvailableSpace::Definite(f32::from(height)),
        };
        self.tree
            .compute_layout(root, available)
            .map_err(|e| TermGridError::Layout(e.to_string()))
    }

    /// Fetch the computed layout for a node. Call [`Self::compute`] first.
    pub fn layout(&self, id: u64) -> Result<LayoutResult> {
        let node_id = self
            .nodes
            .get(&id)
            .copied()
            .ok_or_else(|| TermGridError::Layout(format!("unknown node id {id}")))?;
        let layout = self
            .tree
            .layout(node_id)
            .map_err(|e| TermGridError::Layout(e.to_string()))?;
        Ok(LayoutResult {
            x: layout.location.x.round().max(0.0) as u16,
            y: layout.location.y.round().max(0.0) as u16,
            width: layout.size.width.round().max(0.0) as u16,
            height: layout.size.height.round().max(0.0) as u16,
        })
    }

    /// Remove all nodes and start over.
    pub fn clear(&mut self) {
        self.tree = TaffyTree::new();
        self.nodes.clear();
        self.root = None;
    }
}
