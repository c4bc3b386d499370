//! Event routing: mouse dispatch via the hit grid with ancestor bubbling,
//! drag pinning, and keyboard dispatch via the focus chain.

use crate::event::{Event, FocusEvent, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use crate::focus::FocusManager;
use crate::hit_grid::HitGrid;
use crate::tree::{NodeId, Tree};

/// Where a routed event landed and which ancestors it bubbled through,
/// for a caller that dispatches against node ids rather than inspecting
/// the router's internal state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RouteResult {
    /// The node the event was targeted at, if any (no node under the
    /// cursor, or no widget holds focus, both produce `None`).
    pub target: Option<NodeId>,
    /// `target` plus every ancestor up to the root, nearest first — the
    /// bubble order a caller should offer the event to.
    pub bubble_chain: Vec<NodeId>,
}

impl RouteResult {
    fn none() -> Self {
        Self::default()
    }

    fn for_target(tree: &Tree, target: NodeId) -> Self {
        Self {
            target: Some(target),
            bubble_chain: tree.ancestors(target),
        }
    }
}

/// Routes decoded input events to renderable-tree nodes.
///
/// Owns no event-handling logic itself (callers walk [`RouteResult`]'s
/// bubble chain and decide per node what "handling" means) — this is
/// purely the addressing layer: hit-testing, drag pinning, `over`/`out`
/// transitions, and focus-chain bubbling.
#[derive(Debug, Default)]
pub struct EventRouter {
    /// Node a mouse-down pinned subsequent `Drag`/`Up` events to,
    /// regardless of what the hit grid reports under the cursor while
    /// the button remains held.
    drag_origin: Option<(MouseButton, NodeId)>,
    /// Node the cursor was last reported over, to generate synthetic
    /// `over`/`out` transitions as it moves between nodes.
    hovered: Option<NodeId>,
}

/// A hover transition the router detected between two mouse events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverTransition {
    /// The cursor moved onto a node it was not previously over.
    Over(NodeId),
    /// The cursor moved off a node it was previously over.
    Out(NodeId),
}

impl EventRouter {
    /// A router with no pinned drag and no hover state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a mouse event. A `Down` hit-tests the grid and, if it lands
    /// on a mouse-accepting node, pins that node for subsequent
    /// `Drag`/`Up` of the same button. `Drag`/`Up` events for a pinned
    /// button resolve to the pinned node regardless of what is currently
    /// under the cursor; releasing (`Up`) on the pinned button clears the
    /// pin. All other mouse events hit-test normally.
    pub fn route_mouse(&mut self, tree: &Tree, hit_grid: &HitGrid, event: &MouseEvent) -> RouteResult {
        let hit = hit_grid.query(event.x, event.y);

        let resolved = match event.kind {
            MouseEventKind::Down(button) => {
                if let Some(id) = hit
                    && tree.get(id).is_some_and(|n| n.capabilities().accepts_mouse)
                {
                    self.drag_origin = Some((button, id));
                    Some(id)
                } else {
                    self.drag_origin = None;
                    hit
                }
            }
            MouseEventKind::Drag(button) => match self.drag_origin {
                Some((pinned_button, id)) if pinned_button == button => Some(id),
                _ => hit,
            },
            MouseEventKind::Up(button) => {
                let target = match self.drag_origin {
                    Some((pinned_button, id)) if pinned_button == button => Some(id),
                    _ => hit,
                };
                if matches!(self.drag_origin, Some((b, _)) if b == button) {
                    self.drag_origin = None;
                }
                target
            }
            MouseEventKind::Moved | MouseEventKind::Scroll(_) => hit,
        };

        match resolved {
            Some(id) => RouteResult::for_target(tree, id),
            None => RouteResult::none(),
        }
    }

    /// The `over`/`out` transitions implied by a mouse event's resolved
    /// hit (as returned by [`EventRouter::route_mouse`]'s `target`),
    /// compared against the previous call's target. Call once per mouse
    /// event, after `route_mouse`.
    pub fn hover_transitions(&mut self, resolved: Option<NodeId>) -> Vec<HoverTransition> {
        let mut transitions = Vec::new();
        if self.hovered != resolved {
            if let Some(prev) = self.hovered {
                transitions.push(HoverTransition::Out(prev));
            }
            if let Some(next) = resolved {
                transitions.push(HoverTransition::Over(next));
            }
            self.hovered = resolved;
        }
        transitions
    }

    /// Route a key event through the currently focused widget's ancestor
    /// chain. `Tab`/`Shift+Tab` (`BackTab`, or `Tab` with `shift` held)
    /// instead advance `focus` and are not bubbled — a caller that wants
    /// tab-order focus changes observable should inspect
    /// [`FocusManager::focused`] after calling this.
    pub fn route_key(&self, tree: &Tree, focus: &mut FocusManager, event: &KeyEvent) -> RouteResult {
        let is_back_tab = matches!(event.code, KeyCode::BackTab)
            || (matches!(event.code, KeyCode::Tab) && event.modifiers.shift);
        if is_back_tab {
            focus.focus_prev();
            return RouteResult::none();
        }
        if matches!(event.code, KeyCode::Tab) {
            focus.focus_next();
            return RouteResult::none();
        }
        match focus.focused() {
            Some(id) if tree.get(id).is_some() => RouteResult::for_target(tree, id),
            _ => RouteResult::none(),
        }
    }

    /// Dispatch-agnostic routing entry point: mouse and key events route
    /// through their specific paths; paste routes to the focused widget
    /// like a key event; focus and resize have no single target and
    /// bubble to nobody (a caller handles them globally).
    pub fn route(
        &mut self,
        tree: &Tree,
        hit_grid: &HitGrid,
        focus: &mut FocusManager,
        event: &Event,
    ) -> RouteResult {
        match event {
            Event::Mouse(mouse) => self.route_mouse(tree, hit_grid, mouse),
            Event::Key(key) => self.route_key(tree, focus, key),
            Event::Paste(_) => match focus.focused() {
                Some(id) if tree.get(id).is_some() => RouteResult::for_target(tree, id),
                _ => RouteResult::none(),
            },
            Event::Focus(FocusEvent::Lost) => {
                self.drag_origin = None;
                RouteResult::none()
            }
            Event::Focus(_) | Event::Resize(_) | Event::RawInput(_) => RouteResult::none(),
        }
    }
}
