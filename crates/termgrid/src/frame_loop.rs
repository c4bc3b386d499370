//! Frame loop: throttled, single-threaded scheduling that ties together
//! input decoding, event routing, layout, compositing, and diffed flush.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::compositor::Compositor;
use crate::error::Result;
use crate::event::{Event, ResizeEvent};
use crate::focus::FocusManager;
use crate::geometry::{Rect, Size};
use crate::hit_grid::HitGrid;
use crate::input::Decoder;
use crate::layout::LayoutEngine;
use crate::render_context::RenderContext;
use crate::router::{EventRouter, RouteResult};
use crate::segment::Segment;
use crate::terminal::{Terminal, TerminalController, TerminalOptions};
use crate::tree::{NodeId, Tree};

/// Host application hooks the frame loop calls back into.
///
/// The frame loop owns scheduling, hit-testing, and the diff/flush
/// pipeline; `FrameDriver` owns what a node actually looks like and what
/// a routed event actually does.
pub trait FrameDriver {
    /// Produce a node's visual content for the current frame as one row
    /// of segments per row of `rect`. Only called for visible nodes whose
    /// capabilities include `draws_into_buffer`.
    fn draw(&mut self, tree: &Tree, node: NodeId, rect: Rect) -> Vec<Vec<Segment>>;

    /// Handle a routed event. `route.bubble_chain` is nearest-ancestor
    /// first; implementations walk it themselves to decide how far the
    /// event propagates.
    fn handle_event(&mut self, tree: &mut Tree, route: &RouteResult, event: &Event);
}

/// Counters exposed after each [`FrameLoop::pump`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Total frames actually composed and flushed since startup.
    pub frames_rendered: u64,
    /// Total pump cycles, including throttled ones that rendered nothing.
    pub cycles: u64,
}

/// Ties the terminal controller, input decoder, renderable tree, hit
/// grid, focus manager, event router, layout engine, and compositor
/// together into one cooperative scheduling loop.
pub struct FrameLoop<T: Terminal + 'static, D: FrameDriver> {
    controller: TerminalController<T>,
    render_context: RenderContext,
    decoder: Decoder,
    tree: Tree,
    hit_grid: HitGrid,
    focus: FocusManager,
    router: EventRouter,
    layout_engine: LayoutEngine,
    compositor: Compositor,
    driver: D,
    post_process: Vec<Box<dyn Fn(&mut crate::buffer::ScreenBuffer)>>,
    size: Size,
    frame_budget: Duration,
    last_frame_at: Option<Instant>,
    dirty: bool,
    force_next: bool,
    stats: FrameStats,
}

impl<T: Terminal + 'static, D: FrameDriver> FrameLoop<T, D> {
    /// Start the terminal (per `options`) and build a frame loop around
    /// it. The first [`FrameLoop::pump`] always renders, regardless of
    /// throttling, so the screen is never left blank after startup.
    pub fn new(terminal: T, options: TerminalOptions, driver: D, target_fps: u32) -> Result<Self> {
        let mut controller = TerminalController::new(terminal, options);
        controller.start()?;
        let size = controller.size()?;
        let render_context = RenderContext::new(controller.terminal())?;
        let frame_budget = if target_fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        };
        Ok(Self {
            controller,
            render_context,
            decoder: Decoder::new(),
            tree: Tree::new(),
            hit_grid: HitGrid::new(size),
            focus: FocusManager::new(),
            router: EventRouter::new(),
            layout_engine: LayoutEngine::new(),
            compositor: Compositor::new(size.width, size.height),
            driver,
            post_process: Vec::new(),
            size,
            frame_budget,
            last_frame_at: None,
            dirty: true,
            force_next: true,
            stats: FrameStats::default(),
        })
    }

    /// The renderable tree. Mutate it (attach/detach nodes, toggle
    /// visibility) between pumps; changed nodes are re-laid-out and
    /// redrawn on the next cycle that isn't throttled away.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// The renderable tree, read-only.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// The taffy-backed layout engine nodes are registered into.
    pub fn layout_engine_mut(&mut self) -> &mut LayoutEngine {
        &mut self.layout_engine
    }

    /// Counters from every pump so far.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Request a render on the next cycle that respects the frame-rate
    /// throttle. Cheap and safe to call many times per cycle — it only
    /// sets a flag.
    pub fn request_render(&mut self) {
        self.dirty = true;
    }

    /// Request an immediate out-of-cycle render on the very next pump,
    /// bypassing the frame-rate throttle, and force a full redraw (every
    /// visible node is redrawn regardless of its dirty flags).
    pub fn force_render(&mut self) {
        self.dirty = true;
        self.force_next = true;
        if let Some(root) = self.tree.root() {
            self.tree.mark_dirty(root);
            self.tree.mark_layout_dirty(root);
        }
    }

    /// Register a filter that runs on the composed cell buffer after
    /// compositing and before the diff/flush step. Filters run in
    /// registration order and must not resize the buffer.
    pub fn add_post_process<F>(&mut self, filter: F)
    where
        F: Fn(&mut crate::buffer::ScreenBuffer) + 'static,
    {
        self.post_process.push(Box::new(filter));
    }

    /// Drain available terminal input, route each decoded event, and —
    /// if due and dirty — recompute layout, recomposite, and flush a
    /// frame. Returns `true` if a frame was actually rendered this call.
    pub fn pump(&mut self) -> Result<bool> {
        self.stats.cycles += 1;

        let raw = self.controller.terminal_mut().read_available()?;
        let events = self.decoder.feed(&raw);
        for raw_event in &events {
            self.dispatch(&raw_event.event);
        }

        let due = match self.last_frame_at {
            None => true,
            Some(at) => self.force_next || at.elapsed() >= self.frame_budget,
        };

        if !(self.dirty && due) {
            return Ok(false);
        }

        self.render_frame()?;
        self.last_frame_at = Some(Instant::now());
        self.dirty = false;
        self.force_next = false;
        self.stats.frames_rendered += 1;
        Ok(true)
    }

    fn dispatch(&mut self, event: &Event) {
        if let Event::Resize(ResizeEvent { width, height }) = event {
            self.handle_resize(Size::new(*width, *height));
            return;
        }
        let route = self
            .router
            .route(&self.tree, &self.hit_grid, &mut self.focus, event);
        self.driver.handle_event(&mut self.tree, &route, event);
        self.dirty = true;
    }

    fn handle_resize(&mut self, size: Size) {
        self.size = size;
        self.render_context.handle_resize(size);
        self.hit_grid.resize(size);
        self.compositor.resize(size.width, size.height);
        self.force_render();
    }

    fn render_frame(&mut self) -> Result<()> {
        self.focus.set_order(self.tree.tab_order());

        let layout_stale = self.force_next
            || self
                .tree
                .root()
                .and_then(|r| self.tree.get(r))
                .is_some_and(|n| n.dirty().layout_dirty || n.dirty().children_dirty);
        if layout_stale {
            let _ = self.layout_engine.compute(self.size.width, self.size.height);
            for id in self.tree.pre_order() {
                if let Ok(result) = self.layout_engine.layout(id) {
                    let rect = Rect::new(result.x, result.y, result.width, result.height);
                    self.tree.set_rect(id, rect);
                }
            }
        }

        self.hit_grid.clear();
        self.compositor.clear();
        for id in self.tree.visible_pre_order() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            let rect = node.rect();
            let caps = node.capabilities();
            let z = node.z_index();
            if caps.accepts_mouse {
                self.hit_grid.set_rect(rect, id, z);
            }
            if caps.draws_into_buffer {
                let lines = self.driver.draw(&self.tree, id, rect);
                self.compositor.add_widget(id, rect, z, lines);
            }
        }

        self.render_context.begin_frame();
        self.compositor.compose(self.render_context.buffer_mut());
        for filter in &self.post_process {
            filter(self.render_context.buffer_mut());
        }
        // A sink write failure is recoverable: log it, force a full redraw
        // on the next cycle (the terminal's real contents are now unknown),
        // and keep the loop alive rather than propagating a fatal error.
        let force = self.force_next;
        if let Err(err) = self
            .render_context
            .end_frame(self.controller.terminal_mut(), force)
        {
            warn!(error = %err, "terminal write failed during flush; forcing full redraw next frame");
            self.force_render();
            return Ok(());
        }
        self.tree.clear_dirty();
        Ok(())
    }

    /// Stop the terminal controller, restoring the terminal to its
    /// original state. Also happens automatically on drop.
    pub fn stop(&mut self) -> Result<()> {
        self.controller.stop()
    }
}
