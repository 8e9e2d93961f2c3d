//! Layout mode, transactional rearrangement of home applets
//!
//! Entering layout mode wraps every applet mapped on a [`HomeArea`] into an
//! [`AppletNode`] and hands the whole arrangement to a [`LayoutSession`].
//! The session consumes pointer events, runs move and resize gestures with
//! clamping and live overlap feedback, and in the end either commits the
//! new arrangement ([`LayoutSession::accept`]) or rolls it back from disk
//! ([`LayoutSession::request_cancel`] / [`LayoutSession::confirm_cancel`]).
//!
//! Overlaps are allowed while arranging and only block the commit: nodes
//! overlapping anything are flagged so the shell can paint them
//! highlighted, and `accept` refuses as long as any flag is set. Until a
//! commit succeeds nothing is written back, so a rollback can always
//! restore the on-disk arrangement.

mod gesture;
mod node;

pub use self::gesture::ResizeOutline;
pub use self::node::AppletNode;

pub(crate) use self::gesture::resize_candidate;

use tracing::{debug, info, trace, warn};

use crate::applet::{
    AppletElement, AppletId, AppletProvider, AppletSnapshots, DecorationMetrics,
};
use crate::area::HomeArea;
use crate::event::{DragIcon, EventTable, ShellEvent};
use crate::input::{ButtonEvent, ButtonState, MotionEvent, PRIMARY_BUTTON};
use crate::store::{PlacementStore, StoreError, StoredGeometry};
use crate::utils::{Area, Point, Rectangle, Screen, Size};

use self::gesture::{MoveGesture, ResizeGesture};

/// Observable state of a [`LayoutSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No gesture in progress
    Idle,
    /// An applet is being moved
    Dragging,
    /// An applet is being resized
    Resizing,
    /// The session is over and must not be used further
    Ended,
}

/// Why [`LayoutSession::accept`] refused to commit
#[derive(Debug, thiserror::Error)]
pub enum AcceptError {
    /// Two or more applets still overlap
    #[error("applets overlap, the arrangement cannot be applied")]
    OverlappingApplets,
    /// Writing the arrangement to disk failed; nothing was changed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Answer of the session to a cancel request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    /// The session is over
    Ended,
    /// There are unsaved changes; ask the user and report back through
    /// [`LayoutSession::confirm_cancel`]
    NeedsConfirmation,
    /// The user declined, the session keeps going
    Kept,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Dragging(MoveGesture),
    Resizing(ResizeGesture),
    Ended,
}

/// Transactional editing session over a [`HomeArea`]
///
/// At most one session should exist at a time; while it runs, the nodes
/// are the authority over applet geometry and the area is only touched
/// again on commit or rollback.
#[derive(Debug)]
pub struct LayoutSession<E> {
    nodes: Vec<AppletNode<E>>,
    deferred: Vec<E>,
    phase: Phase,
    next_rank: u64,
    dirty: bool,
    metrics: DecorationMetrics,
    bounds: Size<i32, Area>,
    screen_origin: Point<i32, Screen>,
    events: EventTable,
    drag_icon: DragIcon,
}

impl<E: AppletElement + Clone> LayoutSession<E> {
    /// Enter layout mode over the given area
    ///
    /// Every mapped applet becomes a node; the area's stacking order
    /// becomes the initial rank order. Applets already overlapping (for
    /// example after an external edit of the store) are highlighted right
    /// away. Emits [`ShellEvent::LayoutModeStart`] before and
    /// [`ShellEvent::LayoutModeStarted`] after the nodes are built.
    pub fn begin(area: &HomeArea<E>, events: EventTable) -> LayoutSession<E> {
        events.emit(&ShellEvent::LayoutModeStart);

        let nodes: Vec<_> = area
            .placements()
            .enumerate()
            .map(|(rank, (id, rect, element))| {
                AppletNode::new(
                    id.clone(),
                    element.clone(),
                    rect,
                    element.resize_capability(),
                    rank as u64,
                )
            })
            .collect();
        let next_rank = nodes.len() as u64;

        let mut session = LayoutSession {
            nodes,
            deferred: Vec::new(),
            phase: Phase::Idle,
            next_rank,
            dirty: false,
            metrics: DecorationMetrics::default(),
            bounds: area.bounds(),
            screen_origin: area.screen_origin(),
            events,
            drag_icon: DragIcon::Plain,
        };
        session.resweep();

        info!(applets = session.nodes.len(), "Layout mode started");
        session.events.emit(&ShellEvent::LayoutModeStarted);
        session
    }

    /// Current state of the session
    pub fn state(&self) -> SessionState {
        match &self.phase {
            Phase::Idle => SessionState::Idle,
            Phase::Dragging(_) => SessionState::Dragging,
            Phase::Resizing(_) => SessionState::Resizing,
            Phase::Ended => SessionState::Ended,
        }
    }

    /// True once anything was moved, resized, added or removed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Override the decoration metrics used for hit-testing
    pub fn set_decoration_metrics(&mut self, metrics: DecorationMetrics) {
        self.metrics = metrics;
    }

    /// Iterate the nodes of the arrangement, in creation order
    pub fn nodes(&self) -> impl Iterator<Item = &AppletNode<E>> {
        self.nodes.iter()
    }

    /// Node for the given applet id, if it takes part in the session
    pub fn node(&self, id: &AppletId) -> Option<&AppletNode<E>> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// Node captured by the gesture in progress, if any
    pub fn active_node(&self) -> Option<&AppletNode<E>> {
        match &self.phase {
            Phase::Dragging(gesture) => self.nodes.get(gesture.node),
            Phase::Resizing(gesture) => self.nodes.get(gesture.node),
            _ => None,
        }
    }

    /// Outline to draw while a resize gesture is in progress
    pub fn resize_outline(&self) -> Option<ResizeOutline> {
        match &self.phase {
            Phase::Resizing(gesture) => Some(ResizeOutline::new(self.nodes[gesture.node].rect)),
            _ => None,
        }
    }

    /// Feed a pointer button event into the session
    ///
    /// A primary-button press over an applet either removes it on the
    /// spot (close zone), starts a resize (resize-handle zone, if the
    /// applet is resizable) or starts a move; where hit-test regions
    /// overlap, the topmost node wins. A release finishes the gesture in
    /// progress and applies the candidate rectangle for real.
    pub fn pointer_button<S>(&mut self, snapshots: &mut S, event: &ButtonEvent)
    where
        S: AppletSnapshots<E>,
    {
        if event.button != PRIMARY_BUTTON {
            return;
        }
        match event.state {
            ButtonState::Pressed => self.on_press(snapshots, event.location),
            ButtonState::Released => self.on_release(snapshots),
        }
    }

    /// Feed a pointer motion event into the session
    ///
    /// Updates the candidate rectangle of the active gesture and the
    /// overlap flags of the whole arrangement. Ignored while idle.
    pub fn pointer_motion(&mut self, event: &MotionEvent) {
        let local = event.location.to_area(self.screen_origin.to_f64());

        let update = match &self.phase {
            Phase::Dragging(gesture) => {
                let index = gesture.node;
                let candidate = gesture.candidate(local, self.nodes[index].rect.size, self.bounds);
                self.nodes[index].rect = candidate;
                Some((index, false))
            }
            Phase::Resizing(gesture) => {
                let index = gesture.node;
                let size = gesture.candidate(local, self.nodes[index].requested_size, self.bounds);
                let node = &mut self.nodes[index];
                node.requested_size = size;
                node.rect.size = size;
                Some((index, true))
            }
            _ => None,
        };

        let Some((index, resizing)) = update else {
            return;
        };
        self.resweep();
        if !resizing {
            self.emit_drag_icon(self.nodes[index].highlighted, false);
        }
    }

    /// Abort the gesture in progress, restoring the pre-gesture rectangle
    ///
    /// Equivalent to a release at the position the gesture started from;
    /// used for ESC and for the shell window being deactivated mid-drag.
    pub fn abort_gesture(&mut self) {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        let (index, start_rect, start_requested) = match phase {
            Phase::Dragging(gesture) => (gesture.node, gesture.start_rect, None),
            Phase::Resizing(gesture) => {
                (gesture.node, gesture.start_rect, Some(gesture.start_requested))
            }
            other => {
                self.phase = other;
                return;
            }
        };

        let id = {
            let node = &mut self.nodes[index];
            node.rect = start_rect;
            if let Some(requested) = start_requested {
                node.requested_size = requested;
            }
            node.id.clone()
        };
        debug!(applet = %id, "Gesture aborted");
        self.resweep();
        self.events.emit(&ShellEvent::AppletChangeEnd(id));
    }

    /// Add an applet to the running session
    ///
    /// The element is mapped onto the area and joins the arrangement
    /// flagged as added, so a rollback destroys it again. While the
    /// area's batch-add mode is on the element is only queued; call
    /// [`LayoutSession::flush_added`] once the batch is complete.
    ///
    /// Re-adding an applet that was removed earlier in the session simply
    /// restores it.
    pub fn add_applet(&mut self, area: &mut HomeArea<E>, element: E) {
        let id = element.id();

        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
            if node.pending_removed {
                node.pending_removed = false;
                node.element.set_visible(true);
                debug!(applet = %id, "Removed applet restored");
                self.dirty = true;
                self.resweep();
                self.events.emit(&ShellEvent::LayoutChanged);
            }
            return;
        }

        area.map_applet(element.clone());
        match area.applet_geometry(&id) {
            Some(rect) => self.adopt(id, element, rect),
            None => {
                trace!(applet = %id, "Applet queued until the batch is flushed");
                self.deferred.push(element);
            }
        }
    }

    /// Flush the area's batch queue and adopt the resulting placements
    pub fn flush_added(&mut self, area: &mut HomeArea<E>) {
        area.set_batch_add(false);
        for element in std::mem::take(&mut self.deferred) {
            let id = element.id();
            match area.applet_geometry(&id) {
                Some(rect) => self.adopt(id, element, rect),
                None => warn!(applet = %id, "Batched applet was never placed"),
            }
        }
    }

    /// Try to commit the arrangement
    ///
    /// Refuses with [`AcceptError::OverlappingApplets`] while any two
    /// live applets overlap, and with [`AcceptError::Store`] when writing
    /// the key-file fails. In both cases the session stays idle and the
    /// arrangement is kept, so the user can adjust or retry. Only after
    /// the new arrangement is safely on disk are removed applets
    /// destroyed and geometry, stacking and store applied to the area;
    /// the session then ends.
    pub fn accept<P, S>(
        &mut self,
        area: &mut HomeArea<E>,
        provider: &mut P,
        snapshots: &mut S,
    ) -> Result<(), AcceptError>
    where
        P: AppletProvider<E>,
        S: AppletSnapshots<E>,
    {
        if matches!(self.phase, Phase::Ended) {
            return Ok(());
        }
        self.abort_gesture();

        if self
            .nodes
            .iter()
            .any(|node| !node.pending_removed && node.highlighted)
        {
            debug!("Commit refused, applets overlap");
            return Err(AcceptError::OverlappingApplets);
        }

        // Bottom-to-top, so the file order preserves the stacking order.
        let mut live: Vec<(u64, AppletId, Rectangle<i32, Area>, bool)> = self
            .nodes
            .iter()
            .filter(|node| !node.pending_removed)
            .map(|node| {
                let explicit =
                    area.has_explicit_size(&node.id) || node.rect.size != node.origin_rect.size;
                (node.z_order_rank, node.id.clone(), node.rect, explicit)
            })
            .collect();
        live.sort_by_key(|&(rank, ..)| rank);

        // Serialize before touching anything; a failed write must leave
        // the arrangement editable and the area untouched.
        let mut store = PlacementStore::new();
        for (_, id, rect, explicit) in &live {
            store.set(
                id.clone(),
                StoredGeometry {
                    position: rect.loc,
                    size: explicit.then_some(rect.size),
                },
            );
        }
        store.save(area.store_path())?;

        info!(
            applets = live.len(),
            path = %area.store_path().display(),
            "Arrangement committed"
        );

        let removed: Vec<AppletId> = self
            .nodes
            .iter()
            .filter(|node| node.pending_removed)
            .map(|node| node.id.clone())
            .collect();
        for id in &removed {
            if let Some(element) = area.unmap_applet(id) {
                provider.destroy(element);
            }
        }

        for (_, id, rect, explicit) in &live {
            area.move_applet(id, rect.loc);
            if *explicit {
                area.resize_applet(id, *rect);
            }
            area.raise_applet(id);
        }
        area.mark_layout_saved(store);
        self.events.emit(&ShellEvent::LayoutChanged);

        self.end(snapshots);
        Ok(())
    }

    /// Ask to leave layout mode without saving
    ///
    /// With no unsaved changes the session ends immediately. Otherwise
    /// the caller must put the question to the user and report the answer
    /// through [`LayoutSession::confirm_cancel`].
    pub fn request_cancel<S>(&mut self, snapshots: &mut S) -> CancelOutcome
    where
        S: AppletSnapshots<E>,
    {
        if matches!(self.phase, Phase::Ended) {
            return CancelOutcome::Ended;
        }
        self.abort_gesture();

        if self.dirty {
            return CancelOutcome::NeedsConfirmation;
        }
        self.end(snapshots);
        CancelOutcome::Ended
    }

    /// Complete a cancel that needed confirmation
    ///
    /// `discard` is the user's answer; `false` keeps the session going.
    /// Discarding reloads the arrangement from the store on disk, which
    /// destroys applets added during the session and restores rectangle,
    /// size and stacking of everything else. If the store cannot be read
    /// the session stays idle and the arrangement is kept.
    pub fn confirm_cancel<P, S>(
        &mut self,
        area: &mut HomeArea<E>,
        provider: &mut P,
        snapshots: &mut S,
        discard: bool,
    ) -> Result<CancelOutcome, StoreError>
    where
        P: AppletProvider<E>,
        S: AppletSnapshots<E>,
    {
        if matches!(self.phase, Phase::Ended) {
            return Ok(CancelOutcome::Ended);
        }
        if !discard {
            debug!("Cancel declined, staying in layout mode");
            return Ok(CancelOutcome::Kept);
        }

        area.load_layout(provider)?;
        info!("Arrangement rolled back");
        self.end(snapshots);
        Ok(CancelOutcome::Ended)
    }

    fn on_press<S>(&mut self, snapshots: &mut S, location: Point<f64, Screen>)
    where
        S: AppletSnapshots<E>,
    {
        if !matches!(self.phase, Phase::Idle) {
            return;
        }

        let local = location.to_area(self.screen_origin.to_f64());
        let Some(index) = self.node_under(local) else {
            trace!("Press over empty space");
            return;
        };

        let node = &self.nodes[index];
        let rect = node.rect;
        if self.metrics.close_zone(rect).to_f64().contains(local) {
            self.close_applet(index);
        } else if self.metrics.resize_zone(rect).to_f64().contains(local)
            && !node.capability.is_empty()
        {
            self.begin_resize(index);
        } else {
            self.begin_move(snapshots, index, local);
        }
    }

    fn on_release<S>(&mut self, snapshots: &mut S)
    where
        S: AppletSnapshots<E>,
    {
        let phase = std::mem::replace(&mut self.phase, Phase::Idle);
        match phase {
            Phase::Dragging(gesture) => {
                let rank = self.take_rank();
                let (id, changed) = {
                    let node = &mut self.nodes[gesture.node];
                    let changed = node.rect != gesture.start_rect;
                    node.element.set_geometry(node.rect);
                    node.raise(rank);
                    (node.id.clone(), changed)
                };
                debug!(applet = %id, moved = changed, "Move gesture finished");
                self.dirty |= changed;
                self.resweep();
                self.events.emit(&ShellEvent::AppletChangeEnd(id));
                if changed {
                    self.events.emit(&ShellEvent::LayoutChanged);
                }
            }
            Phase::Resizing(gesture) => {
                let (id, changed) = {
                    let node = &mut self.nodes[gesture.node];
                    let changed = node.rect.size != gesture.start_rect.size;
                    node.element.set_geometry(node.rect);
                    if changed {
                        // The cached pixels no longer match the applet.
                        if let Some(old) = node.invalidate_snapshot() {
                            snapshots.discard(old);
                        }
                        if let Some(snapshot) = snapshots.capture(&node.element) {
                            node.capture_snapshot(snapshot);
                        }
                    }
                    (node.id.clone(), changed)
                };
                debug!(applet = %id, resized = changed, "Resize gesture finished");
                self.dirty |= changed;
                self.resweep();
                self.events.emit(&ShellEvent::AppletChangeEnd(id));
                if changed {
                    self.events.emit(&ShellEvent::LayoutChanged);
                }
            }
            other => {
                self.phase = other;
            }
        }
    }

    fn close_applet(&mut self, index: usize) {
        let id = self.nodes[index].id.clone();
        debug!(applet = %id, "Applet removed from the arrangement");
        self.events.emit(&ShellEvent::AppletChangeStart(id.clone()));
        {
            let node = &mut self.nodes[index];
            node.mark_removed();
            node.element.set_visible(false);
        }
        self.dirty = true;
        self.resweep();
        self.events.emit(&ShellEvent::AppletChangeEnd(id));
        self.events.emit(&ShellEvent::LayoutChanged);
    }

    fn begin_move<S>(&mut self, snapshots: &mut S, index: usize, local: Point<f64, Area>)
    where
        S: AppletSnapshots<E>,
    {
        let rank = self.take_rank();
        let (id, highlighted) = {
            let node = &mut self.nodes[index];
            if node.snapshot.is_none() {
                if let Some(snapshot) = snapshots.capture(&node.element) {
                    node.capture_snapshot(snapshot);
                }
            }
            node.raise(rank);
            self.phase = Phase::Dragging(MoveGesture {
                node: index,
                offset: local - node.rect.loc.to_f64(),
                start_rect: node.rect,
            });
            (node.id.clone(), node.highlighted)
        };
        trace!(applet = %id, "Move gesture started");
        self.events.emit(&ShellEvent::AppletChangeStart(id));
        self.emit_drag_icon(highlighted, true);
    }

    fn begin_resize(&mut self, index: usize) {
        let node = &self.nodes[index];
        let hard = self.metrics.minimum_applet_size();
        let declared = node.element.minimum_size();
        let minimum: Size<i32, Area> =
            (declared.w.max(hard.w), declared.h.max(hard.h)).into();

        self.phase = Phase::Resizing(ResizeGesture {
            node: index,
            origin: node.rect.loc,
            start_rect: node.rect,
            start_requested: node.requested_size,
            capability: node.capability,
            minimum,
        });
        let id = node.id.clone();
        trace!(applet = %id, "Resize gesture started");
        self.events.emit(&ShellEvent::AppletChangeStart(id));
    }

    fn adopt(&mut self, id: AppletId, element: E, rect: Rectangle<i32, Area>) {
        debug!(applet = %id, ?rect, "Applet added to the arrangement");
        let rank = self.take_rank();
        let capability = element.resize_capability();
        let mut node = AppletNode::new(id, element, rect, capability, rank);
        node.mark_added();
        self.nodes.push(node);
        self.dirty = true;
        self.resweep();
        self.events.emit(&ShellEvent::LayoutChanged);
    }

    fn node_under(&self, point: Point<f64, Area>) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| !node.pending_removed && node.rect.to_f64().contains(point))
            .max_by_key(|(_, node)| node.z_order_rank)
            .map(|(index, _)| index)
    }

    fn take_rank(&mut self) -> u64 {
        let rank = self.next_rank;
        self.next_rank += 1;
        rank
    }

    /// Recompute the overlap flag of every node
    ///
    /// Removed nodes neither highlight nor cause highlights. Symmetric by
    /// construction: both sides of an overlapping pair get flagged.
    #[profiling::function]
    fn resweep(&mut self) {
        let rects: Vec<Option<Rectangle<i32, Area>>> = self
            .nodes
            .iter()
            .map(|node| (!node.pending_removed).then_some(node.rect))
            .collect();

        for (index, node) in self.nodes.iter_mut().enumerate() {
            let highlighted = match rects[index] {
                Some(rect) => rects.iter().enumerate().any(|(other, entry)| {
                    other != index && entry.map(|r| rect.overlaps(r)).unwrap_or(false)
                }),
                None => false,
            };
            if highlighted != node.highlighted {
                node.highlighted = highlighted;
                node.element.request_repaint();
            }
        }
    }

    fn emit_drag_icon(&mut self, overlapping: bool, force: bool) {
        let icon = if overlapping {
            DragIcon::Highlighted
        } else {
            DragIcon::Plain
        };
        if force || icon != self.drag_icon {
            self.drag_icon = icon;
            self.events.emit(&ShellEvent::DragIconChanged(icon));
        }
    }

    fn end<S>(&mut self, snapshots: &mut S)
    where
        S: AppletSnapshots<E>,
    {
        self.events.emit(&ShellEvent::LayoutModeEnd);
        for node in &mut self.nodes {
            if let Some(snapshot) = node.invalidate_snapshot() {
                snapshots.discard(snapshot);
            }
        }
        self.nodes.clear();
        self.deferred.clear();
        self.phase = Phase::Ended;
        info!("Layout mode ended");
        self.events.emit(&ShellEvent::LayoutModeEnded);
    }
}
