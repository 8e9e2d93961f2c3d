//! Per-applet record of a layout session

use crate::applet::{AppletId, ResizeCapability, SnapshotId};
use crate::utils::{Area, Rectangle, Size};

/// One applet taking part in a layout session
///
/// A node carries the transactional view of its applet: the rectangle
/// being edited, the stacking rank, the overlap flag and the pending
/// add/remove markers that commit and rollback act on. Nodes are created
/// when the session begins or when an applet is added to it, and dropped
/// when the session ends.
#[derive(Debug)]
pub struct AppletNode<E> {
    pub(super) id: AppletId,
    pub(super) element: E,
    pub(super) rect: Rectangle<i32, Area>,
    // rectangle the session started from, decides whether a commit has
    // to persist a concrete size
    pub(super) origin_rect: Rectangle<i32, Area>,
    // what the user last asked for; axes fixed by capability stick to
    // this rather than to the rendered size
    pub(super) requested_size: Size<i32, Area>,
    pub(super) capability: ResizeCapability,
    pub(super) z_order_rank: u64,
    pub(super) highlighted: bool,
    pub(super) snapshot: Option<SnapshotId>,
    pub(super) pending_added: bool,
    pub(super) pending_removed: bool,
}

impl<E> AppletNode<E> {
    pub(super) fn new(
        id: AppletId,
        element: E,
        rect: Rectangle<i32, Area>,
        capability: ResizeCapability,
        z_order_rank: u64,
    ) -> AppletNode<E> {
        AppletNode {
            id,
            element,
            rect,
            origin_rect: rect,
            requested_size: rect.size,
            capability,
            z_order_rank,
            highlighted: false,
            snapshot: None,
            pending_added: false,
            pending_removed: false,
        }
    }

    /// Stable identifier of the applet behind this node
    pub fn id(&self) -> &AppletId {
        &self.id
    }

    /// Handle of the on-screen element
    pub fn element(&self) -> &E {
        &self.element
    }

    /// The rectangle as currently arranged
    ///
    /// During a gesture this is the live candidate, already clamped.
    pub fn rect(&self) -> Rectangle<i32, Area> {
        self.rect
    }

    /// Stacking rank; higher ranks sit on top and win hit-tests
    pub fn z_order_rank(&self) -> u64 {
        self.z_order_rank
    }

    /// Axes the applet may be resized along
    pub fn resize_capability(&self) -> ResizeCapability {
        self.capability
    }

    /// True while this node overlaps another non-removed node
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    /// True if the applet joined the arrangement during this session
    pub fn is_pending_added(&self) -> bool {
        self.pending_added
    }

    /// True if the applet was removed during this session
    pub fn is_pending_removed(&self) -> bool {
        self.pending_removed
    }

    /// Cached snapshot of the applet's pixels, if one was captured
    pub fn snapshot(&self) -> Option<SnapshotId> {
        self.snapshot
    }

    pub(super) fn mark_added(&mut self) {
        self.pending_added = true;
    }

    pub(super) fn mark_removed(&mut self) {
        debug_assert!(!self.pending_removed, "applet removed twice");
        self.pending_removed = true;
    }

    pub(super) fn raise(&mut self, rank: u64) {
        debug_assert!(rank >= self.z_order_rank);
        self.z_order_rank = rank;
    }

    pub(super) fn capture_snapshot(&mut self, snapshot: SnapshotId) {
        self.snapshot = Some(snapshot);
    }

    pub(super) fn invalidate_snapshot(&mut self) -> Option<SnapshotId> {
        self.snapshot.take()
    }
}
