//! Candidate geometry for move and resize gestures
//!
//! A gesture never mutates anything by itself; it remembers what was
//! grabbed and turns pointer positions into clamped candidate rectangles.
//! Clamping happens before a candidate is ever applied, so illegal
//! geometry cannot reach the arrangement.

use smallvec::SmallVec;

use crate::applet::ResizeCapability;
use crate::utils::{Area, Point, Rectangle, Size};

/// An applet being moved, grabbed at a fixed offset from its origin
#[derive(Debug)]
pub(super) struct MoveGesture {
    pub(super) node: usize,
    pub(super) offset: Point<f64, Area>,
    pub(super) start_rect: Rectangle<i32, Area>,
}

impl MoveGesture {
    /// Candidate rectangle for the current pointer position
    ///
    /// Each edge is clamped independently; the applet never leaves the
    /// bounds and its origin never goes negative.
    pub(super) fn candidate(
        &self,
        pointer: Point<f64, Area>,
        size: Size<i32, Area>,
        bounds: Size<i32, Area>,
    ) -> Rectangle<i32, Area> {
        let loc: Point<i32, Area> = (pointer - self.offset).to_i32_round();
        Rectangle::new(loc, size).clamp_loc_to(bounds)
    }
}

/// An applet being resized around its fixed top-left corner
#[derive(Debug)]
pub(super) struct ResizeGesture {
    pub(super) node: usize,
    pub(super) origin: Point<i32, Area>,
    pub(super) start_rect: Rectangle<i32, Area>,
    pub(super) start_requested: Size<i32, Area>,
    pub(super) capability: ResizeCapability,
    pub(super) minimum: Size<i32, Area>,
}

impl ResizeGesture {
    /// Candidate size for the current pointer position
    ///
    /// `fallback` is the size last requested for the applet; axes fixed
    /// by the capability keep it.
    pub(super) fn candidate(
        &self,
        pointer: Point<f64, Area>,
        fallback: Size<i32, Area>,
        bounds: Size<i32, Area>,
    ) -> Size<i32, Area> {
        resize_candidate(
            self.origin,
            pointer,
            self.capability,
            fallback,
            self.minimum,
            bounds,
        )
    }
}

/// Compute the clamped size a resize towards `pointer` would give
///
/// Axes not covered by `capability` keep `fallback` untouched, even when
/// it sits below `minimum`. Free axes are held above `minimum` but never
/// allowed to grow past the space remaining between `origin` and
/// `bounds`; when the two conflict, containment wins.
pub(crate) fn resize_candidate(
    origin: Point<i32, Area>,
    pointer: Point<f64, Area>,
    capability: ResizeCapability,
    fallback: Size<i32, Area>,
    minimum: Size<i32, Area>,
    bounds: Size<i32, Area>,
) -> Size<i32, Area> {
    let pointer: Point<i32, Area> = pointer.to_i32_round();
    let clamp = |value: i32, minimum: i32, remaining: i32| {
        value.max(minimum).min(remaining).max(0)
    };

    let w = if capability.contains(ResizeCapability::HORIZONTAL) {
        clamp(pointer.x - origin.x, minimum.w, bounds.w - origin.x)
    } else {
        fallback.w
    };
    let h = if capability.contains(ResizeCapability::VERTICAL) {
        clamp(pointer.y - origin.y, minimum.h, bounds.h - origin.y)
    } else {
        fallback.h
    };

    (w, h).into()
}

/// Live outline shown while an applet is being resized
///
/// The outline covers the candidate rectangle. [`ResizeOutline::frame`]
/// gives the hollow border region an overlay window can be shaped with,
/// so the applet content itself is not redrawn on every motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOutline {
    bounds: Rectangle<i32, Area>,
}

impl ResizeOutline {
    pub(super) fn new(bounds: Rectangle<i32, Area>) -> ResizeOutline {
        ResizeOutline { bounds }
    }

    /// Candidate rectangle the outline covers
    pub fn bounds(&self) -> Rectangle<i32, Area> {
        self.bounds
    }

    /// Hollow border region of the given thickness
    pub fn frame(&self, thickness: i32) -> SmallVec<[Rectangle<i32, Area>; 4]> {
        self.bounds.outline(thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_candidate_keeps_the_grab_offset() {
        let gesture = MoveGesture {
            node: 0,
            offset: (5.0, 8.0).into(),
            start_rect: Rectangle::new((10, 10).into(), (50, 50).into()),
        };

        let candidate = gesture.candidate((105.0, 58.0).into(), (50, 50).into(), (300, 200).into());
        assert_eq!(candidate, Rectangle::new((100, 50).into(), (50, 50).into()));
    }

    #[test]
    fn move_candidate_clamps_each_edge_independently() {
        let gesture = MoveGesture {
            node: 0,
            offset: (0.0, 0.0).into(),
            start_rect: Rectangle::new((0, 0).into(), (50, 50).into()),
        };
        let bounds: Size<i32, Area> = (300, 200).into();

        let past_right = gesture.candidate((1000.0, 20.0).into(), (50, 50).into(), bounds);
        assert_eq!(past_right.loc, (250, 20).into());

        let past_both = gesture.candidate((1000.0, 1000.0).into(), (50, 50).into(), bounds);
        assert_eq!(past_both.loc, (250, 150).into());

        let negative = gesture.candidate((-40.0, -40.0).into(), (50, 50).into(), bounds);
        assert_eq!(negative.loc, (0, 0).into());
    }

    #[test]
    fn resize_candidate_follows_free_axes_only() {
        let size = resize_candidate(
            (10, 10).into(),
            (160.0, 150.0).into(),
            ResizeCapability::HORIZONTAL,
            (50, 80).into(),
            (20, 20).into(),
            (300, 200).into(),
        );
        assert_eq!(size, (150, 80).into());

        let size = resize_candidate(
            (10, 10).into(),
            (160.0, 150.0).into(),
            ResizeCapability::all(),
            (50, 80).into(),
            (20, 20).into(),
            (300, 200).into(),
        );
        assert_eq!(size, (150, 140).into());
    }

    #[test]
    fn resize_candidate_respects_minimum_and_remaining_space() {
        let origin: Point<i32, Area> = (250, 150).into();
        let bounds: Size<i32, Area> = (300, 200).into();

        // Shrinking below the minimum stops at the minimum.
        let size = resize_candidate(
            (10, 10).into(),
            (12.0, 12.0).into(),
            ResizeCapability::all(),
            (50, 50).into(),
            (30, 30).into(),
            bounds,
        );
        assert_eq!(size, (30, 30).into());

        // Growing past the bounds stops at the remaining space.
        let size = resize_candidate(
            origin,
            (1000.0, 1000.0).into(),
            ResizeCapability::all(),
            (40, 40).into(),
            (30, 30).into(),
            bounds,
        );
        assert_eq!(size, (50, 50).into());

        // Containment wins when less space remains than the minimum asks.
        let size = resize_candidate(
            (280, 180).into(),
            (1000.0, 1000.0).into(),
            ResizeCapability::all(),
            (10, 10).into(),
            (30, 30).into(),
            bounds,
        );
        assert_eq!(size, (20, 20).into());
    }

    #[test]
    fn outline_frame_is_hollow() {
        let outline = ResizeOutline::new(Rectangle::new((10, 10).into(), (100, 80).into()));
        let frame = outline.frame(2);

        assert_eq!(frame.len(), 4);
        let inside: Point<f64, Area> = (60.0, 50.0).into();
        assert!(!frame.iter().any(|bar| bar.to_f64().contains(inside)));
        let on_border: Point<f64, Area> = (10.0, 50.0).into();
        assert!(frame.iter().any(|bar| bar.to_f64().contains(on_border)));
    }
}
