use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use smallvec::SmallVec;

/// Type-level marker for the applet-area coordinate space
///
/// Origin is the top-left corner of the home area. All placement,
/// hit-testing and persistence happens in this space.
#[derive(Debug)]
pub struct Area;

/// Type-level marker for the absolute screen coordinate space
///
/// Pointer events arrive in this space and are converted to [`Area`]
/// coordinates at ingestion.
#[derive(Debug)]
pub struct Screen;

/// Step of the placement grid in pixels, used by [`snap_axis`]
pub const GRID_SIZE: i32 = 10;

/// Snap a single axis value to the placement grid
///
/// The value is rounded down to the previous multiple of [`GRID_SIZE`].
/// When the gesture moved in the positive direction on this axis, the
/// snap advances one extra step, unless that would push the far edge
/// (`value + extent`) past `bound`.
pub fn snap_axis(value: i32, moved_forward: bool, extent: i32, bound: i32) -> i32 {
    let mut snapped = value - value.rem_euclid(GRID_SIZE);
    if moved_forward {
        let advanced = snapped + GRID_SIZE;
        if advanced + extent <= bound {
            snapped = advanced;
        }
    }
    snapped
}

/// Trait for types serving as a coordinate for other geometry utils
pub trait Coordinate:
    Sized + Add<Self, Output = Self> + Sub<Self, Output = Self> + PartialOrd + Default + Copy + fmt::Debug
{
    /// A Coordinate that is 0
    const ZERO: Self;
    /// Convert the coordinate to a f64
    fn to_f64(self) -> f64;
    /// Convert to this coordinate from a f64
    fn from_f64(v: f64) -> Self;
    /// Compare and return the smaller one
    fn min(self, other: Self) -> Self {
        if self < other {
            self
        } else {
            other
        }
    }
    /// Compare and return the larger one
    fn max(self, other: Self) -> Self {
        if self > other {
            self
        } else {
            other
        }
    }
    /// Test if the coordinate is not negative
    fn non_negative(self) -> bool;
    /// Returns the absolute value of this coordinate
    fn abs(self) -> Self;

    /// Saturating integer addition. Computes self + other, saturating at the numeric bounds instead of overflowing.
    fn saturating_add(self, other: Self) -> Self;
    /// Saturating integer subtraction. Computes self - other, saturating at the numeric bounds instead of overflowing.
    fn saturating_sub(self, other: Self) -> Self;
}

/// Implements Coordinate for a signed numerical type.
macro_rules! signed_coordinate_impl {
    ($ty:ty, $ ($tys:ty),* ) => {
        signed_coordinate_impl!($ty);
        $(
            signed_coordinate_impl!($tys);
        )*
    };

    ($ty:ty) => {
        impl Coordinate for $ty {
            const ZERO: $ty = 0;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as Self
            }

            #[inline]
            fn non_negative(self) -> bool {
                self >= 0
            }

            #[inline]
            fn abs(self) -> Self {
                self.abs()
            }

            #[inline]
            fn saturating_add(self, other: Self) -> Self {
                self.saturating_add(other)
            }
            #[inline]
            fn saturating_sub(self, other: Self) -> Self {
                self.saturating_sub(other)
            }
        }
    };
}

signed_coordinate_impl! {
    i16,
    i32,
    i64
}

macro_rules! floating_point_coordinate_impl {
    ($ty:ty, $ ($tys:ty),* ) => {
        floating_point_coordinate_impl!($ty);
        $(
            floating_point_coordinate_impl!($tys);
        )*
    };

    ($ty:ty) => {
        impl Coordinate for $ty {
            const ZERO: $ty = 0.0;

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as Self
            }

            #[inline]
            fn non_negative(self) -> bool {
                self >= 0.0
            }

            #[inline]
            fn abs(self) -> Self {
                self.abs()
            }

            #[inline]
            fn saturating_add(self, other: Self) -> Self {
                self + other
            }
            #[inline]
            fn saturating_sub(self, other: Self) -> Self {
                self - other
            }
        }
    };
}

floating_point_coordinate_impl! {
    f32,
    f64
}

/*
 * Point
 */

/// A point as defined by its x and y coordinates
///
/// Operations on points are saturating.
#[repr(C)]
pub struct Point<N, Kind> {
    /// horizontal coordinate
    pub x: N,
    /// vertical coordinate
    pub y: N,
    _kind: std::marker::PhantomData<Kind>,
}

impl<N: Coordinate, Kind> Point<N, Kind> {
    /// Convert this [`Point`] to a [`Size`] with the same coordinates
    ///
    /// Checks that the coordinates are positive with a `debug_assert!()`.
    #[inline]
    pub fn to_size(self) -> Size<N, Kind> {
        debug_assert!(
            self.x.non_negative() && self.y.non_negative(),
            "Attempting to create a `Size` of negative size: {:?}",
            (self.x, self.y)
        );
        Size {
            w: self.x,
            h: self.y,
            _kind: std::marker::PhantomData,
        }
    }

    /// Convert the underlying numerical type to f64 for floating point manipulations
    #[inline]
    pub fn to_f64(self) -> Point<f64, Kind> {
        Point {
            x: self.x.to_f64(),
            y: self.y.to_f64(),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<Kind> Point<f64, Kind> {
    /// Convert to i32 for integer-space manipulations by rounding float values
    #[inline]
    pub fn to_i32_round<N: Coordinate>(self) -> Point<N, Kind> {
        Point {
            x: N::from_f64(self.x.round()),
            y: N::from_f64(self.y.round()),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Coordinate> Point<N, Screen> {
    /// Convert this screen point to area coordinates, given the area's
    /// origin on screen
    #[inline]
    pub fn to_area(self, origin: Point<N, Screen>) -> Point<N, Area> {
        Point {
            x: self.x.saturating_sub(origin.x),
            y: self.y.saturating_sub(origin.y),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Coordinate> Point<N, Area> {
    /// Convert this area point to screen coordinates, given the area's
    /// origin on screen
    #[inline]
    pub fn to_screen(self, origin: Point<N, Screen>) -> Point<N, Screen> {
        Point {
            x: self.x.saturating_add(origin.x),
            y: self.y.saturating_add(origin.y),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: fmt::Debug, S> fmt::Debug for Point<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Point<{}>", std::any::type_name::<S>()))?;
        f.debug_struct("")
            .field("x", &self.x)
            .field("y", &self.y)
            .finish()
    }
}

impl<N, Kind> From<(N, N)> for Point<N, Kind> {
    #[inline]
    fn from((x, y): (N, N)) -> Point<N, Kind> {
        Point {
            x,
            y,
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N, Kind> From<Point<N, Kind>> for (N, N) {
    #[inline]
    fn from(point: Point<N, Kind>) -> (N, N) {
        (point.x, point.y)
    }
}

impl<N: Coordinate, Kind> Add for Point<N, Kind> {
    type Output = Point<N, Kind>;
    #[inline]
    fn add(self, other: Point<N, Kind>) -> Point<N, Kind> {
        Point {
            x: self.x.saturating_add(other.x),
            y: self.y.saturating_add(other.y),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Coordinate, Kind> AddAssign for Point<N, Kind> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x = self.x.saturating_add(rhs.x);
        self.y = self.y.saturating_add(rhs.y);
    }
}

impl<N: Coordinate, Kind> SubAssign for Point<N, Kind> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x = self.x.saturating_sub(rhs.x);
        self.y = self.y.saturating_sub(rhs.y);
    }
}

impl<N: Coordinate, Kind> Sub for Point<N, Kind> {
    type Output = Point<N, Kind>;
    #[inline]
    fn sub(self, other: Point<N, Kind>) -> Point<N, Kind> {
        Point {
            x: self.x.saturating_sub(other.x),
            y: self.y.saturating_sub(other.y),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Clone, Kind> Clone for Point<N, Kind> {
    #[inline]
    fn clone(&self) -> Self {
        Point {
            x: self.x.clone(),
            y: self.y.clone(),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Copy, Kind> Copy for Point<N, Kind> {}

impl<N: PartialEq, Kind> PartialEq for Point<N, Kind> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<N: Eq, Kind> Eq for Point<N, Kind> {}

impl<N: Default, Kind> Default for Point<N, Kind> {
    #[inline]
    fn default() -> Self {
        Point {
            x: N::default(),
            y: N::default(),
            _kind: std::marker::PhantomData,
        }
    }
}

/*
 * Size
 */

/// A size as defined by its width and height
///
/// Constructors of this type ensure that the values are always positive via
/// `debug_assert!()`, however manually changing the values of the fields
/// can break this invariant.
///
/// Operations on sizes are saturating.
#[repr(C)]
pub struct Size<N, Kind> {
    /// horizontal coordinate
    pub w: N,
    /// vertical coordinate
    pub h: N,
    _kind: std::marker::PhantomData<Kind>,
}

impl<N: Coordinate, Kind> Size<N, Kind> {
    /// Convert the underlying numerical type to f64 for floating point manipulations
    #[inline]
    pub fn to_f64(self) -> Size<f64, Kind> {
        Size {
            w: self.w.to_f64(),
            h: self.h.to_f64(),
            _kind: std::marker::PhantomData,
        }
    }

    /// Check if this [`Size`] is empty
    ///
    /// Returns true if either the width or the height is zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == N::default() || self.h == N::default()
    }
}

impl<N: fmt::Debug, S> fmt::Debug for Size<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Size<{}>", std::any::type_name::<S>()))?;
        f.debug_struct("")
            .field("w", &self.w)
            .field("h", &self.h)
            .finish()
    }
}

impl<N: Coordinate, Kind> From<(N, N)> for Size<N, Kind> {
    #[inline]
    fn from((w, h): (N, N)) -> Size<N, Kind> {
        debug_assert!(
            w.non_negative() && h.non_negative(),
            "Attempting to create a `Size` of negative size: {:?}",
            (w, h)
        );
        Size {
            w,
            h,
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N, Kind> From<Size<N, Kind>> for (N, N) {
    #[inline]
    fn from(size: Size<N, Kind>) -> (N, N) {
        (size.w, size.h)
    }
}

impl<N: Coordinate, Kind> Add for Size<N, Kind> {
    type Output = Size<N, Kind>;
    #[inline]
    fn add(self, other: Size<N, Kind>) -> Size<N, Kind> {
        Size {
            w: self.w.saturating_add(other.w),
            h: self.h.saturating_add(other.h),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Coordinate, Kind> AddAssign for Size<N, Kind> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.w = self.w.saturating_add(rhs.w);
        self.h = self.h.saturating_add(rhs.h);
    }
}

impl<N: Coordinate, Kind> Sub for Size<N, Kind> {
    type Output = Size<N, Kind>;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Size {
            w: self.w.saturating_sub(rhs.w).max(N::ZERO),
            h: self.h.saturating_sub(rhs.h).max(N::ZERO),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Coordinate, Kind> SubAssign for Size<N, Kind> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.w = self.w.saturating_sub(rhs.w).max(N::ZERO);
        self.h = self.h.saturating_sub(rhs.h).max(N::ZERO);
    }
}

impl<N: Clone, Kind> Clone for Size<N, Kind> {
    #[inline]
    fn clone(&self) -> Self {
        Size {
            w: self.w.clone(),
            h: self.h.clone(),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Copy, Kind> Copy for Size<N, Kind> {}

impl<N: PartialEq, Kind> PartialEq for Size<N, Kind> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.w == other.w && self.h == other.h
    }
}

impl<N: Eq, Kind> Eq for Size<N, Kind> {}

impl<N: Default, Kind> Default for Size<N, Kind> {
    #[inline]
    fn default() -> Self {
        Size {
            w: N::default(),
            h: N::default(),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Coordinate, Kind> Add<Size<N, Kind>> for Point<N, Kind> {
    type Output = Point<N, Kind>;
    #[inline]
    fn add(self, other: Size<N, Kind>) -> Point<N, Kind> {
        Point {
            x: self.x.saturating_add(other.w),
            y: self.y.saturating_add(other.h),
            _kind: std::marker::PhantomData,
        }
    }
}

impl<N: Coordinate, Kind> Sub<Size<N, Kind>> for Point<N, Kind> {
    type Output = Point<N, Kind>;
    #[inline]
    fn sub(self, other: Size<N, Kind>) -> Point<N, Kind> {
        Point {
            x: self.x.saturating_sub(other.w),
            y: self.y.saturating_sub(other.h),
            _kind: std::marker::PhantomData,
        }
    }
}

/*
 * Rectangle
 */

/// A rectangle defined by its top-left corner and dimensions
///
/// Operations on rectangles are saturating.
#[repr(C)]
pub struct Rectangle<N, Kind> {
    /// Location of the top-left corner of the rectangle
    pub loc: Point<N, Kind>,
    /// Size of the rectangle, as (width, height)
    pub size: Size<N, Kind>,
}

impl<N: Coordinate, Kind> Rectangle<N, Kind> {
    /// Convert the underlying numerical type to f64 for floating point manipulations
    pub fn to_f64(self) -> Rectangle<f64, Kind> {
        Rectangle {
            loc: self.loc.to_f64(),
            size: self.size.to_f64(),
        }
    }

    /// Check if this [`Rectangle`] is empty
    ///
    /// Returns true if either the width or the height
    /// of the [`Size`] is zero
    pub fn is_empty(&self) -> bool {
        self.size.is_empty()
    }
}

impl<N: Coordinate, Kind> Rectangle<N, Kind> {
    /// Create a new [`Rectangle`] from the coordinates of its top-left corner and its dimensions
    #[inline]
    pub fn new(loc: Point<N, Kind>, size: Size<N, Kind>) -> Self {
        Rectangle { loc, size }
    }

    /// Create a new [`Rectangle`] from its dimensions, with location zero
    #[inline]
    pub fn from_size(size: Size<N, Kind>) -> Self {
        Rectangle {
            loc: (N::ZERO, N::ZERO).into(),
            size,
        }
    }

    /// Create a new [`Rectangle`] from the coordinates of its top-left corner and its bottom-right corner
    #[inline]
    pub fn from_extremities(
        topleft: impl Into<Point<N, Kind>>,
        bottomright: impl Into<Point<N, Kind>>,
    ) -> Self {
        let topleft = topleft.into();
        let bottomright = bottomright.into();
        Rectangle {
            loc: topleft,
            size: (bottomright - topleft).to_size(),
        }
    }

    /// Checks whether given [`Point`] is inside the rectangle
    #[inline]
    pub fn contains<P: Into<Point<N, Kind>>>(self, point: P) -> bool {
        let p: Point<N, Kind> = point.into();
        (p.x >= self.loc.x)
            && (p.x < self.loc.x.saturating_add(self.size.w))
            && (p.y >= self.loc.y)
            && (p.y < self.loc.y.saturating_add(self.size.h))
    }

    /// Checks whether given [`Rectangle`] is inside the rectangle
    ///
    /// A rectangle is considered inside another rectangle
    /// if its location is inside the other rectangle and it does not
    /// extend outside the other rectangle.
    /// This includes rectangles with the same location and size
    #[inline]
    pub fn contains_rect<R: Into<Rectangle<N, Kind>>>(self, rect: R) -> bool {
        let r: Rectangle<N, Kind> = rect.into();
        r.loc.x >= self.loc.x
            && r.loc.y >= self.loc.y
            && r.loc.x.saturating_add(r.size.w) <= self.loc.x.saturating_add(self.size.w)
            && r.loc.y.saturating_add(r.size.h) <= self.loc.y.saturating_add(self.size.h)
    }

    /// Checks whether a given [`Rectangle`] overlaps with this one
    ///
    /// Note: This operation is exclusive, touching only rectangles will return `false`.
    /// For inclusive overlap test see [`overlaps_or_touches`](Rectangle::overlaps_or_touches)
    #[inline]
    pub fn overlaps(self, other: impl Into<Rectangle<N, Kind>>) -> bool {
        let other = other.into();

        self.loc.x < other.loc.x.saturating_add(other.size.w)
            && other.loc.x < self.loc.x.saturating_add(self.size.w)
            && self.loc.y < other.loc.y.saturating_add(other.size.h)
            && other.loc.y < self.loc.y.saturating_add(self.size.h)
    }

    /// Checks whether a given [`Rectangle`] overlaps with this one or touches it
    ///
    /// Note: This operation is inclusive, touching only rectangles will return `true`.
    /// For exclusive overlap test see [`overlaps`](Rectangle::overlaps)
    #[inline]
    pub fn overlaps_or_touches(self, other: impl Into<Rectangle<N, Kind>>) -> bool {
        let other = other.into();

        self.loc.x <= other.loc.x.saturating_add(other.size.w)
            && other.loc.x <= self.loc.x.saturating_add(self.size.w)
            && self.loc.y <= other.loc.y.saturating_add(other.size.h)
            && other.loc.y <= self.loc.y.saturating_add(self.size.h)
    }

    /// Clamp rectangle to min and max corners resulting in the overlapping area of two rectangles
    ///
    /// Returns `None` if the two rectangles don't overlap
    #[inline]
    pub fn intersection(self, other: impl Into<Rectangle<N, Kind>>) -> Option<Self> {
        let other = other.into();
        if !self.overlaps(other) {
            return None;
        }
        Some(Rectangle::from_extremities(
            (self.loc.x.max(other.loc.x), self.loc.y.max(other.loc.y)),
            (
                (self.loc.x.saturating_add(self.size.w)).min(other.loc.x.saturating_add(other.size.w)),
                (self.loc.y.saturating_add(self.size.h)).min(other.loc.y.saturating_add(other.size.h)),
            ),
        ))
    }

    /// Move this [`Rectangle`] the minimal distance needed to fit into
    /// the given bounds
    ///
    /// Location never goes negative; a rectangle larger than the bounds
    /// ends up at zero on the overflowing axis.
    #[inline]
    pub fn clamp_loc_to(self, bounds: impl Into<Size<N, Kind>>) -> Rectangle<N, Kind> {
        let bounds = bounds.into();
        Rectangle {
            loc: Point {
                x: self.loc.x.min(bounds.w.saturating_sub(self.size.w)).max(N::ZERO),
                y: self.loc.y.min(bounds.h.saturating_sub(self.size.h)).max(N::ZERO),
                _kind: std::marker::PhantomData,
            },
            size: self.size,
        }
    }

    /// Compute the hollow frame of this [`Rectangle`]
    ///
    /// Returns the up to four bars (top, left, right, bottom) covering the
    /// border of the given thickness while leaving the interior free. A
    /// rectangle too small to have an interior is returned whole.
    pub fn outline(self, thickness: N) -> SmallVec<[Rectangle<N, Kind>; 4]> {
        let mut bars = SmallVec::new();
        if thickness <= N::ZERO || self.is_empty() {
            return bars;
        }

        let double = thickness.saturating_add(thickness);
        if double >= self.size.w || double >= self.size.h {
            bars.push(self);
            return bars;
        }

        let inner_h = self.size.h.saturating_sub(double);
        // Top bar
        bars.push(Rectangle::new(self.loc, (self.size.w, thickness).into()));
        // Left bar
        bars.push(Rectangle::new(
            (self.loc.x, self.loc.y.saturating_add(thickness)).into(),
            (thickness, inner_h).into(),
        ));
        // Right bar
        bars.push(Rectangle::new(
            (
                self.loc.x.saturating_add(self.size.w).saturating_sub(thickness),
                self.loc.y.saturating_add(thickness),
            )
                .into(),
            (thickness, inner_h).into(),
        ));
        // Bottom bar
        bars.push(Rectangle::new(
            (
                self.loc.x,
                self.loc.y.saturating_add(self.size.h).saturating_sub(thickness),
            )
                .into(),
            (self.size.w, thickness).into(),
        ));
        bars
    }

    /// Subtract another [`Rectangle`] from this [`Rectangle`]
    ///
    /// If the rectangles to not overlap the original rectangle will
    /// be returned.
    /// If the other rectangle contains self no rectangle will be returned,
    /// otherwise up to 4 rectangles will be returned.
    pub fn subtract_rect(self, other: Self) -> Vec<Self> {
        self.subtract_rects([other])
    }

    /// Subtract a set of [`Rectangle`]s from this [`Rectangle`]
    pub fn subtract_rects(self, others: impl IntoIterator<Item = Self>) -> Vec<Self> {
        let mut remaining = Vec::with_capacity(4);
        remaining.push(self);
        Self::subtract_rects_many_in_place(remaining, others)
    }

    /// Subtract a set of [`Rectangle`]s from a set of [`Rectangle`]s in-place
    pub fn subtract_rects_many_in_place(
        mut rects: Vec<Self>,
        others: impl IntoIterator<Item = Self>,
    ) -> Vec<Self> {
        for other in others {
            let items = rects.len();
            let mut checked = 0usize;
            let mut index = 0usize;

            // If there is nothing left we can stop,
            // we won't be able to subtract any further
            if items == 0 {
                return rects;
            }

            while checked != items {
                checked += 1;

                // If there is no overlap there is nothing to subtract
                let Some(intersection) = rects[index].intersection(other) else {
                    index += 1;
                    continue;
                };

                // We now know that we have to subtract the other rect
                let item = rects.remove(index);

                // If we are completely contained then nothing is left
                if other.contains_rect(item) {
                    continue;
                }

                let top_rect = Rectangle::new(
                    item.loc,
                    (item.size.w, intersection.loc.y.saturating_sub(item.loc.y)).into(),
                );
                let left_rect: Rectangle<N, Kind> = Rectangle::new(
                    (item.loc.x, intersection.loc.y).into(),
                    (intersection.loc.x.saturating_sub(item.loc.x), intersection.size.h).into(),
                );
                let right_rect: Rectangle<N, Kind> = Rectangle::new(
                    (
                        intersection.loc.x.saturating_add(intersection.size.w),
                        intersection.loc.y,
                    )
                        .into(),
                    (
                        (item.loc.x.saturating_add(item.size.w))
                            .saturating_sub(intersection.loc.x.saturating_add(intersection.size.w)),
                        intersection.size.h,
                    )
                        .into(),
                );
                let bottom_rect: Rectangle<N, Kind> = Rectangle::new(
                    (item.loc.x, intersection.loc.y.saturating_add(intersection.size.h)).into(),
                    (
                        item.size.w,
                        (item.loc.y.saturating_add(item.size.h))
                            .saturating_sub(intersection.loc.y.saturating_add(intersection.size.h)),
                    )
                        .into(),
                );

                if !top_rect.is_empty() {
                    rects.push(top_rect);
                }

                if !left_rect.is_empty() {
                    rects.push(left_rect);
                }

                if !right_rect.is_empty() {
                    rects.push(right_rect);
                }

                if !bottom_rect.is_empty() {
                    rects.push(bottom_rect);
                }
            }
        }

        rects
    }
}

impl<N: Coordinate> Rectangle<N, Screen> {
    /// Convert this screen rectangle to area coordinates, given the area's
    /// origin on screen
    #[inline]
    pub fn to_area(self, origin: Point<N, Screen>) -> Rectangle<N, Area> {
        Rectangle {
            loc: self.loc.to_area(origin),
            size: Size {
                w: self.size.w,
                h: self.size.h,
                _kind: std::marker::PhantomData,
            },
        }
    }
}

impl<N: Coordinate> Rectangle<N, Area> {
    /// Convert this area rectangle to screen coordinates, given the area's
    /// origin on screen
    #[inline]
    pub fn to_screen(self, origin: Point<N, Screen>) -> Rectangle<N, Screen> {
        Rectangle {
            loc: self.loc.to_screen(origin),
            size: Size {
                w: self.size.w,
                h: self.size.h,
                _kind: std::marker::PhantomData,
            },
        }
    }
}

impl<N: fmt::Debug, S> fmt::Debug for Rectangle<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("Rectangle<{}>", std::any::type_name::<S>()))?;
        f.debug_struct("")
            .field("x", &self.loc.x)
            .field("y", &self.loc.y)
            .field("width", &self.size.w)
            .field("height", &self.size.h)
            .finish()
    }
}

impl<N: Clone, Kind> Clone for Rectangle<N, Kind> {
    #[inline]
    fn clone(&self) -> Self {
        Rectangle {
            loc: self.loc.clone(),
            size: self.size.clone(),
        }
    }
}

impl<N: Copy, Kind> Copy for Rectangle<N, Kind> {}

impl<N: PartialEq, Kind> PartialEq for Rectangle<N, Kind> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.loc == other.loc && self.size == other.size
    }
}

impl<N: Eq, Kind> Eq for Rectangle<N, Kind> {}

impl<N: Default, Kind> Default for Rectangle<N, Kind> {
    #[inline]
    fn default() -> Self {
        Rectangle {
            loc: Default::default(),
            size: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{snap_axis, Area, Point, Rectangle, Screen};

    #[test]
    fn rectangle_contains_rect_itself() {
        let rect = Rectangle::<i32, Area>::new((10, 20).into(), (30, 40).into());
        assert!(rect.contains_rect(rect));
    }

    #[test]
    fn rectangle_contains_rect_outside() {
        let first = Rectangle::<i32, Area>::new((10, 20).into(), (30, 40).into());
        let second = Rectangle::<i32, Area>::new((41, 61).into(), (30, 40).into());
        assert!(!first.contains_rect(second));
    }

    #[test]
    fn rectangle_contains_rect_extends() {
        let first = Rectangle::<i32, Area>::new((10, 20).into(), (30, 40).into());
        let second = Rectangle::<i32, Area>::new((10, 20).into(), (30, 45).into());
        assert!(!first.contains_rect(second));
    }

    #[test]
    fn rectangle_overlaps_is_symmetric() {
        let first = Rectangle::<i32, Area>::new((0, 0).into(), (100, 100).into());
        let second = Rectangle::<i32, Area>::new((50, 50).into(), (100, 100).into());
        assert!(first.overlaps(second));
        assert!(second.overlaps(first));
    }

    #[test]
    fn rectangle_overlaps_itself_with_positive_area() {
        let rect = Rectangle::<i32, Area>::new((10, 10).into(), (20, 20).into());
        assert!(rect.overlaps(rect));
        let degenerate = Rectangle::<i32, Area>::new((10, 10).into(), (0, 20).into());
        assert!(!degenerate.overlaps(degenerate));
    }

    #[test]
    fn rectangle_touching_edges_do_not_overlap() {
        let left = Rectangle::<i32, Area>::new((0, 0).into(), (50, 50).into());
        let right = Rectangle::<i32, Area>::new((50, 0).into(), (50, 50).into());
        assert!(!left.overlaps(right));
        assert!(!right.overlaps(left));
        assert!(left.overlaps_or_touches(right));
    }

    #[test]
    fn rectangle_subtract_full() {
        let outer = Rectangle::<i32, Area>::from_size((100, 100).into());
        let inner = Rectangle::<i32, Area>::new((-10, -10).into(), (1000, 1000).into());

        let rects = outer.subtract_rect(inner);
        assert_eq!(rects, vec![])
    }

    #[test]
    fn rectangle_subtract_center_hole() {
        let outer = Rectangle::<i32, Area>::from_size((100, 100).into());
        let inner = Rectangle::<i32, Area>::new((10, 10).into(), (80, 80).into());

        let rects = outer.subtract_rect(inner);
        assert_eq!(
            rects,
            vec![
                // Top rect
                Rectangle::<i32, Area>::from_size((100, 10).into()),
                // Left rect
                Rectangle::<i32, Area>::new((0, 10).into(), (10, 80).into()),
                // Right rect
                Rectangle::<i32, Area>::new((90, 10).into(), (10, 80).into()),
                // Bottom rect
                Rectangle::<i32, Area>::new((0, 90).into(), (100, 10).into()),
            ]
        )
    }

    #[test]
    fn rectangle_subtract_covers_and_stays_disjoint() {
        let outer = Rectangle::<i32, Area>::from_size((100, 100).into());
        let inner = Rectangle::<i32, Area>::new((25, 25).into(), (50, 50).into());

        let rects = outer.subtract_rect(inner);
        let area: i32 = rects.iter().map(|r| r.size.w * r.size.h).sum();
        assert_eq!(area, 100 * 100 - 50 * 50);
        for (i, a) in rects.iter().enumerate() {
            assert!(!a.overlaps(inner));
            for b in rects.iter().skip(i + 1) {
                assert!(!a.overlaps(*b));
            }
        }
    }

    #[test]
    fn rectangle_subtract_full_top() {
        let outer = Rectangle::<i32, Area>::from_size((100, 100).into());
        let inner = Rectangle::<i32, Area>::new((0, -20).into(), (100, 100).into());

        let rects = outer.subtract_rect(inner);
        assert_eq!(
            rects,
            vec![
                // Bottom rect
                Rectangle::<i32, Area>::new((0, 80).into(), (100, 20).into()),
            ]
        )
    }

    #[test]
    fn rectangle_subtract_full_bottom() {
        let outer = Rectangle::<i32, Area>::from_size((100, 100).into());
        let inner = Rectangle::<i32, Area>::new((0, 20).into(), (100, 100).into());

        let rects = outer.subtract_rect(inner);
        assert_eq!(
            rects,
            vec![
                // Top rect
                Rectangle::<i32, Area>::from_size((100, 20).into()),
            ]
        )
    }

    #[test]
    fn rectangle_subtract_full_left() {
        let outer = Rectangle::<i32, Area>::from_size((100, 100).into());
        let inner = Rectangle::<i32, Area>::new((-20, 0).into(), (100, 100).into());

        let rects = outer.subtract_rect(inner);
        assert_eq!(
            rects,
            vec![
                // Right rect
                Rectangle::<i32, Area>::new((80, 0).into(), (20, 100).into()),
            ]
        )
    }

    #[test]
    fn rectangle_subtract_full_right() {
        let outer = Rectangle::<i32, Area>::from_size((100, 100).into());
        let inner = Rectangle::<i32, Area>::new((20, 0).into(), (100, 100).into());

        let rects = outer.subtract_rect(inner);
        assert_eq!(
            rects,
            vec![
                // Left rect
                Rectangle::<i32, Area>::from_size((20, 100).into()),
            ]
        )
    }

    #[test]
    fn rectangle_clamp_loc_inside_bounds() {
        let rect = Rectangle::<i32, Area>::new((90, -5).into(), (20, 20).into());
        let clamped = rect.clamp_loc_to((100, 100));
        assert_eq!(clamped, Rectangle::new((80, 0).into(), (20, 20).into()));
    }

    #[test]
    fn rectangle_clamp_loc_oversized_sits_at_zero() {
        let rect = Rectangle::<i32, Area>::new((30, 10).into(), (150, 60).into());
        let clamped = rect.clamp_loc_to((100, 100));
        assert_eq!(clamped.loc, Point::from((0, 10)));
        assert_eq!(clamped.size, rect.size);
    }

    #[test]
    fn rectangle_outline_bars() {
        let rect = Rectangle::<i32, Area>::new((10, 10).into(), (40, 30).into());
        let bars = rect.outline(4);
        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0], Rectangle::new((10, 10).into(), (40, 4).into()));
        assert_eq!(bars[1], Rectangle::new((10, 14).into(), (4, 22).into()));
        assert_eq!(bars[2], Rectangle::new((46, 14).into(), (4, 22).into()));
        assert_eq!(bars[3], Rectangle::new((10, 36).into(), (40, 4).into()));
        let hole = Rectangle::<i32, Area>::new((14, 14).into(), (32, 22).into());
        for bar in &bars {
            assert!(!bar.overlaps(hole));
        }
    }

    #[test]
    fn rectangle_outline_too_thin_is_solid() {
        let rect = Rectangle::<i32, Area>::new((0, 0).into(), (10, 30).into());
        let bars = rect.outline(5);
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0], rect);
    }

    #[test]
    fn point_screen_to_area_and_back() {
        let origin = Point::<i32, Screen>::from((80, 60));
        let on_screen = Point::<i32, Screen>::from((100, 100));
        let in_area = on_screen.to_area(origin);
        assert_eq!(in_area, Point::from((20, 40)));
        assert_eq!(in_area.to_screen(origin), on_screen);
    }

    #[test]
    fn snap_axis_rounds_down() {
        assert_eq!(snap_axis(42, false, 50, 800), 40);
        assert_eq!(snap_axis(49, false, 50, 800), 40);
        assert_eq!(snap_axis(40, false, 50, 800), 40);
    }

    #[test]
    fn snap_axis_advances_forward() {
        assert_eq!(snap_axis(42, true, 50, 800), 50);
    }

    #[test]
    fn snap_axis_respects_far_bound() {
        // 750 + 10 + 45 would end past 800, so the advance is skipped
        assert_eq!(snap_axis(752, true, 45, 800), 750);
        // with room to spare the advance happens
        assert_eq!(snap_axis(742, true, 45, 800), 750);
    }
}
