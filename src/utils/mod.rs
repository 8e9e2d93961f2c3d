//! Various utilities functions and types

mod geometry;
pub(crate) mod ids;

pub use self::geometry::{snap_axis, Area, Coordinate, Point, Rectangle, Screen, Size, GRID_SIZE};
