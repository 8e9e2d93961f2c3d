//! Pointer input types
//!
//! The embedding shell delivers pointer events in [`Screen`] coordinates,
//! exactly as its windowing system reports them. The entry points that
//! consume them ([`LayoutSession`](crate::layout::LayoutSession) and
//! [`DragController`](crate::applet::drag::DragController)) convert the
//! locations into the area's coordinate space.

use crate::utils::{Point, Screen};

/// The pointer button that starts and ends gestures
///
/// Presses of any other button are ignored by the gesture entry points.
pub const PRIMARY_BUTTON: u32 = 1;

/// State of a pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonState {
    /// The button is released
    Released,
    /// The button is pressed
    Pressed,
}

/// Pointer motion event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionEvent {
    /// Pointer position in screen coordinates
    pub location: Point<f64, Screen>,
    /// Timestamp of the event, in milliseconds
    pub time: u32,
}

/// Pointer button event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonEvent {
    /// Pointer position in screen coordinates
    pub location: Point<f64, Screen>,
    /// Button number, counted from [`PRIMARY_BUTTON`]
    pub button: u32,
    /// Whether the button was pressed or released
    pub state: ButtonState,
    /// Timestamp of the event, in milliseconds
    pub time: u32,
}
