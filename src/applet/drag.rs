//! Direct-manipulation dragging outside of layout mode
//!
//! In simple mode there is no transaction to commit: a grabbed applet is
//! moved or resized on the [`HomeArea`] right away and the key-file is
//! only rewritten by the shell's usual save points. Instead of streaming
//! motion events, the controller polls the pointer position on a calloop
//! timer while a grab is active, the same cadence the pointer is sampled
//! at by the toolkit.
//!
//! The controller is generic over the compositor state like other
//! calloop-driven helpers: the timer callback receives `&mut D` and digs
//! the controller, the area and the pointer back out through
//! [`DragHandler`].

use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};
use tracing::{debug, trace, warn};

use crate::applet::{AppletElement, AppletId, DecorationMetrics, ResizeCapability};
use crate::area::HomeArea;
use crate::event::{EventTable, ShellEvent};
use crate::input::{ButtonEvent, ButtonState, PRIMARY_BUTTON};
use crate::layout::resize_candidate;
use crate::utils::{snap_axis, Area, Point, Rectangle, Screen, Size};

/// How often the pointer is sampled while a grab is active
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Access to the current pointer position in screen coordinates
pub trait PointerSource {
    /// Where the pointer currently is
    fn position(&self) -> Point<f64, Screen>;
}

/// Handler trait for compositor states driving a [`DragController`]
pub trait DragHandler: Sized {
    /// Applet element type mapped on the home area
    type Element: AppletElement;
    /// Pointer the poll timer samples
    type Pointer: PointerSource;

    /// Access to the controller stored inside the state
    fn drag_controller(&mut self) -> &mut DragController<Self>;
    /// Access to the home area the applets live on
    fn home_area(&mut self) -> &mut HomeArea<Self::Element>;
    /// Access to the pointer
    fn pointer(&mut self) -> &Self::Pointer;
}

/// What a button event amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonOutcome {
    /// The press hit the close zone; the shell decides what to do with it
    CloseRequested(AppletId),
    /// A move or resize grab started
    GrabStarted(AppletId),
    /// The active grab finished
    GrabEnded(AppletId),
}

#[derive(Debug, Clone, Copy)]
enum DragKind {
    Move {
        offset: Point<f64, Area>,
    },
    Resize {
        origin: Point<i32, Area>,
        fallback: Size<i32, Area>,
        capability: ResizeCapability,
        minimum: Size<i32, Area>,
    },
}

#[derive(Debug)]
struct ActiveDrag {
    applet: AppletId,
    kind: DragKind,
    start_rect: Rectangle<i32, Area>,
    start_explicit: bool,
    timer_token: Option<RegistrationToken>,
}

/// Poll-driven move and resize grabs for simple mode
#[derive(Debug)]
pub struct DragController<D> {
    loop_handle: LoopHandle<'static, D>,
    events: EventTable,
    metrics: DecorationMetrics,
    grab: Option<ActiveDrag>,
}

impl<D: DragHandler> DragController<D> {
    /// Create a new controller scheduling its poll timer on `loop_handle`
    pub fn new(loop_handle: LoopHandle<'static, D>, events: EventTable) -> DragController<D> {
        DragController {
            loop_handle,
            events,
            metrics: DecorationMetrics::default(),
            grab: None,
        }
    }

    /// Override the decoration metrics used for hit-testing
    pub fn set_decoration_metrics(&mut self, metrics: DecorationMetrics) {
        self.metrics = metrics;
    }

    /// Whether a grab is currently active
    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// The applet held by the active grab, if any
    pub fn active_applet(&self) -> Option<&AppletId> {
        self.grab.as_ref().map(|drag| &drag.applet)
    }

    /// Feed a pointer button event into the controller
    ///
    /// A primary-button press over an applet either reports a close
    /// request or starts a grab; a release finishes the active grab,
    /// snapping the position to the grid when the area asks for it.
    /// Returns what happened so the shell can react.
    pub fn pointer_button(
        &mut self,
        area: &mut HomeArea<D::Element>,
        event: &ButtonEvent,
    ) -> Option<ButtonOutcome> {
        if event.button != PRIMARY_BUTTON {
            return None;
        }
        match event.state {
            ButtonState::Pressed => self.on_press(area, event.location),
            ButtonState::Released => self.on_release(area),
        }
    }

    /// Drop the active grab and put the applet back where it started
    pub fn cancel(&mut self, area: &mut HomeArea<D::Element>) -> bool {
        let Some(drag) = self.grab.take() else {
            return false;
        };
        self.disarm(&drag);

        if area.applet_geometry(&drag.applet) != Some(drag.start_rect) {
            match drag.kind {
                DragKind::Move { .. } => {
                    area.move_applet(&drag.applet, drag.start_rect.loc);
                }
                DragKind::Resize { .. } => {
                    area.resize_applet(&drag.applet, drag.start_rect);
                }
            }
        }
        if let DragKind::Resize { .. } = drag.kind {
            // A cancelled resize must not leave the size marked user-chosen.
            area.set_explicit_size(&drag.applet, drag.start_explicit);
        }
        debug!(applet = %drag.applet, "Grab cancelled");
        self.events.emit(&ShellEvent::AppletChangeEnd(drag.applet));
        true
    }

    fn on_press(
        &mut self,
        area: &mut HomeArea<D::Element>,
        location: Point<f64, Screen>,
    ) -> Option<ButtonOutcome> {
        if self.grab.is_some() {
            return None;
        }

        let local = location.to_area(area.screen_origin().to_f64());
        let element = area.applet_under(local)?;
        let id = element.id();
        let capability = element.resize_capability();
        let declared = element.minimum_size();
        let rect = area.applet_geometry(&id)?;
        let start_explicit = area.has_explicit_size(&id);

        if self.metrics.close_zone(rect).to_f64().contains(local) {
            trace!(applet = %id, "Close zone pressed");
            return Some(ButtonOutcome::CloseRequested(id));
        }

        let kind = if self.metrics.resize_zone(rect).to_f64().contains(local)
            && !capability.is_empty()
        {
            let hard = self.metrics.minimum_applet_size();
            DragKind::Resize {
                origin: rect.loc,
                fallback: rect.size,
                capability,
                minimum: (declared.w.max(hard.w), declared.h.max(hard.h)).into(),
            }
        } else {
            area.raise_applet(&id);
            DragKind::Move {
                offset: local - rect.loc.to_f64(),
            }
        };

        trace!(applet = %id, ?kind, "Grab started");
        self.arm(id.clone(), kind, rect, start_explicit);
        self.events.emit(&ShellEvent::AppletChangeStart(id.clone()));
        Some(ButtonOutcome::GrabStarted(id))
    }

    fn on_release(&mut self, area: &mut HomeArea<D::Element>) -> Option<ButtonOutcome> {
        let drag = self.grab.take()?;
        self.disarm(&drag);
        let id = drag.applet;

        if area.snap_to_grid() {
            if let DragKind::Move { .. } = drag.kind {
                if let Some(rect) = area.applet_geometry(&id) {
                    let bounds = area.bounds();
                    let snapped = Point::from((
                        snap_axis(rect.loc.x, rect.loc.x > drag.start_rect.loc.x, rect.size.w, bounds.w),
                        snap_axis(rect.loc.y, rect.loc.y > drag.start_rect.loc.y, rect.size.h, bounds.h),
                    ));
                    area.move_applet(&id, snapped);
                }
            }
        }

        let changed = area.applet_geometry(&id) != Some(drag.start_rect);
        debug!(applet = %id, changed, "Grab finished");
        self.events.emit(&ShellEvent::AppletChangeEnd(id.clone()));
        if changed {
            self.events.emit(&ShellEvent::LayoutChanged);
        }
        Some(ButtonOutcome::GrabEnded(id))
    }

    fn arm(
        &mut self,
        applet: AppletId,
        kind: DragKind,
        start_rect: Rectangle<i32, Area>,
        start_explicit: bool,
    ) {
        let token = self
            .loop_handle
            .insert_source(Timer::from_duration(POLL_INTERVAL), move |_, _, data: &mut D| {
                Self::tick(data)
            });
        if token.is_err() {
            warn!(applet = %applet, "Failed to arm the drag poll timer");
        }

        self.grab = Some(ActiveDrag {
            applet,
            kind,
            start_rect,
            start_explicit,
            timer_token: token.ok(),
        });
    }

    fn disarm(&mut self, drag: &ActiveDrag) {
        if let Some(token) = drag.timer_token {
            self.loop_handle.remove(token);
        }
    }

    /// One poll: sample the pointer and apply the candidate geometry
    fn tick(data: &mut D) -> TimeoutAction {
        let position = data.pointer().position();
        let (applet, kind) = match &data.drag_controller().grab {
            Some(drag) => (drag.applet.clone(), drag.kind),
            // The grab is gone, let the timer die with it.
            None => return TimeoutAction::Drop,
        };

        let area = data.home_area();
        let local = position.to_area(area.screen_origin().to_f64());
        match kind {
            DragKind::Move { offset } => {
                area.move_applet(&applet, (local - offset).to_i32_round());
            }
            DragKind::Resize {
                origin,
                fallback,
                capability,
                minimum,
            } => {
                let size = resize_candidate(origin, local, capability, fallback, minimum, area.bounds());
                area.resize_applet(&applet, Rectangle::new(origin, size));
            }
        }

        TimeoutAction::ToDuration(POLL_INTERVAL)
    }
}

impl<D> Drop for DragController<D> {
    fn drop(&mut self) {
        if let Some(drag) = self.grab.take() {
            if let Some(token) = drag.timer_token {
                self.loop_handle.remove(token);
            }
        }
    }
}
