//! Shell notification events
//!
//! The engine reports its state changes through an [`EventTable`] the
//! embedding shell subscribes to: layout mode starting and ending, the
//! bracketing of individual applet mutations, and drag-feedback changes.
//! Subscribers register per [`EventKind`]; dispatch is synchronous and
//! subscribers must not emit further events from within a callback.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::applet::AppletId;

/// Visual style of the drag feedback icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragIcon {
    /// The dragged applet does not overlap any other applet
    Plain,
    /// The dragged applet currently overlaps another applet
    Highlighted,
}

/// A state-change notification emitted by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Layout mode is about to begin
    LayoutModeStart,
    /// Layout mode has begun
    LayoutModeStarted,
    /// Layout mode is about to end
    LayoutModeEnd,
    /// Layout mode has ended
    LayoutModeEnded,
    /// The given applet is about to be mutated
    AppletChangeStart(AppletId),
    /// The mutation of the given applet is finished
    AppletChangeEnd(AppletId),
    /// The applet arrangement changed
    ///
    /// Fires once per applied mutation (a drag that landed somewhere new, an
    /// applet added or closed) and once more when the session commits the
    /// arrangement to the placement store.
    LayoutChanged,
    /// The drag feedback icon switched styles
    DragIconChanged(DragIcon),
}

impl ShellEvent {
    /// The payload-free discriminant of this event, used for subscription
    pub fn kind(&self) -> EventKind {
        match self {
            ShellEvent::LayoutModeStart => EventKind::LayoutModeStart,
            ShellEvent::LayoutModeStarted => EventKind::LayoutModeStarted,
            ShellEvent::LayoutModeEnd => EventKind::LayoutModeEnd,
            ShellEvent::LayoutModeEnded => EventKind::LayoutModeEnded,
            ShellEvent::AppletChangeStart(_) => EventKind::AppletChangeStart,
            ShellEvent::AppletChangeEnd(_) => EventKind::AppletChangeEnd,
            ShellEvent::LayoutChanged => EventKind::LayoutChanged,
            ShellEvent::DragIconChanged(_) => EventKind::DragIconChanged,
        }
    }
}

/// Discriminant of [`ShellEvent`], used as the subscription key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// See [`ShellEvent::LayoutModeStart`]
    LayoutModeStart,
    /// See [`ShellEvent::LayoutModeStarted`]
    LayoutModeStarted,
    /// See [`ShellEvent::LayoutModeEnd`]
    LayoutModeEnd,
    /// See [`ShellEvent::LayoutModeEnded`]
    LayoutModeEnded,
    /// See [`ShellEvent::AppletChangeStart`]
    AppletChangeStart,
    /// See [`ShellEvent::AppletChangeEnd`]
    AppletChangeEnd,
    /// See [`ShellEvent::LayoutChanged`]
    LayoutChanged,
    /// See [`ShellEvent::DragIconChanged`]
    DragIconChanged,
}

type Subscriber = Box<dyn FnMut(&ShellEvent)>;

struct EventTableInner {
    subscribers: RefCell<HashMap<EventKind, Vec<Subscriber>>>,
}

/// Table of event subscribers, cloneable like a handle
///
/// Clones share the same subscriber lists. The table is single-threaded;
/// it lives on the shell's main loop like everything else in this crate.
pub struct EventTable {
    inner: Rc<EventTableInner>,
}

impl Clone for EventTable {
    fn clone(&self) -> EventTable {
        EventTable {
            inner: self.inner.clone(),
        }
    }
}

impl Default for EventTable {
    fn default() -> Self {
        Self::new()
    }
}

impl EventTable {
    /// Create an empty table
    pub fn new() -> EventTable {
        EventTable {
            inner: Rc::new(EventTableInner {
                subscribers: RefCell::new(HashMap::new()),
            }),
        }
    }

    /// Register a subscriber for one kind of event
    pub fn subscribe<F: FnMut(&ShellEvent) + 'static>(&self, kind: EventKind, f: F) {
        self.inner
            .subscribers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Box::new(f));
    }

    /// Dispatch an event to the subscribers of its kind
    pub fn emit(&self, event: &ShellEvent) {
        let mut subscribers = self.inner.subscribers.borrow_mut();
        if let Some(list) = subscribers.get_mut(&event.kind()) {
            for subscriber in list.iter_mut() {
                subscriber(event);
            }
        }
    }
}

impl fmt::Debug for EventTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscribers = self.inner.subscribers.borrow();
        let count: usize = subscribers.values().map(Vec::len).sum();
        f.debug_struct("EventTable")
            .field("subscribers", &count)
            .finish()
    }
}
