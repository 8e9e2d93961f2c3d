//! Applet types and the seams towards the embedding shell
//!
//! The engine never touches toolkit widgets directly. The shell implements
//! [`AppletElement`] for its widget handle, [`AppletProvider`] for applet
//! instantiation and teardown, and optionally [`AppletSnapshots`] for the
//! drag-feedback bitmaps shown while an applet is moved in layout mode.
//!
//! Elements are cheap handles with interior mutability; everything here
//! takes `&self` and may be called repeatedly during a gesture.

use std::fmt;

use crate::utils::{Area, Point, Rectangle, Size};

pub mod drag;

/// Identifier of an applet, unique within a home area
///
/// Identifies the applet across sessions; the placement store keys its
/// sections by this value. Shells use the path of the applet's desktop
/// file here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AppletId(String);

impl AppletId {
    /// Create an id from the applet's identifying string
    pub fn new(id: impl Into<String>) -> AppletId {
        AppletId(id.into())
    }

    /// The identifying string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppletId {
    fn from(id: &str) -> AppletId {
        AppletId(id.to_owned())
    }
}

impl From<String> for AppletId {
    fn from(id: String) -> AppletId {
        AppletId(id)
    }
}

/// Opaque handle to a drag-feedback bitmap captured by the shell
///
/// Minted by an [`AppletSnapshots`] implementation; the engine only caches
/// and returns these, it never interprets them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnapshotId(u64);

impl SnapshotId {
    /// Wrap a raw snapshot number
    pub fn from_raw(raw: u64) -> SnapshotId {
        SnapshotId(raw)
    }

    /// The raw snapshot number
    pub fn into_raw(self) -> u64 {
        self.0
    }
}

bitflags::bitflags! {
    /// Axes along which an applet allows interactive resizing
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ResizeCapability: u32 {
        /// The width may be changed
        const HORIZONTAL = 0b01;
        /// The height may be changed
        const VERTICAL = 0b10;
    }
}

/// Pixel metrics of the decorations drawn around an applet in layout mode
///
/// The close button sits in the top-right corner, the resize handle in the
/// bottom-right corner, and a highlight border runs along all four edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationMetrics {
    /// Size of the close-button hot zone
    pub close_button: Size<i32, Area>,
    /// Size of the resize-handle hot zone
    pub resize_handle: Size<i32, Area>,
    /// Width of the highlight border
    pub border_width: i32,
}

impl Default for DecorationMetrics {
    fn default() -> Self {
        DecorationMetrics {
            close_button: Size::from((26, 26)),
            resize_handle: Size::from((40, 40)),
            border_width: 10,
        }
    }
}

impl DecorationMetrics {
    /// The close-button hot zone of an applet covering `rect`
    pub fn close_zone(&self, rect: Rectangle<i32, Area>) -> Rectangle<i32, Area> {
        Rectangle::new(
            Point::from((rect.loc.x + rect.size.w - self.close_button.w, rect.loc.y)),
            self.close_button,
        )
    }

    /// The resize-handle hot zone of an applet covering `rect`
    pub fn resize_zone(&self, rect: Rectangle<i32, Area>) -> Rectangle<i32, Area> {
        Rectangle::new(
            Point::from((
                rect.loc.x + rect.size.w - self.resize_handle.w,
                rect.loc.y + rect.size.h - self.resize_handle.h,
            )),
            self.resize_handle,
        )
    }

    /// Smallest size an applet can be resized to with these decorations
    ///
    /// Below this the close button and the resize handle would overlap and
    /// one of them would become unreachable.
    pub fn minimum_applet_size(&self) -> Size<i32, Area> {
        Size::from((
            self.close_button.w + self.resize_handle.w + 2 * self.border_width,
            self.close_button.h + self.resize_handle.h + 2 * self.border_width,
        ))
    }
}

/// An applet widget mappable onto a [`HomeArea`](crate::area::HomeArea)
pub trait AppletElement {
    /// The identifier of this applet
    fn id(&self) -> AppletId;

    /// The size the applet takes when nothing else is stored for it
    fn natural_size(&self) -> Size<i32, Area>;

    /// The smallest size the applet declares itself usable at
    ///
    /// Defaults to no constraint; the decoration minimum still applies.
    fn minimum_size(&self) -> Size<i32, Area> {
        Size::from((0, 0))
    }

    /// The axes along which this applet may be resized
    fn resize_capability(&self) -> ResizeCapability;

    /// Request the widget to take the given geometry
    ///
    /// Called with the final rectangle of a gesture and when a stored
    /// layout is applied; never called repeatedly during a drag.
    fn set_geometry(&self, geometry: Rectangle<i32, Area>);

    /// Show or hide the widget
    fn set_visible(&self, visible: bool);

    /// Ask the widget to repaint its decorations
    ///
    /// Called when the overlap highlight of the applet flips.
    fn request_repaint(&self) {}

    /// Whether the backing widget still exists
    fn alive(&self) -> bool;
}

impl<T: AppletElement> AppletElement for &T {
    fn id(&self) -> AppletId {
        AppletElement::id(*self)
    }
    fn natural_size(&self) -> Size<i32, Area> {
        AppletElement::natural_size(*self)
    }
    fn minimum_size(&self) -> Size<i32, Area> {
        AppletElement::minimum_size(*self)
    }
    fn resize_capability(&self) -> ResizeCapability {
        AppletElement::resize_capability(*self)
    }
    fn set_geometry(&self, geometry: Rectangle<i32, Area>) {
        AppletElement::set_geometry(*self, geometry)
    }
    fn set_visible(&self, visible: bool) {
        AppletElement::set_visible(*self, visible)
    }
    fn request_repaint(&self) {
        AppletElement::request_repaint(*self)
    }
    fn alive(&self) -> bool {
        AppletElement::alive(*self)
    }
}

/// Instantiation and teardown of applet widgets
///
/// Implemented by the shell's plugin loader. [`HomeArea::load_layout`]
/// creates one element per stored section through this trait and hands
/// elements back when they leave the area for good.
///
/// [`HomeArea::load_layout`]: crate::area::HomeArea::load_layout
pub trait AppletProvider<E: AppletElement> {
    /// Instantiate the applet backing `id`
    fn create(&mut self, id: &AppletId) -> Result<E, ProviderError>;

    /// Tear down an applet that is leaving the area
    fn destroy(&mut self, element: E);
}

/// Failure to instantiate an applet
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No implementation is installed for the applet
    #[error("no applet installed for {0}")]
    Missing(AppletId),
    /// The applet exists but failed to initialize
    #[error("applet {id} failed to load: {reason}")]
    Failed {
        /// The applet that failed
        id: AppletId,
        /// Shell-provided description of the failure
        reason: String,
    },
}

/// Capture of drag-feedback bitmaps
///
/// While an applet is dragged in layout mode the shell may show a bitmap
/// of it instead of the live widget. The session captures lazily at drag
/// start, caches the handle per applet, and discards all handles when the
/// session ends.
pub trait AppletSnapshots<E: AppletElement> {
    /// Capture a bitmap of the element, if the shell supports it
    fn capture(&mut self, element: &E) -> Option<SnapshotId>;

    /// Release a previously captured bitmap
    fn discard(&mut self, snapshot: SnapshotId);
}

/// An [`AppletSnapshots`] implementation that never captures
///
/// For shells that drag the live widget and need no bitmap feedback.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSnapshots;

impl<E: AppletElement> AppletSnapshots<E> for NoSnapshots {
    fn capture(&mut self, _element: &E) -> Option<SnapshotId> {
        None
    }

    fn discard(&mut self, _snapshot: SnapshotId) {}
}

#[cfg(test)]
pub(crate) use self::test_support::{RecordingSnapshots, TestApplet, TestProvider};

#[cfg(test)]
mod test_support {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::{
        AppletElement, AppletId, AppletProvider, AppletSnapshots, ProviderError, ResizeCapability,
        SnapshotId,
    };
    use crate::utils::{Area, Rectangle, Size};

    #[derive(Debug)]
    struct Shared {
        geometry: Option<Rectangle<i32, Area>>,
        visible: bool,
        alive: bool,
        repaints: u32,
    }

    /// Widget stand-in recording everything the engine asks of it.
    #[derive(Debug, Clone)]
    pub(crate) struct TestApplet {
        id: AppletId,
        natural: Size<i32, Area>,
        minimum: Size<i32, Area>,
        capability: ResizeCapability,
        shared: Rc<RefCell<Shared>>,
    }

    impl TestApplet {
        pub(crate) fn new(id: &str, natural: (i32, i32)) -> TestApplet {
            TestApplet {
                id: AppletId::new(id),
                natural: natural.into(),
                minimum: (0, 0).into(),
                capability: ResizeCapability::all(),
                shared: Rc::new(RefCell::new(Shared {
                    geometry: None,
                    visible: true,
                    alive: true,
                    repaints: 0,
                })),
            }
        }

        pub(crate) fn with_capability(mut self, capability: ResizeCapability) -> TestApplet {
            self.capability = capability;
            self
        }

        pub(crate) fn with_minimum(mut self, minimum: (i32, i32)) -> TestApplet {
            self.minimum = minimum.into();
            self
        }

        pub(crate) fn geometry(&self) -> Option<Rectangle<i32, Area>> {
            self.shared.borrow().geometry
        }

        pub(crate) fn visible(&self) -> bool {
            self.shared.borrow().visible
        }

        pub(crate) fn repaints(&self) -> u32 {
            self.shared.borrow().repaints
        }

        pub(crate) fn kill(&self) {
            self.shared.borrow_mut().alive = false;
        }
    }

    impl AppletElement for TestApplet {
        fn id(&self) -> AppletId {
            self.id.clone()
        }
        fn natural_size(&self) -> Size<i32, Area> {
            self.natural
        }
        fn minimum_size(&self) -> Size<i32, Area> {
            self.minimum
        }
        fn resize_capability(&self) -> ResizeCapability {
            self.capability
        }
        fn set_geometry(&self, geometry: Rectangle<i32, Area>) {
            self.shared.borrow_mut().geometry = Some(geometry);
        }
        fn set_visible(&self, visible: bool) {
            self.shared.borrow_mut().visible = visible;
        }
        fn request_repaint(&self) {
            self.shared.borrow_mut().repaints += 1;
        }
        fn alive(&self) -> bool {
            self.shared.borrow().alive
        }
    }

    /// Provider stand-in with a fixed catalogue of constructible applets.
    #[derive(Debug, Default)]
    pub(crate) struct TestProvider {
        catalogue: HashMap<String, (i32, i32)>,
        pub(crate) created: Vec<AppletId>,
        pub(crate) destroyed: Vec<AppletId>,
        pub(crate) handles: HashMap<String, TestApplet>,
    }

    impl TestProvider {
        pub(crate) fn with_applet(mut self, id: &str, natural: (i32, i32)) -> TestProvider {
            self.catalogue.insert(id.to_owned(), natural);
            self
        }

        pub(crate) fn handle(&self, id: &str) -> &TestApplet {
            &self.handles[id]
        }
    }

    impl AppletProvider<TestApplet> for TestProvider {
        fn create(&mut self, id: &AppletId) -> Result<TestApplet, ProviderError> {
            let Some(&natural) = self.catalogue.get(id.as_str()) else {
                return Err(ProviderError::Missing(id.clone()));
            };
            let applet = TestApplet::new(id.as_str(), natural);
            self.created.push(id.clone());
            self.handles.insert(id.as_str().to_owned(), applet.clone());
            Ok(applet)
        }

        fn destroy(&mut self, element: TestApplet) {
            self.destroyed.push(element.id());
        }
    }

    /// Snapshot store stand-in handing out sequential ids.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSnapshots {
        next: u64,
        pub(crate) captured: Vec<SnapshotId>,
        pub(crate) discarded: Vec<SnapshotId>,
    }

    impl AppletSnapshots<TestApplet> for RecordingSnapshots {
        fn capture(&mut self, _element: &TestApplet) -> Option<SnapshotId> {
            let id = SnapshotId::from_raw(self.next);
            self.next += 1;
            self.captured.push(id);
            Some(id)
        }

        fn discard(&mut self, snapshot: SnapshotId) {
            self.discarded.push(snapshot);
        }
    }
}
