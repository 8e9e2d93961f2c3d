#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! # Hearth: a home-area layout engine for applet shells
//!
//! This crate provides the placement logic of an applet-based home
//! screen: widgets ("applets") sit on a rectangular home area, their
//! positions and sizes are persisted in a key-file, and the user
//! rearranges them either directly (simple mode) or inside a
//! transactional layout mode that can be committed or rolled back as a
//! whole. Rendering and windowing are deliberately out of scope; the
//! crate talks to the toolkit through small traits.
//!
//! ## Structure of the crate
//!
//! - [`utils`] carries the typed geometry primitives: points, sizes and
//!   rectangles tagged with the coordinate space they live in, plus the
//!   free-space subtraction and grid snapping the placement logic is
//!   built on.
//! - [`applet`] defines the [`applet::AppletElement`] trait the shell
//!   implements for its widgets, decoration hit zones, and the
//!   poll-driven [`applet::drag::DragController`] used outside of layout
//!   mode.
//! - [`area`] is the [`area::HomeArea`] container: mapping, stacking,
//!   automatic free-space placement and key-file load/save.
//! - [`layout`] implements layout mode: a [`layout::LayoutSession`]
//!   wraps the arrangement into nodes, runs move and resize gestures
//!   with live overlap feedback, and commits or rolls back atomically.
//! - [`store`] reads and writes the key-file the arrangement persists
//!   in.
//! - [`event`] and [`input`] hold the notification table and the plain
//!   pointer event types the engine consumes.
//!
//! ## The event loop and state handling
//!
//! Hearth is built around [`calloop`], a callback-oriented event loop:
//! the simple-mode drag controller samples the pointer from a timer
//! source instead of requiring a motion event stream. Callbacks receive
//! a mutable reference to your centralized shell state and reach the
//! controller back through a handler trait
//! ([`applet::drag::DragHandler`]), so no shared-pointer plumbing is
//! needed.
//!
//! ## Logging
//!
//! Hearth makes extensive use of [`tracing`] for its internal logging.
//!
//! For release builds it is recommended to limit the log level during compile time.
//! This can be done by adding a dependency to [`tracing`] and enabling the corresponding features.
//! For example to enable `trace` messages for debug builds, but limit release builds to `debug` add
//! the following in your binary crate `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! tracing = { version = "0.1", features = ["max_level_trace", "release_max_level_debug"] }
//! ```

pub mod applet;
pub mod area;
pub mod event;
pub mod input;
pub mod layout;
pub mod store;
pub mod utils;
