//! Home area, the container owning applet placement
//!
//! A [`HomeArea`] tracks which applets are mapped, where they sit and in
//! which stacking order, and keeps that arrangement in sync with a key-file
//! on disk (see [`crate::store`]). Outside of an active layout session it is
//! the single authority over applet geometry: widgets are only ever moved or
//! resized through it.
//!
//! Newly mapped applets without a stored rectangle land at the area origin.
//! When many applets arrive at once (initial startup, the applet picker),
//! batch-add mode queues them and places the whole set in one pass over the
//! remaining free space, so earlier placements cannot be invalidated by
//! later ones.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, trace, warn};

use crate::applet::{AppletElement, AppletId, AppletProvider};
use crate::store::{PlacementStore, StoreError, StoredGeometry};
use crate::utils::{Area, Point, Rectangle, Screen, Size};

crate::utils::ids::id_gen!(area_id);

/// Margin in pixels carved out around every auto-placed applet
pub const PLACEMENT_PADDING: i32 = 10;

#[derive(Debug)]
struct MappedApplet<E> {
    element: E,
    rect: Rectangle<i32, Area>,
    // true once the user gave the applet a concrete size, as opposed to
    // the widget's natural one; decides how the size is persisted
    explicit_size: bool,
}

/// Container of mapped applets with persistent placement
///
/// Applets are kept in stacking order, back to front. All geometry is in
/// area-relative coordinates; [`HomeArea::screen_origin`] anchors the area
/// on the screen for pointer-event translation.
#[derive(Debug)]
pub struct HomeArea<E: AppletElement> {
    id: usize,
    bounds: Size<i32, Area>,
    origin: Point<i32, Screen>,
    // in stacking order, back to front
    mapped: IndexMap<AppletId, MappedApplet<E>>,
    store: PlacementStore,
    store_path: PathBuf,
    pending: Option<Vec<E>>,
    snap_to_grid: bool,
    config_dirty: bool,
}

impl<E: AppletElement> PartialEq for HomeArea<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: AppletElement> Drop for HomeArea<E> {
    fn drop(&mut self) {
        area_id::remove(self.id);
    }
}

impl<E: AppletElement> HomeArea<E> {
    /// Create a new [`HomeArea`] of the given size, persisted at `store_path`
    ///
    /// The area starts out empty; call [`HomeArea::load_layout`] to bring up
    /// the arrangement recorded on disk.
    pub fn new(bounds: Size<i32, Area>, store_path: impl Into<PathBuf>) -> Self {
        HomeArea {
            id: area_id::next(),
            bounds,
            origin: (0, 0).into(),
            mapped: IndexMap::new(),
            store: PlacementStore::new(),
            store_path: store_path.into(),
            pending: None,
            snap_to_grid: false,
            config_dirty: false,
        }
    }

    /// Size of the area in area-relative coordinates
    pub fn bounds(&self) -> Size<i32, Area> {
        self.bounds
    }

    /// Resize the area, pulling mapped applets back inside the new bounds
    pub fn set_bounds(&mut self, bounds: Size<i32, Area>) {
        if self.bounds == bounds {
            return;
        }

        debug!(area = self.id, ?bounds, "Resizing home area");
        self.bounds = bounds;
        for mapped in self.mapped.values_mut() {
            let clamped = mapped.rect.clamp_loc_to(bounds);
            if clamped != mapped.rect {
                mapped.rect = clamped;
                mapped.element.set_geometry(clamped);
                self.config_dirty = true;
            }
        }
    }

    /// Position of the area's top-left corner on screen
    pub fn screen_origin(&self) -> Point<i32, Screen> {
        self.origin
    }

    /// Move the area's top-left corner on screen
    pub fn set_screen_origin(&mut self, origin: Point<i32, Screen>) {
        self.origin = origin;
    }

    /// Whether released applets snap onto the placement grid
    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    /// Enable or disable grid snapping for applet drags
    pub fn set_snap_to_grid(&mut self, snap: bool) {
        self.snap_to_grid = snap;
    }

    /// True while the arrangement differs from what was last saved
    pub fn is_config_dirty(&self) -> bool {
        self.config_dirty
    }

    /// Path of the key-file this area persists to
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Number of mapped applets
    pub fn len(&self) -> usize {
        self.mapped.len()
    }

    /// True if no applet is mapped
    pub fn is_empty(&self) -> bool {
        self.mapped.is_empty()
    }

    /// Whether an applet with this id is currently mapped
    pub fn contains(&self, id: &AppletId) -> bool {
        self.mapped.contains_key(id)
    }

    /// Get the mapped applet with this id
    pub fn applet(&self, id: &AppletId) -> Option<&E> {
        self.mapped.get(id).map(|mapped| &mapped.element)
    }

    /// Current rectangle of the applet with this id
    pub fn applet_geometry(&self, id: &AppletId) -> Option<Rectangle<i32, Area>> {
        self.mapped.get(id).map(|mapped| mapped.rect)
    }

    /// Iterate the mapped applets, back to front
    pub fn applets(&self) -> impl DoubleEndedIterator<Item = &E> {
        self.mapped.values().map(|mapped| &mapped.element)
    }

    /// Iterate ids, rectangles and elements, back to front
    pub fn placements(&self) -> impl Iterator<Item = (&AppletId, Rectangle<i32, Area>, &E)> {
        self.mapped
            .iter()
            .map(|(id, mapped)| (id, mapped.rect, &mapped.element))
    }

    /// Topmost applet under the given point, if any
    pub fn applet_under(&self, point: Point<f64, Area>) -> Option<&E> {
        self.mapped
            .values()
            .rev()
            .find(|mapped| mapped.rect.to_f64().contains(point))
            .map(|mapped| &mapped.element)
    }

    /// Map an applet onto the area
    ///
    /// If the placement store carries a rectangle for the applet's id, the
    /// applet is put there; a stored size is only applied when it is
    /// concrete, otherwise the widget's natural size is used. Applets
    /// unknown to the store land at the area origin. While batch-add mode
    /// is active the applet is queued instead and placed when the batch is
    /// flushed.
    ///
    /// Mapping an id that is already mapped replaces the element in place,
    /// keeping its stacking position.
    pub fn map_applet(&mut self, element: E) {
        if let Some(queue) = self.pending.as_mut() {
            trace!(applet = %element.id(), "Queueing applet for batch placement");
            queue.push(element);
            return;
        }

        let explicit = self.has_stored_size(&element.id());
        let rect = self.initial_rect(&element);
        self.place(element, rect, explicit);
    }

    /// Unmap an applet, returning its element
    ///
    /// The removal is reflected in the configuration on the next save.
    pub fn unmap_applet(&mut self, id: &AppletId) -> Option<E> {
        let mapped = self.mapped.shift_remove(id)?;
        debug!(area = self.id, applet = %id, "Unmapping applet");
        self.config_dirty = true;
        Some(mapped.element)
    }

    /// Raise an applet to the top of the stacking order
    ///
    /// Returns `false` if no applet with this id is mapped.
    pub fn raise_applet(&mut self, id: &AppletId) -> bool {
        if let Some(mapped) = self.mapped.shift_remove(id) {
            self.mapped.insert(id.clone(), mapped);
            true
        } else {
            false
        }
    }

    /// Move an applet, clamping the new location into the area bounds
    ///
    /// Returns `false` if no applet with this id is mapped.
    pub fn move_applet(&mut self, id: &AppletId, loc: Point<i32, Area>) -> bool {
        let bounds = self.bounds;
        let Some(mapped) = self.mapped.get_mut(id) else {
            return false;
        };

        let rect = Rectangle::new(loc, mapped.rect.size).clamp_loc_to(bounds);
        if rect != mapped.rect {
            mapped.rect = rect;
            mapped.element.set_geometry(rect);
            self.config_dirty = true;
        }
        true
    }

    /// Give an applet a new rectangle, marking its size as user-chosen
    ///
    /// Returns `false` if no applet with this id is mapped.
    pub fn resize_applet(&mut self, id: &AppletId, rect: Rectangle<i32, Area>) -> bool {
        let bounds = self.bounds;
        let Some(mapped) = self.mapped.get_mut(id) else {
            return false;
        };

        let rect = rect.clamp_loc_to(bounds);
        mapped.explicit_size = true;
        if rect != mapped.rect {
            mapped.rect = rect;
            mapped.element.set_geometry(rect);
            self.config_dirty = true;
        }
        true
    }

    /// Toggle batch-add mode
    ///
    /// While enabled, [`HomeArea::map_applet`] queues applets instead of
    /// placing them. Disabling the mode flushes the queue through one
    /// auto-placement pass: queued applets with a stored rectangle keep it,
    /// the rest are fitted into the remaining free space in descending
    /// order of their natural area. Every placed rectangle is carved out of
    /// the free-space region with [`PLACEMENT_PADDING`] around it; when
    /// nothing fits any more a fresh layer spanning the whole area is
    /// started.
    pub fn set_batch_add(&mut self, enabled: bool) {
        if enabled {
            if self.pending.is_none() {
                self.pending = Some(Vec::new());
            }
        } else if let Some(queue) = self.pending.take() {
            self.flush_pending(queue);
        }
    }

    /// Whether batch-add mode is currently active
    pub fn batch_add_active(&self) -> bool {
        self.pending.is_some()
    }

    /// True if any two mapped applets overlap with positive area
    #[profiling::function]
    pub fn any_overlap(&self) -> bool {
        let rects: Vec<_> = self.mapped.values().map(|mapped| mapped.rect).collect();
        rects
            .iter()
            .enumerate()
            .any(|(i, rect)| rects[i + 1..].iter().any(|other| rect.overlaps(*other)))
    }

    /// Drop applets whose element is no longer alive
    ///
    /// Should be called regularly; dead applets keep their stored entry
    /// until the next save.
    #[profiling::function]
    pub fn refresh(&mut self) {
        let before = self.mapped.len();
        self.mapped.retain(|id, mapped| {
            let alive = mapped.element.alive();
            if !alive {
                debug!(applet = %id, "Dropping dead applet");
            }
            alive
        });
        if self.mapped.len() != before {
            self.config_dirty = true;
        }
    }

    /// Rebuild the arrangement from the key-file on disk
    ///
    /// Applets listed in the file are created through `provider` (or
    /// repositioned, if already mapped) in file order, which becomes the
    /// stacking order. Mapped applets the file does not mention are
    /// destroyed as stale. Entries whose applet cannot be created are
    /// dropped from the store so the next save prunes them.
    ///
    /// A missing file counts as an empty layout.
    pub fn load_layout<P>(&mut self, provider: &mut P) -> Result<(), StoreError>
    where
        P: AppletProvider<E>,
    {
        let store = PlacementStore::load(&self.store_path)?;
        debug!(
            area = self.id,
            path = %self.store_path.display(),
            entries = store.len(),
            "Loading applet layout"
        );

        let mut stale = std::mem::take(&mut self.mapped);
        let mut pruned = Vec::new();
        for (id, stored) in store.iter() {
            let element = match stale.shift_remove(id) {
                Some(mapped) => mapped.element,
                None => match provider.create(id) {
                    Ok(element) => element,
                    Err(err) => {
                        warn!(applet = %id, error = %err, "Dropping stored applet");
                        pruned.push(id.clone());
                        continue;
                    }
                },
            };

            let size = stored.size.unwrap_or_else(|| element.natural_size());
            let rect = Rectangle::new(stored.position, size).clamp_loc_to(self.bounds);
            element.set_geometry(rect);
            element.set_visible(true);
            self.mapped.insert(
                id.clone(),
                MappedApplet {
                    element,
                    rect,
                    explicit_size: stored.size.is_some(),
                },
            );
        }

        for (id, mapped) in stale {
            debug!(applet = %id, "Destroying applet absent from the loaded layout");
            provider.destroy(mapped.element);
        }

        self.store = store;
        for id in &pruned {
            self.store.remove(id);
        }
        self.config_dirty = !pruned.is_empty();
        Ok(())
    }

    /// Serialize the current arrangement to the key-file on disk
    ///
    /// Dead applets are pruned first. On success the in-memory store is
    /// replaced by what was written and the dirty flag is cleared; on
    /// failure both the arrangement and the previous file are left intact.
    pub fn save_layout(&mut self) -> Result<(), StoreError> {
        self.refresh();

        let mut store = PlacementStore::new();
        for (id, mapped) in &self.mapped {
            store.set(
                id.clone(),
                StoredGeometry {
                    position: mapped.rect.loc,
                    size: mapped.explicit_size.then_some(mapped.rect.size),
                },
            );
        }

        store.save(&self.store_path)?;
        self.mark_layout_saved(store);
        Ok(())
    }

    pub(crate) fn has_explicit_size(&self, id: &AppletId) -> bool {
        self.mapped
            .get(id)
            .map(|mapped| mapped.explicit_size)
            .unwrap_or(false)
    }

    pub(crate) fn set_explicit_size(&mut self, id: &AppletId, explicit: bool) {
        if let Some(mapped) = self.mapped.get_mut(id) {
            mapped.explicit_size = explicit;
        }
    }

    pub(crate) fn mark_layout_saved(&mut self, store: PlacementStore) {
        self.store = store;
        self.config_dirty = false;
    }

    fn initial_rect(&self, element: &E) -> Rectangle<i32, Area> {
        let rect = match self.store.get(&element.id()) {
            Some(stored) => Rectangle::new(
                stored.position,
                stored.size.unwrap_or_else(|| element.natural_size()),
            ),
            None => Rectangle::from_size(element.natural_size()),
        };
        rect.clamp_loc_to(self.bounds)
    }

    fn place(&mut self, element: E, rect: Rectangle<i32, Area>, explicit_size: bool) {
        let id = element.id();
        debug!(area = self.id, applet = %id, ?rect, "Mapping applet");
        element.set_geometry(rect);
        self.mapped.insert(
            id,
            MappedApplet {
                element,
                rect,
                explicit_size,
            },
        );
        self.config_dirty = true;
    }

    #[profiling::function]
    fn flush_pending(&mut self, mut queue: Vec<E>) {
        if queue.is_empty() {
            return;
        }
        debug!(area = self.id, queued = queue.len(), "Placing batched applets");

        // Everything with a known rectangle is an obstacle before any
        // auto-placement happens, so placements cannot collide with it.
        let obstacles = self
            .mapped
            .values()
            .map(|mapped| mapped.rect)
            .chain(
                queue
                    .iter()
                    .filter(|element| self.store.contains(&element.id()))
                    .map(|element| self.initial_rect(element)),
            )
            .map(padded)
            .collect::<Vec<_>>();
        let mut region = Rectangle::subtract_rects_many_in_place(
            vec![Rectangle::from_size(self.bounds)],
            obstacles,
        );

        // Stable sort: equal areas keep their insertion order, which makes
        // the resulting layout deterministic.
        queue.sort_by_key(|element| {
            let natural = element.natural_size();
            std::cmp::Reverse(i64::from(natural.w) * i64::from(natural.h))
        });

        for element in queue {
            if self.store.contains(&element.id()) {
                let explicit = self.has_stored_size(&element.id());
                let rect = self.initial_rect(&element);
                self.place(element, rect, explicit);
                continue;
            }

            let natural = element.natural_size();
            let loc = match first_fit(&region, natural) {
                Some(loc) => loc,
                None => {
                    trace!(applet = %element.id(), "No free slot left, starting a new layer");
                    region = vec![Rectangle::from_size(self.bounds)];
                    first_fit(&region, natural).unwrap_or_else(|| (0, 0).into())
                }
            };

            let rect = Rectangle::new(loc, natural);
            region = Rectangle::subtract_rects_many_in_place(region, [padded(rect)]);
            self.place(element, rect, false);
        }
    }

    fn has_stored_size(&self, id: &AppletId) -> bool {
        self.store
            .get(id)
            .map(|stored| stored.size.is_some())
            .unwrap_or(false)
    }
}

fn padded(rect: Rectangle<i32, Area>) -> Rectangle<i32, Area> {
    Rectangle::new(
        (
            rect.loc.x - PLACEMENT_PADDING,
            rect.loc.y - PLACEMENT_PADDING,
        )
            .into(),
        (
            rect.size.w + 2 * PLACEMENT_PADDING,
            rect.size.h + 2 * PLACEMENT_PADDING,
        )
            .into(),
    )
}

fn first_fit(region: &[Rectangle<i32, Area>], size: Size<i32, Area>) -> Option<Point<i32, Area>> {
    region
        .iter()
        .find(|free| free.size.w >= size.w && free.size.h >= size.h)
        .map(|free| free.loc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::applet::{TestApplet, TestProvider};
    use crate::store::{PlacementStore, StoredGeometry};

    use tempfile::TempDir;

    fn scratch() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn area(bounds: (i32, i32), dir: &TempDir) -> HomeArea<TestApplet> {
        HomeArea::new(bounds.into(), dir.path().join("layout.conf"))
    }

    fn seed_store(dir: &TempDir, entries: &[(&str, (i32, i32), Option<(i32, i32)>)]) {
        let mut store = PlacementStore::new();
        for &(id, position, size) in entries {
            store.set(
                AppletId::new(id),
                StoredGeometry {
                    position: position.into(),
                    size: size.map(Into::into),
                },
            );
        }
        store.save(&dir.path().join("layout.conf")).unwrap();
    }

    #[test]
    fn mapping_unknown_applet_lands_at_origin() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        let applet = TestApplet::new("clock", (60, 40));
        area.map_applet(applet.clone());

        assert_eq!(
            applet.geometry(),
            Some(Rectangle::new((0, 0).into(), (60, 40).into()))
        );
        assert!(area.contains(&AppletId::new("clock")));
    }

    #[test]
    fn remapping_follows_the_retained_store() {
        let dir = scratch();
        seed_store(&dir, &[("clock", (40, 30), Some((80, 60)))]);

        let mut provider = TestProvider::default().with_applet("clock", (60, 40));
        let mut area = area((300, 200), &dir);
        area.load_layout(&mut provider).unwrap();

        let id = AppletId::new("clock");
        assert_eq!(
            area.applet_geometry(&id),
            Some(Rectangle::new((40, 30).into(), (80, 60).into()))
        );

        // A remap after an unmap goes back to the stored rectangle.
        let element = area.unmap_applet(&id).unwrap();
        assert!(!area.contains(&id));
        area.map_applet(element);
        assert_eq!(
            area.applet_geometry(&id),
            Some(Rectangle::new((40, 30).into(), (80, 60).into()))
        );
    }

    #[test]
    fn batch_add_places_by_descending_area() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        area.set_batch_add(true);
        let small = TestApplet::new("small", (60, 40));
        let big = TestApplet::new("big", (100, 50));
        let tiny = TestApplet::new("tiny", (20, 20));
        area.map_applet(small.clone());
        area.map_applet(big.clone());
        area.map_applet(tiny.clone());
        assert!(small.geometry().is_none(), "queued applets are not placed");

        area.set_batch_add(false);

        assert_eq!(
            big.geometry(),
            Some(Rectangle::new((0, 0).into(), (100, 50).into()))
        );
        assert_eq!(
            small.geometry(),
            Some(Rectangle::new((110, 0).into(), (60, 40).into()))
        );
        assert_eq!(
            tiny.geometry(),
            Some(Rectangle::new((0, 60).into(), (20, 20).into()))
        );

        assert!(!area.any_overlap());
        let bounds = Rectangle::from_size(area.bounds());
        for (_, rect, _) in area.placements() {
            assert!(bounds.contains_rect(rect));
        }
    }

    #[test]
    fn batch_add_starts_a_new_layer_when_full() {
        let dir = scratch();
        let mut area = area((100, 100), &dir);

        area.set_batch_add(true);
        let first = TestApplet::new("first", (90, 90));
        let second = TestApplet::new("second", (90, 90));
        area.map_applet(first.clone());
        area.map_applet(second.clone());
        area.set_batch_add(false);

        assert_eq!(first.geometry().unwrap().loc, (0, 0).into());
        assert_eq!(second.geometry().unwrap().loc, (0, 0).into());
    }

    #[test]
    fn stored_placement_wins_during_batch() {
        let dir = scratch();
        seed_store(&dir, &[("notes", (150, 100), Some((50, 50)))]);

        let mut provider = TestProvider::default().with_applet("notes", (50, 50));
        let mut area = area((300, 200), &dir);
        area.load_layout(&mut provider).unwrap();
        let notes = area.unmap_applet(&AppletId::new("notes")).unwrap();

        area.set_batch_add(true);
        let weather = TestApplet::new("weather", (90, 90));
        area.map_applet(weather.clone());
        area.map_applet(notes.clone());
        area.set_batch_add(false);

        assert_eq!(
            notes.geometry(),
            Some(Rectangle::new((150, 100).into(), (50, 50).into()))
        );
        // The auto-placed applet avoids the stored one even though it was
        // queued first and is larger.
        assert_eq!(
            weather.geometry(),
            Some(Rectangle::new((0, 0).into(), (90, 90).into()))
        );
        assert!(!area.any_overlap());
    }

    #[test]
    fn raising_changes_hit_test_order() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        let below = TestApplet::new("below", (100, 100));
        let above = TestApplet::new("above", (100, 100));
        area.map_applet(below.clone());
        area.map_applet(above.clone());

        let under = area.applet_under((50.0, 50.0).into()).unwrap();
        assert_eq!(under.id(), AppletId::new("above"));

        assert!(area.raise_applet(&AppletId::new("below")));
        let under = area.applet_under((50.0, 50.0).into()).unwrap();
        assert_eq!(under.id(), AppletId::new("below"));

        let order: Vec<_> = area.applets().map(|applet| applet.id()).collect();
        assert_eq!(order, vec![AppletId::new("above"), AppletId::new("below")]);
    }

    #[test]
    fn refresh_prunes_dead_applets() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        let applet = TestApplet::new("clock", (60, 40));
        area.map_applet(applet.clone());
        area.save_layout().unwrap();
        assert!(!area.is_config_dirty());

        applet.kill();
        area.refresh();

        assert!(area.is_empty());
        assert!(area.is_config_dirty());
    }

    #[test]
    fn moving_clamps_into_bounds() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        let applet = TestApplet::new("clock", (60, 40));
        area.map_applet(applet.clone());
        let id = AppletId::new("clock");

        assert!(area.move_applet(&id, (1000, 1000).into()));
        assert_eq!(area.applet_geometry(&id).unwrap().loc, (240, 160).into());

        assert!(area.move_applet(&id, (-50, -50).into()));
        assert_eq!(area.applet_geometry(&id).unwrap().loc, (0, 0).into());

        assert!(!area.move_applet(&AppletId::new("missing"), (0, 0).into()));
    }

    #[test]
    fn shrinking_bounds_pulls_applets_inside() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        let applet = TestApplet::new("clock", (60, 40));
        area.map_applet(applet.clone());
        area.move_applet(&AppletId::new("clock"), (240, 160).into());

        area.set_bounds((100, 100).into());
        assert_eq!(
            area.applet_geometry(&AppletId::new("clock")).unwrap().loc,
            (40, 60).into()
        );
    }

    #[test]
    fn any_overlap_ignores_touching_edges() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        let left = TestApplet::new("left", (50, 50));
        let right = TestApplet::new("right", (50, 50));
        area.map_applet(left);
        area.map_applet(right);
        area.move_applet(&AppletId::new("right"), (50, 0).into());
        assert!(!area.any_overlap());

        area.move_applet(&AppletId::new("right"), (49, 0).into());
        assert!(area.any_overlap());
    }

    #[test]
    fn load_layout_destroys_stale_applets() {
        let dir = scratch();
        seed_store(&dir, &[("kept", (10, 10), None)]);

        let mut provider = TestProvider::default().with_applet("kept", (60, 40));
        let mut area = area((300, 200), &dir);
        area.map_applet(TestApplet::new("stale", (50, 50)));

        area.load_layout(&mut provider).unwrap();

        assert!(area.contains(&AppletId::new("kept")));
        assert!(!area.contains(&AppletId::new("stale")));
        assert_eq!(provider.destroyed, vec![AppletId::new("stale")]);
        // Natural size applies when the store carries none.
        assert_eq!(
            area.applet_geometry(&AppletId::new("kept")),
            Some(Rectangle::new((10, 10).into(), (60, 40).into()))
        );
    }

    #[test]
    fn load_layout_prunes_uncreatable_entries() {
        let dir = scratch();
        seed_store(
            &dir,
            &[("kept", (10, 10), None), ("ghost", (80, 80), None)],
        );

        let mut provider = TestProvider::default().with_applet("kept", (60, 40));
        let mut area = area((300, 200), &dir);
        area.load_layout(&mut provider).unwrap();

        assert!(area.contains(&AppletId::new("kept")));
        assert!(!area.contains(&AppletId::new("ghost")));
        assert!(area.is_config_dirty());

        area.save_layout().unwrap();
        let store = PlacementStore::load(&dir.path().join("layout.conf")).unwrap();
        assert!(!store.contains(&AppletId::new("ghost")));
    }

    #[test]
    fn load_layout_missing_file_is_empty() {
        let dir = scratch();
        let mut provider = TestProvider::default();
        let mut area = area((300, 200), &dir);

        area.load_layout(&mut provider).unwrap();
        assert!(area.is_empty());
        assert!(!area.is_config_dirty());
    }

    #[test]
    fn save_layout_records_explicit_sizes() {
        let dir = scratch();
        let mut area = area((300, 200), &dir);

        area.map_applet(TestApplet::new("sized", (60, 40)));
        area.map_applet(TestApplet::new("natural", (30, 30)));
        area.resize_applet(
            &AppletId::new("sized"),
            Rectangle::new((10, 10).into(), (120, 80).into()),
        );

        area.save_layout().unwrap();
        assert!(!area.is_config_dirty());

        let store = PlacementStore::load(&dir.path().join("layout.conf")).unwrap();
        let sized = store.get(&AppletId::new("sized")).unwrap();
        assert_eq!(sized.position, (10, 10).into());
        assert_eq!(sized.size, Some((120, 80).into()));

        let natural = store.get(&AppletId::new("natural")).unwrap();
        assert_eq!(natural.size, None);
    }

    #[test]
    fn load_layout_restacks_in_file_order() {
        let dir = scratch();
        seed_store(
            &dir,
            &[("back", (0, 0), None), ("front", (0, 0), None)],
        );

        let mut provider = TestProvider::default()
            .with_applet("back", (50, 50))
            .with_applet("front", (50, 50));
        let mut area = area((300, 200), &dir);
        area.load_layout(&mut provider).unwrap();

        let order: Vec<_> = area.applets().map(|applet| applet.id()).collect();
        assert_eq!(order, vec![AppletId::new("back"), AppletId::new("front")]);
        assert_eq!(order, provider.created);
        assert_eq!(
            area.applet_under((10.0, 10.0).into()).unwrap().id(),
            AppletId::new("front")
        );
    }
}
