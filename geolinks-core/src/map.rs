use crate::bounds::{LatLng, LatLngBounds};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Overlay shown while markers for a viewport are loading.
pub const MARKER_PROGRESS: &str = "marker-progress";
/// Overlay shown while an info-window fragment is loading.
pub const INFO_WINDOW_PROGRESS: &str = "infowindow-progress";

/// Handle of a marker created by a [`MapWidget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerOptions {
    pub position: LatLng,
    pub title: Option<String>,
    /// Icon URL; `None` leaves the widget's default icon in place.
    pub icon: Option<String>,
    /// Key of the resource the marker stands for
    pub resource: String,
}

/// The map the markers are placed on.
///
/// Implementations own rendering and projection; they are called from the
/// task driving [`crate::Geo`] and must not block.
pub trait MapWidget: Send + Sync {
    /// Currently visible rectangle, if the map has been laid out.
    fn bounds(&self) -> Option<LatLngBounds>;

    fn add_marker(&self, options: MarkerOptions) -> MarkerId;

    /// Change the viewport to exactly enclose `bounds`.
    fn fit_bounds(&self, bounds: LatLngBounds);

    /// Open an info-window anchored to `marker` showing an HTML fragment.
    fn open_info_window(&self, marker: MarkerId, content: String);

    fn set_overlay_visible(&self, overlay: &str, visible: bool);
}

/// Events a host forwards from its map to [`crate::Geo::handle_event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    BoundsChanged,
    MarkerClicked(MarkerId),
}

/// Number of tasks currently holding an overlay open.
#[derive(Debug, Default)]
pub struct OverlayCounter(Mutex<usize>);

impl OverlayCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        *self.lock()
    }

    fn lock(&self) -> MutexGuard<'_, usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Progress overlay that stays visible while any guard sharing its counter
/// lives. Shown when the first guard is created, hidden when the last drops.
pub struct MapOverlay<'a, M: MapWidget + ?Sized> {
    map: &'a M,
    id: &'static str,
    counter: &'a OverlayCounter,
}

impl<'a, M: MapWidget + ?Sized> MapOverlay<'a, M> {
    pub fn show(map: &'a M, id: &'static str, counter: &'a OverlayCounter) -> Self {
        let mut pending = counter.lock();
        *pending += 1;
        if *pending == 1 {
            map.set_overlay_visible(id, true);
        }
        drop(pending);
        Self { map, id, counter }
    }
}

impl<M: MapWidget + ?Sized> Drop for MapOverlay<'_, M> {
    fn drop(&mut self) {
        let mut pending = self.counter.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.map.set_overlay_visible(self.id, false);
        }
    }
}
