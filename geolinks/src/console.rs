use colored::Colorize;
use geolinks_core::{LatLngBounds, MapWidget, MarkerId, MarkerOptions};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

/// A marker as placed on the console map.
#[derive(Debug, Clone, Serialize)]
pub struct PlacedMarker {
    pub id: MarkerId,
    pub resource: String,
    pub lat: f64,
    pub lng: f64,
    pub title: Option<String>,
    pub icon: Option<String>,
    pub info_window: Option<String>,
}

/// Headless map widget for the terminal: the viewport is fixed by the
/// caller, markers are collected, and progress overlays become spinners.
pub struct ConsoleMap {
    bounds: Mutex<Option<LatLngBounds>>,
    markers: Mutex<Vec<PlacedMarker>>,
    spinners: Mutex<HashMap<String, ProgressBar>>,
    show_progress: bool,
}

impl ConsoleMap {
    pub fn new(bounds: LatLngBounds, show_progress: bool) -> Self {
        Self {
            bounds: Mutex::new(Some(bounds)),
            markers: Mutex::new(Vec::new()),
            spinners: Mutex::new(HashMap::new()),
            show_progress,
        }
    }

    pub fn markers(&self) -> Vec<PlacedMarker> {
        lock(&self.markers).clone()
    }

    pub fn print_placed(markers: &[PlacedMarker]) {
        for marker in markers {
            let title = marker.title.as_deref().unwrap_or("(untitled)");
            println!(
                "  {} {} {}",
                format!("[{:>9.5}, {:>10.5}]", marker.lat, marker.lng).cyan(),
                title.bold(),
                marker.resource.bright_black()
            );
            if let Some(icon) = &marker.icon {
                println!("      icon: {}", icon.bright_black());
            }
            if let Some(content) = &marker.info_window {
                println!("      {}", content.green());
            }
        }
    }
}

/// Lock `mutex`, taking over the guard if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MapWidget for ConsoleMap {
    fn bounds(&self) -> Option<LatLngBounds> {
        *lock(&self.bounds)
    }

    fn add_marker(&self, options: MarkerOptions) -> MarkerId {
        let mut markers = lock(&self.markers);
        let id = MarkerId(markers.len() as u64);
        debug!("Marker {:?} for {} at {}", id, options.resource, options.position);
        markers.push(PlacedMarker {
            id,
            resource: options.resource,
            lat: options.position.lat,
            lng: options.position.lng,
            title: options.title,
            icon: options.icon,
            info_window: None,
        });
        id
    }

    fn fit_bounds(&self, bounds: LatLngBounds) {
        info!("Viewport fitted to {}", bounds);
        *lock(&self.bounds) = Some(bounds);
    }

    fn open_info_window(&self, marker: MarkerId, content: String) {
        if let Some(placed) = lock(&self.markers)
            .iter_mut()
            .find(|placed| placed.id == marker)
        {
            placed.info_window = Some(content);
        }
    }

    fn set_overlay_visible(&self, overlay: &str, visible: bool) {
        if !self.show_progress {
            return;
        }
        let mut spinners = lock(&self.spinners);

        if visible {
            let spinner = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
                spinner.set_style(style);
            }
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!("{}...", overlay));
            spinners.insert(overlay.to_string(), spinner);
        } else if let Some(spinner) = spinners.remove(overlay) {
            spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geolinks_core::LatLng;

    fn marker(resource: &str) -> MarkerOptions {
        MarkerOptions {
            position: LatLng::new(1.0, 2.0),
            title: Some(resource.to_uppercase()),
            icon: None,
            resource: resource.to_string(),
        }
    }

    #[test]
    fn test_markers_are_collected_in_order() {
        let map = ConsoleMap::new(LatLngBounds::from_edges(0.0, 0.0, 1.0, 1.0), false);
        let a = map.add_marker(marker("urn:a"));
        let b = map.add_marker(marker("urn:b"));

        assert_ne!(a, b);
        let markers = map.markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[1].resource, "urn:b");
        assert_eq!(markers[1].title.as_deref(), Some("URN:B"));
    }

    #[test]
    fn test_info_window_attaches_to_marker() {
        let map = ConsoleMap::new(LatLngBounds::from_edges(0.0, 0.0, 1.0, 1.0), false);
        let a = map.add_marker(marker("urn:a"));
        map.open_info_window(a, "<p>hello</p>".to_string());

        assert_eq!(map.markers()[0].info_window.as_deref(), Some("<p>hello</p>"));
    }

    #[test]
    fn test_poisoned_lock_still_records_markers() {
        let map = std::sync::Arc::new(ConsoleMap::new(
            LatLngBounds::from_edges(0.0, 0.0, 1.0, 1.0),
            false,
        ));
        let holder = map.clone();
        let _ = std::thread::spawn(move || {
            let _guard = holder.markers.lock().unwrap();
            panic!("loader task panicked");
        })
        .join();
        assert!(map.markers.is_poisoned());

        let id = map.add_marker(marker("urn:a"));
        assert_eq!(id, MarkerId(0));
        map.open_info_window(id, "<p>still here</p>".to_string());

        let markers = map.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].info_window.as_deref(), Some("<p>still here</p>"));
    }

    #[test]
    fn test_fit_bounds_moves_viewport() {
        let map = ConsoleMap::new(LatLngBounds::from_edges(0.0, 0.0, 1.0, 1.0), false);
        let fitted = LatLngBounds::from_edges(-1.0, -1.0, 2.0, 2.0);
        map.fit_bounds(fitted);
        assert_eq!(map.bounds(), Some(fitted));
    }
}
