use crate::bounds::{LatLng, LatLngBounds};
use crate::error::{GeoError, Result};
use crate::icons::TypeIcons;
use crate::info::InfoWindowLoader;
use crate::map::{
    INFO_WINDOW_PROGRESS, MARKER_PROGRESS, MapEvent, MapOverlay, MapWidget, MarkerId,
    MarkerOptions, OverlayCounter,
};
use crate::options::{ClickTarget, GeoOptions, TitleMode};
use crate::query::geo_bounded_query;
use geolinks_fetch::{FetchError, LinkedDataClient, RdfXmlDocument, ResourceDescription};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;

/// Result of a viewport change.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The viewport lies inside the region loaded before; nothing was fetched.
    Skipped,
    Loaded { placed: usize },
    /// The fetch or parse failed; it was logged and abandoned.
    Failed(FetchError),
}

/// Result of a marker click.
#[derive(Debug)]
pub enum InfoWindowOutcome {
    Opened,
    /// The marker has no click binding.
    Unbound,
    Failed(FetchError),
}

#[derive(Debug)]
pub enum EventOutcome {
    Load(LoadOutcome),
    InfoWindow(InfoWindowOutcome),
}

#[derive(Debug)]
struct GeoState {
    loaded_resources: HashSet<String>,
    loaded_bounds: Option<LatLngBounds>,
    type_icons: TypeIcons,
    marker_bounds: Option<LatLngBounds>,
    fitted: bool,
    click_targets: HashMap<MarkerId, Url>,
}

/// Binds a map widget to a SPARQL endpoint: loads markers for the visible
/// viewport and info-windows for clicked markers.
///
/// All state lives for as long as the instance and only grows. Loads may
/// overlap; the loaded region is only recorded by the most recently issued
/// fetch, while markers from every successful fetch are placed.
pub struct Geo<M: MapWidget> {
    map: Arc<M>,
    client: LinkedDataClient,
    options: GeoOptions,
    info_windows: InfoWindowLoader,
    state: Mutex<GeoState>,
    generation: AtomicU64,
    marker_overlay: OverlayCounter,
    info_overlay: OverlayCounter,
}

impl<M: MapWidget> Geo<M> {
    pub fn new(map: Arc<M>, options: GeoOptions) -> Result<Self> {
        let client = LinkedDataClient::with_timeout(options.timeout())?;
        Self::with_client(map, options, client)
    }

    pub fn with_client(map: Arc<M>, options: GeoOptions, client: LinkedDataClient) -> Result<Self> {
        options.validate()?;

        let info_windows = InfoWindowLoader::new(client.clone(), options.info_window.clone());
        let state = GeoState {
            loaded_resources: HashSet::new(),
            loaded_bounds: None,
            type_icons: TypeIcons::new(options.icons.clone()),
            marker_bounds: None,
            fitted: false,
            click_targets: HashMap::new(),
        };

        Ok(Self {
            map,
            client,
            options,
            info_windows,
            state: Mutex::new(state),
            generation: AtomicU64::new(0),
            marker_overlay: OverlayCounter::new(),
            info_overlay: OverlayCounter::new(),
        })
    }

    pub fn map(&self) -> &Arc<M> {
        &self.map
    }

    pub fn options(&self) -> &GeoOptions {
        &self.options
    }

    pub fn info_windows(&self) -> &InfoWindowLoader {
        &self.info_windows
    }

    /// SPARQL DESCRIBE query for the resources inside `bounds`.
    pub fn build_query(&self, bounds: &LatLngBounds) -> String {
        geo_bounded_query(
            &self.options.select,
            &self.options.focus_var,
            self.options.graph_var.as_deref(),
            bounds,
        )
        .to_string()
    }

    pub fn query_url(&self, bounds: &LatLngBounds) -> Url {
        let mut url = self.options.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("query", &self.build_query(bounds));
        url
    }

    pub async fn handle_event(&self, event: MapEvent) -> Result<EventOutcome> {
        match event {
            MapEvent::BoundsChanged => Ok(EventOutcome::Load(self.load_markers().await?)),
            MapEvent::MarkerClicked(marker) => {
                Ok(EventOutcome::InfoWindow(self.marker_clicked(marker).await))
            }
        }
    }

    /// Load markers for the map's current viewport unless it is already
    /// covered by the last loaded region.
    ///
    /// Only a map without bounds is an error; network and parse failures are
    /// logged and reported as [`LoadOutcome::Failed`].
    pub async fn load_markers(&self) -> Result<LoadOutcome> {
        let bounds = self.map.bounds().ok_or(GeoError::MissingBounds)?;

        {
            let state = self.state.lock().await;
            if let Some(loaded) = state.loaded_bounds
                && loaded.contains_bounds(&bounds)
            {
                debug!("Bounds {} already loaded within {}", bounds, loaded);
                return Ok(LoadOutcome::Skipped);
            }
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let overlay = MapOverlay::show(self.map.as_ref(), MARKER_PROGRESS, &self.marker_overlay);

        let url = self.query_url(&bounds);
        info!("Loading markers for {}", bounds);

        let document = match self.client.get_rdf_xml(&url).await {
            Ok(document) => document,
            Err(e) => {
                warn!("HTTP request failed: {}", e);
                return Ok(LoadOutcome::Failed(e));
            }
        };

        let placed = self.add_markers(&document).await;

        let mut state = self.state.lock().await;
        if self.generation.load(Ordering::SeqCst) == generation {
            state.loaded_bounds = Some(bounds);
        } else {
            debug!("Newer load issued since {}, not recording its bounds", bounds);
        }

        if self.options.fit_bounds && !state.fitted {
            state.fitted = true;
            if let Some(marker_bounds) = state.marker_bounds {
                debug!("Fitting viewport to {}", marker_bounds);
                self.map.fit_bounds(marker_bounds);
            }
        }
        drop(state);
        drop(overlay);

        info!("Placed {} new markers for {}", placed, bounds);
        Ok(LoadOutcome::Loaded { placed })
    }

    /// Place a marker for every new geotagged resource in `document`.
    /// Returns the number of markers placed.
    pub async fn add_markers(&self, document: &RdfXmlDocument) -> usize {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let base = Url::parse(&document.document_uri).ok();
        let mut placed = 0;

        for description in &document.descriptions {
            let Some(key) = description.key(&document.document_uri) else {
                continue;
            };
            if state.loaded_resources.contains(&key) {
                continue;
            }
            let Some((lat, lng)) = description.coordinates() else {
                continue;
            };
            if self.options.title_mode == TitleMode::Required && description.title.is_none() {
                debug!("Skipping {}: no title", key);
                continue;
            }

            state.loaded_resources.insert(key.clone());

            // untyped resources keep the widget's default icon
            let icon = description
                .rdf_type
                .as_deref()
                .and_then(|rdf_type| state.type_icons.icon_for(rdf_type))
                .map(str::to_string);

            let position = LatLng::new(lat, lng);
            let marker = self.map.add_marker(MarkerOptions {
                position,
                title: description.title.clone(),
                icon,
                resource: key,
            });
            placed += 1;

            if self.options.fit_bounds && !state.fitted {
                match state.marker_bounds.as_mut() {
                    Some(marker_bounds) => marker_bounds.extend(position),
                    None => state.marker_bounds = Some(LatLngBounds::from_point(position)),
                }
            }

            if let Some(target) = self.click_target_of(description, base.as_ref()) {
                state.click_targets.insert(marker, target);
            }
        }

        placed
    }

    fn click_target_of(&self, description: &ResourceDescription, base: Option<&Url>) -> Option<Url> {
        let target = match self.options.click_target {
            ClickTarget::PrimaryTopicOf => description.primary_topic_of.as_deref()?,
            ClickTarget::Resource => description.about.as_deref()?,
        };

        match Url::options().base_url(base).parse(target) {
            Ok(url) => Some(url),
            Err(e) => {
                debug!("Not binding click to '{}': {}", target, e);
                None
            }
        }
    }

    /// Open the info-window bound to `marker`, if any.
    pub async fn marker_clicked(&self, marker: MarkerId) -> InfoWindowOutcome {
        let target = self.state.lock().await.click_targets.get(&marker).cloned();
        match target {
            Some(target) => self.load_info_window(marker, &target).await,
            None => {
                debug!("Marker {:?} has no click binding", marker);
                InfoWindowOutcome::Unbound
            }
        }
    }

    /// Fetch the info-window fragment for `target` and open it on `marker`.
    pub async fn load_info_window(&self, marker: MarkerId, target: &Url) -> InfoWindowOutcome {
        let overlay = MapOverlay::show(self.map.as_ref(), INFO_WINDOW_PROGRESS, &self.info_overlay);

        match self.info_windows.fetch_content(target).await {
            Ok(content) => {
                drop(overlay);
                self.map.open_info_window(marker, content);
                InfoWindowOutcome::Opened
            }
            Err(e) => {
                warn!("HTTP request failed: {}", e);
                InfoWindowOutcome::Failed(e)
            }
        }
    }

    pub async fn loaded_bounds(&self) -> Option<LatLngBounds> {
        self.state.lock().await.loaded_bounds
    }

    pub async fn is_loaded(&self, key: &str) -> bool {
        self.state.lock().await.loaded_resources.contains(key)
    }

    pub async fn loaded_count(&self) -> usize {
        self.state.lock().await.loaded_resources.len()
    }

    /// Icon assigned to `rdf_type` so far.
    pub async fn type_icon(&self, rdf_type: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .type_icons
            .get(rdf_type)
            .map(str::to_string)
    }

    pub async fn click_target(&self, marker: MarkerId) -> Option<Url> {
        self.state.lock().await.click_targets.get(&marker).cloned()
    }
}
