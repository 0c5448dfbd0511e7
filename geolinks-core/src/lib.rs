//! Viewport-driven loading of geotagged linked data onto a map.
//!
//! [`Geo`] ties a [`MapWidget`] to a SPARQL endpoint. When the viewport
//! changes it fetches a bounding-box-filtered DESCRIBE of the configured
//! resources as RDF/XML, places one marker per new resource, and on marker
//! click loads an HTML fragment into an info-window.

pub mod bounds;
pub mod error;
pub mod geo;
pub mod icons;
pub mod info;
pub mod map;
pub mod options;
pub mod query;

pub use bounds::{LatLng, LatLngBounds};
pub use error::GeoError;
pub use geo::{EventOutcome, Geo, InfoWindowOutcome, LoadOutcome};
pub use icons::{DEFAULT_ICONS, TypeIcons};
pub use info::InfoWindowLoader;
pub use map::{MapEvent, MapOverlay, MapWidget, MarkerId, MarkerOptions, OverlayCounter};
pub use options::{ClickTarget, GeoOptions, InfoWindowAddressing, InfoWindowOptions, TitleMode};
