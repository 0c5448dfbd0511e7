pub mod commands;
pub mod console;
pub mod handlers;

pub use console::{ConsoleMap, PlacedMarker};
pub use handlers::{load_select, options_from_args, parse_bbox, run_load};
