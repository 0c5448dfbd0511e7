use crate::console::{ConsoleMap, PlacedMarker};
use anyhow::{Context, anyhow, bail};
use clap::ArgMatches;
use colored::Colorize;
use geolinks_core::{
    ClickTarget, Geo, GeoOptions, InfoWindowAddressing, InfoWindowLoader, InfoWindowOptions,
    InfoWindowOutcome, LatLngBounds, LoadOutcome, TitleMode,
};
use geolinks_fetch::{LinkedDataClient, XHTML_ACCEPT};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Parse a `west,south,east,north` bounding box.
pub fn parse_bbox(text: &str) -> Result<LatLngBounds, String> {
    let values: Vec<f64> = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("Invalid coordinate '{}': {}", part.trim(), e))
        })
        .collect::<Result<_, _>>()?;

    let [west, south, east, north] = values[..] else {
        return Err(format!(
            "Expected west,south,east,north but got {} values",
            values.len()
        ));
    };

    if !(-90.0..=90.0).contains(&south) || !(-90.0..=90.0).contains(&north) {
        return Err("Latitudes must be within -90..90".to_string());
    }
    if south > north {
        return Err("South edge lies north of the north edge".to_string());
    }
    if !(-180.0..=180.0).contains(&west) || !(-180.0..=180.0).contains(&east) {
        return Err("Longitudes must be within -180..180".to_string());
    }

    Ok(LatLngBounds::from_edges(west, south, east, north))
}

/// Load the base SELECT query from either an inline argument or a file
pub fn load_select(
    select: Option<&String>,
    select_file: Option<&PathBuf>,
) -> Result<String, String> {
    if let Some(path) = select_file {
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read query file {}: {}", path.display(), e))?;
        if content.trim().is_empty() {
            return Err(format!("Query file {} is empty", path.display()));
        }
        Ok(content)
    } else if let Some(select) = select {
        Ok(select.clone())
    } else {
        Err("Either --select or --select-file must be provided".to_string())
    }
}

/// Build map options from a `load` invocation: the config file (if any)
/// first, then individual flags on top.
pub fn options_from_args(args: &ArgMatches) -> anyhow::Result<GeoOptions> {
    let select = args.get_one::<String>("select");
    let select_file = args.get_one::<PathBuf>("select-file");

    let mut options = match args.get_one::<PathBuf>("config") {
        Some(path) => GeoOptions::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => {
            let endpoint = args
                .get_one::<Url>("endpoint")
                .cloned()
                .ok_or_else(|| anyhow!("Either --config or --endpoint must be provided"))?;
            let select = load_select(select, select_file).map_err(|e| anyhow!(e))?;
            GeoOptions::new(endpoint, select)
        }
    };

    if let Some(endpoint) = args.get_one::<Url>("endpoint") {
        options.endpoint = endpoint.clone();
    }
    if select.is_some() || select_file.is_some() {
        options.select = load_select(select, select_file).map_err(|e| anyhow!(e))?;
    }
    if let Some(name) = args.get_one::<String>("focus-var") {
        options = options.with_focus_var(name.as_str());
    }
    if let Some(name) = args.get_one::<String>("graph-var") {
        options = options.with_graph_var(name.as_str());
    }
    if args.get_flag("optional-titles") {
        options = options.with_title_mode(TitleMode::Optional);
    }
    if args.get_flag("click-resource") {
        options = options.with_click_target(ClickTarget::Resource);
    }
    if let Some(viewer) = args.get_one::<Url>("viewer") {
        options = options.with_info_window_addressing(InfoWindowAddressing::Viewer {
            base: viewer.clone(),
        });
    }
    if let Some(timeout) = args.get_one::<u64>("timeout") {
        options = options.with_timeout_secs(*timeout);
    }

    options.validate()?;
    Ok(options)
}

/// Run a single viewport load against a console map and return what was
/// placed, optionally with each marker's info-window content.
pub async fn run_load(
    options: GeoOptions,
    bounds: LatLngBounds,
    with_info_windows: bool,
    show_progress: bool,
) -> anyhow::Result<Vec<PlacedMarker>> {
    let map = Arc::new(ConsoleMap::new(bounds, show_progress));
    let geo = Geo::new(map.clone(), options)?;

    match geo.load_markers().await? {
        LoadOutcome::Loaded { placed } => info!("{} markers placed", placed),
        LoadOutcome::Skipped => info!("Viewport already loaded"),
        LoadOutcome::Failed(e) => bail!("Could not load markers: {}", e),
    }

    if with_info_windows {
        for marker in map.markers() {
            if let InfoWindowOutcome::Failed(e) = geo.marker_clicked(marker.id).await {
                info!("No info-window for {}: {}", marker.resource, e);
            }
        }
    }

    Ok(map.markers())
}

pub async fn handle_load(args: &ArgMatches) -> anyhow::Result<()> {
    let quiet = args.get_flag("quiet");
    let json = args.get_flag("json");

    let bbox = args
        .get_one::<String>("bbox")
        .ok_or_else(|| anyhow!("--bbox is required"))?;
    let bounds = parse_bbox(bbox).map_err(|e| anyhow!(e))?;
    let options = options_from_args(args)?;

    if !quiet && !json {
        println!("{} {}", "Endpoint:".bright_blue().bold(), options.endpoint);
        println!("{} {}", "Viewport:".bright_blue().bold(), bounds);
    }

    let markers = run_load(options, bounds, args.get_flag("info"), !quiet && !json).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&markers)?);
    } else {
        ConsoleMap::print_placed(&markers);
        if !quiet {
            println!("{} {}", "Markers placed:".bright_blue().bold(), markers.len());
        }
    }

    Ok(())
}

pub async fn handle_info(args: &ArgMatches) -> anyhow::Result<()> {
    let target = args
        .get_one::<Url>("URI")
        .ok_or_else(|| anyhow!("A resource URI is required"))?;

    let mut options = InfoWindowOptions::default();
    if let Some(viewer) = args.get_one::<Url>("viewer") {
        options.addressing = InfoWindowAddressing::Viewer {
            base: viewer.clone(),
        };
    }
    if let Some(mode) = args.get_one::<String>("mode") {
        options.mode = mode.clone();
    }
    if args.get_flag("xhtml") {
        options.accept = XHTML_ACCEPT.to_string();
    }

    let loader = InfoWindowLoader::new(LinkedDataClient::new()?, options);
    if !args.get_flag("quiet") {
        println!("{} {}", "GET".bright_blue().bold(), loader.info_url(target));
    }

    let content = loader.fetch_content(target).await?;
    println!("{}", content);
    Ok(())
}
