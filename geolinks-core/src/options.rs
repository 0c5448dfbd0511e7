use crate::error::{GeoError, Result};
use crate::icons::DEFAULT_ICONS;
use geolinks_fetch::HTML_ACCEPT;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const TEMPLATES_NS: &str = "https://w3id.org/atomgraph/linkeddatahub/templates#";

/// Whether a resource needs a title to get a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleMode {
    #[default]
    Required,
    Optional,
}

/// What a marker click opens an info-window for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    /// The document given by `foaf:isPrimaryTopicOf`; resources without one
    /// get no click binding.
    #[default]
    PrimaryTopicOf,
    /// The resource's own URI.
    Resource,
}

/// How the info-window URL is derived from the click target.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InfoWindowAddressing {
    /// `<target>?mode=<mode>`
    #[default]
    Direct,
    /// `<base>?uri=<target>&mode=<mode>`
    Viewer { base: Url },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoWindowOptions {
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub addressing: InfoWindowAddressing,
    #[serde(default = "default_accept")]
    pub accept: String,
}

impl Default for InfoWindowOptions {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            addressing: InfoWindowAddressing::default(),
            accept: default_accept(),
        }
    }
}

/// Configuration of a [`crate::Geo`] instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoOptions {
    /// SPARQL endpoint queried for RDF/XML
    pub endpoint: Url,
    /// Base SELECT query choosing which resources may appear on the map
    pub select: String,
    /// Variable of `select` bound to the mapped resources
    #[serde(default = "default_focus_var")]
    pub focus_var: String,
    /// Match coordinates in named graphs as well, binding this variable
    #[serde(default)]
    pub graph_var: Option<String>,
    #[serde(default = "default_icons")]
    pub icons: Vec<String>,
    #[serde(default)]
    pub title_mode: TitleMode,
    #[serde(default)]
    pub click_target: ClickTarget,
    /// Fit the viewport to the markers of the first successful load.
    /// Only that load counts: if it places no markers, no fit ever happens.
    #[serde(default)]
    pub fit_bounds: bool,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub info_window: InfoWindowOptions,
}

fn default_focus_var() -> String {
    "this".to_string()
}

fn default_icons() -> Vec<String> {
    DEFAULT_ICONS.iter().map(|icon| icon.to_string()).collect()
}

fn default_mode() -> String {
    format!("{}InfoWindowMode", TEMPLATES_NS)
}

fn default_accept() -> String {
    HTML_ACCEPT.to_string()
}

impl GeoOptions {
    pub fn new(endpoint: Url, select: impl Into<String>) -> Self {
        Self {
            endpoint,
            select: select.into(),
            focus_var: default_focus_var(),
            graph_var: None,
            icons: default_icons(),
            title_mode: TitleMode::default(),
            click_target: ClickTarget::default(),
            fit_bounds: false,
            timeout_secs: None,
            info_window: InfoWindowOptions::default(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_focus_var(mut self, name: impl Into<String>) -> Self {
        self.focus_var = name.into();
        self
    }

    pub fn with_graph_var(mut self, name: impl Into<String>) -> Self {
        self.graph_var = Some(name.into());
        self
    }

    pub fn with_icons(mut self, icons: Vec<String>) -> Self {
        self.icons = icons;
        self
    }

    pub fn with_title_mode(mut self, mode: TitleMode) -> Self {
        self.title_mode = mode;
        self
    }

    pub fn with_click_target(mut self, target: ClickTarget) -> Self {
        self.click_target = target;
        self
    }

    pub fn with_fit_bounds(mut self, fit_bounds: bool) -> Self {
        self.fit_bounds = fit_bounds;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_info_window_mode(mut self, mode: impl Into<String>) -> Self {
        self.info_window.mode = mode.into();
        self
    }

    pub fn with_info_window_addressing(mut self, addressing: InfoWindowAddressing) -> Self {
        self.info_window.addressing = addressing;
        self
    }

    pub fn with_info_window_accept(mut self, accept: impl Into<String>) -> Self {
        self.info_window.accept = accept.into();
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.select.trim().is_empty() {
            return Err(GeoError::InvalidOptions("select query is empty".to_string()));
        }
        if !is_var_name(&self.focus_var) {
            return Err(GeoError::InvalidOptions(format!(
                "invalid focus variable '{}'",
                self.focus_var
            )));
        }
        if let Some(graph_var) = &self.graph_var
            && !is_var_name(graph_var)
        {
            return Err(GeoError::InvalidOptions(format!(
                "invalid graph variable '{}'",
                graph_var
            )));
        }
        Ok(())
    }
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_from_minimal_json() {
        let options = GeoOptions::from_json_str(
            r#"{ "endpoint": "http://localhost:3030/ds/sparql", "select": "SELECT ?this { ?this a ?type }" }"#,
        )
        .unwrap();

        assert_eq!(options.focus_var, "this");
        assert_eq!(options.graph_var, None);
        assert_eq!(options.icons.len(), 5);
        assert_eq!(options.title_mode, TitleMode::Required);
        assert_eq!(options.click_target, ClickTarget::PrimaryTopicOf);
        assert_eq!(
            options.info_window.mode,
            "https://w3id.org/atomgraph/linkeddatahub/templates#InfoWindowMode"
        );
        assert_eq!(options.info_window.accept, HTML_ACCEPT);
        assert_eq!(options.timeout(), None);
    }

    #[test]
    fn test_viewer_addressing_from_json() {
        let options = GeoOptions::from_json_str(
            r#"{
                "endpoint": "http://localhost/sparql",
                "select": "SELECT ?item { ?item a ?type }",
                "focus_var": "item",
                "graph_var": "g",
                "title_mode": "optional",
                "click_target": "resource",
                "fit_bounds": true,
                "timeout_secs": 30,
                "info_window": { "addressing": { "type": "viewer", "base": "http://localhost/viewer" } }
            }"#,
        )
        .unwrap();

        assert_eq!(options.graph_var.as_deref(), Some("g"));
        assert_eq!(options.title_mode, TitleMode::Optional);
        assert_eq!(options.click_target, ClickTarget::Resource);
        assert!(options.fit_bounds);
        assert_eq!(options.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            options.info_window.addressing,
            InfoWindowAddressing::Viewer {
                base: Url::parse("http://localhost/viewer").unwrap()
            }
        );
    }

    #[test]
    fn test_invalid_focus_var_is_rejected() {
        let result = GeoOptions::from_json_str(
            r#"{ "endpoint": "http://localhost/sparql", "select": "SELECT * {}", "focus_var": "?this" }"#,
        );
        assert!(matches!(result, Err(GeoError::InvalidOptions(_))));
    }

    #[test]
    fn test_empty_select_is_rejected() {
        let options = GeoOptions::new(Url::parse("http://localhost/sparql").unwrap(), "  ");
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_from_json_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        writeln!(
            file,
            r#"{{ "endpoint": "http://localhost/sparql", "select": "SELECT ?this {{ ?this a ?t }}" }}"#
        )?;

        let options = GeoOptions::from_json_file(file.path())?;
        assert_eq!(options.endpoint.as_str(), "http://localhost/sparql");
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = GeoOptions::from_json_file(Path::new("/nonexistent/geolinks.json"));
        assert!(matches!(result, Err(GeoError::IoError(_))));
    }
}
