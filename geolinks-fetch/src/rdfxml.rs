//! Extraction of resource descriptions from RDF/XML documents.
//!
//! Only the handful of properties needed to place a marker are read; this is
//! not a general RDF/XML parser. Each `rdf:Description` element is reported
//! in document order, with property values taken from the first matching
//! child element (or property attribute) of the description.

use crate::error::Result;
use roxmltree::{Document, Node, ParsingOptions};
use serde::Serialize;

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const GEO_NS: &str = "http://www.w3.org/2003/01/geo/wgs84_pos#";
pub const DCT_NS: &str = "http://purl.org/dc/terms/";
pub const FOAF_NS: &str = "http://xmlns.com/foaf/0.1/";

/// One `rdf:Description` element, reduced to the properties markers use.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceDescription {
    /// `rdf:about`
    pub about: Option<String>,
    /// `rdf:nodeID`
    pub node_id: Option<String>,
    pub lat: Option<String>,
    pub long: Option<String>,
    /// `dcterms:title`, falling back to `rdfs:label`
    pub title: Option<String>,
    /// First `rdf:type`
    pub rdf_type: Option<String>,
    /// `foaf:isPrimaryTopicOf`
    pub primary_topic_of: Option<String>,
}

impl ResourceDescription {
    /// Key identifying this resource across loads.
    ///
    /// Blank nodes are scoped by the URI of the document they were read from,
    /// so the same node ID in two documents yields two keys.
    pub fn key(&self, document_uri: &str) -> Option<String> {
        if let Some(node_id) = &self.node_id {
            return Some(format!("{}#{}", document_uri, node_id));
        }
        self.about.clone()
    }

    /// Latitude and longitude, if both are present and numeric.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_deref()?.trim().parse::<f64>().ok()?;
        let long = self.long.as_deref()?.trim().parse::<f64>().ok()?;
        if lat.is_finite() && long.is_finite() {
            Some((lat, long))
        } else {
            None
        }
    }
}

/// A parsed RDF/XML response.
#[derive(Debug, Clone, Default)]
pub struct RdfXmlDocument {
    /// URI the document was retrieved from
    pub document_uri: String,
    pub descriptions: Vec<ResourceDescription>,
}

impl RdfXmlDocument {
    pub fn parse(text: &str, document_uri: &str) -> Result<Self> {
        // RDF/XML commonly declares entities for namespaces in a DOCTYPE
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(text, options)?;

        let descriptions = document
            .descendants()
            .filter(|node| node.has_tag_name((RDF_NS, "Description")))
            .map(read_description)
            .collect();

        Ok(Self {
            document_uri: document_uri.to_string(),
            descriptions,
        })
    }
}

fn read_description(node: Node) -> ResourceDescription {
    let title = literal(node, DCT_NS, "title").or_else(|| literal(node, RDFS_NS, "label"));

    ResourceDescription {
        about: node.attribute((RDF_NS, "about")).map(str::to_string),
        node_id: node.attribute((RDF_NS, "nodeID")).map(str::to_string),
        lat: literal(node, GEO_NS, "lat"),
        long: literal(node, GEO_NS, "long"),
        title,
        rdf_type: reference(node, RDF_NS, "type"),
        primary_topic_of: reference(node, FOAF_NS, "isPrimaryTopicOf"),
    }
}

fn first_property<'a, 'input>(
    node: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|child| child.has_tag_name((namespace, name)))
}

/// Text content of the first matching property element, or the value of a
/// property attribute on the description itself.
fn literal(node: Node, namespace: &str, name: &str) -> Option<String> {
    if let Some(property) = first_property(node, namespace, name) {
        let text: String = property
            .descendants()
            .filter(|n| n.is_text())
            .filter_map(|n| n.text())
            .collect();
        return Some(text.trim().to_string());
    }
    node.attribute((namespace, name)).map(|v| v.trim().to_string())
}

/// `rdf:resource` of the first matching property element, or the value of a
/// property attribute on the description itself.
fn reference(node: Node, namespace: &str, name: &str) -> Option<String> {
    if let Some(property) = first_property(node, namespace, name) {
        return property.attribute((RDF_NS, "resource")).map(str::to_string);
    }
    node.attribute((namespace, name)).map(str::to_string)
}
