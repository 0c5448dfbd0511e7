pub mod client;
pub mod error;
pub mod html;
pub mod rdfxml;

pub use client::{HTML_ACCEPT, LinkedDataClient, RDF_XML_ACCEPT, XHTML_ACCEPT};
pub use error::FetchError;
pub use rdfxml::{RdfXmlDocument, ResourceDescription};
