use crate::error::{FetchError, Result};
use crate::html;
use crate::rdfxml::RdfXmlDocument;
use reqwest::Client;
use reqwest::header::ACCEPT;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const RDF_XML_ACCEPT: &str = "application/rdf+xml";
pub const HTML_ACCEPT: &str = "text/html,*/*;q=0.8";
pub const XHTML_ACCEPT: &str = "application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Thin wrapper around a pooled HTTP client for the two request shapes the
/// map needs: RDF/XML from a SPARQL endpoint and HTML fragments from
/// resource pages.
#[derive(Debug, Clone)]
pub struct LinkedDataClient {
    client: Client,
}

impl LinkedDataClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(None)
    }

    /// No timeout is applied unless one is given; a hung request then stays
    /// pending until the server gives up.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("geolinks/", env!("CARGO_PKG_VERSION")))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(reqwest::redirect::Policy::limited(5));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout).connect_timeout(timeout / 2);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url` as RDF/XML and extract its resource descriptions. The request
    /// URL becomes the document URI used to scope blank nodes.
    pub async fn get_rdf_xml(&self, url: &Url) -> Result<RdfXmlDocument> {
        let body = self.get_text(url, RDF_XML_ACCEPT, "RDF/XML").await?;
        RdfXmlDocument::parse(&body, url.as_str())
    }

    /// GET `url` as (X)HTML and return the first element inside its body.
    pub async fn get_html_fragment(&self, url: &Url, accept: &str) -> Result<String> {
        let body = self.get_text(url, accept, "HTML").await?;
        html::first_body_child(&body)
    }

    async fn get_text(&self, url: &Url, accept: &str, expected: &'static str) -> Result<String> {
        debug!("Fetching {} ({})", url, accept);

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, accept)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::StatusError {
                url: response.url().to_string(),
                status: status.as_u16(),
                expected,
            });
        }

        Ok(response.text().await?)
    }
}
