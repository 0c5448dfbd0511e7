use crate::options::{InfoWindowAddressing, InfoWindowOptions};
use geolinks_fetch::LinkedDataClient;
use geolinks_fetch::error::Result;
use tracing::debug;
use url::Url;

/// Fetches the HTML fragment shown in a marker's info-window.
#[derive(Debug, Clone)]
pub struct InfoWindowLoader {
    client: LinkedDataClient,
    options: InfoWindowOptions,
}

impl InfoWindowLoader {
    pub fn new(client: LinkedDataClient, options: InfoWindowOptions) -> Self {
        Self { client, options }
    }

    /// URL requested for `target`, always without a fragment.
    pub fn info_url(&self, target: &Url) -> Url {
        let mut url = match &self.options.addressing {
            InfoWindowAddressing::Direct => target.clone(),
            InfoWindowAddressing::Viewer { base } => {
                let mut url = base.clone();
                url.query_pairs_mut().append_pair("uri", target.as_str());
                url
            }
        };
        url.query_pairs_mut().append_pair("mode", &self.options.mode);
        url.set_fragment(None);
        url
    }

    pub async fn fetch_content(&self, target: &Url) -> Result<String> {
        let url = self.info_url(target);
        debug!("Loading info-window for {} from {}", target, url);
        self.client
            .get_html_fragment(&url, &self.options.accept)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader(addressing: InfoWindowAddressing) -> InfoWindowLoader {
        let options = InfoWindowOptions {
            addressing,
            ..InfoWindowOptions::default()
        };
        InfoWindowLoader::new(LinkedDataClient::new().unwrap(), options)
    }

    #[test]
    fn test_direct_url_appends_mode_and_drops_fragment() {
        let target = Url::parse("http://example.org/places/copenhagen?lang=da#this").unwrap();
        let url = loader(InfoWindowAddressing::Direct).info_url(&target);

        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/places/copenhagen");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("lang".to_string(), "da".to_string()),
                (
                    "mode".to_string(),
                    "https://w3id.org/atomgraph/linkeddatahub/templates#InfoWindowMode".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_viewer_url_carries_target_as_parameter() {
        let base = Url::parse("http://example.org/viewer").unwrap();
        let target = Url::parse("http://data.example.org/resource/a#id").unwrap();
        let url = loader(InfoWindowAddressing::Viewer { base }).info_url(&target);

        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/viewer");
        let uri = url
            .query_pairs()
            .find(|(key, _)| key == "uri")
            .map(|(_, value)| value.into_owned());
        assert_eq!(uri.as_deref(), Some("http://data.example.org/resource/a#id"));
        assert!(url.query_pairs().any(|(key, _)| key == "mode"));
    }
}
