use crate::error::{FetchError, Result};
use scraper::{ElementRef, Html};

/// Outer HTML of the first element inside `<body>`.
///
/// HTML and XHTML responses are both accepted; the parser synthesises a
/// `<body>` when the document omits one.
pub fn first_body_child(text: &str) -> Result<String> {
    let document = Html::parse_document(text);

    let body = document
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "body")
        .ok_or_else(|| FetchError::MissingContent("document has no <body>".to_string()))?;

    body.children()
        .filter_map(ElementRef::wrap)
        .next()
        .map(|element| element.html())
        .ok_or_else(|| FetchError::MissingContent("<body> has no child element".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_child_of_body() {
        let html = r#"<html><head><title>x</title></head>
            <body>
                <div class="info"><h2>Copenhagen</h2><p>Capital</p></div>
                <div class="other">ignored</div>
            </body></html>"#;
        let content = first_body_child(html).unwrap();
        assert!(content.starts_with(r#"<div class="info">"#));
        assert!(content.contains("<h2>Copenhagen</h2>"));
        assert!(!content.contains("ignored"));
    }

    #[test]
    fn test_xhtml_document() {
        let xhtml = r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
  <head><title>Place</title></head>
  <body><div about="urn:a">Place A</div></body>
</html>"#;
        let content = first_body_child(xhtml).unwrap();
        assert!(content.contains("Place A"));
    }

    #[test]
    fn test_text_only_body_is_missing_content() {
        let result = first_body_child("<html><body>just text</body></html>");
        assert!(matches!(result, Err(FetchError::MissingContent(_))));
    }
}
