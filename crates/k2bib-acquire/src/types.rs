use scraper::Html;

/// Marker the program site renders in place of a missing proposal page.
pub const NOT_FOUND_MARKER: &str = "404 Not Found";

/// A fetched proposal page before field extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPage {
    /// The page exists. `text` is the page body with line endings
    /// normalized; markup is left untouched.
    Found { url: String, text: String },
    /// The site answered with its "404 Not Found" page.
    NotFound { url: String },
}

impl RawPage {
    /// Classify a response body.
    ///
    /// Classification looks at the rendered text, not the HTTP status: the
    /// site's missing-page response is recognised by its marker text. A
    /// found page keeps its body, since a stray `<` in plain text would
    /// open a tag in the rendering and swallow what follows.
    pub fn from_body(url: &str, body: &str) -> Self {
        if render_text(body).contains(NOT_FOUND_MARKER) {
            return RawPage::NotFound {
                url: url.to_string(),
            };
        }
        RawPage::Found {
            url: url.to_string(),
            text: body.replace("\r\n", "\n"),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            RawPage::Found { url, .. } | RawPage::NotFound { url } => url,
        }
    }

    /// Page text, or `None` for a missing page.
    pub fn text(&self) -> Option<&str> {
        match self {
            RawPage::Found { text, .. } => Some(text),
            RawPage::NotFound { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RawPage::NotFound { .. })
    }
}

/// Parse a body as HTML and concatenate its text nodes.
///
/// Used only to recognise the site's HTML error page.
pub fn render_text(body: &str) -> String {
    let document = Html::parse_document(body);
    document.root_element().text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.org/GO5023.txt";

    #[test]
    fn test_plain_text_passes_through() {
        let body = "Title: Foo (bar)\nPI: Jane D.\nCoIs: John S.\n\nSome abstract text.\n";
        assert_eq!(render_text(body), body);
    }

    #[test]
    fn test_html_markup_is_stripped() {
        let body = "<html><head><title>404 Not Found</title></head>\
                    <body><h1>Not Found</h1><p>The requested URL was not found.</p></body></html>";
        let text = render_text(body);
        assert!(text.contains("404 Not Found"));
        assert!(!text.contains("<h1>"));
    }

    #[test]
    fn test_not_found_page() {
        let body = "<html><head><title>404 Not Found</title></head><body></body></html>";
        let page = RawPage::from_body(URL, body);
        assert!(page.is_not_found());
        assert_eq!(page.url(), URL);
        assert!(page.text().is_none());
    }

    #[test]
    fn test_marker_anywhere_means_not_found() {
        let body = "Title: Foo\nPI: Jane D.\nCoIs: John S.\n\nWe cite 404 Not Found here.\n";
        assert!(RawPage::from_body(URL, body).is_not_found());
    }

    #[test]
    fn test_found_page() {
        let body = "Title: Foo\nPI: Jane D.\n";
        let page = RawPage::from_body(URL, body);
        assert!(!page.is_not_found());
        assert_eq!(page.text(), Some(body));
    }

    #[test]
    fn test_less_than_before_letter_survives() {
        let body = "Title: Foo\nPI: Howell, S\nCoIs: \n\nStars with Teff<Tlim and more\n\nSecond.\n";
        let page = RawPage::from_body(URL, body);
        assert_eq!(page.text(), Some(body));
    }

    #[test]
    fn test_body_kept_verbatim() {
        let page = RawPage::from_body(URL, "Title: Stars &amp; Planets\n");
        assert_eq!(page.text(), Some("Title: Stars &amp; Planets\n"));
    }

    #[test]
    fn test_crlf_normalized() {
        let page = RawPage::from_body(URL, "Title: Foo\r\nPI: Bar\r\n\r\nAbstract.\r\n");
        assert_eq!(page.text(), Some("Title: Foo\nPI: Bar\n\nAbstract.\n"));
    }
}
