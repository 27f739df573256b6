use scraper::{ElementRef, Html, Selector};

/// Parses HTML content into a document tree
///
/// Never fails: malformed markup is repaired by the HTML5 parsing rules.
pub fn parse(html: &str) -> Html {
    let doc = Html::parse_document(html);
    if !doc.errors.is_empty() {
        ::log::debug!("HTML parser recovered from {} errors", doc.errors.len());
    }
    doc
}

/// Builds a selector from a CSS string that is known to be valid
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector should be valid")
}

/// Concatenated text of an element and its descendants, unaltered
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// First element matching the selector, in document order
pub fn select_first<'a>(doc: &'a Html, css: &'static str) -> Option<ElementRef<'a>> {
    doc.select(&selector(css)).next()
}

/// Every element matching the selector, in document order
pub fn select_all<'a>(doc: &'a Html, css: &'static str) -> Vec<ElementRef<'a>> {
    doc.select(&selector(css)).collect()
}
