//! Small helpers shared by the HTML collectors
use crate::{CollectError, CollectResult};
use scraper::{ElementRef, Html, Selector};

/// Parses a CSS selector, reporting failures against the given source
pub(crate) fn selector(source_name: &'static str, css: &str) -> CollectResult<Selector> {
    Selector::parse(css)
        .map_err(|e| CollectError::malformed(source_name, format!("bad selector {css:?}: {e:?}")))
}

/// All text below an element, concatenated
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Every element of the document in document order
pub(crate) fn elements_in_order(document: &Html) -> Vec<ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .collect()
}

/// Position of the first element after `start` with the given tag name
pub(crate) fn next_tag_after(elements: &[ElementRef<'_>], start: usize, tag: &str) -> Option<usize> {
    elements
        .iter()
        .enumerate()
        .skip(start + 1)
        .find(|(_, element)| element.value().name() == tag)
        .map(|(index, _)| index)
}
