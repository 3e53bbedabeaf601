//! Small helpers over `scraper` element trees.

use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid selector")
}

/// Trimmed text content of an element, like `textContent.trim()`.
pub(crate) fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_owned()
}

/// Trimmed text of the first descendant matching `sel`, or empty.
pub(crate) fn first_text(el: ElementRef<'_>, sel: &Selector) -> String {
    el.select(sel).next().map(text_of).unwrap_or_default()
}

/// Value of `attr` on `el`, treating a blank attribute as absent.
pub(crate) fn attr<'a>(el: ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name).filter(|v| !v.trim().is_empty())
}

/// `src` or `data-src` of an image, protocol-relative URLs upgraded to https.
pub(crate) fn image_url(img: ElementRef<'_>) -> String {
    let raw = attr(img, "src").or_else(|| attr(img, "data-src")).unwrap_or_default();
    if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_owned()
    }
}
