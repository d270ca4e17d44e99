use regex::Regex;
use std::ops::Range;

const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An HTML document whose elements can be addressed by `id`.
///
/// Regions are located textually: the first element carrying the id, up to the
/// close tag that balances it. Markup inside comments or scripts is not
/// special-cased.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    html: String,
}

impl Page {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner_range(id).is_some()
    }

    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.inner_range(id).map(|range| &self.html[range])
    }

    /// Replaces the content of element `id`. Returns `false` and leaves the page
    /// untouched when no such element exists.
    pub fn set_inner_html(&mut self, id: &str, html: &str) -> bool {
        match self.inner_range(id) {
            Some(range) => {
                self.html.replace_range(range, html);
                true
            }
            None => false,
        }
    }

    fn inner_range(&self, id: &str) -> Option<Range<usize>> {
        let id = regex::escape(id);
        let open = Regex::new(&format!(
            r#"<([a-zA-Z][a-zA-Z0-9-]*)(?:\s[^>]*?)?\s[iI][dD]\s*=\s*(?:"{id}"|'{id}')[^>]*>"#
        ))
        .ok()?;

        let caps = open.captures(&self.html)?;
        let open_tag = caps.get(0)?;
        let tag = caps[1].to_ascii_lowercase();
        if open_tag.as_str().ends_with("/>") || VOID_ELEMENTS.contains(&tag.as_str()) {
            return None;
        }

        let start = open_tag.end();
        let tags = Regex::new(&format!(
            r"<(/?)(?i:{})(?:\s[^>]*)?>",
            regex::escape(&tag)
        ))
        .ok()?;

        let mut depth = 1usize;
        for caps in tags.captures_iter(&self.html[start..]) {
            let whole = caps.get(0)?;
            if &caps[1] == "/" {
                depth -= 1;
                if depth == 0 {
                    return Some(start..start + whole.start());
                }
            } else if !whole.as_str().ends_with("/>") {
                depth += 1;
            }
        }

        None
    }
}
