//! Thin helpers over the html5ever reference-counted DOM.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Parse an HTML fragment by wrapping it in a minimal document.
pub fn parse_fragment(html: &str) -> RcDom {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .one(wrapped.as_bytes())
}

/// Get the first element with the given local name
pub fn find_first_element(handle: &Handle, name: &str) -> Option<Handle> {
    if element_name(handle).as_deref() == Some(name) {
        return Some(handle.clone());
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_first_element(child, name) {
            return Some(found);
        }
    }
    None
}

/// All descendant elements (not the node itself) with the given local name.
pub fn find_descendants(handle: &Handle, name: &str) -> Vec<Handle> {
    let mut results = Vec::new();
    for child in handle.children.borrow().iter() {
        collect_named(child, name, &mut results);
    }
    results
}

fn collect_named(handle: &Handle, name: &str, results: &mut Vec<Handle>) {
    if element_name(handle).as_deref() == Some(name) {
        results.push(handle.clone());
    }
    for child in handle.children.borrow().iter() {
        collect_named(child, name, results);
    }
}

/// Lowercase local name for element nodes.
pub fn element_name(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Element { ref name, .. } => Some(name.local.to_string().to_ascii_lowercase()),
        _ => None,
    }
}

pub fn text_of_node(handle: &Handle) -> Option<String> {
    match handle.data {
        NodeData::Text { ref contents } => {
            let mut text = String::new();
            text.push_str(&contents.borrow());
            Some(text)
        }
        _ => None,
    }
}

pub fn children(handle: &Handle) -> Vec<Handle> {
    handle.children.borrow().iter().cloned().collect()
}

/// Get text content from a node (ignoring tags)
pub fn get_text_content(handle: &Handle) -> String {
    get_text_excluding(handle, &[])
}

/// Text content, skipping subtrees rooted at any of `skip` element names.
pub fn get_text_excluding(handle: &Handle, skip: &[&str]) -> String {
    let mut text = String::new();
    get_text_recursive(handle, skip, &mut text);
    text
}

fn get_text_recursive(handle: &Handle, skip: &[&str], text: &mut String) {
    match handle.data {
        NodeData::Text { ref contents } => {
            text.push_str(&contents.borrow());
        }
        NodeData::Element { ref name, .. } => {
            let local = name.local.to_string().to_ascii_lowercase();
            if skip.contains(&local.as_str()) || matches!(local.as_str(), "script" | "style") {
                return;
            }
            // Block boundaries and <br> separate words.
            let spaced = matches!(
                local.as_str(),
                "br" | "p"
                    | "div"
                    | "li"
                    | "dt"
                    | "dd"
                    | "td"
                    | "th"
                    | "tr"
                    | "figcaption"
                    | "h1"
                    | "h2"
                    | "h3"
                    | "h4"
                    | "h5"
                    | "h6"
            );
            if spaced {
                text.push(' ');
            }
            for child in handle.children.borrow().iter() {
                get_text_recursive(child, skip, text);
            }
            if spaced {
                text.push(' ');
            }
        }
        _ => {}
    }
}

/// Get an attribute value from an element
pub fn get_attribute(handle: &Handle, attr_name: &str) -> Option<String> {
    if let NodeData::Element { ref attrs, .. } = handle.data {
        for attr in attrs.borrow().iter() {
            if attr.name.local.as_ref().eq_ignore_ascii_case(attr_name) {
                return Some(attr.value.to_string());
            }
        }
    }
    None
}

/// Lowercased `class` attribute, empty when absent.
pub fn class_list(handle: &Handle) -> String {
    get_attribute(handle, "class")
        .unwrap_or_default()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_lands_in_body() {
        let dom = parse_fragment("<p>Hello</p>");
        let body = find_first_element(&dom.document, "body").unwrap();
        let p = find_first_element(&body, "p").unwrap();
        assert_eq!(get_text_content(&p), " Hello ");
    }

    #[test]
    fn text_excluding_skips_subtrees() {
        let dom = parse_fragment("<blockquote>Go west <cite>Greeley</cite></blockquote>");
        let quote = find_first_element(&dom.document, "blockquote").unwrap();
        assert_eq!(get_text_excluding(&quote, &["cite"]).trim(), "Go west");
    }

    #[test]
    fn attributes_and_classes() {
        let dom = parse_fragment(r#"<div class="Tip Box" data-x="1"></div>"#);
        let div = find_first_element(&dom.document, "div").unwrap();
        assert_eq!(class_list(&div), "tip box");
        assert_eq!(get_attribute(&div, "data-x").as_deref(), Some("1"));
        assert_eq!(get_attribute(&div, "missing"), None);
    }

    #[test]
    fn element_names_are_lowercase_strings() {
        let dom = parse_fragment("<DIV>a<SCRIPT>x()</SCRIPT><STYLE>p{}</STYLE>b</DIV>");
        let div = find_first_element(&dom.document, "div").unwrap();
        assert_eq!(element_name(&div), Some("div".to_string()));
        assert_eq!(get_text_content(&div).trim(), "ab");
    }

    #[test]
    fn descendants_exclude_self() {
        let dom = parse_fragment("<div><div><img src=a><img src=b></div></div>");
        let outer = find_first_element(&dom.document, "div").unwrap();
        assert_eq!(find_descendants(&outer, "img").len(), 2);
        assert_eq!(find_descendants(&outer, "div").len(), 1);
    }
}
