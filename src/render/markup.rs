//! HTML serialization of element trees

use crate::document::{Element, Node};

/// Elements written without a closing tag
const VOID_TAGS: [&str; 6] = ["br", "hr", "img", "meta", "link", "col"];

/// Serialize an element and its subtree as HTML
pub fn to_html(element: &Element) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

pub fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_into(value, true, out);
        out.push('"');
    }
    out.push('>');

    if VOID_TAGS.contains(&element.tag.as_str()) {
        return;
    }
    for child in &element.children {
        match child {
            Node::Text(text) => escape_into(text, false, out),
            Node::Element(child) => write_element(child, out),
        }
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_markup() {
        let el = Element::new("p")
            .with_attr("class", "lead")
            .with_text("Fish & ")
            .with_child(Element::new("em").with_text("<chips>"));
        assert_eq!(
            to_html(&el),
            "<p class=\"lead\">Fish &amp; <em>&lt;chips&gt;</em></p>"
        );
    }

    #[test]
    fn test_void_and_quoted_attributes() {
        let el = Element::new("img")
            .with_attr("src", "a.png")
            .with_attr("alt", "say \"hi\"");
        assert_eq!(to_html(&el), "<img src=\"a.png\" alt=\"say &quot;hi&quot;\">");
    }
}
