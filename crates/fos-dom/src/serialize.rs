//! Markup serialization (outerHTML)

use crate::node::{Namespace, NodeData};
use crate::{DomTree, NodeId};

/// HTML elements that never have an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Serialize a node and its subtree
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };

    match &node.data {
        NodeData::Document => {
            for (child, _) in tree.children(id) {
                write_node(tree, child, out);
            }
        }
        NodeData::Doctype { name } => {
            out.push_str("<!DOCTYPE ");
            out.push_str(name);
            out.push('>');
        }
        NodeData::Text(text) => escape_into(text, false, out),
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element(elem) => {
            out.push('<');
            out.push_str(&elem.name);
            for attr in &elem.attrs {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_into(&attr.value, true, out);
                out.push('"');
            }
            out.push('>');

            let is_void =
                elem.namespace == Namespace::Html && VOID_ELEMENTS.contains(&elem.name.as_str());
            if is_void {
                return;
            }
            for (child, _) in tree.children(id) {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(&elem.name);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, in_attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if in_attribute => out.push_str("&quot;"),
            '<' if !in_attribute => out.push_str("&lt;"),
            '>' if !in_attribute => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_element() {
        let mut tree = DomTree::new();
        let img = tree.create_element("img");
        tree.set_attribute(img, "postpone", "").unwrap();
        tree.set_attribute(img, "data-src", "a.jpg").unwrap();

        assert_eq!(outer_html(&tree, img), r#"<img postpone="" data-src="a.jpg">"#);
    }

    #[test]
    fn test_nested_with_escaping() {
        let mut tree = DomTree::new();
        let p = tree.create_element("p");
        let text = tree.create_text("a < b & c");
        tree.append_child(p, text).unwrap();
        tree.set_attribute(p, "title", "say \"hi\"").unwrap();

        assert_eq!(
            outer_html(&tree, p),
            r#"<p title="say &quot;hi&quot;">a &lt; b &amp; c</p>"#
        );
    }

    #[test]
    fn test_svg_keeps_end_tag() {
        let mut tree = DomTree::new();
        let use_el = tree.create_element_ns("use", Namespace::Svg);
        tree.set_attribute(use_el, "xlink:href", "#icon").unwrap();

        assert_eq!(outer_html(&tree, use_el), r##"<use xlink:href="#icon"></use>"##);
    }
}
