//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts the result into the arena DOM.

use fos_dom::{Document, DomTree, Namespace, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

use crate::ParseError;

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Result<Document, ParseError> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Result<Document, ParseError> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut document = Document::empty(url);
        self.convert_node(&dom.document, document.tree_mut(), NodeId::ROOT);
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Convert an RcDom node into the arena under `parent`
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId) {
        let created = match &handle.data {
            RcNodeData::Document => {
                for child in handle.children.borrow().iter() {
                    self.convert_node(child, tree, parent);
                }
                return;
            }
            RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if text.trim().is_empty() {
                    return;
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let namespace = Namespace::from_url(&name.ns);
                let id = tree.create_element_ns(&name.local, namespace);

                for attr in attrs.borrow().iter() {
                    // Foreign attributes such as xlink:href keep their prefix.
                    let qualified = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    if let Some(elem) = tree.element_mut(id) {
                        elem.set_attr(&qualified, &attr.value);
                    }
                }
                id
            }
            RcNodeData::ProcessingInstruction { .. } => return,
        };

        if let Err(err) = tree.append_child(parent, created) {
            tracing::warn!("Dropping node from parse tree: {}", err);
            return;
        }

        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, created);
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_document() {
        let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
        let doc = HtmlParser::new().parse(html).unwrap();

        let title = doc.tree().elements_by_tag_names(&["title"]);
        assert_eq!(title.len(), 1);
        assert_eq!(doc.tree().parent(title[0]), Some(doc.head()));
        assert!(doc.body().is_valid());
    }

    #[test]
    fn test_parse_fragment() {
        let doc = HtmlParser::new().parse("<div><span>Text</span></div>").unwrap();

        // Fragments get wrapped in html/head/body by html5ever
        assert!(doc.document_element().is_valid());
        assert_eq!(doc.tree().elements_by_tag_names(&["span"]).len(), 1);
    }
}
