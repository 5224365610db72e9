//! Document - High-level document API

use crate::geometry::Window;
use crate::operations::{DomError, DomResult};
use crate::selector::{Selector, SelectorError};
use crate::serialize;
use crate::{DomTree, NodeId};

/// HTML Document
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Viewport and document scroll state
    pub window: Window,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with html/head/body structure
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.append_new_element(NodeId::ROOT, "html");
        let head = tree.append_new_element(html, "head");
        let body = tree.append_new_element(html, "body");

        Self {
            tree,
            window: Window::default(),
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            window: Window::default(),
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    /// Locate html/head/body after the tree was built externally
    pub fn finalize(&mut self) {
        self.html_element = self
            .tree
            .child_elements(NodeId::ROOT)
            .find(|&id| self.tree.tag_name(id) == Some("html"))
            .unwrap_or(NodeId::NONE);
        self.head_element = self.child_by_tag(self.html_element, "head");
        self.body_element = self.child_by_tag(self.html_element, "body");
    }

    fn child_by_tag(&self, parent: NodeId, tag: &str) -> NodeId {
        self.tree
            .child_elements(parent)
            .find(|&id| self.tree.tag_name(id) == Some(tag))
            .unwrap_or(NodeId::NONE)
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(NodeId::ROOT)
            .find(|&node| self.tree.element(node).and_then(|e| e.id()) == Some(id))
    }

    /// First element matching a selector, in document order
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, SelectorError> {
        let selector = Selector::parse(selector)?;
        Ok(self
            .tree
            .descendants(NodeId::ROOT)
            .find(|&id| selector.matches(&self.tree, id)))
    }

    /// Nearest positioned ancestor, or body
    ///
    /// `None` for body, html, detached nodes and anything outside body,
    /// mirroring `HTMLElement.offsetParent`.
    pub fn offset_parent(&self, id: NodeId) -> Option<NodeId> {
        if id == self.body_element || id == self.html_element || !self.tree.is_connected(id) {
            return None;
        }
        self.tree.element(id)?;

        let mut current = self.tree.parent(id);
        while let Some(ancestor) = current {
            if ancestor == self.body_element {
                return Some(ancestor);
            }
            if self.tree.geometry(ancestor).is_some_and(|g| g.positioned) {
                return Some(ancestor);
            }
            current = self.tree.parent(ancestor);
        }
        None
    }

    /// `offsetTop`; 0 for nodes that take no part in layout
    pub fn offset_top(&self, id: NodeId) -> f64 {
        let rendered = id == self.body_element || self.offset_parent(id).is_some();
        if !rendered {
            return 0.0;
        }
        self.tree.geometry(id).map_or(0.0, |g| g.offset_top)
    }

    /// `scrollTop` of an element
    pub fn scroll_top(&self, id: NodeId) -> f64 {
        self.tree.geometry(id).map_or(0.0, |g| g.scroll_top)
    }

    /// Scroll an element's content, clamped to its scrollable extent
    pub fn scroll_element_to(&mut self, id: NodeId, y: f64) -> DomResult<()> {
        let geometry = self.tree.geometry_mut(id).ok_or(DomError::NotAnElement(id))?;
        let x = geometry.scroll_left;
        geometry.scroll_to(x, y);
        Ok(())
    }

    /// Serialize a node with its subtree
    pub fn outer_html(&self, id: NodeId) -> String {
        serialize::outer_html(&self.tree, id)
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}
