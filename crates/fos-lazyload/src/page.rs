//! Page - `fos_dom::Document` as a lazy-load host
//!
//! Adds the two pieces a bare document lacks: a scroll-listener registry
//! and a timer queue.

use std::collections::HashMap;
use std::time::Duration;

use fos_dom::{Document, DomResult, NodeId};

use crate::error::{LazyError, Result};
use crate::host::{DocumentHost, ListenerId, Scheduler, ScrollEvents, ScrollTarget, TimerId};
use crate::loader::LazyLoader;
use crate::timers::TimerQueue;

/// A loaded document with event and timer bookkeeping
#[derive(Debug)]
pub struct Page {
    pub document: Document,
    listeners: HashMap<ListenerId, ScrollTarget<NodeId>>,
    next_listener: u64,
    timers: TimerQueue,
}

impl Page {
    /// Wrap a document
    pub fn new(document: Document) -> Self {
        Self {
            document,
            listeners: HashMap::new(),
            next_listener: 0,
            timers: TimerQueue::new(),
        }
    }

    /// Number of registered scroll listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners attached to a surface, oldest first
    pub fn listeners_for(&self, target: ScrollTarget<NodeId>) -> Vec<ListenerId> {
        let mut ids: Vec<_> = self
            .listeners
            .iter()
            .filter(|&(_, &bound)| bound == target)
            .map(|(&id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    /// Timer queue
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Scroll the window
    pub fn scroll_window_to(&mut self, y: f64) {
        self.document.window.scroll_to(y);
    }

    /// Scroll an element's content
    pub fn scroll_element_to(&mut self, node: NodeId, y: f64) -> DomResult<()> {
        self.document.scroll_element_to(node, y)
    }
}

impl DocumentHost for Page {
    type Node = NodeId;

    fn elements_by_tag_names(&self, names: &[&str]) -> Vec<NodeId> {
        self.document.tree.elements_by_tag_names(names)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.document.tree.tag_name(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.document.tree.get_attribute(node, name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Err(err) = self.document.tree.set_attribute(node, name, value) {
            tracing::trace!("set_attribute({}) ignored: {}", name, err);
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Err(err) = self.document.tree.remove_attribute(node, name) {
            tracing::trace!("remove_attribute({}) ignored: {}", name, err);
        }
    }

    fn child_elements(&self, node: NodeId) -> Vec<NodeId> {
        self.document.tree.child_elements(node).collect()
    }

    fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        self.document
            .query_selector(selector)
            .map_err(|err| LazyError::selector(selector, err))
    }

    fn outer_html(&self, node: NodeId) -> String {
        self.document.outer_html(node)
    }

    fn document_element(&self) -> Option<NodeId> {
        Some(self.document.document_element()).filter(|id| id.is_valid())
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.document.body()).filter(|id| id.is_valid())
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.document.offset_top(node)
    }

    fn offset_parent(&self, node: NodeId) -> Option<NodeId> {
        self.document.offset_parent(node)
    }

    fn scroll_top(&self, node: NodeId) -> f64 {
        self.document.scroll_top(node)
    }

    fn viewport_height(&self) -> f64 {
        self.document.window.inner_height
    }

    fn viewport_scroll_top(&self) -> f64 {
        self.document.window.scroll_y
    }
}

impl ScrollEvents for Page {
    fn add_scroll_listener(&mut self, target: ScrollTarget<NodeId>) -> ListenerId {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.listeners.insert(id, target);
        id
    }

    fn remove_scroll_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }
}

impl Scheduler for Page {
    fn set_timeout(&mut self, delay: Duration) -> TimerId {
        self.timers.set_timeout(delay)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.clear(id);
    }
}

impl LazyLoader<NodeId> {
    /// Advance the page clock, delivering every timer that comes due
    pub fn run_for(&mut self, page: &mut Page, elapsed: Duration) {
        let until = page.timers.now() + elapsed;
        while let Some(id) = page.timers.pop_due(until) {
            self.on_timer(page, id);
        }
        page.timers.settle(until);
    }

    /// Deliver a scroll event if the page has a listener on that surface
    ///
    /// Scrolling the root element scrolls the window.
    pub fn dispatch_scroll(&mut self, page: &mut Page, target: ScrollTarget<NodeId>) -> usize {
        let target = match target {
            ScrollTarget::Element(node) if node == page.document.document_element() => {
                ScrollTarget::Viewport
            }
            other => other,
        };
        if page.listeners_for(target).is_empty() {
            return 0;
        }
        self.handle_scroll(page, target)
    }
}
