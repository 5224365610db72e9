//! Host document seam
//!
//! The engine never owns the document. Everything it reads or writes goes
//! through these traits, so any DOM that can answer them can be driven.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use crate::error::Result;

/// Scroll surface a listener attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollTarget<N> {
    /// The window (document scrolling)
    Viewport,
    /// A scrollable element
    Element(N),
}

/// Handle of a registered scroll listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Handle of a scheduled timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Read and write access to the host document
pub trait DocumentHost {
    /// Copyable node handle
    type Node: Copy + Eq + Hash + Debug;

    /// Connected elements with one of the given local names, in document order
    fn elements_by_tag_names(&self, names: &[&str]) -> Vec<Self::Node>;

    /// Local tag name of an element
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Attribute value
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Set an attribute; non-elements are ignored
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Remove an attribute; absent attributes are ignored
    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    /// Element children in document order
    fn child_elements(&self, node: Self::Node) -> Vec<Self::Node>;

    /// First element matching a selector
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>>;

    /// Markup of the element and its subtree
    fn outer_html(&self, node: Self::Node) -> String;

    /// The root element (`<html>`)
    fn document_element(&self) -> Option<Self::Node>;

    /// The `<body>` element
    fn body(&self) -> Option<Self::Node>;

    /// `offsetTop` relative to the offset parent
    fn offset_top(&self, node: Self::Node) -> f64;

    /// `offsetParent`
    fn offset_parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// `scrollTop` of a scrollable element
    fn scroll_top(&self, node: Self::Node) -> f64;

    /// Window `innerHeight`
    fn viewport_height(&self) -> f64;

    /// Window vertical scroll position
    fn viewport_scroll_top(&self) -> f64;
}

/// Scroll listener registry
pub trait ScrollEvents: DocumentHost {
    /// Attach a scroll listener to a surface
    fn add_scroll_listener(&mut self, target: ScrollTarget<Self::Node>) -> ListenerId;

    /// Detach a listener; returns false if it was not registered
    fn remove_scroll_listener(&mut self, id: ListenerId) -> bool;
}

/// One-shot timeouts
pub trait Scheduler {
    /// Schedule a timeout; expiry is reported back with the returned id
    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    /// Cancel a timeout; unknown ids are ignored
    fn clear_timeout(&mut self, id: TimerId);
}

/// Everything the lazy loader needs from its environment
pub trait LazyHost: ScrollEvents + Scheduler {}

impl<T: ScrollEvents + Scheduler> LazyHost for T {}
