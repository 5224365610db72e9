//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with attributes, element geometry, simple
//! selectors and markup serialization.

mod document;
pub mod geometry;
mod node;
mod operations;
pub mod selector;
pub mod serialize;
mod tree;

pub use document::Document;
pub use geometry::{ElementGeometry, Window};
pub use node::{Attribute, ElementData, Namespace, Node, NodeData};
pub use operations::{DomError, DomResult};
pub use selector::{Selector, SelectorError};
pub use tree::{Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);
    /// Null link
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check whether this ID points at a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}
