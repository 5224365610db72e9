//! Grouping index
//!
//! Partitions tracked elements by the scroll container that governs their
//! visibility. The index is rebuilt from scratch on every scan; the working
//! set is the page's deferred media, which stays small.

use std::collections::HashMap;

use crate::config::LazyConfig;
use crate::discovery::TrackedElement;
use crate::host::{DocumentHost, ListenerId, ScrollTarget};

/// Identity of a scroll container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContainerKey {
    /// The viewport
    Window,
    /// An element, by its container identifier
    Named(String),
}

/// Elements sharing one scroll container
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollGroup<N> {
    pub key: ContainerKey,
    pub target: ScrollTarget<N>,
    /// Tracked nodes in document order
    pub elements: Vec<N>,
    /// Listener bound for this group, if any
    pub listener: Option<ListenerId>,
}

impl<N> ScrollGroup<N> {
    fn new(key: ContainerKey, target: ScrollTarget<N>) -> Self {
        Self {
            key,
            target,
            elements: Vec::new(),
            listener: None,
        }
    }
}

/// Source of container identifiers
#[derive(Debug, Default)]
pub struct ContainerIds {
    next: u64,
}

impl ContainerIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of a container, assigning and persisting one if missing
    pub fn ensure<H: DocumentHost>(&mut self, host: &mut H, node: H::Node, config: &LazyConfig) -> String {
        if let Some(existing) = host
            .attribute(node, &config.container_id_attr)
            .filter(|id| !id.is_empty())
        {
            return existing.to_string();
        }
        self.assign(host, node, config)
    }

    /// Write a fresh identifier onto a container
    pub fn assign<H: DocumentHost>(&mut self, host: &mut H, node: H::Node, config: &LazyConfig) -> String {
        let id = loop {
            self.next += 1;
            let candidate = format!("{}{}", config.container_id_prefix, self.next);
            let probe = format!("[{}=\"{}\"]", config.container_id_attr, candidate);
            // Skip identifiers the document already carries.
            if !matches!(host.query_selector(&probe), Ok(Some(_))) {
                break candidate;
            }
        };
        host.set_attribute(node, &config.container_id_attr, &id);
        tracing::debug!("Assigned scroll container id {}", id);
        id
    }
}

/// Resolve an explicit container selector to its group identity
///
/// Unresolvable selectors fall back to the viewport so the element is
/// still tracked.
pub fn resolve_container<H: DocumentHost>(
    host: &mut H,
    selector: &str,
    ids: &mut ContainerIds,
    config: &LazyConfig,
) -> (ContainerKey, ScrollTarget<H::Node>) {
    match host.query_selector(selector) {
        Ok(Some(node)) if Some(node) == host.document_element() => {
            (ContainerKey::Window, ScrollTarget::Viewport)
        }
        Ok(Some(node)) => {
            let id = ids.ensure(host, node, config);
            (ContainerKey::Named(id), ScrollTarget::Element(node))
        }
        Ok(None) => {
            tracing::warn!("Scroll container {:?} not found, using viewport", selector);
            (ContainerKey::Window, ScrollTarget::Viewport)
        }
        Err(err) => {
            tracing::warn!("{}, using viewport", err);
            (ContainerKey::Window, ScrollTarget::Viewport)
        }
    }
}

/// Container key to scroll group mapping
#[derive(Debug, Clone)]
pub struct GroupIndex<N> {
    /// Groups in order of first appearance
    groups: Vec<ScrollGroup<N>>,
    positions: HashMap<ContainerKey, usize>,
}

impl<N: Copy + Eq> GroupIndex<N> {
    /// Empty index
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Build a complete index for the given elements
    pub fn build<H: DocumentHost<Node = N>>(
        host: &mut H,
        elements: &[TrackedElement<N>],
        ids: &mut ContainerIds,
        config: &LazyConfig,
    ) -> Self {
        let mut index = Self::new();

        for element in elements {
            let (mut key, target) = match &element.container {
                Some(selector) => resolve_container(host, selector, ids, config),
                None => (ContainerKey::Window, ScrollTarget::Viewport),
            };

            // Two containers sharing an identifier (cloned markup) get split.
            if let (ScrollTarget::Element(node), Some(existing)) = (target, index.get(&key)) {
                if existing.target != target {
                    key = ContainerKey::Named(ids.assign(host, node, config));
                }
            }

            index.entry(key, target).elements.push(element.node);
        }

        index
    }

    fn entry(&mut self, key: ContainerKey, target: ScrollTarget<N>) -> &mut ScrollGroup<N> {
        let position = match self.positions.get(&key) {
            Some(&position) => position,
            None => {
                self.groups.push(ScrollGroup::new(key.clone(), target));
                self.positions.insert(key, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[position]
    }

    /// Group for a container
    pub fn get(&self, key: &ContainerKey) -> Option<&ScrollGroup<N>> {
        self.positions.get(key).map(|&position| &self.groups[position])
    }

    /// Groups in order of first appearance
    pub fn groups(&self) -> &[ScrollGroup<N>] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut [ScrollGroup<N>] {
        &mut self.groups
    }

    /// Container of a tracked node
    pub fn group_of(&self, node: N) -> Option<&ContainerKey> {
        self.groups
            .iter()
            .find(|group| group.elements.contains(&node))
            .map(|group| &group.key)
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Tracked nodes across all groups
    pub fn tracked_count(&self) -> usize {
        self.groups.iter().map(|group| group.elements.len()).sum()
    }
}

impl<N: Copy + Eq> Default for GroupIndex<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::discover;
    use crate::page::Page;

    fn build(page: &mut Page, ids: &mut ContainerIds) -> GroupIndex<fos_dom::NodeId> {
        let config = LazyConfig::default();
        let elements = discover(page, &config);
        GroupIndex::build(page, &elements, ids, &config)
    }

    #[test]
    fn test_no_selector_goes_to_window() {
        let mut page = Page::new(
            fos_html::parse(r#"<img postpone data-src="a.jpg"><video postpone></video>"#).unwrap(),
        );
        let index = build(&mut page, &mut ContainerIds::new());

        assert_eq!(index.len(), 1);
        let group = index.get(&ContainerKey::Window).unwrap();
        assert_eq!(group.target, ScrollTarget::Viewport);
        assert_eq!(group.elements.len(), 2);
        assert_eq!(group.listener, None);
    }

    #[test]
    fn test_existing_container_id_reused() {
        let mut page = Page::new(
            fos_html::parse(
                r##"
                <div id="feed"><img postpone data-scroll-container="#feed"></div>
                <img postpone data-scroll-container="#feed">
                "##,
            )
            .unwrap(),
        );
        let feed = page.document.get_element_by_id("feed").unwrap();
        let before = page.outer_html(feed);

        let index = build(&mut page, &mut ContainerIds::new());
        let key = ContainerKey::Named("feed".into());
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&key).unwrap().elements.len(), 2);
        assert_eq!(index.get(&key).unwrap().target, ScrollTarget::Element(feed));
        assert_eq!(page.outer_html(feed), before);
    }

    #[test]
    fn test_container_id_assigned_once() {
        let mut page = Page::new(
            fos_html::parse(
                r#"
                <div class="feed"><img postpone data-scroll-container=".feed"></div>
                <img postpone data-scroll-container=".feed">
                "#,
            )
            .unwrap(),
        );
        let mut ids = ContainerIds::new();
        let feed = page.elements_by_tag_names(&["div"])[0];

        let first = build(&mut page, &mut ids);
        let key = ContainerKey::Named("postpone-1".into());
        assert_eq!(page.attribute(feed, "id"), Some("postpone-1"));
        assert_eq!(first.get(&key).unwrap().elements.len(), 2);

        // A second scan reuses the identifier already on the node.
        let second = build(&mut page, &mut ids);
        assert_eq!(second.groups()[0].key, key);
        assert_eq!(page.attribute(feed, "id"), Some("postpone-1"));
    }

    #[test]
    fn test_dedicated_id_attribute_leaves_page_ids() {
        let mut page = Page::new(
            fos_html::parse(r##"<div id="feed"><img postpone data-scroll-container="#feed"></div>"##)
                .unwrap(),
        );
        let config = LazyConfig {
            container_id_attr: "data-postpone-id".into(),
            ..LazyConfig::default()
        };
        let feed = page.document.get_element_by_id("feed").unwrap();
        let elements = discover(&page, &config);
        let index = GroupIndex::build(&mut page, &elements, &mut ContainerIds::new(), &config);

        assert_eq!(index.groups()[0].key, ContainerKey::Named("postpone-1".into()));
        assert_eq!(page.attribute(feed, "data-postpone-id"), Some("postpone-1"));
        assert_eq!(page.attribute(feed, "id"), Some("feed"));
    }

    #[test]
    fn test_missing_or_invalid_selector_falls_back() {
        let mut page = Page::new(
            fos_html::parse(
                r##"
                <img postpone data-scroll-container="#nowhere">
                <img postpone data-scroll-container="div >">
                <img postpone data-scroll-container="html">
                "##,
            )
            .unwrap(),
        );
        let index = build(&mut page, &mut ContainerIds::new());

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&ContainerKey::Window).unwrap().elements.len(), 3);
    }

    #[test]
    fn test_generated_ids_skip_existing() {
        let mut page = Page::new(
            fos_html::parse(
                r#"
                <div id="postpone-1"></div>
                <div class="scroller"><img postpone data-scroll-container=".scroller"></div>
                "#,
            )
            .unwrap(),
        );
        let index = build(&mut page, &mut ContainerIds::new());

        assert_eq!(index.groups()[0].key, ContainerKey::Named("postpone-2".into()));
    }

    #[test]
    fn test_duplicate_ids_split() {
        let mut page = Page::new(
            fos_html::parse(
                r#"
                <div class="a" id="same"><img postpone data-scroll-container=".a"></div>
                <div class="b" id="same"><img postpone data-scroll-container=".b"></div>
                "#,
            )
            .unwrap(),
        );
        let index = build(&mut page, &mut ContainerIds::new());

        assert_eq!(index.len(), 2);
        assert_eq!(index.tracked_count(), 2);
        assert_eq!(index.groups()[0].key, ContainerKey::Named("same".into()));
        assert_eq!(index.groups()[1].key, ContainerKey::Named("postpone-1".into()));
    }

    #[test]
    fn test_group_of() {
        let mut page = Page::new(
            fos_html::parse(r#"<img postpone><img postpone="false">"#).unwrap(),
        );
        let index = build(&mut page, &mut ContainerIds::new());
        let imgs = page.elements_by_tag_names(&["img"]);

        assert_eq!(index.group_of(imgs[0]), Some(&ContainerKey::Window));
        assert_eq!(index.group_of(imgs[1]), None);
    }
}
