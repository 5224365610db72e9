//! Visibility geometry
//!
//! One-sided test: an element counts as visible once the bottom edge of
//! the visible region has reached its top, and stays visible after it has
//! been scrolled past.

use crate::host::{DocumentHost, ScrollTarget};

/// `viewport_height + scroll_offset >= element_top`
#[inline]
pub fn within_reach(viewport_height: f64, scroll_offset: f64, element_top: f64) -> bool {
    viewport_height + scroll_offset >= element_top
}

/// Sum of `offset_top` along the offset-parent chain, excluding the body
pub fn cumulative_offset_top<H: DocumentHost>(host: &H, node: H::Node) -> f64 {
    let body = host.body();
    let mut top = 0.0;
    let mut current = Some(node);

    while let Some(el) = current {
        if Some(el) == body {
            break;
        }
        top += host.offset_top(el);
        current = host.offset_parent(el);
    }
    top
}

/// Scroll offset of a container: its own document offset plus scroll position
pub fn container_scroll_offset<H: DocumentHost>(host: &H, target: ScrollTarget<H::Node>) -> f64 {
    match target {
        ScrollTarget::Viewport => host.viewport_scroll_top(),
        ScrollTarget::Element(container) => {
            cumulative_offset_top(host, container) + host.scroll_top(container)
        }
    }
}

/// Check whether `node` has come into view within `target`
pub fn is_visible<H: DocumentHost>(host: &H, node: H::Node, target: ScrollTarget<H::Node>) -> bool {
    within_reach(
        host.viewport_height(),
        container_scroll_offset(host, target),
        cumulative_offset_top(host, node),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use fos_dom::{Document, ElementGeometry};

    #[test]
    fn test_within_reach_boundary() {
        assert!(within_reach(600.0, 0.0, 600.0));
        assert!(!within_reach(600.0, 0.0, 600.5));
        assert!(within_reach(600.0, 400.0, 1000.0));
        assert!(within_reach(600.0, 0.0, -50.0));
    }

    #[test]
    fn test_within_reach_grid() {
        for height in [0.0, 320.0, 768.0] {
            for scroll in [0.0, 125.5, 4000.0] {
                for top in [0.0, 500.0, 1200.0, 9000.0] {
                    assert_eq!(within_reach(height, scroll, top), height + scroll >= top);
                }
            }
        }
    }

    #[test]
    fn test_cumulative_offset_walks_positioned_ancestors() {
        let mut doc = Document::default();
        let body = doc.body();
        let outer = doc.tree.create_element("div");
        let inner = doc.tree.create_element("div");
        let img = doc.tree.create_element("img");
        doc.tree.append_child(body, outer).unwrap();
        doc.tree.append_child(outer, inner).unwrap();
        doc.tree.append_child(inner, img).unwrap();

        doc.tree.set_geometry(outer, ElementGeometry::scroller(1000.0, 400.0, 4000.0)).unwrap();
        doc.tree.set_geometry(inner, ElementGeometry::scroller(200.0, 300.0, 900.0)).unwrap();
        doc.tree.set_geometry(img, ElementGeometry::at_top(50.0)).unwrap();

        let page = Page::new(doc);
        assert_eq!(cumulative_offset_top(&page, img), 1250.0);
        assert_eq!(cumulative_offset_top(&page, outer), 1000.0);
    }

    #[test]
    fn test_detached_element_is_visible() {
        let mut doc = Document::default();
        let img = doc.tree.create_element("img");
        doc.tree.set_geometry(img, ElementGeometry::at_top(10_000.0)).unwrap();

        let page = Page::new(doc);
        assert_eq!(cumulative_offset_top(&page, img), 0.0);
        assert!(is_visible(&page, img, ScrollTarget::Viewport));
    }

    #[test]
    fn test_container_scroll_offset() {
        let mut doc = Document::default();
        let body = doc.body();
        let scroller = doc.tree.create_element("div");
        doc.tree.append_child(body, scroller).unwrap();
        doc.tree.set_geometry(scroller, ElementGeometry::scroller(300.0, 200.0, 2000.0)).unwrap();
        doc.scroll_element_to(scroller, 150.0).unwrap();
        doc.window.document_height = 3000.0;
        doc.window.scroll_to(80.0);

        let page = Page::new(doc);
        assert_eq!(container_scroll_offset(&page, ScrollTarget::Element(scroller)), 450.0);
        assert_eq!(container_scroll_offset(&page, ScrollTarget::Viewport), 80.0);
    }
}
