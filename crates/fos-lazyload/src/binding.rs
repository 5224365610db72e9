//! Scroll listener binding
//!
//! One listener per scroll group. Rebinding always removes every listener
//! first so repeated scans never stack handlers.

use crate::grouping::GroupIndex;
use crate::host::ScrollEvents;

/// Attach one scroll listener per group, replacing any already bound
pub fn bind_all<H: ScrollEvents>(host: &mut H, index: &mut GroupIndex<H::Node>) -> usize {
    unbind_all(host, index);
    for group in index.groups_mut() {
        group.listener = Some(host.add_scroll_listener(group.target));
    }
    tracing::debug!("Bound {} scroll listeners", index.len());
    index.len()
}

/// Detach every listener bound for the index
pub fn unbind_all<H: ScrollEvents>(host: &mut H, index: &mut GroupIndex<H::Node>) -> usize {
    let mut removed = 0;
    for group in index.groups_mut() {
        if let Some(listener) = group.listener.take() {
            if host.remove_scroll_listener(listener) {
                removed += 1;
            }
        }
    }
    if removed > 0 {
        tracing::debug!("Unbound {} scroll listeners", removed);
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LazyConfig;
    use crate::discovery::discover;
    use crate::grouping::ContainerIds;
    use crate::host::ScrollTarget;
    use crate::page::Page;

    fn indexed_page() -> (Page, GroupIndex<fos_dom::NodeId>) {
        let mut page = Page::new(
            fos_html::parse(
                r##"
                <img postpone>
                <div id="feed"><img postpone data-scroll-container="#feed"></div>
                "##,
            )
            .unwrap(),
        );
        let config = LazyConfig::default();
        let elements = discover(&page, &config);
        let index = GroupIndex::build(&mut page, &elements, &mut ContainerIds::new(), &config);
        (page, index)
    }

    #[test]
    fn test_bind_one_listener_per_group() {
        let (mut page, mut index) = indexed_page();
        assert_eq!(bind_all(&mut page, &mut index), 2);

        let feed = page.document.get_element_by_id("feed").unwrap();
        assert_eq!(page.listeners_for(ScrollTarget::Viewport).len(), 1);
        assert_eq!(page.listeners_for(ScrollTarget::Element(feed)).len(), 1);
        assert!(index.groups().iter().all(|g| g.listener.is_some()));
    }

    #[test]
    fn test_rebind_does_not_accumulate() {
        let (mut page, mut index) = indexed_page();
        bind_all(&mut page, &mut index);
        bind_all(&mut page, &mut index);
        bind_all(&mut page, &mut index);

        assert_eq!(page.listener_count(), 2);
    }

    #[test]
    fn test_unbind_all() {
        let (mut page, mut index) = indexed_page();
        bind_all(&mut page, &mut index);

        assert_eq!(unbind_all(&mut page, &mut index), 2);
        assert_eq!(page.listener_count(), 0);
        assert_eq!(unbind_all(&mut page, &mut index), 0);
    }
}
