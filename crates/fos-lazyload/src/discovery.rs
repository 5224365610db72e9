//! Element discovery
//!
//! Finds media elements still carrying the deferred marker and fingerprints
//! the result so callers can tell whether the candidate set changed.

use crate::config::LazyConfig;
use crate::host::DocumentHost;

/// Tags that can carry deferred media
pub const DEFERRABLE_TAGS: &[&str] = &[
    "audio", "embed", "iframe", "image", "img", "picture", "use", "video", "tref",
];

/// Kind of a deferrable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Audio,
    Embed,
    Iframe,
    /// SVG `<image>`
    Image,
    Img,
    Picture,
    /// SVG `<use>`
    Use,
    Video,
    /// SVG `<tref>`
    Tref,
}

impl TagKind {
    /// Parse from a local tag name
    pub fn from_tag_name(name: &str) -> Option<Self> {
        match name {
            "audio" => Some(Self::Audio),
            "embed" => Some(Self::Embed),
            "iframe" => Some(Self::Iframe),
            "image" => Some(Self::Image),
            "img" => Some(Self::Img),
            "picture" => Some(Self::Picture),
            "use" => Some(Self::Use),
            "video" => Some(Self::Video),
            "tref" => Some(Self::Tref),
            _ => None,
        }
    }

    /// Loads through `src`
    pub fn uses_source(self) -> bool {
        matches!(
            self,
            Self::Audio | Self::Embed | Self::Iframe | Self::Img | Self::Picture | Self::Video
        )
    }

    /// Loads through an SVG `xlink:href` reference
    pub fn uses_link(self) -> bool {
        matches!(self, Self::Image | Self::Use | Self::Tref)
    }

    /// Media element whose child `<source>`s carry `src`
    pub fn has_media_sources(self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }
}

/// A deferred element found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedElement<N> {
    pub node: N,
    pub kind: TagKind,
    /// Explicit scroll container selector, if declared
    pub container: Option<String>,
}

/// Marker present and not opted out with "false"
pub fn is_deferred<H: DocumentHost>(host: &H, node: H::Node, config: &LazyConfig) -> bool {
    host.attribute(node, &config.marker_attr)
        .is_some_and(|value| value != "false")
}

/// Deferred elements in document order
pub fn discover<H: DocumentHost>(host: &H, config: &LazyConfig) -> Vec<TrackedElement<H::Node>> {
    host.elements_by_tag_names(DEFERRABLE_TAGS)
        .into_iter()
        .filter(|&node| is_deferred(host, node, config))
        .filter_map(|node| {
            let kind = TagKind::from_tag_name(host.tag_name(node)?)?;
            let container = host
                .attribute(node, &config.container_attr)
                .map(str::trim)
                .filter(|selector| !selector.is_empty())
                .map(str::to_string);
            Some(TrackedElement { node, kind, container })
        })
        .collect()
}

/// Fingerprint of a candidate set: concatenated outer markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot(String);

impl Snapshot {
    /// Capture the markup of the given elements
    pub fn capture<H: DocumentHost>(host: &H, elements: &[TrackedElement<H::Node>]) -> Self {
        Self(
            elements
                .iter()
                .map(|element| host.outer_html(element.node))
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;

    fn page(html: &str) -> Page {
        Page::new(fos_html::parse(html).unwrap())
    }

    #[test]
    fn test_discover_document_order() {
        let page = page(
            r##"
            <video postpone data-src="a.mp4"></video>
            <p>text</p>
            <img postpone data-src="b.jpg">
            <svg><use postpone data-xlink:href="#c"></use></svg>
            <iframe postpone="yes" data-src="d.html"></iframe>
            "##,
        );
        let found = discover(&page, &LazyConfig::default());
        let kinds: Vec<_> = found.iter().map(|e| e.kind).collect();

        assert_eq!(kinds, vec![TagKind::Video, TagKind::Img, TagKind::Use, TagKind::Iframe]);
    }

    #[test]
    fn test_false_marker_excluded() {
        let page = page(
            r#"
            <img postpone="false" data-src="a.jpg">
            <img postpone="False" data-src="b.jpg">
            <img data-src="c.jpg">
            "#,
        );
        let found = discover(&page, &LazyConfig::default());

        // Only the literal lowercase "false" opts out.
        assert_eq!(found.len(), 1);
        assert_eq!(page.attribute(found[0].node, "data-src"), Some("b.jpg"));
    }

    #[test]
    fn test_unlisted_tags_ignored() {
        let page = page(r#"<div postpone data-src="x"></div><audio postpone></audio>"#);
        let found = discover(&page, &LazyConfig::default());
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, TagKind::Audio);
    }

    #[test]
    fn test_container_selector_trimmed() {
        let page = page(
            r##"
            <img postpone data-scroll-container="  #feed ">
            <img postpone data-scroll-container="">
            "##,
        );
        let found = discover(&page, &LazyConfig::default());

        assert_eq!(found[0].container.as_deref(), Some("#feed"));
        assert_eq!(found[1].container, None);
    }

    #[test]
    fn test_snapshot_tracks_markup() {
        let mut page = page(r#"<img postpone data-src="a.jpg">"#);
        let config = LazyConfig::default();

        let before = Snapshot::capture(&page, &discover(&page, &config));
        assert_eq!(before, Snapshot::capture(&page, &discover(&page, &config)));

        let img = page.elements_by_tag_names(&["img"])[0];
        page.set_attribute(img, "data-src", "b.jpg");
        let after = Snapshot::capture(&page, &discover(&page, &config));

        assert_ne!(before, after);
        assert!(after.as_str().contains("b.jpg"));
    }

    #[test]
    fn test_tag_kind_rules_are_disjoint() {
        for tag in DEFERRABLE_TAGS {
            let kind = TagKind::from_tag_name(tag).unwrap();
            assert!(kind.uses_source() != kind.uses_link(), "{tag}");
        }
    }
}
