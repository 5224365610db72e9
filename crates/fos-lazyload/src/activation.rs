//! Activation
//!
//! Copies deferred attributes onto the real ones and drops the marker.
//! Once the marker is gone the element is never discovered again, so every
//! later call is a no-op.

use crate::config::LazyConfig;
use crate::discovery::{is_deferred, TagKind};
use crate::host::DocumentHost;

/// Resource attribute of media and embedded content
pub const SOURCE_ATTR: &str = "src";
/// Resource reference of SVG linking elements
pub const LINK_ATTR: &str = "xlink:href";
/// Responsive candidates of `<picture>` sources
pub const SRCSET_ATTR: &str = "srcset";

/// Activate a deferred element
///
/// Returns false without touching the element if it is not (or no longer)
/// deferred.
pub fn activate<H: DocumentHost>(host: &mut H, node: H::Node, config: &LazyConfig) -> bool {
    if !is_deferred(host, node, config) {
        return false;
    }

    let kind = host.tag_name(node).and_then(TagKind::from_tag_name);
    if let Some(kind) = kind {
        if kind.uses_source() {
            copy_attribute(host, node, &config.source_attr, SOURCE_ATTR);
        }
        if kind.uses_link() {
            copy_attribute(host, node, &config.link_attr, LINK_ATTR);
        }
        if kind.has_media_sources() || kind == TagKind::Picture {
            activate_sources(host, node, kind, config);
        }
    }

    host.remove_attribute(node, &config.marker_attr);
    tracing::trace!("Activated {:?} {:?}", kind, node);
    true
}

/// Child `<source>` elements of audio, video and picture
fn activate_sources<H: DocumentHost>(host: &mut H, node: H::Node, kind: TagKind, config: &LazyConfig) {
    for child in host.child_elements(node) {
        if host.tag_name(child) != Some("source") {
            continue;
        }
        copy_attribute(host, child, &config.source_attr, SOURCE_ATTR);
        if kind == TagKind::Picture {
            copy_attribute(host, child, &config.srcset_attr, SRCSET_ATTR);
        }
    }
}

fn copy_attribute<H: DocumentHost>(host: &mut H, node: H::Node, from: &str, to: &str) {
    if let Some(value) = host.attribute(node, from).map(str::to_string) {
        host.set_attribute(node, to, &value);
    }
}
