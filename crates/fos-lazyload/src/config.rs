//! Lazy-load configuration
//!
//! The attribute vocabulary a host document uses to mark deferred media,
//! plus the change-poll interval.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LazyError, Result};

/// Lazy-load configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LazyConfig {
    /// Marker flagging an element as deferred; the value "false" opts out
    pub marker_attr: String,
    /// Deferred `src`
    pub source_attr: String,
    /// Deferred `xlink:href` for SVG references
    pub link_attr: String,
    /// Deferred `srcset` on `<picture>` sources
    pub srcset_attr: String,
    /// Selector naming the scroll container an element scrolls within
    pub container_attr: String,
    /// Attribute identifying scroll containers
    ///
    /// An existing value is reused; containers lacking one get a generated
    /// identifier. A dedicated attribute such as `data-postpone-id` keeps
    /// generated values off the page's own `id`s.
    pub container_id_attr: String,
    /// Prefix of generated container identifiers
    pub container_id_prefix: String,
    /// Delay between change polls
    pub poll_interval_ms: u64,
}

impl Default for LazyConfig {
    fn default() -> Self {
        Self {
            marker_attr: "postpone".into(),
            source_attr: "data-src".into(),
            link_attr: "data-xlink:href".into(),
            srcset_attr: "data-srcset".into(),
            container_attr: "data-scroll-container".into(),
            container_id_attr: "id".into(),
            container_id_prefix: "postpone-".into(),
            poll_interval_ms: 500,
        }
    }
}

impl LazyConfig {
    /// Delay between change polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("marker-attr", &self.marker_attr),
            ("source-attr", &self.source_attr),
            ("link-attr", &self.link_attr),
            ("srcset-attr", &self.srcset_attr),
            ("container-attr", &self.container_attr),
            ("container-id-attr", &self.container_id_attr),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(LazyError::InvalidConfig(format!("{key} must not be empty")));
            }
        }
        if self.poll_interval_ms == 0 {
            return Err(LazyError::InvalidConfig(
                "poll-interval-ms must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
