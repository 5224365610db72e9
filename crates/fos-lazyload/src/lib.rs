//! fOS Lazy Load
//!
//! Defers off-screen media (images, video, audio, iframes and SVG
//! references) until it scrolls into view.
//!
//! Elements opt in with a marker attribute and keep their real resource in a
//! deferred attribute:
//!
//! ```html
//! <img postpone data-src="photo.jpg">
//! <div id="feed">
//!   <video postpone data-scroll-container="#feed">
//!     <source data-src="clip.webm">
//!   </video>
//! </div>
//! ```
//!
//! # Example
//! ```rust,ignore
//! use fos_lazyload::{LazyConfig, LazyLoader, Page, ScrollTarget};
//!
//! let mut page = Page::new(fos_html::parse(html)?);
//! let mut loader = LazyLoader::new(&mut page, LazyConfig::default())?;
//!
//! page.scroll_window_to(1200.0);
//! loader.dispatch_scroll(&mut page, ScrollTarget::Viewport);
//! loader.run_for(&mut page, Duration::from_millis(500));
//! ```

pub mod activation;
pub mod binding;
mod config;
pub mod discovery;
mod error;
pub mod geometry;
pub mod grouping;
pub mod host;
mod loader;
mod page;
mod poller;
pub mod timers;

pub use config::LazyConfig;
pub use discovery::{Snapshot, TagKind, TrackedElement};
pub use error::{LazyError, Result};
pub use grouping::{ContainerKey, GroupIndex, ScrollGroup};
pub use host::{DocumentHost, LazyHost, ListenerId, Scheduler, ScrollEvents, ScrollTarget, TimerId};
pub use loader::LazyLoader;
pub use page::Page;
pub use poller::ChangePoller;
