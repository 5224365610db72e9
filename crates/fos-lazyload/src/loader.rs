//! Lazy loader
//!
//! Ties discovery, grouping, listener binding, visibility checks and
//! change polling together. The loader holds node handles only; the host
//! owns the document and is passed into every operation.

use std::fmt::Debug;
use std::hash::Hash;

use crate::activation;
use crate::binding;
use crate::config::LazyConfig;
use crate::discovery::{self, is_deferred, Snapshot, TrackedElement};
use crate::error::Result;
use crate::geometry;
use crate::grouping::{ContainerIds, ContainerKey, GroupIndex, ScrollGroup};
use crate::host::{DocumentHost, LazyHost, ScrollTarget, TimerId};
use crate::poller::ChangePoller;

/// Deferred-media engine for one document
#[derive(Debug)]
pub struct LazyLoader<N> {
    config: LazyConfig,
    index: GroupIndex<N>,
    ids: ContainerIds,
    poller: ChangePoller,
}

impl<N: Copy + Eq + Hash + Debug> LazyLoader<N> {
    /// Start tracking a document
    ///
    /// Scans, groups, activates whatever is already in view, binds scroll
    /// listeners and starts change polling.
    pub fn new<H: LazyHost<Node = N>>(host: &mut H, config: LazyConfig) -> Result<Self> {
        config.validate()?;

        let mut loader = Self {
            poller: ChangePoller::new(config.poll_interval()),
            config,
            index: GroupIndex::new(),
            ids: ContainerIds::new(),
        };
        loader.rescan(host);
        loader.start_polling(host);

        tracing::debug!(
            "Lazy loader started: {} elements in {} groups",
            loader.tracked_count(),
            loader.group_count()
        );
        Ok(loader)
    }

    /// Re-scan the document and rebind unconditionally
    ///
    /// Returns the number of elements activated by the follow-up sweep.
    pub fn rescan<H: LazyHost<Node = N>>(&mut self, host: &mut H) -> usize {
        let elements = discovery::discover(host, &self.config);
        self.poller.remember(Snapshot::capture(host, &elements));
        self.rebuild(host, &elements)
    }

    /// Start (or restart) change polling with an immediate poll
    pub fn start_polling<H: LazyHost<Node = N>>(&mut self, host: &mut H) {
        if self.poller.is_running() {
            self.stop_polling(host);
        }
        self.tick(host);
    }

    /// Stop change polling
    pub fn stop_polling<H: LazyHost<Node = N>>(&mut self, host: &mut H) {
        if self.poller.cancel(host) {
            tracing::debug!("Change polling stopped");
        }
    }

    /// Stop polling and release every scroll listener
    pub fn detach<H: LazyHost<Node = N>>(&mut self, host: &mut H) {
        self.stop_polling(host);
        binding::unbind_all(host, &mut self.index);
        self.index = GroupIndex::new();
    }

    /// Deliver an expired timer; returns false if it was not the poll timer
    pub fn on_timer<H: LazyHost<Node = N>>(&mut self, host: &mut H, id: TimerId) -> bool {
        if !self.poller.take_expired(id) {
            return false;
        }
        self.tick(host);
        true
    }

    /// React to a scroll event from `origin`
    ///
    /// Only the group bound to that surface is evaluated. Returns the number
    /// of elements activated.
    pub fn handle_scroll<H: LazyHost<Node = N>>(&mut self, host: &mut H, origin: ScrollTarget<N>) -> usize {
        let Some(key) = self.key_for(host, origin) else {
            tracing::trace!("Scroll from untracked container {:?}", origin);
            return 0;
        };
        let Some(group) = self.index.get(&key) else {
            return 0;
        };
        if group.listener.is_none() {
            return 0;
        }
        // A stale id copied onto some other element must not trigger the group.
        if matches!(key, ContainerKey::Named(_)) && group.target != origin {
            return 0;
        }
        evaluate_group(host, group, &self.config)
    }

    /// Whether a poll is scheduled
    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    /// Number of scroll groups
    pub fn group_count(&self) -> usize {
        self.index.len()
    }

    /// Number of tracked elements, activated ones included until the next rebuild
    pub fn tracked_count(&self) -> usize {
        self.index.tracked_count()
    }

    /// Container a node is tracked under
    pub fn group_of(&self, node: N) -> Option<&ContainerKey> {
        self.index.group_of(node)
    }

    fn key_for<H: DocumentHost<Node = N>>(&self, host: &H, origin: ScrollTarget<N>) -> Option<ContainerKey> {
        match origin {
            ScrollTarget::Viewport => Some(ContainerKey::Window),
            ScrollTarget::Element(node) if Some(node) == host.document_element() => {
                Some(ContainerKey::Window)
            }
            ScrollTarget::Element(node) => host
                .attribute(node, &self.config.container_id_attr)
                .map(|id| ContainerKey::Named(id.to_string())),
        }
    }

    /// Poll once and schedule the next poll
    fn tick<H: LazyHost<Node = N>>(&mut self, host: &mut H) {
        let elements = discovery::discover(host, &self.config);
        if self.poller.observe(Snapshot::capture(host, &elements)) {
            tracing::debug!("Deferred set changed: {} candidates", elements.len());
            self.rebuild(host, &elements);
        }
        self.poller.schedule(host);
    }

    /// Replace the index, rebind and sweep
    fn rebuild<H: LazyHost<Node = N>>(&mut self, host: &mut H, elements: &[TrackedElement<N>]) -> usize {
        if elements.is_empty() {
            binding::unbind_all(host, &mut self.index);
            self.index = GroupIndex::new();
            return 0;
        }

        // Fully built before it replaces the live index.
        let mut next = GroupIndex::build(host, elements, &mut self.ids, &self.config);
        binding::unbind_all(host, &mut self.index);
        binding::bind_all(host, &mut next);
        self.index = next;

        let activated: usize = self
            .index
            .groups()
            .iter()
            .map(|group| evaluate_group(host, group, &self.config))
            .sum();
        if activated > 0 {
            tracing::debug!("Sweep activated {} elements", activated);
            // Activation rewrites markup; the next poll must not see it as a change.
            self.remember_remaining(host);
        }
        activated
    }

    /// Snapshot the candidates left after a sweep activated some
    fn remember_remaining<H: LazyHost<Node = N>>(&mut self, host: &mut H) {
        let remaining = discovery::discover(host, &self.config);
        if remaining.is_empty() {
            binding::unbind_all(host, &mut self.index);
            self.index = GroupIndex::new();
        }
        self.poller.remember(Snapshot::capture(host, &remaining));
    }
}

/// Activate every still-deferred element of a group that is now visible
fn evaluate_group<H: DocumentHost>(host: &mut H, group: &ScrollGroup<H::Node>, config: &LazyConfig) -> usize {
    let mut activated = 0;
    for &node in &group.elements {
        if !is_deferred(host, node, config) {
            continue;
        }
        if geometry::is_visible(host, node, group.target) && activation::activate(host, node, config) {
            activated += 1;
        }
    }
    activated
}
