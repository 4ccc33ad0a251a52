use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-lifetime usage counters. Values only grow until restart.
#[derive(Debug, Default)]
pub struct Metrics {
    agent_invocations: AtomicU64,
    tool_invocations: AtomicU64,
    searches_performed: AtomicU64,
    items_added: AtomicU64,
    recommendations_generated: AtomicU64,
}

/// Point-in-time copy of [`Metrics`] for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub agent_invocations: u64,
    pub tool_invocations: u64,
    pub searches_performed: u64,
    pub items_added: u64,
    pub recommendations_generated: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A delegation to the general-purpose assistant
    pub fn record_agent_invocation(&self) {
        self.agent_invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search(&self) {
        self.tool_invocations.fetch_add(1, Ordering::Relaxed);
        self.searches_performed.fetch_add(1, Ordering::Relaxed);
    }

    /// A library add attempt; only new entries count as added
    pub fn record_add(&self, inserted: bool) {
        self.tool_invocations.fetch_add(1, Ordering::Relaxed);
        if inserted {
            self.items_added.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_recommendation(&self) {
        self.tool_invocations.fetch_add(1, Ordering::Relaxed);
        self.recommendations_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_library_listing(&self) {
        self.tool_invocations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            agent_invocations: self.agent_invocations.load(Ordering::Relaxed),
            tool_invocations: self.tool_invocations.load(Ordering::Relaxed),
            searches_performed: self.searches_performed.load(Ordering::Relaxed),
            items_added: self.items_added.load(Ordering::Relaxed),
            recommendations_generated: self.recommendations_generated.load(Ordering::Relaxed),
        }
    }
}
