//! Counters over query activity, shared by every agent of a society.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct QueryStats {
    top_level_queries: AtomicU64,
    delegations: AtomicU64,
    cross_agent_calls: AtomicU64,
    memo_hits: AtomicU64,
    cycle_borrows: AtomicU64,
}

/// Point-in-time copy of [`QueryStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryStatsSnapshot {
    pub top_level_queries: u64,
    /// Every `query` call issued while resolving a body term.
    pub delegations: u64,
    /// Delegations whose candidate was not the asking agent.
    pub cross_agent_calls: u64,
    pub memo_hits: u64,
    pub cycle_borrows: u64,
}

impl QueryStats {
    pub fn record_top_level(&self) {
        self.top_level_queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delegation(&self, cross_agent: bool) {
        self.delegations.fetch_add(1, Ordering::Relaxed);
        if cross_agent {
            self.cross_agent_calls.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_memo_hit(&self) {
        self.memo_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cycle_borrow(&self) {
        self.cycle_borrows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> QueryStatsSnapshot {
        QueryStatsSnapshot {
            top_level_queries: self.top_level_queries.load(Ordering::Relaxed),
            delegations: self.delegations.load(Ordering::Relaxed),
            cross_agent_calls: self.cross_agent_calls.load(Ordering::Relaxed),
            memo_hits: self.memo_hits.load(Ordering::Relaxed),
            cycle_borrows: self.cycle_borrows.load(Ordering::Relaxed),
        }
    }
}
