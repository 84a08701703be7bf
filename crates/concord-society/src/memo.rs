//! Per-agent memo of delegated answers, scoped to one query context.
//!
//! Keys are `(context, queried term, candidate)`. Entries from different
//! contexts never interact; a context's entries may be released once its
//! top-level answer has been returned.
//!
//! An answer computed on one path is only reused on another when the path
//! could not have changed it. [`PathTrace`] records the terms a resolution
//! checked against its history and whether any of those checks cut a cycle.
//! Entries whose resolution cut a cycle are never committed; the others
//! replay only on paths that avoid every term they checked.
//!
//! While an agent is being asked, the slot for that key is marked in flight.
//! Callers on other threads wait for the first one and reuse its entry.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use concord_core::models::{AgentId, Answer, ArgTree, ContextId, InstantiatedTerm, Term, TruthValue};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemoKey {
    pub context: ContextId,
    pub term: Term,
    pub candidate: AgentId,
}

impl MemoKey {
    pub fn new(context: ContextId, term: Term, candidate: AgentId) -> Self {
        Self {
            context,
            term,
            candidate,
        }
    }
}

/// History checks made while resolving one term.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathTrace {
    borrowed: bool,
    visited: HashSet<Term>,
}

impl PathTrace {
    /// Note that `term` was checked against the history.
    pub fn visit(&mut self, term: &Term) {
        if !self.visited.contains(term) {
            self.visited.insert(term.clone());
        }
    }

    /// A check found its term on the path and the argument was borrowed.
    pub fn mark_borrowed(&mut self) {
        self.borrowed = true;
    }

    pub fn is_borrowed(&self) -> bool {
        self.borrowed
    }

    /// Fold in the trace of a sub-resolution.
    pub fn absorb(&mut self, other: &PathTrace) {
        self.borrowed |= other.borrowed;
        self.visited.extend(other.visited.iter().cloned());
    }

    /// Whether resolving again under `hist` would take the same decisions.
    pub fn replays_under(&self, hist: &[InstantiatedTerm]) -> bool {
        !self.borrowed
            && !self.visited.iter().any(|term| {
                hist.iter().any(|h| h.term == *term) || term.has_instantiated_term_in(hist)
            })
    }
}

/// What a candidate answered: the term it matched, its verdict, its
/// argument, and the history checks behind them.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoEntry {
    pub equivalent_term: Option<InstantiatedTerm>,
    pub truth_value: TruthValue,
    pub arg_tree: ArgTree,
    pub trace: Arc<PathTrace>,
}

impl MemoEntry {
    pub fn new(answer: Answer, trace: PathTrace) -> Self {
        Self {
            equivalent_term: answer.equivalent_term,
            truth_value: answer.truth_value,
            arg_tree: answer.arg_tree,
            trace: Arc::new(trace),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A key one thread is currently computing.
#[derive(Debug)]
pub struct Flight {
    owner: ThreadId,
    outcome: Mutex<Option<Option<MemoEntry>>>,
    landed: Condvar,
}

impl Flight {
    fn new() -> Self {
        Self {
            owner: thread::current().id(),
            outcome: Mutex::new(None),
            landed: Condvar::new(),
        }
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    fn land(&self, entry: Option<MemoEntry>) {
        *lock(&self.outcome) = Some(entry);
        self.landed.notify_all();
    }

    /// Block until the owner lands. `None` when it produced nothing reusable.
    pub fn wait(&self) -> Option<MemoEntry> {
        let mut outcome = lock(&self.outcome);
        loop {
            if let Some(landed) = outcome.as_ref() {
                return landed.clone();
            }
            outcome = self
                .landed
                .wait(outcome)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Result of claiming a key.
#[derive(Debug)]
pub enum Claim {
    Ready(MemoEntry),
    /// Another call is computing the key.
    InFlight(Arc<Flight>),
    /// The caller computes the key and must [`MemoCache::land`] it.
    Owned(Arc<Flight>),
}

#[derive(Debug)]
enum Slot {
    Ready(MemoEntry),
    InFlight(Arc<Flight>),
}

#[derive(Debug, Default)]
pub struct MemoCache {
    entries: DashMap<MemoKey, Slot>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The committed entry for `key`, ignoring keys still in flight.
    pub fn get(&self, key: &MemoKey) -> Option<MemoEntry> {
        self.entries.get(key).and_then(|slot| match slot.value() {
            Slot::Ready(entry) => Some(entry.clone()),
            Slot::InFlight(_) => None,
        })
    }

    /// Take ownership of a vacant key, or report what occupies it.
    pub fn claim(&self, key: &MemoKey) -> Claim {
        match self.entries.entry(key.clone()) {
            Entry::Occupied(slot) => match slot.get() {
                Slot::Ready(entry) => Claim::Ready(entry.clone()),
                Slot::InFlight(flight) => Claim::InFlight(Arc::clone(flight)),
            },
            Entry::Vacant(slot) => {
                let flight = Arc::new(Flight::new());
                slot.insert(Slot::InFlight(Arc::clone(&flight)));
                Claim::Owned(flight)
            }
        }
    }

    /// Finish an owned key: commit `entry`, or free the slot when there is
    /// nothing reusable. Waiters are released either way.
    pub fn land(&self, key: &MemoKey, flight: &Arc<Flight>, entry: Option<MemoEntry>) {
        match &entry {
            Some(committed) => {
                self.entries.insert(key.clone(), Slot::Ready(committed.clone()));
            }
            None => {
                self.entries.remove_if(key, |_, slot| {
                    matches!(slot, Slot::InFlight(f) if Arc::ptr_eq(f, flight))
                });
            }
        }
        flight.land(entry);
    }

    /// Store `entry` unless the key is already committed or in flight.
    /// Returns whether it was stored.
    pub fn commit(&self, key: MemoKey, entry: MemoEntry) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Slot::Ready(entry));
                true
            }
        }
    }

    /// Drop every entry of `context`. Returns how many were removed.
    pub fn release_context(&self, context: &ContextId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|k, _| &k.context != context);
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which thread each blocked thread waits on, across a whole society.
/// A wait that would close a cycle is refused.
#[derive(Debug, Default)]
pub struct WaitGraph {
    edges: Mutex<HashMap<ThreadId, ThreadId>>,
}

impl WaitGraph {
    /// Record that the current thread waits on `owner`. `false` when `owner`
    /// is this thread or already waits on it, directly or transitively.
    pub fn enter(&self, owner: ThreadId) -> bool {
        let me = thread::current().id();
        let mut edges = lock(&self.edges);
        let mut at = owner;
        loop {
            if at == me {
                return false;
            }
            match edges.get(&at) {
                Some(next) => at = *next,
                None => break,
            }
        }
        edges.insert(me, owner);
        true
    }

    pub fn leave(&self) {
        lock(&self.edges).remove(&thread::current().id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concord_core::models::Literal;

    fn key(ctx: &str, agent: &str) -> MemoKey {
        MemoKey::new(
            ContextId::from(ctx),
            Term::pattern(Literal::positive("p")),
            AgentId::from(agent),
        )
    }

    fn entry(tv: TruthValue) -> MemoEntry {
        MemoEntry {
            equivalent_term: None,
            truth_value: tv,
            arg_tree: ArgTree::empty(),
            trace: Arc::default(),
        }
    }

    fn on_path(agent: &str, text: &str) -> InstantiatedTerm {
        let literal = text.parse::<Literal>().unwrap();
        InstantiatedTerm::new(Term::bound(agent, literal.clone()), literal, 1.0)
    }

    #[test]
    fn first_commit_wins() {
        let memo = MemoCache::new();
        assert!(memo.commit(key("q0", "A"), entry(TruthValue::True)));
        assert!(!memo.commit(key("q0", "A"), entry(TruthValue::False)));
        assert_eq!(memo.get(&key("q0", "A")).unwrap().truth_value, TruthValue::True);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn contexts_do_not_collide() {
        let memo = MemoCache::new();
        memo.commit(key("q0", "A"), entry(TruthValue::True));
        assert!(memo.get(&key("q1", "A")).is_none());
        memo.commit(key("q1", "A"), entry(TruthValue::Undefined));
        assert_eq!(memo.release_context(&ContextId::from("q0")), 1);
        assert!(memo.get(&key("q0", "A")).is_none());
        assert_eq!(memo.get(&key("q1", "A")).unwrap().truth_value, TruthValue::Undefined);
    }

    #[test]
    fn claimed_key_is_in_flight_until_landed() {
        let memo = MemoCache::new();
        let Claim::Owned(flight) = memo.claim(&key("q0", "A")) else {
            panic!("vacant key should be owned");
        };
        assert!(matches!(memo.claim(&key("q0", "A")), Claim::InFlight(_)));
        assert!(memo.get(&key("q0", "A")).is_none());
        assert!(!memo.commit(key("q0", "A"), entry(TruthValue::False)));

        memo.land(&key("q0", "A"), &flight, Some(entry(TruthValue::True)));
        assert_eq!(flight.wait().unwrap().truth_value, TruthValue::True);
        assert!(matches!(memo.claim(&key("q0", "A")), Claim::Ready(_)));
    }

    #[test]
    fn landing_nothing_frees_the_slot() {
        let memo = MemoCache::new();
        let Claim::Owned(flight) = memo.claim(&key("q0", "A")) else {
            panic!("vacant key should be owned");
        };
        memo.land(&key("q0", "A"), &flight, None);
        assert!(flight.wait().is_none());
        assert!(memo.is_empty());
    }

    #[test]
    fn waiter_on_another_thread_receives_the_landed_entry() {
        let memo = Arc::new(MemoCache::new());
        let Claim::Owned(flight) = memo.claim(&key("q0", "A")) else {
            panic!("vacant key should be owned");
        };
        let waiter = {
            let memo = Arc::clone(&memo);
            thread::spawn(move || match memo.claim(&key("q0", "A")) {
                Claim::InFlight(f) => f.wait().map(|e| e.truth_value),
                Claim::Ready(e) => Some(e.truth_value),
                Claim::Owned(_) => None,
            })
        };
        memo.land(&key("q0", "A"), &flight, Some(entry(TruthValue::Undefined)));
        assert_eq!(waiter.join().unwrap(), Some(TruthValue::Undefined));
    }

    #[test]
    fn trace_replays_only_off_its_visited_terms() {
        let mut trace = PathTrace::default();
        trace.visit(&Term::bound("A", "p".parse::<Literal>().unwrap()));
        trace.visit(&Term::bound("A", "¬p".parse::<Literal>().unwrap()));

        assert!(trace.replays_under(&[on_path("A", "s")]));
        assert!(!trace.replays_under(&[on_path("A", "s"), on_path("A", "¬p")]));

        let mut parent = PathTrace::default();
        parent.absorb(&trace);
        assert!(!parent.replays_under(&[on_path("A", "p")]));

        parent.mark_borrowed();
        assert!(parent.is_borrowed());
        assert!(!parent.replays_under(&[]));
    }

    #[test]
    fn wait_graph_refuses_self_and_cyclic_waits() {
        let graph = Arc::new(WaitGraph::default());
        let me = thread::current().id();
        assert!(!graph.enter(me));

        let other = {
            let graph = Arc::clone(&graph);
            thread::spawn(move || {
                let id = thread::current().id();
                assert!(graph.enter(me));
                id
            })
            .join()
            .unwrap()
        };
        // `other` is recorded as waiting on this thread.
        assert!(!graph.enter(other));
    }
}
