//! Change tracking: classifies ontology edits into rule and data staleness
//!
//! Staleness is kept as two generation counters per stage under one lock.
//! Every relevant change bumps the pending generation; a flush stage takes a
//! ticket for the generation it is about to rebuild and commits it only
//! after the stage succeeds. A change that lands while the stage is running
//! bumps the generation again, so the commit leaves the stage stale.

use orbweaver_core::ontology::OntologyChange;
use orbweaver_core::owl::{Axiom, AxiomCategory};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Combined staleness of both flush stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Staleness {
    Clean,
    /// Only assertional data needs re-chaining
    DataStale,
    /// Rules must be regenerated, and the data re-chained with them
    AllStale,
}

/// Flush stage a ticket belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Rules,
    Data,
}

/// Claim on one stage's pending generation, committed after the stage succeeds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "an uncommitted ticket leaves its stage stale"]
pub struct StaleTicket {
    stage: Stage,
    generation: u64,
}

impl StaleTicket {
    pub fn stage(&self) -> Stage {
        self.stage
    }
}

/// Edits drained by a flush
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingChanges {
    pub changes: Vec<OntologyChange>,
    pub additions: Vec<Axiom>,
    pub removals: Vec<Axiom>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Generations {
    pending: u64,
    committed: u64,
}

impl Generations {
    fn stale() -> Self {
        Self { pending: 1, committed: 0 }
    }

    fn is_stale(&self) -> bool {
        self.pending > self.committed
    }

    fn bump(&mut self) {
        self.pending += 1;
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    rules: Generations,
    data: Generations,
    changes: Vec<OntologyChange>,
    additions: Vec<Axiom>,
    removals: Vec<Axiom>,
}

#[derive(Debug)]
pub struct ChangeTracker {
    state: Mutex<TrackerState>,
}

impl ChangeTracker {
    /// Both stages start stale; nothing has been materialized yet
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TrackerState {
                rules: Generations::stale(),
                data: Generations::stale(),
                ..TrackerState::default()
            }),
        }
    }

    /// Classify one change. Import and terminology changes stale both stages,
    /// assertional changes only the data stage. Non-logical axioms are
    /// recorded but stale nothing.
    pub fn record_change(&self, change: &OntologyChange) {
        let mut state = self.state.lock();
        Self::record_locked(&mut state, change);
    }

    pub fn record_changes(&self, changes: &[OntologyChange]) {
        let mut state = self.state.lock();
        for change in changes {
            Self::record_locked(&mut state, change);
        }
        debug!(changes = changes.len(), staleness = ?Self::staleness_locked(&state), "recorded ontology changes");
    }

    fn record_locked(state: &mut TrackerState, change: &OntologyChange) {
        state.changes.push(change.clone());
        match change {
            OntologyChange::AddImport(_) | OntologyChange::RemoveImport(_) => {
                state.rules.bump();
                state.data.bump();
            }
            OntologyChange::AddAxiom(axiom) | OntologyChange::RemoveAxiom(axiom) => {
                if change.is_add_axiom() {
                    state.additions.push(axiom.clone());
                } else {
                    state.removals.push(axiom.clone());
                }
                match axiom.category() {
                    AxiomCategory::Terminology => {
                        state.rules.bump();
                        state.data.bump();
                    }
                    AxiomCategory::Assertional => state.data.bump(),
                    AxiomCategory::NonLogical => {}
                }
            }
        }
    }

    pub fn staleness(&self) -> Staleness {
        Self::staleness_locked(&self.state.lock())
    }

    fn staleness_locked(state: &TrackerState) -> Staleness {
        if state.rules.is_stale() {
            Staleness::AllStale
        } else if state.data.is_stale() {
            Staleness::DataStale
        } else {
            Staleness::Clean
        }
    }

    pub fn is_rules_stale(&self) -> bool {
        self.state.lock().rules.is_stale()
    }

    pub fn is_data_stale(&self) -> bool {
        self.state.lock().data.is_stale()
    }

    /// A ticket for the pending rules generation, if the rules are stale
    pub fn take_rules_stale(&self) -> Option<StaleTicket> {
        let state = self.state.lock();
        state.rules.is_stale().then(|| StaleTicket {
            stage: Stage::Rules,
            generation: state.rules.pending,
        })
    }

    /// A ticket for the pending data generation, if the data is stale
    pub fn take_data_stale(&self) -> Option<StaleTicket> {
        let state = self.state.lock();
        state.data.is_stale().then(|| StaleTicket {
            stage: Stage::Data,
            generation: state.data.pending,
        })
    }

    /// Mark the ticket's generation as rebuilt. The stage reads clean only
    /// if no change arrived after the ticket was taken.
    pub fn commit(&self, ticket: StaleTicket) {
        let mut state = self.state.lock();
        let generations = match ticket.stage {
            Stage::Rules => &mut state.rules,
            Stage::Data => &mut state.data,
        };
        generations.committed = generations.committed.max(ticket.generation);
        debug!(stage = ?ticket.stage, generation = ticket.generation, still_stale = generations.is_stale(), "committed stage");
    }

    /// Take and clear every pending edit in one step
    pub fn drain_pending(&self) -> PendingChanges {
        let mut state = self.state.lock();
        PendingChanges {
            changes: std::mem::take(&mut state.changes),
            additions: std::mem::take(&mut state.additions),
            removals: std::mem::take(&mut state.removals),
        }
    }

    pub fn pending_changes(&self) -> Vec<OntologyChange> {
        self.state.lock().changes.clone()
    }

    pub fn pending_axiom_additions(&self) -> Vec<Axiom> {
        self.state.lock().additions.clone()
    }

    pub fn pending_axiom_removals(&self) -> Vec<Axiom> {
        self.state.lock().removals.clone()
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}
