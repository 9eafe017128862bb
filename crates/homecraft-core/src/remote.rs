//! # Remote Collections
//!
//! One generic lifecycle for every server-backed resource: products,
//! services, bookings and orders all run their network operations through
//! the same three-phase reducer.
//!
//! ## Three-Phase Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     RemoteCollection<E>                                 │
//! │                                                                         │
//! │   begin(op) ──► Ticket { seq: n }        phase = Loading               │
//! │                                          success = false (mutations)   │
//! │        │                                                                │
//! │        │   ... network round-trip ...                                   │
//! │        ▼                                                                │
//! │   complete(ticket, completion)                                          │
//! │        │                                                                │
//! │        ├── ticket.seq != latest issued ──► dropped, returns false       │
//! │        │                                                                │
//! │        ├── Listed(items)   ──► items replaced          phase = Loaded  │
//! │        ├── Fetched(e)      ──► selected = e            phase = Loaded  │
//! │        ├── Created(e)      ──► appended, success       phase = Loaded  │
//! │        ├── Updated(e)      ──► first id match swapped, success         │
//! │        ├── Deleted(id)     ──► every id match removed, success         │
//! │        └── Rejected(msg)   ──► phase = Failed(msg), success stays off  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sequencing
//! Each collection numbers its requests. Only the most recently issued
//! ticket may complete, so a slow response to an earlier request can never
//! overwrite the state produced by a later one.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Entity
// =============================================================================

/// A record that lives in a backend collection.
pub trait Entity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + 'static {
    /// Singular noun used in messages ("product").
    const KIND: &'static str;

    /// Collection path segment and plural noun ("products").
    const COLLECTION: &'static str;

    /// Whether a fulfilled update also replaces the selected record.
    const SELECT_ON_UPDATE: bool = false;

    /// Server-assigned identifier.
    fn id(&self) -> &str;

    /// Message stored when an operation fails without a server message.
    fn fallback_message(op: Operation) -> String {
        let subject = match op {
            Operation::List => Self::COLLECTION,
            _ => Self::KIND,
        };
        format!("Failed to {} {}", op.verb(), subject)
    }
}

// =============================================================================
// Operations & Phases
// =============================================================================

/// The five operations a collection supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Create, update and delete carry a success flag; reads do not.
    pub fn is_mutation(self) -> bool {
        matches!(
            self,
            Operation::Create | Operation::Update | Operation::Delete
        )
    }

    pub fn verb(self) -> &'static str {
        match self {
            Operation::List | Operation::Get => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// Request status of a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    /// Nothing requested yet, or status was reset.
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Last request failed with this message.
    Failed(String),
}

/// Receipt for a pending operation. Hand it back to
/// [`RemoteCollection::complete`] together with the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    op: Operation,
}

impl Ticket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn op(&self) -> Operation {
        self.op
    }
}

/// Outcome of a network operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion<E> {
    Listed(Vec<E>),
    Fetched(E),
    Created(E),
    Updated(E),
    /// Id of the removed record.
    Deleted(String),
    /// Message already resolved (server message or fallback).
    Rejected(String),
}

// =============================================================================
// RemoteCollection
// =============================================================================

/// In-memory mirror of one backend collection.
#[derive(Debug, Clone)]
pub struct RemoteCollection<E> {
    items: Vec<E>,
    selected: Option<E>,
    latest: Option<E>,
    phase: Phase,
    success: bool,
    seq: u64,
}

impl<E> Default for RemoteCollection<E> {
    fn default() -> Self {
        RemoteCollection {
            items: Vec::new(),
            selected: None,
            latest: None,
            phase: Phase::Idle,
            success: false,
            seq: 0,
        }
    }
}

impl<E: Entity> RemoteCollection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    /// Pending transition. Returns the ticket the outcome must present.
    pub fn begin(&mut self, op: Operation) -> Ticket {
        self.seq += 1;
        self.phase = Phase::Loading;
        if op.is_mutation() {
            self.success = false;
        }
        Ticket { seq: self.seq, op }
    }

    /// Fulfilled/rejected transition.
    ///
    /// Returns `false` (and changes nothing) when `ticket` is not the most
    /// recently issued one.
    pub fn complete(&mut self, ticket: Ticket, completion: Completion<E>) -> bool {
        if ticket.seq != self.seq {
            return false;
        }

        match completion {
            Completion::Listed(items) => {
                self.items = items;
            }
            Completion::Fetched(entity) => {
                self.selected = Some(entity);
            }
            Completion::Created(entity) => {
                self.items.push(entity.clone());
                self.latest = Some(entity);
                self.success = true;
            }
            Completion::Updated(entity) => {
                // A miss leaves items untouched but still counts as success.
                if let Some(slot) = self.items.iter_mut().find(|i| i.id() == entity.id()) {
                    *slot = entity.clone();
                }
                if E::SELECT_ON_UPDATE {
                    self.selected = Some(entity);
                }
                self.success = true;
            }
            Completion::Deleted(id) => {
                self.items.retain(|i| i.id() != id);
                self.success = true;
            }
            Completion::Rejected(message) => {
                self.phase = Phase::Failed(message);
                return true;
            }
        }

        self.phase = Phase::Loaded;
        true
    }

    /// Clears the transient mutation success flag.
    pub fn reset_success(&mut self) {
        self.success = false;
    }

    /// Clears success and any error, leaving data in place.
    pub fn reset_status(&mut self) {
        self.success = false;
        if matches!(self.phase, Phase::Failed(_)) {
            self.phase = Phase::Idle;
        }
    }

    /// Forgets the record produced by the last create.
    pub fn clear_latest(&mut self) {
        self.latest = None;
    }

    /// Drops all data and status. Tickets issued before the clear become
    /// stale.
    pub fn clear(&mut self) {
        self.seq += 1;
        self.items.clear();
        self.selected = None;
        self.latest = None;
        self.phase = Phase::Idle;
        self.success = false;
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn selected(&self) -> Option<&E> {
        self.selected.as_ref()
    }

    /// Record returned by the most recent successful create.
    pub fn latest(&self) -> Option<&E> {
        self.latest.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
