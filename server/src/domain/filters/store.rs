//! Filter state store
//!
//! Holds the single active [`FilterState`] and replaces it atomically, one
//! group at a time. Every commit bumps the revision and is published on a
//! watch channel.

use std::collections::BTreeSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;

use super::schema::{Appearance, FilterError, FilterState, OtherTag, PriceFilter, VerificationTag};

/// Top-level filter groups, each edited and applied independently
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterGroup {
    Gender,
    Appearance,
    District,
    Price,
    Services,
    Verification,
    Other,
    Outcall,
}

impl FilterGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::Appearance => "appearance",
            Self::District => "district",
            Self::Price => "price",
            Self::Services => "services",
            Self::Verification => "verification",
            Self::Other => "other",
            Self::Outcall => "outcall",
        }
    }
}

/// Fully formed replacement value for one group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupChange {
    Gender(BTreeSet<String>),
    Appearance(Appearance),
    District(BTreeSet<String>),
    Price(PriceFilter),
    Services(BTreeSet<String>),
    Verification(BTreeSet<VerificationTag>),
    Other(BTreeSet<OtherTag>),
    Outcall(bool),
}

impl GroupChange {
    /// Current value of `group` in `state`
    pub fn of(state: &FilterState, group: FilterGroup) -> Self {
        match group {
            FilterGroup::Gender => Self::Gender(state.gender.clone()),
            FilterGroup::Appearance => Self::Appearance(state.appearance.clone()),
            FilterGroup::District => Self::District(state.district.clone()),
            FilterGroup::Price => Self::Price(state.price),
            FilterGroup::Services => Self::Services(state.services.clone()),
            FilterGroup::Verification => Self::Verification(state.verification.clone()),
            FilterGroup::Other => Self::Other(state.other.clone()),
            FilterGroup::Outcall => Self::Outcall(state.outcall),
        }
    }

    pub fn group(&self) -> FilterGroup {
        match self {
            Self::Gender(_) => FilterGroup::Gender,
            Self::Appearance(_) => FilterGroup::Appearance,
            Self::District(_) => FilterGroup::District,
            Self::Price(_) => FilterGroup::Price,
            Self::Services(_) => FilterGroup::Services,
            Self::Verification(_) => FilterGroup::Verification,
            Self::Other(_) => FilterGroup::Other,
            Self::Outcall(_) => FilterGroup::Outcall,
        }
    }

    /// Add `tag` if absent, remove it if present.
    ///
    /// Returns whether the tag is present afterwards. Only set groups can be
    /// toggled; enum-backed groups reject tags outside their vocabulary.
    pub fn toggle(&mut self, tag: &str) -> Result<bool, FilterError> {
        match self {
            Self::Gender(set) | Self::District(set) | Self::Services(set) => {
                Ok(toggle_in(set, tag.to_string()))
            }
            Self::Verification(set) => Ok(toggle_in(set, tag.parse()?)),
            Self::Other(set) => Ok(toggle_in(set, tag.parse()?)),
            Self::Appearance(_) | Self::Price(_) | Self::Outcall(_) => {
                Err(FilterError::NotToggleable(self.group().as_str()))
            }
        }
    }
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, tag: T) -> bool {
    if set.remove(&tag) {
        false
    } else {
        set.insert(tag);
        true
    }
}

impl FilterState {
    /// Copy of this state with exactly one group replaced
    pub fn with(&self, change: GroupChange) -> FilterState {
        let mut next = self.clone();
        match change {
            GroupChange::Gender(v) => next.gender = v,
            GroupChange::Appearance(v) => next.appearance = v,
            GroupChange::District(v) => next.district = v,
            GroupChange::Price(v) => next.price = v,
            GroupChange::Services(v) => next.services = v,
            GroupChange::Verification(v) => next.verification = v,
            GroupChange::Other(v) => next.other = v,
            GroupChange::Outcall(v) => next.outcall = v,
        }
        next
    }
}

/// A committed state together with its commit number
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub revision: u64,
    pub state: Arc<FilterState>,
}

struct Inner {
    state: Arc<FilterState>,
    revision: u64,
    /// Bumped by `reset`; drafts opened under an older epoch are discarded
    epoch: u64,
}

pub struct FilterStore {
    inner: Mutex<Inner>,
    tx: watch::Sender<Snapshot>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterStore {
    pub fn new() -> Self {
        let state = Arc::new(FilterState::default());
        let (tx, _) = watch::channel(Snapshot {
            revision: 0,
            state: state.clone(),
        });
        Self {
            inner: Mutex::new(Inner {
                state,
                revision: 0,
                epoch: 0,
            }),
            tx,
        }
    }

    pub fn current(&self) -> Snapshot {
        let inner = self.inner.lock();
        Snapshot {
            revision: inner.revision,
            state: inner.state.clone(),
        }
    }

    /// Receiver observing every committed snapshot (latest value wins)
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.tx.subscribe()
    }

    /// Replace one group and publish the result.
    ///
    /// Always commits, even when the value is unchanged.
    pub fn apply_group(&self, change: GroupChange) -> Snapshot {
        let mut inner = self.inner.lock();
        let next = inner.state.with(change);
        self.commit_locked(&mut inner, next)
    }

    /// Restore the default state and discard any open drafts
    pub fn reset(&self) -> Snapshot {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        self.commit_locked(&mut inner, FilterState::default())
    }

    /// Open a local editing copy of one group
    pub fn draft(&self, group: FilterGroup) -> GroupDraft {
        let inner = self.inner.lock();
        GroupDraft {
            change: GroupChange::of(&inner.state, group),
            epoch: inner.epoch,
        }
    }

    fn commit_locked(&self, inner: &mut Inner, next: FilterState) -> Snapshot {
        inner.revision += 1;
        inner.state = Arc::new(next);
        let snapshot = Snapshot {
            revision: inner.revision,
            state: inner.state.clone(),
        };
        // Sent under the lock so subscribers never observe revisions out of order
        self.tx.send_replace(snapshot.clone());
        tracing::trace!(revision = snapshot.revision, "Filter state committed");
        snapshot
    }
}

/// Group-local edits that stay invisible until committed
#[derive(Debug, Clone)]
pub struct GroupDraft {
    change: GroupChange,
    epoch: u64,
}

impl GroupDraft {
    pub fn group(&self) -> FilterGroup {
        self.change.group()
    }

    pub fn value(&self) -> &GroupChange {
        &self.change
    }

    pub fn toggle(&mut self, tag: &str) -> Result<bool, FilterError> {
        self.change.toggle(tag)
    }

    /// Replace the draft value; it must belong to the same group
    pub fn set(&mut self, change: GroupChange) -> Result<(), FilterError> {
        if change.group() != self.group() {
            return Err(FilterError::GroupMismatch {
                expected: self.group().as_str(),
                actual: change.group().as_str(),
            });
        }
        self.change = change;
        Ok(())
    }

    /// Apply the draft to the store.
    ///
    /// Returns `None` when the store was reset after this draft was opened.
    pub fn commit(self, store: &FilterStore) -> Option<Snapshot> {
        let mut inner = store.inner.lock();
        if inner.epoch != self.epoch {
            tracing::debug!(
                group = self.group().as_str(),
                "Discarding draft opened before reset"
            );
            return None;
        }
        let next = inner.state.with(self.change);
        Some(store.commit_locked(&mut inner, next))
    }
}
