//! Per-command effect sets and the provider interface that produces them.

use crate::key::{IStateKey, StateKey};
use smallvec::SmallVec;

bitflags::bitflags! {
    /// Retention flags of a [`CmdBehaviour`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct BehaviourFlags: u8 {
        /// Effects are known to be incomplete; keep the command unconditionally.
        const KEEP_ALIVE = 0b0000_0001;
        /// The provider failed while classifying the command.
        const ABORTED    = 0b0000_0010;

        const FORCED     = 0b0000_0011;
    }
}

pub type KeyList<K> = SmallVec<[K; 4]>;

/// Read/write footprint of a single command.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CmdBehaviour<K = StateKey> {
    pub reads: KeyList<K>,
    pub writes: KeyList<K>,
    /// Read-then-write of the same key.
    pub modifies: KeyList<K>,
    pub flags: BehaviourFlags,
}

impl<K> Default for CmdBehaviour<K> {
    fn default() -> Self {
        Self {
            reads: SmallVec::new(),
            writes: SmallVec::new(),
            modifies: SmallVec::new(),
            flags: BehaviourFlags::empty(),
        }
    }
}

impl<K: IStateKey> CmdBehaviour<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behaviour of a command the provider does not model.
    pub fn keep_alive() -> Self {
        Self { flags: BehaviourFlags::KEEP_ALIVE, ..Self::default() }
    }
    /// Behaviour of a command whose classification failed.
    pub fn aborted() -> Self {
        Self { flags: BehaviourFlags::ABORTED, ..Self::default() }
    }

    pub fn read(&mut self, key: K) -> &mut Self {
        self.reads.push(key);
        self
    }
    pub fn write(&mut self, key: K) -> &mut Self {
        self.writes.push(key);
        self
    }
    pub fn modify(&mut self, key: K) -> &mut Self {
        self.modifies.push(key);
        self
    }
    pub fn set_keep_alive(&mut self) -> &mut Self {
        self.flags |= BehaviourFlags::KEEP_ALIVE;
        self
    }
    pub fn set_aborted(&mut self) -> &mut Self {
        self.flags |= BehaviourFlags::ABORTED;
        self
    }

    pub fn with_read(mut self, key: K) -> Self {
        self.reads.push(key);
        self
    }
    pub fn with_write(mut self, key: K) -> Self {
        self.writes.push(key);
        self
    }
    pub fn with_modify(mut self, key: K) -> Self {
        self.modifies.push(key);
        self
    }

    pub fn is_keep_alive(&self) -> bool {
        self.flags.contains(BehaviourFlags::KEEP_ALIVE)
    }
    pub fn is_aborted(&self) -> bool {
        self.flags.contains(BehaviourFlags::ABORTED)
    }
    /// Keep-alive and aborted commands are both retained and seed the mark
    /// phase with their own reads.
    pub fn is_forced(&self) -> bool {
        self.flags.intersects(BehaviourFlags::FORCED)
    }

    /// Keys whose prior value this command observes: `reads ∪ modifies`.
    pub fn observed_keys(&self) -> impl Iterator<Item = &K> {
        self.reads.iter().chain(self.modifies.iter())
    }
    /// Keys this command leaves a new value in: `writes ∪ modifies`.
    pub fn written_keys(&self) -> impl Iterator<Item = &K> {
        self.writes.iter().chain(self.modifies.iter())
    }
}

/// Classifies commands into [`CmdBehaviour`]s. API-specific and pluggable.
///
/// `behaviour` must be total: a command the provider cannot model reports
/// [`CmdBehaviour::keep_alive`], a command whose simulation failed reports
/// [`CmdBehaviour::aborted`]. Reporting a coarser key or an extra read is
/// always safe; missing a read or a durable write is a provider bug.
pub trait IBehaviourProvider<C> {
    type Key: IStateKey;
    type State;

    /// Footprint of `cmd` given the state snapshot right before it.
    fn behaviour(&self, cmd: &C, state_before: &Self::State) -> CmdBehaviour<Self::Key>;

    /// Advances the snapshot past `cmd`. Only the driver loop calls this.
    fn apply(&self, cmd: &C, state: &mut Self::State);
}
