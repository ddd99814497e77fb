use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

use crate::{
    base::CmdPos,
    graph::{GraphErr, GraphRes},
    key::IStateKey,
};

/// Writers a single read depends on. Empty when the value comes from outside
/// the trace.
pub(crate) type WriterList = SmallVec<[CmdPos; 4]>;

fn too_deep<K: IStateKey>(key: &K, max_depth: usize) -> GraphErr {
    GraphErr::ParentChainTooDeep { key: format!("{key:?}"), max_depth }
}

/// Strict ancestors of `key`, nearest first.
///
/// Fails once more than `max_depth` ancestors were found: the key type either
/// has a `parent()` cycle or an absurdly deep hierarchy.
pub(super) fn ancestors_of<K: IStateKey>(key: &K, max_depth: usize) -> GraphRes<SmallVec<[K; 2]>> {
    let mut chain = SmallVec::new();
    let mut next = key.parent();
    while let Some(ancestor) = next {
        if chain.len() >= max_depth {
            return Err(too_deep(key, max_depth));
        }
        next = ancestor.parent();
        chain.push(ancestor);
    }
    Ok(chain)
}

/// Looks `key` up with `lookup`, climbing the parent chain until a writer is
/// found or the chain ends. At most `max_depth` parent steps are taken.
fn climb_parents<K: IStateKey>(
    key: &K,
    max_depth: usize,
    mut lookup: impl FnMut(&K) -> Option<CmdPos>,
) -> GraphRes<Option<CmdPos>> {
    if let Some(writer) = lookup(key) {
        return Ok(Some(writer));
    }
    let mut next = key.parent();
    let mut depth = 0;
    while let Some(ancestor) = next {
        depth += 1;
        if depth > max_depth {
            return Err(too_deep(key, max_depth));
        }
        if let Some(writer) = lookup(&ancestor) {
            return Ok(Some(writer));
        }
        next = ancestor.parent();
    }
    Ok(None)
}

/// Current writers of every key written so far.
///
/// A write to a key supersedes everything below it: the entries of its
/// descendants are dropped, so a later read of a descendant climbs up to the
/// covering write. A read of a key sees its own (or the nearest ancestor's)
/// writer plus every descendant written after that.
#[derive(Debug, Clone)]
pub(super) struct WriterTable<K> {
    last: HashMap<K, CmdPos>,
    /// Keys written below each ancestor since that ancestor was last written.
    descendants: HashMap<K, HashSet<K>>,
}

impl<K: IStateKey> WriterTable<K> {
    pub fn new() -> Self {
        Self { last: HashMap::new(), descendants: HashMap::new() }
    }

    pub fn resolve(&self, key: &K, max_depth: usize) -> GraphRes<WriterList> {
        let mut found = WriterList::new();
        found.extend(climb_parents(key, max_depth, |k| self.last.get(k).copied())?);
        if let Some(children) = self.descendants.get(key) {
            found.extend(children.iter().filter_map(|k| self.last.get(k).copied()));
        }
        Ok(found)
    }

    /// Records `writer` as the last writer of `key`, whose strict ancestors
    /// are `ancestors`. Returns the writer of `key` that was superseded.
    pub fn record(&mut self, key: K, ancestors: &[K], writer: CmdPos) -> Option<CmdPos> {
        if let Some(children) = self.descendants.get_mut(&key) {
            for child in children.drain() {
                self.last.remove(&child);
            }
        }
        for ancestor in ancestors {
            self.descendants.entry(ancestor.clone()).or_default().insert(key.clone());
        }
        self.last.insert(key, writer)
    }

    /// Keys that currently have a writer.
    pub fn len(&self) -> usize {
        self.last.len()
    }
}

/// Every writer of every key, in trace order. Lets requests ask who wrote a
/// key as of an arbitrary position after the forward pass is over, with the
/// same answer the [`WriterTable`] gave at that position.
#[derive(Debug, Clone)]
pub(crate) struct WriterHistory<K> {
    writers: HashMap<K, Vec<CmdPos>>,
    /// Every key ever written below each ancestor.
    descendants: HashMap<K, HashSet<K>>,
}

impl<K: IStateKey> WriterHistory<K> {
    pub fn new() -> Self {
        Self { writers: HashMap::new(), descendants: HashMap::new() }
    }

    pub fn record(&mut self, key: K, ancestors: &[K], writer: CmdPos) {
        for ancestor in ancestors {
            self.descendants.entry(ancestor.clone()).or_default().insert(key.clone());
        }
        let list = self.writers.entry(key).or_default();
        // a command writing the same key twice records it once.
        if list.last() != Some(&writer) {
            list.push(writer);
        }
    }

    pub fn writers_of(&self, key: &K) -> &[CmdPos] {
        self.writers.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    fn last_before(&self, key: &K, bound: CmdPos) -> Option<CmdPos> {
        let list = self.writers_of(key);
        let n = list.partition_point(|&w| w < bound);
        n.checked_sub(1).map(|i| list[i])
    }

    /// The writers a read of `key` at `bound` would have resolved to, i.e.
    /// the newest write before `bound` covering `key` (its own or an
    /// ancestor's) plus every descendant write after it that no intermediate
    /// key overwrote.
    pub fn resolve_before(&self, key: &K, bound: CmdPos, max_depth: usize) -> GraphRes<WriterList> {
        let mut covering = self.last_before(key, bound);
        for ancestor in ancestors_of(key, max_depth)? {
            covering = covering.max(self.last_before(&ancestor, bound));
        }

        let mut found: WriterList = covering.into_iter().collect();
        let Some(children) = self.descendants.get(key) else {
            return Ok(found);
        };
        for child in children {
            let Some(written) = self.last_before(child, bound) else {
                continue;
            };
            if covering.is_some_and(|c| c > written) {
                continue;
            }
            let mut shadowed = false;
            for between in ancestors_of(child, max_depth)? {
                if &between == key {
                    break;
                }
                shadowed |= self.last_before(&between, bound).is_some_and(|w| w > written);
            }
            if !shadowed {
                found.push(written);
            }
        }
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }

    pub fn resolve_last(&self, key: &K, max_depth: usize) -> GraphRes<WriterList> {
        // no trace position reaches `u32::MAX`.
        self.resolve_before(key, CmdPos(u32::MAX), max_depth)
    }
}
