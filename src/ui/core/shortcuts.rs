//! Per-node shortcut tables.
//!
//! A table is a fixed inline array so lookups on the input path never touch
//! the allocator. Registration overwrites an existing key in place; a new key
//! arriving at a full table is dropped.

use super::behavior::Outcome;
use super::desktop::Desktop;
use super::id::NodeId;
use crate::core::event::{Key, KeyCode};

pub const MAX_SHORTCUTS: usize = 32;

/// Handlers get the desktop, the node whose table matched, and the key.
pub type ShortcutHandler = fn(&mut Desktop, NodeId, Key) -> Outcome;

#[derive(Clone, Copy)]
pub struct ShortcutTable {
    entries: [Option<(Key, ShortcutHandler)>; MAX_SHORTCUTS],
    len: usize,
}

impl ShortcutTable {
    pub const fn new() -> Self {
        Self {
            entries: [None; MAX_SHORTCUTS],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == MAX_SHORTCUTS
    }

    pub fn lookup(&self, key: &Key) -> Option<ShortcutHandler> {
        self.entries[..self.len]
            .iter()
            .flatten()
            .find(|(k, _)| k == key)
            .map(|(_, h)| *h)
    }

    pub fn contains(&self, key: &Key) -> bool {
        self.lookup(key).is_some()
    }

    /// Register one binding. Returns `false` if it was dropped.
    pub fn insert(&mut self, key: Key, handler: ShortcutHandler) -> bool {
        let existing = self.entries[..self.len]
            .iter()
            .position(|e| matches!(e, Some((k, _)) if *k == key));
        if let Some(idx) = existing {
            self.entries[idx] = Some((key, handler));
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.entries[self.len] = Some((key, handler));
        self.len += 1;
        true
    }

    /// Register a batch; returns how many bindings were dropped.
    pub fn extend(&mut self, bindings: &[(Key, ShortcutHandler)]) -> usize {
        bindings
            .iter()
            .filter(|(key, handler)| !self.insert(*key, *handler))
            .count()
    }

    pub fn keys(&self) -> impl Iterator<Item = Key> + '_ {
        self.entries[..self.len].iter().flatten().map(|(k, _)| *k)
    }
}

impl Default for ShortcutTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ShortcutTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}

pub fn exit_next(_desk: &mut Desktop, _id: NodeId, _key: Key) -> Outcome {
    Outcome::ExitNext
}

pub fn exit_prev(_desk: &mut Desktop, _id: NodeId, _key: Key) -> Outcome {
    Outcome::ExitPrev
}

/// Navigation every node starts with.
pub const DEFAULT_NAVIGATION: [(Key, ShortcutHandler); 7] = [
    (Key::simple(KeyCode::Tab), exit_next),
    (Key::simple(KeyCode::Enter), exit_next),
    (Key::simple(KeyCode::Down), exit_next),
    (Key::simple(KeyCode::Right), exit_next),
    (Key::simple(KeyCode::BackTab), exit_prev),
    (Key::simple(KeyCode::Left), exit_prev),
    (Key::simple(KeyCode::Up), exit_prev),
];

#[cfg(test)]
#[path = "../../../tests/unit/ui/core/shortcuts.rs"]
mod tests;
