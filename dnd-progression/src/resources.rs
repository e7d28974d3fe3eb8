//! Consumable resource ledger.
//!
//! Limited-use class features, Focus Points and spell slots all live in one
//! [`ResourceTracker`]. Each entry knows which rest refills it; nothing else
//! couples entries together.

use crate::error::{ProgressionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a resource refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestType {
    ShortRest,
    LongRest,
    /// Once per in-game day, independent of resting.
    Daily,
}

impl RestType {
    pub fn name(&self) -> &'static str {
        match self {
            RestType::ShortRest => "Short Rest",
            RestType::LongRest => "Long Rest",
            RestType::Daily => "Daily",
        }
    }

    /// Whether an entry refilled by `self` is reset by the `trigger` event.
    ///
    /// A long rest includes everything a short rest refreshes.
    pub fn resets_on(&self, trigger: RestType) -> bool {
        match (self, trigger) {
            (RestType::ShortRest, RestType::ShortRest | RestType::LongRest) => true,
            (RestType::LongRest, RestType::LongRest) => true,
            (RestType::Daily, RestType::Daily) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Key of a tracked resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceId {
    /// Uses of a named feature (Rage, Second Wind, Lucky...).
    Feature(String),
    /// The Monk's Focus Point pool.
    FocusPoints,
    /// Spell slots of the given level (1-9).
    SpellSlot(u8),
    /// Warlock Pact Magic slots of the given level.
    PactSlot(u8),
}

impl ResourceId {
    pub fn feature(name: impl Into<String>) -> Self {
        ResourceId::Feature(name.into())
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceId::Feature(name) => write!(f, "{name}"),
            ResourceId::FocusPoints => write!(f, "Focus Points"),
            ResourceId::SpellSlot(level) => write!(f, "Level {level} spell slot"),
            ResourceId::PactSlot(level) => write!(f, "Level {level} pact slot"),
        }
    }
}

/// One tracked resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: ResourceId,
    current: u8,
    maximum: u8,
    pub rest: RestType,
}

impl ResourceEntry {
    pub fn new(id: ResourceId, maximum: u8, rest: RestType) -> Self {
        Self {
            id,
            current: maximum,
            maximum,
            rest,
        }
    }

    pub fn current(&self) -> u8 {
        self.current
    }

    pub fn maximum(&self) -> u8 {
        self.maximum
    }

    pub fn is_exhausted(&self) -> bool {
        self.current == 0
    }
}

/// Ledger of every consumable resource a character has.
///
/// Entries are kept sorted by id, so the ledger for a given set of features
/// and levels is the same however it was reached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTracker {
    entries: Vec<ResourceEntry>,
}

impl ResourceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a resource, or update the maximum of an existing one.
    ///
    /// Existing entries keep their spent uses: growing the maximum by N grants
    /// N extra current uses, shrinking it clamps current uses.
    pub fn track(&mut self, id: ResourceId, maximum: u8, rest: RestType) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            if maximum > entry.maximum {
                entry.current = entry.current.saturating_add(maximum - entry.maximum);
            }
            entry.maximum = maximum;
            entry.current = entry.current.min(maximum);
            entry.rest = rest;
        } else {
            let idx = self.entries.partition_point(|e| e.id < id);
            self.entries.insert(idx, ResourceEntry::new(id, maximum, rest));
        }
    }

    /// Stop tracking a resource.
    pub fn remove(&mut self, id: &ResourceId) -> Option<ResourceEntry> {
        let idx = self.entries.iter().position(|e| &e.id == id)?;
        Some(self.entries.remove(idx))
    }

    /// Drop every entry the predicate rejects.
    pub fn retain(&mut self, mut keep: impl FnMut(&ResourceEntry) -> bool) {
        self.entries.retain(|e| keep(e));
    }

    pub fn get(&self, id: &ResourceId) -> Option<&ResourceEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ResourceId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spend one use. Returns the uses remaining.
    ///
    /// Fails with `ResourceExhausted` and leaves the entry untouched when no
    /// uses remain.
    pub fn use_resource(&mut self, id: &ResourceId) -> Result<u8> {
        self.spend(id, 1)
    }

    /// Spend several uses at once (Focus Points, sorcery points).
    pub fn spend(&mut self, id: &ResourceId, amount: u8) -> Result<u8> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| ProgressionError::UnknownResource(id.to_string()))?;

        if entry.current < amount || entry.current == 0 {
            tracing::debug!(resource = %id, current = entry.current, "resource exhausted");
            return Err(ProgressionError::ResourceExhausted(id.to_string()));
        }

        entry.current -= amount;
        Ok(entry.current)
    }

    /// Give back uses, clamped at the maximum. Returns the new current value.
    pub fn restore(&mut self, id: &ResourceId, amount: u8) -> Result<u8> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| ProgressionError::UnknownResource(id.to_string()))?;

        entry.current = entry.current.saturating_add(amount).min(entry.maximum);
        Ok(entry.current)
    }

    /// Refill every entry that the given rest resets. Returns the ids refilled.
    pub fn reset_for_rest(&mut self, trigger: RestType) -> Vec<ResourceId> {
        let mut reset = Vec::new();
        for entry in &mut self.entries {
            if entry.rest.resets_on(trigger) {
                entry.current = entry.maximum;
                reset.push(entry.id.clone());
            }
        }
        reset
    }
}
