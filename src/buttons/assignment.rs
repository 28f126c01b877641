//! Button → RGB LED order assignment
//!
//! Assigned buttons hold indices `0..n` with no gaps or duplicates. The map
//! is only ever rebuilt through [`LedButtonMap::reorder`], which keeps that
//! invariant; there is no way to set a single entry.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use super::ButtonId;
use crate::error::{LedConfigError, Result};

/// Mapping from button to its LED order index (`None` = no RGB LED)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LedButtonMap {
    entries: BTreeMap<ButtonId, Option<u32>>,
}

/// Ordered partitions used by the drag-and-drop lists
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ButtonViews {
    /// Unassigned buttons in catalog order
    pub available: Vec<ButtonId>,
    /// Assigned buttons sorted by LED index
    pub assigned: Vec<ButtonId>,
}

impl LedButtonMap {
    /// Every catalog button unassigned
    pub fn unassigned(catalog: &[ButtonId]) -> Self {
        Self {
            entries: catalog.iter().map(|&id| (id, None)).collect(),
        }
    }

    /// Build from a persisted map, repairing gaps and ties.
    ///
    /// Negative indices count as unassigned. Ties keep catalog order.
    pub fn from_raw<I>(raw: I, catalog: &[ButtonId]) -> Self
    where
        I: IntoIterator<Item = (ButtonId, Option<i32>)>,
    {
        let entries: BTreeMap<ButtonId, Option<u32>> = raw
            .into_iter()
            .map(|(id, index)| (id, index.and_then(|i| u32::try_from(i).ok())))
            .collect();
        let loaded = Self { entries };

        let views = loaded.derive_views(catalog);
        let repaired = loaded.reorder(&views.available, &views.assigned);

        if repaired.renumbers(&loaded) {
            warn!("Persisted LED button order was not contiguous, renumbered assigned buttons");
        }

        repaired
    }

    /// Whether any button's LED index differs from `other`. Buttons absent
    /// from either map count as unassigned.
    fn renumbers(&self, other: &Self) -> bool {
        self.entries
            .keys()
            .chain(other.entries.keys())
            .any(|&id| self.index_of(id) != other.index_of(id))
    }

    /// Stored value for a button (`None` if the button is not in the map)
    pub fn get(&self, id: ButtonId) -> Option<Option<u32>> {
        self.entries.get(&id).copied()
    }

    /// LED index of an assigned button
    pub fn index_of(&self, id: ButtonId) -> Option<u32> {
        self.entries.get(&id).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ButtonId, Option<u32>)> + '_ {
        self.entries.iter().map(|(&id, &index)| (id, index))
    }

    pub fn assigned_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// Project the map onto the catalog.
    ///
    /// Catalog buttons missing from the map are treated as available.
    pub fn derive_views(&self, catalog: &[ButtonId]) -> ButtonViews {
        let mut available = Vec::new();
        let mut assigned = Vec::new();

        for &id in catalog {
            match self.index_of(id) {
                Some(index) => assigned.push((index, id)),
                None => available.push(id),
            }
        }

        // Stable sort: equal indices stay in catalog order
        assigned.sort_by_key(|&(index, _)| index);

        ButtonViews {
            available,
            assigned: assigned.into_iter().map(|(_, id)| id).collect(),
        }
    }

    /// Rebuild the map from a user rearrangement.
    ///
    /// `new_assigned` receives indices `0..n` in order. A button listed in
    /// both partitions is assigned, a repeated button keeps its first slot,
    /// and buttons in neither list become unassigned.
    pub fn reorder(&self, new_available: &[ButtonId], new_assigned: &[ButtonId]) -> Self {
        let mut entries: BTreeMap<ButtonId, Option<u32>> =
            self.entries.keys().map(|&id| (id, None)).collect();

        for &id in new_available {
            entries.insert(id, None);
        }

        let mut seen = HashSet::new();
        let mut next = 0u32;
        for &id in new_assigned {
            if seen.insert(id) {
                entries.insert(id, Some(next));
                next += 1;
            }
        }

        Self { entries }
    }

    /// Move a button into the assigned list at `position` (clamped to the end)
    pub fn assign(&self, id: ButtonId, position: usize, catalog: &[ButtonId]) -> Self {
        let ButtonViews {
            mut available,
            mut assigned,
        } = self.derive_views(catalog);

        available.retain(|&b| b != id);
        assigned.retain(|&b| b != id);
        assigned.insert(position.min(assigned.len()), id);

        self.reorder(&available, &assigned)
    }

    /// Move a button back to the available list
    pub fn unassign(&self, id: ButtonId, catalog: &[ButtonId]) -> Self {
        let ButtonViews {
            mut available,
            mut assigned,
        } = self.derive_views(catalog);

        assigned.retain(|&b| b != id);
        if !available.contains(&id) {
            available.push(id);
        }

        self.reorder(&available, &assigned)
    }

    /// Move an assigned button from one position to another
    pub fn move_assigned(&self, from: usize, to: usize, catalog: &[ButtonId]) -> Self {
        let ButtonViews {
            available,
            mut assigned,
        } = self.derive_views(catalog);

        if from >= assigned.len() {
            return self.clone();
        }

        let id = assigned.remove(from);
        assigned.insert(to.min(assigned.len()), id);

        self.reorder(&available, &assigned)
    }

    /// Verify assigned indices are exactly `0..n`
    pub fn check_contiguity(&self) -> Result<()> {
        let mut indices: Vec<u32> = self.entries.values().filter_map(|v| *v).collect();
        indices.sort_unstable();

        for (expected, &actual) in (0u32..).zip(&indices) {
            if expected != actual {
                return Err(LedConfigError::InvariantViolation(format!(
                    "assigned LED indices {:?} are not contiguous from 0",
                    indices
                )));
            }
        }

        Ok(())
    }
}

/// First LED index not used by button LEDs
pub fn first_available_rgb_index(assigned_count: usize, leds_per_button: u32) -> u32 {
    u32::try_from(assigned_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(leds_per_button)
}
