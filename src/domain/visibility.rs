//! Visible sub-layer ids of one service.

use std::fmt;

use itertools::Itertools;

/// Sentinel id: "no parent" in layer metadata, "show nothing" in a published visibility list.
pub const NO_LAYER: i64 = -1;

/// Set of sub-layer ids currently shown for one service.
///
/// Membership is what matters; insertion order is kept so the list handed
/// to the map service is deterministic. Insert and remove are idempotent.
#[derive(Debug, Clone, Default)]
pub struct VisibilitySet {
    ids: Vec<i64>,
}

/// Equality is set equality; insertion order is ignored.
impl PartialEq for VisibilitySet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|id| other.contains(id))
    }
}

impl Eq for VisibilitySet {}

impl VisibilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a published visibility list; the `[-1]` sentinel seeds an empty set.
    pub fn from_published(ids: &[i64]) -> Self {
        ids.iter()
            .copied()
            .filter(|&id| id != NO_LAYER)
            .collect()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    /// Returns `true` if the id was absent.
    pub fn insert(&mut self, id: i64) -> bool {
        if self.contains(id) {
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    /// Returns `true` if the id was present.
    pub fn remove(&mut self, id: i64) -> bool {
        match self.ids.iter().position(|&v| v == id) {
            Some(pos) => {
                self.ids.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Remove if present, insert otherwise. Returns `true` if the id was absent before.
    pub fn flip(&mut self, id: i64) -> bool {
        !self.remove(id) && self.insert(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.ids.iter().copied()
    }

    /// List to hand to the map service: never empty, `[-1]` stands for nothing visible.
    pub fn publish(&self) -> Vec<i64> {
        if self.ids.is_empty() {
            vec![NO_LAYER]
        } else {
            self.ids.clone()
        }
    }
}

impl FromIterator<i64> for VisibilitySet {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl fmt::Display for VisibilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.ids.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_set_when_publishing_then_sentinel() {
        assert_eq!(VisibilitySet::new().publish(), vec![NO_LAYER]);
    }

    #[test]
    fn given_sentinel_when_seeding_then_empty() {
        assert!(VisibilitySet::from_published(&[NO_LAYER]).is_empty());
        assert_eq!(VisibilitySet::from_published(&[3, 3, 4]).publish(), vec![3, 4]);
    }

    #[test]
    fn given_absent_id_when_removing_then_noop() {
        let mut set: VisibilitySet = [1, 2].into_iter().collect();
        assert!(!set.remove(9));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn given_set_when_flipping_then_reports_prior_absence() {
        let mut set: VisibilitySet = [1].into_iter().collect();
        assert!(!set.flip(1));
        assert!(set.flip(1));
        assert_eq!(set.to_string(), "{1}");
    }
}
