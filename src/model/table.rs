use serde::{Deserialize, Serialize};

/// Ordered lookup table whose index clamps to the last entry.
///
/// Claim costs are keyed by how many cells a group already holds, upkeep
/// costs by a claim's ordinal position, defensive bonuses by depth. The keys
/// differ; the lookup shape does not.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClampedTable<T>(Vec<T>);

impl<T: Copy + Default> ClampedTable<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self(entries)
    }

    /// Entry at `index`, or the last entry past the end. Empty tables yield
    /// `T::default()`.
    pub fn get(&self, index: usize) -> T {
        match self.0.len() {
            0 => T::default(),
            len => self.0[index.min(len - 1)],
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn entries(&self) -> &[T] {
        &self.0
    }
}

impl<T: Copy + Default + PartialOrd> ClampedTable<T> {
    /// True when every entry is at least the one before it.
    pub fn is_non_decreasing(&self) -> bool {
        self.0.windows(2).all(|w| w[0] <= w[1])
    }
}

impl ClampedTable<u32> {
    /// Sum of the first `count` clamped entries.
    pub fn sum_first(&self, count: usize) -> u64 {
        (0..count).map(|i| u64::from(self.get(i))).sum()
    }
}

impl<T> Default for ClampedTable<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> From<Vec<T>> for ClampedTable<T> {
    fn from(entries: Vec<T>) -> Self {
        Self(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_clamps_past_the_end() {
        let table = ClampedTable::new(vec![0u32, 100, 200, 300]);
        assert_eq!(table.get(0), 0);
        assert_eq!(table.get(2), 200);
        assert_eq!(table.get(3), 300);
        assert_eq!(table.get(4), 300);
        assert_eq!(table.get(usize::MAX), 300);
    }

    #[test]
    fn empty_table_yields_zero() {
        let table: ClampedTable<f32> = ClampedTable::default();
        assert_eq!(table.get(7), 0.0);
        assert!(table.is_empty());
    }

    #[test]
    fn clamped_lookup_is_monotone_for_monotone_tables() {
        let table = ClampedTable::new(vec![0u32, 5, 5, 20]);
        assert!(table.is_non_decreasing());
        let values: Vec<u32> = (0..10).map(|i| table.get(i)).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert!(!ClampedTable::new(vec![3u32, 1]).is_non_decreasing());
    }

    #[test]
    fn sum_first_repeats_last_entry() {
        let table = ClampedTable::new(vec![10u32, 20, 30]);
        assert_eq!(table.sum_first(0), 0);
        assert_eq!(table.sum_first(2), 30);
        assert_eq!(table.sum_first(5), 10 + 20 + 30 + 30 + 30);
    }

    #[test]
    fn serializes_as_plain_list() {
        let table = ClampedTable::new(vec![0.0f32, 0.25]);
        assert_eq!(serde_json::to_string(&table).unwrap(), "[0.0,0.25]");
    }
}
