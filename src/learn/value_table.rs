//! State value table keyed by Zobrist hash

use std::collections::HashMap;

/// Value of a state the learner has not seen before
pub const INITIAL_VALUE: f64 = 0.5;
/// Value of a state the learner has won
pub const WIN_VALUE: f64 = 1.0;
/// Value of a state the learner has lost
pub const LOSS_VALUE: f64 = 0.0;

/// One TD(0) step: move `v` towards `v_next` by a fraction `alpha`.
///
/// ```
/// use tictactoe::learn::td_target;
///
/// assert_eq!(td_target(0.5, 1.0, 0.5), 0.75);
/// assert_eq!(td_target(0.5, 0.0, 0.1), 0.45);
/// ```
#[inline]
pub fn td_target(v: f64, v_next: f64, alpha: f64) -> f64 {
    v + alpha * (v_next - v)
}

/// Map from board hash to estimated value.
///
/// With `alpha` in `(0, 1]` and all stored values in `[0, 1]`, every update
/// is a convex combination of two values, so the table stays in `[0, 1]`.
#[derive(Debug, Clone, Default)]
pub struct ValueTable {
    values: HashMap<u64, f64>,
}

impl ValueTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a known state
    #[inline]
    pub fn get(&self, hash: u64) -> Option<f64> {
        self.values.get(&hash).copied()
    }

    /// Value of a state, initialising unseen states to [`INITIAL_VALUE`]
    pub fn get_or_init(&mut self, hash: u64) -> f64 {
        *self.values.entry(hash).or_insert(INITIAL_VALUE)
    }

    pub fn set(&mut self, hash: u64, value: f64) {
        debug_assert!((0.0..=1.0).contains(&value), "value {value} out of range");
        self.values.insert(hash, value);
    }

    pub fn set_win(&mut self, hash: u64) {
        self.set(hash, WIN_VALUE);
    }

    pub fn set_loss(&mut self, hash: u64) {
        self.set(hash, LOSS_VALUE);
    }

    /// Apply `V(s) += alpha * (V(s_next) - V(s))` and return the new `V(s)`.
    ///
    /// Either state is initialised first if it has not been seen.
    pub fn td_update(&mut self, s: u64, s_next: u64, alpha: f64) -> f64 {
        let v_next = self.get_or_init(s_next);
        let v = self.get_or_init(s);
        let updated = td_target(v, v_next, alpha);
        self.values.insert(s, updated);
        updated
    }

    /// Number of states with a value
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// All `(hash, value)` pairs, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.values.iter().map(|(&h, &v)| (h, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_state_initialised() {
        let mut table = ValueTable::new();
        assert_eq!(table.get(7), None);
        assert_eq!(table.get_or_init(7), INITIAL_VALUE);
        assert_eq!(table.get(7), Some(INITIAL_VALUE));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_get_or_init_keeps_existing() {
        let mut table = ValueTable::new();
        table.set_win(3);
        assert_eq!(table.get_or_init(3), WIN_VALUE);
        table.set_loss(3);
        assert_eq!(table.get(3), Some(LOSS_VALUE));
    }

    #[test]
    fn test_td_update_formula() {
        let mut table = ValueTable::new();
        table.set(1, 0.4);
        table.set(2, 0.8);

        let updated = table.td_update(1, 2, 0.25);
        assert!((updated - 0.5).abs() < 1e-12);
        assert_eq!(table.get(1), Some(updated));
        // Target state is untouched
        assert_eq!(table.get(2), Some(0.8));
    }

    #[test]
    fn test_td_update_initialises_both_states() {
        let mut table = ValueTable::new();
        table.set_loss(10);
        let updated = table.td_update(20, 10, 0.1);
        assert!((updated - 0.45).abs() < 1e-12);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_td_update_self_is_noop() {
        let mut table = ValueTable::new();
        table.set(5, 0.3);
        assert_eq!(table.td_update(5, 5, 0.9), 0.3);
    }

    #[test]
    fn test_repeated_updates_stay_in_range() {
        let mut table = ValueTable::new();
        table.set_win(1);
        table.set_loss(2);
        for i in 0..200 {
            let target = if i % 3 == 0 { 2 } else { 1 };
            let v = table.td_update(0, target, 0.5);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_clear() {
        let mut table = ValueTable::new();
        table.get_or_init(1);
        table.get_or_init(2);
        assert_eq!(table.iter().count(), 2);
        table.clear();
        assert!(table.is_empty());
    }
}
