//! Reinforcement learning player
//!
//! A tabular TD(0) agent: every board state the learner has seen is given a
//! value in `[0, 1]` (its estimated chance of winning from there), keyed by
//! the Zobrist hash of the board. Values move towards the value of the next
//! chosen state after every move:
//!
//! `V(s) += alpha * (V(s') - V(s))`

pub mod learner;
pub mod value_table;

pub use learner::{Learner, LearnerConfig, LearnerMove};
pub use value_table::{td_target, ValueTable, INITIAL_VALUE, LOSS_VALUE, WIN_VALUE};
