//! Game state and outcome resolution

pub mod count;
pub mod resolver;

pub use count::{Bases, GameCount};
pub use resolver::{resolve, OutcomeResolver, PlateEvent, RewardSignal};
