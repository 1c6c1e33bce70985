pub mod decision;
pub mod turn;

pub use decision::GateDecision;
pub use turn::{GateState, TurnGate};
