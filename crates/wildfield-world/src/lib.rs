//! Field simulation engine.
//!
//! This crate implements the bounded 2D grid where rabbits, foxes,
//! wolves and hunters age, breed, hunt, fight and die, one synchronous
//! tick at a time.

pub mod field;
pub mod organism;
pub mod simulation;

pub use field::Field;
pub use organism::Organism;
pub use simulation::{FieldSnapshot, Simulation};
