//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an organism instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganismId(pub Uuid);

impl OrganismId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OrganismId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (row, column) cell address in the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: i32,
    pub col: i32,
}

impl Location {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

/// The closed set of species living on the field.
///
/// Rabbits are plain herbivores. Foxes hunt rabbits. Wolves hunt foxes
/// and fall back on rabbits when starving. Hunters duel wolves, alone
/// or as packs, and eat rabbits when no wolf is around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Rabbit,
    Fox,
    Wolf,
    Hunter,
}

impl Species {
    /// All species, in reseeding bucket order.
    pub fn all() -> [Species; 4] {
        [Species::Rabbit, Species::Fox, Species::Wolf, Species::Hunter]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Species::Rabbit => "rabbit",
            Species::Fox => "fox",
            Species::Wolf => "wolf",
            Species::Hunter => "hunter",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_equality() {
        assert_eq!(Location::new(3, 4), Location::new(3, 4));
        assert_ne!(Location::new(3, 4), Location::new(4, 3));
    }

    #[test]
    fn test_species_order() {
        let all = Species::all();
        assert_eq!(all[0], Species::Rabbit);
        assert_eq!(all[3], Species::Hunter);
    }

    #[test]
    fn test_organism_ids_unique() {
        assert_ne!(OrganismId::new(), OrganismId::new());
    }
}
