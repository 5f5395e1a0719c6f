//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::Species;
use serde::{Deserialize, Serialize};

/// Lifecycle and reseeding parameters for one species
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeciesParams {
    /// Age past which the organism dies
    pub max_age: u32,
    /// Minimum age for reproduction
    pub breeding_age: u32,
    /// Per-tick probability of breeding once of breeding age (0.0 to 1.0)
    pub breeding_probability: f64,
    /// Upper bound on litter size; actual litters are uniform in [1, max]
    pub max_litter_size: u32,
    /// Food ceiling; `None` for species without a hunger mechanic
    pub max_food: Option<i32>,
    /// Strength ceiling; `None` for species that never fight
    pub max_strength: Option<i32>,
    /// Starting strength for newborns; ignored when `max_strength` is `None`
    pub newborn_strength: i32,
    /// Probability that `reset()` seeds this species into a given cell (0.0 to 1.0)
    pub seed_probability: f64,
}

impl SpeciesParams {
    pub fn rabbit() -> Self {
        Self {
            max_age: 40,
            breeding_age: 5,
            breeding_probability: 0.12,
            max_litter_size: 4,
            max_food: None,
            max_strength: None,
            newborn_strength: 0,
            seed_probability: 0.08,
        }
    }

    pub fn fox() -> Self {
        Self {
            max_age: 150,
            breeding_age: 40,
            breeding_probability: 0.06,
            max_litter_size: 2,
            max_food: Some(12),
            max_strength: None,
            newborn_strength: 0,
            seed_probability: 0.02,
        }
    }

    pub fn wolf() -> Self {
        Self {
            max_age: 150,
            breeding_age: 45,
            breeding_probability: 0.07,
            max_litter_size: 2,
            max_food: Some(12),
            max_strength: Some(100),
            newborn_strength: 30,
            seed_probability: 0.007,
        }
    }

    pub fn hunter() -> Self {
        Self {
            max_age: 400,
            breeding_age: 60,
            breeding_probability: 0.06,
            max_litter_size: 3,
            max_food: Some(12),
            max_strength: Some(100),
            newborn_strength: 50,
            seed_probability: 0.005,
        }
    }

    /// Food ceiling, or 0 for species without the feeding facet.
    pub fn food_cap(&self) -> i32 {
        self.max_food.unwrap_or(0)
    }

    /// Strength ceiling, or 0 for species without the battling facet.
    pub fn strength_cap(&self) -> i32 {
        self.max_strength.unwrap_or(0)
    }
}

/// Feeding and combat tuning shared across species
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredationParams {
    /// Wolves eat rabbits only when their food is at or below this level
    pub wolf_hunger_threshold: i32,
    /// Food a wolf gains from a rabbit
    pub wolf_rabbit_food_gain: i32,
    /// Strength a wolf gains from a rabbit
    pub wolf_rabbit_strength_gain: i32,
    /// Strength a wolf gains from killing a fox
    pub wolf_rival_strength_gain: i32,
    /// Food a hunter gains from a rabbit
    pub hunter_rabbit_food_gain: i32,
    /// Strength a hunter gains from a rabbit
    pub hunter_rabbit_strength_gain: i32,
    /// Strength a hunter gains from winning a duel or a pack fight
    pub hunter_victory_strength_gain: i32,
    /// Food each wolf gains when a pack brings down a hunter
    pub pack_member_food_gain: i32,
    /// Strength each wolf gains when a pack or duel goes its way
    pub pack_member_strength_gain: i32,
    /// Per-tick strength loss for battling species, saturating at 0
    pub strength_decay: i32,
}

impl Default for PredationParams {
    fn default() -> Self {
        Self {
            wolf_hunger_threshold: 2,
            wolf_rabbit_food_gain: 2,
            wolf_rabbit_strength_gain: 2,
            wolf_rival_strength_gain: 5,
            hunter_rabbit_food_gain: 6,
            hunter_rabbit_strength_gain: 5,
            hunter_victory_strength_gain: 10,
            pack_member_food_gain: 5,
            pack_member_strength_gain: 3,
            strength_decay: 1,
        }
    }
}

/// Which species `reset()` may seed onto the field.
///
/// Disabling a species only removes it from future reseeding; organisms
/// already on the field are unaffected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpawnToggles {
    pub rabbits: bool,
    pub foxes: bool,
    pub wolves: bool,
    pub hunters: bool,
}

impl SpawnToggles {
    pub fn all() -> Self {
        Self {
            rabbits: true,
            foxes: true,
            wolves: true,
            hunters: true,
        }
    }

    pub fn none() -> Self {
        Self {
            rabbits: false,
            foxes: false,
            wolves: false,
            hunters: false,
        }
    }

    pub fn enabled(&self, species: Species) -> bool {
        match species {
            Species::Rabbit => self.rabbits,
            Species::Fox => self.foxes,
            Species::Wolf => self.wolves,
            Species::Hunter => self.hunters,
        }
    }

    pub fn set_enabled(&mut self, species: Species, enabled: bool) {
        match species {
            Species::Rabbit => self.rabbits = enabled,
            Species::Fox => self.foxes = enabled,
            Species::Wolf => self.wolves = enabled,
            Species::Hunter => self.hunters = enabled,
        }
    }
}

impl Default for SpawnToggles {
    fn default() -> Self {
        Self::all()
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of rows in the field
    pub depth: i32,
    /// Number of columns in the field
    pub width: i32,
    /// Seed for the shared random source
    pub seed: u64,
    pub rabbit: SpeciesParams,
    pub fox: SpeciesParams,
    pub wolf: SpeciesParams,
    pub hunter: SpeciesParams,
    pub predation: PredationParams,
    pub spawn: SpawnToggles,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            depth: 80,
            width: 120,
            seed: 0,
            rabbit: SpeciesParams::rabbit(),
            fox: SpeciesParams::fox(),
            wolf: SpeciesParams::wolf(),
            hunter: SpeciesParams::hunter(),
            predation: PredationParams::default(),
            spawn: SpawnToggles::default(),
        }
    }
}

impl SimulationConfig {
    pub fn species(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Rabbit => &self.rabbit,
            Species::Fox => &self.fox,
            Species::Wolf => &self.wolf,
            Species::Hunter => &self.hunter,
        }
    }

    /// Reject configurations the engine assumes are impossible.
    pub fn validate(&self) -> Result<()> {
        if self.depth <= 0 || self.width <= 0 {
            return Err(Error::InvalidConfig(format!(
                "field dimensions must be positive, got {}x{}",
                self.depth, self.width
            )));
        }

        let mut total_seed = 0.0;
        for species in Species::all() {
            let params = self.species(species);
            if !(0.0..=1.0).contains(&params.breeding_probability) {
                return Err(Error::InvalidConfig(format!(
                    "{species} breeding probability must be in [0, 1]"
                )));
            }
            if !(0.0..=1.0).contains(&params.seed_probability) {
                return Err(Error::InvalidConfig(format!(
                    "{species} seed probability must be in [0, 1]"
                )));
            }
            if params.max_litter_size == 0 {
                return Err(Error::InvalidConfig(format!(
                    "{species} max litter size must be at least 1"
                )));
            }
            if params.max_age == 0 {
                return Err(Error::InvalidConfig(format!(
                    "{species} max age must be at least 1"
                )));
            }
            if params.max_food.is_some_and(|max| max <= 0) {
                return Err(Error::InvalidConfig(format!(
                    "{species} max food must be positive when present"
                )));
            }
            if params.max_strength.is_some_and(|max| max <= 0) {
                return Err(Error::InvalidConfig(format!(
                    "{species} max strength must be positive when present"
                )));
            }
            if self.spawn.enabled(species) {
                total_seed += params.seed_probability;
            }
        }
        if total_seed > 1.0 {
            return Err(Error::InvalidConfig(format!(
                "enabled seed probabilities sum to {total_seed}, must not exceed 1"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.depth, 80);
        assert_eq!(config.width, 120);
        assert_eq!(config.rabbit.max_age, 40);
        assert_eq!(config.hunter.max_strength, Some(100));
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let config = SimulationConfig {
            depth: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SimulationConfig {
            width: -3,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        let mut config = SimulationConfig::default();
        config.wolf.breeding_probability = 1.5;
        assert!(config.validate().is_err());

        let mut config = SimulationConfig::default();
        config.rabbit.seed_probability = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_litter() {
        let mut config = SimulationConfig::default();
        config.fox.max_litter_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = SimulationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.depth, config.depth);
        assert_eq!(back.wolf.max_food, config.wolf.max_food);
        assert_eq!(back.predation.wolf_hunger_threshold, 2);
    }
}
