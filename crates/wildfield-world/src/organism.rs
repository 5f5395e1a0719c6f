//! Organism state and capability facets.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use wildfield_core::{Location, OrganismId, Species, SpeciesParams};

/// A single organism on the field.
///
/// The base record carries age, liveness and location; hunger and
/// strength are optional facets, present only for the species whose
/// behavior uses them. Invariant: an organism is alive exactly when it
/// holds a location.
#[derive(Debug, Clone)]
pub struct Organism {
    pub id: OrganismId,
    pub species: Species,
    pub age: u32,
    alive: bool,
    location: Option<Location>,
    /// Feeding facet; decremented every tick, death at zero
    pub food: Option<i32>,
    /// Battling facet; decays every tick, floors at zero
    pub strength: Option<i32>,
}

impl Organism {
    /// A newborn: age 0, full food, default strength.
    pub fn newborn(species: Species, location: Location, params: &SpeciesParams) -> Self {
        Self {
            id: OrganismId::new(),
            species,
            age: 0,
            alive: true,
            location: Some(location),
            food: params.max_food,
            strength: params.max_strength.map(|_| params.newborn_strength),
        }
    }

    /// An organism created by reseeding: randomized age, food and
    /// strength so the opening ticks are not uniform.
    pub fn seeded(
        species: Species,
        location: Location,
        params: &SpeciesParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        Self {
            id: OrganismId::new(),
            species,
            age: rng.gen_range(0..params.max_age),
            alive: true,
            location: Some(location),
            food: params.max_food.map(|max| rng.gen_range(0..max)),
            strength: params.max_strength.map(|max| rng.gen_range(0..max)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub(crate) fn move_to(&mut self, location: Location) {
        self.location = Some(location);
    }

    /// Transition to the dead state, releasing the location. Returns
    /// the vacated cell so the engine can clear the field slot.
    pub(crate) fn mark_dead(&mut self) -> Option<Location> {
        self.alive = false;
        self.location.take()
    }

    /// Tick the hunger clock. Returns true if the organism starved.
    /// Species without the feeding facet never starve.
    pub(crate) fn starve_tick(&mut self) -> bool {
        match self.food.as_mut() {
            Some(food) => {
                *food -= 1;
                *food <= 0
            }
            None => false,
        }
    }

    pub fn gain_food(&mut self, amount: i32, cap: i32) {
        if let Some(food) = self.food.as_mut() {
            *food = (*food + amount).min(cap);
        }
    }

    /// Feeding outcomes that reset food to the species maximum.
    pub fn fill_food(&mut self, cap: i32) {
        if let Some(food) = self.food.as_mut() {
            *food = cap;
        }
    }

    pub fn gain_strength(&mut self, amount: i32, cap: i32) {
        if let Some(strength) = self.strength.as_mut() {
            *strength = (*strength + amount).min(cap);
        }
    }

    pub(crate) fn decay_strength(&mut self, amount: i32) {
        if let Some(strength) = self.strength.as_mut() {
            *strength = (*strength - amount).max(0);
        }
    }

    pub fn strength_or_zero(&self) -> i32 {
        self.strength.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_newborn_state() {
        let params = SpeciesParams::wolf();
        let org = Organism::newborn(Species::Wolf, Location::new(1, 1), &params);

        assert_eq!(org.age, 0);
        assert!(org.is_alive());
        assert_eq!(org.location(), Some(Location::new(1, 1)));
        assert_eq!(org.food, params.max_food);
        assert_eq!(org.strength, Some(params.newborn_strength));
    }

    #[test]
    fn test_rabbit_has_no_facets() {
        let params = SpeciesParams::rabbit();
        let org = Organism::newborn(Species::Rabbit, Location::new(0, 0), &params);
        assert_eq!(org.food, None);
        assert_eq!(org.strength, None);
    }

    #[test]
    fn test_seeded_values_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let params = SpeciesParams::hunter();
        for _ in 0..100 {
            let org = Organism::seeded(Species::Hunter, Location::new(0, 0), &params, &mut rng);
            assert!(org.age < params.max_age);
            assert!(org.food.unwrap() < params.food_cap());
            assert!(org.strength.unwrap() < params.strength_cap());
        }
    }

    #[test]
    fn test_dead_iff_unlocated() {
        let params = SpeciesParams::fox();
        let mut org = Organism::newborn(Species::Fox, Location::new(2, 2), &params);
        assert!(org.is_alive() && org.location().is_some());

        let vacated = org.mark_dead();
        assert_eq!(vacated, Some(Location::new(2, 2)));
        assert!(!org.is_alive());
        assert_eq!(org.location(), None);
    }

    #[test]
    fn test_starvation() {
        let params = SpeciesParams::fox();
        let mut org = Organism::newborn(Species::Fox, Location::new(0, 0), &params);
        org.food = Some(2);
        assert!(!org.starve_tick());
        assert!(org.starve_tick());
    }

    #[test]
    fn test_rabbit_never_starves() {
        let params = SpeciesParams::rabbit();
        let mut org = Organism::newborn(Species::Rabbit, Location::new(0, 0), &params);
        for _ in 0..100 {
            assert!(!org.starve_tick());
        }
    }

    #[test]
    fn test_strength_decay_floors_at_zero() {
        let params = SpeciesParams::wolf();
        let mut org = Organism::newborn(Species::Wolf, Location::new(0, 0), &params);
        org.strength = Some(1);
        org.decay_strength(1);
        assert_eq!(org.strength, Some(0));
        org.decay_strength(1);
        assert_eq!(org.strength, Some(0));
    }

    proptest! {
        #[test]
        fn prop_strength_stays_in_bounds(
            initial in 0..100i32,
            gains in proptest::collection::vec((0..50i32, prop::bool::ANY), 0..20),
        ) {
            let params = SpeciesParams::hunter();
            let cap = params.strength_cap();
            let mut org = Organism::newborn(Species::Hunter, Location::new(0, 0), &params);
            org.strength = Some(initial);

            for (amount, is_gain) in gains {
                if is_gain {
                    org.gain_strength(amount, cap);
                } else {
                    org.decay_strength(amount);
                }
                let strength = org.strength.unwrap();
                prop_assert!((0..=cap).contains(&strength));
            }
        }

        #[test]
        fn prop_food_never_exceeds_cap(
            gains in proptest::collection::vec(0..50i32, 1..20),
        ) {
            let params = SpeciesParams::wolf();
            let cap = params.food_cap();
            let mut org = Organism::newborn(Species::Wolf, Location::new(0, 0), &params);
            org.food = Some(1);

            for amount in gains {
                org.gain_food(amount, cap);
                prop_assert!(org.food.unwrap() <= cap);
            }
        }
    }
}
