//! Simulation engine: the tick loop and species behavior.

use crate::field::Field;
use crate::organism::Organism;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, trace};
use wildfield_core::{
    Error, Location, OrganismId, Result, SimulationConfig, Species, SpeciesParams,
};

/// The synchronous multi-species field simulation.
///
/// One `step()` is one tick: every organism alive at the start of the
/// tick acts once, in roster (insertion) order. Organisms killed by an
/// earlier actor in the same sweep are skipped. Newborns claim their
/// cell immediately but join the roster, and start acting, only after
/// the sweep. All randomness comes from one seeded generator.
pub struct Simulation {
    field: Field,
    organisms: HashMap<OrganismId, Organism>,
    roster: Vec<OrganismId>,
    rng: ChaCha8Rng,
    config: SimulationConfig,
    tick: u64,
}

impl Simulation {
    /// Build and reseed a simulation. Fails only on invalid configuration.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let mut sim = Self {
            field: Field::new(config.depth, config.width),
            organisms: HashMap::new(),
            roster: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            tick: 0,
        };
        sim.reset();
        Ok(sim)
    }

    /// Current tick counter, 0 after a reset.
    pub fn step_count(&self) -> u64 {
        self.tick
    }

    /// Number of live organisms.
    pub fn population(&self) -> usize {
        self.roster.len()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn organism(&self, id: OrganismId) -> Option<&Organism> {
        self.organisms.get(&id)
    }

    pub fn organism_mut(&mut self, id: OrganismId) -> Option<&mut Organism> {
        self.organisms.get_mut(&id)
    }

    /// The occupant of a cell, or `None` for empty and out-of-bounds cells.
    pub fn occupant_at(&self, location: Location) -> Option<&Organism> {
        self.field
            .occupant_at(location)
            .and_then(|id| self.organisms.get(&id))
    }

    /// Live organisms in roster order.
    pub fn live_organisms(&self) -> impl Iterator<Item = &Organism> + '_ {
        self.roster.iter().filter_map(|id| self.organisms.get(id))
    }

    /// Enable or disable a species in future reseeding. Organisms of a
    /// disabled species already on the field keep living.
    pub fn set_spawn_enabled(&mut self, species: Species, enabled: bool) {
        self.config.spawn.set_enabled(species, enabled);
    }

    /// Read-only view of the field for rendering and statistics consumers.
    pub fn snapshot(&self) -> FieldSnapshot {
        let cells = self
            .field
            .locations()
            .map(|loc| {
                self.field
                    .occupant_at(loc)
                    .and_then(|id| self.organisms.get(&id))
                    .map(|org| org.species)
            })
            .collect();
        FieldSnapshot {
            step: self.tick,
            depth: self.field.depth,
            width: self.field.width,
            cells,
        }
    }

    /// Place a new organism directly. Used by embedders and tests to
    /// stage exact scenarios.
    pub fn spawn_at(&mut self, species: Species, location: Location) -> Result<OrganismId> {
        if !self.field.in_bounds(location) {
            return Err(Error::OutOfBounds(location));
        }
        if self.field.occupant_at(location).is_some() {
            return Err(Error::Occupied(location));
        }

        let params = *self.config.species(species);
        let org = Organism::newborn(species, location, &params);
        let id = org.id;
        self.field.place(id, location);
        self.roster.push(id);
        self.organisms.insert(id, org);
        Ok(id)
    }

    /// Execute one tick over a snapshot of the current roster.
    pub fn step(&mut self) {
        self.tick += 1;

        let sweep: Vec<OrganismId> = self.roster.clone();
        let mut newborns: Vec<Organism> = Vec::new();

        for id in sweep {
            self.act(id, &mut newborns);
        }

        self.roster
            .retain(|id| self.organisms.get(id).is_some_and(|org| org.is_alive()));
        self.organisms.retain(|_, org| org.is_alive());

        for young in newborns {
            self.roster.push(young.id);
            self.organisms.insert(young.id, young);
        }
    }

    /// Run `steps` ticks unconditionally, even through a population collapse.
    pub fn run_for(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
            if self.tick % 100 == 0 {
                debug!(
                    step = self.tick,
                    population = self.roster.len(),
                    "population snapshot"
                );
            }
        }
    }

    /// Clear everything and reseed the field at the configured
    /// per-species occurrence probabilities.
    pub fn reset(&mut self) {
        self.tick = 0;
        self.organisms.clear();
        self.roster.clear();
        self.field.clear_all();
        self.populate();
    }

    /// One independent uniform draw per cell; the first enabled species
    /// whose cumulative probability bucket contains the draw takes the
    /// cell, so a cell receives at most one organism.
    fn populate(&mut self) {
        let buckets: Vec<(Species, f64)> = Species::all()
            .into_iter()
            .filter(|species| self.config.spawn.enabled(*species))
            .map(|species| (species, self.config.species(species).seed_probability))
            .collect();

        for row in 0..self.config.depth {
            for col in 0..self.config.width {
                let roll = self.rng.gen::<f64>();
                let mut acc = 0.0;
                for &(species, probability) in &buckets {
                    acc += probability;
                    if roll < acc {
                        let location = Location::new(row, col);
                        let params = *self.config.species(species);
                        let org =
                            Organism::seeded(species, location, &params, &mut self.rng);
                        self.field.place(org.id, location);
                        self.roster.push(org.id);
                        self.organisms.insert(org.id, org);
                        break;
                    }
                }
            }
        }

        info!(
            population = self.roster.len(),
            depth = self.config.depth,
            width = self.config.width,
            "field reseeded"
        );
    }

    /// One organism's full action for the tick: age, hunger, strength
    /// decay, breeding, feeding or fighting, then movement. Any stage
    /// that kills the organism ends its action.
    fn act(&mut self, id: OrganismId, newborns: &mut Vec<Organism>) {
        let (species, params) = {
            let Some(org) = self.organisms.get(&id) else {
                return;
            };
            // Killed earlier in this sweep; a dead organism must not act.
            if !org.is_alive() {
                return;
            }
            (org.species, *self.config.species(org.species))
        };

        let mut died = false;
        if let Some(org) = self.organisms.get_mut(&id) {
            org.age += 1;
            if org.age > params.max_age {
                died = true;
            } else if org.starve_tick() {
                died = true;
            } else {
                org.decay_strength(self.config.predation.strength_decay);
            }
        }
        if died {
            self.kill(id);
            return;
        }

        self.give_birth(id, &params, newborns);

        let target = match species {
            Species::Rabbit => None,
            Species::Fox => self.fox_hunt(id, &params),
            Species::Wolf => self.wolf_hunt(id, &params),
            Species::Hunter => self.hunter_hunt(id, &params),
        };

        // A lost fight kills the organism mid-action; it must not move.
        let here = match self.organisms.get(&id) {
            Some(org) if org.is_alive() => match org.location() {
                Some(loc) => loc,
                None => return,
            },
            _ => return,
        };

        let dest = match target {
            Some(loc) => Some(loc),
            None => self.field.free_adjacent_location(here, &mut self.rng),
        };

        match dest {
            Some(loc) => self.relocate(id, loc),
            None => {
                trace!(%id, %species, "no free adjacent cell, dies of overcrowding");
                self.kill(id);
            }
        }
    }

    /// Breeding-age organisms breed with the species probability, once
    /// per tick. Each birth claims one shuffled free neighbor; excess
    /// births beyond the free cells are discarded.
    fn give_birth(
        &mut self,
        id: OrganismId,
        params: &SpeciesParams,
        newborns: &mut Vec<Organism>,
    ) {
        let (species, age, here) = match self.organisms.get(&id) {
            Some(org) => match org.location() {
                Some(loc) => (org.species, org.age, loc),
                None => return,
            },
            None => return,
        };

        if age < params.breeding_age {
            return;
        }
        if self.rng.gen::<f64>() > params.breeding_probability {
            return;
        }

        let litter = self.rng.gen_range(1..=params.max_litter_size);
        let mut free = self.field.free_adjacent_locations(here, &mut self.rng);
        for _ in 0..litter {
            let Some(spot) = free.pop() else {
                break;
            };
            let young = Organism::newborn(species, spot, params);
            // Claim the cell now so later actors this tick see it taken;
            // the newborn itself acts only from the next tick.
            self.field.place(young.id, spot);
            trace!(parent = %id, child = %young.id, %species, "birth");
            newborns.push(young);
        }
    }

    /// Fox feeding: the first live adjacent rabbit is eaten and the
    /// fox's food resets to maximum.
    fn fox_hunt(&mut self, id: OrganismId, params: &SpeciesParams) -> Option<Location> {
        let here = self.organisms.get(&id).and_then(|org| org.location())?;

        for loc in self.field.adjacent_locations(here) {
            let Some(occupant) = self.field.occupant_at(loc) else {
                continue;
            };
            let is_prey = self
                .organisms
                .get(&occupant)
                .is_some_and(|org| org.species == Species::Rabbit && org.is_alive());
            if is_prey {
                self.kill(occupant);
                if let Some(fox) = self.organisms.get_mut(&id) {
                    fox.fill_food(params.food_cap());
                }
                return Some(loc);
            }
        }
        None
    }

    /// Wolf feeding: one scan of the neighborhood. A rival fox is
    /// always attacked; a rabbit is fallback food only when the wolf's
    /// food is at or below the hunger threshold.
    fn wolf_hunt(&mut self, id: OrganismId, params: &SpeciesParams) -> Option<Location> {
        let (here, food) = {
            let org = self.organisms.get(&id)?;
            (org.location()?, org.food.unwrap_or(0))
        };

        let mut rival: Option<(OrganismId, Location)> = None;
        let mut backup_rabbit: Option<(OrganismId, Location)> = None;

        for loc in self.field.adjacent_locations(here) {
            let Some(occupant) = self.field.occupant_at(loc) else {
                continue;
            };
            let Some((other_species, true)) = self
                .organisms
                .get(&occupant)
                .map(|org| (org.species, org.is_alive()))
            else {
                continue;
            };
            match other_species {
                Species::Fox if rival.is_none() => rival = Some((occupant, loc)),
                Species::Rabbit => backup_rabbit = Some((occupant, loc)),
                _ => {}
            }
        }

        let predation = self.config.predation;

        if let Some((fox, loc)) = rival {
            self.kill(fox);
            if let Some(wolf) = self.organisms.get_mut(&id) {
                wolf.fill_food(params.food_cap());
                wolf.gain_strength(predation.wolf_rival_strength_gain, params.strength_cap());
            }
            return Some(loc);
        }

        if food <= predation.wolf_hunger_threshold {
            if let Some((rabbit, loc)) = backup_rabbit {
                self.kill(rabbit);
                if let Some(wolf) = self.organisms.get_mut(&id) {
                    wolf.gain_food(predation.wolf_rabbit_food_gain, params.food_cap());
                    wolf.gain_strength(
                        predation.wolf_rabbit_strength_gain,
                        params.strength_cap(),
                    );
                }
                return Some(loc);
            }
        }

        None
    }

    /// Hunter feeding and combat: one scan classifying the whole
    /// neighborhood before anything acts, because a pack is judged by
    /// its combined strength.
    fn hunter_hunt(&mut self, id: OrganismId, params: &SpeciesParams) -> Option<Location> {
        let (here, my_strength) = {
            let org = self.organisms.get(&id)?;
            (org.location()?, org.strength_or_zero())
        };

        let mut backup_rabbit: Option<(OrganismId, Location)> = None;
        let mut wolves: Vec<(OrganismId, Location, i32)> = Vec::new();

        for loc in self.field.adjacent_locations(here) {
            let Some(occupant) = self.field.occupant_at(loc) else {
                continue;
            };
            let Some(other) = self.organisms.get(&occupant) else {
                continue;
            };
            if !other.is_alive() {
                continue;
            }
            match other.species {
                Species::Wolf => wolves.push((occupant, loc, other.strength_or_zero())),
                Species::Rabbit => backup_rabbit = Some((occupant, loc)),
                _ => {}
            }
        }

        let predation = self.config.predation;
        let wolf_params = self.config.wolf;

        match wolves.len() {
            0 => {
                let (rabbit, loc) = backup_rabbit?;
                self.kill(rabbit);
                if let Some(hunter) = self.organisms.get_mut(&id) {
                    hunter.gain_food(predation.hunter_rabbit_food_gain, params.food_cap());
                    hunter.gain_strength(
                        predation.hunter_rabbit_strength_gain,
                        params.strength_cap(),
                    );
                }
                Some(loc)
            }
            1 => {
                let (wolf_id, loc, wolf_strength) = wolves[0];
                // Equal strength is the only randomized combat outcome.
                let hunter_wins = if my_strength != wolf_strength {
                    my_strength > wolf_strength
                } else {
                    self.rng.gen::<bool>()
                };

                if hunter_wins {
                    debug!(
                        hunter = my_strength,
                        wolf = wolf_strength,
                        "hunter wins the duel"
                    );
                    self.kill(wolf_id);
                    if let Some(hunter) = self.organisms.get_mut(&id) {
                        hunter.fill_food(params.food_cap());
                        hunter.gain_strength(
                            predation.hunter_victory_strength_gain,
                            params.strength_cap(),
                        );
                    }
                    Some(loc)
                } else {
                    debug!(
                        hunter = my_strength,
                        wolf = wolf_strength,
                        "wolf wins the duel"
                    );
                    self.kill(id);
                    if let Some(wolf) = self.organisms.get_mut(&wolf_id) {
                        wolf.fill_food(wolf_params.food_cap());
                        wolf.gain_strength(
                            predation.pack_member_strength_gain,
                            wolf_params.strength_cap(),
                        );
                    }
                    None
                }
            }
            _ => {
                // Two or more adjacent wolves fight as a pack with their
                // summed strength. Ties favor the hunter.
                let pack_strength: i32 = wolves.iter().map(|(_, _, s)| s).sum();

                if my_strength >= pack_strength {
                    debug!(
                        hunter = my_strength,
                        pack = pack_strength,
                        members = wolves.len(),
                        "hunter defeats the pack"
                    );
                    for &(wolf_id, _, _) in &wolves {
                        self.kill(wolf_id);
                    }
                    if let Some(hunter) = self.organisms.get_mut(&id) {
                        hunter.fill_food(params.food_cap());
                        hunter.gain_strength(
                            predation.hunter_victory_strength_gain,
                            params.strength_cap(),
                        );
                    }
                    Some(wolves[0].1)
                } else {
                    debug!(
                        hunter = my_strength,
                        pack = pack_strength,
                        members = wolves.len(),
                        "pack defeats the hunter"
                    );
                    self.kill(id);
                    // Every member shares the kill, not just one.
                    for &(wolf_id, _, _) in &wolves {
                        if let Some(wolf) = self.organisms.get_mut(&wolf_id) {
                            wolf.gain_food(
                                predation.pack_member_food_gain,
                                wolf_params.food_cap(),
                            );
                            wolf.gain_strength(
                                predation.pack_member_strength_gain,
                                wolf_params.strength_cap(),
                            );
                        }
                    }
                    None
                }
            }
        }
    }

    /// Kill an organism and free its cell in the same tick.
    fn kill(&mut self, id: OrganismId) {
        if let Some(org) = self.organisms.get_mut(&id) {
            if let Some(loc) = org.mark_dead() {
                self.field.clear(loc);
            }
        }
    }

    fn relocate(&mut self, id: OrganismId, dest: Location) {
        if let Some(org) = self.organisms.get_mut(&id) {
            if let Some(old) = org.location() {
                self.field.clear(old);
            }
            org.move_to(dest);
            self.field.place(id, dest);
        }
    }
}

/// Serializable per-tick view of the field: dimensions plus the species
/// tag of each cell's occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSnapshot {
    pub step: u64,
    pub depth: i32,
    pub width: i32,
    cells: Vec<Option<Species>>,
}

impl FieldSnapshot {
    pub fn species_at(&self, row: i32, col: i32) -> Option<Species> {
        if (0..self.depth).contains(&row) && (0..self.width).contains(&col) {
            self.cells[(row * self.width + col) as usize]
        } else {
            None
        }
    }

    pub fn species_count(&self, species: Species) -> usize {
        self.cells.iter().filter(|c| **c == Some(species)).count()
    }
}
