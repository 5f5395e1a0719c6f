//! 2D occupancy grid for the field.

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use wildfield_core::{Location, OrganismId};

/// A fixed-size bounded grid holding at most one occupant per cell.
///
/// The field is the single authority on placement. Organisms keep only
/// their current location key; the engine mutates the field on their
/// behalf. Edges are clipped, never wrapped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub depth: i32,
    pub width: i32,
    cells: Vec<Option<OrganismId>>,
}

impl Field {
    pub fn new(depth: i32, width: i32) -> Self {
        let size = (depth * width) as usize;
        Self {
            depth,
            width,
            cells: vec![None; size],
        }
    }

    pub fn in_bounds(&self, location: Location) -> bool {
        (0..self.depth).contains(&location.row) && (0..self.width).contains(&location.col)
    }

    fn index(&self, location: Location) -> usize {
        (location.row * self.width + location.col) as usize
    }

    /// Put an occupant at a location, overwriting whatever was there.
    /// The caller must have cleared the previous occupant's slot first.
    pub fn place(&mut self, id: OrganismId, location: Location) {
        if self.in_bounds(location) {
            let index = self.index(location);
            self.cells[index] = Some(id);
        }
    }

    /// Empty a cell. Idempotent; clearing an already-empty or
    /// out-of-bounds cell does nothing.
    pub fn clear(&mut self, location: Location) {
        if self.in_bounds(location) {
            let index = self.index(location);
            self.cells[index] = None;
        }
    }

    /// Empty every cell.
    pub fn clear_all(&mut self) {
        self.cells.fill(None);
    }

    /// The occupant of a cell, or `None` for empty or out-of-bounds cells.
    pub fn occupant_at(&self, location: Location) -> Option<OrganismId> {
        if self.in_bounds(location) {
            self.cells[self.index(location)]
        } else {
            None
        }
    }

    /// The in-bounds 8-neighborhood of a location. Corners and edges
    /// get fewer neighbors.
    pub fn adjacent_locations(&self, location: Location) -> Vec<Location> {
        let mut adjacent = Vec::with_capacity(8);
        for dr in -1..=1 {
            for dc in -1..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let candidate = Location::new(location.row + dr, location.col + dc);
                if self.in_bounds(candidate) {
                    adjacent.push(candidate);
                }
            }
        }
        adjacent
    }

    /// Unoccupied neighbors, shuffled per call so repeated ties do not
    /// always resolve toward the same direction.
    pub fn free_adjacent_locations(
        &self,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Location> {
        let mut free: Vec<Location> = self
            .adjacent_locations(location)
            .into_iter()
            .filter(|loc| self.occupant_at(*loc).is_none())
            .collect();
        free.shuffle(rng);
        free
    }

    /// One unoccupied neighbor picked at random, or `None`.
    pub fn free_adjacent_location(
        &self,
        location: Location,
        rng: &mut ChaCha8Rng,
    ) -> Option<Location> {
        self.free_adjacent_locations(location, rng).pop()
    }

    /// Iterator over all cell locations in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.cells.len()).map(move |i| {
            Location::new(i as i32 / self.width, i as i32 % self.width)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_field_creation() {
        let field = Field::new(8, 12);
        assert_eq!(field.depth, 8);
        assert_eq!(field.width, 12);
        assert_eq!(field.locations().count(), 96);
    }

    #[test]
    fn test_place_and_clear() {
        let mut field = Field::new(5, 5);
        let id = OrganismId::new();
        let loc = Location::new(2, 3);

        field.place(id, loc);
        assert_eq!(field.occupant_at(loc), Some(id));

        field.clear(loc);
        assert_eq!(field.occupant_at(loc), None);

        // Clearing again is a no-op.
        field.clear(loc);
        assert_eq!(field.occupant_at(loc), None);
    }

    #[test]
    fn test_out_of_bounds_reads_are_empty() {
        let field = Field::new(5, 5);
        assert_eq!(field.occupant_at(Location::new(-1, 0)), None);
        assert_eq!(field.occupant_at(Location::new(0, 5)), None);
        assert_eq!(field.occupant_at(Location::new(99, 99)), None);
    }

    #[test]
    fn test_adjacency_is_clipped_not_wrapped() {
        let field = Field::new(5, 5);
        assert_eq!(field.adjacent_locations(Location::new(2, 2)).len(), 8);
        assert_eq!(field.adjacent_locations(Location::new(0, 0)).len(), 3);
        assert_eq!(field.adjacent_locations(Location::new(0, 2)).len(), 5);

        // No neighbor of a corner may sit on the far side of the grid.
        for loc in field.adjacent_locations(Location::new(0, 0)) {
            assert!(loc.row <= 1 && loc.col <= 1);
        }
    }

    #[test]
    fn test_free_adjacent_excludes_occupied() {
        let mut field = Field::new(5, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let center = Location::new(2, 2);

        field.place(OrganismId::new(), Location::new(1, 2));
        field.place(OrganismId::new(), Location::new(2, 1));

        let free = field.free_adjacent_locations(center, &mut rng);
        assert_eq!(free.len(), 6);
        assert!(!free.contains(&Location::new(1, 2)));
        assert!(!free.contains(&Location::new(2, 1)));
    }

    #[test]
    fn test_no_free_neighbor_when_surrounded() {
        let mut field = Field::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let center = Location::new(1, 1);

        for loc in field.adjacent_locations(center) {
            field.place(OrganismId::new(), loc);
        }

        assert_eq!(field.free_adjacent_location(center, &mut rng), None);
    }

    #[test]
    fn test_single_cell_field_has_no_neighbors() {
        let field = Field::new(1, 1);
        assert!(field.adjacent_locations(Location::new(0, 0)).is_empty());
    }
}
