use core::ops::Index;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::GameConfig;
use crate::error::{GameError, Result};
use crate::types::{CellCount, Coord2, Neighbors, nd, neighbors};

/// Mine layout plus the derived adjacent-mine count plane, kept consistent
/// under every mutation.
///
/// All placement and removal goes through [`Minefield::add_mine`] and
/// [`Minefield::remove_mine`], which adjust the counts of the in-bounds
/// neighborhood, so the count plane never drifts from the mask.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mines: Array2<bool>,
    counts: Array2<u8>,
    mine_count: CellCount,
}

impl Minefield {
    /// Places `config.mines` mines uniformly at random by rejection sampling:
    /// draw a coordinate pair, retry while the cell is already mined.
    ///
    /// Expected O(mines) retries since the configuration contract keeps the
    /// mine count strictly below the cell count.
    pub fn generate(config: GameConfig, rng: &mut impl Rng) -> Self {
        let (width, height) = config.size;
        let mut field = Self::empty(config.size);
        while field.mine_count < config.mines {
            let coords = (rng.random_range(0..width), rng.random_range(0..height));
            if !field[coords] {
                field.add_mine(coords);
            }
        }
        log::debug!(
            "generated {}x{} minefield with {} mines",
            width,
            height,
            field.mine_count
        );
        field
    }

    /// Builds a field with mines at exactly the given coordinates. Duplicate
    /// coordinates are counted once.
    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut field = Self::empty(size);
        for &coords in mine_coords {
            field.validate_coords(coords)?;
            if !field[coords] {
                field.add_mine(coords);
            }
        }
        Ok(field)
    }

    fn empty(size: Coord2) -> Self {
        Self {
            mines: Array2::default(nd(size)),
            counts: Array2::default(nd(size)),
            mine_count: 0,
        }
    }

    /// Moves the mine at `coords` to a random different, unmined cell,
    /// preserving the total mine count and the count plane exactly.
    ///
    /// Supports the first-move guarantee; returns the new mine position.
    pub fn relocate_mine(&mut self, coords: Coord2, rng: &mut impl Rng) -> Coord2 {
        let (width, height) = self.size();
        self.remove_mine(coords);
        loop {
            let new_coords = (rng.random_range(0..width), rng.random_range(0..height));
            if new_coords != coords && !self[new_coords] {
                self.add_mine(new_coords);
                log::debug!("relocated mine {:?} -> {:?}", coords, new_coords);
                return new_coords;
            }
        }
    }

    fn add_mine(&mut self, coords: Coord2) {
        debug_assert!(!self.mines[nd(coords)], "cell already mined");
        self.mines[nd(coords)] = true;
        self.mine_count += 1;
        for pos in self.iter_neighbors(coords) {
            self.counts[nd(pos)] += 1;
        }
    }

    fn remove_mine(&mut self, coords: Coord2) {
        debug_assert!(self.mines[nd(coords)], "cell holds no mine");
        self.mines[nd(coords)] = false;
        self.mine_count -= 1;
        for pos in self.iter_neighbors(coords) {
            self.counts[nd(pos)] -= 1;
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.mines.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.mines.len().try_into().unwrap()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    /// Count of mines among the up-to-8 neighbors, read from the maintained
    /// plane rather than recomputed.
    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.counts[nd(coords)]
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> Neighbors {
        neighbors(coords, self.size())
    }
}

impl Index<Coord2> for Minefield {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mines[nd(coords)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn recounted(field: &Minefield) -> Array2<u8> {
        let size = field.size();
        let mut counts: Array2<u8> = Array2::default(nd(size));
        for x in 0..size.0 {
            for y in 0..size.1 {
                counts[nd((x, y))] = neighbors((x, y), size)
                    .filter(|&pos| field[pos])
                    .count()
                    .try_into()
                    .unwrap();
            }
        }
        counts
    }

    fn assert_consistent(field: &Minefield) {
        let mask_total: CellCount = field.mines.iter().filter(|&&m| m).count().try_into().unwrap();
        assert_eq!(mask_total, field.mine_count());
        assert_eq!(recounted(field), field.counts);
    }

    #[test]
    fn generate_places_exact_count_without_duplicates() {
        for seed in 0..16 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let config = GameConfig::new((9, 7), 20).unwrap();
            let field = Minefield::generate(config, &mut rng);
            assert_eq!(field.mine_count(), 20);
            assert_consistent(&field);
        }
    }

    #[test]
    fn generate_fills_almost_full_board() {
        let mut rng = SmallRng::seed_from_u64(3);
        let config = GameConfig::new((4, 4), 15).unwrap();
        let field = Minefield::generate(config, &mut rng);
        assert_eq!(field.mine_count(), 15);
        assert_consistent(&field);
    }

    #[test]
    fn neighbor_counts_cover_corners_and_edges() {
        let field = Minefield::from_mine_coords((3, 3), &[(0, 0)]).unwrap();
        assert_eq!(field.adjacent_mine_count((0, 0)), 0);
        assert_eq!(field.adjacent_mine_count((1, 0)), 1);
        assert_eq!(field.adjacent_mine_count((1, 1)), 1);
        assert_eq!(field.adjacent_mine_count((2, 2)), 0);
        assert_consistent(&field);
    }

    #[test]
    fn duplicate_fixture_coords_count_once() {
        let field = Minefield::from_mine_coords((4, 4), &[(2, 2), (2, 2)]).unwrap();
        assert_eq!(field.mine_count(), 1);
        assert_consistent(&field);
    }

    #[test]
    fn fixture_rejects_out_of_bounds_coords() {
        let result = Minefield::from_mine_coords((4, 4), &[(4, 0)]);
        assert_eq!(result.unwrap_err(), GameError::OutOfBounds);
    }

    #[test]
    fn serialized_field_round_trips() {
        let field = Minefield::from_mine_coords((4, 3), &[(1, 1), (3, 2)]).unwrap();
        let json = serde_json::to_string(&field).unwrap();
        let back: Minefield = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn relocation_preserves_count_and_accounting() {
        let mut rng = SmallRng::seed_from_u64(11);
        let mut field = Minefield::from_mine_coords((5, 5), &[(2, 2), (4, 4)]).unwrap();
        let mut tracked = (2, 2);
        for _ in 0..32 {
            let new_coords = field.relocate_mine(tracked, &mut rng);
            assert_ne!(new_coords, tracked);
            assert!(!field[tracked]);
            assert!(field[new_coords]);
            assert_eq!(field.mine_count(), 2);
            assert_consistent(&field);
            tracked = new_coords;
        }
    }
}
