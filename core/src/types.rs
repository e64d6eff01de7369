use serde::{Deserialize, Serialize};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine totals and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// `ndarray` index for a coordinate pair.
pub(crate) const fn nd((x, y): Coord2) -> [usize; 2] {
    [x as usize, y as usize]
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Cursor movement directions accepted from the input layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit displacement in board coordinates; `y` grows downward.
    pub(crate) const fn delta(self) -> (i8, i8) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

const DISPLACEMENTS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `center`, returning a value only while it stays inside `bounds`.
fn step(center: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let x = center.0.checked_add_signed(delta.0)?;
    let y = center.1.checked_add_signed(delta.1)?;
    (x < bounds.0 && y < bounds.1).then_some((x, y))
}

/// Iterates the in-bounds cells at Chebyshev distance 1 from `center`.
///
/// Out-of-bounds offsets are silently skipped; there is no wraparound.
pub fn neighbors(center: Coord2, bounds: Coord2) -> Neighbors {
    Neighbors {
        center,
        bounds,
        index: 0,
    }
}

#[derive(Debug)]
pub struct Neighbors {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            if let Some(coords) = step(self.center, delta, self.bounds) {
                return Some(coords);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interior_cell_has_eight_neighbors() {
        let all: Vec<_> = neighbors((1, 1), (3, 3)).collect();
        assert_eq!(all.len(), 8);
        assert!(!all.contains(&(1, 1)));
    }

    #[test]
    fn corner_and_edge_cells_skip_out_of_bounds_offsets() {
        assert_eq!(neighbors((0, 0), (3, 3)).count(), 3);
        assert_eq!(neighbors((2, 2), (3, 3)).count(), 3);
        assert_eq!(neighbors((1, 0), (3, 3)).count(), 5);
    }

    #[test]
    fn no_wraparound_at_axis_limits() {
        let bounds = (Coord::MAX, Coord::MAX);
        let from_origin: Vec<_> = neighbors((0, 0), bounds).collect();
        assert!(from_origin.iter().all(|&(x, y)| x <= 1 && y <= 1));

        let max = Coord::MAX - 1;
        let from_far_corner: Vec<_> = neighbors((max, max), bounds).collect();
        assert_eq!(from_far_corner.len(), 3);
        assert!(from_far_corner.iter().all(|&(x, y)| x >= max - 1 && y >= max - 1));
    }

    #[test]
    fn direction_deltas_match_screen_orientation() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Down.delta(), (0, 1));
        assert_eq!(Direction::Left.delta(), (-1, 0));
        assert_eq!(Direction::Right.delta(), (1, 0));
    }
}
