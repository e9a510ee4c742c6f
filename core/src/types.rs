use ndarray::Array2;

/// Single coordinate axis used for grid widths, heights, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

/// Conversion from game coordinates to an `ndarray` index.
pub trait GridIndex {
    fn nd(self) -> [usize; 2];
}

impl GridIndex for Coord2 {
    fn nd(self) -> [usize; 2] {
        [self.0.into(), self.1.into()]
    }
}

pub const fn cell_count((width, height): Coord2) -> CellCount {
    (width as CellCount).saturating_mul(height as CellCount)
}

/// Bounds of a grid allocated from a [`Coord2`] size, so both dimensions
/// are known to fit back into [`Coord`].
pub(crate) fn bounds_of<T>(grid: &Array2<T>) -> Coord2 {
    let (width, height) = grid.dim();
    (width as Coord, height as Coord)
}

/// Applies `(dx, dy)` to `center`, returning a value only while it stays
/// inside `bounds`.
pub(crate) fn offset_within(
    center: Coord2,
    (dx, dy): (i8, i8),
    bounds: Coord2,
) -> Option<Coord2> {
    let x = center.0.checked_add_signed(dx)?;
    let y = center.1.checked_add_signed(dy)?;
    (x < bounds.0 && y < bounds.1).then_some((x, y))
}

const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// The up-to-8 in-bounds neighbors of a cell, in row-major offset order.
pub fn neighbors(center: Coord2, bounds: Coord2) -> impl Iterator<Item = Coord2> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .filter_map(move |offset| offset_within(center, offset, bounds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn corner_cell_has_three_neighbors() {
        let all: Vec<_> = neighbors((0, 0), (4, 4)).collect();
        assert_eq!(all, [(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn interior_cell_has_eight_neighbors() {
        assert_eq!(neighbors((2, 2), (4, 4)).count(), 8);
    }

    #[test]
    fn offset_within_clips_at_bounds() {
        assert_eq!(offset_within((0, 0), (-1, 0), (3, 3)), None);
        assert_eq!(offset_within((2, 2), (1, 0), (3, 3)), None);
        assert_eq!(offset_within((1, 1), (1, -1), (3, 3)), Some((2, 0)));
    }

    #[test]
    fn bounds_round_trip_through_the_grid() {
        let grid: Array2<bool> = Array2::default((5, 3).nd());
        assert_eq!(bounds_of(&grid), (5, 3));
    }
}
