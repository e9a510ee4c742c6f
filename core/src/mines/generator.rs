use super::*;

pub trait FieldGenerator {
    fn generate(self, config: MinesConfig) -> MineField;
}

/// Places mines uniformly at random without replacement.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomFieldGenerator {
    seed: u64,
}

impl RandomFieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl FieldGenerator for RandomFieldGenerator {
    fn generate(self, config: MinesConfig) -> MineField {
        use rand::prelude::*;

        let total_cells = config.total_cells();

        // full boards need no sampling
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "field already full, generated anyway, requested {} mines but only {} fit",
                    config.mines,
                    total_cells
                );
            }
            return MineField::from_mine_mask(Array2::from_elem(config.size.nd(), true));
        }

        let mut mine_mask: Array2<bool> = Array2::default(config.size.nd());
        let mut mines_placed = 0;
        let mut free_cells = total_cells;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = mine_mask.as_slice_mut().expect("layout should be standard");
            while mines_placed < config.mines && free_cells > 0 {
                // index among the still-free cells, skipping placed mines
                let mut place: CellCount = rng.random_range(0..free_cells);
                for (i, cell) in cells.iter_mut().enumerate() {
                    let i = i as CellCount;
                    if *cell {
                        place += 1;
                    }
                    if i == place {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        let field = MineField::from_mine_mask(mine_mask);
        if field.mine_count() != config.mines {
            log::warn!(
                "generated field mine count mismatch, actual: {}, requested: {}",
                field.mine_count(),
                config.mines
            );
        }
        field
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_exactly_the_requested_mine_count() {
        for seed in 0..50 {
            let field = RandomFieldGenerator::new(seed).generate(MinesConfig::default());
            assert_eq!(field.mine_count(), 20);
            assert_eq!(field.size(), (15, 8));
        }
    }

    #[test]
    fn adjacency_tallies_match_the_mask_for_random_fields() {
        for seed in [1u64, 7, 42, 1234] {
            let field = RandomFieldGenerator::new(seed).generate(MinesConfig::default());
            let (size_x, size_y) = field.size();
            for x in 0..size_x {
                for y in 0..size_y {
                    if field.contains_mine((x, y)) {
                        continue;
                    }
                    let expected = field
                        .neighbors((x, y))
                        .filter(|&pos| field.contains_mine(pos))
                        .count() as u8;
                    assert_eq!(field.adjacent_count((x, y)), expected);
                }
            }
        }
    }

    #[test]
    fn identical_seeds_generate_identical_fields() {
        let a = RandomFieldGenerator::new(99).generate(MinesConfig::default());
        let b = RandomFieldGenerator::new(99).generate(MinesConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn full_board_request_fills_every_cell() {
        let config = MinesConfig::new_unchecked((2, 2), 4);
        let field = RandomFieldGenerator::new(0).generate(config);
        assert_eq!(field.mine_count(), 4);
        assert_eq!(field.safe_cell_count(), 0);
    }
}
