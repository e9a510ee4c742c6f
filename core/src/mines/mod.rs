use alloc::collections::{BTreeSet, VecDeque};
use core::ops::{BitOr, Index};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::types::bounds_of;
use crate::{cell_count, neighbors, CellCount, Coord, Coord2, GameError, GridIndex, Result};

pub use generator::*;

mod generator;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinesConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl MinesConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let mines = mines.clamp(1, cell_count((size_x, size_y)));
        Self::new_unchecked((size_x, size_y), mines)
    }

    /// Like [`MinesConfig::new`] but rejects a mine count the board cannot
    /// hold instead of clamping it.
    pub fn try_new(size: Coord2, mines: CellCount) -> Result<Self> {
        if mines > cell_count(size) {
            return Err(GameError::TooManyMines);
        }
        Ok(Self::new(size, mines))
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.size)
    }
}

impl Default for MinesConfig {
    /// The lobby's fixed board: 15 columns by 8 rows, 20 mines.
    fn default() -> Self {
        Self::new_unchecked((15, 8), 20)
    }
}

/// Mine placement plus the per-cell adjacency tallies, computed once at
/// generation and never mutated afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct MineField {
    mine_mask: Array2<bool>,
    adjacent: Array2<u8>,
    mine_count: CellCount,
}

impl MineField {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        let bounds = bounds_of(&mine_mask);
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;

        let mut adjacent: Array2<u8> = Array2::default(mine_mask.dim());
        for ((ix, iy), tally) in adjacent.indexed_iter_mut() {
            let coords = (ix as Coord, iy as Coord);
            if mine_mask[coords.nd()] {
                continue;
            }
            *tally = neighbors(coords, bounds)
                .filter(|&pos| mine_mask[pos.nd()])
                .count() as u8;
        }

        Self {
            mine_mask,
            adjacent,
            mine_count,
        }
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(size.nd());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.nd()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn config(&self) -> MinesConfig {
        MinesConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        bounds_of(&self.mine_mask)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        cell_count(self.size())
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_count(&self, coords: Coord2) -> u8 {
        self.adjacent[coords.nd()]
    }

    pub(crate) fn neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> {
        neighbors(coords, self.size())
    }
}

impl Index<Coord2> for MineField {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

/// Player-visible state of a single board cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Hidden,
    Flagged,
    Revealed(u8),
}

impl Cell {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Hidden
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MinesState {
    Playing,
    Won,
    Lost,
}

impl MinesState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for MinesState {
    fn default() -> Self {
        Self::Playing
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlagOutcome {
    NoChange,
    Changed,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Used to merge outcomes when several cells are revealed in one move.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

/// Score for a won board: time-based, floored at 1 so a win never scores 0.
pub fn win_score(elapsed_secs: u32) -> u32 {
    10_000u32.saturating_sub(elapsed_secs).max(1)
}

/// One board from first reveal to win or loss.
#[derive(Clone, Debug, PartialEq)]
pub struct MinesGame {
    field: MineField,
    board: Array2<Cell>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: MinesState,
    triggered_mine: Option<Coord2>,
}

impl MinesGame {
    pub fn new(field: MineField) -> Self {
        let size = field.size();
        Self {
            field,
            board: Array2::default(size.nd()),
            revealed_count: 0,
            flagged_count: 0,
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> MinesState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.field.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.field.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    /// Remaining-mine estimate shown next to the board. Derived from the
    /// flag count, so over-flagging drives it negative.
    pub fn mines_left(&self) -> isize {
        (self.field.mine_count() as isize) - (self.flagged_count as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.nd()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use Cell::*;
        use FlagOutcome::*;

        let coords = self.field.validate_coords(coords)?;
        self.check_not_finished()?;

        Ok(match self.board[coords.nd()] {
            Hidden => {
                self.board[coords.nd()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.board[coords.nd()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) => NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.field.validate_coords(coords)?;

        // flagged and already-revealed cells are left alone
        if matches!(self.board[coords.nd()], Cell::Hidden) {
            self.check_not_finished()?;
            Ok(self.reveal_single_cell(coords))
        } else {
            Ok(RevealOutcome::NoChange)
        }
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell = self.board[coords.nd()];
        let has_mine = self.field[coords];

        match (cell, has_mine) {
            (Cell::Hidden, true) => {
                self.board[coords.nd()] = Cell::Revealed(0);
                self.triggered_mine = Some(coords);
                self.state = MinesState::Lost;
                RevealOutcome::HitMine
            }
            (Cell::Hidden, false) => {
                let adjacent_mines = self.field.adjacent_count(coords);
                self.board[coords.nd()] = Cell::Revealed(adjacent_mines);
                self.revealed_count += 1;
                log::trace!("revealed {:?}, adjacent mines: {}", coords, adjacent_mines);

                if adjacent_mines == 0 {
                    self.flood_reveal(coords);
                }

                if self.revealed_count == self.field.safe_cell_count() {
                    self.state = MinesState::Won;
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
            _ => RevealOutcome::NoChange,
        }
    }

    /// Iterative 8-connected flood fill out of a zero-adjacency cell.
    /// Stops at flagged or already-revealed cells and never enters a mine
    /// cell, since a mine neighbor always has an adjacency of at least 1
    /// on the cell that would reach it.
    fn flood_reveal(&mut self, start: Coord2) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self
            .field
            .neighbors(start)
            .filter(|&pos| matches!(self.board[pos.nd()], Cell::Hidden))
            .collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            if matches!(
                self.board[visit_coords.nd()],
                Cell::Revealed(_) | Cell::Flagged
            ) {
                continue;
            }

            let visit_adjacent = self.field.adjacent_count(visit_coords);
            self.board[visit_coords.nd()] = Cell::Revealed(visit_adjacent);
            self.revealed_count += 1;

            if visit_adjacent == 0 {
                to_visit.extend(
                    self.field
                        .neighbors(visit_coords)
                        .filter(|&pos| matches!(self.board[pos.nd()], Cell::Hidden))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
