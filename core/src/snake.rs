use alloc::collections::VecDeque;
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{cell_count, types::offset_within, CellCount, Coord2};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn delta(self) -> (i8, i8) {
        use Direction::*;
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeConfig {
    pub size: Coord2,
    pub start: Coord2,
    pub start_direction: Direction,
}

impl SnakeConfig {
    pub fn new(size: Coord2, start: Coord2, start_direction: Direction) -> Self {
        let size = (size.0.max(2), size.1.max(2));
        let start = (start.0.min(size.0 - 1), start.1.min(size.1 - 1));
        Self {
            size,
            start,
            start_direction,
        }
    }

    pub const fn total_cells(&self) -> CellCount {
        cell_count(self.size)
    }
}

impl Default for SnakeConfig {
    /// The lobby's fixed arena: 30 columns by 15 rows, starting at (5, 5)
    /// heading right.
    fn default() -> Self {
        Self {
            size: (30, 15),
            start: (5, 5),
            start_direction: Direction::Right,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SnakeState {
    Alive,
    Crashed,
}

impl SnakeState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Crashed)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StepOutcome {
    NoChange,
    Moved,
    Ate,
    Crashed,
}

impl StepOutcome {
    pub const fn has_update(self) -> bool {
        use StepOutcome::*;
        match self {
            NoChange => false,
            Moved => true,
            Ate => true,
            Crashed => true,
        }
    }
}

/// One snake run from spawn to collision.
///
/// The body deque keeps the head first; cells stay pairwise distinct while
/// the snake is alive.
#[derive(Clone, Debug)]
pub struct SnakeGame {
    config: SnakeConfig,
    body: VecDeque<Coord2>,
    direction: Direction,
    queued_direction: Option<Direction>,
    food: Coord2,
    score: u32,
    state: SnakeState,
    rng: SmallRng,
}

impl SnakeGame {
    pub fn new(config: SnakeConfig, seed: u64) -> Self {
        let mut game = Self {
            config,
            body: VecDeque::from([config.start]),
            direction: config.start_direction,
            queued_direction: None,
            food: config.start,
            score: 0,
            state: SnakeState::Alive,
            rng: SmallRng::seed_from_u64(seed),
        };
        game.food = game.spawn_food();
        game
    }

    pub fn config(&self) -> SnakeConfig {
        self.config
    }

    pub fn state(&self) -> SnakeState {
        self.state
    }

    pub fn is_crashed(&self) -> bool {
        self.state.is_finished()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food(&self) -> Coord2 {
        self.food
    }

    pub fn head(&self) -> Coord2 {
        *self.body.front().expect("snake body is never empty")
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.body.iter().copied()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Queues the direction for the next step. A reversal straight into the
    /// opposite of the current direction would collide with the second body
    /// segment, so it is silently dropped while the body has more than one
    /// segment.
    pub fn steer(&mut self, direction: Direction) {
        if self.state.is_finished() {
            return;
        }
        if self.body.len() > 1 && direction == self.direction.opposite() {
            log::trace!("ignoring reversal into {:?}", direction);
            return;
        }
        self.queued_direction = Some(direction);
    }

    /// Advances the snake by one cell.
    ///
    /// The collision check runs against the full pre-step body, tail
    /// included: moving into the cell the tail is about to vacate still
    /// crashes.
    pub fn step(&mut self) -> StepOutcome {
        if self.state.is_finished() {
            return StepOutcome::NoChange;
        }

        if let Some(direction) = self.queued_direction.take() {
            self.direction = direction;
        }

        let head = self.head();
        let new_head = match offset_within(head, self.direction.delta(), self.config.size) {
            Some(pos) if !self.body.contains(&pos) => pos,
            _ => {
                self.state = SnakeState::Crashed;
                return StepOutcome::Crashed;
            }
        };

        self.body.push_front(new_head);
        if new_head == self.food {
            self.score += 1;
            self.food = self.spawn_food();
            log::trace!("ate at {:?}, score: {}", new_head, self.score);
            StepOutcome::Ate
        } else {
            self.body.pop_back();
            StepOutcome::Moved
        }
    }

    /// Picks a uniformly random free cell, resampling until the draw misses
    /// the body.
    fn spawn_food(&mut self) -> Coord2 {
        let (size_x, size_y) = self.config.size;
        debug_assert!(self.body.len() < usize::from(self.config.total_cells()));
        loop {
            let candidate = (
                self.rng.random_range(0..size_x),
                self.rng.random_range(0..size_y),
            );
            if !self.body.contains(&candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> SnakeGame {
        SnakeGame::new(SnakeConfig::default(), 7)
    }

    /// Grows the snake into a straight horizontal line ending at `head`.
    fn with_body(head: Coord2, len: usize) -> SnakeGame {
        let mut game = game();
        game.body.clear();
        for i in 0..len {
            game.body.push_back((head.0 - i as u8, head.1));
        }
        game.direction = Direction::Right;
        game.queued_direction = None;
        game.food = (0, 14);
        game
    }

    #[test]
    fn stepping_without_food_preserves_length() {
        let mut game = with_body((10, 5), 4);

        assert_eq!(game.step(), StepOutcome::Moved);
        assert_eq!(game.body_len(), 4);
        assert_eq!(game.head(), (11, 5));
    }

    #[test]
    fn eating_grows_by_one_and_scores() {
        let mut game = with_body((10, 5), 3);
        game.food = (11, 5);

        assert_eq!(game.step(), StepOutcome::Ate);
        assert_eq!(game.body_len(), 4);
        assert_eq!(game.score(), 1);
        assert_ne!(game.food(), (11, 5));
    }

    #[test]
    fn food_never_spawns_on_the_body() {
        let mut game = with_body((20, 5), 12);
        for _ in 0..1000 {
            let food = game.spawn_food();
            assert!(!game.body.contains(&food));
        }
    }

    #[test]
    fn crashing_into_a_wall_ends_the_run() {
        let mut game = with_body((29, 5), 3);

        assert_eq!(game.step(), StepOutcome::Crashed);
        assert!(game.is_crashed());
        assert_eq!(game.body_len(), 3);
    }

    #[test]
    fn crashing_into_the_body_includes_the_tail_cell() {
        // 2x2 loop: head at (1, 1), tail at (0, 1); moving left enters the
        // cell the tail would vacate, which still counts as a collision
        let mut game = game();
        game.body = VecDeque::from([(1, 1), (1, 0), (0, 0), (0, 1)]);
        game.direction = Direction::Left;
        game.queued_direction = None;
        game.score = 3;

        assert_eq!(game.step(), StepOutcome::Crashed);
        assert_eq!(game.score(), 3);
    }

    #[test]
    fn reversal_is_silently_ignored() {
        let mut game = with_body((10, 5), 3);

        game.steer(Direction::Left);
        assert_eq!(game.step(), StepOutcome::Moved);
        assert_eq!(game.head(), (11, 5));
    }

    #[test]
    fn single_segment_snake_may_reverse() {
        let mut game = with_body((10, 5), 1);

        game.steer(Direction::Left);
        assert_eq!(game.step(), StepOutcome::Moved);
        assert_eq!(game.head(), (9, 5));
    }

    #[test]
    fn queued_direction_applies_on_the_next_step_only() {
        let mut game = with_body((10, 5), 2);

        game.steer(Direction::Up);
        game.steer(Direction::Down);
        assert_eq!(game.head(), (10, 5));

        game.step();
        assert_eq!(game.head(), (10, 6));
    }

    #[test]
    fn stepping_after_a_crash_changes_nothing() {
        let mut game = with_body((29, 5), 2);
        game.step();

        assert_eq!(game.step(), StepOutcome::NoChange);
        assert_eq!(game.body_len(), 2);
    }
}
