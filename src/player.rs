//! Move producers.
//!
//! A player only ever sees a shared reference to the game; anything that
//! needs to search works on its own clone.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::engine::Minimax;
use crate::eval::Evaluator;
use crate::moves::Move;

/// What a player does on its turn.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Action {
    Move(Move),
    Resign,
    OfferDraw,
}

pub trait Player {
    fn play(&mut self, board: &Board) -> Action;

    /// Answer the opponent's draw offer.
    fn consider_draw(&mut self, board: &Board) -> bool;
}

pub struct MinimaxPlayer<E: Evaluator> {
    engine: Minimax<E>,
}

impl<E: Evaluator> MinimaxPlayer<E> {
    pub fn new(engine: Minimax<E>) -> Self {
        MinimaxPlayer { engine }
    }
}

impl<E: Evaluator> Player for MinimaxPlayer<E> {
    /// Resigns when there is nothing to play.
    fn play(&mut self, board: &Board) -> Action {
        let mut scratch = board.clone();
        match self.engine.best_move(&mut scratch) {
            Some(result) => Action::Move(result.mv),
            None => Action::Resign,
        }
    }

    fn consider_draw(&mut self, board: &Board) -> bool {
        let mut scratch = board.clone();
        let color = scratch.side_to_move();
        self.engine.consider_draw(&mut scratch, color)
    }
}

/// Plays uniformly random legal moves.
pub struct RandomPlayer<R: Rng> {
    rng: R,
}

impl RandomPlayer<rand::rngs::ThreadRng> {
    pub fn new() -> Self {
        RandomPlayer { rng: rand::thread_rng() }
    }
}

impl Default for RandomPlayer<rand::rngs::ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> RandomPlayer<R> {
    /// Use a caller-supplied generator, e.g. a seeded one for reproducible
    /// games.
    pub fn with_rng(rng: R) -> Self {
        RandomPlayer { rng }
    }
}

impl<R: Rng> Player for RandomPlayer<R> {
    fn play(&mut self, board: &Board) -> Action {
        if board.outcome().is_over() {
            return Action::Resign;
        }
        match board.legal_moves().choose(&mut self.rng) {
            Some(&mv) => Action::Move(mv),
            None => Action::Resign,
        }
    }

    fn consider_draw(&mut self, _board: &Board) -> bool {
        self.rng.gen_bool(0.5)
    }
}
