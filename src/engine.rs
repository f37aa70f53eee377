use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::error::{ChessError, Result};
use crate::eval::Evaluator;
use crate::moves::Move;
use crate::piece::Color;

// =============================================================================
// Configuration
// =============================================================================

/// Knobs for the minimax search. Missing JSON fields take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search depth in plies, counting the candidate move itself. Depth 1
    /// scores each legal move by evaluating the position it leads to.
    pub depth: u32,
    /// Prune with alpha-beta. The chosen move is the same either way; only
    /// the node count changes.
    pub alpha_beta: bool,
    /// A player accepts a draw offer when its searched evaluation, from its
    /// own side, is below this margin.
    pub draw_cutoff: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfig {
    pub fn new() -> Self {
        SearchConfig {
            depth: 2,
            alpha_beta: false,
            draw_cutoff: 1.0,
        }
    }

    /// Parse a JSON object such as `{"depth": 3, "alpha_beta": true}`.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SearchConfig =
            serde_json::from_str(text).map_err(|e| ChessError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(ChessError::InvalidConfig("depth must be at least 1".into()));
        }
        if !self.draw_cutoff.is_finite() {
            return Err(ChessError::InvalidConfig(format!("draw_cutoff must be finite, got {}", self.draw_cutoff)));
        }
        Ok(())
    }
}

/// The move a search settled on and its score, White-positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchResult {
    pub mv: Move,
    pub score: f64,
    /// Leaf positions handed to the evaluator.
    pub evals: u64,
}

// =============================================================================
// Search
// =============================================================================

/// Fixed-depth minimax. White maximises, Black minimises.
///
/// The board is searched in place with `apply_move`/`undo_last_move` and is
/// back in its starting state when any method returns.
pub struct Minimax<E: Evaluator> {
    evaluator: E,
    config: SearchConfig,
}

impl<E: Evaluator> Minimax<E> {
    pub fn new(evaluator: E, config: SearchConfig) -> Self {
        Minimax { evaluator, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Pick a move for the side to move, or `None` if the game is over.
    ///
    /// Moves are tried in `legal_moves` order and a later move replaces the
    /// current best only if it scores strictly better, so equal scores keep
    /// the first one found.
    pub fn best_move(&self, board: &mut Board) -> Option<SearchResult> {
        if board.outcome().is_over() {
            return None;
        }
        let moves = board.legal_moves();
        let maximizing = board.side_to_move() == Color::White;
        let mut evals = 0;
        let mut best: Option<(Move, f64)> = None;

        for mv in moves {
            let bound = best.map(|(_, s)| s);
            let (alpha, beta) = match (maximizing, bound) {
                (true, Some(s)) => (s, f64::INFINITY),
                (false, Some(s)) => (f64::NEG_INFINITY, s),
                (_, None) => (f64::NEG_INFINITY, f64::INFINITY),
            };
            let score = self.search_child(board, &mv, alpha, beta, &mut evals);
            let better = match best {
                None => true,
                Some((_, s)) if maximizing => score > s,
                Some((_, s)) => score < s,
            };
            if better {
                best = Some((mv, score));
            }
        }

        let (mv, score) = best?;
        debug!(
            %mv,
            score,
            evals,
            depth = self.config.depth,
            alpha_beta = self.config.alpha_beta,
            "search finished"
        );
        Some(SearchResult { mv, score, evals })
    }

    /// The searched value of the current position, White-positive.
    pub fn evaluate(&self, board: &mut Board) -> f64 {
        let mut evals = 0;
        self.search(board, self.config.depth, f64::NEG_INFINITY, f64::INFINITY, &mut evals)
    }

    /// Accept a draw when `color`'s searched evaluation is below the cutoff.
    pub fn consider_draw(&self, board: &mut Board, color: Color) -> bool {
        let score = self.evaluate(board);
        let own = if color == Color::White { score } else { -score };
        let accept = own < self.config.draw_cutoff;
        debug!(?color, score = own, cutoff = self.config.draw_cutoff, accept, "draw offer considered");
        accept
    }

    fn search_child(&self, board: &mut Board, mv: &Move, alpha: f64, beta: f64, evals: &mut u64) -> f64 {
        let applied = board.apply_move(mv);
        assert!(applied, "generated move {mv} was rejected");
        let score = self.search(board, self.config.depth - 1, alpha, beta, evals);
        board.undo_last_move();
        score
    }

    /// Fail-soft minimax. Without pruning the window is never narrowed and
    /// every value returned is exact; with pruning a value outside
    /// `(alpha, beta)` is only a bound on the same side of the window.
    fn search(&self, board: &mut Board, depth: u32, mut alpha: f64, mut beta: f64, evals: &mut u64) -> f64 {
        if depth == 0 || board.outcome().is_over() {
            *evals += 1;
            return self.evaluator.evaluate(board);
        }

        let moves = board.legal_moves();
        let maximizing = board.side_to_move() == Color::White;
        let mut best = if maximizing { f64::NEG_INFINITY } else { f64::INFINITY };

        for mv in &moves {
            let applied = board.apply_move(mv);
            assert!(applied, "generated move {mv} was rejected");
            let score = self.search(board, depth - 1, alpha, beta, evals);
            board.undo_last_move();

            if maximizing {
                best = best.max(score);
                if self.config.alpha_beta {
                    alpha = alpha.max(score);
                }
            } else {
                best = best.min(score);
                if self.config.alpha_beta {
                    beta = beta.min(score);
                }
            }
            if self.config.alpha_beta && alpha >= beta {
                break;
            }
        }

        best
    }
}
