pub mod board;
pub mod engine;
pub mod error;
pub mod eval;
pub mod fen;
pub mod moves;
pub mod pgn;
pub mod piece;
pub mod player;
pub mod san;
pub mod square;

pub use board::{Board, CastlingRights, Outcome, Termination};
pub use engine::{Minimax, SearchConfig, SearchResult};
pub use error::{ChessError, ErrorKind, Result};
pub use eval::{Evaluator, MaterialEvaluator, TrivialEvaluator};
pub use fen::{Fen, START_FEN};
pub use moves::{CastleSide, Move};
pub use pgn::Pgn;
pub use piece::{Color, Piece, PieceKind};
pub use player::{Action, MinimaxPlayer, Player, RandomPlayer};
pub use san::{parse_input, parse_san};
pub use square::Square;
