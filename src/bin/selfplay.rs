//! Play the minimax engine against a random mover and print the game.
//!
//! Usage: `selfplay [--fen FEN] [--config PATH] [--max-moves N] [--mirror]`
//!
//! `--mirror` pits the engine against itself. Log verbosity follows
//! `RUST_LOG`.

use std::process::ExitCode;

use serde::Serialize;
use tracing::{info, warn};

use chess_rules::{
    Action, Board, Color, MaterialEvaluator, Minimax, MinimaxPlayer, Outcome, Player, RandomPlayer,
    SearchConfig, Termination,
};

const DEFAULT_MAX_MOVES: usize = 200;

struct Args {
    fen: Option<String>,
    config: Option<String>,
    max_moves: usize,
    mirror: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args { fen: None, config: None, max_moves: DEFAULT_MAX_MOVES, mirror: false };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--fen" => args.fen = Some(it.next().ok_or("--fen needs a value")?),
            "--config" => args.config = Some(it.next().ok_or("--config needs a path")?),
            "--max-moves" => {
                let value = it.next().ok_or("--max-moves needs a value")?;
                args.max_moves = value.parse().map_err(|_| format!("bad --max-moves: {value}"))?;
            }
            "--mirror" => args.mirror = true,
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

#[derive(Serialize)]
struct Summary {
    start_fen: String,
    final_fen: String,
    outcome: Outcome,
    termination: Option<Termination>,
    ended_by: &'static str,
    plies: usize,
    config: SearchConfig,
    pgn: String,
}

fn engine_player(config: &SearchConfig) -> MinimaxPlayer<MaterialEvaluator> {
    MinimaxPlayer::new(Minimax::new(MaterialEvaluator, config.clone()))
}

fn run(args: Args) -> Result<Summary, String> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            SearchConfig::from_json(&text).map_err(|e| e.to_string())?
        }
        None => SearchConfig::default(),
    };
    let mut board = match &args.fen {
        Some(fen) => Board::from_fen(fen).map_err(|e| e.to_string())?,
        None => Board::new(),
    };
    let start_fen = board.to_fen();

    let mut white: Box<dyn Player> = Box::new(engine_player(&config));
    let mut black: Box<dyn Player> = if args.mirror {
        Box::new(engine_player(&config))
    } else {
        Box::new(RandomPlayer::new())
    };
    info!(fen = %start_fen, depth = config.depth, mirror = args.mirror, "game starting");

    // Result forced by a resignation or an agreed draw, if any.
    let mut agreed: Option<(Outcome, &'static str)> = None;
    while !board.outcome().is_over() && board.moves_played() < args.max_moves {
        let side = board.side_to_move();
        let (mover, other) = match side {
            Color::White => (&mut white, &mut black),
            Color::Black => (&mut black, &mut white),
        };

        match mover.play(&board) {
            Action::Move(mv) => {
                if !board.apply_move(&mv) {
                    return Err(format!("{side:?} played an illegal move: {mv}"));
                }
            }
            Action::Resign => {
                info!(?side, "resigned");
                agreed = Some((Outcome::win_for(side.opposite()), "resignation"));
                break;
            }
            Action::OfferDraw => {
                if other.consider_draw(&board) {
                    info!(?side, "draw agreed");
                    agreed = Some((Outcome::Draw, "agreement"));
                    break;
                }
                warn!(?side, "draw offer declined");
            }
        }
    }

    let (outcome, ended_by) = match agreed {
        Some(forced) => forced,
        None if board.outcome().is_over() => (board.outcome(), "rules"),
        None => (Outcome::InProgress, "move limit"),
    };
    let pgn = board.pgn().render(outcome.result_token());
    info!(?outcome, ended_by, plies = board.moves_played(), "game over");

    Ok(Summary {
        start_fen,
        final_fen: board.to_fen(),
        outcome,
        termination: board.termination(),
        ended_by,
        plies: board.moves_played(),
        config,
        pgn,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chess_rules=info,selfplay=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let summary = match parse_args().and_then(run) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("selfplay: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("{}", summary.pgn);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("selfplay: {e}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
