// Copyright (C) 2020-2024 Andy Kurnia.

use crossplay::{
    alphabet, board, config, error, game_config, lexicon, move_picker, movegen, return_error,
};
use std::io::Read;

// tile numbering follows alphabet order.
// rack: array of numbers. 0 for blank, 1 for A.
// board: 2D array of numbers. 0 for empty, 1 for A, -1 for blank-as-A.
// count: maximum number of moves returned.
// sims: trials per candidate, 0 ranks by static equity only.
// seed: simulation seed, random if absent.
#[derive(serde::Deserialize)]
struct Question {
    rack: Vec<u8>,
    #[serde(rename = "board")]
    board_tiles: Vec<Vec<i8>>,
    #[serde(rename = "count", default = "default_count")]
    max_gen: usize,
    #[serde(rename = "sims", default)]
    num_trials: usize,
    #[serde(default)]
    seed: Option<u64>,
}

fn default_count() -> usize {
    10
}

// words are strings here: uppercase natural, lowercase blank, and
// played-through tiles in parentheses only in "move".
#[derive(serde::Serialize)]
struct Answer {
    #[serde(rename = "move")]
    play_str: String,
    word: String,
    row: i8,
    col: i8,
    down: bool,
    score: i16,
    leave: f32,
    equity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    sim_score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sim_equity: Option<f32>,
    // [row, col, letter] with letter negative for a blank.
    tiles: Vec<(i8, i8, i8)>,
    cross_words: Vec<String>,
    sweep: bool,
}

fn decode_board(
    game_config: &game_config::GameConfig,
    board_tiles: &[Vec<i8>],
) -> error::Returns<board::Board> {
    let alphabet = game_config.alphabet();
    let alphabet_len_without_blank = alphabet.len() - 1;
    let expected_dim = game_config.board_layout().dim();
    if board_tiles.len() != expected_dim.rows as usize {
        return_error!(format!(
            "board: need {} rows, found {} rows",
            expected_dim.rows,
            board_tiles.len()
        ));
    }
    let mut board = board::Board::new(expected_dim);
    for (row_num, row) in (0..).zip(board_tiles.iter()) {
        if row.len() != expected_dim.cols as usize {
            return_error!(format!(
                "board row {} (0-based): need {} cols, found {} cols",
                row_num,
                expected_dim.cols,
                row.len()
            ));
        }
        for (col_num, &signed_tile) in (0..).zip(row) {
            let letter = signed_tile.unsigned_abs();
            if signed_tile == 0 {
                continue;
            } else if letter > alphabet_len_without_blank {
                return_error!(format!(
                    "board row {row_num} col {col_num} (0-based): invalid tile {signed_tile}, alphabet size is {alphabet_len_without_blank}"
                ));
            }
            let tile = if signed_tile < 0 {
                board::BoardTile::wildcard(letter)
            } else {
                board::BoardTile::natural(letter)
            };
            board.place(row_num, col_num, tile)?;
        }
    }
    Ok(board)
}

fn answer_of(alphabet: &alphabet::Alphabet, candidate: &movegen::Candidate) -> Answer {
    let play = &candidate.play;
    Answer {
        play_str: play.fmt(alphabet).to_string(),
        word: alphabet.fmt_word(&play.word),
        row: play.row,
        col: play.col,
        down: play.down,
        score: play.score,
        leave: candidate.leave,
        equity: candidate.equity,
        sim_score: candidate.sim_score,
        sim_equity: candidate.sim_equity,
        tiles: play
            .tiles
            .iter()
            .map(|placed| {
                let letter = placed.tile.letter as i8;
                (
                    placed.row,
                    placed.col,
                    if placed.tile.is_wildcard() { -letter } else { letter },
                )
            })
            .collect(),
        cross_words: play.cross_words.iter().map(|w| alphabet.fmt_word(w)).collect(),
        sweep: play.is_sweep,
    }
}

// reads the question from the first positional arg, or stdin if none or "-".
pub fn main() -> error::Returns<()> {
    let config = config::parse_args(std::env::args().skip(1))?;
    config::init_logging(config.verbose);
    let data = match config.positional.first().map(String::as_str) {
        None | Some("-") => {
            let mut data = String::new();
            std::io::stdin().read_to_string(&mut data)?;
            data
        }
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            error::with_kind(error::ErrorKind::Io, format!("cannot read {path}: {e}"))
        })?,
    };
    let question = serde_json::from_str::<Question>(&data)?;

    let game_config = game_config::make_crossplay_game_config();
    let alphabet = game_config.alphabet();
    let board = decode_board(&game_config, &question.board_tiles)?;

    let lexicon = lexicon::load(alphabet, config.dict_path.as_deref())?;
    let leave = config::load_leave(alphabet, config.leaves_path.as_deref())?;
    let board_snapshot = movegen::BoardSnapshot {
        board: &board,
        game_config: &game_config,
        trie: &lexicon.trie,
        leave: &leave,
    };
    let move_picker = if question.num_trials > 0 {
        move_picker::MovePicker::Simmer {
            num_candidates: config.num_candidates.max(question.max_gen),
            num_trials: question.num_trials,
            seed: config::seed_or_random(question.seed.or(config.seed)),
            num_threads: config.num_threads,
        }
    } else {
        move_picker::MovePicker::Hasty
    };
    let mut move_generator = movegen::MoveGenerator::new(&game_config);
    move_picker.pick(
        &mut move_generator,
        &board_snapshot,
        &question.rack,
        question.max_gen,
        None,
    )?;

    let result = move_generator
        .plays
        .iter()
        .map(|candidate| answer_of(alphabet, candidate))
        .collect::<Vec<_>>();
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
