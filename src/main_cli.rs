// Copyright (C) 2020-2024 Andy Kurnia.

use crossplay::{
    alphabet, board, config, display, error, game_config, lexicon, move_picker, movegen,
    return_error, rlhelper,
};
use std::io::Write;

static HELP: &str = "commands (rows and cols are 0-14):
  ROW COL LETTER        place one tile, lowercase for a blank   (7 7 H)
  ROW COL WORD H|V      place a whole word                      (7 5 HELLO H)
  show                  print the board
  clear                 reset the board
  source FILE           run commands from a file
  done                  finish entering tiles
  exit                  quit";

fn parse_coord(s: &str) -> error::Returns<i8> {
    s.parse::<i8>()
        .map_err(|_| error::with_kind(error::ErrorKind::Parse, format!("{s:?} is not a row or col")).into())
}

fn tile_of_char(alphabet: &alphabet::Alphabet, c: char) -> error::Returns<board::BoardTile> {
    let Some(letter) = alphabet.letter_of_char(c) else {
        return_error!(format!("invalid letter {c:?}"));
    };
    Ok(if c.is_lowercase() {
        board::BoardTile::wildcard(letter)
    } else {
        board::BoardTile::natural(letter)
    })
}

// a word may run through tiles already on the board if they agree.
// nothing is placed unless every letter fits.
fn place_word(
    alphabet: &alphabet::Alphabet,
    board: &mut board::Board,
    row: i8,
    col: i8,
    word: &str,
    down: bool,
) -> error::Returns<usize> {
    let dim = board.dim();
    if !dim.contains(row, col) || word.chars().count() > dim.rows.max(dim.cols) as usize {
        return_error!(format!("{word:?} does not fit at ({row},{col})"));
    }
    let mut to_place = Vec::new();
    for (i, c) in (0i8..).zip(word.chars()) {
        let (r, c_col) = if down { (row + i, col) } else { (row, col + i) };
        if !dim.contains(r, c_col) {
            return_error!(format!("{word:?} runs off the board at ({r},{c_col})"));
        }
        let tile = tile_of_char(alphabet, c)?;
        match board.get(r, c_col) {
            Some(existing) if existing.letter == tile.letter => {}
            Some(_) => {
                return_error!(format!("({r},{c_col}) already holds another letter"));
            }
            None => to_place.push((r, c_col, tile)),
        }
    }
    let num_placed = to_place.len();
    for (r, c, tile) in to_place {
        board.place(r, c, tile)?;
    }
    Ok(num_placed)
}

fn run_board_command(
    alphabet: &alphabet::Alphabet,
    board: &mut board::Board,
    args: &[String],
) -> error::Returns<()> {
    match args {
        [row, col, letter] => {
            let (row, col) = (parse_coord(row)?, parse_coord(col)?);
            let mut chars = letter.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return_error!(format!("{letter:?} is not a single letter"));
            };
            board.place(row, col, tile_of_char(alphabet, c)?)?;
            println!("placed {c} at ({row},{col})");
        }
        [row, col, word, dir] => {
            let (row, col) = (parse_coord(row)?, parse_coord(col)?);
            let down = match dir.to_ascii_uppercase().as_str() {
                "H" => false,
                "V" => true,
                _ => {
                    return_error!(format!("direction must be H or V, not {dir:?}"));
                }
            };
            let num_placed = place_word(alphabet, board, row, col, word, down)?;
            println!(
                "placed {word} at ({row},{col}) {}, {num_placed} new tiles",
                if down { "down" } else { "across" }
            );
        }
        _ => {
            return_error!("format: ROW COL LETTER or ROW COL WORD H|V".to_string());
        }
    }
    Ok(())
}

// returns None if the user quits.
fn enter_board(
    rl: &mut rustyline::Editor<rlhelper::MyHelper, rustyline::history::DefaultHistory>,
    game_config: &game_config::GameConfig,
) -> error::Returns<Option<board::Board>> {
    let alphabet = game_config.alphabet();
    let board_layout = game_config.board_layout();
    let mut board = board::Board::new(board_layout.dim());
    let mut cmd_stack = Vec::<(String, Option<(String, usize)>)>::new();
    loop {
        if let Some((line, source)) = cmd_stack.pop() {
            if let Some((filename, line_num)) = source {
                println!("{filename}:{line_num}> {line}");
            }
            let strings = match shell_words::split(&line) {
                Ok(strings) => strings,
                Err(err) => {
                    println!("bad quoting: {err}");
                    continue;
                }
            };
            let Some(cmd) = strings.first() else {
                continue;
            };
            match cmd.to_ascii_lowercase().as_str() {
                "done" => break,
                "exit" | "quit" => return Ok(None),
                "help" => println!("{HELP}"),
                "show" => display::print_board(alphabet, board_layout, &board),
                "clear" => {
                    board.clear();
                    println!("board cleared");
                }
                "source" => {
                    let Some(filename) = strings.get(1) else {
                        println!("need a file name");
                        continue;
                    };
                    match std::fs::read_to_string(filename) {
                        Ok(whole_file) => {
                            let v = cmd_stack.len();
                            for (line_num, line) in whole_file.lines().enumerate() {
                                cmd_stack.push((line.to_string(), Some((filename.clone(), line_num + 1))));
                            }
                            cmd_stack[v..].reverse();
                        }
                        Err(err) => println!("cannot open {filename}: {err}"),
                    }
                }
                _ => {
                    if let Err(err) = run_board_command(alphabet, &mut board, &strings) {
                        println!("{err}");
                    }
                }
            }
        } else {
            match rl.readline("tile> ") {
                Ok(line) => {
                    rl.add_history_entry(line.as_str())?;
                    cmd_stack.push((line, None));
                }
                Err(rustyline::error::ReadlineError::Interrupted) => return Ok(None),
                // end of input finishes the board like done.
                Err(rustyline::error::ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
    }
    Ok(Some(board))
}

fn enter_rack(
    rl: &mut rustyline::Editor<rlhelper::MyHelper, rustyline::history::DefaultHistory>,
    game_config: &game_config::GameConfig,
) -> error::Returns<Option<Vec<u8>>> {
    loop {
        let line = match rl.readline("rack (? for a blank)> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted | rustyline::error::ReadlineError::Eof) => {
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        match game_config.alphabet().parse_rack(&line) {
            Ok(rack) if rack.is_empty() => println!("the rack is empty"),
            Ok(rack) if rack.len() > game_config.rack_size() as usize => {
                println!("a rack holds at most {} tiles", game_config.rack_size())
            }
            Ok(rack) => return Ok(Some(rack)),
            Err(err) => println!("{err}"),
        }
    }
}

fn print_candidates(alphabet: &alphabet::Alphabet, candidates: &[movegen::Candidate], simmed: bool) {
    println!("{}", "=".repeat(78));
    if simmed {
        println!(" {:>2}  {:>5}  {:>6}  {:>6}  {:>6}  {:<24} Extra", "#", "Score", "Leave", "SimPts", "SimEq", "Move");
    } else {
        println!(" {:>2}  {:>5}  {:>6}  {:>6}  {:<24} Extra", "#", "Score", "Leave", "Equity", "Move");
    }
    println!("{}", "-".repeat(78));
    for (i, candidate) in candidates.iter().enumerate() {
        let play = &candidate.play;
        let mut extra = Vec::new();
        if play.is_sweep {
            extra.push("SWEEP +40".to_string());
        }
        if !play.cross_words.is_empty() {
            extra.push(format!(
                "Cross: {}",
                play.cross_words
                    .iter()
                    .map(|w| alphabet.fmt_word(w))
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }
        let move_str = play.fmt(alphabet).to_string();
        if simmed {
            println!(
                " {:>2}  {:>5}  {:>6.1}  {:>6.1}  {:>6.1}  {:<24} {}",
                i + 1,
                play.score,
                candidate.leave,
                candidate.sim_score.unwrap_or(0.0),
                candidate.final_equity(),
                move_str,
                extra.join("  ")
            );
        } else {
            println!(
                " {:>2}  {:>5}  {:>6.1}  {:>6.1}  {:<24} {}",
                i + 1,
                play.score,
                candidate.leave,
                candidate.equity,
                move_str,
                extra.join("  ")
            );
        }
    }
    println!("{}", "=".repeat(78));
}

fn print_best(alphabet: &alphabet::Alphabet, candidate: &movegen::Candidate) {
    let play = &candidate.play;
    println!(
        "\nbest move: {} at ({},{}) {} for {} points",
        alphabet.fmt_word(&play.word),
        play.row,
        play.col,
        if play.down { "down" } else { "across" },
        play.score
    );
    if play.is_sweep {
        println!("  sweep, all tiles played, +40 bonus");
    }
    print!("  tiles to place:");
    for placed in play.tiles.iter() {
        let label = if placed.tile.is_wildcard() {
            alphabet.blank_label(placed.tile.letter)
        } else {
            alphabet.label(placed.tile.letter)
        };
        print!(" {}>({},{})", label.unwrap_or("_"), placed.row, placed.col);
    }
    println!();
}

fn main() -> error::Returns<()> {
    let config = config::parse_args(std::env::args().skip(1))?;
    config::init_logging(config.verbose);
    let game_config = game_config::make_crossplay_game_config();
    let alphabet = game_config.alphabet();
    let lexicon = lexicon::load(alphabet, config.dict_path.as_deref())?;
    let leave = config::load_leave(alphabet, config.leaves_path.as_deref())?;

    let mut rl = rlhelper::new_rl_editor()?;
    println!("crossplay best move finder\n\n{HELP}\n");
    let Some(board) = enter_board(&mut rl, &game_config)? else {
        return Ok(());
    };
    display::print_board(alphabet, game_config.board_layout(), &board);
    let Some(rack) = enter_rack(&mut rl, &game_config)? else {
        return Ok(());
    };

    let board_snapshot = movegen::BoardSnapshot {
        board: &board,
        game_config: &game_config,
        trie: &lexicon.trie,
        leave: &leave,
    };
    let mut move_generator = movegen::MoveGenerator::new(&game_config);
    println!("\nrack: {}", alphabet.fmt_rack(&rack));
    let t0 = std::time::Instant::now();
    move_picker::MovePicker::Hasty.pick(
        &mut move_generator,
        &board_snapshot,
        &rack,
        config.top_n,
        None,
    )?;
    println!(
        "found {} moves in {:.2}s\n",
        move_generator.plays.len(),
        t0.elapsed().as_secs_f64()
    );
    if move_generator.plays.is_empty() {
        println!("no valid moves, check the board and rack");
        return Ok(());
    }
    print_candidates(alphabet, &move_generator.plays, false);

    if config.num_trials > 0 && config.num_candidates > 0 {
        let seed = config::seed_or_random(config.seed);
        println!(
            "\nsimulating {} candidates, {} trials each (seed {seed})",
            config.num_candidates.min(move_generator.plays.len()),
            config.num_trials
        );
        let picker = move_picker::MovePicker::Simmer {
            num_candidates: config.num_candidates,
            num_trials: config.num_trials,
            seed,
            num_threads: config.num_threads,
        };
        let mut progress = |done: usize, total: usize| {
            print!("\r  {done}/{total}");
            let _ = std::io::stdout().flush();
        };
        picker.pick(
            &mut move_generator,
            &board_snapshot,
            &rack,
            config.top_n,
            Some(&mut progress),
        )?;
        println!("\n");
        print_candidates(alphabet, &move_generator.plays, true);
    }

    if let Some(best) = move_generator.plays.first() {
        print_best(alphabet, best);
    }
    Ok(())
}
