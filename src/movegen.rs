// Copyright (C) 2020-2025 Andy Kurnia.

use super::{alphabet, bag, board, display, error, game_config, leave, matrix, trie};

// for an empty cell with a perpendicular neighbour.
#[derive(Clone, Copy)]
struct CrossSet {
    bits: u32,  // bit t is set iff letter t completes a valid perpendicular word
    score: i16, // face value of the perpendicular neighbours
}

struct WorkingBuffer {
    rack_tally: Box<[u8]>,                               // 27 for ?A-Z
    leave_tally: Box<[u8]>,                              // 27 for ?A-Z
    word_buffer: Box<[u8]>,                              // max(r, c)
    wildcard_buffer: Box<[bool]>,                        // max(r, c)
    cross_set_for_across_plays: Box<[Option<CrossSet>]>, // r*c
    cross_set_for_down_plays: Box<[Option<CrossSet>]>,   // r*c
}

impl WorkingBuffer {
    fn new(game_config: &game_config::GameConfig) -> Box<Self> {
        let dim = game_config.board_layout().dim();
        let alphabet_len = game_config.alphabet().len() as usize;
        let lane_len = std::cmp::max(dim.rows, dim.cols) as usize;
        Box::new(Self {
            rack_tally: vec![0u8; alphabet_len].into_boxed_slice(),
            leave_tally: vec![0u8; alphabet_len].into_boxed_slice(),
            word_buffer: vec![0u8; lane_len].into_boxed_slice(),
            wildcard_buffer: vec![false; lane_len].into_boxed_slice(),
            cross_set_for_across_plays: vec![None; dim.num_cells()].into_boxed_slice(),
            cross_set_for_down_plays: vec![None; dim.num_cells()].into_boxed_slice(),
        })
    }
}

pub struct BoardSnapshot<'a> {
    pub board: &'a board::Board,
    pub game_config: &'a game_config::GameConfig<'a>,
    pub trie: &'a trie::Trie,
    pub leave: &'a leave::Leave,
}

// a tile the play physically puts down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacedTile {
    pub row: i8,
    pub col: i8,
    pub tile: board::BoardTile,
}

// placement facts only. these never change after generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Play {
    pub down: bool,
    pub row: i8,
    pub col: i8,
    pub word: Box<[u8]>, // natural letters, played-through tiles included
    pub score: i16,
    pub tiles: Box<[PlacedTile]>,
    pub cross_words: Box<[Box<[u8]>]>,
    pub is_sweep: bool,
}

impl Play {
    pub fn blank_positions(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.tiles
            .iter()
            .filter(|placed| placed.tile.is_wildcard())
            .map(|placed| (placed.row, placed.col))
    }

    // what came off the rack: wildcard placements map back to the blank.
    pub fn rack_tiles_used(&self) -> impl Iterator<Item = u8> + '_ {
        self.tiles.iter().map(|placed| placed.tile.rack_tile())
    }

    #[inline(always)]
    pub fn num_tiles_played(&self) -> usize {
        self.tiles.len()
    }

    pub fn fmt<'a>(&'a self, alphabet: &'a alphabet::Alphabet<'a>) -> WriteablePlay<'a> {
        WriteablePlay {
            play: self,
            alphabet,
        }
    }
}

pub struct WriteablePlay<'a> {
    play: &'a Play,
    alphabet: &'a alphabet::Alphabet<'a>,
}

impl std::fmt::Display for WriteablePlay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let play = self.play;
        if play.down {
            write!(f, "{}{} ", display::column(play.col), play.row + 1)?;
        } else {
            write!(f, "{}{} ", play.row + 1, display::column(play.col))?;
        }
        let mut inside = false;
        for (i, &letter) in (0i8..).zip(play.word.iter()) {
            let (row, col) = if play.down {
                (play.row + i, play.col)
            } else {
                (play.row, play.col + i)
            };
            let placed = play
                .tiles
                .iter()
                .find(|placed| placed.row == row && placed.col == col);
            if placed.is_none() != inside {
                write!(f, "{}", if inside { ")" } else { "(" })?;
                inside = !inside;
            }
            let label = match placed {
                Some(placed) if placed.tile.is_wildcard() => self.alphabet.blank_label(letter),
                _ => self.alphabet.label(letter),
            };
            write!(f, "{}", label.unwrap_or("_"))?;
        }
        if inside {
            write!(f, ")")?;
        }
        write!(f, " {}", play.score)
    }
}

// a play plus what downstream stages learn about it.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub play: Play,
    pub leave: f32,
    pub equity: f32,
    pub sim_score: Option<f32>,
    pub sim_equity: Option<f32>,
}

impl Candidate {
    fn new(play: Play) -> Self {
        let equity = play.score as f32;
        Self {
            play,
            leave: 0.0,
            equity,
            sim_score: None,
            sim_equity: None,
        }
    }

    // simulated equity when available, otherwise static equity.
    #[inline(always)]
    pub fn final_equity(&self) -> f32 {
        self.sim_equity.unwrap_or(self.equity)
    }
}

fn gen_cross_sets(
    board_snapshot: &BoardSnapshot<'_>,
    down_plays: bool,
    cross_sets: &mut [Option<CrossSet>],
) {
    let board = board_snapshot.board;
    let trie = board_snapshot.trie;
    let alphabet = board_snapshot.game_config.alphabet();
    let dim = board.dim();
    // the perpendicular lanes: columns for across plays, rows for down plays.
    let num_lanes = if down_plays { dim.rows } else { dim.cols };
    for lane in 0..num_lanes {
        let strider = dim.lane(!down_plays, lane);
        let len = strider.len();
        let occupied = |i: i8| board.at(strider.at(i)).is_some();
        for i in 0..len {
            let idx = strider.at(i);
            cross_sets[idx] = None;
            if occupied(i) || !((i > 0 && occupied(i - 1)) || (i + 1 < len && occupied(i + 1))) {
                continue;
            }
            let mut start = i;
            while start > 0 && occupied(start - 1) {
                start -= 1;
            }
            let mut end = i + 1;
            while end < len && occupied(end) {
                end += 1;
            }
            let mut score = 0i16;
            let mut p = trie::Trie::ROOT;
            for tile in (start..i).filter_map(|j| board.at(strider.at(j))) {
                score += tile.face_value(alphabet);
                p = trie.seek(p, tile.letter);
            }
            for tile in (i + 1..end).filter_map(|j| board.at(strider.at(j))) {
                score += tile.face_value(alphabet);
            }
            let mut bits = 0u32;
            if p >= 0 {
                for letter in 1..alphabet.len() {
                    let mut q = trie.seek(p, letter);
                    for tile in (i + 1..end).filter_map(|j| board.at(strider.at(j))) {
                        if q < 0 {
                            break;
                        }
                        q = trie.seek(q, tile.letter);
                    }
                    if trie.accepts(q) {
                        bits |= 1 << letter;
                    }
                }
            }
            cross_sets[idx] = Some(CrossSet { bits, score });
        }
    }
}

// the perpendicular word through (row, col) if letter were placed there.
fn cross_word(board: &board::Board, down: bool, row: i8, col: i8, letter: u8) -> Box<[u8]> {
    let (dr, dc) = if down { (0, 1) } else { (1, 0) };
    let (mut r, mut c) = (row, col);
    while board.is_occupied(r - dr, c - dc) {
        r -= dr;
        c -= dc;
    }
    let mut word = Vec::new();
    loop {
        if r == row && c == col {
            word.push(letter);
        } else if let Some(tile) = board.get(r, c) {
            word.push(tile.letter);
        } else {
            break;
        }
        r += dr;
        c += dc;
    }
    word.into_boxed_slice()
}

fn is_anchor(board: &board::Board, row: i8, col: i8) -> bool {
    board.is_empty_at(row, col)
        && (board.is_occupied(row - 1, col)
            || board.is_occupied(row + 1, col)
            || board.is_occupied(row, col - 1)
            || board.is_occupied(row, col + 1))
}

struct Env<'a, F: FnMut(Play)> {
    board_snapshot: &'a BoardSnapshot<'a>,
    cross_set_for_across_plays: &'a [Option<CrossSet>],
    cross_set_for_down_plays: &'a [Option<CrossSet>],
    rack_tally: &'a mut [u8],
    word_buffer: &'a mut [u8],
    wildcard_buffer: &'a mut [bool],
    rack_len: i8,
    found: &'a mut F,
    // the span being filled
    down: bool,
    lane: i8,
    strider: matrix::Strider,
    start: i8,
    len: i8,
}

impl<F: FnMut(Play)> Env<'_, F> {
    #[inline(always)]
    fn cross_sets(&self) -> &[Option<CrossSet>] {
        if self.down {
            self.cross_set_for_down_plays
        } else {
            self.cross_set_for_across_plays
        }
    }

    #[inline(always)]
    fn row_col(&self, idx: i8) -> (i8, i8) {
        if self.down {
            (idx, self.lane)
        } else {
            (self.lane, idx)
        }
    }

    fn try_fill(&mut self, down: bool, lane: i8, start: i8, len: i8) {
        let board = self.board_snapshot.board;
        let strider = board.dim().lane(down, lane);
        if start < 0 || len < 2 || start + len > strider.len() {
            return;
        }
        // the word would not end where the tiles end.
        if start > 0 && board.at(strider.at(start - 1)).is_some() {
            return;
        }
        if start + len < strider.len() && board.at(strider.at(start + len)).is_some() {
            return;
        }
        let needed = (start..start + len)
            .filter(|&i| board.at(strider.at(i)).is_none())
            .count();
        if needed == 0 || needed > self.rack_len as usize {
            return;
        }
        self.down = down;
        self.lane = lane;
        self.strider = strider;
        self.start = start;
        self.len = len;
        fill(self, 0, trie::Trie::ROOT);
    }

    // spans through an anchor. the span starts at the occupied run just before
    // the anchor, or up to rack_len - 1 empty cells earlier than that.
    fn gen_through_anchor(&mut self, down: bool, lane: i8, anchor: i8) {
        let board = self.board_snapshot.board;
        let strider = board.dim().lane(down, lane);
        let occupied = |i: i8| board.at(strider.at(i)).is_some();
        let mut prefix = 0;
        while anchor - prefix > 0 && occupied(anchor - prefix - 1) {
            prefix += 1;
        }
        for lead in 0..self.rack_len {
            let start = anchor - prefix - lead;
            if start < 0 {
                break;
            }
            let mut needed = (start..=anchor).filter(|&i| !occupied(i)).count() as i8;
            let mut end = anchor + 1;
            while needed <= self.rack_len {
                if end - start >= 2 {
                    self.try_fill(down, lane, start, end - start);
                }
                if end >= strider.len() {
                    break;
                }
                if !occupied(end) {
                    needed += 1;
                }
                end += 1;
            }
        }
    }
}

fn fill<F: FnMut(Play)>(env: &mut Env<'_, F>, idx: i8, p: i32) {
    let trie = env.board_snapshot.trie;
    if idx == env.len {
        if trie.accepts(p) {
            record(env);
        }
        return;
    }
    let cell = env.strider.at(env.start + idx);
    if let Some(tile) = env.board_snapshot.board.at(cell) {
        let q = trie.seek(p, tile.letter);
        if q > 0 {
            env.word_buffer[idx as usize] = tile.letter;
            fill(env, idx + 1, q);
        }
        return;
    }
    let allowed = env.cross_sets()[cell].map_or(!0u32, |cross_set| cross_set.bits);
    let alphabet_len = env.board_snapshot.game_config.alphabet().len();
    for tile in 1..alphabet_len {
        if env.rack_tally[tile as usize] == 0 || allowed & (1 << tile) == 0 {
            continue;
        }
        let q = trie.seek(p, tile);
        if q <= 0 {
            continue;
        }
        env.rack_tally[tile as usize] -= 1;
        env.word_buffer[idx as usize] = tile;
        env.wildcard_buffer[idx as usize] = false;
        fill(env, idx + 1, q);
        env.rack_tally[tile as usize] += 1;
    }
    if env.rack_tally[0] > 0 {
        for tile in 1..alphabet_len {
            // a natural copy already covered this letter here.
            if env.rack_tally[tile as usize] > 0 || allowed & (1 << tile) == 0 {
                continue;
            }
            let q = trie.seek(p, tile);
            if q <= 0 {
                continue;
            }
            env.rack_tally[0] -= 1;
            env.word_buffer[idx as usize] = tile;
            env.wildcard_buffer[idx as usize] = true;
            fill(env, idx + 1, q);
            env.rack_tally[0] += 1;
        }
    }
}

fn record<F: FnMut(Play)>(env: &mut Env<'_, F>) {
    let board = env.board_snapshot.board;
    let game_config = env.board_snapshot.game_config;
    let alphabet = game_config.alphabet();
    let premiums = game_config.board_layout().premiums();
    let mut main_score = 0i16;
    let mut word_multiplier = 1i16;
    let mut cross_scores = 0i16;
    let mut tiles = Vec::with_capacity(env.len as usize);
    let mut cross_words = Vec::new();
    for idx in 0..env.len {
        let cell = env.strider.at(env.start + idx);
        if let Some(tile) = board.at(cell) {
            main_score += tile.face_value(alphabet);
            continue;
        }
        let letter = env.word_buffer[idx as usize];
        let tile = if env.wildcard_buffer[idx as usize] {
            board::BoardTile::wildcard(letter)
        } else {
            board::BoardTile::natural(letter)
        };
        let (row, col) = env.row_col(env.start + idx);
        let premium = premiums[cell];
        let tile_score = tile.face_value(alphabet) * premium.tile_multiplier as i16;
        main_score += tile_score;
        word_multiplier *= premium.word_multiplier as i16;
        if let Some(cross_set) = env.cross_sets()[cell] {
            // only the newly covered premium applies to the cross word.
            cross_scores += (cross_set.score + tile_score) * premium.word_multiplier as i16;
            cross_words.push(cross_word(board, env.down, row, col, letter));
        }
        tiles.push(PlacedTile { row, col, tile });
    }
    let num_played = tiles.len() as i8;
    let (row, col) = env.row_col(env.start);
    (env.found)(Play {
        down: env.down,
        row,
        col,
        word: env.word_buffer[..env.len as usize].into(),
        score: main_score * word_multiplier
            + cross_scores
            + game_config.num_played_bonus(num_played),
        tiles: tiles.into_boxed_slice(),
        cross_words: cross_words.into_boxed_slice(),
        is_sweep: num_played >= game_config.rack_size(),
    });
}

fn gen_place_moves<'a, F: FnMut(Play)>(
    board_snapshot: &'a BoardSnapshot<'a>,
    working_buffer: &'a mut WorkingBuffer,
    rack: &[u8],
    found: &'a mut F,
) {
    let WorkingBuffer {
        rack_tally,
        word_buffer,
        wildcard_buffer,
        cross_set_for_across_plays,
        cross_set_for_down_plays,
        ..
    } = working_buffer;
    rack_tally.iter_mut().for_each(|m| *m = 0);
    rack.iter().for_each(|&tile| rack_tally[tile as usize] += 1);
    gen_cross_sets(board_snapshot, false, cross_set_for_across_plays);
    gen_cross_sets(board_snapshot, true, cross_set_for_down_plays);

    let board = board_snapshot.board;
    let dim = board.dim();
    let mut env = Env {
        board_snapshot,
        cross_set_for_across_plays,
        cross_set_for_down_plays,
        rack_tally,
        word_buffer,
        wildcard_buffer,
        rack_len: rack.len() as i8,
        found,
        down: false,
        lane: 0,
        strider: dim.across(0),
        start: 0,
        len: 0,
    };

    if board.is_board_empty() {
        // every opening span covers the star.
        let board_layout = board_snapshot.game_config.board_layout();
        let (star_row, star_col) = (board_layout.star_row(), board_layout.star_col());
        let max_len = std::cmp::min(env.rack_len + 1, std::cmp::max(dim.rows, dim.cols));
        for len in 2..=max_len {
            for down in [false, true] {
                let (lane, center, lane_len) = if down {
                    (star_col, star_row, dim.rows)
                } else {
                    (star_row, star_col, dim.cols)
                };
                if len > lane_len {
                    continue;
                }
                for start in std::cmp::max(0, center - len + 1)..=std::cmp::min(center, lane_len - len)
                {
                    env.try_fill(down, lane, start, len);
                }
            }
        }
    } else {
        for down in [false, true] {
            for row in 0..dim.rows {
                for col in 0..dim.cols {
                    if is_anchor(board, row, col) {
                        if down {
                            env.gen_through_anchor(down, col, row);
                        } else {
                            env.gen_through_anchor(down, row, col);
                        }
                    }
                }
            }
        }
    }
}

fn check_inputs(board_snapshot: &BoardSnapshot<'_>, rack: &[u8]) -> error::Returns<()> {
    let game_config = board_snapshot.game_config;
    let alphabet = game_config.alphabet();
    if rack.len() > game_config.rack_size() as usize {
        return_error!(format!(
            "rack has {} tiles, limit is {}",
            rack.len(),
            game_config.rack_size()
        ));
    }
    if let Some(&tile) = rack.iter().find(|&&tile| tile >= alphabet.len()) {
        return_error!(format!("rack has invalid tile {tile}"));
    }
    let board = board_snapshot.board;
    let dim = game_config.board_layout().dim();
    if board.dim() != dim {
        return_error!(format!(
            "board is {}x{}, expected {}x{}",
            board.dim().rows,
            board.dim().cols,
            dim.rows,
            dim.cols
        ));
    }
    if let Some(tile) = board
        .tiles()
        .find(|tile| tile.letter == 0 || tile.letter >= alphabet.len())
    {
        return_error!(format!("board has invalid tile {}", tile.letter));
    }
    // board and rack together may not use more of a tile than the bag holds.
    bag::unseen_tally(alphabet, board, rack)?;
    Ok(())
}

pub struct GenMovesParams<'a> {
    pub board_snapshot: &'a BoardSnapshot<'a>,
    pub rack: &'a [u8],
    pub max_gen: usize,
    pub use_leave: bool,
}

pub struct MoveGenerator {
    working_buffer: Box<WorkingBuffer>,
    pub plays: Vec<Candidate>,
}

impl MoveGenerator {
    pub fn new(game_config: &game_config::GameConfig) -> Self {
        Self {
            working_buffer: WorkingBuffer::new(game_config),
            plays: Vec::new(),
        }
    }

    // every accepted placement, in enumeration order, duplicates included.
    pub fn gen_all(
        &mut self,
        board_snapshot: &BoardSnapshot<'_>,
        rack: &[u8],
    ) -> error::Returns<()> {
        self.plays.clear();
        check_inputs(board_snapshot, rack)?;
        let plays = &mut self.plays;
        gen_place_moves(
            board_snapshot,
            &mut self.working_buffer,
            rack,
            &mut |play| plays.push(Candidate::new(play)),
        );
        Ok(())
    }

    // unique plays, best first, at most max_gen of them.
    pub fn gen_moves(&mut self, params: &GenMovesParams<'_>) -> error::Returns<()> {
        let board_snapshot = params.board_snapshot;
        self.gen_all(board_snapshot, params.rack)?;
        let num_generated = self.plays.len();

        // the first of letter-identical placements is kept.
        let mut seen = std::collections::HashSet::with_capacity(num_generated);
        self.plays.retain(|candidate| {
            let play = &candidate.play;
            seen.insert((play.word.clone(), play.row, play.col, play.down))
        });

        if params.use_leave {
            let alphabet = board_snapshot.game_config.alphabet();
            let leave_tally = &mut self.working_buffer.leave_tally;
            for candidate in self.plays.iter_mut() {
                leave_tally.iter_mut().for_each(|m| *m = 0);
                params
                    .rack
                    .iter()
                    .for_each(|&tile| leave_tally[tile as usize] += 1);
                candidate
                    .play
                    .rack_tiles_used()
                    .for_each(|tile| leave_tally[tile as usize] -= 1);
                candidate.leave = board_snapshot
                    .leave
                    .leave_value_from_tally(alphabet, leave_tally);
                candidate.equity = candidate.play.score as f32 + candidate.leave;
            }
        }

        self.plays.sort_by(|a, b| b.equity.total_cmp(&a.equity));
        self.plays.truncate(params.max_gen);
        log::trace!(
            "generated {} plays, {} unique, kept {}",
            num_generated,
            seen.len(),
            self.plays.len()
        );
        Ok(())
    }
}
