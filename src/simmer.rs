// Copyright (C) 2020-2021 Andy Kurnia.

use super::{bag, board, error, game_config, leave, movegen, trie};
use rand::prelude::*;

#[inline(always)]
fn round_to_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// estimates how much of a play's score the opponent can take back.
pub struct Simmer<'a> {
    // new() sets these on construction
    game_config: &'a game_config::GameConfig<'a>,
    trie: &'a trie::Trie,
    leave: &'a leave::Leave,
    rng: rand_chacha::ChaCha20Rng,

    // simulate() reuses these internally
    move_generator: movegen::MoveGenerator,
    board: board::Board,
    pool: bag::Bag,
    rack_after: Vec<u8>,
}

impl<'a> Simmer<'a> {
    fn new(
        game_config: &'a game_config::GameConfig<'a>,
        trie: &'a trie::Trie,
        leave: &'a leave::Leave,
        rng: rand_chacha::ChaCha20Rng,
    ) -> Self {
        Self {
            game_config,
            trie,
            leave,
            rng,
            move_generator: movegen::MoveGenerator::new(game_config),
            board: board::Board::new(game_config.board_layout().dim()),
            pool: bag::Bag(Vec::new()),
            rack_after: Vec::with_capacity(game_config.rack_size() as usize),
        }
    }

    pub fn new_seeded(
        game_config: &'a game_config::GameConfig<'a>,
        trie: &'a trie::Trie,
        leave: &'a leave::Leave,
        seed: u64,
    ) -> Self {
        Self::new(
            game_config,
            trie,
            leave,
            rand_chacha::ChaCha20Rng::seed_from_u64(seed),
        )
    }

    #[inline(always)]
    pub fn reseed(&mut self, seed: u64) {
        self.rng = rand_chacha::ChaCha20Rng::seed_from_u64(seed);
    }

    // score minus the average best reply over num_trials random opponent
    // racks, rounded to a tenth. the pool is redrawn in full every trial.
    pub fn simulate(
        &mut self,
        board: &board::Board,
        play: &movegen::Play,
        my_rack: &[u8],
        num_trials: usize,
    ) -> error::Returns<f32> {
        self.board.clone_from(board);
        self.board.apply_play(play)?;
        self.rack_after.clear();
        self.rack_after.extend_from_slice(my_rack);
        for tile in play.rack_tiles_used() {
            if let Some(pos) = self.rack_after.iter().position(|&t| t == tile) {
                self.rack_after.swap_remove(pos);
            }
        }
        let alphabet = self.game_config.alphabet();
        self.pool = bag::Bag::unseen(alphabet, &self.board, &self.rack_after)?;
        if self.pool.is_empty() {
            // no tiles for the opponent, nothing to simulate.
            return Ok(play.score as f32);
        }

        let board_snapshot = movegen::BoardSnapshot {
            board: &self.board,
            game_config: self.game_config,
            trie: self.trie,
            leave: self.leave,
        };
        let rack_size = self.game_config.rack_size() as usize;
        let mut total_opponent_score = 0i64;
        for _ in 0..num_trials {
            let opponent_rack = self.pool.sample(&mut self.rng, rack_size);
            self.move_generator.gen_moves(&movegen::GenMovesParams {
                board_snapshot: &board_snapshot,
                rack: opponent_rack,
                max_gen: 1,
                use_leave: false,
            })?;
            // no legal reply counts as zero.
            total_opponent_score += self
                .move_generator
                .plays
                .first()
                .map_or(0, |candidate| candidate.play.score) as i64;
        }
        let avg_opponent_score = if num_trials > 0 {
            total_opponent_score as f64 / num_trials as f64
        } else {
            0.0
        };
        let sim_equity = round_to_tenth(play.score as f64 - avg_opponent_score);
        log::debug!(
            "sim {}: score={} avg_opp={:.1} sim_equity={:.1} ({} trials)",
            play.fmt(alphabet),
            play.score,
            avg_opponent_score,
            sim_equity,
            num_trials
        );
        Ok(sim_equity as f32)
    }

    fn simulate_candidate(
        &mut self,
        board: &board::Board,
        candidate: &mut movegen::Candidate,
        my_rack: &[u8],
        num_trials: usize,
    ) -> error::Returns<()> {
        let sim_score = self.simulate(board, &candidate.play, my_rack, num_trials)?;
        candidate.sim_score = Some(sim_score);
        // leave must already be on the candidate.
        candidate.sim_equity = Some(sim_score + candidate.leave);
        Ok(())
    }

    // simulates each candidate in turn with this simmer's rng, then sorts by
    // simulated equity. progress gets (done, total) after each candidate.
    pub fn evaluate_candidates(
        &mut self,
        board: &board::Board,
        candidates: &mut [movegen::Candidate],
        my_rack: &[u8],
        num_trials: usize,
        mut progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> error::Returns<()> {
        let total = candidates.len();
        for (i, candidate) in candidates.iter_mut().enumerate() {
            self.simulate_candidate(board, candidate, my_rack, num_trials)?;
            if let Some(progress) = &mut progress {
                progress(i + 1, total);
            }
        }
        sort_by_final_equity(candidates);
        Ok(())
    }
}

pub fn sort_by_final_equity(candidates: &mut [movegen::Candidate]) {
    candidates.sort_by(|a, b| b.final_equity().total_cmp(&a.final_equity()));
}

pub struct ParallelSimParams<'a> {
    pub game_config: &'a game_config::GameConfig<'a>,
    pub trie: &'a trie::Trie,
    pub leave: &'a leave::Leave,
    pub board: &'a board::Board,
    pub my_rack: &'a [u8],
    pub num_trials: usize,
    pub base_seed: u64,
    pub num_threads: usize,
}

// candidate i is always simulated with seed base_seed + i, so the outcome
// does not depend on how many threads ran or which finished first.
pub fn evaluate_candidates_parallel(
    params: &ParallelSimParams<'_>,
    candidates: &mut [movegen::Candidate],
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
) -> error::Returns<()> {
    let total = candidates.len();
    if total == 0 {
        return Ok(());
    }
    let num_threads = params.num_threads.clamp(1, total);
    let chunk_size = total.div_ceil(num_threads);
    let (tx, rx) = std::sync::mpsc::channel::<()>();
    let results = std::thread::scope(|s| {
        let handles = (0usize..)
            .step_by(chunk_size)
            .zip(candidates.chunks_mut(chunk_size))
            .map(|(first_idx, chunk)| {
                let tx = tx.clone();
                s.spawn(move || -> error::Returns<()> {
                    let mut simmer = Simmer::new_seeded(
                        params.game_config,
                        params.trie,
                        params.leave,
                        params.base_seed,
                    );
                    for (idx, candidate) in (first_idx..).zip(chunk.iter_mut()) {
                        simmer.reseed(params.base_seed.wrapping_add(idx as u64));
                        simmer.simulate_candidate(
                            params.board,
                            candidate,
                            params.my_rack,
                            params.num_trials,
                        )?;
                        // the receiver only goes away after all workers finish.
                        let _ = tx.send(());
                    }
                    Ok(())
                })
            })
            .collect::<Vec<_>>();
        drop(tx);
        for (done, ()) in (1..).zip(rx.iter()) {
            if let Some(progress) = &mut progress {
                progress(done, total);
            }
        }
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(error::new("simulation thread panicked".into()).into()))
            })
            .collect::<Vec<_>>()
    });
    for result in results {
        result?;
    }
    sort_by_final_equity(candidates);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardTile;

    struct Fixture {
        game_config: game_config::GameConfig<'static>,
        trie: trie::Trie,
        leave: leave::Leave,
    }

    fn fixture() -> Fixture {
        let game_config = game_config::make_crossplay_game_config();
        let trie = trie::Trie::from_words(game_config.alphabet(), trie::minimal_words()).unwrap();
        let leave = leave::Leave::new(game_config.alphabet());
        Fixture {
            game_config,
            trie,
            leave,
        }
    }

    fn opening_candidates(fixture: &Fixture, board: &board::Board, rack: &[u8]) -> Vec<movegen::Candidate> {
        let mut move_generator = movegen::MoveGenerator::new(&fixture.game_config);
        move_generator
            .gen_moves(&movegen::GenMovesParams {
                board_snapshot: &movegen::BoardSnapshot {
                    board,
                    game_config: &fixture.game_config,
                    trie: &fixture.trie,
                    leave: &fixture.leave,
                },
                rack,
                max_gen: 5,
                use_leave: true,
            })
            .unwrap();
        move_generator.plays
    }

    #[test]
    fn empty_pool_gives_raw_score() {
        let fixture = fixture();
        let alphabet = fixture.game_config.alphabet();
        let rack = alphabet.parse_rack("CAT").unwrap();
        let mut tally = bag::full_tally(alphabet);
        rack.iter().for_each(|&tile| tally[tile as usize] -= 1);
        // everything else is already on the board.
        let mut board = board::Board::new(fixture.game_config.board_layout().dim());
        for (i, &tile) in (0i16..).zip(bag::Bag::from_tally(&tally).0.iter()) {
            let board_tile = if tile == 0 {
                BoardTile::wildcard(1)
            } else {
                BoardTile::natural(tile)
            };
            board
                .place((i / 15) as i8, (i % 15) as i8, board_tile)
                .unwrap();
        }
        let play = movegen::Play {
            down: false,
            row: 14,
            col: 0,
            word: rack.clone().into_boxed_slice(),
            score: 5,
            tiles: (0i8..)
                .zip(rack.iter())
                .map(|(col, &tile)| movegen::PlacedTile {
                    row: 14,
                    col,
                    tile: BoardTile::natural(tile),
                })
                .collect(),
            cross_words: Box::new([]),
            is_sweep: false,
        };
        let mut simmer = Simmer::new_seeded(&fixture.game_config, &fixture.trie, &fixture.leave, 1);
        assert_eq!(simmer.simulate(&board, &play, &rack, 50).unwrap(), 5.0);
        // the caller's board is untouched.
        assert!(board.is_empty_at(14, 0));
    }

    #[test]
    fn same_seed_same_equity() {
        let fixture = fixture();
        let alphabet = fixture.game_config.alphabet();
        let board = board::Board::new(fixture.game_config.board_layout().dim());
        let rack = alphabet.parse_rack("ZAXOVEN").unwrap();
        let candidates = opening_candidates(&fixture, &board, &rack);
        assert!(!candidates.is_empty());
        let play = &candidates[0].play;
        let mut a = Simmer::new_seeded(&fixture.game_config, &fixture.trie, &fixture.leave, 42);
        let mut b = Simmer::new_seeded(&fixture.game_config, &fixture.trie, &fixture.leave, 42);
        let x = a.simulate(&board, play, &rack, 10).unwrap();
        let y = b.simulate(&board, play, &rack, 10).unwrap();
        assert_eq!(x, y);
        assert!(x <= play.score as f32);
        // zero trials average to nothing.
        assert_eq!(a.simulate(&board, play, &rack, 0).unwrap(), play.score as f32);
    }

    #[test]
    fn evaluate_fills_and_sorts() {
        let fixture = fixture();
        let alphabet = fixture.game_config.alphabet();
        let board = board::Board::new(fixture.game_config.board_layout().dim());
        let rack = alphabet.parse_rack("HAZEDIN").unwrap();
        let mut candidates = opening_candidates(&fixture, &board, &rack);
        let mut calls = Vec::new();
        let mut progress = |done: usize, total: usize| calls.push((done, total));
        let mut simmer = Simmer::new_seeded(&fixture.game_config, &fixture.trie, &fixture.leave, 7);
        simmer
            .evaluate_candidates(&board, &mut candidates, &rack, 5, Some(&mut progress))
            .unwrap();
        let total = candidates.len();
        assert_eq!(calls, (1..=total).map(|i| (i, total)).collect::<Vec<_>>());
        for candidate in &candidates {
            let sim_score = candidate.sim_score.unwrap();
            assert_eq!(candidate.sim_equity.unwrap(), sim_score + candidate.leave);
        }
        assert!(
            candidates
                .windows(2)
                .all(|w| w[0].final_equity() >= w[1].final_equity())
        );
        // no observer is fine too.
        simmer
            .evaluate_candidates(&board, &mut candidates, &rack, 5, None)
            .unwrap();
    }

    #[test]
    fn parallel_does_not_depend_on_thread_count() {
        let fixture = fixture();
        let alphabet = fixture.game_config.alphabet();
        let board = board::Board::new(fixture.game_config.board_layout().dim());
        let rack = alphabet.parse_rack("QUAYHOT").unwrap();
        let candidates = opening_candidates(&fixture, &board, &rack);
        let run = |num_threads| {
            let mut candidates = candidates.clone();
            evaluate_candidates_parallel(
                &ParallelSimParams {
                    game_config: &fixture.game_config,
                    trie: &fixture.trie,
                    leave: &fixture.leave,
                    board: &board,
                    my_rack: &rack,
                    num_trials: 4,
                    base_seed: 99,
                    num_threads,
                },
                &mut candidates,
                None,
            )
            .unwrap();
            candidates
                .iter()
                .map(|c| (c.play.clone(), c.sim_equity))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(1), run(3));
    }
}
