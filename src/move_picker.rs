// Copyright (C) 2020-2021 Andy Kurnia. All rights reserved.

use super::{error, movegen, simmer};

pub enum MovePicker {
    // static equity: score plus leave.
    Hasty,
    // static equity picks the shortlist, simulation reorders it.
    Simmer {
        num_candidates: usize,
        num_trials: usize,
        seed: u64,
        num_threads: usize,
    },
}

impl MovePicker {
    // leaves the ranked candidates in move_generator.plays, best first.
    pub fn pick(
        &self,
        move_generator: &mut movegen::MoveGenerator,
        board_snapshot: &movegen::BoardSnapshot<'_>,
        rack: &[u8],
        max_gen: usize,
        progress: Option<&mut dyn FnMut(usize, usize)>,
    ) -> error::Returns<()> {
        let t0 = std::time::Instant::now();
        match self {
            MovePicker::Hasty => {
                move_generator.gen_moves(&movegen::GenMovesParams {
                    board_snapshot,
                    rack,
                    max_gen,
                    use_leave: true,
                })?;
            }
            MovePicker::Simmer {
                num_candidates,
                num_trials,
                seed,
                num_threads,
            } => {
                move_generator.gen_moves(&movegen::GenMovesParams {
                    board_snapshot,
                    rack,
                    max_gen: *num_candidates,
                    use_leave: true,
                })?;
                simmer::evaluate_candidates_parallel(
                    &simmer::ParallelSimParams {
                        game_config: board_snapshot.game_config,
                        trie: board_snapshot.trie,
                        leave: board_snapshot.leave,
                        board: board_snapshot.board,
                        my_rack: rack,
                        num_trials: *num_trials,
                        base_seed: *seed,
                        num_threads: *num_threads,
                    },
                    &mut move_generator.plays,
                    progress,
                )?;
                move_generator.plays.truncate(max_gen);
            }
        }
        log::info!(
            "picked {} candidates for rack {} in {:?}",
            move_generator.plays.len(),
            board_snapshot.game_config.alphabet().fmt_rack(rack),
            t0.elapsed()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{board, game_config, leave, trie};

    #[test]
    fn simmer_reorders_the_hasty_shortlist() {
        let game_config = game_config::make_crossplay_game_config();
        let alphabet = game_config.alphabet();
        let trie = trie::Trie::from_words(alphabet, trie::minimal_words()).unwrap();
        let leave = leave::Leave::new(alphabet);
        let board = board::Board::new(game_config.board_layout().dim());
        let board_snapshot = movegen::BoardSnapshot {
            board: &board,
            game_config: &game_config,
            trie: &trie,
            leave: &leave,
        };
        let rack = alphabet.parse_rack("OXENDIG").unwrap();
        let mut move_generator = movegen::MoveGenerator::new(&game_config);

        MovePicker::Hasty
            .pick(&mut move_generator, &board_snapshot, &rack, 4, None)
            .unwrap();
        let hasty = move_generator.plays.clone();
        assert!(!hasty.is_empty() && hasty.len() <= 4);
        assert!(hasty.iter().all(|c| c.sim_equity.is_none()));

        let picker = MovePicker::Simmer {
            num_candidates: 4,
            num_trials: 3,
            seed: 5,
            num_threads: 2,
        };
        picker
            .pick(&mut move_generator, &board_snapshot, &rack, 4, None)
            .unwrap();
        let simmed = &move_generator.plays;
        assert_eq!(simmed.len(), hasty.len());
        assert!(simmed.iter().all(|c| c.sim_equity.is_some()));
        for c in hasty {
            assert!(simmed.iter().any(|s| s.play == c.play));
        }
    }

    #[test]
    fn overclaimed_input_is_rejected_before_ranking() {
        let game_config = game_config::make_crossplay_game_config();
        let alphabet = game_config.alphabet();
        let trie = trie::Trie::from_words(alphabet, trie::minimal_words()).unwrap();
        let leave = leave::Leave::new(alphabet);
        let mut rows = vec!["..............."; 15];
        rows[3] = "...Z...........";
        rows[7] = ".....HAZE......";
        let board = board::Board::from_rows(alphabet, game_config.board_layout().dim(), &rows).unwrap();
        let board_snapshot = movegen::BoardSnapshot {
            board: &board,
            game_config: &game_config,
            trie: &trie,
            leave: &leave,
        };
        let rack = alphabet.parse_rack("HAZEDIN").unwrap();
        let mut move_generator = movegen::MoveGenerator::new(&game_config);
        let err = MovePicker::Hasty
            .pick(&mut move_generator, &board_snapshot, &rack, 5, None)
            .unwrap_err();
        assert!(error::is_kind(&err, error::ErrorKind::InvalidInput));
        assert!(move_generator.plays.is_empty());

        let mut num_calls = 0;
        let mut progress = |_: usize, _: usize| num_calls += 1;
        let picker = MovePicker::Simmer {
            num_candidates: 5,
            num_trials: 3,
            seed: 5,
            num_threads: 2,
        };
        let err = picker
            .pick(&mut move_generator, &board_snapshot, &rack, 5, Some(&mut progress))
            .unwrap_err();
        assert!(error::is_kind(&err, error::ErrorKind::InvalidInput));
        assert!(move_generator.plays.is_empty());
        assert_eq!(num_calls, 0);
    }
}
