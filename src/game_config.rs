// Copyright (C) 2020-2023 Andy Kurnia.

use super::{alphabet, board_layout};

pub struct StaticGameConfig<'a> {
    alphabet: alphabet::Alphabet<'a>,
    board_layout: board_layout::BoardLayout<'a>,
    rack_size: i8,
    sweep_bonus: i16,
}

pub enum GameConfig<'a> {
    Static(StaticGameConfig<'a>),
}

impl<'a> GameConfig<'a> {
    #[inline(always)]
    pub fn alphabet(&self) -> &alphabet::Alphabet<'a> {
        match self {
            GameConfig::Static(x) => &x.alphabet,
        }
    }

    #[inline(always)]
    pub fn board_layout(&self) -> &board_layout::BoardLayout<'a> {
        match self {
            GameConfig::Static(x) => &x.board_layout,
        }
    }

    #[inline(always)]
    pub fn rack_size(&self) -> i8 {
        match self {
            GameConfig::Static(x) => x.rack_size,
        }
    }

    // only a full rack played in one turn earns the sweep bonus.
    #[inline(always)]
    pub fn num_played_bonus(&self, num_played: i8) -> i16 {
        match self {
            GameConfig::Static(x) => {
                // branchless
                x.sweep_bonus & -((num_played >= x.rack_size) as i16)
            }
        }
    }
}

pub fn make_crossplay_game_config<'a>() -> GameConfig<'a> {
    GameConfig::Static(StaticGameConfig {
        alphabet: alphabet::make_crossplay_alphabet(),
        board_layout: board_layout::make_crossplay_board_layout(),
        rack_size: 7,
        sweep_bonus: 40,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_bonus_needs_full_rack() {
        let game_config = make_crossplay_game_config();
        assert_eq!(game_config.num_played_bonus(7), 40);
        assert_eq!(game_config.num_played_bonus(6), 0);
        assert_eq!(game_config.num_played_bonus(1), 0);
    }
}
