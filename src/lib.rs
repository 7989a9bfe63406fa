// Copyright (C) 2020-2024 Andy Kurnia.

#[macro_use]
pub mod error;

pub mod alphabet;
pub mod bag;
pub mod board;
pub mod board_layout;
pub mod config;
pub mod display;
pub mod game_config;
pub mod leave;
pub mod lexicon;
pub mod matrix;
pub mod move_picker;
pub mod movegen;
pub mod rlhelper;
pub mod simmer;
pub mod trie;
