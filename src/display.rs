// Copyright (C) 2020-2021 Andy Kurnia. All rights reserved.

use super::{alphabet, board, board_layout};

// column letter used in play coordinates, 0 is 'A'.
#[inline(always)]
pub fn column(col: i8) -> char {
    ((col as u8) + b'A') as char
}

#[inline(always)]
pub fn empty_label(board_layout: &board_layout::BoardLayout, row: i8, col: i8) -> &'static str {
    if row == board_layout.star_row() && col == board_layout.star_col() {
        return "*";
    }
    let premium = board_layout.premium_at(row, col);
    match (premium.word_multiplier, premium.tile_multiplier) {
        (3, _) => "=",
        (2, _) => "-",
        (_, 3) => "\"",
        (_, 2) => "\'",
        _ => ".",
    }
}

// uppercase for a natural tile, lowercase for a blank.
#[inline(always)]
pub fn board_label<'a>(
    alphabet: &'a alphabet::Alphabet<'a>,
    board_layout: &board_layout::BoardLayout,
    board: &board::Board,
    row: i8,
    col: i8,
) -> &'a str {
    match board.get(row, col) {
        Some(tile) if tile.is_wildcard() => alphabet.blank_label(tile.letter),
        Some(tile) => alphabet.label(tile.letter),
        None => None,
    }
    .unwrap_or_else(|| empty_label(board_layout, row, col))
}

fn print_column_labels(board_layout: &board_layout::BoardLayout) {
    print!("   ");
    for c in 0..board_layout.dim().cols {
        print!(" {}", column(c));
    }
    println!();
}

fn print_edge(board_layout: &board_layout::BoardLayout) {
    print!("   +");
    for _ in 1..board_layout.dim().cols {
        print!("--");
    }
    println!("-+");
}

pub fn print_board<'a>(
    alphabet: &'a alphabet::Alphabet<'a>,
    board_layout: &board_layout::BoardLayout,
    board: &board::Board,
) {
    print_column_labels(board_layout);
    print_edge(board_layout);
    for r in 0..board_layout.dim().rows {
        print!("{:3}|", r + 1);
        for c in 0..board_layout.dim().cols {
            if c > 0 {
                print!(" ")
            }
            print!("{}", board_label(alphabet, board_layout, board, r, c));
        }
        println!("|{}", r + 1);
    }
    print_edge(board_layout);
    print_column_labels(board_layout);
}
