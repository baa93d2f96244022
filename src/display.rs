//! Human-readable rendering of Klondike boards.
//!
//! Face-down cards are shown as "XX" and face-up cards with their
//! `short_str()` rank/suit code. The layout is stable so it can be used
//! for CLI output, logs, and test diagnostics alike.

use core::fmt;

use crate::board::{Board, NUM_COLS};
use crate::card::{Card, Suit};
use crate::moves::Move;

/// Format a single card for display, honouring its face-up flag.
pub fn format_card_visible(card: Card) -> String {
    if card.face_up {
        card.short_str()
    } else {
        "XX".to_string()
    }
}

/// Render only the foundation row, showing the top card of each pile.
///   - Empty foundation: `[  ]`
///   - Non-empty: e.g. `[AH]`, `[7C]`, `[KD]`
pub fn render_foundations(board: &Board) -> String {
    let mut s = String::from("Foundations: ");
    for suit in Suit::ALL {
        match board.foundation(suit).last() {
            Some(card) => {
                s.push('[');
                s.push_str(&card.short_str());
                s.push_str("] ");
            }
            None => s.push_str("[  ] "),
        }
    }
    s.trim_end().to_string()
}

/// Render the stock (as a count) and the waste (top card and count).
pub fn render_stock_and_waste(board: &Board) -> String {
    let stock = match board.stock.len() {
        0 => "Stock: [empty]".to_string(),
        n => format!("Stock: [{n} cards]"),
    };
    let waste = match board.waste_top() {
        None => "Waste: [empty]".to_string(),
        Some(top) => format!("Waste: [{}] ({} cards)", top.short_str(), board.waste.len()),
    };
    format!("{stock}    {waste}    ({})", board.draw_mode)
}

/// Render all tableau columns as a multi-line string.
///
/// Each cell is four characters wide. Columns are top-justified: row 0 is
/// the bottom card of every column, and the playable card is the lowest
/// non-blank cell of each column.
pub fn render_columns(board: &Board) -> String {
    let mut s = String::from("Columns:\n      ");
    for col_idx in 0..NUM_COLS {
        s.push_str(&format!(" C{} ", col_idx + 1));
    }
    s.push('\n');

    let max_height = board.tableau.iter().map(Vec::len).max().unwrap_or(0);
    for row in 0..max_height {
        s.push_str("      ");
        for col in &board.tableau {
            match col.get(row) {
                Some(&card) => s.push_str(&format!("{:>3} ", format_card_visible(card))),
                None => s.push_str("    "),
            }
        }
        s.push('\n');
    }
    s
}

/// Concise summary of the playable card of each column.
///
/// Example: `C1: 4S  C2: 2H  C3: --  C4: XX ...`
pub fn render_playing_edge(board: &Board) -> String {
    let cells: Vec<String> = board
        .tableau
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let top = col.last().map_or_else(|| "--".to_string(), |&c| format_card_visible(c));
            format!("C{}: {:>2}", i + 1, top)
        })
        .collect();
    cells.join("  ")
}

/// Render a full board: foundations, stock/waste, then columns.
pub fn render_board(board: &Board) -> String {
    format!(
        "{}\n{}\n\n{}",
        render_foundations(board),
        render_stock_and_waste(board),
        render_columns(board)
    )
}

/// Number and describe each move of a line, starting from `board`.
///
/// Moves that do not apply are listed as such and left out of the
/// running position, so the output never panics on a bad line.
pub fn render_line(board: &Board, moves: &[Move]) -> String {
    let mut pos = board.clone();
    let mut s = String::new();
    for (i, mv) in moves.iter().enumerate() {
        let text = mv.describe(&pos);
        if mv.apply(&mut pos).is_ok() {
            s.push_str(&format!("{:4}: {text}\n", i + 1));
        } else {
            s.push_str(&format!("{:4}: (illegal) {mv:?}\n", i + 1));
        }
    }
    s
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_board(self))
    }
}
