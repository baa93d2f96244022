//! Board state: tableau columns, stock, waste, and foundations.
//!
//! Every pile is stored bottom-to-top, so the last element of a `Vec` is
//! the card you would pick up in a physical game. A card lives in exactly
//! one pile at a time and moves by pop-from-source + push-to-destination.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::card::{Card, Rank, Suit, CARDS_PER_DECK, NUM_RANKS, NUM_SUITS};
use crate::error::{Error, Result};
use crate::rules;

/// Number of tableau columns.
pub const NUM_COLS: usize = 7;
/// Number of cards dealt into the tableau (1 + 2 + ... + 7).
pub const TABLEAU_CARDS: usize = NUM_COLS * (NUM_COLS + 1) / 2;
/// Number of cards left in the stock after the deal.
pub const STOCK_CARDS: usize = CARDS_PER_DECK as usize - TABLEAU_CARDS;

const DECK_LEN: usize = CARDS_PER_DECK as usize;

/// How many cards a single draw turns from the stock onto the waste.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawMode {
    One,
    Three,
}

impl DrawMode {
    #[inline]
    pub fn count(self) -> usize {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }
}

impl TryFrom<u8> for DrawMode {
    type Error = Error;
    fn try_from(n: u8) -> Result<Self> {
        match n {
            1 => Ok(DrawMode::One),
            3 => Ok(DrawMode::Three),
            _ => Err(Error::MalformedBoard(format!("draw mode must be 1 or 3, got {n}"))),
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "draw-{}", self.count())
    }
}

/// Complete Klondike position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    pub tableau: [Vec<Card>; NUM_COLS],
    /// Face-down draw pile; the last card is the next one drawn.
    pub stock: Vec<Card>,
    /// Face-up drawn cards; the last card is playable.
    pub waste: Vec<Card>,
    /// One pile per suit, indexed by `Suit::slot()`, built Ace..King.
    pub foundations: [Vec<Card>; NUM_SUITS as usize],
    pub draw_mode: DrawMode,
}

impl Board {
    /// A board with every pile empty.
    pub fn empty(draw_mode: DrawMode) -> Self {
        Board {
            tableau: Default::default(),
            stock: Vec::new(),
            waste: Vec::new(),
            foundations: Default::default(),
            draw_mode,
        }
    }

    /// Deal a deck (in dealing order) into the standard Klondike layout.
    ///
    /// Column `c` (0-based) receives `c + 1` consecutive cards from the deck;
    /// only the last card dealt to each column is face-up. The remaining
    /// 24 cards become the stock, face-down, with `deck[51]` on top.
    pub fn deal_from_deck(deck: [Card; DECK_LEN], draw_mode: DrawMode) -> Self {
        let mut board = Board::empty(draw_mode);
        let mut idx = 0usize;
        for (c, column) in board.tableau.iter_mut().enumerate() {
            for r in 0..=c {
                let card = deck[idx].face_down();
                column.push(if r == c { card.face_up() } else { card });
                idx += 1;
            }
        }
        board.stock = deck[idx..].iter().map(|c| c.face_down()).collect();
        board
    }

    /// Recover the dealing order of an untouched deal.
    ///
    /// Returns `None` once anything has moved (non-empty waste or
    /// foundations, or a tableau that is no longer triangular).
    pub fn dealt_order(&self) -> Option<[Card; DECK_LEN]> {
        let fresh = self.waste.is_empty()
            && self.foundations.iter().all(Vec::is_empty)
            && self.stock.len() == STOCK_CARDS
            && self.tableau.iter().enumerate().all(|(c, col)| col.len() == c + 1);
        if !fresh {
            return None;
        }
        let mut deck = [Card::new(Suit::Hearts, Rank::Ace); DECK_LEN];
        let order = self.tableau.iter().flatten().chain(self.stock.iter());
        for (slot, card) in deck.iter_mut().zip(order) {
            *slot = card.face_down();
        }
        Some(deck)
    }

    /// Top card of a column, if any.
    #[inline]
    pub fn column_top(&self, col: usize) -> Option<Card> {
        self.tableau.get(col).and_then(|c| c.last().copied())
    }

    #[inline]
    pub fn waste_top(&self) -> Option<Card> {
        self.waste.last().copied()
    }

    /// Foundation pile for a suit.
    #[inline]
    pub fn foundation(&self, suit: Suit) -> &[Card] {
        &self.foundations[suit.slot()]
    }

    /// Number of cards on each foundation, in `Suit::ALL` order.
    pub fn foundation_heights(&self) -> [u8; NUM_SUITS as usize] {
        let mut heights = [0u8; NUM_SUITS as usize];
        for (h, pile) in heights.iter_mut().zip(&self.foundations) {
            *h = pile.len() as u8;
        }
        heights
    }

    /// All four foundations hold thirteen cards.
    pub fn is_won(&self) -> bool {
        self.foundations
            .iter()
            .all(|pile| pile.len() == NUM_RANKS as usize)
    }

    /// Total number of cards across every pile.
    pub fn card_count(&self) -> usize {
        self.tableau.iter().map(Vec::len).sum::<usize>()
            + self.stock.len()
            + self.waste.len()
            + self.foundations.iter().map(Vec::len).sum::<usize>()
    }

    /// Iterate every card on the board, pile by pile.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.tableau
            .iter()
            .flatten()
            .chain(self.stock.iter())
            .chain(self.waste.iter())
            .chain(self.foundations.iter().flatten())
    }

    /// Check the structural invariants of a position.
    ///
    /// - exactly 52 distinct cards,
    /// - each foundation is Ace..k of its own suit,
    /// - no face-down card above a face-up card in a column,
    /// - stock face-down, waste face-up.
    pub fn validate(&self) -> Result<()> {
        let mut seen = [false; DECK_LEN];
        for card in self.cards() {
            let idx = card.index() as usize;
            if seen[idx] {
                return Err(Error::MalformedBoard(format!("duplicate card {card}")));
            }
            seen[idx] = true;
        }
        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(Error::MalformedBoard(format!(
                "missing card index {missing}"
            )));
        }

        for (slot, pile) in self.foundations.iter().enumerate() {
            let suit = Suit::ALL[slot];
            for (i, card) in pile.iter().enumerate() {
                if card.suit() != suit || card.rank() != Rank::ALL[i] {
                    return Err(Error::MalformedBoard(format!(
                        "foundation {suit} out of order at {card}"
                    )));
                }
            }
        }

        for (c, col) in self.tableau.iter().enumerate() {
            let first_up = col.iter().position(|card| card.face_up).unwrap_or(col.len());
            if col[first_up..].iter().any(|card| !card.face_up) {
                return Err(Error::MalformedBoard(format!(
                    "column {} has a face-down card above a face-up one",
                    c + 1
                )));
            }
        }

        if self.stock.iter().any(|c| c.face_up) {
            return Err(Error::MalformedBoard("face-up card in stock".into()));
        }
        if self.waste.iter().any(|c| !c.face_up) {
            return Err(Error::MalformedBoard("face-down card in waste".into()));
        }
        Ok(())
    }

    /// Start index of the face-up run at the top of a column.
    #[inline]
    pub(crate) fn first_face_up(&self, col: usize) -> usize {
        let column = &self.tableau[col];
        column
            .iter()
            .rposition(|c| !c.face_up)
            .map_or(0, |i| i + 1)
    }

    /// Does the given column accept `card` as the bottom of an incoming run?
    ///
    /// A face-down column top accepts nothing.
    #[inline]
    pub(crate) fn column_accepts(&self, col: usize, card: Card) -> bool {
        match self.column_top(col) {
            Some(top) if !top.face_up => false,
            top => rules::can_place_on_tableau(card, top),
        }
    }
}
