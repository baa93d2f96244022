//! Card, Suit, and Rank types for a standard 52-card deck.
//!
//! - `Card` pairs a compact identity (0..=51) with a face-up flag.
//! - `Suit` and `Rank` give human-readable structure on top of that.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// A playing card.
///
/// The identity is an index in 0..=51 with the mapping:
/// ```text
/// index = suit as u8 * 13 + rank as u8
/// ```
/// where `rank` is 0=Ace, 1=Two, ..., 12=King. The identity never changes
/// once dealt; only `face_up` is flipped as play progresses.
///
/// Deserializing goes through `Card::from_index`, so an index of 52 or more
/// is rejected rather than stored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawCard")]
pub struct Card {
    index: u8,
    pub face_up: bool,
}

/// Wire shape of a `Card`, checked before it becomes one.
#[derive(Deserialize)]
struct RawCard {
    index: u8,
    face_up: bool,
}

impl TryFrom<RawCard> for Card {
    type Error = String;

    fn try_from(raw: RawCard) -> Result<Self, Self::Error> {
        let card = Card::from_index(raw.index)
            .ok_or_else(|| format!("card index {} is not below {CARDS_PER_DECK}", raw.index))?;
        Ok(Card {
            face_up: raw.face_up,
            ..card
        })
    }
}

/// The four suits in a standard deck.
///
/// The ordinal doubles as the foundation slot for the suit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Clubs = 1,
    Spades = 2,
    Diamonds = 3,
}

/// The thirteen ranks in a standard deck.
///
/// Ace is the lowest rank here; `value()` gives 1..=13.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 12
}

impl Card {
    /// Create a new face-down card from a suit and rank.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        let s = suit as u8;
        let r = rank as u8;
        debug_assert!(s < NUM_SUITS && r < NUM_RANKS);
        Card {
            index: s * NUM_RANKS + r,
            face_up: false,
        }
    }

    /// Create a face-down card from a raw index in 0..=51.
    ///
    /// Returns `None` when `index >= 52`.
    #[inline]
    pub fn from_index(index: u8) -> Option<Self> {
        (index < CARDS_PER_DECK).then_some(Card {
            index,
            face_up: false,
        })
    }

    /// Return the raw 0..=51 identity of this card.
    #[inline]
    pub fn index(self) -> u8 {
        self.index
    }

    /// Return the suit of this card.
    #[inline]
    pub fn suit(self) -> Suit {
        Suit::ALL[(self.index / NUM_RANKS) as usize]
    }

    /// Return the rank of this card.
    #[inline]
    pub fn rank(self) -> Rank {
        Rank::ALL[(self.index % NUM_RANKS) as usize]
    }

    #[inline]
    pub fn is_red(self) -> bool {
        self.suit().is_red()
    }

    /// Same identity, face-up.
    #[inline]
    pub fn face_up(self) -> Self {
        Card {
            face_up: true,
            ..self
        }
    }

    /// Same identity, face-down.
    #[inline]
    pub fn face_down(self) -> Self {
        Card {
            face_up: false,
            ..self
        }
    }

    /// Short string like "AH", "7C", "TD", "KS".
    pub fn short_str(self) -> String {
        format!("{}{}", self.rank().short_char(), self.suit().short_char())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_str())
    }
}

impl Suit {
    /// All suits in a fixed, reproducible order.
    pub const ALL: [Suit; NUM_SUITS as usize] = [
        Suit::Hearts,
        Suit::Clubs,
        Suit::Spades,
        Suit::Diamonds,
    ];

    /// Hearts and diamonds.
    #[inline]
    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    /// Foundation slot for this suit.
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Single-character representation: 'H', 'C', 'S', or 'D'.
    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
            Suit::Diamonds => 'D',
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self {
            Suit::Hearts => '♥',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
            Suit::Diamonds => '♦',
        };
        write!(f, "{glyph}")
    }
}

impl Rank {
    /// All ranks in a fixed, reproducible order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Rank value in 1..=13 (Ace=1, King=13).
    #[inline]
    pub fn value(self) -> u8 {
        self as u8 + 1
    }

    #[inline]
    pub fn short_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_char())
    }
}

/// Generate a standard 52-card deck in a fixed order, all face-down.
///
/// Suits follow `Suit::ALL` order, and ranks follow `Rank::ALL` order.
pub fn standard_deck() -> [Card; CARDS_PER_DECK as usize] {
    let mut cards = [Card::new(Suit::Hearts, Rank::Ace); CARDS_PER_DECK as usize];
    let mut i = 0usize;
    for &suit in Suit::ALL.iter() {
        for &rank in Rank::ALL.iter() {
            cards[i] = Card::new(suit, rank);
            i += 1;
        }
    }
    cards
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_index_round_trip() {
        for &suit in Suit::ALL.iter() {
            for &rank in Rank::ALL.iter() {
                let c = Card::new(suit, rank);
                assert!(c.index() < CARDS_PER_DECK);
                assert_eq!(c.suit(), suit);
                assert_eq!(c.rank(), rank);
                assert_eq!(Card::from_index(c.index()), Some(c));
            }
        }
        assert_eq!(Card::from_index(52), None);
    }

    #[test]
    fn rank_values_run_ace_low() {
        for (i, &rank) in Rank::ALL.iter().enumerate() {
            assert_eq!(rank.value(), i as u8 + 1);
        }
        assert_eq!(Rank::Ace.value(), 1);
        assert_eq!(Rank::King.value(), 13);
    }

    #[test]
    fn card_colors_are_correct() {
        for rank in Rank::ALL.iter().copied() {
            assert!(Card::new(Suit::Hearts, rank).is_red());
            assert!(Card::new(Suit::Diamonds, rank).is_red());
            assert!(!Card::new(Suit::Clubs, rank).is_red());
            assert!(!Card::new(Suit::Spades, rank).is_red());
        }
    }

    #[test]
    fn flipping_keeps_identity() {
        let ks = Card::new(Suit::Spades, Rank::King);
        assert!(!ks.face_up);
        let up = ks.face_up();
        assert!(up.face_up);
        assert_eq!(up.index(), ks.index());
        assert_eq!(up.face_down(), ks);
    }

    #[test]
    fn short_str_and_display() {
        let ah = Card::new(Suit::Hearts, Rank::Ace);
        let td = Card::new(Suit::Diamonds, Rank::Ten);
        let seven_clubs = Card::new(Suit::Clubs, Rank::Seven);

        assert_eq!(ah.short_str(), "AH");
        assert_eq!(td.short_str(), "TD");
        assert_eq!(format!("{seven_clubs}"), "7C");
        assert_eq!(format!("{}", Suit::Spades), "♠");
    }

    #[test]
    fn standard_deck_has_52_unique_cards() {
        let deck = standard_deck();
        let mut seen = [false; CARDS_PER_DECK as usize];
        for card in deck.iter() {
            let idx = card.index() as usize;
            assert!(!seen[idx], "duplicate card index {idx}");
            assert!(!card.face_up);
            seen[idx] = true;
        }
        assert!(seen.iter().all(|&b| b));
    }

    #[test]
    fn deserializing_checks_the_index() {
        let queen = Card::new(Suit::Diamonds, Rank::Queen).face_up();
        let json = serde_json::to_string(&queen).unwrap();
        assert_eq!(json, r#"{"index":50,"face_up":true}"#);
        assert_eq!(serde_json::from_str::<Card>(&json).unwrap(), queen);

        let err = serde_json::from_str::<Card>(r#"{"index":52,"face_up":false}"#).unwrap_err();
        assert!(err.to_string().contains("card index 52"), "{err}");
        assert!(serde_json::from_str::<Card>(r#"{"index":255,"face_up":true}"#).is_err());
    }
}
