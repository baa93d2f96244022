//! Sharing deals as numbers or deck lists.
//!
//! A fresh deal is fully described by its 52-card dealing order, so it can
//! be written down as the rank of that permutation in the factorial number
//! system (its Lehmer code), a decimal number in `0..52!`. The ordered deck
//! from `standard_deck()` is code 0.
//!
//! The other accepted form is a bracketed list of card indices like
//! `[51, 32, 3, ...]`, in dealing order. `extract_decks_from_text` picks
//! such lists out of arbitrary text, so saved logs can be fed back in.

use std::fs;
use std::path::Path;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::board::{Board, DrawMode};
use crate::card::{Card, Rank, Suit, CARDS_PER_DECK};
use crate::error::{Error, Result};

const DECK_LEN: usize = CARDS_PER_DECK as usize;

/// A deck read from text, with a label for reporting.
#[derive(Clone, Debug)]
pub struct DeckSpec {
    /// Human-readable label (code, filename + index, etc.)
    pub label: String,
    /// The exact deck permutation in dealing order.
    pub deck: [Card; DECK_LEN],
}

/// `52!`, one past the largest valid code.
pub fn deal_code_limit() -> BigUint {
    (1..=DECK_LEN as u32).fold(BigUint::from(1u32), |acc, k| acc * k)
}

fn check_permutation(indices: &[u8]) -> Result<()> {
    if indices.len() != DECK_LEN {
        return Err(Error::InvalidDeck(format!(
            "deck must have {} cards, got {}",
            DECK_LEN,
            indices.len()
        )));
    }
    let mut seen = [false; DECK_LEN];
    for &v in indices {
        if v as usize >= DECK_LEN {
            return Err(Error::InvalidDeck(format!("card index {v} out of range 0..=51")));
        }
        if seen[v as usize] {
            return Err(Error::InvalidDeck(format!("duplicate card index {v}")));
        }
        seen[v as usize] = true;
    }
    Ok(())
}

/// Lehmer code of a deck in dealing order.
pub fn encode_deck(deck: &[Card; DECK_LEN]) -> Result<BigUint> {
    let indices: Vec<u8> = deck.iter().map(|c| c.index()).collect();
    check_permutation(&indices)?;

    let mut remaining: Vec<u8> = (0..CARDS_PER_DECK).collect();
    let mut code = BigUint::zero();
    for (i, &idx) in indices.iter().enumerate() {
        // `remaining` is sorted, so the position is the count of smaller unused cards.
        let digit = remaining.binary_search(&idx).map_err(|_| {
            Error::InvalidDeck(format!("card index {idx} used twice"))
        })?;
        remaining.remove(digit);
        // Horner step over radices 52, 51, ..., 1.
        code = code * (DECK_LEN - i) as u32 + digit as u32;
    }
    Ok(code)
}

/// Deck (face-down, dealing order) for a Lehmer code.
pub fn decode_deck(code: &BigUint) -> Result<[Card; DECK_LEN]> {
    if *code >= deal_code_limit() {
        return Err(Error::InvalidDealCode(
            "code must be less than 52!".to_string(),
        ));
    }

    // Peel digits off least-significant first: radix 1 for the last card,
    // radix 2 for the one before it, and so on.
    let mut digits = [0usize; DECK_LEN];
    let mut rest = code.clone();
    for (k, slot) in digits.iter_mut().rev().enumerate() {
        let radix = BigUint::from(k as u32 + 1);
        let digit = &rest % &radix;
        rest /= radix;
        *slot = digit.to_usize().unwrap_or(0);
    }

    let mut remaining: Vec<u8> = (0..CARDS_PER_DECK).collect();
    let mut deck = [Card::new(Suit::Hearts, Rank::Ace); DECK_LEN];
    for (slot, &digit) in deck.iter_mut().zip(digits.iter()) {
        let idx = remaining.remove(digit);
        *slot = Card::from_index(idx)
            .ok_or_else(|| Error::InvalidDealCode(format!("card index {idx} out of range")))?;
    }
    Ok(deck)
}

/// Parse a decimal deal code. Whitespace, `_` and `,` are ignored so that
/// grouped numbers paste cleanly.
pub fn parse_deal_code(s: &str) -> Result<BigUint> {
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(Error::InvalidDealCode("empty code".to_string()));
    }
    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidDealCode(format!(
            "code must be decimal digits, got {s:?}"
        )));
    }
    let code = BigUint::parse_bytes(cleaned.as_bytes(), 10)
        .ok_or_else(|| Error::InvalidDealCode(format!("could not parse {s:?}")))?;
    if code >= deal_code_limit() {
        return Err(Error::InvalidDealCode(
            "code must be less than 52!".to_string(),
        ));
    }
    Ok(code)
}

/// Parse a single bracketed integer list (e.g. "[1, 2, 3]") into a deck.
///
/// The list must contain exactly 52 integers, each in 0..=51, with no duplicates.
pub fn parse_deck_list(s: &str) -> Result<[Card; DECK_LEN]> {
    let open = s
        .find('[')
        .ok_or_else(|| Error::InvalidDeck("missing '['".to_string()))?;
    let close = s
        .rfind(']')
        .ok_or_else(|| Error::InvalidDeck("missing ']'".to_string()))?;
    if close <= open {
        return Err(Error::InvalidDeck("malformed [...] list".to_string()));
    }

    deck_from_indices(&s[open + 1..close])
}

/// Read a comma-separated run of card indices as a full deck.
fn deck_from_indices(body: &str) -> Result<[Card; DECK_LEN]> {
    let mut nums: Vec<u8> = Vec::with_capacity(DECK_LEN);
    for part in body.split(',') {
        let t = part.trim();
        if t.is_empty() {
            continue;
        }
        let v: u8 = t
            .parse()
            .map_err(|_| Error::InvalidDeck(format!("could not parse '{t}' as a card index")))?;
        nums.push(v);
    }
    check_permutation(&nums)?;

    let mut deck = [Card::new(Suit::Hearts, Rank::Ace); DECK_LEN];
    for (slot, &v) in deck.iter_mut().zip(nums.iter()) {
        *slot = Card::from_index(v)
            .ok_or_else(|| Error::InvalidDeck(format!("card index {v} out of range")))?;
    }
    Ok(deck)
}

/// Render a deck as a bracketed index list that `parse_deck_list` accepts.
pub fn format_deck_list(deck: &[Card; DECK_LEN]) -> String {
    let parts: Vec<String> = deck.iter().map(|c| c.index().to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// Pull every well-formed deck list out of arbitrary text.
///
/// Each `[...]` holding only digits, commas, and whitespace is tried as a
/// deck and kept if it is a full permutation. Decks are labelled
/// `<default_label>#1`, `#2`, ... in order of appearance.
pub fn extract_decks_from_text(text: &str, default_label: &str) -> Vec<DeckSpec> {
    let numeric = |body: &&str| {
        body.chars()
            .all(|c| c.is_ascii_digit() || c == ',' || c.is_ascii_whitespace())
    };
    text.split('[')
        .skip(1)
        .filter_map(|chunk| chunk.split_once(']').map(|(body, _)| body))
        .filter(numeric)
        .filter_map(|body| deck_from_indices(body).ok())
        .enumerate()
        .map(|(n, deck)| DeckSpec {
            label: format!("{default_label}#{}", n + 1),
            deck,
        })
        .collect()
}

/// Load decks from a text file containing one or more deck lists.
///
/// Returns an empty Vec if no deck lists were found.
pub fn load_decks_from_file(path: &Path) -> Result<Vec<DeckSpec>> {
    let text = fs::read_to_string(path)?;
    let default_label = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "deck_file".to_string());
    Ok(extract_decks_from_text(&text, &default_label))
}

impl Board {
    /// Deal code of an untouched deal; `None` once play has started.
    pub fn deal_code(&self) -> Option<BigUint> {
        self.dealt_order().and_then(|deck| encode_deck(&deck).ok())
    }

    /// Rebuild the deal a code describes.
    pub fn from_deal_code(code: &BigUint, draw_mode: DrawMode) -> Result<Board> {
        Ok(Board::deal_from_deck(decode_deck(code)?, draw_mode))
    }
}
