//! CNPJ input mask.
//!
//! `format_cnpj` turns whatever the reader typed into the canonical
//! `NN.NNN.NNN/NNNN-NN` display; `normalize` recovers the bare digits.

use regex::Regex;
use std::sync::LazyLock;

pub const CNPJ_DIGITS: usize = 14;

/// Length of a fully masked CNPJ, i.e. the input display cap.
pub const MASKED_LEN: usize = 18;

/// Separator emitted after the digit at each position.
const SEPARATORS: [(usize, char); 4] = [(2, '.'), (5, '.'), (8, '/'), (12, '-')];

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());

/// Strips every non-digit character.
pub fn normalize(input: &str) -> String {
    NON_DIGIT.replace_all(input, "").into_owned()
}

/// Masks partial or complete input. Digits past the 14th are dropped and a
/// separator only appears once a digit follows it.
pub fn format_cnpj(input: &str) -> String {
    let digits = normalize(input);
    let mut masked = String::with_capacity(MASKED_LEN);

    for (index, digit) in digits.chars().take(CNPJ_DIGITS).enumerate() {
        if let Some((_, sep)) = SEPARATORS.iter().find(|(pos, _)| *pos == index) {
            masked.push(*sep);
        }
        masked.push(digit);
    }

    masked
}

pub fn is_complete(input: &str) -> bool {
    normalize(input).len() == CNPJ_DIGITS
}
