//! Mnemonic phrase validation.
//!
//! The wizard consumes mnemonic validity as an injected capability so the
//! checksum check can live wherever key material lives. The structural
//! validator shipped here checks what can be checked without a wordlist:
//! a valid BIP-39 word count and plausible word shape. Checksum verification
//! belongs to the wallet backend, which rejects bad phrases at creation time.

use crate::backend::MnemonicValidator;

/// Word counts allowed by BIP-39 (128..256 bits of entropy).
pub const VALID_WORD_COUNTS: &[usize] = &[12, 15, 18, 21, 24];

/// Number of whitespace-separated words in a phrase.
pub fn word_count(phrase: &str) -> usize {
    phrase.split_whitespace().count()
}

/// Structural mnemonic check: word count and word shape only.
pub fn is_structurally_valid(phrase: &str) -> bool {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    if !VALID_WORD_COUNTS.contains(&words.len()) {
        return false;
    }
    words
        .iter()
        .all(|word| !word.is_empty() && word.chars().all(|c| c.is_ascii_lowercase()))
}

/// Wordlist-free [`MnemonicValidator`] used when no backend-side validator
/// is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralValidator;

impl MnemonicValidator for StructuralValidator {
    fn is_valid(&self, phrase: &str) -> bool {
        is_structurally_valid(phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHRASE_12: &str =
        "legal winner thank year wave sausage worth useful legal winner thank yellow";

    #[test]
    fn twelve_words_accepted() {
        assert!(is_structurally_valid(PHRASE_12));
    }

    #[test]
    fn twenty_four_words_accepted() {
        let phrase = ["abandon"; 23].join(" ") + " art";
        assert!(is_structurally_valid(&phrase));
    }

    #[test]
    fn wrong_word_count_rejected() {
        assert!(!is_structurally_valid("legal winner thank"));
        let thirteen = ["abandon"; 13].join(" ");
        assert!(!is_structurally_valid(&thirteen));
        assert!(!is_structurally_valid(""));
    }

    #[test]
    fn uppercase_and_digits_rejected() {
        let shouted = PHRASE_12.to_uppercase();
        assert!(!is_structurally_valid(&shouted));

        let with_digit = PHRASE_12.replacen("legal", "l3gal", 1);
        assert!(!is_structurally_valid(&with_digit));
    }

    #[test]
    fn extra_whitespace_tolerated() {
        let spaced = PHRASE_12.replace(' ', "   ");
        assert!(is_structurally_valid(&spaced));
    }

    #[test]
    fn validator_capability_matches_free_function() {
        let validator = StructuralValidator;
        assert!(super::MnemonicValidator::is_valid(&validator, PHRASE_12));
        assert!(!super::MnemonicValidator::is_valid(&validator, "nope"));
    }

    #[test]
    fn word_count_counts_words() {
        assert_eq!(word_count(PHRASE_12), 12);
        assert_eq!(word_count(""), 0);
    }
}
