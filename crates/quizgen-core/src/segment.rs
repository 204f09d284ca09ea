//! Sentence segmentation.

use serde::{Deserialize, Serialize};

use crate::rules::TextRules;

/// A candidate sentence with its position in the segmented sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
}

impl Sentence {
    /// Raw whitespace-separated tokens, punctuation attached.
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

/// Split normalized text on runs of `.`, `!`, `?` and newlines.
///
/// Fragments are trimmed and kept only when at least `min_length`
/// characters long. Indices follow the output order.
pub fn split_sentences(rules: &TextRules, text: &str, min_length: usize) -> Vec<Sentence> {
    rules
        .sentence_breaks
        .split(text)
        .map(str::trim)
        .filter(|fragment| fragment.chars().count() >= min_length)
        .enumerate()
        .map(|(index, fragment)| Sentence {
            index,
            text: fragment.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MIN_SENTENCE_LENGTH;

    fn split(text: &str) -> Vec<Sentence> {
        split_sentences(&TextRules::default(), text, MIN_SENTENCE_LENGTH)
    }

    #[test]
    fn splits_on_terminators_and_newlines() {
        let text = "Photosynthesis converts light energy into chemical energy. \
                    Chlorophyll absorbs mostly blue and red wavelengths of light!\n\
                    Why do leaves change colour during the autumn months?";
        let sentences = split(text);
        assert_eq!(sentences.len(), 3);
        assert_eq!(
            sentences[0].text,
            "Photosynthesis converts light energy into chemical energy"
        );
        assert!(sentences[2].text.starts_with("Why do leaves"));
    }

    #[test]
    fn short_fragments_are_dropped_and_indices_compact() {
        let text = "Short one. The mitochondria is the powerhouse of the cell. Ok!! \
                    Ribosomes assemble proteins from amino acid chains.";
        let sentences = split(text);
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].index, 0);
        assert_eq!(sentences[1].index, 1);
        assert!(sentences[1].text.starts_with("Ribosomes"));
    }

    #[test]
    fn exact_threshold_is_kept() {
        let fragment = "a".repeat(MIN_SENTENCE_LENGTH);
        assert_eq!(split(&fragment).len(), 1);
        let fragment = "a".repeat(MIN_SENTENCE_LENGTH - 1);
        assert!(split(&fragment).is_empty());
    }

    #[test]
    fn tokens_keep_punctuation() {
        let sentence = Sentence {
            index: 0,
            text: "Cells, tissues and  organs".into(),
        };
        assert_eq!(sentence.tokens(), vec!["Cells,", "tissues", "and", "organs"]);
    }

    #[test]
    fn no_sentences_from_short_text() {
        assert!(split("Too short.").is_empty());
        assert!(split("").is_empty());
    }
}
