//! Phrase candidate extraction.
//!
//! Every run of one to three consecutive content tokens inside a sentence is
//! a candidate concept. A candidate's score is the summed document frequency
//! of its tokens, so phrases built from recurring terms are blanked first.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::frequency::FrequencyModel;
use crate::rules::TextRules;
use crate::segment::Sentence;

/// A scored run of content tokens inside one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseCandidate {
    pub sentence_index: usize,
    /// Offset of the first token in the sentence's whitespace tokens.
    pub start: usize,
    /// Number of tokens covered, 1..=3.
    pub len: usize,
    /// Raw tokens with outer punctuation stripped, space-joined.
    pub surface: String,
    /// Lowercased normalized tokens, space-joined.
    pub normalized: String,
    pub score: usize,
}

impl PhraseCandidate {
    /// Exclusive end offset of the span.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Extract deduplicated candidates, highest score first.
///
/// When the same normalized phrase occurs more than once, the occurrence
/// with the strictly higher score wins; on ties the first one found stays.
/// Equal scores keep discovery order.
pub fn extract_phrases(
    rules: &TextRules,
    sentences: &[Sentence],
    frequency: &FrequencyModel,
    max_tokens: usize,
) -> Vec<PhraseCandidate> {
    let max_tokens = max_tokens.max(1);
    let mut candidates: Vec<PhraseCandidate> = Vec::new();
    let mut by_phrase: HashMap<String, usize> = HashMap::new();

    for sentence in sentences {
        let tokens = sentence.tokens();
        let cleaned: Vec<String> = tokens.iter().map(|t| rules.normalize_token(t)).collect();

        for start in 0..tokens.len() {
            if !rules.is_content_token(&cleaned[start]) {
                continue;
            }

            let mut len = 1;
            while len < max_tokens
                && start + len < tokens.len()
                && rules.is_content_token(&cleaned[start + len])
            {
                len += 1;
            }

            let span = start..start + len;
            let score: usize = cleaned[span.clone()]
                .iter()
                .map(|t| frequency.weight(t))
                .sum();
            let surface = tokens[span.clone()]
                .iter()
                .map(|t| rules.strip_token(t))
                .collect::<Vec<_>>()
                .join(" ");
            let normalized = cleaned[span].join(" ");

            let candidate = PhraseCandidate {
                sentence_index: sentence.index,
                start,
                len,
                surface,
                normalized,
                score,
            };

            match by_phrase.get(&candidate.normalized) {
                Some(&slot) => {
                    if candidate.score > candidates[slot].score {
                        candidates[slot] = candidate;
                    }
                }
                None => {
                    by_phrase.insert(candidate.normalized.clone(), candidates.len());
                    candidates.push(candidate);
                }
            }
        }
    }

    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    tracing::debug!(count = candidates.len(), "extracted phrase candidates");
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::split_sentences;

    fn extract(text: &str) -> Vec<PhraseCandidate> {
        let rules = TextRules::default();
        let sentences = split_sentences(&rules, text, 10);
        let frequency = FrequencyModel::build(&rules, text);
        extract_phrases(&rules, &sentences, &frequency, 3)
    }

    #[test]
    fn greedy_runs_of_up_to_three_tokens() {
        let candidates = extract("Cellular respiration releases stored energy in cells.");
        let first = candidates
            .iter()
            .find(|c| c.start == 0)
            .expect("candidate at start");
        assert_eq!(first.len, 3);
        assert_eq!(first.surface, "Cellular respiration releases");
        assert_eq!(first.normalized, "cellular respiration releases");

        // A run starts at every content position, not just at run boundaries.
        let second = candidates.iter().find(|c| c.start == 1).unwrap();
        assert_eq!(second.normalized, "respiration releases stored");
    }

    #[test]
    fn stopwords_and_short_tokens_break_runs() {
        let candidates = extract("Glucose and oxygen feed the cell membrane");
        let glucose = candidates.iter().find(|c| c.start == 0).unwrap();
        assert_eq!(glucose.len, 1);
        assert_eq!(glucose.surface, "Glucose");
        let membrane = candidates.iter().find(|c| c.start == 5).unwrap();
        assert_eq!(membrane.normalized, "cell membrane");
        assert!(candidates
            .iter()
            .all(|c| c.normalized.split(' ').all(|t| t != "and" && t != "the")));
    }

    #[test]
    fn score_sums_frequencies() {
        let text = "Osmosis moves water across membranes quickly. \
                    Osmosis depends on solute concentration gradients";
        let candidates = extract(text);
        let osmosis_moves = candidates
            .iter()
            .find(|c| c.normalized == "osmosis moves water")
            .unwrap();
        assert_eq!(osmosis_moves.score, 2 + 1 + 1);
    }

    #[test]
    fn duplicates_keep_highest_score() {
        let text = "Enzymes lower activation energy barriers. \
                    Catalysts like enzymes speed reactions. \
                    Enzymes enzymes everywhere in every living cell";
        let candidates = extract(text);
        let singles: Vec<_> = candidates.iter().filter(|c| c.normalized == "enzymes").collect();
        assert!(singles.len() <= 1);
        let mut seen = std::collections::HashSet::new();
        assert!(candidates.iter().all(|c| seen.insert(c.normalized.clone())));
    }

    #[test]
    fn sorted_descending_by_score() {
        let text = "Neurons transmit signals. Neurons connect at synapses. \
                    Synapses release neurotransmitters between neurons";
        let candidates = extract(text);
        assert!(!candidates.is_empty());
        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn surface_strips_outer_punctuation() {
        let candidates = extract("Remember: (photosynthesis), happens in chloroplasts.");
        assert!(candidates.iter().any(|c| c.surface == "Remember photosynthesis happens"));
    }

    #[test]
    fn max_tokens_limits_span() {
        let rules = TextRules::default();
        let text = "Cellular respiration releases stored energy";
        let sentences = split_sentences(&rules, text, 10);
        let frequency = FrequencyModel::build(&rules, text);
        let candidates = extract_phrases(&rules, &sentences, &frequency, 1);
        assert!(candidates.iter().all(|c| c.len == 1));
        assert_eq!(candidates.len(), 5);
    }
}
