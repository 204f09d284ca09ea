//! Document-wide tokenization and term frequencies.

use std::collections::HashMap;

use crate::rules::TextRules;

/// Scoring-eligible tokens of `text`, normalized, in document order.
///
/// Every character that is not a letter, digit, whitespace or hyphen is
/// treated as a separator before splitting on whitespace.
pub fn tokenize(rules: &TextRules, text: &str) -> Vec<String> {
    let cleaned = rules.non_word.replace_all(text, " ");
    cleaned
        .split_whitespace()
        .map(|token| rules.normalize_token(token))
        .filter(|token| rules.is_content_token(token))
        .collect()
}

/// Term counts plus the keyword list ranked by frequency.
#[derive(Debug, Clone, Default)]
pub struct FrequencyModel {
    counts: HashMap<String, usize>,
    keywords: Vec<String>,
}

impl FrequencyModel {
    /// Count the content tokens of a whole document.
    pub fn build(rules: &TextRules, text: &str) -> Self {
        Self::from_tokens(tokenize(rules, text))
    }

    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut first_seen = Vec::new();
        for token in tokens {
            let count = counts.entry(token.clone()).or_insert(0);
            if *count == 0 {
                first_seen.push(token);
            }
            *count += 1;
        }

        // Stable sort keeps first-seen order among equal counts.
        let mut keywords = first_seen;
        keywords.sort_by(|a, b| counts[b].cmp(&counts[a]));

        Self { counts, keywords }
    }

    /// Occurrences of a normalized token; zero when absent.
    pub fn count(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Score contribution of a token: its count, at least 1.
    pub fn weight(&self, token: &str) -> usize {
        self.count(token).max(1)
    }

    /// Distinct tokens by descending frequency.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_filters_stopwords_and_short_tokens() {
        let rules = TextRules::default();
        let tokens = tokenize(&rules, "The cell membrane, and the DNA within it!");
        assert_eq!(tokens, vec!["cell", "membrane"]);
    }

    #[test]
    fn tokenize_splits_on_punctuation_keeps_hyphens() {
        let rules = TextRules::default();
        let tokens = tokenize(&rules, "enzyme/substrate self-assembly (catalysis)");
        assert_eq!(tokens, vec!["enzyme", "substrate", "self-assembly", "catalysis"]);
    }

    #[test]
    fn keywords_ranked_by_count_then_first_seen() {
        let rules = TextRules::default();
        let model = FrequencyModel::build(
            &rules,
            "gamma alpha beta alpha. gamma delta alpha. delta beta gamma",
        );
        assert_eq!(model.count("alpha"), 3);
        assert_eq!(model.count("gamma"), 3);
        assert_eq!(model.count("zeta"), 0);
        assert_eq!(model.weight("zeta"), 1);
        assert_eq!(model.keywords(), &["gamma", "alpha", "beta", "delta"]);
    }

    #[test]
    fn empty_document() {
        let model = FrequencyModel::build(&TextRules::default(), "a an the");
        assert!(model.is_empty());
        assert!(model.keywords().is_empty());
    }
}
