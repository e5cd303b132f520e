//! Tokenization and stopword filtering

use once_cell::sync::Lazy;
use std::collections::HashSet;

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "if", "then", "than", "as", "of", "at", "by",
        "for", "with", "about", "into", "through", "during", "before", "after", "to", "from",
        "in", "on", "off", "over", "under", "is", "are", "was", "were", "be", "been", "being",
        "have", "has", "had", "do", "does", "did", "will", "would", "can", "could", "should",
        "this", "that", "these", "those", "it", "its", "we", "our", "they", "their", "which",
        "what", "such", "not", "no", "so", "also", "both", "each", "between", "using", "based",
    ]
    .into_iter()
    .collect()
});

/// Tokenize a document: lowercase, split on non-alphanumeric characters,
/// drop single characters and stopwords.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.len() > 1 && !STOPWORDS.contains(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("Graph-based Learning, with THE networks!");
        assert_eq!(tokens, vec!["graph", "learning", "networks"]);
    }

    #[test]
    fn test_tokenize_drops_short_and_stopwords() {
        let tokens = tokenize("a is x of data");
        assert_eq!(tokens, vec!["data"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("  ,, !").is_empty());
    }
}
