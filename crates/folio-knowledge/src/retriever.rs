// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical word-overlap retriever over the knowledge store.
//!
//! Scores each chunk by counting query words that appear as substrings of
//! the lowercased chunk, then returns the top-N chunks joined with newlines.
//! Deliberately not embedding-based: keeps the footprint of a single local
//! model and stays fast on small knowledge bases.
//!
//! The retriever always returns up to `top_n` chunks even when scores are
//! zero. Off-topic questions therefore still get *some* context rather than
//! none, which the prompt instructs the model to handle gracefully.

use tracing::debug;

use crate::store::KnowledgeStore;

/// Default number of chunks retrieved per query.
pub const DEFAULT_TOP_N: usize = 3;

/// Selects the `top_n` most query-relevant chunks and joins them with
/// newlines into one context block.
///
/// Scoring: the query is lowercased and split on whitespace (duplicate
/// words kept, each counting separately); a chunk's score is the number of
/// query words that are literal substrings of the lowercased chunk. The
/// sort is stable and descending, so equal-score chunks keep their original
/// document order.
pub fn retrieve(store: &KnowledgeStore, query: &str, top_n: usize) -> String {
    let query_lower = query.to_lowercase();
    let query_words: Vec<&str> = query_lower.split_whitespace().collect();

    let mut scored: Vec<(usize, &String)> = store
        .chunks()
        .iter()
        .map(|chunk| {
            let chunk_lower = chunk.to_lowercase();
            let score = query_words
                .iter()
                .filter(|word| chunk_lower.contains(**word))
                .count();
            (score, chunk)
        })
        .collect();

    // Stable sort keeps document order among ties.
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let selected: Vec<&str> = scored
        .iter()
        .take(top_n)
        .map(|(_, chunk)| chunk.as_str())
        .collect();

    debug!(
        query_words = query_words.len(),
        selected = selected.len(),
        top_score = scored.first().map(|(s, _)| *s).unwrap_or(0),
        "retrieved context chunks"
    );

    selected.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_of(lines: &[&str]) -> KnowledgeStore {
        KnowledgeStore::load(&lines.join("\n"))
    }

    #[test]
    fn best_match_first_ties_keep_document_order() {
        let store = store_of(&["I like cats", "I like dogs", "Mathematics is fun"]);
        let context = retrieve(&store, "cats", 3);
        assert_eq!(
            context,
            "I like cats\nI like dogs\nMathematics is fun",
            "score-1 chunk first, zero-score ties in original order"
        );
    }

    #[test]
    fn returns_exactly_top_n_when_enough_chunks() {
        let store = store_of(&["a", "b", "c", "d", "e"]);
        let context = retrieve(&store, "unrelated query", 3);
        assert_eq!(context.lines().count(), 3);
    }

    #[test]
    fn zero_score_chunks_still_included() {
        let store = store_of(&["alpha", "beta"]);
        let context = retrieve(&store, "gamma", 3);
        // Fewer chunks than top_n: all returned despite zero scores.
        assert_eq!(context, "alpha\nbeta");
    }

    #[test]
    fn substring_match_not_whole_word() {
        let store = store_of(&["concatenation is fun", "dogs bark"]);
        // "cat" is a substring of "concatenation".
        let context = retrieve(&store, "cat", 1);
        assert_eq!(context, "concatenation is fun");
    }

    #[test]
    fn duplicate_query_words_count_twice() {
        let store = store_of(&["rust rust systems", "python scripting"]);
        // Chunk scores: first gets 2 (one per duplicated query word), second 0.
        let context = retrieve(&store, "rust rust", 1);
        assert_eq!(context, "rust rust systems");
    }

    #[test]
    fn scoring_is_case_insensitive() {
        let store = store_of(&["Deep Learning and NLP", "carpentry"]);
        let context = retrieve(&store, "DEEP learning", 1);
        assert_eq!(context, "Deep Learning and NLP");
    }

    #[test]
    fn scores_non_increasing_across_selection() {
        let store = store_of(&[
            "rust and tokio",
            "rust only",
            "tokio only",
            "nothing relevant",
        ]);
        let context = retrieve(&store, "rust tokio", 4);
        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines[0], "rust and tokio");
        // The two score-1 chunks keep document order.
        assert_eq!(lines[1], "rust only");
        assert_eq!(lines[2], "tokio only");
        assert_eq!(lines[3], "nothing relevant");
    }

    #[test]
    fn empty_store_yields_empty_context() {
        let store = KnowledgeStore::load("");
        assert_eq!(retrieve(&store, "anything", 3), "");
    }

    #[test]
    fn empty_query_selects_leading_chunks() {
        let store = store_of(&["one", "two", "three", "four"]);
        // No query words: every score is zero, stable order wins.
        assert_eq!(retrieve(&store, "   ", 2), "one\ntwo");
    }
}
