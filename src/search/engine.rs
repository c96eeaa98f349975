//! Search evaluation over the image corpus
//!
//! Operates on an in-memory snapshot of the stored records: no I/O, no
//! shared state, safe to call concurrently from any number of requests.

use std::collections::HashSet;

use serde::Serialize;

use crate::annotations::{BoundingBox, WordAnnotation};
use crate::db::ImageRecord;

use super::fuzzy;
use super::query::{QueryMode, SearchQuery};

/// One matching image with the words to highlight.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub id: i64,
    pub display_name: String,
    pub internal_filename: String,
    pub matched_words: Vec<WordAnnotation>,
}

/// Evaluate `query` against every record in `corpus`.
///
/// Result order follows corpus order. A record whose stored word list is
/// absent or fails to decode contributes zero matches but never aborts
/// the search.
pub fn search(query: &SearchQuery, corpus: &[ImageRecord]) -> Vec<SearchMatch> {
    if query.terms.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();

    for record in corpus {
        let words = decode_words(record);

        let mut matched_words: Vec<WordAnnotation> = Vec::new();
        let mut seen_boxes: HashSet<BoundingBox> = HashSet::new();
        let mut terms_found = 0usize;

        for term in &query.terms {
            let mut term_found = false;

            for word in &words {
                if fuzzy::matches(&word.text, term) {
                    term_found = true;
                    // Two annotations with the same box are the same
                    // highlight region; keep the first.
                    if seen_boxes.insert(word.bbox) {
                        matched_words.push(word.clone());
                    }
                }
            }

            if term_found {
                terms_found += 1;
            }
        }

        let included = match query.mode {
            QueryMode::And => terms_found == query.terms.len(),
            QueryMode::Or => terms_found > 0,
        };

        if included {
            results.push(SearchMatch {
                id: record.id,
                display_name: record.display_name.clone(),
                internal_filename: record.internal_filename.clone(),
                matched_words,
            });
        }
    }

    results
}

/// Decode a record's stored word list, degrading to empty on bad data.
fn decode_words(record: &ImageRecord) -> Vec<WordAnnotation> {
    let Some(raw) = record.ocr_words.as_deref() else {
        return Vec::new();
    };

    match serde_json::from_str(raw) {
        Ok(words) => words,
        Err(e) => {
            tracing::warn!(id = record.id, "Undecodable stored word list: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::BoundingBox;

    fn record(id: i64, words: &[WordAnnotation]) -> ImageRecord {
        ImageRecord {
            id,
            display_name: format!("img{}.png", id),
            internal_filename: format!("img{}.png", id),
            full_text: Some(
                words
                    .iter()
                    .map(|w| w.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            ocr_words: Some(serde_json::to_string(words).unwrap()),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn word(text: &str, x: i32) -> WordAnnotation {
        WordAnnotation::new(text, BoundingBox::new(x, 0, 50, 20))
    }

    #[test]
    fn empty_query_returns_nothing() {
        let corpus = vec![record(1, &[word("cat", 0)])];
        let query = SearchQuery::parse("");
        assert!(search(&query, &corpus).is_empty());
    }

    #[test]
    fn or_mode_includes_any_term_hit() {
        let corpus = vec![
            record(1, &[word("cat", 0)]),
            record(2, &[word("dog", 0)]),
            record(3, &[word("fish", 0)]),
        ];
        let query = SearchQuery::parse("cat OR dog");
        let results = search(&query, &corpus);
        let ids: Vec<i64> = results.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn and_mode_requires_every_term_somewhere_in_the_image() {
        // "cat" and "dog" sit in separate boxes of image 1; that still
        // satisfies AND. Image 2 only has one of the terms.
        let corpus = vec![
            record(1, &[word("cat", 0), word("dog", 100)]),
            record(2, &[word("cat", 0)]),
        ];
        let query = SearchQuery::parse("cat AND dog");
        let results = search(&query, &corpus);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].matched_words.len(), 2);
    }

    #[test]
    fn matched_words_cover_all_terms_not_just_the_deciding_one() {
        let corpus = vec![record(
            1,
            &[word("cat", 0), word("dog", 100), word("fish", 200)],
        )];
        let query = SearchQuery::parse("cat OR fish");
        let results = search(&query, &corpus);
        let texts: Vec<&str> = results[0]
            .matched_words
            .iter()
            .map(|w| w.text.as_str())
            .collect();
        assert_eq!(texts, vec!["cat", "fish"]);
    }

    #[test]
    fn shared_box_is_emitted_once() {
        // One word region matched by both terms: "catalog" contains
        // "cat" and is within edit range of nothing else here.
        let shared = WordAnnotation::new("catalog", BoundingBox::new(0, 0, 90, 20));
        let corpus = vec![record(1, &[shared])];
        let query = SearchQuery::parse("cat OR catalog");
        let results = search(&query, &corpus);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matched_words.len(), 1);
    }

    #[test]
    fn corrupt_word_list_degrades_to_textless() {
        let mut bad = record(1, &[word("cat", 0)]);
        bad.ocr_words = Some("{not json".to_string());
        let good = record(2, &[word("cat", 0)]);

        let query = SearchQuery::parse("cat");
        let results = search(&query, &[bad, good]);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);
    }

    #[test]
    fn absent_word_list_contributes_zero_matches() {
        let mut empty = record(1, &[]);
        empty.ocr_words = None;
        let query = SearchQuery::parse("cat");
        assert!(search(&query, &[empty]).is_empty());
    }

    #[test]
    fn fuzzy_hits_flow_through_the_engine() {
        let corpus = vec![record(1, &[word("invo1ce", 0)])];
        let query = SearchQuery::parse("invoice");
        let results = search(&query, &corpus);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn result_order_follows_corpus_order() {
        let corpus = vec![
            record(9, &[word("cat", 0)]),
            record(3, &[word("cat", 0)]),
            record(7, &[word("cat", 0)]),
        ];
        let query = SearchQuery::parse("cat");
        let ids: Vec<i64> = search(&query, &corpus).iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![9, 3, 7]);
    }
}
