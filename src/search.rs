//! Name search over the dataset.

use crate::FoodRecord;

/// At most this many matches are listed.
pub const MAX_RESULTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty query: ask the user for a food name.
    Prompt,
    NoMatches { query: String },
    Matches {
        /// Record indices of the first matches, in dataset order.
        hits: Vec<usize>,
        /// Number of further matches not listed.
        remaining: usize,
    },
}

impl SearchOutcome {
    pub fn hits(&self) -> &[usize] {
        match self {
            SearchOutcome::Matches { hits, .. } => hits,
            _ => &[],
        }
    }

    pub fn remaining_message(&self) -> Option<String> {
        match self {
            SearchOutcome::Matches { remaining, .. } if *remaining > 0 => Some(format!(
                "... and {remaining} more. Refine your search or select from the top {MAX_RESULTS}."
            )),
            _ => None,
        }
    }
}

/// Lowercased whitespace-separated tokens of `query`.
pub fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// True when `name` contains every token (any order).
pub fn name_matches(name: &str, tokens: &[String]) -> bool {
    let name = name.to_lowercase();
    tokens.iter().all(|t| name.contains(t.as_str()))
}

pub fn search(records: &[FoodRecord], query: &str) -> SearchOutcome {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return SearchOutcome::Prompt;
    }

    let mut hits = Vec::new();
    let mut total = 0usize;
    for (idx, record) in records.iter().enumerate() {
        if !name_matches(record.name(), &tokens) {
            continue;
        }
        total += 1;
        if hits.len() < MAX_RESULTS {
            hits.push(idx);
        }
    }

    if total == 0 {
        return SearchOutcome::NoMatches {
            query: query.trim().to_string(),
        };
    }

    SearchOutcome::Matches {
        remaining: total - hits.len(),
        hits,
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_RESULTS, SearchOutcome, search, tokenize};
    use crate::FoodRecord;

    fn foods() -> Vec<FoodRecord> {
        vec![
            FoodRecord::named("Apples, red delicious, raw", 1),
            FoodRecord::named("Apples, granny smith, raw", 2),
            FoodRecord::named("Peppers, red, raw", 3),
            FoodRecord::named("Cheese, cheddar", 4),
        ]
    }

    #[test]
    fn tokenize_lowercases_and_splits() {
        assert_eq!(tokenize("  Red   APPLE\t"), vec!["red", "apple"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn every_token_must_match() {
        let records = foods();
        assert_eq!(search(&records, "red").hits(), &[0, 2]);
        assert_eq!(search(&records, "apple red").hits(), &[0]);
        assert_eq!(search(&records, "CHEDDAR").hits(), &[3]);
    }

    #[test]
    fn token_order_does_not_matter() {
        let records = foods();
        assert_eq!(search(&records, "apple red"), search(&records, "red apple"));
    }

    #[test]
    fn empty_query_prompts() {
        let records = foods();
        assert_eq!(search(&records, ""), SearchOutcome::Prompt);
        assert_eq!(search(&records, "  \t "), SearchOutcome::Prompt);
    }

    #[test]
    fn no_matches_echoes_query() {
        let records = foods();
        assert_eq!(
            search(&records, " kiwi "),
            SearchOutcome::NoMatches {
                query: "kiwi".to_string()
            }
        );
    }

    #[test]
    fn results_are_capped_with_remainder() {
        let records: Vec<FoodRecord> = (0..25)
            .map(|i| FoodRecord::named(&format!("Beans, variety {i}"), i))
            .collect();
        let outcome = search(&records, "beans");
        assert_eq!(outcome.hits(), (0..MAX_RESULTS).collect::<Vec<_>>().as_slice());
        assert_eq!(
            outcome,
            SearchOutcome::Matches {
                hits: (0..MAX_RESULTS).collect(),
                remaining: 15
            }
        );
        assert_eq!(
            outcome.remaining_message().as_deref(),
            Some("... and 15 more. Refine your search or select from the top 10.")
        );
        assert_eq!(search(&records, "variety 7").remaining_message(), None);
    }
}
