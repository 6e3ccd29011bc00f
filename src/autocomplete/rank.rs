use std::collections::HashSet;

use recipebook_common::Suggestion;

/// How well a candidate name matches the typed query. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchClass {
    Exact,
    Prefix,
    Substring,
    Other,
}

fn classify(query: &str, name: &str) -> MatchClass {
    if name == query {
        MatchClass::Exact
    } else if name.starts_with(query) {
        MatchClass::Prefix
    } else if name.contains(query) {
        MatchClass::Substring
    } else {
        MatchClass::Other
    }
}

/// Deduplicate and order catalog results for display.
///
/// Duplicates are detected by id, or by case-insensitive name for entries
/// without an id; the first occurrence wins. Order is exact match, prefix
/// match, substring match, then everything else, each group by name.
pub fn rank_suggestions(query: &str, results: Vec<Suggestion>) -> Vec<Suggestion> {
    let query = query.trim().to_lowercase();
    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();

    let mut unique: Vec<(MatchClass, String, Suggestion)> = results
        .into_iter()
        .filter(|s| match &s.id {
            Some(id) => seen_ids.insert(id.clone()),
            None => seen_names.insert(s.name.to_lowercase()),
        })
        .map(|s| {
            let lowered = s.name.to_lowercase();
            (classify(&query, &lowered), lowered, s)
        })
        .collect();

    unique.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    unique.into_iter().map(|(_, _, s)| s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[Suggestion]) -> Vec<&str> {
        list.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_exact_then_prefix_then_substring() {
        let ranked = rank_suggestions(
            "salt",
            vec![
                Suggestion::new("1", "Sea salt"),
                Suggestion::new("2", "Salted butter"),
                Suggestion::new("3", "Salt"),
                Suggestion::new("4", "Black salt"),
                Suggestion::new("5", "Saltine crackers"),
            ],
        );
        assert_eq!(
            names(&ranked),
            ["Salt", "Salted butter", "Saltine crackers", "Black salt", "Sea salt"]
        );
    }

    #[test]
    fn test_dedup_by_id_keeps_first() {
        let ranked = rank_suggestions(
            "rice",
            vec![
                Suggestion::new("7", "Rice"),
                Suggestion::new("7", "Rice (duplicate row)"),
                Suggestion::new("8", "Rice"),
            ],
        );
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id.as_ref().unwrap().as_str(), "7");
    }

    #[test]
    fn test_dedup_free_text_by_name_case_insensitively() {
        let ranked = rank_suggestions(
            "ghee",
            vec![Suggestion::free_text("Ghee"), Suggestion::free_text("GHEE")],
        );
        assert_eq!(names(&ranked), ["Ghee"]);
    }

    #[test]
    fn test_non_matching_entries_sort_last() {
        let ranked = rank_suggestions(
            "tom",
            vec![Suggestion::new("1", "Passata"), Suggestion::new("2", "Tomato")],
        );
        assert_eq!(names(&ranked), ["Tomato", "Passata"]);
    }
}
