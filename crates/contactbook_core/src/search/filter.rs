//! Name/surname/email search predicate.
//!
//! # Invariants
//! - Matching is a case-sensitive substring test (`instr`), never `LIKE`.
//! - Empty strings are treated exactly like unset criteria.

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

/// How individual search criteria combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Criteria are OR-ed and an unset criterion matches every row.
    ///
    /// Any search that leaves at least one criterion unset therefore returns
    /// the whole table.
    #[default]
    Wildcard,
    /// Only provided criteria apply and they are AND-ed together.
    Strict,
}

/// Search criteria as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSearch {
    /// Substring of `first_name`.
    pub name: Option<String>,
    /// Substring of `last_name`.
    pub surname: Option<String>,
    /// Substring of `email`.
    pub email: Option<String>,
}

impl ContactSearch {
    fn criteria(&self) -> [(&'static str, Option<&str>); 3] {
        [
            ("first_name", non_empty(self.name.as_deref())),
            ("last_name", non_empty(self.surname.as_deref())),
            ("email", non_empty(self.email.as_deref())),
        ]
    }
}

/// Builds the `WHERE` predicate and its bind values for `search`.
pub fn build_search_predicate(search: &ContactSearch, mode: SearchMode) -> (String, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut bind_values = Vec::new();

    for (column, needle) in search.criteria() {
        match (needle, mode) {
            (Some(needle), _) => {
                clauses.push(format!("instr({column}, ?) > 0"));
                bind_values.push(Value::Text(needle.to_string()));
            }
            (None, SearchMode::Wildcard) => clauses.push("1 = 1".to_string()),
            (None, SearchMode::Strict) => {}
        }
    }

    let predicate = match mode {
        _ if clauses.is_empty() => "1 = 1".to_string(),
        SearchMode::Wildcard => clauses.join(" OR "),
        SearchMode::Strict => clauses.join(" AND "),
    };

    (format!("({predicate})"), bind_values)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{build_search_predicate, ContactSearch, SearchMode};

    fn by_name(name: &str) -> ContactSearch {
        ContactSearch {
            name: Some(name.to_string()),
            ..ContactSearch::default()
        }
    }

    #[test]
    fn wildcard_mode_turns_unset_criteria_into_always_true() {
        let (sql, binds) = build_search_predicate(&by_name("Al"), SearchMode::Wildcard);
        assert_eq!(sql, "(instr(first_name, ?) > 0 OR 1 = 1 OR 1 = 1)");
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn strict_mode_skips_unset_criteria() {
        let search = ContactSearch {
            name: Some("Al".to_string()),
            surname: Some(String::new()),
            email: Some("example".to_string()),
        };
        let (sql, binds) = build_search_predicate(&search, SearchMode::Strict);
        assert_eq!(sql, "(instr(first_name, ?) > 0 AND instr(email, ?) > 0)");
        assert_eq!(binds.len(), 2);
    }

    #[test]
    fn no_criteria_matches_everything_in_both_modes() {
        let empty = ContactSearch::default();
        assert_eq!(
            build_search_predicate(&empty, SearchMode::Strict).0,
            "(1 = 1)"
        );
        assert_eq!(
            build_search_predicate(&empty, SearchMode::Wildcard).0,
            "(1 = 1 OR 1 = 1 OR 1 = 1)"
        );
    }
}
