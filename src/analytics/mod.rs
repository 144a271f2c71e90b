//! In-memory aggregation behind the reporting screens.
//!
//! Repositories load the rows of a reporting window; the functions here only
//! count, group and compute rates so they can be tested without a database.

pub mod campaigns;
pub mod period;
pub mod report;
pub mod summary;

use std::collections::HashMap;

use serde::Serialize;

/// Percentage of `part` in `whole`, rounded to one decimal. Zero when `whole` is zero.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// A labelled counter used by the "by type"/"by source" tables.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CountRow {
    pub key: String,
    pub count: usize,
}

/// Turns a key → count map into rows ordered by count (desc), then key (asc).
pub(crate) fn ranked(counts: HashMap<String, usize>, limit: Option<usize>) -> Vec<CountRow> {
    let mut rows = counts
        .into_iter()
        .map(|(key, count)| CountRow { key, count })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    if let Some(limit) = limit {
        rows.truncate(limit);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(percent(1, 3), 33.3);
        assert_eq!(percent(2, 3), 66.7);
        assert_eq!(percent(5, 0), 0.0);
        assert_eq!(percent(0, 10), 0.0);
    }

    #[test]
    fn ranked_orders_by_count_then_key() {
        let counts = HashMap::from([
            ("b".to_string(), 2),
            ("a".to_string(), 2),
            ("c".to_string(), 5),
        ]);
        let rows = ranked(counts, Some(2));
        assert_eq!(
            rows,
            vec![
                CountRow { key: "c".into(), count: 5 },
                CountRow { key: "a".into(), count: 2 },
            ]
        );
    }
}
