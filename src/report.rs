// Read-only aggregations over normalized case records

use crate::error::{CorpusError, Result};
use crate::metadata::CaseRecord;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How many courts the per-tool ranking shows by default
pub const TOP_COURTS: usize = 10;

/// Number of cases per tool, ordered by tool name
pub fn cases_per_tool(records: &[CaseRecord]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for rec in records {
        *counts.entry(rec.tool.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Distinct tool names, sorted
pub fn tool_names(records: &[CaseRecord]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r.tool.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Cases of one tool, newest first
#[derive(Debug, Clone)]
pub struct ToolView<'a> {
    pub tool: &'a str,
    pub cases: Vec<&'a CaseRecord>,
}

impl<'a> ToolView<'a> {
    pub fn new(records: &'a [CaseRecord], tool: &'a str) -> Result<Self> {
        let mut cases: Vec<&CaseRecord> = records.iter().filter(|r| r.tool == tool).collect();
        if cases.is_empty() {
            return Err(CorpusError::UnknownTool(tool.to_string()));
        }

        // Stable: same-year cases keep input order
        cases.sort_by(|a, b| b.year.cmp(&a.year));

        Ok(Self { tool, cases })
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn case(&self, index: usize) -> Option<&'a CaseRecord> {
        self.cases.get(index).copied()
    }

    /// (year, count) ascending by year
    pub fn cases_per_year(&self) -> Vec<(i32, usize)> {
        let mut per_year = BTreeMap::new();
        for rec in &self.cases {
            *per_year.entry(rec.year).or_insert(0) += 1;
        }
        per_year.into_iter().collect()
    }

    /// The `n` courts with the most cases, ties broken by court name
    pub fn top_courts(&self, n: usize) -> Vec<(&'a str, usize)> {
        let mut counts: HashMap<&'a str, usize> = HashMap::new();
        for rec in self.cases.iter().copied() {
            *counts.entry(rec.court.as_str()).or_insert(0) += 1;
        }

        let mut ranked: Vec<(&'a str, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn record(tool: &str, link: &str, court: &str, year: i32) -> CaseRecord {
        CaseRecord {
            tool: tool.to_string(),
            casename: format!("Case {}", link),
            publication: format!("{}, {}", court, year),
            link: link.to_string(),
            court: court.to_string(),
            year,
            extra: Map::new(),
        }
    }

    fn sample() -> Vec<CaseRecord> {
        vec![
            record("FTK", "f1", "D. Md.", 2010),
            record("EnCase", "e1", "5th Cir.", 2012),
            record("FTK", "f2", "9th Cir.", 2015),
            record("FTK", "f3", "D. Md.", 2010),
            record("FTK", "f4", "D. Md.", 2018),
            record("EnCase", "e2", "5th Cir.", 2007),
        ]
    }

    #[test]
    fn test_cases_per_tool() {
        let records = sample();
        let counts = cases_per_tool(&records);
        assert_eq!(counts.get("FTK"), Some(&4));
        assert_eq!(counts.get("EnCase"), Some(&2));
        assert_eq!(counts.keys().copied().collect::<Vec<_>>(), vec!["EnCase", "FTK"]);
    }

    #[test]
    fn test_tool_names_sorted_unique() {
        let records = sample();
        assert_eq!(tool_names(&records), vec!["EnCase", "FTK"]);
    }

    #[test]
    fn test_tool_view_sorted_newest_first() {
        let records = sample();
        let view = ToolView::new(&records, "FTK").unwrap();
        let links: Vec<&str> = view.cases.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["f4", "f2", "f1", "f3"]);
        assert_eq!(view.case(0).unwrap().year, 2018);
        assert!(view.case(4).is_none());
    }

    #[test]
    fn test_cases_per_year_ascending() {
        let records = sample();
        let view = ToolView::new(&records, "FTK").unwrap();
        assert_eq!(view.cases_per_year(), vec![(2010, 2), (2015, 1), (2018, 1)]);
    }

    #[test]
    fn test_top_courts() {
        let records = sample();
        let view = ToolView::new(&records, "FTK").unwrap();
        assert_eq!(view.top_courts(TOP_COURTS), vec![("D. Md.", 3), ("9th Cir.", 1)]);
        assert_eq!(view.top_courts(1), vec![("D. Md.", 3)]);
    }

    #[test]
    fn test_unknown_tool() {
        let records = sample();
        assert!(matches!(
            ToolView::new(&records, "XRY"),
            Err(CorpusError::UnknownTool(_))
        ));
    }
}
