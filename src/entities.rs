// Named-entity tallies per tool (PERSON / ORG), from entities.json

use crate::error::{CorpusError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub const PERSON: &str = "PERSON";
pub const ORG: &str = "ORG";

#[derive(Debug, Clone, Deserialize)]
pub struct EntityCase {
    pub tool: String,
    #[serde(default)]
    pub entities: HashMap<String, Vec<String>>,
}

/// name -> occurrences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    counts: HashMap<String, usize>,
}

impl Tally {
    pub fn add(&mut self, name: &str) {
        *self.counts.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Top `n` names, count descending then name ascending
    pub fn most_common(&self, n: usize) -> Vec<(&str, usize)> {
        let mut items: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items.truncate(n);
        items
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityCounts {
    people: HashMap<String, Tally>,
    orgs: HashMap<String, Tally>,
}

impl EntityCounts {
    pub fn from_cases<'a, I>(cases: I) -> Self
    where
        I: IntoIterator<Item = &'a EntityCase>,
    {
        let mut counts = EntityCounts::default();

        for case in cases {
            if let Some(names) = case.entities.get(ORG) {
                let tally = counts.orgs.entry(case.tool.clone()).or_default();
                names.iter().for_each(|n| tally.add(n));
            }
            if let Some(names) = case.entities.get(PERSON) {
                let tally = counts.people.entry(case.tool.clone()).or_default();
                names.iter().for_each(|n| tally.add(n));
            }
        }

        counts
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let cases: HashMap<String, EntityCase> = serde_json::from_str(json)?;
        Ok(Self::from_cases(cases.values()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let cases: HashMap<String, EntityCase> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CorpusError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), cases = cases.len(), "loaded named entities");
        Ok(Self::from_cases(cases.values()))
    }

    pub fn people(&self, tool: &str) -> Option<&Tally> {
        self.people.get(tool)
    }

    pub fn orgs(&self, tool: &str) -> Option<&Tally> {
        self.orgs.get(tool)
    }
}
