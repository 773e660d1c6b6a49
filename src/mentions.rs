// Tool mentions: text excerpts keyed by case link

use crate::error::{CorpusError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Base URL the scraped case links are relative to
pub const SCHOLAR_BASE_URL: &str = "https://scholar.google.com/";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MentionEntry {
    /// `None` when the case text failed to download
    #[serde(default)]
    pub mentions: Option<Vec<String>>,
}

/// link -> mentions, as stored in mentions.json
#[derive(Debug, Clone, Default)]
pub struct MentionIndex {
    entries: HashMap<String, MentionEntry>,
}

impl MentionIndex {
    pub fn from_entries(entries: HashMap<String, MentionEntry>) -> Self {
        Self { entries }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(Self::from_entries(serde_json::from_str(json)?))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let entries: HashMap<String, MentionEntry> = serde_json::from_reader(BufReader::new(file))
            .map_err(|source| CorpusError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), cases = entries.len(), "loaded mentions");
        Ok(Self::from_entries(entries))
    }

    /// Mentions for a case link, `None` when the case text was never fetched
    pub fn get(&self, link: &str) -> Option<&[String]> {
        self.entries.get(link).and_then(|e| e.mentions.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Absolute URL of a scraped case
pub fn case_url(link: &str) -> String {
    format!("{}{}", SCHOLAR_BASE_URL, link)
}

/// Piece of a mention, either plain text or an occurrence of the tool name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    Plain(&'a str),
    Tool(&'a str),
}

/// Split a snippet around every exact occurrence of `tool`
pub fn highlight<'a>(snippet: &'a str, tool: &str) -> Vec<Fragment<'a>> {
    if tool.is_empty() {
        return vec![Fragment::Plain(snippet)];
    }

    let mut fragments = Vec::new();
    let mut last = 0;

    for (start, matched) in snippet.match_indices(tool) {
        if start > last {
            fragments.push(Fragment::Plain(&snippet[last..start]));
        }
        fragments.push(Fragment::Tool(matched));
        last = start + matched.len();
    }

    if last < snippet.len() || fragments.is_empty() {
        fragments.push(Fragment::Plain(&snippet[last..]));
    }

    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_and_unknown_link() {
        let index = MentionIndex::from_json(
            r#"{"scholar_case?case=1": {"mentions": ["used EnCase to image", "EnCase report"]}}"#,
        )
        .unwrap();

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("scholar_case?case=1").unwrap().len(), 2);
        assert!(index.get("scholar_case?case=2").is_none());
    }

    #[test]
    fn test_entry_without_mentions_field() {
        let index = MentionIndex::from_json(r#"{"a": {}}"#).unwrap();
        assert!(index.get("a").is_none());
    }

    #[test]
    fn test_null_mentions_do_not_spoil_the_file() {
        let index = MentionIndex::from_json(r#"{"a": {"mentions": null}, "b": {"mentions": ["FTK"]}}"#)
            .unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.get("a").is_none());
        assert_eq!(index.get("b").unwrap(), ["FTK"]);
    }

    #[test]
    fn test_case_url() {
        assert_eq!(
            case_url("scholar_case?case=42"),
            "https://scholar.google.com/scholar_case?case=42"
        );
    }

    #[test]
    fn test_highlight_every_occurrence() {
        let frags = highlight("FTK and FTK Imager", "FTK");
        assert_eq!(
            frags,
            vec![
                Fragment::Tool("FTK"),
                Fragment::Plain(" and "),
                Fragment::Tool("FTK"),
                Fragment::Plain(" Imager"),
            ]
        );
    }

    #[test]
    fn test_highlight_without_match() {
        assert_eq!(highlight("nothing here", "XRY"), vec![Fragment::Plain("nothing here")]);
        assert_eq!(highlight("", "XRY"), vec![Fragment::Plain("")]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = MentionIndex::load(Path::new("/nonexistent/mentions.json")).unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
