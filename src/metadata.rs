// Metadata Normalizer
// Flattens tool -> [case] JSON into tagged case records with court/year

use crate::citation::Citation;
use crate::error::{CorpusError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info, warn};

/// Cases decided before this year are dropped
pub const DEFAULT_MIN_YEAR: i32 = 2006;

// ============================================================================
// CORE TYPES
// ============================================================================

/// One case object as it appears under a tool in metadata.json.
///
/// Field types are not checked here: null, missing or non-text values all
/// read as `None`, and the normalizer decides what to drop.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawCase {
    #[serde(default, deserialize_with = "nullable_text")]
    pub casename: Option<String>,

    #[serde(default, deserialize_with = "nullable_text")]
    pub publication: Option<String>,

    #[serde(default, deserialize_with = "nullable_text")]
    pub link: Option<String>,

    /// Everything else the scraper stored (snippets, authors, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Strings as-is, numbers/bools as their text, anything else as absent
fn nullable_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

/// Normalized case, tagged with the tool it was found for
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CaseRecord {
    pub tool: String,
    pub casename: String,
    pub publication: String,
    pub link: String,

    // Derived from publication
    pub court: String,
    pub year: i32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What to do with a citation whose year cannot be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CitationPolicy {
    /// Abort the load with the offending citation
    #[default]
    Strict,
    /// Drop the case and log a warning
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub min_year: i32,
    pub policy: CitationPolicy,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            min_year: DEFAULT_MIN_YEAR,
            policy: CitationPolicy::Strict,
        }
    }
}

/// Counters collected while normalizing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub seen: usize,
    pub kept: usize,
    pub missing_casename: usize,
    pub before_min_year: usize,
    pub malformed_citation: usize,
}

impl NormalizeStats {
    pub fn summary(&self) -> String {
        format!(
            "{} of {} cases kept ({} without name, {} too old, {} malformed)",
            self.kept, self.seen, self.missing_casename, self.before_min_year, self.malformed_citation
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<CaseRecord>,
    pub stats: NormalizeStats,
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Flatten tool -> cases into case records.
///
/// Output keeps input order: tool-major, then case order within each tool.
/// Cases without a name are dropped before their citation is looked at;
/// cases older than `options.min_year` are dropped after it.
pub fn normalize<I>(tools: I, options: NormalizeOptions) -> Result<Normalized>
where
    I: IntoIterator<Item = (String, Vec<RawCase>)>,
{
    let mut out = Normalized::default();

    for (tool, cases) in tools {
        for case in cases {
            out.stats.seen += 1;

            let casename = match case.casename {
                Some(name) => name,
                None => {
                    debug!(tool = %tool, link = ?case.link, "dropping case without casename");
                    out.stats.missing_casename += 1;
                    continue;
                }
            };

            let publication = case.publication.unwrap_or_default();
            let citation = match Citation::parse(&publication) {
                Ok(c) => c,
                Err(source) => match options.policy {
                    CitationPolicy::Strict => {
                        return Err(CorpusError::Citation {
                            tool,
                            casename,
                            source,
                        })
                    }
                    CitationPolicy::Lenient => {
                        warn!(tool = %tool, casename = %casename, error = %source, "skipping case with malformed citation");
                        out.stats.malformed_citation += 1;
                        continue;
                    }
                },
            };

            if citation.year < options.min_year {
                out.stats.before_min_year += 1;
                continue;
            }

            out.records.push(CaseRecord {
                tool: tool.clone(),
                casename,
                publication,
                link: case.link.unwrap_or_default(),
                court: citation.court,
                year: citation.year,
                extra: case.extra,
            });
        }
    }

    out.stats.kept = out.records.len();
    Ok(out)
}

/// Parse metadata.json text into (tool, cases) pairs in document order
pub fn parse_metadata(json: &str) -> serde_json::Result<Vec<(String, Vec<RawCase>)>> {
    let map: Map<String, Value> = serde_json::from_str(json)?;
    tools_from_map(map)
}

fn tools_from_map(map: Map<String, Value>) -> serde_json::Result<Vec<(String, Vec<RawCase>)>> {
    map.into_iter()
        .map(|(tool, cases)| serde_json::from_value(cases).map(|cases| (tool, cases)))
        .collect()
}

/// Load and normalize metadata.json
pub fn load_metadata(path: &Path, options: NormalizeOptions) -> Result<Normalized> {
    let file = File::open(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json_err = |source: serde_json::Error| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    };
    let map: Map<String, Value> = serde_json::from_reader(BufReader::new(file)).map_err(json_err)?;
    let tools = tools_from_map(map).map_err(json_err)?;

    let normalized = normalize(tools, options)?;
    info!(path = %path.display(), "{}", normalized.stats.summary());
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn case(casename: Option<&str>, publication: &str, link: &str) -> RawCase {
        RawCase {
            casename: casename.map(str::to_string),
            publication: Some(publication.to_string()),
            link: Some(link.to_string()),
            extra: Map::new(),
        }
    }

    fn run(json: &str) -> Result<Normalized> {
        normalize(parse_metadata(json).unwrap(), NormalizeOptions::default())
    }

    #[test]
    fn test_null_casename_is_dropped() {
        let out = run(r#"{"ToolA": [{"casename": null, "publication": "X, 2020"}]}"#).unwrap();
        assert!(out.records.is_empty());
        assert_eq!(out.stats.missing_casename, 1);
    }

    #[test]
    fn test_single_valid_case() {
        let out = run(
            r#"{"ToolA": [{"casename": "Doe v. Roe", "publication": "Court Y, 2015", "link": "abc"}]}"#,
        )
        .unwrap();

        assert_eq!(out.records.len(), 1);
        let rec = &out.records[0];
        assert_eq!(rec.tool, "ToolA");
        assert_eq!(rec.casename, "Doe v. Roe");
        assert_eq!(rec.court, "Court Y");
        assert_eq!(rec.year, 2015);
        assert_eq!(rec.link, "abc");
    }

    #[test]
    fn test_old_case_is_dropped_after_parsing() {
        let tools = vec![(
            "EnCase".to_string(),
            vec![
                case(Some("Old v. Case"), "1st Cir., 1999 - Google Scholar", "old"),
                case(Some("New v. Case"), "1st Cir., 2006 - Google Scholar", "new"),
            ],
        )];

        let out = normalize(tools, NormalizeOptions::default()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].link, "new");
        assert_eq!(out.records[0].court, "1st Cir.");
        assert_eq!(out.stats.before_min_year, 1);
        assert!(out.records.iter().all(|r| r.year >= DEFAULT_MIN_YEAR));
    }

    #[test]
    fn test_order_is_tool_major() {
        let out = run(
            r#"{
                "Zeta": [
                    {"casename": "Z1", "publication": "A, 2010", "link": "z1"},
                    {"casename": "Z2", "publication": "A, 2011", "link": "z2"}
                ],
                "Alpha": [
                    {"casename": "A1", "publication": "B, 2012", "link": "a1"}
                ]
            }"#,
        )
        .unwrap();

        let links: Vec<&str> = out.records.iter().map(|r| r.link.as_str()).collect();
        assert_eq!(links, vec!["z1", "z2", "a1"]);
    }

    #[test]
    fn test_strict_policy_reports_citation() {
        let err = run(r#"{"FTK": [{"casename": "Bad v. Data", "publication": "Foo, bar", "link": "x"}]}"#)
            .unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("FTK"));
        assert!(msg.contains("Bad v. Data"));
        assert!(msg.contains("Foo, bar"));
        assert!(matches!(err, CorpusError::Citation { .. }));
    }

    #[test]
    fn test_lenient_policy_skips_malformed() {
        let tools = vec![(
            "FTK".to_string(),
            vec![
                case(Some("Bad v. Data"), "Foo, bar", "bad"),
                case(Some("Good v. Data"), "Court Y, 2019", "good"),
            ],
        )];
        let options = NormalizeOptions {
            policy: CitationPolicy::Lenient,
            ..Default::default()
        };

        let out = normalize(tools, options).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].link, "good");
        assert_eq!(out.stats.malformed_citation, 1);
        assert_eq!(out.stats.seen, 2);
        assert_eq!(out.stats.kept, 1);
    }

    #[test]
    fn test_null_casename_never_parses_citation() {
        // Would fail under Strict if the citation were inspected
        let out = run(r#"{"ToolA": [{"casename": null, "publication": "garbage"}]}"#).unwrap();
        assert!(out.records.is_empty());
    }

    #[test]
    fn test_nameless_case_with_null_link_is_dropped_quietly() {
        let out = run(
            r#"{"ToolA": [
                {"casename": null, "publication": "X, 2020", "link": null},
                {"casename": 42, "publication": "D, 2016", "link": 7},
                {"casename": "Doe", "publication": "C, 2015", "link": "abc"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].casename, "42");
        assert_eq!(out.records[0].link, "7");
        assert_eq!(out.stats.missing_casename, 1);
        assert_eq!(out.records[1].casename, "Doe");
        assert_eq!(out.records[1].link, "abc");
    }

    #[test]
    fn test_kept_case_with_null_link_has_empty_link() {
        let out = run(r#"{"ToolA": [{"casename": "Doe", "publication": "C, 2015", "link": null}]}"#).unwrap();
        assert_eq!(out.records[0].link, "");
    }

    #[test]
    fn test_missing_publication_is_malformed() {
        let err = run(r#"{"ToolA": [{"casename": "No Pub", "link": "x"}]}"#).unwrap_err();
        assert!(matches!(err, CorpusError::Citation { .. }));
    }

    #[test]
    fn test_extra_fields_pass_through() {
        let out = run(
            r#"{"ToolA": [{"casename": "Doe", "publication": "C, 2020", "link": "l", "snippet": "found EnCase"}]}"#,
        )
        .unwrap();
        assert_eq!(out.records[0].extra.get("snippet"), Some(&Value::from("found EnCase")));
    }

    #[test]
    fn test_custom_min_year() {
        let tools = vec![("X".to_string(), vec![case(Some("A"), "C, 2010", "a")])];
        let options = NormalizeOptions {
            min_year: 2011,
            ..Default::default()
        };
        assert!(normalize(tools, options).unwrap().records.is_empty());
    }

    #[test]
    fn test_load_metadata_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"Cellebrite": [{{"casename": "US v. Smith", "publication": "D. Md., 2017 - Google Scholar", "link": "scholar_case?case=1"}}]}}"#
        )
        .unwrap();

        let out = load_metadata(file.path(), NormalizeOptions::default()).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].court, "D. Md.");
        assert_eq!(out.records[0].year, 2017);
    }

    #[test]
    fn test_load_metadata_missing_file() {
        let err = load_metadata(Path::new("/nonexistent/metadata.json"), NormalizeOptions::default())
            .unwrap_err();
        assert!(matches!(err, CorpusError::Io { .. }));
    }
}
