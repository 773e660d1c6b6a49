// Corpus: everything the viewer reads, loaded once and never mutated

use crate::config::Config;
use crate::entities::EntityCounts;
use crate::error::Result;
use crate::metadata::{load_metadata, CaseRecord, NormalizeStats};
use crate::mentions::MentionIndex;
use std::sync::OnceLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub cases: Vec<CaseRecord>,
    pub stats: NormalizeStats,
    pub mentions: MentionIndex,
    pub entities: Option<EntityCounts>,
}

impl Corpus {
    /// Read metadata and mentions (both mandatory) and entities (optional)
    pub fn load(config: &Config) -> Result<Self> {
        let normalized = load_metadata(&config.metadata_path, config.normalize)?;
        let mentions = MentionIndex::load(&config.mentions_path)?;

        let entities = if config.entities_required || config.entities_path.exists() {
            Some(EntityCounts::load(&config.entities_path)?)
        } else {
            debug!(path = %config.entities_path.display(), "no entities file, skipping");
            None
        };

        info!(
            cases = normalized.records.len(),
            mentions = mentions.len(),
            entities = entities.is_some(),
            "corpus loaded"
        );

        Ok(Self {
            cases: normalized.records,
            stats: normalized.stats,
            mentions,
            entities,
        })
    }

    /// Mentions for a case link
    pub fn mentions_for(&self, link: &str) -> Option<&[String]> {
        self.mentions.get(link)
    }
}

static SHARED: OnceLock<Corpus> = OnceLock::new();

/// Process-wide corpus, loaded on first call.
///
/// Later calls return the first loaded corpus regardless of `config`; the
/// files are static for the life of the process.
pub fn shared(config: &Config) -> Result<&'static Corpus> {
    if let Some(corpus) = SHARED.get() {
        return Ok(corpus);
    }

    let corpus = Corpus::load(config)?;
    // A racing initializer may have won; either value is equivalent
    Ok(SHARED.get_or_init(|| corpus))
}
