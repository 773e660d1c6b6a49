// Citation Parser
// Splits a scraped bibliographic citation into (court, year)

use crate::error::CitationError;

/// Literal suffix the scraper leaves on every citation
pub const MARKER: &str = "- Google Scholar";

/// Parsed court and year of a citation string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub court: String,
    pub year: i32,
}

impl Citation {
    /// Parse `"<court fragments>, <year>"` with the trailing marker removed.
    ///
    /// The last comma segment is the year. Everything before it is the court,
    /// rejoined with commas exactly as written.
    ///
    /// # Examples:
    /// ```
    /// use caselaw_tools::Citation;
    ///
    /// let c = Citation::parse("1st Cir., 1999 - Google Scholar").unwrap();
    /// assert_eq!(c.court, "1st Cir.");
    /// assert_eq!(c.year, 1999);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CitationError> {
        let stripped = strip_marker(raw);
        let (court, year_segment) = match stripped.rsplit_once(',') {
            Some((court, year)) => (court, year),
            None => ("", stripped.as_str()),
        };

        let year_segment = year_segment.trim();
        if year_segment.is_empty() {
            return Err(CitationError::MissingYear {
                citation: raw.to_string(),
            });
        }

        let year = year_segment
            .parse::<i32>()
            .map_err(|_| CitationError::InvalidYear {
                citation: raw.to_string(),
                segment: year_segment.to_string(),
            })?;

        Ok(Citation {
            court: court.to_string(),
            year,
        })
    }
}

/// Remove the scraper marker wherever it appears
pub fn strip_marker(raw: &str) -> String {
    raw.replace(MARKER, "")
}
