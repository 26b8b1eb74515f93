use anyhow::{Context, Result};
use regex::Regex;

/// Catalog sites whose anime URLs embed the canonical identifier, in precedence order.
pub(crate) const REFERENCE_PATTERNS: &[(&str, &str)] = &[
    ("myanimelist", r"myanimelist\.net/anime/(\d+)"),
    ("anilist", r"anilist\.co/anime/(\d+)"),
    ("kitsu", r"kitsu\.io/anime/(\d+)"),
];

pub(crate) struct IdentifierExtractor {
    patterns: Vec<Regex>,
}

impl IdentifierExtractor {
    pub(crate) fn new() -> Result<Self> {
        let patterns = REFERENCE_PATTERNS
            .iter()
            .map(|(catalog, pattern)| {
                Regex::new(pattern)
                    .with_context(|| format!("failed to compile {catalog} reference regex"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// Identifier embedded in the first reference that matches any known catalog.
    ///
    /// References are scanned in order and every pattern is tried against each
    /// one before moving on, so an earlier reference wins over a later one even
    /// when the later one matches a higher-precedence catalog.
    pub(crate) fn extract<S: AsRef<str>>(&self, references: &[S]) -> Option<i64> {
        for reference in references {
            let reference = reference.as_ref();
            for regex in &self.patterns {
                let identifier = regex
                    .captures(reference)
                    .and_then(|captures| captures.get(1))
                    .and_then(|digits| digits.as_str().parse::<i64>().ok());
                if identifier.is_some() {
                    return identifier;
                }
            }
        }
        None
    }
}
