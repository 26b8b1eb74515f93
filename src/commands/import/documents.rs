use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::references::IdentifierExtractor;
use crate::model::{FieldMap, MediaRecord};

#[derive(Debug, Deserialize)]
struct DocumentEntry {
    sources: Option<Vec<String>>,
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    episodes: Option<i64>,
    status: Option<String>,
    tags: Option<Vec<String>>,
    picture: Option<String>,
    #[serde(rename = "animeSeason")]
    anime_season: Option<AnimeSeason>,
}

#[derive(Debug, Deserialize)]
struct AnimeSeason {
    season: Option<String>,
    year: Option<i32>,
}

/// Reads a JSON catalog document into canonical records, one per entry.
///
/// Entries without a recognizable catalog link are still emitted, with no `id`.
pub(crate) fn ingest_documents(
    path: &Path,
    extractor: &IdentifierExtractor,
) -> Result<Vec<MediaRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let document: Value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let Some(entries) = document_entries(document) else {
        warn!(
            path = %path.display(),
            "document is neither an entry array nor an object with a data array"
        );
        return Ok(Vec::new());
    };

    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let entry: DocumentEntry = serde_json::from_value(entry)
            .with_context(|| format!("failed to parse entry {} of {}", index, path.display()))?;
        let fields = project_entry(entry, extractor)
            .with_context(|| format!("failed to project entry {} of {}", index, path.display()))?;
        records.push(MediaRecord::from_fields(fields));
    }

    Ok(records)
}

fn document_entries(document: Value) -> Option<Vec<Value>> {
    match document {
        Value::Array(entries) => Some(entries),
        Value::Object(mut object) => match object.remove("data") {
            Some(Value::Array(entries)) => Some(entries),
            _ => None,
        },
        _ => None,
    }
}

fn project_entry(entry: DocumentEntry, extractor: &IdentifierExtractor) -> Result<FieldMap> {
    let mut fields = FieldMap::new();

    if let Some(identifier) = entry
        .sources
        .as_deref()
        .and_then(|sources| extractor.extract(sources))
    {
        fields.insert("id", identifier.to_string());
    }
    if let Some(title) = entry.title {
        fields.insert("name", title);
    }
    if let Some(kind) = entry.kind {
        fields.insert("type", kind);
    }
    if let Some(episodes) = entry.episodes {
        fields.insert("episodes", episodes.to_string());
    }
    if let Some(status) = entry.status {
        fields.insert("status", status);
    }
    if let Some(tags) = entry.tags.filter(|tags| !tags.is_empty()) {
        fields.insert("genres", tags.join(", "));
    }
    if let Some(picture) = entry.picture {
        fields.insert("poster_url", picture);
    }

    // A zero year or an empty season label counts as missing.
    let season_year = entry.anime_season.and_then(|anime_season| match anime_season.year {
        Some(year) if year != 0 => Some((anime_season.season, year)),
        _ => None,
    });
    if let Some((season, year)) = season_year {
        let released_on = season_start_date(year)?;
        fields.insert("aired_on", released_on.clone());
        fields.insert("released_on", released_on);
        let premiered = match season.filter(|season| !season.is_empty()) {
            Some(season) => format!("{season} {year}"),
            None => year.to_string(),
        };
        fields.insert("premiered", premiered);
    }

    Ok(fields)
}

/// Documents only carry a season year, so the date is pinned to January 1st.
fn season_start_date(year: i32) -> Result<String> {
    let date = NaiveDate::from_ymd_opt(year, 1, 1)
        .with_context(|| format!("season year {year} is outside the supported calendar"))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;

    fn write_json(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("fixture should be written");
        path
    }

    fn extractor() -> IdentifierExtractor {
        IdentifierExtractor::new().expect("reference patterns should compile")
    }

    #[test]
    fn wrapped_document_projects_season_and_identifier() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(
            &dir,
            "offline.json",
            r#"{"data":[{"title":"X","sources":["https://myanimelist.net/anime/42"],"animeSeason":{"season":"SPRING","year":2001}}]}"#,
        );

        let records = ingest_documents(&path, &extractor()).expect("document should ingest");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id(), Some("42"));
        assert_eq!(record.get("name"), Some("X"));
        assert_eq!(record.get("aired_on"), Some("2001-01-01"));
        assert_eq!(record.get("released_on"), Some("2001-01-01"));
        assert_eq!(record.get("premiered"), Some("SPRING 2001"));
        assert_eq!(record.get("genres"), None);
    }

    #[test]
    fn bare_array_projects_direct_fields() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(
            &dir,
            "list.json",
            r#"[{
                "title": "Cowboy Bebop",
                "type": "TV",
                "episodes": 26,
                "status": "FINISHED",
                "tags": ["action", "space", "jazz"],
                "picture": "https://cdn.example/bebop.jpg",
                "sources": ["https://anidb.net/anime/23", "https://kitsu.io/anime/1"],
                "synonyms": ["Kaubōi Bibappu"]
            }]"#,
        );

        let records = ingest_documents(&path, &extractor()).expect("document should ingest");
        let record = &records[0];
        assert_eq!(record.id(), Some("1"));
        assert_eq!(record.get("type"), Some("TV"));
        assert_eq!(record.get("episodes"), Some("26"));
        assert_eq!(record.get("status"), Some("FINISHED"));
        assert_eq!(record.get("genres"), Some("action, space, jazz"));
        assert_eq!(record.get("poster_url"), Some("https://cdn.example/bebop.jpg"));
        assert_eq!(record.get("premiered"), None);
        assert_eq!(record.get("aired_on"), None);
    }

    #[test]
    fn year_without_season_is_premiered_as_year() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(
            &dir,
            "year.json",
            r#"[{"title":"Y","animeSeason":{"year":1998}}]"#,
        );

        let records = ingest_documents(&path, &extractor()).expect("document should ingest");
        assert_eq!(records[0].get("premiered"), Some("1998"));
        assert_eq!(records[0].get("released_on"), Some("1998-01-01"));
    }

    #[test]
    fn empty_season_label_is_premiered_as_year() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(
            &dir,
            "blank_season.json",
            r#"[{"title":"B","animeSeason":{"season":"","year":2001}}]"#,
        );

        let records = ingest_documents(&path, &extractor()).expect("document should ingest");
        assert_eq!(records[0].get("premiered"), Some("2001"));
        assert_eq!(records[0].get("aired_on"), Some("2001-01-01"));
    }

    #[test]
    fn zero_year_sets_no_dates() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(
            &dir,
            "zero_year.json",
            r#"[{"title":"Z","animeSeason":{"season":"SPRING","year":0}}]"#,
        );

        let records = ingest_documents(&path, &extractor()).expect("document should ingest");
        assert_eq!(records[0].get("premiered"), None);
        assert_eq!(records[0].get("aired_on"), None);
        assert_eq!(records[0].get("released_on"), None);
    }

    #[test]
    fn season_without_year_sets_no_dates() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(
            &dir,
            "season.json",
            r#"[{"title":"Z","animeSeason":{"season":"UNDEFINED"}}]"#,
        );

        let records = ingest_documents(&path, &extractor()).expect("document should ingest");
        assert_eq!(records[0].get("premiered"), None);
        assert_eq!(records[0].get("aired_on"), None);
    }

    #[test]
    fn unmatched_sources_still_emit_a_record_without_id() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(
            &dir,
            "orphan.json",
            r#"{"data":[{"title":"Orphan","sources":["https://anidb.net/anime/1"]},{"title":"Nothing"}]}"#,
        );

        let records = ingest_documents(&path, &extractor()).expect("document should ingest");
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|record| record.id().is_none()));
        assert_eq!(records[1].get("name"), Some("Nothing"));
    }

    #[test]
    fn unexpected_shapes_yield_no_records() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        for (name, contents) in [
            ("object.json", r#"{"items":[{"title":"A"}]}"#),
            ("scalar.json", "42"),
            ("data_object.json", r#"{"data":{"title":"A"}}"#),
        ] {
            let path = write_json(&dir, name, contents);
            let records = ingest_documents(&path, &extractor()).expect("shape should be tolerated");
            assert!(records.is_empty(), "{name} should yield nothing");
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(&dir, "broken.json", r#"{"data":[{"title":"A"}"#);

        let err = ingest_documents(&path, &extractor()).expect_err("should fail");
        assert!(err.to_string().contains("failed to parse"));
    }

    #[test]
    fn non_object_entry_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = write_json(&dir, "strings.json", r#"["Cowboy Bebop"]"#);

        assert!(ingest_documents(&path, &extractor()).is_err());
    }
}
