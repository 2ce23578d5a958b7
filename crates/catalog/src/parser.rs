//! Parser for movie table files.
//!
//! Three layouts are accepted:
//! - `.csv`: a header row naming the columns, one movie per record
//! - `.jsonl` / `.ndjson`: one JSON object per line
//! - anything else: one JSON array of movie rows
//!
//! Rows are cleaned the same way regardless of layout:
//! - missing or unparseable numbers become 0
//! - `vote_average` is accepted in place of `rating`
//! - `genres` may be a list, a JSON-encoded list, or a `|`/`,` separated string;
//!   list entries may be plain names or `{"name": ...}` objects
//! - `year` falls back to the leading `YYYY` of `release_date`
//! - rows without a usable `id` get their 1-based row number
//!
//! Blank titles and overviews are passed through; `Catalog::build` drops them.

use crate::error::{CatalogError, Result};
use crate::types::{MovieId, MovieRecord};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// A movie row as it appears on disk, before cleaning
#[derive(Debug, Deserialize)]
struct RawMovieRow {
    #[serde(default)]
    id: Option<NumberField>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    genres: Option<GenresField>,
    #[serde(default, alias = "vote_average")]
    rating: Option<NumberField>,
    #[serde(default)]
    vote_count: Option<NumberField>,
    #[serde(default)]
    popularity: Option<NumberField>,
    #[serde(default)]
    year: Option<NumberField>,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GenresField {
    List(Vec<GenreTag>),
    Text(String),
}

/// TMDB exports genres as `{"id": 16, "name": "Animation"}` objects
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum GenreTag {
    Name(String),
    Object { name: String },
}

impl GenreTag {
    fn into_name(self) -> String {
        match self {
            GenreTag::Name(name) | GenreTag::Object { name } => name,
        }
    }
}

/// Numbers sometimes arrive quoted, or as floats (`1999.0`), when tables are
/// exported from spreadsheets or dataframes
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberField {
    Number(f64),
    Text(String),
}

impl NumberField {
    fn parsed(&self) -> Option<f64> {
        let value = match self {
            NumberField::Number(n) => *n,
            NumberField::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn value(&self) -> f32 {
        self.parsed().map_or(0.0, |v| v as f32)
    }

    /// A whole number in `[0, max]`, or `None`
    fn whole(&self, max: f64) -> Option<f64> {
        self.parsed()
            .filter(|v| v.fract() == 0.0 && (0.0..=max).contains(v))
    }

    fn as_id(&self) -> Option<MovieId> {
        self.whole(MovieId::MAX as f64).map(|v| v as MovieId)
    }

    fn as_year(&self) -> Option<u16> {
        self.whole(u16::MAX as f64)
            .filter(|&v| v > 0.0)
            .map(|v| v as u16)
    }
}

/// Parse a movie table file into records.
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    let file_name = path.display().to_string();
    if !path.exists() {
        return Err(CatalogError::FileNotFound { path: file_name });
    }
    let content = fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let records = match extension.as_deref() {
        Some("csv") => parse_csv(&content, &file_name)?,
        Some("jsonl") | Some("ndjson") => parse_json_lines(&content, &file_name)?,
        _ => parse_json_array(&content, &file_name)?,
    };

    debug!("Parsed {} movie rows from {}", records.len(), file_name);
    Ok(records)
}

/// Parse a JSON array of movie rows.
///
/// The array itself must be valid JSON; an element that is not a movie row
/// (a bare number, a string title) is skipped with a warning.
pub fn parse_json_array(content: &str, file_name: &str) -> Result<Vec<MovieRecord>> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(content).map_err(|source| CatalogError::JsonError {
            file: file_name.to_string(),
            source,
        })?;

    let mut records = Vec::with_capacity(rows.len());
    for (idx, value) in rows.into_iter().enumerate() {
        let row_no = idx + 1;
        match RawMovieRow::deserialize(value) {
            Ok(row) => records.push(clean_row(row, row_no)),
            Err(e) => warn!("Skipping row {} of {}: {}", row_no, file_name, e),
        }
    }
    Ok(records)
}

/// Parse a CSV movie table with a header row; unknown columns are ignored
pub fn parse_csv(content: &str, file_name: &str) -> Result<Vec<MovieRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for (idx, row) in reader.deserialize::<RawMovieRow>().enumerate() {
        let row = row.map_err(|e| CatalogError::ParseError {
            file: file_name.to_string(),
            // header is line 1
            line: e.position().map_or(idx + 2, |pos| pos.line() as usize),
            reason: e.to_string(),
        })?;
        records.push(clean_row(row, idx + 1));
    }
    Ok(records)
}

/// Parse newline-delimited JSON movie rows; blank lines are skipped
pub fn parse_json_lines(content: &str, file_name: &str) -> Result<Vec<MovieRecord>> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let row: RawMovieRow =
            serde_json::from_str(line_trimmed).map_err(|e| CatalogError::ParseError {
                file: file_name.to_string(),
                line: line_no,
                reason: e.to_string(),
            })?;
        records.push(clean_row(row, line_no));
    }
    Ok(records)
}

fn clean_row(row: RawMovieRow, row_no: usize) -> MovieRecord {
    let id = match row.id.as_ref().map(NumberField::as_id) {
        Some(Some(id)) => id,
        Some(None) => {
            warn!("Row {} has an unusable id {:?}; using the row number", row_no, row.id);
            row_no as MovieId
        }
        None => row_no as MovieId,
    };
    let title = row.title.unwrap_or_default();
    let genres = match row.genres {
        Some(field) => parse_genres(field, id),
        None => BTreeSet::new(),
    };
    let year = row
        .year
        .as_ref()
        .and_then(NumberField::as_year)
        .or_else(|| row.release_date.as_deref().and_then(extract_year_from_date));

    MovieRecord {
        id,
        title: title.trim().to_string(),
        year,
        genres,
        overview: row.overview.unwrap_or_default(),
        rating: row.rating.as_ref().map_or(0.0, NumberField::value),
        vote_count: row.vote_count.as_ref().map_or(0.0, NumberField::value),
        popularity: row.popularity.as_ref().map_or(0.0, NumberField::value),
    }
}

/// Turn any accepted genres representation into a tag set
///
/// Example: `"['Action', 'Sci-Fi']"` -> {Action, Sci-Fi}
///          `"[{'id': 28, 'name': 'Action'}]"` -> {Action}
///          `"Action|Sci-Fi"` -> {Action, Sci-Fi}
fn parse_genres(field: GenresField, id: MovieId) -> BTreeSet<String> {
    let tags: Vec<String> = match field {
        GenresField::List(list) => list.into_iter().map(GenreTag::into_name).collect(),
        GenresField::Text(text) => {
            let text = text.trim();
            if text.starts_with('[') {
                // Python-style reprs use single quotes
                match serde_json::from_str::<Vec<GenreTag>>(&text.replace('\'', "\"")) {
                    Ok(list) => list.into_iter().map(GenreTag::into_name).collect(),
                    Err(e) => {
                        warn!("Ignoring unreadable genres for movie {}: {}", id, e);
                        Vec::new()
                    }
                }
            } else {
                text.split(['|', ',']).map(str::to_string).collect()
            }
        }
    };

    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Extract year from an ISO-like date
///
/// Example: "1999-03-30" -> Some(1999)
///          "unknown" -> None
fn extract_year_from_date(date: &str) -> Option<u16> {
    let year_str = date.trim().get(..4)?;
    year_str.parse::<u16>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year_from_date("1999-03-30"), Some(1999));
        assert_eq!(extract_year_from_date("1999"), Some(1999));
        assert_eq!(extract_year_from_date("n/a"), None);
        assert_eq!(extract_year_from_date(""), None);
    }

    #[test]
    fn test_parse_genres_variants() {
        let list = GenresField::List(vec![
            GenreTag::Name("Action".into()),
            GenreTag::Name(" Drama ".into()),
            GenreTag::Name("".into()),
        ]);
        assert_eq!(parse_genres(list, 1).len(), 2);

        let json = GenresField::Text("['Action', 'Science Fiction']".into());
        let parsed = parse_genres(json, 1);
        assert!(parsed.contains("Science Fiction"));

        let objects = GenresField::Text("[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]".into());
        assert_eq!(
            parse_genres(objects, 1).into_iter().collect::<Vec<_>>(),
            vec!["Animation", "Comedy"]
        );

        let piped = GenresField::Text("Comedy|Family".into());
        assert_eq!(
            parse_genres(piped, 1).into_iter().collect::<Vec<_>>(),
            vec!["Comedy", "Family"]
        );

        let broken = GenresField::Text("[not json".into());
        assert!(parse_genres(broken, 1).is_empty());
    }

    #[test]
    fn test_parse_json_array_cleans_rows() {
        let content = r#"[
            {"id": 7, "title": " The Matrix ", "overview": "hacker discovers simulated reality",
             "genres": ["Action", "Science Fiction"], "vote_average": 8.7,
             "vote_count": "2000", "popularity": 50.5, "release_date": "1999-03-30"},
            {"title": "No Numbers", "overview": "quiet film", "rating": "oops"}
        ]"#;

        let records = parse_json_array(content, "inline.json").unwrap();
        assert_eq!(records.len(), 2);

        let matrix = &records[0];
        assert_eq!(matrix.id, 7);
        assert_eq!(matrix.title, "The Matrix");
        assert_eq!(matrix.year, Some(1999));
        assert!((matrix.rating - 8.7).abs() < 1e-6);
        assert_eq!(matrix.vote_count, 2000.0);
        assert_eq!(matrix.genres.len(), 2);

        let plain = &records[1];
        assert_eq!(plain.id, 2);
        assert_eq!(plain.rating, 0.0);
        assert_eq!(plain.popularity, 0.0);
        assert!(plain.genres.is_empty());
    }

    #[test]
    fn test_parse_json_array_coerces_float_and_text_numbers() {
        let content = r#"[
            {"id": 1, "title": "A", "overview": "x y", "year": 1999.0},
            {"id": "42", "title": "B", "overview": "x y", "year": "2001"},
            {"id": "tt0133093", "title": "C", "overview": "x y", "year": 19.5,
             "release_date": "2003-05-15"},
            "not a row",
            {"id": 4.5, "title": "D", "overview": "x y"}
        ]"#;

        let records = parse_json_array(content, "m.json").unwrap();
        let ids: Vec<MovieId> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 42, 3, 5]);
        assert_eq!(records[0].year, Some(1999));
        assert_eq!(records[1].year, Some(2001));
        assert_eq!(records[2].year, Some(2003));
        assert_eq!(records[3].year, None);
    }

    #[test]
    fn test_parse_csv_cleans_rows() {
        let content = "\
id,title,overview,genres,vote_average,vote_count,popularity,release_date,budget
862,Toy Story,\"Led by Woody, toys come alive.\",\"[{'id': 16, 'name': 'Animation'}, {'id': 35, 'name': 'Comedy'}]\",7.7,5415.0,21.9,1995-10-30,30000000
,Heat,\"A thief, a cop.\",Action|Crime,7.7,,17.9,1995-12-15,60000000
";
        let records = parse_csv(content, "movies.csv").unwrap();
        assert_eq!(records.len(), 2);

        let toy_story = &records[0];
        assert_eq!(toy_story.id, 862);
        assert_eq!(toy_story.overview, "Led by Woody, toys come alive.");
        assert_eq!(toy_story.year, Some(1995));
        assert!((toy_story.rating - 7.7).abs() < 1e-6);
        assert_eq!(toy_story.vote_count, 5415.0);
        assert_eq!(
            toy_story.genres.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["Animation", "Comedy"]
        );

        let heat = &records[1];
        assert_eq!(heat.id, 2);
        assert_eq!(heat.vote_count, 0.0);
        assert!(heat.genres.contains("Crime"));
    }

    #[test]
    fn test_parse_movies_reads_csv_file() {
        let path = std::env::temp_dir().join(format!("movie-recs-parser-{}.csv", std::process::id()));
        fs::write(&path, "title,overview\nAlien,crew meets deadly creature\n").unwrap();

        let records = parse_movies(&path);
        fs::remove_file(&path).unwrap();

        let records = records.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Alien");
        assert_eq!(records[0].id, 1);
    }

    #[test]
    fn test_parse_json_lines_reports_line() {
        let content = "{\"title\": \"A\", \"overview\": \"x y\"}\n\n{not json}\n";
        let err = parse_json_lines(content, "movies.jsonl").unwrap_err();
        assert!(matches!(err, CatalogError::ParseError { line: 3, .. }));
    }

    #[test]
    fn test_parse_json_lines_ok() {
        let content = "{\"id\": 3, \"title\": \"A\", \"overview\": \"x y\"}\n{\"title\": \"B\"}\n";
        let records = parse_json_lines(content, "movies.jsonl").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 3);
        assert_eq!(records[1].id, 2);
        assert!(records[1].overview.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_movies(Path::new("does/not/exist.json")).unwrap_err();
        assert!(matches!(err, CatalogError::FileNotFound { .. }));
    }
}
