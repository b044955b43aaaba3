//! Franchise CSV loader
//!
//! One file per franchise, `<name>_movies.csv`, as exported by the metadata
//! fetcher. Required columns: title, release_date, production_budget,
//! box_office. Optional: id, poster_url, backdrop_url, runtime, tagline,
//! trailer. Extra columns are ignored.
//!
//! Movie ids are unique within a franchise. The `id` column wins, otherwise
//! the title slug. A repeated id (remakes share titles) gets the release year
//! appended, or `-2`, `-3`, ... when that is taken too; comment exports key
//! remakes by the same suffixed id. A repeated explicit id is also reported.
//!
//! Every row is validated here; malformed fields become `None` plus an issue
//! and never reach the normalizer as garbage.

use crate::domain::issue::{IssueRecord, Malformed};
use crate::domain::movie::{FranchiseSeries, MovieExtras, MovieRecord};
use crate::domain::types::{FranchiseId, MovieId};
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use csv::{ReaderBuilder, Trim};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// File name suffix of franchise movie tables
pub const MOVIES_SUFFIX: &str = "_movies.csv";

const DATE_FORMATS: [&str; 3] = ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d"];

#[derive(Debug, Deserialize)]
struct MovieRow {
    #[serde(default)]
    id: Option<String>,
    title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    production_budget: Option<String>,
    #[serde(default)]
    box_office: Option<String>,
    #[serde(default)]
    poster_url: Option<String>,
    #[serde(default)]
    backdrop_url: Option<String>,
    #[serde(default)]
    runtime: Option<String>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    trailer: Option<String>,
}

/// Franchise id and display name from a file stem: `star_wars` -> "Star Wars"
pub fn franchise_from_stem(stem: &str) -> (FranchiseId, String) {
    let name = stem
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    (FranchiseId::new(stem), name)
}

/// Parse a currency amount such as "$1,234,000" or "250000000.0"
pub fn parse_money(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',' | ' ' | '_')).collect();
    let value = cleaned.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS.iter().find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// First free id among `base`, `base-<year>`, `base-2`, `base-3`, ...
fn unique_id(base: MovieId, year: Option<i32>, seen: &FxHashSet<MovieId>) -> MovieId {
    if !seen.contains(&base) {
        return base;
    }
    let with_year = year.map(|y| MovieId::new(format!("{}-{}", base, y)));
    with_year
        .into_iter()
        .chain((2usize..).map(|n| MovieId::new(format!("{}-{}", base, n))))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or(base)
}

fn money_field(
    raw: Option<String>,
    field: &'static str,
    movie: &MovieId,
    issues: &mut Vec<IssueRecord>,
) -> Option<f64> {
    let raw = non_empty(raw)?;
    let parsed = parse_money(&raw);
    if parsed.is_none() {
        debug!(movie = %movie, field = field, raw = %raw, "non_numeric_field");
        issues.push(IssueRecord::for_movie(movie.clone(), Malformed::NonNumeric { field, raw }));
    }
    parsed
}

/// Read a franchise table from any reader
pub fn read_franchise<R: Read>(
    reader: R,
    franchise: FranchiseId,
    name: &str,
) -> (FranchiseSeries, Vec<IssueRecord>) {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).flexible(true).from_reader(reader);
    let mut movies = Vec::new();
    let mut issues = Vec::new();
    let mut seen: FxHashSet<MovieId> = FxHashSet::default();

    for (line, result) in csv_reader.deserialize::<MovieRow>().enumerate() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(franchise = %franchise, line = line + 2, error = %e, "movie_row_skipped");
                issues.push(IssueRecord::general(Malformed::Row {
                    detail: format!("line {}: {}", line + 2, e),
                }));
                continue;
            }
        };

        let line_no = line + 2;
        let raw_date = non_empty(row.release_date);
        let release_date = raw_date.as_deref().and_then(parse_release_date);

        let explicit = non_empty(row.id);
        let base = match &explicit {
            Some(id) => MovieId::new(id.clone()),
            None => MovieId::from_title(&row.title),
        };
        let base_empty = base.as_str().is_empty();
        let base = if base_empty { MovieId::new(format!("row-{}", line_no)) } else { base };
        let id = unique_id(base.clone(), release_date.map(|d| d.year()), &seen);
        seen.insert(id.clone());

        if base_empty {
            issues.push(IssueRecord::for_movie(
                id.clone(),
                Malformed::Row { detail: format!("line {}: empty title", line_no) },
            ));
        }
        if id != base {
            debug!(franchise = %franchise, base = %base, id = %id, "movie_id_disambiguated");
            if explicit.is_some() {
                issues.push(IssueRecord::for_movie(
                    id.clone(),
                    Malformed::DuplicateId { id: base.as_str().to_string() },
                ));
            }
        }

        if let (Some(raw), None) = (raw_date, release_date) {
            issues.push(IssueRecord::for_movie(id.clone(), Malformed::ReleaseDate { raw }));
        }

        let budget = money_field(row.production_budget, "production_budget", &id, &mut issues);
        let box_office = money_field(row.box_office, "box_office", &id, &mut issues);

        let runtime_min = match non_empty(row.runtime) {
            Some(raw) => {
                let parsed = raw.parse::<f64>().ok().filter(|m| m.is_finite() && *m >= 0.0);
                if parsed.is_none() {
                    issues.push(IssueRecord::for_movie(
                        id.clone(),
                        Malformed::NonNumeric { field: "runtime", raw },
                    ));
                }
                parsed.map(|m| m.round() as u32)
            }
            None => None,
        };

        let extras = MovieExtras {
            poster_url: non_empty(row.poster_url),
            backdrop_url: non_empty(row.backdrop_url),
            runtime_min,
            tagline: non_empty(row.tagline),
            trailer_url: non_empty(row.trailer),
        };

        movies.push(
            MovieRecord::new(id, row.title, franchise.clone(), release_date)
                .with_financials(budget, box_office)
                .with_extras(extras),
        );
    }

    let series = FranchiseSeries::new(franchise, name, movies);
    (series, issues)
}

/// Load a `<name>_movies.csv` file
pub fn load_franchise_file<P: AsRef<Path>>(
    path: P,
) -> anyhow::Result<(FranchiseSeries, Vec<IssueRecord>)> {
    let path = path.as_ref();
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(MOVIES_SUFFIX))
        .with_context(|| format!("Not a franchise file: {}", path.display()))?;
    let (franchise, name) = franchise_from_stem(stem);

    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open franchise file {}", path.display()))?;
    let (series, issues) = read_franchise(file, franchise, &name);

    info!(
        franchise = %series.id,
        name = %series.name,
        movies = series.len(),
        issues = issues.len(),
        "franchise_loaded"
    );
    Ok((series, issues))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::issue::DataIssue;

    const CSV: &str = "\
title,release_date,production_budget,box_office,profit,roi_percentage,poster_url,runtime,tagline,trailer
Iron Man,\"May 02, 2008\",\"$140,000,000\",585174222,,,https://img/1.jpg,126,Heroes aren't born.,https://yt/1
The Incredible Hulk,\"Jun 13, 2008\",150000000,TBD,,,,,,
Iron Man 2,2010-05-07,200000000,623933331,,,,124.0,,
Untitled,someday,,,,,,,,
";

    #[test]
    fn test_franchise_from_stem() {
        let (id, name) = franchise_from_stem("marvel_cinematic_universe");
        assert_eq!(id.as_str(), "marvel_cinematic_universe");
        assert_eq!(name, "Marvel Cinematic Universe");
        assert_eq!(franchise_from_stem("BOND").1, "Bond");
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("$140,000,000"), Some(140_000_000.0));
        assert_eq!(parse_money("585174222.0"), Some(585_174_222.0));
        assert_eq!(parse_money("TBD"), None);
        assert_eq!(parse_money("NaN"), None);
    }

    #[test]
    fn test_parse_release_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2008, 5, 2);
        assert_eq!(parse_release_date("May 02, 2008"), expected);
        assert_eq!(parse_release_date("May 2, 2008"), expected);
        assert_eq!(parse_release_date("2008-05-02"), expected);
        assert_eq!(parse_release_date("someday"), None);
    }

    #[test]
    fn test_read_franchise_recovers_per_field() {
        let (series, issues) =
            read_franchise(CSV.as_bytes(), FranchiseId::new("marvel"), "Marvel");

        assert_eq!(series.len(), 4);
        let titles: Vec<&str> = series.movies().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Iron Man", "The Incredible Hulk", "Iron Man 2", "Untitled"]);

        let iron_man = &series.movies()[0];
        assert_eq!(iron_man.id.as_str(), "iron-man");
        assert_eq!(iron_man.budget, Some(140_000_000.0));
        assert_eq!(iron_man.extras.runtime_min, Some(126));
        assert_eq!(iron_man.extras.trailer_url.as_deref(), Some("https://yt/1"));

        let hulk = &series.movies()[1];
        assert_eq!(hulk.budget, Some(150_000_000.0));
        assert_eq!(hulk.box_office, None);

        assert_eq!(series.movies()[2].extras.runtime_min, Some(124));

        let untitled = &series.movies()[3];
        assert_eq!(untitled.release_date, None);
        assert_eq!(untitled.budget, None);

        assert!(issues.contains(&IssueRecord::for_movie(
            MovieId::new("the-incredible-hulk"),
            Malformed::NonNumeric { field: "box_office", raw: "TBD".to_string() }
        )));
        assert!(issues.contains(&IssueRecord::for_movie(
            MovieId::new("untitled"),
            Malformed::ReleaseDate { raw: "someday".to_string() }
        )));
        assert!(issues.iter().all(|r| matches!(r.issue, DataIssue::Malformed(_))));
    }

    #[test]
    fn test_id_column_preferred() {
        let csv = "id,title,release_date,production_budget,box_office\n1726,Iron Man,\"May 02, 2008\",1,2\n";
        let (series, issues) = read_franchise(csv.as_bytes(), FranchiseId::new("m"), "M");
        assert!(issues.is_empty());
        assert_eq!(series.movies()[0].id.as_str(), "1726");
    }

    #[test]
    fn test_shared_titles_get_unique_ids() {
        let csv = "\
title,release_date,production_budget,box_office
Halloween,1978-10-25,325000,70000000
Halloween II,1981-10-30,2500000,25500000
Halloween,2007-08-31,15000000,80000000
Halloween,2007-08-31,1,2
";
        let (series, issues) = read_franchise(csv.as_bytes(), FranchiseId::new("h"), "H");
        let ids: Vec<&str> = series.movies().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["halloween", "halloween-ii", "halloween-2007", "halloween-2"]);
        // title collisions are expected, not malformed
        assert!(issues.is_empty());
    }

    #[test]
    fn test_repeated_explicit_id_reported() {
        let csv = "id,title,release_date,production_budget,box_office\n7,A,2001-01-01,1,2\n7,B,,1,2\n";
        let (series, issues) = read_franchise(csv.as_bytes(), FranchiseId::new("m"), "M");
        let ids: Vec<&str> = series.movies().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["7", "7-2"]);
        assert_eq!(
            issues,
            vec![IssueRecord::for_movie(MovieId::new("7-2"), Malformed::DuplicateId { id: "7".to_string() })]
        );
    }

    #[test]
    fn test_empty_titles_do_not_collide() {
        let csv = "title,release_date,production_budget,box_office\n,2001-01-01,1,2\n!!!,2002-01-01,1,3\n";
        let (series, issues) = read_franchise(csv.as_bytes(), FranchiseId::new("m"), "M");
        let ids: Vec<&str> = series.movies().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["row-2", "row-3"]);
        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_row_without_title_skipped() {
        let csv = "release_date,production_budget,box_office\n\"May 02, 2008\",1,2\n";
        let (series, issues) = read_franchise(csv.as_bytes(), FranchiseId::new("m"), "M");
        assert!(series.is_empty());
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn test_load_franchise_file_requires_suffix() {
        assert!(load_franchise_file("/tmp/not_a_franchise.csv").is_err());
    }
}
