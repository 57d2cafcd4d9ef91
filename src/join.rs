//! Outer join of per-title feature CSVs
//!
//! Merges every `features-<title>.csv` in a directory into one table with a
//! row per title and a column per feature, zero-filling features a title
//! lacks. Features that occur in fewer than `min_pct` percent or more than
//! `max_pct` percent of titles are dropped: near-absent features carry no
//! signal and near-universal ones (stop words) drown everything else.
//!
//! This exists as a dedicated pass because generic dataframe merges proved
//! too slow at this feature count.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use crate::error::{Error, Result};

/// One title's feature row, as loaded from its CSV
#[derive(Clone, Debug)]
pub struct MovieFeatures {
    /// Title, taken from the file name
    pub title: String,
    /// Content rating (first value column)
    pub content_rating: String,
    /// Feature occurrence counts
    pub features: HashMap<String, u64>,
}

/// Load every `features-*.csv` in `input_dir`, sorted by title
///
/// # Errors
///
/// Fails when a file's header does not start with `content_rating` or its
/// value row is shorter than its header.
pub fn load_feature_dir(input_dir: &Path) -> Result<Vec<MovieFeatures>> {
    let mut movies = Vec::new();

    let mut names = BTreeSet::new();
    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with("features-") && name.ends_with(".csv") {
            names.insert(name.to_string());
        }
    }

    for name in names {
        let path = input_dir.join(&name);
        let title = name
            .trim_start_matches("features-")
            .trim_end_matches(".csv")
            .to_string();
        movies.push(load_feature_file(&path, &title)?);
    }

    Ok(movies)
}

fn load_feature_file(path: &Path, title: &str) -> Result<MovieFeatures> {
    let contents = std::fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let header: Vec<&str> = lines.next().unwrap_or("").split(',').collect();
    let values: Vec<&str> = lines.next().unwrap_or("").split(',').collect();

    if header.first() != Some(&"content_rating") {
        return Err(Error::InvalidFeatureFile {
            path: path.to_path_buf(),
            reason: "first feature must be 'content_rating'".to_string(),
        });
    }
    if values.len() < header.len() {
        return Err(Error::InvalidFeatureFile {
            path: path.to_path_buf(),
            reason: format!(
                "value row has {} fields, header has {}",
                values.len(),
                header.len()
            ),
        });
    }

    let mut features = HashMap::new();
    for (feature, value) in header.iter().zip(values.iter()).skip(1) {
        // Unparseable counts are treated as zero
        features.insert(feature.to_string(), value.trim().parse().unwrap_or(0));
    }

    Ok(MovieFeatures {
        title: title.to_string(),
        content_rating: values[0].to_string(),
        features,
    })
}

/// Outer-join feature rows into one CSV string
///
/// Features occurring in fewer than `min_pct`% or more than `max_pct`% of
/// the titles are dropped; surviving columns are sorted lexicographically
/// and zero-filled where a title lacks the feature.
pub fn outer_join(movies: &[MovieFeatures], min_pct: u64, max_pct: u64) -> String {
    let mut feature_set: BTreeSet<&str> = BTreeSet::new();
    for movie in movies {
        feature_set.extend(movie.features.keys().map(String::as_str));
    }

    let total = movies.len() as u64;
    feature_set.retain(|feature| {
        let occurrences = movies
            .iter()
            .filter(|m| m.features.get(*feature).copied().unwrap_or(0) > 0)
            .count() as u64;
        occurrences * 100 >= total * min_pct && occurrences * 100 <= total * max_pct
    });

    let mut columns = vec!["title", "content_rating"];
    columns.extend(feature_set.iter().copied());

    let mut csv = columns.join(",");
    csv.push('\n');

    for movie in movies {
        csv.push_str(&movie.title);
        csv.push(',');
        csv.push_str(&movie.content_rating);
        for feature in &feature_set {
            let count = movie.features.get(*feature).copied().unwrap_or(0);
            csv.push_str(&format!(",{}", count));
        }
        csv.push('\n');
    }

    csv
}

/// Load a feature directory and render the joined CSV
pub fn join_directory(input_dir: &Path, min_pct: u64, max_pct: u64) -> Result<String> {
    let movies = load_feature_dir(input_dir)?;
    tracing::info!(titles = movies.len(), "joining feature files");
    Ok(outer_join(&movies, min_pct, max_pct))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn movie(title: &str, rating: &str, features: &[(&str, u64)]) -> MovieFeatures {
        MovieFeatures {
            title: title.to_string(),
            content_rating: rating.to_string(),
            features: features
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect(),
        }
    }

    #[test]
    fn test_outer_join_zero_fills_missing_features() {
        let movies = vec![
            movie("alien", "R", &[("nostromo", 3)]),
            movie("heat", "R", &[("heist", 5)]),
        ];
        let csv = outer_join(&movies, 0, 100);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "title,content_rating,heist,nostromo");
        assert_eq!(lines[1], "alien,R,0,3");
        assert_eq!(lines[2], "heat,R,5,0");
    }

    #[test]
    fn test_outer_join_drops_rare_features() {
        let movies = vec![
            movie("a", "R", &[("common", 1), ("rare", 1)]),
            movie("b", "R", &[("common", 1)]),
            movie("c", "R", &[("common", 1)]),
        ];
        // rare occurs in 1/3 (33%); min 40% drops it, common (100%) survives
        let csv = outer_join(&movies, 40, 100);
        assert_eq!(csv.lines().next().unwrap(), "title,content_rating,common");
    }

    #[test]
    fn test_outer_join_drops_universal_features() {
        let movies = vec![
            movie("a", "R", &[("the", 9), ("ripley", 2)]),
            movie("b", "R", &[("the", 7), ("ripley", 1)]),
            movie("c", "R", &[("the", 5)]),
        ];
        // "the" occurs in 100% of titles; max 90% drops it
        let csv = outer_join(&movies, 5, 90);
        assert_eq!(csv.lines().next().unwrap(), "title,content_rating,ripley");
    }

    #[test]
    fn test_load_rejects_bad_header() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("features-bad.csv"), "rating,a\nR,1\n").unwrap();

        assert!(matches!(
            load_feature_dir(dir.path()),
            Err(Error::InvalidFeatureFile { .. })
        ));
    }

    #[test]
    fn test_join_directory_end_to_end() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("features-alien.csv"),
            "content_rating,egg,ship\nR,2,1\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("features-heat.csv"),
            "content_rating,heist\nR,4\n",
        )
        .unwrap();
        // Ignored: not a feature file
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let csv = join_directory(dir.path(), 0, 100).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "title,content_rating,egg,heist,ship");
        assert_eq!(lines[1], "alien,R,2,0,1");
        assert_eq!(lines[2], "heat,R,0,4,0");
    }
}
