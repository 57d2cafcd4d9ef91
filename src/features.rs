//! Unigram/bigram feature generation from scraped scripts
//!
//! For every scraped title this produces `features-<title>.csv`: the first
//! column is the content rating (the target class, taken from the metadata
//! artifact), followed by one column per normalized word and word-bigram
//! with its occurrence count in the script text.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

fn normalize_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // The pattern is static and known-good
    #[allow(clippy::expect_used)]
    fn build() -> Regex {
        Regex::new("[^a-z0-9]+").expect("static regex compiles")
    }
    RE.get_or_init(build)
}

/// Normalize a word for feature extraction: lowercase, punctuation stripped
///
/// Words that normalize to the empty string carry no signal and are skipped
/// by [`count_features`] entirely, including from bigrams.
pub fn normalize_word(word: &str) -> String {
    normalize_re()
        .replace_all(&word.to_lowercase(), "")
        .into_owned()
}

/// Count every normalized word and consecutive-word bigram in `text`
///
/// Bigrams are keyed `<previous>_<current>`; the first word of the text has
/// no bigram. The map iterates in lexicographic order, which fixes the CSV
/// column order.
pub fn count_features(text: &str) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut previous: Option<String> = None;

    for raw in text.split_whitespace() {
        let word = normalize_word(raw);
        if word.is_empty() {
            continue;
        }

        *counts.entry(word.clone()).or_insert(0) += 1;

        if let Some(prev) = previous.replace(word.clone()) {
            *counts.entry(format!("{}_{}", prev, word)).or_insert(0) += 1;
        }
    }

    counts
}

/// Generate `features-<title>.csv` in `out_dir` from the `<title>.txt` and
/// `<title>.meta` artifacts in `input_dir`
///
/// The rating is the second comma-field of the metadata line, verbatim.
///
/// # Errors
///
/// Fails when either artifact is missing or the metadata line has fewer
/// than two fields.
pub fn generate_features(input_dir: &Path, out_dir: &Path, title: &str) -> Result<()> {
    let meta_path = input_dir.join(format!("{}.meta", title));
    let meta = std::fs::read_to_string(&meta_path)?;
    let text = std::fs::read_to_string(input_dir.join(format!("{}.txt", title)))?;

    let rating = meta
        .split(',')
        .nth(1)
        .ok_or_else(|| Error::InvalidFeatureFile {
            path: meta_path,
            reason: "metadata line has no content rating field".to_string(),
        })?;

    let counts = count_features(&text);

    let mut columns = vec!["content_rating".to_string()];
    columns.extend(counts.keys().cloned());

    let mut values = vec![rating.to_string()];
    values.extend(counts.values().map(u64::to_string));

    let mut csv = String::new();
    csv.push_str(&columns.join(","));
    csv.push('\n');
    csv.push_str(&values.join(","));
    csv.push('\n');

    std::fs::write(out_dir.join(format!("features-{}.csv", title)), csv)?;
    Ok(())
}

/// Generate features for every scraped title in `input_dir`
///
/// Titles are the unique stems of the `.txt`/`.meta` artifact pairs,
/// processed in sorted order. The first failure aborts the batch. Returns
/// the number of titles processed.
pub fn generate_all(input_dir: &Path, out_dir: &Path) -> Result<u64> {
    let mut titles = BTreeSet::new();
    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(stem) = name.strip_suffix(".meta").or_else(|| name.strip_suffix(".txt")) {
            titles.insert(stem.to_string());
        }
    }

    for title in &titles {
        tracing::debug!(title, "generating features");
        generate_features(input_dir, out_dir, title)?;
    }

    Ok(titles.len() as u64)
}
