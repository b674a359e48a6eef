use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_yaml::Value;
use tracing::{debug, info, warn};

use super::embedded::embedded_corpus;
use super::model::{Corpus, RootCatalog, RootEntry, Surah, Verse, null_as_default};

#[derive(Debug, Default, Deserialize)]
struct RawSurah {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title_ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    title_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    transliteration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    canonical: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    preface: String,
    #[serde(default, deserialize_with = "null_as_default")]
    verses: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawRootRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    id: String,
    #[serde(flatten)]
    entry: RootEntry,
}

pub(super) fn normalize_roots(roots: Vec<String>) -> Vec<String> {
    roots
        .into_iter()
        .map(|root| root.trim().to_owned())
        .filter(|root| !root.is_empty())
        .collect()
}

pub fn parse_surah(raw: &str, fallback_id: &str) -> Result<Surah> {
    let parsed: RawSurah = serde_yaml::from_str(raw).context("invalid surah YAML")?;

    let mut verses = Vec::with_capacity(parsed.verses.len());
    for (position, value) in parsed.verses.into_iter().enumerate() {
        match Verse::deserialize(value) {
            Ok(mut verse) => {
                verse.roots = normalize_roots(verse.roots);
                verses.push(verse);
            }
            Err(error) => {
                warn!(surah = fallback_id, position, %error, "skipping malformed verse");
            }
        }
    }

    let id = if parsed.id.trim().is_empty() {
        fallback_id.to_owned()
    } else {
        parsed.id.trim().to_owned()
    };

    Ok(Surah {
        id,
        title_ar: parsed.title_ar,
        title_en: parsed.title_en,
        transliteration: parsed.transliteration,
        canonical: parsed.canonical,
        preface: parsed.preface,
        verses,
    })
}

/// Accepts either a list of `{id, arabic, meaning, category}` records or a
/// map keyed by root id.
pub fn parse_root_index(raw: &str) -> Result<RootCatalog> {
    let parsed: Value = serde_yaml::from_str(raw).context("invalid root index YAML")?;

    let mut entries = HashMap::new();
    match parsed {
        Value::Null => {}
        Value::Sequence(records) => {
            for value in records {
                match RawRootRecord::deserialize(value) {
                    Ok(record) if !record.id.trim().is_empty() => {
                        entries.insert(record.id.trim().to_owned(), record.entry);
                    }
                    Ok(_) => warn!("skipping root record without id"),
                    Err(error) => warn!(%error, "skipping malformed root record"),
                }
            }
        }
        Value::Mapping(map) => {
            for (key, value) in map {
                let Some(id) = key.as_str().map(str::trim).filter(|id| !id.is_empty()) else {
                    warn!("skipping root entry with a non-string key");
                    continue;
                };
                match RootEntry::deserialize(value) {
                    Ok(entry) => {
                        entries.insert(id.to_owned(), entry);
                    }
                    Err(error) => warn!(root = id, %error, "skipping malformed root entry"),
                }
            }
        }
        _ => return Err(anyhow!("root index must be a list or a map of roots")),
    }

    Ok(RootCatalog::new(entries))
}

/// Loads `surahs/*.yaml` (ordered by file name) and `roots/index.yaml` from
/// a data directory. A missing root index is an empty catalog.
pub fn load_corpus_dir(data_dir: &Path) -> Result<(Corpus, RootCatalog)> {
    let surahs_dir = data_dir.join("surahs");
    let mut files = fs::read_dir(&surahs_dir)
        .with_context(|| format!("failed to read surah directory {}", surahs_dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().is_some_and(|extension| extension == "yaml"))
        .collect::<Vec<_>>();
    files.sort();

    let mut surahs = Vec::with_capacity(files.len());
    for path in &files {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let stem = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default();
        let surah =
            parse_surah(&raw, stem).with_context(|| format!("failed to parse {}", path.display()))?;
        debug!(id = %surah.id, verses = surah.verses.len(), "loaded surah");
        surahs.push(surah);
    }

    let index_path = data_dir.join("roots").join("index.yaml");
    let catalog = if index_path.exists() {
        let raw = fs::read_to_string(&index_path)
            .with_context(|| format!("failed to read {}", index_path.display()))?;
        parse_root_index(&raw).with_context(|| format!("failed to parse {}", index_path.display()))?
    } else {
        debug!(path = %index_path.display(), "no root index, using an empty catalog");
        RootCatalog::default()
    };

    Ok((Corpus::new(surahs), catalog))
}

/// Reads the corpus from `data_dir` when given, otherwise falls back to the
/// copy compiled into the binary.
pub fn open_corpus(data_dir: Option<&Path>) -> Result<(Corpus, RootCatalog)> {
    match data_dir {
        Some(dir) => {
            info!(path = %dir.display(), "loading corpus from data directory");
            load_corpus_dir(dir)
        }
        None => {
            info!("loading embedded corpus");
            embedded_corpus()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Category;

    #[test]
    fn malformed_verse_is_skipped_and_missing_fields_default() {
        let raw = "\
title_en: Test
verses:
  - number: 1
    roots: [a, ' b ', '']
  - just a string
  - number: 3
";
        let surah = parse_surah(raw, "from-file").unwrap();
        assert_eq!(surah.id, "from-file");
        assert_eq!(surah.title_en, "Test");
        assert_eq!(surah.verses.len(), 2);
        assert_eq!(surah.verses[0].roots, ["a", "b"]);
        assert!(surah.verses[1].roots.is_empty());
        assert!(surah.verses[1].ar.is_empty());
    }

    #[test]
    fn root_index_accepts_list_and_map_forms() {
        let list = parse_root_index(
            "- id: k-t-b\n  arabic: ك-ت-ب\n  meaning: to write\n  category: inscription\n- arabic: orphan\n",
        )
        .unwrap();
        assert_eq!(list.len(), 1);
        let entry = list.lookup("k-t-b").unwrap();
        assert_eq!(entry.meaning, "to write");
        assert_eq!(entry.category, Category::Inscription);

        let map = parse_root_index("n-w-r:\n  arabic: ن-و-ر\n  meaning: light\n  category: light\n")
            .unwrap();
        assert_eq!(map.lookup("n-w-r").map(|entry| entry.category), Some(Category::Light));

        assert!(parse_root_index("").unwrap().is_empty());
        assert!(parse_root_index("just text").is_err());
    }

    #[test]
    fn loads_directory_sorted_by_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let surahs = dir.path().join("surahs");
        fs::create_dir_all(&surahs).unwrap();
        fs::write(surahs.join("b-second.yaml"), "id: second\nverses:\n  - roots: [x]\n").unwrap();
        fs::write(surahs.join("a-first.yaml"), "verses:\n  - roots: [y, x]\n").unwrap();
        fs::write(surahs.join("notes.txt"), "ignored").unwrap();

        let (corpus, catalog) = load_corpus_dir(dir.path()).unwrap();
        let ids = corpus
            .list_surahs()
            .iter()
            .map(|surah| surah.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["a-first", "second"]);
        assert!(catalog.is_empty());
    }

    #[test]
    fn missing_surah_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_corpus_dir(dir.path()).is_err());
    }

    #[test]
    fn open_corpus_prefers_data_dir_over_embedded() {
        let dir = tempfile::tempdir().unwrap();
        let surahs = dir.path().join("surahs");
        fs::create_dir_all(&surahs).unwrap();
        fs::write(surahs.join("only.yaml"), "verses: []\n").unwrap();

        let (corpus, _) = open_corpus(Some(dir.path())).unwrap();
        assert_eq!(corpus.list_surahs()[0].id, "only");

        let (corpus, catalog) = open_corpus(None).unwrap();
        assert_eq!(corpus.list_surahs()[0].id, "at-tajalli");
        assert!(!catalog.is_empty());
    }
}
