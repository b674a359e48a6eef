use anyhow::{Context, Result};

use super::load::{parse_root_index, parse_surah};
use super::model::{Corpus, RootCatalog};

const AT_TAJALLI: &str = include_str!("../../data/surahs/at-tajalli.yaml");
const ROOT_INDEX: &str = include_str!("../../data/roots/index.yaml");

/// The corpus compiled into the binary, used when no data directory is given.
pub fn embedded_corpus() -> Result<(Corpus, RootCatalog)> {
    let surah = parse_surah(AT_TAJALLI, "at-tajalli").context("embedded surah is invalid")?;
    let catalog = parse_root_index(ROOT_INDEX).context("embedded root index is invalid")?;
    Ok((Corpus::new(vec![surah]), catalog))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Category;

    #[test]
    fn embedded_corpus_is_complete() {
        let (corpus, catalog) = embedded_corpus().unwrap();
        let surah = &corpus.list_surahs()[0];
        assert_eq!(surah.id, "at-tajalli");
        assert!(surah.canonical);
        assert_eq!(surah.verses.len(), 13);
        assert_eq!(surah.verses[12].number, 13);
        assert_eq!(catalog.len(), 63);
        assert_eq!(
            catalog.lookup("j-l-w").map(|entry| entry.category),
            Some(Category::Revelation)
        );

        for verse in &surah.verses {
            for root in &verse.roots {
                assert!(catalog.lookup(root).is_some(), "uncatalogued root {root}");
            }
        }
    }
}
