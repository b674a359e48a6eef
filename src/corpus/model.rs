use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Revelation,
    Witness,
    Inscription,
    #[serde(rename = "self")]
    SelfHood,
    Dwelling,
    Speech,
    Rupture,
    Time,
    Relation,
    Intention,
    Orientation,
    Origin,
    Truth,
    Light,
    Perception,
    Unity,
    Structure,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Self::Revelation => "revelation",
            Self::Witness => "witness",
            Self::Inscription => "inscription",
            Self::SelfHood => "self",
            Self::Dwelling => "dwelling",
            Self::Speech => "speech",
            Self::Rupture => "rupture",
            Self::Time => "time",
            Self::Relation => "relation",
            Self::Intention => "intention",
            Self::Orientation => "orientation",
            Self::Origin => "origin",
            Self::Truth => "truth",
            Self::Light => "light",
            Self::Perception => "perception",
            Self::Unity => "unity",
            Self::Structure => "structure",
            Self::Unknown => "unknown",
        }
    }
}

/// One ayah. Every field is optional in the source files, and an explicit
/// null reads the same as an absent field.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Verse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ar: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub translit: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roots: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
}

pub(super) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Verse {
    pub fn has_root(&self, root_id: &str) -> bool {
        self.roots.iter().any(|root| root == root_id)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Surah {
    pub id: String,
    pub title_ar: String,
    pub title_en: String,
    pub transliteration: String,
    pub canonical: bool,
    pub preface: String,
    pub verses: Vec<Verse>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RootEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub arabic: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meaning: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
}

/// Display attributes for roots, keyed by root id.
#[derive(Clone, Debug, Default)]
pub struct RootCatalog {
    entries: HashMap<String, RootEntry>,
}

impl RootCatalog {
    pub fn new(entries: HashMap<String, RootEntry>) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, root_id: &str) -> Option<&RootEntry> {
        self.entries.get(root_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which verses the root map is built from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    All,
    Surah(usize),
}

#[derive(Clone, Debug, Default)]
pub struct Corpus {
    surahs: Vec<Surah>,
}

impl Corpus {
    pub fn new(surahs: Vec<Surah>) -> Self {
        Self { surahs }
    }

    pub fn list_surahs(&self) -> &[Surah] {
        &self.surahs
    }

    pub fn surah(&self, id: &str) -> Option<&Surah> {
        self.surahs.iter().find(|surah| surah.id == id)
    }

    pub fn surah_index(&self, id: &str) -> Option<usize> {
        self.surahs.iter().position(|surah| surah.id == id)
    }

    /// Verses in scope, in corpus order. An out-of-range surah index is an
    /// empty scope.
    pub fn verses_in_scope(&self, scope: Scope) -> Vec<&Verse> {
        match scope {
            Scope::All => self
                .surahs
                .iter()
                .flat_map(|surah| surah.verses.iter())
                .collect(),
            Scope::Surah(index) => self
                .surahs
                .get(index)
                .map(|surah| surah.verses.iter().collect())
                .unwrap_or_default(),
        }
    }

    pub fn verse_count(&self) -> usize {
        self.surahs.iter().map(|surah| surah.verses.len()).sum()
    }

    /// Resolves a surah id to a scope; `None` and `"all"` mean every surah.
    /// Returns `None` for an id that is not in the corpus.
    pub fn scope_for(&self, surah_id: Option<&str>) -> Option<Scope> {
        match surah_id {
            None | Some("all") => Some(Scope::All),
            Some(id) => self.surah_index(id).map(Scope::Surah),
        }
    }
}
