mod embedded;
mod load;
mod model;

pub use embedded::embedded_corpus;
pub use load::{load_corpus_dir, open_corpus};
pub use model::{Category, Corpus, RootCatalog, RootEntry, Scope, Surah, Verse};
