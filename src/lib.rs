//! Root co-occurrence maps for the Kitab al-Tanazur corpus: YAML corpus
//! loading, the weighted root graph, a force-directed layout and the
//! session that ties them to a reader's selection.

pub mod corpus;
pub mod graph;
pub mod layout;
pub mod root_map;
pub mod selection;
