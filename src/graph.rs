use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::corpus::{Category, RootCatalog, Verse};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub display_form: String,
    pub gloss: String,
    pub category: Category,
    pub occurrences: u32,
}

/// Undirected co-occurrence edge; `source < target` lexicographically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootGraph {
    pub nodes: BTreeMap<String, GraphNode>,
    pub edges: BTreeMap<String, GraphEdge>,
}

pub fn pair_key(a: &str, b: &str) -> String {
    if a <= b {
        format!("{a}|{b}")
    } else {
        format!("{b}|{a}")
    }
}

fn resolve_node(id: &str, catalog: &RootCatalog) -> GraphNode {
    match catalog.lookup(id) {
        Some(entry) => GraphNode {
            id: id.to_owned(),
            display_form: if entry.arabic.is_empty() {
                id.to_owned()
            } else {
                entry.arabic.clone()
            },
            gloss: if entry.meaning.is_empty() {
                id.to_owned()
            } else {
                entry.meaning.clone()
            },
            category: entry.category,
            occurrences: 0,
        },
        None => GraphNode {
            id: id.to_owned(),
            display_form: id.to_owned(),
            gloss: id.to_owned(),
            category: Category::Unknown,
            occurrences: 0,
        },
    }
}

/// Builds the root co-occurrence graph for a verse scope. Each verse's root
/// list is treated as a set, so a repeated root counts once per verse.
pub fn build_root_graph<'a>(
    verses: impl IntoIterator<Item = &'a Verse>,
    catalog: &RootCatalog,
) -> RootGraph {
    let mut graph = RootGraph::default();

    for verse in verses {
        let roots = verse
            .roots
            .iter()
            .map(String::as_str)
            .filter(|root| !root.is_empty())
            .collect::<BTreeSet<_>>();

        for &root in &roots {
            graph
                .nodes
                .entry(root.to_owned())
                .or_insert_with(|| resolve_node(root, catalog))
                .occurrences += 1;
        }

        let ordered = roots.into_iter().collect::<Vec<_>>();
        for (index, &source) in ordered.iter().enumerate() {
            for &target in &ordered[index + 1..] {
                graph
                    .edges
                    .entry(pair_key(source, target))
                    .or_insert_with(|| GraphEdge {
                        source: source.to_owned(),
                        target: target.to_owned(),
                        weight: 0,
                    })
                    .weight += 1;
            }
        }
    }

    graph
}

impl RootGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.edges.values().map(|edge| u64::from(edge.weight)).sum()
    }

    pub fn edge_between(&self, a: &str, b: &str) -> Option<&GraphEdge> {
        self.edges.get(&pair_key(a, b))
    }

    pub fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = (&'a str, u32)> + 'a {
        self.edges.values().filter_map(move |edge| {
            if edge.source == id {
                Some((edge.target.as_str(), edge.weight))
            } else if edge.target == id {
                Some((edge.source.as_str(), edge.weight))
            } else {
                None
            }
        })
    }

    /// Nodes ordered by occurrences (descending), ties broken by id.
    pub fn ranked_nodes(&self) -> Vec<&GraphNode> {
        let mut ranked = self.nodes.values().collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.occurrences.cmp(&a.occurrences).then_with(|| a.id.cmp(&b.id)));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::*;
    use crate::corpus::{RootEntry, embedded_corpus};

    fn verse(roots: &[&str]) -> Verse {
        Verse {
            roots: roots.iter().map(|root| root.to_string()).collect(),
            ..Verse::default()
        }
    }

    fn occurrences(graph: &RootGraph) -> BTreeMap<&str, u32> {
        graph
            .nodes
            .values()
            .map(|node| (node.id.as_str(), node.occurrences))
            .collect()
    }

    #[test]
    fn counts_nodes_and_weighted_pairs() {
        let verses = [verse(&["A", "B"]), verse(&["A", "B", "C"]), verse(&["C"])];
        let graph = build_root_graph(&verses, &RootCatalog::default());

        assert_eq!(occurrences(&graph), BTreeMap::from([("A", 2), ("B", 2), ("C", 2)]));
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge_between("A", "B").map(|edge| edge.weight), Some(2));
        assert_eq!(graph.edge_between("C", "A").map(|edge| edge.weight), Some(1));
        assert_eq!(graph.edge_between("B", "C").map(|edge| edge.weight), Some(1));
        assert_eq!(graph.total_weight(), 4);

        let edge = &graph.edges["A|C"];
        assert_eq!((edge.source.as_str(), edge.target.as_str()), ("A", "C"));
    }

    #[test]
    fn duplicate_roots_in_a_verse_count_once() {
        let graph = build_root_graph(&[verse(&["b", "a", "b", "a"])], &RootCatalog::default());
        assert_eq!(occurrences(&graph), BTreeMap::from([("a", 1), ("b", 1)]));
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.total_weight(), 1);
    }

    #[test]
    fn uncatalogued_roots_describe_themselves() {
        let catalog = RootCatalog::new(HashMap::from([(
            "k-t-b".to_owned(),
            RootEntry {
                arabic: "ك-ت-ب".to_owned(),
                meaning: "to write".to_owned(),
                category: Category::Inscription,
            },
        )]));
        let graph = build_root_graph(&[verse(&["k-t-b", "x-y-z"])], &catalog);

        let known = &graph.nodes["k-t-b"];
        assert_eq!(known.display_form, "ك-ت-ب");
        assert_eq!(known.gloss, "to write");
        assert_eq!(known.category, Category::Inscription);

        let unknown = &graph.nodes["x-y-z"];
        assert_eq!(unknown.display_form, "x-y-z");
        assert_eq!(unknown.gloss, "x-y-z");
        assert_eq!(unknown.category, Category::Unknown);
    }

    #[test]
    fn empty_scope_builds_an_empty_graph() {
        let graph = build_root_graph(&[verse(&[]), Verse::default()], &RootCatalog::default());
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn embedded_surah_graph_matches_known_totals() {
        let (corpus, catalog) = embedded_corpus().unwrap();
        let graph = build_root_graph(corpus.list_surahs()[0].verses.iter(), &catalog);

        assert_eq!(graph.node_count(), 63);
        assert_eq!(graph.edge_count(), 305);
        assert_eq!(graph.total_weight(), 324);
        assert_eq!(graph.nodes["j-l-w"].occurrences, 5);
        assert_eq!(graph.edge_between("r-s-l", "j-l-w").map(|edge| edge.weight), Some(3));
        assert_eq!(graph.ranked_nodes()[0].id, "j-l-w");
        assert_eq!(graph.neighbors("j-l-w").filter(|(_, weight)| *weight > 1).count(), 7);
        assert_eq!(graph.neighbors("j-l-w").count(), 31);
    }

    fn verses_strategy() -> impl Strategy<Value = Vec<Vec<String>>> {
        prop::collection::vec(
            prop::collection::vec("[a-f]", 0..6),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn weights_account_for_every_same_verse_pair(raw in verses_strategy()) {
            let verses = raw.iter().map(|roots| Verse { roots: roots.clone(), ..Verse::default() }).collect::<Vec<_>>();
            let graph = build_root_graph(&verses, &RootCatalog::default());

            let expected_pairs: u64 = raw
                .iter()
                .map(|roots| {
                    let distinct = roots.iter().collect::<BTreeSet<_>>().len() as u64;
                    distinct * distinct.saturating_sub(1) / 2
                })
                .sum();
            prop_assert_eq!(graph.total_weight(), expected_pairs);

            for node in graph.nodes.values() {
                let expected = raw.iter().filter(|roots| roots.contains(&node.id)).count() as u32;
                prop_assert_eq!(node.occurrences, expected);
            }
        }

        #[test]
        fn edges_are_unique_unordered_pairs_without_loops(raw in verses_strategy()) {
            let verses = raw.iter().map(|roots| Verse { roots: roots.clone(), ..Verse::default() }).collect::<Vec<_>>();
            let graph = build_root_graph(&verses, &RootCatalog::default());

            let mut seen = BTreeSet::new();
            for (key, edge) in &graph.edges {
                prop_assert!(edge.source < edge.target);
                prop_assert!(edge.weight >= 1);
                prop_assert_eq!(key, &pair_key(&edge.target, &edge.source));
                prop_assert!(seen.insert((edge.source.clone(), edge.target.clone())));
                prop_assert!(graph.nodes.contains_key(&edge.source));
                prop_assert!(graph.nodes.contains_key(&edge.target));
            }

            let rebuilt = build_root_graph(&verses, &RootCatalog::default());
            prop_assert_eq!(rebuilt, graph);
        }
    }
}
