//! The root map session: corpus, selection, co-occurrence graph and the
//! running layout behind one owner. Presentation code reads snapshots and
//! sends commands; it never touches simulation state directly.

use std::collections::HashMap;

use serde::Serialize;
use tracing::info;

use crate::corpus::{Category, Corpus, RootCatalog, Scope, Verse};
use crate::graph::{RootGraph, build_root_graph};
use crate::layout::{ForceLayout, LayoutConfig, TickFrame};
use crate::selection::{Selection, View};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    pub display_form: String,
    pub gloss: String,
    pub category: Category,
    pub occurrences: u32,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub a: String,
    pub b: String,
    pub weight: u32,
}

#[derive(Debug, Serialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

pub struct RootMap {
    corpus: Corpus,
    catalog: RootCatalog,
    config: LayoutConfig,
    selection: Selection,
    graph: RootGraph,
    layout: ForceLayout,
}

impl RootMap {
    pub fn new(corpus: Corpus, catalog: RootCatalog, config: LayoutConfig, scope: Scope) -> Self {
        let selection = Selection::new(scope);
        let graph = build_root_graph(corpus.verses_in_scope(scope), &catalog);
        let layout = ForceLayout::new(&graph, config, &HashMap::new());
        info!(
            surahs = corpus.list_surahs().len(),
            roots = graph.node_count(),
            links = graph.edge_count(),
            "root map ready"
        );

        Self {
            corpus,
            catalog,
            config,
            selection,
            graph,
            layout,
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn graph(&self) -> &RootGraph {
        &self.graph
    }

    pub fn layout(&self) -> &ForceLayout {
        &self.layout
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn current_nodes(&self) -> Vec<NodeView> {
        self.graph
            .nodes
            .values()
            .map(|node| {
                let position = self.layout.position(&node.id).unwrap_or_default();
                NodeView {
                    id: node.id.clone(),
                    display_form: node.display_form.clone(),
                    gloss: node.gloss.clone(),
                    category: node.category,
                    occurrences: node.occurrences,
                    x: position.x,
                    y: position.y,
                }
            })
            .collect()
    }

    pub fn current_edges(&self) -> Vec<EdgeView> {
        self.graph
            .edges
            .values()
            .map(|edge| EdgeView {
                a: edge.source.clone(),
                b: edge.target.clone(),
                weight: edge.weight,
            })
            .collect()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.current_nodes(),
            edges: self.current_edges(),
        }
    }

    /// Listeners survive scope changes; they move to each new simulation.
    pub fn on_tick(&mut self, listener: impl FnMut(&TickFrame<'_>) + 'static) {
        self.layout.on_tick(listener);
    }

    pub fn pin(&mut self, root_id: &str, x: f32, y: f32) -> bool {
        self.layout.pin(root_id, x, y)
    }

    pub fn unpin(&mut self, root_id: &str) -> bool {
        self.layout.unpin(root_id)
    }

    pub fn set_scope(&mut self, scope: Scope) -> bool {
        if !self.selection.set_scope(scope) {
            return false;
        }
        self.rebuild();
        true
    }

    /// Restyles only; the node and edge sets stay as they are.
    pub fn set_root_filter(&mut self, root_id: Option<String>) {
        self.selection.set_root_filter(root_id);
    }

    pub fn toggle_root(&mut self, root_id: &str) -> Option<&str> {
        self.selection.toggle_root(root_id)
    }

    pub fn set_view(&mut self, view: View) {
        self.selection.set_view(view);
    }

    pub fn advance(&mut self, elapsed_seconds: f32) -> usize {
        self.layout.advance(elapsed_seconds)
    }

    pub fn tick(&mut self) -> bool {
        self.layout.tick()
    }

    pub fn run_until_settled(&mut self, max_ticks: u64) -> Option<u64> {
        self.layout.run_until_settled(max_ticks)
    }

    pub fn is_animating(&self) -> bool {
        self.layout.is_active()
    }

    /// Verses of the current scope that pass the root filter.
    pub fn visible_verses(&self) -> Vec<&Verse> {
        self.selection
            .filter_verses(self.corpus.verses_in_scope(self.selection.scope()))
    }

    fn rebuild(&mut self) {
        let listeners = self.layout.take_listeners();
        let seeds = self.layout.position_map();
        self.layout.stop();

        self.graph = build_root_graph(
            self.corpus.verses_in_scope(self.selection.scope()),
            &self.catalog,
        );
        let mut layout = ForceLayout::new(&self.graph, self.config, &seeds);
        layout.extend_listeners(listeners);
        self.layout = layout;

        info!(
            scope = ?self.selection.scope(),
            roots = self.graph.node_count(),
            links = self.graph.edge_count(),
            "rebuilt root map"
        );
    }
}
