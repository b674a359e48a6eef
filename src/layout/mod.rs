//! Force-directed layout for the root co-occurrence graph.
//!
//! The engine is a discrete-step simulation in the spirit of a d3 force
//! simulation: every tick applies link springs, many-body repulsion, a
//! centering pull and collision separation to node velocities, then
//! integrates positions. An `alpha` energy term decays towards a target so
//! the layout settles in a bounded number of ticks. Dragging is expressed
//! as `pin`/`unpin`, which also raise the alpha target while any node is
//! held.

mod forces;
mod quadtree;

use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::graph::RootGraph;
use forces::{
    CollisionParams, RepulsionParams, accumulate_collision_pairs, accumulate_repulsion_for_node,
    fallback_direction,
};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.72;

/// Drawn radius of a root node; collision adds the configured padding.
pub fn node_radius(occurrences: u32) -> f32 {
    10.0 + occurrences as f32 * 2.0
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub width: f32,
    pub height: f32,
    pub link_distance: f32,
    pub link_strength: f32,
    pub charge_strength: f32,
    pub charge_softening: f32,
    pub center_strength: f32,
    pub collision_padding: f32,
    pub collision_strength: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub drag_alpha_target: f32,
    pub velocity_decay: f32,
    pub max_speed: f32,
    pub tick_interval: f32,
    pub max_ticks_per_advance: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            width: 500.0,
            height: 400.0,
            link_distance: 80.0,
            link_strength: 1.0,
            charge_strength: 12_000.0,
            charge_softening: 400.0,
            center_strength: 0.04,
            collision_padding: 4.0,
            collision_strength: 0.7,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            drag_alpha_target: 0.3,
            velocity_decay: 0.4,
            max_speed: 60.0,
            tick_interval: 1.0 / 60.0,
            max_ticks_per_advance: 8,
        }
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

impl LayoutConfig {
    /// Replaces non-finite values with defaults and clamps everything into
    /// a range where the simulation is guaranteed to settle.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            width: finite_or(self.width, defaults.width).max(1.0),
            height: finite_or(self.height, defaults.height).max(1.0),
            link_distance: finite_or(self.link_distance, defaults.link_distance).max(1.0),
            link_strength: finite_or(self.link_strength, defaults.link_strength).clamp(0.0, 2.0),
            charge_strength: finite_or(self.charge_strength, defaults.charge_strength).max(0.0),
            charge_softening: finite_or(self.charge_softening, defaults.charge_softening).max(1.0),
            center_strength: finite_or(self.center_strength, defaults.center_strength)
                .clamp(0.0, 1.0),
            collision_padding: finite_or(self.collision_padding, defaults.collision_padding)
                .max(0.0),
            collision_strength: finite_or(self.collision_strength, defaults.collision_strength)
                .clamp(0.0, 1.0),
            alpha_min: finite_or(self.alpha_min, defaults.alpha_min).clamp(1e-6, 0.5),
            alpha_decay: finite_or(self.alpha_decay, defaults.alpha_decay).clamp(1e-4, 1.0),
            drag_alpha_target: finite_or(self.drag_alpha_target, defaults.drag_alpha_target)
                .clamp(0.0, 1.0),
            velocity_decay: finite_or(self.velocity_decay, defaults.velocity_decay)
                .clamp(0.0, 1.0),
            max_speed: finite_or(self.max_speed, defaults.max_speed).max(1.0),
            tick_interval: finite_or(self.tick_interval, defaults.tick_interval)
                .clamp(0.001, 1.0),
            max_ticks_per_advance: self.max_ticks_per_advance.max(1),
        }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutPhase {
    Initializing,
    Running,
    Settled,
    Stopped,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

pub struct TickFrame<'a> {
    pub tick: u64,
    pub alpha: f32,
    pub positions: &'a [NodePosition],
}

pub type TickListener = Box<dyn FnMut(&TickFrame<'_>)>;

struct LayoutNode {
    id: String,
    position: Vec2,
    velocity: Vec2,
    radius: f32,
    pinned: Option<Vec2>,
}

struct LayoutEdge {
    source: usize,
    target: usize,
    rest_length: f32,
    strength: f32,
    bias: f32,
}

#[derive(Default)]
struct PhysicsScratch {
    positions: Vec<Vec2>,
    radii: Vec<f32>,
    impulses: Vec<Vec2>,
}

pub struct ForceLayout {
    config: LayoutConfig,
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
    index_by_id: HashMap<String, usize>,
    alpha: f32,
    alpha_target: f32,
    phase: LayoutPhase,
    ticks: u64,
    pending_seconds: f32,
    listeners: Vec<TickListener>,
    scratch: PhysicsScratch,
}

/// Offset in `[-1, 1]²` derived from the id with FNV-1a, so it is the same
/// on every run and every toolchain.
fn id_jitter(id: &str) -> Vec2 {
    let hash = id.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    });
    let unit = |bits: u64| (bits & 0xffff_ffff) as f32 / u32::MAX as f32 * 2.0 - 1.0;
    vec2(unit(hash), unit(hash >> 32))
}

fn initial_position(config: &LayoutConfig, id: &str, index: usize, count: usize) -> Vec2 {
    let center = config.center();
    if count <= 1 {
        return center;
    }

    let radius = config.link_distance * 0.5 * (count as f32).sqrt();
    let angle = (index as f32 / count as f32) * TAU;
    center + vec2(angle.cos(), angle.sin()) * radius + id_jitter(id) * 4.0
}

impl ForceLayout {
    /// Starts a simulation over `graph`. Ids present in `seeds` start at
    /// their seeded position; the rest are spread on a circle.
    pub fn new(graph: &RootGraph, config: LayoutConfig, seeds: &HashMap<String, Vec2>) -> Self {
        let config = config.sanitized();
        let count = graph.node_count();

        let mut nodes = Vec::with_capacity(count);
        let mut index_by_id = HashMap::with_capacity(count);
        for (index, node) in graph.nodes.values().enumerate() {
            let position = seeds
                .get(&node.id)
                .copied()
                .filter(|seed| seed.is_finite())
                .unwrap_or_else(|| initial_position(&config, &node.id, index, count));
            index_by_id.insert(node.id.clone(), index);
            nodes.push(LayoutNode {
                id: node.id.clone(),
                position,
                velocity: Vec2::ZERO,
                radius: node_radius(node.occurrences) + config.collision_padding,
                pinned: None,
            });
        }

        let mut degree = vec![0usize; count];
        let mut links = Vec::with_capacity(graph.edge_count());
        for edge in graph.edges.values() {
            let (Some(&source), Some(&target)) =
                (index_by_id.get(&edge.source), index_by_id.get(&edge.target))
            else {
                continue;
            };
            if source == target {
                continue;
            }
            degree[source] += 1;
            degree[target] += 1;
            links.push((source, target, edge.weight.max(1)));
        }

        let edges = links
            .into_iter()
            .map(|(source, target, weight)| {
                let contact = nodes[source].radius + nodes[target].radius;
                let rest_length =
                    (config.link_distance / (1.0 + (weight as f32).ln())).max(contact);
                let smaller_degree = degree[source].min(degree[target]).max(1);
                LayoutEdge {
                    source,
                    target,
                    rest_length,
                    strength: config.link_strength / smaller_degree as f32,
                    bias: degree[source] as f32 / (degree[source] + degree[target]) as f32,
                }
            })
            .collect::<Vec<_>>();

        let (phase, alpha) = if nodes.is_empty() {
            (LayoutPhase::Settled, 0.0)
        } else {
            (LayoutPhase::Initializing, 1.0)
        };
        debug!(nodes = nodes.len(), edges = edges.len(), "layout initialized");

        Self {
            config,
            nodes,
            edges,
            index_by_id,
            alpha,
            alpha_target: 0.0,
            phase,
            ticks: 0,
            pending_seconds: 0.0,
            listeners: Vec::new(),
            scratch: PhysicsScratch::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, LayoutPhase::Initializing | LayoutPhase::Running)
    }

    pub fn position(&self, id: &str) -> Option<Vec2> {
        self.index_by_id.get(id).map(|&index| self.nodes[index].position)
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.index_by_id
            .get(id)
            .is_some_and(|&index| self.nodes[index].pinned.is_some())
    }

    pub fn positions(&self) -> Vec<NodePosition> {
        self.nodes
            .iter()
            .map(|node| NodePosition {
                id: node.id.clone(),
                x: node.position.x,
                y: node.position.y,
            })
            .collect()
    }

    pub fn position_map(&self) -> HashMap<String, Vec2> {
        self.nodes
            .iter()
            .map(|node| (node.id.clone(), node.position))
            .collect()
    }

    pub fn on_tick(&mut self, listener: impl FnMut(&TickFrame<'_>) + 'static) {
        if self.phase != LayoutPhase::Stopped {
            self.listeners.push(Box::new(listener));
        }
    }

    pub(crate) fn take_listeners(&mut self) -> Vec<TickListener> {
        std::mem::take(&mut self.listeners)
    }

    pub(crate) fn extend_listeners(&mut self, listeners: Vec<TickListener>) {
        if self.phase != LayoutPhase::Stopped {
            self.listeners.extend(listeners);
        }
    }

    /// Holds a node at `(x, y)` until `unpin`. The node keeps acting on its
    /// neighbours, and the simulation is reheated while anything is held.
    pub fn pin(&mut self, id: &str, x: f32, y: f32) -> bool {
        if self.phase == LayoutPhase::Stopped || !x.is_finite() || !y.is_finite() {
            return false;
        }
        let Some(&index) = self.index_by_id.get(id) else {
            return false;
        };

        let point = vec2(x, y);
        let node = &mut self.nodes[index];
        node.pinned = Some(point);
        node.position = point;
        node.velocity = Vec2::ZERO;

        self.alpha_target = self.config.drag_alpha_target;
        if self.phase == LayoutPhase::Settled {
            debug!(root = id, "reheating settled layout");
            self.phase = LayoutPhase::Running;
        }
        true
    }

    pub fn unpin(&mut self, id: &str) -> bool {
        let Some(&index) = self.index_by_id.get(id) else {
            return false;
        };
        let was_pinned = self.nodes[index].pinned.take().is_some();
        if !self.nodes.iter().any(|node| node.pinned.is_some()) {
            self.alpha_target = 0.0;
        }
        was_pinned
    }

    /// Halts the simulation for good; no tick runs and no listener fires
    /// after this returns.
    pub fn stop(&mut self) {
        if self.phase != LayoutPhase::Stopped {
            debug!(ticks = self.ticks, "layout stopped");
        }
        self.phase = LayoutPhase::Stopped;
        self.listeners.clear();
        self.pending_seconds = 0.0;
    }

    /// Runs as many fixed-interval ticks as `elapsed_seconds` covers, at most
    /// `max_ticks_per_advance`. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_seconds: f32) -> usize {
        if !self.is_active() {
            self.pending_seconds = 0.0;
            return 0;
        }
        if elapsed_seconds.is_finite() && elapsed_seconds > 0.0 {
            self.pending_seconds += elapsed_seconds;
        }

        let interval = self.config.tick_interval;
        let mut ran = 0;
        while self.pending_seconds >= interval && ran < self.config.max_ticks_per_advance {
            self.pending_seconds -= interval;
            if !self.tick() {
                break;
            }
            ran += 1;
        }

        if ran == self.config.max_ticks_per_advance || !self.is_active() {
            self.pending_seconds = self.pending_seconds.min(interval);
        }
        ran
    }

    /// Ticks until settled. Returns the ticks taken, or `None` when the
    /// budget ran out or the simulation was stopped.
    pub fn run_until_settled(&mut self, max_ticks: u64) -> Option<u64> {
        let start = self.ticks;
        while self.phase != LayoutPhase::Settled {
            if self.ticks - start >= max_ticks || !self.tick() {
                break;
            }
        }
        (self.phase == LayoutPhase::Settled).then(|| self.ticks - start)
    }

    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.phase = LayoutPhase::Running;
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

        self.apply_links();
        self.apply_repulsion();
        self.apply_centering();
        self.apply_collisions();
        self.integrate();

        self.ticks += 1;
        self.notify_listeners();

        if self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min {
            self.phase = LayoutPhase::Settled;
            info!(ticks = self.ticks, "layout settled");
        }
        true
    }

    fn apply_links(&mut self) {
        let alpha = self.alpha;
        for edge in &self.edges {
            let source = &self.nodes[edge.source];
            let target = &self.nodes[edge.target];
            let mut delta = (target.position + target.velocity) - (source.position + source.velocity);
            let mut distance = delta.length();
            if distance <= 0.0001 {
                delta = fallback_direction(edge.source, edge.target) * 0.0001;
                distance = 0.0001;
            }

            let step = delta * ((distance - edge.rest_length) / distance * alpha * edge.strength);
            self.nodes[edge.target].velocity -= step * edge.bias;
            self.nodes[edge.source].velocity += step * (1.0 - edge.bias);
        }
    }

    fn apply_repulsion(&mut self) {
        if self.nodes.len() < 2 || self.config.charge_strength <= 0.0 {
            return;
        }

        self.scratch.positions.clear();
        self.scratch
            .positions
            .extend(self.nodes.iter().map(|node| node.position));
        let positions = &self.scratch.positions;

        let Some(tree) = QuadNode::build(positions) else {
            return;
        };
        let params = RepulsionParams {
            strength: self.config.charge_strength,
            softening: self.config.charge_softening,
            theta: BARNES_HUT_THETA,
        };

        for (index, node) in self.nodes.iter_mut().enumerate() {
            let mut force = Vec2::ZERO;
            accumulate_repulsion_for_node(&tree, index, positions, params, &mut force);
            node.velocity += force * self.alpha;
        }
    }

    fn apply_centering(&mut self) {
        let center = self.config.center();
        let pull = self.config.center_strength * self.alpha;
        for node in &mut self.nodes {
            node.velocity += (center - node.position) * pull;
        }
    }

    /// Not scaled by alpha, so overlaps keep resolving as the layout cools.
    fn apply_collisions(&mut self) {
        if self.nodes.len() < 2 || self.config.collision_strength <= 0.0 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.positions.clear();
        scratch.radii.clear();
        scratch.impulses.clear();
        let mut max_radius = 0.0_f32;
        for node in &self.nodes {
            scratch.positions.push(node.position + node.velocity);
            scratch.radii.push(node.radius);
            scratch.impulses.push(Vec2::ZERO);
            max_radius = max_radius.max(node.radius);
        }

        let Some(tree) = QuadNode::build(&scratch.positions) else {
            return;
        };
        let max_distance = max_radius * 2.0;
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &scratch.positions,
            &scratch.radii,
            CollisionParams {
                strength: self.config.collision_strength,
                max_distance_sq: max_distance * max_distance,
            },
            &mut scratch.impulses,
        );

        for (node, impulse) in self.nodes.iter_mut().zip(&scratch.impulses) {
            node.velocity += *impulse;
        }
    }

    fn integrate(&mut self) {
        let retain = 1.0 - self.config.velocity_decay;
        let max_speed = self.config.max_speed;
        for node in &mut self.nodes {
            if let Some(pinned) = node.pinned {
                node.position = pinned;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= retain;
            let speed_sq = node.velocity.length_sq();
            if speed_sq > max_speed * max_speed {
                node.velocity *= max_speed / speed_sq.sqrt();
            }
            node.position += node.velocity;
        }
    }

    fn notify_listeners(&mut self) {
        if self.listeners.is_empty() {
            return;
        }

        let positions = self.positions();
        let frame = TickFrame {
            tick: self.ticks,
            alpha: self.alpha,
            positions: &positions,
        };
        for listener in &mut self.listeners {
            listener(&frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::corpus::{RootCatalog, Verse, embedded_corpus};
    use crate::graph::build_root_graph;

    fn graph_of(verses: &[&[&str]]) -> RootGraph {
        let verses = verses
            .iter()
            .map(|roots| Verse {
                roots: roots.iter().map(|root| root.to_string()).collect(),
                ..Verse::default()
            })
            .collect::<Vec<_>>();
        build_root_graph(&verses, &RootCatalog::default())
    }

    fn embedded_graph() -> RootGraph {
        let (corpus, catalog) = embedded_corpus().unwrap();
        build_root_graph(corpus.list_surahs()[0].verses.iter(), &catalog)
    }

    fn layout(graph: &RootGraph) -> ForceLayout {
        ForceLayout::new(graph, LayoutConfig::default(), &HashMap::new())
    }

    #[test]
    fn empty_graph_never_ticks() {
        let mut layout = layout(&RootGraph::default());
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        layout.on_tick(move |_| counter.set(counter.get() + 1));

        assert_eq!(layout.phase(), LayoutPhase::Settled);
        assert!(!layout.tick());
        assert_eq!(layout.advance(1.0), 0);
        assert_eq!(layout.run_until_settled(10), Some(0));
        assert_eq!(layout.ticks(), 0);
        assert_eq!(fired.get(), 0);
        assert!(layout.positions().is_empty());
    }

    #[test]
    fn pinned_node_reports_pin_position_every_tick() {
        let graph = graph_of(&[&["A", "B"], &["A", "B", "C"], &["C"]]);
        let mut layout = layout(&graph);

        assert!(layout.pin("A", 10.0, 20.0));
        for _ in 0..25 {
            layout.tick();
            assert_eq!(layout.position("A"), Some(vec2(10.0, 20.0)));
        }
        assert!(layout.is_pinned("A"));

        assert!(layout.unpin("A"));
        assert!(!layout.is_pinned("A"));
        assert!(!layout.unpin("A"));
        assert!(!layout.pin("missing", 0.0, 0.0));
        assert!(!layout.pin("B", f32::NAN, 0.0));
    }

    #[test]
    fn pinned_node_still_pulls_its_neighbours() {
        let graph = graph_of(&[&["A", "B"]]);
        let mut layout = layout(&graph);
        let anchor = vec2(900.0, 900.0);
        layout.pin("A", anchor.x, anchor.y);

        let before = (layout.position("B").unwrap() - anchor).length();
        for _ in 0..200 {
            layout.tick();
        }
        let after = (layout.position("B").unwrap() - anchor).length();
        assert!(after < before * 0.5, "{before} -> {after}");
        assert!(layout.is_active());
    }

    #[test]
    fn settles_within_bounded_ticks_and_then_holds_still() {
        let graph = embedded_graph();
        let mut layout = layout(&graph);

        let ticks = layout.run_until_settled(1_000).unwrap();
        assert!(ticks <= 350, "settled after {ticks} ticks");
        assert_eq!(layout.phase(), LayoutPhase::Settled);

        let settled = layout.positions();
        for _ in 0..20 {
            assert!(!layout.tick());
        }
        assert_eq!(layout.advance(0.5), 0);
        assert_eq!(layout.positions(), settled);
        assert!(settled.iter().all(|node| node.x.is_finite() && node.y.is_finite()));
    }

    #[test]
    fn dragging_reheats_and_release_settles_again() {
        let graph = graph_of(&[&["A", "B"], &["B", "C"]]);
        let mut layout = layout(&graph);
        layout.run_until_settled(1_000).unwrap();

        assert!(layout.pin("B", 40.0, 40.0));
        assert_eq!(layout.phase(), LayoutPhase::Running);
        for _ in 0..400 {
            layout.tick();
        }
        assert!(layout.is_active());
        assert!(layout.alpha() > layout.config().alpha_min);

        layout.unpin("B");
        assert!(layout.run_until_settled(1_000).is_some());
    }

    #[test]
    fn identical_inputs_give_identical_trajectories() {
        let graph = embedded_graph();
        let mut first = layout(&graph);
        let mut second = layout(&graph);
        for _ in 0..60 {
            first.tick();
            second.tick();
        }
        assert_eq!(first.positions(), second.positions());
    }

    #[test]
    fn heavier_edges_settle_shorter() {
        let graph = graph_of(&[
            &["A", "B"],
            &["A", "B"],
            &["A", "B"],
            &["A", "B"],
            &["A", "B"],
            &["A", "C"],
        ]);
        let mut layout = layout(&graph);
        layout.run_until_settled(1_000).unwrap();

        let a = layout.position("A").unwrap();
        let heavy = (layout.position("B").unwrap() - a).length();
        let light = (layout.position("C").unwrap() - a).length();
        assert!(heavy < light, "heavy {heavy} light {light}");
    }

    #[test]
    fn isolated_nodes_stay_finite_and_near_center() {
        let graph = graph_of(&[&["A"], &["B"], &["C"], &["D"]]);
        let mut layout = layout(&graph);
        layout.run_until_settled(1_000).unwrap();

        let center = layout.config().center();
        for node in layout.positions() {
            let offset = vec2(node.x, node.y) - center;
            assert!(offset.is_finite());
            assert!(offset.length() < 400.0, "{} drifted to {offset:?}", node.id);
        }
    }

    #[test]
    fn collisions_keep_circles_apart_without_repulsion() {
        let graph = graph_of(&[&["A"], &["A"], &["B"]]);
        let config = LayoutConfig {
            charge_strength: 0.0,
            ..LayoutConfig::default()
        };
        let mut layout = ForceLayout::new(&graph, config, &HashMap::new());
        layout.run_until_settled(1_000).unwrap();

        let distance = (layout.position("A").unwrap() - layout.position("B").unwrap()).length();
        assert!(distance >= node_radius(2) + node_radius(1), "overlap at {distance}");
    }

    #[test]
    fn seeded_positions_are_reused() {
        let graph = graph_of(&[&["A", "B"]]);
        let seeds = HashMap::from([("A".to_owned(), vec2(1.0, 2.0))]);
        let layout = ForceLayout::new(&graph, LayoutConfig::default(), &seeds);
        assert_eq!(layout.position("A"), Some(vec2(1.0, 2.0)));
        assert_ne!(layout.position("B"), Some(vec2(1.0, 2.0)));
    }

    #[test]
    fn id_jitter_is_bounded_and_repeatable() {
        let jitter = id_jitter("k-t-b");
        assert_eq!(id_jitter("k-t-b"), jitter);
        assert!((-1.0..=1.0).contains(&jitter.x));
        assert!((-1.0..=1.0).contains(&jitter.y));
        assert_ne!(id_jitter("k-t-b"), id_jitter("n-w-r"));
    }

    #[test]
    fn single_node_starts_at_center() {
        let layout = layout(&graph_of(&[&["A"]]));
        assert_eq!(layout.position("A"), Some(LayoutConfig::default().center()));
    }

    #[test]
    fn stop_halts_ticks_and_listeners() {
        let graph = embedded_graph();
        let mut layout = layout(&graph);
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        layout.on_tick(move |frame| {
            assert_eq!(frame.positions.len(), 63);
            counter.set(counter.get() + 1);
        });

        assert_eq!(layout.advance(3.0 / 60.0 + 0.001), 3);
        assert_eq!(fired.get(), 3);

        layout.stop();
        let frozen = layout.positions();
        assert!(!layout.tick());
        assert_eq!(layout.advance(1.0), 0);
        assert!(!layout.pin("j-l-w", 0.0, 0.0));
        assert_eq!(layout.run_until_settled(100), None);
        assert_eq!(layout.positions(), frozen);
        assert_eq!(fired.get(), 3);
        assert_eq!(layout.phase(), LayoutPhase::Stopped);
    }

    #[test]
    fn advance_caps_ticks_per_call() {
        let graph = graph_of(&[&["A", "B"]]);
        let mut layout = layout(&graph);
        assert_eq!(layout.advance(10.0), 8);
        assert_eq!(layout.advance(0.0), 1);
        assert_eq!(layout.advance(-1.0), 0);
        assert_eq!(layout.advance(f32::NAN), 0);
    }

    #[test]
    fn sanitized_config_replaces_bad_values() {
        let config = LayoutConfig {
            alpha_decay: f32::NAN,
            velocity_decay: 7.0,
            max_ticks_per_advance: 0,
            ..LayoutConfig::default()
        }
        .sanitized();
        assert_eq!(config.alpha_decay, LayoutConfig::default().alpha_decay);
        assert_eq!(config.velocity_decay, 1.0);
        assert_eq!(config.max_ticks_per_advance, 1);
    }
}
