use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Ui, Vec2, vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use kitab_roots::layout::node_radius;
use kitab_roots::root_map::NodeView;

use super::render_utils::{
    blend_color, category_color, circle_visible, dim_color, draw_background, screen_to_world,
    world_to_screen,
};
use super::{SearchMatchCache, ViewModel};

const SELECTED_STROKE: Color32 = Color32::WHITE;
const EDGE_COLOR: Color32 = Color32::from_rgba_premultiplied(54, 50, 46, 110);
const EDGE_HIGHLIGHT: Color32 = Color32::from_rgb(0xD4, 0xAF, 0x37);
const LABEL_COLOR: Color32 = Color32::from_rgb(0xE0, 0xD5, 0xC1);

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

struct ScreenNode {
    position: Pos2,
    radius: f32,
}

impl ViewModel {
    /// Root ids whose id or gloss fuzzy-matches the search box.
    pub(super) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<String>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.graph_revision == self.graph_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matcher = SkimMatcherV2::default();
        let matches = self
            .root_map
            .graph()
            .nodes
            .values()
            .filter(|node| {
                fuzzy_match_score(&matcher, &node.id, query).is_some()
                    || fuzzy_match_score(&matcher, &node.gloss, query).is_some()
            })
            .map(|node| node.id.clone())
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            graph_revision: self.graph_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, origin: Vec2, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, origin, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(0.2, 6.0);
        self.pan = pointer - rect.center() - ((world_before - origin) * self.zoom);
    }

    fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    fn screen_nodes(&self, rect: Rect, origin: Vec2, nodes: &[NodeView]) -> Vec<ScreenNode> {
        nodes
            .iter()
            .map(|node| ScreenNode {
                position: world_to_screen(rect, self.pan, self.zoom, origin, vec2(node.x, node.y)),
                radius: (node_radius(node.occurrences) * self.zoom).clamp(2.5, 80.0),
            })
            .collect()
    }

    fn hovered_index(ui: &Ui, screen: &[ScreenNode]) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        screen
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let distance = node.position.distance(pointer);
                (distance <= node.radius).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }

    /// Primary drag pins the grabbed root to the pointer until release; a
    /// primary click toggles the root filter.
    fn handle_node_interaction(
        &mut self,
        ui: &Ui,
        rect: Rect,
        origin: Vec2,
        response: &egui::Response,
        hovered: Option<&str>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(id) = hovered
        {
            self.dragging = Some(id.to_owned());
        }

        if let Some(id) = &self.dragging
            && response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = ui.input(|input| input.pointer.interact_pos())
        {
            let world = screen_to_world(rect, self.pan, self.zoom, origin, pointer);
            self.root_map.pin(id, world.x, world.y);
        }

        if response.drag_stopped()
            && let Some(id) = self.dragging.take()
        {
            self.root_map.unpin(&id);
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(id) = hovered
        {
            self.pending_toggle = Some(id.to_owned());
        }
    }

    pub(super) fn draw_root_map(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let origin = self.root_map.layout().config().center();

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, origin, &response);
        self.handle_graph_pan(&response);

        let before = self.root_map.current_nodes();
        let hovered = {
            let screen = self.screen_nodes(rect, origin, &before);
            Self::hovered_index(ui, &screen).map(|index| before[index].id.clone())
        };
        self.handle_node_interaction(ui, rect, origin, &response, hovered.as_deref());

        if hovered.is_some() || self.dragging.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = if self.dragging.is_some() {
                    egui::CursorIcon::Grabbing
                } else {
                    egui::CursorIcon::PointingHand
                };
            });
        }

        if self.live_physics {
            let frame_delta_seconds = ui
                .ctx()
                .input(|input| input.stable_dt)
                .clamp(1.0 / 240.0, 1.0 / 20.0);
            self.root_map.advance(frame_delta_seconds);
        }

        let nodes = self.root_map.current_nodes();
        if nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No roots in this scope.",
                FontId::proportional(15.0),
                Color32::from_gray(170),
            );
            return;
        }

        let search_matches = self.cached_search_matches();
        let screen = self.screen_nodes(rect, origin, &nodes);
        let index_by_id = nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.as_str(), index))
            .collect::<HashMap<_, _>>();

        let selected = self.root_map.selection().root_filter();
        let neighbours = selected
            .map(|id| {
                self.root_map
                    .graph()
                    .neighbors(id)
                    .map(|(neighbour, _)| neighbour)
                    .collect::<HashSet<_>>()
            })
            .unwrap_or_default();
        let is_highlighted =
            |id: &str| selected.is_none_or(|selected| selected == id || neighbours.contains(id));

        for edge in self.root_map.current_edges() {
            let (Some(&a), Some(&b)) =
                (index_by_id.get(edge.a.as_str()), index_by_id.get(edge.b.as_str()))
            else {
                continue;
            };
            let incident = selected.is_some_and(|id| id == edge.a || id == edge.b);
            let color = if incident {
                blend_color(EDGE_COLOR, EDGE_HIGHLIGHT, 0.7)
            } else if selected.is_some() {
                dim_color(EDGE_COLOR, 0.35)
            } else {
                blend_color(EDGE_COLOR, LABEL_COLOR, 0.25)
            };
            let width = (edge.weight as f32).sqrt() * self.zoom.sqrt().clamp(0.6, 1.8);
            painter.line_segment([screen[a].position, screen[b].position], Stroke::new(width, color));
        }

        let hovered_index = hovered
            .as_deref()
            .and_then(|id| index_by_id.get(id).copied());

        for (index, node) in nodes.iter().enumerate() {
            let ScreenNode { position, radius } = screen[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_selected = selected == Some(node.id.as_str());
            let is_search_match = search_matches
                .as_ref()
                .is_some_and(|matches| matches.contains(&node.id));
            let is_hovered = hovered_index == Some(index);

            let base = category_color(node.category);
            let fill = if !is_highlighted(&node.id) {
                dim_color(base, 0.3)
            } else if is_search_match {
                blend_color(base, Color32::WHITE, 0.35)
            } else {
                base
            };
            painter.circle_filled(position, radius, dim_color(fill, 0.92));

            let stroke = if is_selected {
                Stroke::new(3.0, SELECTED_STROKE)
            } else if is_search_match {
                Stroke::new(2.0, Color32::from_rgb(250, 220, 120))
            } else if is_hovered {
                Stroke::new(1.5, LABEL_COLOR)
            } else {
                Stroke::NONE
            };
            if stroke != Stroke::NONE {
                painter.circle_stroke(position, radius, stroke);
            }

            let should_draw_label = is_selected
                || is_hovered
                || is_search_match
                || (is_highlighted(&node.id) && self.zoom > 0.7);
            if should_draw_label {
                painter.text(
                    position - vec2(0.0, radius + 4.0),
                    Align2::CENTER_BOTTOM,
                    &node.id,
                    FontId::proportional(11.0),
                    LABEL_COLOR,
                );
            }
        }

        if let Some(index) = hovered_index {
            let node = &nodes[index];
            let panel_text = format!(
                "{}  |  {}  |  {}  |  {} occurrence{}",
                node.id,
                node.gloss,
                node.category.label(),
                node.occurrences,
                if node.occurrences == 1 { "" } else { "s" }
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        let moved = self.moved_since_paint.replace(false);
        if moved || self.root_map.is_animating() || self.dragging.is_some() {
            ui.ctx().request_repaint();
        }
    }
}
