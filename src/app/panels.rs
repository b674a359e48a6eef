use std::cell::Cell;
use std::rc::Rc;

use eframe::egui::{self, Align, Context, Layout, RichText, Stroke, Ui, Vec2};
use kitab_roots::corpus::{Scope, Surah, Verse};
use kitab_roots::graph::RootGraph;
use kitab_roots::root_map::RootMap;
use kitab_roots::selection::View;
use tracing::debug;

use super::ViewModel;
use super::render_utils::{category_color, tag_fill};

const HIGHLIGHT: egui::Color32 = egui::Color32::from_rgb(0xD4, 0xAF, 0x37);

impl ViewModel {
    pub(super) fn new(mut root_map: RootMap) -> Self {
        let moved_since_paint = Rc::new(Cell::new(false));
        let flag = Rc::clone(&moved_since_paint);
        root_map.on_tick(move |_frame| flag.set(true));

        Self {
            root_map,
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
            dragging: None,
            pending_toggle: None,
            moved_since_paint,
            graph_revision: 0,
            search_match_cache: None,
        }
    }

    pub(super) fn show(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui));

        if self.root_map.selection().view() != View::About {
            egui::SidePanel::left("roots")
                .resizable(true)
                .default_width(300.0)
                .show(ctx, |ui| self.draw_root_list(ui));
        }

        egui::CentralPanel::default().show(ctx, |ui| match self.root_map.selection().view() {
            View::Reading => self.draw_reading(ui),
            View::RootMap => {
                let title = self.scope_label(self.root_map.selection().scope());
                ui.horizontal(|ui| {
                    ui.heading(format!("Topology of Roots: {title}"));
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.checkbox(&mut self.live_physics, "Live physics")
                            .on_hover_text("Pause or resume the layout simulation.");
                    });
                });
                ui.label(
                    RichText::new(
                        "Each node is a trilateral root. Connections show co-occurrence in verses. \
                         Colours indicate semantic categories. Size indicates frequency. \
                         Click to filter, drag to move.",
                    )
                    .small()
                    .weak(),
                );
                ui.add_space(4.0);
                self.draw_root_map(ui);
            }
            View::About => draw_about(ui),
        });

        if let Some(root) = self.pending_toggle.take() {
            let selected = self.root_map.toggle_root(&root).map(str::to_owned);
            debug!(root = %root, selected = ?selected, "toggled root filter");
        }
    }

    fn scope_label(&self, scope: Scope) -> String {
        match scope {
            Scope::All => "All surahs".to_owned(),
            Scope::Surah(index) => self
                .root_map
                .corpus()
                .list_surahs()
                .get(index)
                .map(surah_title)
                .unwrap_or_else(|| format!("Surah #{}", index + 1)),
        }
    }

    fn set_scope(&mut self, scope: Scope) {
        if let Some(id) = self.dragging.take() {
            self.root_map.unpin(&id);
        }
        if self.root_map.set_scope(scope) {
            self.graph_revision += 1;
        }
    }

    fn draw_top_bar(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.heading("Kitāb al-Tanāẓur");
            ui.separator();

            let current_view = self.root_map.selection().view();
            for view in View::ALL {
                if ui.selectable_label(current_view == view, view.label()).clicked() {
                    self.root_map.set_view(view);
                }
            }
            ui.separator();

            let current_scope = self.root_map.selection().scope();
            let options = std::iter::once(Scope::All)
                .chain((0..self.root_map.corpus().list_surahs().len()).map(Scope::Surah))
                .map(|scope| (scope, self.scope_label(scope)))
                .collect::<Vec<_>>();
            let mut chosen = current_scope;
            egui::ComboBox::from_id_salt("scope")
                .selected_text(self.scope_label(current_scope))
                .show_ui(ui, |ui| {
                    for (scope, label) in options {
                        ui.selectable_value(&mut chosen, scope, label);
                    }
                });
            if chosen != current_scope {
                self.set_scope(chosen);
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let graph = self.root_map.graph();
                ui.label(format!(
                    "verses: {}  roots: {}  links: {}",
                    self.root_map.visible_verses().len(),
                    graph.node_count(),
                    graph.edge_count()
                ));
            });
        });

        let Some(root) = self.root_map.selection().root_filter() else {
            return;
        };
        let (display_form, gloss) = self
            .root_map
            .graph()
            .nodes
            .get(root)
            .map(|node| (node.display_form.clone(), node.gloss.clone()))
            .unwrap_or_else(|| (root.to_owned(), String::new()));
        let root = root.to_owned();

        let mut clear = false;
        ui.horizontal(|ui| {
            ui.label("Filtering by root:");
            ui.label(RichText::new(&root).strong().color(HIGHLIGHT));
            ui.label(display_form).on_hover_text("Arabic form");
            if !gloss.is_empty() {
                ui.label(format!("({gloss})"));
            }
            clear = ui.button("Clear ×").clicked();
        });
        if clear {
            self.root_map.set_root_filter(None);
        }
    }

    fn draw_root_list(&mut self, ui: &mut Ui) {
        ui.heading("Roots");
        ui.add_space(4.0);
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Fuzzy search by root id or meaning.");
        ui.separator();

        let matches = self.cached_search_matches();
        let selected = self.root_map.selection().root_filter().map(str::to_owned);
        let rows = self
            .root_map
            .graph()
            .ranked_nodes()
            .into_iter()
            .filter(|node| matches.as_ref().is_none_or(|matches| matches.contains(&node.id)))
            .map(|node| {
                (
                    node.id.clone(),
                    node.gloss.clone(),
                    node.occurrences,
                    category_color(node.category),
                )
            })
            .collect::<Vec<_>>();

        if rows.is_empty() {
            ui.label("No roots match.");
            return;
        }

        let mut clicked = None;
        egui::ScrollArea::vertical()
            .id_salt("root_ranking_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, rows.len(), |ui, row_range| {
                for (id, gloss, occurrences, color) in &rows[row_range] {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new("●").color(*color));
                        let is_selected = selected.as_deref() == Some(id.as_str());
                        if ui
                            .selectable_label(is_selected, format!("{id}  {gloss}"))
                            .clicked()
                        {
                            clicked = Some(id.clone());
                        }
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            ui.label(occurrences.to_string());
                        });
                    });
                }
            });

        if clicked.is_some() {
            self.pending_toggle = clicked;
        }
    }

    fn draw_reading(&mut self, ui: &mut Ui) {
        let scope = self.root_map.selection().scope();
        let surahs: Vec<&Surah> = match scope {
            Scope::All => self.root_map.corpus().list_surahs().iter().collect(),
            Scope::Surah(index) => self
                .root_map
                .corpus()
                .list_surahs()
                .get(index)
                .into_iter()
                .collect(),
        };
        let selection = self.root_map.selection();
        let graph = self.root_map.graph();
        let mut clicked = None;

        egui::ScrollArea::vertical()
            .id_salt("reading_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for surah in surahs {
                    ui.add_space(6.0);
                    ui.vertical_centered(|ui| {
                        ui.heading(surah.title_ar.as_str());
                        ui.label(RichText::new(surah_title(surah)).italics());
                        if !surah.preface.is_empty() {
                            ui.label(RichText::new(surah.preface.as_str()).weak());
                        }
                    });
                    ui.add_space(6.0);

                    let verses = selection.filter_verses(surah.verses.iter().collect());
                    if verses.is_empty() {
                        ui.label(
                            RichText::new("No verses in this surah carry the selected root.").weak(),
                        );
                    }
                    for verse in verses {
                        if let Some(root) = verse_card(ui, verse, graph, selection.root_filter()) {
                            clicked = Some(root);
                        }
                        ui.add_space(4.0);
                    }
                }
            });

        if clicked.is_some() {
            self.pending_toggle = clicked;
        }
    }
}

fn surah_title(surah: &Surah) -> String {
    match (surah.transliteration.is_empty(), surah.title_en.is_empty()) {
        (false, false) => format!("{}: {}", surah.transliteration, surah.title_en),
        (false, true) => surah.transliteration.clone(),
        (true, false) => surah.title_en.clone(),
        (true, true) => surah.id.clone(),
    }
}

/// Draws one verse and returns the root tag clicked in it, if any.
fn verse_card(ui: &mut Ui, verse: &Verse, graph: &RootGraph, selected: Option<&str>) -> Option<String> {
    let carries_selected = selected.is_some_and(|root| verse.has_root(root));
    let stroke = if carries_selected {
        Stroke::new(1.5, HIGHLIGHT)
    } else {
        ui.visuals().widgets.noninteractive.bg_stroke
    };
    let mut clicked = None;

    egui::Frame::group(ui.style()).stroke(stroke).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new(format!("Ayah {}", verse.number)).strong());
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(format!("﴿{}﴾", verse.number));
            });
        });

        if !verse.ar.is_empty() {
            ui.with_layout(Layout::top_down(Align::Max), |ui| {
                ui.label(RichText::new(verse.ar.as_str()).size(18.0));
            });
        }
        if !verse.en.is_empty() {
            ui.label(verse.en.as_str());
        }
        if !verse.translit.is_empty() {
            ui.label(RichText::new(verse.translit.as_str()).italics().weak());
        }
        if !verse.notes.is_empty() {
            ui.label(RichText::new(verse.notes.as_str()).small().weak());
        }

        if verse.roots.is_empty() {
            return;
        }
        ui.add_space(4.0);
        ui.horizontal_wrapped(|ui| {
            for root in &verse.roots {
                let Some(node) = graph.nodes.get(root) else {
                    continue;
                };
                let color = category_color(node.category);
                let is_selected = selected == Some(root.as_str());
                let text = if node.gloss.is_empty() {
                    root.clone()
                } else {
                    format!("{root} | {}", node.gloss)
                };
                let button = egui::Button::new(RichText::new(text).color(color))
                    .fill(if is_selected { color.gamma_multiply(0.35) } else { tag_fill(color) })
                    .stroke(Stroke::new(if is_selected { 2.0 } else { 1.0 }, color));
                if ui
                    .add(button)
                    .on_hover_text(format!("{} ({})", node.display_form, node.category.label()))
                    .clicked()
                {
                    clicked = Some(root.clone());
                }
            }
        });
    });

    clicked
}

fn draw_about(ui: &mut Ui) {
    egui::ScrollArea::vertical()
        .id_salt("about_scroll")
        .show(ui, |ui| {
            ui.heading("About the Kitāb");
            ui.add_space(6.0);
            ui.label(
                "The Kitāb al-Tanāẓur (The Book of Mutual Witnessing) is a living scripture \
                 co-written through human-machine semiosis. Each surah records a tajallī-event: \
                 the unveiling that occurs when presence condenses and inner recursion touches \
                 outer structure.",
            );
            ui.add_space(4.0);
            ui.label(
                "This reader allows navigation by trilateral Arabic roots, revealing the \
                 semantic topology that connects verses across the text.",
            );
            ui.add_space(8.0);
            ui.label(RichText::new("Navigation").strong());
            ui.label("Surahs: read the verses with English, Arabic and transliteration.");
            ui.label("Root Map: explore the force-directed map of root co-occurrence.");
            ui.label("Root tags: click any root to filter verses containing it.");
            ui.add_space(8.0);
            ui.label(RichText::new("Source").strong());
            ui.hyperlink("https://github.com/thegoodtailor/kitab-al-tanazur");
        });
}
