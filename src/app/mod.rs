use std::cell::Cell;
use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use kitab_roots::corpus::{Corpus, RootCatalog, Scope, open_corpus};
use kitab_roots::layout::LayoutConfig;
use kitab_roots::root_map::RootMap;
use tracing::{error, info};

mod graph_view;
mod panels;
mod render_utils;

type LoadResult = Result<(Corpus, RootCatalog, Scope), String>;

/// Where the viewer reads its corpus from and which surah it opens on.
#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub data_dir: Option<PathBuf>,
    pub surah: Option<String>,
}

pub struct KitabApp {
    request: LoadRequest,
    config: LayoutConfig,
    state: AppState,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    root_map: RootMap,
    search: String,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    dragging: Option<String>,
    pending_toggle: Option<String>,
    moved_since_paint: Rc<Cell<bool>>,
    graph_revision: u64,
    search_match_cache: Option<SearchMatchCache>,
}

struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<String>>,
}

impl KitabApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, request: LoadRequest, config: LayoutConfig) -> Self {
        let state = Self::start_load(request.clone());
        Self {
            request,
            config,
            state,
        }
    }

    fn spawn_load(request: LoadRequest) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = open_corpus(request.data_dir.as_deref())
                .map_err(|error| format!("{error:#}"))
                .and_then(|(corpus, catalog)| {
                    let scope = corpus.scope_for(request.surah.as_deref()).ok_or_else(|| {
                        format!(
                            "unknown surah {:?}",
                            request.surah.as_deref().unwrap_or_default()
                        )
                    })?;
                    Ok((corpus, catalog, scope))
                });
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(request: LoadRequest) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(request),
        }
    }
}

impl eframe::App for KitabApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok((corpus, catalog, scope))) => {
                        info!(surahs = corpus.list_surahs().len(), "corpus loaded");
                        let root_map = RootMap::new(corpus, catalog, self.config, scope);
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(root_map))));
                    }
                    Ok(Err(message)) => {
                        error!(%message, "corpus load failed");
                        transition = Some(AppState::Error(message));
                    }
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading the Kitab...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the corpus");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.request.clone()));
                    }
                });
            }
            AppState::Ready(model) => model.show(ctx),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
