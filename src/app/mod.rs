use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Context};
use log::{error, info};

use crate::notes::{Note, NoteGraph, NoteSource};

mod graph;
mod physics;
mod scheduler;
mod search;
mod tasks;
mod ui;

pub use physics::PhysicsConfig;

use scheduler::FrameLoop;
use search::SearchMatchCache;
use tasks::Pending;
use ui::{Mutation, NoteDetail, NoteEditor, RemoteSearch};

pub struct NoteGraphApp {
    source: NoteSource,
    physics: PhysicsConfig,
    state: AppState,
}

enum AppState {
    Loading { task: Pending<NoteGraph> },
    Ready(Box<ViewModel>),
    Error(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ActiveView {
    Notes,
    Graph,
}

struct ViewModel {
    source: NoteSource,
    physics: PhysicsConfig,
    notes: NoteGraph,
    view: ActiveView,
    search: String,
    remote_search: RemoteSearch,
    selected: Option<String>,
    detail: Option<NoteDetail>,
    editor: Option<NoteEditor>,
    mutation: Option<Pending<Mutation>>,
    reload: Option<Pending<NoteGraph>>,
    status: Option<String>,
    frame_loop: Option<FrameLoop>,
    graph_revision: u64,
    search_match_cache: Option<SearchMatchCache>,
    node_click_tx: Sender<String>,
    node_click_rx: Receiver<String>,
}

impl ViewModel {
    fn new(source: NoteSource, physics: PhysicsConfig, notes: NoteGraph) -> Self {
        let (node_click_tx, node_click_rx) = mpsc::channel();
        Self {
            source,
            physics,
            notes,
            view: ActiveView::Notes,
            search: String::new(),
            remote_search: RemoteSearch::default(),
            selected: None,
            detail: None,
            editor: None,
            mutation: None,
            reload: None,
            status: None,
            frame_loop: None,
            graph_revision: 0,
            search_match_cache: None,
            node_click_tx,
            node_click_rx,
        }
    }

    fn note(&self, id: &str) -> Option<&Note> {
        self.notes.note(id)
    }
}

impl NoteGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, source: NoteSource, physics: PhysicsConfig) -> Self {
        let state = Self::start_load(&source);
        Self {
            source,
            physics,
            state,
        }
    }

    fn start_load(source: &NoteSource) -> AppState {
        info!("event=graph_load_started source={}", source.label());
        let source = source.clone();
        AppState::Loading {
            task: Pending::spawn(move || source.load()),
        }
    }
}

impl eframe::App for NoteGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { task } => {
                if let Some(result) = task.poll() {
                    transition = Some(match result {
                        Ok(notes) => AppState::Ready(Box::new(ViewModel::new(
                            self.source.clone(),
                            self.physics,
                            notes,
                        ))),
                        Err(message) => {
                            error!("event=graph_load_failed error={message}");
                            AppState::Error(message)
                        }
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading notes...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load notes");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.source));
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
