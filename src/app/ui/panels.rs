use std::time::Duration;

use eframe::egui::{self, Align, Context, Layout};
use log::{info, warn};

use crate::notes::NoteGraph;

use super::super::tasks::Pending;
use super::super::{ActiveView, ViewModel};

impl ViewModel {
    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        let now = ctx.input(|input| input.time);
        let mut busy = self.poll_background(now);

        if self.view != ActiveView::Graph {
            self.deactivate_graph();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("notegraph");
                    ui.separator();
                    ui.label(self.source.label());
                    ui.label(format!("notes: {}", self.notes.notes.len()));
                    ui.label(format!("links: {}", self.notes.links.len()));
                    let reload_button =
                        ui.add_enabled(self.reload.is_none(), egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        self.start_reload();
                    }
                    if self.reload.is_some() || self.mutation.is_some() {
                        ui.spinner();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if let Some(status) = &self.status {
                            ui.label(status.as_str());
                        }
                    });
                });
            });

        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_sidebar(ui, now));

        egui::CentralPanel::default().show(ctx, |ui| match self.view {
            ActiveView::Graph => self.draw_graph(ui),
            ActiveView::Notes if self.editor.is_some() => self.draw_editor(ui),
            ActiveView::Notes => self.draw_details(ui),
        });

        busy |= self.reload.is_some() || self.mutation.is_some();
        if busy {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }

    /// Drains finished background work. Returns `true` while any of it is
    /// still outstanding.
    fn poll_background(&mut self, now: f64) -> bool {
        while let Ok(id) = self.node_click_rx.try_recv() {
            self.open_note(&id);
            self.view = ActiveView::Notes;
        }

        if let Some(result) = self.reload.as_ref().and_then(Pending::poll) {
            self.reload = None;
            match result {
                Ok(notes) => self.apply_notes(notes),
                Err(message) => {
                    warn!("event=graph_reload_failed error={message}");
                    self.status = Some(message);
                }
            }
        }

        if let Some(result) = self.mutation.as_ref().and_then(Pending::poll) {
            self.mutation = None;
            self.apply_mutation(result);
        }

        let detail_busy = self.detail.as_mut().is_some_and(|detail| detail.poll());
        let search_busy = self
            .remote_search
            .update(self.source.client(), &self.search, now);

        detail_busy || search_busy
    }

    pub(in crate::app) fn start_reload(&mut self) {
        if self.reload.is_some() {
            return;
        }
        info!("event=graph_reload_started source={}", self.source.label());
        let source = self.source.clone();
        self.reload = Some(Pending::spawn(move || source.load()));
    }

    fn apply_notes(&mut self, notes: NoteGraph) {
        self.notes = notes;
        self.deactivate_graph();
        self.graph_revision = self.graph_revision.wrapping_add(1);
        self.search_match_cache = None;

        match self.selected.clone() {
            Some(id) if self.note(&id).is_some() => {
                let editing = self.editor.take();
                self.open_note(&id);
                self.editor = editing;
            }
            Some(_) | None => {
                self.selected = None;
                self.detail = None;
            }
        }
    }

    /// Stops the mounted layout so it is rebuilt from the current notes the
    /// next time the graph view is shown.
    pub(in crate::app) fn deactivate_graph(&mut self) {
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
    }
}
