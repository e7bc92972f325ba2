//! Action name → handler dispatch. The UI only queues [`Command`]s; all
//! state changes happen here, after the frame is laid out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use eframe::egui;
use rfd::FileDialog;

use crate::app::{visuals_for, ThumbnailApp};
use crate::editor::{EditorImage, Tool, EDITED_FILENAME};
use crate::model::{CardState, LoadResult, Notice, ThumbnailCard};
use crate::resolver::resolve;
use crate::thumbnail::{build_addresses, fetch_thumbnail, Quality};
use crate::RUNTIME;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    FetchThumbnails,
    ToggleTheme,
    SetLanguage(String),
    DownloadThumbnail(Quality),
    OpenEditor(Quality),
    CloseEditor,
    ToggleFaq(usize),
    SelectTool(Tool),
    AddText,
    UndoAnnotation,
    ClearAnnotations,
    DownloadEdited,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::FetchThumbnails => "fetch-thumbnails",
            Command::ToggleTheme => "toggle-theme",
            Command::SetLanguage(_) => "set-language",
            Command::DownloadThumbnail(_) => "download-thumbnail",
            Command::OpenEditor(_) => "open-editor",
            Command::CloseEditor => "close-editor",
            Command::ToggleFaq(_) => "toggle-faq",
            Command::SelectTool(_) => "select-tool",
            Command::AddText => "add-text",
            Command::UndoAnnotation => "undo-annotation",
            Command::ClearAnnotations => "clear-annotations",
            Command::DownloadEdited => "download-edited",
        }
    }
}

impl ThumbnailApp {
    pub fn dispatch(&mut self, ctx: &egui::Context, command: Command) {
        tracing::debug!(action = command.name(), "dispatch");
        match command {
            Command::FetchThumbnails => self.fetch_thumbnails(ctx),
            Command::ToggleTheme => self.toggle_theme(ctx),
            Command::SetLanguage(lang) => self.set_language(&lang),
            Command::DownloadThumbnail(quality) => self.download_thumbnail(quality),
            Command::OpenEditor(quality) => self.open_editor(quality),
            Command::CloseEditor => self.editor.close(),
            Command::ToggleFaq(index) => self.faq.toggle(index),
            Command::SelectTool(tool) => {
                tracing::debug!(tool = tool.name(), "tool selected");
                self.editor.select_tool(tool);
            }
            Command::AddText => {
                self.editor.add_text();
            }
            Command::UndoAnnotation => {
                self.editor.undo();
            }
            Command::ClearAnnotations => self.editor.clear(),
            Command::DownloadEdited => self.download_edited(),
        }
    }

    fn fetch_thumbnails(&mut self, ctx: &egui::Context) {
        // 1. Validate the trimmed input
        let input = self.url_input.trim();
        if input.is_empty() {
            self.notice = Some(Notice::Error(self.tr.t("enter-url").to_string()));
            return;
        }
        let Some(video_id) = resolve(input) else {
            tracing::info!(input, "unresolvable video URL");
            self.notice = Some(Notice::Error(self.tr.t("invalid-url").to_string()));
            return;
        };

        // 2. Start a new generation so late results from the last lookup are dropped
        self.notice = None;
        self.generation += 1;
        let set = build_addresses(&video_id);
        tracing::info!(video_id = %video_id, generation = self.generation, "thumbnail lookup");

        // 3. One loading card per quality, then kick off the downloads
        self.cards = set
            .iter()
            .map(|(quality, url)| ThumbnailCard::loading(quality, url))
            .collect();
        self.spawn_loads(ctx);
        self.lookup = Some(set);
    }

    /// One blocking-pool task per card; results land in `load_results`.
    fn spawn_loads(&mut self, ctx: &egui::Context) {
        let Some(rt) = RUNTIME.get() else {
            tracing::error!("runtime not initialized, thumbnails cannot load");
            return;
        };
        let timeout = self.config.request_timeout();
        for card in &self.cards {
            // Each task owns its copies; the card list may change before it finishes
            let generation = self.generation;
            let quality = card.quality;
            let url = card.url.clone();
            let results = Arc::clone(&self.load_results);
            let ctx_c = ctx.clone();
            rt.spawn_blocking(move || {
                let result = fetch_thumbnail(&url, timeout);
                // Hand the result back and wake the UI so the next frame drains it
                results
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(LoadResult {
                        generation,
                        quality,
                        result,
                    });
                ctx_c.request_repaint();
            });
        }
    }

    fn toggle_theme(&mut self, ctx: &egui::Context) {
        if let Err(e) = self.prefs.toggle_theme(self.store.as_mut()) {
            tracing::warn!("could not save theme preference: {e}");
        }
        ctx.set_visuals(visuals_for(self.prefs.theme));
    }

    fn set_language(&mut self, lang: &str) {
        if let Err(e) = self.prefs.set_language(lang, self.store.as_mut()) {
            tracing::warn!("could not save language preference: {e}");
        }
        self.tr.set_language(lang);
    }

    fn loaded_card(&self, quality: Quality) -> Option<&ThumbnailCard> {
        self.cards
            .iter()
            .find(|c| c.quality == quality && !c.is_loading())
    }

    fn download_thumbnail(&mut self, quality: Quality) {
        let (Some(set), Some(card)) = (&self.lookup, self.loaded_card(quality)) else {
            return;
        };
        let CardState::Loaded { bytes, .. } = &card.state else {
            return;
        };
        let name = set.download_name(quality);
        let outcome = save_with_dialog(&self.config.download_dir, &name, bytes);
        self.report_save(outcome);
    }

    fn open_editor(&mut self, quality: Quality) {
        let Some(card) = self.loaded_card(quality) else {
            return;
        };
        let CardState::Loaded { texture, pixels, .. } = &card.state else {
            return;
        };
        let image = EditorImage {
            pixels: pixels.clone(),
            texture: texture.clone(),
        };
        let url = card.url.clone();
        self.editor.open(&url, image);
        tracing::debug!(%url, "editor opened");
    }

    fn download_edited(&mut self) {
        let bytes = match self.editor.export_jpeg() {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("export failed: {e}");
                self.notice = Some(Notice::Error(format!("{}: {e}", self.tr.t("save-failed"))));
                return;
            }
        };
        let outcome = save_with_dialog(&self.config.download_dir, EDITED_FILENAME, &bytes);
        self.report_save(outcome);
    }

    fn report_save(&mut self, outcome: std::io::Result<Option<PathBuf>>) {
        match outcome {
            Ok(Some(path)) => {
                tracing::info!("saved {}", path.display());
                self.notice = Some(Notice::Info(format!(
                    "{} {}",
                    self.tr.t("saved-to"),
                    path.display()
                )));
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("save failed: {e}");
                self.notice = Some(Notice::Error(format!("{}: {e}", self.tr.t("save-failed"))));
            }
        }
    }
}

/// Asks for a destination and writes `bytes` there. `Ok(None)` if cancelled.
fn save_with_dialog(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<Option<PathBuf>> {
    let Some(path) = FileDialog::new()
        .set_directory(dir)
        .set_file_name(file_name)
        .add_filter("JPEG image", &["jpg", "jpeg"])
        .save_file()
    else {
        return Ok(None);
    };
    std::fs::write(&path, bytes)?;
    Ok(Some(path))
}
