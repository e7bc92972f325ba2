//! egui window: lays out the page and queues commands for the dispatcher.

use std::sync::{Arc, Mutex};

use eframe::egui::{
    self, vec2, Button, Color32, Id, Key, RichText, ScrollArea, TextEdit, TextureOptions, Visuals,
};
use eframe::{App, Frame};

use crate::commands::Command;
use crate::config::AppConfig;
use crate::editor::{self, EditorState, Tool, MAX_TEXT_SIZE, MIN_TEXT_SIZE};
use crate::faq::Accordion;
use crate::i18n::{language_name, Translator, LANGUAGES};
use crate::model::{CardState, LoadResult, Notice, ThumbnailCard};
use crate::preferences::{PreferenceStore, Preferences, Theme};
use crate::thumbnail::ThumbnailSet;

const CARD_IMAGE_WIDTH: f32 = 240.0;
const CANVAS_SIZE: [f32; 2] = [560.0, 420.0];

pub fn visuals_for(theme: Theme) -> Visuals {
    match theme {
        Theme::Light => Visuals::light(),
        Theme::Dark => Visuals::dark(),
    }
}

/// Application state for the GUI
pub struct ThumbnailApp {
    pub(crate) config: AppConfig,
    /// Where preference changes are written
    pub(crate) store: Box<dyn PreferenceStore>,
    pub(crate) prefs: Preferences,
    pub(crate) tr: Translator,
    /// Input field for the video URL
    pub(crate) url_input: String,
    pub(crate) notice: Option<Notice>,
    /// Addresses of the current lookup
    pub(crate) lookup: Option<ThumbnailSet>,
    /// Cards still shown; failed loads are removed
    pub(crate) cards: Vec<ThumbnailCard>,
    /// Bumped on every lookup so late results of older ones are dropped
    pub(crate) generation: u64,
    /// Incoming thumbnail load results from the blocking pool
    pub(crate) load_results: Arc<Mutex<Vec<LoadResult>>>,
    pub(crate) faq: Accordion,
    pub(crate) editor: EditorState,
    /// Commands queued while drawing, run after the frame is laid out
    pending: Vec<Command>,
}

impl ThumbnailApp {
    pub fn new(config: AppConfig, store: Box<dyn PreferenceStore>, system_dark: bool) -> Self {
        let prefs = Preferences::load(store.as_ref(), system_dark, &config.default_language);
        let tr = Translator::new(&prefs.language);
        tracing::info!(
            theme = prefs.theme.as_str(),
            language = %prefs.language,
            "preferences loaded"
        );
        Self {
            config,
            store,
            prefs,
            tr,
            url_input: String::new(),
            notice: None,
            lookup: None,
            cards: Vec::new(),
            generation: 0,
            load_results: Arc::new(Mutex::new(Vec::new())),
            faq: Accordion::default(),
            editor: EditorState::default(),
            pending: Vec::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme
    }

    pub fn is_fetching(&self) -> bool {
        self.cards.iter().any(ThumbnailCard::is_loading)
    }

    /// Moves finished loads into their cards. Results from an older lookup
    /// are discarded; a failed load removes its card.
    pub(crate) fn poll_load_results(&mut self, ctx: &egui::Context) {
        // Take everything delivered so far without holding the lock while uploading textures
        let finished: Vec<LoadResult> = {
            let mut pending = self
                .load_results
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            pending.drain(..).collect()
        };

        let generation = self.generation;
        for done in finished {
            // Results from a superseded lookup
            if done.generation != generation {
                tracing::debug!(quality = done.quality.label(), "dropping stale thumbnail");
                continue;
            }
            match done.result {
                Ok(fetched) => {
                    // Nothing to fill if the card was already removed
                    let Some(card) = self.cards.iter_mut().find(|c| c.quality == done.quality)
                    else {
                        continue;
                    };
                    let name = format!("thumb-{}-{}", generation, done.quality.label());
                    let texture =
                        ctx.load_texture(name, fetched.image.clone(), TextureOptions::LINEAR);
                    card.state = CardState::Loaded {
                        texture,
                        pixels: fetched.image,
                        bytes: fetched.bytes,
                    };
                }
                Err(e) => {
                    // Missing tiers (often maxres) just disappear from the grid
                    tracing::warn!(quality = done.quality.label(), "thumbnail unavailable: {e}");
                    self.cards.retain(|c| c.quality != done.quality);
                }
            }
        }
    }

    fn top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.tr.t("app-title"));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let (icon, hint) = match self.prefs.theme {
                        Theme::Dark => ("☀", self.tr.t("theme-to-light")),
                        Theme::Light => ("🌙", self.tr.t("theme-to-dark")),
                    };
                    if ui.button(icon).on_hover_text(hint).clicked() {
                        self.pending.push(Command::ToggleTheme);
                    }

                    let mut selected = self.prefs.language.clone();
                    egui::ComboBox::from_id_source("language_select")
                        .selected_text(language_name(&self.prefs.language))
                        .show_ui(ui, |ui| {
                            for (code, name) in LANGUAGES {
                                ui.selectable_value(&mut selected, code.to_string(), *name);
                            }
                        });
                    ui.label(self.tr.t("language"));
                    if selected != self.prefs.language {
                        self.pending.push(Command::SetLanguage(selected));
                    }
                });
            });
        });
    }

    fn fetch_section(&mut self, ui: &mut egui::Ui) {
        let busy = self.is_fetching();
        ui.heading(self.tr.t("download-title"));
        ui.horizontal(|ui| {
            let edit = ui.add(
                TextEdit::singleline(&mut self.url_input)
                    .hint_text(self.tr.t("placeholder"))
                    .desired_width(480.0),
            );
            let entered = edit.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            let label = if busy {
                format!("⏳ {}", self.tr.t("processing"))
            } else {
                self.tr.t("fetch-btn").to_string()
            };
            let clicked = ui.add_enabled(!busy, Button::new(label)).clicked();
            if (clicked || entered) && !busy {
                self.pending.push(Command::FetchThumbnails);
            }
        });
        match &self.notice {
            Some(Notice::Error(msg)) => {
                ui.colored_label(Color32::from_rgb(0xe5, 0x48, 0x4d), msg);
            }
            Some(Notice::Info(msg)) => {
                ui.label(msg);
            }
            None => {}
        }
    }

    fn thumbnails_section(&mut self, ui: &mut egui::Ui) {
        if self.lookup.is_none() {
            return;
        }
        ui.add_space(12.0);
        ui.heading(self.tr.t("available-qualities"));
        if self.cards.is_empty() {
            ui.label(self.tr.t("no-thumbnails"));
            return;
        }

        let tr = &self.tr;
        let pending = &mut self.pending;
        ui.horizontal_wrapped(|ui| {
            for card in &self.cards {
                ui.group(|ui| {
                    ui.set_width(CARD_IMAGE_WIDTH);
                    ui.vertical(|ui| {
                        match &card.state {
                            CardState::Loading => {
                                ui.spinner();
                            }
                            CardState::Loaded { texture, .. } => {
                                ui.add(egui::Image::new(texture).max_width(CARD_IMAGE_WIDTH));
                            }
                        }
                        ui.label(RichText::new(card.quality.display_name()).strong());
                        ui.horizontal(|ui| {
                            let ready = !card.is_loading();
                            if ui
                                .add_enabled(ready, Button::new(format!("⬇ {}", tr.t("download-btn"))))
                                .clicked()
                            {
                                pending.push(Command::DownloadThumbnail(card.quality));
                            }
                            if ui
                                .add_enabled(ready, Button::new(format!("✏ {}", tr.t("edit-btn"))))
                                .clicked()
                            {
                                pending.push(Command::OpenEditor(card.quality));
                            }
                        });
                    });
                });
            }
        });
    }

    fn features_section(&self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.heading(self.tr.t("features-title"));
        for feature in self.tr.features() {
            ui.label(format!("• {feature}"));
        }
    }

    fn faq_section(&mut self, ui: &mut egui::Ui) {
        ui.add_space(16.0);
        ui.heading(self.tr.t("faq-title"));
        for (i, entry) in self.tr.faq().iter().enumerate() {
            let open = self.faq.is_open(i);
            let marker = if open { "▾" } else { "▸" };
            if ui
                .selectable_label(open, format!("{marker} {}", entry.question))
                .clicked()
            {
                self.pending.push(Command::ToggleFaq(i));
            }
            if open {
                ui.indent(("faq_answer", i), |ui| {
                    ui.label(&entry.answer);
                });
            }
        }
    }

    fn editor_window(&mut self, ctx: &egui::Context) {
        if !self.editor.is_open() {
            return;
        }
        let mut open = true;
        let tr = &self.tr;
        let state = &mut self.editor;
        let pending = &mut self.pending;
        egui::Window::new(tr.t("edit-title"))
            .id(Id::new("editor_window"))
            .open(&mut open)
            .default_width(CANVAS_SIZE[0] + 220.0)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    for tool in Tool::ALL {
                        let active = state.active_tool == Some(tool);
                        if ui.selectable_label(active, tr.t(tool.label_key())).clicked() {
                            pending.push(Command::SelectTool(tool));
                        }
                    }
                    ui.separator();
                    let has_annotations = !state.annotations.is_empty();
                    if ui
                        .add_enabled(has_annotations, Button::new(tr.t("undo")))
                        .clicked()
                    {
                        pending.push(Command::UndoAnnotation);
                    }
                    if ui
                        .add_enabled(has_annotations, Button::new(tr.t("clear")))
                        .clicked()
                    {
                        pending.push(Command::ClearAnnotations);
                    }
                    ui.separator();
                    if ui.button(format!("⬇ {}", tr.t("download-edited"))).clicked() {
                        pending.push(Command::DownloadEdited);
                    }
                });
                ui.separator();
                ui.horizontal_top(|ui| {
                    ui.allocate_ui(vec2(CANVAS_SIZE[0], CANVAS_SIZE[1]), |ui| {
                        editor::show_canvas(ui, state, CANVAS_SIZE[1]);
                    });
                    ui.separator();
                    ui.vertical(|ui| {
                        ui.set_width(200.0);
                        tool_options(ui, tr, state, pending);
                    });
                });
            });
        if !open {
            self.pending.push(Command::CloseEditor);
        }
    }
}

/// Sidebar for the active tool.
fn tool_options(
    ui: &mut egui::Ui,
    tr: &Translator,
    state: &mut EditorState,
    pending: &mut Vec<Command>,
) {
    let Some(tool) = state.active_tool else {
        ui.label(tr.t("tool-options-hint"));
        return;
    };
    let options = &mut state.options;
    match tool {
        Tool::Text => {
            ui.heading(tr.t("text-tool"));
            ui.add(TextEdit::singleline(&mut options.text).hint_text(tr.t("enter-text")));
            ui.horizontal(|ui| {
                ui.label(tr.t("text-color"));
                ui.color_edit_button_srgba(&mut options.text_color);
            });
            ui.label(tr.t("font-size"));
            ui.add(egui::Slider::new(
                &mut options.text_size,
                MIN_TEXT_SIZE..=MAX_TEXT_SIZE,
            ));
            if ui.button(tr.t("add-text")).clicked() {
                pending.push(Command::AddText);
            }
        }
        Tool::Brush | Tool::Rectangle => {
            ui.heading(format!("{} {}", tr.t(tool.label_key()), tr.t("tool-options")));
            ui.horizontal(|ui| {
                ui.label(tr.t("stroke-color"));
                ui.color_edit_button_srgba(&mut options.stroke_color);
            });
            ui.label(tr.t("stroke-width"));
            ui.add(egui::Slider::new(&mut options.stroke_width, 1.0..=24.0));
        }
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for ThumbnailApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.poll_load_results(ctx);

        self.top_bar(ctx);
        self.editor_window(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.fetch_section(ui);
                    self.thumbnails_section(ui);
                    self.features_section(ui);
                    self.faq_section(ui);
                });
        });

        for command in std::mem::take(&mut self.pending) {
            self.dispatch(ctx, command);
        }

        // Keep polling while images are still on their way
        if self.is_fetching() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}
