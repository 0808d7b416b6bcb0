// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::sync::Arc;
use std::time::Instant;

use eframe::egui::{
    self, load::SizedTexture, Color32, Context, FontId, Key, RichText, Sense, Stroke,
    Vec2, ViewportCommand,
};

use super::session::{adapter_for, PetSession};
use super::settings_window::{SettingsAction, SettingsWindow};
use super::textures::SpriteTextures;
use super::{fonts, window_level};
use crate::autostart::{AutoStart, RegistryAutoStart};
use crate::chat::ChatOrchestrator;
use crate::config::{Settings, SettingsStore};
use crate::error::Result;
use crate::llm::default_loader;
use crate::pet::layout::{bubble_layout, default_position, sprite_size, window_size, CHAT_INPUT_SIZE};
use crate::pet::{MenuEntry, MenuOutcome, IMAGE_DIR_NAME, INPUT_PLACEHOLDER};

const BUBBLE_FILL: Color32 = Color32::from_rgba_premultiplied(220, 165, 175, 220);
const BUBBLE_BORDER: Color32 = Color32::from_rgb(255, 105, 180);
const FOCUS_FILL: Color32 = Color32::from_rgba_premultiplied(200, 82, 141, 200);
const BUBBLE_FONT_SIZE: f32 = 14.0;

pub struct PetApp {
    session: PetSession,
    textures: SpriteTextures,
    settings_window: Option<SettingsWindow>,
    window_size: Option<Vec2>,
    positioned: bool,
    focus_input: bool,
}

impl PetApp {
    pub fn new(cc: &eframe::CreationContext<'_>, store: SettingsStore, settings: Settings) -> Result<Self> {
        fonts::install_cjk_font(&cc.egui_ctx);

        let app_root = store.app_root().to_path_buf();
        let adapter = adapter_for(&store, &settings, default_loader());
        let ctx = cc.egui_ctx.clone();
        let chat = ChatOrchestrator::new(Arc::new(adapter))?
            .with_waker(Arc::new(move || ctx.request_repaint()));

        let auto_start = RegistryAutoStart::current()
            .map_err(|e| tracing::warn!(target: "deskpet.gui", "Auto-start unavailable: {}", e))
            .ok()
            .map(|a| Box::new(a) as Box<dyn AutoStart>);

        Ok(Self {
            session: PetSession::new(store, settings, chat, auto_start, Instant::now()),
            textures: SpriteTextures::new(app_root.join(IMAGE_DIR_NAME)),
            settings_window: None,
            window_size: None,
            positioned: false,
            focus_input: false,
        })
    }

    fn place_initially(&mut self, ctx: &Context) {
        if self.positioned {
            return;
        }
        if let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) {
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(default_position(monitor)));
            self.positioned = true;
        }
    }

    fn draw_pet(&mut self, ctx: &Context, now: Instant) {
        let texture = self.textures.get(ctx, self.session.pet().frame());
        let sprite = sprite_size(texture.size(), self.session.settings().pet_scale);
        let opacity = self.session.settings().pet_opacity;
        let entries = self.session.pet().menu_entries();
        let mut top_height = 0.0;
        let mut chosen = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                ui.vertical_centered(|ui| {
                    let top = ui.cursor().min.y;
                    self.top_content(ui, now);
                    top_height = ui.cursor().min.y - top;

                    let response = ui.add(
                        egui::Image::new(SizedTexture::new(texture.id(), sprite))
                            .sense(Sense::click_and_drag()),
                    );
                    self.handle_pointer(ctx, &response, now);
                    response.context_menu(|ui| {
                        for entry in &entries {
                            match entry {
                                MenuEntry::Item { action, label } => {
                                    if ui.button(*label).clicked() {
                                        chosen = Some(*action);
                                        ui.close_menu();
                                    }
                                }
                                MenuEntry::Separator => {
                                    ui.separator();
                                }
                            }
                        }
                    });
                });
            });

        if let Some(action) = chosen {
            match self.session.pet_mut().activate(action, now) {
                MenuOutcome::Handled => self.focus_input = self.session.pet().input().is_open(),
                MenuOutcome::OpenSettings => {
                    self.settings_window = Some(SettingsWindow::new(
                        self.session.settings(),
                        self.session.store().app_root(),
                    ));
                }
                MenuOutcome::Quit => ctx.send_viewport_cmd(ViewportCommand::Close),
            }
        }

        let wanted = window_size(sprite, top_height);
        if self.window_size.map_or(true, |size| (size - wanted).length() > 0.5) {
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(wanted));
            self.window_size = Some(wanted);
        }
    }

    /// Focus countdown, then either the chat input or the bubble.
    fn top_content(&mut self, ui: &mut egui::Ui, now: Instant) {
        let pet = self.session.pet();
        let countdown = pet.focus().is_running().then(|| pet.focus().display());
        let input_open = pet.input().is_open();
        let bubble = pet.bubble_text().map(str::to_string);

        if let Some(countdown) = countdown {
            egui::Frame::none()
                .fill(FOCUS_FILL)
                .stroke(Stroke::new(2.0, Color32::WHITE))
                .rounding(12.0)
                .inner_margin(egui::Margin::symmetric(15.0, 5.0))
                .show(ui, |ui| {
                    ui.label(
                        RichText::new(countdown)
                            .font(FontId::monospace(18.0))
                            .strong()
                            .color(Color32::WHITE),
                    );
                });
        }

        if input_open {
            self.chat_input(ui, now);
        } else if let Some(text) = bubble {
            let measured = ui
                .painter()
                .layout_no_wrap(text.clone(), FontId::proportional(BUBBLE_FONT_SIZE), Color32::BLACK)
                .size()
                .x;
            let layout = bubble_layout(measured);
            egui::Frame::none()
                .fill(BUBBLE_FILL)
                .stroke(Stroke::new(1.0, BUBBLE_BORDER))
                .rounding(10.0)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.set_width(layout.width - 20.0);
                    let label = egui::Label::new(
                        RichText::new(text)
                            .size(BUBBLE_FONT_SIZE)
                            .color(Color32::BLACK),
                    );
                    ui.add(if layout.wrap { label.wrap() } else { label.extend() });
                });
        }
    }

    fn chat_input(&mut self, ui: &mut egui::Ui, now: Instant) {
        let edit = egui::TextEdit::singleline(&mut self.session.pet_mut().input_mut().text)
            .hint_text(INPUT_PLACEHOLDER)
            .font(FontId::proportional(BUBBLE_FONT_SIZE));
        let response = ui.add_sized(CHAT_INPUT_SIZE, edit);

        if self.focus_input {
            response.request_focus();
            self.focus_input = false;
        }

        if response.lost_focus() {
            if ui.input(|i| i.key_pressed(Key::Enter)) {
                self.session.submit_input(now);
            } else {
                self.session.pet_mut().cancel_input(now);
            }
        }
    }

    fn handle_pointer(&mut self, ctx: &Context, response: &egui::Response, now: Instant) {
        if response.double_clicked() {
            self.session.pet_mut().open_chat(now);
            self.focus_input = true;
            return;
        }

        let (origin, pointer) = ctx.input(|i| {
            let viewport = i.viewport();
            let origin = viewport.outer_rect.map(|r| r.min);
            let pointer = viewport
                .inner_rect
                .zip(i.pointer.interact_pos())
                .map(|(inner, local)| inner.min + local.to_vec2());
            (origin, pointer)
        });
        let (Some(origin), Some(pointer)) = (origin, pointer) else {
            return;
        };

        if response.drag_started_by(egui::PointerButton::Primary) {
            self.session.pet_mut().press(pointer, origin);
        } else if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(target) = self.session.pet().drag_to(pointer) {
                ctx.send_viewport_cmd(ViewportCommand::OuterPosition(target));
            }
        }
        if response.drag_stopped() {
            self.session.pet_mut().release();
        }
    }

    fn show_settings(&mut self, ctx: &Context) {
        let Some(window) = self.settings_window.as_mut() else {
            return;
        };
        match window.show(ctx) {
            SettingsAction::None => {}
            SettingsAction::Close => self.settings_window = None,
            SettingsAction::Save(settings) => {
                self.settings_window = None;
                self.apply_settings(ctx, settings);
            }
        }
    }

    fn apply_settings(&mut self, ctx: &Context, settings: Settings) {
        let applied = self.session.apply_settings(settings);
        if applied.display_mode_changed {
            let mode = self.session.settings().display_mode;
            ctx.send_viewport_cmd(ViewportCommand::WindowLevel(window_level(mode)));
        }
        self.window_size = None;
    }
}

impl eframe::App for PetApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.place_initially(ctx);
        self.session.handle_events(now);
        self.draw_pet(ctx, now);
        self.show_settings(ctx);

        if let Some(deadline) = self.session.pet().next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
        }
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}
