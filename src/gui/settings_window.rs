// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings dialog
//!
//! Edits a draft copy of [`Settings`]; nothing is applied until the user
//! presses save.

use std::path::{Path, PathBuf};

use eframe::egui::{self, Context, ViewportBuilder, ViewportId};
use rfd::FileDialog;

use crate::config::{
    DisplayMode, Settings, FOCUS_MINUTES_RANGE, MODELS_DIR_NAME, OPACITY_RANGE, SCALE_RANGE,
};
use crate::models::{scan_for_models, DiscoveredModel};

const WINDOW_TITLE: &str = "桌宠设置";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Tab {
    #[default]
    General,
    About,
}

/// What the dialog asks the app to do
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    None,
    Save(Settings),
    Close,
}

pub struct SettingsWindow {
    app_root: PathBuf,
    draft: Settings,
    model_path: String,
    detected: Vec<DiscoveredModel>,
    tab: Tab,
}

impl SettingsWindow {
    pub fn new(settings: &Settings, app_root: &Path) -> Self {
        Self {
            app_root: app_root.to_path_buf(),
            draft: settings.clone(),
            model_path: settings.model_path.display().to_string(),
            detected: Vec::new(),
            tab: Tab::default(),
        }
    }

    /// Fill the model list from the app and well-known model directories.
    pub fn detect_models(&mut self) {
        self.detected = scan_for_models(&self.app_root);
    }

    pub fn detected(&self) -> &[DiscoveredModel] {
        &self.detected
    }

    pub fn choose_detected(&mut self, index: usize) {
        if let Some(model) = self.detected.get(index) {
            self.model_path = model.path.display().to_string();
        }
    }

    pub fn set_model_path(&mut self, path: impl Into<String>) {
        self.model_path = path.into();
    }

    /// Where the file picker opens: next to the current model, else the
    /// models directory.
    pub fn picker_directory(&self) -> Option<PathBuf> {
        let recorded = self.model_path.trim();
        let beside_model = (!recorded.is_empty())
            .then(|| self.app_root.join(recorded))
            .and_then(|path| path.parent().map(Path::to_path_buf))
            .filter(|dir| dir.is_dir());
        beside_model.or_else(|| Some(self.app_root.join(MODELS_DIR_NAME)).filter(|dir| dir.is_dir()))
    }

    /// Ask for a model file with the native dialog.
    fn pick_model(&mut self) {
        let mut dialog = FileDialog::new()
            .set_title("选择模型")
            .add_filter("GGUF 模型", &["gguf"]);
        if let Some(dir) = self.picker_directory() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(path) = dialog.pick_file() {
            self.set_model_path(path.display().to_string());
        }
    }

    /// The draft as it would be saved.
    pub fn to_settings(&self) -> Settings {
        Settings {
            model_path: PathBuf::from(self.model_path.trim()),
            ..self.draft.clone()
        }
        .sanitized()
    }

    /// Draw the dialog in its own OS window.
    pub fn show(&mut self, ctx: &Context) -> SettingsAction {
        ctx.show_viewport_immediate(
            ViewportId::from_hash_of("deskpet-settings"),
            ViewportBuilder::default()
                .with_title(WINDOW_TITLE)
                .with_inner_size([420.0, 380.0])
                .with_resizable(false),
            |ctx, _class| {
                if ctx.input(|i| i.viewport().close_requested()) {
                    return SettingsAction::Close;
                }
                egui::CentralPanel::default()
                    .show(ctx, |ui| self.ui(ui))
                    .inner
            },
        )
    }

    fn ui(&mut self, ui: &mut egui::Ui) -> SettingsAction {
        ui.horizontal(|ui| {
            ui.selectable_value(&mut self.tab, Tab::General, "常规设置");
            ui.selectable_value(&mut self.tab, Tab::About, "关于");
        });
        ui.separator();

        match self.tab {
            Tab::General => self.general_ui(ui),
            Tab::About => about_ui(ui),
        }

        ui.add_space(8.0);
        if ui.button("保存并应用").clicked() {
            SettingsAction::Save(self.to_settings())
        } else {
            SettingsAction::None
        }
    }

    fn general_ui(&mut self, ui: &mut egui::Ui) {
        ui.add(
            egui::Slider::new(&mut self.draft.pet_scale, SCALE_RANGE)
                .step_by(0.1)
                .text("缩放比例"),
        );
        ui.add(
            egui::Slider::new(&mut self.draft.pet_opacity, OPACITY_RANGE)
                .step_by(0.1)
                .text("透明度"),
        );

        egui::ComboBox::from_label("显示模式")
            .selected_text(self.draft.display_mode.label())
            .show_ui(ui, |ui| {
                for mode in DisplayMode::ALL {
                    ui.selectable_value(&mut self.draft.display_mode, mode, mode.label());
                }
            });

        ui.checkbox(&mut self.draft.auto_start, "开机自动启动");

        ui.horizontal(|ui| {
            ui.label("专注时长:");
            ui.add(
                egui::DragValue::new(&mut self.draft.focus_minutes)
                    .range(FOCUS_MINUTES_RANGE)
                    .suffix(" 分钟"),
            );
        });

        ui.horizontal(|ui| {
            ui.label("模型路径:");
            ui.text_edit_singleline(&mut self.model_path);
            if ui.button("选择模型").clicked() {
                self.pick_model();
            }
            if ui.button("检测模型").clicked() {
                self.detect_models();
            }
        });

        let mut chosen = None;
        egui::ScrollArea::vertical().max_height(120.0).show(ui, |ui| {
            for (index, model) in self.detected.iter().enumerate() {
                let text = format!("{}  {}", model.display_name(), model.size_display());
                if ui
                    .selectable_label(self.model_path == model.path.display().to_string(), text)
                    .clicked()
                {
                    chosen = Some(index);
                }
            }
        });
        if let Some(index) = chosen {
            self.choose_detected(index);
        }
    }
}

fn about_ui(ui: &mut egui::Ui) {
    ui.heading("HaiXiaoTang DesktopPet");
    ui.label(format!("版本: {}", env!("CARGO_PKG_VERSION")));
    ui.label("一个基于本地LLM的智能桌面宠物。");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ModelSource;

    #[test]
    fn test_to_settings_trims_and_sanitizes() {
        let mut window = SettingsWindow::new(&Settings::default(), Path::new("/pet"));
        window.draft.pet_scale = 9.0;
        window.draft.focus_minutes = 0;
        window.set_model_path("  models/pet.gguf  ");

        let settings = window.to_settings();
        assert_eq!(settings.pet_scale, 5.0);
        assert_eq!(settings.focus_minutes, 1);
        assert_eq!(settings.model_path, PathBuf::from("models/pet.gguf"));
    }

    #[test]
    fn test_unchanged_draft_round_trips() {
        let original = Settings {
            model_path: PathBuf::from("/pet/models/a.gguf"),
            display_mode: DisplayMode::Bottom,
            auto_start: true,
            ..Default::default()
        };
        let window = SettingsWindow::new(&original, Path::new("/pet"));
        assert_eq!(window.to_settings(), original);
    }

    #[test]
    fn test_picker_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut window = SettingsWindow::new(&Settings::default(), tmp.path());
        assert_eq!(window.picker_directory(), None);

        let models = tmp.path().join(MODELS_DIR_NAME);
        std::fs::create_dir_all(&models).unwrap();
        assert_eq!(window.picker_directory(), Some(models.clone()));

        let elsewhere = tmp.path().join("elsewhere");
        std::fs::create_dir_all(&elsewhere).unwrap();
        window.set_model_path(elsewhere.join("m.gguf").display().to_string());
        assert_eq!(window.picker_directory(), Some(elsewhere));

        window.set_model_path("gone/m.gguf");
        assert_eq!(window.picker_directory(), Some(models));
    }

    #[test]
    fn test_choose_detected() {
        let mut window = SettingsWindow::new(&Settings::default(), Path::new("/pet"));
        window.detected = vec![DiscoveredModel {
            path: PathBuf::from("/pet/models/b.gguf"),
            filename: "b.gguf".to_string(),
            size_bytes: 1024,
            source: ModelSource::App,
        }];
        window.choose_detected(3);
        assert_eq!(window.to_settings().model_path, PathBuf::new());
        window.choose_detected(0);
        assert_eq!(window.to_settings().model_path, PathBuf::from("/pet/models/b.gguf"));
    }
}
