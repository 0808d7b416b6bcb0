// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CJK font setup
//!
//! egui's bundled fonts have no Chinese glyphs, so the first system CJK
//! font found is put in front of the proportional and monospace families.

use std::path::{Path, PathBuf};

use eframe::egui::{Context, FontData, FontDefinitions, FontFamily};

const FONT_NAME: &str = "deskpet-cjk";

pub const CJK_FONT_CANDIDATES: &[&str] = &[
    r"C:\Windows\Fonts\msyh.ttc",
    r"C:\Windows\Fonts\msyh.ttf",
    r"C:\Windows\Fonts\simhei.ttf",
    r"C:\Windows\Fonts\simsun.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
];

/// First existing path among `candidates`.
pub fn find_font<P: AsRef<Path>>(candidates: &[P]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|p| p.as_ref())
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
}

/// Install a CJK font if one is found. Returns whether one was.
pub fn install_cjk_font(ctx: &Context) -> bool {
    let Some(path) = find_font(CJK_FONT_CANDIDATES) else {
        tracing::warn!(target: "deskpet.gui", "No CJK font found, Chinese text may not render");
        return false;
    };

    let bytes = match std::fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(target: "deskpet.gui", font = %path.display(), "Failed to read font: {}", e);
            return false;
        }
    };

    let mut fonts = FontDefinitions::default();
    fonts
        .font_data
        .insert(FONT_NAME.to_string(), FontData::from_owned(bytes));
    for family in [FontFamily::Proportional, FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, FONT_NAME.to_string());
    }
    ctx.set_fonts(fonts);
    tracing::debug!(target: "deskpet.gui", font = %path.display(), "CJK font installed");
    true
}
