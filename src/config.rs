use anyhow::Context;
use serde::Deserialize;
use std::{env, fs, path::Path};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub layout: LayoutConfig,
    pub cover: CoverConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = env::current_dir() {
            candidates.push(current_dir.join("config.toml"));
            candidates.push(current_dir.join("config").join("config.toml"));
            candidates.push(current_dir.join("config").join("widget.toml"));
        }

        if let Ok(exe) = env::current_exe() {
            if let Some(dir) = exe.parent() {
                candidates.push(dir.join("config.toml"));
                candidates.push(dir.join("config").join("config.toml"));
                candidates.push(dir.join("config").join("widget.toml"));
            }
        }

        for path in candidates {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&data)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    pub fn from_toml_str(data: &str) -> anyhow::Result<Self> {
        let doc: ConfigDocument = toml::from_str(data)?;
        Ok(doc.into())
    }
}

/// Widget metrics in device-independent units.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub button_icon_dp: f32,
    pub button_padding_dp: f32,
    pub title_line_dp: f32,
    pub subtitle_line_dp: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            button_icon_dp: 36.0,
            button_padding_dp: 8.0,
            title_line_dp: 16.0,
            subtitle_line_dp: 14.0,
        }
    }
}

impl LayoutConfig {
    /// Touch target plus padding on both sides.
    pub fn button_footprint_dp(&self) -> f32 {
        self.button_icon_dp.max(0.0) + 2.0 * self.button_padding_dp.max(0.0)
    }

    pub fn title_line_dp(&self) -> f32 {
        self.title_line_dp.max(0.0)
    }

    pub fn subtitle_line_dp(&self) -> f32 {
        self.subtitle_line_dp.max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoverConfig {
    pub max_file_bytes: u64,
    pub fallback_size_dp: f32,
    pub placeholder_size_px: u32,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 4 * 1024 * 1024,
            fallback_size_dp: 56.0,
            placeholder_size_px: 512,
        }
    }
}

impl CoverConfig {
    pub fn fallback_size_dp(&self) -> f32 {
        self.fallback_size_dp.max(1.0)
    }

    pub fn placeholder_size_px(&self) -> u32 {
        self.placeholder_size_px.clamp(16, crate::cover::MAX_TARGET_PX)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    layout: LayoutSection,
    #[serde(default)]
    cover: CoverSection,
}

impl From<ConfigDocument> for Config {
    fn from(value: ConfigDocument) -> Self {
        let layout_defaults = LayoutConfig::default();
        let cover_defaults = CoverConfig::default();

        let layout = LayoutConfig {
            button_icon_dp: value
                .layout
                .button_icon_dp
                .unwrap_or(layout_defaults.button_icon_dp),
            button_padding_dp: value
                .layout
                .button_padding_dp
                .unwrap_or(layout_defaults.button_padding_dp),
            title_line_dp: value
                .layout
                .title_line_dp
                .unwrap_or(layout_defaults.title_line_dp),
            subtitle_line_dp: value
                .layout
                .subtitle_line_dp
                .unwrap_or(layout_defaults.subtitle_line_dp),
        };

        let cover = CoverConfig {
            max_file_bytes: value
                .cover
                .max_file_bytes
                .unwrap_or(cover_defaults.max_file_bytes),
            fallback_size_dp: value
                .cover
                .fallback_size_dp
                .unwrap_or(cover_defaults.fallback_size_dp),
            placeholder_size_px: value
                .cover
                .placeholder_size_px
                .unwrap_or(cover_defaults.placeholder_size_px),
        };

        Config { layout, cover }
    }
}

#[derive(Debug, Default, Deserialize)]
struct LayoutSection {
    button_icon_dp: Option<f32>,
    button_padding_dp: Option<f32>,
    title_line_dp: Option<f32>,
    subtitle_line_dp: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
struct CoverSection {
    max_file_bytes: Option<u64>,
    fallback_size_dp: Option<f32>,
    placeholder_size_px: Option<u32>,
}
