use crate::bindable::Bindable;
use crate::features::dim_blur::{CompositorTiming, BACKGROUND_FADE_DURATION, MAX_USER_BLUR};
use crate::features::slider_ball::DEFAULT_STYLE;
use crate::gfx::anim::Easing;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_dim_level")]
    pub dim_level: f64,

    #[serde(default)]
    pub blur_level: f64,

    #[serde(default = "default_true")]
    pub show_storyboard: bool,

    #[serde(default = "default_true")]
    pub enable_user_dim: bool,

    #[serde(default)]
    pub storyboard_replaces_background: bool,

    #[serde(default = "default_slider_style")]
    pub slider_style: Easing,

    #[serde(default = "default_fade_duration")]
    pub fade_duration_ms: f64,

    #[serde(default = "default_max_user_blur")]
    pub max_user_blur: f32,

    #[serde(default = "default_fps_cap")]
    pub fps_cap: u32,

    #[serde(default = "default_demo_seconds")]
    pub demo_seconds: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dim_level: default_dim_level(),
            blur_level: 0.0,
            show_storyboard: true,
            enable_user_dim: true,
            storyboard_replaces_background: false,
            slider_style: default_slider_style(),
            fade_duration_ms: default_fade_duration(),
            max_user_blur: default_max_user_blur(),
            fps_cap: default_fps_cap(),
            demo_seconds: default_demo_seconds(),
        }
    }
}

fn default_dim_level() -> f64 {
    0.8
}

fn default_true() -> bool {
    true
}

fn default_slider_style() -> Easing {
    DEFAULT_STYLE
}

fn default_fade_duration() -> f64 {
    BACKGROUND_FADE_DURATION
}

fn default_max_user_blur() -> f32 {
    MAX_USER_BLUR
}

fn default_fps_cap() -> u32 {
    60
}

fn default_demo_seconds() -> f64 {
    4.0
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join("stagefx").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Self::from_toml_str(&contents)
        } else {
            Ok(Config::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parsing config")?;
        Ok(config.sanitized())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    /// Settings are range-checked here so the compositor can trust them.
    pub fn sanitized(mut self) -> Self {
        self.dim_level = self.dim_level.clamp(0.0, 1.0);
        self.blur_level = self.blur_level.clamp(0.0, 1.0);
        self.fade_duration_ms = self.fade_duration_ms.max(0.0);
        self.max_user_blur = self.max_user_blur.max(0.0);
        self.fps_cap = self.fps_cap.max(1);
        self.demo_seconds = self.demo_seconds.max(0.0);
        self
    }

    pub fn compositor_timing(&self) -> CompositorTiming {
        CompositorTiming {
            fade_duration: self.fade_duration_ms,
            max_user_blur: self.max_user_blur,
        }
    }
}

/// Live user settings shared by every layer that reacts to them.
#[derive(Debug, Clone)]
pub struct VisualSettings {
    pub dim_level: Bindable<f64>,
    pub blur_level: Bindable<f64>,
    pub show_storyboard: Bindable<bool>,
}

impl VisualSettings {
    pub fn new(dim_level: f64, blur_level: f64, show_storyboard: bool) -> Self {
        Self {
            dim_level: Bindable::new(dim_level),
            blur_level: Bindable::new(blur_level),
            show_storyboard: Bindable::new(show_storyboard),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.dim_level, config.blur_level, config.show_storyboard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.dim_level, 0.8);
        assert_eq!(config.blur_level, 0.0);
        assert!(config.show_storyboard);
        assert_eq!(config.slider_style, Easing::InOutCubic);
        assert_eq!(config.fade_duration_ms, 800.0);
        assert_eq!(config.max_user_blur, 25.0);
    }

    #[test]
    fn parses_partial_file() {
        let config = Config::from_toml_str(
            "dim_level = 0.25\nslider_style = \"OutBounce\"\nshow_storyboard = false\n",
        )
        .unwrap();
        assert_eq!(config.dim_level, 0.25);
        assert_eq!(config.slider_style, Easing::OutBounce);
        assert!(!config.show_storyboard);
        assert_eq!(config.fps_cap, 60);
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        let config = Config::from_toml_str("dim_level = 1.5\nblur_level = -0.2\nfps_cap = 0\n").unwrap();
        assert_eq!(config.dim_level, 1.0);
        assert_eq!(config.blur_level, 0.0);
        assert_eq!(config.fps_cap, 1);
    }

    #[test]
    fn rejects_unknown_style() {
        assert!(Config::from_toml_str("slider_style = \"Wobbly\"").is_err());
    }

    #[test]
    fn save_and_load_file() {
        let dir = std::env::temp_dir().join(format!("stagefx-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = Config::default();
        config.blur_level = 0.5;
        config.slider_style = Easing::OutElastic;

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.blur_level, 0.5);
        assert_eq!(loaded.slider_style, Easing::OutElastic);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("stagefx-does-not-exist").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.fps_cap, 60);
    }

    #[test]
    fn settings_follow_config() {
        let config = Config::default();
        let settings = VisualSettings::from_config(&config);
        assert_eq!(settings.dim_level.get(), 0.8);
        assert!(settings.show_storyboard.get());
        assert_eq!(config.compositor_timing(), CompositorTiming::default());
    }
}
