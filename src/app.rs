use crate::config::{Config, VisualSettings};
use crate::features::dim_blur::{Background, DimBlurCompositor, LayerKind, LayerSnapshot};
use crate::features::slider_ball::{DrawableSlider, SliderBallTracker};
use crate::features::Feature;
use crate::gfx::anim::{Easing, FrameClock};
use log::info;

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    SetDimLevel(f64),
    SetBlurLevel(f64),
    SetShowStoryboard(bool),
    SetUserDim(bool),
    SetStoryboardReplacesBackground(bool),
    /// Extra blur requested by the current screen, e.g. while loading.
    SetScreenBlur(f32),
    SwapBackground(Option<String>),
    SetSliderStyle(Easing),
}

/// Gameplay screen state: the two dimmed layers and the slider mod.
pub struct App {
    pub config: Config,
    pub clock: FrameClock,
    pub settings: VisualSettings,
    pub background: DimBlurCompositor,
    pub storyboard: DimBlurCompositor,
    pub sliders: SliderBallTracker,
}

impl App {
    pub fn new(config: Config) -> Self {
        let clock = FrameClock::new();
        let settings = VisualSettings::from_config(&config);
        let timing = config.compositor_timing();

        let background = DimBlurCompositor::new(LayerKind::Background, &settings, clock.clone(), timing);
        let storyboard = DimBlurCompositor::new(LayerKind::Storyboard, &settings, clock.clone(), timing);
        for layer in [&background, &storyboard] {
            layer.enable_user_dim.set(config.enable_user_dim);
            layer
                .storyboard_replaces_background
                .set(config.storyboard_replaces_background);
        }

        let sliders = SliderBallTracker::new(config.slider_style);

        Self {
            config,
            clock,
            settings,
            background,
            storyboard,
            sliders,
        }
    }

    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Sets up a beatmap's sliders and background, then shows both layers.
    pub fn load_beatmap(&mut self, sliders: Vec<DrawableSlider>, background: Option<String>) {
        info!("Loading beatmap with {} sliders", sliders.len());
        self.sliders.clear();
        self.sliders.configure(self.config.slider_style);
        for slider in sliders {
            self.sliders.attach(slider);
        }
        self.background.set_background(background.map(Background::new));
        self.background.apply_instant_blur();
        self.background.load_complete();
        self.storyboard.load_complete();
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        info!("Event: {:?}", event);
        match event {
            UiEvent::SetDimLevel(level) => self.settings.dim_level.set(level.clamp(0.0, 1.0)),
            UiEvent::SetBlurLevel(level) => self.settings.blur_level.set(level.clamp(0.0, 1.0)),
            UiEvent::SetShowStoryboard(show) => self.settings.show_storyboard.set(show),
            UiEvent::SetUserDim(enabled) => {
                self.background.enable_user_dim.set(enabled);
                self.storyboard.enable_user_dim.set(enabled);
            }
            UiEvent::SetStoryboardReplacesBackground(replaces) => {
                self.background.storyboard_replaces_background.set(replaces);
                self.storyboard.storyboard_replaces_background.set(replaces);
            }
            UiEvent::SetScreenBlur(amount) => self.background.external_blur_amount.set(amount.max(0.0)),
            UiEvent::SwapBackground(name) => {
                self.background.set_background(name.map(Background::new));
                // A new image starts at the current blur instead of fading in.
                self.background.apply_instant_blur();
            }
            UiEvent::SetSliderStyle(style) => {
                self.config.slider_style = style;
                self.sliders.configure(style);
            }
        }
    }

    pub fn update(&mut self, dt: f64) {
        self.clock.advance(dt);
        let now = self.clock.now();
        let features: [&mut dyn Feature; 3] =
            [&mut self.sliders, &mut self.background, &mut self.storyboard];
        for feature in features {
            feature.update(now);
        }
    }

    pub fn layers(&self) -> (LayerSnapshot, LayerSnapshot) {
        (self.background.current(), self.storyboard.current())
    }
}
