use super::slider_path::SliderObject;
use super::Feature;
use crate::gfx::anim::{DefaultEasingFunction, Easing, EasingFunction};
use crate::gfx::math::Vec2;
use log::{info, trace};

/// Static description shown wherever mods are listed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModInfo {
    pub name: &'static str,
    pub acronym: &'static str,
    pub description: &'static str,
    pub score_multiplier: f64,
}

pub const VELOCITY_DIFFERENT: ModInfo = ModInfo {
    name: "Velocity Different",
    acronym: "VD",
    description: "Very funky sliders.",
    score_multiplier: 1.0,
};

pub const DEFAULT_STYLE: Easing = Easing::InOutCubic;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderBall {
    pub position: Vec2,
}

/// The body that grows along the path as the slider is followed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SnakingBody {
    pub progress: f64,
}

impl SnakingBody {
    pub fn update_progress(&mut self, progress: f64) {
        self.progress = progress;
    }
}

/// A slider as assembled for display. Skins without a snaking body leave
/// `body` empty.
pub struct DrawableSlider {
    pub object: Box<dyn SliderObject>,
    pub ball: SliderBall,
    pub body: Option<SnakingBody>,
}

impl DrawableSlider {
    pub fn new(object: Box<dyn SliderObject>, with_body: bool) -> Self {
        Self {
            object,
            ball: SliderBall::default(),
            body: with_body.then(SnakingBody::default),
        }
    }
}

/// Everything derived for one slider on one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderProgressState {
    pub raw_progress: f64,
    pub path_progress: f64,
    pub eased_progress: f64,
    pub ball_position: Vec2,
}

pub fn raw_progress(clock_time: f64, start_time: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((clock_time - start_time) / duration).clamp(0.0, 1.0)
}

/// Easing is layered on top of the repeat-aware path progress, not on raw
/// time. The eased value is not clamped.
pub fn progress_state(
    object: &dyn SliderObject,
    easing: &dyn EasingFunction,
    clock_time: f64,
) -> SliderProgressState {
    let raw_progress = raw_progress(clock_time, object.start_time(), object.duration());
    let path_progress = object.progress_at(raw_progress);
    let eased_progress = easing.apply(path_progress);
    SliderProgressState {
        raw_progress,
        path_progress,
        eased_progress,
        ball_position: object.position_at(eased_progress),
    }
}

/// Drives every attached slider's ball along a user-chosen easing curve.
pub struct SliderBallTracker {
    easing: Box<dyn EasingFunction>,
    sliders: Vec<DrawableSlider>,
}

impl SliderBallTracker {
    pub fn new(style: Easing) -> Self {
        Self {
            easing: Box::new(DefaultEasingFunction::new(style)),
            sliders: Vec::new(),
        }
    }

    /// Rebuilds the easing function. Called once per beatmap load; calling
    /// it again simply replaces the previous curve.
    pub fn configure(&mut self, style: Easing) {
        info!("{} configured with style {:?}", VELOCITY_DIFFERENT.acronym, style);
        self.easing = Box::new(DefaultEasingFunction::new(style));
    }

    pub fn attach(&mut self, slider: DrawableSlider) {
        self.sliders.push(slider);
    }

    pub fn clear(&mut self) {
        self.sliders.clear();
    }

    pub fn sliders(&self) -> &[DrawableSlider] {
        &self.sliders
    }

    pub fn on_frame_update(&mut self, clock_time: f64) {
        for slider in &mut self.sliders {
            let state = progress_state(slider.object.as_ref(), self.easing.as_ref(), clock_time);
            trace!(
                "slider @{}: raw={:.3} path={:.3} eased={:.3}",
                slider.object.start_time(),
                state.raw_progress,
                state.path_progress,
                state.eased_progress
            );
            slider.ball.position = state.ball_position;
            if let Some(body) = slider.body.as_mut() {
                body.update_progress(state.eased_progress);
            }
        }
    }
}

impl Feature for SliderBallTracker {
    fn name(&self) -> &'static str {
        VELOCITY_DIFFERENT.name
    }

    fn update(&mut self, now: f64) {
        self.on_frame_update(now);
    }
}
