use super::Feature;
use crate::bindable::{Bindable, Subscription};
use crate::config::VisualSettings;
use crate::gfx::anim::{Easing, FrameClock, Tween};
use crate::gfx::math::{Color, Vec2};
use log::{debug, info};
use std::cell::RefCell;
use std::rc::Rc;

pub const BACKGROUND_FADE_DURATION: f64 = 800.0;
/// Blur radius contributed by a user blur level of 1.0.
pub const MAX_USER_BLUR: f32 = 25.0;
pub const FADE_EASING: Easing = Easing::OutQuint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Background,
    /// Storyboards can be toggled off and never blur.
    Storyboard,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositorTiming {
    pub fade_duration: f64,
    pub max_user_blur: f32,
}

impl Default for CompositorTiming {
    fn default() -> Self {
        Self {
            fade_duration: BACKGROUND_FADE_DURATION,
            max_user_blur: MAX_USER_BLUR,
        }
    }
}

/// Current values of every input the composition depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualInputs {
    pub enable_user_dim: bool,
    pub dim_level: f64,
    pub blur_level: f64,
    pub show_storyboard: bool,
    pub storyboard_replaces_background: bool,
    pub external_blur_amount: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualOutputs {
    pub opacity: f32,
    pub tint: Color,
    pub blur: Vec2,
}

pub fn blur_target(inputs: &VisualInputs, max_user_blur: f32) -> Vec2 {
    if inputs.enable_user_dim {
        Vec2::splat(inputs.external_blur_amount + inputs.blur_level as f32 * max_user_blur)
    } else {
        Vec2::splat(inputs.external_blur_amount)
    }
}

/// Derives the presentation of one layer from a snapshot of its inputs.
pub fn compose(inputs: &VisualInputs, layer: LayerKind, max_user_blur: f32) -> VisualOutputs {
    let hidden = match layer {
        // A dim level of exactly 1 hides the storyboard outright.
        LayerKind::Storyboard => !inputs.show_storyboard || inputs.dim_level == 1.0,
        LayerKind::Background => inputs.show_storyboard && inputs.storyboard_replaces_background,
    };

    let tint = if inputs.enable_user_dim {
        Color::gray(1.0 - inputs.dim_level as f32)
    } else {
        Color::WHITE
    };

    VisualOutputs {
        opacity: if hidden { 0.0 } else { 1.0 },
        tint,
        blur: blur_target(inputs, max_user_blur),
    }
}

/// Background image drawn inside a background layer.
#[derive(Debug, Clone)]
pub struct Background {
    pub name: String,
    blur: Tween<Vec2>,
}

impl Background {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blur: Tween::new(Vec2::ZERO),
        }
    }

    pub fn blur_to(&mut self, target: Vec2, now: f64, duration: f64, easing: Easing) {
        self.blur.transform_to(target, now, duration, easing);
    }

    pub fn blur_at(&self, now: f64) -> Vec2 {
        self.blur.value_at(now)
    }

    pub fn blur_target(&self) -> Vec2 {
        self.blur.target()
    }
}

/// What the renderer should draw for a layer at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerSnapshot {
    pub opacity: f32,
    pub tint: Color,
    /// `None` when there is no background to blur.
    pub blur: Option<Vec2>,
}

struct DimLayer {
    alpha: Tween<f32>,
    colour: Tween<Color>,
    background: Option<Background>,
}

struct State {
    layer: LayerKind,
    clock: FrameClock,
    timing: CompositorTiming,
    settings: VisualSettings,
    enable_user_dim: Bindable<bool>,
    storyboard_replaces_background: Bindable<bool>,
    external_blur_amount: Bindable<f32>,
    container: DimLayer,
    current: LayerSnapshot,
}

impl State {
    fn inputs(&self) -> VisualInputs {
        VisualInputs {
            enable_user_dim: self.enable_user_dim.get(),
            dim_level: self.settings.dim_level.get(),
            blur_level: self.settings.blur_level.get(),
            show_storyboard: self.settings.show_storyboard.get(),
            storyboard_replaces_background: self.storyboard_replaces_background.get(),
            external_blur_amount: self.external_blur_amount.get(),
        }
    }

    fn update_visuals(&mut self) {
        let now = self.clock.now();
        let duration = self.timing.fade_duration;
        let out = compose(&self.inputs(), self.layer, self.timing.max_user_blur);
        debug!(
            "{:?} layer -> opacity={} tint={:.3} blur={:.2}",
            self.layer, out.opacity, out.tint.r, out.blur.x
        );

        self.container.alpha.transform_to(out.opacity, now, duration, FADE_EASING);
        if self.layer == LayerKind::Background {
            // Blur goes on the image itself, not the whole layer.
            if let Some(background) = self.container.background.as_mut() {
                background.blur_to(out.blur, now, duration, FADE_EASING);
            }
        }
        self.container.colour.transform_to(out.tint, now, duration, FADE_EASING);
    }

    fn apply_instant_blur(&mut self) {
        if self.layer != LayerKind::Background {
            return;
        }
        let now = self.clock.now();
        let target = blur_target(&self.inputs(), self.timing.max_user_blur);
        if let Some(background) = self.container.background.as_mut() {
            background.blur_to(target, now, 0.0, FADE_EASING);
        }
    }

    fn sample(&self, now: f64) -> LayerSnapshot {
        LayerSnapshot {
            opacity: self.container.alpha.value_at(now),
            tint: self.container.colour.value_at(now),
            blur: self.container.background.as_ref().map(|b| b.blur_at(now)),
        }
    }
}

/// Applies the user's dim, blur and storyboard settings to a background or
/// storyboard layer, fading between states.
///
/// The compositor listens to the shared settings and to its own three
/// inputs, recomposing on every change. Dropping it releases every
/// listener.
pub struct DimBlurCompositor {
    /// Whether user-configured dim and blur apply to this layer.
    pub enable_user_dim: Bindable<bool>,
    /// Whether a visible storyboard hides the background behind it.
    pub storyboard_replaces_background: Bindable<bool>,
    /// Blur requested by the hosting screen, added to the user's blur.
    pub external_blur_amount: Bindable<f32>,
    state: Rc<RefCell<State>>,
    _subscriptions: Vec<Subscription>,
}

impl DimBlurCompositor {
    pub fn new(
        layer: LayerKind,
        settings: &VisualSettings,
        clock: FrameClock,
        timing: CompositorTiming,
    ) -> Self {
        let enable_user_dim = Bindable::new(false);
        let storyboard_replaces_background = Bindable::new(false);
        let external_blur_amount = Bindable::new(0.0f32);

        let state = Rc::new(RefCell::new(State {
            layer,
            clock,
            timing,
            settings: settings.clone(),
            enable_user_dim: enable_user_dim.clone(),
            storyboard_replaces_background: storyboard_replaces_background.clone(),
            external_blur_amount: external_blur_amount.clone(),
            container: DimLayer {
                alpha: Tween::new(1.0),
                colour: Tween::new(Color::WHITE),
                background: None,
            },
            current: LayerSnapshot {
                opacity: 1.0,
                tint: Color::WHITE,
                blur: None,
            },
        }));

        let _subscriptions = vec![
            watch(&enable_user_dim, &state),
            watch(&settings.dim_level, &state),
            watch(&settings.blur_level, &state),
            watch(&settings.show_storyboard, &state),
            watch(&storyboard_replaces_background, &state),
            watch(&external_blur_amount, &state),
        ];

        Self {
            enable_user_dim,
            storyboard_replaces_background,
            external_blur_amount,
            state,
            _subscriptions,
        }
    }

    pub fn layer(&self) -> LayerKind {
        self.state.borrow().layer
    }

    /// First composition once the layer is shown.
    pub fn load_complete(&self) {
        self.state.borrow_mut().update_visuals();
    }

    /// Sets the background blur to its target with no transition, so a newly
    /// swapped background does not fade in from unblurred.
    pub fn apply_instant_blur(&self) {
        self.state.borrow_mut().apply_instant_blur();
    }

    /// Replaces the background image, returning the previous one.
    pub fn set_background(&self, background: Option<Background>) -> Option<Background> {
        let mut state = self.state.borrow_mut();
        info!(
            "{:?} layer background -> {}",
            state.layer,
            background.as_ref().map_or("<none>", |b| b.name.as_str())
        );
        std::mem::replace(&mut state.container.background, background)
    }

    #[cfg(test)]
    pub fn background_name(&self) -> Option<String> {
        self.state
            .borrow()
            .container
            .background
            .as_ref()
            .map(|b| b.name.clone())
    }

    #[cfg(test)]
    pub fn inputs(&self) -> VisualInputs {
        self.state.borrow().inputs()
    }

    /// Where the running transitions are heading.
    pub fn targets(&self) -> LayerSnapshot {
        let state = self.state.borrow();
        LayerSnapshot {
            opacity: state.container.alpha.target(),
            tint: state.container.colour.target(),
            blur: state.container.background.as_ref().map(|b| b.blur_target()),
        }
    }

    #[cfg(test)]
    pub fn sample(&self, now: f64) -> LayerSnapshot {
        self.state.borrow().sample(now)
    }

    /// Values sampled on the last frame update.
    pub fn current(&self) -> LayerSnapshot {
        self.state.borrow().current
    }
}

fn watch<T: Clone + PartialEq + 'static>(
    bindable: &Bindable<T>,
    state: &Rc<RefCell<State>>,
) -> Subscription {
    let weak = Rc::downgrade(state);
    bindable.subscribe(move |_| {
        if let Some(state) = weak.upgrade() {
            state.borrow_mut().update_visuals();
        }
    })
}

impl Feature for DimBlurCompositor {
    fn name(&self) -> &'static str {
        match self.layer() {
            LayerKind::Background => "background dim",
            LayerKind::Storyboard => "storyboard dim",
        }
    }

    fn update(&mut self, now: f64) {
        let mut state = self.state.borrow_mut();
        let current = state.sample(now);
        state.current = current;
    }
}
