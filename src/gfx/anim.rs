use super::math::{Color, Vec2};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

const ELASTIC_CONST: f64 = 2.0 * PI / 0.3;
const ELASTIC_CONST2: f64 = 0.3 / 4.0;
const BACK_CONST: f64 = 1.70158;
const BACK_CONST2: f64 = BACK_CONST * 1.525;

/// Named easing curves selectable from settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    None,
    Out,
    In,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InElastic,
    OutElastic,
    OutElasticHalf,
    OutElasticQuarter,
    InOutElastic,
    InBack,
    OutBack,
    InOutBack,
    InBounce,
    OutBounce,
    InOutBounce,
    OutPow10,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Easing::None => t,
            Easing::In | Easing::InQuad => t * t,
            Easing::Out | Easing::OutQuad => t * (2.0 - t),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = t - 1.0;
                    -2.0 * u * u + 1.0
                }
            }
            Easing::InCubic => t * t * t,
            Easing::OutCubic => (t - 1.0).powi(3) + 1.0,
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    4.0 * (t - 1.0).powi(3) + 1.0
                }
            }
            Easing::InQuart => t.powi(4),
            Easing::OutQuart => 1.0 - (t - 1.0).powi(4),
            Easing::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - 8.0 * (t - 1.0).powi(4)
                }
            }
            Easing::InQuint => t.powi(5),
            Easing::OutQuint => (t - 1.0).powi(5) + 1.0,
            Easing::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    16.0 * (t - 1.0).powi(5) + 1.0
                }
            }
            Easing::InSine => 1.0 - (t * PI / 2.0).cos(),
            Easing::OutSine => (t * PI / 2.0).sin(),
            Easing::InOutSine => 0.5 - 0.5 * (PI * t).cos(),
            Easing::InExpo => 2f64.powf(10.0 * (t - 1.0)),
            Easing::OutExpo => 1.0 - 2f64.powf(-10.0 * t),
            Easing::InOutExpo => {
                if t < 0.5 {
                    0.5 * 2f64.powf(20.0 * t - 10.0)
                } else {
                    1.0 - 0.5 * 2f64.powf(-20.0 * t + 10.0)
                }
            }
            Easing::InCirc => 1.0 - (1.0 - t * t).sqrt(),
            Easing::OutCirc => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Easing::InOutCirc => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 - 0.5 * (1.0 - t * t).sqrt()
                } else {
                    let u = t - 2.0;
                    0.5 + 0.5 * (1.0 - u * u).sqrt()
                }
            }
            Easing::InElastic => {
                -(2f64.powf(-10.0 + 10.0 * t)) * ((1.0 - ELASTIC_CONST2 - t) * ELASTIC_CONST).sin()
            }
            Easing::OutElastic => {
                2f64.powf(-10.0 * t) * ((t - ELASTIC_CONST2) * ELASTIC_CONST).sin() + 1.0
            }
            Easing::OutElasticHalf => {
                2f64.powf(-10.0 * t) * ((0.5 * t - ELASTIC_CONST2) * ELASTIC_CONST).sin() + 1.0
            }
            Easing::OutElasticQuarter => {
                2f64.powf(-10.0 * t) * ((0.25 * t - ELASTIC_CONST2) * ELASTIC_CONST).sin() + 1.0
            }
            Easing::InOutElastic => {
                let t = t * 2.0;
                if t < 1.0 {
                    -0.5 * 2f64.powf(-10.0 + 10.0 * t)
                        * ((1.0 - ELASTIC_CONST2 * 1.5 - t) * ELASTIC_CONST / 1.5).sin()
                } else {
                    let u = t - 1.0;
                    0.5 * 2f64.powf(-10.0 * u) * ((u - ELASTIC_CONST2 * 1.5) * ELASTIC_CONST / 1.5).sin()
                        + 1.0
                }
            }
            Easing::InBack => t * t * ((BACK_CONST + 1.0) * t - BACK_CONST),
            Easing::OutBack => {
                let u = t - 1.0;
                u * u * ((BACK_CONST + 1.0) * u + BACK_CONST) + 1.0
            }
            Easing::InOutBack => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * ((BACK_CONST2 + 1.0) * t - BACK_CONST2)
                } else {
                    let u = t - 2.0;
                    0.5 * (u * u * ((BACK_CONST2 + 1.0) * u + BACK_CONST2) + 2.0)
                }
            }
            Easing::InBounce => 1.0 - out_bounce(1.0 - t),
            Easing::OutBounce => out_bounce(t),
            Easing::InOutBounce => {
                if t < 0.5 {
                    0.5 - 0.5 * out_bounce(1.0 - t * 2.0)
                } else {
                    out_bounce((t - 0.5) * 2.0) * 0.5 + 0.5
                }
            }
            Easing::OutPow10 => (t - 1.0).powi(11) + 1.0,
        }
    }
}

fn out_bounce(t: f64) -> f64 {
    if t < 1.0 / 2.75 {
        7.5625 * t * t
    } else if t < 2.0 / 2.75 {
        let u = t - 1.5 / 2.75;
        7.5625 * u * u + 0.75
    } else if t < 2.5 / 2.75 {
        let u = t - 2.25 / 2.75;
        7.5625 * u * u + 0.9375
    } else {
        let u = t - 2.625 / 2.75;
        7.5625 * u * u + 0.984375
    }
}

/// Maps normalized progress onto a curve. Output may leave [0, 1] for
/// overshooting curves such as the elastic and back families.
pub trait EasingFunction {
    fn apply(&self, t: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultEasingFunction {
    easing: Easing,
}

impl DefaultEasingFunction {
    pub fn new(easing: Easing) -> Self {
        Self { easing }
    }
}

impl EasingFunction for DefaultEasingFunction {
    fn apply(&self, t: f64) -> f64 {
        self.easing.apply(t)
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Values a `Tween` can move between.
pub trait Interpolate: Copy {
    fn interpolate(from: Self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        lerp(from, to, t)
    }
}

impl Interpolate for Vec2 {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        Vec2::new(lerp(from.x, to.x, t), lerp(from.y, to.y, t))
    }
}

impl Interpolate for Color {
    fn interpolate(from: Self, to: Self, t: f32) -> Self {
        Color {
            r: lerp(from.r, to.r, t),
            g: lerp(from.g, to.g, t),
            b: lerp(from.b, to.b, t),
            a: lerp(from.a, to.a, t),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub start_time: f64,
    pub duration: f64,
}

impl Timeline {
    pub fn new(duration: f64) -> Self {
        Self {
            start_time: 0.0,
            duration,
        }
    }

    pub fn start(&mut self, now: f64) {
        self.start_time = now;
    }

    /// Clamped progress at `now`. A zero-length timeline is always complete.
    pub fn progress_at(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let elapsed = now - self.start_time;
        (elapsed / self.duration).clamp(0.0, 1.0)
    }
}

/// A retargetable transition between two values.
///
/// Starting a new transition captures whatever the tween shows at that
/// instant as the new origin, so an unfinished transition is superseded
/// without a jump.
#[derive(Debug, Clone)]
pub struct Tween<T: Interpolate> {
    from: T,
    to: T,
    timeline: Timeline,
    easing: Easing,
}

impl<T: Interpolate> Tween<T> {
    pub fn new(value: T) -> Self {
        Self {
            from: value,
            to: value,
            timeline: Timeline::new(0.0),
            easing: Easing::None,
        }
    }

    pub fn transform_to(&mut self, target: T, now: f64, duration: f64, easing: Easing) {
        self.from = self.value_at(now);
        self.to = target;
        self.easing = easing;
        self.timeline = Timeline::new(duration);
        self.timeline.start(now);
    }

    pub fn value_at(&self, now: f64) -> T {
        let t = self.easing.apply(self.timeline.progress_at(now));
        T::interpolate(self.from, self.to, t as f32)
    }

    pub fn target(&self) -> T {
        self.to
    }
}

/// Shared frame time in milliseconds. Clones observe the same clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    now: Rc<Cell<f64>>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now.get()
    }

    #[cfg(test)]
    pub fn set(&self, time: f64) {
        self.now.set(time);
    }

    pub fn advance(&self, dt: f64) {
        self.now.set(self.now.get() + dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 36] = [
        Easing::None,
        Easing::Out,
        Easing::In,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::OutElasticHalf,
        Easing::OutElasticQuarter,
        Easing::InOutElastic,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
        Easing::OutPow10,
    ];

    #[test]
    fn polynomial_curves_hit_endpoints() {
        for easing in ALL {
            if matches!(
                easing,
                Easing::InExpo
                    | Easing::OutExpo
                    | Easing::InOutExpo
                    | Easing::InElastic
                    | Easing::OutElastic
                    | Easing::OutElasticHalf
                    | Easing::OutElasticQuarter
                    | Easing::InOutElastic
            ) {
                continue;
            }
            assert!(easing.apply(0.0).abs() < 1e-9, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-9, "{:?} at 1", easing);
        }
    }

    #[test]
    fn exponential_curves_are_close_to_endpoints() {
        for easing in [Easing::InExpo, Easing::OutExpo, Easing::InOutExpo] {
            assert!(easing.apply(0.0).abs() < 1e-3);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn symmetric_curves_pass_through_midpoint() {
        for easing in [
            Easing::None,
            Easing::InOutQuad,
            Easing::InOutCubic,
            Easing::InOutQuart,
            Easing::InOutQuint,
            Easing::InOutSine,
            Easing::InOutCirc,
            Easing::InOutBack,
        ] {
            assert!((easing.apply(0.5) - 0.5).abs() < 1e-9, "{:?}", easing);
        }
    }

    #[test]
    fn out_back_overshoots() {
        let peak = (1..100)
            .map(|i| Easing::OutBack.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn default_easing_function_delegates() {
        let f = DefaultEasingFunction::new(Easing::InCubic);
        assert_eq!(f.apply(0.5), 0.125);
    }

    #[test]
    fn timeline_clamps_progress() {
        let mut tl = Timeline::new(100.0);
        tl.start(50.0);
        assert_eq!(tl.progress_at(0.0), 0.0);
        assert_eq!(tl.progress_at(100.0), 0.5);
        assert_eq!(tl.progress_at(500.0), 1.0);
        assert_eq!(tl.progress_at(150.0), 1.0);
    }

    #[test]
    fn zero_duration_timeline_is_complete() {
        let tl = Timeline::new(0.0);
        assert_eq!(tl.progress_at(0.0), 1.0);
        assert!(!tl.progress_at(-10.0).is_nan());
    }

    #[test]
    fn tween_reaches_target() {
        let mut tween = Tween::new(0.0f32);
        tween.transform_to(1.0, 0.0, 800.0, Easing::OutQuint);
        assert_eq!(tween.value_at(0.0), 0.0);
        assert!(tween.value_at(400.0) > 0.5);
        assert_eq!(tween.value_at(800.0), 1.0);
        assert_eq!(tween.target(), 1.0);
    }

    #[test]
    fn zero_duration_tween_snaps() {
        let mut tween = Tween::new(Vec2::ZERO);
        tween.transform_to(Vec2::splat(15.0), 10.0, 0.0, Easing::OutQuint);
        assert_eq!(tween.value_at(10.0), Vec2::splat(15.0));
    }

    #[test]
    fn retarget_starts_from_displayed_value() {
        let mut tween = Tween::new(0.0f32);
        tween.transform_to(1.0, 0.0, 100.0, Easing::None);
        let mid = tween.value_at(50.0);
        tween.transform_to(0.0, 50.0, 100.0, Easing::None);
        assert_eq!(tween.value_at(50.0), mid);
        assert_eq!(tween.value_at(150.0), 0.0);
    }

    #[test]
    fn colour_tween_interpolates_channels() {
        let mut tween = Tween::new(Color::WHITE);
        tween.transform_to(Color::gray(0.0), 0.0, 10.0, Easing::None);
        assert_eq!(tween.value_at(5.0), Color::gray(0.5));
    }

    #[test]
    fn frame_clock_clones_share_time() {
        let clock = FrameClock::new();
        let other = clock.clone();
        clock.advance(16.0);
        other.advance(4.0);
        assert_eq!(clock.now(), 20.0);
        other.set(1.0);
        assert_eq!(clock.now(), 1.0);
    }
}
