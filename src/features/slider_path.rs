use crate::gfx::math::Vec2;

/// Timing and geometry a slider exposes to per-frame behaviours.
pub trait SliderObject {
    fn start_time(&self) -> f64;
    fn duration(&self) -> f64;
    /// Maps linear progress over the whole slider onto path progress,
    /// folding repeats so odd spans run back towards the head.
    fn progress_at(&self, progress: f64) -> f64;
    /// Point on the path at path progress `t` in [0, 1].
    fn position_at(&self, t: f64) -> Vec2;
}

/// A polyline slider travelled `repeat_count + 1` times.
#[derive(Debug, Clone)]
pub struct Slider {
    pub start_time: f64,
    pub span_duration: f64,
    pub repeat_count: u32,
    points: Vec<Vec2>,
    cumulative: Vec<f32>,
}

impl Slider {
    pub fn new(start_time: f64, span_duration: f64, repeat_count: u32, points: Vec<Vec2>) -> Self {
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                total += points[i - 1].distance(*p);
            }
            cumulative.push(total);
        }
        Self {
            start_time,
            span_duration,
            repeat_count,
            points,
            cumulative,
        }
    }

    pub fn span_count(&self) -> u32 {
        self.repeat_count + 1
    }

    pub fn length(&self) -> f32 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }
}

impl SliderObject for Slider {
    fn start_time(&self) -> f64 {
        self.start_time
    }

    fn duration(&self) -> f64 {
        self.span_duration * self.span_count() as f64
    }

    fn progress_at(&self, progress: f64) -> f64 {
        let spans = self.span_count() as f64;
        let p = (progress * spans) % 1.0;
        let span = (progress * spans) as u32;
        if span % 2 == 1 {
            1.0 - p
        } else {
            p
        }
    }

    fn position_at(&self, t: f64) -> Vec2 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Vec2::ZERO,
        };
        let length = self.length();
        if length <= 0.0 {
            return first;
        }

        let target = (t.clamp(0.0, 1.0) as f32) * length;
        let idx = self.cumulative.partition_point(|&d| d < target);
        if idx == 0 {
            return first;
        }
        if idx >= self.points.len() {
            return last;
        }

        let (a, b) = (self.points[idx - 1], self.points[idx]);
        let seg = self.cumulative[idx] - self.cumulative[idx - 1];
        if seg <= 0.0 {
            return b;
        }
        let w = (target - self.cumulative[idx - 1]) / seg;
        Vec2::new(a.x + (b.x - a.x) * w, a.y + (b.y - a.y) * w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(repeats: u32) -> Slider {
        Slider::new(1000.0, 500.0, repeats, vec![Vec2::new(0.0, 0.0), Vec2::new(100.0, 0.0)])
    }

    #[test]
    fn duration_covers_every_span() {
        assert_eq!(straight(0).duration(), 500.0);
        assert_eq!(straight(2).duration(), 1500.0);
    }

    #[test]
    fn single_span_progress_is_identity() {
        let s = straight(0);
        assert_eq!(s.progress_at(0.25), 0.25);
        assert_eq!(s.progress_at(0.0), 0.0);
    }

    #[test]
    fn repeat_runs_in_reverse() {
        let s = straight(1);
        assert_eq!(s.progress_at(0.25), 0.5);
        assert_eq!(s.progress_at(0.75), 0.5);
        assert!((s.progress_at(0.9) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn position_follows_polyline_by_length() {
        let s = Slider::new(
            0.0,
            100.0,
            0,
            vec![Vec2::new(0.0, 0.0), Vec2::new(40.0, 0.0), Vec2::new(40.0, 10.0)],
        );
        assert_eq!(s.length(), 50.0);
        assert_eq!(s.position_at(0.0), Vec2::new(0.0, 0.0));
        assert_eq!(s.position_at(0.5), Vec2::new(25.0, 0.0));
        assert_eq!(s.position_at(1.0), Vec2::new(40.0, 10.0));
        assert_eq!(s.position_at(2.0), Vec2::new(40.0, 10.0));
    }

    #[test]
    fn degenerate_paths_do_not_panic() {
        let empty = Slider::new(0.0, 100.0, 0, Vec::new());
        assert_eq!(empty.position_at(0.5), Vec2::ZERO);

        let point = Slider::new(0.0, 100.0, 0, vec![Vec2::new(5.0, 5.0)]);
        assert_eq!(point.position_at(0.7), Vec2::new(5.0, 5.0));
    }
}
