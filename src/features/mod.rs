pub mod dim_blur;
pub mod slider_ball;
pub mod slider_path;

/// Something the host loop advances once per frame.
pub trait Feature {
    fn name(&self) -> &'static str;
    fn update(&mut self, now: f64);
}
