mod app;
mod bindable;
mod config;
mod features;
mod gfx;

use anyhow::Result;
use app::{App, UiEvent};
use config::Config;
use features::slider_ball::{DrawableSlider, VELOCITY_DIFFERENT};
use features::slider_path::Slider;
use features::Feature;
use gfx::anim::Easing;
use gfx::math::Vec2;
use log::{info, warn};

fn demo_sliders() -> Vec<DrawableSlider> {
    let zigzag = Slider::new(
        500.0,
        600.0,
        1,
        vec![
            Vec2::new(64.0, 192.0),
            Vec2::new(192.0, 96.0),
            Vec2::new(320.0, 192.0),
            Vec2::new(448.0, 96.0),
        ],
    );
    let straight = Slider::new(2200.0, 900.0, 0, vec![Vec2::new(256.0, 320.0), Vec2::new(256.0, 40.0)]);
    vec![
        DrawableSlider::new(Box::new(zigzag), true),
        // Some skins draw no snaking body.
        DrawableSlider::new(Box::new(straight), false),
    ]
}

/// Setting changes fired at fixed points of the demo, in milliseconds.
fn scripted_events() -> Vec<(f64, UiEvent)> {
    vec![
        (800.0, UiEvent::SetScreenBlur(5.0)),
        (1200.0, UiEvent::SetBlurLevel(0.4)),
        (1600.0, UiEvent::SwapBackground(Some("alternate.jpg".to_string()))),
        (2000.0, UiEvent::SetStoryboardReplacesBackground(true)),
        (2400.0, UiEvent::SetDimLevel(1.0)),
        (2800.0, UiEvent::SetUserDim(false)),
        (3000.0, UiEvent::SetSliderStyle(Easing::OutBounce)),
        (3200.0, UiEvent::SetShowStoryboard(false)),
    ]
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::load().unwrap_or_else(|e| {
        warn!("Falling back to default config: {:#}", e);
        Config::default()
    });
    if std::env::args().any(|arg| arg == "--write-config") {
        config.save()?;
        info!("Wrote config to {}", Config::path()?.display());
    }
    info!(
        "{} ({}): {} style {:?}, fps cap {}",
        VELOCITY_DIFFERENT.name,
        VELOCITY_DIFFERENT.acronym,
        VELOCITY_DIFFERENT.description,
        config.slider_style,
        config.fps_cap
    );

    let frame_time = 1000.0 / config.fps_cap as f64;
    let end_time = config.demo_seconds * 1000.0;
    let mut app = App::new(config);
    app.load_beatmap(demo_sliders(), Some("background.jpg".to_string()));

    let mut events = scripted_events().into_iter().peekable();
    let mut frame: u64 = 0;

    while app.now() < end_time {
        let now = app.now();
        while let Some((_, event)) = events.next_if(|(at, _)| *at <= now) {
            app.handle_event(event);
        }

        app.update(frame_time);
        frame += 1;

        if frame % app.config.fps_cap as u64 == 0 {
            let (background, storyboard) = app.layers();
            let heading = app.background.targets();
            info!(
                "t={:.0}ms {}: opacity={:.2}->{:.0} tint={:.2}->{:.2} blur={:?}->{:?}",
                app.now(),
                app.background.name(),
                background.opacity,
                heading.opacity,
                background.tint.r,
                heading.tint.r,
                background.blur.map(|b| b.x),
                heading.blur.map(|b| b.x)
            );
            info!(
                "t={:.0}ms {}: opacity={:.2} tint={:.2}",
                app.now(),
                app.storyboard.name(),
                storyboard.opacity,
                storyboard.tint.r
            );
            for slider in app.sliders.sliders() {
                info!(
                    "t={:.0}ms ball=({:.1}, {:.1}) body={:?}",
                    app.now(),
                    slider.ball.position.x,
                    slider.ball.position.y,
                    slider.body.map(|b| b.progress)
                );
            }
        }
    }

    info!("Finished after {} frames", frame);
    Ok(())
}
