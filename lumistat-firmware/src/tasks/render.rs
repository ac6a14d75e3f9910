//! Render task
//!
//! Ten frames a second: snapshot the store, compose the frame for the
//! current mode, flush it to the matrix. The frame is always rebuilt
//! from scratch and flushed whole, so the hardware never shows a
//! half-drawn state.

use defmt::*;
use embassy_rp::clocks::RoscRng;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Duration, Instant, Ticker};

use lumistat_core::frame::Frame;
use lumistat_core::scene::Renderer;

use crate::max7219::Max7219;
use crate::state::TELEMETRY;

/// Redraw period (10 fps)
const RENDER_PERIOD: Duration = Duration::from_millis(100);

#[embassy_executor::task]
pub async fn render_task(mut display: Max7219<Spi<'static, SPI0, Blocking>, Output<'static>>) {
    info!("Render task started");

    let mut renderer = Renderer::new();
    let mut frame = Frame::new();
    let mut rng = RoscRng;
    let mut ticker = Ticker::every(RENDER_PERIOD);

    loop {
        let now_ms = Instant::now().as_millis();
        let view = TELEMETRY.view(now_ms);
        renderer.render(&mut frame, &view, now_ms, &mut rng);

        if let Err(e) = display.flush(&frame) {
            warn!("Display flush failed: {:?}", e);
        }

        ticker.next().await;
    }
}
