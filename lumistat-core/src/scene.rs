//! Per-mode frame composition.
//!
//! [`Renderer`] owns everything that persists between frames (smoothing
//! filters and rain state) and turns one telemetry snapshot into one
//! complete [`Frame`] per render tick.

use rand_core::RngCore;

use crate::draw::{draw_bar, draw_icon, draw_marker_dots, draw_number};
use crate::frame::{Frame, HEIGHT, MODULE_ROWS};
use crate::glyphs::Icon;
use crate::mode::DisplayMode;
use crate::rain::Rain;
use crate::smoothing::Smoothed;
use crate::telemetry::View;

/// Bottom module, home of the mood/clock icon
const ICON_Y: i32 = 0;
/// Second module: internal temperature or seconds, three marker dots
const LOWER_NUM_Y: i32 = MODULE_ROWS;
/// Third module: humidity or minutes, two marker dots
const MIDDLE_NUM_Y: i32 = 2 * MODULE_ROWS;
/// Top module: room temperature or hours, one marker dot
const UPPER_NUM_Y: i32 = 3 * MODULE_ROWS;

/// Column pairs of the three load bars: CPU, GPU, RAM left to right
const CPU_COLS: (i32, i32) = (0, 1);
const GPU_COLS: (i32, i32) = (3, 4);
const RAM_COLS: (i32, i32) = (6, 7);

/// Round a reading to the nearest integer for the two-digit readout.
///
/// NaN (sensor never read) casts to 0 and shows as "00".
fn rounded(value: f32) -> i32 {
    (value + 0.5) as i32
}

/// Stateful frame composer, owned by the render task
#[derive(Debug, Default)]
pub struct Renderer {
    cpu: Smoothed,
    gpu: Smoothed,
    ram: Smoothed,
    rain: Rain,
}

impl Renderer {
    pub const fn new() -> Self {
        Self {
            cpu: Smoothed::new(),
            gpu: Smoothed::new(),
            ram: Smoothed::new(),
            rain: Rain::new(),
        }
    }

    /// Compose one frame from the given snapshot.
    ///
    /// The smoothing filters advance every call, whatever the mode, so
    /// switching back to the stats view never replays a stale ramp.
    pub fn render(&mut self, frame: &mut Frame, view: &View, now_ms: u64, rng: &mut impl RngCore) {
        self.cpu.set_target(view.cpu);
        self.gpu.set_target(view.gpu);
        self.ram.set_target(view.ram);
        let cpu = self.cpu.step();
        let gpu = self.gpu.step();
        let ram = self.ram.step();

        frame.clear();
        match view.mode {
            DisplayMode::Ambient => self.compose_ambient(frame, view),
            DisplayMode::Clock => self.compose_clock(frame, view),
            DisplayMode::PcStats => {
                if view.connected {
                    draw_bar(frame, CPU_COLS.0, CPU_COLS.1, cpu, HEIGHT);
                    draw_bar(frame, GPU_COLS.0, GPU_COLS.1, gpu, HEIGHT);
                    draw_bar(frame, RAM_COLS.0, RAM_COLS.1, ram, HEIGHT);
                } else {
                    self.rain.advance(now_ms, rng);
                    self.rain.draw(frame);
                }
            }
        }
    }

    fn compose_ambient(&self, frame: &mut Frame, view: &View) {
        let mood = Icon::for_comfort(view.temperature_c, view.humidity_pct);
        draw_icon(frame, mood, ICON_Y);

        draw_number(frame, rounded(view.internal_temp_c), LOWER_NUM_Y);
        draw_marker_dots(frame, 3, LOWER_NUM_Y);

        draw_number(frame, rounded(view.humidity_pct), MIDDLE_NUM_Y);
        draw_marker_dots(frame, 2, MIDDLE_NUM_Y);

        draw_number(frame, rounded(view.temperature_c), UPPER_NUM_Y);
        draw_marker_dots(frame, 1, UPPER_NUM_Y);
    }

    fn compose_clock(&self, frame: &mut Frame, view: &View) {
        draw_icon(frame, Icon::Clock, ICON_Y);

        draw_number(frame, i32::from(view.second), LOWER_NUM_Y);
        draw_marker_dots(frame, 3, LOWER_NUM_Y);

        draw_number(frame, i32::from(view.minute), MIDDLE_NUM_Y);
        draw_marker_dots(frame, 2, MIDDLE_NUM_Y);

        draw_number(frame, i32::from(view.hour), UPPER_NUM_Y);
        draw_marker_dots(frame, 1, UPPER_NUM_Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::TelemetryStore;
    use lumistat_protocol::StatsPayload;

    /// RNG that replays a fixed word sequence.
    struct ScriptRng(std::vec::Vec<u32>, usize);

    impl ScriptRng {
        fn new(words: &[u32]) -> Self {
            Self(words.into(), 0)
        }
    }

    impl RngCore for ScriptRng {
        fn next_u32(&mut self) -> u32 {
            let word = self.0[self.1 % self.0.len()];
            self.1 += 1;
            word
        }

        fn next_u64(&mut self) -> u64 {
            u64::from(self.next_u32())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for byte in dest {
                *byte = self.next_u32() as u8;
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn bar_rows_lit(frame: &Frame, cols: (i32, i32)) -> i32 {
        (0..HEIGHT)
            .filter(|&y| (cols.0..=cols.1).all(|x| frame.pixel(x, y)))
            .count() as i32
    }

    fn settle(renderer: &mut Renderer, frame: &mut Frame, view: &View, ticks: usize) {
        let mut rng = ScriptRng::new(&[99]);
        for _ in 0..ticks {
            renderer.render(frame, view, 0, &mut rng);
        }
    }

    #[test]
    fn test_stats_mode_draws_three_bars_when_connected() {
        let store = TelemetryStore::new();
        store.set_link_up(true);
        store.apply_stats(
            &StatsPayload {
                cpu: 55.0,
                mem: 40.0,
                gpu: 12.0,
                time: None,
            },
            1_000,
        );
        store.advance_mode(); // PcStats

        let view = store.view(1_000);
        assert!(view.connected);

        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        // Enough ticks for the filters to converge to the targets.
        settle(&mut renderer, &mut frame, &view, 300);

        // round(55 * 32 / 100) = 18, round(40 * 32 / 100) = 13,
        // round(12 * 32 / 100) = 4.
        assert_eq!(bar_rows_lit(&frame, CPU_COLS), 18);
        assert_eq!(bar_rows_lit(&frame, RAM_COLS), 13);
        assert_eq!(bar_rows_lit(&frame, GPU_COLS), 4);

        // The gap columns between bars stay dark.
        for y in 0..HEIGHT {
            assert!(!frame.pixel(2, y));
            assert!(!frame.pixel(5, y));
        }
    }

    #[test]
    fn test_bars_ramp_gradually_toward_the_target() {
        let view = View {
            mode: DisplayMode::PcStats,
            cpu: 100.0,
            gpu: 0.0,
            ram: 0.0,
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
            internal_temp_c: 0.0,
            hour: 0,
            minute: 0,
            second: 0,
            connected: true,
        };

        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        let mut rng = ScriptRng::new(&[99]);

        renderer.render(&mut frame, &view, 0, &mut rng);
        // First tick shows 10 % of the jump, not the full bar.
        assert_eq!(bar_rows_lit(&frame, CPU_COLS), 3);

        settle(&mut renderer, &mut frame, &view, 300);
        assert_eq!(bar_rows_lit(&frame, CPU_COLS), 32);
    }

    #[test]
    fn test_stale_telemetry_replaces_bars_with_rain() {
        let store = TelemetryStore::new();
        store.set_link_up(true);
        store.apply_stats(
            &StatsPayload {
                cpu: 90.0,
                mem: 90.0,
                gpu: 90.0,
                time: None,
            },
            0,
        );
        store.advance_mode(); // PcStats

        let view = store.view(10_000); // well past the staleness window
        assert!(!view.connected);

        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        // Spawn roll hits for the first drop, misses afterwards.
        let mut rng = ScriptRng::new(&[0, 0, 0, 99, 99, 99, 99, 99, 99, 99]);
        renderer.render(&mut frame, &view, 10_000, &mut rng);

        // One drop at the top of column 0, no solid bars anywhere.
        assert!(frame.pixel(0, 31));
        assert_eq!(frame.lit_count(), 1);
        assert_eq!(bar_rows_lit(&frame, CPU_COLS), 0);
    }

    #[test]
    fn test_rain_moves_on_its_own_cadence_not_the_frame_rate() {
        let view = View {
            mode: DisplayMode::PcStats,
            cpu: 0.0,
            gpu: 0.0,
            ram: 0.0,
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
            internal_temp_c: 0.0,
            hour: 0,
            minute: 0,
            second: 0,
            connected: false,
        };

        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        // One spawn on the first movement tick, misses ever after.
        let mut script = [99u32; 24];
        script[..3].copy_from_slice(&[0, 0, 0]);
        let mut rng = ScriptRng::new(&script);

        renderer.render(&mut frame, &view, 0, &mut rng);
        assert!(frame.pixel(0, 31));

        // 50 ms later the frame is redrawn but the drop has not moved.
        renderer.render(&mut frame, &view, 50, &mut rng);
        assert!(frame.pixel(0, 31));
        assert!(!frame.pixel(0, 30));

        renderer.render(&mut frame, &view, 100, &mut rng);
        assert!(frame.pixel(0, 30));
        assert!(!frame.pixel(0, 31));
    }

    #[test]
    fn test_ambient_mode_shows_mood_and_readouts() {
        let store = TelemetryStore::new();
        store.record_temperature(22.0);
        store.record_humidity(50.0);
        store.record_internal_temp(31.4);

        let view = store.view(0);
        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        let mut rng = ScriptRng::new(&[99]);
        renderer.render(&mut frame, &view, 0, &mut rng);

        // Smile row of the happy icon (0x99 at bitmap row 5): y = 2.
        assert!(frame.pixel(3, 2));
        assert!(frame.pixel(4, 2));

        // Marker dots: 3 on the second module, 2 on the third, 1 on top.
        assert!(frame.pixel(2, LOWER_NUM_Y + 7));
        assert!(!frame.pixel(3, LOWER_NUM_Y + 7));
        assert!(frame.pixel(1, MIDDLE_NUM_Y + 7));
        assert!(!frame.pixel(2, MIDDLE_NUM_Y + 7));
        assert!(frame.pixel(0, UPPER_NUM_Y + 7));
        assert!(!frame.pixel(1, UPPER_NUM_Y + 7));

        // Full-frame check against a directly drawn reference.
        let mut expected = Frame::new();
        draw_icon(&mut expected, Icon::Happy, ICON_Y);
        draw_number(&mut expected, 31, LOWER_NUM_Y);
        draw_marker_dots(&mut expected, 3, LOWER_NUM_Y);
        draw_number(&mut expected, 50, MIDDLE_NUM_Y);
        draw_marker_dots(&mut expected, 2, MIDDLE_NUM_Y);
        draw_number(&mut expected, 22, UPPER_NUM_Y);
        draw_marker_dots(&mut expected, 1, UPPER_NUM_Y);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_ambient_without_sensor_shows_neutral_and_zeros() {
        let store = TelemetryStore::new();
        let view = store.view(0);

        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        let mut rng = ScriptRng::new(&[99]);
        renderer.render(&mut frame, &view, 0, &mut rng);

        let mut expected = Frame::new();
        draw_icon(&mut expected, Icon::Neutral, ICON_Y);
        draw_number(&mut expected, 0, LOWER_NUM_Y);
        draw_marker_dots(&mut expected, 3, LOWER_NUM_Y);
        draw_number(&mut expected, 0, MIDDLE_NUM_Y);
        draw_marker_dots(&mut expected, 2, MIDDLE_NUM_Y);
        draw_number(&mut expected, 0, UPPER_NUM_Y);
        draw_marker_dots(&mut expected, 1, UPPER_NUM_Y);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_clock_mode_lays_out_hms_bottom_to_top() {
        let view = View {
            mode: DisplayMode::Clock,
            cpu: 0.0,
            gpu: 0.0,
            ram: 0.0,
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
            internal_temp_c: 0.0,
            hour: 13,
            minute: 45,
            second: 2,
            connected: true,
        };

        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        let mut rng = ScriptRng::new(&[99]);
        renderer.render(&mut frame, &view, 0, &mut rng);

        let mut expected = Frame::new();
        draw_icon(&mut expected, Icon::Clock, ICON_Y);
        draw_number(&mut expected, 2, LOWER_NUM_Y);
        draw_marker_dots(&mut expected, 3, LOWER_NUM_Y);
        draw_number(&mut expected, 45, MIDDLE_NUM_Y);
        draw_marker_dots(&mut expected, 2, MIDDLE_NUM_Y);
        draw_number(&mut expected, 13, UPPER_NUM_Y);
        draw_marker_dots(&mut expected, 1, UPPER_NUM_Y);
        assert_eq!(frame, expected);
    }

    #[test]
    fn test_filters_keep_converging_while_another_mode_is_shown() {
        let mut view = View {
            mode: DisplayMode::Ambient,
            cpu: 80.0,
            gpu: 0.0,
            ram: 0.0,
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
            internal_temp_c: 0.0,
            hour: 0,
            minute: 0,
            second: 0,
            connected: true,
        };

        let mut renderer = Renderer::new();
        let mut frame = Frame::new();
        settle(&mut renderer, &mut frame, &view, 300);

        // Switching to the stats view shows the converged bar at once.
        view.mode = DisplayMode::PcStats;
        let mut rng = ScriptRng::new(&[99]);
        renderer.render(&mut frame, &view, 0, &mut rng);
        assert_eq!(bar_rows_lit(&frame, CPU_COLS), 26); // round(80 * 32 / 100)
    }
}
