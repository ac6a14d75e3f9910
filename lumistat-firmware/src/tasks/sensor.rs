//! Environment sampling and touch input task
//!
//! Every 200 ms: read the SHT21 (when one was found at boot), read the
//! RP2040 die temperature, and sample the touch line for a mode press.
//! A failed sensor read is logged and skipped; the store keeps its last
//! good value and the panel keeps running.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::gpio::Input;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::I2C1;
use embassy_time::{Duration, Ticker};

use lumistat_core::mode::TouchDebounce;

use crate::sht21::Sht21;
use crate::state::TELEMETRY;

/// Sampling period for sensors and touch
const SENSOR_PERIOD: Duration = Duration::from_millis(200);

/// ADC reference voltage
const ADC_VREF: f32 = 3.3;
/// 12-bit ADC full scale
const ADC_MAX: f32 = 4096.0;

/// Convert a raw die-temperature ADC reading to degrees Celsius
/// (RP2040 datasheet formula).
fn die_temp_c(raw: u16) -> f32 {
    let voltage = f32::from(raw) * ADC_VREF / ADC_MAX;
    27.0 - (voltage - 0.706) / 0.001721
}

#[embassy_executor::task]
pub async fn sensor_task(
    mut sht21: Option<Sht21<I2c<'static, I2C1, i2c::Async>>>,
    mut adc: Adc<'static, Async>,
    mut temp_channel: Channel<'static>,
    touch: Input<'static>,
) {
    info!(
        "Sensor task started (SHT21 {})",
        if sht21.is_some() { "present" } else { "absent" }
    );

    let mut debounce = TouchDebounce::new();
    let mut ticker = Ticker::every(SENSOR_PERIOD);

    loop {
        if let Some(sensor) = &mut sht21 {
            match sensor.read_temperature().await {
                Ok(reading) => {
                    if !TELEMETRY.record_temperature(reading) {
                        warn!("Implausible temperature reading: {}", reading);
                    }
                }
                Err(e) => warn!("SHT21 temperature read failed: {:?}", e),
            }
            match sensor.read_humidity().await {
                Ok(reading) => {
                    if !TELEMETRY.record_humidity(reading) {
                        warn!("Implausible humidity reading: {}", reading);
                    }
                }
                Err(e) => warn!("SHT21 humidity read failed: {:?}", e),
            }
        }

        match adc.read(&mut temp_channel).await {
            Ok(raw) => {
                let die = die_temp_c(raw);
                TELEMETRY.record_internal_temp(die);
                debug!("Die temperature: {}", die);
            }
            Err(e) => warn!("Die temperature read failed: {:?}", e),
        }

        if debounce.rising_edge(touch.is_high()) {
            let mode = TELEMETRY.advance_mode();
            info!("Display mode: {}", mode.name());
        }

        ticker.next().await;
    }
}
