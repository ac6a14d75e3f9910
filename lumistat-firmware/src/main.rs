//! Lumistat - LED Matrix Telemetry Panel Firmware
//!
//! Firmware for a Raspberry Pi Pico W driving an 8x32 MAX7219 LED
//! matrix. The panel cycles between three views on a touch input:
//! room comfort (mood icon plus readouts), PC load bars fed by UDP
//! stats datagrams, and a clock. Three tasks share one atomic
//! telemetry store; nothing blocks anything else.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::{I2C1, PIO0};
use embassy_rp::spi::{self, Spi};
use {defmt_rtt as _, panic_probe as _};

use crate::max7219::Max7219;
use crate::sht21::Sht21;

mod max7219;
mod sht21;
mod state;
mod tasks;

#[cfg(feature = "wifi")]
use {
    cyw43::JoinOptions,
    cyw43_pio::{PioSpi, DEFAULT_CLOCK_DIVIDER},
    embassy_net::{Config as NetConfig, Stack, StackResources},
    embassy_rp::clocks::RoscRng,
    embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29},
    embassy_rp::pio::Pio,
    embassy_rp::Peri,
    embassy_time::Timer,
    rand_core::RngCore,
    static_cell::StaticCell,
};

/// Network the stats broadcaster lives on
#[cfg(feature = "wifi")]
const WIFI_SSID: &str = env!("LUMISTAT_WIFI_SSID");
#[cfg(feature = "wifi")]
const WIFI_PASSWORD: &str = env!("LUMISTAT_WIFI_PASSWORD");

bind_interrupts!(struct Irqs {
    I2C1_IRQ => I2cInterruptHandler<I2C1>;
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Lumistat firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // MAX7219 chain on SPI0 (clock GPIO18, data GPIO19, CS GPIO17).
    // The chain only ever receives, so TX-only SPI is enough.
    let spi_config = {
        let mut cfg = spi::Config::default();
        cfg.frequency = 10_000_000;
        cfg
    };
    let display_spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let display_cs = Output::new(p.PIN_17, Level::High);

    // A panel that cannot be driven is fatal; everything else degrades.
    let mut display = Max7219::new(display_spi, display_cs);
    unwrap!(display.init());
    info!("Display initialized (off, blank, minimum intensity)");

    // SHT21 on I2C1 (SDA GPIO14, SCL GPIO15). Probe it once at boot;
    // without it the panel runs in degraded mode (neutral mood, zero
    // readouts).
    let i2c = I2c::new_async(p.I2C1, p.PIN_15, p.PIN_14, Irqs, i2c::Config::default());
    let mut sht21 = Sht21::new(i2c);
    let sht21 = match sht21.soft_reset().await {
        Ok(()) => {
            info!("SHT21 found");
            Some(sht21)
        }
        Err(e) => {
            warn!("SHT21 not responding, running without it: {:?}", e);
            None
        }
    };

    // RP2040 internal temperature sensor
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let temp_channel = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);

    // TTP223 touch module on GPIO16, active high
    let touch = Input::new(p.PIN_16, Pull::Down);

    #[cfg(feature = "wifi")]
    {
        let stack = init_wifi(
            p.PIN_23, p.PIN_25, p.PIO0, p.PIN_24, p.PIN_29, p.DMA_CH0, spawner,
        )
        .await;
        state::TELEMETRY.set_link_up(true);
        spawner.spawn(tasks::stats_rx_task(stack)).unwrap();
    }
    #[cfg(not(feature = "wifi"))]
    info!("Built without wifi; stats mode will show rain");

    spawner
        .spawn(tasks::sensor_task(sht21, adc, temp_channel, touch))
        .unwrap();

    // Light up only once a task is about to draw real frames.
    unwrap!(display.set_power(true));
    spawner.spawn(tasks::render_task(display)).unwrap();

    info!("All tasks spawned, panel running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Bring up the CYW43439 radio, join the configured network and wait
/// for a DHCP lease. Blocks until the network is usable; the rest of
/// the panel does not depend on it.
#[cfg(feature = "wifi")]
async fn init_wifi(
    pwr_pin: Peri<'static, PIN_23>,
    cs_pin: Peri<'static, PIN_25>,
    pio0: Peri<'static, PIO0>,
    dio_pin: Peri<'static, PIN_24>,
    clk_pin: Peri<'static, PIN_29>,
    dma: Peri<'static, DMA_CH0>,
    spawner: Spawner,
) -> Stack<'static> {
    let fw = cyw43_firmware::CYW43_43439A0;
    let clm = cyw43_firmware::CYW43_43439A0_CLM;

    let pwr = Output::new(pwr_pin, Level::Low);
    let cs = Output::new(cs_pin, Level::High);
    let mut pio = Pio::new(pio0, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        dio_pin,
        clk_pin,
        dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let cyw_state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(cyw_state, pwr, spi, fw).await;
    spawner.spawn(cyw43_task(runner)).unwrap();

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let config = NetConfig::dhcpv4(Default::default());
    let seed = RoscRng.next_u64();

    static RESOURCES: StaticCell<StackResources<4>> = StaticCell::new();
    let (stack, runner) = embassy_net::new(
        net_device,
        config,
        RESOURCES.init(StackResources::new()),
        seed,
    );
    spawner.spawn(net_task(runner)).unwrap();

    info!("Joining '{}'", WIFI_SSID);
    loop {
        match control
            .join(WIFI_SSID, JoinOptions::new(WIFI_PASSWORD.as_bytes()))
            .await
        {
            Ok(()) => break,
            Err(err) => {
                warn!("Join failed (status {}), retrying", err.status);
                Timer::after_secs(1).await;
            }
        }
    }

    info!("Joined, waiting for DHCP...");
    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        info!("IP address: {}", config.address);
    }

    stack
}

#[cfg(feature = "wifi")]
#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[cfg(feature = "wifi")]
#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
