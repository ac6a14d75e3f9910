//! MAX7219 LED matrix driver
//!
//! Drives a chain of four daisy-chained 8x8 modules over SPI with a
//! manually toggled chip-select line. Module 0 is the first chip in the
//! chain (closest to the MCU) and shows rows 0..8 of the frame; module
//! 3 is the farthest and shows rows 24..32.
//!
//! A chained write latches one register into every chip at once: the
//! bytes shifted out first travel the farthest, so per-module data is
//! sent in reverse chain order.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use lumistat_core::frame::{Frame, MODULE_COUNT, MODULE_ROWS};

/// MAX7219 registers
mod reg {
    pub const NOOP: u8 = 0x00;
    /// Digit 0 register; digits 1..=7 follow consecutively
    pub const DIGIT0: u8 = 0x01;
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN: u8 = 0x0C;
    pub const DISPLAY_TEST: u8 = 0x0F;
}

/// Driver errors, generic over the bus and chip-select error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Max7219Error<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// Chip-select pin failed
    Pin(P),
}

/// Driver for the 4-module MAX7219 chain
pub struct Max7219<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> Max7219<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Bring every chip into a known state: no BCD decoding, all eight
    /// digits scanned, test mode off, display off, all pixels dark,
    /// minimum intensity.
    ///
    /// The display stays off until [`Self::set_power`] turns it on, so
    /// nothing flashes during the rest of the boot sequence.
    pub fn init(&mut self) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        self.write_all(reg::DISPLAY_TEST, 0x00)?;
        self.write_all(reg::DECODE_MODE, 0x00)?;
        self.write_all(reg::SCAN_LIMIT, 0x07)?;
        self.set_power(false)?;
        self.clear()?;
        self.set_intensity(0)
    }

    /// Turn the whole chain on or off (MAX7219 shutdown register)
    pub fn set_power(&mut self, on: bool) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        self.write_all(reg::SHUTDOWN, if on { 0x01 } else { 0x00 })
    }

    /// Set brightness for the whole chain, 0 (dimmest) to 15
    pub fn set_intensity(
        &mut self,
        intensity: u8,
    ) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        self.write_all(reg::INTENSITY, intensity.min(0x0F))
    }

    /// Blank every pixel on every module
    pub fn clear(&mut self) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        for digit in 0..MODULE_ROWS as u8 {
            self.write_all(reg::DIGIT0 + digit, 0x00)?;
        }
        Ok(())
    }

    /// Push a composed frame to the chain.
    ///
    /// One latch per digit register: each write carries that digit's
    /// row byte for all four modules. Digit `d` of module `m` is the
    /// frame row `m * 8 + (7 - d)` - digit 0 is the top row of its
    /// module.
    pub fn flush(&mut self, frame: &Frame) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        for digit in 0..MODULE_ROWS as usize {
            let mut words = [0u8; MODULE_COUNT * 2];
            for module in 0..MODULE_COUNT {
                let y = module * MODULE_ROWS as usize + (MODULE_ROWS as usize - 1 - digit);
                // Farthest module's pair goes out first.
                let slot = (MODULE_COUNT - 1 - module) * 2;
                words[slot] = reg::DIGIT0 + digit as u8;
                words[slot + 1] = frame.row_bits(y);
            }
            self.latch(&words)?;
        }
        Ok(())
    }

    /// Write the same register/value pair into every chip in the chain
    fn write_all(
        &mut self,
        register: u8,
        value: u8,
    ) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        let mut words = [0u8; MODULE_COUNT * 2];
        for slot in 0..MODULE_COUNT {
            words[slot * 2] = register;
            words[slot * 2 + 1] = value;
        }
        self.latch(&words)
    }

    /// Shift out one full chain's worth of register pairs and latch
    fn latch(&mut self, words: &[u8]) -> Result<(), Max7219Error<SPI::Error, CS::Error>> {
        self.cs.set_low().map_err(Max7219Error::Pin)?;
        let result = self.spi.write(words).map_err(Max7219Error::Spi);
        // Raise CS even when the transfer failed; a stuck-low CS wedges
        // the whole chain.
        self.cs.set_high().map_err(Max7219Error::Pin)?;
        result
    }
}
