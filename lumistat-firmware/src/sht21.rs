//! SHT21 temperature/humidity sensor driver
//!
//! Hold-master measurements over async I2C: the sensor stretches the
//! clock until conversion finishes, so a read is a single
//! write-then-read transaction. Every measurement carries a CRC-8
//! checksum which is verified before conversion.

use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;

/// Fixed SHT21 bus address
const ADDR: u8 = 0x40;

/// Soft reset settling time per datasheet (max 15 ms)
const RESET_DELAY: Duration = Duration::from_millis(15);

/// SHT21 commands
mod cmd {
    /// Temperature measurement, hold master
    pub const MEASURE_TEMP_HOLD: u8 = 0xE3;
    /// Humidity measurement, hold master
    pub const MEASURE_HUMIDITY_HOLD: u8 = 0xE5;
    pub const SOFT_RESET: u8 = 0xFE;
}

/// Driver errors, generic over the bus error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sht21Error<E> {
    /// I2C transaction failed
    Bus(E),
    /// Measurement checksum mismatch
    Crc,
}

impl<E> From<E> for Sht21Error<E> {
    fn from(err: E) -> Self {
        Self::Bus(err)
    }
}

/// SHT21 driver
pub struct Sht21<I2C> {
    i2c: I2C,
}

impl<I2C> Sht21<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C) -> Self {
        Self { i2c }
    }

    /// Reset the sensor to its power-up state and wait for it to
    /// settle. Used as a presence probe at boot: a missing sensor
    /// fails here.
    pub async fn soft_reset(&mut self) -> Result<(), Sht21Error<I2C::Error>> {
        self.i2c.write(ADDR, &[cmd::SOFT_RESET]).await?;
        Timer::after(RESET_DELAY).await;
        Ok(())
    }

    /// Measure temperature in degrees Celsius
    pub async fn read_temperature(&mut self) -> Result<f32, Sht21Error<I2C::Error>> {
        let raw = self.measure(cmd::MEASURE_TEMP_HOLD).await?;
        Ok(-46.85 + 175.72 * f32::from(raw) / 65536.0)
    }

    /// Measure relative humidity in percent
    pub async fn read_humidity(&mut self) -> Result<f32, Sht21Error<I2C::Error>> {
        let raw = self.measure(cmd::MEASURE_HUMIDITY_HOLD).await?;
        Ok(-6.0 + 125.0 * f32::from(raw) / 65536.0)
    }

    /// Run one hold-master measurement and return the raw 16-bit value
    /// with the status bits masked off.
    async fn measure(&mut self, command: u8) -> Result<u16, Sht21Error<I2C::Error>> {
        let mut buf = [0u8; 3];
        self.i2c.write_read(ADDR, &[command], &mut buf).await?;

        if crc8(&buf[..2]) != buf[2] {
            return Err(Sht21Error::Crc);
        }

        // The low two bits are status, not measurement data.
        Ok(u16::from_be_bytes([buf[0], buf[1]]) & !0b11)
    }
}

/// CRC-8 over the measurement bytes, polynomial x^8 + x^5 + x^4 + 1
fn crc8(data: &[u8]) -> u8 {
    const POLY: u8 = 0x31;
    let mut crc = 0u8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLY
            } else {
                crc << 1
            };
        }
    }
    crc
}
