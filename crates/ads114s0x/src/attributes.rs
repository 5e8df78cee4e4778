//! Text attribute interface
//!
//! One attribute per register, named after the datasheet register
//! (`"INPMUX"`, `"DATARATE"`, ...) plus `SENSOR_MOCK_MODE`. Values are
//! decimal text: reads end with a newline, writes accept surrounding
//! whitespace.

use core::fmt::Write as _;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};
use heapless::String;

use crate::device::Ads114s0x;
use crate::registers::Register;
use crate::{Error, Result};

/// Capacity of a formatted attribute value (`"255\n"` needs four).
pub const ATTRIBUTE_TEXT_LEN: usize = 8;

/// Attribute names in register-address order.
pub fn attribute_names() -> impl Iterator<Item = &'static str> {
    Register::ALL.into_iter().map(Register::name)
}

/// Parse an attribute value as a signed decimal integer.
fn parse_decimal(text: &str) -> Result<i32> {
    text.trim().parse::<i32>().map_err(|_| Error::Parse)
}

impl<M, SPI, RST, D> Ads114s0x<M, SPI, RST, D>
where
    M: RawMutex,
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    /// Read the named register and format it as `"<decimal>\n"`.
    pub async fn attr_show(&self, name: &str) -> Result<String<ATTRIBUTE_TEXT_LEN>> {
        let reg = Register::from_name(name).ok_or(Error::InvalidAddress)?;
        let value = self.read_register(reg).await?;
        let mut text = String::new();
        writeln!(text, "{value}").map_err(|_| Error::Framing)?;
        Ok(text)
    }

    /// Parse `text` and write it to the named register.
    ///
    /// Checked before any bus traffic:
    /// - unknown name: [`Error::InvalidAddress`]
    /// - not a decimal integer: [`Error::Parse`]
    /// - INPMUX outside `[0, num_channels)`: [`Error::InvalidChannel`]
    /// - any other register outside `0..=255`: [`Error::InvalidValue`]
    pub async fn attr_store(&self, name: &str, text: &str) -> Result<()> {
        let reg = Register::from_name(name).ok_or(Error::InvalidAddress)?;
        let value = parse_decimal(text)?;

        let byte = if reg == Register::Inpmux {
            u8::try_from(value)
                .ok()
                .filter(|&ch| self.variant().channel(ch).is_some())
                .ok_or(Error::InvalidChannel)?
        } else {
            u8::try_from(value).map_err(|_| Error::InvalidValue)?
        };

        debug!("attr {} <- {}", reg.name(), byte);
        self.write_register(reg, byte).await
    }
}
