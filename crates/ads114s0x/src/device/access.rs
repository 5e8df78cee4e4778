//! Register access frames
//!
//! Every frame is one `SpiDevice` transaction built in the shared scratch
//! buffer, so callers must hold the device lock (they do, by holding
//! `&mut Inner`).

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::{delay::DelayNs, spi::SpiDevice};

use super::{Ads114s0x, Inner};
use crate::registers::{rreg, wreg, Command, DataRate, Register};
use crate::transaction::{Transaction, CONVERSION_CODE, REGISTER_VALUE};
use crate::Result;

impl<SPI, RST, D> Inner<SPI, RST, D>
where
    SPI: SpiDevice,
{
    /// WREG: `[0x40 | addr, 0x00, value]`.
    ///
    /// The mock-mode switch is handled locally and never reaches the bus.
    pub(crate) async fn write_register(&mut self, reg: Register, value: u8) -> Result<()> {
        if !reg.is_hardware() {
            self.mock_mode = value != 0;
            info!("mock sampling {}", if self.mock_mode { "on" } else { "off" });
            return Ok(());
        }

        Transaction::new(&mut self.scratch)
            .send(&[wreg(reg.addr()), 0x00, value])?
            .execute(&mut self.spi)
            .await?;
        trace!("WREG {} <- {}", reg.name(), value);

        if reg == Register::Datarate {
            self.data_rate = DataRate::from_register(value);
        }
        Ok(())
    }

    /// RREG: send `[0x20 | addr, 0x00]`, then clock in one byte.
    pub(crate) async fn read_register(&mut self, reg: Register) -> Result<u8> {
        if !reg.is_hardware() {
            return Ok(u8::from(self.mock_mode));
        }

        let response = Transaction::new(&mut self.scratch)
            .send(&[rreg(reg.addr()), 0x00])?
            .receive(1)?
            .execute(&mut self.spi)
            .await?;
        let value = REGISTER_VALUE.get(&response)?;
        trace!("RREG {} -> {}", reg.name(), value);
        Ok(value)
    }

    /// Single-byte command frame.
    pub(crate) async fn command(&mut self, command: Command) -> Result<()> {
        Transaction::new(&mut self.scratch)
            .send(&[command as u8])?
            .execute(&mut self.spi)
            .await?;
        trace!("{}", command.name());
        Ok(())
    }

    /// RDATA as a full-duplex exchange of `[0x12, NOP, NOP]`.
    pub(crate) async fn read_data(&mut self) -> Result<i16> {
        let response = Transaction::new(&mut self.scratch)
            .exchange(&[
                Command::ReadData as u8,
                Command::Nop as u8,
                Command::Nop as u8,
            ])?
            .execute(&mut self.spi)
            .await?;
        CONVERSION_CODE.get_i16(&response)
    }

    /// One sample of `channel`: RDATA, or the synthetic source in mock mode.
    pub(crate) async fn sample(&mut self, channel: u8) -> Result<i16> {
        if self.mock_mode {
            Ok(self.synthetic.next(channel))
        } else {
            self.read_data().await
        }
    }
}

impl<M, SPI, RST, D> Ads114s0x<M, SPI, RST, D>
where
    M: RawMutex,
    SPI: SpiDevice,
    RST: OutputPin,
    D: DelayNs,
{
    /// Write one register under the device lock.
    pub async fn write_register(&self, reg: Register, value: u8) -> Result<()> {
        self.inner.lock().await.write_register(reg, value).await
    }

    /// Read one register under the device lock.
    pub async fn read_register(&self, reg: Register) -> Result<u8> {
        self.inner.lock().await.read_register(reg).await
    }

    /// [`write_register`](Self::write_register) by raw address.
    ///
    /// Addresses outside the register map are rejected with
    /// [`InvalidAddress`](crate::Error::InvalidAddress) before any bus I/O.
    pub async fn write_register_at(&self, addr: u8, value: u8) -> Result<()> {
        let reg = Register::try_from(addr)?;
        self.write_register(reg, value).await
    }

    /// [`read_register`](Self::read_register) by raw address.
    pub async fn read_register_at(&self, addr: u8) -> Result<u8> {
        let reg = Register::try_from(addr)?;
        self.read_register(reg).await
    }
}
