//! ADS114S06B / ADS114S08B register map and command set
//!
//! Source: Texas Instruments ADS114S0xB datasheet (SBAS760), §9.5 (commands)
//! and §9.6 (register map).
//!
//! # SPI framing
//!
//! | Command | Byte 0        | Byte 1            | Following        |
//! |---------|---------------|-------------------|------------------|
//! | RREG    | `0x20 \| addr` | count − 1         | register bytes out |
//! | WREG    | `0x40 \| addr` | count − 1         | register bytes in  |
//! | RDATA   | `0x12`        | conversion MSB out | LSB out          |
//! | others  | opcode        |                   |                  |
//!
//! Addresses are five bits wide; the driver only ever transfers one
//! register per frame (count − 1 = 0).
//!
//! Address 0xFF is not a chip register. It is the driver-side
//! `SENSOR_MOCK_MODE` switch and never reaches the bus.

// ---------------------------------------------------------------------------
// Command opcodes
// ---------------------------------------------------------------------------

/// Single-byte command opcodes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// No operation; also used as filler while clocking data out.
    Nop = 0x00,
    /// Exit power-down mode.
    Wakeup = 0x02,
    /// Enter power-down mode.
    PowerDown = 0x04,
    /// Reset to power-on register values.
    Reset = 0x06,
    /// Start or restart conversions.
    Start = 0x08,
    /// Stop conversions after the one in progress.
    Stop = 0x0A,
    /// Read the most recent conversion result.
    ReadData = 0x12,
}

impl Command {
    /// Datasheet mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nop => "NOP",
            Self::Wakeup => "WAKEUP",
            Self::PowerDown => "PWRDWN",
            Self::Reset => "RESET",
            Self::Start => "START",
            Self::Stop => "STOP",
            Self::ReadData => "RDATA",
        }
    }
}

/// RREG opcode prefix (`001r rrrr`).
pub const CMD_RREG: u8 = 0x20;
/// WREG opcode prefix (`010r rrrr`).
pub const CMD_WREG: u8 = 0x40;
/// Register address field mask for RREG / WREG.
pub const REG_ADDR_MASK: u8 = 0x1F;

/// Build the first byte of an RREG frame.
pub const fn rreg(addr: u8) -> u8 {
    CMD_RREG | (addr & REG_ADDR_MASK)
}

/// Build the first byte of a WREG frame.
pub const fn wreg(addr: u8) -> u8 {
    CMD_WREG | (addr & REG_ADDR_MASK)
}

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Named registers, including the driver-only mock-mode switch.
///
/// Addresses 0x0A and 0x0D are reserved on the chip and have no variant.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Device ID (read-only; DEV_ID in bits 2:0).
    Id = 0x00,
    /// Device status (FL_POR, RDY, monitor flags).
    Status = 0x01,
    /// Input multiplexer (MUXP 7:4, MUXN 3:0).
    Inpmux = 0x02,
    /// PGA gain and conversion delay.
    Pga = 0x03,
    /// Data rate, filter, clock source and conversion mode.
    Datarate = 0x04,
    /// Reference selection and buffers.
    Ref = 0x05,
    /// Excitation current magnitude.
    Idacmag = 0x06,
    /// Excitation current multiplexer.
    Idacmux = 0x07,
    /// Sensor bias.
    Vbias = 0x08,
    /// System control (SENDSTAT, CRC, timeout, monitors).
    Sys = 0x09,
    /// Offset calibration, low byte.
    Ofcal0 = 0x0B,
    /// Offset calibration, high byte.
    Ofcal1 = 0x0C,
    /// Gain calibration, low byte.
    Fscal0 = 0x0E,
    /// Gain calibration, high byte.
    Fscal1 = 0x0F,
    /// GPIO data.
    Gpiodat = 0x10,
    /// GPIO configuration.
    Gpiocon = 0x11,
    /// Driver-side synthetic sampling switch (not a chip register).
    SensorMockMode = 0xFF,
}

impl Register {
    /// Every register in address order.
    pub const ALL: [Register; 17] = [
        Self::Id,
        Self::Status,
        Self::Inpmux,
        Self::Pga,
        Self::Datarate,
        Self::Ref,
        Self::Idacmag,
        Self::Idacmux,
        Self::Vbias,
        Self::Sys,
        Self::Ofcal0,
        Self::Ofcal1,
        Self::Fscal0,
        Self::Fscal1,
        Self::Gpiodat,
        Self::Gpiocon,
        Self::SensorMockMode,
    ];

    /// One-byte register address.
    pub const fn addr(self) -> u8 {
        self as u8
    }

    /// Datasheet name, as exposed by the attribute layer.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Status => "STATUS",
            Self::Inpmux => "INPMUX",
            Self::Pga => "PGA",
            Self::Datarate => "DATARATE",
            Self::Ref => "REF",
            Self::Idacmag => "IDACMAG",
            Self::Idacmux => "IDACMUX",
            Self::Vbias => "VBIAS",
            Self::Sys => "SYS",
            Self::Ofcal0 => "OFCAL0",
            Self::Ofcal1 => "OFCAL1",
            Self::Fscal0 => "FSCAL0",
            Self::Fscal1 => "FSCAL1",
            Self::Gpiodat => "GPIODAT",
            Self::Gpiocon => "GPIOCON",
            Self::SensorMockMode => platform::config::MOCK_MODE_ATTRIBUTE,
        }
    }

    /// Look a register up by its datasheet name (exact, case-sensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|reg| reg.name() == name)
    }

    /// Whether the register lives on the chip (false for the mock switch).
    pub const fn is_hardware(self) -> bool {
        !matches!(self, Self::SensorMockMode)
    }

    /// Power-on value of a hardware register.
    ///
    /// `ID` depends on the part and is reported as 0 here; the simulated chip
    /// derives it from the variant.
    pub const fn reset_value(self) -> u8 {
        match self {
            Self::Status => 0x80,
            Self::Inpmux => 0x01,
            Self::Datarate => 0x14,
            Self::Ref => 0x10,
            Self::Idacmux => 0xFF,
            Self::Sys => 0x10,
            Self::Fscal1 => 0x40,
            Self::Id
            | Self::Pga
            | Self::Idacmag
            | Self::Vbias
            | Self::Ofcal0
            | Self::Ofcal1
            | Self::Fscal0
            | Self::Gpiodat
            | Self::Gpiocon
            | Self::SensorMockMode => 0x00,
        }
    }
}

impl TryFrom<u8> for Register {
    type Error = crate::Error;

    fn try_from(addr: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|reg| reg.addr() == addr)
            .ok_or(crate::Error::InvalidAddress)
    }
}

// ---------------------------------------------------------------------------
// Register field values
// ---------------------------------------------------------------------------

/// ID register: DEV_ID field mask.
pub const ID_DEV_MASK: u8 = 0b0000_0111;
/// DEV_ID of the 12-input ADS114S08B.
pub const DEV_ID_ADS114S08: u8 = 0b100;
/// DEV_ID of the 6-input ADS114S06B.
pub const DEV_ID_ADS114S06: u8 = 0b101;

/// DATARATE register: DR[3:0] field mask.
pub const DATARATE_DR_MASK: u8 = 0x0F;

/// Output data rate selected by DATARATE DR[3:0].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataRate {
    /// 2.5 SPS
    Sps2_5,
    /// 5 SPS
    Sps5,
    /// 10 SPS
    Sps10,
    /// 16.6 SPS
    Sps16_6,
    /// 20 SPS (power-on default)
    Sps20,
    /// 50 SPS
    Sps50,
    /// 60 SPS
    Sps60,
    /// 100 SPS
    Sps100,
    /// 200 SPS
    Sps200,
    /// 400 SPS
    Sps400,
    /// 800 SPS
    Sps800,
    /// 1000 SPS
    Sps1000,
    /// 2000 SPS
    Sps2000,
    /// 4000 SPS (DR = 1101 and 1110)
    Sps4000,
}

impl DataRate {
    /// Decode DR[3:0] from a DATARATE register value.
    ///
    /// DR = 1111 is reserved; it is treated as the slowest rate so the
    /// settle delay never undershoots.
    pub const fn from_register(value: u8) -> Self {
        match value & DATARATE_DR_MASK {
            0b0001 => Self::Sps5,
            0b0010 => Self::Sps10,
            0b0011 => Self::Sps16_6,
            0b0100 => Self::Sps20,
            0b0101 => Self::Sps50,
            0b0110 => Self::Sps60,
            0b0111 => Self::Sps100,
            0b1000 => Self::Sps200,
            0b1001 => Self::Sps400,
            0b1010 => Self::Sps800,
            0b1011 => Self::Sps1000,
            0b1100 => Self::Sps2000,
            0b1101 | 0b1110 => Self::Sps4000,
            _ => Self::Sps2_5,
        }
    }

    /// One conversion period in microseconds (rounded up).
    pub const fn period_us(self) -> u32 {
        match self {
            Self::Sps2_5 => 400_000,
            Self::Sps5 => 200_000,
            Self::Sps10 => 100_000,
            Self::Sps16_6 => 60_241,
            Self::Sps20 => 50_000,
            Self::Sps50 => 20_000,
            Self::Sps60 => 16_667,
            Self::Sps100 => 10_000,
            Self::Sps200 => 5_000,
            Self::Sps400 => 2_500,
            Self::Sps800 => 1_250,
            Self::Sps1000 => 1_000,
            Self::Sps2000 => 500,
            Self::Sps4000 => 250,
        }
    }
}

impl Default for DataRate {
    fn default() -> Self {
        Self::from_register(Register::Datarate.reset_value())
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn addresses_match_datasheet() {
        assert_eq!(Register::Id.addr(), 0x00);
        assert_eq!(Register::Inpmux.addr(), 0x02);
        assert_eq!(Register::Sys.addr(), 0x09);
        assert_eq!(Register::Ofcal0.addr(), 0x0B);
        assert_eq!(Register::Fscal0.addr(), 0x0E);
        assert_eq!(Register::Gpiocon.addr(), 0x11);
        assert_eq!(Register::SensorMockMode.addr(), 0xFF);
    }

    #[test]
    fn address_and_name_lookup_are_bijective() {
        for reg in Register::ALL {
            assert_eq!(Register::try_from(reg.addr()), Ok(reg));
            assert_eq!(Register::from_name(reg.name()), Some(reg));
        }
        for (i, a) in Register::ALL.iter().enumerate() {
            for b in Register::ALL.iter().skip(i + 1) {
                assert_ne!(a.addr(), b.addr());
                assert_ne!(a.name(), b.name());
            }
        }
    }

    #[test]
    fn reserved_addresses_are_rejected() {
        assert_eq!(Register::try_from(0x0A), Err(crate::Error::InvalidAddress));
        assert_eq!(Register::try_from(0x0D), Err(crate::Error::InvalidAddress));
        assert_eq!(Register::try_from(0x12), Err(crate::Error::InvalidAddress));
        assert_eq!(Register::from_name("inpmux"), None);
    }

    #[test]
    fn frame_opcodes_embed_address() {
        assert_eq!(rreg(Register::Inpmux.addr()), 0x22);
        assert_eq!(wreg(Register::Datarate.addr()), 0x44);
        assert_eq!(wreg(Register::Gpiocon.addr()), 0x51);
    }

    #[test]
    fn default_data_rate_is_20_sps() {
        assert_eq!(DataRate::default(), DataRate::Sps20);
        assert_eq!(DataRate::default().period_us(), 50_000);
        assert_eq!(DataRate::from_register(0x1E), DataRate::Sps4000);
        assert_eq!(DataRate::from_register(0x0F), DataRate::Sps2_5);
    }
}
