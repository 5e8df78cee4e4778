//! Peripheral configuration
//!
//! Bus settings a board must apply to its SPI peripheral before handing the
//! resulting `SpiDevice` to a driver. The driver itself only sees the
//! `embedded-hal` traits; it cannot reconfigure the bus.

/// SPI configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL, CPHA)
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: BitOrder,
}

impl SpiConfig {
    /// Maximum SCLK for the ADS114S0x family (t_SCLK ≥ 100 ns).
    pub const ADS114S0X_MAX_FREQUENCY_HZ: u32 = 10_000_000;

    /// Reference configuration for the ADS114S06B / ADS114S08B.
    ///
    /// The converter shifts data out on the rising edge and latches on the
    /// falling edge: SPI mode 1, MSB first. 4 MHz leaves margin on long
    /// board traces.
    pub const fn ads114s0x() -> Self {
        Self {
            frequency: 4_000_000,
            mode: SpiMode::Mode1,
            bit_order: BitOrder::MsbFirst,
        }
    }

    /// Whether this configuration is within the ADS114S0x interface limits.
    pub const fn is_valid_for_ads114s0x(&self) -> bool {
        self.frequency > 0
            && self.frequency <= Self::ADS114S0X_MAX_FREQUENCY_HZ
            && matches!(self.mode, SpiMode::Mode1)
            && matches!(self.bit_order, BitOrder::MsbFirst)
    }
}

/// SPI modes (CPOL, CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

/// Bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_config_is_mode1_msb_first() {
        let cfg = SpiConfig::ads114s0x();
        assert_eq!(cfg.mode, SpiMode::Mode1);
        assert_eq!(cfg.bit_order, BitOrder::MsbFirst);
        assert!(cfg.is_valid_for_ads114s0x());
    }

    #[test]
    fn overclocked_or_wrong_mode_is_rejected() {
        let fast = SpiConfig {
            frequency: 20_000_000,
            ..SpiConfig::ads114s0x()
        };
        assert!(!fast.is_valid_for_ads114s0x());

        let mode0 = SpiConfig {
            mode: SpiMode::Mode0,
            ..SpiConfig::ads114s0x()
        };
        assert!(!mode0.is_valid_for_ads114s0x());
    }
}
