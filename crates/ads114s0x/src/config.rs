//! Driver timing configuration
//!
//! Derived from the ADS114S0xB datasheet timing requirements (§7.6) at the
//! nominal 4.096 MHz internal oscillator.

/// Internal oscillator frequency.
pub const OSC_FREQ_HZ: u32 = 4_096_000;

/// One oscillator period, rounded up to whole nanoseconds.
pub const T_CLK_NS: u32 = 1_000_000_000_u32.div_ceil(OSC_FREQ_HZ);

/// Datasheet minimum RESET pin low time: 4 t_CLK.
pub const RESET_PULSE_MIN_NS: u32 = 977;

/// Margin applied to the minimum reset pulse.
///
/// The delay provider may be far coarser than one t_CLK on some boards.
pub const RESET_PULSE_MARGIN: u32 = 100;

/// Default RESET low time (100 × the datasheet minimum, ≈ 98 µs).
pub const DEFAULT_RESET_PULSE_NS: u32 = RESET_PULSE_MIN_NS * RESET_PULSE_MARGIN;

/// Wait after a reset before the first command: 4096 t_CLK ≈ 1 ms.
pub const DEFAULT_POST_RESET_DELAY_US: u32 = 1_000;

/// Extra time added to one conversion period before RDATA.
pub const DEFAULT_SETTLE_MARGIN_US: u32 = 500;

/// Runtime-tunable timing.
///
/// Every field is a lower bound; the delay provider may wait longer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverConfig {
    /// RESET pin low time in nanoseconds.
    pub reset_pulse_ns: u32,
    /// Delay after either reset path before further communication.
    pub post_reset_delay_us: u32,
    /// Added to the data-rate period when waiting for a one-shot conversion.
    pub settle_margin_us: u32,
}

impl DriverConfig {
    /// Datasheet reference timing with the default margins.
    pub const fn datasheet() -> Self {
        Self {
            reset_pulse_ns: DEFAULT_RESET_PULSE_NS,
            post_reset_delay_us: DEFAULT_POST_RESET_DELAY_US,
            settle_margin_us: DEFAULT_SETTLE_MARGIN_US,
        }
    }

    /// Reset pulse width, never shorter than the datasheet minimum.
    pub const fn effective_reset_pulse_ns(&self) -> u32 {
        if self.reset_pulse_ns < RESET_PULSE_MIN_NS {
            RESET_PULSE_MIN_NS
        } else {
            self.reset_pulse_ns
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self::datasheet()
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn minimum_pulse_is_four_clock_periods() {
        // 4 × 244.14 ns = 976.6 ns
        assert_eq!(T_CLK_NS, 245);
        assert!(u64::from(RESET_PULSE_MIN_NS) * u64::from(OSC_FREQ_HZ) >= 4 * 1_000_000_000);
    }

    #[test]
    fn default_pulse_has_margin() {
        let config = DriverConfig::default();
        assert_eq!(config.reset_pulse_ns, 97_700);
        assert!(config.effective_reset_pulse_ns() >= 100 * RESET_PULSE_MIN_NS);
    }

    #[test]
    fn pulse_is_clamped_to_datasheet_minimum() {
        let config = DriverConfig {
            reset_pulse_ns: 10,
            ..DriverConfig::default()
        };
        assert_eq!(config.effective_reset_pulse_ns(), RESET_PULSE_MIN_NS);
    }

    #[test]
    fn post_reset_delay_covers_4096_clocks() {
        let needed_us = 4096 * 1_000_000 / OSC_FREQ_HZ;
        assert!(DEFAULT_POST_RESET_DELAY_US >= needed_us);
    }
}
