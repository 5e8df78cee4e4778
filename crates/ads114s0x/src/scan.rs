//! Scan mask and channel selection for streaming capture

use crate::{Error, Result};

/// Set of channels enabled for streaming, bounded by the part's input count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanMask {
    bits: u16,
    num_channels: u8,
}

impl ScanMask {
    /// Empty mask for a part with `num_channels` inputs (clamped to 16).
    pub const fn new(num_channels: u8) -> Self {
        let num_channels = if num_channels > 16 { 16 } else { num_channels };
        Self {
            bits: 0,
            num_channels,
        }
    }

    /// Mask with exactly `channels` enabled.
    pub fn from_channels(num_channels: u8, channels: &[u8]) -> Result<Self> {
        let mut mask = Self::new(num_channels);
        for &channel in channels {
            mask.enable(channel)?;
        }
        Ok(mask)
    }

    /// Input count this mask is bounded by.
    pub const fn num_channels(&self) -> u8 {
        self.num_channels
    }

    fn bit(&self, channel: u8) -> Result<u16> {
        if channel < self.num_channels {
            1u16.checked_shl(u32::from(channel))
                .ok_or(Error::InvalidChannel)
        } else {
            Err(Error::InvalidChannel)
        }
    }

    /// Enable `channel`.
    pub fn enable(&mut self, channel: u8) -> Result<()> {
        self.bits |= self.bit(channel)?;
        Ok(())
    }

    /// Disable `channel`.
    pub fn disable(&mut self, channel: u8) -> Result<()> {
        self.bits &= !self.bit(channel)?;
        Ok(())
    }

    /// Whether `channel` is enabled (false for out-of-range channels).
    pub fn is_enabled(&self, channel: u8) -> bool {
        self.bit(channel).is_ok_and(|bit| self.bits & bit != 0)
    }

    /// No channel enabled.
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Lowest enabled channel.
    #[allow(clippy::cast_possible_truncation)] // trailing_zeros of a u16 is at most 16
    pub const fn first_enabled(&self) -> Option<u8> {
        if self.bits == 0 {
            None
        } else {
            Some(self.bits.trailing_zeros() as u8)
        }
    }

    /// Enabled channels in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.num_channels).filter(move |&ch| self.is_enabled(ch))
    }

    /// Raw bit pattern, bit `n` = channel `n`.
    pub const fn bits(&self) -> u16 {
        self.bits
    }
}

/// Channel a streaming session samples: the lowest enabled channel, or
/// channel 0 when the mask is empty.
pub fn select_channel(mask: &ScanMask) -> u8 {
    mask.first_enabled().unwrap_or(0)
}
