//! Part identity and channel tables
//!
//! | Part        | Inputs | DEV_ID | Compatible string  |
//! |-------------|--------|--------|--------------------|
//! | ADS114S06B  | 6      | 0b101  | `ti,ads114s06b`    |
//! | ADS114S08B  | 12     | 0b100  | `ti,ads114s08b`    |

use crate::registers::{DEV_ID_ADS114S06, DEV_ID_ADS114S08};
use crate::{Error, Result};

/// Byte order of a stored sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Endianness {
    /// Most significant byte first.
    Big,
    /// Least significant byte first.
    Little,
}

/// Static description of one analog input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSpec {
    /// Input index, also the value written to INPMUX to select it.
    pub index: u8,
    /// Significant bits in a conversion result.
    pub real_bits: u8,
    /// Storage bits per sample.
    pub storage_bits: u8,
    /// Two's-complement results.
    pub signed: bool,
    /// Storage byte order.
    pub endianness: Endianness,
}

impl ChannelSpec {
    /// Voltage input as produced by the ADS114S0x: 16-bit signed, big-endian.
    pub const fn voltage(index: u8) -> Self {
        Self {
            index,
            real_bits: 16,
            storage_bits: 16,
            signed: true,
            endianness: Endianness::Big,
        }
    }
}

// N is at most 12, so the index and the u8 narrowing cannot overflow.
#[allow(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    clippy::cast_possible_truncation
)]
const fn channel_table<const N: usize>() -> [ChannelSpec; N] {
    let mut table = [ChannelSpec::voltage(0); N];
    let mut i = 0;
    while i < N {
        table[i] = ChannelSpec::voltage(i as u8);
        i += 1;
    }
    table
}

const ADS114S06_CHANNELS: [ChannelSpec; 6] = channel_table();
const ADS114S08_CHANNELS: [ChannelSpec; 12] = channel_table();

/// Supported part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceId {
    /// ADS114S06B, 6 inputs.
    Ads114s06,
    /// ADS114S08B, 12 inputs.
    Ads114s08,
}

impl DeviceId {
    /// Every supported part.
    pub const ALL: [DeviceId; 2] = [Self::Ads114s06, Self::Ads114s08];

    /// Resolve a bare device name (`"ads114s08b"`).
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.variant().name == name)
            .ok_or(Error::UnknownDevice)
    }

    /// Resolve a vendor-prefixed compatible string (`"ti,ads114s08b"`).
    pub fn from_compatible(compatible: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.variant().compatible == compatible)
            .ok_or(Error::UnknownDevice)
    }

    /// Resolve the DEV_ID field of the ID register.
    pub fn from_dev_id(dev_id: u8) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|id| id.variant().dev_id == dev_id)
            .ok_or(Error::UnknownDevice)
    }

    /// Static description of this part.
    pub const fn variant(self) -> &'static ChipVariant {
        match self {
            Self::Ads114s06 => &ADS114S06,
            Self::Ads114s08 => &ADS114S08,
        }
    }
}

/// Static description of a part.
#[derive(Debug, PartialEq, Eq)]
pub struct ChipVariant {
    /// Device name.
    pub name: &'static str,
    /// Vendor-prefixed compatible string.
    pub compatible: &'static str,
    /// Expected ID register DEV_ID field.
    pub dev_id: u8,
    /// Inputs, indexed by channel number.
    pub channels: &'static [ChannelSpec],
}

impl ChipVariant {
    /// Number of analog inputs.
    #[allow(clippy::cast_possible_truncation)] // at most 12
    pub const fn num_channels(&self) -> u8 {
        self.channels.len() as u8
    }

    /// Channel descriptor, if `channel` exists on this part.
    pub fn channel(&self, channel: u8) -> Option<&'static ChannelSpec> {
        self.channels.get(usize::from(channel))
    }
}

const ADS114S06: ChipVariant = ChipVariant {
    name: "ads114s06b",
    compatible: "ti,ads114s06b",
    dev_id: DEV_ID_ADS114S06,
    channels: &ADS114S06_CHANNELS,
};

const ADS114S08: ChipVariant = ChipVariant {
    name: "ads114s08b",
    compatible: "ti,ads114s08b",
    dev_id: DEV_ID_ADS114S08,
    channels: &ADS114S08_CHANNELS,
};
