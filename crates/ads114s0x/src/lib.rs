//! Async driver for the TI ADS114S06B / ADS114S08B 16-bit delta-sigma ADC
//!
//! The chip is driven entirely through its SPI command set: RESET, WREG /
//! RREG, START / STOP and RDATA. One [`Ads114s0x`] instance serializes every
//! bus sequence behind a single async mutex, so a one-shot
//! [`read_raw`](Ads114s0x::read_raw) and the streaming
//! [`on_trigger`](Ads114s0x::on_trigger) handler can be driven from
//! different tasks (or threads, with `CriticalSectionRawMutex`) without
//! interleaving frames.
//!
//! # Layers
//!
//! ```text
//! attributes      text get/set per register name
//! device          sequencer, one-shot conversion, streaming session, trigger handler
//! transaction     typed SPI frames in a DMA-safe scratch buffer
//! registers       opcodes, register map, data-rate table
//! embedded-hal    SpiDevice + OutputPin + DelayNs
//! ```
//!
//! # Example
//!
//! ```
//! use ads114s0x::{Ads114s0x, DeviceId, DriverConfig, NoResetPin, SimulatedAds114s0x};
//! use embassy_sync::blocking_mutex::raw::NoopRawMutex;
//!
//! # struct NoDelay;
//! # impl embedded_hal_async::delay::DelayNs for NoDelay {
//! #     async fn delay_ns(&mut self, _ns: u32) {}
//! # }
//! embassy_futures::block_on(async {
//!     let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
//!     chip.set_code(3, 1234);
//!
//!     let adc: Ads114s0x<NoopRawMutex, _, NoResetPin, _> = Ads114s0x::attach(
//!         DeviceId::Ads114s08,
//!         chip,
//!         None,
//!         NoDelay,
//!         DriverConfig::default(),
//!     )
//!     .await?;
//!
//!     assert_eq!(adc.read_raw(3).await?, 1234);
//!     Ok::<(), ads114s0x::Error>(())
//! })
//! .unwrap();
//! ```
//!
//! # Features
//!
//! - `defmt`: log through `defmt`, derive `defmt::Format` on public types
//! - `tracing`: log through `tracing` (host builds)
//! - `std`: `tracing` plus the embassy-time std driver and a std
//!   critical-section implementation, for the simulator and demos

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)]
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

// Must come first: the log macros are textually scoped.
#[macro_use]
mod fmt;

pub mod attributes;
pub mod config;
pub mod device;
pub mod error;
pub mod mock;
pub mod registers;
pub mod scan;
pub mod streaming;
pub mod transaction;
pub mod variant;

pub use attributes::{attribute_names, ATTRIBUTE_TEXT_LEN};
pub use config::DriverConfig;
pub use device::{Ads114s0x, ConversionStep, InfoMask, NoResetPin, SequencerState};
pub use error::{Error, Result};
pub use mock::{SimulatedAds114s0x, SimulatedBusError, SyntheticSource};
pub use registers::{Command, DataRate, Register};
pub use scan::{select_channel, ScanMask};
pub use streaming::{ChannelSink, SoftwareTrigger};
pub use variant::{ChannelSpec, ChipVariant, DeviceId, Endianness};

pub use platform::{Sample, SampleSink, TriggerSource};
