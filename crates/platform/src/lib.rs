//! Hardware Abstraction Layer (HAL) for delta-sigma ADC acquisition
//!
//! This crate provides the hardware-independent vocabulary shared between
//! ADC drivers and the code that consumes their samples, so acquisition
//! pipelines can be developed and tested without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application / framework glue
//!         ↓
//! ADC driver (ads114s0x crate)
//!         ↓
//! Platform HAL (this crate - sample, sink, trigger, bus config)
//!         ↓
//! embedded-hal implementation (Embassy HAL, linux-embedded-hal, mocks)
//! ```
//!
//! # Modules
//!
//! - [`acquisition`] - [`Sample`], [`SampleSink`], [`TriggerSource`]
//! - [`peripheral`] - SPI bus configuration
//! - [`dma_safety`] - aligned scratch buffers for command framing
//! - [`config`] - driver identity constants
//!
//! # Features
//!
//! - `defmt`: derive `defmt::Format` on all public types
//!
//! # Example
//!
//! ```
//! use platform::{Sample, SampleSink};
//!
//! let mut sink: heapless::Deque<Sample, 16> = heapless::Deque::new();
//! sink.push(Sample { channel: 3, value: 42, timestamp_us: 10 });
//! assert_eq!(sink.len(), 1);
//! ```

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
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors, callers decide
#![allow(clippy::module_name_repetitions)]

pub mod acquisition;
pub mod config;
pub mod dma_safety;
pub mod peripheral;

pub use acquisition::{Sample, SampleSink, TriggerSource};
pub use dma_safety::DmaScratch;
pub use peripheral::{BitOrder, SpiConfig, SpiMode};
