//! Simulated ADS114S0x and synthetic sample source
//!
//! [`SimulatedAds114s0x`] implements [`SpiDevice`] by decoding the command
//! stream byte by byte, the way the chip does: every clocked byte first
//! shifts out whatever the chip has queued on DOUT, then the DIN byte is fed
//! to the command decoder. That makes the simulator agnostic to how a frame
//! is split into operations.
//!
//! It keeps a register file with datasheet power-on values, a conversion
//! code per input, a log of the bytes sent in each transaction, and a
//! one-shot fault that fails the next transaction starting with a given
//! opcode. Each operation yields to the executor once so concurrent callers
//! get a chance to interleave if the driver let them.
//!
//! [`SyntheticSource`] backs `SENSOR_MOCK_MODE`: a deterministic per-channel
//! sawtooth that replaces RDATA without touching the bus.

use embedded_hal::spi::{ErrorKind, ErrorType};
use embedded_hal_async::spi::{Operation, SpiDevice};
use heapless::{Deque, Vec};

use crate::registers::{Register, CMD_RREG, CMD_WREG, REG_ADDR_MASK};
use crate::variant::DeviceId;

/// Bytes kept per logged transaction.
pub const FRAME_CAPACITY: usize = 8;

/// Transactions kept in the log; later ones are counted, not stored.
pub const LOG_CAPACITY: usize = 256;

/// Number of inputs the simulator keeps a conversion code for.
pub const SIM_CHANNELS: usize = 16;

/// Registers 0x00..=0x11.
const REGISTER_FILE_LEN: usize = 0x12;

const OUTPUT_DEPTH: usize = 32;

const OPCODE_MASK: u8 = 0xE0;
const INPMUX_CHANNEL_MASK: u8 = 0x0F;

/// Bytes sent during one transaction.
pub type Frame = Vec<u8, FRAME_CAPACITY>;

/// Error reported by [`SimulatedAds114s0x`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimulatedBusError {
    /// Fault armed with [`SimulatedAds114s0x::fail_on_opcode`].
    Injected,
}

impl embedded_hal::spi::Error for SimulatedBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decode {
    Opcode,
    RregCount { addr: u8 },
    WregCount { addr: u8 },
    WregData { addr: u8, remaining: u8 },
    Output { remaining: u8 },
}

/// Register-level model of an ADS114S06B / ADS114S08B behind `SpiDevice`.
pub struct SimulatedAds114s0x {
    id: DeviceId,
    registers: [u8; REGISTER_FILE_LEN],
    codes: [i16; SIM_CHANNELS],
    decode: Decode,
    output: Deque<u8, OUTPUT_DEPTH>,
    converting: bool,
    powered_down: bool,
    starts: u32,
    resets: u32,
    frames: Vec<Frame, LOG_CAPACITY>,
    unlogged: u32,
    fault: Option<u8>,
}

impl SimulatedAds114s0x {
    /// Powered-on chip of the given part, all conversion codes zero.
    pub fn new(id: DeviceId) -> Self {
        let mut chip = Self {
            id,
            registers: [0; REGISTER_FILE_LEN],
            codes: [0; SIM_CHANNELS],
            decode: Decode::Opcode,
            output: Deque::new(),
            converting: false,
            powered_down: false,
            starts: 0,
            resets: 0,
            frames: Vec::new(),
            unlogged: 0,
            fault: None,
        };
        chip.power_on_reset();
        chip
    }

    fn power_on_reset(&mut self) {
        for reg in Register::ALL.into_iter().filter(|r| r.is_hardware()) {
            if let Some(slot) = self.registers.get_mut(usize::from(reg.addr())) {
                *slot = reg.reset_value();
            }
        }
        if let Some(id) = self.registers.get_mut(usize::from(Register::Id.addr())) {
            *id = self.id.variant().dev_id;
        }
        self.decode = Decode::Opcode;
        self.output.clear();
        self.converting = false;
        self.powered_down = false;
    }

    /// Current value of a chip register (0 for the mock-mode switch).
    pub fn register(&self, reg: Register) -> u8 {
        self.registers
            .get(usize::from(reg.addr()))
            .copied()
            .unwrap_or(0)
    }

    /// Code RDATA returns while `channel` is selected in INPMUX.
    pub fn set_code(&mut self, channel: u8, code: i16) {
        if let Some(slot) = self.codes.get_mut(usize::from(channel)) {
            *slot = code;
        }
    }

    /// Fail the next transaction whose first byte is `opcode`.
    ///
    /// The failed frame is still logged; chip state is left untouched.
    pub fn fail_on_opcode(&mut self, opcode: u8) {
        self.fault = Some(opcode);
    }

    /// START received and no STOP / RESET since.
    pub fn is_converting(&self) -> bool {
        self.converting
    }

    /// PWRDWN received and no WAKEUP / RESET since.
    pub fn is_powered_down(&self) -> bool {
        self.powered_down
    }

    /// START commands received.
    pub fn start_count(&self) -> u32 {
        self.starts
    }

    /// RESET commands received.
    pub fn reset_count(&self) -> u32 {
        self.resets
    }

    /// Logged transactions, oldest first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Transactions that arrived after the log filled up.
    pub fn unlogged(&self) -> u32 {
        self.unlogged
    }

    /// Forget logged transactions.
    pub fn clear_frames(&mut self) {
        self.frames.clear();
        self.unlogged = 0;
    }

    fn log(&mut self, frame: Frame) {
        if self.frames.push(frame).is_err() {
            self.unlogged = self.unlogged.saturating_add(1);
        }
    }

    fn selected_code(&self) -> i16 {
        let channel = self.register(Register::Inpmux) & INPMUX_CHANNEL_MASK;
        self.codes.get(usize::from(channel)).copied().unwrap_or(0)
    }

    fn queue(&mut self, byte: u8) {
        // OUTPUT_DEPTH exceeds the register file, so a full queue means a
        // malformed multi-byte read; extra bytes shift out as zero.
        let _ = self.output.push_back(byte);
    }

    fn store(&mut self, addr: u8, value: u8) {
        if addr == Register::Id.addr() {
            return;
        }
        if let Some(slot) = self.registers.get_mut(usize::from(addr)) {
            *slot = value;
        }
    }

    fn opcode(&mut self, byte: u8) {
        match byte {
            0x02 => self.powered_down = false,
            0x04 => self.powered_down = true,
            0x06 => {
                self.resets = self.resets.saturating_add(1);
                self.power_on_reset();
            }
            0x08 => {
                self.starts = self.starts.saturating_add(1);
                self.converting = true;
            }
            0x0A => self.converting = false,
            0x12 => {
                let [msb, lsb] = self.selected_code().to_be_bytes();
                self.queue(msb);
                self.queue(lsb);
                self.decode = Decode::Output { remaining: 2 };
            }
            b if b & OPCODE_MASK == CMD_RREG => {
                self.decode = Decode::RregCount {
                    addr: b & REG_ADDR_MASK,
                };
            }
            b if b & OPCODE_MASK == CMD_WREG => {
                self.decode = Decode::WregCount {
                    addr: b & REG_ADDR_MASK,
                };
            }
            // NOP, calibration and undefined opcodes.
            _ => {}
        }
    }

    fn feed(&mut self, byte: u8) {
        self.decode = match self.decode {
            Decode::Opcode => {
                self.opcode(byte);
                return;
            }
            Decode::RregCount { addr } => {
                let count = (byte & REG_ADDR_MASK).saturating_add(1);
                for offset in 0..count {
                    let value = self
                        .registers
                        .get(usize::from(addr.saturating_add(offset)))
                        .copied()
                        .unwrap_or(0);
                    self.queue(value);
                }
                Decode::Output { remaining: count }
            }
            Decode::WregCount { addr } => Decode::WregData {
                addr,
                remaining: (byte & REG_ADDR_MASK).saturating_add(1),
            },
            Decode::WregData { addr, remaining } => {
                self.store(addr, byte);
                match remaining.checked_sub(1) {
                    Some(left) if left > 0 => Decode::WregData {
                        addr: addr.saturating_add(1),
                        remaining: left,
                    },
                    _ => Decode::Opcode,
                }
            }
            Decode::Output { remaining } => match remaining.checked_sub(1) {
                Some(left) if left > 0 => Decode::Output { remaining: left },
                _ => Decode::Opcode,
            },
        };
    }

    /// One SCLK byte: shift DOUT out, then decode DIN.
    fn clock(&mut self, din: u8) -> u8 {
        let dout = self.output.pop_front().unwrap_or(0x00);
        self.feed(din);
        dout
    }

    fn first_sent_byte(operations: &[Operation<'_, u8>]) -> Option<u8> {
        operations.iter().find_map(|op| match op {
            Operation::Write(tx) | Operation::Transfer(_, tx) => tx.first().copied(),
            Operation::TransferInPlace(buf) => buf.first().copied(),
            Operation::Read(_) | Operation::DelayNs(_) => None,
        })
    }
}

impl ErrorType for SimulatedAds114s0x {
    type Error = SimulatedBusError;
}

impl SpiDevice for SimulatedAds114s0x {
    async fn transaction(
        &mut self,
        operations: &mut [Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        let mut frame = Frame::new();

        let first = Self::first_sent_byte(operations);
        if first.is_some() && first == self.fault {
            self.fault = None;
            for op in operations.iter() {
                if let Operation::Write(tx) | Operation::Transfer(_, tx) = op {
                    let _ = frame.extend_from_slice(tx);
                }
            }
            self.log(frame);
            return Err(SimulatedBusError::Injected);
        }

        for op in operations.iter_mut() {
            embassy_futures::yield_now().await;
            match op {
                Operation::Write(tx) => {
                    for &byte in tx.iter() {
                        let _ = frame.push(byte);
                        self.clock(byte);
                    }
                }
                Operation::Read(rx) => {
                    for slot in rx.iter_mut() {
                        *slot = self.clock(0x00);
                    }
                }
                Operation::Transfer(rx, tx) => {
                    let len = rx.len().max(tx.len());
                    for i in 0..len {
                        let byte = tx.get(i).copied().unwrap_or(0x00);
                        let _ = frame.push(byte);
                        let dout = self.clock(byte);
                        if let Some(slot) = rx.get_mut(i) {
                            *slot = dout;
                        }
                    }
                }
                Operation::TransferInPlace(buf) => {
                    for slot in buf.iter_mut() {
                        let _ = frame.push(*slot);
                        *slot = self.clock(*slot);
                    }
                }
                Operation::DelayNs(_) => {}
            }
        }

        // CS release aborts any half-clocked read.
        self.output.clear();
        if matches!(self.decode, Decode::Output { .. }) {
            self.decode = Decode::Opcode;
        }
        self.log(frame);
        Ok(())
    }
}

/// Length of one synthetic sawtooth period, in samples.
pub const SAWTOOTH_PERIOD: u16 = 64;

/// Code offset between neighbouring channels.
pub const CHANNEL_OFFSET: i16 = 1000;

/// Deterministic synthetic samples: channel `n` yields
/// `n * 1000 + 0, 1, 2, ... 63, 0, 1, ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticSource {
    phase: [u16; SIM_CHANNELS],
}

impl SyntheticSource {
    /// Every channel at phase 0.
    pub const fn new() -> Self {
        Self {
            phase: [0; SIM_CHANNELS],
        }
    }

    /// Next sample of `channel`.
    pub fn next(&mut self, channel: u8) -> i16 {
        let channel = channel & INPMUX_CHANNEL_MASK;
        let Some(slot) = self.phase.get_mut(usize::from(channel)) else {
            return 0;
        };
        let phase = *slot;
        *slot = phase
            .saturating_add(1)
            .checked_rem(SAWTOOTH_PERIOD)
            .unwrap_or(0);
        i16::from(channel)
            .saturating_mul(CHANNEL_OFFSET)
            .saturating_add(i16::try_from(phase).unwrap_or(0))
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    use embassy_futures::block_on;

    fn write(chip: &mut SimulatedAds114s0x, bytes: &[u8]) -> Result<(), SimulatedBusError> {
        block_on(chip.transaction(&mut [Operation::Write(bytes)]))
    }

    fn read_reg(chip: &mut SimulatedAds114s0x, addr: u8) -> u8 {
        let mut rx = [0u8; 1];
        block_on(chip.transaction(&mut [
            Operation::Write(&[CMD_RREG | addr, 0x00]),
            Operation::Read(&mut rx),
        ]))
        .unwrap();
        rx[0]
    }

    #[test]
    fn power_on_values() {
        let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
        assert_eq!(read_reg(&mut chip, 0x00), 0b100);
        assert_eq!(read_reg(&mut chip, 0x01), 0x80);
        assert_eq!(read_reg(&mut chip, 0x04), 0x14);
        assert_eq!(read_reg(&mut chip, 0x07), 0xFF);
        assert_eq!(
            SimulatedAds114s0x::new(DeviceId::Ads114s06).register(Register::Id),
            0b101
        );
    }

    #[test]
    fn wreg_then_rreg() {
        let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
        write(&mut chip, &[CMD_WREG | 0x03, 0x00, 0x5A]).unwrap();
        assert_eq!(read_reg(&mut chip, 0x03), 0x5A);
        assert_eq!(chip.register(Register::Pga), 0x5A);
    }

    #[test]
    fn id_is_read_only() {
        let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
        write(&mut chip, &[CMD_WREG, 0x00, 0xFF]).unwrap();
        assert_eq!(chip.register(Register::Id), 0b100);
    }

    #[test]
    fn rdata_returns_selected_channel_code() {
        let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
        chip.set_code(4, -2);
        write(&mut chip, &[CMD_WREG | 0x02, 0x00, 0x04]).unwrap();

        let mut rx = [0u8; 3];
        block_on(chip.transaction(&mut [Operation::Transfer(&mut rx, &[0x12, 0x00, 0x00])]))
            .unwrap();
        assert_eq!(i16::from_be_bytes([rx[1], rx[2]]), -2);
    }

    #[test]
    fn commands_drive_chip_state() {
        let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
        write(&mut chip, &[0x08]).unwrap();
        assert!(chip.is_converting());
        write(&mut chip, &[0x0A]).unwrap();
        assert!(!chip.is_converting());
        write(&mut chip, &[0x04]).unwrap();
        assert!(chip.is_powered_down());
        write(&mut chip, &[0x02]).unwrap();
        assert!(!chip.is_powered_down());

        write(&mut chip, &[CMD_WREG | 0x04, 0x00, 0x1E]).unwrap();
        write(&mut chip, &[0x06]).unwrap();
        assert_eq!(chip.register(Register::Datarate), 0x14);
        assert_eq!(chip.reset_count(), 1);
        assert_eq!(chip.start_count(), 1);
    }

    #[test]
    fn injected_fault_fires_once_and_is_logged() {
        let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
        chip.fail_on_opcode(0x08);
        assert_eq!(write(&mut chip, &[0x08]), Err(SimulatedBusError::Injected));
        assert!(!chip.is_converting());
        write(&mut chip, &[0x08]).unwrap();
        assert!(chip.is_converting());
        assert_eq!(chip.frames().len(), 2);
    }

    #[test]
    fn log_records_sent_bytes_per_transaction() {
        let mut chip = SimulatedAds114s0x::new(DeviceId::Ads114s08);
        write(&mut chip, &[CMD_WREG | 0x02, 0x00, 0x05]).unwrap();
        read_reg(&mut chip, 0x02);
        let frames: std::vec::Vec<&[u8]> = chip.frames().iter().map(|f| f.as_slice()).collect();
        assert_eq!(frames, vec![&[0x42, 0x00, 0x05][..], &[0x22, 0x00][..]]);
        chip.clear_frames();
        assert!(chip.frames().is_empty());
    }

    #[test]
    fn synthetic_source_is_deterministic_per_channel() {
        let mut a = SyntheticSource::new();
        let mut b = SyntheticSource::new();
        let seq_a: std::vec::Vec<i16> = (0..3).map(|_| a.next(3)).collect();
        assert_eq!(seq_a, vec![3000, 3001, 3002]);
        assert_eq!(b.next(3), 3000);
        assert_eq!(a.next(0), 0);
        for _ in 0..SAWTOOTH_PERIOD {
            b.next(1);
        }
        assert_eq!(b.next(1), 1000);
    }
}
