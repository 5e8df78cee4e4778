//! SPI transaction builder
//!
//! A [`Transaction`] describes one chip-select-framed exchange as an ordered
//! list of segments laid out back to back in a caller-owned
//! [`DmaScratch`] buffer:
//!
//! ```text
//!  scratch:  | send bytes | receive slot | exchange tx | exchange rx | ...
//!  segments: [ Send(0,2),   Receive(2,1),  Exchange(3,3)              ]
//! ```
//!
//! [`Transaction::execute`] hands the segments to
//! [`SpiDevice::transaction`] as a single operation list, so chip select
//! stays asserted from the first byte to the last. The bytes clocked in by
//! receive and exchange segments are concatenated into a [`Response`];
//! [`ByteField`] and [`Be16Field`] pick typed values out of it.

use embedded_hal_async::spi::{Operation, SpiDevice};
use heapless::Vec;
use platform::DmaScratch;

use crate::{Error, Result};

/// Scratch bytes reserved per device; the largest frame (RDATA as a
/// full-duplex exchange) needs six.
pub const SCRATCH_LEN: usize = 8;

/// Upper bound on segments in one transaction.
pub const MAX_SEGMENTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    Send,
    Receive,
    Exchange,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
    kind: SegmentKind,
    offset: usize,
    len: usize,
}

impl Segment {
    /// Scratch bytes occupied: exchanges hold tx and rx halves.
    fn footprint(&self) -> Option<usize> {
        match self.kind {
            SegmentKind::Send | SegmentKind::Receive => Some(self.len),
            SegmentKind::Exchange => self.len.checked_mul(2),
        }
    }

    /// Scratch range holding the bytes this segment clocks in, if any.
    fn rx_range(&self) -> Option<core::ops::Range<usize>> {
        let start = match self.kind {
            SegmentKind::Send => return None,
            SegmentKind::Receive => self.offset,
            SegmentKind::Exchange => self.offset.checked_add(self.len)?,
        };
        Some(start..start.checked_add(self.len)?)
    }
}

/// Ordered segment list for one chip-select-framed exchange.
pub struct Transaction<'a, const N: usize> {
    scratch: &'a mut DmaScratch<N>,
    segments: Vec<Segment, MAX_SEGMENTS>,
    used: usize,
}

impl<'a, const N: usize> Transaction<'a, N> {
    /// Start an empty transaction over `scratch` (cleared first).
    pub fn new(scratch: &'a mut DmaScratch<N>) -> Self {
        scratch.clear();
        Self {
            scratch,
            segments: Vec::new(),
            used: 0,
        }
    }

    fn reserve(&mut self, kind: SegmentKind, len: usize) -> Result<&mut [u8]> {
        let segment = Segment {
            kind,
            offset: self.used,
            len,
        };
        let end = segment
            .footprint()
            .and_then(|n| self.used.checked_add(n))
            .filter(|&end| end <= N)
            .ok_or(Error::Framing)?;
        self.segments.push(segment).map_err(|_| Error::Framing)?;
        self.used = end;
        self.scratch
            .as_mut_slice()
            .get_mut(segment.offset..end)
            .ok_or(Error::Framing)
    }

    /// Append bytes to be written.
    pub fn send(mut self, bytes: &[u8]) -> Result<Self> {
        self.reserve(SegmentKind::Send, bytes.len())?
            .copy_from_slice(bytes);
        Ok(self)
    }

    /// Append `len` bytes to be read while the device sees filler.
    pub fn receive(mut self, len: usize) -> Result<Self> {
        self.reserve(SegmentKind::Receive, len)?;
        Ok(self)
    }

    /// Append a full-duplex segment: `bytes` go out while as many come in.
    pub fn exchange(mut self, bytes: &[u8]) -> Result<Self> {
        let region = self.reserve(SegmentKind::Exchange, bytes.len())?;
        let (tx, _rx) = region.split_at_mut(bytes.len());
        tx.copy_from_slice(bytes);
        Ok(self)
    }

    /// Run every segment inside a single `SpiDevice` transaction.
    ///
    /// Any bus failure maps to [`Error::Transport`].
    pub async fn execute<SPI: SpiDevice>(self, spi: &mut SPI) -> Result<Response<N>> {
        let Self {
            scratch,
            segments,
            used,
        } = self;

        {
            let mut rest = scratch
                .as_mut_slice()
                .get_mut(..used)
                .ok_or(Error::Framing)?;
            let mut ops: Vec<Operation<'_, u8>, MAX_SEGMENTS> = Vec::new();
            for segment in &segments {
                let footprint = segment.footprint().ok_or(Error::Framing)?;
                let (head, tail) = core::mem::take(&mut rest)
                    .split_at_mut_checked(footprint)
                    .ok_or(Error::Framing)?;
                rest = tail;
                let op = match segment.kind {
                    SegmentKind::Send => Operation::Write(head),
                    SegmentKind::Receive => Operation::Read(head),
                    SegmentKind::Exchange => {
                        let (tx, rx) = head.split_at_mut(segment.len);
                        Operation::Transfer(rx, tx)
                    }
                };
                ops.push(op).map_err(|_| Error::Framing)?;
            }
            spi.transaction(&mut ops)
                .await
                .map_err(|_| Error::Transport)?;
        }

        let mut rx = Vec::new();
        for range in segments.iter().filter_map(Segment::rx_range) {
            let bytes = scratch.as_slice().get(range).ok_or(Error::Framing)?;
            rx.extend_from_slice(bytes).map_err(|_| Error::Framing)?;
        }
        Ok(Response { rx })
    }
}

/// Bytes clocked in by a completed transaction, in segment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response<const N: usize> {
    rx: Vec<u8, N>,
}

impl<const N: usize> Response<N> {
    /// All received bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.rx
    }
}

/// One byte at an offset into the received bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteField(pub usize);

impl ByteField {
    /// Decode the field; [`Error::Framing`] if the response is too short.
    pub fn get<const N: usize>(self, response: &Response<N>) -> Result<u8> {
        response.rx.get(self.0).copied().ok_or(Error::Framing)
    }
}

/// Big-endian 16-bit word at an offset into the received bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Be16Field(pub usize);

impl Be16Field {
    fn raw<const N: usize>(self, response: &Response<N>) -> Result<[u8; 2]> {
        let end = self.0.checked_add(2).ok_or(Error::Framing)?;
        let bytes = response.rx.get(self.0..end).ok_or(Error::Framing)?;
        <[u8; 2]>::try_from(bytes).map_err(|_| Error::Framing)
    }

    /// Decode as unsigned.
    pub fn get_u16<const N: usize>(self, response: &Response<N>) -> Result<u16> {
        self.raw(response).map(u16::from_be_bytes)
    }

    /// Decode as two's-complement signed.
    pub fn get_i16<const N: usize>(self, response: &Response<N>) -> Result<i16> {
        self.raw(response).map(i16::from_be_bytes)
    }
}

/// Register byte returned by an RREG frame (after the two command bytes).
pub const REGISTER_VALUE: ByteField = ByteField(0);

/// Conversion result in an RDATA exchange: byte 0 is clocked in during the
/// opcode, the code follows MSB first.
pub const CONVERSION_CODE: Be16Field = Be16Field(1);

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    #[tokio::test]
    async fn send_and_receive_share_one_chip_select() {
        let mut spi = SpiMock::new(&[
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![0x22, 0x00]),
            SpiTransaction::read_vec(vec![0x05]),
            SpiTransaction::transaction_end(),
        ]);
        let mut scratch = DmaScratch::<SCRATCH_LEN>::new();

        let response = Transaction::new(&mut scratch)
            .send(&[0x22, 0x00])
            .unwrap()
            .receive(1)
            .unwrap()
            .execute(&mut spi)
            .await
            .unwrap();

        assert_eq!(REGISTER_VALUE.get(&response), Ok(0x05));
        spi.done();
    }

    #[tokio::test]
    async fn exchange_decodes_big_endian_code() {
        let mut spi = SpiMock::new(&[
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer(vec![0x12, 0x00, 0x00], vec![0xFF, 0x00, 0x2A]),
            SpiTransaction::transaction_end(),
        ]);
        let mut scratch = DmaScratch::<SCRATCH_LEN>::new();

        let response = Transaction::new(&mut scratch)
            .exchange(&[0x12, 0x00, 0x00])
            .unwrap()
            .execute(&mut spi)
            .await
            .unwrap();

        assert_eq!(response.bytes(), &[0xFF, 0x00, 0x2A]);
        assert_eq!(CONVERSION_CODE.get_i16(&response), Ok(42));
        spi.done();
    }

    #[tokio::test]
    async fn negative_codes_are_twos_complement() {
        let mut spi = SpiMock::new(&[
            SpiTransaction::transaction_start(),
            SpiTransaction::transfer(vec![0x12, 0x00, 0x00], vec![0x00, 0x80, 0x00]),
            SpiTransaction::transaction_end(),
        ]);
        let mut scratch = DmaScratch::<SCRATCH_LEN>::new();

        let response = Transaction::new(&mut scratch)
            .exchange(&[0x12, 0x00, 0x00])
            .unwrap()
            .execute(&mut spi)
            .await
            .unwrap();

        assert_eq!(CONVERSION_CODE.get_i16(&response), Ok(i16::MIN));
        assert_eq!(CONVERSION_CODE.get_u16(&response), Ok(0x8000));
        spi.done();
    }

    #[test]
    fn oversized_frame_is_rejected_before_bus_access() {
        let mut scratch = DmaScratch::<SCRATCH_LEN>::new();
        let result = Transaction::new(&mut scratch).exchange(&[0u8; 5]);
        assert!(matches!(result, Err(Error::Framing)));
    }

    #[test]
    fn segment_count_is_bounded() {
        let mut scratch = DmaScratch::<SCRATCH_LEN>::new();
        let mut txn = Transaction::new(&mut scratch);
        for _ in 0..MAX_SEGMENTS {
            txn = txn.send(&[0x00]).unwrap();
        }
        assert!(matches!(txn.send(&[0x00]), Err(Error::Framing)));
    }

    #[test]
    fn short_response_is_a_framing_error() {
        let response = Response::<SCRATCH_LEN> { rx: Vec::new() };
        assert_eq!(REGISTER_VALUE.get(&response), Err(Error::Framing));
        assert_eq!(CONVERSION_CODE.get_i16(&response), Err(Error::Framing));
    }
}
