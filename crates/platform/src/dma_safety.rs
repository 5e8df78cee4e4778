//! DMA-safe scratch buffers for SPI command framing.
//!
//! ## Why alignment matters
//!
//! | Transport            | Requirement                                     |
//! |----------------------|-------------------------------------------------|
//! | STM32 SPI + DMA      | buffer must not straddle a cache line it shares  |
//! | Linux spidev / DMA   | buffer must be cache-line or word aligned        |
//! | Bit-banged / PIO     | none                                            |
//!
//! Driver command frames are a handful of bytes. Keeping them in a dedicated,
//! 8-byte aligned array owned by the driver (never on a caller's stack) means
//! a DMA-backed `SpiDevice` can use them directly.
//!
//! ## Usage
//! ```rust
//! use platform::dma_safety::DmaScratch;
//!
//! let mut scratch: DmaScratch<8> = DmaScratch::new();
//! scratch.as_mut_slice()[0] = 0x12;
//! assert_eq!(scratch.as_slice()[0], 0x12);
//! ```

/// Alignment, in bytes, guaranteed for [`DmaScratch`] storage.
pub const SCRATCH_ALIGN: usize = 8;

/// Fixed-size, 8-byte aligned scratch buffer.
///
/// The buffer is exclusively owned; a driver shares it between operations by
/// placing it behind the same lock as the bus handle.
#[derive(Clone)]
#[repr(C, align(8))]
pub struct DmaScratch<const N: usize>([u8; N]);

impl<const N: usize> DmaScratch<N> {
    /// Create a zero-filled scratch buffer.
    pub const fn new() -> Self {
        Self([0u8; N])
    }

    /// Capacity in bytes.
    pub const fn len(&self) -> usize {
        N
    }

    /// Whether the buffer has zero capacity.
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Read-only view of the whole buffer.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Mutable view of the whole buffer.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Zero the buffer so stale frame bytes never leak into the next command.
    pub fn clear(&mut self) {
        self.0.fill(0);
    }
}

impl<const N: usize> Default for DmaScratch<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    #[test]
    fn scratch_is_eight_byte_aligned() {
        assert_eq!(core::mem::align_of::<DmaScratch<5>>(), SCRATCH_ALIGN);
        let s: DmaScratch<5> = DmaScratch::new();
        assert_eq!(s.as_slice().as_ptr() as usize % SCRATCH_ALIGN, 0);
    }

    #[test]
    fn clear_zeroes_previous_frame() {
        let mut s: DmaScratch<4> = DmaScratch::new();
        s.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);
        s.clear();
        assert_eq!(s.as_slice(), &[0, 0, 0, 0]);
    }
}
