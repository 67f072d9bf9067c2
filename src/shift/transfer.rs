use embedded_hal::{digital::OutputPin, spi::SpiBus};
use heapless::Vec;

use crate::shift::{
    NoLine, ShiftError,
    error::bus_error,
    helpers::{STAGE_BITS, pin_address},
    line::{ControlLines, OptionalLine},
};

/// 74HC595 chain driver that clocks a shadow buffer out over a serial bus.
///
/// The buffer holds one byte per cascaded stage and is the next state to be
/// latched. Every mutation writes the *whole* buffer: the chain is a single
/// shift path, so a change in one stage must be clocked through all of them.
///
/// Byte 0 is sent first and ends up in the register furthest from the
/// controller. Pin `p` is bit `p % 8` of byte `p / 8`.
///
/// # Const Generics
/// - `N`: Buffer capacity in stages; the runtime chain length must not
///   exceed it
///
/// # Type Parameters
/// - `SPI`: Serial bus wired to `SER` and `SRCLK`
/// - `RCLK`: Storage register clock (latch)
/// - `CLR`: Shift register clear, [`NoLine`] when not wired
/// - `OE`: Output enable, [`NoLine`] when not wired
pub struct TransferDriver<SPI, RCLK, const N: usize, CLR = NoLine, OE = NoLine> {
    spi: SPI,
    lines: ControlLines<RCLK, CLR, OE>,
    buf: Vec<u8, N>,
}

impl<SPI, RCLK, const N: usize, CLR, OE> core::fmt::Debug
    for TransferDriver<SPI, RCLK, N, CLR, OE>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransferDriver")
            .field("buf", &self.buf.as_slice())
            .finish_non_exhaustive()
    }
}

impl<SPI, RCLK, const N: usize, CLR, OE> TransferDriver<SPI, RCLK, N, CLR, OE> {
    /// Number of cascaded stages.
    #[inline]
    pub fn chain_length(&self) -> usize {
        self.buf.len()
    }

    /// Number of addressable output pins.
    #[inline]
    pub fn pin_count(&self) -> usize {
        self.buf.len() * STAGE_BITS
    }

    /// The shadow buffer, stage 0 first.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the shadow value of `pin` without touching the bus.
    ///
    /// # Errors
    /// * [`ShiftError::OutOfRange`] - if `pin >= pin_count()`
    pub fn read_pin(&self, pin: usize) -> Result<bool, ShiftError> {
        let (byte, mask) = pin_address(pin, self.buf.len())?;
        Ok(self.buf[byte] & mask != 0)
    }

    /// Returns shadow byte `index` without touching the bus.
    ///
    /// # Errors
    /// * [`ShiftError::OutOfRange`] - if `index >= chain_length()`
    pub fn get_byte(&self, index: usize) -> Result<u8, ShiftError> {
        self.buf.get(index).copied().ok_or(ShiftError::OutOfRange)
    }
}

impl<SPI, RCLK, const N: usize> TransferDriver<SPI, RCLK, N, NoLine, NoLine>
where
    SPI: SpiBus<u8>,
    RCLK: OutputPin,
{
    /// Creates a driver for `chain_length` stages with `SRCLR` tied high and
    /// `OE` tied low.
    pub fn new(spi: SPI, rclk: RCLK, chain_length: usize) -> Result<Self, ShiftError> {
        Self::with_lines(spi, rclk, chain_length, None, None)
    }
}

impl<SPI, RCLK, const N: usize, CLR, OE> TransferDriver<SPI, RCLK, N, CLR, OE>
where
    SPI: SpiBus<u8>,
    RCLK: OutputPin,
    CLR: OptionalLine,
    OE: OptionalLine,
{
    /// Creates a driver for `chain_length` stages with optional clear and
    /// output-enable lines.
    ///
    /// The buffer starts zeroed and is not transmitted. `RCLK` is driven low,
    /// `SRCLR` high and `OE` low.
    ///
    /// # Errors
    /// * [`ShiftError::ZeroLength`] - if `chain_length` is 0
    /// * [`ShiftError::ChainTooLong`] - if `chain_length > N`
    pub fn with_lines(
        spi: SPI,
        rclk: RCLK,
        chain_length: usize,
        clr: Option<CLR>,
        oe: Option<OE>,
    ) -> Result<Self, ShiftError> {
        if chain_length == 0 {
            return Err(ShiftError::ZeroLength);
        }

        let mut buf: Vec<u8, N> = Vec::new();
        buf.resize(chain_length, 0)
            .map_err(|_| ShiftError::ChainTooLong)?;

        let lines = ControlLines::new(rclk, clr, oe)?;
        log::debug!(
            "transfer driver ready: {} stage(s) (clear={}, output_enable={})",
            chain_length,
            lines.has_clear(),
            lines.has_output_enable()
        );
        Ok(Self { spi, lines, buf })
    }

    /// Sets or clears `pin`, transmits the buffer, then latches if `latch`
    /// is set.
    ///
    /// # Errors
    /// * [`ShiftError::OutOfRange`] - if `pin >= pin_count()`; nothing is sent
    pub fn write_pin(&mut self, pin: usize, value: bool, latch: bool) -> Result<(), ShiftError> {
        let (byte, mask) = pin_address(pin, self.buf.len())?;
        if value {
            self.buf[byte] |= mask;
        } else {
            self.buf[byte] &= !mask;
        }
        self.refresh(latch)
    }

    /// Inverts `pin`, transmits the buffer, then latches if `latch` is set.
    ///
    /// # Errors
    /// * [`ShiftError::OutOfRange`] - if `pin >= pin_count()`; nothing is sent
    pub fn toggle_pin(&mut self, pin: usize, latch: bool) -> Result<(), ShiftError> {
        let (byte, mask) = pin_address(pin, self.buf.len())?;
        self.buf[byte] ^= mask;
        self.refresh(latch)
    }

    /// Overwrites shadow byte `index`, transmits the buffer and latches.
    ///
    /// # Errors
    /// * [`ShiftError::OutOfRange`] - if `index >= chain_length()`; nothing is
    ///   sent
    pub fn set_byte(&mut self, index: usize, value: u8) -> Result<(), ShiftError> {
        let slot = self.buf.get_mut(index).ok_or(ShiftError::OutOfRange)?;
        *slot = value;
        self.refresh(true)
    }

    /// Transmits the unchanged buffer, then latches if `latch` is set.
    ///
    /// Brings the chip back in line with the buffer, e.g. after
    /// [`clear`](Self::clear).
    pub fn refresh(&mut self, latch: bool) -> Result<(), ShiftError> {
        log::trace!("transmit {:02x?}", self.buf.as_slice());
        self.spi.write(&self.buf).map_err(bus_error)?;
        // Every bit must be clocked in before RCLK rises.
        self.spi.flush().map_err(bus_error)?;
        if latch {
            self.latch()?;
        }
        Ok(())
    }

    /// Copies the shift stage to the outputs.
    pub fn latch(&mut self) -> Result<(), ShiftError> {
        self.lines.latch()
    }

    /// Zeroes the chip's shift stage, then latches if `latch` is set.
    ///
    /// The shadow buffer is left as is, so it no longer matches the chip
    /// until the next write or [`refresh`](Self::refresh).
    ///
    /// # Errors
    /// * [`ShiftError::MissingLine`] - if no clear line is wired; no line is
    ///   touched
    pub fn clear(&mut self, latch: bool) -> Result<(), ShiftError> {
        self.lines.clear(latch)
    }

    /// Drives (`true`) or tri-states (`false`) the outputs.
    ///
    /// # Errors
    /// * [`ShiftError::MissingLine`] - if no output-enable line is wired
    pub fn enable(&mut self, enabled: bool) -> Result<(), ShiftError> {
        self.lines.enable(enabled)
    }

    /// Releases the bus and lines, in constructor order.
    pub fn release(self) -> (SPI, RCLK, Option<CLR>, Option<OE>) {
        let (rclk, clr, oe) = self.lines.release();
        (self.spi, rclk, clr, oe)
    }
}

impl<SPI, RCLK, const N: usize, OE> TransferDriver<SPI, RCLK, N, NoLine, OE>
where
    SPI: SpiBus<u8>,
    RCLK: OutputPin,
    OE: OptionalLine,
{
    /// Wires a shift register clear line, driving it high.
    ///
    /// Only available while the clear slot is empty.
    pub fn with_clear<C: OutputPin>(
        self,
        clr: C,
    ) -> Result<TransferDriver<SPI, RCLK, N, C, OE>, ShiftError> {
        log::debug!("transfer driver: clear line attached");
        Ok(TransferDriver {
            spi: self.spi,
            lines: self.lines.with_clear(clr)?,
            buf: self.buf,
        })
    }
}

impl<SPI, RCLK, const N: usize, CLR> TransferDriver<SPI, RCLK, N, CLR, NoLine>
where
    SPI: SpiBus<u8>,
    RCLK: OutputPin,
    CLR: OptionalLine,
{
    /// Wires an output-enable line, driving it low.
    ///
    /// Only available while the output-enable slot is empty.
    pub fn with_output_enable<O: OutputPin>(
        self,
        oe: O,
    ) -> Result<TransferDriver<SPI, RCLK, N, CLR, O>, ShiftError> {
        log::debug!("transfer driver: output enable line attached");
        Ok(TransferDriver {
            spi: self.spi,
            lines: self.lines.with_output_enable(oe)?,
            buf: self.buf,
        })
    }
}
