use embedded_hal::digital::{OutputPin, PinState};

use super::macros::{impl_send_primitive, impl_send_primitives};
use crate::shift::{
    NoLine, ShiftError,
    error::pin_error,
    helpers::bit_at,
    line::{ControlLines, OptionalLine},
};

/// 74HC595 driver that toggles `SER` and `SRCLK` directly.
///
/// Holds no buffer: every bit goes to the chip as soon as it is sent, and
/// reaches the outputs on the next [`latch`](Self::latch). Sending more than
/// eight bits pushes earlier bits into cascaded stages.
///
/// # Type Parameters
/// - `SER`: Serial data line
/// - `SRCLK`: Shift register clock
/// - `RCLK`: Storage register clock (latch)
/// - `CLR`: Shift register clear, [`NoLine`] when not wired
/// - `OE`: Output enable, [`NoLine`] when not wired
pub struct BitbangDriver<SER, SRCLK, RCLK, CLR = NoLine, OE = NoLine> {
    ser: SER,
    srclk: SRCLK,
    lines: ControlLines<RCLK, CLR, OE>,
}

impl<SER, SRCLK, RCLK, CLR, OE> core::fmt::Debug for BitbangDriver<SER, SRCLK, RCLK, CLR, OE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BitbangDriver").finish_non_exhaustive()
    }
}

impl<SER, SRCLK, RCLK> BitbangDriver<SER, SRCLK, RCLK, NoLine, NoLine>
where
    SER: OutputPin,
    SRCLK: OutputPin,
    RCLK: OutputPin,
{
    /// Creates a driver with `SRCLR` tied high and `OE` tied low.
    ///
    /// `SER`, `SRCLK` and `RCLK` are driven low.
    pub fn new(ser: SER, srclk: SRCLK, rclk: RCLK) -> Result<Self, ShiftError> {
        Self::with_lines(ser, srclk, rclk, None, None)
    }
}

impl<SER, SRCLK, RCLK, CLR, OE> BitbangDriver<SER, SRCLK, RCLK, CLR, OE>
where
    SER: OutputPin,
    SRCLK: OutputPin,
    RCLK: OutputPin,
    CLR: OptionalLine,
    OE: OptionalLine,
{
    /// Creates a driver with optional clear and output-enable lines.
    ///
    /// `SER`, `SRCLK` and `RCLK` are driven low, `SRCLR` high (inactive) and
    /// `OE` low (outputs driven).
    pub fn with_lines(
        mut ser: SER,
        mut srclk: SRCLK,
        rclk: RCLK,
        clr: Option<CLR>,
        oe: Option<OE>,
    ) -> Result<Self, ShiftError> {
        ser.set_low().map_err(pin_error)?;
        srclk.set_low().map_err(pin_error)?;
        let lines = ControlLines::new(rclk, clr, oe)?;
        log::debug!(
            "bit-bang driver ready (clear={}, output_enable={})",
            lines.has_clear(),
            lines.has_output_enable()
        );
        Ok(Self { ser, srclk, lines })
    }

    /// Shifts one bit into the chain.
    ///
    /// `SER` is settled before `SRCLK` rises; the chip samples on the rising
    /// edge.
    pub fn shift_one(&mut self, bit: bool) -> Result<(), ShiftError> {
        self.ser.set_state(PinState::from(bit)).map_err(pin_error)?;
        self.srclk.set_high().map_err(pin_error)?;
        self.srclk.set_low().map_err(pin_error)
    }

    /// Shifts one bit, then latches if `latch` is set.
    pub fn send_bit(&mut self, bit: bool, latch: bool) -> Result<(), ShiftError> {
        self.shift_one(bit)?;
        if latch {
            self.latch()?;
        }
        Ok(())
    }

    /// Shifts the low `count` bits of `value`, least significant first.
    ///
    /// After `count` clocks bit 0 sits deepest in the chain. `count` may run
    /// past 64; the extra bits are zero.
    pub fn send_bits(&mut self, value: u64, count: u32, latch: bool) -> Result<(), ShiftError> {
        for i in 0..count {
            self.shift_one(bit_at(value, i))?;
        }
        if latch {
            self.latch()?;
        }
        Ok(())
    }

    impl_send_primitives!();

    /// Copies the shift stage to the outputs.
    pub fn latch(&mut self) -> Result<(), ShiftError> {
        self.lines.latch()
    }

    /// Zeroes the shift stage, then latches if `latch` is set.
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

    /// Releases the lines, in constructor order.
    pub fn release(self) -> (SER, SRCLK, RCLK, Option<CLR>, Option<OE>) {
        let (rclk, clr, oe) = self.lines.release();
        (self.ser, self.srclk, rclk, clr, oe)
    }
}

impl<SER, SRCLK, RCLK, OE> BitbangDriver<SER, SRCLK, RCLK, NoLine, OE>
where
    SER: OutputPin,
    SRCLK: OutputPin,
    RCLK: OutputPin,
    OE: OptionalLine,
{
    /// Wires a shift register clear line, driving it high.
    ///
    /// Only available while the clear slot is empty.
    pub fn with_clear<C: OutputPin>(
        self,
        clr: C,
    ) -> Result<BitbangDriver<SER, SRCLK, RCLK, C, OE>, ShiftError> {
        log::debug!("bit-bang driver: clear line attached");
        Ok(BitbangDriver {
            ser: self.ser,
            srclk: self.srclk,
            lines: self.lines.with_clear(clr)?,
        })
    }
}

impl<SER, SRCLK, RCLK, CLR> BitbangDriver<SER, SRCLK, RCLK, CLR, NoLine>
where
    SER: OutputPin,
    SRCLK: OutputPin,
    RCLK: OutputPin,
    CLR: OptionalLine,
{
    /// Wires an output-enable line, driving it low.
    ///
    /// Only available while the output-enable slot is empty.
    pub fn with_output_enable<O: OutputPin>(
        self,
        oe: O,
    ) -> Result<BitbangDriver<SER, SRCLK, RCLK, CLR, O>, ShiftError> {
        log::debug!("bit-bang driver: output enable line attached");
        Ok(BitbangDriver {
            ser: self.ser,
            srclk: self.srclk,
            lines: self.lines.with_output_enable(oe)?,
        })
    }
}
