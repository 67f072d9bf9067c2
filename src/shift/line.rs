use embedded_hal::digital::{OutputPin, PinState};

use crate::shift::{
    ShiftError,
    error::{ControlLine, pin_error},
};

mod sealed {
    pub trait Sealed {}
}

/// A slot for an optional control line: either a real [`OutputPin`] or
/// [`NoLine`].
///
/// Sealed; the crate provides every implementation.
pub trait OptionalLine: sealed::Sealed {
    /// Returns false for [`NoLine`].
    fn is_wired(&self) -> bool;

    /// Drives the line to `state`.
    ///
    /// # Errors
    /// * [`ShiftError::MissingLine`] - for [`NoLine`]; nothing is driven
    fn drive(&mut self, line: ControlLine, state: PinState) -> Result<(), ShiftError>;
}

/// Placeholder for an optional control line that is not wired.
///
/// `NoLine` is not an [`OutputPin`]: it cannot stand in for `SER`, `SRCLK`
/// or `RCLK`, and drivers carrying it in a line slot reject the operations
/// that need that line with [`ShiftError::MissingLine`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLine;

impl sealed::Sealed for NoLine {}

impl OptionalLine for NoLine {
    fn is_wired(&self) -> bool {
        false
    }

    fn drive(&mut self, line: ControlLine, _state: PinState) -> Result<(), ShiftError> {
        Err(ShiftError::MissingLine(line))
    }
}

impl<P: OutputPin> sealed::Sealed for P {}

impl<P: OutputPin> OptionalLine for P {
    fn is_wired(&self) -> bool {
        true
    }

    fn drive(&mut self, _line: ControlLine, state: PinState) -> Result<(), ShiftError> {
        self.set_state(state).map_err(pin_error)
    }
}

/// Storage clock plus the optional clear and output-enable lines.
///
/// Both drivers latch, clear and enable the same way; only the path the data
/// takes into the shift stage differs.
#[derive(Debug)]
pub(crate) struct ControlLines<RCLK, CLR, OE> {
    rclk: RCLK,
    clr: Option<CLR>,
    oe: Option<OE>,
}

impl<RCLK, CLR, OE> ControlLines<RCLK, CLR, OE>
where
    RCLK: OutputPin,
    CLR: OptionalLine,
    OE: OptionalLine,
{
    /// Drives every line to its idle level: latch low, clear high (inactive),
    /// output enable low (outputs driven).
    ///
    /// A [`NoLine`] passed as `Some` is stored as absent.
    pub(crate) fn new(
        mut rclk: RCLK,
        clr: Option<CLR>,
        oe: Option<OE>,
    ) -> Result<Self, ShiftError> {
        rclk.set_low().map_err(pin_error)?;
        let clr = clr
            .filter(OptionalLine::is_wired)
            .map(idle_clear)
            .transpose()?;
        let oe = oe
            .filter(OptionalLine::is_wired)
            .map(idle_output_enable)
            .transpose()?;
        Ok(Self { rclk, clr, oe })
    }

    pub(crate) fn has_clear(&self) -> bool {
        self.clr.is_some()
    }

    pub(crate) fn has_output_enable(&self) -> bool {
        self.oe.is_some()
    }

    /// Pulses the storage clock; the shift stage is copied to the outputs on
    /// the rising edge.
    pub(crate) fn latch(&mut self) -> Result<(), ShiftError> {
        log::trace!("latch");
        self.rclk.set_high().map_err(pin_error)?;
        self.rclk.set_low().map_err(pin_error)
    }

    /// Pulses `SRCLR` low then high, zeroing the shift stage.
    pub(crate) fn clear(&mut self, latch: bool) -> Result<(), ShiftError> {
        let clr = self
            .clr
            .as_mut()
            .ok_or(ShiftError::MissingLine(ControlLine::Clear))?;
        log::trace!("clear (latch={latch})");
        clr.drive(ControlLine::Clear, PinState::Low)?;
        clr.drive(ControlLine::Clear, PinState::High)?;
        if latch {
            self.latch()?;
        }
        Ok(())
    }

    /// Drives `OE` to the inverse of `enabled`.
    pub(crate) fn enable(&mut self, enabled: bool) -> Result<(), ShiftError> {
        let oe = self
            .oe
            .as_mut()
            .ok_or(ShiftError::MissingLine(ControlLine::OutputEnable))?;
        log::trace!("output enable = {enabled}");
        oe.drive(ControlLine::OutputEnable, PinState::from(!enabled))
    }

    pub(crate) fn release(self) -> (RCLK, Option<CLR>, Option<OE>) {
        (self.rclk, self.clr, self.oe)
    }
}

impl<RCLK, OE> ControlLines<RCLK, NoLine, OE> {
    /// Fills the empty clear slot with a freshly idled line.
    pub(crate) fn with_clear<C: OutputPin>(
        self,
        clr: C,
    ) -> Result<ControlLines<RCLK, C, OE>, ShiftError> {
        Ok(ControlLines {
            rclk: self.rclk,
            clr: Some(idle_clear(clr)?),
            oe: self.oe,
        })
    }
}

impl<RCLK, CLR> ControlLines<RCLK, CLR, NoLine> {
    /// Fills the empty output-enable slot with a freshly idled line.
    pub(crate) fn with_output_enable<O: OutputPin>(
        self,
        oe: O,
    ) -> Result<ControlLines<RCLK, CLR, O>, ShiftError> {
        Ok(ControlLines {
            rclk: self.rclk,
            clr: self.clr,
            oe: Some(idle_output_enable(oe)?),
        })
    }
}

fn idle_clear<C: OptionalLine>(mut clr: C) -> Result<C, ShiftError> {
    clr.drive(ControlLine::Clear, PinState::High)?;
    Ok(clr)
}

fn idle_output_enable<O: OptionalLine>(mut oe: O) -> Result<O, ShiftError> {
    oe.drive(ControlLine::OutputEnable, PinState::Low)?;
    Ok(oe)
}
