use embedded_hal::{digital, spi};

/// Optional control lines a driver may be built without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlLine {
    /// Shift register clear (`SRCLR`, active low).
    Clear,
    /// Output enable (`OE`, active low).
    OutputEnable,
}

impl core::fmt::Display for ControlLine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ControlLine::Clear => write!(f, "SRCLR"),
            ControlLine::OutputEnable => write!(f, "OE"),
        }
    }
}

/// Errors that can occur while driving a shift register chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftError {
    /// The operation needs a control line that was not configured.
    MissingLine(ControlLine),
    /// Pin or byte index lies outside the chain.
    OutOfRange,
    /// Chain constructed with zero stages.
    ZeroLength,
    /// Chain length exceeds the buffer capacity.
    ChainTooLong,
    /// A digital output line reported a failure.
    Pin(digital::ErrorKind),
    /// The serial bus reported a failure.
    Bus(spi::ErrorKind),
}

impl core::fmt::Display for ShiftError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ShiftError::MissingLine(line) => write!(f, "{line} line is required"),
            ShiftError::OutOfRange => write!(f, "index exceeds chain bounds"),
            ShiftError::ZeroLength => write!(f, "chain must have at least one stage"),
            ShiftError::ChainTooLong => write!(f, "chain length exceeds buffer capacity"),
            ShiftError::Pin(kind) => write!(f, "output line failure: {kind}"),
            ShiftError::Bus(kind) => write!(f, "serial bus failure: {kind}"),
        }
    }
}

impl core::error::Error for ShiftError {}

pub(crate) fn pin_error<E: digital::Error>(err: E) -> ShiftError {
    ShiftError::Pin(err.kind())
}

pub(crate) fn bus_error<E: spi::Error>(err: E) -> ShiftError {
    ShiftError::Bus(err.kind())
}
