//! A `no_std`, no-alloc driver for chained 74HC595 shift registers.
//!
//! Two drivers cover the two ways of feeding the chip:
//!
//! - [`BitbangDriver`](shift::BitbangDriver) toggles `SER` and `SRCLK` by
//!   hand and keeps no state; bits go out as they are sent.
//! - [`TransferDriver`](shift::TransferDriver) keeps a shadow buffer of one
//!   byte per stage and clocks the whole buffer out over an
//!   [`SpiBus`](embedded_hal::spi::SpiBus) whenever it changes.
//!
//! Both latch with `RCLK` and optionally drive `SRCLR` and `OE`. Lines are any
//! [`OutputPin`](embedded_hal::digital::OutputPin).
//!
//! # Signal model
//!
//! ```text
//!            SER ──┐
//!                  ▼
//!  SRCLK ↑ ─▶ ┌──────────────┐  QH' ─▶ next stage SER
//!             │ shift stage  │
//! SRCLR ↓ ─▶  └──────┬───────┘
//!                    │ RCLK ↑
//!             ┌──────▼───────┐
//!             │ storage      │
//!             └──────┬───────┘
//!                    │ OE (low = driven)
//!                 QA..QH
//! ```
//!
//! - Data is set on `SER` before `SRCLK` rises; each rising edge shifts one bit
//! - Shifted bits are invisible until `RCLK` rises
//! - `SRCLR` low zeroes the shift stage only; the outputs keep their value
//!   until the next latch
//!
//! # Example
//!
//! ```rust,ignore
//! use hc595::prelude::*;
//!
//! // Two cascaded stages, 16 outputs
//! let mut sr = TransferDriver::<_, _, 2>::new(spi_bus, rclk_pin, 2)?;
//!
//! sr.write_pin(0, true, true)?;   // stage 0, QA
//! sr.toggle_pin(9, true)?;        // stage 1, QB
//! sr.set_byte(1, 0b1010_0000)?;   // whole stage, always latched
//!
//! assert!(sr.read_pin(0)?);
//! ```

#![deny(unsafe_code)]
#![no_std]

pub mod shift;

pub mod prelude {
    pub use crate::shift::prelude::*;
}
