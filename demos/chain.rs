//! Chain example: two cascaded 74HC595s driven both ways
//!
//! This example demonstrates:
//! - Building a `TransferDriver` for a 16-output chain
//! - Pin, toggle and whole-byte writes through the shadow buffer
//! - Accumulating several writes and latching once
//! - Clearing the chip and resyncing it from the buffer
//! - Feeding the same chain bit by bit with a `BitbangDriver`
//!
//! The pins and bus here only remember what was sent to them; on hardware
//! they come from your HAL.

use core::convert::Infallible;
use std::{cell::RefCell, rc::Rc};

use embedded_hal::{digital, spi};
use hc595::prelude::*;

// ============ Stand-in hardware ============

/// Output line that remembers its level.
#[derive(Clone, Default)]
struct Wire(Rc<RefCell<bool>>);

impl Wire {
    fn is_high(&self) -> bool {
        *self.0.borrow()
    }
}

impl digital::ErrorType for Wire {
    type Error = Infallible;
}

impl digital::OutputPin for Wire {
    fn set_low(&mut self) -> Result<(), Infallible> {
        *self.0.borrow_mut() = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        *self.0.borrow_mut() = true;
        Ok(())
    }
}

/// Bus that keeps the last frame it sent.
#[derive(Clone, Default)]
struct Bus(Rc<RefCell<Vec<u8>>>);

impl spi::ErrorType for Bus {
    type Error = Infallible;
}

impl spi::SpiBus<u8> for Bus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Infallible> {
        *self.0.borrow_mut() = words.to_vec();
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Infallible> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Infallible> {
        self.write(&words.to_vec())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        Ok(())
    }
}

// ============ Output layout ============
// Stage 0 drives eight status LEDs, stage 1 drives four relays on QA..QD.

const LED_READY: usize = 0;
const LED_FAULT: usize = 7;
const RELAY_STAGE: usize = 1;
const RELAY_PUMP: usize = 8;

pub fn main() -> Result<(), ShiftError> {
    let bus = Bus::default();
    let srclr = Wire::default();

    // ========== Serial transfer ==========
    let mut sr = TransferDriver::<_, _, 2>::new(bus.clone(), Wire::default(), 2)?
        .with_clear(srclr.clone())?;
    assert!(srclr.is_high(), "SRCLR idles high");

    // One write, one frame, one latch
    sr.write_pin(LED_READY, true, true)?;
    assert_eq!(*bus.0.borrow(), [0x01u8, 0x00]);

    // Accumulate without latching, then latch once
    sr.write_pin(LED_FAULT, true, false)?;
    sr.toggle_pin(RELAY_PUMP, false)?;
    sr.latch()?;
    assert_eq!(sr.as_bytes(), &[0x81, 0x01]);

    // Whole-stage writes always latch
    sr.set_byte(RELAY_STAGE, 0b0000_1111)?;
    assert_eq!(sr.get_byte(RELAY_STAGE)?, 0x0F);

    // Clearing zeroes the chip but keeps the buffer; refresh puts it back
    sr.clear(true)?;
    assert_eq!(sr.as_bytes(), &[0x81, 0x0F]);
    sr.refresh(true)?;

    // Out-of-range pins are rejected before anything is sent
    assert_eq!(sr.write_pin(16, true, true), Err(ShiftError::OutOfRange));

    // ========== Bit-bang ==========
    let mut bb = BitbangDriver::new(Wire::default(), Wire::default(), Wire::default())?;

    // 16 bits LSB first: the low byte ends up in the furthest stage
    bb.send_u16(0x0F81, true)?;

    // No OE line wired
    assert_eq!(
        bb.enable(false),
        Err(ShiftError::MissingLine(ControlLine::OutputEnable))
    );

    Ok(())
}
