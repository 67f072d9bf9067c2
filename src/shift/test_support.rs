//! Test support utilities - only compiled in test builds.
//!
//! A [`Bench`] stands in for the wiring between a controller and a chain of
//! 74HC595s. Lines and the bus handed to a driver record every transition and
//! feed a behavioral model of the chip, so tests can assert both the exact
//! signal sequence and what ends up on the output pins.

use core::{cell::RefCell, convert::Infallible};

use bitmaps::Bitmap;
use embedded_hal::{
    digital::{self, OutputPin},
    spi::{self, SpiBus},
};
use heapless::Vec;

use crate::shift::{BitbangDriver, TransferDriver};

/// Lines of a 74HC595, named after the datasheet pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    Ser = 0,
    Srclk = 1,
    Rclk = 2,
    Srclr = 3,
    Oe = 4,
}

/// One observable action on the bench.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Set(Line, bool),
    Write(usize),
    Flush,
}

/// Recorded wiring plus a model of up to eight cascaded stages.
pub struct Bench {
    pub events: Vec<Event, 1024>,
    pub writes: usize,
    pub last_frame: Vec<u8, 8>,
    levels: [bool; 5],
    shift: Bitmap<64>,
    storage: Bitmap<64>,
}

impl Bench {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            writes: 0,
            last_frame: Vec::new(),
            levels: [false; 5],
            shift: Bitmap::new(),
            storage: Bitmap::new(),
        }
    }

    /// Forgets recorded events and writes; the chip model keeps its state.
    pub fn reset_log(&mut self) {
        self.events.clear();
        self.writes = 0;
        self.last_frame.clear();
    }

    pub fn level(&self, line: Line) -> bool {
        self.levels[line as usize]
    }

    /// Number of line transitions recorded.
    pub fn transitions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, Event::Set(..)))
            .count()
    }

    /// Latched outputs of the whole chain; bit 0 is `QA` of the register
    /// nearest the controller.
    pub fn outputs(&self) -> u64 {
        *self.storage.as_value()
    }

    /// Latched outputs of register `index`, counting from the controller.
    pub fn register(&self, index: usize) -> u8 {
        (self.outputs() >> (8 * index)) as u8
    }

    /// Contents of the shift stage, not yet visible on the outputs.
    pub fn shifted(&self) -> u64 {
        *self.shift.as_value()
    }

    pub fn outputs_enabled(&self) -> bool {
        !self.level(Line::Oe)
    }

    fn set(&mut self, line: Line, level: bool) {
        self.events.push(Event::Set(line, level)).unwrap();
        let rising = level && !self.levels[line as usize];
        self.levels[line as usize] = level;

        match line {
            Line::Srclk if rising => self.shift_in(self.level(Line::Ser)),
            Line::Rclk if rising => self.storage = Bitmap::from_value(self.shifted()),
            Line::Srclr if !level => self.shift = Bitmap::new(),
            _ => {}
        }
    }

    fn shift_in(&mut self, bit: bool) {
        let value = (self.shifted() << 1) | u64::from(bit);
        self.shift = Bitmap::from_value(value);
    }

    // SPI mode 0, MSB first: the last bit of a byte lands in QA.
    fn bus_write(&mut self, words: &[u8]) {
        self.events.push(Event::Write(words.len())).unwrap();
        self.writes += 1;
        self.last_frame.clear();
        self.last_frame.extend_from_slice(words).unwrap();
        for &word in words {
            for i in (0..8).rev() {
                self.shift_in((word >> i) & 1 == 1);
            }
        }
    }
}

impl Default for Bench {
    fn default() -> Self {
        Self::new()
    }
}

/// Output line wired to one pin of the bench.
pub struct BenchLine<'a> {
    bench: &'a RefCell<Bench>,
    line: Line,
}

impl digital::ErrorType for BenchLine<'_> {
    type Error = Infallible;
}

impl OutputPin for BenchLine<'_> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.bench.borrow_mut().set(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.bench.borrow_mut().set(self.line, true);
        Ok(())
    }
}

/// Serial bus wired to `SER`/`SRCLK` of the bench.
pub struct BenchBus<'a> {
    bench: &'a RefCell<Bench>,
}

impl spi::ErrorType for BenchBus<'_> {
    type Error = Infallible;
}

impl SpiBus<u8> for BenchBus<'_> {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.bench.borrow_mut().bus_write(words);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.bench.borrow_mut().bus_write(words);
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.bench.borrow_mut().events.push(Event::Flush).unwrap();
        Ok(())
    }
}

/// Output line whose every transition fails.
pub struct FailingLine;

impl digital::ErrorType for FailingLine {
    type Error = digital::ErrorKind;
}

impl OutputPin for FailingLine {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }
}

/// Serial bus whose every write fails.
pub struct FailingBus;

impl spi::ErrorType for FailingBus {
    type Error = spi::ErrorKind;
}

impl SpiBus<u8> for FailingBus {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }

    fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Err(spi::ErrorKind::Other)
    }
}

pub fn line(bench: &RefCell<Bench>, line: Line) -> BenchLine<'_> {
    BenchLine { bench, line }
}

pub fn bus(bench: &RefCell<Bench>) -> BenchBus<'_> {
    BenchBus { bench }
}

pub type BareBitbang<'a> = BitbangDriver<BenchLine<'a>, BenchLine<'a>, BenchLine<'a>>;
pub type FullBitbang<'a> =
    BitbangDriver<BenchLine<'a>, BenchLine<'a>, BenchLine<'a>, BenchLine<'a>, BenchLine<'a>>;
pub type BareTransfer<'a, const N: usize> = TransferDriver<BenchBus<'a>, BenchLine<'a>, N>;
pub type FullTransfer<'a, const N: usize> =
    TransferDriver<BenchBus<'a>, BenchLine<'a>, N, BenchLine<'a>, BenchLine<'a>>;

/// Bit-bang driver with only `SER`, `SRCLK` and `RCLK` wired.
pub fn bare_bitbang(bench: &RefCell<Bench>) -> BareBitbang<'_> {
    BitbangDriver::new(
        line(bench, Line::Ser),
        line(bench, Line::Srclk),
        line(bench, Line::Rclk),
    )
    .unwrap()
}

/// Bit-bang driver with all five lines wired.
pub fn full_bitbang(bench: &RefCell<Bench>) -> FullBitbang<'_> {
    BitbangDriver::with_lines(
        line(bench, Line::Ser),
        line(bench, Line::Srclk),
        line(bench, Line::Rclk),
        Some(line(bench, Line::Srclr)),
        Some(line(bench, Line::Oe)),
    )
    .unwrap()
}

/// Transfer driver with only the bus and `RCLK` wired.
pub fn bare_transfer<const N: usize>(
    bench: &RefCell<Bench>,
    chain_length: usize,
) -> BareTransfer<'_, N> {
    TransferDriver::new(bus(bench), line(bench, Line::Rclk), chain_length).unwrap()
}

/// Transfer driver with the bus, `RCLK`, `SRCLR` and `OE` wired.
pub fn full_transfer<const N: usize>(
    bench: &RefCell<Bench>,
    chain_length: usize,
) -> FullTransfer<'_, N> {
    TransferDriver::with_lines(
        bus(bench),
        line(bench, Line::Rclk),
        chain_length,
        Some(line(bench, Line::Srclr)),
        Some(line(bench, Line::Oe)),
    )
    .unwrap()
}

/// Asserts the shadow buffer of a transfer driver.
pub fn assert_buffer<SPI, RCLK, CLR, OE, const N: usize>(
    driver: &TransferDriver<SPI, RCLK, N, CLR, OE>,
    expected: &[u8],
) {
    assert_eq!(driver.as_bytes(), expected);
}
