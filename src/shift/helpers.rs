//! Bit addressing across a chain of cascaded 8-bit stages.
//!
//! Pin `p` of a chain lives in stage `p / 8`, bit `p % 8`. Stage 0 is the
//! first byte clocked out, so once the whole chain has been shifted it sits in
//! the register furthest from the controller.

use crate::shift::ShiftError;

/// Width of a single 74HC595 stage in bits.
pub const STAGE_BITS: usize = 8;

/// Resolves a chain-wide pin index to its byte index and bit mask.
///
/// # Arguments
/// * `pin` - Pin index, 0-based across the whole chain
/// * `chain_length` - Number of cascaded stages
///
/// # Errors
/// * [`ShiftError::OutOfRange`] - if `pin >= chain_length * 8`
///
/// # Example
/// ```
/// use hc595::shift::helpers::pin_address;
///
/// // Pin 0 is the least significant bit of stage 0
/// assert_eq!(pin_address(0, 1).unwrap(), (0, 0x01));
///
/// // Pin 8 is the first bit of the second stage
/// assert_eq!(pin_address(8, 2).unwrap(), (1, 0x01));
///
/// // Pin 15 is the last bit of the second stage
/// assert_eq!(pin_address(15, 2).unwrap(), (1, 0x80));
/// ```
pub fn pin_address(pin: usize, chain_length: usize) -> Result<(usize, u8), ShiftError> {
    let byte = pin / STAGE_BITS;
    if byte >= chain_length {
        return Err(ShiftError::OutOfRange);
    }

    Ok((byte, 1 << (pin % STAGE_BITS)))
}

/// Returns bit `index` of `value`, counting from the least significant bit.
///
/// Bits past the width of `value` read as `false`, so callers may shift more
/// bits than the value holds to push zeroes further down a chain.
///
/// # Example
/// ```
/// use hc595::shift::helpers::bit_at;
///
/// assert!(bit_at(0b0100, 2));
/// assert!(!bit_at(0b0100, 3));
/// assert!(!bit_at(u64::MAX, 64));
/// ```
#[inline]
pub fn bit_at(value: u64, index: u32) -> bool {
    value.checked_shr(index).is_some_and(|v| v & 1 == 1)
}

#[test]
fn pin_address_edge_cases() {
    // First and last pin of a single stage
    assert_eq!(pin_address(0, 1), Ok((0, 0x01)));
    assert_eq!(pin_address(7, 1), Ok((0, 0x80)));

    // One past the end
    assert_eq!(pin_address(8, 1), Err(ShiftError::OutOfRange));

    // Stage boundaries in a longer chain
    assert_eq!(pin_address(16, 3), Ok((2, 0x01)));
    assert_eq!(pin_address(23, 3), Ok((2, 0x80)));
    assert_eq!(pin_address(24, 3), Err(ShiftError::OutOfRange));

    // Huge index does not overflow
    assert_eq!(pin_address(usize::MAX, 4), Err(ShiftError::OutOfRange));
}

#[test]
fn bit_at_reads_lsb_first() {
    let value = 0b1010_0110u64;
    let bits: [bool; 8] = core::array::from_fn(|i| bit_at(value, i as u32));
    assert_eq!(bits, [false, true, true, false, false, true, false, true]);

    assert!(bit_at(1 << 63, 63));
    assert!(!bit_at(1 << 63, 200));
}
