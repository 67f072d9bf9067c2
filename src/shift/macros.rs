/// Generates a `send_<type>` method that shifts a full-width word.
macro_rules! impl_send_primitive {
    ($type:ty) => {
        paste::paste! {
            #[doc = "Shifts all `" $type "::BITS` bits of `value`, least significant first."]
            #[doc = ""]
            #[doc = "Equivalent to `send_bits(value as u64, " $type "::BITS, latch)`."]
            #[inline]
            pub fn [<send_ $type>](&mut self, value: $type, latch: bool) -> Result<(), ShiftError> {
                self.send_bits(u64::from(value), <$type>::BITS, latch)
            }
        }
    };
}

/// Generates `send_u8` through `send_u64`.
macro_rules! impl_send_primitives {
    () => {
        impl_send_primitive!(u8);
        impl_send_primitive!(u16);
        impl_send_primitive!(u32);
        impl_send_primitive!(u64);
    };
}

pub(super) use impl_send_primitive;
pub(super) use impl_send_primitives;
