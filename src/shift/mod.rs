pub mod bitbang;
pub mod error;
pub mod helpers;
pub mod line;
mod macros;
pub mod shared;
pub mod transfer;

#[cfg(test)]
mod test_support;

pub use bitbang::BitbangDriver;
pub use error::{ControlLine, ShiftError};
pub use line::{NoLine, OptionalLine};
pub use shared::SharedDriver;
pub use transfer::TransferDriver;

pub mod prelude {
    pub use super::{
        BitbangDriver, ControlLine, NoLine, OptionalLine, SharedDriver, ShiftError,
        TransferDriver,
    };
}
