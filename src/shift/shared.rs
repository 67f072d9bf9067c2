use core::cell::RefCell;

use critical_section::Mutex;

/// A driver guarded by a critical section.
///
/// The drivers themselves hold no locks. When a driver lives in a `static`
/// and is reached from both the main loop and an interrupt handler, wrap it
/// here and go through [`with`](Self::with) for every access; the whole
/// operation, bus transfer and latch included, runs inside one critical
/// section.
///
/// # Example
/// ```rust,ignore
/// static OUTPUTS: SharedDriver<Outputs> = SharedDriver::new(...);
///
/// OUTPUTS.with(|sr| sr.toggle_pin(3, true))?;
/// ```
pub struct SharedDriver<D> {
    inner: Mutex<RefCell<D>>,
}

impl<D> core::fmt::Debug for SharedDriver<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SharedDriver").finish_non_exhaustive()
    }
}

impl<D> SharedDriver<D> {
    pub const fn new(driver: D) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(driver)),
        }
    }

    /// Runs `f` with exclusive access to the driver.
    ///
    /// # Panics
    /// Panics if called again from inside `f`.
    pub fn with<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    /// Gives the driver back.
    pub fn into_inner(self) -> D {
        self.inner.into_inner().into_inner()
    }
}
