//! GPIO pin abstractions
//!
//! Encoder lines are sampled by polling, so only level reads are needed.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip, including any pull configuration.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &T {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}
