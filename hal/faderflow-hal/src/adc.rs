//! Analog input abstractions
//!
//! One [`AnalogInput`] corresponds to one converter channel. Reads are
//! single-shot and blocking; a conversion on the supported chips takes a
//! few microseconds.

/// Errors from an analog conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AdcError {
    /// The converter reported a conversion error
    Conversion,
}

/// Single-shot analog channel
pub trait AnalogInput {
    /// Perform one conversion and return the raw count
    ///
    /// The value range is `0..=full_scale` of the configured converter.
    fn read(&mut self) -> Result<u16, AdcError>;
}

impl<T: AnalogInput + ?Sized> AnalogInput for &mut T {
    fn read(&mut self) -> Result<u16, AdcError> {
        (**self).read()
    }
}
