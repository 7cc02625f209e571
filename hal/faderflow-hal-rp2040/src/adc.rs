//! ADC channels for fader wipers
//!
//! The RP2040 has one 12-bit converter multiplexed over GPIO26-29. Each
//! fader borrows the shared converter for the duration of a read.

use embassy_rp::adc::{self, Adc, Blocking};

use faderflow_hal::{AdcError, AnalogInput};

/// Full-scale count of the RP2040 converter
pub const ADC_MAX: u16 = 4095;

/// One converter channel paired with the shared converter
pub struct AdcPin<'a, 'd> {
    adc: &'a mut Adc<'d, Blocking>,
    channel: &'a mut adc::Channel<'d>,
}

impl<'a, 'd> AdcPin<'a, 'd> {
    pub fn new(adc: &'a mut Adc<'d, Blocking>, channel: &'a mut adc::Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AnalogInput for AdcPin<'_, '_> {
    fn read(&mut self) -> Result<u16, AdcError> {
        self.adc
            .blocking_read(self.channel)
            .map_err(|_| AdcError::Conversion)
    }
}
