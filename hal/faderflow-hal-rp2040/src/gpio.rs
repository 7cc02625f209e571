//! Digital inputs for encoder lines

use embassy_rp::gpio::Input;

use faderflow_hal::InputPin;

/// Encoder line backed by an embassy-rp input
pub struct EncoderLine<'d> {
    input: Input<'d>,
}

impl<'d> EncoderLine<'d> {
    pub fn new(input: Input<'d>) -> Self {
        Self { input }
    }
}

impl InputPin for EncoderLine<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}
