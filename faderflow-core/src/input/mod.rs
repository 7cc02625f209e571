//! Physical input decoding
//!
//! Turns raw analog readings and digital line levels into clean events.
//! Both decoders are driven by a periodic tick with the current time.

pub mod encoder;
pub mod fader;

pub use encoder::{EncoderDecoder, EncoderPins, EncoderSample};
pub use fader::FaderSampler;
