//! Fader sampling
//!
//! Each fader is a potentiometer on an ADC channel. Sampling is rate
//! limited, smoothed with an integer exponential moving average, quantized
//! to 8 bits and only reported when it moves further than the deadband.

use embedded_hal::delay::DelayNs;
use faderflow_hal::{AdcError, AnalogInput};
use faderflow_protocol::FaderUpdate;

use crate::config::FaderConfig;

/// Per-channel fader state
#[derive(Debug, Clone)]
pub struct FaderSampler {
    channel: u8,
    config: FaderConfig,
    /// Smoothed raw reading, unset until the first sample
    filtered: Option<u16>,
    /// Last reported position, unset until the first report
    last_sent: Option<u8>,
    /// Time of the last successful sample
    last_sample_ms: Option<u32>,
}

impl FaderSampler {
    pub fn new(channel: u8, config: FaderConfig) -> Self {
        Self {
            channel,
            config,
            filtered: None,
            last_sent: None,
            last_sample_ms: None,
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Smoothed raw reading
    pub fn filtered(&self) -> Option<u16> {
        self.filtered
    }

    /// Last reported quantized position
    pub fn last_sent(&self) -> Option<u8> {
        self.last_sent
    }

    /// Returns true if the read interval has elapsed
    pub fn is_due(&self, now_ms: u32) -> bool {
        match self.last_sample_ms {
            None => true,
            Some(last) => now_ms.wrapping_sub(last) >= self.config.read_interval_ms,
        }
    }

    /// Sample the fader if due
    ///
    /// Returns `Ok(Some(update))` when the position moved past the deadband.
    /// A failed conversion leaves the state untouched so the next tick
    /// retries.
    pub fn poll<A, D>(
        &mut self,
        now_ms: u32,
        adc: &mut A,
        delay: &mut D,
    ) -> Result<Option<FaderUpdate>, AdcError>
    where
        A: AnalogInput,
        D: DelayNs,
    {
        if !self.is_due(now_ms) {
            return Ok(None);
        }

        if self.config.discard_first_read {
            // The sample-and-hold cap may still carry the previous channel
            adc.read()?;
            delay.delay_us(self.config.settle_us);
        }
        let raw = adc.read()?;

        self.last_sample_ms = Some(now_ms);
        Ok(self.sample(raw))
    }

    /// Feed one raw reading through smoothing, quantization and the deadband
    pub fn sample(&mut self, raw: u16) -> Option<FaderUpdate> {
        let raw = raw.min(self.config.adc_max);

        let filtered = match self.filtered {
            None => raw,
            Some(prev) => {
                let w = self.config.history_weight.min(3) as u32;
                ((prev as u32 * w + raw as u32 * (4 - w)) / 4) as u16
            }
        };
        self.filtered = Some(filtered);

        let position = self.quantize(filtered);
        let moved = match self.last_sent {
            None => true,
            Some(last) => position.abs_diff(last) > self.config.deadband,
        };

        if !moved {
            return None;
        }

        self.last_sent = Some(position);
        Some(FaderUpdate {
            channel: self.channel,
            position,
        })
    }

    /// Map `0..=adc_max` linearly onto `0..=255`
    fn quantize(&self, value: u16) -> u8 {
        let max = self.config.adc_max.max(1) as u32;
        (value as u32 * 255 / max).min(255) as u8
    }
}
