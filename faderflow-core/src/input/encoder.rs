//! Rotary encoder decoding
//!
//! Rotation is counted on rising edges of the clock line: the data line
//! level at that edge gives the direction. The push button is debounced by
//! requiring a stable level for longer than the debounce window, and a
//! press is latched until read.

use faderflow_hal::InputPin;

use crate::config::EncoderConfig;

/// Raw line levels sampled in one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EncoderSample {
    pub clk: bool,
    pub dt: bool,
    pub sw: bool,
}

/// Rotation step indexed by `prev_clk << 2 | clk << 1 | dt`
///
/// Only a low-to-high clock edge counts. At that edge the data line
/// differing from the clock means clockwise.
const TRANSITIONS: [i8; 8] = [
    0,  // 0 0 0: clock low
    0,  // 0 0 1: clock low
    1,  // 0 1 0: rising, dt != clk
    -1, // 0 1 1: rising, dt == clk
    0,  // 1 0 0: falling
    0,  // 1 0 1: falling
    0,  // 1 1 0: clock high
    0,  // 1 1 1: clock high
];

fn step(prev_clk: bool, clk: bool, dt: bool) -> i8 {
    let index = ((prev_clk as usize) << 2) | ((clk as usize) << 1) | dt as usize;
    TRANSITIONS[index]
}

/// Per-channel encoder state
#[derive(Debug, Clone)]
pub struct EncoderDecoder {
    config: EncoderConfig,
    position: i32,
    last_returned: i32,
    /// Clock level at the previous update, unset before the first update
    last_clk: Option<bool>,
    /// Button level at the previous update (true = pressed)
    button_raw: bool,
    /// Debounced button level (true = pressed)
    button_stable: bool,
    /// Time of the last raw button level change
    last_button_change_ms: Option<u32>,
    pressed: bool,
}

impl EncoderDecoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            position: 0,
            last_returned: 0,
            last_clk: None,
            button_raw: false,
            button_stable: false,
            last_button_change_ms: None,
            pressed: false,
        }
    }

    /// Process one sample of the encoder lines
    ///
    /// The first call only records the clock level.
    pub fn update(&mut self, now_ms: u32, sample: EncoderSample) {
        if let Some(prev) = self.last_clk {
            self.position += step(prev, sample.clk, sample.dt) as i32;
        }
        self.last_clk = Some(sample.clk);

        let reading = sample.sw != self.config.button_active_low;

        if reading != self.button_raw {
            self.last_button_change_ms = Some(now_ms);
        }

        let stable_for = self
            .last_button_change_ms
            .map(|t| now_ms.wrapping_sub(t))
            .unwrap_or(u32::MAX);

        if stable_for > self.config.debounce_ms && reading != self.button_stable {
            self.button_stable = reading;
            if reading {
                self.pressed = true;
            }
        }

        self.button_raw = reading;
    }

    /// Steps since the previous call
    pub fn delta(&mut self) -> i32 {
        let delta = self.position - self.last_returned;
        self.last_returned = self.position;
        delta
    }

    /// Returns true once per debounced press
    pub fn was_pressed(&mut self) -> bool {
        core::mem::take(&mut self.pressed)
    }

    /// Debounced button level
    pub fn is_button_down(&self) -> bool {
        self.button_stable
    }

    /// Accumulated position
    pub fn position(&self) -> i32 {
        self.position
    }

    /// Zero the position and drop any latched press
    pub fn reset(&mut self) {
        self.position = 0;
        self.last_returned = 0;
        self.pressed = false;
    }
}

/// The three input lines of one encoder
pub struct EncoderPins<CLK, DT, SW> {
    pub clk: CLK,
    pub dt: DT,
    pub sw: SW,
}

impl<CLK: InputPin, DT: InputPin, SW: InputPin> EncoderPins<CLK, DT, SW> {
    pub fn new(clk: CLK, dt: DT, sw: SW) -> Self {
        Self { clk, dt, sw }
    }

    /// Read all three lines
    pub fn sample(&self) -> EncoderSample {
        EncoderSample {
            clk: self.clk.is_high(),
            dt: self.dt.is_high(),
            sw: self.sw.is_high(),
        }
    }
}
