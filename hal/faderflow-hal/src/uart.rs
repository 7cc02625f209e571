//! Host link serial settings
//!
//! The link is raw 8N1 at a fixed rate; both ends are built with the
//! same values.

/// Default host link baud rate
pub const LINK_BAUDRATE: u32 = 115_200;

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baudrate: LINK_BAUDRATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl SerialConfig {
    /// Time to shift one byte onto the wire, in microseconds
    ///
    /// Counts the start bit, data bits, optional parity bit and stop bits.
    pub fn byte_time_us(&self) -> u32 {
        let data = match self.data_bits {
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        };
        let parity = match self.parity {
            Parity::None => 0,
            Parity::Even | Parity::Odd => 1,
        };
        let stop = match self.stop_bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        };
        let bits: u32 = 1 + data + parity + stop;
        (bits * 1_000_000).div_ceil(self.baudrate.max(1))
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_115200_8n1() {
        let cfg = SerialConfig::default();
        assert_eq!(cfg.baudrate, 115_200);
        assert_eq!(cfg.data_bits, DataBits::Eight);
        assert_eq!(cfg.parity, Parity::None);
        assert_eq!(cfg.stop_bits, StopBits::One);
    }

    #[test]
    fn test_byte_time() {
        // 10 bits at 115200 baud = 86.8 us, rounded up
        assert_eq!(SerialConfig::default().byte_time_us(), 87);
    }

    #[test]
    fn test_byte_time_with_parity_and_two_stop_bits() {
        let cfg = SerialConfig {
            parity: Parity::Even,
            stop_bits: StopBits::Two,
            ..Default::default()
        };
        // 12 bits at 115200 baud = 104.2 us
        assert_eq!(cfg.byte_time_us(), 105);
    }
}
