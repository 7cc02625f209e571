//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod display;
pub mod inputs;
pub mod serial_rx;
pub mod serial_tx;
pub mod tick;

pub use display::display_task;
pub use inputs::{inputs_task, ChannelInputs};
pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
pub use tick::tick_task;
