//! Input task
//!
//! On every tick: samples encoder lines and faders for each channel, then
//! lets the link run its beacon and idle checks.

use defmt::*;
use embassy_rp::adc::{self, Adc, Blocking};
use embassy_time::Delay;

use faderflow_core::input::{EncoderPins, FaderSampler};
use faderflow_hal_rp2040::adc::AdcPin;
use faderflow_hal_rp2040::gpio::EncoderLine;

use super::serial_rx::log_link_error;
use super::tick::TICK_SIGNAL;
use crate::channels::{send_outbound, DISPLAY_DIRTY};
use crate::controller::{now_ms, SharedController, CHANNEL_COUNT};

/// Hardware inputs of one channel
pub struct ChannelInputs {
    pub encoder: EncoderPins<EncoderLine<'static>, EncoderLine<'static>, EncoderLine<'static>>,
    pub fader: FaderSampler,
    pub wiper: adc::Channel<'static>,
}

/// Input task - polls encoders and faders on each tick
#[embassy_executor::task]
pub async fn inputs_task(
    mut adc: Adc<'static, Blocking>,
    mut inputs: [ChannelInputs; CHANNEL_COUNT],
    controller: &'static SharedController,
) {
    info!("Input task started");

    let mut delay = Delay;

    loop {
        TICK_SIGNAL.wait().await;
        let mut repaint = false;

        let mut guard = controller.lock().await;
        let ctrl = &mut *guard;
        // Read after locking so the link never sees a time older than its last byte
        let now = now_ms();

        for (input, channel) in inputs.iter_mut().zip(ctrl.channels.iter_mut()) {
            channel.update(now, input.encoder.sample());

            if let Some(delta) = channel.take_encoder_change() {
                debug!(
                    "Channel {} encoder {} -> volume {}",
                    channel.id(),
                    delta,
                    channel.volume()
                );
                repaint = true;
            }
            if channel.was_button_pressed() {
                info!("Channel {} button pressed", channel.id());
            }

            let mut wiper = AdcPin::new(&mut adc, &mut input.wiper);
            match input.fader.poll(now, &mut wiper, &mut delay) {
                Ok(Some(update)) => {
                    debug!("Fader {} -> {}", update.channel, update.position);
                    send_outbound(update.into());
                }
                Ok(None) => {}
                Err(e) => warn!("Fader {} read failed: {:?}", input.fader.channel(), e),
            }
        }

        let housekeeping = ctrl.link.poll(now, &mut ctrl.channels);
        if let Some(e) = housekeeping.timeout {
            log_link_error(e);
            repaint = true;
        }
        if let Some(msg) = housekeeping.announcement {
            trace!("Beacon");
            send_outbound(msg);
        }
        drop(guard);

        if repaint {
            DISPLAY_DIRTY.signal(());
        }
    }
}
