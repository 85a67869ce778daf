//! Matrix scan tick.
//!
//! Every [`SCAN_INTERVAL_MS`] the task samples the keys and the wheel,
//! hands debounced changes and detents to the device object, advances the
//! mode timers and queues the resulting mouse reports for USB.

use core::cell::RefCell;

use defmt::{debug, info};
use embassy_time::{Duration, Instant, Ticker};
use heapless::Vec;
use m1_firmware::config::{KEY_COUNT, SCAN_INTERVAL_MS};
use m1_firmware::debounce::Debouncer;
use m1_firmware::encoder::QuadratureDecoder;
use m1_firmware::hid::{update_buttons, MouseReport};
use m1_firmware::keyboard::{Key, KeyResult, KeyboardHooks, KEYMAP};

use super::pins::{EncoderPins, KeyPins};
use super::{SharedDevice, MOUSE_REPORTS};

/// Worst case per tick: every key changes plus one wheel detent.
const MAX_REPORTS_PER_TICK: usize = KEY_COUNT + 1;

pub async fn scan_task(keys: KeyPins, wheel: EncoderPins, device: &'static SharedDevice) -> ! {
    let mut debouncer = Debouncer::<KEY_COUNT>::new();
    let (a, b) = wheel.read();
    let mut decoder = QuadratureDecoder::default().with_initial(a, b);
    let mut buttons = 0u8;
    let mut ticker = Ticker::every(Duration::from_millis(SCAN_INTERVAL_MS));
    info!("Scan task started");

    loop {
        let now = Instant::now().as_millis() as u32;
        let raw = keys.read();
        let changes = debouncer.update(&raw, now);
        let (a, b) = wheel.read();
        let detent = decoder.update(a, b);

        let mut reports: Vec<MouseReport, MAX_REPORTS_PER_TICK> = Vec::new();
        device.lock(|cell: &RefCell<_>| {
            let mut device = cell.borrow_mut();
            for change in changes {
                let key = KEYMAP[change.key];
                debug!("Key {:?} pressed={}", key, change.pressed);
                if device.on_key(key, change.pressed, now) == KeyResult::Passthrough {
                    if let Key::Mouse(button) = key {
                        buttons = update_buttons(buttons, button, change.pressed);
                        let _ = reports.push(MouseReport::with_buttons(buttons));
                    }
                }
            }
            if let Some(clockwise) = detent {
                if let Some(delta) = device.on_encoder(clockwise) {
                    let _ = reports.push(MouseReport::scroll(buttons, delta));
                }
            }
            device.on_scan(now);
        });

        for report in reports {
            MOUSE_REPORTS.send(report).await;
        }
        ticker.next().await;
    }
}
