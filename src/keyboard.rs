//! The device object: mode core plus the primitives it drives.
//!
//! [`M1`] owns the mode state machine, the DPI selection and the four host
//! primitives. The firmware's scan and lighting tasks call into it through
//! [`KeyboardHooks`]; it never calls back into the host except through the
//! traits in [`crate::host`].

use crate::config::{DPI_OPTIONS, KEY_COUNT};
use crate::dpi::DpiSelector;
use crate::hid::MouseButton;
use crate::host::{ConfigStore, LightingEngine, PointingDevice, StatusLed};
use crate::indicator::StatusColor;
use crate::lighting::Frame;
use crate::mode::{ModeEvent, ModeMachine, OperatingMode, WheelAction};
use crate::overlay;
use crate::timer::Millis;

/// Logical key bound to a debounced input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    Mouse(MouseButton),
    /// Shared RGB effect / hue-adjust button.
    RgbConfig,
    /// Shared DPI / factory-reset button.
    DpiConfig,
}

/// Key bound to each input, in scan order.
pub const KEYMAP: [Key; KEY_COUNT] = [
    Key::Mouse(MouseButton::Left),
    Key::Mouse(MouseButton::Right),
    Key::Mouse(MouseButton::Middle),
    Key::Mouse(MouseButton::Back),
    Key::Mouse(MouseButton::Forward),
    Key::RgbConfig,
    Key::DpiConfig,
];

/// Whether the host should keep processing a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyResult {
    /// Consumed by the mode core.
    Handled,
    /// Not ours: forward as a normal mouse button.
    Passthrough,
}

/// Callbacks the host invokes, all from the same executor.
pub trait KeyboardHooks {
    /// Reload persisted settings. Runs before pointing init.
    fn on_matrix_init(&mut self);
    /// Apply the selected DPI to the sensor and show it on the status LED.
    fn on_pointing_init(&mut self);
    /// Persisted config was found uninitialised: write our defaults.
    fn on_eeconfig_init(&mut self);
    fn on_key(&mut self, key: Key, pressed: bool, now: Millis) -> KeyResult;
    /// Periodic scan tick.
    fn on_scan(&mut self, now: Millis);
    /// One wheel detent. Returns the scroll delta to report, if any.
    fn on_encoder(&mut self, clockwise: bool) -> Option<i8>;
    /// Paint mode indicators over a rendered frame.
    fn on_indicators(&self, frame: &mut Frame);
}

pub struct M1<L, P, S, I> {
    mode: ModeMachine,
    dpi: DpiSelector,
    lighting: L,
    pointing: P,
    store: S,
    status: I,
}

impl<L, P, S, I> M1<L, P, S, I>
where
    L: LightingEngine,
    P: PointingDevice,
    S: ConfigStore,
    I: StatusLed,
{
    /// Build the device and load the persisted DPI selection.
    ///
    /// The sensor and status LED are not touched until
    /// [`KeyboardHooks::on_pointing_init`].
    pub fn new(lighting: L, pointing: P, store: S, status: I) -> Self {
        let dpi = DpiSelector::load(&store);
        Self {
            mode: ModeMachine::new(),
            dpi,
            lighting,
            pointing,
            store,
            status,
        }
    }

    pub fn mode(&self) -> OperatingMode {
        self.mode.mode()
    }

    pub fn dpi(&self) -> &DpiSelector {
        &self.dpi
    }

    pub fn lighting(&self) -> &L {
        &self.lighting
    }

    pub fn pointing(&self) -> &P {
        &self.pointing
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn status(&self) -> &I {
        &self.status
    }

    fn apply(&mut self, event: ModeEvent) {
        match event {
            ModeEvent::AdvanceEffect => self.lighting.step(),
            ModeEvent::HueAdjustEntered => info!("Hue adjust on"),
            ModeEvent::HueAdjustExited => info!("Hue adjust off"),
            ModeEvent::CycleDpi => {
                let index = self.dpi.advance(&mut self.store);
                info!("DPI -> {} ({})", self.dpi.current_dpi(), index);
                self.apply_dpi();
            }
            ModeEvent::ResetArmed => warn!("Factory reset armed"),
            ModeEvent::ResetCountdown(_) => {}
            ModeEvent::FactoryReset => self.factory_reset(),
        }
    }

    fn factory_reset(&mut self) {
        warn!("Factory reset");
        self.store.reset();
        self.dpi.reset(&mut self.store);
        self.apply_dpi();
        if !self.lighting.is_enabled() {
            self.lighting.enable();
        }
        self.lighting.init();
    }

    fn apply_dpi(&mut self) {
        self.pointing.set_cpi(self.dpi.current_dpi());
        self.refresh_indicator();
    }

    /// Shows the CPI the sensor reports. Out-of-band values leave the LED as
    /// it was.
    fn refresh_indicator(&mut self) {
        if let Some(color) = StatusColor::for_dpi(self.pointing.cpi(), &DPI_OPTIONS) {
            self.status.set_color(color);
        }
    }
}

impl<L, P, S, I> KeyboardHooks for M1<L, P, S, I>
where
    L: LightingEngine,
    P: PointingDevice,
    S: ConfigStore,
    I: StatusLed,
{
    fn on_matrix_init(&mut self) {
        self.dpi = DpiSelector::load(&self.store);
    }

    fn on_pointing_init(&mut self) {
        self.apply_dpi();
    }

    fn on_eeconfig_init(&mut self) {
        self.dpi.reset(&mut self.store);
    }

    fn on_key(&mut self, key: Key, pressed: bool, now: Millis) -> KeyResult {
        let event = match key {
            Key::RgbConfig => self.mode.rgb_button(pressed, now),
            Key::DpiConfig => self.mode.dpi_button(pressed, now),
            Key::Mouse(_) => return KeyResult::Passthrough,
        };
        if let Some(event) = event {
            self.apply(event);
        }
        KeyResult::Handled
    }

    fn on_scan(&mut self, now: Millis) {
        if let Some(event) = self.mode.tick(now) {
            self.apply(event);
        }
    }

    fn on_encoder(&mut self, clockwise: bool) -> Option<i8> {
        match self.mode.wheel(clockwise) {
            WheelAction::Hue(true) => {
                self.lighting.increase_hue();
                None
            }
            WheelAction::Hue(false) => {
                self.lighting.decrease_hue();
                None
            }
            WheelAction::Scroll(delta) => Some(delta),
        }
    }

    fn on_indicators(&self, frame: &mut Frame) {
        overlay::apply(frame, self.mode.hue_indicator(), self.mode.reset_count());
    }
}
