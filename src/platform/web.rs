//! Browser implementations of the platform ports
//!
//! All capability checks are feature detection through `Reflect`; anything
//! missing logs a warning once and turns into a no-op.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};

use super::{BatteryPort, BatteryReading, ThemePort, VibrationPort};

/// Toggles the `dark` class on `<html>`
#[derive(Debug, Default)]
pub struct BrowserTheme;

impl ThemePort for BrowserTheme {
    fn set_dark(&mut self, dark: bool) {
        let Some(root) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.document_element())
        else {
            return;
        };
        let _ = root.class_list().toggle_with_force("dark", dark);
    }
}

/// `navigator.vibrate`, when the device has one
#[derive(Debug)]
pub struct BrowserVibration {
    supported: bool,
}

impl Default for BrowserVibration {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserVibration {
    pub fn new() -> Self {
        let supported = web_sys::window()
            .map(|w| Reflect::has(&w.navigator(), &JsValue::from_str("vibrate")).unwrap_or(false))
            .unwrap_or(false);
        if !supported {
            log::warn!("Vibration API unavailable - vibration disabled");
        }
        Self { supported }
    }
}

impl VibrationPort for BrowserVibration {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> bool {
        if !self.supported {
            return false;
        }
        let Some(window) = web_sys::window() else {
            return false;
        };
        let pattern: Array = pattern_ms.iter().map(|&ms| JsValue::from(ms)).collect();
        window.navigator().vibrate_with_pattern(&pattern)
    }
}

/// `navigator.getBattery()`, refreshed on level/charging change events
#[derive(Debug, Default, Clone)]
pub struct BrowserBattery {
    latest: Rc<RefCell<Option<BatteryReading>>>,
}

impl BrowserBattery {
    /// Start listening; readings arrive asynchronously
    pub fn connect() -> Self {
        let battery = Self::default();
        let latest = battery.latest.clone();
        spawn_local(async move {
            if let Err(e) = watch_battery(latest).await {
                log::warn!("Battery API unavailable: {:?}", e);
            }
        });
        battery
    }
}

impl BatteryPort for BrowserBattery {
    fn reading(&self) -> Option<BatteryReading> {
        *self.latest.borrow()
    }
}

fn read_battery(manager: &JsValue) -> BatteryReading {
    let number = |key: &str| {
        Reflect::get(manager, &JsValue::from_str(key))
            .ok()
            .and_then(|v| v.as_f64())
    };
    let charging = Reflect::get(manager, &JsValue::from_str("charging"))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    BatteryReading::from_raw(
        number("level").unwrap_or(1.0),
        charging,
        number("dischargingTime").unwrap_or(f64::INFINITY),
    )
}

async fn watch_battery(latest: Rc<RefCell<Option<BatteryReading>>>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let navigator = window.navigator();
    let get_battery: Function = Reflect::get(&navigator, &JsValue::from_str("getBattery"))?
        .dyn_into()
        .map_err(|_| JsValue::from_str("getBattery not supported"))?;
    let promise: Promise = get_battery.call0(&navigator)?.dyn_into()?;
    let manager = JsFuture::from(promise).await?;

    *latest.borrow_mut() = Some(read_battery(&manager));

    let target: web_sys::EventTarget = manager.clone().dyn_into()?;
    let on_change = {
        let manager = manager.clone();
        Closure::<dyn FnMut()>::new(move || {
            *latest.borrow_mut() = Some(read_battery(&manager));
        })
    };
    for event in ["levelchange", "chargingchange"] {
        let _ = target.add_event_listener_with_callback(event, on_change.as_ref().unchecked_ref());
    }
    on_change.forget();
    Ok(())
}
