//! Battery drainer
//!
//! Controls with a drain estimate, the vibration pulse loop and the
//! hash-rate board fed by the decorative miner workers. Device access goes
//! through the platform ports.

use serde::{Deserialize, Serialize};

use crate::consts::{VIBRATION_PATTERN, VIBRATION_REPEAT_MS};
use crate::platform::{BatteryPort, BatteryReading, VibrationPort};
use crate::settings::Settings;
use crate::timer::Interval;

pub const MAX_GPU_INTENSITY: u8 = 100;
pub const MAX_CPU_THREADS: u32 = 16;

/// User-facing toggles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrainControls {
    pub gpu: bool,
    /// 0 - 100
    pub gpu_intensity: u8,
    pub cpu: bool,
    pub cpu_threads: u32,
    pub vibration: bool,
    pub max_brightness: bool,
}

impl Default for DrainControls {
    fn default() -> Self {
        Self {
            gpu: false,
            gpu_intensity: 50,
            cpu: false,
            cpu_threads: 4,
            vibration: false,
            max_brightness: false,
        }
    }
}

impl DrainControls {
    /// Rough battery drain in percent per minute
    pub fn estimated_drain(&self) -> f32 {
        let mut drain = 0.0;
        if self.gpu {
            drain += 0.5 + f32::from(self.gpu_intensity.min(MAX_GPU_INTENSITY)) / 100.0 * 2.0;
        }
        if self.cpu {
            drain += self.cpu_threads as f32 * 0.5;
        }
        if self.vibration {
            drain += 0.3;
        }
        if self.max_brightness {
            drain += 0.5;
        }
        drain
    }

    pub fn set_gpu_intensity(&mut self, intensity: u8) {
        self.gpu_intensity = intensity.min(MAX_GPU_INTENSITY);
    }

    pub fn set_cpu_threads(&mut self, threads: u32) {
        self.cpu_threads = threads.clamp(1, MAX_CPU_THREADS);
    }
}

/// Repeats the vibration pattern while enabled
#[derive(Debug, Clone)]
pub struct VibrationLoop {
    clock: Interval,
    pulses: u32,
}

impl Default for VibrationLoop {
    fn default() -> Self {
        Self {
            clock: Interval::new(VIBRATION_REPEAT_MS),
            pulses: 0,
        }
    }
}

impl VibrationLoop {
    pub fn is_enabled(&self) -> bool {
        self.clock.is_running()
    }

    /// Patterns the device accepted
    pub fn pulses(&self) -> u32 {
        self.pulses
    }

    /// Start pulsing; the first pattern plays immediately
    pub fn enable(&mut self, port: &mut impl VibrationPort) {
        if self.is_enabled() {
            return;
        }
        self.clock.start();
        self.pulse(port);
    }

    pub fn disable(&mut self) {
        self.clock.stop();
    }

    pub fn set_enabled(&mut self, enabled: bool, port: &mut impl VibrationPort) {
        if enabled {
            self.enable(port);
        } else {
            self.disable();
        }
    }

    pub fn tick(&mut self, dt_ms: f64, port: &mut impl VibrationPort) {
        for _ in 0..self.clock.advance(dt_ms) {
            self.pulse(port);
        }
    }

    fn pulse(&mut self, port: &mut impl VibrationPort) {
        if port.vibrate(&VIBRATION_PATTERN) {
            self.pulses += 1;
        }
    }
}

/// Aggregated miner statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct HashRateBoard {
    /// Latest per-worker rate (hashes/s); empty while disabled
    rates: Vec<u64>,
    total: u64,
}

impl HashRateBoard {
    pub fn is_enabled(&self) -> bool {
        !self.rates.is_empty()
    }

    pub fn threads(&self) -> usize {
        self.rates.len()
    }

    /// (Re)start with `threads` idle workers
    pub fn enable(&mut self, threads: usize) {
        self.rates = vec![0; threads];
        log::info!("Miner started with {} workers", threads);
    }

    pub fn disable(&mut self) {
        if self.is_enabled() {
            log::info!("Miner stopped after {} hashes", self.total);
        }
        self.rates.clear();
    }

    /// A worker's periodic report; ignored when disabled or unknown
    pub fn report(&mut self, worker: usize, rate: u64) {
        let Some(slot) = self.rates.get_mut(worker) else {
            log::debug!("Ignoring hash report from worker {}", worker);
            return;
        };
        *slot = rate;
        self.total += rate;
    }

    /// Sum of the latest per-worker rates
    pub fn combined_rate(&self) -> u64 {
        self.rates.iter().sum()
    }

    pub fn total_hashes(&self) -> u64 {
        self.total
    }
}

/// Compact count for the board: `1.5K`, `2.35M`
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// The drainer page: controls plus the parts they drive
#[derive(Debug, Default)]
pub struct BatteryDrainer {
    pub controls: DrainControls,
    pub vibration: VibrationLoop,
    pub miner: HashRateBoard,
    battery: Option<BatteryReading>,
}

impl BatteryDrainer {
    /// Start with the user's vibration preference
    pub fn from_settings(settings: &Settings) -> Self {
        let mut drainer = Self::default();
        drainer.controls.vibration = settings.vibration;
        drainer
    }

    pub fn battery(&self) -> Option<BatteryReading> {
        self.battery
    }

    /// Pull the latest reading from the port
    pub fn refresh_battery(&mut self, port: &impl BatteryPort) -> Option<BatteryReading> {
        self.battery = port.reading();
        self.battery
    }

    /// Bring the vibration loop and miner in line with the controls
    pub fn apply(&mut self, port: &mut impl VibrationPort) {
        self.vibration.set_enabled(self.controls.vibration, port);
        let threads = self.controls.cpu_threads as usize;
        match (self.controls.cpu, self.miner.is_enabled()) {
            (true, false) => self.miner.enable(threads),
            (true, true) if self.miner.threads() != threads => self.miner.enable(threads),
            (false, true) => self.miner.disable(),
            _ => {}
        }
    }

    pub fn tick(&mut self, dt_ms: f64, port: &mut impl VibrationPort) {
        self.vibration.tick(dt_ms, port);
    }

    /// Everything off
    pub fn stop_all(&mut self) {
        self.controls.gpu = false;
        self.controls.cpu = false;
        self.controls.vibration = false;
        self.controls.max_brightness = false;
        self.vibration.disable();
        self.miner.disable();
        log::info!("Battery drainer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Headless;

    fn vibrating_host() -> Headless {
        Headless {
            can_vibrate: true,
            ..Headless::default()
        }
    }

    #[test]
    fn test_estimated_drain() {
        let mut c = DrainControls::default();
        assert_eq!(c.estimated_drain(), 0.0);

        c.gpu = true;
        c.gpu_intensity = 100;
        assert!((c.estimated_drain() - 2.5).abs() < 1e-6);

        c.cpu = true;
        c.cpu_threads = 4;
        c.vibration = true;
        c.max_brightness = true;
        assert!((c.estimated_drain() - 5.3).abs() < 1e-5);
    }

    #[test]
    fn test_control_clamps() {
        let mut c = DrainControls::default();
        c.set_gpu_intensity(250);
        assert_eq!(c.gpu_intensity, 100);
        c.set_cpu_threads(0);
        assert_eq!(c.cpu_threads, 1);
        c.set_cpu_threads(64);
        assert_eq!(c.cpu_threads, MAX_CPU_THREADS);
    }

    #[test]
    fn test_vibration_pulses_on_enable_and_repeat() {
        let mut host = vibrating_host();
        let mut vib = VibrationLoop::default();
        vib.enable(&mut host);
        assert_eq!(host.vibrations, vec![VIBRATION_PATTERN.to_vec()]);

        vib.tick(1250.0, &mut host);
        assert_eq!(vib.pulses(), 3);

        vib.disable();
        vib.tick(5000.0, &mut host);
        assert_eq!(host.vibrations.len(), 3);
    }

    #[test]
    fn test_vibration_unsupported_is_silent() {
        let mut host = Headless::default();
        let mut vib = VibrationLoop::default();
        vib.enable(&mut host);
        vib.tick(2000.0, &mut host);
        assert!(vib.is_enabled());
        assert_eq!(vib.pulses(), 0);
    }

    #[test]
    fn test_hash_rate_board() {
        let mut board = HashRateBoard::default();
        board.report(0, 500);
        assert_eq!(board.total_hashes(), 0);

        board.enable(3);
        board.report(0, 1000);
        board.report(1, 2000);
        board.report(0, 1500);
        board.report(7, 9999);
        assert_eq!(board.combined_rate(), 3500);
        assert_eq!(board.total_hashes(), 4500);

        board.disable();
        assert_eq!(board.combined_rate(), 0);
        board.report(1, 100);
        assert_eq!(board.total_hashes(), 4500);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(2_345_678), "2.35M");
    }

    #[test]
    fn test_drainer_apply_and_stop() {
        let mut host = vibrating_host();
        let mut drainer = BatteryDrainer::default();
        drainer.controls.cpu = true;
        drainer.controls.vibration = true;
        drainer.apply(&mut host);
        assert_eq!(drainer.miner.threads(), 4);
        assert!(drainer.vibration.is_enabled());

        drainer.controls.set_cpu_threads(2);
        drainer.apply(&mut host);
        assert_eq!(drainer.miner.threads(), 2);

        drainer.stop_all();
        assert!(!drainer.miner.is_enabled());
        assert!(!drainer.vibration.is_enabled());
        assert_eq!(drainer.controls.estimated_drain(), 0.0);
    }

    #[test]
    fn test_vibration_preference() {
        let settings = Settings {
            vibration: true,
            ..Settings::default()
        };
        assert!(BatteryDrainer::from_settings(&settings).controls.vibration);
        assert!(!BatteryDrainer::from_settings(&Settings::default()).controls.vibration);
    }

    #[test]
    fn test_battery_refresh() {
        let mut drainer = BatteryDrainer::default();
        assert_eq!(drainer.refresh_battery(&Headless::default()), None);

        let host = Headless {
            battery: Some(BatteryReading::from_raw(0.8, false, 3600.0)),
            ..Headless::default()
        };
        let reading = drainer.refresh_battery(&host);
        assert_eq!(reading.map(|r| r.level_percent), Some(80));
        assert_eq!(drainer.battery().and_then(|r| r.minutes_to_empty), Some(60));
    }
}
