use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Deserialize;

use crate::error::DriveError;

/// RPM calibration parameters, hot-reloadable at runtime.
///
/// The commanded mechanical RPM is mapped to the value the controller is
/// actually asked for: `(rpm * slope + offset) * fudge`, then scaled by
/// `pole_count` to electrical RPM on the wire. The control loop re-reads
/// these once per tick, so an update takes effect without a restart.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    pub slope: f64,
    pub offset: f64,
    pub fudge: f64,
    pub pole_count: i32,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        CalibrationParams {
            slope: 1.0,
            offset: 0.0,
            fudge: 1.0,
            pole_count: 14,
        }
    }
}

/// Shared calibration snapshot store.
///
/// Writers (a parameter reload path, a tuning console) replace the whole
/// struct; the control loop takes a copy once per tick and never holds the
/// lock across I/O.
#[derive(Clone)]
pub struct SharedCalibration {
    params: Arc<RwLock<CalibrationParams>>,
}

impl SharedCalibration {
    pub fn new(params: CalibrationParams) -> Self {
        SharedCalibration {
            params: Arc::new(RwLock::new(params)),
        }
    }

    /// Read-only snapshot taken at point of use.
    pub fn snapshot(&self) -> CalibrationParams {
        *self.params.read().unwrap()
    }

    pub fn update(&self, params: CalibrationParams) {
        *self.params.write().unwrap() = params;
    }
}

/// Static drive configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Control loop rate in Hz.
    pub rate: f64,
    /// Radius of the launcher wheel in meters.
    pub wheel_radius: f64,
    /// RPM ramp rate in rpm/sec.
    pub rpm_accel: f64,
    /// Duty cycle ramp rate in %/sec.
    pub duty_cycle_accel: f64,
    /// Time it takes the drive to get up to speed (sec).
    pub ramp_time: f64,
    /// Time to wait after a trigger before shutting the motor down (sec).
    pub cooldown_time: f64,
    /// Seconds without a new command before the active command is dropped.
    pub command_timeout: f64,
    pub max_rpm: f64,
    /// Serial baud rate for both controller links.
    pub baud_rate: u32,
    pub calibration: CalibrationParams,
}

impl Default for DriveConfig {
    fn default() -> Self {
        DriveConfig {
            rate: 20.0,
            wheel_radius: 0.05,
            rpm_accel: 2000.0,
            duty_cycle_accel: 50.0,
            ramp_time: 3.0,
            cooldown_time: 2.0,
            command_timeout: 1.0,
            max_rpm: 10000.0,
            baud_rate: 115200,
            calibration: CalibrationParams::default(),
        }
    }
}

impl DriveConfig {
    pub fn load(path: &Path) -> Result<Self, DriveError> {
        let text = fs::read_to_string(path)?;
        let config = toml::from_str(&text)?;
        Ok(config)
    }

    /// Control loop period.
    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_secs_f64(1.0 / self.rate)
    }
}
