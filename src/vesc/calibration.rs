use std::f64::consts::PI;

use crate::config::CalibrationParams;

/// Convert linear speed at the wheel circumference (m/s) to mechanical RPM,
/// clamped to `max_rpm`.
pub fn velocity_to_rpm(velocity: f64, wheel_radius: f64, max_rpm: f64) -> f64 {
    let rpm = velocity * 30.0 / (wheel_radius * PI);
    rpm.min(max_rpm)
}

/// Apply the linear RPM calibration: `(rpm * slope + offset) * fudge`.
pub fn calibrate_rpm(params: &CalibrationParams, rpm: f64) -> f64 {
    (rpm * params.slope + params.offset) * params.fudge
}

/// Device value for an RPM command: calibrated mechanical RPM scaled to
/// electrical RPM by the motor pole count.
pub fn rpm_wire_value(params: &CalibrationParams, rpm: f64) -> i32 {
    (calibrate_rpm(params, rpm) * params.pole_count as f64).round() as i32
}

/// Device value for a duty cycle command: the controller expects per-mille.
pub fn duty_cycle_wire_value(duty_pct: f64) -> i32 {
    (duty_pct * 1000.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_to_rpm() {
        //10 m/s on a 5 cm wheel
        let rpm = velocity_to_rpm(10.0, 0.05, 20000.0);
        assert!((rpm - 1909.859).abs() < 1e-3);
    }

    #[test]
    fn test_velocity_to_rpm_clamps() {
        let rpm = velocity_to_rpm(10.0, 0.05, 1500.0);
        assert_eq!(rpm, 1500.0);
    }

    #[test]
    fn test_duty_cycle_wire_value() {
        assert_eq!(duty_cycle_wire_value(100.0), 100_000);
        assert_eq!(duty_cycle_wire_value(0.0), 0);
        assert_eq!(duty_cycle_wire_value(12.3456), 12_346);
    }

    #[test]
    fn test_rpm_wire_value_identity_calibration() {
        let params = CalibrationParams {
            slope: 1.0,
            offset: 0.0,
            fudge: 1.0,
            pole_count: 15,
        };
        assert_eq!(rpm_wire_value(&params, 5000.0), 75_000);
    }

    #[test]
    fn test_rpm_wire_value_with_calibration() {
        let params = CalibrationParams {
            slope: 0.9,
            offset: 100.0,
            fudge: 1.1,
            pole_count: 14,
        };
        //(2000*0.9 + 100) * 1.1 = 2090, * 14 = 29260
        assert_eq!(rpm_wire_value(&params, 2000.0), 29_260);
    }
}
