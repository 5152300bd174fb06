/**
 * VESC Drive Module
 *
 * Dual-controller flywheel drive:
 * - Wire protocol framing for the VESC serial interface
 * - Velocity/RPM conversion and calibrated command encoding
 * - Linear ramp generation
 * - Redundant serial channel management
 * - The VescHandler control loop tying it together
 */

pub mod calibration;
pub mod handler;
pub mod ports;
pub mod protocol;
pub mod ramp;

pub use handler::{
    CommandKind, CommandMode, VescHandler, stop_handler, DUTY_CYCLE_CMD_TOPIC, READY_TOPIC,
    RPM_CMD_TOPIC, TRIGGER_TOPIC, VELOCITY_CMD_TOPIC,
};
pub use ports::{DriveLink, DrivePorts, SerialLink};
pub use protocol::VescCommand;
pub use ramp::Ramp;
