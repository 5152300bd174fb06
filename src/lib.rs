pub mod config;
pub mod error;
pub mod pubsub;
pub mod ring_buffer;
pub mod vesc;

pub use ring_buffer::RingBuffer;

pub use pubsub::{Message, Publisher, Subscriber, Topic, TopicRegistry};

pub use config::{CalibrationParams, DriveConfig, SharedCalibration};
pub use error::DriveError;
pub use vesc::{CommandKind, CommandMode, DrivePorts, SerialLink, VescHandler};
