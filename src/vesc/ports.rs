use std::io::Write;
use std::time::Duration;

use log::{error, warn};
use serialport::SerialPort;

/// One serial channel to a motor controller.
///
/// The control loop never blocks on a link: a closed link gets a single
/// open attempt per tick, and writes on an open link are fire-and-forget.
pub trait DriveLink {
    /// Attempt to open the channel if it is closed. Returns the resulting
    /// open state. Must not retry internally.
    fn ensure_open(&mut self) -> bool;

    fn is_open(&self) -> bool;

    /// Write a frame if the channel is open. A failed write is logged but
    /// does not close the channel; reconnection is driven only by a later
    /// failed open.
    fn write_frame(&mut self, frame: &[u8]);

    fn name(&self) -> &str;
}

/// Serial-port backed link.
pub struct SerialLink {
    port_name: String,
    baud_rate: u32,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialLink {
    pub fn new(port_name: &str, baud_rate: u32) -> Self {
        SerialLink {
            port_name: port_name.to_string(),
            baud_rate,
            port: None,
        }
    }
}

impl DriveLink for SerialLink {
    fn ensure_open(&mut self) -> bool {
        if self.port.is_some() {
            return true;
        }
        match serialport::new(&self.port_name, self.baud_rate)
            .timeout(Duration::from_millis(10))
            .open()
        {
            Ok(port) => {
                self.port = Some(port);
                true
            }
            Err(e) => {
                error!("unable to open {}: {}", self.port_name, e);
                false
            }
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write_frame(&mut self, frame: &[u8]) {
        if let Some(port) = self.port.as_mut() {
            let result = port.write_all(frame).and_then(|()| port.flush());
            if let Err(e) = result {
                warn!("write to {} failed: {}", self.port_name, e);
            }
        }
    }

    fn name(&self) -> &str {
        &self.port_name
    }
}

/// The two redundant controller channels.
///
/// Both controllers drive the same flywheel, so they receive identical
/// frames. If either channel is down nothing is sent to the other: a
/// single-sided command would spin one motor against a stalled twin.
pub struct DrivePorts<L: DriveLink> {
    pub port1: L,
    pub port2: L,
}

impl<L: DriveLink> DrivePorts<L> {
    pub fn new(port1: L, port2: L) -> Self {
        DrivePorts { port1, port2 }
    }

    /// One open attempt per closed channel.
    pub fn reconnect(&mut self) {
        if !self.port1.is_open() {
            self.port1.ensure_open();
        }
        if !self.port2.is_open() {
            self.port2.ensure_open();
        }
    }

    pub fn both_open(&self) -> bool {
        self.port1.is_open() && self.port2.is_open()
    }

    /// Write the same frame to both channels. Returns false (and writes
    /// nothing) unless both are open.
    pub fn write_both(&mut self, frame: &[u8]) -> bool {
        if !self.both_open() {
            return false;
        }
        self.port1.write_frame(frame);
        self.port2.write_frame(frame);
        true
    }
}

#[cfg(test)]
pub mod mock {
    use super::DriveLink;

    /// In-memory link that records written frames.
    pub struct MemoryLink {
        pub name: String,
        pub open: bool,
        pub can_open: bool,
        pub open_attempts: usize,
        pub frames: Vec<Vec<u8>>,
    }

    impl MemoryLink {
        pub fn open_link(name: &str) -> Self {
            MemoryLink {
                name: name.to_string(),
                open: true,
                can_open: true,
                open_attempts: 0,
                frames: Vec::new(),
            }
        }

        pub fn closed_link(name: &str) -> Self {
            MemoryLink {
                name: name.to_string(),
                open: false,
                can_open: false,
                open_attempts: 0,
                frames: Vec::new(),
            }
        }
    }

    impl DriveLink for MemoryLink {
        fn ensure_open(&mut self) -> bool {
            if !self.open {
                self.open_attempts += 1;
                self.open = self.can_open;
            }
            self.open
        }

        fn is_open(&self) -> bool {
            self.open
        }

        fn write_frame(&mut self, frame: &[u8]) {
            self.frames.push(frame.to_vec());
        }

        fn name(&self) -> &str {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MemoryLink;
    use super::*;

    #[test]
    fn test_write_both_requires_both_open() {
        let mut ports = DrivePorts::new(
            MemoryLink::open_link("/dev/ttyACM0"),
            MemoryLink::closed_link("/dev/ttyACM1"),
        );

        assert!(!ports.both_open());
        assert!(!ports.write_both(&[0x02, 0x03]));
        //nothing written to the open side either
        assert!(ports.port1.frames.is_empty());
        assert!(ports.port2.frames.is_empty());
    }

    #[test]
    fn test_write_both_duplicates_frame() {
        let mut ports = DrivePorts::new(
            MemoryLink::open_link("/dev/ttyACM0"),
            MemoryLink::open_link("/dev/ttyACM1"),
        );

        assert!(ports.write_both(&[0xAB, 0xCD]));
        assert_eq!(ports.port1.frames, vec![vec![0xAB, 0xCD]]);
        assert_eq!(ports.port2.frames, vec![vec![0xAB, 0xCD]]);
    }

    #[test]
    fn test_reconnect_attempts_once_per_call() {
        let mut ports = DrivePorts::new(
            MemoryLink::closed_link("/dev/ttyACM0"),
            MemoryLink::closed_link("/dev/ttyACM1"),
        );

        ports.reconnect();
        ports.reconnect();
        assert_eq!(ports.port1.open_attempts, 2);
        assert_eq!(ports.port2.open_attempts, 2);
        assert!(!ports.both_open());

        //the device comes back
        ports.port1.can_open = true;
        ports.port2.can_open = true;
        ports.reconnect();
        assert!(ports.both_open());

        //no further attempts once open
        ports.reconnect();
        assert_eq!(ports.port1.open_attempts, 3);
    }
}
