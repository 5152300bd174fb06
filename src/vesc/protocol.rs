//VESC serial protocol, transmit side.
//
//Short packet format (payloads < 256 bytes):
//  [START][LEN][PAYLOAD...][CRC16_HI][CRC16_LO][END]
//  0x02   1byte  LEN bytes    2 bytes           0x03
//
//payload = [COMM id][value as i32 big-endian]
//CRC16/XMODEM over the payload only (poly 0x1021, init 0)

pub const START_BYTE: u8 = 0x02;
pub const END_BYTE: u8 = 0x03;

pub const COMM_SET_DUTY: u8 = 5;
pub const COMM_SET_RPM: u8 = 8;

/// A command frame for one motor controller.
///
/// Values are in device units: duty cycle is percent x 1000, RPM is
/// electrical RPM (mechanical RPM x pole count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VescCommand {
    SetDutyCycle(i32),
    SetRpm(i32),
}

impl VescCommand {
    fn comm_id(&self) -> u8 {
        match self {
            VescCommand::SetDutyCycle(_) => COMM_SET_DUTY,
            VescCommand::SetRpm(_) => COMM_SET_RPM,
        }
    }

    fn value(&self) -> i32 {
        match self {
            VescCommand::SetDutyCycle(v) => *v,
            VescCommand::SetRpm(v) => *v,
        }
    }

    /// Encode into a wire frame.
    pub fn encode(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(5);
        payload.push(self.comm_id());
        payload.extend_from_slice(&self.value().to_be_bytes());

        let crc = crc16(&payload);

        let mut frame = Vec::with_capacity(payload.len() + 5);
        frame.push(START_BYTE);
        frame.push(payload.len() as u8);
        frame.extend_from_slice(&payload);
        frame.push((crc >> 8) as u8);
        frame.push((crc & 0xFF) as u8);
        frame.push(END_BYTE);
        frame
    }
}

/// CRC16/XMODEM as used by the VESC firmware.
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
