use std::collections::VecDeque;

use crate::{
    driver::{Driver, SerialPort},
    error::NoData,
    receiver::Receiver,
};

/// A [`Driver`] behind an in-memory [`SerialPort`].
///
/// Bytes written to the device are serviced straight away. Whatever the
/// driver sends back is queued for [`read_byte`](SerialPort::read_byte).
#[derive(Debug, Clone, Default)]
pub struct SimulatedDevice {
    driver: Driver,
    output: VecDeque<u8>,
}

impl SimulatedDevice {
    pub fn new(receiver: Receiver) -> Self {
        Self {
            driver: Driver::new(receiver),
            output: VecDeque::new(),
        }
    }

    /// Play bytes from the GPS side and throw away what the device sends
    pub fn inject(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.driver.service(*byte);
        }
    }

    pub fn pending_output(&self) -> usize {
        self.output.len()
    }

    pub fn take_output(&mut self) -> Vec<u8> {
        self.output.drain(..).collect()
    }

    pub fn receiver(&self) -> &Receiver {
        self.driver.receiver()
    }

    pub fn receiver_mut(&mut self) -> &mut Receiver {
        self.driver.receiver_mut()
    }
}

impl SerialPort for SimulatedDevice {
    type Error = NoData;

    fn read_byte(&mut self) -> Result<u8, NoData> {
        self.output.pop_front().ok_or(NoData)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), NoData> {
        let reply = self.driver.service(byte);
        self.output.extend(reply.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::flags::Flags;

    #[test]
    fn echo_is_queued() {
        let mut device = SimulatedDevice::default();
        device.write_all(b"ab").unwrap();
        assert_eq!(device.read_byte(), Ok(b'a'));
        assert_eq!(device.read_byte(), Ok(b'b'));
        assert_eq!(device.read_byte(), Err(NoData));
    }

    #[test]
    fn injected_sentence_leaves_no_output() {
        let mut device = SimulatedDevice::default();
        device.inject(b"$GPRMC,081836,A,3751.65,S,14507.36,E,000.0,360.0,130998,011.3,E*62\r\n");
        assert_eq!(device.pending_output(), 0);
        let flags = device.receiver().flags();
        assert!(flags.contains(Flags::NEW_POSITION | Flags::EAST));
        assert!(!flags.contains(Flags::NORTH));
    }
}
