//! Host side of the introspection protocol.

use crate::{
    constants::{
        ERROR_MARKER, FRAME_END, FRAME_START, SET_TEST_FLAG_PREFIX, TEST_SEND_PREFIX,
        TEST_SEND_SUFFIX,
    },
    driver::SerialPort,
    error::HarnessError,
    responder::{HarnessValue, Response},
};

/// Talks to a device running the reference driver.
///
/// Every byte sent must come back as an echo before the next one goes out.
///
/// ```
/// use nmea_fsm::{Harness, HarnessValue, SimulatedDevice};
///
/// let mut device = SimulatedDevice::default();
/// device.inject(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n");
///
/// let mut harness = Harness::new(device);
/// assert_eq!(harness.read_string(HarnessValue::LatitudeDegMin).unwrap(), b"4807.038");
/// assert_eq!(harness.read_byte(HarnessValue::GpsFlags, 1).unwrap(), b'N');
/// ```
#[derive(Debug)]
pub struct Harness<P> {
    port: P,
}

type Result<T, P> = core::result::Result<T, HarnessError<<P as SerialPort>::Error>>;

impl<P: SerialPort> Harness<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> P {
        self.port
    }

    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn send_byte(&mut self, byte: u8) -> Result<(), P> {
        self.port.write_byte(byte).map_err(HarnessError::Port)?;
        let received = self.receive()?;
        if received != byte {
            return Err(HarnessError::NoEcho {
                sent: byte,
                received,
            });
        }
        Ok(())
    }

    pub fn send_bytes(&mut self, bytes: &[u8]) -> Result<(), P> {
        for byte in bytes {
            self.send_byte(*byte)?;
        }
        Ok(())
    }

    pub fn send_str(&mut self, text: &str) -> Result<(), P> {
        self.send_bytes(text.as_bytes())
    }

    /// Raw request: send any selector and index, return the decoded frame
    pub fn query(&mut self, var: u8, index: u8) -> Result<Response, P> {
        self.send_bytes(TEST_SEND_PREFIX)?;
        self.send_byte(var)?;
        self.send_byte(b':')?;
        self.send_byte(index)?;
        self.send_bytes(TEST_SEND_SUFFIX)?;
        self.read_response()
    }

    pub fn read_byte(&mut self, value: HarnessValue, offset: usize) -> Result<u8, P> {
        let out_of_range = HarnessError::IndexOutOfRange { value, offset };
        if offset >= value.length() {
            return Err(out_of_range);
        }
        let index = u8::try_from(offset).map_err(|_| out_of_range)?;
        match self.query(value.id(), index)? {
            Response::Value(v) => Ok(v),
            Response::UnknownFlag => Err(HarnessError::UnknownFlag),
            Response::UnknownSelector(sel) => Err(HarnessError::UnknownSelector(sel)),
        }
    }

    /// Every offset of `value` in turn
    pub fn read_string(&mut self, value: HarnessValue) -> Result<Vec<u8>, P> {
        (0..value.length())
            .map(|offset| self.read_byte(value, offset))
            .collect()
    }

    pub fn set_test_flag(&mut self, on: bool) -> Result<(), P> {
        self.send_bytes(SET_TEST_FLAG_PREFIX)?;
        self.send_byte(if on { b'1' } else { b'0' })
    }

    fn receive(&mut self) -> Result<u8, P> {
        self.port.read_byte().map_err(HarnessError::Port)
    }

    fn expect(&mut self, wanted: u8) -> Result<(), P> {
        match self.receive()? {
            b if b == wanted => Ok(()),
            b => Err(HarnessError::UnexpectedResponse(b)),
        }
    }

    fn read_response(&mut self) -> Result<Response, P> {
        match self.receive()? {
            FRAME_START => {
                self.expect(FRAME_START)?;
                let value = self.receive()?;
                self.expect(FRAME_END)?;
                Ok(Response::Value(value))
            },
            ERROR_MARKER => {
                self.expect(b'0')?;
                match self.receive()? {
                    b'1' => Ok(Response::UnknownFlag),
                    b'2' => Ok(Response::UnknownSelector(self.receive()?)),
                    b => Err(HarnessError::UnexpectedResponse(b)),
                }
            },
            b => Err(HarnessError::UnexpectedResponse(b)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{error::NoData, simulation::SimulatedDevice};

    #[test]
    fn offset_checked_before_sending() {
        let mut harness = Harness::new(SimulatedDevice::default());
        let err = harness.read_byte(HarnessValue::Time, 6).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::IndexOutOfRange {
                value: HarnessValue::Time,
                offset: 6
            }
        ));
        assert_eq!(harness.into_inner().pending_output(), 0);
    }

    #[test]
    fn silent_device_is_a_port_error() {
        struct Mute;
        impl SerialPort for Mute {
            type Error = NoData;
            fn read_byte(&mut self) -> core::result::Result<u8, NoData> {
                Err(NoData)
            }
            fn write_byte(&mut self, _: u8) -> core::result::Result<(), NoData> {
                Ok(())
            }
        }
        let mut harness = Harness::new(Mute);
        assert!(matches!(harness.send_byte(b'x'), Err(HarnessError::Port(NoData))));
    }

    #[test]
    fn wrong_echo() {
        struct Shouty;
        impl SerialPort for Shouty {
            type Error = NoData;
            fn read_byte(&mut self) -> core::result::Result<u8, NoData> {
                Ok(b'X')
            }
            fn write_byte(&mut self, _: u8) -> core::result::Result<(), NoData> {
                Ok(())
            }
        }
        let mut harness = Harness::new(Shouty);
        assert!(matches!(
            harness.send_byte(b'x'),
            Err(HarnessError::NoEcho {
                sent: b'x',
                received: b'X'
            })
        ));
    }

    #[test]
    fn echo_index() {
        let mut harness = Harness::new(SimulatedDevice::default());
        assert_eq!(harness.read_byte(HarnessValue::TestSendIndex, 255).unwrap(), 255);
        assert_eq!(harness.query(1, b'!').unwrap(), Response::Value(b'!'));
    }

    /// Echoes every byte, then answers with `reply` once nothing is left to echo
    struct Recorder {
        sent: Vec<u8>,
        echo: Option<u8>,
        reply: std::collections::VecDeque<u8>,
    }

    impl SerialPort for Recorder {
        type Error = NoData;
        fn read_byte(&mut self) -> core::result::Result<u8, NoData> {
            match self.echo.take() {
                Some(byte) => Ok(byte),
                None => self.reply.pop_front().ok_or(NoData),
            }
        }
        fn write_byte(&mut self, byte: u8) -> core::result::Result<(), NoData> {
            self.sent.push(byte);
            self.echo = Some(byte);
            Ok(())
        }
    }

    fn recorder(reply: &[u8]) -> Recorder {
        Recorder {
            sent: Vec::new(),
            echo: None,
            reply: reply.iter().copied().collect(),
        }
    }

    #[test]
    fn request_bytes_on_the_wire() {
        let mut harness = Harness::new(recorder(b">>7<"));
        assert_eq!(harness.read_byte(HarnessValue::Time, 3).unwrap(), b'7');
        assert_eq!(harness.into_inner().sent, b"XXXX!!TEST-SEND:\x07:\x03!!");

        let mut harness = Harness::new(recorder(b""));
        harness.set_test_flag(true).unwrap();
        assert_eq!(harness.into_inner().sent, b"XXXX!!SET-TEST-9:1");
    }
}
