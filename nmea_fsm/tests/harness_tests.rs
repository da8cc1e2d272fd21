use nmea_fsm::{
    Flags, Harness, HarnessError, HarnessValue, NoData, Response, SerialPort, SimulatedDevice,
};

static GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn harness_after(sentence: &[u8]) -> Harness<SimulatedDevice> {
    let mut device = SimulatedDevice::default();
    device.inject(sentence);
    Harness::new(device)
}

#[test]
fn test_end_to_end_fix() {
    let mut harness = harness_after(GGA);
    assert_eq!(harness.read_string(HarnessValue::LatitudeDegMin).unwrap(), b"4807.038");
    assert_eq!(harness.read_string(HarnessValue::LongitudeDegMin).unwrap(), b"01131.000");
    assert_eq!(harness.read_string(HarnessValue::Time).unwrap(), b"123519");
    assert_eq!(harness.read_string(HarnessValue::Quality).unwrap(), b"1");
    assert_eq!(harness.read_byte(HarnessValue::GpsFlags, 0).unwrap(), b'1');
    assert_eq!(harness.read_byte(HarnessValue::GpsFlags, 1).unwrap(), b'N');
    assert_eq!(harness.read_byte(HarnessValue::GpsFlags, 2).unwrap(), b'E');
    assert_eq!(harness.into_inner().pending_output(), 0);
}

#[test]
fn test_sentence_sent_through_harness() {
    let mut harness = Harness::new(SimulatedDevice::default());
    harness.send_bytes(GGA).unwrap();
    assert_eq!(harness.read_string(HarnessValue::LatitudeHundredths).unwrap(), b"03");
    let device = harness.into_inner();
    assert!(device.receiver().flags().contains(Flags::NEW_POSITION));
}

#[test]
fn test_error_replies() {
    let mut harness = harness_after(GGA);
    assert_eq!(harness.query(2, 9).unwrap(), Response::UnknownFlag);
    assert_eq!(harness.query(42, 0).unwrap(), Response::UnknownSelector(42));
    assert!(matches!(
        harness.read_byte(HarnessValue::GpsFlags, 4),
        Err(HarnessError::IndexOutOfRange { offset: 4, .. })
    ));
}

#[test]
fn test_flag_nine_round_trip() {
    let mut harness = Harness::new(SimulatedDevice::default());
    assert_eq!(harness.read_byte(HarnessValue::GpsFlags, 3).unwrap(), b'0');
    harness.set_test_flag(true).unwrap();
    assert_eq!(harness.read_byte(HarnessValue::GpsFlags, 3).unwrap(), b'1');
    harness.set_test_flag(false).unwrap();
    assert_eq!(harness.read_byte(HarnessValue::GpsFlags, 3).unwrap(), b'0');
}

#[test]
fn test_send_str_checks_echo() {
    let mut harness = Harness::new(SimulatedDevice::default());
    harness.send_str("hello").unwrap();
    assert_eq!(harness.port_mut().pending_output(), 0);
    assert!(matches!(
        harness.port_mut().read_byte(),
        Err(NoData)
    ));
}

#[test]
fn test_unframed_reply_is_rejected() {
    struct Garbled {
        last: Option<u8>,
        replies: Vec<u8>,
    }

    impl SerialPort for Garbled {
        type Error = NoData;

        fn read_byte(&mut self) -> Result<u8, NoData> {
            match self.last.take() {
                Some(echo) => Ok(echo),
                None => self.replies.pop().ok_or(NoData),
            }
        }

        fn write_byte(&mut self, byte: u8) -> Result<(), NoData> {
            self.last = Some(byte);
            Ok(())
        }
    }

    let mut harness = Harness::new(Garbled {
        last: None,
        replies: vec![b'?'],
    });
    assert!(matches!(
        harness.query(1, 0),
        Err(HarnessError::UnexpectedResponse(b'?'))
    ));
}
