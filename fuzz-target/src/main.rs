#[macro_use]
extern crate afl;
extern crate nmea_fsm;

use nmea_fsm::{Driver, Field, Flags};

const GGA: &[u8] = b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n";

fn parse(chunksize: usize, data: &[u8]) {
    let mut driver = Driver::default();
    for chunk in data.chunks(chunksize) {
        for byte in chunk {
            // Anything may come back, the loop itself must not panic
            let _ = driver.service(*byte);
        }
    }

    // A line end brings the machine back to idle from any state the noise left it in
    for byte in b"\r\n" {
        driver.service(*byte);
    }
    assert!(driver.receiver().machine().is_idle());
    driver.receiver_mut().acknowledge_fix();
    for byte in GGA {
        driver.service(*byte);
    }
    let receiver = driver.receiver();
    assert!(receiver.flags().contains(Flags::NEW_POSITION));
    assert_eq!(receiver.store().field(Field::Time), b"123519");
    assert_eq!(receiver.store().field(Field::LatitudeDegMin), b"4807.038");
    assert!(receiver.machine().is_idle());

    let mut reply = Vec::new();
    for byte in b"!!TEST-SEND:\x02:\x01!!" {
        reply.extend_from_slice(driver.service(*byte).as_bytes());
    }
    assert!(reply.ends_with(b">>N<"));
    assert!(driver.peek().is_none());
}

fn main() {
    fuzz!(|data: &[u8]| {
        if data.len() > 1 {
            let chunksize = data[0] as usize;
            if chunksize != 0 {
                parse(chunksize, &data[1..]);
            }
        }
    });
}
