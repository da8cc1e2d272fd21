//! Reference device loop: read a byte, echo it, step the parser, send any
//! response frame the step asked for.

use core::convert::Infallible;

use crate::{receiver::Receiver, responder::Frame};

/// Byte-at-a-time link to the other end
pub trait SerialPort {
    type Error;

    /// Blocks until a byte arrives
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        for byte in bytes {
            self.write_byte(*byte)?;
        }
        Ok(())
    }
}

/// Bytes produced by one loop iteration: the echo, then a frame
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Reply {
    bytes: [u8; 5],
    len: u8,
}

impl Reply {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, bytes: &[u8]) {
        for byte in bytes {
            if let Some(slot) = self.bytes.get_mut(usize::from(self.len)) {
                *slot = *byte;
                self.len += 1;
            }
        }
    }
}

impl core::fmt::Debug for Reply {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Reply").field(&self.as_bytes()).finish()
    }
}

#[derive(Debug, Clone)]
pub struct Driver {
    receiver: Receiver,
    echo: bool,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new(Receiver::new())
    }
}

impl Driver {
    pub fn new(receiver: Receiver) -> Self {
        Self {
            receiver,
            echo: true,
        }
    }

    /// Only send response frames
    pub fn without_echo(mut self) -> Self {
        self.echo = false;
        self
    }

    /// One iteration of the device loop for a received byte
    pub fn service(&mut self, byte: u8) -> Reply {
        let mut reply = Reply::default();
        if self.echo {
            reply.push(&[byte]);
        }
        self.receiver.feed(byte);
        if let Some(frame) = self.receiver.poll() {
            reply.push(frame.as_bytes());
            self.receiver.acknowledge_request();
            log::trace!("Sending {:?}", frame);
        }
        reply
    }

    /// Serve `port` until it fails
    pub fn run<P: SerialPort>(&mut self, port: &mut P) -> Result<Infallible, P::Error> {
        loop {
            let byte = port.read_byte()?;
            let reply = self.service(byte);
            port.write_all(reply.as_bytes())?;
        }
    }

    pub fn receiver(&self) -> &Receiver {
        &self.receiver
    }

    pub fn receiver_mut(&mut self) -> &mut Receiver {
        &mut self.receiver
    }

    /// The frame a request would get right now, without touching the flags
    pub fn peek(&self) -> Option<Frame> {
        self.receiver.poll()
    }
}

#[cfg(feature = "std")]
pub use self::io::IoPort;

#[cfg(feature = "std")]
mod io {
    use std::io::{self, ErrorKind, Read, Write};

    use super::SerialPort;

    /// [`SerialPort`] over anything readable and writable
    #[derive(Debug)]
    pub struct IoPort<T> {
        inner: T,
        patient: bool,
    }

    impl<T: Read + Write> IoPort<T> {
        /// Read timeouts are reported as errors
        pub fn new(inner: T) -> Self {
            Self {
                inner,
                patient: false,
            }
        }

        /// Read timeouts are retried forever
        pub fn patient(inner: T) -> Self {
            Self {
                inner,
                patient: true,
            }
        }

        pub fn into_inner(self) -> T {
            self.inner
        }
    }

    impl<T: Read + Write> SerialPort for IoPort<T> {
        type Error = io::Error;

        fn read_byte(&mut self) -> io::Result<u8> {
            let mut buf = [0u8; 1];
            loop {
                match self.inner.read(&mut buf) {
                    Ok(0) => return Err(ErrorKind::UnexpectedEof.into()),
                    Ok(_) => return Ok(buf[0]),
                    Err(e) if e.kind() == ErrorKind::Interrupted => {},
                    Err(e)
                        if self.patient
                            && matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {},
                    Err(e) => return Err(e),
                }
            }
        }

        fn write_byte(&mut self, byte: u8) -> io::Result<()> {
            self.inner.write_all(&[byte])
        }

        fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
            self.inner.write_all(bytes)?;
            self.inner.flush()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_byte_is_echoed() {
        let mut driver = Driver::default();
        assert_eq!(driver.service(b'x').as_bytes(), b"x");
    }

    #[test]
    fn request_terminator_brings_frame() {
        let mut driver = Driver::default();
        let mut out = Vec::new();
        for byte in b"!!TEST-SEND:\x01:A!!" {
            out.extend_from_slice(driver.service(*byte).as_bytes());
        }
        assert!(out.starts_with(b"!!TEST-SEND:\x01:A!!"));
        assert_eq!(&out[out.len() - 4..], b">>A<");
        assert!(driver.peek().is_none());
    }

    #[test]
    fn silent_driver() {
        let mut driver = Driver::default().without_echo();
        assert!(driver.service(b'$').is_empty());
    }
}
