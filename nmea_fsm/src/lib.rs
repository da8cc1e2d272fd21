//! # nmea_fsm
//!
//! A byte-at-a-time parser for GPS NMEA position sentences, built for small devices that read
//! one byte from a UART per loop iteration and cannot buffer a whole line.
//!
//! Parsing is driven by a static transition table (see [`model`]). `$GPGGA` and `$GPRMC`
//! sentences update a fixed-size [`FieldStore`] and a set of [`Flags`]. A sentence only reaches
//! the store once its terminator has been seen, so a half-received sentence never mixes with the
//! previous fix.
//!
//! Parsing Sentences
//! =================
//!
//! ```
//! use nmea_fsm::{Field, Flags, Receiver};
//!
//! let mut receiver = Receiver::new();
//! for byte in b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n" {
//!     receiver.feed(*byte);
//! }
//! assert!(receiver.flags().contains(Flags::NEW_POSITION));
//! assert_eq!(receiver.store().field(Field::Time), b"123519");
//!
//! let fix = receiver.fix().unwrap();
//! assert!((fix.position.lat - 48.1173).abs() < 1e-4);
//! receiver.acknowledge_fix();
//! ```
//!
//! Introspection
//! =============
//!
//! A test harness can read back the flags and stored fields over the same serial link with
//! `!!TEST-SEND:<var>:<index>!!` requests. The [`Driver`] runs the device side of that exchange
//! and [`Harness`] the host side. Without the `std` feature only the device side is built.
//!
//! no_std Support
//! ==============
//!
//! The parser does not allocate. Disable the default `std` feature to use it on a
//! microcontroller; [`SerialPort`] is the only thing to implement.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate core;
#[cfg(feature = "serde")]
extern crate serde;

pub use crate::{
    constants::SENTINEL,
    driver::{Driver, Reply, SerialPort},
    error::{DecodeError, HarnessError, NoData, TableError},
    flags::Flags,
    machine::{FixPolicy, Machine},
    model::{Table, GPS},
    receiver::{Receiver, ReceiverBuilder, Registers},
    responder::{respond, Frame, HarnessValue, Response, Selector},
    store::{Field, FieldStore, SentenceKind},
    types::{Fix, FixQuality, Position},
};

#[cfg(feature = "std")]
pub use crate::{driver::IoPort, harness::Harness, simulation::SimulatedDevice};

mod constants;
mod driver;
mod error;
mod flags;
#[cfg(feature = "std")]
mod harness;
mod machine;
pub mod model;
mod receiver;
mod responder;
#[cfg(feature = "std")]
mod simulation;
mod store;
mod types;
