//! Transition table for `$GPGGA` / `$GPRMC` position fixes and the harness request sentences.
//!
//! ```text
//! $GPGGA,hhmmss[.sss],DDMM.mm[m..],N|S,DDDMM.mm[m..],E|W,Q,...[*CS]<CR|LF>
//! $GPRMC,hhmmss[.sss],A,DDMM.mm[m..],N|S,DDDMM.mm[m..],E|W,...[*CS]<CR|LF>
//! !!TEST-SEND:<var>:<index>!!
//! !!SET-TEST-9:0|1
//! ```

use super::{Action, Arm, CharClass, Next, Node, NodeId, NodeKind, Slot, Table};
use crate::{
    constants::{
        NMEA_CHECKSUM_CHAR, NMEA_END_CHAR_1, NMEA_END_CHAR_2, NMEA_FIELD_SEPARATOR,
        NMEA_SYNC_CHAR, REQUEST_SYNC_CHAR,
    },
    flags::Flags,
    store::SentenceKind,
};

pub(crate) const IDLE: NodeId = 0;
pub(crate) const DOLLAR: NodeId = 1;
pub(crate) const TALKER_GP: NodeId = 2;
pub(crate) const GGA_HEADER: NodeId = 3;
pub(crate) const GGA_POSITION: NodeId = 4;
pub(crate) const GGA_QUALITY_SEP: NodeId = 5;
pub(crate) const GGA_QUALITY: NodeId = 6;
pub(crate) const RMC_HEADER: NodeId = 7;
pub(crate) const RMC_STATUS: NodeId = 8;
pub(crate) const READ_TIME: NodeId = 9;
pub(crate) const TIME_REST: NodeId = 10;
pub(crate) const READ_LAT_LONG: NodeId = 11;
pub(crate) const LAT_POINT: NodeId = 12;
pub(crate) const LAT_HUNDREDTHS: NodeId = 13;
pub(crate) const LAT_REST: NodeId = 14;
pub(crate) const LAT_HEMISPHERE: NodeId = 15;
pub(crate) const READ_LONGITUDE: NodeId = 16;
pub(crate) const LON_DEG_MIN: NodeId = 17;
pub(crate) const LON_POINT: NodeId = 18;
pub(crate) const LON_HUNDREDTHS: NodeId = 19;
pub(crate) const LON_REST: NodeId = 20;
pub(crate) const LON_HEMISPHERE: NodeId = 21;
pub(crate) const TAIL: NodeId = 22;
pub(crate) const CHECKSUM: NodeId = 23;
pub(crate) const BANG: NodeId = 24;
pub(crate) const COMMAND: NodeId = 25;
pub(crate) const TEST_SEND: NodeId = 26;
pub(crate) const TEST_SEND_VAR: NodeId = 27;
pub(crate) const TEST_SEND_SEP: NodeId = 28;
pub(crate) const TEST_SEND_INDEX: NodeId = 29;
pub(crate) const TEST_SEND_END: NodeId = 30;
pub(crate) const TEST_SEND_DONE: NodeId = 31;
pub(crate) const SET_TEST: NodeId = 32;
pub(crate) const SET_TEST_VALUE: NodeId = 33;

static NODES: [Node; 34] = [
    // IDLE
    Node::new(
        "idle",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(NMEA_SYNC_CHAR),
                actions: &[],
                next: Next::Goto(DOLLAR),
            },
            Arm {
                class: CharClass::Byte(REQUEST_SYNC_CHAR),
                actions: &[],
                next: Next::Goto(BANG),
            },
        ]),
    ),
    // DOLLAR
    Node::new(
        "dollar",
        NodeKind::Literal {
            text: b"GP",
            slots: &[],
            next: Next::Goto(TALKER_GP),
        },
    ),
    // TALKER_GP
    Node::new(
        "gp",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(b'G'),
                actions: &[],
                next: Next::Goto(GGA_HEADER),
            },
            Arm {
                class: CharClass::Byte(b'R'),
                actions: &[],
                next: Next::Goto(RMC_HEADER),
            },
        ]),
    ),
    // GGA_HEADER
    Node::with_entry(
        "gpgga",
        &[Action::Begin(SentenceKind::Gga)],
        NodeKind::Literal {
            text: b"GA,",
            slots: &[],
            next: Next::Call {
                sub: READ_TIME,
                ret: GGA_POSITION,
            },
        },
    ),
    // GGA_POSITION
    Node::new(
        "ggaPosition",
        NodeKind::Pass(Next::Call {
            sub: READ_LAT_LONG,
            ret: GGA_QUALITY_SEP,
        }),
    ),
    // GGA_QUALITY_SEP
    Node::new(
        "ggaQualitySep",
        NodeKind::Literal {
            text: b",",
            slots: &[],
            next: Next::Goto(GGA_QUALITY),
        },
    ),
    // GGA_QUALITY
    Node::new(
        "ggaQuality",
        NodeKind::Capture {
            class: CharClass::Range(b'0', b'8'),
            len: 1,
            slots: &[Slot::Quality],
            next: Next::Goto(TAIL),
        },
    ),
    // RMC_HEADER
    Node::with_entry(
        "gprmc",
        &[Action::Begin(SentenceKind::Rmc)],
        NodeKind::Literal {
            text: b"MC,",
            slots: &[],
            next: Next::Call {
                sub: READ_TIME,
                ret: RMC_STATUS,
            },
        },
    ),
    // RMC_STATUS
    Node::new(
        "rmcStatus",
        NodeKind::Literal {
            text: b"A,",
            slots: &[],
            next: Next::Call {
                sub: READ_LAT_LONG,
                ret: TAIL,
            },
        },
    ),
    // READ_TIME
    Node::new(
        "readTime",
        NodeKind::Capture {
            class: CharClass::Digit,
            len: 6,
            slots: &[Slot::Time],
            next: Next::Goto(TIME_REST),
        },
    ),
    // TIME_REST: fractional seconds are not kept
    Node::new(
        "timeRest",
        NodeKind::SkipTo {
            until: NMEA_FIELD_SEPARATOR,
            next: Next::Return,
        },
    ),
    // READ_LAT_LONG
    Node::new(
        "readLatLong",
        NodeKind::Capture {
            class: CharClass::Digit,
            len: 4,
            slots: &[Slot::LatitudeText],
            next: Next::Goto(LAT_POINT),
        },
    ),
    // LAT_POINT
    Node::new(
        "latPoint",
        NodeKind::Literal {
            text: b".",
            slots: &[Slot::LatitudeText],
            next: Next::Goto(LAT_HUNDREDTHS),
        },
    ),
    // LAT_HUNDREDTHS
    Node::new(
        "latHundredths",
        NodeKind::Capture {
            class: CharClass::Digit,
            len: 2,
            slots: &[Slot::LatitudeText, Slot::LatitudeHundredths],
            next: Next::Goto(LAT_REST),
        },
    ),
    // LAT_REST
    Node::new(
        "latRest",
        NodeKind::Run {
            class: CharClass::Digit,
            slots: &[Slot::LatitudeText],
            until: NMEA_FIELD_SEPARATOR,
            next: Next::Goto(LAT_HEMISPHERE),
        },
    ),
    // LAT_HEMISPHERE
    Node::new(
        "latHemisphere",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(b'N'),
                actions: &[Action::SetPending(Flags::NORTH)],
                next: Next::Goto(READ_LONGITUDE),
            },
            Arm {
                class: CharClass::Byte(b'S'),
                actions: &[Action::ClearPending(Flags::NORTH)],
                next: Next::Goto(READ_LONGITUDE),
            },
        ]),
    ),
    // READ_LONGITUDE
    Node::new(
        "readLongitude",
        NodeKind::Literal {
            text: b",",
            slots: &[],
            next: Next::Goto(LON_DEG_MIN),
        },
    ),
    // LON_DEG_MIN
    Node::new(
        "lonDegMin",
        NodeKind::Capture {
            class: CharClass::Digit,
            len: 5,
            slots: &[Slot::LongitudeText],
            next: Next::Goto(LON_POINT),
        },
    ),
    // LON_POINT
    Node::new(
        "lonPoint",
        NodeKind::Literal {
            text: b".",
            slots: &[Slot::LongitudeText],
            next: Next::Goto(LON_HUNDREDTHS),
        },
    ),
    // LON_HUNDREDTHS
    Node::new(
        "lonHundredths",
        NodeKind::Capture {
            class: CharClass::Digit,
            len: 2,
            slots: &[Slot::LongitudeText, Slot::LongitudeHundredths],
            next: Next::Goto(LON_REST),
        },
    ),
    // LON_REST
    Node::new(
        "lonRest",
        NodeKind::Run {
            class: CharClass::Digit,
            slots: &[Slot::LongitudeText],
            until: NMEA_FIELD_SEPARATOR,
            next: Next::Goto(LON_HEMISPHERE),
        },
    ),
    // LON_HEMISPHERE
    Node::new(
        "lonHemisphere",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(b'E'),
                actions: &[Action::SetPending(Flags::EAST)],
                next: Next::Return,
            },
            Arm {
                class: CharClass::Byte(b'W'),
                actions: &[Action::ClearPending(Flags::EAST)],
                next: Next::Return,
            },
        ]),
    ),
    // TAIL: remaining fields are skipped up to the terminator
    Node::new(
        "tail",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(NMEA_CHECKSUM_CHAR),
                actions: &[],
                next: Next::Goto(CHECKSUM),
            },
            Arm {
                class: CharClass::Byte(NMEA_END_CHAR_1),
                actions: &[Action::Commit],
                next: Next::Reset,
            },
            Arm {
                class: CharClass::Byte(NMEA_END_CHAR_2),
                actions: &[Action::Commit],
                next: Next::Reset,
            },
            Arm {
                class: CharClass::Text,
                actions: &[],
                next: Next::Stay,
            },
        ]),
    ),
    // CHECKSUM: read but not validated
    Node::new(
        "checksum",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(NMEA_END_CHAR_1),
                actions: &[Action::Commit],
                next: Next::Reset,
            },
            Arm {
                class: CharClass::Byte(NMEA_END_CHAR_2),
                actions: &[Action::Commit],
                next: Next::Reset,
            },
            Arm {
                class: CharClass::Text,
                actions: &[],
                next: Next::Stay,
            },
        ]),
    ),
    // BANG
    Node::new(
        "bang",
        NodeKind::Literal {
            text: b"!",
            slots: &[],
            next: Next::Goto(COMMAND),
        },
    ),
    // COMMAND
    Node::new(
        "command",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(b'T'),
                actions: &[],
                next: Next::Goto(TEST_SEND),
            },
            Arm {
                class: CharClass::Byte(b'S'),
                actions: &[],
                next: Next::Goto(SET_TEST),
            },
        ]),
    ),
    // TEST_SEND
    Node::new(
        "testSend",
        NodeKind::Literal {
            text: b"EST-SEND:",
            slots: &[],
            next: Next::Goto(TEST_SEND_VAR),
        },
    ),
    // TEST_SEND_VAR: raw byte, any value
    Node::new(
        "testSendVar",
        NodeKind::Capture {
            class: CharClass::Any,
            len: 1,
            slots: &[Slot::Selector],
            next: Next::Goto(TEST_SEND_SEP),
        },
    ),
    // TEST_SEND_SEP
    Node::new(
        "testSendSep",
        NodeKind::Literal {
            text: b":",
            slots: &[],
            next: Next::Goto(TEST_SEND_INDEX),
        },
    ),
    // TEST_SEND_INDEX: raw byte, any value
    Node::new(
        "testSendIndex",
        NodeKind::Capture {
            class: CharClass::Any,
            len: 1,
            slots: &[Slot::Index],
            next: Next::Goto(TEST_SEND_END),
        },
    ),
    // TEST_SEND_END
    Node::new(
        "testSendEnd",
        NodeKind::Literal {
            text: b"!!",
            slots: &[],
            next: Next::Goto(TEST_SEND_DONE),
        },
    ),
    // TEST_SEND_DONE
    Node::with_entry("testSendDone", &[Action::Request], NodeKind::Pass(Next::Reset)),
    // SET_TEST
    Node::new(
        "setTest",
        NodeKind::Literal {
            text: b"ET-TEST-9:",
            slots: &[],
            next: Next::Goto(SET_TEST_VALUE),
        },
    ),
    // SET_TEST_VALUE
    Node::new(
        "setTestValue",
        NodeKind::Choice(&[
            Arm {
                class: CharClass::Byte(b'0'),
                actions: &[Action::ClearFlag(Flags::TEST9)],
                next: Next::Reset,
            },
            Arm {
                class: CharClass::Byte(b'1'),
                actions: &[Action::SetFlag(Flags::TEST9)],
                next: Next::Reset,
            },
        ]),
    ),
];

/// The GPS sentence and harness request table
pub static GPS: Table = Table {
    name: "gps",
    nodes: &NODES,
    initial: IDLE,
};
