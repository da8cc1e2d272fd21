//! Introspection responder: answers a `(testSendVar, testSendIndex)` request with
//! one frame read from the flags or the field store.
//!
//! A value goes out as `>`, `>`, value, `<`. Errors are sent bare: `E01` for an
//! unknown flag index, `E02` plus the selector byte for an unknown selector. A
//! receiver can only tell the two shapes apart by the first byte.

use crate::{
    constants::{ERROR_MARKER, FRAME_END, FRAME_START},
    flags::Flags,
    receiver::Registers,
    store::{Field, FieldStore},
};

/// Values the harness can ask for, keyed by their `testSendVar` id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HarnessValue {
    /// Echo back the index (id 1)
    TestSendIndex,
    /// Flag group (id 2). Indexes are
    /// * 0: New Position (`'1'` or `'0'`)
    /// * 1: North (`'N'`) or South (`'S'`)
    /// * 2: East (`'E'`) or West (`'W'`)
    /// * 3: Test flag 9 (`'1'` or `'0'`)
    GpsFlags,
    LatitudeDegMin,
    LatitudeHundredths,
    LongitudeDegMin,
    LongitudeHundredths,
    Time,
    Quality,
}

impl HarnessValue {
    pub const ALL: [HarnessValue; 8] = [
        HarnessValue::TestSendIndex,
        HarnessValue::GpsFlags,
        HarnessValue::LatitudeDegMin,
        HarnessValue::LatitudeHundredths,
        HarnessValue::LongitudeDegMin,
        HarnessValue::LongitudeHundredths,
        HarnessValue::Time,
        HarnessValue::Quality,
    ];

    pub const fn id(self) -> u8 {
        match self {
            HarnessValue::TestSendIndex => 1,
            HarnessValue::GpsFlags => 2,
            HarnessValue::LatitudeDegMin => 3,
            HarnessValue::LatitudeHundredths => 4,
            HarnessValue::LongitudeDegMin => 5,
            HarnessValue::LongitudeHundredths => 6,
            HarnessValue::Time => 7,
            HarnessValue::Quality => 8,
        }
    }

    pub const fn from_id(id: u8) -> Option<Self> {
        Some(match id {
            1 => HarnessValue::TestSendIndex,
            2 => HarnessValue::GpsFlags,
            3 => HarnessValue::LatitudeDegMin,
            4 => HarnessValue::LatitudeHundredths,
            5 => HarnessValue::LongitudeDegMin,
            6 => HarnessValue::LongitudeHundredths,
            7 => HarnessValue::Time,
            8 => HarnessValue::Quality,
            _ => return None,
        })
    }

    /// Number of readable offsets
    pub const fn length(self) -> usize {
        match self {
            HarnessValue::TestSendIndex => 256,
            HarnessValue::GpsFlags => 4,
            HarnessValue::LatitudeDegMin => Field::LatitudeDegMin.capacity(),
            HarnessValue::LatitudeHundredths => Field::LatitudeHundredths.capacity(),
            HarnessValue::LongitudeDegMin => Field::LongitudeDegMin.capacity(),
            HarnessValue::LongitudeHundredths => Field::LongitudeHundredths.capacity(),
            HarnessValue::Time => Field::Time.capacity(),
            HarnessValue::Quality => Field::Quality.capacity(),
        }
    }

    pub const fn field(self) -> Option<Field> {
        match self {
            HarnessValue::TestSendIndex | HarnessValue::GpsFlags => None,
            HarnessValue::LatitudeDegMin => Some(Field::LatitudeDegMin),
            HarnessValue::LatitudeHundredths => Some(Field::LatitudeHundredths),
            HarnessValue::LongitudeDegMin => Some(Field::LongitudeDegMin),
            HarnessValue::LongitudeHundredths => Some(Field::LongitudeHundredths),
            HarnessValue::Time => Some(Field::Time),
            HarnessValue::Quality => Some(Field::Quality),
        }
    }
}

/// The `testSendVar` / `testSendIndex` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selector {
    pub var: u8,
    pub index: u8,
}

impl Selector {
    pub const fn new(var: u8, index: u8) -> Self {
        Self { var, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    Value(u8),
    /// `E01`
    UnknownFlag,
    /// `E02` and the selector
    UnknownSelector(u8),
}

/// Bytes of one response, at most four
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    bytes: [u8; 4],
    len: u8,
}

impl Frame {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }

    pub fn response(&self) -> Response {
        match self.as_bytes() {
            [FRAME_START, FRAME_START, value, FRAME_END] => Response::Value(*value),
            [ERROR_MARKER, b'0', b'2', selector] => Response::UnknownSelector(*selector),
            _ => Response::UnknownFlag,
        }
    }
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Frame").field(&self.as_bytes()).finish()
    }
}

impl From<Response> for Frame {
    fn from(response: Response) -> Self {
        match response {
            Response::Value(v) => Frame {
                bytes: [FRAME_START, FRAME_START, v, FRAME_END],
                len: 4,
            },
            Response::UnknownFlag => Frame {
                bytes: [ERROR_MARKER, b'0', b'1', 0],
                len: 3,
            },
            Response::UnknownSelector(sel) => Frame {
                bytes: [ERROR_MARKER, b'0', b'2', sel],
                len: 4,
            },
        }
    }
}

/// A frame for the driver to send, if the harness asked for one.
///
/// The flag is left set: polling again before the driver acknowledges
/// produces the same frame.
pub fn poll(regs: &Registers) -> Option<Frame> {
    if regs.flags.contains(Flags::TEST_PLEASE_SEND) {
        Some(respond(regs.selector, regs.flags, &regs.store).into())
    } else {
        None
    }
}

/// Resolve a selector against the current flags and field store
pub fn respond(selector: Selector, flags: Flags, store: &FieldStore) -> Response {
    let Some(value) = HarnessValue::from_id(selector.var) else {
        return Response::UnknownSelector(selector.var);
    };
    match value {
        HarnessValue::TestSendIndex => Response::Value(selector.index),
        HarnessValue::GpsFlags => match selector.index {
            0 => Response::Value(flags.render(Flags::NEW_POSITION, b'1', b'0')),
            1 => Response::Value(flags.render(Flags::NORTH, b'N', b'S')),
            2 => Response::Value(flags.render(Flags::EAST, b'E', b'W')),
            3 => Response::Value(flags.render(Flags::TEST9, b'1', b'0')),
            _ => Response::UnknownFlag,
        },
        HarnessValue::Quality => Response::Value(store.read(Field::Quality, 0)),
        _ => match value.field() {
            Some(field) => Response::Value(store.read(field, selector.index)),
            None => Response::UnknownSelector(selector.var),
        },
    }
}
