pub const NMEA_SYNC_CHAR: u8 = 0x24; // '$'
pub const NMEA_END_CHAR_1: u8 = 0x0d; // '\r' (<CR>)
pub const NMEA_END_CHAR_2: u8 = 0x0a; // '\n' (<LF>)
pub const NMEA_CHECKSUM_CHAR: u8 = 0x2a; // '*'
pub const NMEA_FIELD_SEPARATOR: u8 = 0x2c; // ','

/// Starts a harness request sentence (`!!TEST-SEND:` or `!!SET-TEST-9:`)
pub const REQUEST_SYNC_CHAR: u8 = 0x21; // '!'

pub const FRAME_START: u8 = 0x3e; // '>'
pub const FRAME_END: u8 = 0x3c; // '<'
pub const ERROR_MARKER: u8 = 0x45; // 'E'

/// Returned for any buffer position that holds no received character,
/// including indexes past the end of a field.
pub const SENTINEL: u8 = 0x3f; // '?'

/// `DDMM.mmm`
pub const LATITUDE_TEXT_LEN: usize = 8;
/// `DDDMM.mmm`
pub const LONGITUDE_TEXT_LEN: usize = 9;
pub const HUNDREDTHS_LEN: usize = 2;
/// `hhmmss`
pub const TIME_LEN: usize = 6;

pub(crate) const LATITUDE_DEGREE_DIGITS: usize = 2;
pub(crate) const LONGITUDE_DEGREE_DIGITS: usize = 3;

/// Nesting allowed for subroutine calls in a transition table.
pub(crate) const CALL_DEPTH: usize = 2;
/// Longest chain of pass-through nodes the engine follows for one input byte.
pub(crate) const MAX_PASS_CHAIN: usize = 8;

/// Sent ahead of a selector/index pair. The `XXXX` flushes any partial sentence on the device.
#[cfg(feature = "std")]
pub const TEST_SEND_PREFIX: &[u8] = b"XXXX!!TEST-SEND:";
#[cfg(feature = "std")]
pub const TEST_SEND_SUFFIX: &[u8] = b"!!";
#[cfg(feature = "std")]
pub const SET_TEST_FLAG_PREFIX: &[u8] = b"XXXX!!SET-TEST-9:";
