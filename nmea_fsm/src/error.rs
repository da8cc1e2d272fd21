use core::fmt;

use crate::{model::NodeId, responder::HarnessValue, store::Field};

/// A transition table that the engine refuses to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableError {
    BadSize { table: &'static str, nodes: usize },
    UnknownNode { node: &'static str, target: NodeId },
    InitialNotChoice { node: &'static str },
    DuplicateName { node: &'static str },
    EmptyNode { node: &'static str },
    PassLoop { node: &'static str },
    /// More pass-through nodes in a row than the engine follows for one byte
    PassChainTooLong { node: &'static str },
    /// Subroutine calls nest deeper than the engine's return stack
    CallTooDeep { node: &'static str },
    /// Literal text longer than 255 bytes
    LiteralTooLong { node: &'static str },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::BadSize { table, nodes } => {
                write!(f, "Table {} has {} nodes, expect 1..=256", table, nodes)
            },
            TableError::UnknownNode { node, target } => {
                write!(f, "Node {} refers to missing node {}", node, target)
            },
            TableError::InitialNotChoice { node } => {
                write!(f, "Initial node {} must be a choice", node)
            },
            TableError::DuplicateName { node } => write!(f, "Node name {} is used twice", node),
            TableError::EmptyNode { node } => write!(f, "Node {} can never accept input", node),
            TableError::PassLoop { node } => {
                write!(f, "Node {} passes through to itself without consuming input", node)
            },
            TableError::PassChainTooLong { node } => {
                write!(f, "Node {} starts too long a chain of pass-through nodes", node)
            },
            TableError::CallTooDeep { node } => {
                write!(f, "Node {} calls a subroutine past the maximum nesting", node)
            },
            TableError::LiteralTooLong { node } => {
                write!(f, "Literal text of node {} is longer than 255 bytes", node)
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TableError {}

/// Field store content that does not form a usable fix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Nothing has been committed yet
    NoFix,
    InvalidCoordinate { field: Field },
    InvalidTime,
    InvalidQuality(u8),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NoFix => f.write_str("no fix received yet"),
            DecodeError::InvalidCoordinate { field } => {
                write!(f, "invalid coordinate text in {:?}", field)
            },
            DecodeError::InvalidTime => f.write_str("invalid time"),
            DecodeError::InvalidQuality(q) => write!(f, "invalid fix quality 0x{:02x}", q),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Failure while talking to a device through the harness protocol
#[derive(Debug)]
pub enum HarnessError<E> {
    /// The device did not echo back the byte that was sent
    NoEcho { sent: u8, received: u8 },
    /// Offset past the end of the value, checked before anything is sent
    IndexOutOfRange { value: HarnessValue, offset: usize },
    /// Device answered `E01`
    UnknownFlag,
    /// Device answered `E02` followed by the selector it did not recognise
    UnknownSelector(u8),
    /// Reply was neither a `>>v<` frame nor an `E0x` error
    UnexpectedResponse(u8),
    Port(E),
}

impl<E> fmt::Display for HarnessError<E>
where
    E: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::NoEcho { sent, received } => write!(
                f,
                "Device did not echo input, sent 0x{:02x}, got 0x{:02x}",
                sent, received
            ),
            HarnessError::IndexOutOfRange { value, offset } => write!(
                f,
                "Offset {} is outside {:?} (length {})",
                offset,
                value,
                value.length()
            ),
            HarnessError::UnknownFlag => f.write_str("Device reports unrecognised flag"),
            HarnessError::UnknownSelector(sel) => {
                write!(f, "Device reports unrecognised value selector {}", sel)
            },
            HarnessError::UnexpectedResponse(b) => {
                write!(f, "Unexpected response from device, starting 0x{:02x}", b)
            },
            HarnessError::Port(e) => write!(f, "Serial port error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E> std::error::Error for HarnessError<E> where E: fmt::Debug + fmt::Display {}

/// The simulated device has no output waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoData;

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no data waiting from simulated device")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for NoData {}
