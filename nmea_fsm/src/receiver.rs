use crate::{
    error::{DecodeError, TableError},
    flags::Flags,
    machine::{FixPolicy, Machine},
    model::{Table, GPS},
    responder::{self, Frame, Selector},
    store::FieldStore,
    types::Fix,
};

/// State shared between the parser, the responder and the driver loop:
/// the input register, the flags, the field store and the selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registers {
    /// Written by the driver before each step
    pub input: u8,
    pub flags: Flags,
    pub store: FieldStore,
    /// Last `testSendVar` / `testSendIndex` pair
    pub selector: Selector,
}

/// Parser and responder bundled with the registers they work on.
///
/// ```
/// use nmea_fsm::{Flags, Receiver, Response};
///
/// let mut receiver = Receiver::new();
/// receiver.consume(b"$GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,*47\r\n");
/// assert!(receiver.flags().contains(Flags::NEW_POSITION | Flags::NORTH | Flags::EAST));
///
/// receiver.consume(b"!!TEST-SEND:\x03:\x00!!");
/// let frame = receiver.poll().unwrap();
/// assert_eq!(frame.as_bytes(), b">>4<");
/// assert_eq!(frame.response(), Response::Value(b'4'));
/// receiver.acknowledge_request();
/// assert!(receiver.poll().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Receiver {
    machine: Machine,
    regs: Registers,
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Receiver {
    /// Receiver for the built-in GPS table, overwriting on every fix
    pub fn new() -> Self {
        Self {
            machine: Machine::new(&GPS, FixPolicy::default()),
            regs: Registers::default(),
        }
    }

    pub fn builder() -> ReceiverBuilder {
        ReceiverBuilder::default()
    }

    pub fn set_input(&mut self, byte: u8) {
        self.regs.input = byte;
    }

    /// Advance the state machine by the byte in the input register
    pub fn step(&mut self) {
        self.machine.step(&mut self.regs);
    }

    /// Load `byte` into the input register and step
    pub fn feed(&mut self, byte: u8) {
        self.set_input(byte);
        self.step();
    }

    pub fn consume(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.feed(*byte);
        }
    }

    /// Frame to send for a pending harness request
    pub fn poll(&self) -> Option<Frame> {
        responder::poll(&self.regs)
    }

    /// Called by the driver once the frame from [`poll`](Self::poll) has gone out
    pub fn acknowledge_request(&mut self) {
        self.regs.flags.remove(Flags::TEST_PLEASE_SEND);
    }

    /// Mark the current fix as read. Needed before the next one is accepted
    /// under [`FixPolicy::HoldUntilRead`].
    pub fn acknowledge_fix(&mut self) {
        self.regs.flags.remove(Flags::NEW_POSITION | Flags::NEW_QUALITY);
    }

    /// Point the responder at a value directly, without a request sentence
    pub fn request(&mut self, selector: Selector) {
        self.regs.selector = selector;
        self.regs.flags.insert(Flags::TEST_PLEASE_SEND);
    }

    pub fn flags(&self) -> Flags {
        self.regs.flags
    }

    pub fn store(&self) -> &FieldStore {
        &self.regs.store
    }

    pub fn selector(&self) -> Selector {
        self.regs.selector
    }

    pub fn registers(&self) -> &Registers {
        &self.regs
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Decode the stored fix
    pub fn fix(&self) -> Result<Fix, DecodeError> {
        Fix::decode(&self.regs.store, self.regs.flags)
    }
}

/// Configures a [`Receiver`]
#[derive(Debug, Clone, Copy)]
pub struct ReceiverBuilder {
    table: &'static Table,
    policy: FixPolicy,
}

impl Default for ReceiverBuilder {
    fn default() -> Self {
        Self {
            table: &GPS,
            policy: FixPolicy::default(),
        }
    }
}

impl ReceiverBuilder {
    pub fn fix_policy(mut self, policy: FixPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run a different transition table. The slots and actions it uses
    /// still feed the same field store and flags.
    pub fn table(mut self, table: &'static Table) -> Self {
        self.table = table;
        self
    }

    pub fn build(self) -> Result<Receiver, TableError> {
        self.table.validate()?;
        Ok(Receiver {
            machine: Machine::new(self.table, self.policy),
            regs: Registers::default(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{Arm, CharClass, Next, Node, NodeKind};

    static BROKEN: [Node; 1] = [Node::new(
        "idle",
        NodeKind::Choice(&[Arm {
            class: CharClass::Any,
            actions: &[],
            next: Next::Goto(3),
        }]),
    )];

    static BROKEN_TABLE: Table = Table {
        name: "broken",
        nodes: &BROKEN,
        initial: 0,
    };

    #[test]
    fn builder_rejects_invalid_table() {
        let err = Receiver::builder().table(&BROKEN_TABLE).build().unwrap_err();
        assert_eq!(
            err,
            TableError::UnknownNode {
                node: "idle",
                target: 3
            }
        );
    }

    #[test]
    fn builder_sets_policy() {
        let receiver = Receiver::builder()
            .fix_policy(FixPolicy::HoldUntilRead)
            .build()
            .unwrap();
        assert_eq!(receiver.machine().policy(), FixPolicy::HoldUntilRead);
        assert!(receiver.machine().is_idle());
    }

    #[test]
    fn direct_request_is_served() {
        let mut receiver = Receiver::new();
        receiver.request(Selector::new(1, b'z'));
        assert_eq!(receiver.poll().map(|f| f.response()), Some(crate::Response::Value(b'z')));
    }
}
