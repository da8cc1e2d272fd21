//! Declarative description of a state machine.
//!
//! A [`Table`] is plain data: a list of [`Node`]s, each with a kind that says how it
//! consumes input and where it goes next. The [`Machine`](crate::Machine) interprets
//! any table; nothing about GPS sentences lives in the engine. The built-in table is
//! [`GPS`].

use crate::{
    constants::{
        CALL_DEPTH, MAX_PASS_CHAIN, NMEA_END_CHAR_1, NMEA_END_CHAR_2, NMEA_SYNC_CHAR,
        REQUEST_SYNC_CHAR,
    },
    error::TableError,
    flags::Flags,
    store::SentenceKind,
};

mod gps;

pub use gps::GPS;

/// Index of a node within its table
pub type NodeId = u8;

/// Set of input bytes a node or arm accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Byte(u8),
    /// Inclusive range
    Range(u8, u8),
    Digit,
    /// Sentence body: anything except sentence starts and line ends
    Text,
    Any,
}

impl CharClass {
    pub const fn accepts(self, byte: u8) -> bool {
        match self {
            CharClass::Byte(b) => byte == b,
            CharClass::Range(lo, hi) => lo <= byte && byte <= hi,
            CharClass::Digit => byte.is_ascii_digit(),
            CharClass::Text => !matches!(
                byte,
                NMEA_SYNC_CHAR | REQUEST_SYNC_CHAR | NMEA_END_CHAR_1 | NMEA_END_CHAR_2
            ),
            CharClass::Any => true,
        }
    }
}

/// Pending buffer an accepted byte is written into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Time,
    LatitudeText,
    LatitudeHundredths,
    LongitudeText,
    LongitudeHundredths,
    Quality,
    Selector,
    Index,
}

/// Side effect performed when an arm is taken or a node is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start staging a new fix, dropping anything already pending
    Begin(SentenceKind),
    /// Set bits on the pending fix; copied into the live flags on commit
    SetPending(Flags),
    ClearPending(Flags),
    /// Change live flags immediately
    SetFlag(Flags),
    ClearFlag(Flags),
    /// Copy the pending fix into the field store
    Commit,
    /// Publish the pending selector/index and raise `TEST_PLEASE_SEND`
    Request,
}

/// Where to go after a node or arm completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Goto(NodeId),
    /// Remain in the current node without resetting its counter
    Stay,
    /// Enter `sub`; its `Return` resumes at `ret`
    Call { sub: NodeId, ret: NodeId },
    Return,
    /// Drop all pending state and go back to the initial node
    Reset,
}

/// One alternative of a [`NodeKind::Choice`]
#[derive(Debug, Clone, Copy)]
pub struct Arm {
    pub class: CharClass,
    pub actions: &'static [Action],
    pub next: Next,
}

#[derive(Debug, Clone, Copy)]
pub enum NodeKind {
    /// Take the first arm whose class accepts the input
    Choice(&'static [Arm]),
    /// Match `text` exactly, one byte per step
    Literal {
        text: &'static [u8],
        slots: &'static [Slot],
        next: Next,
    },
    /// Accept exactly `len` bytes of `class`
    Capture {
        class: CharClass,
        len: u8,
        slots: &'static [Slot],
        next: Next,
    },
    /// Accept any number of `class` bytes until `until` is read
    Run {
        class: CharClass,
        slots: &'static [Slot],
        until: u8,
        next: Next,
    },
    /// Ignore sentence text until `until` is read
    SkipTo { until: u8, next: Next },
    /// Consume nothing: run entry actions and continue immediately
    Pass(Next),
}

#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub name: &'static str,
    pub on_entry: &'static [Action],
    pub kind: NodeKind,
}

impl Node {
    pub const fn new(name: &'static str, kind: NodeKind) -> Self {
        Self {
            name,
            on_entry: &[],
            kind,
        }
    }

    pub const fn with_entry(name: &'static str, on_entry: &'static [Action], kind: NodeKind) -> Self {
        Self {
            name,
            on_entry,
            kind,
        }
    }
}

/// A complete state machine description
#[derive(Debug, Clone, Copy)]
pub struct Table {
    pub name: &'static str,
    pub nodes: &'static [Node],
    pub initial: NodeId,
}

impl Table {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(usize::from(id))
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .and_then(|i| NodeId::try_from(i).ok())
    }

    /// Check that every reference resolves and the engine can never spin.
    ///
    /// The initial node must be a `Choice`: the engine treats a byte it rejects
    /// as noise between sentences. Pass-through chains and call nesting must fit
    /// the engine's fixed limits, and literals must fit its byte counter.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.nodes.is_empty() || self.nodes.len() > usize::from(NodeId::MAX) + 1 {
            return Err(TableError::BadSize {
                table: self.name,
                nodes: self.nodes.len(),
            });
        }
        let initial = self.node(self.initial).ok_or(TableError::UnknownNode {
            node: self.name,
            target: self.initial,
        })?;
        if !matches!(initial.kind, NodeKind::Choice(_)) {
            return Err(TableError::InitialNotChoice { node: initial.name });
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if self.nodes[..i].iter().any(|other| other.name == node.name) {
                return Err(TableError::DuplicateName { node: node.name });
            }
            match node.kind {
                NodeKind::Choice(arms) => {
                    if arms.is_empty() {
                        return Err(TableError::EmptyNode { node: node.name });
                    }
                    for arm in arms {
                        self.check_next(node, arm.next)?;
                    }
                },
                NodeKind::Literal { text, next, .. } => {
                    if text.is_empty() {
                        return Err(TableError::EmptyNode { node: node.name });
                    }
                    if text.len() > usize::from(u8::MAX) {
                        return Err(TableError::LiteralTooLong { node: node.name });
                    }
                    self.check_next(node, next)?;
                },
                NodeKind::Capture { len, next, .. } => {
                    if len == 0 {
                        return Err(TableError::EmptyNode { node: node.name });
                    }
                    self.check_next(node, next)?;
                },
                NodeKind::Run { next, .. } | NodeKind::SkipTo { next, .. } => {
                    self.check_next(node, next)?;
                },
                NodeKind::Pass(next) => {
                    if next == Next::Stay {
                        return Err(TableError::PassLoop { node: node.name });
                    }
                    self.check_next(node, next)?;
                },
            }
        }
        self.check_pass_chains()?;
        self.check_calls(self.initial, 0)
    }

    fn check_next(&self, node: &Node, next: Next) -> Result<(), TableError> {
        let targets = match next {
            Next::Goto(id) => [Some(id), None],
            Next::Call { sub, ret } => [Some(sub), Some(ret)],
            Next::Stay | Next::Return | Next::Reset => [None, None],
        };
        for target in targets.into_iter().flatten() {
            if self.node(target).is_none() {
                return Err(TableError::UnknownNode {
                    node: node.name,
                    target,
                });
            }
        }
        Ok(())
    }

    /// A `Pass` node that reaches itself through other `Pass` nodes
    /// would never consume input. A chain the engine cannot follow within
    /// one byte would drop every sentence that enters it.
    fn check_pass_chains(&self) -> Result<(), TableError> {
        for node in self.nodes {
            let mut current = node;
            let mut passes = 0;
            while let NodeKind::Pass(next) = current.kind {
                passes += 1;
                let id = match next {
                    Next::Goto(id) | Next::Call { sub: id, .. } => id,
                    _ => break,
                };
                let Some(target) = self.node(id) else {
                    break;
                };
                if core::ptr::eq(target, node) {
                    return Err(TableError::PassLoop { node: node.name });
                }
                // Entering the node after the last pass takes one more round
                if passes >= MAX_PASS_CHAIN {
                    return Err(TableError::PassChainTooLong { node: node.name });
                }
                current = target;
            }
        }
        Ok(())
    }

    /// Walk the body entered at `start` with `level` calls already on the
    /// stack, descending into every subroutine it calls.
    fn check_calls(&self, start: NodeId, level: usize) -> Result<(), TableError> {
        let mut seen = [false; 256];
        let mut todo: [NodeId; 256] = [start; 256];
        let mut len = 1;
        seen[usize::from(start)] = true;

        while len > 0 {
            len -= 1;
            let Some(node) = self.node(todo[len]) else {
                continue;
            };
            for next in node.kind.nexts() {
                let target = match next {
                    Next::Goto(id) => id,
                    Next::Call { sub, ret } => {
                        if level == CALL_DEPTH {
                            return Err(TableError::CallTooDeep { node: node.name });
                        }
                        self.check_calls(sub, level + 1)?;
                        ret
                    },
                    Next::Stay | Next::Return | Next::Reset => continue,
                };
                if !seen[usize::from(target)] {
                    seen[usize::from(target)] = true;
                    todo[len] = target;
                    len += 1;
                }
            }
        }
        Ok(())
    }
}

impl NodeKind {
    /// Every transition out of a node of this kind
    fn nexts(self) -> impl Iterator<Item = Next> {
        let (arms, single) = match self {
            NodeKind::Choice(arms) => (arms, None),
            NodeKind::Literal { next, .. }
            | NodeKind::Capture { next, .. }
            | NodeKind::Run { next, .. }
            | NodeKind::SkipTo { next, .. }
            | NodeKind::Pass(next) => (&[][..], Some(next)),
        };
        arms.iter().map(|arm| arm.next).chain(single)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static LOOPING: [Node; 3] = [
        Node::new(
            "idle",
            NodeKind::Choice(&[Arm {
                class: CharClass::Byte(b'a'),
                actions: &[],
                next: Next::Goto(1),
            }]),
        ),
        Node::new("first", NodeKind::Pass(Next::Goto(2))),
        Node::new("second", NodeKind::Pass(Next::Goto(1))),
    ];

    static DANGLING: [Node; 1] = [Node::new(
        "idle",
        NodeKind::Choice(&[Arm {
            class: CharClass::Any,
            actions: &[],
            next: Next::Call { sub: 0, ret: 7 },
        }]),
    )];

    static NOT_CHOICE: [Node; 1] = [Node::new(
        "idle",
        NodeKind::SkipTo {
            until: b',',
            next: Next::Reset,
        },
    )];

    #[test]
    fn gps_table_is_valid() {
        assert_eq!(GPS.validate(), Ok(()));
    }

    #[test]
    fn pass_loop_is_rejected() {
        let table = Table {
            name: "looping",
            nodes: &LOOPING,
            initial: 0,
        };
        assert_eq!(
            table.validate(),
            Err(TableError::PassLoop { node: "first" })
        );
    }

    static LONG_TEXT: [u8; 300] = [b'a'; 300];

    static LONG_LITERAL: [Node; 2] = [
        Node::new(
            "idle",
            NodeKind::Choice(&[Arm {
                class: CharClass::Byte(b'$'),
                actions: &[],
                next: Next::Goto(1),
            }]),
        ),
        Node::new(
            "word",
            NodeKind::Literal {
                text: &LONG_TEXT,
                slots: &[],
                next: Next::Reset,
            },
        ),
    ];

    const fn pass(name: &'static str, to: NodeId) -> Node {
        Node::new(name, NodeKind::Pass(Next::Goto(to)))
    }

    const START: Node = Node::new(
        "idle",
        NodeKind::Choice(&[Arm {
            class: CharClass::Byte(b'$'),
            actions: &[],
            next: Next::Goto(1),
        }]),
    );

    const BODY: Node = Node::new(
        "body",
        NodeKind::SkipTo {
            until: b',',
            next: Next::Reset,
        },
    );

    static NINE_PASSES: [Node; 11] = [
        START,
        pass("p1", 2),
        pass("p2", 3),
        pass("p3", 4),
        pass("p4", 5),
        pass("p5", 6),
        pass("p6", 7),
        pass("p7", 8),
        pass("p8", 9),
        pass("p9", 10),
        BODY,
    ];

    static SEVEN_PASSES: [Node; 9] = [
        START,
        pass("p1", 2),
        pass("p2", 3),
        pass("p3", 4),
        pass("p4", 5),
        pass("p5", 6),
        pass("p6", 7),
        pass("p7", 8),
        BODY,
    ];

    static NESTED_CALLS: [Node; 4] = [
        Node::new(
            "idle",
            NodeKind::Choice(&[Arm {
                class: CharClass::Byte(b'$'),
                actions: &[],
                next: Next::Call { sub: 1, ret: 0 },
            }]),
        ),
        Node::new(
            "one",
            NodeKind::Literal {
                text: b"a",
                slots: &[],
                next: Next::Call { sub: 2, ret: 0 },
            },
        ),
        Node::new(
            "two",
            NodeKind::Literal {
                text: b"b",
                slots: &[],
                next: Next::Call { sub: 3, ret: 0 },
            },
        ),
        Node::new(
            "three",
            NodeKind::SkipTo {
                until: b',',
                next: Next::Return,
            },
        ),
    ];

    #[test]
    fn long_literal_is_rejected() {
        let table = Table {
            name: "long_literal",
            nodes: &LONG_LITERAL,
            initial: 0,
        };
        assert_eq!(
            table.validate(),
            Err(TableError::LiteralTooLong { node: "word" })
        );
    }

    #[test]
    fn long_pass_chain_is_rejected() {
        let table = Table {
            name: "nine_passes",
            nodes: &NINE_PASSES,
            initial: 0,
        };
        assert_eq!(
            table.validate(),
            Err(TableError::PassChainTooLong { node: "p1" })
        );
    }

    static SEVEN_PASSES_TABLE: Table = Table {
        name: "seven_passes",
        nodes: &SEVEN_PASSES,
        initial: 0,
    };

    #[test]
    fn pass_chain_within_limit_is_followed() {
        assert_eq!(SEVEN_PASSES_TABLE.validate(), Ok(()));
        let mut receiver = crate::Receiver::builder()
            .table(&SEVEN_PASSES_TABLE)
            .build()
            .unwrap();
        receiver.feed(b'$');
        assert_eq!(receiver.machine().state_name(), "body");
    }

    #[test]
    fn deep_call_nesting_is_rejected() {
        let table = Table {
            name: "nested_calls",
            nodes: &NESTED_CALLS,
            initial: 0,
        };
        assert_eq!(
            table.validate(),
            Err(TableError::CallTooDeep { node: "two" })
        );
    }

    #[test]
    fn dangling_return_target_is_rejected() {
        let table = Table {
            name: "dangling",
            nodes: &DANGLING,
            initial: 0,
        };
        assert_eq!(
            table.validate(),
            Err(TableError::UnknownNode {
                node: "idle",
                target: 7
            })
        );
    }

    #[test]
    fn initial_must_be_choice() {
        let table = Table {
            name: "not_choice",
            nodes: &NOT_CHOICE,
            initial: 0,
        };
        assert_eq!(
            table.validate(),
            Err(TableError::InitialNotChoice { node: "idle" })
        );
    }

    #[test]
    fn text_class_excludes_delimiters() {
        for b in [b'$', b'!', b'\r', b'\n'] {
            assert!(!CharClass::Text.accepts(b));
        }
        assert!(CharClass::Text.accepts(b'*'));
        assert!(CharClass::Text.accepts(b','));
        assert!(CharClass::Range(b'0', b'8').accepts(b'8'));
        assert!(!CharClass::Range(b'0', b'8').accepts(b'9'));
    }
}
