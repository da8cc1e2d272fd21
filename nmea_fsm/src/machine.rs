use log::{debug, trace, warn};

use crate::{
    constants::{CALL_DEPTH, MAX_PASS_CHAIN},
    flags::Flags,
    model::{Action, CharClass, Next, NodeId, NodeKind, Slot, Table},
    receiver::Registers,
    responder::Selector,
    store::{PendingFix, SentenceKind},
};

/// What to do with a sentence that completes while the previous fix is unread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FixPolicy {
    /// Replace the stored fix every time
    #[default]
    Overwrite,
    /// Drop new sentences until `NEW_POSITION` is cleared
    HoldUntilRead,
}

/// Stepping engine for a [`Table`].
///
/// Holds only the position in the table and the partially read sentence.
/// Everything another component may look at lives in [`Registers`].
#[derive(Debug, Clone)]
pub struct Machine {
    table: &'static Table,
    policy: FixPolicy,
    state: NodeId,
    counter: u8,
    stack: [NodeId; CALL_DEPTH],
    depth: usize,
    pending: PendingFix,
    request: Selector,
}

impl Machine {
    /// `table` must have passed [`Table::validate`]
    pub(crate) fn new(table: &'static Table, policy: FixPolicy) -> Self {
        Self {
            table,
            policy,
            state: table.initial,
            counter: 0,
            stack: [table.initial; CALL_DEPTH],
            depth: 0,
            pending: PendingFix::default(),
            request: Selector::default(),
        }
    }

    pub fn state(&self) -> NodeId {
        self.state
    }

    pub fn state_name(&self) -> &'static str {
        self.table.node(self.state).map_or("?", |node| node.name)
    }

    pub fn is_idle(&self) -> bool {
        self.state == self.table.initial
    }

    pub fn policy(&self) -> FixPolicy {
        self.policy
    }

    /// Consume `regs.input`.
    ///
    /// A byte the current node cannot accept throws away the sentence in
    /// progress. The byte is then offered to the initial node, so a sentence
    /// start cuts short a broken sentence without being lost.
    pub fn step(&mut self, regs: &mut Registers) {
        let input = regs.input;
        if self.advance(input, regs) || self.is_idle() {
            return;
        }
        debug!(
            "Discarding {} sentence at {} on byte 0x{:02x}",
            self.table.name,
            self.state_name(),
            input
        );
        self.reset();
        self.advance(input, regs);
    }

    /// Returns false if the current node rejects `input`
    fn advance(&mut self, input: u8, regs: &mut Registers) -> bool {
        let table = self.table;
        let Some(node) = table.node(self.state) else {
            warn!("State {} is outside table {}", self.state, self.table.name);
            self.reset();
            return false;
        };

        let next = match node.kind {
            NodeKind::Choice(arms) => {
                let Some(arm) = arms.iter().find(|arm| arm.class.accepts(input)) else {
                    return false;
                };
                for action in arm.actions {
                    self.perform(*action, regs);
                }
                arm.next
            },
            NodeKind::Literal { text, slots, next } => {
                if text.get(usize::from(self.counter)) != Some(&input) {
                    return false;
                }
                self.store(slots, input);
                self.counter += 1;
                if usize::from(self.counter) < text.len() {
                    Next::Stay
                } else {
                    next
                }
            },
            NodeKind::Capture {
                class,
                len,
                slots,
                next,
            } => {
                if !class.accepts(input) {
                    return false;
                }
                self.store(slots, input);
                self.counter += 1;
                if self.counter < len {
                    Next::Stay
                } else {
                    next
                }
            },
            NodeKind::Run {
                class,
                slots,
                until,
                next,
            } => {
                if input == until {
                    next
                } else if class.accepts(input) {
                    self.store(slots, input);
                    Next::Stay
                } else {
                    return false;
                }
            },
            NodeKind::SkipTo { until, next } => {
                if input == until {
                    next
                } else if CharClass::Text.accepts(input) {
                    Next::Stay
                } else {
                    return false;
                }
            },
            // Never current: entering a pass node moves straight through it
            NodeKind::Pass(next) => next,
        };
        self.follow(next, regs);
        true
    }

    fn follow(&mut self, mut next: Next, regs: &mut Registers) {
        let table = self.table;
        for _ in 0..MAX_PASS_CHAIN {
            let target = match next {
                Next::Stay => return,
                Next::Reset => {
                    self.reset();
                    return;
                },
                Next::Goto(id) => id,
                Next::Call { sub, ret } => {
                    if self.depth == CALL_DEPTH {
                        warn!("Call stack full entering node {}", sub);
                        self.reset();
                        return;
                    }
                    self.stack[self.depth] = ret;
                    self.depth += 1;
                    sub
                },
                Next::Return => {
                    if self.depth == 0 {
                        warn!("Return with empty call stack from {}", self.state_name());
                        self.reset();
                        return;
                    }
                    self.depth -= 1;
                    self.stack[self.depth]
                },
            };

            let Some(node) = table.node(target) else {
                warn!("Transition to missing node {}", target);
                self.reset();
                return;
            };
            trace!("{} -> {}", self.state_name(), node.name);
            self.state = target;
            self.counter = 0;
            for action in node.on_entry {
                self.perform(*action, regs);
            }
            match node.kind {
                NodeKind::Pass(then) => next = then,
                _ => return,
            }
        }
        warn!("Too many pass-through nodes after {}", self.state_name());
        self.reset();
    }

    fn perform(&mut self, action: Action, regs: &mut Registers) {
        match action {
            Action::Begin(kind) => self.pending = PendingFix::begin(kind),
            Action::SetPending(flags) => self.pending.hemisphere.insert(flags),
            Action::ClearPending(flags) => self.pending.hemisphere.remove(flags),
            Action::SetFlag(flags) => regs.flags.insert(flags),
            Action::ClearFlag(flags) => regs.flags.remove(flags),
            Action::Commit => self.commit(regs),
            Action::Request => {
                trace!(
                    "Request for value {} index {}",
                    self.request.var,
                    self.request.index
                );
                regs.selector = self.request;
                regs.flags.insert(Flags::TEST_PLEASE_SEND);
            },
        }
    }

    fn store(&mut self, slots: &[Slot], input: u8) {
        for slot in slots {
            match slot {
                Slot::Time => self.pending.time.push(input),
                Slot::LatitudeText => self.pending.latitude.push(input),
                Slot::LatitudeHundredths => self.pending.latitude_hundredths.push(input),
                Slot::LongitudeText => self.pending.longitude.push(input),
                Slot::LongitudeHundredths => self.pending.longitude_hundredths.push(input),
                Slot::Quality => self.pending.quality = Some(input),
                Slot::Selector => self.request.var = input,
                Slot::Index => self.request.index = input,
            }
        }
    }

    fn commit(&mut self, regs: &mut Registers) {
        let Some(kind) = self.pending.kind else {
            warn!("Commit with no sentence in progress at {}", self.state_name());
            return;
        };
        if self.policy == FixPolicy::HoldUntilRead && regs.flags.contains(Flags::NEW_POSITION) {
            debug!("Previous fix not yet read, dropping {:?} sentence", kind);
            return;
        }

        regs.store.commit(&self.pending);
        regs.flags.remove(Flags::HEMISPHERE);
        regs.flags.insert(self.pending.hemisphere & Flags::HEMISPHERE);
        regs.flags.insert(Flags::NEW_POSITION);
        if kind == SentenceKind::Gga && self.pending.quality.is_some() {
            regs.flags.insert(Flags::NEW_QUALITY);
        }
        debug!("Committed {:?} fix #{}", kind, regs.store.commits());
    }

    /// Back to the initial node with nothing pending
    pub fn reset(&mut self) {
        self.state = self.table.initial;
        self.counter = 0;
        self.depth = 0;
        self.pending = PendingFix::default();
    }
}
