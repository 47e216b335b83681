use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BreakpointKind {
    /// PC reaches the address before the instruction there runs.
    Execution,
    /// The CPU reads the address.
    Read,
    /// The CPU writes the address.
    Write,
    /// A jump, call, return, restart or interrupt lands on the address.
    Jump,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BreakpointHit {
    pub kind: BreakpointKind,
    pub addr: u16,
    /// PC of the instruction that triggered the hit.
    pub pc: u16,
}

/// Address breakpoints, one set per kind.
///
/// Read and write hits are recorded by the bus as they happen and collected
/// once the current instruction has finished.
#[derive(Debug, Default, Clone)]
pub(crate) struct Breakpoints {
    execution: HashSet<u16>,
    read: HashSet<u16>,
    write: HashSet<u16>,
    jump: HashSet<u16>,
    pending_hit: Option<BreakpointHit>,
    /// PC of the instruction currently executing, stamped into hits.
    current_pc: u16,
}

impl Breakpoints {
    fn set_for(&mut self, kind: BreakpointKind) -> &mut HashSet<u16> {
        match kind {
            BreakpointKind::Execution => &mut self.execution,
            BreakpointKind::Read => &mut self.read,
            BreakpointKind::Write => &mut self.write,
            BreakpointKind::Jump => &mut self.jump,
        }
    }

    pub(crate) fn add(&mut self, kind: BreakpointKind, addr: u16) {
        self.set_for(kind).insert(addr);
    }

    pub(crate) fn remove(&mut self, kind: BreakpointKind, addr: u16) -> bool {
        self.set_for(kind).remove(&addr)
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn begin_instruction(&mut self, pc: u16) {
        self.current_pc = pc;
    }

    pub(crate) fn check_execution(&self, pc: u16) -> Option<BreakpointHit> {
        self.execution.contains(&pc).then_some(BreakpointHit {
            kind: BreakpointKind::Execution,
            addr: pc,
            pc,
        })
    }

    pub(crate) fn check_jump(&self, from_pc: u16, target: u16) -> Option<BreakpointHit> {
        self.jump.contains(&target).then_some(BreakpointHit {
            kind: BreakpointKind::Jump,
            addr: target,
            pc: from_pc,
        })
    }

    #[inline]
    pub(crate) fn note_read(&mut self, addr: u16) {
        if self.pending_hit.is_none() && !self.read.is_empty() && self.read.contains(&addr) {
            self.record(BreakpointKind::Read, addr);
        }
    }

    #[inline]
    pub(crate) fn note_write(&mut self, addr: u16) {
        if self.pending_hit.is_none() && !self.write.is_empty() && self.write.contains(&addr) {
            self.record(BreakpointKind::Write, addr);
        }
    }

    fn record(&mut self, kind: BreakpointKind, addr: u16) {
        self.pending_hit = Some(BreakpointHit {
            kind,
            addr,
            pc: self.current_pc,
        });
    }

    pub(crate) fn take_hit(&mut self) -> Option<BreakpointHit> {
        self.pending_hit.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_hit_records_address_and_pc() {
        let mut bps = Breakpoints::default();
        bps.add(BreakpointKind::Write, 0xC000);
        bps.begin_instruction(0x0150);

        bps.note_write(0xC001);
        assert_eq!(bps.take_hit(), None);

        bps.note_write(0xC000);
        assert_eq!(
            bps.take_hit(),
            Some(BreakpointHit {
                kind: BreakpointKind::Write,
                addr: 0xC000,
                pc: 0x0150,
            })
        );
    }

    #[test]
    fn first_hit_wins_until_taken() {
        let mut bps = Breakpoints::default();
        bps.add(BreakpointKind::Read, 0xC000);
        bps.add(BreakpointKind::Read, 0xC001);
        bps.note_read(0xC001);
        bps.note_read(0xC000);
        assert_eq!(bps.take_hit().map(|hit| hit.addr), Some(0xC001));
        assert_eq!(bps.take_hit(), None);
    }

    #[test]
    fn removed_breakpoints_stop_matching() {
        let mut bps = Breakpoints::default();
        bps.add(BreakpointKind::Execution, 0x0200);
        assert!(bps.check_execution(0x0200).is_some());
        assert!(bps.remove(BreakpointKind::Execution, 0x0200));
        assert!(bps.check_execution(0x0200).is_none());
    }
}
