//! Opcode descriptor tables.
//!
//! Every one of the 256 base opcodes and 256 `CB`-prefixed opcodes is
//! described once, up front, by an [`OpInfo`]: what it does, how many
//! immediate bytes follow it and what it costs. The executor only ever
//! matches on the typed [`Op`], never on raw opcode bytes.

use std::fmt;

use lazy_static::lazy_static;

/// 8-bit operand in standard encoding order (`B C D E H L (HL) A`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    B,
    C,
    D,
    E,
    H,
    L,
    HlInd,
    A,
}

impl Operand {
    const ORDER: [Operand; 8] = [
        Operand::B,
        Operand::C,
        Operand::D,
        Operand::E,
        Operand::H,
        Operand::L,
        Operand::HlInd,
        Operand::A,
    ];

    fn from_index(index: u8) -> Self {
        Self::ORDER[(index & 7) as usize]
    }

    pub fn is_memory(self) -> bool {
        self == Operand::HlInd
    }
}

/// 16-bit register pair used by loads and 16-bit arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reg16 {
    BC,
    DE,
    HL,
    SP,
}

/// 16-bit register pair used by PUSH/POP.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackPair {
    BC,
    DE,
    HL,
    AF,
}

/// Memory operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    BC,
    DE,
    HlInc,
    HlDec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cond {
    NZ,
    Z,
    NC,
    C,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

/// Rotate/shift family shared by the `CB` page and the accumulator-only
/// rotates (`RLCA`, `RRCA`, `RLA`, `RRA`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,
    Daa,
    Cpl,
    Scf,
    Ccf,

    Ld(Operand, Operand),
    LdImm(Operand),
    LdPairImm(Reg16),
    StoreA(Indirect),
    LoadA(Indirect),
    /// `LD (a16),SP`
    StoreSp,
    /// `LDH (a8),A`
    StoreHigh,
    /// `LDH A,(a8)`
    LoadHigh,
    /// `LD (C),A`
    StoreHighC,
    /// `LD A,(C)`
    LoadHighC,
    /// `LD (a16),A`
    StoreAbs,
    /// `LD A,(a16)`
    LoadAbs,
    LdSpHl,
    LdHlSpOffset,
    AddSpOffset,

    Inc(Operand),
    Dec(Operand),
    IncPair(Reg16),
    DecPair(Reg16),
    AddHl(Reg16),
    Alu(AluOp, Operand),
    AluImm(AluOp),
    RotateA(Shift),

    Jr(Option<Cond>),
    Jp(Option<Cond>),
    JpHl,
    Call(Option<Cond>),
    Ret(Option<Cond>),
    Reti,
    Rst(u8),
    Push(StackPair),
    Pop(StackPair),

    /// The `CB` escape. Only ever valid as a table lookup, never executed.
    Prefix,
    Shift(Shift, Operand),
    Bit(u8, Operand),
    Res(u8, Operand),
    Set(u8, Operand),

    /// One of the eleven opcodes with no defined behavior.
    Invalid,
}

/// Static description of a single opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpInfo {
    pub op: Op,
    /// Whether the opcode lives on the `CB` page.
    pub prefixed: bool,
    /// Immediate bytes following the opcode: 0, 1 or 2.
    pub operand_bytes: u8,
    /// T-cycles when no conditional branch is taken.
    pub ticks: u8,
    /// Extra T-cycles added when a conditional branch is taken.
    pub taken_ticks: u8,
}

impl OpInfo {
    /// Encoded length in bytes, prefix included.
    pub fn len(&self) -> u8 {
        1 + self.prefixed as u8 + self.operand_bytes
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.op, Op::Invalid | Op::Prefix)
    }
}

impl fmt::Display for OpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.op, f)
    }
}

lazy_static! {
    pub static ref BASE_OPS: [OpInfo; 256] = std::array::from_fn(|i| decode_base(i as u8));
    pub static ref CB_OPS: [OpInfo; 256] = std::array::from_fn(|i| decode_cb(i as u8));
}

const CONDS: [Cond; 4] = [Cond::NZ, Cond::Z, Cond::NC, Cond::C];
const PAIRS: [Reg16; 4] = [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP];
const STACK_PAIRS: [StackPair; 4] = [StackPair::BC, StackPair::DE, StackPair::HL, StackPair::AF];
const INDIRECTS: [Indirect; 4] = [Indirect::BC, Indirect::DE, Indirect::HlInc, Indirect::HlDec];
const ALU_OPS: [AluOp; 8] = [
    AluOp::Add,
    AluOp::Adc,
    AluOp::Sub,
    AluOp::Sbc,
    AluOp::And,
    AluOp::Xor,
    AluOp::Or,
    AluOp::Cp,
];
const SHIFTS: [Shift; 8] = [
    Shift::Rlc,
    Shift::Rrc,
    Shift::Rl,
    Shift::Rr,
    Shift::Sla,
    Shift::Sra,
    Shift::Swap,
    Shift::Srl,
];

/// Decode a base-page opcode from its `xx yyy zzz` bit fields.
fn decode_base(opcode: u8) -> OpInfo {
    let x = opcode >> 6;
    let y = (opcode >> 3) & 7;
    let z = opcode & 7;
    let p = (y >> 1) as usize;
    let q = y & 1;

    let op = match (x, z) {
        (0, 0) => match y {
            0 => Op::Nop,
            1 => Op::StoreSp,
            2 => Op::Stop,
            3 => Op::Jr(None),
            _ => Op::Jr(Some(CONDS[(y - 4) as usize])),
        },
        (0, 1) if q == 0 => Op::LdPairImm(PAIRS[p]),
        (0, 1) => Op::AddHl(PAIRS[p]),
        (0, 2) if q == 0 => Op::StoreA(INDIRECTS[p]),
        (0, 2) => Op::LoadA(INDIRECTS[p]),
        (0, 3) if q == 0 => Op::IncPair(PAIRS[p]),
        (0, 3) => Op::DecPair(PAIRS[p]),
        (0, 4) => Op::Inc(Operand::from_index(y)),
        (0, 5) => Op::Dec(Operand::from_index(y)),
        (0, 6) => Op::LdImm(Operand::from_index(y)),
        (0, _) => match y {
            0..=3 => Op::RotateA(SHIFTS[y as usize]),
            4 => Op::Daa,
            5 => Op::Cpl,
            6 => Op::Scf,
            _ => Op::Ccf,
        },
        (1, _) if opcode == 0x76 => Op::Halt,
        (1, _) => Op::Ld(Operand::from_index(y), Operand::from_index(z)),
        (2, _) => Op::Alu(ALU_OPS[y as usize], Operand::from_index(z)),
        (_, 0) => match y {
            0..=3 => Op::Ret(Some(CONDS[y as usize])),
            4 => Op::StoreHigh,
            5 => Op::AddSpOffset,
            6 => Op::LoadHigh,
            _ => Op::LdHlSpOffset,
        },
        (_, 1) if q == 0 => Op::Pop(STACK_PAIRS[p]),
        (_, 1) => match p {
            0 => Op::Ret(None),
            1 => Op::Reti,
            2 => Op::JpHl,
            _ => Op::LdSpHl,
        },
        (_, 2) => match y {
            0..=3 => Op::Jp(Some(CONDS[y as usize])),
            4 => Op::StoreHighC,
            5 => Op::StoreAbs,
            6 => Op::LoadHighC,
            _ => Op::LoadAbs,
        },
        (_, 3) => match y {
            0 => Op::Jp(None),
            1 => Op::Prefix,
            6 => Op::Di,
            7 => Op::Ei,
            _ => Op::Invalid,
        },
        (_, 4) if y < 4 => Op::Call(Some(CONDS[y as usize])),
        (_, 4) => Op::Invalid,
        (_, 5) if q == 0 => Op::Push(STACK_PAIRS[p]),
        (_, 5) if p == 0 => Op::Call(None),
        (_, 5) => Op::Invalid,
        (_, 6) => Op::AluImm(ALU_OPS[y as usize]),
        _ => Op::Rst(y * 8),
    };

    let (operand_bytes, ticks, taken_ticks) = base_timing(op);
    OpInfo {
        op,
        prefixed: false,
        operand_bytes,
        ticks,
        taken_ticks,
    }
}

/// `(immediate bytes, base ticks, extra ticks when taken)`.
fn base_timing(op: Op) -> (u8, u8, u8) {
    match op {
        Op::Nop | Op::Halt | Op::Di | Op::Ei => (0, 4, 0),
        Op::Daa | Op::Cpl | Op::Scf | Op::Ccf | Op::RotateA(_) => (0, 4, 0),
        Op::Stop => (1, 4, 0),

        Op::Ld(dst, src) if dst.is_memory() || src.is_memory() => (0, 8, 0),
        Op::Ld(..) => (0, 4, 0),
        Op::LdImm(Operand::HlInd) => (1, 12, 0),
        Op::LdImm(_) => (1, 8, 0),
        Op::LdPairImm(_) => (2, 12, 0),
        Op::StoreA(_) | Op::LoadA(_) => (0, 8, 0),
        Op::StoreSp => (2, 20, 0),
        Op::StoreHigh | Op::LoadHigh => (1, 12, 0),
        Op::StoreHighC | Op::LoadHighC => (0, 8, 0),
        Op::StoreAbs | Op::LoadAbs => (2, 16, 0),
        Op::LdSpHl => (0, 8, 0),
        Op::LdHlSpOffset => (1, 12, 0),
        Op::AddSpOffset => (1, 16, 0),

        Op::Inc(Operand::HlInd) | Op::Dec(Operand::HlInd) => (0, 12, 0),
        Op::Inc(_) | Op::Dec(_) => (0, 4, 0),
        Op::IncPair(_) | Op::DecPair(_) | Op::AddHl(_) => (0, 8, 0),
        Op::Alu(_, Operand::HlInd) => (0, 8, 0),
        Op::Alu(..) => (0, 4, 0),
        Op::AluImm(_) => (1, 8, 0),

        Op::Jr(None) => (1, 12, 0),
        Op::Jr(Some(_)) => (1, 8, 4),
        Op::Jp(None) => (2, 16, 0),
        Op::Jp(Some(_)) => (2, 12, 4),
        Op::JpHl => (0, 4, 0),
        Op::Call(None) => (2, 24, 0),
        Op::Call(Some(_)) => (2, 12, 12),
        Op::Ret(None) | Op::Reti => (0, 16, 0),
        Op::Ret(Some(_)) => (0, 8, 12),
        Op::Rst(_) => (0, 16, 0),
        Op::Push(_) => (0, 16, 0),
        Op::Pop(_) => (0, 12, 0),

        Op::Prefix | Op::Invalid => (0, 0, 0),
        Op::Shift(..) | Op::Bit(..) | Op::Res(..) | Op::Set(..) => (0, 0, 0),
    }
}

fn decode_cb(opcode: u8) -> OpInfo {
    let y = (opcode >> 3) & 7;
    let target = Operand::from_index(opcode);

    let op = match opcode >> 6 {
        0 => Op::Shift(SHIFTS[y as usize], target),
        1 => Op::Bit(y, target),
        2 => Op::Res(y, target),
        _ => Op::Set(y, target),
    };

    let ticks = match (op, target.is_memory()) {
        (_, false) => 8,
        (Op::Bit(..), true) => 12,
        (_, true) => 16,
    };

    OpInfo {
        op,
        prefixed: true,
        operand_bytes: 0,
        ticks,
        taken_ticks: 0,
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operand::B => "B",
            Operand::C => "C",
            Operand::D => "D",
            Operand::E => "E",
            Operand::H => "H",
            Operand::L => "L",
            Operand::HlInd => "(HL)",
            Operand::A => "A",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for StackPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Cond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for Indirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Indirect::BC => "(BC)",
            Indirect::DE => "(DE)",
            Indirect::HlInc => "(HL+)",
            Indirect::HlDec => "(HL-)",
        };
        f.write_str(name)
    }
}

impl fmt::Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AluOp::Add => "ADD A,",
            AluOp::Adc => "ADC A,",
            AluOp::Sub => "SUB ",
            AluOp::Sbc => "SBC A,",
            AluOp::And => "AND ",
            AluOp::Xor => "XOR ",
            AluOp::Or => "OR ",
            AluOp::Cp => "CP ",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = format!("{self:?}").to_uppercase();
        f.write_str(&name)
    }
}

fn cond_prefix(cond: Option<Cond>) -> String {
    cond.map(|c| format!("{c},")).unwrap_or_default()
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Op::Nop => write!(f, "NOP"),
            Op::Stop => write!(f, "STOP"),
            Op::Halt => write!(f, "HALT"),
            Op::Di => write!(f, "DI"),
            Op::Ei => write!(f, "EI"),
            Op::Daa => write!(f, "DAA"),
            Op::Cpl => write!(f, "CPL"),
            Op::Scf => write!(f, "SCF"),
            Op::Ccf => write!(f, "CCF"),
            Op::Ld(dst, src) => write!(f, "LD {dst},{src}"),
            Op::LdImm(dst) => write!(f, "LD {dst},d8"),
            Op::LdPairImm(rr) => write!(f, "LD {rr},d16"),
            Op::StoreA(ind) => write!(f, "LD {ind},A"),
            Op::LoadA(ind) => write!(f, "LD A,{ind}"),
            Op::StoreSp => write!(f, "LD (a16),SP"),
            Op::StoreHigh => write!(f, "LDH (a8),A"),
            Op::LoadHigh => write!(f, "LDH A,(a8)"),
            Op::StoreHighC => write!(f, "LD (C),A"),
            Op::LoadHighC => write!(f, "LD A,(C)"),
            Op::StoreAbs => write!(f, "LD (a16),A"),
            Op::LoadAbs => write!(f, "LD A,(a16)"),
            Op::LdSpHl => write!(f, "LD SP,HL"),
            Op::LdHlSpOffset => write!(f, "LD HL,SP+r8"),
            Op::AddSpOffset => write!(f, "ADD SP,r8"),
            Op::Inc(r) => write!(f, "INC {r}"),
            Op::Dec(r) => write!(f, "DEC {r}"),
            Op::IncPair(rr) => write!(f, "INC {rr}"),
            Op::DecPair(rr) => write!(f, "DEC {rr}"),
            Op::AddHl(rr) => write!(f, "ADD HL,{rr}"),
            Op::Alu(alu, r) => write!(f, "{alu}{r}"),
            Op::AluImm(alu) => write!(f, "{alu}d8"),
            Op::RotateA(shift) => write!(f, "{shift}A"),
            Op::Jr(cond) => write!(f, "JR {}r8", cond_prefix(cond)),
            Op::Jp(cond) => write!(f, "JP {}a16", cond_prefix(cond)),
            Op::JpHl => write!(f, "JP (HL)"),
            Op::Call(cond) => write!(f, "CALL {}a16", cond_prefix(cond)),
            Op::Ret(None) => write!(f, "RET"),
            Op::Ret(Some(cond)) => write!(f, "RET {cond}"),
            Op::Reti => write!(f, "RETI"),
            Op::Rst(vector) => write!(f, "RST {vector:02X}H"),
            Op::Push(rr) => write!(f, "PUSH {rr}"),
            Op::Pop(rr) => write!(f, "POP {rr}"),
            Op::Prefix => write!(f, "PREFIX CB"),
            Op::Shift(shift, r) => write!(f, "{shift} {r}"),
            Op::Bit(bit, r) => write!(f, "BIT {bit},{r}"),
            Op::Res(bit, r) => write!(f, "RES {bit},{r}"),
            Op::Set(bit, r) => write!(f, "SET {bit},{r}"),
            Op::Invalid => write!(f, "INVALID"),
        }
    }
}
