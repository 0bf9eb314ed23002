//! Static opcode tables.
//!
//! Every defined opcode maps to an [`OpcodeInfo`] carrying its mnemonic, base
//! cycle count, addressing mode and the [`Op`] variant that executes it. The
//! tables are built at compile time; undefined slots hold `None`.

/// How an instruction obtains its operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressingMode {
    Inherent,
    ImmediateByte,
    ImmediateWord,
    /// Post-byte packs TFR/EXG source and destination register codes.
    ImmediateRegs,
    /// Post-byte selects the registers a push/pull transfers.
    ImmediateStack,
    Direct,
    Extended,
    Indexed,
    RelativeByte,
    RelativeWord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acc {
    A,
    B,
}

/// Operand of a read-modify-write instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    A,
    B,
    Memory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Com,
    Lsr,
    Ror,
    Asr,
    Asl,
    Rol,
    Dec,
    Inc,
    Tst,
    Clr,
}

/// 8-bit accumulator/memory operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Sub,
    Cmp,
    Sbc,
    And,
    Bit,
    Ld,
    Eor,
    Adc,
    Or,
    Add,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordReg {
    D,
    X,
    Y,
    U,
    S,
}

/// 16-bit register/memory operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordOp {
    Sub,
    Add,
    Cmp,
    Ld,
}

/// Branch conditions in opcode order (low nibble of 0x20..0x2F).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    Always,
    Never,
    Hi,
    Ls,
    Cc,
    Cs,
    Ne,
    Eq,
    Vc,
    Vs,
    Pl,
    Mi,
    Ge,
    Lt,
    Gt,
    Le,
}

impl Condition {
    const fn from_low_nibble(n: u8) -> Condition {
        match n & 0x0F {
            0x0 => Condition::Always,
            0x1 => Condition::Never,
            0x2 => Condition::Hi,
            0x3 => Condition::Ls,
            0x4 => Condition::Cc,
            0x5 => Condition::Cs,
            0x6 => Condition::Ne,
            0x7 => Condition::Eq,
            0x8 => Condition::Vc,
            0x9 => Condition::Vs,
            0xA => Condition::Pl,
            0xB => Condition::Mi,
            0xC => Condition::Ge,
            0xD => Condition::Lt,
            0xE => Condition::Gt,
            _ => Condition::Le,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StackReg {
    S,
    U,
}

/// Execution routine selected by an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Unary(UnaryOp, Target),
    Alu8(AluOp, Acc),
    Store8(Acc),
    Alu16(WordOp, WordReg),
    Store16(WordReg),
    Lea(WordReg),
    Branch(Condition),
    LongBranch(Condition),
    Bsr,
    Lbsr,
    Jmp,
    Jsr,
    Rts,
    Rti,
    Swi,
    Swi2,
    Swi3,
    Cwai,
    Sync,
    Nop,
    Daa,
    Orcc,
    Andcc,
    Sex,
    Exg,
    Tfr,
    Abx,
    Mul,
    Psh(StackReg),
    Pul(StackReg),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpcodeInfo {
    pub mnemonic: &'static str,
    pub cycles: u8,
    pub mode: AddressingMode,
    pub op: Op,
}

type Table = [Option<OpcodeInfo>; 256];

const fn entry(mnemonic: &'static str, cycles: u8, mode: AddressingMode, op: Op) -> Option<OpcodeInfo> {
    Some(OpcodeInfo {
        mnemonic,
        cycles,
        mode,
        op,
    })
}

/// Unary op for a low nibble in the 0x00/0x40/0x50/0x60/0x70 rows, with its
/// mnemonics for the memory, A and B forms. JMP (0xE) is handled separately.
const fn unary_row(low: u8) -> Option<(UnaryOp, [&'static str; 3])> {
    match low {
        0x0 => Some((UnaryOp::Neg, ["NEG", "NEGA", "NEGB"])),
        0x3 => Some((UnaryOp::Com, ["COM", "COMA", "COMB"])),
        0x4 => Some((UnaryOp::Lsr, ["LSR", "LSRA", "LSRB"])),
        0x6 => Some((UnaryOp::Ror, ["ROR", "RORA", "RORB"])),
        0x7 => Some((UnaryOp::Asr, ["ASR", "ASRA", "ASRB"])),
        0x8 => Some((UnaryOp::Asl, ["ASL", "ASLA", "ASLB"])),
        0x9 => Some((UnaryOp::Rol, ["ROL", "ROLA", "ROLB"])),
        0xA => Some((UnaryOp::Dec, ["DEC", "DECA", "DECB"])),
        0xC => Some((UnaryOp::Inc, ["INC", "INCA", "INCB"])),
        0xD => Some((UnaryOp::Tst, ["TST", "TSTA", "TSTB"])),
        0xF => Some((UnaryOp::Clr, ["CLR", "CLRA", "CLRB"])),
        _ => None,
    }
}

const BRANCH_NAMES: [&str; 16] = [
    "BRA", "BRN", "BHI", "BLS", "BCC", "BCS", "BNE", "BEQ", "BVC", "BVS", "BPL", "BMI", "BGE",
    "BLT", "BGT", "BLE",
];

const LONG_BRANCH_NAMES: [&str; 16] = [
    "LBRA", "LBRN", "LBHI", "LBLS", "LBCC", "LBCS", "LBNE", "LBEQ", "LBVC", "LBVS", "LBPL",
    "LBMI", "LBGE", "LBLT", "LBGT", "LBLE",
];

/// 8-bit ALU columns shared by the A (0x80..0xBF) and B (0xC0..0xFF) halves.
const fn alu_column(low: u8) -> Option<(AluOp, [&'static str; 2])> {
    match low {
        0x0 => Some((AluOp::Sub, ["SUBA", "SUBB"])),
        0x1 => Some((AluOp::Cmp, ["CMPA", "CMPB"])),
        0x2 => Some((AluOp::Sbc, ["SBCA", "SBCB"])),
        0x4 => Some((AluOp::And, ["ANDA", "ANDB"])),
        0x5 => Some((AluOp::Bit, ["BITA", "BITB"])),
        0x6 => Some((AluOp::Ld, ["LDA", "LDB"])),
        0x8 => Some((AluOp::Eor, ["EORA", "EORB"])),
        0x9 => Some((AluOp::Adc, ["ADCA", "ADCB"])),
        0xA => Some((AluOp::Or, ["ORA", "ORB"])),
        0xB => Some((AluOp::Add, ["ADDA", "ADDB"])),
        _ => None,
    }
}

const fn memory_mode(row: u8) -> AddressingMode {
    match row & 0x3 {
        0 => AddressingMode::ImmediateByte,
        1 => AddressingMode::Direct,
        2 => AddressingMode::Indexed,
        _ => AddressingMode::Extended,
    }
}

const fn build_page1() -> Table {
    use AddressingMode::*;
    let mut t: Table = [None; 256];

    // Read-modify-write rows: direct, inherent A, inherent B, indexed, extended.
    let mut low = 0u8;
    while low < 16 {
        if let Some((op, names)) = unary_row(low) {
            t[low as usize] = entry(names[0], 6, Direct, Op::Unary(op, Target::Memory));
            t[0x40 | low as usize] = entry(names[1], 2, Inherent, Op::Unary(op, Target::A));
            t[0x50 | low as usize] = entry(names[2], 2, Inherent, Op::Unary(op, Target::B));
            t[0x60 | low as usize] = entry(names[0], 6, Indexed, Op::Unary(op, Target::Memory));
            t[0x70 | low as usize] = entry(names[0], 7, Extended, Op::Unary(op, Target::Memory));
        }
        low += 1;
    }
    t[0x0E] = entry("JMP", 3, Direct, Op::Jmp);
    t[0x6E] = entry("JMP", 3, Indexed, Op::Jmp);
    t[0x7E] = entry("JMP", 4, Extended, Op::Jmp);

    t[0x12] = entry("NOP", 2, Inherent, Op::Nop);
    t[0x13] = entry("SYNC", 4, Inherent, Op::Sync);
    t[0x16] = entry("LBRA", 5, RelativeWord, Op::LongBranch(Condition::Always));
    t[0x17] = entry("LBSR", 9, RelativeWord, Op::Lbsr);
    t[0x19] = entry("DAA", 2, Inherent, Op::Daa);
    t[0x1A] = entry("ORCC", 3, ImmediateByte, Op::Orcc);
    t[0x1C] = entry("ANDCC", 3, ImmediateByte, Op::Andcc);
    t[0x1D] = entry("SEX", 2, Inherent, Op::Sex);
    t[0x1E] = entry("EXG", 8, ImmediateRegs, Op::Exg);
    t[0x1F] = entry("TFR", 6, ImmediateRegs, Op::Tfr);

    let mut cond = 0u8;
    while cond < 16 {
        t[0x20 | cond as usize] = entry(
            BRANCH_NAMES[cond as usize],
            3,
            RelativeByte,
            Op::Branch(Condition::from_low_nibble(cond)),
        );
        cond += 1;
    }

    t[0x30] = entry("LEAX", 4, Indexed, Op::Lea(WordReg::X));
    t[0x31] = entry("LEAY", 4, Indexed, Op::Lea(WordReg::Y));
    t[0x32] = entry("LEAS", 4, Indexed, Op::Lea(WordReg::S));
    t[0x33] = entry("LEAU", 4, Indexed, Op::Lea(WordReg::U));
    t[0x34] = entry("PSHS", 5, ImmediateStack, Op::Psh(StackReg::S));
    t[0x35] = entry("PULS", 5, ImmediateStack, Op::Pul(StackReg::S));
    t[0x36] = entry("PSHU", 5, ImmediateStack, Op::Psh(StackReg::U));
    t[0x37] = entry("PULU", 5, ImmediateStack, Op::Pul(StackReg::U));
    t[0x39] = entry("RTS", 5, Inherent, Op::Rts);
    t[0x3A] = entry("ABX", 3, Inherent, Op::Abx);
    t[0x3B] = entry("RTI", 6, Inherent, Op::Rti);
    t[0x3C] = entry("CWAI", 22, ImmediateByte, Op::Cwai);
    t[0x3D] = entry("MUL", 11, Inherent, Op::Mul);
    t[0x3F] = entry("SWI", 19, Inherent, Op::Swi);

    // 0x80..0xFF: four addressing rows per accumulator half.
    let mut row = 0u8;
    while row < 8 {
        let base = 0x80 | (row << 4);
        let mode = memory_mode(row);
        let acc_b = row >= 4;
        let acc = if acc_b { Acc::B } else { Acc::A };
        let slot = if acc_b { 1 } else { 0 };
        let imm = matches!(mode, ImmediateByte);
        // 8-bit ALU: 2/4/4/5 cycles for imm/dir/idx/ext.
        let alu_cycles = match mode {
            ImmediateByte => 2,
            Extended => 5,
            _ => 4,
        };
        // 16-bit arithmetic: 4/6/6/7.
        let word_cycles = alu_cycles + 2;
        // 16-bit loads and stores: 3/5/5/6.
        let ldst_cycles = alu_cycles + 1;
        let word_mode = if imm { ImmediateWord } else { mode };

        let mut low = 0u8;
        while low < 16 {
            if let Some((op, names)) = alu_column(low) {
                t[(base | low) as usize] = entry(names[slot], alu_cycles, mode, Op::Alu8(op, acc));
            }
            low += 1;
        }
        if !imm {
            t[(base | 0x7) as usize] = entry(
                if acc_b { "STB" } else { "STA" },
                alu_cycles,
                mode,
                Op::Store8(acc),
            );
        }

        if acc_b {
            t[(base | 0x3) as usize] = entry("ADDD", word_cycles, word_mode, Op::Alu16(WordOp::Add, WordReg::D));
            t[(base | 0xC) as usize] = entry("LDD", ldst_cycles, word_mode, Op::Alu16(WordOp::Ld, WordReg::D));
            t[(base | 0xE) as usize] = entry("LDU", ldst_cycles, word_mode, Op::Alu16(WordOp::Ld, WordReg::U));
            if !imm {
                t[(base | 0xD) as usize] = entry("STD", ldst_cycles, mode, Op::Store16(WordReg::D));
                t[(base | 0xF) as usize] = entry("STU", ldst_cycles, mode, Op::Store16(WordReg::U));
            }
        } else {
            t[(base | 0x3) as usize] = entry("SUBD", word_cycles, word_mode, Op::Alu16(WordOp::Sub, WordReg::D));
            t[(base | 0xC) as usize] = entry("CMPX", word_cycles, word_mode, Op::Alu16(WordOp::Cmp, WordReg::X));
            t[(base | 0xE) as usize] = entry("LDX", ldst_cycles, word_mode, Op::Alu16(WordOp::Ld, WordReg::X));
            if imm {
                t[(base | 0xD) as usize] = entry("BSR", 7, RelativeByte, Op::Bsr);
            } else {
                let jsr_cycles = if matches!(mode, Extended) { 8 } else { 7 };
                t[(base | 0xD) as usize] = entry("JSR", jsr_cycles, mode, Op::Jsr);
                t[(base | 0xF) as usize] = entry("STX", ldst_cycles, mode, Op::Store16(WordReg::X));
            }
        }
        row += 1;
    }

    t
}

/// Word-register rows of the prefixed pages: immediate, direct, indexed,
/// extended at 0x8x/0x9x/0xAx/0xBx (or 0xCx.. for LDS/STS).
const fn word_modes() -> [AddressingMode; 4] {
    [
        AddressingMode::ImmediateWord,
        AddressingMode::Direct,
        AddressingMode::Indexed,
        AddressingMode::Extended,
    ]
}

const fn build_page2() -> Table {
    use AddressingMode::*;
    let mut t: Table = [None; 256];

    let mut cond = 1u8;
    while cond < 16 {
        t[0x20 | cond as usize] = entry(
            LONG_BRANCH_NAMES[cond as usize],
            5,
            RelativeWord,
            Op::LongBranch(Condition::from_low_nibble(cond)),
        );
        cond += 1;
    }
    t[0x3F] = entry("SWI2", 20, Inherent, Op::Swi2);

    let modes = word_modes();
    let cmp_cycles = [5u8, 7, 7, 8];
    let ldy_cycles = [5u8, 6, 6, 7];
    let lds_cycles = [4u8, 6, 6, 7];
    let st_cycles = [0u8, 6, 6, 7];
    let mut i = 0usize;
    while i < 4 {
        let row = 0x80 + (i as u8) * 0x10;
        t[(row | 0x3) as usize] = entry("CMPD", cmp_cycles[i], modes[i], Op::Alu16(WordOp::Cmp, WordReg::D));
        t[(row | 0xC) as usize] = entry("CMPY", cmp_cycles[i], modes[i], Op::Alu16(WordOp::Cmp, WordReg::Y));
        t[(row | 0xE) as usize] = entry("LDY", ldy_cycles[i], modes[i], Op::Alu16(WordOp::Ld, WordReg::Y));
        t[((row + 0x40) | 0xE) as usize] = entry("LDS", lds_cycles[i], modes[i], Op::Alu16(WordOp::Ld, WordReg::S));
        if i > 0 {
            t[(row | 0xF) as usize] = entry("STY", st_cycles[i], modes[i], Op::Store16(WordReg::Y));
            t[((row + 0x40) | 0xF) as usize] = entry("STS", st_cycles[i], modes[i], Op::Store16(WordReg::S));
        }
        i += 1;
    }

    t
}

const fn build_page3() -> Table {
    use AddressingMode::*;
    let mut t: Table = [None; 256];

    t[0x3F] = entry("SWI3", 20, Inherent, Op::Swi3);

    let modes = word_modes();
    let cmp_cycles = [5u8, 7, 7, 8];
    let mut i = 0usize;
    while i < 4 {
        let row = 0x80 + (i as u8) * 0x10;
        t[(row | 0x3) as usize] = entry("CMPU", cmp_cycles[i], modes[i], Op::Alu16(WordOp::Cmp, WordReg::U));
        t[(row | 0xC) as usize] = entry("CMPS", cmp_cycles[i], modes[i], Op::Alu16(WordOp::Cmp, WordReg::S));
        i += 1;
    }

    t
}

pub static PAGE1: Table = build_page1();
/// Opcodes prefixed by 0x10.
pub static PAGE2: Table = build_page2();
/// Opcodes prefixed by 0x11.
pub static PAGE3: Table = build_page3();

/// Look up a prefixed opcode (`0x10xx` or `0x11xx`).
pub fn lookup_prefixed(prefix: u8, opcode: u8) -> Option<OpcodeInfo> {
    match prefix {
        0x10 => PAGE2[opcode as usize],
        0x11 => PAGE3[opcode as usize],
        _ => None,
    }
}
