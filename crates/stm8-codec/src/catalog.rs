//! The STM8 instruction catalog.
//!
//! Every encodable instruction is one [`CatalogEntry`]: a mnemonic, the
//! ordered addressing-mode constraints of its operands, and the opcode.
//! Entries sharing a mnemonic are overloads; their order in [`OPCODES`] is
//! the resolution priority, so the table must stay in declaration order.
//!
//! Two-byte opcodes always start with one of the prefix bytes
//! `0x72`, `0x90`, `0x91` or `0x92`, and no one-byte opcode equals a prefix.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::AsmError;
use crate::ir::{AddrMode, Operand};

// ─── Entries ────────────────────────────────────────────────────────────────

/// One (mnemonic, constraints, opcode) row of the catalog.
///
/// The constraint slice holds at most three modes; its length is the
/// operand count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Lower-case mnemonic.
    pub mnemonic: &'static str,
    /// Addressing-mode constraint per operand position, in syntactic order.
    pub constraints: &'static [AddrMode],
    /// Opcode value; two-byte opcodes carry the prefix in the high byte.
    pub opcode: u16,
}

impl CatalogEntry {
    /// Number of opcode bytes (1 or 2).
    pub fn opcode_width(&self) -> usize {
        opcode_byte_width(u32::from(self.opcode))
    }

    /// Number of operands.
    pub fn operand_count(&self) -> usize {
        self.constraints.len()
    }

    /// Total encoded length in bytes.
    pub fn len(&self) -> usize {
        instruction_length(self)
    }

    /// Whether operand bytes are emitted in reverse syntactic order.
    ///
    /// True only for the three memory-to-memory `mov` forms, whose hardware
    /// encoding places the source before the destination.
    pub fn reverses_operand_emission(&self) -> bool {
        matches!(self.opcode, 0x35 | 0x45 | 0x55)
    }

    /// Operand positions in byte-emission order.
    pub fn emission_order(&self) -> impl Iterator<Item = usize> {
        let n = self.operand_count();
        let rev = self.reverses_operand_emission();
        (0..n).map(move |i| if rev { n - 1 - i } else { i })
    }

    /// The opcode as big-endian bytes, `opcode_width` long.
    pub fn opcode_bytes(&self) -> ([u8; 2], usize) {
        let [hi, lo] = self.opcode.to_be_bytes();
        if self.opcode_width() == 2 {
            ([hi, lo], 2)
        } else {
            ([lo, 0], 1)
        }
    }
}

impl core::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.mnemonic)?;
        for (i, mode) in self.constraints.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { "," })?;
            write!(f, "{}", mode)?;
        }
        Ok(())
    }
}

// ─── Size helpers ───────────────────────────────────────────────────────────

/// Smallest number of bytes whose most significant byte is non-zero.
///
/// An opcode of zero (`neg (off8,SP)`) still takes one byte.
pub fn opcode_byte_width(opcode: u32) -> usize {
    (1..=4usize)
        .rev()
        .find(|i| opcode & (0xFF << ((i - 1) * 8)) != 0)
        .unwrap_or(1)
}

/// Number of operands of `entry`.
pub fn operand_count(entry: &CatalogEntry) -> usize {
    entry.constraints.len()
}

/// Bytes occupied by an operand in `mode` after the opcode.
pub fn operand_encoding_width(mode: AddrMode) -> usize {
    mode.encoding_width()
}

/// Opcode width plus the encoding widths of all operands.
pub fn instruction_length(entry: &CatalogEntry) -> usize {
    opcode_byte_width(u32::from(entry.opcode))
        + entry
            .constraints
            .iter()
            .map(|m| operand_encoding_width(*m))
            .sum::<usize>()
}

// ─── Index ──────────────────────────────────────────────────────────────────

/// Lookup index over [`OPCODES`].
///
/// Gives the same answers as a linear scan of the table: overloads come
/// back in declaration order, and an opcode shared by aliases (`jra`/`jrt`,
/// `sll`/`sla`, ...) maps to the entry declared first.
#[derive(Debug, Clone)]
pub struct Catalog {
    by_mnemonic: BTreeMap<&'static str, Vec<&'static CatalogEntry>>,
    by_opcode: BTreeMap<u16, &'static CatalogEntry>,
}

impl Catalog {
    /// Build the index from the static table.
    pub fn new() -> Self {
        let mut by_mnemonic: BTreeMap<&'static str, Vec<&'static CatalogEntry>> =
            BTreeMap::new();
        let mut by_opcode = BTreeMap::new();
        for entry in OPCODES {
            by_mnemonic.entry(entry.mnemonic).or_default().push(entry);
            by_opcode.entry(entry.opcode).or_insert(entry);
        }
        Self {
            by_mnemonic,
            by_opcode,
        }
    }

    /// Process-wide index, built on first use.
    #[cfg(feature = "std")]
    pub fn shared() -> &'static Catalog {
        static SHARED: std::sync::OnceLock<Catalog> = std::sync::OnceLock::new();
        SHARED.get_or_init(Catalog::new)
    }

    /// All overloads of `mnemonic` (ASCII case ignored), in declaration order.
    pub fn lookup(&self, mnemonic: &str) -> &[&'static CatalogEntry] {
        let hit = if mnemonic.bytes().any(|b| b.is_ascii_uppercase()) {
            let lower: String = mnemonic.to_ascii_lowercase();
            self.by_mnemonic.get(lower.as_str())
        } else {
            self.by_mnemonic.get(mnemonic)
        };
        hit.map(Vec::as_slice).unwrap_or(&[])
    }

    /// First entry with the given opcode key.
    pub fn by_opcode(&self, opcode: u16) -> Option<&'static CatalogEntry> {
        self.by_opcode.get(&opcode).copied()
    }

    /// Indexed equivalent of [`crate::resolver::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::UnknownMnemonic`] or [`AsmError::NoMatch`].
    pub fn resolve(
        &self,
        mnemonic: &str,
        operands: &[Operand],
    ) -> Result<&'static CatalogEntry, AsmError> {
        crate::resolver::select(mnemonic, self.lookup(mnemonic).iter().copied(), operands)
    }

    /// Number of distinct mnemonics.
    pub fn mnemonic_count(&self) -> usize {
        self.by_mnemonic.len()
    }

    /// Distinct mnemonics in sorted order.
    pub fn mnemonics(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_mnemonic.keys().copied()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Table ──────────────────────────────────────────────────────────────────

const fn e(mnemonic: &'static str, constraints: &'static [AddrMode], opcode: u16) -> CatalogEntry {
    CatalogEntry {
        mnemonic,
        constraints,
        opcode,
    }
}

use AddrMode::*;

/// Every STM8 instruction form, in resolution-priority order.
#[rustfmt::skip]
pub static OPCODES: &[CatalogEntry] = &[
    e("nop", &[], 0x9D),

    e("adc", &[RegA, Byte], 0xA9),
    e("adc", &[RegA, ShortMem], 0xB9),
    e("adc", &[RegA, LongMem], 0xC9),
    e("adc", &[RegA, IndX], 0xF9),
    e("adc", &[RegA, ShortOffX], 0xE9),
    e("adc", &[RegA, LongOffX], 0xD9),
    e("adc", &[RegA, IndY], 0x90F9),
    e("adc", &[RegA, ShortOffY], 0x90E9),
    e("adc", &[RegA, LongOffY], 0x90D9),
    e("adc", &[RegA, ShortOffSp], 0x19),
    e("adc", &[RegA, ShortPtrW], 0x92C9),
    e("adc", &[RegA, LongPtrW], 0x72C9),
    e("adc", &[RegA, ShortPtrWX], 0x92D9),
    e("adc", &[RegA, LongPtrWX], 0x72D9),
    e("adc", &[RegA, ShortPtrWY], 0x91D9),

    e("add", &[RegA, Byte], 0xAB),
    e("add", &[RegA, ShortMem], 0xBB),
    e("add", &[RegA, LongMem], 0xCB),
    e("add", &[RegA, IndX], 0xFB),
    e("add", &[RegA, ShortOffX], 0xEB),
    e("add", &[RegA, LongOffX], 0xDB),
    e("add", &[RegA, IndY], 0x90FB),
    e("add", &[RegA, ShortOffY], 0x90EB),
    e("add", &[RegA, LongOffY], 0x90DB),
    e("add", &[RegA, ShortOffSp], 0x1B),
    e("add", &[RegA, ShortPtrW], 0x92CB),
    e("add", &[RegA, LongPtrW], 0x72CB),
    e("add", &[RegA, ShortPtrWX], 0x92DB),
    e("add", &[RegA, LongPtrWX], 0x72DB),
    e("add", &[RegA, ShortPtrWY], 0x91DB),

    e("addw", &[RegX, Word], 0x1C),
    e("addw", &[RegX, LongMem], 0x72BB),
    e("addw", &[RegX, ShortOffSp], 0x72FB),
    e("addw", &[RegY, Word], 0x72A9),
    e("addw", &[RegY, LongMem], 0x72B9),
    e("addw", &[RegY, ShortOffSp], 0x72F9),
    e("addw", &[RegSp, Byte], 0x5B),

    e("and", &[RegA, Byte], 0xA4),
    e("and", &[RegA, ShortMem], 0xB4),
    e("and", &[RegA, LongMem], 0xC4),
    e("and", &[RegA, IndX], 0xF4),
    e("and", &[RegA, ShortOffX], 0xE4),
    e("and", &[RegA, LongOffX], 0xD4),
    e("and", &[RegA, IndY], 0x90F4),
    e("and", &[RegA, ShortOffY], 0x90E4),
    e("and", &[RegA, LongOffY], 0x90D4),
    e("and", &[RegA, ShortOffSp], 0x14),
    e("and", &[RegA, ShortPtrW], 0x92C4),
    e("and", &[RegA, LongPtrW], 0x72C4),
    e("and", &[RegA, ShortPtrWX], 0x92D4),
    e("and", &[RegA, LongPtrWX], 0x72D4),
    e("and", &[RegA, ShortPtrWY], 0x91D4),

    e("bccm", &[LongMem, Bit0], 0x9011),
    e("bccm", &[LongMem, Bit1], 0x9013),
    e("bccm", &[LongMem, Bit2], 0x9015),
    e("bccm", &[LongMem, Bit3], 0x9017),
    e("bccm", &[LongMem, Bit4], 0x9019),
    e("bccm", &[LongMem, Bit5], 0x901B),
    e("bccm", &[LongMem, Bit6], 0x901D),
    e("bccm", &[LongMem, Bit7], 0x901F),

    e("bcp", &[RegA, Byte], 0xA5),
    e("bcp", &[RegA, ShortMem], 0xB5),
    e("bcp", &[RegA, LongMem], 0xC5),
    e("bcp", &[RegA, IndX], 0xF5),
    e("bcp", &[RegA, ShortOffX], 0xE5),
    e("bcp", &[RegA, LongOffX], 0xD5),
    e("bcp", &[RegA, IndY], 0x90F5),
    e("bcp", &[RegA, ShortOffY], 0x90E5),
    e("bcp", &[RegA, LongOffY], 0x90D5),
    e("bcp", &[RegA, ShortOffSp], 0x15),
    e("bcp", &[RegA, ShortPtrW], 0x92C5),
    e("bcp", &[RegA, LongPtrW], 0x72C5),
    e("bcp", &[RegA, ShortPtrWX], 0x92D5),
    e("bcp", &[RegA, LongPtrWX], 0x72D5),
    e("bcp", &[RegA, ShortPtrWY], 0x91D5),

    e("bcpl", &[LongMem, Bit0], 0x9010),
    e("bcpl", &[LongMem, Bit1], 0x9012),
    e("bcpl", &[LongMem, Bit2], 0x9014),
    e("bcpl", &[LongMem, Bit3], 0x9016),
    e("bcpl", &[LongMem, Bit4], 0x9018),
    e("bcpl", &[LongMem, Bit5], 0x901A),
    e("bcpl", &[LongMem, Bit6], 0x901C),
    e("bcpl", &[LongMem, Bit7], 0x901E),

    e("break", &[], 0x8B),

    e("bres", &[LongMem, Bit0], 0x7211),
    e("bres", &[LongMem, Bit1], 0x7213),
    e("bres", &[LongMem, Bit2], 0x7215),
    e("bres", &[LongMem, Bit3], 0x7217),
    e("bres", &[LongMem, Bit4], 0x7219),
    e("bres", &[LongMem, Bit5], 0x721B),
    e("bres", &[LongMem, Bit6], 0x721D),
    e("bres", &[LongMem, Bit7], 0x721F),

    e("bset", &[LongMem, Bit0], 0x7210),
    e("bset", &[LongMem, Bit1], 0x7212),
    e("bset", &[LongMem, Bit2], 0x7214),
    e("bset", &[LongMem, Bit3], 0x7216),
    e("bset", &[LongMem, Bit4], 0x7218),
    e("bset", &[LongMem, Bit5], 0x721A),
    e("bset", &[LongMem, Bit6], 0x721C),
    e("bset", &[LongMem, Bit7], 0x721E),

    e("btjf", &[LongMem, Bit0, PcRel], 0x7201),
    e("btjf", &[LongMem, Bit1, PcRel], 0x7203),
    e("btjf", &[LongMem, Bit2, PcRel], 0x7205),
    e("btjf", &[LongMem, Bit3, PcRel], 0x7207),
    e("btjf", &[LongMem, Bit4, PcRel], 0x7209),
    e("btjf", &[LongMem, Bit5, PcRel], 0x720B),
    e("btjf", &[LongMem, Bit6, PcRel], 0x720D),
    e("btjf", &[LongMem, Bit7, PcRel], 0x720F),

    e("btjt", &[LongMem, Bit0, PcRel], 0x7200),
    e("btjt", &[LongMem, Bit1, PcRel], 0x7202),
    e("btjt", &[LongMem, Bit2, PcRel], 0x7204),
    e("btjt", &[LongMem, Bit3, PcRel], 0x7206),
    e("btjt", &[LongMem, Bit4, PcRel], 0x7208),
    e("btjt", &[LongMem, Bit5, PcRel], 0x720A),
    e("btjt", &[LongMem, Bit6, PcRel], 0x720C),
    e("btjt", &[LongMem, Bit7, PcRel], 0x720E),

    e("call", &[LongMem], 0xCD),
    e("call", &[IndX], 0xFD),
    e("call", &[ShortOffX], 0xED),
    e("call", &[LongOffX], 0xDD),
    e("call", &[IndY], 0x90FD),
    e("call", &[ShortOffY], 0x90ED),
    e("call", &[LongOffY], 0x90DD),
    e("call", &[ShortPtrW], 0x92CD),
    e("call", &[LongPtrW], 0x72CD),
    e("call", &[ShortPtrWX], 0x92DD),
    e("call", &[LongPtrWX], 0x72DD),
    e("call", &[ShortPtrWY], 0x91DD),

    e("callf", &[ExtMem], 0x8D),
    e("callf", &[LongPtrE], 0x928D),

    e("callr", &[PcRel], 0xAD),

    e("ccf", &[], 0x8C),

    e("clr", &[RegA], 0x4F),
    e("clr", &[ShortMem], 0x3F),
    e("clr", &[LongMem], 0x725F),
    e("clr", &[IndX], 0x7F),
    e("clr", &[ShortOffX], 0x6F),
    e("clr", &[LongOffX], 0x724F),
    e("clr", &[IndY], 0x907F),
    e("clr", &[ShortOffY], 0x906F),
    e("clr", &[LongOffY], 0x904F),
    e("clr", &[ShortOffSp], 0x0F),
    e("clr", &[ShortPtrW], 0x923F),
    e("clr", &[LongPtrW], 0x723F),
    e("clr", &[ShortPtrWX], 0x926F),
    e("clr", &[LongPtrWX], 0x726F),
    e("clr", &[ShortPtrWY], 0x916F),

    e("clrw", &[RegX], 0x5F),
    e("clrw", &[RegY], 0x905F),

    e("cp", &[RegA, Byte], 0xA1),
    e("cp", &[RegA, ShortMem], 0xB1),
    e("cp", &[RegA, LongMem], 0xC1),
    e("cp", &[RegA, IndX], 0xF1),
    e("cp", &[RegA, ShortOffX], 0xE1),
    e("cp", &[RegA, LongOffX], 0xD1),
    e("cp", &[RegA, IndY], 0x90F1),
    e("cp", &[RegA, ShortOffY], 0x90E1),
    e("cp", &[RegA, LongOffY], 0x90D1),
    e("cp", &[RegA, ShortOffSp], 0x11),
    e("cp", &[RegA, ShortPtrW], 0x92C1),
    e("cp", &[RegA, LongPtrW], 0x72C1),
    e("cp", &[RegA, ShortPtrWX], 0x92D1),
    e("cp", &[RegA, LongPtrWX], 0x72D1),
    e("cp", &[RegA, ShortPtrWY], 0x91D1),

    e("cpw", &[RegX, Word], 0xA3),
    e("cpw", &[RegX, ShortMem], 0xB3),
    e("cpw", &[RegX, LongMem], 0xC3),
    e("cpw", &[RegX, IndY], 0x90F3),
    e("cpw", &[RegX, ShortOffY], 0x90E3),
    e("cpw", &[RegX, LongOffY], 0x90D3),
    e("cpw", &[RegX, ShortOffSp], 0x13),
    e("cpw", &[RegX, ShortPtrW], 0x92C3),
    e("cpw", &[RegX, LongPtrW], 0x72C3),
    e("cpw", &[RegX, ShortPtrWY], 0x91D3),
    e("cpw", &[RegY, Word], 0x90A3),
    e("cpw", &[RegY, ShortMem], 0x90B3),
    e("cpw", &[RegY, LongMem], 0x90C3),
    e("cpw", &[RegY, IndX], 0xF3),
    e("cpw", &[RegY, ShortOffX], 0xE3),
    e("cpw", &[RegY, LongOffX], 0xD3),
    e("cpw", &[RegY, ShortPtrW], 0x91C3),
    e("cpw", &[RegY, LongPtrW], 0x92D3),
    e("cpw", &[RegY, ShortPtrWX], 0x72D3),

    e("cpl", &[RegA], 0x43),
    e("cpl", &[ShortMem], 0x33),
    e("cpl", &[LongMem], 0x7253),
    e("cpl", &[IndX], 0x73),
    e("cpl", &[ShortOffX], 0x63),
    e("cpl", &[LongOffX], 0x7243),
    e("cpl", &[IndY], 0x9073),
    e("cpl", &[ShortOffY], 0x9063),
    e("cpl", &[LongOffY], 0x9043),
    e("cpl", &[ShortOffSp], 0x03),
    e("cpl", &[ShortPtrW], 0x9233),
    e("cpl", &[LongPtrW], 0x7233),
    e("cpl", &[ShortPtrWX], 0x9263),
    e("cpl", &[LongPtrWX], 0x7263),
    e("cpl", &[ShortPtrWY], 0x9163),

    e("cplw", &[RegX], 0x53),
    e("cplw", &[RegY], 0x9053),

    e("dec", &[RegA], 0x4A),
    e("dec", &[ShortMem], 0x3A),
    e("dec", &[LongMem], 0x725A),
    e("dec", &[IndX], 0x7A),
    e("dec", &[ShortOffX], 0x6A),
    e("dec", &[LongOffX], 0x724A),
    e("dec", &[IndY], 0x907A),
    e("dec", &[ShortOffY], 0x906A),
    e("dec", &[LongOffY], 0x904A),
    e("dec", &[ShortOffSp], 0x0A),
    e("dec", &[ShortPtrW], 0x923A),
    e("dec", &[LongPtrW], 0x723A),
    e("dec", &[ShortPtrWX], 0x926A),
    e("dec", &[LongPtrWX], 0x726A),
    e("dec", &[ShortPtrWY], 0x916A),

    e("decw", &[RegX], 0x5A),
    e("decw", &[RegY], 0x905A),

    e("div", &[RegX, RegA], 0x62),
    e("div", &[RegY, RegA], 0x9062),

    e("divw", &[RegX, RegY], 0x65),

    e("exg", &[RegA, RegXl], 0x41),
    e("exg", &[RegA, RegYl], 0x61),
    e("exg", &[RegA, LongMem], 0x31),

    e("exgw", &[RegX, RegY], 0x51),

    e("halt", &[], 0x8E),

    e("inc", &[RegA], 0x4C),
    e("inc", &[ShortMem], 0x3C),
    e("inc", &[LongMem], 0x725C),
    e("inc", &[IndX], 0x7C),
    e("inc", &[ShortOffX], 0x6C),
    e("inc", &[LongOffX], 0x724C),
    e("inc", &[IndY], 0x907C),
    e("inc", &[ShortOffY], 0x906C),
    e("inc", &[LongOffY], 0x904C),
    e("inc", &[ShortOffSp], 0x0C),
    e("inc", &[ShortPtrW], 0x923C),
    e("inc", &[LongPtrW], 0x723C),
    e("inc", &[ShortPtrWX], 0x926C),
    e("inc", &[LongPtrWX], 0x726C),
    e("inc", &[ShortPtrWY], 0x916C),

    e("incw", &[RegX], 0x5C),
    e("incw", &[RegY], 0x905C),

    e("int", &[ExtMem], 0x82),

    e("iret", &[], 0x80),

    e("jp", &[LongMem], 0xCC),
    e("jp", &[IndX], 0xFC),
    e("jp", &[ShortOffX], 0xEC),
    e("jp", &[LongOffX], 0xDC),
    e("jp", &[IndY], 0x90FC),
    e("jp", &[ShortOffY], 0x90EC),
    e("jp", &[LongOffY], 0x90DC),
    e("jp", &[ShortPtrW], 0x92CC),
    e("jp", &[LongPtrW], 0x72CC),
    e("jp", &[ShortPtrWX], 0x92DC),
    e("jp", &[LongPtrWX], 0x72DC),
    e("jp", &[ShortPtrWY], 0x91DC),

    e("jpf", &[ExtMem], 0xAC),
    e("jpf", &[LongPtrE], 0x92AC),

    e("jra", &[PcRel], 0x20),

    e("jrc", &[PcRel], 0x25),

    e("jreq", &[PcRel], 0x27),

    e("jrf", &[PcRel], 0x21),

    e("jrh", &[PcRel], 0x9029),

    e("jrih", &[PcRel], 0x902F),

    e("jril", &[PcRel], 0x902E),

    e("jrm", &[PcRel], 0x902D),

    e("jrmi", &[PcRel], 0x2B),

    e("jrnc", &[PcRel], 0x24),

    e("jrne", &[PcRel], 0x26),

    e("jrnh", &[PcRel], 0x9028),

    e("jrnm", &[PcRel], 0x902C),

    e("jrnv", &[PcRel], 0x28),

    e("jrpl", &[PcRel], 0x2A),

    e("jrsge", &[PcRel], 0x2E),

    e("jrsgt", &[PcRel], 0x2C),

    e("jrsle", &[PcRel], 0x2D),

    e("jrslt", &[PcRel], 0x2F),

    e("jrt", &[PcRel], 0x20),

    e("jruge", &[PcRel], 0x24),

    e("jrugt", &[PcRel], 0x22),

    e("jrule", &[PcRel], 0x23),

    e("jrult", &[PcRel], 0x25),

    e("jrv", &[PcRel], 0x29),

    e("ld", &[RegA, Byte], 0xA6),
    e("ld", &[RegA, ShortMem], 0xB6),
    e("ld", &[RegA, LongMem], 0xC6),
    e("ld", &[RegA, IndX], 0xF6),
    e("ld", &[RegA, ShortOffX], 0xE6),
    e("ld", &[RegA, LongOffX], 0xD6),
    e("ld", &[RegA, IndY], 0x90F6),
    e("ld", &[RegA, ShortOffY], 0x90E6),
    e("ld", &[RegA, LongOffY], 0x90D6),
    e("ld", &[RegA, ShortOffSp], 0x7B),
    e("ld", &[RegA, ShortPtrW], 0x92C6),
    e("ld", &[RegA, LongPtrW], 0x72C6),
    e("ld", &[RegA, ShortPtrWX], 0x92D6),
    e("ld", &[RegA, LongPtrWX], 0x72D6),
    e("ld", &[RegA, ShortPtrWY], 0x91D6),
    e("ld", &[ShortMem, RegA], 0xB7),
    e("ld", &[LongMem, RegA], 0xC7),
    e("ld", &[IndX, RegA], 0xF7),
    e("ld", &[ShortOffX, RegA], 0xE7),
    e("ld", &[LongOffX, RegA], 0xD7),
    e("ld", &[IndY, RegA], 0x90F7),
    e("ld", &[ShortOffY, RegA], 0x90E7),
    e("ld", &[LongOffY, RegA], 0x90D7),
    e("ld", &[ShortOffSp, RegA], 0x6B),
    e("ld", &[ShortPtrW, RegA], 0x92C7),
    e("ld", &[LongPtrW, RegA], 0x72C7),
    e("ld", &[ShortPtrWX, RegA], 0x92D7),
    e("ld", &[LongPtrWX, RegA], 0x72D7),
    e("ld", &[ShortPtrWY, RegA], 0x91D7),
    e("ld", &[RegXl, RegA], 0x97),
    e("ld", &[RegA, RegXl], 0x9F),
    e("ld", &[RegYl, RegA], 0x9097),
    e("ld", &[RegA, RegYl], 0x909F),
    e("ld", &[RegXh, RegA], 0x95),
    e("ld", &[RegA, RegXh], 0x9E),
    e("ld", &[RegYh, RegA], 0x9095),
    e("ld", &[RegA, RegYh], 0x909E),

    e("ldf", &[RegA, ExtMem], 0xBC),
    e("ldf", &[RegA, ExtOffX], 0xAF),
    e("ldf", &[RegA, ExtOffY], 0x90AF),
    e("ldf", &[RegA, LongPtrEX], 0x92AF),
    e("ldf", &[RegA, LongPtrEY], 0x91AF),
    e("ldf", &[RegA, LongPtrE], 0x92BC),
    e("ldf", &[ExtMem, RegA], 0xBD),
    e("ldf", &[ExtOffX, RegA], 0xA7),
    e("ldf", &[ExtOffY, RegA], 0x90A7),
    e("ldf", &[LongPtrEX, RegA], 0x92A7),
    e("ldf", &[LongPtrEY, RegA], 0x91A7),
    e("ldf", &[LongPtrE, RegA], 0x92BD),

    e("ldw", &[RegX, Word], 0xAE),
    e("ldw", &[RegX, ShortMem], 0xBE),
    e("ldw", &[RegX, LongMem], 0xCE),
    e("ldw", &[RegX, IndX], 0xFE),
    e("ldw", &[RegX, ShortOffX], 0xEE),
    e("ldw", &[RegX, LongOffX], 0xDE),
    e("ldw", &[RegX, ShortOffSp], 0x1E),
    e("ldw", &[RegX, ShortPtrW], 0x92CE),
    e("ldw", &[RegX, LongPtrW], 0x72CE),
    e("ldw", &[RegX, ShortPtrWX], 0x92DE),
    e("ldw", &[RegX, LongPtrWX], 0x72DE),
    e("ldw", &[ShortMem, RegX], 0xBF),
    e("ldw", &[LongMem, RegX], 0xCF),
    e("ldw", &[IndX, RegY], 0xFF),
    e("ldw", &[ShortOffX, RegY], 0xEF),
    e("ldw", &[LongOffX, RegY], 0xDF),
    e("ldw", &[ShortOffSp, RegX], 0x1F),
    e("ldw", &[ShortPtrW, RegX], 0x92CF),
    e("ldw", &[LongPtrW, RegX], 0x72CF),
    e("ldw", &[ShortPtrWX, RegY], 0x92DF),
    e("ldw", &[LongPtrWX, RegY], 0x72DF),
    e("ldw", &[RegY, Word], 0x90AE),
    e("ldw", &[RegY, ShortMem], 0x90BE),
    e("ldw", &[RegY, LongMem], 0x90CE),
    e("ldw", &[RegY, IndY], 0x90FE),
    e("ldw", &[RegY, ShortOffY], 0x90EE),
    e("ldw", &[RegY, LongOffY], 0x90DE),
    e("ldw", &[RegY, ShortOffSp], 0x16),
    e("ldw", &[RegY, ShortPtrW], 0x91CE),
    e("ldw", &[RegY, ShortPtrWY], 0x91DE),
    e("ldw", &[ShortMem, RegY], 0x90BF),
    e("ldw", &[LongMem, RegY], 0x90CF),
    e("ldw", &[IndY, RegX], 0x90FF),
    e("ldw", &[ShortOffY, RegX], 0x90EF),
    e("ldw", &[LongOffY, RegX], 0x90DF),
    e("ldw", &[ShortOffSp, RegY], 0x17),
    e("ldw", &[ShortPtrW, RegY], 0x91CF),
    e("ldw", &[ShortPtrWY, RegX], 0x91DF),
    e("ldw", &[RegY, RegX], 0x9093),
    e("ldw", &[RegX, RegY], 0x93),
    e("ldw", &[RegX, RegSp], 0x96),
    e("ldw", &[RegSp, RegX], 0x94),
    e("ldw", &[RegY, RegSp], 0x9096),
    e("ldw", &[RegSp, RegY], 0x9094),

    e("mov", &[LongMem, Byte], 0x35),
    e("mov", &[ShortMem, ShortMem], 0x45),
    e("mov", &[LongMem, LongMem], 0x55),

    e("mul", &[RegX, RegA], 0x42),
    e("mul", &[RegY, RegA], 0x9042),

    e("neg", &[RegA], 0x40),
    e("neg", &[ShortMem], 0x30),
    e("neg", &[LongMem], 0x7250),
    e("neg", &[IndX], 0x70),
    e("neg", &[ShortOffX], 0x60),
    e("neg", &[LongOffX], 0x7240),
    e("neg", &[IndY], 0x9070),
    e("neg", &[ShortOffY], 0x9060),
    e("neg", &[LongOffY], 0x9040),
    e("neg", &[ShortOffSp], 0x00),
    e("neg", &[ShortPtrW], 0x9230),
    e("neg", &[LongPtrW], 0x7230),
    e("neg", &[ShortPtrWX], 0x9260),
    e("neg", &[LongPtrWX], 0x7260),
    e("neg", &[ShortPtrWY], 0x9160),

    e("negw", &[RegX], 0x50),
    e("negw", &[RegY], 0x9050),

    e("or", &[RegA, Byte], 0xAA),
    e("or", &[RegA, ShortMem], 0xBA),
    e("or", &[RegA, LongMem], 0xCA),
    e("or", &[RegA, IndX], 0xFA),
    e("or", &[RegA, ShortOffX], 0xEA),
    e("or", &[RegA, LongOffX], 0xDA),
    e("or", &[RegA, IndY], 0x90FA),
    e("or", &[RegA, ShortOffY], 0x90EA),
    e("or", &[RegA, LongOffY], 0x90DA),
    e("or", &[RegA, ShortOffSp], 0x1A),
    e("or", &[RegA, ShortPtrW], 0x92CA),
    e("or", &[RegA, LongPtrW], 0x72CA),
    e("or", &[RegA, ShortPtrWX], 0x92DA),
    e("or", &[RegA, LongPtrWX], 0x72DA),
    e("or", &[RegA, ShortPtrWY], 0x91DA),

    e("pop", &[RegA], 0x84),
    e("pop", &[RegCc], 0x86),
    e("pop", &[LongMem], 0x32),

    e("popw", &[RegX], 0x85),
    e("popw", &[RegY], 0x9085),

    e("push", &[RegA], 0x88),
    e("push", &[RegCc], 0x8A),
    e("push", &[Byte], 0x4B),
    e("push", &[LongMem], 0x3B),

    e("pushw", &[RegX], 0x89),
    e("pushw", &[RegY], 0x9089),

    e("rcf", &[], 0x98),

    e("ret", &[], 0x81),

    e("retf", &[], 0x87),

    e("rim", &[], 0x9A),

    e("rlc", &[RegA], 0x49),
    e("rlc", &[ShortMem], 0x39),
    e("rlc", &[LongMem], 0x7259),
    e("rlc", &[IndX], 0x79),
    e("rlc", &[ShortOffX], 0x69),
    e("rlc", &[LongOffX], 0x7249),
    e("rlc", &[IndY], 0x9079),
    e("rlc", &[ShortOffY], 0x9069),
    e("rlc", &[LongOffY], 0x9049),
    e("rlc", &[ShortOffSp], 0x09),
    e("rlc", &[ShortPtrW], 0x9239),
    e("rlc", &[LongPtrW], 0x7239),
    e("rlc", &[ShortPtrWX], 0x9269),
    e("rlc", &[LongPtrWX], 0x7269),
    e("rlc", &[ShortPtrWY], 0x9169),

    e("rlcw", &[RegX], 0x59),
    e("rlcw", &[RegY], 0x9059),

    e("rlwa", &[RegX, RegA], 0x02),
    e("rlwa", &[RegY, RegA], 0x9002),

    e("rrc", &[RegA], 0x46),
    e("rrc", &[ShortMem], 0x36),
    e("rrc", &[LongMem], 0x7256),
    e("rrc", &[IndX], 0x76),
    e("rrc", &[ShortOffX], 0x66),
    e("rrc", &[LongOffX], 0x7246),
    e("rrc", &[IndY], 0x9076),
    e("rrc", &[ShortOffY], 0x9066),
    e("rrc", &[LongOffY], 0x9046),
    e("rrc", &[ShortOffSp], 0x06),
    e("rrc", &[ShortPtrW], 0x9236),
    e("rrc", &[LongPtrW], 0x7236),
    e("rrc", &[ShortPtrWX], 0x9266),
    e("rrc", &[LongPtrWX], 0x7266),
    e("rrc", &[ShortPtrWY], 0x9166),

    e("rrcw", &[RegX], 0x56),
    e("rrcw", &[RegY], 0x9056),

    e("rrwa", &[RegX, RegA], 0x01),
    e("rrwa", &[RegY, RegA], 0x9001),

    e("rvf", &[], 0x9C),

    e("sbc", &[RegA, Byte], 0xA2),
    e("sbc", &[RegA, ShortMem], 0xB2),
    e("sbc", &[RegA, LongMem], 0xC2),
    e("sbc", &[RegA, IndX], 0xF2),
    e("sbc", &[RegA, ShortOffX], 0xE2),
    e("sbc", &[RegA, LongOffX], 0xD2),
    e("sbc", &[RegA, IndY], 0x90F2),
    e("sbc", &[RegA, ShortOffY], 0x90E2),
    e("sbc", &[RegA, LongOffY], 0x90D2),
    e("sbc", &[RegA, ShortOffSp], 0x12),
    e("sbc", &[RegA, ShortPtrW], 0x92C2),
    e("sbc", &[RegA, LongPtrW], 0x72C2),
    e("sbc", &[RegA, ShortPtrWX], 0x92D2),
    e("sbc", &[RegA, LongPtrWX], 0x72D2),
    e("sbc", &[RegA, ShortPtrWY], 0x91D2),

    e("scf", &[], 0x99),

    e("sim", &[], 0x9B),

    e("sll", &[RegA], 0x48),
    e("sll", &[ShortMem], 0x38),
    e("sll", &[LongMem], 0x7258),
    e("sll", &[IndX], 0x78),
    e("sll", &[ShortOffX], 0x68),
    e("sll", &[LongOffX], 0x7248),
    e("sll", &[IndY], 0x9078),
    e("sll", &[ShortOffY], 0x9068),
    e("sll", &[LongOffY], 0x9048),
    e("sll", &[ShortOffSp], 0x08),
    e("sll", &[ShortPtrW], 0x9238),
    e("sll", &[LongPtrW], 0x7238),
    e("sll", &[ShortPtrWX], 0x9268),
    e("sll", &[LongPtrWX], 0x7268),
    e("sll", &[ShortPtrWY], 0x9168),

    e("sllw", &[RegX], 0x58),
    e("sllw", &[RegY], 0x9058),

    e("sla", &[RegA], 0x48),
    e("sla", &[ShortMem], 0x38),
    e("sla", &[LongMem], 0x7258),
    e("sla", &[IndX], 0x78),
    e("sla", &[ShortOffX], 0x68),
    e("sla", &[LongOffX], 0x7248),
    e("sla", &[IndY], 0x9078),
    e("sla", &[ShortOffY], 0x9068),
    e("sla", &[LongOffY], 0x9048),
    e("sla", &[ShortOffSp], 0x08),
    e("sla", &[ShortPtrW], 0x9238),
    e("sla", &[LongPtrW], 0x7238),
    e("sla", &[ShortPtrWX], 0x9268),
    e("sla", &[LongPtrWX], 0x7268),
    e("sla", &[ShortPtrWY], 0x9168),

    e("slaw", &[RegX], 0x58),
    e("slaw", &[RegY], 0x9058),

    e("sra", &[RegA], 0x47),
    e("sra", &[ShortMem], 0x37),
    e("sra", &[LongMem], 0x7257),
    e("sra", &[IndX], 0x77),
    e("sra", &[ShortOffX], 0x67),
    e("sra", &[LongOffX], 0x7247),
    e("sra", &[IndY], 0x9077),
    e("sra", &[ShortOffY], 0x9067),
    e("sra", &[LongOffY], 0x9047),
    e("sra", &[ShortOffSp], 0x07),
    e("sra", &[ShortPtrW], 0x9237),
    e("sra", &[LongPtrW], 0x7237),
    e("sra", &[ShortPtrWX], 0x9267),
    e("sra", &[LongPtrWX], 0x7267),
    e("sra", &[ShortPtrWY], 0x9167),

    e("sraw", &[RegX], 0x57),
    e("sraw", &[RegY], 0x9057),

    e("srl", &[RegA], 0x44),
    e("srl", &[ShortMem], 0x34),
    e("srl", &[LongMem], 0x7254),
    e("srl", &[IndX], 0x74),
    e("srl", &[ShortOffX], 0x64),
    e("srl", &[LongOffX], 0x7244),
    e("srl", &[IndY], 0x9074),
    e("srl", &[ShortOffY], 0x9064),
    e("srl", &[LongOffY], 0x9044),
    e("srl", &[ShortOffSp], 0x04),
    e("srl", &[ShortPtrW], 0x9234),
    e("srl", &[LongPtrW], 0x7234),
    e("srl", &[ShortPtrWX], 0x9264),
    e("srl", &[LongPtrWX], 0x7264),
    e("srl", &[ShortPtrWY], 0x9164),

    e("srlw", &[RegX], 0x54),
    e("srlw", &[RegY], 0x9054),

    e("sub", &[RegA, Byte], 0xA0),
    e("sub", &[RegA, ShortMem], 0xB0),
    e("sub", &[RegA, LongMem], 0xC0),
    e("sub", &[RegA, IndX], 0xF0),
    e("sub", &[RegA, ShortOffX], 0xE0),
    e("sub", &[RegA, LongOffX], 0xD0),
    e("sub", &[RegA, IndY], 0x90F0),
    e("sub", &[RegA, ShortOffY], 0x90E0),
    e("sub", &[RegA, LongOffY], 0x90D0),
    e("sub", &[RegA, ShortOffSp], 0x10),
    e("sub", &[RegA, ShortPtrW], 0x92C0),
    e("sub", &[RegA, LongPtrW], 0x72C0),
    e("sub", &[RegA, ShortPtrWX], 0x92D0),
    e("sub", &[RegA, LongPtrWX], 0x72D0),
    e("sub", &[RegA, ShortPtrWY], 0x91D0),
    e("sub", &[RegSp, Byte], 0x52),

    e("subw", &[RegX, Word], 0x1D),
    e("subw", &[RegX, LongMem], 0x72B0),
    e("subw", &[RegX, ShortOffSp], 0x72F0),
    e("subw", &[RegY, Word], 0x72A2),
    e("subw", &[RegY, LongMem], 0x72B2),
    e("subw", &[RegY, ShortOffSp], 0x72F2),

    e("swap", &[RegA], 0x4E),
    e("swap", &[ShortMem], 0x3E),
    e("swap", &[LongMem], 0x725E),
    e("swap", &[IndX], 0x7E),
    e("swap", &[ShortOffX], 0x6E),
    e("swap", &[LongOffX], 0x724E),
    e("swap", &[IndY], 0x907E),
    e("swap", &[ShortOffY], 0x906E),
    e("swap", &[LongOffY], 0x904E),
    e("swap", &[ShortOffSp], 0x0E),
    e("swap", &[ShortPtrW], 0x923E),
    e("swap", &[LongPtrW], 0x723E),
    e("swap", &[ShortPtrWX], 0x926E),
    e("swap", &[LongPtrWX], 0x726E),
    e("swap", &[ShortPtrWY], 0x916E),

    e("swapw", &[RegX], 0x5E),
    e("swapw", &[RegY], 0x905E),

    e("tnz", &[RegA], 0x4D),
    e("tnz", &[ShortMem], 0x3D),
    e("tnz", &[LongMem], 0x725D),
    e("tnz", &[IndX], 0x7D),
    e("tnz", &[ShortOffX], 0x6D),
    e("tnz", &[LongOffX], 0x724D),
    e("tnz", &[IndY], 0x907D),
    e("tnz", &[ShortOffY], 0x906D),
    e("tnz", &[LongOffY], 0x904D),
    e("tnz", &[ShortOffSp], 0x0D),
    e("tnz", &[ShortPtrW], 0x923D),
    e("tnz", &[LongPtrW], 0x723D),
    e("tnz", &[ShortPtrWX], 0x926D),
    e("tnz", &[LongPtrWX], 0x726D),
    e("tnz", &[ShortPtrWY], 0x916D),

    e("tnzw", &[RegX], 0x5D),
    e("tnzw", &[RegY], 0x905D),

    e("trap", &[], 0x83),

    e("wfe", &[], 0x728F),

    e("wfi", &[], 0x8F),

    e("xor", &[RegA, Byte], 0xA8),
    e("xor", &[RegA, ShortMem], 0xB8),
    e("xor", &[RegA, LongMem], 0xC8),
    e("xor", &[RegA, IndX], 0xF8),
    e("xor", &[RegA, ShortOffX], 0xE8),
    e("xor", &[RegA, LongOffX], 0xD8),
    e("xor", &[RegA, IndY], 0x90F8),
    e("xor", &[RegA, ShortOffY], 0x90E8),
    e("xor", &[RegA, LongOffY], 0x90D8),
    e("xor", &[RegA, ShortOffSp], 0x18),
    e("xor", &[RegA, ShortPtrW], 0x92C8),
    e("xor", &[RegA, LongPtrW], 0x72C8),
    e("xor", &[RegA, ShortPtrWX], 0x92D8),
    e("xor", &[RegA, LongPtrWX], 0x72D8),
    e("xor", &[RegA, ShortPtrWY], 0x91D8),
];
