//! Intermediate representation shared by the catalog, resolver, encoder and
//! decoder.
//!
//! [`AddrMode`] names the concrete encoding slot a catalog entry expects;
//! [`Operand`] is what the front end hands in: a coarse syntactic category
//! plus an optional value. The resolver bridges the two.

use alloc::rc::Rc;
#[allow(unused_imports)]
use alloc::string::String;
use core::fmt;

use crate::error::Span;

// ─── Registers ──────────────────────────────────────────────────────────────

/// STM8 CPU register as it appears in operand text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Register {
    /// Accumulator.
    A,
    /// 16-bit index register X.
    X,
    /// 16-bit index register Y.
    Y,
    /// Stack pointer.
    Sp,
    /// Condition code register.
    Cc,
    /// Low byte of X.
    Xl,
    /// High byte of X.
    Xh,
    /// Low byte of Y.
    Yl,
    /// High byte of Y.
    Yh,
}

impl Register {
    /// Every register, in catalog order.
    pub const ALL: [Register; 9] = [
        Register::A,
        Register::X,
        Register::Y,
        Register::Sp,
        Register::Cc,
        Register::Xl,
        Register::Xh,
        Register::Yl,
        Register::Yh,
    ];

    /// Canonical upper-case name.
    pub fn name(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::X => "X",
            Register::Y => "Y",
            Register::Sp => "SP",
            Register::Cc => "CC",
            Register::Xl => "XL",
            Register::Xh => "XH",
            Register::Yl => "YL",
            Register::Yh => "YH",
        }
    }

    /// Look a register up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Register> {
        Register::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }

    /// The addressing mode that names exactly this register.
    pub fn addr_mode(self) -> AddrMode {
        match self {
            Register::A => AddrMode::RegA,
            Register::X => AddrMode::RegX,
            Register::Y => AddrMode::RegY,
            Register::Sp => AddrMode::RegSp,
            Register::Cc => AddrMode::RegCc,
            Register::Xl => AddrMode::RegXl,
            Register::Xh => AddrMode::RegXh,
            Register::Yl => AddrMode::RegYl,
            Register::Yh => AddrMode::RegYh,
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Addressing modes ───────────────────────────────────────────────────────

/// Concrete operand slot of a catalog entry.
///
/// The encoded width of every mode is fixed; see [`AddrMode::encoding_width`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddrMode {
    /// Bit number 0, folded into the opcode.
    Bit0,
    /// Bit number 1.
    Bit1,
    /// Bit number 2.
    Bit2,
    /// Bit number 3.
    Bit3,
    /// Bit number 4.
    Bit4,
    /// Bit number 5.
    Bit5,
    /// Bit number 6.
    Bit6,
    /// Bit number 7.
    Bit7,
    /// Signed 8-bit displacement from the end of the instruction.
    PcRel,
    /// `CC`
    RegCc,
    /// `A`
    RegA,
    /// `X`
    RegX,
    /// `Y`
    RegY,
    /// `SP`
    RegSp,
    /// `XL`
    RegXl,
    /// `XH`
    RegXh,
    /// `YL`
    RegYl,
    /// `YH`
    RegYh,
    /// `#imm8`
    Byte,
    /// `#imm16`
    Word,
    /// 8-bit direct address.
    ShortMem,
    /// 16-bit direct address.
    LongMem,
    /// 24-bit direct address.
    ExtMem,
    /// `(X)`
    IndX,
    /// `(Y)`
    IndY,
    /// `(off8,X)`
    ShortOffX,
    /// `(off16,X)`
    LongOffX,
    /// `(off24,X)`
    ExtOffX,
    /// `(off8,Y)`
    ShortOffY,
    /// `(off16,Y)`
    LongOffY,
    /// `(off24,Y)`
    ExtOffY,
    /// `(off8,SP)`
    ShortOffSp,
    /// `[ptr8]`, a word pointer in page zero.
    ShortPtrW,
    /// `[ptr16.w]`
    LongPtrW,
    /// `([ptr8],X)`
    ShortPtrWX,
    /// `([ptr16.w],X)`
    LongPtrWX,
    /// `([ptr8],Y)`
    ShortPtrWY,
    /// `([ptr16.w],Y)`
    LongPtrWY,
    /// `[ptr16.e]`, a 16-bit address of a 24-bit pointer cell.
    LongPtrE,
    /// `([ptr16.e],X)`
    LongPtrEX,
    /// `([ptr16.e],Y)`
    LongPtrEY,
}

impl AddrMode {
    /// Every addressing mode, in declaration order.
    pub const ALL: [AddrMode; 41] = [
        AddrMode::Bit0,
        AddrMode::Bit1,
        AddrMode::Bit2,
        AddrMode::Bit3,
        AddrMode::Bit4,
        AddrMode::Bit5,
        AddrMode::Bit6,
        AddrMode::Bit7,
        AddrMode::PcRel,
        AddrMode::RegCc,
        AddrMode::RegA,
        AddrMode::RegX,
        AddrMode::RegY,
        AddrMode::RegSp,
        AddrMode::RegXl,
        AddrMode::RegXh,
        AddrMode::RegYl,
        AddrMode::RegYh,
        AddrMode::Byte,
        AddrMode::Word,
        AddrMode::ShortMem,
        AddrMode::LongMem,
        AddrMode::ExtMem,
        AddrMode::IndX,
        AddrMode::IndY,
        AddrMode::ShortOffX,
        AddrMode::LongOffX,
        AddrMode::ExtOffX,
        AddrMode::ShortOffY,
        AddrMode::LongOffY,
        AddrMode::ExtOffY,
        AddrMode::ShortOffSp,
        AddrMode::ShortPtrW,
        AddrMode::LongPtrW,
        AddrMode::ShortPtrWX,
        AddrMode::LongPtrWX,
        AddrMode::ShortPtrWY,
        AddrMode::LongPtrWY,
        AddrMode::LongPtrE,
        AddrMode::LongPtrEX,
        AddrMode::LongPtrEY,
    ];

    /// Number of operand bytes this mode occupies after the opcode.
    ///
    /// The far-pointer modes hold the 16-bit address of a 24-bit pointer
    /// cell, so they are two bytes wide.
    pub const fn encoding_width(self) -> usize {
        use AddrMode::*;
        match self {
            Bit0 | Bit1 | Bit2 | Bit3 | Bit4 | Bit5 | Bit6 | Bit7 => 0,
            RegCc | RegA | RegX | RegY | RegSp | RegXl | RegXh | RegYl | RegYh => 0,
            IndX | IndY => 0,
            PcRel | Byte | ShortMem | ShortOffX | ShortOffY | ShortOffSp | ShortPtrW
            | ShortPtrWX | ShortPtrWY => 1,
            Word | LongMem | LongOffX | LongOffY | LongPtrW | LongPtrWX | LongPtrWY
            | LongPtrE | LongPtrEX | LongPtrEY => 2,
            ExtMem | ExtOffX | ExtOffY => 3,
        }
    }

    /// Bit number for the `Bit0..=Bit7` modes.
    pub const fn bit_index(self) -> Option<u8> {
        match self {
            AddrMode::Bit0 => Some(0),
            AddrMode::Bit1 => Some(1),
            AddrMode::Bit2 => Some(2),
            AddrMode::Bit3 => Some(3),
            AddrMode::Bit4 => Some(4),
            AddrMode::Bit5 => Some(5),
            AddrMode::Bit6 => Some(6),
            AddrMode::Bit7 => Some(7),
            _ => None,
        }
    }

    /// Register named by this mode, if it is a register mode.
    pub fn register(self) -> Option<Register> {
        Register::ALL.iter().copied().find(|r| r.addr_mode() == self)
    }

    /// Whether an operand in this slot carries a value (address, offset,
    /// immediate or bit number).
    pub fn takes_value(self) -> bool {
        self.encoding_width() > 0 || self.bit_index().is_some()
    }

    /// Whether the immediate field is an immediate (as opposed to an address).
    pub const fn is_immediate(self) -> bool {
        matches!(self, AddrMode::Byte | AddrMode::Word)
    }
}

impl fmt::Display for AddrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AddrMode::*;
        let s = match self {
            Bit0 => "bit0",
            Bit1 => "bit1",
            Bit2 => "bit2",
            Bit3 => "bit3",
            Bit4 => "bit4",
            Bit5 => "bit5",
            Bit6 => "bit6",
            Bit7 => "bit7",
            PcRel => "pcrel",
            RegCc => "CC",
            RegA => "A",
            RegX => "X",
            RegY => "Y",
            RegSp => "SP",
            RegXl => "XL",
            RegXh => "XH",
            RegYl => "YL",
            RegYh => "YH",
            Byte => "#byte",
            Word => "#word",
            ShortMem => "shortmem",
            LongMem => "longmem",
            ExtMem => "extmem",
            IndX => "(X)",
            IndY => "(Y)",
            ShortOffX => "(shortoff,X)",
            LongOffX => "(longoff,X)",
            ExtOffX => "(extoff,X)",
            ShortOffY => "(shortoff,Y)",
            LongOffY => "(longoff,Y)",
            ExtOffY => "(extoff,Y)",
            ShortOffSp => "(shortoff,SP)",
            ShortPtrW => "[shortptr.w]",
            LongPtrW => "[longptr.w]",
            ShortPtrWX => "([shortptr.w],X)",
            LongPtrWX => "([longptr.w],X)",
            ShortPtrWY => "([shortptr.w],Y)",
            LongPtrWY => "([longptr.w],Y)",
            LongPtrE => "[longptr.e]",
            LongPtrEX => "([longptr.e],X)",
            LongPtrEY => "([longptr.e],Y)",
        };
        f.write_str(s)
    }
}

// ─── Operand values ─────────────────────────────────────────────────────────

/// Reference to a symbol whose value is not known at encode time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolRef {
    /// Symbol name.
    pub name: Rc<str>,
    /// Constant added to the symbol value.
    pub addend: i64,
    /// Set by an explicit `.s`/`.short` suffix: the symbol lives in page zero.
    pub short: bool,
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        match self.addend {
            0 => Ok(()),
            a if a > 0 => write!(f, "+{}", a),
            a => write!(f, "-{}", a.unsigned_abs()),
        }
    }
}

/// Value carried by an operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    /// Known at encode time.
    Const(i64),
    /// Resolved later through a relocation.
    Symbol(SymbolRef),
}

impl Value {
    /// A plain symbol reference with no addend.
    pub fn symbol(name: &str) -> Value {
        Value::Symbol(SymbolRef {
            name: Rc::from(name),
            addend: 0,
            short: false,
        })
    }

    /// A symbol reference marked as living in page zero.
    pub fn short_symbol(name: &str) -> Value {
        Value::Symbol(SymbolRef {
            name: Rc::from(name),
            addend: 0,
            short: true,
        })
    }

    /// The constant, if this value is one.
    pub fn as_const(&self) -> Option<i64> {
        match self {
            Value::Const(v) => Some(*v),
            Value::Symbol(_) => None,
        }
    }

    /// Whether the value may be encoded in an 8-bit address field: a
    /// constant in `0..0x100`, or a symbol explicitly marked short.
    pub fn fits8(&self) -> bool {
        match self {
            Value::Const(v) => (0..0x100).contains(v),
            Value::Symbol(s) => s.short,
        }
    }

    fn is_short_symbol(&self) -> bool {
        matches!(self, Value::Symbol(s) if s.short)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Const(v) if *v < 0 => write!(f, "-0x{:x}", v.unsigned_abs()),
            Value::Const(v) => write!(f, "0x{:x}", v),
            Value::Symbol(s) => write!(f, "{}", s),
        }
    }
}

// ─── Operand descriptors ────────────────────────────────────────────────────

/// Syntactic category of an operand, as classified from source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OperandKind {
    /// `#expr`
    Immediate,
    /// `expr`
    DirectMemory,
    /// `expr.s`
    ShortDirectMemory,
    /// `(X)`
    IndexedX,
    /// `(Y)`
    IndexedY,
    /// `(expr,X)`
    OffsetX,
    /// `(expr,Y)`
    OffsetY,
    /// `(expr,SP)`
    OffsetSp,
    /// `[expr]` or `[expr.w]`
    PointerNear,
    /// `([expr],X)`
    PointerNearX,
    /// `([expr],Y)`
    PointerNearY,
    /// `[expr.e]`
    PointerFar,
    /// `([expr.e],X)`
    PointerFarX,
    /// `([expr.e],Y)`
    PointerFarY,
    /// A register name.
    Register(Register),
    /// Text that could not be classified. Matches nothing.
    Illegal,
}

impl OperandKind {
    /// Whether operands of this category carry a value.
    pub fn takes_value(self) -> bool {
        !matches!(
            self,
            OperandKind::IndexedX
                | OperandKind::IndexedY
                | OperandKind::Register(_)
                | OperandKind::Illegal
        )
    }
}

/// One classified operand: category, optional value and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Operand {
    /// Syntactic category.
    pub kind: OperandKind,
    /// Value, present for every value-carrying category.
    pub value: Option<Value>,
    /// Where the operand came from.
    pub span: Span,
}

impl Operand {
    /// Build an operand with a value.
    pub fn new(kind: OperandKind, value: Value) -> Operand {
        Operand {
            kind,
            value: Some(value),
            span: Span::dummy(),
        }
    }

    /// A register operand.
    pub fn register(reg: Register) -> Operand {
        Operand {
            kind: OperandKind::Register(reg),
            value: None,
            span: Span::dummy(),
        }
    }

    /// `#value`
    pub fn imm(value: i64) -> Operand {
        Operand::new(OperandKind::Immediate, Value::Const(value))
    }

    /// A direct memory reference to a constant address.
    pub fn mem(addr: i64) -> Operand {
        Operand::new(OperandKind::DirectMemory, Value::Const(addr))
    }

    /// A direct memory reference to a symbol.
    pub fn sym(name: &str) -> Operand {
        Operand::new(OperandKind::DirectMemory, Value::symbol(name))
    }

    /// `(X)` or `(Y)`; any other register yields an [`OperandKind::Illegal`].
    pub fn indexed(reg: Register) -> Operand {
        let kind = match reg {
            Register::X => OperandKind::IndexedX,
            Register::Y => OperandKind::IndexedY,
            _ => OperandKind::Illegal,
        };
        Operand {
            kind,
            value: None,
            span: Span::dummy(),
        }
    }

    /// An operand matching nothing.
    pub fn illegal() -> Operand {
        Operand {
            kind: OperandKind::Illegal,
            value: None,
            span: Span::dummy(),
        }
    }

    /// Attach a source location.
    pub fn with_span(mut self, span: Span) -> Operand {
        self.span = span;
        self
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = &self.value else {
            return match self.kind {
                OperandKind::IndexedX => f.write_str("(X)"),
                OperandKind::IndexedY => f.write_str("(Y)"),
                OperandKind::Register(r) => write!(f, "{}", r),
                _ => f.write_str("?"),
            };
        };
        let s = if value.is_short_symbol() { ".s" } else { "" };
        match self.kind {
            OperandKind::Immediate => write!(f, "#{}", value),
            OperandKind::DirectMemory => write!(f, "{}{}", value, s),
            OperandKind::ShortDirectMemory => write!(f, "{}.s", value),
            OperandKind::OffsetX => write!(f, "({}{},X)", value, s),
            OperandKind::OffsetY => write!(f, "({}{},Y)", value, s),
            OperandKind::OffsetSp => write!(f, "({},SP)", value),
            OperandKind::PointerNear => write!(f, "[{}{}]", value, s),
            OperandKind::PointerNearX => write!(f, "([{}{}],X)", value, s),
            OperandKind::PointerNearY => write!(f, "([{}{}],Y)", value, s),
            OperandKind::PointerFar => write!(f, "[{}.e]", value),
            OperandKind::PointerFarX => write!(f, "([{}.e],X)", value),
            OperandKind::PointerFarY => write!(f, "([{}.e],Y)", value),
            OperandKind::IndexedX => f.write_str("(X)"),
            OperandKind::IndexedY => f.write_str("(Y)"),
            OperandKind::Register(r) => write!(f, "{}", r),
            OperandKind::Illegal => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn widths_are_fixed_per_mode() {
        assert_eq!(AddrMode::Bit3.encoding_width(), 0);
        assert_eq!(AddrMode::RegA.encoding_width(), 0);
        assert_eq!(AddrMode::IndY.encoding_width(), 0);
        assert_eq!(AddrMode::PcRel.encoding_width(), 1);
        assert_eq!(AddrMode::ShortOffSp.encoding_width(), 1);
        assert_eq!(AddrMode::Word.encoding_width(), 2);
        assert_eq!(AddrMode::LongPtrEX.encoding_width(), 2);
        assert_eq!(AddrMode::ExtOffY.encoding_width(), 3);
    }

    #[test]
    fn all_modes_are_listed_once() {
        let mut sorted = AddrMode::ALL.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), AddrMode::ALL.len());
    }

    #[test]
    fn register_modes_round_trip() {
        for reg in Register::ALL {
            assert_eq!(reg.addr_mode().register(), Some(reg));
            assert_eq!(Register::from_name(&reg.name().to_lowercase()), Some(reg));
        }
        assert_eq!(AddrMode::Byte.register(), None);
        assert_eq!(Register::from_name("Z"), None);
    }

    #[test]
    fn bit_indices() {
        assert_eq!(AddrMode::Bit0.bit_index(), Some(0));
        assert_eq!(AddrMode::Bit7.bit_index(), Some(7));
        assert_eq!(AddrMode::PcRel.bit_index(), None);
        assert!(AddrMode::Bit4.takes_value());
        assert!(!AddrMode::RegX.takes_value());
    }

    #[test]
    fn fits8_boundaries() {
        assert!(Value::Const(0).fits8());
        assert!(Value::Const(0xFF).fits8());
        assert!(!Value::Const(0x100).fits8());
        assert!(!Value::Const(-1).fits8());
        assert!(!Value::symbol("x").fits8());
        assert!(Value::short_symbol("x").fits8());
    }

    #[test]
    fn operand_display() {
        assert_eq!(Operand::imm(0x12).to_string(), "#0x12");
        assert_eq!(Operand::mem(-3).to_string(), "-0x3");
        assert_eq!(Operand::register(Register::Sp).to_string(), "SP");
        assert_eq!(Operand::indexed(Register::Y).to_string(), "(Y)");
        assert_eq!(
            Operand::new(OperandKind::OffsetX, Value::short_symbol("tbl")).to_string(),
            "(tbl.s,X)"
        );
        assert_eq!(
            Operand::new(OperandKind::PointerFarY, Value::Const(0x1234)).to_string(),
            "([0x1234.e],Y)"
        );
        let sym = Value::Symbol(SymbolRef {
            name: Rc::from("buf"),
            addend: -2,
            short: false,
        });
        assert_eq!(Operand::new(OperandKind::OffsetSp, sym).to_string(), "(buf-2,SP)");
    }
}
