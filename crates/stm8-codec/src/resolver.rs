//! Addressing-mode resolution: picks the catalog entry an instruction
//! encodes to.
//!
//! Resolution is a first-match scan over the overloads of a mnemonic in
//! declaration order. Short forms are listed before their long and extended
//! counterparts, so a value that fits eight bits lands on the short form
//! and everything else falls through to a wider one.

use alloc::string::String;

use tracing::debug;

use crate::catalog::{CatalogEntry, OPCODES};
use crate::error::{AsmError, Span};
use crate::ir::{AddrMode, Operand, OperandKind, Value};

/// Whether an operand of category `kind` carrying `value` may fill a slot
/// constrained to `mode`.
///
/// Total over all inputs; a missing value behaves like a symbolic one.
pub fn compatible(kind: OperandKind, value: Option<&Value>, mode: AddrMode) -> bool {
    use AddrMode::*;
    let fits8 = value.is_some_and(Value::fits8);
    match kind {
        OperandKind::Register(reg) => reg.addr_mode() == mode,
        OperandKind::Immediate => match mode {
            Byte | Word | Bit0 => true,
            _ => match (mode.bit_index(), value.and_then(Value::as_const)) {
                (Some(n), Some(v)) => v == i64::from(n),
                _ => false,
            },
        },
        OperandKind::IndexedX => mode == IndX,
        OperandKind::IndexedY => mode == IndY,
        OperandKind::OffsetX => match mode {
            ShortOffX => fits8,
            LongOffX | ExtOffX => true,
            _ => false,
        },
        OperandKind::OffsetY => match mode {
            ShortOffY => fits8,
            LongOffY | ExtOffY => true,
            _ => false,
        },
        // There is no wide SP-relative form; a symbol may still be short.
        OperandKind::OffsetSp => {
            mode == ShortOffSp && !matches!(value, Some(Value::Const(v)) if *v >= 0x100)
        }
        OperandKind::PointerNear => match mode {
            ShortPtrW => fits8,
            LongPtrW => true,
            _ => false,
        },
        OperandKind::PointerNearX => match mode {
            ShortPtrWX => fits8,
            LongPtrWX => true,
            _ => false,
        },
        OperandKind::PointerNearY => match mode {
            ShortPtrWY => fits8,
            LongPtrWY => true,
            _ => false,
        },
        OperandKind::PointerFar => mode == LongPtrE,
        OperandKind::PointerFarX => mode == LongPtrEX,
        OperandKind::PointerFarY => mode == LongPtrEY,
        OperandKind::DirectMemory => matches!(mode, PcRel | ExtMem | LongMem),
        OperandKind::ShortDirectMemory => mode == ShortMem,
        OperandKind::Illegal => false,
    }
}

/// Whether every operand is compatible with the matching constraint of
/// `entry` and the operand counts agree.
pub fn matches(entry: &CatalogEntry, operands: &[Operand]) -> bool {
    entry.operand_count() == operands.len()
        && entry
            .constraints
            .iter()
            .zip(operands)
            .all(|(mode, op)| compatible(op.kind, op.value.as_ref(), *mode))
}

/// Find the first catalog entry for `mnemonic` that accepts `operands`.
///
/// The mnemonic is matched ignoring ASCII case.
///
/// # Errors
///
/// Returns [`AsmError::UnknownMnemonic`] if the mnemonic has no entries at
/// all, and [`AsmError::NoMatch`] if none of its entries accepts the
/// operands.
///
/// # Examples
///
/// ```
/// use stm8_codec::ir::{Operand, OperandKind, Register, Value};
/// use stm8_codec::resolver::resolve;
///
/// let short = [
///     Operand::register(Register::A),
///     Operand::new(OperandKind::OffsetX, Value::Const(0x50)),
/// ];
/// assert_eq!(resolve("ld", &short)?.opcode, 0xE6);
///
/// let long = [
///     Operand::register(Register::A),
///     Operand::new(OperandKind::OffsetX, Value::Const(0x150)),
/// ];
/// assert_eq!(resolve("ld", &long)?.opcode, 0xD6);
/// # Ok::<(), stm8_codec::AsmError>(())
/// ```
pub fn resolve(mnemonic: &str, operands: &[Operand]) -> Result<&'static CatalogEntry, AsmError> {
    select(
        mnemonic,
        OPCODES
            .iter()
            .filter(|e| e.mnemonic.eq_ignore_ascii_case(mnemonic)),
        operands,
    )
}

/// Shared first-match core over an ordered candidate list.
pub(crate) fn select<I>(
    mnemonic: &str,
    candidates: I,
    operands: &[Operand],
) -> Result<&'static CatalogEntry, AsmError>
where
    I: IntoIterator<Item = &'static CatalogEntry>,
{
    let mut seen = false;
    for entry in candidates {
        seen = true;
        if matches(entry, operands) {
            debug!(mnemonic, opcode = entry.opcode, form = %entry, "resolved");
            return Ok(entry);
        }
    }
    let span = operands.first().map_or_else(Span::dummy, |op| op.span);
    if !seen {
        return Err(AsmError::UnknownMnemonic {
            mnemonic: String::from(mnemonic),
            span,
        });
    }
    Err(AsmError::NoMatch {
        mnemonic: String::from(mnemonic),
        operands: render_operands(operands),
        span,
    })
}

fn render_operands(operands: &[Operand]) -> String {
    use core::fmt::Write;
    let mut out = String::new();
    for (i, op) in operands.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", op);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::ir::Register;

    fn op(kind: OperandKind, v: i64) -> Operand {
        Operand::new(kind, Value::Const(v))
    }

    #[test]
    fn registers_match_only_themselves() {
        let a = OperandKind::Register(Register::A);
        assert!(compatible(a, None, AddrMode::RegA));
        assert!(!compatible(a, None, AddrMode::RegX));
        assert!(!compatible(a, None, AddrMode::Byte));
    }

    #[test]
    fn immediate_slots() {
        let five = Value::Const(5);
        let k = OperandKind::Immediate;
        assert!(compatible(k, Some(&five), AddrMode::Byte));
        assert!(compatible(k, Some(&five), AddrMode::Word));
        assert!(compatible(k, Some(&five), AddrMode::Bit0));
        assert!(compatible(k, Some(&five), AddrMode::Bit5));
        assert!(!compatible(k, Some(&five), AddrMode::Bit4));
        assert!(!compatible(k, Some(&Value::symbol("n")), AddrMode::Bit3));
        assert!(!compatible(k, Some(&five), AddrMode::ShortMem));
    }

    #[test]
    fn offset_width_selection() {
        let k = OperandKind::OffsetX;
        assert!(compatible(k, Some(&Value::Const(0xFF)), AddrMode::ShortOffX));
        assert!(!compatible(k, Some(&Value::Const(0x100)), AddrMode::ShortOffX));
        assert!(compatible(k, Some(&Value::Const(0x100)), AddrMode::LongOffX));
        assert!(compatible(k, Some(&Value::Const(1)), AddrMode::ExtOffX));
        assert!(!compatible(k, Some(&Value::symbol("t")), AddrMode::ShortOffX));
        assert!(compatible(k, Some(&Value::short_symbol("t")), AddrMode::ShortOffX));
        assert!(!compatible(k, Some(&Value::Const(1)), AddrMode::ShortOffY));
    }

    #[test]
    fn sp_offsets_have_no_wide_form() {
        let k = OperandKind::OffsetSp;
        assert!(compatible(k, Some(&Value::Const(3)), AddrMode::ShortOffSp));
        assert!(compatible(k, Some(&Value::symbol("local")), AddrMode::ShortOffSp));
        assert!(!compatible(k, Some(&Value::Const(0x100)), AddrMode::ShortOffSp));
    }

    #[test]
    fn direct_memory_never_picks_short() {
        let k = OperandKind::DirectMemory;
        let v = Value::Const(0x10);
        assert!(!compatible(k, Some(&v), AddrMode::ShortMem));
        assert!(compatible(k, Some(&v), AddrMode::LongMem));
        assert!(compatible(k, Some(&v), AddrMode::ExtMem));
        assert!(compatible(k, Some(&v), AddrMode::PcRel));
        assert!(compatible(OperandKind::ShortDirectMemory, Some(&v), AddrMode::ShortMem));
        assert!(!compatible(OperandKind::ShortDirectMemory, Some(&v), AddrMode::LongMem));
    }

    #[test]
    fn illegal_matches_nothing() {
        for mode in AddrMode::ALL {
            assert!(!compatible(OperandKind::Illegal, None, mode));
        }
    }

    #[test]
    fn first_match_wins() {
        let a = Operand::register(Register::A);
        let opcode = |ops: &[Operand]| resolve("ld", ops).map(|e| e.opcode);
        assert_eq!(opcode(&[a.clone(), op(OperandKind::OffsetX, 0x50)]), Ok(0xE6));
        assert_eq!(opcode(&[a.clone(), op(OperandKind::OffsetX, 0x150)]), Ok(0xD6));
        let sym = Operand::new(OperandKind::OffsetX, Value::symbol("tbl"));
        assert_eq!(resolve("ld", &[a, sym]).map(|e| e.opcode), Ok(0xD6));
    }

    #[test]
    fn mnemonic_case_is_ignored() {
        assert_eq!(resolve("NOP", &[]).map(|e| e.opcode), Ok(0x9D));
    }

    #[test]
    fn unknown_and_no_match() {
        assert!(matches!(
            resolve("frob", &[]),
            Err(AsmError::UnknownMnemonic { .. })
        ));
        let err = resolve("nop", &[Operand::register(Register::A)]).unwrap_err();
        match err {
            AsmError::NoMatch { operands, .. } => assert_eq!(operands, "A"),
            other => panic!("expected NoMatch, got {:?}", other),
        }
    }

    #[test]
    fn index_agrees_with_scan() {
        let cat = Catalog::new();
        let cases: [(&str, alloc::vec::Vec<Operand>); 4] = [
            ("jra", alloc::vec![Operand::mem(4)]),
            ("bset", alloc::vec![Operand::mem(0x5000), Operand::imm(3)]),
            ("ldw", alloc::vec![Operand::register(Register::X), Operand::register(Register::Sp)]),
            ("ld", alloc::vec![Operand::register(Register::A), Operand::register(Register::Cc)]),
        ];
        for (mn, ops) in cases {
            assert_eq!(cat.resolve(mn, &ops), resolve(mn, &ops), "{}", mn);
        }
    }
}
