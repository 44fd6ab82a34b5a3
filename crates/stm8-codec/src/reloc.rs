//! Relocation requests produced for symbolic operands, and the routine that
//! patches a resolved value into encoded bytes.
//!
//! Values are stored big-endian. A PC-relative displacement is measured
//! from the end of its own byte, which is also the end of the instruction
//! for every STM8 form that has one.

use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;

use crate::error::{AsmError, Span};
use crate::ir::AddrMode;

/// ELF relocation number: no relocation.
pub const R_STM8_NONE: u32 = 0;
/// ELF relocation number: 8-bit absolute.
pub const R_STM8_8: u32 = 1;
/// ELF relocation number: 16-bit absolute.
pub const R_STM8_16: u32 = 2;
/// ELF relocation number: 24-bit absolute.
pub const R_STM8_24: u32 = 3;
/// ELF relocation number: 32-bit absolute.
pub const R_STM8_32: u32 = 4;
/// ELF relocation number: 8-bit PC-relative.
pub const R_STM8_8_PCREL: u32 = 5;

/// How a resolved value is patched into the instruction bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RelocKind {
    /// One byte, absolute.
    Abs8,
    /// Two bytes, absolute.
    Abs16,
    /// Three bytes, absolute.
    Abs24,
    /// Four bytes, absolute. Not produced by any instruction form; data only.
    Abs32,
    /// One signed byte, relative to the end of the byte.
    PcRel8,
    /// Bit number 0..=7, added as `value * 2` to the opcode byte.
    BitField3,
}

impl RelocKind {
    /// Kind for an operand slot of `mode`, or `None` if the slot carries no
    /// relocatable field.
    pub fn for_mode(mode: AddrMode) -> Option<RelocKind> {
        if mode.bit_index().is_some() {
            return Some(RelocKind::BitField3);
        }
        match (mode, mode.encoding_width()) {
            (AddrMode::PcRel, _) => Some(RelocKind::PcRel8),
            (_, 1) => Some(RelocKind::Abs8),
            (_, 2) => Some(RelocKind::Abs16),
            (_, 3) => Some(RelocKind::Abs24),
            _ => None,
        }
    }

    /// Number of bytes the patch touches.
    pub fn size(self) -> usize {
        match self {
            RelocKind::Abs8 | RelocKind::PcRel8 | RelocKind::BitField3 => 1,
            RelocKind::Abs16 => 2,
            RelocKind::Abs24 => 3,
            RelocKind::Abs32 => 4,
        }
    }

    /// Whether the patched value is relative to the patch location.
    pub fn is_pc_relative(self) -> bool {
        self == RelocKind::PcRel8
    }

    /// The ELF `R_STM8_*` number. Bit fields are always resolved by the
    /// assembler and have none.
    pub fn elf_type(self) -> Option<u32> {
        match self {
            RelocKind::Abs8 => Some(R_STM8_8),
            RelocKind::Abs16 => Some(R_STM8_16),
            RelocKind::Abs24 => Some(R_STM8_24),
            RelocKind::Abs32 => Some(R_STM8_32),
            RelocKind::PcRel8 => Some(R_STM8_8_PCREL),
            RelocKind::BitField3 => None,
        }
    }

    /// Inclusive range of acceptable absolute values.
    fn range(self) -> (i64, i64) {
        match self {
            RelocKind::Abs8 => (0, 0xFF),
            RelocKind::Abs16 => (0, 0xFFFF),
            RelocKind::Abs24 => (0, 0xFF_FFFF),
            RelocKind::Abs32 => (0, 0xFFFF_FFFF),
            RelocKind::PcRel8 => (-128, 127),
            RelocKind::BitField3 => (0, 7),
        }
    }
}

/// Byte window an object-file consumer patches for a relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelocWindow {
    /// Offset of the first byte of the window.
    pub offset: usize,
    /// Window size in bytes.
    pub size: usize,
    /// Bits of the big-endian window that receive the value.
    pub mask: u32,
}

/// A request to patch a symbol's value into encoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relocation {
    /// Offset of the patched field, relative to the start of the bytes the
    /// relocation belongs to.
    pub offset: usize,
    /// How the value is patched.
    pub kind: RelocKind,
    /// Symbol whose value is patched in. Stored as `Rc<str>` so instruction
    /// relocations can be rebased without copying names.
    pub symbol: Rc<str>,
    /// Constant added to the symbol value.
    pub addend: i64,
    /// Source location of the operand.
    pub span: Span,
}

impl Relocation {
    /// Whether the patched value is relative to the patch location.
    pub fn is_pc_relative(&self) -> bool {
        self.kind.is_pc_relative()
    }

    /// Addend as written to an ELF `Rela` record.
    ///
    /// The ELF convention measures PC-relative values from the start of the
    /// field, so the one-byte distance to its end is folded into the addend.
    pub fn elf_addend(&self) -> i64 {
        if self.is_pc_relative() {
            self.addend - 1
        } else {
            self.addend
        }
    }

    /// Window for consumers that store every 24-bit value through a 32-bit
    /// big-endian access: the window starts one byte before the field and
    /// the value occupies its low 24 bits. Storing through this window and
    /// through [`Relocation::apply`] gives identical bytes.
    pub fn legacy_window(&self) -> RelocWindow {
        match self.kind {
            RelocKind::Abs24 => RelocWindow {
                offset: self.offset.saturating_sub(1),
                size: 4,
                mask: 0x00FF_FFFF,
            },
            kind => RelocWindow {
                offset: self.offset,
                size: kind.size(),
                mask: match kind.size() {
                    1 => 0xFF,
                    2 => 0xFFFF,
                    3 => 0x00FF_FFFF,
                    _ => 0xFFFF_FFFF,
                },
            },
        }
    }

    /// Patch `target + addend` into `code`.
    ///
    /// `code_address` is the address of `code[0]`; it only matters for
    /// PC-relative fields.
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::BranchOutOfRange`] for a displacement outside
    /// `-128..=127`, [`AsmError::OutOfRange`] for any other value that does
    /// not fit, and [`AsmError::NoEncoding`] if the field lies outside
    /// `code`. Nothing is written on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use stm8_codec::reloc::{RelocKind, Relocation};
    /// use stm8_codec::Span;
    ///
    /// // jra target, at 0x8000
    /// let mut code = [0x20, 0xAA];
    /// let reloc = Relocation {
    ///     offset: 1,
    ///     kind: RelocKind::PcRel8,
    ///     symbol: "target".into(),
    ///     addend: 0,
    ///     span: Span::dummy(),
    /// };
    /// reloc.apply(&mut code, 0x8000, 0x8010)?;
    /// assert_eq!(code, [0x20, 0x0E]);
    /// # Ok::<(), stm8_codec::AsmError>(())
    /// ```
    pub fn apply(&self, code: &mut [u8], code_address: u32, target: i64) -> Result<(), AsmError> {
        let size = self.kind.size();
        let code_len = code.len();
        let field = code
            .get_mut(self.offset..self.offset + size)
            .ok_or_else(|| AsmError::NoEncoding {
                mnemonic: format!("reloc {}", self.symbol),
                detail: format!(
                    "field {}..{} outside {} code bytes",
                    self.offset,
                    self.offset + size,
                    code_len
                ),
            })?;

        let mut value = target + self.addend;
        if self.is_pc_relative() {
            let end = i64::from(code_address) + self.offset as i64 + 1;
            value -= end;
        }

        let (min, max) = self.kind.range();
        if value < min || value > max {
            return Err(if self.is_pc_relative() {
                AsmError::BranchOutOfRange {
                    symbol: String::from(&*self.symbol),
                    disp: value,
                    max,
                    span: self.span,
                }
            } else {
                AsmError::OutOfRange {
                    value,
                    min,
                    max,
                    span: self.span,
                }
            });
        }

        match self.kind {
            RelocKind::BitField3 => field[0] = field[0].wrapping_add((value as u8) * 2),
            _ => {
                let bytes = (value as u32).to_be_bytes();
                field.copy_from_slice(&bytes[4 - size..]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reloc(kind: RelocKind, offset: usize, addend: i64) -> Relocation {
        Relocation {
            offset,
            kind,
            symbol: Rc::from("sym"),
            addend,
            span: Span::dummy(),
        }
    }

    #[test]
    fn kinds_follow_modes() {
        assert_eq!(RelocKind::for_mode(AddrMode::ShortMem), Some(RelocKind::Abs8));
        assert_eq!(RelocKind::for_mode(AddrMode::Byte), Some(RelocKind::Abs8));
        assert_eq!(RelocKind::for_mode(AddrMode::LongPtrEX), Some(RelocKind::Abs16));
        assert_eq!(RelocKind::for_mode(AddrMode::ExtOffY), Some(RelocKind::Abs24));
        assert_eq!(RelocKind::for_mode(AddrMode::PcRel), Some(RelocKind::PcRel8));
        assert_eq!(RelocKind::for_mode(AddrMode::Bit6), Some(RelocKind::BitField3));
        assert_eq!(RelocKind::for_mode(AddrMode::RegA), None);
        assert_eq!(RelocKind::for_mode(AddrMode::IndX), None);
    }

    #[test]
    fn elf_numbers() {
        assert_eq!(RelocKind::Abs8.elf_type(), Some(1));
        assert_eq!(RelocKind::Abs24.elf_type(), Some(3));
        assert_eq!(RelocKind::PcRel8.elf_type(), Some(5));
        assert_eq!(RelocKind::BitField3.elf_type(), None);
        assert_eq!(reloc(RelocKind::PcRel8, 1, 0).elf_addend(), -1);
        assert_eq!(reloc(RelocKind::Abs16, 1, 4).elf_addend(), 4);
    }

    #[test]
    fn store_24_bits() {
        let mut code = [0xBC, 0xAA, 0xAA, 0xAA];
        reloc(RelocKind::Abs24, 1, 0)
            .apply(&mut code, 0, 0x01_2345)
            .unwrap();
        assert_eq!(code, [0xBC, 0x01, 0x23, 0x45]);
    }

    #[test]
    fn legacy_window_gives_same_bytes() {
        let r = reloc(RelocKind::Abs24, 1, 0);
        let w = r.legacy_window();
        assert_eq!((w.offset, w.size, w.mask), (0, 4, 0x00FF_FFFF));

        let mut code = [0xBC, 0xAA, 0xAA, 0xAA];
        let window = u32::from_be_bytes(code);
        let patched = (window & !w.mask) | (0x01_2345 & w.mask);
        code.copy_from_slice(&patched.to_be_bytes());
        assert_eq!(code, [0xBC, 0x01, 0x23, 0x45]);
    }

    #[test]
    fn pc_relative_range() {
        // Field at 0x8001, so displacement base is 0x8002.
        let r = reloc(RelocKind::PcRel8, 1, 0);
        let mut code = [0x20, 0xAA];
        r.apply(&mut code, 0x8000, 0x8002 + 127).unwrap();
        assert_eq!(code[1], 0x7F);
        r.apply(&mut code, 0x8000, 0x8002 - 128).unwrap();
        assert_eq!(code[1], 0x80);
        let err = r.apply(&mut code, 0x8000, 0x8002 + 128).unwrap_err();
        assert!(matches!(err, AsmError::BranchOutOfRange { disp: 128, .. }));
        assert_eq!(code[1], 0x80);
    }

    #[test]
    fn bit_field_folds_into_opcode() {
        let mut code = [0x72, 0x10, 0x50, 0x00];
        reloc(RelocKind::BitField3, 1, 0).apply(&mut code, 0, 5).unwrap();
        assert_eq!(code, [0x72, 0x1A, 0x50, 0x00]);
        let err = reloc(RelocKind::BitField3, 1, 0).apply(&mut code, 0, 8);
        assert!(matches!(err, Err(AsmError::OutOfRange { value: 8, .. })));
    }

    #[test]
    fn absolute_overflow_is_rejected() {
        let mut code = [0xB6, 0xAA];
        let err = reloc(RelocKind::Abs8, 1, 0).apply(&mut code, 0, 0x100);
        assert!(matches!(err, Err(AsmError::OutOfRange { max: 0xFF, .. })));
        let err = reloc(RelocKind::Abs16, 1, 0).apply(&mut code, 0, 1);
        assert!(matches!(err, Err(AsmError::NoEncoding { .. })));
    }
}
