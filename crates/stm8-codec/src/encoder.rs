//! Instruction encoder: turns a resolved catalog entry and its operands into
//! machine-code bytes plus relocation requests.
//!
//! Layout of every encoding: opcode bytes (big-endian, one or two), then the
//! operand fields in emission order. Bit numbers never occupy a field; they
//! are folded into the low opcode byte.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use tracing::trace;

use crate::catalog::CatalogEntry;
use crate::error::AsmError;
use crate::ir::{AddrMode, Operand, Value};
use crate::reloc::{RelocKind, Relocation};
use crate::resolver::{compatible, resolve};

/// Byte written in place of a field whose value comes from a relocation.
pub const FILLER: u8 = 0xAA;

const CAPACITY: usize = 8;

// ─── InstrBytes: stack-allocated instruction buffer ────────────────────

/// Stack-allocated instruction byte buffer.
///
/// The longest STM8 form is five bytes (prefix, opcode, 24-bit field or
/// two 16-bit fields), so every encoding fits without touching the heap.
#[derive(Clone)]
pub struct InstrBytes {
    data: [u8; CAPACITY],
    len: u8,
}

impl InstrBytes {
    /// Create an empty buffer.
    #[inline]
    pub const fn new() -> Self {
        Self {
            data: [0; CAPACITY],
            len: 0,
        }
    }

    /// Create a buffer pre-filled from a byte slice.
    #[inline]
    pub fn from_slice(src: &[u8]) -> Self {
        let mut buf = Self::new();
        buf.extend_from_slice(src);
        buf
    }

    /// Append a single byte.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is already full.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        assert!(
            (self.len as usize) < CAPACITY,
            "InstrBytes overflow: cannot push beyond {} bytes",
            CAPACITY
        );
        self.data[self.len as usize] = byte;
        self.len += 1;
    }

    /// Append a slice of bytes.
    ///
    /// # Panics
    ///
    /// Panics if appending would exceed the capacity.
    #[inline]
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        let start = self.len as usize;
        let end = start + bytes.len();
        assert!(
            end <= CAPACITY,
            "InstrBytes overflow: {} + {} exceeds {}-byte capacity",
            start,
            bytes.len(),
            CAPACITY
        );
        self.data[start..end].copy_from_slice(bytes);
        self.len = end as u8;
    }

    /// Number of bytes in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Convert to a heap-allocated `Vec<u8>`.
    #[inline]
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_ref().to_vec()
    }
}

impl Default for InstrBytes {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::ops::Deref for InstrBytes {
    type Target = [u8];
    #[inline]
    fn deref(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

impl core::ops::DerefMut for InstrBytes {
    #[inline]
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.len as usize]
    }
}

impl AsRef<[u8]> for InstrBytes {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self
    }
}

impl core::fmt::Debug for InstrBytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl PartialEq for InstrBytes {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

impl Eq for InstrBytes {}

impl PartialEq<[u8]> for InstrBytes {
    fn eq(&self, other: &[u8]) -> bool {
        **self == *other
    }
}

impl PartialEq<Vec<u8>> for InstrBytes {
    fn eq(&self, other: &Vec<u8>) -> bool {
        **self == **other
    }
}

// ─── EncodedInstr ──────────────────────────────────────────

/// Result of encoding a single instruction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedInstr {
    /// The machine code bytes, with [`FILLER`] in relocated fields.
    pub bytes: InstrBytes,
    /// One request per symbolic operand, offsets relative to `bytes[0]`.
    pub relocations: Vec<Relocation>,
    /// Range problems with constant operands. The bytes are still complete
    /// (the value truncated to its field), so later offsets stay valid.
    pub diagnostics: Vec<AsmError>,
}

impl EncodedInstr {
    /// Whether the encoding is final: no relocations and no diagnostics.
    pub fn is_complete(&self) -> bool {
        self.relocations.is_empty() && self.diagnostics.is_empty()
    }
}

// ─── Encoding ───────────────────────────────────────────────────────────────

/// Inclusive range a constant must lie in to fill a `mode` field.
///
/// Immediates may be written signed or unsigned; addresses and offsets are
/// unsigned; a PC-relative displacement is signed.
pub fn const_range(mode: AddrMode) -> (i64, i64) {
    let bits = 8 * mode.encoding_width() as u32;
    if mode == AddrMode::PcRel {
        (-128, 127)
    } else if mode.bit_index().is_some() {
        (0, 7)
    } else if mode.is_immediate() {
        (-(1i64 << (bits - 1)), (1i64 << bits) - 1)
    } else {
        (0, (1i64 << bits) - 1)
    }
}

fn no_encoding(entry: &CatalogEntry, detail: String) -> AsmError {
    AsmError::NoEncoding {
        mnemonic: String::from(entry.mnemonic),
        detail,
    }
}

/// Encode `operands` against a catalog entry.
///
/// The entry is normally the one [`resolve`] picked for the operands.
///
/// # Errors
///
/// Returns [`AsmError::NoEncoding`] when the operands do not fit the entry:
/// wrong count, a missing value, or an operand incompatible with its
/// constraint. Range problems with constants are not errors; they are
/// reported in [`EncodedInstr::diagnostics`].
///
/// # Examples
///
/// ```
/// use stm8_codec::encoder::encode;
/// use stm8_codec::ir::{Operand, Register};
/// use stm8_codec::resolver::resolve;
///
/// let ops = [Operand::register(Register::A), Operand::imm(0x42)];
/// let entry = resolve("ld", &ops)?;
/// let insn = encode(entry, &ops)?;
/// assert_eq!(&*insn.bytes, &[0xA6, 0x42]);
/// # Ok::<(), stm8_codec::AsmError>(())
/// ```
pub fn encode(entry: &CatalogEntry, operands: &[Operand]) -> Result<EncodedInstr, AsmError> {
    if operands.len() != entry.operand_count() {
        return Err(no_encoding(
            entry,
            format!(
                "expected {} operand(s), got {}",
                entry.operand_count(),
                operands.len()
            ),
        ));
    }
    for (i, (mode, op)) in entry.constraints.iter().zip(operands).enumerate() {
        if mode.takes_value() && op.value.is_none() {
            return Err(no_encoding(entry, format!("operand {} has no value", i + 1)));
        }
        if !compatible(op.kind, op.value.as_ref(), *mode) {
            return Err(no_encoding(
                entry,
                format!("operand {} '{}' does not fit {}", i + 1, op, mode),
            ));
        }
    }

    let mut out = EncodedInstr::default();
    let (opcode, width) = entry.opcode_bytes();
    out.bytes.extend_from_slice(&opcode[..width]);
    let low = width - 1;

    for i in entry.emission_order() {
        let mode = entry.constraints[i];
        let op = &operands[i];
        let Some(value) = &op.value else { continue };

        if let Some(bit) = mode.bit_index() {
            match value {
                Value::Const(v) => {
                    if (0..=7).contains(v) {
                        let delta = (*v - i64::from(bit)) as u8;
                        out.bytes[low] = out.bytes[low].wrapping_add(delta.wrapping_mul(2));
                    } else {
                        out.diagnostics.push(AsmError::OutOfRange {
                            value: *v,
                            min: 0,
                            max: 7,
                            span: op.span,
                        });
                    }
                }
                Value::Symbol(sym) => out.relocations.push(Relocation {
                    offset: low,
                    kind: RelocKind::BitField3,
                    symbol: sym.name.clone(),
                    addend: sym.addend,
                    span: op.span,
                }),
            }
            continue;
        }

        let field = mode.encoding_width();
        if field == 0 {
            continue;
        }
        match value {
            Value::Const(v) => {
                let (min, max) = const_range(mode);
                if *v < min || *v > max {
                    out.diagnostics.push(AsmError::OutOfRange {
                        value: *v,
                        min,
                        max,
                        span: op.span,
                    });
                }
                let be = (*v as u32).to_be_bytes();
                out.bytes.extend_from_slice(&be[4 - field..]);
            }
            Value::Symbol(sym) => {
                let Some(kind) = RelocKind::for_mode(mode) else {
                    return Err(no_encoding(entry, format!("{} cannot be relocated", mode)));
                };
                out.relocations.push(Relocation {
                    offset: out.bytes.len(),
                    kind,
                    symbol: sym.name.clone(),
                    addend: sym.addend,
                    span: op.span,
                });
                for _ in 0..field {
                    out.bytes.push(FILLER);
                }
            }
        }
    }

    debug_assert_eq!(out.bytes.len(), entry.len());
    trace!(
        mnemonic = entry.mnemonic,
        opcode = entry.opcode,
        len = out.bytes.len(),
        relocations = out.relocations.len(),
        "encoded"
    );
    Ok(out)
}

/// Resolve and encode in one step.
///
/// # Errors
///
/// Returns the resolver's [`AsmError::UnknownMnemonic`] or
/// [`AsmError::NoMatch`], or an [`AsmError::NoEncoding`] from [`encode`].
pub fn encode_mnemonic(mnemonic: &str, operands: &[Operand]) -> Result<EncodedInstr, AsmError> {
    let entry = resolve(mnemonic, operands)?;
    encode(entry, operands)
}
