//! Prefix-aware STM8 decoder.
//!
//! Decoding reads one byte, and a second one if the first is a prefix,
//! looks the opcode key up in the catalog, then reads and renders the
//! operand fields. Keys with no catalog entry decode to raw `.byte` /
//! `.word` data instead of failing.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};

use crate::catalog::CatalogEntry;
use crate::error::AsmError;
use crate::ir::AddrMode;

/// Prefix selecting the Y-register variant of an X instruction.
pub const PDY: u8 = 0x90;
/// Prefix selecting short-pointer-indirect Y addressing.
pub const PIY: u8 = 0x91;
/// Prefix selecting short-pointer-indirect X addressing.
pub const PIX: u8 = 0x92;
/// Prefix of the secondary opcode page (bit operations, long pointers, wide SP forms).
pub const PWSP: u8 = 0x72;

/// All prefix bytes.
pub const PREFIXES: [u8; 4] = [PWSP, PDY, PIY, PIX];

/// Whether `byte` starts a two-byte opcode.
pub fn is_prefix(byte: u8) -> bool {
    PREFIXES.contains(&byte)
}

// ─── Collaborators ──────────────────────────────────────────────────────────

/// Supplies instruction bytes to the decoder.
pub trait ByteSource {
    /// Fill `buf` with the bytes at `address..address + buf.len()`.
    /// Returns `false` if any of them is unavailable.
    fn fetch(&mut self, address: u32, buf: &mut [u8]) -> bool;
}

impl<F> ByteSource for F
where
    F: FnMut(u32, &mut [u8]) -> bool,
{
    fn fetch(&mut self, address: u32, buf: &mut [u8]) -> bool {
        self(address, buf)
    }
}

/// A byte slice mapped at a base address.
#[derive(Debug, Clone, Copy)]
pub struct Memory<'a> {
    base: u32,
    bytes: &'a [u8],
}

impl<'a> Memory<'a> {
    /// Map `bytes` so that `bytes[0]` lives at `base`.
    pub fn new(base: u32, bytes: &'a [u8]) -> Self {
        Self { base, bytes }
    }

    /// Address one past the last mapped byte.
    pub fn end(&self) -> u64 {
        u64::from(self.base) + self.bytes.len() as u64
    }
}

impl ByteSource for Memory<'_> {
    fn fetch(&mut self, address: u32, buf: &mut [u8]) -> bool {
        let start = address.wrapping_sub(self.base) as usize;
        let Some(end) = start.checked_add(buf.len()) else {
            return false;
        };
        match self.bytes.get(start..end) {
            Some(src) => {
                buf.copy_from_slice(src);
                true
            }
            None => false,
        }
    }
}

/// Maps addresses to symbol names for operand rendering.
pub trait Symbolizer {
    /// Name of the symbol at `address`, if there is one.
    fn symbol(&self, address: u32) -> Option<String>;
}

impl<F> Symbolizer for F
where
    F: Fn(u32) -> Option<String>,
{
    fn symbol(&self, address: u32) -> Option<String> {
        self(address)
    }
}

/// A symbolizer that knows no symbols.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSymbols;

impl Symbolizer for NoSymbols {
    fn symbol(&self, _address: u32) -> Option<String> {
        None
    }
}

// ─── Decoded instructions ───────────────────────────────────────────────────

/// Absolute target of a relative branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Target address, wrapped to 24 bits.
    pub address: u32,
    /// Symbol at the target, if the symbolizer knows one.
    pub symbol: Option<String>,
}

/// One decoded instruction, or one unit of undecodable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstr {
    /// Address of the first byte.
    pub address: u32,
    /// Opcode key: one byte, or prefix and opcode.
    pub opcode: u16,
    /// Mnemonic; `.byte` or `.word` for unknown opcodes.
    pub mnemonic: &'static str,
    /// Rendered operands in syntactic order.
    pub operands: Vec<String>,
    /// The bytes consumed.
    pub bytes: Vec<u8>,
    /// Branch target for PC-relative forms.
    pub target: Option<Annotation>,
    /// The catalog entry, `None` for unknown opcodes.
    pub entry: Option<&'static CatalogEntry>,
    /// Trailing bytes of a sweep that end inside an instruction.
    pub truncated: bool,
}

impl DecodedInstr {
    /// The leftover `tail` of a sweep, rendered as `.byte` data.
    fn truncated(address: u32, tail: &[u8]) -> Self {
        Self {
            address,
            opcode: tail.first().map_or(0, |&b| u16::from(b)),
            mnemonic: ".byte",
            operands: tail.iter().map(|b| format!("0x{:02x}", b)).collect(),
            bytes: tail.to_vec(),
            target: None,
            entry: None,
            truncated: true,
        }
    }

    /// Number of bytes consumed.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no bytes were consumed (never true for a decoded instruction).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the opcode was not found in the catalog.
    pub fn is_unknown(&self) -> bool {
        self.entry.is_none()
    }

    /// Mnemonic and operands, without the branch annotation.
    pub fn text(&self) -> String {
        let mut out = String::from(self.mnemonic);
        for (i, op) in self.operands.iter().enumerate() {
            out.push(if i == 0 { ' ' } else { ',' });
            out.push_str(op);
        }
        out
    }
}

impl fmt::Display for DecodedInstr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())?;
        if let Some(target) = &self.target {
            write!(f, " ; 0x{:04x}", target.address)?;
            if let Some(sym) = &target.symbol {
                write!(f, " <{}>", sym)?;
            }
        } else if self.truncated {
            f.write_str(" ; truncated")?;
        } else if self.is_unknown() {
            f.write_str(" ; unknown")?;
        }
        Ok(())
    }
}

// ─── Decoding ───────────────────────────────────────────────────────────────

#[cfg(feature = "std")]
fn entry_for(key: u16) -> Option<&'static CatalogEntry> {
    crate::catalog::Catalog::shared().by_opcode(key)
}

#[cfg(not(feature = "std"))]
fn entry_for(key: u16) -> Option<&'static CatalogEntry> {
    crate::catalog::OPCODES.iter().find(|e| e.opcode == key)
}

fn fetch<S: ByteSource + ?Sized>(
    src: &mut S,
    address: u32,
    buf: &mut [u8],
) -> Result<(), AsmError> {
    if src.fetch(address, buf) {
        Ok(())
    } else {
        Err(AsmError::Fetch {
            address,
            len: buf.len(),
        })
    }
}

/// Decode the instruction at `address`.
///
/// # Errors
///
/// Returns [`AsmError::Fetch`] if the source cannot supply a byte the
/// instruction needs. No partial result is returned. An unknown opcode is
/// not an error.
///
/// # Examples
///
/// ```
/// use stm8_codec::decoder::{decode, Memory, NoSymbols};
///
/// let mut mem = Memory::new(0x8000, &[0x90, 0x42]);
/// let insn = decode(0x8000, &mut mem, &NoSymbols)?;
/// assert_eq!(insn.to_string(), "mul Y,A");
/// assert_eq!(insn.len(), 2);
/// # Ok::<(), stm8_codec::AsmError>(())
/// ```
pub fn decode<S, Y>(address: u32, src: &mut S, symbols: &Y) -> Result<DecodedInstr, AsmError>
where
    S: ByteSource + ?Sized,
    Y: Symbolizer + ?Sized,
{
    let mut first = [0u8; 1];
    fetch(src, address, &mut first)?;
    let mut bytes = Vec::with_capacity(5);
    bytes.push(first[0]);
    let mut key = u16::from(first[0]);
    if is_prefix(first[0]) {
        let mut second = [0u8; 1];
        fetch(src, address.wrapping_add(1), &mut second)?;
        bytes.push(second[0]);
        key = u16::from_be_bytes([first[0], second[0]]);
    }

    let Some(entry) = entry_for(key) else {
        debug!(address, opcode = key, "unknown opcode");
        let (mnemonic, operand) = if bytes.len() == 2 {
            (".word", format!("0x{:04x}", key))
        } else {
            (".byte", format!("0x{:02x}", key))
        };
        return Ok(DecodedInstr {
            address,
            opcode: key,
            mnemonic,
            operands: alloc::vec![operand],
            bytes,
            target: None,
            entry: None,
            truncated: false,
        });
    };

    let opcode_len = bytes.len();
    let total = entry.len();
    let mut fields = [0u8; 4];
    let fields = &mut fields[..total - opcode_len];
    if !fields.is_empty() {
        fetch(src, address.wrapping_add(opcode_len as u32), fields)?;
    }
    bytes.extend_from_slice(fields);

    let mut operands = alloc::vec![String::new(); entry.operand_count()];
    let mut target = None;
    let mut cursor = 0;
    for i in entry.emission_order() {
        let mode = entry.constraints[i];
        let width = mode.encoding_width();
        let raw = fields[cursor..cursor + width]
            .iter()
            .fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
        cursor += width;

        operands[i] = if mode == AddrMode::PcRel {
            let disp = i32::from(raw as u8 as i8);
            let dest = (address as i64 + total as i64 + i64::from(disp)) as u32 & 0x00FF_FFFF;
            target = Some(Annotation {
                address: dest,
                symbol: symbols.symbol(dest),
            });
            if disp < 0 {
                format!("-0x{:02x}", disp.unsigned_abs())
            } else {
                format!("0x{:02x}", disp)
            }
        } else {
            render(mode, raw, symbols)
        };
    }

    trace!(address, opcode = key, mnemonic = entry.mnemonic, len = total, "decoded");
    Ok(DecodedInstr {
        address,
        opcode: key,
        mnemonic: entry.mnemonic,
        operands,
        bytes,
        target,
        entry: Some(entry),
        truncated: false,
    })
}

/// Render one operand field. Register and bit modes ignore `raw`.
fn render<Y: Symbolizer + ?Sized>(mode: AddrMode, raw: u32, symbols: &Y) -> String {
    use AddrMode::*;

    if let Some(reg) = mode.register() {
        return String::from(reg.name());
    }
    if let Some(bit) = mode.bit_index() {
        return format!("#{}", bit);
    }
    match mode {
        IndX => return String::from("(X)"),
        IndY => return String::from("(Y)"),
        _ => {}
    }

    let sym = symbols.symbol(raw);
    let hex = format!("0x{:0w$x}", raw, w = 2 * mode.encoding_width());
    let (v, s) = match &sym {
        Some(name) => (name.as_str(), ".s"),
        None => (hex.as_str(), ""),
    };
    match mode {
        Byte | Word => format!("#{}", v),
        ShortMem => format!("{}.s", v),
        LongMem | ExtMem => String::from(v),
        ShortOffX => format!("({}{},X)", v, s),
        ShortOffY => format!("({}{},Y)", v, s),
        LongOffX | ExtOffX => format!("({},X)", v),
        LongOffY | ExtOffY => format!("({},Y)", v),
        ShortOffSp => format!("({},SP)", v),
        ShortPtrW => format!("[{}{}]", v, s),
        ShortPtrWX => format!("([{}{}],X)", v, s),
        ShortPtrWY => format!("([{}{}],Y)", v, s),
        LongPtrW => format!("[{}.w]", v),
        LongPtrWX => format!("([{}.w],X)", v),
        LongPtrWY => format!("([{}.w],Y)", v),
        LongPtrE => format!("[{}.e]", v),
        LongPtrEX => format!("([{}.e],X)", v),
        LongPtrEY => format!("([{}.e],Y)", v),
        _ => hex,
    }
}

// ─── Linear sweep ───────────────────────────────────────────────────────────

/// Decodes consecutive instructions with a fixed symbolizer.
///
/// # Examples
///
/// ```
/// use stm8_codec::decoder::Disassembler;
///
/// let listing = Disassembler::new().disassemble(0x8000, &[0x9D, 0x20, 0xFD]);
/// assert_eq!(listing[0].to_string(), "nop");
/// assert_eq!(listing[1].to_string(), "jra -0x03 ; 0x8000");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Disassembler<Y = NoSymbols> {
    symbols: Y,
}

impl Disassembler<NoSymbols> {
    /// A disassembler without symbol information.
    pub fn new() -> Self {
        Self { symbols: NoSymbols }
    }
}

impl<Y: Symbolizer> Disassembler<Y> {
    /// A disassembler that names addresses through `symbols`.
    pub fn with_symbols(symbols: Y) -> Self {
        Self { symbols }
    }

    /// Decode the single instruction at `address`.
    ///
    /// # Errors
    ///
    /// See [`decode`].
    pub fn decode_one<S: ByteSource + ?Sized>(
        &self,
        address: u32,
        src: &mut S,
    ) -> Result<DecodedInstr, AsmError> {
        decode(address, src, &self.symbols)
    }

    /// Decode every instruction in `bytes`, mapped at `base`.
    ///
    /// The sweep always covers every byte: unknown opcodes become data,
    /// and an instruction cut off by the end of `bytes` becomes one
    /// truncated `.byte` entry holding the remaining bytes.
    pub fn disassemble(&self, base: u32, bytes: &[u8]) -> Vec<DecodedInstr> {
        let mut mem = Memory::new(base, bytes);
        let mut out = Vec::new();
        let mut offset = 0;
        while offset < bytes.len() {
            let address = base.wrapping_add(offset as u32);
            let insn = match decode(address, &mut mem, &self.symbols) {
                Ok(insn) => insn,
                Err(err) => {
                    debug!(address, %err, "instruction cut off by end of input");
                    DecodedInstr::truncated(address, &bytes[offset..])
                }
            };
            offset += insn.len();
            out.push(insn);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn one(bytes: &[u8]) -> DecodedInstr {
        decode(0x8000, &mut Memory::new(0x8000, bytes), &NoSymbols).unwrap()
    }

    #[test]
    fn prefixed_opcode() {
        let insn = one(&[0x90, 0x42]);
        assert_eq!(insn.text(), "mul Y,A");
        assert_eq!(insn.len(), 2);
        assert_eq!(insn.opcode, 0x9042);
    }

    #[test]
    fn operand_formats() {
        assert_eq!(one(&[0xA6, 0x42]).text(), "ld A,#0x42");
        assert_eq!(one(&[0xB6, 0x10]).text(), "ld A,0x10.s");
        assert_eq!(one(&[0xC6, 0x50, 0x00]).text(), "ld A,0x5000");
        assert_eq!(one(&[0xE6, 0x10]).text(), "ld A,(0x10,X)");
        assert_eq!(one(&[0x7B, 0x03]).text(), "ld A,(0x03,SP)");
        assert_eq!(one(&[0x92, 0xC6, 0x10]).text(), "ld A,[0x10]");
        assert_eq!(one(&[0x72, 0xC6, 0x12, 0x34]).text(), "ld A,[0x1234.w]");
        assert_eq!(one(&[0x91, 0xD6, 0x10]).text(), "ld A,([0x10],Y)");
        assert_eq!(one(&[0xBC, 0x01, 0x23, 0x45]).text(), "ldf A,0x012345");
        assert_eq!(one(&[0x92, 0xAF, 0x12, 0x34]).text(), "ldf A,([0x1234.e],X)");
        assert_eq!(one(&[0xAE, 0xBE, 0xEF]).text(), "ldw X,#0xbeef");
    }

    #[test]
    fn bit_numbers_come_from_the_opcode() {
        let insn = one(&[0x72, 0x1A, 0x50, 0x00]);
        assert_eq!(insn.text(), "bset 0x5000,#5");
    }

    #[test]
    fn mov_renders_destination_first() {
        assert_eq!(one(&[0x45, 0x20, 0x10]).text(), "mov 0x10.s,0x20.s");
        assert_eq!(one(&[0x35, 0x55, 0x10, 0x00]).text(), "mov 0x1000,#0x55");
        assert_eq!(one(&[0x55, 0x20, 0x00, 0x10, 0x00]).text(), "mov 0x1000,0x2000");
    }

    #[test]
    fn relative_branch_annotation() {
        let insn = one(&[0x20, 0x05]);
        assert_eq!(insn.to_string(), "jra 0x05 ; 0x8007");
        let sym = |a: u32| (a == 0x8000).then(|| String::from("start"));
        let insn = decode(0x8000, &mut Memory::new(0x8000, &[0x26, 0xFE]), &sym).unwrap();
        assert_eq!(insn.to_string(), "jrne -0x02 ; 0x8000 <start>");
    }

    #[test]
    fn symbols_replace_addresses() {
        let sym = |a: u32| match a {
            0x5000 => Some(String::from("PORT")),
            0x10 => Some(String::from("tmp")),
            _ => None,
        };
        let mut mem = Memory::new(0, &[0xC6, 0x50, 0x00, 0xE6, 0x10]);
        let a = decode(0, &mut mem, &sym).unwrap();
        let b = decode(3, &mut mem, &sym).unwrap();
        assert_eq!(a.text(), "ld A,PORT");
        assert_eq!(b.text(), "ld A,(tmp.s,X)");
    }

    #[test]
    fn unknown_opcodes_fall_back_to_data() {
        let insn = one(&[0x72, 0xFF]);
        assert!(insn.is_unknown());
        assert_eq!(insn.to_string(), ".word 0x72ff ; unknown");
        assert_eq!(insn.len(), 2);
    }

    #[test]
    fn truncated_input_is_a_fetch_error() {
        let err = decode(0x8000, &mut Memory::new(0x8000, &[0xC6, 0x50]), &NoSymbols).unwrap_err();
        assert_eq!(err, AsmError::Fetch { address: 0x8001, len: 2 });
        let err = decode(0x8000, &mut Memory::new(0x8000, &[0x72]), &NoSymbols).unwrap_err();
        assert_eq!(err, AsmError::Fetch { address: 0x8001, len: 1 });
        let err = decode(0x7FFF, &mut Memory::new(0x8000, &[0x9D]), &NoSymbols).unwrap_err();
        assert_eq!(err, AsmError::Fetch { address: 0x7FFF, len: 1 });
    }

    #[test]
    fn closures_are_byte_sources() {
        let rom = [0x9D];
        let mut src = |addr: u32, buf: &mut [u8]| {
            if addr == 0 && buf.len() == 1 {
                buf[0] = rom[0];
                true
            } else {
                false
            }
        };
        assert_eq!(decode(0, &mut src, &NoSymbols).unwrap().text(), "nop");
    }

    #[test]
    fn sweep() {
        let out = Disassembler::new().disassemble(0x8000, &[0x9D, 0x90, 0x42, 0x81]);
        let text: Vec<String> = out.iter().map(|i| i.to_string()).collect();
        assert_eq!(text, vec!["nop", "mul Y,A", "ret"]);
        assert_eq!(out[2].address, 0x8003);
    }

    #[test]
    fn sweep_keeps_output_before_a_cut_off_instruction() {
        let out = Disassembler::new().disassemble(0x8000, &[0x9D, 0x9D, 0x81, 0xC6, 0x50]);
        let text: Vec<String> = out.iter().map(|i| i.to_string()).collect();
        assert_eq!(text, vec!["nop", "nop", "ret", ".byte 0xc6,0x50 ; truncated"]);
        assert_eq!(out[3].address, 0x8003);
        assert!(out[3].truncated && out[3].is_unknown());
        assert_eq!(out[3].bytes, vec![0xC6, 0x50]);

        // A lone prefix is cut off too.
        let out = Disassembler::new().disassemble(0, &[0x72]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].to_string(), ".byte 0x72 ; truncated");
    }

    #[test]
    fn sweep_across_the_top_of_the_address_space() {
        let out = Disassembler::new().disassemble(0xFFFF_FFFF, &[0x9D, 0x81]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].address, 0);
        assert_eq!(out[1].to_string(), "ret");
    }
}
