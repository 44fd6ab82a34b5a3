//! Public assembler API: builder pattern and one-shot assembly.
//!
//! Drives source text through the operand syntax, the resolver and the
//! encoder, then resolves relocations against labels and externally
//! defined symbols when [`Assembler::finish`] is called.

#[allow(unused_imports)]
use alloc::format;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::string::ToString;
use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::catalog::CatalogEntry;
use crate::decoder::{DecodedInstr, Disassembler};
use crate::encoder::{self, FILLER};
use crate::error::{AsmError, Span};
use crate::ir::{Operand, Value};
use crate::reloc::{RelocKind, Relocation};
use crate::syntax::{self, Line};

/// The result of a successful assembly operation.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[must_use]
pub struct AssemblyResult {
    /// The assembled machine code.
    bytes: Vec<u8>,
    /// Label addresses (name → absolute address), in definition order.
    labels: Vec<(String, u32)>,
    /// Relocations whose symbol was neither a label nor an external.
    relocations: Vec<Relocation>,
    /// Range diagnostics attached to otherwise complete output.
    diagnostics: Vec<AsmError>,
    /// Base address used during assembly.
    base_address: u32,
    /// Source text annotations: `(output_offset, source_text)` for listing.
    source_annotations: Vec<(u32, String)>,
}

impl AssemblyResult {
    /// Get the assembled bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use stm8_codec::Assembler;
    ///
    /// let mut asm = Assembler::new();
    /// asm.emit("nop")?;
    /// let result = asm.finish()?;
    /// assert_eq!(result.bytes(), &[0x9D]);
    /// # Ok::<(), stm8_codec::AsmError>(())
    /// ```
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of assembled bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether no bytes were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// All labels with their absolute addresses, in definition order.
    #[must_use]
    pub fn labels(&self) -> &[(String, u32)] {
        &self.labels
    }

    /// Address of a label, if it was defined.
    ///
    /// # Examples
    ///
    /// ```
    /// use stm8_codec::Assembler;
    ///
    /// let mut asm = Assembler::new();
    /// asm.base_address(0x8000);
    /// asm.emit("nop\nentry: ret")?;
    /// let result = asm.finish()?;
    /// assert_eq!(result.label_address("entry"), Some(0x8001));
    /// # Ok::<(), stm8_codec::AsmError>(())
    /// ```
    #[must_use]
    pub fn label_address(&self, name: &str) -> Option<u32> {
        self.labels
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, addr)| *addr)
    }

    /// Relocations left for a later link step, with offsets relative to
    /// the start of [`bytes`](Self::bytes). Their fields hold `0xAA` filler.
    #[must_use]
    pub fn relocations(&self) -> &[Relocation] {
        &self.relocations
    }

    /// Out-of-range diagnostics. The affected bytes are still emitted.
    #[must_use]
    pub fn diagnostics(&self) -> &[AsmError] {
        &self.diagnostics
    }

    /// Whether any diagnostic was reported.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Whether the bytes are final: no diagnostics and nothing left to link.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty() && self.relocations.is_empty()
    }

    /// Base address used during assembly.
    #[must_use]
    pub fn base_address(&self) -> u32 {
        self.base_address
    }

    /// Disassemble the output, naming PC-relative targets after labels.
    pub fn disassembly(&self) -> Vec<DecodedInstr> {
        let by_addr: BTreeMap<u32, &str> = self
            .labels
            .iter()
            .rev()
            .map(|(name, addr)| (*addr, name.as_str()))
            .collect();
        let lookup = |addr: u32| by_addr.get(&addr).map(|s| (*s).to_string());
        Disassembler::with_symbols(lookup).disassemble(self.base_address, &self.bytes)
    }

    /// Produce a human-readable hex listing of the assembled output.
    ///
    /// Each line shows the address, the hex bytes, and (when
    /// [`Assembler::enable_listing`] was set) the source text. Labels get a
    /// line of their own.
    ///
    /// # Examples
    ///
    /// ```
    /// use stm8_codec::Assembler;
    ///
    /// let mut asm = Assembler::new();
    /// asm.base_address(0x8000).enable_listing();
    /// asm.emit("start: nop\nret")?;
    /// let listing = asm.finish()?.listing();
    /// assert!(listing.contains("008000                  start:"));
    /// assert!(listing.contains("008000  9D                nop"));
    /// assert!(listing.contains("008001  81                ret"));
    /// # Ok::<(), stm8_codec::AsmError>(())
    /// ```
    #[must_use]
    pub fn listing(&self) -> String {
        use alloc::collections::BTreeSet;
        use core::fmt::Write;

        let mut out = String::new();
        let base = self.base_address;

        let mut label_at: BTreeMap<u32, Vec<&str>> = BTreeMap::new();
        for (name, addr) in &self.labels {
            label_at.entry(*addr).or_default().push(name);
        }

        let mut source_at: BTreeMap<u32, &str> = BTreeMap::new();
        for (offset, text) in &self.source_annotations {
            if !text.is_empty() {
                source_at.insert(base.wrapping_add(*offset), text);
            }
        }

        // Chunks never straddle a label or the start of an annotated
        // statement. Kept as offsets so the search cannot overflow near the
        // top of the address space.
        let split_at: BTreeSet<usize> = label_at
            .keys()
            .chain(source_at.keys())
            .map(|addr| addr.wrapping_sub(base) as usize)
            .collect();

        let bytes = &self.bytes;
        let mut addr = base;
        let mut i = 0;
        while i < bytes.len() {
            if let Some(names) = label_at.get(&addr) {
                for name in names {
                    let _ = writeln!(out, "{:06X}                  {}:", addr, name);
                }
            }

            let mut end = core::cmp::min(i + 8, bytes.len());
            if let Some(&split) = split_at.range(i + 1..end).next() {
                end = split;
            }

            let hex = bytes[i..end].iter().fold(String::new(), |mut acc, b| {
                let _ = write!(acc, "{:02X}", b);
                acc
            });
            match source_at.get(&addr) {
                Some(text) => {
                    let _ = writeln!(out, "{:06X}  {:<16}  {}", addr, hex, text);
                }
                None => {
                    let _ = writeln!(out, "{:06X}  {:<16}", addr, hex);
                }
            }

            addr = addr.wrapping_add((end - i) as u32);
            i = end;
        }

        if let Some(names) = label_at.get(&addr) {
            for name in names {
                let _ = writeln!(out, "{:06X}                  {}:", addr, name);
            }
        }
        out
    }
}

/// Builder-pattern assembler.
///
/// Statements are assembled in order. A statement that fails (unknown
/// mnemonic, no matching form, bad syntax) is reported and skipped; the
/// rest of the input is still processed, and [`finish`](Self::finish)
/// then fails with everything that was collected.
///
/// Symbols are resolved at [`finish`](Self::finish), so forward references
/// work. Symbolic operands always select the long form of an instruction
/// unless written with a `.s` suffix.
///
/// # Examples
///
/// ```
/// use stm8_codec::Assembler;
///
/// let mut asm = Assembler::new();
/// asm.base_address(0x8000)
///     .define_external("PB_ODR", 0x5005);
/// asm.emit("loop: bcpl PB_ODR,#5")?;
/// asm.emit("      jra loop")?;
/// let result = asm.finish()?;
/// assert_eq!(result.bytes(), &[0x90, 0x1A, 0x50, 0x05, 0x20, 0xFA]);
/// # Ok::<(), stm8_codec::AsmError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    base: u32,
    code: Vec<u8>,
    /// Labels as `(name, offset, span)`, in definition order.
    labels: Vec<(String, usize, Span)>,
    label_index: BTreeMap<String, usize>,
    externals: BTreeMap<String, i64>,
    /// Pending relocations, offsets relative to the start of `code`.
    relocations: Vec<Relocation>,
    diagnostics: Vec<AsmError>,
    errors: Vec<AsmError>,
    listing: bool,
    source_annotations: Vec<(u32, String)>,
    lines: u32,
    source_offset: usize,
}

impl Assembler {
    /// Create an assembler with base address 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record source text for [`AssemblyResult::listing`].
    pub fn enable_listing(&mut self) -> &mut Self {
        self.listing = true;
        self
    }

    /// Set the address of the first output byte.
    ///
    /// Labels are stored relative to the output, so this may be called at
    /// any point before [`finish`](Self::finish).
    pub fn base_address(&mut self, addr: u32) -> &mut Self {
        self.base = addr;
        self
    }

    /// Define a symbol outside the assembled code, such as a peripheral
    /// register or a bit-number constant.
    ///
    /// Labels take precedence over externals of the same name.
    pub fn define_external(&mut self, name: &str, value: u32) -> &mut Self {
        self.externals.insert(String::from(name), i64::from(value));
        self
    }

    /// Address the next emitted byte will have.
    #[must_use]
    pub fn current_address(&self) -> u32 {
        self.base.wrapping_add(self.code.len() as u32)
    }

    /// Assemble source text. Can be called multiple times; line numbers
    /// continue across calls.
    ///
    /// # Errors
    ///
    /// Returns the errors of the statements that were rejected (a single
    /// error, or [`AsmError::Multiple`]). The remaining statements are
    /// still assembled, and the same errors are reported again by
    /// [`finish`](Self::finish).
    pub fn emit(&mut self, source: &str) -> Result<&mut Self, AsmError> {
        let mut errors = Vec::new();
        for raw in source.split_inclusive('\n') {
            self.lines += 1;
            let line = raw.trim_end_matches(['\n', '\r']);
            if let Err(err) = self.statement(line, self.lines, self.source_offset) {
                debug!(line = self.lines, error = %err, "statement rejected");
                errors.push(err);
            }
            self.source_offset += raw.len();
        }
        self.errors.extend(errors.iter().cloned());
        match AsmError::collect(errors) {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    /// Add a label at the current position (builder API).
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::DuplicateLabel`] if the label was already defined.
    pub fn label(&mut self, name: &str) -> Result<&mut Self, AsmError> {
        self.define_label(name, Span::dummy())?;
        Ok(self)
    }

    /// Assemble one instruction from already classified operands
    /// (builder API).
    ///
    /// # Errors
    ///
    /// Returns [`AsmError::UnknownMnemonic`] or [`AsmError::NoMatch`]; on
    /// error nothing is emitted.
    ///
    /// # Examples
    ///
    /// ```
    /// use stm8_codec::ir::{Operand, Register};
    /// use stm8_codec::Assembler;
    ///
    /// let mut asm = Assembler::new();
    /// asm.instruction("ld", &[Operand::register(Register::A), Operand::imm(0x42)])?
    ///     .instruction("ret", &[])?;
    /// assert_eq!(asm.finish()?.bytes(), &[0xA6, 0x42, 0x81]);
    /// # Ok::<(), stm8_codec::AsmError>(())
    /// ```
    pub fn instruction(
        &mut self,
        mnemonic: &str,
        operands: &[Operand],
    ) -> Result<&mut Self, AsmError> {
        let entry = resolve(mnemonic, operands, Span::dummy())?;
        let start = self.code.len();
        self.encode_entry(entry, operands)?;
        if self.listing {
            let text = operands
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            let text = if text.is_empty() {
                String::from(entry.mnemonic)
            } else {
                format!("{} {}", entry.mnemonic, text)
            };
            self.source_annotations.push((start as u32, text));
        }
        Ok(self)
    }

    /// Emit raw bytes (builder API for `.byte`).
    pub fn db(&mut self, bytes: &[u8]) -> &mut Self {
        self.code.extend_from_slice(bytes);
        self
    }

    /// Emit a big-endian 16-bit value (builder API for `.word`).
    pub fn dw(&mut self, value: u16) -> &mut Self {
        self.code.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Finalize assembly: resolve relocations and return the result.
    ///
    /// Relocations against labels or externals are patched in place; a
    /// value that does not fit becomes a diagnostic on the result.
    /// Relocations against unknown symbols are returned unapplied.
    ///
    /// # Errors
    ///
    /// Returns the statement errors collected by [`emit`](Self::emit).
    pub fn finish(self) -> Result<AssemblyResult, AsmError> {
        if let Some(err) = AsmError::collect(self.errors) {
            return Err(err);
        }

        let base = self.base;
        let mut code = self.code;
        let mut diagnostics = self.diagnostics;
        let mut unresolved = Vec::new();

        for reloc in self.relocations {
            let target = self
                .label_index
                .get(&*reloc.symbol)
                .map(|&i| i64::from(base) + self.labels[i].1 as i64)
                .or_else(|| self.externals.get(&*reloc.symbol).copied());
            match target {
                Some(target) => {
                    if let Err(err) = reloc.apply(&mut code, base, target) {
                        debug_assert!(!err.is_internal(), "{}", err);
                        diagnostics.push(err);
                    }
                }
                None => {
                    debug!(
                        symbol = %reloc.symbol,
                        offset = reloc.offset,
                        kind = ?reloc.kind,
                        "unresolved relocation"
                    );
                    unresolved.push(reloc);
                }
            }
        }

        let labels = self
            .labels
            .into_iter()
            .map(|(name, offset, _)| (name, base.wrapping_add(offset as u32)))
            .collect();

        Ok(AssemblyResult {
            bytes: code,
            labels,
            relocations: unresolved,
            diagnostics,
            base_address: base,
            source_annotations: self.source_annotations,
        })
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn statement(&mut self, text: &str, line_no: u32, offset: usize) -> Result<(), AsmError> {
        let line = syntax::parse_line(text, line_no, offset)?;
        for (name, span) in &line.labels {
            self.define_label(name, *span)?;
        }
        let Some((mnemonic, span)) = line.mnemonic else {
            return Ok(());
        };

        let start = self.code.len();
        if mnemonic.starts_with('.') {
            self.directive(mnemonic, &line, span)?;
        } else {
            let operands = line.instruction_operands()?;
            let entry = resolve(mnemonic, &operands, span)?;
            self.encode_entry(entry, &operands)?;
        }

        if self.listing {
            let from = span.col as usize - 1;
            let code = text.split(';').next().unwrap_or(text);
            let source = code.get(from..).unwrap_or(code).trim();
            self.source_annotations.push((start as u32, String::from(source)));
        }
        Ok(())
    }

    fn define_label(&mut self, name: &str, span: Span) -> Result<(), AsmError> {
        if let Some(&i) = self.label_index.get(name) {
            return Err(AsmError::DuplicateLabel {
                label: String::from(name),
                span,
                first_span: self.labels[i].2,
            });
        }
        trace!(label = name, address = self.current_address(), "label");
        self.label_index.insert(String::from(name), self.labels.len());
        self.labels.push((String::from(name), self.code.len(), span));
        Ok(())
    }

    fn encode_entry(&mut self, entry: &CatalogEntry, operands: &[Operand]) -> Result<(), AsmError> {
        let encoded = encoder::encode(entry, operands).map_err(|err| {
            debug_assert!(!err.is_internal(), "{}", err);
            err
        })?;
        let start = self.code.len();
        self.code.extend_from_slice(&encoded.bytes);
        self.relocations
            .extend(encoded.relocations.into_iter().map(|mut r| {
                r.offset += start;
                r
            }));
        self.diagnostics.extend(encoded.diagnostics);
        Ok(())
    }

    /// `.byte`/`.db` and `.word`/`.dw` data directives.
    fn directive(&mut self, name: &str, line: &Line<'_>, span: Span) -> Result<(), AsmError> {
        let (kind, min, max) = match name.to_ascii_lowercase().as_str() {
            ".byte" | ".db" => (RelocKind::Abs8, -0x80, 0xFF),
            ".word" | ".dw" => (RelocKind::Abs16, -0x8000, 0xFFFF),
            _ => {
                return Err(AsmError::Syntax {
                    msg: format!("unknown directive '{}'", name),
                    span,
                })
            }
        };
        if line.operands.is_empty() {
            return Err(AsmError::Syntax {
                msg: format!("'{}' needs at least one value", name),
                span,
            });
        }
        let size = kind.size();

        // Parse everything first so a bad value leaves no partial output.
        let values = line
            .operands
            .iter()
            .map(|(text, span)| {
                syntax::parse_value(text)
                    .map(|v| (v, *span))
                    .ok_or_else(|| AsmError::Syntax {
                        msg: format!("invalid value '{}'", text),
                        span: *span,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (value, span) in values {
            match value {
                Value::Const(v) => {
                    if v < min || v > max {
                        self.diagnostics.push(AsmError::OutOfRange {
                            value: v,
                            min,
                            max,
                            span,
                        });
                    }
                    let be = (v as u32).to_be_bytes();
                    self.code.extend_from_slice(&be[4 - size..]);
                }
                Value::Symbol(sym) => {
                    self.relocations.push(Relocation {
                        offset: self.code.len(),
                        kind,
                        symbol: sym.name,
                        addend: sym.addend,
                        span,
                    });
                    self.code.extend(core::iter::repeat(FILLER).take(size));
                }
            }
        }
        Ok(())
    }
}

/// Resolve through the shared index when available, reporting errors at
/// the statement's mnemonic.
fn resolve(
    mnemonic: &str,
    operands: &[Operand],
    span: Span,
) -> Result<&'static CatalogEntry, AsmError> {
    #[cfg(feature = "std")]
    let found = crate::catalog::Catalog::shared().resolve(mnemonic, operands);
    #[cfg(not(feature = "std"))]
    let found = crate::resolver::resolve(mnemonic, operands);

    found.map_err(|err| match err {
        AsmError::UnknownMnemonic { mnemonic, span: s } => AsmError::UnknownMnemonic {
            mnemonic,
            span: if s.is_dummy() { span } else { s },
        },
        AsmError::NoMatch {
            mnemonic,
            operands,
            span: s,
        } => AsmError::NoMatch {
            mnemonic,
            operands,
            span: if s.is_dummy() { span } else { s },
        },
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Register;

    fn assemble(src: &str) -> AssemblyResult {
        let mut asm = Assembler::new();
        asm.emit(src).unwrap();
        asm.finish().unwrap()
    }

    #[test]
    fn empty_source() {
        let result = assemble("");
        assert!(result.is_empty());
        assert!(result.is_complete());
    }

    #[test]
    fn comments_and_blank_lines() {
        let result = assemble("; header\n\n   nop ; idle\r\n\tret\n");
        assert_eq!(result.bytes(), &[0x9D, 0x81]);
    }

    #[test]
    fn forward_and_backward_branches() {
        let mut asm = Assembler::new();
        asm.base_address(0x8000);
        asm.emit("top: jrne done\nnop\njra top\ndone: ret").unwrap();
        let result = asm.finish().unwrap();
        // jrne done: 0x8000 -> 0x8005, disp from 0x8002 = 3
        // jra top:   0x8003 -> 0x8000, disp from 0x8005 = -5
        assert_eq!(result.bytes(), &[0x26, 0x03, 0x9D, 0x20, 0xFB, 0x81]);
        assert_eq!(result.label_address("done"), Some(0x8005));
    }

    #[test]
    fn symbols_take_long_forms() {
        let mut asm = Assembler::new();
        asm.define_external("var", 0x10);
        asm.emit("ld A,var\nld A,var.s").unwrap();
        let result = asm.finish().unwrap();
        assert_eq!(result.bytes(), &[0xC6, 0x00, 0x10, 0xB6, 0x10]);
    }

    #[test]
    fn externals_patch_far_and_bit_fields() {
        let mut asm = Assembler::new();
        asm.define_external("far_fn", 0x012345)
            .define_external("LED", 5)
            .define_external("PORT", 0x5005);
        asm.emit("callf far_fn\nbset PORT,#LED").unwrap();
        let result = asm.finish().unwrap();
        assert_eq!(
            result.bytes(),
            &[0x8D, 0x01, 0x23, 0x45, 0x72, 0x1A, 0x50, 0x05]
        );
    }

    #[test]
    fn unresolved_relocations_are_handed_off() {
        let mut asm = Assembler::new();
        asm.emit("nop\nld A,(table,X)").unwrap();
        let result = asm.finish().unwrap();
        assert_eq!(result.bytes(), &[0x9D, 0xD6, 0xAA, 0xAA]);
        let relocs = result.relocations();
        assert_eq!(relocs.len(), 1);
        assert_eq!(relocs[0].offset, 2);
        assert_eq!(relocs[0].kind, RelocKind::Abs16);
        assert_eq!(&*relocs[0].symbol, "table");
        assert!(!result.is_complete());
        assert!(!result.has_errors());
    }

    #[test]
    fn branch_out_of_range_is_a_diagnostic() {
        let mut src = String::from("jra far_away\n");
        for _ in 0..200 {
            src.push_str("nop\n");
        }
        src.push_str("far_away: ret");
        let result = assemble(&src);
        assert!(matches!(
            result.diagnostics(),
            [AsmError::BranchOutOfRange { disp: 200, .. }]
        ));
        assert_eq!(&result.bytes()[..2], &[0x20, 0xAA]);
    }

    #[test]
    fn constant_out_of_range_still_emits() {
        let result = assemble("ld A,#0x1FF");
        assert_eq!(result.bytes(), &[0xA6, 0xFF]);
        assert!(matches!(
            result.diagnostics(),
            [AsmError::OutOfRange { value: 0x1FF, .. }]
        ));
    }

    #[test]
    fn bad_statements_are_skipped_and_collected() {
        let mut asm = Assembler::new();
        let err = asm.emit("nop\nfrob A\nld A,X,Y\nret").unwrap_err();
        match &err {
            AsmError::Multiple { errors } => {
                assert!(matches!(
                    errors[0],
                    AsmError::UnknownMnemonic { span, .. } if span.line == 2
                ));
                assert!(matches!(errors[1], AsmError::NoMatch { span, .. } if span.line == 3));
            }
            other => panic!("expected Multiple, got {:?}", other),
        }
        assert_eq!(asm.current_address(), 2);
        assert_eq!(asm.finish().unwrap_err(), err);
    }

    #[test]
    fn unknown_mnemonic_points_at_mnemonic() {
        let mut asm = Assembler::new();
        let err = asm.emit("  frob").unwrap_err();
        assert_eq!(err.span(), Some(Span::new(1, 3, 2, 4)));
    }

    #[test]
    fn line_numbers_continue_across_emits() {
        let mut asm = Assembler::new();
        asm.emit("nop\nnop\n").unwrap();
        let err = asm.emit("bogus").unwrap_err();
        assert_eq!(err.span().map(|s| s.line), Some(3));
    }

    #[test]
    fn duplicate_label() {
        let mut asm = Assembler::new();
        let err = asm.emit("a: nop\na: nop").unwrap_err();
        match err {
            AsmError::DuplicateLabel {
                label,
                span,
                first_span,
            } => {
                assert_eq!(label, "a");
                assert_eq!(span.line, 2);
                assert_eq!(first_span.line, 1);
            }
            other => panic!("expected DuplicateLabel, got {:?}", other),
        }
    }

    #[test]
    fn data_directives() {
        let mut asm = Assembler::new();
        asm.base_address(0x8000);
        asm.emit("tbl: .word tbl, 0x1234\n.byte 1, -1, $7f").unwrap();
        let result = asm.finish().unwrap();
        assert_eq!(
            result.bytes(),
            &[0x80, 0x00, 0x12, 0x34, 0x01, 0xFF, 0x7F]
        );
    }

    #[test]
    fn unknown_directive() {
        let mut asm = Assembler::new();
        assert!(matches!(
            asm.emit(".org 0x8000"),
            Err(AsmError::Syntax { .. })
        ));
    }

    #[test]
    fn builder_api() {
        let mut asm = Assembler::new();
        asm.label("start").unwrap();
        asm.instruction("ldw", &[Operand::register(Register::X), Operand::imm(0x1000)])
            .unwrap()
            .db(&[1, 2])
            .dw(0xBEEF);
        let result = asm.finish().unwrap();
        assert_eq!(result.bytes(), &[0xAE, 0x10, 0x00, 1, 2, 0xBE, 0xEF]);
        assert_eq!(result.label_address("start"), Some(0));
    }

    #[test]
    fn builder_rejects_without_emitting() {
        let mut asm = Assembler::new();
        assert!(asm.instruction("ret", &[Operand::imm(1)]).is_err());
        assert_eq!(asm.current_address(), 0);
        assert!(asm.finish().is_ok());
    }

    #[test]
    fn disassembly_names_labels() {
        let mut asm = Assembler::new();
        asm.base_address(0x8000);
        asm.emit("start: nop\njra start").unwrap();
        let text: Vec<String> = asm
            .finish()
            .unwrap()
            .disassembly()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(text, ["nop", "jra -0x03 ; 0x8000 <start>"]);
    }

    #[test]
    fn listing_breaks_at_labels_and_statements() {
        let mut asm = Assembler::new();
        asm.enable_listing();
        asm.emit("ldf A,0x012345\nend:").unwrap();
        let listing = asm.finish().unwrap().listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "000000  BC012345          ldf A,0x012345");
        assert_eq!(lines[1], "000004                  end:");
    }

    #[test]
    fn listing_without_annotations() {
        let mut asm = Assembler::new();
        asm.db(&[0; 10]);
        let listing = asm.finish().unwrap().listing();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("000000  0000000000000000"));
        assert!(lines[1].starts_with("000008  0000"));
    }
}
