//! # stm8-codec: STM8 Instruction Encoder and Disassembler
//!
//! `stm8-codec` is a table-driven codec for the STMicroelectronics STM8
//! 8-bit instruction set. One opcode catalog drives both directions:
//! operand descriptors are resolved to a catalog entry and encoded to
//! bytes, and bytes are decoded back to mnemonic and operand text.
//!
//! ## Quick Start
//!
//! ```rust
//! use stm8_codec::{assemble, disassemble};
//!
//! let code = assemble("ld A,#0x42\nret")?;
//! assert_eq!(code, vec![0xA6, 0x42, 0x81]);
//!
//! let text: Vec<String> = disassemble(&code, 0x8000)
//!     .iter()
//!     .map(|insn| insn.to_string())
//!     .collect();
//! assert_eq!(text, ["ld A,#0x42", "ret"]);
//! # Ok::<(), stm8_codec::AsmError>(())
//! ```
//!
//! ## Features
//!
//! - **Complete catalog**: all 627 STM8 instruction forms, aliases included.
//! - **Shortest form first**: values that fit eight bits select short
//!   addressing; symbols select long forms unless marked `.s`.
//! - **Relocations**: symbolic fields are emitted with `0xAA` filler and a
//!   relocation record carrying the ELF `R_STM8_*` type.
//! - **`no_std` + `alloc`**: embeddable in firmware tooling and WASM.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
// ── Pedantic lint policy ─────────────────────────────────────────────────
// Operand fields are narrowed between i64, u32 and u8 all over the codec,
// and opcodes read best as unseparated hex (0x9042, 0x72C6).
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_lossless,
    clippy::cast_possible_wrap,
    clippy::unreadable_literal,
    clippy::match_same_arms,
    clippy::redundant_closure_for_method_calls,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args,
    clippy::doc_markdown,
    clippy::similar_names,
    clippy::too_many_lines,
    clippy::single_match_else,
    clippy::manual_let_else,
    clippy::return_self_not_must_use,
    clippy::missing_errors_doc
)]

extern crate alloc;

/// Public assembler API: builder pattern, one-shot assembly, and `AssemblyResult`.
pub mod assembler;
/// The opcode catalog: every STM8 instruction form and its lookup index.
pub mod catalog;
/// Prefix-aware decoding and linear-sweep disassembly.
pub mod decoder;
/// Operand encoding: opcode bytes, bit folding, relocations.
pub mod encoder;
/// Error types and source-span diagnostics.
pub mod error;
/// Addressing modes, registers, values and operand descriptors.
pub mod ir;
/// Relocation kinds, ELF numbers and in-buffer patching.
pub mod reloc;
/// Addressing-mode resolution against the catalog.
pub mod resolver;
/// Operand and statement text syntax.
pub mod syntax;

// Re-exports
pub use assembler::{Assembler, AssemblyResult};
pub use catalog::{Catalog, CatalogEntry, OPCODES};
pub use decoder::{decode, DecodedInstr, Disassembler, Memory};
pub use encoder::{encode, EncodedInstr};
pub use error::{AsmError, Span};
pub use ir::{AddrMode, Operand, OperandKind, Register, SymbolRef, Value};
pub use reloc::{RelocKind, Relocation};
pub use resolver::resolve;

use alloc::string::String;
use alloc::vec::Vec;

/// Assemble STM8 source text into machine code bytes.
///
/// Newlines separate statements, `;` starts a comment, and labels are
/// defined with a trailing colon: `loop:`.
///
/// # Errors
///
/// Returns [`AsmError`] if a statement is rejected, a value is out of
/// range, or a symbol is not defined by a label.
///
/// # Examples
///
/// ```rust
/// use stm8_codec::assemble;
///
/// let code = assemble("nop").unwrap();
/// assert_eq!(code, vec![0x9D]);
/// ```
pub fn assemble(source: &str) -> Result<Vec<u8>, AsmError> {
    assemble_at(source, 0)
}

/// Assemble with an explicit base address.
///
/// # Errors
///
/// Returns [`AsmError`] on assembly failure (see [`assemble`] for details).
///
/// # Examples
///
/// ```rust
/// use stm8_codec::assemble_at;
///
/// let code = assemble_at("here: jra here", 0x8000).unwrap();
/// assert_eq!(code, vec![0x20, 0xFE]);
/// ```
pub fn assemble_at(source: &str, base_addr: u32) -> Result<Vec<u8>, AsmError> {
    assemble_with(source, base_addr, &[])
}

/// Assemble with external symbols pre-defined at known values.
///
/// # Errors
///
/// Returns [`AsmError`] on assembly failure (see [`assemble`] for details).
///
/// # Examples
///
/// ```rust
/// use stm8_codec::assemble_with;
///
/// let code = assemble_with("bset PC_ODR,#3", 0x8000, &[("PC_ODR", 0x500A)]).unwrap();
/// assert_eq!(code, vec![0x72, 0x16, 0x50, 0x0A]);
/// ```
pub fn assemble_with(
    source: &str,
    base_addr: u32,
    externals: &[(&str, u32)],
) -> Result<Vec<u8>, AsmError> {
    let mut asm = Assembler::new();
    asm.base_address(base_addr);
    for &(name, value) in externals {
        asm.define_external(name, value);
    }
    // Statement errors resurface from finish.
    let _ = asm.emit(source);
    let result = asm.finish()?;

    let mut errors: Vec<AsmError> = result.diagnostics().to_vec();
    errors.extend(
        result
            .relocations()
            .iter()
            .map(|r| AsmError::UndefinedSymbol {
                symbol: String::from(&*r.symbol),
                span: r.span,
            }),
    );
    match AsmError::collect(errors) {
        Some(err) => Err(err),
        None => Ok(result.into_bytes()),
    }
}

/// Disassemble `bytes` loaded at `base`, one instruction after another.
///
/// Unknown opcodes and an instruction cut off at the end of `bytes` come
/// back as `.byte`/`.word` data, so the result always covers every byte.
///
/// # Examples
///
/// ```rust
/// use stm8_codec::disassemble;
///
/// let insns = disassemble(&[0x72, 0x1A, 0x50, 0x00], 0x8000);
/// assert_eq!(insns[0].to_string(), "bset 0x5000,#5");
/// ```
pub fn disassemble(bytes: &[u8], base: u32) -> Vec<DecodedInstr> {
    Disassembler::new().disassemble(base, bytes)
}
