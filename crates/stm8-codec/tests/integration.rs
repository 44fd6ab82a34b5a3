//! Integration tests for stm8_codec.
//!
//! These tests exercise the public API end-to-end: source text in, machine
//! code out, and machine code back to text.

use stm8_codec::catalog::Catalog;
use stm8_codec::decoder::{decode, Memory, NoSymbols};
use stm8_codec::ir::{Operand, OperandKind, Register, Value};
use stm8_codec::reloc::{RelocKind, R_STM8_16, R_STM8_24, R_STM8_8_PCREL};
use stm8_codec::{
    assemble, assemble_at, assemble_with, disassemble, encode, resolve, AsmError, Assembler,
};

const BLINKY: &str = "\
; toggle PD0
start:  bset PD_DDR,#0
        bset PD_CR1,#0
loop:   bcpl PD_ODR,#0
        ldw X,#0x1000
delay:  decw X
        jrne delay
        jra loop
";

fn blinky() -> Assembler {
    let mut asm = Assembler::new();
    asm.base_address(0x8000)
        .define_external("PD_ODR", 0x500F)
        .define_external("PD_DDR", 0x5011)
        .define_external("PD_CR1", 0x5012);
    asm.emit(BLINKY).unwrap();
    asm
}

fn texts(bytes: &[u8]) -> Vec<String> {
    disassemble(bytes, 0x8000)
        .iter()
        .map(|insn| insn.text())
        .collect()
}

// ============================================================================
// One-Shot API
// ============================================================================

#[test]
fn one_shot_nop() {
    assert_eq!(assemble("nop").unwrap(), vec![0x9D]);
}

#[test]
fn one_shot_multiple_instructions() {
    let bytes = assemble("nop\nclr A\ninc A\nret").unwrap();
    assert_eq!(bytes, vec![0x9D, 0x4F, 0x4C, 0x81]);
}

#[test]
fn one_shot_with_base_address() {
    let bytes = assemble_at("nop\nback: jra back", 0xF000).unwrap();
    assert_eq!(bytes, vec![0x9D, 0x20, 0xFE]);
}

#[test]
fn one_shot_reports_range_errors() {
    assert!(matches!(
        assemble("ld A,#0x100"),
        Err(AsmError::OutOfRange { value: 0x100, .. })
    ));
}

#[test]
fn one_shot_reports_undefined_symbols() {
    match assemble("nop\njp nowhere") {
        Err(AsmError::UndefinedSymbol { symbol, span }) => {
            assert_eq!(symbol, "nowhere");
            assert_eq!(span.line, 2);
        }
        other => panic!("expected UndefinedSymbol, got {:?}", other),
    }
}

#[test]
fn one_shot_collects_every_bad_line() {
    match assemble("frob\nnop\nld A,#1,#2\nld Q") {
        Err(AsmError::Multiple { errors }) => assert_eq!(errors.len(), 3),
        other => panic!("expected Multiple, got {:?}", other),
    }
}

#[test]
fn externals_supply_bit_numbers() {
    let code = assemble_with("bres PORT,#PIN", 0, &[("PORT", 0x5005), ("PIN", 7)]).unwrap();
    assert_eq!(code, vec![0x72, 0x1F, 0x50, 0x05]);
}

// ============================================================================
// Builder API
// ============================================================================

#[test]
fn blinky_program() {
    let result = blinky().finish().unwrap();
    assert_eq!(
        result.bytes(),
        &[
            0x72, 0x10, 0x50, 0x11, // bset PD_DDR,#0
            0x72, 0x10, 0x50, 0x12, // bset PD_CR1,#0
            0x90, 0x10, 0x50, 0x0F, // bcpl PD_ODR,#0
            0xAE, 0x10, 0x00, // ldw X,#0x1000
            0x5A, // decw X
            0x26, 0xFD, // jrne delay
            0x20, 0xF4, // jra loop
        ]
    );
    let labels: Vec<(&str, u32)> = result
        .labels()
        .iter()
        .map(|(n, a)| (n.as_str(), *a))
        .collect();
    assert_eq!(labels, [("start", 0x8000), ("loop", 0x8008), ("delay", 0x800F)]);
    assert!(result.is_complete());
}

#[test]
fn blinky_disassembly() {
    let result = blinky().finish().unwrap();
    let lines: Vec<String> = result
        .disassembly()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        lines,
        [
            "bset 0x5011,#0",
            "bset 0x5012,#0",
            "bcpl 0x500f,#0",
            "ldw X,#0x1000",
            "decw X",
            "jrne -0x03 ; 0x800f <delay>",
            "jra -0x0c ; 0x8008 <loop>",
        ]
    );
}

#[test]
fn blinky_listing() {
    let mut asm = blinky();
    asm.enable_listing();
    // Listing only covers statements emitted after it was enabled.
    asm.emit("ret").unwrap();
    let listing = asm.finish().unwrap().listing();
    assert!(listing.contains("008000                  start:"));
    assert!(listing.contains("008014  81                ret"));
}

#[test]
fn emit_in_chunks_matches_one_shot() {
    let mut asm = Assembler::new();
    for line in BLINKY.lines() {
        asm.emit(line).unwrap();
    }
    asm.define_external("PD_ODR", 0x500F)
        .define_external("PD_DDR", 0x5011)
        .define_external("PD_CR1", 0x5012)
        .base_address(0x8000);
    let chunked = asm.finish().unwrap().into_bytes();
    assert_eq!(chunked, blinky().finish().unwrap().into_bytes());
}

#[test]
fn builder_operands() {
    let mut asm = Assembler::new();
    asm.instruction(
        "ldw",
        &[
            Operand::new(OperandKind::OffsetSp, Value::Const(1)),
            Operand::register(Register::X),
        ],
    )
    .unwrap()
    .instruction("sub", &[Operand::register(Register::Sp), Operand::imm(4)])
    .unwrap();
    assert_eq!(asm.finish().unwrap().bytes(), &[0x1F, 0x01, 0x52, 0x04]);
}

// ============================================================================
// Relocations
// ============================================================================

#[test]
fn unresolved_relocations_carry_elf_numbers() {
    let mut asm = Assembler::new();
    asm.emit("callf far_handler\nldw X,#table\njrne missing").unwrap();
    let result = asm.finish().unwrap();
    assert_eq!(
        result.bytes(),
        &[0x8D, 0xAA, 0xAA, 0xAA, 0xAE, 0xAA, 0xAA, 0x26, 0xAA]
    );

    let relocs = result.relocations();
    let summary: Vec<(usize, RelocKind, Option<u32>, i64)> = relocs
        .iter()
        .map(|r| (r.offset, r.kind, r.kind.elf_type(), r.elf_addend()))
        .collect();
    assert_eq!(
        summary,
        [
            (1, RelocKind::Abs24, Some(R_STM8_24), 0),
            (5, RelocKind::Abs16, Some(R_STM8_16), 0),
            (8, RelocKind::PcRel8, Some(R_STM8_8_PCREL), -1),
        ]
    );

    let window = relocs[0].legacy_window();
    assert_eq!((window.offset, window.size, window.mask), (0, 4, 0x00FF_FFFF));
}

#[test]
fn handed_off_relocations_patch_like_the_assembler() {
    let mut asm = Assembler::new();
    asm.base_address(0x8000);
    asm.emit("nop\ncallf far_handler").unwrap();
    let result = asm.finish().unwrap();
    let mut code = result.bytes().to_vec();
    for reloc in result.relocations() {
        reloc.apply(&mut code, result.base_address(), 0x01_2345).unwrap();
    }
    let direct = assemble_with("nop\ncallf far_handler", 0x8000, &[("far_handler", 0x01_2345)])
        .unwrap();
    assert_eq!(code, direct);
}

// ============================================================================
// Decoding
// ============================================================================

#[test]
fn mov_operands_round_trip() {
    let src = ["mov 0x10.s,0x20.s", "mov 0x1000,#0x55", "mov 0x1000,0x2000"];
    let code = assemble(&src.join("\n")).unwrap();
    assert_eq!(
        code,
        vec![0x45, 0x20, 0x10, 0x35, 0x55, 0x10, 0x00, 0x55, 0x20, 0x00, 0x10, 0x00]
    );
    assert_eq!(texts(&code), src);
}

#[test]
fn addressing_modes_round_trip_as_text() {
    let src = [
        "ld A,#0x42",
        "ld A,0x10.s",
        "ld A,0x1234",
        "ld A,(X)",
        "ld A,(0x10,X)",
        "ld A,(0x1234,Y)",
        "ld A,(0x03,SP)",
        "ld A,[0x10]",
        "ld A,([0x1234.w],X)",
        "ldf A,([0x1234.e],Y)",
        "ldf A,0x012345",
        "ldw X,#0xbeef",
        "btjt 0x5000,#3,0x00",
        "exg A,XL",
    ];
    let code = assemble(&src.join("\n")).unwrap();
    assert_eq!(texts(&code), src);
}

#[test]
fn unknown_opcodes_do_not_stop_the_sweep() {
    let lines: Vec<String> = disassemble(&[0x72, 0xFF, 0x9D], 0x8000)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(lines, [".word 0x72ff ; unknown", "nop"]);
}

#[test]
fn truncated_instruction_is_a_fetch_error() {
    let mut mem = Memory::new(0x8000, &[0x9D, 0xAE, 0x12]);
    assert_eq!(
        decode(0x8001, &mut mem, &NoSymbols),
        Err(AsmError::Fetch {
            address: 0x8002,
            len: 2
        })
    );
}

#[test]
fn sweep_ending_mid_instruction_keeps_its_output() {
    let lines: Vec<String> = disassemble(&[0x9D, 0x9D, 0x81, 0xC6], 0x8000)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(lines, ["nop", "nop", "ret", ".byte 0xc6 ; truncated"]);
}

// ============================================================================
// Catalog and resolver
// ============================================================================

#[test]
fn shared_catalog_is_complete() {
    let cat = Catalog::shared();
    assert_eq!(cat.lookup("LDW").len(), cat.lookup("ldw").len());
    assert!(cat.mnemonics().any(|m| m == "wfe"));
    assert!(cat.mnemonic_count() > 90);
}

#[test]
fn resolve_then_encode() {
    let ops = [
        Operand::register(Register::A),
        Operand::new(OperandKind::OffsetY, Value::Const(0x150)),
    ];
    let entry = resolve("ld", &ops).unwrap();
    assert_eq!(entry.opcode, 0x90D6);
    assert_eq!(&*encode(entry, &ops).unwrap().bytes, &[0x90, 0xD6, 0x01, 0x50]);
}

#[test]
fn non_canonical_long_forms_reassemble_to_short_forms() {
    // Decoded text keeps the field width visible, but a constant below
    // 0x100 always selects the short form when assembled again.
    let long = disassemble(&[0xD6, 0x00, 0x10], 0);
    assert_eq!(long[0].text(), "ld A,(0x0010,X)");
    let short = assemble(&long[0].text()).unwrap();
    assert_eq!(short, vec![0xE6, 0x10]);
    assert_eq!(disassemble(&short, 0)[0].text(), "ld A,(0x10,X)");
}
