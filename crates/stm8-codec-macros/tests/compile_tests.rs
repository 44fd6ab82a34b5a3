//! Integration tests for `stm8_bytes!` and `stm8_array!` proc-macros.

use stm8_codec_macros::{stm8_array, stm8_bytes};

// ── Single instructions ─────────────────────────────────────────────────────

#[test]
fn nop() {
    const CODE: &[u8] = stm8_bytes!("nop");
    assert_eq!(CODE, &[0x9D]);
}

#[test]
fn prefixed_opcode() {
    const CODE: &[u8] = stm8_bytes!("mul Y,A");
    assert_eq!(CODE, &[0x90, 0x42]);
}

#[test]
fn far_jump() {
    const CODE: &[u8] = stm8_bytes!("jpf 0x008080");
    assert_eq!(CODE, &[0xAC, 0x00, 0x80, 0x80]);
}

#[test]
fn mov_short() {
    const CODE: &[u8] = stm8_bytes!("mov 0x10.s,0x20.s");
    // Source field is written first
    assert_eq!(CODE, &[0x45, 0x20, 0x10]);
}

// ── Multi-line / labels ─────────────────────────────────────────────────────

#[test]
fn multi_instruction() {
    const CODE: &[u8] = stm8_bytes!("ld A,#0x42\nret");
    assert_eq!(CODE, &[0xA6, 0x42, 0x81]);
}

#[test]
fn with_label_and_base_address() {
    const CODE: &[u8] = stm8_bytes!(
        0x8000,
        "
        spin:
            wfi
            jra spin
    "
    );
    assert_eq!(CODE, &[0x8F, 0x20, 0xFD]);
}

#[test]
fn raw_string() {
    const CODE: &[u8] = stm8_bytes!(
        r#"
        nop   ; idle
        ret
    "#
    );
    assert_eq!(CODE, &[0x9D, 0x81]);
}

#[test]
fn decimal_base_address() {
    const CODE: &[u8] = stm8_bytes!(32768, "here: jra here");
    assert_eq!(CODE, &[0x20, 0xFE]);
}

// ── Externals ───────────────────────────────────────────────────────────────

#[test]
fn externals_define_symbols() {
    const CODE: &[u8] = stm8_bytes!("bres PD_ODR,#LED", PD_ODR = 0x500F, LED = 0);
    assert_eq!(CODE, &[0x72, 0x11, 0x50, 0x0F]);
}

#[test]
fn externals_with_base_and_trailing_comma() {
    const CODE: &[u8] = stm8_bytes!(0x8000, "callf handler", handler = 0x01_0000,);
    assert_eq!(CODE, &[0x8D, 0x01, 0x00, 0x00]);
}

// ── Array form ──────────────────────────────────────────────────────────────

#[test]
fn array_form() {
    const CODE: [u8; 1] = stm8_array!("halt");
    assert_eq!(CODE, [0x8E]);
}

#[test]
fn array_multi() {
    const CODE: [u8; 5] = stm8_array!("ldw X,#0x03FF\nldw SP,X\nret");
    assert_eq!(CODE, [0xAE, 0x03, 0xFF, 0x94, 0x81]);
}

// ── Const contexts / data ───────────────────────────────────────────────────

#[test]
fn const_in_static_context() {
    static BYTES: &[u8] = stm8_bytes!("ret");
    assert_eq!(BYTES, &[0x81]);
}

#[test]
fn array_in_static_context() {
    static BYTES: [u8; 1] = stm8_array!("retf");
    assert_eq!(BYTES, [0x87]);
}

#[test]
fn data_directive() {
    const CODE: &[u8] = stm8_bytes!(".byte 0xCC\n.word 0x1234");
    assert_eq!(CODE, &[0xCC, 0x12, 0x34]);
}
