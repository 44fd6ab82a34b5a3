//! Compile-time assembly with `stm8_bytes!` and `stm8_array!` macros.
//!
//! These macros assemble STM8 instructions at compile time, producing
//! `&'static [u8]` or `[u8; N]` constants with zero runtime overhead.
//!
//! Run with: `cargo run --example compile_time_asm -p stm8-codec-macros`

use stm8_codec_macros::{stm8_array, stm8_bytes};

// ── Compile-time constants ──────────────────────────────────────────────

/// Reset handler: set up the stack, then jump to main in far memory
const RESET: &[u8] = stm8_bytes!(
    0x8000,
    "
    ldw X,#0x03FF
    ldw SP,X
    jpf main
",
    main = 0x008080
);

/// Interrupt vector entry: `int` opcode plus a 24-bit handler address
const VECTOR: [u8; 4] = stm8_array!("int 0x008000");

/// Toggle an LED on port D forever
const BLINK: &[u8] = stm8_bytes!(
    0x8080,
    "
    bset PD_DDR,#LED
    bset PD_CR1,#LED
loop:
    bcpl PD_ODR,#LED
    ldw X,#0xFFFF
delay:
    decw X
    jrne delay
    jra loop
",
    PD_ODR = 0x500F,
    PD_DDR = 0x5011,
    PD_CR1 = 0x5012,
    LED = 0
);

fn main() {
    println!("=== Compile-Time Assembly Demo ===\n");

    println!("Reset handler ({} bytes):", RESET.len());
    print_hex("  ", RESET);

    println!("\nVector entry ({} bytes):", VECTOR.len());
    print_hex("  ", &VECTOR);

    println!("\nBlink loop ({} bytes):", BLINK.len());
    print_hex("  ", BLINK);

    assert_eq!(VECTOR, [0x82, 0x00, 0x80, 0x00]);
    println!("\nAll compile-time assembly verified.");
}

fn print_hex(prefix: &str, bytes: &[u8]) {
    print!("{prefix}");
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            print!(" ");
        }
        print!("{b:02X}");
    }
    println!();
}
