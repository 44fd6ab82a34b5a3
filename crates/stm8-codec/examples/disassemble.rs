//! Disassembly example: linear sweep over a firmware fragment, with a
//! symbol table and `tracing` output.
//!
//! Run with: `cargo run --example disassemble`

use std::collections::BTreeMap;

use stm8_codec::decoder::{decode, Disassembler, Memory};
use tracing::Level;

fn main() {
    // The codec only emits events; the host picks the subscriber.
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_target(false)
        .init();

    let firmware: &[u8] = &[
        0xAE, 0x03, 0xFF, // ldw X,#0x03ff
        0x94, // ldw SP,X
        0x72, 0x10, 0x50, 0x11, // bset 0x5011,#0
        0x90, 0x10, 0x50, 0x0F, // bcpl 0x500f,#0
        0x5A, // decw X
        0x26, 0xFD, // jrne -3
        0x20, 0xF7, // jra -9
        0x72, 0xFF, // not an opcode
        0x8E, // halt
    ];

    let symbols: BTreeMap<u32, &str> = [(0x8000, "reset"), (0x8008, "blink"), (0x800C, "delay")]
        .into_iter()
        .collect();
    let lookup = |addr: u32| symbols.get(&addr).map(|s| s.to_string());

    println!("=== Linear sweep ===");
    let listing = Disassembler::with_symbols(lookup)
        .disassemble(0x8000, firmware);
    for insn in &listing {
        if let Some(name) = symbols.get(&insn.address) {
            println!("{}:", name);
        }
        let hex: Vec<String> = insn.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        println!("  {:06X}  {:<15} {}", insn.address, hex.join(" "), insn);
    }

    println!("\n=== Truncated input ===");
    let mut mem = Memory::new(0x9000, &[0xBC, 0x01]);
    match decode(0x9000, &mut mem, &stm8_codec::decoder::NoSymbols) {
        Ok(insn) => println!("  {}", insn),
        Err(err) => println!("  error: {}", err),
    }
}
