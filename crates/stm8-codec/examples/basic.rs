//! Basic assembly example: demonstrates the one-shot and builder APIs.
//!
//! Run with: `cargo run --example basic`

use stm8_codec::{assemble, Assembler};

fn main() {
    println!("=== stm8_codec basic example ===\n");

    // --- One-shot assembly ---
    println!("1. One-shot assembly (ld A,#42; ret):");
    let bytes = assemble("ld A,#42\nret").unwrap();
    print_hex("   ", &bytes);

    // --- Builder API ---
    println!("\n2. Builder API (copy loop):");
    let mut asm = Assembler::new();
    asm.base_address(0x8000)
        .define_external("RAM_BUF", 0x0100)
        .enable_listing();
    asm.emit(
        r#"
entry:
    ldw X,#table        ; source
    ldw Y,#RAM_BUF      ; destination
copy:
    ld A,(X)
    ld (Y),A
    incw X
    incw Y
    cpw X,#table_end
    jrne copy
    ret
table:
    .byte 0xDE, 0xAD, 0xBE, 0xEF
table_end:
"#,
    )
    .unwrap();

    let result = asm.finish().unwrap();
    print_hex("   ", result.bytes());

    // Label addresses
    println!("\n   Labels:");
    for (name, addr) in result.labels() {
        println!("   {}: 0x{:06X}", name, addr);
    }

    // Listing output
    println!("\n   Listing:");
    for line in result.listing().lines() {
        println!("   {}", line);
    }

    // --- Short vs long forms ---
    println!("\n3. Short vs long addressing:");
    for src in ["ld A,(0x50,X)", "ld A,(0x150,X)", "ld A,var.s", "ld A,var"] {
        let mut asm = Assembler::new();
        asm.define_external("var", 0x40);
        asm.emit(src).unwrap();
        let result = asm.finish().unwrap();
        print!("   {:<16} -> ", src);
        print_hex("", result.bytes());
    }

    // --- Unresolved symbols ---
    println!("\n4. Relocations left for a linker:");
    let mut asm = Assembler::new();
    asm.emit("callf far_handler\njrne elsewhere").unwrap();
    let result = asm.finish().unwrap();
    print_hex("   ", result.bytes());
    for reloc in result.relocations() {
        println!(
            "   offset {} {:?} R_STM8 type {:?} addend {} -> {}",
            reloc.offset,
            reloc.kind,
            reloc.kind.elf_type(),
            reloc.elf_addend(),
            reloc.symbol
        );
    }

    println!("\n=== Done! ===");
}

fn print_hex(prefix: &str, bytes: &[u8]) {
    print!("{}", prefix);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && i % 16 == 0 {
            println!();
            print!("{}", prefix);
        }
        print!("{:02X} ", b);
    }
    println!();
}
