#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Front end must never panic, only return Ok/Err.
    let _ = stm8_codec::assemble(data);
    let _ = stm8_codec::assemble_at(data, 0x8000);

    // Builder API with one emit call per line.
    let mut asm = stm8_codec::Assembler::new();
    asm.enable_listing();
    for line in data.lines() {
        let _ = asm.emit(line);
    }
    if let Ok(result) = asm.finish() {
        let _ = result.listing();
        let covered: usize = result.disassembly().iter().map(|insn| insn.len()).sum();
        assert_eq!(covered, result.len());
    }
});
