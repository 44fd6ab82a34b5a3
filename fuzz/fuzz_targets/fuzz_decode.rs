#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The sweep never fails and accounts for every byte.
    let listing = stm8_codec::disassemble(data, 0x8000);
    let covered: usize = listing.iter().map(|insn| insn.len()).sum();
    assert_eq!(covered, data.len());

    // Decoded text goes back through the front end.
    for insn in listing.iter().filter(|insn| !insn.is_unknown()) {
        let _ = stm8_codec::assemble_at(&insn.text(), insn.address);
    }
});
