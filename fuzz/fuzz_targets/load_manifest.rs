#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(source) = std::str::from_utf8(data) {
        // Loading and checking must never panic, whatever the input.
        if let Ok(program) = modvis::load_program(source) {
            let _ = modvis::typeck::check_program(&program);
            let _ = modvis::typeck::summarize(&program.table);
        }
    }
});
