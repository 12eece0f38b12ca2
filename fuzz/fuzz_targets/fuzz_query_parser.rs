#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Fuzz the query lexer with arbitrary strings
    // This should not panic or cause undefined behavior
    let _ = dxi::query::parse_query(data);
    let _ = dxi::query::query_terms(data);
});
