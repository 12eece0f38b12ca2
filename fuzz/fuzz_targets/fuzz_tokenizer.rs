#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str, &str)| {
    // Fuzz tokenization across arbitrary content, language and algorithm
    // combinations. Tokenization never fails, so it must never panic either.
    let (content, language, algorithm) = data;
    let _ = dxi::tokenizer::tokenize(content, language, algorithm);
});
