#![no_main]
use libfuzzer_sys::fuzz_target;
use quadra::config::ParserConfig;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text through the whole front end - should never panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tokens) = quadra::lexer::lex(s, 0) {
            let _ = quadra::parser::Parser::with_config(&tokens, ParserConfig::default()).parse_program();
        }
    }
});
