//! Fuzz target for namespace declaration matching.
//!
//! Run with: cargo +nightly fuzz run fuzz_declaration_match
//!
//! The first byte splits the input into a line and a namespace. Checks that
//! the matcher never panics, that a match always starts with the keyword,
//! and that a generated declaration always matches its own namespace.

#![no_main]

use crossgrade_config::namespace::check_namespace;
use crossgrade_core::Dialect;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let Ok(text) = std::str::from_utf8(rest) else {
        return;
    };
    let split = split as usize % (text.len() + 1);
    if !text.is_char_boundary(split) {
        return;
    }
    let (line, namespace) = text.split_at(split);

    for dialect in [Dialect::JAVA, Dialect::CSHARP] {
        if dialect.is_declaration_of(line, namespace) {
            assert!(line.trim_start().starts_with(dialect.keyword()));
        }
        if check_namespace(namespace).is_ok() {
            assert!(dialect.is_declaration_of(&dialect.declaration(namespace), namespace));
            assert!(!dialect.is_declaration_of(&dialect.wildcard_import(namespace), namespace));
        }
    }
});
