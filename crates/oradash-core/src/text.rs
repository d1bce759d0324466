//! Whitespace normalization for free-form SQL text.

/// Collapses runs of spaces outside single-quoted literals to one space.
///
/// Only `' '` is collapsed; tabs and line breaks are left alone. Literal
/// content is copied verbatim. A doubled quote (`''`) toggles twice and so
/// stays inside its literal. One leading space in the result is dropped.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_literal = false;
    let mut prev_space = false;

    for c in text.chars() {
        if c == '\'' {
            in_literal = !in_literal;
        }
        if in_literal || c == '\'' {
            out.push(c);
            prev_space = false;
            continue;
        }
        if c == ' ' {
            if !prev_space {
                out.push(' ');
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }

    match out.strip_prefix(' ') {
        Some(rest) => rest.to_string(),
        None => out,
    }
}
