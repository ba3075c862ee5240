//! Names artifact: one UTF-8 name per line.
//!
//! Backslash, newline and carriage return are escaped (`\\`, `\n`, `\r`)
//! so a name can never split into two lines and misalign the record
//! order. Files written without escapes or without a final newline still
//! decode, as long as they contain no stray backslash sequences.

pub(crate) fn encode<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for name in names {
        for ch in name.chars() {
            match ch {
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                c => out.push(c),
            }
        }
        out.push('\n');
    }
    out
}

pub(crate) fn decode(content: &str) -> Result<Vec<String>, String> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| unescape(line).map_err(|e| format!("line {}: {e}", i + 1)))
        .collect()
}

fn unescape(line: &str) -> Result<String, String> {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => return Err(format!("unknown escape sequence '\\{other}'")),
            None => return Err("dangling escape at end of name".into()),
        }
    }
    Ok(out)
}
