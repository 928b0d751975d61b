use anyhow::{bail, Result};

/// Escape a string for use inside an assembler or CSV double-quoted literal.
/// Control characters become their backslash forms; quotes and backslashes
/// are backslash-protected. The surrounding quotes are NOT added.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '"' => out.push_str("\\\""),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape and wrap in double quotes.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape(s))
}

/// Inverse of [`quote`]: strip the surrounding quotes and undo the escapes.
pub fn unquote(s: &str) -> Result<String> {
    let inner = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .ok_or_else(|| anyhow::anyhow!("not a quoted string: {}", s))?;

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('a') => out.push('\u{7}'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => bail!("unknown escape \\{}", other),
            None => bail!("dangling backslash in quoted string"),
        }
    }
    Ok(out)
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer literal.
/// Octal is not supported: any other literal starting with `0` is an error.
pub fn parse_int(s: &str) -> Result<i64> {
    if s.is_empty() {
        bail!("empty integer literal");
    }
    let bytes = s.as_bytes();
    if bytes[0] == b'0' {
        if s.len() == 1 {
            return Ok(0);
        }
        if bytes[1] != b'x' && bytes[1] != b'X' {
            bail!("number should not begin with 0: {}", s);
        }
        let mut ret: i64 = 0;
        for &b in &bytes[2..] {
            let digit = match b {
                b'0'..=b'9' => (b - b'0') as i64,
                b'a'..=b'f' => (b - b'a') as i64 + 10,
                b'A'..=b'F' => (b - b'A') as i64 + 10,
                _ => bail!("invalid hexadecimal character in {}", s),
            };
            ret = ret * 16 + digit;
        }
        return Ok(ret);
    }

    let mut ret: i64 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            bail!("number should be decimal: {}", s);
        }
        ret = ret * 10 + (b - b'0') as i64;
    }
    Ok(ret)
}
