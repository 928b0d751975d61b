use anyhow::{bail, Result};

use crate::token::{keyword_label, Token, TokenLabel as L};

/// Single forward cursor over the raw source bytes. Produces the primary
/// token stream; refinement happens in [`relabel`].
struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    len: usize,
    pos: usize,
    line: u32,
}

fn is_identifier(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

/// Fixed mapping from a single character to its primary label. Whitespace
/// and anything unrecognized map to `Null`.
fn label_of_char(ch: u8) -> L {
    match ch {
        b';' => L::Semicolon,
        b'(' => L::LeftParen,
        b')' => L::RightParen,
        b'[' => L::LeftSq,
        b']' => L::RightSq,
        b'{' => L::LeftBracket,
        b'}' => L::RightBracket,
        b':' => L::Colon,
        b'?' => L::Question,
        b'#' => L::Sharp,
        _ if b"~!%^&*-+=|,.<>?:/".contains(&ch) => L::Operator,
        _ => L::Null,
    }
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            len: src.len(),
            pos: 0,
            line: 1,
        }
    }

    /// Scan forward from `from + 1` to the next occurrence of `ch`, honoring
    /// backslash escapes (the escaped byte is consumed) and counting
    /// newlines. Returns the index of the match, or the end of input.
    fn find_next(&mut self, from: usize, ch: u8) -> usize {
        let mut ret = from + 1;
        while ret < self.len {
            if self.bytes[ret] == ch {
                break;
            }
            if self.bytes[ret] == b'\n' {
                self.line += 1;
            }
            if self.bytes[ret] == b'\\' {
                ret += 1;
                if ret < self.len && self.bytes[ret] == b'\n' {
                    self.line += 1;
                }
            }
            ret += 1;
        }
        ret.min(self.len)
    }

    fn push_slice(&self, tokens: &mut Vec<Token>, start: usize, end: usize, label: L, line: u32) {
        tokens.push(Token::new(&self.src[start..end.min(self.len)], label, line));
    }

    fn scan(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while self.pos < self.len {
            let i = self.pos;
            let ch = self.bytes[i];
            let oldno = self.line;

            if is_identifier(ch) {
                let mut j = i + 1;
                while j < self.len && is_identifier(self.bytes[j]) {
                    j += 1;
                }
                self.push_slice(&mut tokens, i, j, L::Alpha, oldno);
                self.pos = j;
                continue;
            }

            match ch {
                b'\'' | b'"' => {
                    let label = if ch == b'\'' { L::Quote } else { L::DoubleQuote };
                    let j = self.find_next(i, ch) + 1;
                    self.push_slice(&mut tokens, i, j, label, oldno);
                    self.pos = j.min(self.len);
                }

                // preprocessor lines are treated as comments
                b'#' => {
                    let j = self.find_next(i, b'\n');
                    self.push_slice(&mut tokens, i, j, L::Null, oldno);
                    self.pos = j;
                }

                b'/' => {
                    let next = if i + 1 < self.len { self.bytes[i + 1] } else { 0 };
                    if next == b'/' {
                        let j = self.find_next(i, b'\n');
                        self.push_slice(&mut tokens, i, j, L::Null, oldno);
                        self.pos = j;
                    } else if next == b'*' {
                        let mut j = i + 2;
                        while j < self.len {
                            if self.bytes[j] == b'\n' {
                                self.line += 1;
                            }
                            if self.bytes[j] == b'*'
                                && j + 1 < self.len
                                && self.bytes[j + 1] == b'/'
                            {
                                break;
                            }
                            j += 1;
                        }
                        // unterminated comments are bounded at end of input
                        let j = (j + 2).min(self.len);
                        self.push_slice(&mut tokens, i, j, L::Null, oldno);
                        self.pos = j;
                    } else {
                        self.push_slice(&mut tokens, i, i + 1, L::Operator, oldno);
                        self.pos = i + 1;
                    }
                }

                b'\n' => {
                    self.push_slice(&mut tokens, i, i + 1, L::Null, oldno);
                    self.line += 1;
                    self.pos = i + 1;
                }

                _ => {
                    // non-ASCII bytes travel as one null token per character
                    let width = if ch < 0x80 {
                        1
                    } else {
                        self.src[i..]
                            .chars()
                            .next()
                            .map(|c| c.len_utf8())
                            .unwrap_or(1)
                    };
                    self.push_slice(&mut tokens, i, i + width, label_of_char(ch), oldno);
                    self.pos = i + width;
                }
            }
        }

        tokens
    }
}

/// Refinement pass: promote keywords, split `Alpha` into identifiers vs
/// digit-leading literals, and merge multi-character operators with
/// one-token lookahead.
fn relabel(tokens: Vec<Token>) -> Result<Vec<Token>> {
    let mut out = Vec::with_capacity(tokens.len());
    let len = tokens.len();
    let mut i = 0;

    while i < len {
        let t = &tokens[i];
        match t.label {
            L::Alpha => {
                if let Some(kw) = keyword_label(&t.buf) {
                    out.push(Token::new(&t.buf, kw, t.line));
                } else if t.buf.as_bytes()[0].is_ascii_digit() {
                    // `0xFF` included: any digit-leading word is a literal
                    out.push(Token::new(&t.buf, L::Digit, t.line));
                } else {
                    out.push(t.clone());
                }
                i += 1;
            }

            L::Operator => {
                let next: &str = tokens.get(i + 1).map(|n| n.buf.as_str()).unwrap_or("");
                let ch = t.buf.as_bytes()[0];
                let (text, label, step): (&str, L, usize) = match ch {
                    b'/' if next == "=" => ("/=", L::DivAssign, 2),
                    b'/' => ("/", L::Div, 1),
                    b'%' if next == "=" => ("%=", L::RemAssign, 2),
                    b'%' => ("%", L::Rem, 1),
                    b'*' if next == "=" => ("*=", L::MulAssign, 2),
                    b'*' => ("*", L::Mul, 1),
                    b'^' if next == "=" => ("^=", L::XorAssign, 2),
                    b'^' => ("^", L::Xor, 1),
                    b'.' => (".", L::Dot, 1),
                    b',' => (",", L::Comma, 1),
                    b'~' => ("~", L::Flip, 1),
                    b'+' if next == "+" => ("++", L::Incr, 2),
                    b'+' if next == "=" => ("+=", L::AddAssign, 2),
                    b'+' => ("+", L::Add, 1),
                    b'-' if next == "-" => ("--", L::Decr, 2),
                    b'-' if next == ">" => ("->", L::Arrow, 2),
                    b'-' if next == "=" => ("-=", L::SubAssign, 2),
                    b'-' => ("-", L::Sub, 1),
                    b'=' if next == "=" => ("==", L::Eq, 2),
                    b'=' => ("=", L::Assign, 1),
                    b'!' if next == "=" => ("!=", L::Ne, 2),
                    b'!' => ("!", L::Not, 1),
                    b'>' if next == "=" => (">=", L::Ge, 2),
                    b'>' if next == ">" => (">>", L::Shr, 2),
                    b'>' => (">", L::Gt, 1),
                    b'<' if next == "=" => ("<=", L::Le, 2),
                    b'<' if next == "<" => ("<<", L::Shl, 2),
                    b'<' => ("<", L::Lt, 1),
                    b'&' if next == "&" => ("&&", L::And, 2),
                    b'&' if next == "=" => ("&=", L::AndAssign, 2),
                    b'&' => ("&", L::Adrp, 1),
                    b'|' if next == "|" => ("||", L::Or, 2),
                    b'|' if next == "=" => ("|=", L::OrAssign, 2),
                    b'|' => ("|", L::Pipe, 1),
                    _ => bail!(
                        "line {}: unknown operator {}",
                        t.line,
                        support::quote(&t.buf)
                    ),
                };
                out.push(Token::new(text, label, t.line));
                i += step;
            }

            _ => {
                out.push(t.clone());
                i += 1;
            }
        }
    }

    Ok(out)
}

/// Coalesce runs of adjacent null tokens into one, keeping the first line.
fn merge_null_tokens(tokens: Vec<Token>) -> Vec<Token> {
    let mut ret: Vec<Token> = Vec::with_capacity(tokens.len());
    for t in tokens {
        match ret.last_mut() {
            Some(prev) if prev.label == L::Null && t.label == L::Null => {
                prev.buf.push_str(&t.buf);
            }
            _ => ret.push(t),
        }
    }
    ret
}

fn remove_null_tokens(tokens: Vec<Token>) -> Vec<Token> {
    tokens.into_iter().filter(|t| t.label != L::Null).collect()
}

/// Tokenize a full source file. With `ignore_null` set, comment/whitespace
/// tokens are dropped; otherwise adjacent null tokens are merged so that the
/// stream still covers every input byte.
pub fn tokenize(src: &str, ignore_null: bool) -> Result<Vec<Token>> {
    let tokens = Scanner::new(src).scan();
    let tokens = relabel(tokens)?;
    if ignore_null {
        Ok(remove_null_tokens(tokens))
    } else {
        Ok(merge_null_tokens(tokens))
    }
}
