use lex::{tokenize, TokenLabel};

// The preserve-nulls stream must cover every input byte: concatenating the
// token texts in order reproduces the source exactly.

fn rebuild(src: &str) -> String {
    let toks = tokenize(src, false).expect("lex ok");
    toks.iter().map(|t| t.buf.as_str()).collect()
}

#[test]
fn concatenation_reproduces_source() {
    let samples = [
        "int main() { return 0; }\n",
        "// comment\nint x;\n/* block\ncomment */\nchar *p;\n",
        "#include <stdio.h>\nint a; a = 0x10;\n",
        "while (x) { x = x + 1; }\n",
        "s = \"he\\\"llo\\n\";\nc = 'q';\n",
        "a ++; b --; c += 2; d -> e;\n",
        "\t  \n\n",
    ];
    for src in samples {
        assert_eq!(rebuild(src), src, "byte coverage broken for {:?}", src);
    }
}

#[test]
fn unterminated_quote_is_bounded_at_eof() {
    let src = "s = \"no end";
    assert_eq!(rebuild(src), src);
}

#[test]
fn unterminated_block_comment_is_bounded_at_eof() {
    let src = "int x; /* never closed";
    assert_eq!(rebuild(src), src);
}

#[test]
fn line_numbers_are_monotone() {
    let src = "int a;\nint b;\n/* c\nd */\nint e; // f\nint g;\n";
    let toks = tokenize(src, false).expect("lex ok");
    let mut last = 0u32;
    for t in &toks {
        assert!(
            t.line >= last,
            "line went backwards at token {:?} ({} < {})",
            t.buf,
            t.line,
            last
        );
        last = t.line;
    }
}

#[test]
fn escaped_newline_in_string_counts_lines() {
    let src = "s = \"one\\\ntwo\";\nint x;\n";
    let toks = tokenize(src, true).expect("lex ok");
    let x = toks
        .iter()
        .find(|t| t.label == TokenLabel::Int)
        .expect("int token");
    assert_eq!(x.line, 3);
}
