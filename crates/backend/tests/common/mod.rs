use backend::X86Generator;
use lex::tokenize;
use parse::parse_blocks;

pub fn compile(src: &str) -> String {
    let toks = tokenize(src, true).expect("lex ok");
    let root = parse_blocks(&toks).expect("parse ok");
    X86Generator::new().generate(&root).expect("emit ok")
}

pub fn compile_err(src: &str) -> anyhow::Error {
    let toks = tokenize(src, true).expect("lex ok");
    let root = parse_blocks(&toks).expect("parse ok");
    X86Generator::new()
        .generate(&root)
        .expect_err("expected code generation to fail")
}
