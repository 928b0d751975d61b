pub mod block;
mod parser;

pub use block::{BasicBlock, BlockType, Instruction};
pub use parser::parse_blocks;

#[cfg(test)]
mod tests {
    use super::*;
    use lex::tokenize;

    fn parse(src: &str) -> BasicBlock {
        let toks = tokenize(src, true).expect("lex ok");
        parse_blocks(&toks).expect("parse ok")
    }

    #[test]
    fn function_vs_var_declaration() {
        let root = parse("int x;\nint main() { return 0; }\n");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].kind, BlockType::VarDeclare);
        assert_eq!(root.children[1].kind, BlockType::Function);
    }

    #[test]
    fn function_body_is_attached() {
        let root = parse("void f() { int a; }");
        let f = &root.children[0];
        assert_eq!(f.kind, BlockType::Function);
        assert_eq!(f.children.len(), 1);
        assert!(f.children[0].braced);
        assert_eq!(f.children[0].children[0].kind, BlockType::VarDeclare);
    }

    #[test]
    fn if_else_blocks_are_merged() {
        let root = parse("void f() { if (x) { a = 1; } else { a = 2; } }");
        let body = &root.children[0].children[0];
        assert_eq!(body.children.len(), 1);
        let ifelse = &body.children[0];
        assert_eq!(ifelse.kind, BlockType::IfElse);
        assert_eq!(ifelse.children.len(), 2);
    }

    #[test]
    fn stray_else_is_an_error() {
        let toks = tokenize("void f() { else { a = 1; } }", true).unwrap();
        assert!(parse_blocks(&toks).is_err());
    }

    #[test]
    fn do_while_takes_body_and_condition() {
        let root = parse("void f() { do { x = 1; } while (x); }");
        let body = &root.children[0].children[0];
        let do_block = &body.children[0];
        assert_eq!(do_block.kind, BlockType::Do);
        assert_eq!(do_block.children.len(), 2);
        assert_eq!(do_block.children[1].kind, BlockType::While);
    }

    #[test]
    fn bare_braces_make_an_empty_compound() {
        let root = parse("void f() { { } }");
        let body = &root.children[0].children[0];
        let inner = &body.children[0];
        assert!(inner.braced);
        assert!(inner.children.is_empty());
        assert!(inner.instr.is_empty());
        assert!(inner.dump().contains("{ }"));
    }

    #[test]
    fn func_calls_are_derived_from_instruction() {
        let root = parse("void f() { g(a, b); }");
        let body = &root.children[0].children[0];
        let call = &body.children[0];
        assert_eq!(call.instr.func_calls(), vec!["g".to_string()]);
        assert_eq!(
            call.instr.var_names(),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
