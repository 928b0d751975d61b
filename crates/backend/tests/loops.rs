mod common;
use common::{compile, compile_err};

#[test]
fn while_loop_brackets_body_with_fresh_labels() {
    let asm = compile(
        r#"
        void f() {
            int x;
            x = 3;
            while (x) {
                x = x + 1;
            }
        }
    "#,
    );

    // entry label, test, exit branch, backedge, exit label
    assert!(asm.contains(".L0:\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tcmp $0, %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tje .L1\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tjmp .L0\n"), "asm:\n{}", asm);
    assert!(asm.contains(".L1:\n"), "asm:\n{}", asm);

    // the body loads x, adds one, and stores back
    assert!(asm.contains("\tmovl 0(%rsp), %eax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq $1, %r10\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tadd %r10, %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovl %eax, 0(%rsp)\n"), "asm:\n{}", asm);
}

#[test]
fn while_zero_condition_is_a_constant_test() {
    let asm = compile(
        r#"
        void f() {
            while (0) {
                f();
            }
        }
    "#,
    );
    assert!(asm.contains("\tmovq $0, %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tcmp $0, %rax\n"), "asm:\n{}", asm);
}

#[test]
fn nested_whiles_use_distinct_labels() {
    let asm = compile(
        r#"
        void f() {
            int x;
            while (x) {
                while (x) {
                    x = x + 1;
                }
            }
        }
    "#,
    );
    for label in [".L0:", ".L1:", ".L2:", ".L3:"] {
        assert!(asm.contains(label), "missing {} in:\n{}", label, asm);
    }
}

#[test]
fn while_with_compound_condition_is_rejected() {
    let err = compile_err("void f() { int x; while (x + 1) { x = 0; } }");
    assert!(
        format!("{}", err).contains("single value"),
        "unexpected error: {}",
        err
    );
}
