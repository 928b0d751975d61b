mod common;
use common::compile;

#[test]
fn if_skips_body_when_condition_is_zero() {
    let asm = compile(
        r#"
        void f() {
            int x;
            if (x) {
                x = 1;
            }
        }
    "#,
    );
    assert!(asm.contains("\tcmp $0, %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tje .L0\n"), "asm:\n{}", asm);
    assert!(asm.contains(".L0:\n"), "asm:\n{}", asm);
}

#[test]
fn if_else_emits_both_arms_and_a_join() {
    let asm = compile(
        r#"
        void f() {
            int x;
            int y;
            if (x) {
                y = 1;
            } else {
                y = 2;
            }
        }
    "#,
    );

    // else label then end label
    assert!(asm.contains("\tje .L0\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tjmp .L1\n"), "asm:\n{}", asm);
    assert!(asm.contains(".L0:\n"), "asm:\n{}", asm);
    assert!(asm.contains(".L1:\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq $1, %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq $2, %rax\n"), "asm:\n{}", asm);
}

#[test]
fn comparison_produces_zero_or_one() {
    let asm = compile(
        r#"
        void f() {
            int a;
            int b;
            int c;
            c = a != b;
        }
    "#,
    );
    assert!(asm.contains("\tcmp %r10, %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tjne .L0\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq $0, %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq $1, %rax\n"), "asm:\n{}", asm);
}

#[test]
fn all_six_comparisons_lower_to_their_jumps() {
    let ops = [
        ("==", "je"),
        ("!=", "jne"),
        (">", "jg"),
        (">=", "jge"),
        ("<", "jl"),
        ("<=", "jle"),
    ];
    for (op, jcc) in ops {
        let src = format!(
            "void f() {{ int a; int b; int c; c = a {} b; }}",
            op
        );
        let asm = compile(&src);
        assert!(
            asm.contains(&format!("\t{} .L", jcc)),
            "expected {} for {}, asm:\n{}",
            jcc,
            op,
            asm
        );
    }
}
