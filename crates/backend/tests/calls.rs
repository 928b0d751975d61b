mod common;
use common::{compile, compile_err};

#[test]
fn arguments_fill_the_sysv_registers_in_order() {
    let asm = compile(
        r#"
        void f() {
            char *pt;
            write(1, pt, 1);
        }
    "#,
    );
    assert!(asm.contains("\tmovq $1, %rdi\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq 0(%rsp), %rsi\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq $1, %rdx\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tcall write\n"), "asm:\n{}", asm);
}

#[test]
fn call_result_is_stored_from_rax() {
    let asm = compile(
        r#"
        void f() {
            int ret;
            ret = getpid();
        }
    "#,
    );
    assert!(asm.contains("\tcall getpid\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovl %eax, 0(%rsp)\n"), "asm:\n{}", asm);
}

#[test]
fn six_arguments_are_the_limit() {
    let asm = compile("void f() { g(1, 2, 3, 4, 5, 6); }");
    for reg in ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"] {
        assert!(asm.contains(reg), "missing {} in:\n{}", reg, asm);
    }

    let err = compile_err("void f() { g(1, 2, 3, 4, 5, 6, 7); }");
    assert!(
        format!("{}", err).contains("more than 6"),
        "unexpected error: {}",
        err
    );
}

#[test]
fn exit_call_at_the_end_of_start() {
    let asm = compile(
        r#"
        void _start() {
            exit(0);
        }
    "#,
    );
    assert!(asm.contains("\tmovq $0, %rdi\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tcall exit\n"), "asm:\n{}", asm);
}
