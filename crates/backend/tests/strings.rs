mod common;
use common::compile;

#[test]
fn string_argument_is_interned_into_rodata() {
    let asm = compile(
        r#"
        void f() {
            puts("hello");
        }
    "#,
    );
    assert!(asm.contains("\tleaq .LC0(%rip), %rdi\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tcall puts\n"), "asm:\n{}", asm);
    assert!(asm.contains("\t.section .rodata\n"), "asm:\n{}", asm);
    assert!(asm.contains(".LC0:\n\t.string \"hello\"\n"), "asm:\n{}", asm);
}

#[test]
fn identical_literals_share_one_label() {
    let asm = compile(
        r#"
        void f() {
            puts("hello");
            puts("hello");
            puts("world");
        }
    "#,
    );
    assert_eq!(
        asm.matches("\t.string \"hello\"").count(),
        1,
        "asm:\n{}",
        asm
    );
    assert!(asm.contains(".LC1:\n\t.string \"world\"\n"), "asm:\n{}", asm);
    assert_eq!(asm.matches("leaq .LC0(%rip)").count(), 2, "asm:\n{}", asm);
}

#[test]
fn string_assignment_loads_the_label() {
    let asm = compile(
        r#"
        void f() {
            char *s;
            s = "greeting";
        }
    "#,
    );
    assert!(asm.contains("\tleaq .LC0(%rip), %rax\n"), "asm:\n{}", asm);
    assert!(asm.contains("\tmovq %rax, 0(%rsp)\n"), "asm:\n{}", asm);
}

#[test]
fn rodata_dump_is_in_allocation_order() {
    let asm = compile(
        r#"
        void f() {
            puts("first");
            puts("second");
            puts("third");
        }
    "#,
    );
    let first = asm.find(".LC0:").unwrap();
    let second = asm.find(".LC1:").unwrap();
    let third = asm.find(".LC2:").unwrap();
    assert!(first < second && second < third, "asm:\n{}", asm);
}
