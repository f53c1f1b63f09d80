use dragon_compiler::{compile_str, CompileError, CompileErrorKind, Type, TypeMismatch};

fn check_ok(src: &str) {
    if let Err(e) = compile_str(src) {
        panic!("expected OK, got {e}\nsource: {src}");
    }
}

fn check_err(src: &str) -> CompileError {
    match compile_str(src) {
        Ok(text) => panic!("compile should fail but produced:\n{text}"),
        Err(e) => e,
    }
}

fn type_err(src: &str) -> TypeMismatch {
    match check_err(src).kind {
        CompileErrorKind::Type(m) => m,
        other => panic!("expected a type error, got {other}"),
    }
}

#[test]
fn numeric_assignment_promotes_freely() {
    check_ok("{ int i; float f; char c; f = i; i = f; c = i + 1; i = c * 2.5; }");
}

#[test]
fn bool_and_numeric_do_not_mix_in_assignment() {
    assert_eq!(type_err("{ bool b; int i; b = i; }"), TypeMismatch::Assign { target: Type::Bool, value: Type::Int });
    assert_eq!(type_err("{ bool b; int i; i = b; }"), TypeMismatch::Assign { target: Type::Int, value: Type::Bool });
}

#[test]
fn whole_arrays_cannot_be_assigned() {
    type_err("{ int a[3]; int b[3]; a = b; }");
    type_err("{ int a[2][3]; a[1] = 5; }");
    type_err("{ int a[2][3]; int b[3]; a[1][0] = b; }");
}

#[test]
fn indexed_assignment_wants_same_type_or_both_numeric() {
    check_ok("{ float a[4]; a[0] = 1; }");
    check_ok("{ bool a[4]; a[0] = true; }");
    type_err("{ bool a[4]; a[0] = 1; }");
    type_err("{ int a[4]; a[0] = true; }");
}

#[test]
fn arithmetic_rejects_non_numeric_operands() {
    let m = type_err("{ int i; bool b; i = i + b; }");
    assert_eq!(m, TypeMismatch::Binary { op: "+", left: Type::Int, right: Type::Bool });
    type_err("{ int i; int a[2]; i = a * 2; }");
}

#[test]
fn unary_minus_promotes_to_at_least_int() {
    check_ok("{ char c; int i; i = -c; }");
    check_ok("{ float f; f = -f; }");
    assert_eq!(type_err("{ bool b; int i; i = -b; }"), TypeMismatch::Unary { op: "-", operand: Type::Bool });
}

#[test]
fn comparisons_need_identical_scalar_types() {
    check_ok("{ bool b; int i; b = i < 3; }");
    check_ok("{ bool b; bool c; b = b == c; }");
    type_err("{ bool b; int i; float f; b = i < f; }");
    type_err("{ bool b; char c; b = c == 1; }");
    type_err("{ bool b; int a[2]; int c[2]; b = a == c; }");
}

#[test]
fn logical_operators_need_bools() {
    type_err("{ bool b; int i; b = i && b; }");
    type_err("{ bool b; int i; b = b || i; }");
    assert_eq!(type_err("{ bool b; int i; b = !i; }"), TypeMismatch::Unary { op: "!", operand: Type::Int });
}

#[test]
fn conditions_must_be_boolean() {
    assert_eq!(
        type_err("{ int x; while (x) x = 0; }"),
        TypeMismatch::Condition { construct: "while", found: Type::Int }
    );
    type_err("{ int x; do x = 0; while (x + 1); }");
    type_err("{ int x; if (x) x = 0; }");
}

#[test]
fn indexing_a_scalar() {
    assert_eq!(type_err("{ int x; x[0] = 1; }"), TypeMismatch::NotAnArray(Type::Int));
    type_err("{ int a[3]; int x; x = a[0][1]; }");
    type_err("{ int a[3]; bool b; a[b] = 1; }");
}

#[test]
fn undeclared_identifiers() {
    let e = check_err("{ int x; y = 1; }");
    assert!(matches!(e.kind, CompileErrorKind::Undeclared { ref name } if name == "y"), "{e}");
    let e = check_err("{ { int y; } y = 1; }");
    assert!(matches!(e.kind, CompileErrorKind::Undeclared { .. }), "{e}");
    let e = check_err("{ int x; x = z + 1; }");
    assert!(matches!(e.kind, CompileErrorKind::Undeclared { ref name } if name == "z"), "{e}");
}

#[test]
fn break_outside_any_loop() {
    let e = check_err("{\n int x;\n break;\n}");
    assert!(matches!(e.kind, CompileErrorKind::UnenclosedBreak), "{e}");
    assert_eq!(e.line, 3);
    let e = check_err("{ while (true) ; break; }");
    assert!(matches!(e.kind, CompileErrorKind::UnenclosedBreak), "{e}");
}

#[test]
fn syntax_errors_carry_the_line() {
    let e = check_err("{\n int x\n x = 1;\n}");
    assert!(matches!(e.kind, CompileErrorKind::Syntax { .. }), "{e}");
    assert_eq!(e.line, 3);
    assert_eq!(e.to_string(), "line 3: syntax error: expected ';', found identifier");

    for src in ["{ int x; x = ; }", "{ int x; x = (1 + 2; }", "{ bool b; b = 1 < 2 < 3; }", "{ int x; x = 1; ", "{ } }"] {
        let e = check_err(src);
        assert!(matches!(e.kind, CompileErrorKind::Syntax { .. }), "{src}: {e}");
    }
}

#[test]
fn declarations_only_at_the_start_of_a_block() {
    let e = check_err("{ int x; x = 1; int y; }");
    assert!(matches!(e.kind, CompileErrorKind::Syntax { .. }), "{e}");
}

#[test]
fn array_dimensions_follow_the_name() {
    check_ok("{ int a[2][3]; float v[100]; a[1][2] = 5; v[99] = a[0][0]; }");
    let e = check_err("{ int[2] a; }");
    assert!(matches!(e.kind, CompileErrorKind::Syntax { .. }), "{e}");
    let e = check_err("{ int a[2; }");
    assert!(matches!(e.kind, CompileErrorKind::Syntax { .. }), "{e}");
}
