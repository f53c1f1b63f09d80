use dragon_compiler::{compile_str, CompileErrorKind};

fn compile_ok(src: &str) -> String {
    match compile_str(src) {
        Ok(text) => text,
        Err(e) => panic!("compile failed: {e}\nsource: {src}"),
    }
}

#[test]
fn arithmetic_assignment_uses_one_temporary() {
    assert_eq!(compile_ok("{ int i; i = 1 + 2 * 3; }"), "L1:\tt1 = 2 * 3\n\ti = 1 + t1\nL2:\n");
}

#[test]
fn leaves_are_assigned_directly() {
    assert_eq!(compile_ok("{ int i; int j; i = j; }"), "L1:\ti = j\nL2:\n");
    assert_eq!(compile_ok("{ bool b; b = true; }"), "L1:\tb = true\nL2:\n");
    assert_eq!(compile_ok("{ float f; f = 2.5; }"), "L1:\tf = 2.5\nL2:\n");
}

#[test]
fn statements_in_sequence_get_a_label_between_them() {
    assert_eq!(compile_ok("{ int i; i = 1; i = 2; }"), "L1:\ti = 1\nL3:\ti = 2\nL2:\n");
}

#[test]
fn or_assigned_to_bool_shares_one_fall_through_label() {
    let expected = "L1:\tx = 1\n\
                    L3:\tif x < 5 goto L6\n\
                    \tiffalse x == 1 goto L4\n\
                    L6:\tt1 = true\n\
                    \tgoto L5\n\
                    L4:\tt1 = false\n\
                    L5:\tb = t1\n\
                    L2:\n";
    assert_eq!(compile_ok("{ bool b; int x; x = 1; b = x < 5 || x == 1; }"), expected);
}

#[test]
fn and_assigned_to_bool_jumps_straight_to_false() {
    let expected = "L1:\tiffalse x > 0 goto L3\n\
                    \tiffalse x < 9 goto L3\n\
                    \tt1 = true\n\
                    \tgoto L4\n\
                    L3:\tt1 = false\n\
                    L4:\tb = t1\n\
                    L2:\n";
    assert_eq!(compile_ok("{ bool b; int x; b = x > 0 && x < 9; }"), expected);
}

#[test]
fn not_swaps_the_targets() {
    let expected = "L1:\tif c goto L3\n\
                    \tt1 = true\n\
                    \tgoto L4\n\
                    L3:\tt1 = false\n\
                    L4:\tb = t1\n\
                    L2:\n";
    assert_eq!(compile_ok("{ bool b; bool c; b = !c; }"), expected);
}

#[test]
fn relational_operands_are_reduced_first() {
    let expected = "L1:\tt1 = x + 1\n\
                    \tiffalse t1 < y goto L2\n\
                    L3:\tx = y\n\
                    L2:\n";
    assert_eq!(compile_ok("{ int x; int y; if (x + 1 < y) x = y; }"), expected);
}

#[test]
fn if_without_else() {
    assert_eq!(compile_ok("{ int x; if (x > 0) x = 0; }"), "L1:\tiffalse x > 0 goto L2\nL3:\tx = 0\nL2:\n");
}

#[test]
fn if_else_jumps_over_the_else_branch() {
    let expected = "L1:\tiffalse x < y goto L4\n\
                    L3:\tx = y\n\
                    \tgoto L2\n\
                    L4:\ty = x\n\
                    L2:\n";
    assert_eq!(compile_ok("{ int x; int y; if (x < y) x = y; else y = x; }"), expected);
}

#[test]
fn while_retests_by_jumping_back_to_begin() {
    let expected = "L1:\tiffalse i < 10 goto L2\n\
                    L3:\ti = i + 1\n\
                    \tgoto L1\n\
                    L2:\n";
    assert_eq!(compile_ok("{ int i; while (i < 10) i = i + 1; }"), expected);
}

#[test]
fn do_while_loops_back_when_true() {
    let expected = "L1:\ti = 0\n\
                    L3:\ti = i + 1\n\
                    L4:\tif i < 10 goto L3\n\
                    L2:\n";
    assert_eq!(compile_ok("{ int i; i = 0; do i = i + 1; while (i < 10); }"), expected);
}

#[test]
fn break_leaves_its_own_loop() {
    assert_eq!(
        compile_ok("{ while (1 < 2) { break; } }"),
        "L1:\tiffalse 1 < 2 goto L2\nL3:\tgoto L2\n\tgoto L1\nL2:\n"
    );
}

#[test]
fn break_in_nested_loops_targets_the_innermost() {
    // inner `break` exits the do-while (L4), outer one exits the while (L2)
    let expected = "L1:L3:\tgoto L4\n\
                    L5:L4:\tgoto L2\n\
                    \tgoto L1\n\
                    L2:\n";
    assert_eq!(compile_ok("{ while (true) { do { break; } while (false); break; } }"), expected);
}

#[test]
fn break_inside_if_inside_loop() {
    let expected = "L1:\tiffalse i < 5 goto L2\n\
                    L3:\tiffalse i == 3 goto L4\n\
                    L5:\tgoto L2\n\
                    L4:\ti = i + 1\n\
                    \tgoto L1\n\
                    L2:\n";
    assert_eq!(compile_ok("{ int i; while (i < 5) { if (i == 3) break; i = i + 1; } }"), expected);
}

#[test]
fn two_dimensional_store_linearizes_row_major() {
    // 1 * (3 * 4) + 2 * 4 = 20 bytes from the base of a
    let expected = "L1:\tt1 = 1 * 12\n\
                    \tt2 = 2 * 4\n\
                    \tt3 = t1 + t2\n\
                    \ta [ t3 ] = 5\n\
                    L2:\n";
    assert_eq!(compile_ok("{ int a[2][3]; a[1][2] = 5; }"), expected);
}

#[test]
fn array_reads_are_materialized() {
    let expected = "L1:\tt1 = 3 * 4\n\
                    \tt2 = a [ t1 ]\n\
                    \tx = t2 + 1\n\
                    L2:\n";
    assert_eq!(compile_ok("{ int a[10]; int x; x = a[3] + 1; }"), expected);
    assert_eq!(compile_ok("{ int a[10]; int x; x = a[3]; }"), "L1:\tt1 = 3 * 4\n\tx = a [ t1 ]\nL2:\n");
}

#[test]
fn store_reduces_index_then_value() {
    // the real literal 2.0 prints as `2`
    let expected = "L1:\tt1 = i * 8\n\
                    \tt2 = i * 8\n\
                    \tt3 = b [ t2 ]\n\
                    \tt4 = t3 * 2\n\
                    \ta [ t1 ] = t4\n\
                    L2:\n";
    assert_eq!(compile_ok("{ float a[4]; float b[4]; int i; a[i] = b[i] * 2.0; }"), expected);
}

#[test]
fn array_element_as_condition() {
    // the store reduces its own copy of the index into a fresh temporary
    let expected = "L1:\tt1 = 0 * 1\n\
                    \tt2 = f [ t1 ]\n\
                    \tiffalse t2 goto L2\n\
                    L3:\tt3 = 0 * 1\n\
                    \tf [ t3 ] = false\n\
                    L2:\n";
    assert_eq!(compile_ok("{ bool f[2]; if (f[0]) f[0] = false; }"), expected);
}

#[test]
fn unary_minus() {
    assert_eq!(compile_ok("{ int x; int y; y = -x; }"), "L1:\ty = minus x\nL2:\n");
    assert_eq!(compile_ok("{ int x; int y; y = -(x + 1); }"), "L1:\tt1 = x + 1\n\ty = minus t1\nL2:\n");
}

#[test]
fn inner_declaration_shadows_outer() {
    assert_eq!(compile_ok("{ int x; { float x; x = 1.5; } x = 2; }"), "L1:\tx = 1.5\nL3:\tx = 2\nL2:\n");
}

#[test]
fn empty_programs_and_statements() {
    assert_eq!(compile_ok("{ }"), "L1:L2:\n");
    assert_eq!(compile_ok("{ ; ; }"), "L1:L2:\n");
    assert_eq!(compile_ok("{ int x; ; x = 1; ; }"), "L1:\tx = 1\nL2:\n");
}

#[test]
fn constant_conditions_emit_only_requested_jumps() {
    // `true` with only a false target emits nothing
    assert_eq!(compile_ok("{ int x; if (true) x = 1; }"), "L1:L3:\tx = 1\nL2:\n");
    assert_eq!(compile_ok("{ int x; if (false) x = 1; }"), "L1:\tgoto L2\nL3:\tx = 1\nL2:\n");
}

#[test]
fn redeclaration_in_one_block_keeps_the_last_type() {
    assert_eq!(compile_ok("{ int x; bool x; x = true; }"), "L1:\tx = true\nL2:\n");
    let err = compile_str("{ bool x; int x; x = true; }").unwrap_err();
    assert!(matches!(err.kind, CompileErrorKind::Type(_)), "{err}");
}
