//! End-to-end source-to-output scenarios, exercised against the public
//! `interpret_to`/`interpret` API rather than any crate-internal state.

use wisp::{InterpretResult, VirtualMachine};

fn run(source: &str) -> (InterpretResult, String) {
    let mut vm = VirtualMachine::new();
    let mut out = Vec::new();
    let result = vm.interpret_to(source, &mut out);
    (result, String::from_utf8(out).expect("output should be valid UTF-8"))
}

#[test]
fn adds_two_numbers() {
    let (result, stdout) = run("print 1 + 2;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(stdout, "3\n");
}

#[test]
fn concatenates_three_strings() {
    let (result, stdout) = run(r#"print "st" + "ri" + "ng";"#);
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(stdout, "string\n");
}

#[test]
fn mixed_comparison_and_logic_expression() {
    let (result, stdout) = run("print !(5 - 4 > 3 * 2 == !nil);");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(stdout, "true\n");
}

#[test]
fn unary_minus_binds_tighter_than_the_following_multiply() {
    let (result, stdout) = run("print -1 + 2 * 3;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(stdout, "5\n");
}

#[test]
fn adding_a_number_to_a_string_is_a_runtime_error() {
    let mut vm = VirtualMachine::new();
    let mut out = Vec::new();
    let result = vm.interpret_to(r#"print 1 + "a";"#, &mut out);
    assert_eq!(result, InterpretResult::RuntimeError);
}

#[test]
fn unclosed_grouping_is_a_compile_error() {
    let (result, stdout) = run("print (1 + 2;");
    assert_eq!(result, InterpretResult::CompileError);
    assert_eq!(stdout, "");
}

#[test]
fn left_associativity_of_subtraction() {
    let (result, stdout) = run("print 10 - 3 - 2;");
    assert_eq!(result, InterpretResult::Ok);
    assert_eq!(stdout, "5\n");
}

#[test]
fn desugared_not_equal_matches_negated_equal() {
    let (a, out_a) = run("print 1 != 2;");
    let (b, out_b) = run("print !(1 == 2);");
    assert_eq!(a, InterpretResult::Ok);
    assert_eq!(b, InterpretResult::Ok);
    assert_eq!(out_a, out_b);
}

#[test]
fn a_syntax_error_does_not_prevent_a_later_statement_from_compiling() {
    // The first statement is malformed; panic-mode recovery should still let
    // the second, well-formed statement be parsed (even though the overall
    // compile still fails and the VM never runs).
    let (result, stdout) = run("print 1 + ;\nprint 2;");
    assert_eq!(result, InterpretResult::CompileError);
    assert_eq!(stdout, "");
}

#[test]
fn booleans_and_nil_print_their_keyword_form() {
    let (_, stdout) = run("print true; print false; print nil;");
    assert_eq!(stdout, "true\nfalse\nnil\n");
}

#[test]
fn grouping_overrides_default_precedence() {
    let (_, stdout) = run("print (1 + 2) * 3;");
    assert_eq!(stdout, "9\n");
}
