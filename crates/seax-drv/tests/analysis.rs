//! End-to-end analysis scenarios over preprocessed source text.

use seax_drv::{analyze_source, EntryResult};

fn analyze(source: &str, deepness: u32) -> Vec<EntryResult> {
    analyze_source(source, deepness).expect("analysis failed")
}

/// `(condition, value)` renderings of the single entry point's options.
fn entry_options(source: &str, deepness: u32) -> Vec<(String, String)> {
    let mut results = analyze(source, deepness);
    assert_eq!(results.len(), 1, "expected exactly one entry point");
    results
        .remove(0)
        .options
        .iter()
        .map(|option| (option.condition.to_string(), option.value.to_string()))
        .collect()
}

#[test]
fn constant_return_folds() {
    let options = entry_options("int f() { return 2 + 3; }", 1);
    assert_eq!(options, vec![("true".to_string(), "5".to_string())]);
}

#[test]
fn early_return_splits_on_the_guard() {
    let options = entry_options("int f(int x) { if (x > 0) return 1; return -1; }", 1);
    assert_eq!(options.len(), 2);
    assert!(options.contains(&("(x > 0)".to_string(), "1".to_string())));
    assert!(options.contains(&("(!(x > 0))".to_string(), "-1".to_string())));
}

#[test]
fn conditional_assignment_splits_on_the_guard() {
    let options = entry_options("int f(int x) { int y = 0; if (x > 0) y = 1; return y; }", 1);
    assert_eq!(options.len(), 2);
    assert!(options.contains(&("(x > 0)".to_string(), "1".to_string())));
    assert!(options.contains(&("(!(x > 0))".to_string(), "0".to_string())));
}

#[test]
fn boolean_connective_is_not_expanded() {
    let options = entry_options("bool g(bool a, bool b) { return a && b; }", 1);
    assert_eq!(
        options,
        vec![("true".to_string(), "(a && b)".to_string())]
    );
}

#[test]
fn dead_branch_is_never_entered() {
    let options = entry_options("int f() { if (1 == 2) return 7; return 9; }", 1);
    assert_eq!(options, vec![("true".to_string(), "9".to_string())]);
}

#[test]
fn callees_are_not_entry_points() {
    let results = analyze(
        "int g(int a) { return a + 2; } int h() { return g(1) + 1; }",
        1,
    );
    let names: Vec<&str> = results.iter().map(|r| r.function.as_str()).collect();
    assert_eq!(names, vec!["h"]);

    let options: Vec<(String, String)> = results[0]
        .options
        .iter()
        .map(|option| (option.condition.to_string(), option.value.to_string()))
        .collect();
    assert_eq!(options, vec![("true".to_string(), "4".to_string())]);
}

#[test]
fn else_branch_is_analysed() {
    let options = entry_options(
        "int f(int x) { int y; if (x > 0) { y = 1; } else { y = 2; } return y; }",
        1,
    );
    assert_eq!(options.len(), 2);
    assert!(options.contains(&("(x > 0)".to_string(), "1".to_string())));
    assert!(options.contains(&("(!(x > 0))".to_string(), "2".to_string())));
}

#[test]
fn nested_guard_over_initialized_variable() {
    // The inner guard reads `y`, which already has recorded options; its
    // path conditions embed conditional values and must still resolve.
    let options = entry_options("int f() { int y = 0; if (y > 0) return 1; return 2; }", 1);
    assert_eq!(options, vec![("true".to_string(), "2".to_string())]);
}

#[test]
fn loop_unrolls_to_the_deepness_bound() {
    let source = "int f() { int i = 0; while (i < 2) { i = i + 1; } return i; }";

    // One unrolled iteration stops at i == 1.
    let options = entry_options(source, 1);
    assert_eq!(options, vec![("true".to_string(), "1".to_string())]);

    // Two cover the loop exactly.
    let options = entry_options(source, 2);
    assert_eq!(options, vec![("true".to_string(), "2".to_string())]);
}

#[test]
fn self_recursive_functions_are_not_entry_points() {
    let results = analyze("int f(int n) { if (n > 0) return f(n - 1) + 1; return 0; }", 1);
    assert!(results.is_empty());
}

#[test]
fn recursion_stops_at_the_bound() {
    // The recursive call is refused at the bound and yields no value; the
    // surrounding `return` is skipped with a warning and the fallthrough
    // path provides the result.
    let results = analyze(
        "int r(int n) { if (n > 0) return r(n - 1) + 1; return 0; } \
         int main() { return r(3); }",
        1,
    );
    let names: Vec<&str> = results.iter().map(|r| r.function.as_str()).collect();
    assert_eq!(names, vec!["main"]);
    let options: Vec<(String, String)> = results[0]
        .options
        .iter()
        .map(|option| (option.condition.to_string(), option.value.to_string()))
        .collect();
    assert_eq!(options, vec![("true".to_string(), "0".to_string())]);
}

#[test]
fn unknown_callees_are_ignored() {
    let options = entry_options(
        "int f(int x) { puts(\"hi\"); return x; }",
        1,
    );
    assert_eq!(options, vec![("true".to_string(), "x".to_string())]);
}

#[test]
fn void_entry_analysis_is_aborted_not_fatal() {
    // A void entry point's returned variable cannot be lowered to an SMT
    // sort; the entry is aborted with an error, the run itself succeeds.
    let results = analyze("void f() { int x = 1; return; }", 1);
    assert!(results.is_empty());
}

#[test]
fn parameters_flow_through_calls() {
    let results = analyze(
        "int add2(int a) { return a + 2; } int h(int x) { return add2(x); }",
        1,
    );
    assert_eq!(results.len(), 1);
    let options: Vec<(String, String)> = results[0]
        .options
        .iter()
        .map(|option| (option.condition.to_string(), option.value.to_string()))
        .collect();
    assert_eq!(options, vec![("true".to_string(), "(x + 2)".to_string())]);
}

#[test]
fn unknown_variable_is_fatal() {
    let result = analyze_source("int f() { return q; }", 1);
    assert!(result.is_err());
}

#[test]
fn multiple_entry_points_are_analysed_independently() {
    let results = analyze(
        "int f() { return 1; } int g() { return 2; }",
        1,
    );
    let names: Vec<&str> = results.iter().map(|r| r.function.as_str()).collect();
    assert_eq!(names, vec!["f", "g"]);
    assert_eq!(results[0].options[0].value.to_string(), "1");
    assert_eq!(results[1].options[0].value.to_string(), "2");
}
