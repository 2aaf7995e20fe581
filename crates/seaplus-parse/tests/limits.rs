//! Nesting limits. Moderate depths must parse; pathological ones must fail
//! with an error instead of exhausting the stack.

use seaplus_parse::{parse_str, ParseError, ParseErrorKind, MAX_NESTING_DEPTH};

fn nesting_error(src: &str) -> ParseErrorKind {
    let err = parse_str(src).unwrap_err();
    err.downcast_ref::<ParseError>().expect("ParseError").kind
}

/// `x = 1 + 1 + ...` with `ops` operators.
fn flat_sum(ops: usize) -> String {
    format!("x = 1{};", "+1".repeat(ops))
}

#[test]
fn moderate_block_nesting_works() {
    let mut src = String::new();
    for _ in 0..50 {
        src.push_str("{ ");
    }
    src.push_str("x = 1;");
    for _ in 0..50 {
        src.push_str(" }");
    }
    assert!(parse_str(&src).is_ok(), "50 nested blocks should work");
}

#[test]
fn moderate_paren_nesting_works() {
    let mut src = String::from("x = ");
    for _ in 0..50 {
        src.push('(');
    }
    src.push('1');
    for _ in 0..50 {
        src.push(')');
    }
    src.push(';');
    assert!(parse_str(&src).is_ok(), "50 nested parens should work");
}

#[test]
fn moderate_not_chain_works() {
    let src = format!("x = {}y;", "!".repeat(50));
    assert!(parse_str(&src).is_ok());
}

#[test]
fn excessive_paren_nesting_is_an_error() {
    let depth = MAX_NESTING_DEPTH as usize + 10;
    let src = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let err = parse_str(&src).unwrap_err();
    let e = err.downcast_ref::<ParseError>().expect("ParseError");
    assert_eq!(e.kind, ParseErrorKind::NestingTooDeep);
}

#[test]
fn excessive_block_nesting_is_an_error() {
    let depth = MAX_NESTING_DEPTH as usize + 10;
    let src = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
    let err = parse_str(&src).unwrap_err();
    assert!(err.to_string().contains("nesting depth"), "got: {err}");
}

#[test]
fn block_nesting_at_the_limit() {
    // the outermost block is already one statement deep
    let depth = MAX_NESTING_DEPTH as usize;
    let ok = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
    assert!(parse_str(&ok).is_ok(), "{} nested blocks should work", depth);

    let over = format!("{}{}", "{".repeat(depth + 1), "}".repeat(depth + 1));
    assert_eq!(nesting_error(&over), ParseErrorKind::NestingTooDeep);
}

#[test]
fn paren_nesting_at_the_limit() {
    // the assignment and its expression take two levels
    let parens = MAX_NESTING_DEPTH as usize - 2;
    let ok = format!("x = {}1{};", "(".repeat(parens), ")".repeat(parens));
    assert!(parse_str(&ok).is_ok());

    let over = format!("x = {}1{};", "(".repeat(parens + 1), ")".repeat(parens + 1));
    assert_eq!(nesting_error(&over), ParseErrorKind::NestingTooDeep);
}

#[test]
fn flat_operator_chain_at_the_limit() {
    let ops = MAX_NESTING_DEPTH as usize - 2;
    assert!(parse_str(&flat_sum(ops)).is_ok());
    assert_eq!(nesting_error(&flat_sum(ops + 1)), ParseErrorKind::NestingTooDeep);
}

#[test]
fn long_flat_sum_is_an_error_not_a_crash() {
    let src = format!("int x; {}", flat_sum(400_000));
    assert_eq!(nesting_error(&src), ParseErrorKind::NestingTooDeep);
}

#[test]
fn operator_chains_reset_between_statements() {
    let ops = MAX_NESTING_DEPTH as usize - 2;
    let src = format!("{}\n{}\n{}", flat_sum(ops), flat_sum(ops), flat_sum(ops));
    assert!(parse_str(&src).is_ok());
}

#[test]
fn mixed_levels_share_one_budget() {
    let half = MAX_NESTING_DEPTH as usize / 2;
    // every `*` sits inside one more parenthesis
    let src = format!("x = {}1{};", "(1*".repeat(half), ")".repeat(half));
    assert_eq!(nesting_error(&src), ParseErrorKind::NestingTooDeep);
}
