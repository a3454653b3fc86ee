use super::*;

/// For some string input, compare `eval(_)` against the expected output
fn compare(input: &str, expected: f64) {
    match eval(input) {
        Ok(output) => assert_eq!(output, expected, "{}", input),
        Err(e) => panic!("{} failed: {}", input, e),
    }
}

/// Compare the formatted result of `input` in the given angle mode.
fn compare_formatted(input: &str, angle_mode: AngleMode, expected: &str) {
    match evaluate(input, angle_mode) {
        EvalOutcome::Value(v) => assert_eq!(format_number(v), expected, "{}", input),
        other => panic!("{} gave {:?}", input, other),
    }
}

#[test]
fn basics() {
    let cases = vec![
        ("  1 +   1", 2.0),
        (" 4 * 7 - 14", 14.0),
        (" 2 ^ 16 ", 65536.0),
        (" ((4 * 18) % 17) / 4", 1.0),
        ("2^3^2", 512.0),
        ("2 ** 3 ** 2", 512.0),
        ("-3^2", -9.0),
        ("(-3)^2", 9.0),
        ("2*-3", -6.0),
        ("10-2-3", 5.0),
        ("100/10/5", 2.0),
        ("7 × 6 ÷ 2", 21.0),
    ];
    for (input, expected) in cases {
        compare(input, expected);
    }
}

#[test]
fn random() {
    let cases = vec![
        (
            "((15 * 10) - 26 * 19 - 30 / ((57 * 79 + 93 / 87 / 47))) / 8",
            -43.00083277394169075309,
        ),
        ("(3 * 2^6) * 7 + (40 / 3)", 1357.33333333333333333333),
        ("(21 % 5 + (20 - 81)) / (25 * 8)", -0.3),
    ];
    for (input, expected) in cases {
        compare(input, expected);
    }
}

#[test]
fn formatted_results() {
    let rad = AngleMode::Radians;
    compare_formatted("2^3^2", rad, "512");
    compare_formatted("1/3", rad, "0.3333333333");
    compare_formatted("sin(90)", rad, "0.8939966636");
    compare_formatted("sin(90)", AngleMode::Degrees, "1");
    compare_formatted("fact(5)", rad, "120");
    compare_formatted("fact(20)", rad, "2.4329020082e+18");
    compare_formatted("2^40", rad, "1.0995116278e+12");
    compare_formatted("1/2^40", rad, "9.0949470177e-13");
    compare_formatted("0.1+0.2", rad, "0.3");
    compare_formatted("2*π", rad, "6.2831853072");
}

#[test]
fn incomplete_input_is_lenient() {
    let rad = AngleMode::Radians;
    assert_eq!(evaluate("3+(2", rad), EvalOutcome::Value(5.0));
    assert_eq!(evaluate("sqrt(sqr(3)+sqr(4", rad), EvalOutcome::Value(5.0));
    assert_eq!(evaluate("3+", rad), EvalOutcome::Incomplete);
    assert_eq!(evaluate("sin(", rad), EvalOutcome::Incomplete);
    assert_eq!(evaluate("", rad), EvalOutcome::Incomplete);
    match evaluate("3*/2", rad) {
        EvalOutcome::Malformed(_) => (),
        other => panic!("3*/2 gave {:?}", other),
    }
    match evaluate("3 # 2", rad) {
        EvalOutcome::Malformed(_) => (),
        other => panic!("3 # 2 gave {:?}", other),
    }
}

#[test]
fn deep_nesting_is_rejected() {
    let rad = AngleMode::Radians;
    for input in &[
        format!("{}1", "(".repeat(5_000)),
        format!("{}1", "-".repeat(5_000)),
    ] {
        match evaluate(input, rad) {
            EvalOutcome::Malformed(_) => (),
            other => panic!("deep input gave {:?}", other),
        }
    }
    assert_eq!(
        evaluate(&format!("{}1", "(".repeat(100)), rad),
        EvalOutcome::Value(1.0)
    );
}

#[test]
fn domain_outcomes() {
    let rad = AngleMode::Radians;
    for input in &["fact(-1)", "1/0", "ln(0)", "sqrt(-1)", "(-8)^(1/3)", "asin(2)"] {
        assert_eq!(evaluate(input, rad), EvalOutcome::DomainIssue, "{}", input);
    }
}

#[test]
fn committed_results_round_trip() {
    let inputs = vec!["1/3", "2^40", "1/2^40", "-7/9", "fact(25)", "e^π", "0.1*0.1"];
    for input in inputs {
        let mut session = Session::new();
        session.load_input(input);
        let first = match session.commit() {
            EvalOutcome::Value(v) => v,
            other => panic!("{} gave {:?}", input, other),
        };
        let formatted = session.input().to_string();
        let again = match session.commit() {
            EvalOutcome::Value(v) => v,
            other => panic!("{} gave {:?}", formatted, other),
        };
        assert_eq!(session.input(), formatted);
        assert_eq!(format_number(again), formatted);
        let tolerance = (first.abs() * 5e-11).max(5e-11);
        assert!((first - again).abs() <= tolerance, "{}", input);
    }
}

#[test]
fn history_keeps_ten_newest() {
    let mut session = Session::new();
    for i in 1..=12 {
        session.load_input(&format!("{}*2", i));
        session.commit();
    }
    let history = session.history();
    assert_eq!(history.len(), 10);
    assert_eq!(history.get(0).map(|e| e.expression.as_str()), Some("12*2"));
    assert_eq!(history.get(9).map(|e| e.expression.as_str()), Some("3*2"));
}

#[test]
fn keyboard_session() {
    let mut session = Session::new();
    for name in &["1", "2", "/", "(", "1", "+", "3", "Enter"] {
        let key = Key::from_keyboard(name).expect("mapped key");
        session.press(key);
    }
    assert_eq!(session.input(), "3");
    session.press(Key::from_keyboard("Escape").expect("mapped key"));
    assert_eq!(session.input(), "0");
}
