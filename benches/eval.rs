use criterion::{black_box, criterion_group, criterion_main, Criterion};
use livecalc::{evaluate, format_number, AngleMode, Key, Session};

const SEXPR: &str = "4 ^ (88 * 9 / (59 % 3))";
const MEXPR: &str = "((((87))) - 73) + (97 + (((15 / 55 * ((31)) + 35))) + (15 - (9)) - (39 / 26) / 20 / 91 + 27 / (33 * 26 + 28 - (7) / 10 + 66 * 6) + 60 / 35 - ((29) - (69) / 44 / (92)) / (89) + 2 + 87 / 47 * ((2)) * 83 / 98 * 42 / (((67)) * ((97))) / (34 / 89 + 77) - 29 + 70 * (20)) + ((((((92))) + 23 * (98) / (95) + (((99) * (41))) + (5 + 41) + 10) - (36) / (6 + 80 * 52 + (90))))";
const FEXPR: &str = "sqrt(sqr(sin(30)) + sqr(cos(30))) * fact(10) / log(1000) + ln(e^2) - reciproc(4";

fn expressions(c: &mut Criterion) {
    c.bench_function("small_expr", |b| {
        b.iter(|| evaluate(black_box(SEXPR), AngleMode::Radians))
    });
    c.bench_function("medium_expr", |b| {
        b.iter(|| evaluate(black_box(MEXPR), AngleMode::Radians))
    });
    c.bench_function("function_expr", |b| {
        b.iter(|| evaluate(black_box(FEXPR), AngleMode::Degrees))
    });
}

fn formatting(c: &mut Criterion) {
    c.bench_function("format_number", |b| {
        b.iter(|| {
            (
                format_number(black_box(1.0 / 3.0)),
                format_number(black_box(6.02214076e23)),
            )
        })
    });
}

// A keypress costs a full re-evaluation of the buffer for the live preview.
fn typing(c: &mut Criterion) {
    let keys: Vec<Key> = "sqrt ( 1 2 3 4 . 5 6 + 7 8 ^ 2 ) * 3"
        .split_whitespace()
        .map(|id| id.parse().expect("valid key"))
        .collect();
    c.bench_function("typing_session", |b| {
        b.iter(|| {
            let mut session = Session::new();
            for &key in &keys {
                session.press(key);
            }
            session.commit()
        })
    });
}

criterion_group!(benches, expressions, formatting, typing);
criterion_main!(benches);
