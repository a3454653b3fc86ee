//! Canonical text for a computed value.
//!
//! Magnitudes below `1e-10` or from `1e10` upward are written in scientific
//! notation with a ten digit mantissa fraction, everything else as a plain
//! decimal with at most ten fractional digits. Trailing zeros are always
//! dropped. Exponents are written with an explicit sign (`1e+20`) and the
//! tokenizer reads them back, so a formatted value can be fed straight back
//! into the engine.

const SCIENTIFIC_BELOW: f64 = 1e-10;
const SCIENTIFIC_FROM: f64 = 1e10;
const FRACTION_DIGITS: usize = 10;

pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "Error".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if x == 0.0 {
        return "0".to_string();
    }
    if is_scientific(x) {
        scientific(x)
    } else {
        fixed(x)
    }
}

fn is_scientific(x: f64) -> bool {
    let magnitude = x.abs();
    magnitude < SCIENTIFIC_BELOW || magnitude >= SCIENTIFIC_FROM
}

fn scientific(x: f64) -> String {
    let text = format!("{:.*e}", FRACTION_DIGITS, x);
    // Rounding the mantissa can carry the value across the threshold, as
    // with 9.99999999999e-11. Such values are written the way their
    // rounded form would be.
    match text.parse::<f64>() {
        Ok(rounded) if !is_scientific(rounded) => return fixed(rounded),
        _ => (),
    }
    match text.split_once('e') {
        Some((mantissa, exponent)) if exponent.starts_with('-') => {
            format!("{}e{}", trim_fraction(mantissa), exponent)
        }
        Some((mantissa, exponent)) => {
            format!("{}e+{}", trim_fraction(mantissa), exponent)
        }
        None => text,
    }
}

fn fixed(x: f64) -> String {
    let shortest = x.to_string();
    let fraction = shortest.split_once('.').map_or(0, |(_, f)| f.len());
    if fraction <= FRACTION_DIGITS {
        return trim_fraction(&shortest).to_string();
    }
    // Print the rounded value by its own shortest form, so formatting the
    // output again yields the same text.
    let rounded = format!("{:.*}", FRACTION_DIGITS, x);
    match rounded.parse::<f64>() {
        Ok(value) => trim_fraction(&value.to_string()).to_string(),
        Err(_) => trim_fraction(&rounded).to_string(),
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
