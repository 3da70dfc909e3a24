use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::model::ScaleUnits;

/// `<num>[/<num>]" = <feet>'[-<inches>"]`, or `<num>[/<num>]" = <inches>"`.
///
/// Accepts straight and curly quotes, primes, and doubled single quotes.
const ARCHITECTURAL_BODY: &str = r#"(?P<num>\d+(?:\.\d+)?)(?:\s*/\s*(?P<den>\d+(?:\.\d+)?))?\s*(?:["“”″]|'')?\s*=\s*(?:(?P<feet>\d+(?:\.\d+)?)\s*['‘’′](?:\s*-?\s*(?P<inches>\d+(?:\.\d+)?)\s*(?:["“”″]|'')?)?|(?P<bare_inches>\d+(?:\.\d+)?)\s*(?:["“”″]|''))"#;

static ARCHITECTURAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)scale[:\s]*{ARCHITECTURAL_BODY}"))
        .expect("architectural scale pattern is valid")
});

static ARCHITECTURAL_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(ARCHITECTURAL_BODY).expect("architectural expression pattern is valid")
});

static RATIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)scale\s*1[:=]\s*(\d+)").expect("ratio pattern is valid")
});

static INCH_PER_FEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b1\s*["“”″]\s*=\s*(\d+)\s*['‘’′]"#).expect("inch-per-feet pattern is valid")
});

static PLAIN_RATIO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*[:=]\s*(\d+)").expect("plain ratio pattern is valid")
});

static BARE_SCALE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*scale\s*[:\-]?\s*$").expect("scale label pattern is valid")
});

/// A syntactic match that also parsed into a strictly positive ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleMatch {
    pub raw_text: String,
    pub ratio: f64,
    pub units: Option<ScaleUnits>,
}

/// `SCALE: 1/8" = 1'-0"` and friends. The keyword is required.
///
/// Occurrences are tried in order; one that does not parse to a usable ratio
/// is skipped in favour of the next.
pub fn match_architectural(text: &str) -> Option<ScaleMatch> {
    ARCHITECTURAL
        .captures_iter(text)
        .find_map(|caps| parse_architectural(&caps))
}

/// The architectural expression without the `SCALE` keyword, for text found
/// next to a separate "SCALE:" label.
pub fn match_architectural_expression(text: &str) -> Option<ScaleMatch> {
    ARCHITECTURAL_EXPRESSION
        .captures_iter(text)
        .find_map(|caps| parse_architectural(&caps))
}

/// `scale 1:50` or `SCALE 1=100`.
pub fn match_ratio(text: &str) -> Option<ScaleMatch> {
    let caps = RATIO.captures(text)?;
    positive_match(&caps, &caps[1], None)
}

/// `1" = 8'`.
pub fn match_inch_per_feet(text: &str) -> Option<ScaleMatch> {
    let caps = INCH_PER_FEET.captures(text)?;
    positive_match(&caps, &caps[1], Some(ScaleUnits::Feet))
}

/// Any `a:b` or `a=b`; the ratio is `b`.
pub fn match_plain_ratio(text: &str) -> Option<ScaleMatch> {
    let caps = PLAIN_RATIO.captures(text)?;
    positive_match(&caps, &caps[2], None)
}

/// True for text that is only the word "scale" with optional punctuation.
pub fn is_bare_scale_label(text: &str) -> bool {
    BARE_SCALE_LABEL.is_match(text)
}

fn positive_match(
    caps: &Captures<'_>,
    number: &str,
    units: Option<ScaleUnits>,
) -> Option<ScaleMatch> {
    let ratio: f64 = number.parse().ok()?;
    if ratio <= 0.0 {
        return None;
    }
    Some(ScaleMatch {
        raw_text: caps[0].trim().to_string(),
        ratio,
        units,
    })
}

/// Turn architectural captures into inches-per-drawing-inch.
///
/// A zero denominator, a zero left side, or a zero right side all make the
/// match unusable.
fn parse_architectural(caps: &Captures<'_>) -> Option<ScaleMatch> {
    let numerator: f64 = caps.name("num")?.as_str().parse().ok()?;
    let left = match caps.name("den") {
        Some(den) => {
            let denominator: f64 = den.as_str().parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            numerator / denominator
        }
        None => numerator,
    };
    if left <= 0.0 {
        return None;
    }

    let right_inches = match (caps.name("feet"), caps.name("bare_inches")) {
        (Some(feet), _) => {
            let feet: f64 = feet.as_str().parse().ok()?;
            let inches: f64 = match caps.name("inches") {
                Some(m) => m.as_str().parse().ok()?,
                None => 0.0,
            };
            feet * 12.0 + inches
        }
        (None, Some(inches)) => inches.as_str().parse().ok()?,
        (None, None) => return None,
    };

    let ratio = right_inches / left;
    if !(ratio > 0.0 && ratio.is_finite()) {
        return None;
    }
    Some(ScaleMatch {
        raw_text: caps[0].trim().to_string(),
        ratio,
        units: Some(ScaleUnits::Feet),
    })
}
