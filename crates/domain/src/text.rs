//! Folding and best-effort number extraction for free-text input.
//!
//! Exercise descriptors come from generated plans and user input, so reps,
//! durations and weights are plain strings like `"8-12"`, `"1 min 30 s"` or
//! `"12,5 kg"`. Nothing here fails: unparsable input yields zero.

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

pub const POUND_IN_KG: f32 = 0.453_592_37;

/// Lowercases, strips diacritics and collapses whitespace.
#[must_use]
pub fn fold(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if is_combining_mark(c) {
            continue;
        }
        match base_letters(c) {
            Some(base) => folded.push_str(base),
            None => folded.push(c),
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First count in the text. Ranges give their lower bound and set
/// multipliers are skipped, so `"8-12"` gives 8 and `"3x10"` gives 10.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn parse_reps(text: &str) -> u32 {
    quantities(&fold(text))
        .first()
        .map_or(0, |q| q.value.trunc().min(f64::from(u32::MAX)) as u32)
}

/// Seconds of a duration like `"45s"`, `"1:30"`, `"1:30:00"`, `"2 minutes"`,
/// `"1 min 30 sec"` or `"1h30"`.
///
/// Numbers without unit are seconds, unless they follow an hour or minute
/// value, where they count in the next smaller unit. Ranges give their lower
/// bound.
#[must_use]
pub fn parse_duration_seconds(text: &str) -> u32 {
    let folded = fold(text);
    let seconds = clock_seconds(&folded).unwrap_or_else(|| {
        let mut previous_scale = 1.;
        let mut total = 0.;
        for q in quantities(&folded) {
            let scale = if q.unit.starts_with('h') {
                3600.
            } else if q.unit.starts_with('m') {
                60.
            } else if q.unit.is_empty() && previous_scale > 1. {
                previous_scale / 60.
            } else {
                1.
            };
            total += q.value * scale;
            previous_scale = scale;
        }
        total
    });

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let seconds = seconds.round().min(f64::from(u32::MAX)) as u32;
    seconds
}

/// Weight in kilograms, pounds are converted. `"bodyweight"` gives 0.
#[must_use]
pub fn parse_weight(text: &str) -> f32 {
    match quantities(&fold(text)).first() {
        #[allow(clippy::cast_possible_truncation)]
        Some(q) if q.unit.starts_with("lb") || q.unit.starts_with("pound") => {
            q.value as f32 * POUND_IN_KG
        }
        #[allow(clippy::cast_possible_truncation)]
        Some(q) => q.value as f32,
        None => 0.,
    }
}

// 1:30, 0:45, 1:30:00
static CLOCK_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2}):(\d{2})(?::(\d{2}))?\b").ok());

// 8-12, 30-45s, 30s-45s, 1 to 2 min
static RANGE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?\s*[a-z]*)\s*(?:-|–|\bto\b)\s*\d+(?:[.,]\d+)?").ok()
});

// 12, 12,5 kg, 1.5 min, 3x
static QUANTITY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(\d+(?:[.,]\d+)?)\s*([a-z×]*)").ok());

#[derive(Debug, PartialEq)]
struct Quantity {
    value: f64,
    unit: String,
}

impl Quantity {
    fn is_multiplier(&self) -> bool {
        self.unit == "x" || self.unit == "×"
    }
}

/// Numbers with their trailing unit in folded text. The upper bounds of
/// ranges and set multipliers are dropped.
fn quantities(folded: &str) -> Vec<Quantity> {
    let Some(quantity_pattern) = QUANTITY_PATTERN.as_ref() else {
        return vec![];
    };
    let text = match RANGE_PATTERN.as_ref() {
        Some(range_pattern) => range_pattern.replace_all(folded, "${1}"),
        None => Cow::Borrowed(folded),
    };

    quantity_pattern
        .captures_iter(&text)
        .filter_map(|captures| {
            let value = captures[1].replace(',', ".").parse::<f64>().ok()?;
            Some(Quantity {
                value,
                unit: captures[2].to_string(),
            })
        })
        .filter(|q| !q.is_multiplier())
        .collect()
}

fn clock_seconds(folded: &str) -> Option<f64> {
    let captures = CLOCK_PATTERN.as_ref()?.captures(folded)?;
    let group = |i: usize| {
        captures
            .get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
    };
    let (first, second) = (group(1)?, group(2)?);
    Some(match group(3) {
        Some(third) => first * 3600. + second * 60. + third,
        None => first * 60. + second,
    })
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036f}').contains(&c)
}

fn base_letters(c: char) -> Option<&'static str> {
    Some(match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì' | 'í' | 'î' | 'ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    })
}
