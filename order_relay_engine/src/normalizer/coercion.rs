use serde_json::{Map, Value};

/// Tolerant numeric coercion for the loosely-typed amounts upstream stores send.
///
/// Numbers pass through. Strings have their whitespace removed and are parsed directly; failing that, the right-most
/// of `,` and `.` is taken as the decimal separator and the other as a thousands separator. A separator that repeats
/// with no other separator present (`1.234.567`) only groups thousands. Anything else is `0.0`.
pub fn parse_amount(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_amount_str(s),
        _ => 0.0,
    }
}

pub fn parse_amount_str(s: &str) -> f64 {
    let compact = s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    if compact.is_empty() {
        return 0.0;
    }
    if let Some(v) = parse_finite(&compact) {
        return v;
    }
    let decimal = match (compact.rfind(','), compact.rfind('.')) {
        (Some(c), Some(d)) if c > d => Some(','),
        (Some(_), Some(_)) => Some('.'),
        (Some(_), None) if compact.matches(',').count() == 1 => Some(','),
        (None, Some(_)) if compact.matches('.').count() == 1 => Some('.'),
        _ => None,
    };
    let normalized = match decimal {
        Some(sep) => {
            let thousands = if sep == ',' { '.' } else { ',' };
            let last = compact.rfind(sep).unwrap_or_default();
            compact
                .char_indices()
                .filter_map(|(i, c)| match c {
                    c if c == thousands => None,
                    c if c == sep && i == last => Some('.'),
                    c if c == sep => None,
                    c => Some(c),
                })
                .collect::<String>()
        },
        None => compact.chars().filter(|c| *c != ',' && *c != '.').collect::<String>(),
    };
    parse_finite(&normalized).unwrap_or(0.0)
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer ids arrive as numbers or numeric strings. Anything else is `0`.
pub fn parse_id(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|v| v.is_finite() && v.fract() == 0.0).map(|v| v as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    }
}

/// Renders scalar values as text. Null, arrays and objects are empty.
pub fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

pub fn text_field(obj: &Value, key: &str) -> String {
    obj.get(key).map(text_of).unwrap_or_default().trim().to_string()
}

/// The first non-empty value among `keys`, read in order.
pub fn first_text(obj: &Value, keys: &[&str]) -> String {
    keys.iter().map(|k| text_field(obj, k)).find(|v| !v.is_empty()).unwrap_or_default()
}

/// Looks up `key` in `obj`, ignoring case.
pub fn get_ignore_case<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).or_else(|| obj.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v))
}
