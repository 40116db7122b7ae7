//! Coerce-or-default helpers for untrusted JSON leaves. None of these fail.

use serde_json::Value;

use crate::models::FoodCategory;

pub const MAX_UNIT_CHARS: usize = 16;

/// Trimmed string if `v` is a JSON string, otherwise empty
pub fn to_string_or_empty(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}

/// Finite number from a JSON number or a numeric string, otherwise `fallback`
pub fn to_finite_number(v: Option<&Value>, fallback: f64) -> f64 {
    parse_finite(v).unwrap_or(fallback)
}

fn parse_finite(v: Option<&Value>) -> Option<f64> {
    let n = match v? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            // Rust accepts "inf"/"NaN" here, the finiteness check below rejects them
            s.parse::<f64>().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// First candidate that coerces to a finite number
pub fn first_finite(candidates: &[Option<&Value>]) -> Option<f64> {
    candidates.iter().find_map(|v| parse_finite(*v))
}

pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() {
        return min;
    }
    v.max(min).min(max)
}

pub fn sanitize_category(v: Option<&Value>) -> FoodCategory {
    let raw = to_string_or_empty(v).to_lowercase();
    FoodCategory::from_string(&raw).unwrap_or(FoodCategory::Mixed)
}

/// Lowercased unit, `default` when empty, capped at 16 chars
pub fn sanitize_unit(v: Option<&Value>, default: &str) -> String {
    let unit = to_string_or_empty(v).to_lowercase();
    if unit.is_empty() {
        return default.to_string();
    }
    truncate_chars(&unit, MAX_UNIT_CHARS)
}

/// Cut at a char boundary and drop trailing whitespace left by the cut
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}

/// Object field lookup that tolerates non-object parents
pub fn field<'a>(v: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    v?.as_object()?.get(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_string_or_empty() {
        assert_eq!(to_string_or_empty(Some(&json!("  Arroz "))), "Arroz");
        assert_eq!(to_string_or_empty(Some(&json!(42))), "");
        assert_eq!(to_string_or_empty(Some(&Value::Null)), "");
        assert_eq!(to_string_or_empty(None), "");
    }

    #[test]
    fn test_to_finite_number_accepts_numbers_and_numeric_strings() {
        assert_eq!(to_finite_number(Some(&json!(12.5)), 0.0), 12.5);
        assert_eq!(to_finite_number(Some(&json!(" 150 ")), 0.0), 150.0);
        assert_eq!(to_finite_number(Some(&json!("-3")), 0.0), -3.0);
    }

    #[test]
    fn test_to_finite_number_rejects_garbage() {
        assert_eq!(to_finite_number(Some(&json!("not-a-number")), 50.0), 50.0);
        assert_eq!(to_finite_number(Some(&json!("")), 7.0), 7.0);
        assert_eq!(to_finite_number(Some(&json!("Infinity")), 7.0), 7.0);
        assert_eq!(to_finite_number(Some(&json!("NaN")), 7.0), 7.0);
        assert_eq!(to_finite_number(Some(&Value::Null), 7.0), 7.0);
        assert_eq!(to_finite_number(Some(&json!(true)), 7.0), 7.0);
        assert_eq!(to_finite_number(Some(&json!([1])), 7.0), 7.0);
        assert_eq!(to_finite_number(Some(&json!({"v": 1})), 7.0), 7.0);
        assert_eq!(to_finite_number(None, 7.0), 7.0);
    }

    #[test]
    fn test_first_finite_skips_invalid_candidates() {
        let bad = json!("abc");
        let good = json!(80);
        assert_eq!(first_finite(&[None, Some(&bad), Some(&good)]), Some(80.0));
        assert_eq!(first_finite(&[None, Some(&bad)]), None);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(f64::NAN, 0.0, 10.0), 0.0);
        assert_eq!(clamp(3.0, 0.0, 10.0), 3.0);
    }

    #[test]
    fn test_sanitize_category_falls_back_to_mixed() {
        assert_eq!(sanitize_category(Some(&json!("PROTEIN"))), FoodCategory::Protein);
        assert_eq!(sanitize_category(Some(&json!(" fruit "))), FoodCategory::Fruit);
        assert_eq!(sanitize_category(Some(&json!("dessert"))), FoodCategory::Mixed);
        assert_eq!(sanitize_category(None), FoodCategory::Mixed);
    }

    #[test]
    fn test_sanitize_unit() {
        assert_eq!(sanitize_unit(Some(&json!("Cup")), "g"), "cup");
        assert_eq!(sanitize_unit(Some(&json!("")), "g"), "g");
        assert_eq!(sanitize_unit(None, "serving"), "serving");
        let long = sanitize_unit(Some(&json!("tablespoonsfullandmore")), "g");
        assert_eq!(long.chars().count(), MAX_UNIT_CHARS);
    }

    #[test]
    fn test_truncate_chars_is_utf8_safe() {
        assert_eq!(truncate_chars("pão de queijo", 3), "pão");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("ab cd", 3), "ab");
    }
}
