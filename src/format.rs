//! Display formatting for prices, market figures and percentages

/// Formats a USD amount with thousands separators: `$67,420.50`
///
/// Amounts under one dollar keep up to six decimals so sub-cent tokens do
/// not collapse to `$0.00`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let fixed = if abs < 1.0 && abs > 0.0 {
        trim_decimals(format!("{:.6}", abs), 2)
    } else {
        format!("{:.2}", abs)
    };

    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    if frac_part.is_empty() {
        format!("{}${}", sign, group_thousands(int_part))
    } else {
        format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
    }
}

/// Compact form for market caps and volumes: `$1.30T`, `$31.00B`
pub fn format_large_number(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();

    let (scaled, suffix) = if abs >= 1e12 {
        (abs / 1e12, "T")
    } else if abs >= 1e9 {
        (abs / 1e9, "B")
    } else if abs >= 1e6 {
        (abs / 1e6, "M")
    } else if abs >= 1e3 {
        (abs / 1e3, "K")
    } else {
        return format_currency(value);
    };

    format!("{}${:.2}{}", sign, scaled, suffix)
}

/// Signed percentage with two decimals: `+2.50%`, `-1.20%`
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    if value > 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Drops trailing zeros but keeps at least `min` decimals
fn trim_decimals(mut fixed: String, min: usize) -> String {
    let Some(dot) = fixed.find('.') else {
        return fixed;
    };
    while fixed.len() > dot + 1 + min && fixed.ends_with('0') {
        fixed.pop();
    }
    fixed
}
