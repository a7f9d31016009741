//! Display helpers shared by list and detail renderings.

/// Two decimals with thousands separators at or above 1, six decimals below.
pub fn format_price(price: f64) -> String {
    if price >= 1.0 {
        group_thousands(&format!("{price:.2}"))
    } else {
        format!("{price:.6}")
    }
}

/// Compact market cap: `1.2T`, `345.6B`, `7.8M`, or the grouped integer.
pub fn format_market_cap(market_cap: u64) -> String {
    const T: u64 = 1_000_000_000_000;
    const B: u64 = 1_000_000_000;
    const M: u64 = 1_000_000;

    let cap = market_cap as f64;
    match market_cap {
        c if c >= T => format!("{:.1}T", cap / T as f64),
        c if c >= B => format!("{:.1}B", cap / B as f64),
        c if c >= M => format!("{:.1}M", cap / M as f64),
        c => group_thousands(&c.to_string()),
    }
}

/// Signed percentage with two decimals, e.g. `+2.36%` / `-0.10%`.
pub fn format_change(change_percent: f64) -> String {
    let sign = if change_percent >= 0.0 { "+" } else { "" };
    format!("{sign}{change_percent:.2}%")
}

fn group_thousands(number: &str) -> String {
    let (sign, rest) = match number.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", number),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
