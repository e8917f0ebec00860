use num_format::Locale;

/// Countdown text shown once the deadline has passed
pub const COUNTDOWN_ZERO: &str = "00D 00H 00M 00S";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Format a wager as `1,234.56`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "0.00".to_string();
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!(
        "{}{}{}{}",
        sign,
        group_thousands(whole, Locale::en.separator()),
        Locale::en.decimal(),
        cents
    )
}

/// Insert `separator` between every three digits, counting from the right
fn group_thousands(digits: &str, separator: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(digit);
    }

    grouped
}

/// Format a remaining duration as `DDD HH MM SS`, e.g. `03D 07H 05M 09S`
///
/// Days are padded to two digits and grow beyond that as needed.
pub fn format_countdown(remaining_ms: i64) -> String {
    if remaining_ms <= 0 {
        return COUNTDOWN_ZERO.to_string();
    }

    let days = remaining_ms / MS_PER_DAY;
    let hours = (remaining_ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (remaining_ms % MS_PER_MINUTE) / MS_PER_SECOND;

    format!("{days:02}D {hours:02}H {minutes:02}M {seconds:02}S")
}
