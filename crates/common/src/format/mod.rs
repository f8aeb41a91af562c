//! Display formatting helpers for dashboard values

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// `$1,234.50` style currency with thousands separators
pub fn format_currency(amount: f64, decimals: usize) -> String {
    if !amount.is_finite() {
        return "$0".to_string();
    }

    let fixed = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.00 renders as $0.00
    let negative = amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };

    match frac_part {
        Some(frac) => format!("{sign}${grouped}.{frac}"),
        None => format!("{sign}${grouped}"),
    }
}

/// API cost figures: sub-dollar amounts keep four decimals
pub fn format_cost(amount: f64) -> String {
    if amount.abs() < 1.0 {
        format_currency(amount, 4)
    } else {
        format_currency(amount, 2)
    }
}

/// `Oct 16, 2026`
pub fn format_date<Tz: TimeZone>(ts: &DateTime<Tz>) -> String {
    ts.with_timezone(&Utc).format("%b %-d, %Y").to_string()
}

/// Coarse "time ago" label. Older than a week falls back to the date.
pub fn format_relative_time<Tz: TimeZone>(ts: &DateTime<Tz>, now: DateTime<Utc>) -> String {
    let ts = ts.with_timezone(&Utc);
    let elapsed = now.signed_duration_since(ts);

    let secs = elapsed.num_seconds();
    if secs < 60 {
        return "just now".to_string();
    }

    let minutes = elapsed.num_minutes();
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }

    let hours = elapsed.num_hours();
    if hours < 24 {
        return format!("{}h ago", hours);
    }

    let days = elapsed.num_days();
    if days < 7 {
        return format!("{}d ago", days);
    }

    format_date(&ts)
}

/// Cut `text` to at most `max_chars` characters, ending in `...` when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    const ELLIPSIS: &str = "...";
    let keep = max_chars.saturating_sub(ELLIPSIS.len());
    let cut: String = text.chars().take(keep).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

/// Color bucket for a 0..1 score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreColor {
    High,
    Medium,
    Low,
    Unknown,
}

impl ScoreColor {
    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreColor::High => "green",
            ScoreColor::Medium => "yellow",
            ScoreColor::Low => "red",
            ScoreColor::Unknown => "gray",
        }
    }
}

pub fn score_color(score: Option<f64>) -> ScoreColor {
    match score {
        Some(s) if s.is_nan() => ScoreColor::Unknown,
        Some(s) if s >= 0.7 => ScoreColor::High,
        Some(s) if s >= 0.4 => ScoreColor::Medium,
        Some(_) => ScoreColor::Low,
        None => ScoreColor::Unknown,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

pub fn sentiment_label(score: Option<f64>) -> Sentiment {
    match score {
        Some(s) if s > 0.1 => Sentiment::Positive,
        Some(s) if s < -0.1 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

pub fn tier_label(tier: i32) -> &'static str {
    match tier {
        1 => "Premium",
        2 => "Standard",
        3 => "Broad coverage",
        _ => "Unranked",
    }
}

/// `12.5%`
pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5, 2), "$1,234.50");
        assert_eq!(format_currency(0.0, 2), "$0.00");
        assert_eq!(format_currency(999.0, 0), "$999");
        assert_eq!(format_currency(1_000_000.0, 0), "$1,000,000");
        assert_eq!(format_currency(-42.126, 2), "-$42.13");
        assert_eq!(format_currency(-0.001, 2), "$0.00");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(0.0012), "$0.0012");
        assert_eq!(format_cost(12.3456), "$12.35");
    }

    #[test]
    fn test_format_date() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 6, 23, 0, 0).unwrap();
        assert_eq!(format_date(&ts), "Oct 6, 2026");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert_eq!(format_relative_time(&(now - Duration::seconds(30)), now), "just now");
        assert_eq!(format_relative_time(&(now - Duration::minutes(5)), now), "5m ago");
        assert_eq!(format_relative_time(&(now - Duration::hours(3)), now), "3h ago");
        assert_eq!(format_relative_time(&(now - Duration::days(2)), now), "2d ago");
        assert_eq!(format_relative_time(&(now - Duration::days(30)), now), "Sep 16, 2026");
        assert_eq!(format_relative_time(&(now + Duration::hours(1)), now), "just now");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a sentence that is long", 10), "a sente...");
        assert_eq!(truncate("héllo wörld", 8), "héllo...");
        assert_eq!(truncate("ab cd efgh", 6), "ab...");
    }

    #[test]
    fn test_score_color() {
        assert_eq!(score_color(Some(0.9)), ScoreColor::High);
        assert_eq!(score_color(Some(0.4)), ScoreColor::Medium);
        assert_eq!(score_color(Some(0.1)), ScoreColor::Low);
        assert_eq!(score_color(None), ScoreColor::Unknown);
        assert_eq!(score_color(Some(f64::NAN)).css_class(), "gray");
    }

    #[test]
    fn test_labels() {
        assert_eq!(sentiment_label(Some(0.5)), Sentiment::Positive);
        assert_eq!(sentiment_label(Some(-0.5)), Sentiment::Negative);
        assert_eq!(sentiment_label(None), Sentiment::Neutral);
        assert_eq!(tier_label(1), "Premium");
        assert_eq!(tier_label(7), "Unranked");
        assert_eq!(format_percent(99.456), "99.5%");
    }
}
