use std::fmt;

/// Monetary amounts are integer grosze to avoid floating-point precision
/// issues: 1 zł = 100 gr, so 5000.00 zł = 500_000 gr.
pub type Grosze = i64;

/// Statutory percentages are integer basis points: 1% = 100 bps, so the
/// pension rate of 19.52% is stored as 1952. Amounts and percentages share
/// the same two-decimal fixed-point representation.
pub type Bps = i64;

/// Divide with the remainder rounded half-up (midpoints go toward positive
/// infinity, the way the statutory tables round). `den` must be positive.
pub fn div_round_half_up(num: i128, den: i128) -> i64 {
    debug_assert!(den > 0);
    (num * 2 + den).div_euclid(den * 2) as i64
}

/// Apply a percentage to an amount, rounded to the nearest grosz.
/// `apply_rate(500_000, 976)` = 9.76% of 5000.00 zł = 488.00 zł.
pub fn apply_rate(base: Grosze, rate: Bps) -> Grosze {
    div_round_half_up(base as i128 * rate as i128, 10_000)
}

/// Scale an amount by a work-time fraction, rounded to the nearest grosz.
pub fn scale_ratio(amount: Grosze, numerator: i64, denominator: i64) -> Grosze {
    div_round_half_up(amount as i128 * numerator as i128, denominator as i128)
}

/// Round to whole złote, keeping the grosze representation.
pub fn round_to_zloty(amount: Grosze) -> Grosze {
    div_round_half_up(amount as i128, 100) * 100
}

/// Clamp a derived amount to zero; contributions and taxes never go negative.
pub fn positive(amount: Grosze) -> Grosze {
    amount.max(0)
}

/// Format grosze as a two-decimal string.
/// Example: 500_000 -> "5000.00", -1234 -> "-12.34"
pub fn format_grosze(amount: Grosze) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Parse a two-decimal string into grosze (or a percentage into basis
/// points — the representation is shared).
/// Example: "5000.00" -> 500_000, "19.52" -> 1952, "8" -> 800
pub fn parse_grosze(input: &str) -> Result<Grosze, ParseAmountError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.trim_start_matches('-');

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            let units: i64 = parts[0]
                .parse()
                .map_err(|_| ParseAmountError::InvalidFormat)?;
            let grosze = units * 100;
            Ok(if negative { -grosze } else { grosze })
        }
        2 => {
            let units: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidFormat)?
            };

            // Pad or truncate the decimal part to 2 digits
            let decimal_str = parts[1];
            let decimal: i64 = match decimal_str.len() {
                0 => 0,
                1 => {
                    decimal_str
                        .parse::<i64>()
                        .map_err(|_| ParseAmountError::InvalidFormat)?
                        * 10
                }
                2 => decimal_str
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidFormat)?,
                _ => decimal_str[..2]
                    .parse()
                    .map_err(|_| ParseAmountError::InvalidFormat)?,
            };

            let grosze = units * 100 + decimal;
            Ok(if negative { -grosze } else { grosze })
        }
        _ => Err(ParseAmountError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
