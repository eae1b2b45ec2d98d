//! Money values: ISO 4217 currencies and arbitrary-precision decimal amounts.
//!
//! Amounts are `rust_decimal::Decimal` throughout; nothing in the ledger ever
//! touches floating point.

use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{LedgerError, LedgerResult};

/// ISO 4217 alphabetic codes accepted by [`Currency`].
///
/// Includes the special codes (`XAU`, `XDR`, `XXX`, ...) so the registry
/// matches what a full ISO table would accept.
const ISO_4217: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD",
    "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS",
    "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW",
    "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD",
    "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD", "NGN",
    "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR",
    "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SLL",
    "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY",
    "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UYW", "UZS", "VED", "VES",
    "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR", "XOF",
    "XPD", "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWL",
];

/// A currency from the ISO 4217 registry, identified by its alphabetic code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Currency(&'static str);

impl Currency {
    pub const USD: Currency = Currency("USD");
    pub const EUR: Currency = Currency("EUR");
    pub const GBP: Currency = Currency("GBP");

    /// Look up a code in the registry. Codes are case-sensitive (`"usd"` is rejected).
    pub fn lookup(code: &str) -> Option<Currency> {
        ISO_4217.iter().copied().find(|c| *c == code).map(Currency)
    }

    pub fn code(&self) -> &'static str {
        self.0
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.0)
    }
}

impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(LedgerError::validation(
                "Currency cannot be empty or consist only of whitespaces.",
            ));
        }
        Currency::lookup(s).ok_or_else(|| LedgerError::validation("Wrong currency code."))
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Currency::from_str(&raw).map_err(|e| serde::de::Error::custom(e.message()))
    }
}

/// Require a non-blank text field, returning it untrimmed.
///
/// `label` is the human-readable field name used in the error message.
pub fn require_text<'a>(label: &str, value: Option<&'a str>) -> LedgerResult<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(LedgerError::validation(format!(
            "{label} cannot be empty or consist only of whitespaces."
        ))),
    }
}

/// Plain or scientific notation. Input that `Decimal` could only hold by
/// rounding (more than 28 fraction digits, or more significant digits than
/// fit in 96 bits) is rejected rather than silently truncated.
fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    if let Ok(value) = Decimal::from_str_exact(raw) {
        return Some(value);
    }

    let (mantissa, exponent) = raw.split_once(['e', 'E'])?;
    let mut value = Decimal::from_str_exact(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    if exponent < 0 {
        let scale = i64::from(value.scale()).checked_sub(exponent)?;
        value.set_scale(u32::try_from(scale).ok()?).ok()?;
    } else {
        // Any non-zero mantissa overflows well before 64 shifts.
        for _ in 0..exponent.min(64) {
            value = value.checked_mul(Decimal::TEN)?;
        }
    }
    Some(value)
}

/// Parse a transfer amount. Must be a decimal strictly greater than zero.
pub fn parse_amount(raw: Option<&str>) -> LedgerResult<Decimal> {
    let raw = require_text("Amount", raw)?;
    let amount =
        parse_decimal(raw).ok_or_else(|| LedgerError::validation("Wrong amount format."))?;
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(
            "Amount cannot be less or equal to 0.",
        ));
    }
    Ok(amount)
}

/// Parse an account balance. Zero is allowed, negative balances are not.
pub fn parse_balance(raw: Option<&str>) -> LedgerResult<Decimal> {
    let raw = require_text("Balance", raw)?;
    let balance =
        parse_decimal(raw).ok_or_else(|| LedgerError::validation("Wrong balance format."))?;
    if balance.is_sign_negative() && !balance.is_zero() {
        return Err(LedgerError::validation("Balance cannot be negative."));
    }
    Ok(balance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!("JPY".parse::<Currency>().unwrap().code(), "JPY");
    }

    #[test]
    fn unknown_or_lowercase_codes_are_rejected() {
        for bad in ["usd", "ABC", "US", "USDD"] {
            let err = bad.parse::<Currency>().unwrap_err();
            assert_eq!(err, LedgerError::validation("Wrong currency code."));
        }
    }

    #[test]
    fn blank_currency_is_rejected() {
        let err = "  ".parse::<Currency>().unwrap_err();
        assert!(err.message().starts_with("Currency cannot be empty"));
    }

    #[test]
    fn currency_serde_uses_code() {
        let json = serde_json::to_string(&Currency::EUR).unwrap();
        assert_eq!(json, "\"EUR\"");
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Currency::EUR);
        assert!(serde_json::from_str::<Currency>("\"NOPE\"").is_err());
    }

    #[test]
    fn amount_must_be_positive() {
        assert_eq!(
            parse_amount(Some("300.00")).unwrap(),
            Decimal::from_str("300.00").unwrap()
        );
        assert!(matches!(parse_amount(Some("0")), Err(LedgerError::Validation(_))));
        assert!(matches!(parse_amount(Some("-1.5")), Err(LedgerError::Validation(_))));
        assert_eq!(
            parse_amount(Some("abc")).unwrap_err(),
            LedgerError::validation("Wrong amount format.")
        );
        assert!(matches!(parse_amount(None), Err(LedgerError::Validation(_))));
        assert!(matches!(parse_amount(Some("   ")), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn amount_accepts_scientific_notation() {
        assert_eq!(parse_amount(Some("1e3")).unwrap(), Decimal::from(1000));
        assert_eq!(parse_amount(Some("1.5E-2")).unwrap(), Decimal::new(15, 3));
        assert_eq!(parse_amount(Some("1e-28")).unwrap(), Decimal::new(1, 28));
    }

    #[test]
    fn over_precise_amounts_are_rejected_not_rounded() {
        for raw in [
            "0.00000000000000000000000000001",
            "1.00000000000000000000000000001",
            "1e-29",
            "79228162514264337593543950336",
            "1e29",
        ] {
            assert_eq!(
                parse_amount(Some(raw)).unwrap_err(),
                LedgerError::validation("Wrong amount format."),
                "{raw}"
            );
        }
        assert_eq!(
            parse_balance(Some("0.00000000000000000000000000001")).unwrap_err(),
            LedgerError::validation("Wrong balance format.")
        );
    }

    #[test]
    fn largest_representable_amount_parses_exactly() {
        assert_eq!(
            parse_amount(Some("79228162514264337593543950335")).unwrap(),
            Decimal::MAX
        );
        assert_eq!(
            parse_amount(Some("0.0000000000000000000000000001")).unwrap(),
            Decimal::new(1, 28)
        );
    }

    #[test]
    fn balance_allows_zero_but_not_negative() {
        assert_eq!(parse_balance(Some("0.00")).unwrap(), Decimal::ZERO);
        assert_eq!(
            parse_balance(Some("-0.01")).unwrap_err(),
            LedgerError::validation("Balance cannot be negative.")
        );
        assert_eq!(
            parse_balance(Some("12,5")).unwrap_err(),
            LedgerError::validation("Wrong balance format.")
        );
    }

    #[test]
    fn require_text_rejects_whitespace() {
        assert_eq!(require_text("Name", Some(" Kate ")).unwrap(), " Kate ");
        assert_eq!(
            require_text("Name", Some("\t")).unwrap_err(),
            LedgerError::validation("Name cannot be empty or consist only of whitespaces.")
        );
    }

    proptest! {
        /// Any positive amount with two fraction digits parses back exactly.
        #[test]
        fn positive_cent_amounts_parse_exactly(cents in 1i64..1_000_000_000i64) {
            let text = format!("{}.{:02}", cents / 100, cents % 100);
            let parsed = parse_amount(Some(&text)).unwrap();
            prop_assert_eq!(parsed, Decimal::new(cents, 2));
        }
    }
}
