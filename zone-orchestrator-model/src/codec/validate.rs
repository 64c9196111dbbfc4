//! Validation rules shared by the per-type codecs

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Longest presentation-format domain name, without the trailing dot.
const MAX_NAME_LEN: usize = 253;

/// Longest single label.
const MAX_LABEL_LEN: usize = 63;

/// Dot-separated labels of letters, digits and `_`, with inner hyphens.
static HOSTNAME: LazyLock<Regex> = LazyLock::new(|| {
    compile(
        r"^(?:[\p{L}\p{N}_](?:[\p{L}\p{N}_-]*[\p{L}\p{N}_])?\.)*[\p{L}\p{N}_](?:[\p{L}\p{N}_-]*[\p{L}\p{N}_])?$",
    )
});

/// Compile a pattern written into this crate.
#[allow(clippy::expect_used)]
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

/// Whether a host name must or must not end with `.`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrailingDot {
    Required,
    Forbidden,
}

pub(crate) fn ipv4(input: &str) -> Result<Ipv4Addr, ValidationError> {
    input
        .parse::<Ipv4Addr>()
        .map_err(|_| ValidationError::NotAnIpv4 {
            input: input.to_string(),
        })
}

pub(crate) fn ipv6(input: &str) -> Result<Ipv6Addr, ValidationError> {
    input
        .parse::<Ipv6Addr>()
        .map_err(|_| ValidationError::NotAnIpv6 {
            input: input.to_string(),
        })
}

fn is_ip_literal(input: &str) -> bool {
    input.parse::<IpAddr>().is_ok() || input.trim_end_matches('.').parse::<IpAddr>().is_ok()
}

/// A domain name that is not an IP literal, with the trailing dot rule
/// applied before the label syntax.
pub(crate) fn fqdn(input: &str, trailing_dot: TrailingDot) -> Result<(), ValidationError> {
    let owned = || input.to_string();
    if is_ip_literal(input) {
        return Err(ValidationError::IpNotAllowed { input: owned() });
    }
    let name = match (trailing_dot, input.strip_suffix('.')) {
        (TrailingDot::Required, Some(name)) => name,
        (TrailingDot::Required, None) => {
            return Err(ValidationError::FqdnMissingTrailingDot { input: owned() });
        }
        (TrailingDot::Forbidden, Some(_)) => {
            return Err(ValidationError::FqdnForbiddenTrailingDot { input: owned() });
        }
        (TrailingDot::Forbidden, None) => input,
    };
    let label_too_long = name.split('.').any(|l| l.chars().count() > MAX_LABEL_LEN);
    if name.len() > MAX_NAME_LEN || label_too_long || !HOSTNAME.is_match(name) {
        return Err(ValidationError::NotAFqdn { input: owned() });
    }
    Ok(())
}

/// An IP literal of either family, or a dot-terminated domain name.
pub(crate) fn ip_or_fqdn(input: &str) -> Result<(), ValidationError> {
    if input.parse::<IpAddr>().is_ok() {
        return Ok(());
    }
    fqdn(input, TrailingDot::Required)
}

/// Text data: every `;` must be written as `\;`.
pub(crate) fn escaped_text(input: &str) -> Result<(), ValidationError> {
    let mut escaped = false;
    for c in input.chars() {
        match c {
            ';' if !escaped => {
                return Err(ValidationError::UnescapedSemicolon {
                    input: input.to_string(),
                });
            }
            '\\' => escaped = !escaped,
            _ => escaped = false,
        }
    }
    Ok(())
}

/// SPF data: escaped text, `v=spf1` prefix, and a final `all` mechanism.
pub(crate) fn spf(input: &str) -> Result<(), ValidationError> {
    escaped_text(input)?;
    if !input.starts_with("v=spf1") {
        return Err(ValidationError::SpfMissingVersion {
            input: input.to_string(),
        });
    }
    match input.split_whitespace().last() {
        Some("-all" | "~all" | "+all") => Ok(()),
        _ => Err(ValidationError::SpfMissingAllQualifier {
            input: input.to_string(),
        }),
    }
}

/// An unsigned decimal integer within `min..=max`.
pub(crate) fn unsigned<T>(
    field: &'static str,
    input: &str,
    min: u64,
    max: u64,
) -> Result<T, ValidationError>
where
    T: TryFrom<u64>,
{
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::NotAnInteger {
            field,
            input: input.to_string(),
        });
    }
    #[allow(clippy::cast_precision_loss)]
    let out_of_range = || ValidationError::OutOfRange {
        field,
        input: input.to_string(),
        min: min as f64,
        max: max as f64,
    };
    let value: u64 = input.parse().map_err(|_| out_of_range())?;
    if !(min..=max).contains(&value) {
        return Err(out_of_range());
    }
    T::try_from(value).map_err(|_| out_of_range())
}

/// A decimal number (`-?digits[.digits]`) within `min..=max`, with at most
/// `max_decimals` fractional digits.
pub(crate) fn decimal(
    field: &'static str,
    input: &str,
    signed: bool,
    max_decimals: usize,
    (min, max): (f64, f64),
) -> Result<f64, ValidationError> {
    let digits = if signed {
        input.strip_prefix('-').unwrap_or(input)
    } else {
        input
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "0"));
    let is_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !is_digits(whole) || !is_digits(fraction) {
        return Err(ValidationError::NotADecimal {
            field,
            input: input.to_string(),
        });
    }
    if digits.contains('.') && fraction.len() > max_decimals {
        return Err(ValidationError::TooManyDecimals {
            field,
            input: input.to_string(),
            max: max_decimals,
        });
    }
    let value: f64 = input.parse().map_err(|_| ValidationError::NotADecimal {
        field,
        input: input.to_string(),
    })?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            input: input.to_string(),
            min,
            max,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_rejects_other_family() {
        assert!(ipv4("192.168.0.1").is_ok());
        assert!(matches!(
            ipv4("::1"),
            Err(ValidationError::NotAnIpv4 { .. })
        ));
        assert!(matches!(
            ipv4("not-an-ip"),
            Err(ValidationError::NotAnIpv4 { .. })
        ));
    }

    #[test]
    fn ipv6_rejects_other_family() {
        assert!(ipv6("2601:644:500:e210:62f8:1dff:feb8:947a").is_ok());
        assert!(ipv6("::1").is_ok());
        assert!(matches!(
            ipv6("192.168.0.1"),
            Err(ValidationError::NotAnIpv6 { .. })
        ));
    }

    #[test]
    fn fqdn_trailing_dot_rules() {
        assert!(fqdn("unit.tests.", TrailingDot::Required).is_ok());
        assert!(fqdn("unit.tests", TrailingDot::Forbidden).is_ok());
        assert!(matches!(
            fqdn("unit.tests", TrailingDot::Required),
            Err(ValidationError::FqdnMissingTrailingDot { .. })
        ));
        assert!(matches!(
            fqdn("unit.tests.", TrailingDot::Forbidden),
            Err(ValidationError::FqdnForbiddenTrailingDot { .. })
        ));
    }

    #[test]
    fn fqdn_rejects_ip_literals() {
        for input in ["192.168.0.1", "192.168.0.1.", "::1"] {
            assert!(
                matches!(
                    fqdn(input, TrailingDot::Required),
                    Err(ValidationError::IpNotAllowed { .. })
                ),
                "{input} should be rejected as an IP"
            );
        }
    }

    #[test]
    fn fqdn_rejects_bad_labels() {
        for input in ["-foo.tests.", "foo..tests.", "foo bar.tests.", ".", "a$b."] {
            assert!(
                matches!(
                    fqdn(input, TrailingDot::Required),
                    Err(ValidationError::NotAFqdn { .. })
                ),
                "{input} should not be a valid name"
            );
        }
        let long_label = format!("{}.tests.", "a".repeat(64));
        assert!(fqdn(&long_label, TrailingDot::Required).is_err());
        assert!(fqdn("_dmarc.unit.tests.", TrailingDot::Required).is_ok());
        assert!(fqdn("bücher.tests.", TrailingDot::Required).is_ok());
    }

    #[test]
    fn ip_or_fqdn_accepts_both() {
        assert!(ip_or_fqdn("192.168.0.1").is_ok());
        assert!(ip_or_fqdn("::1").is_ok());
        assert!(ip_or_fqdn("ns1.unit.tests.").is_ok());
        assert!(matches!(
            ip_or_fqdn("ns1.unit.tests"),
            Err(ValidationError::FqdnMissingTrailingDot { .. })
        ));
    }

    #[test]
    fn semicolons_must_be_escaped() {
        assert!(escaped_text(r"v=DKIM1\;k=rsa\;s=email").is_ok());
        assert!(escaped_text("plain text").is_ok());
        assert!(matches!(
            escaped_text("v=DKIM1;k=rsa"),
            Err(ValidationError::UnescapedSemicolon { .. })
        ));
        assert!(escaped_text(r"a\\;b").is_err());
    }

    #[test]
    fn spf_rules() {
        assert!(spf("v=spf1 ip4:192.168.0.1/16 -all").is_ok());
        assert!(spf("v=spf1 include:_spf.unit.tests ~all").is_ok());
        assert!(matches!(
            spf("ip4:192.168.0.1/16 -all"),
            Err(ValidationError::SpfMissingVersion { .. })
        ));
        assert!(matches!(
            spf("v=spf1 ip4:192.168.0.1/16"),
            Err(ValidationError::SpfMissingAllQualifier { .. })
        ));
    }

    #[test]
    fn unsigned_reports_range_and_syntax() {
        assert_eq!(unsigned::<u8>("flags", "128", 0, 128), Ok(128));
        assert!(matches!(
            unsigned::<u8>("flags", "129", 0, 128),
            Err(ValidationError::OutOfRange { field: "flags", .. })
        ));
        assert!(matches!(
            unsigned::<u16>("port", "99999999999999999999999", 0, 65535),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            unsigned::<u16>("port", "-1", 0, 65535),
            Err(ValidationError::NotAnInteger { .. })
        ));
        assert!(matches!(
            unsigned::<u16>("port", "", 0, 65535),
            Err(ValidationError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn decimal_syntax() {
        assert_eq!(decimal("altitude", "20.00", true, 2, (-100.0, 100.0)), Ok(20.0));
        assert_eq!(decimal("altitude", "-3.5", true, 2, (-100.0, 100.0)), Ok(-3.5));
        assert!(matches!(
            decimal("seconds", "-3.5", false, 2, (0.0, 60.0)),
            Err(ValidationError::NotADecimal { .. })
        ));
        assert!(matches!(
            decimal("seconds", "1.", false, 2, (0.0, 60.0)),
            Err(ValidationError::NotADecimal { .. })
        ));
        assert!(matches!(
            decimal("seconds", "61", false, 2, (0.0, 59.99)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn decimal_places_are_bounded() {
        assert_eq!(decimal("seconds", "52.12", false, 2, (0.0, 59.99)), Ok(52.12));
        assert_eq!(
            decimal("seconds", "52.123", false, 2, (0.0, 59.99)),
            Err(ValidationError::TooManyDecimals {
                field: "seconds",
                input: "52.123".to_string(),
                max: 2,
            })
        );
    }
}
