//! Release-number parsing and ordering using `nom`.
//!
//! A release is a dotted run of numeric segments with an optional leading
//! `v`, optionally followed by a pre-release or build suffix (`rc1`, `-dev`,
//! `+build.5`). Ordering is numeric segment by segment with missing trailing
//! segments counting as zero; the suffix does not take part in ordering.
//! Segments are kept as digit strings, so releases of any magnitude compare
//! without overflow.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use amirecon_common::error::ReconError;
use nom::{
    IResult, Parser,
    character::complete::{char, digit1},
    combinator::opt,
    multi::separated_list1,
    sequence::preceded,
};

/// A parsed release number.
#[derive(Debug, Clone)]
pub struct ReleaseVersion {
    /// Digit strings without leading zeros; zero is `"0"`.
    segments: Vec<String>,
}

impl ReleaseVersion {
    /// Parses a release number, returning `None` when the input is not one.
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let (rest, digits) = release_segments(input.trim()).ok()?;
        if !is_ignorable_suffix(rest) {
            return None;
        }
        let segments = digits.into_iter().map(normalize_digits).collect();
        Some(Self { segments })
    }

    /// Returns the numeric segments in order, as digit strings.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    fn segment(&self, idx: usize) -> &str {
        self.segments.get(idx).map_or("0", String::as_str)
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|idx| compare_digits(self.segment(idx), other.segment(idx)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReleaseVersion {}

impl FromStr for ReleaseVersion {
    type Err = ReconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ReconError::InvalidVersion {
            value: s.to_string(),
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

/// Extracts the release embedded in a parameter path.
///
/// The release lives in the second-to-last `/` segment, before its first
/// `-` (so `.../1.14.3-0a1b2c3d/image_id` yields `1.14.3`).
#[must_use]
pub fn version_of_path(path: &str) -> Option<ReleaseVersion> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 2 {
        return None;
    }
    let version_segment = segments[segments.len() - 2];
    let release = version_segment.split('-').next().unwrap_or(version_segment);
    ReleaseVersion::parse(release)
}

fn release_segments(input: &str) -> IResult<&str, Vec<&str>> {
    preceded(opt(char('v')), separated_list1(char('.'), digit1)).parse(input)
}

fn normalize_digits(digits: &str) -> String {
    match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Orders two normalized digit strings by numeric value.
fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn is_ignorable_suffix(rest: &str) -> bool {
    let Some(first) = rest.chars().next() else {
        return true;
    };
    (first.is_ascii_alphabetic() || matches!(first, '-' | '+' | '_'))
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ReleaseVersion {
        ReleaseVersion::parse(s).expect(s)
    }

    #[test]
    fn parse_dotted_release() {
        assert_eq!(v("1.14.3").segments(), &["1", "14", "3"]);
    }

    #[test]
    fn parse_strips_leading_v() {
        assert_eq!(v("v1.24.3"), v("1.24.3"));
    }

    #[test]
    fn numeric_segments_compare_numerically() {
        assert!(v("1.14.3") < v("1.14.10"));
        assert!(v("1.14.2") < v("1.14.3"));
        assert!(v("1.9") < v("1.10"));
    }

    #[test]
    fn missing_trailing_segments_count_as_zero() {
        assert_eq!(v("1.14"), v("1.14.0"));
        assert!(v("1.14") < v("1.14.1"));
    }

    #[test]
    fn leading_zeros_do_not_change_value() {
        assert_eq!(v("1.014.03"), v("1.14.3"));
        assert_eq!(v("1.00"), v("1"));
        assert_eq!(v("01.2.0").to_string(), "1.2.0");
    }

    #[test]
    fn segments_beyond_u64_still_parse_and_order() {
        let huge = v("99999999999999999999.0");
        assert!(huge > v("18446744073709551615.9"));
        assert!(huge > v("1.14.3"));
        assert!(v("100000000000000000000") > huge);
        assert_eq!(huge.to_string(), "99999999999999999999.0");
    }

    #[test]
    fn suffix_is_ignored_for_ordering() {
        assert_eq!(v("1.15.0rc1"), v("1.15.0"));
        assert_eq!(v("1.15.0+build.7"), v("1.15.0"));
    }

    #[test]
    fn non_versions_are_rejected() {
        for input in ["unknown", "", "abc", "1.14.", "1..2", "1.x", ".1"] {
            assert!(ReleaseVersion::parse(input).is_none(), "accepted {input:?}");
        }
    }

    #[test]
    fn from_str_reports_invalid_version() {
        let err = "latest".parse::<ReleaseVersion>().unwrap_err();
        assert!(matches!(err, ReconError::InvalidVersion { .. }));
    }

    #[test]
    fn display_joins_segments() {
        assert_eq!(v("v1.2.3").to_string(), "1.2.3");
    }

    #[test]
    fn version_of_path_reads_second_to_last_segment() {
        let parsed =
            version_of_path("aws/service/bottlerocket/aws-ecs-1/x86_64/1.14.3-0a1b2c3d/image_id");
        assert_eq!(parsed, Some(v("1.14.3")));
    }

    #[test]
    fn version_of_path_handles_version_only_paths() {
        let parsed = version_of_path("aws/service/bottlerocket/aws-ecs-1/x86_64/1.14.10/image_id");
        assert_eq!(parsed, Some(v("1.14.10")));
    }

    #[test]
    fn version_of_path_rejects_unknown_and_short_paths() {
        let unknown = "aws/service/bottlerocket/aws-ecs-1/x86_64/unknown-abc/image_id";
        assert!(version_of_path(unknown).is_none());
        assert!(version_of_path("image_id").is_none());
    }
}
