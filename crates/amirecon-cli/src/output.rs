//! Formatted output helpers for CLI commands.
//!
//! Builds the human-readable summary printed after a comparison.

use amirecon_common::types::Region;
use amirecon_core::reconcile::{RegionComparison, Summary};

/// Lines describing the totals across all regions.
#[must_use]
pub fn summary_lines(summary: &Summary) -> Vec<String> {
    vec![
        "Overall comparison summary:".to_string(),
        format!("Total matching parameters: {}", summary.total_matching),
        format!("Total mismatched parameters: {}", summary.total_mismatched),
        format!("Total only in S3: {}", summary.total_only_in_s3),
        format!("Total only in SSM: {}", summary.total_only_in_ssm),
    ]
}

/// Lines describing one region, followed by its first mismatch if any.
///
/// # Errors
///
/// Returns an error if the example mismatch cannot be serialized.
pub fn region_lines(
    region: &Region,
    comparison: &RegionComparison,
) -> serde_json::Result<Vec<String>> {
    let mut lines = vec![
        format!("Region: {region}"),
        format!("  Matching: {}", comparison.matching.len()),
        format!("  Mismatched: {}", comparison.mismatched.len()),
        format!("  Only in S3: {}", comparison.only_in_s3.len()),
        format!("  Only in SSM: {}", comparison.only_in_ssm.len()),
    ];
    if let Some(first) = comparison.mismatched.first() {
        lines.push(String::new());
        lines.push(format!("  Example mismatch in {region}:"));
        lines.push(serde_json::to_string_pretty(first)?);
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use amirecon_core::reconcile::Mismatch;

    use super::*;

    #[test]
    fn summary_lines_list_all_totals() {
        let lines = summary_lines(&Summary {
            total_matching: 4,
            total_mismatched: 1,
            total_only_in_s3: 2,
            total_only_in_ssm: 3,
        });
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "Total matching parameters: 4");
        assert_eq!(lines[4], "Total only in SSM: 3");
    }

    #[test]
    fn region_lines_without_mismatch_have_no_example() {
        let comparison = RegionComparison {
            matching: vec!["a".into()],
            ..RegionComparison::default()
        };
        let lines = region_lines(&Region::new("us-west-2"), &comparison).expect("lines");
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "  Matching: 1");
    }

    #[test]
    fn region_lines_include_first_mismatch() {
        let comparison = RegionComparison {
            mismatched: vec![Mismatch {
                key: "k".into(),
                s3_value: "ami-1".into(),
                ssm_value: "ami-2".into(),
            }],
            ..RegionComparison::default()
        };
        let lines = region_lines(&Region::new("eu-west-1"), &comparison).expect("lines");
        assert!(lines.iter().any(|l| l == "  Example mismatch in eu-west-1:"));
        assert!(lines.last().is_some_and(|l| l.contains("\"ssm_value\": \"ami-2\"")));
    }
}
