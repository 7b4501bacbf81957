//! Translation of raw image names into canonical parameter paths.
//!
//! Image names are hyphen-delimited token strings such as
//! `bottlerocket-aws-k8s-1.24-nvidia-x86_64-v1.24.3-abcdef01`. The grammar is
//! positional: a fixed prefix, a family that is three tokens long unless it
//! ends in a recognised variant tag (`nvidia` or `fips`), an architecture, and
//! trailing version tokens. [`ImageIdentity::parse`] tokenizes a name, tags it
//! with its [`NameShape`], and extracts each component into a named field.

use std::fmt;

use amirecon_common::constants::{IMAGE_ID_LEAF, PARAMETER_PATH_PREFIX};

/// Names with fewer tokens than this cannot be disambiguated.
pub const MIN_NAME_TOKENS: usize = 7;

/// Placeholder used when a version or commit cannot be recovered.
pub const UNKNOWN: &str = "unknown";

/// Number of commit-SHA characters kept in commit-qualified paths.
pub const COMMIT_PREFIX_LEN: usize = 8;

const PLATFORM_TOKEN: &str = "aws";
const FAMILY_START: usize = 2;
const STANDARD_FAMILY_LEN: usize = 3;
const NVIDIA_TAG: &str = "nvidia";
const FIPS_TAG: &str = "fips";
const SPURIOUS_VERSION_TOKEN: &str = "v1";

/// Recognised layouts of an image name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameShape {
    /// Three-token family (`aws-k8s-1.24`, `aws-ecs-1`).
    Standard,
    /// Family terminated by an `nvidia` tag.
    NvidiaVariant,
    /// Family terminated by a `fips` tag.
    FipsVariant,
}

impl NameShape {
    /// Classifies a token list and returns the shape together with the
    /// exclusive end index of the family, which is also the index of the
    /// architecture token.
    ///
    /// `nvidia` is looked for before `fips`, so a name carrying both tags is
    /// classified by its `nvidia` tag.
    fn classify(tokens: &[&str]) -> (Self, usize) {
        if let Some(idx) = tokens.iter().position(|t| *t == NVIDIA_TAG) {
            (Self::NvidiaVariant, idx + 1)
        } else if let Some(idx) = tokens.iter().position(|t| *t == FIPS_TAG) {
            (Self::FipsVariant, idx + 1)
        } else {
            (Self::Standard, FAMILY_START + STANDARD_FAMILY_LEN)
        }
    }
}

impl fmt::Display for NameShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::NvidiaVariant => write!(f, "nvidia"),
            Self::FipsVariant => write!(f, "fips"),
        }
    }
}

/// The components recovered from a raw image name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageIdentity {
    /// Layout the name was recognised as.
    pub shape: NameShape,
    /// Family tokens, e.g. `["aws", "k8s", "1.24", "nvidia"]`.
    pub family: Vec<String>,
    /// Normalized architecture (`aarch64` becomes `arm64`).
    pub architecture: String,
    /// Release version without a leading `v`, or [`UNKNOWN`].
    pub version: String,
    /// First eight characters of the trailing version token, or [`UNKNOWN`].
    pub commit_prefix: String,
}

impl ImageIdentity {
    /// Parses a raw image name.
    ///
    /// Returns `None` when the name has fewer than [`MIN_NAME_TOKENS`] tokens
    /// or when no token is left for the architecture. Missing version tokens
    /// are not a failure; they fall back to [`UNKNOWN`].
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let tokens = tokenize(name)?;
        let (shape, arch_index) = NameShape::classify(&tokens);

        let family = tokens
            .get(FAMILY_START..arch_index)
            .unwrap_or_default()
            .iter()
            .map(|t| (*t).to_string())
            .collect();
        let architecture = normalize_architecture(tokens.get(arch_index)?);

        let version_parts: Vec<&str> = tokens[arch_index + 1..]
            .iter()
            .copied()
            .filter(|t| *t != SPURIOUS_VERSION_TOKEN)
            .collect();
        let (version, commit_prefix) = match version_parts.as_slice() {
            [.., version, commit] => (*version, commit_prefix(commit)),
            [commit] => (UNKNOWN, commit_prefix(commit)),
            [] => (UNKNOWN, UNKNOWN.to_string()),
        };
        let version = version.strip_prefix('v').unwrap_or(version).to_string();

        Some(Self {
            shape,
            family,
            architecture,
            version,
            commit_prefix,
        })
    }

    /// Returns the family joined with hyphens, e.g. `aws-k8s-1.24`.
    #[must_use]
    pub fn family_name(&self) -> String {
        self.family.join("-")
    }

    /// Returns the version segment of the parameter path.
    ///
    /// The commit prefix is appended only when requested and when it differs
    /// from the version.
    #[must_use]
    pub fn version_segment(&self, include_commit: bool) -> String {
        if include_commit && self.version != self.commit_prefix {
            format!("{}-{}", self.version, self.commit_prefix)
        } else {
            self.version.clone()
        }
    }

    /// Builds the canonical parameter path for this identity.
    #[must_use]
    pub fn parameter_path(&self, include_commit: bool) -> String {
        format!(
            "{PARAMETER_PATH_PREFIX}/{}/{}/{}/{IMAGE_ID_LEAF}",
            self.family_name(),
            self.architecture,
            self.version_segment(include_commit)
        )
    }

    /// Returns both the commit-qualified and the version-only paths.
    #[must_use]
    pub fn parameter_paths(&self) -> ParameterPaths {
        ParameterPaths {
            commit_qualified: self.parameter_path(true),
            version_only: self.parameter_path(false),
        }
    }
}

/// The two canonical keys every image is reachable by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterPaths {
    /// Path whose version segment carries the commit prefix.
    pub commit_qualified: String,
    /// Path whose version segment is the release alone.
    pub version_only: String,
}

impl ParameterPaths {
    /// Iterates over both paths, commit-qualified first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [self.commit_qualified.as_str(), self.version_only.as_str()].into_iter()
    }
}

/// Translates a raw image name into a canonical parameter path.
///
/// Returns `None` for names that cannot be parsed.
#[must_use]
pub fn translate(name: &str, include_commit: bool) -> Option<String> {
    ImageIdentity::parse(name).map(|identity| identity.parameter_path(include_commit))
}

/// Splits a name into tokens and repairs the platform slot.
///
/// Published names read `bottlerocket-aws-k8s-...`, which leaves something
/// other than `aws` at index 2; `aws` is inserted there so the family always
/// starts with the platform token.
fn tokenize(name: &str) -> Option<Vec<&str>> {
    let mut tokens: Vec<&str> = name.split('-').collect();
    if tokens.len() < MIN_NAME_TOKENS {
        tracing::debug!(name, tokens = tokens.len(), "image name too short to translate");
        return None;
    }
    if tokens[FAMILY_START] != PLATFORM_TOKEN {
        tokens.insert(FAMILY_START, PLATFORM_TOKEN);
    }
    Some(tokens)
}

fn normalize_architecture(arch: &str) -> String {
    match arch {
        "aarch64" => "arm64".to_string(),
        other => other.to_string(),
    }
}

fn commit_prefix(token: &str) -> String {
    token.chars().take(COMMIT_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECS_NAME: &str = "bottlerocket-aws-ecs-1-x86_64-v1.14.3-0a1b2c3d4e";
    const NVIDIA_NAME: &str = "bottlerocket-aws-k8s-1.24-nvidia-x86_64-v1.24.3-abcdef01";

    #[test]
    fn translate_ecs_name_with_commit() {
        assert_eq!(
            translate(ECS_NAME, true).as_deref(),
            Some("aws/service/bottlerocket/aws-ecs-1/x86_64/1.14.3-0a1b2c3d/image_id")
        );
    }

    #[test]
    fn translate_ecs_name_without_commit() {
        assert_eq!(
            translate(ECS_NAME, false).as_deref(),
            Some("aws/service/bottlerocket/aws-ecs-1/x86_64/1.14.3/image_id")
        );
    }

    #[test]
    fn translate_nvidia_name_keeps_tag_in_family() {
        let identity = ImageIdentity::parse(NVIDIA_NAME).expect("parse");
        assert_eq!(identity.shape, NameShape::NvidiaVariant);
        assert_eq!(identity.family_name(), "aws-k8s-1.24-nvidia");
        assert_eq!(identity.architecture, "x86_64");
        assert_eq!(
            identity.parameter_path(true),
            "aws/service/bottlerocket/aws-k8s-1.24-nvidia/x86_64/1.24.3-abcdef01/image_id"
        );
    }

    #[test]
    fn translate_fips_name_keeps_tag_in_family() {
        let identity =
            ImageIdentity::parse("bottlerocket-aws-k8s-1.28-fips-x86_64-v1.20.1-9f8e7d6c5b")
                .expect("parse");
        assert_eq!(identity.shape, NameShape::FipsVariant);
        assert_eq!(identity.family_name(), "aws-k8s-1.28-fips");
        assert_eq!(identity.version, "1.20.1");
        assert_eq!(identity.commit_prefix, "9f8e7d6c");
    }

    #[test]
    fn standard_name_takes_three_family_tokens() {
        let identity = ImageIdentity::parse(ECS_NAME).expect("parse");
        assert_eq!(identity.shape, NameShape::Standard);
        assert_eq!(identity.family, vec!["aws", "ecs", "1"]);
    }

    #[test]
    fn aarch64_is_normalized_to_arm64() {
        let path = translate("x-y-aws-k8s-1.24-aarch64-v1.24.3-abcdef0123", true).expect("path");
        assert!(path.contains("/arm64/"), "got: {path}");
        assert!(!path.contains("aarch64"), "got: {path}");
    }

    #[test]
    fn other_architectures_pass_through() {
        let identity =
            ImageIdentity::parse("x-y-aws-k8s-1.24-riscv64-v1.24.3-abcdef0123").expect("parse");
        assert_eq!(identity.architecture, "riscv64");
    }

    #[test]
    fn aws_token_already_present_is_not_duplicated() {
        let identity =
            ImageIdentity::parse("x-y-aws-k8s-1.24-x86_64-v1.24.3-abcdef0123").expect("parse");
        assert_eq!(identity.family_name(), "aws-k8s-1.24");
    }

    #[test]
    fn missing_aws_token_is_inserted() {
        let path = translate("bottlerocket-metal-k8s-1.28-x86_64-v1.19.0-abcdef0123", true);
        assert_eq!(
            path.as_deref(),
            Some("aws/service/bottlerocket/aws-k8s-1.28/x86_64/1.19.0-abcdef01/image_id")
        );
    }

    #[test]
    fn too_few_tokens_yields_none() {
        assert!(translate("bottlerocket-aws-k8s-1.24-x86_64-v1.24.3", true).is_none());
        assert!(translate("", false).is_none());
    }

    #[test]
    fn variant_tag_as_last_token_yields_none() {
        assert!(translate("bottlerocket-aws-k8s-1.24-x-y-nvidia", true).is_none());
    }

    #[test]
    fn nvidia_takes_priority_over_fips() {
        let identity =
            ImageIdentity::parse("bottlerocket-aws-k8s-1.24-fips-nvidia-x86_64-v1.24.3-abcdef01")
                .expect("parse");
        assert_eq!(identity.shape, NameShape::NvidiaVariant);
        assert_eq!(identity.family_name(), "aws-k8s-1.24-fips-nvidia");
        assert_eq!(identity.architecture, "x86_64");
    }

    #[test]
    fn nvidia_before_fips_makes_fips_the_architecture() {
        let identity =
            ImageIdentity::parse("bottlerocket-aws-k8s-1.24-nvidia-fips-v1.24.3-abcdef01")
                .expect("parse");
        assert_eq!(identity.family_name(), "aws-k8s-1.24-nvidia");
        assert_eq!(identity.architecture, "fips");
    }

    #[test]
    fn spurious_v1_tokens_are_discarded() {
        let identity =
            ImageIdentity::parse("bottlerocket-aws-k8s-1.24-x86_64-v1.24.3-v1-abcdef0123")
                .expect("parse");
        assert_eq!(identity.version, "1.24.3");
        assert_eq!(identity.commit_prefix, "abcdef01");
    }

    #[test]
    fn single_version_token_is_treated_as_commit() {
        let identity =
            ImageIdentity::parse("bottlerocket-aws-k8s-1.24-nvidia-x86_64-1234567890ab")
                .expect("parse");
        assert_eq!(identity.version, UNKNOWN);
        assert_eq!(identity.commit_prefix, "12345678");
        assert_eq!(identity.version_segment(true), "unknown-12345678");
        assert_eq!(identity.version_segment(false), "unknown");
    }

    #[test]
    fn no_version_tokens_falls_back_to_unknown() {
        let identity =
            ImageIdentity::parse("bottlerocket-aws-k8s-1.24-nvidia-x86_64-v1").expect("parse");
        assert_eq!(identity.version, UNKNOWN);
        assert_eq!(identity.commit_prefix, UNKNOWN);
        assert_eq!(
            identity.parameter_path(true),
            "aws/service/bottlerocket/aws-k8s-1.24-nvidia/x86_64/unknown/image_id"
        );
    }

    #[test]
    fn version_equal_to_commit_is_not_repeated() {
        let name = "bottlerocket-aws-k8s-1.24-x86_64-abc-abc";
        assert_eq!(translate(name, true), translate(name, false));
    }

    #[test]
    fn commit_and_version_paths_differ_only_in_version_segment() {
        let paths = ImageIdentity::parse(NVIDIA_NAME).expect("parse").parameter_paths();
        let qualified: Vec<&str> = paths.commit_qualified.split('/').collect();
        let plain: Vec<&str> = paths.version_only.split('/').collect();
        assert_eq!(qualified.len(), plain.len());
        let differing: Vec<usize> = (0..qualified.len())
            .filter(|&i| qualified[i] != plain[i])
            .collect();
        assert_eq!(differing, vec![qualified.len() - 2]);
    }

    #[test]
    fn translation_is_deterministic() {
        for include_commit in [true, false] {
            assert_eq!(
                translate(NVIDIA_NAME, include_commit),
                translate(NVIDIA_NAME, include_commit)
            );
        }
    }

    #[test]
    fn commit_prefix_of_short_token_is_whole_token() {
        let identity =
            ImageIdentity::parse("bottlerocket-aws-k8s-1.24-x86_64-v1.24.3-abc").expect("parse");
        assert_eq!(identity.commit_prefix, "abc");
    }
}
