use crate::error::{ActionError, Result};
use regex::{Captures, Regex};
use std::fmt;

/// Matches `major.minor.patch` anywhere in the text; the remainder is the suffix.
const CORE_PATTERN: &str = r"([0-9]+)\.([0-9]+)\.([0-9]+)(.*)";
const STAGE_PATTERN: &str = r"^-([0-9A-Za-z_]+)";
const STAGE_NAME_PATTERN: &str = r"^[0-9A-Za-z_]+$";
const METADATA_PATTERN: &str = r"\+(.*?)([0-9]*)$";

/// Semantic version with an optional pre-release stage and a numbered revision
/// carried in the build metadata (e.g. `1.2.3-beta+r4`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub stage: Option<String>,
    pub revision: Option<u64>,
    /// Text printed directly before the revision number, such as `r` or `build-`
    pub revision_label: Option<String>,
}

/// Result of splitting a build metadata segment into label and number
#[derive(Debug, Clone, PartialEq, Eq)]
struct Metadata {
    label: String,
    revision: Option<u64>,
}

fn captures<'t>(pattern: &str, text: &'t str) -> Option<Captures<'t>> {
    Regex::new(pattern).ok().and_then(|re| re.captures(text))
}

impl Version {
    /// Create a version without stage or revision
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
            ..Default::default()
        }
    }

    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn with_revision(mut self, label: impl Into<String>, revision: u64) -> Self {
        self.revision_label = Some(label.into());
        self.revision = Some(revision);
        self
    }

    /// Parse a version string with at least `major.minor.patch`.
    ///
    /// Anything before the numeric triple is ignored, so `v1.2.3` parses. The
    /// stage (`-beta`) and build metadata (`+r4`) are read independently from
    /// the text that follows the triple.
    ///
    /// # Errors
    /// `InvalidVersionFormat` when no numeric triple is found or a component
    /// does not fit in a `u64`.
    pub fn parse(text: &str) -> Result<Self> {
        let caps =
            captures(CORE_PATTERN, text).ok_or_else(|| ActionError::invalid_version(text))?;

        let component = |index: usize| -> Result<u64> {
            caps.get(index)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(|| ActionError::invalid_version(text))
        };
        let major = component(1)?;
        let minor = component(2)?;
        let patch = component(3)?;

        let suffix = caps.get(4).map(|m| m.as_str()).unwrap_or_default();
        let stage = parse_stage(suffix);
        let metadata = parse_metadata(suffix);

        Ok(Version {
            major,
            minor,
            patch,
            stage,
            revision: metadata.as_ref().and_then(|m| m.revision),
            revision_label: metadata.map(|m| m.label),
        })
    }

    /// Parse a version and apply the action's defaults.
    ///
    /// `default_prefix` becomes the revision label when the text carried no
    /// build metadata. A non-empty `override_stage` replaces the parsed stage.
    ///
    /// # Errors
    /// `InvalidVersionFormat` when the text does not parse or the override
    /// stage contains anything other than word characters.
    pub fn parse_with(
        text: &str,
        default_prefix: Option<&str>,
        override_stage: Option<&str>,
    ) -> Result<Self> {
        let mut version = Version::parse(text)?;

        if let Some(stage) = override_stage.filter(|s| !s.is_empty()) {
            if captures(STAGE_NAME_PATTERN, stage).is_none() {
                return Err(ActionError::invalid_version(format!("{} (stage {})", text, stage)));
            }
            version.stage = Some(stage.to_string());
        }

        if version.revision_label.is_none() {
            version.revision_label = default_prefix.map(str::to_string);
        }

        Ok(version)
    }

    /// Whether the rendered version is accepted by a strict semver parser
    pub fn is_strict_semver(&self) -> bool {
        semver::Version::parse(&self.to_string()).is_ok()
    }
}

fn parse_stage(suffix: &str) -> Option<String> {
    captures(STAGE_PATTERN, suffix)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Digit-less or overflowing metadata is kept whole as an opaque label.
fn parse_metadata(suffix: &str) -> Option<Metadata> {
    let caps = captures(METADATA_PATTERN, suffix)?;
    let label = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
    let digits = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

    match digits.parse::<u64>() {
        Ok(revision) => Some(Metadata {
            label: label.to_string(),
            revision: Some(revision),
        }),
        Err(_) => Some(Metadata {
            label: format!("{}{}", label, digits),
            revision: None,
        }),
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if let Some(stage) = self.stage.as_deref().filter(|s| !s.is_empty()) {
            write!(f, "-{}", stage)?;
        }

        if let Some(revision) = self.revision {
            write!(
                f,
                "+{}{}",
                self.revision_label.as_deref().unwrap_or_default(),
                revision
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
        assert_eq!(v.stage, None);
        assert_eq!(v.revision, None);
        assert_eq!(v.revision_label, None);
    }

    #[test]
    fn test_parse_with_stage() {
        let v = Version::parse("1.2.3-foobar").unwrap();
        assert_eq!(v, Version::new(1, 2, 3).with_stage("foobar"));
    }

    #[test]
    fn test_parse_stage_and_opaque_metadata() {
        let v = Version::parse("1.2.3-foo+bar").unwrap();
        assert_eq!(v.stage.as_deref(), Some("foo"));
        assert_eq!(v.revision, None);
        assert_eq!(v.revision_label.as_deref(), Some("bar"));
    }

    #[test]
    fn test_parse_stage_and_revision() {
        let v = Version::parse("1.2.3-foobar+build-4").unwrap();
        assert_eq!(
            v,
            Version::new(1, 2, 3)
                .with_stage("foobar")
                .with_revision("build-", 4)
        );
    }

    #[test]
    fn test_parse_revision_without_stage() {
        let v = Version::parse("1.2.3+build-4").unwrap();
        assert_eq!(v.stage, None);
        assert_eq!(v.revision_label.as_deref(), Some("build-"));
        assert_eq!(v.revision, Some(4));
    }

    #[test]
    fn test_parse_revision_without_label() {
        let v = Version::parse("1.2.3+7").unwrap();
        assert_eq!(v.revision_label.as_deref(), Some(""));
        assert_eq!(v.revision, Some(7));
    }

    #[test]
    fn test_parse_label_keeps_inner_digits() {
        let v = Version::parse("1.2.3+build2-15").unwrap();
        assert_eq!(v.revision_label.as_deref(), Some("build2-"));
        assert_eq!(v.revision, Some(15));
    }

    #[test]
    fn test_parse_overflowing_revision_is_opaque() {
        let v = Version::parse("1.2.3+r99999999999999999999999").unwrap();
        assert_eq!(v.revision, None);
        assert_eq!(
            v.revision_label.as_deref(),
            Some("r99999999999999999999999")
        );
    }

    #[test]
    fn test_parse_tolerates_prefix() {
        let v = Version::parse("v1.2.3-rc+r2").unwrap();
        assert_eq!(
            v,
            Version::new(1, 2, 3).with_stage("rc").with_revision("r", 2)
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Version::parse("1.2"),
            Err(ActionError::InvalidVersionFormat(_))
        ));
        assert!(Version::parse("").is_err());
        assert!(Version::parse("release").is_err());
        assert!(Version::parse("99999999999999999999999.0.0").is_err());
    }

    #[test]
    fn test_parse_stage_stops_at_non_word() {
        let v = Version::parse("1.2.3-alpha.1").unwrap();
        assert_eq!(v.stage.as_deref(), Some("alpha"));
        assert_eq!(v.revision, None);
    }

    #[test]
    fn test_parse_with_default_prefix() {
        let v = Version::parse_with("1.2.3", Some("r"), None).unwrap();
        assert_eq!(v.revision_label.as_deref(), Some("r"));
        assert_eq!(v.revision, None);

        let parsed_label = Version::parse_with("1.2.3+build-4", Some("r"), None).unwrap();
        assert_eq!(parsed_label.revision_label.as_deref(), Some("build-"));
    }

    #[test]
    fn test_parse_with_override_stage() {
        let v = Version::parse_with("1.2.3-beta", None, Some("rc")).unwrap();
        assert_eq!(v.stage.as_deref(), Some("rc"));

        let kept = Version::parse_with("1.2.3-beta", None, Some("")).unwrap();
        assert_eq!(kept.stage.as_deref(), Some("beta"));
    }

    #[test]
    fn test_parse_with_rejects_non_word_override_stage() {
        for stage in ["rc.1", "rc-1", "beta+r", " rc"] {
            let result = Version::parse_with("1.2.3", Some("r"), Some(stage));
            assert!(
                matches!(result, Err(ActionError::InvalidVersionFormat(_))),
                "override stage {:?} should be rejected",
                stage
            );
        }

        let v = Version::parse_with("1.2.3", Some("r"), Some("rc_1")).unwrap();
        assert_eq!(v.stage.as_deref(), Some("rc_1"));
    }

    #[test]
    fn test_format_stage_and_revision() {
        let v = Version::new(1, 2, 3)
            .with_stage("foobar")
            .with_revision("build-", 1);
        assert_eq!(v.to_string(), "1.2.3-foobar+build-1");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
    }

    #[test]
    fn test_format_without_stage() {
        let v = Version::new(1, 2, 3).with_revision("r", 1);
        assert_eq!(v.to_string(), "1.2.3+r1");
    }

    #[test]
    fn test_format_without_revision() {
        let v = Version::new(1, 2, 3).with_stage("foobar");
        assert_eq!(v.to_string(), "1.2.3-foobar");
    }

    #[test]
    fn test_format_revision_without_label() {
        let mut v = Version::new(1, 2, 3);
        v.revision = Some(5);
        assert_eq!(v.to_string(), "1.2.3+5");
    }

    #[test]
    fn test_format_omits_label_without_revision() {
        let mut v = Version::new(1, 2, 3);
        v.revision_label = Some("r".to_string());
        v.stage = Some(String::new());
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_round_trip() {
        let versions = vec![
            Version::new(0, 0, 1).with_stage("beta").with_revision("r", 12),
            Version::new(10, 20, 30)
                .with_stage("rc_1")
                .with_revision("build-", 4),
            Version::new(1, 0, 0).with_stage("dev").with_revision("", 9),
            Version::new(2, 0, 0).with_revision("", 0),
            Version::new(1, 2, 3).with_revision("b2x", 7),
            Version::new(1, 2, 3).with_stage("rc2").with_revision("r", 3),
            Version::new(4, 5, 6).with_stage("2024").with_revision("r1_", 11),
        ];

        for v in versions {
            let parsed = Version::parse(&v.to_string()).unwrap();
            assert_eq!(parsed, v, "round trip failed for {}", v);
        }
    }

    #[test]
    fn test_is_strict_semver() {
        let ok = Version::new(1, 2, 3).with_stage("beta").with_revision("r", 1);
        assert!(ok.is_strict_semver());

        let underscore = Version::new(1, 2, 3).with_stage("rc_1");
        assert!(!underscore.is_strict_semver());
    }
}
