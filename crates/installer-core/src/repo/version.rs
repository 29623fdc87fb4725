//! Version parsing and ranking for release tags

use semver::Version;

/// Parse a tag name as a semantic version, allowing a leading `v`.
/// Returns `None` for anything that isn't a legal version (branch-like names,
/// partial versions, malformed pre-release identifiers).
pub fn parse_tag(tag: &str) -> Option<Version> {
    let trimmed = tag.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).ok()
}

/// Pick the highest-precedence valid tag. The original tag name is returned
/// since that is what the checkout needs. Build metadata carries no
/// precedence, so tags differing only in it tie and the last one listed wins.
pub fn latest_tag<I, S>(tags: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .filter_map(|tag| {
            let tag = tag.as_ref();
            parse_tag(tag).map(|version| (version, tag.trim().to_string()))
        })
        .max_by(|(a, _), (b, _)| a.cmp_precedence(b))
        .map(|(_, tag)| tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerelease_of_next_major_wins() {
        let tags = ["1.0.0", "2.0.0-rc1", "not-a-tag", "1.9.9"];
        assert_eq!(latest_tag(tags), Some("2.0.0-rc1".to_string()));
    }

    #[test]
    fn test_release_outranks_its_prerelease() {
        let tags = ["2.0.0-rc1", "2.0.0", "2.0.0-beta.2"];
        assert_eq!(latest_tag(tags), Some("2.0.0".to_string()));
    }

    #[test]
    fn test_numeric_not_lexical_ordering() {
        let tags = ["1.9.0", "1.10.0", "1.2.0"];
        assert_eq!(latest_tag(tags), Some("1.10.0".to_string()));
    }

    #[test]
    fn test_leading_v_keeps_original_name() {
        let tags = ["v1.4.0", "1.3.9"];
        assert_eq!(latest_tag(tags), Some("v1.4.0".to_string()));
    }

    #[test]
    fn test_invalid_tags_never_selected() {
        assert_eq!(latest_tag(["master", "release-2", "1.2", "v"]), None);
        assert_eq!(latest_tag(Vec::<String>::new()), None);
    }

    #[test]
    fn test_build_metadata_accepted() {
        assert!(parse_tag("1.0.0+20240101").is_some());
        assert!(parse_tag("1.0.0-alpha.1").is_some());
        assert!(parse_tag("01.0.0").is_none());
    }

    #[test]
    fn test_build_metadata_ignored_for_ranking() {
        let tags = ["1.0.0+zzz", "1.0.0+aaa", "0.9.0+zzz"];
        assert_eq!(latest_tag(tags), Some("1.0.0+aaa".to_string()));

        let tags = ["1.1.0+001", "1.0.0+999"];
        assert_eq!(latest_tag(tags), Some("1.1.0+001".to_string()));
    }
}
