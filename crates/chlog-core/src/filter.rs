//! Selection of changelog files among the files a PR touched

/// Matches paths of the form `{dir}/...{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogFilter {
    dir: String,
    ext: String,
}

impl ChangelogFilter {
    pub const DEFAULT_DIR: &'static str = "Resources/Changelog";
    pub const DEFAULT_EXT: &'static str = ".yml";

    /// Trailing slashes on `dir` are ignored
    pub fn new(dir: impl Into<String>, ext: impl Into<String>) -> Self {
        let dir = dir.into().trim_end_matches('/').to_string();
        Self {
            dir,
            ext: ext.into(),
        }
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn ext(&self) -> &str {
        &self.ext
    }

    pub fn matches(&self, path: &str) -> bool {
        path.strip_prefix(self.dir.as_str())
            .is_some_and(|rest| rest.starts_with('/'))
            && path.ends_with(self.ext.as_str())
    }

    /// Keep the matching paths, in their original order
    pub fn select<I, S>(&self, paths: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        paths
            .into_iter()
            .map(Into::into)
            .filter(|p| self.matches(p))
            .collect()
    }
}

impl Default for ChangelogFilter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIR, Self::DEFAULT_EXT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_matches_changelog_yaml() {
        let f = ChangelogFilter::default();
        assert!(f.matches("Resources/Changelog/Changelog.yml"));
        assert!(f.matches("Resources/Changelog/Admin/Admin.yml"));
        assert!(!f.matches("Resources/Changelog/Changelog.yaml"));
        assert!(!f.matches("Resources/ChangelogOld/Changelog.yml"));
        assert!(!f.matches("Resources/Changelog.yml"));
        assert!(!f.matches("src/Resources/Changelog/Changelog.yml"));
    }

    #[test]
    fn test_trailing_slash_on_dir_is_stripped() {
        let f = ChangelogFilter::new("docs/changes//", ".yml");
        assert_eq!(f.dir(), "docs/changes");
        assert!(f.matches("docs/changes/a.yml"));
    }

    #[test]
    fn test_select_preserves_order() {
        let f = ChangelogFilter::default();
        let picked = f.select([
            "Resources/Changelog/B.yml",
            "README.md",
            "Resources/Changelog/A.yml",
        ]);
        assert_eq!(
            picked,
            vec!["Resources/Changelog/B.yml", "Resources/Changelog/A.yml"]
        );
    }
}
