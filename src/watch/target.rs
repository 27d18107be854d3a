//! Watch targets: which changed paths qualify, and what they re-run.
//!
//! | Target     | Pattern                  | Tasks  |
//! |------------|--------------------------|--------|
//! | `css`      | `<assets>/css/*.css`     | `copy` |
//! | `js`       | `<assets>/js/*.js`       | `copy` |
//! | `themeCss` | `<theme>/*/css/*.css`    | `copy` |

use glob::{MatchOptions, Pattern, PatternError};

use crate::asset::AssetLayout;

const MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
pub struct WatchTarget {
    pub name: String,
    pattern: Pattern,
    pub tasks: Vec<String>,
}

impl WatchTarget {
    pub fn new(name: &str, pattern: &str, tasks: &[&str]) -> Result<Self, PatternError> {
        Ok(Self {
            name: name.to_string(),
            pattern: Pattern::new(pattern)?,
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        })
    }

    /// Match a project-relative slash path. `*` never crosses `/`.
    pub fn matches(&self, rel: &str) -> bool {
        self.pattern.matches_with(rel, MATCH)
    }
}

/// The default target set for a layout.
pub fn default_targets(layout: &AssetLayout) -> Result<Vec<WatchTarget>, PatternError> {
    let assets = Pattern::escape(layout.assets());
    let mut targets = vec![
        WatchTarget::new("css", &format!("{assets}/css/*.css"), &["copy"])?,
        WatchTarget::new("js", &format!("{assets}/js/*.js"), &["copy"])?,
    ];
    for theme in layout.themes() {
        let theme = Pattern::escape(theme);
        targets.push(WatchTarget::new(
            "themeCss",
            &format!("{theme}/*/css/*.css"),
            &["copy"],
        )?);
    }
    Ok(targets)
}

/// First target matching `rel`.
pub fn match_target<'a>(targets: &'a [WatchTarget], rel: &str) -> Option<&'a WatchTarget> {
    targets.iter().find(|t| t.matches(rel))
}
