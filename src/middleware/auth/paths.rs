/*
 * Responsibility
 * - Decide from the request path alone whether authentication is required
 * - The rule set is built once at startup and shared read-only (Arc)
 */

/// A single matcher against the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathRule {
    Exact(String),
    Prefix(String),
    Suffix(String),
}

impl PathRule {
    pub fn exact(path: impl Into<String>) -> Self {
        Self::Exact(path.into())
    }

    pub fn prefix(prefix: impl Into<String>) -> Self {
        Self::Prefix(prefix.into())
    }

    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self::Suffix(suffix.into())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(p) => path == p,
            Self::Prefix(p) => path.starts_with(p.as_str()),
            Self::Suffix(s) => path.ends_with(s.as_str()),
        }
    }
}

/// Paths that bypass authentication entirely.
///
/// Rules are OR'd: any match exempts the request, and no rule can veto another,
/// so evaluation order never changes the result.
#[derive(Debug, Clone)]
pub struct ExemptPaths {
    rules: Vec<PathRule>,
}

impl ExemptPaths {
    pub fn new(rules: Vec<PathRule>) -> Self {
        Self { rules }
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(path))
    }

    #[cfg(test)]
    fn rules(&self) -> &[PathRule] {
        &self.rules
    }
}

impl Default for ExemptPaths {
    /// Root page, favicon, public auth endpoints and static assets.
    fn default() -> Self {
        Self::new(vec![
            PathRule::exact("/"),
            PathRule::exact("/favicon.ico"),
            PathRule::prefix("/api/auth/"),
            PathRule::suffix(".html"),
            PathRule::suffix(".css"),
            PathRule::suffix(".js"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_exempt_public_paths() {
        let paths = ExemptPaths::default();

        for path in [
            "/",
            "/favicon.ico",
            "/api/auth/login",
            "/api/auth/oauth2/github",
            "/index.html",
            "/assets/style.css",
            "/app.js",
        ] {
            assert!(paths.is_exempt(path), "{path} should be exempt");
        }
    }

    #[test]
    fn default_rules_protect_everything_else() {
        let paths = ExemptPaths::default();

        for path in [
            "",
            "/api/memos",
            "/api/memos/abc",
            "/api/auth",
            "//",
            "/favicon.ico/x",
            "/app.json",
            "/index.htm",
        ] {
            assert!(!paths.is_exempt(path), "{path:?} should require auth");
        }
    }

    #[test]
    fn rule_order_does_not_change_the_result() {
        let mut reversed = ExemptPaths::default().rules().to_vec();
        reversed.reverse();
        let reversed = ExemptPaths::new(reversed);
        let paths = ExemptPaths::default();

        for path in ["/", "/api/auth/user", "/a.css", "/api/memos", ""] {
            assert_eq!(paths.is_exempt(path), reversed.is_exempt(path));
        }
    }

    #[test]
    fn empty_rule_set_exempts_nothing() {
        let paths = ExemptPaths::new(Vec::new());
        assert!(!paths.is_exempt("/"));
    }
}
