use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// An escaped Slack mention, `<@U123|alice>` or `<@U123>`.
static MENTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<@(?P<id>[^|<>\s]+)(?:\|(?P<name>[^<>]+))?>$")
        .expect("mention pattern is a valid regex")
});

/// A user as typed by the caller, before any lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserReference {
    /// A pre-escaped mention; the display name, when present, is trusted as-is.
    Mention {
        id: String,
        display_name: Option<String>,
    },
    /// A bare identifier that still needs a display name.
    Id(String),
}

impl UserReference {
    /// Returns `None` when the input cannot name a single user.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();

        if let Some(captures) = MENTION_PATTERN.captures(raw) {
            return Some(Self::Mention {
                id: captures["id"].to_string(),
                display_name: captures.name("name").map(|m| m.as_str().to_string()),
            });
        }

        let id = raw.strip_prefix('@').unwrap_or(raw);
        if id.is_empty() || id.contains(|c: char| c.is_whitespace() || "<>|@".contains(c)) {
            return None;
        }
        Some(Self::Id(id.to_string()))
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Mention { id, .. } | Self::Id(id) => id,
        }
    }
}

/// A user with a known display name. Its canonical form is the mention token,
/// which is also the ledger key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    id: String,
    display_name: String,
}

impl ResolvedUser {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mention(&self) -> String {
        format!("<@{}|{}>", self.id, self.display_name)
    }

    /// Compares identities only; display names may drift between lookups.
    pub fn same_identity(&self, other: &ResolvedUser) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for ResolvedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<@{}|{}>", self.id, self.display_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_mention() {
        assert_eq!(
            UserReference::parse("<@U1|alice>"),
            Some(UserReference::Mention {
                id: "U1".to_string(),
                display_name: Some("alice".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_mention_without_name() {
        let parsed = UserReference::parse("<@U9>").unwrap();
        assert_eq!(parsed.id(), "U9");
        assert!(matches!(
            parsed,
            UserReference::Mention {
                display_name: None,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_strips_at_sigil() {
        assert_eq!(
            UserReference::parse("@U1"),
            Some(UserReference::Id("U1".to_string()))
        );
        assert_eq!(
            UserReference::parse("U1"),
            Some(UserReference::Id("U1".to_string()))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for raw in ["", "@", "two words", "<@U1|alice", "@@U1", "<U1>"] {
            assert_eq!(UserReference::parse(raw), None, "{raw} should not parse");
        }
    }

    #[test]
    fn test_mention_is_canonical_form() {
        let user = ResolvedUser::new("U1", "alice");
        assert_eq!(user.mention(), "<@U1|alice>");
        assert_eq!(user.to_string(), user.mention());
    }
}
