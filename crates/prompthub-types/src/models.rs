use serde::{Deserialize, Serialize};

/// Ad slot an advertisement is served into. Each placement holds at most one
/// active ad at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Banner,
    Video,
}

impl Placement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Banner => "banner",
            Placement::Video => "video",
        }
    }

    /// Parse the database / URL representation. Returns `None` for anything
    /// outside the fixed enumeration.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "banner" => Some(Placement::Banner),
            "video" => Some(Placement::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrip() {
        for p in [Placement::Banner, Placement::Video] {
            assert_eq!(Placement::parse(p.as_str()), Some(p));
        }
        assert_eq!(Placement::parse("interstitial"), None);
        assert_eq!(Placement::parse(""), None);
    }
}
