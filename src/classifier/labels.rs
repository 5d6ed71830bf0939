/// Weight class a vision label falls into. Checked strictly in the order
/// `Direct`, `Close`, `Related`; the first set containing the label wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Direct,
    Close,
    Related,
}

impl Tier {
    pub fn weight(self) -> f64 {
        match self {
            Tier::Direct => 2.0,
            Tier::Close => 1.5,
            Tier::Related => 1.0,
        }
    }
}

pub const DIRECT_LABELS: &[&str] = &["hot dog", "hotdog"];

pub const CLOSE_LABELS: &[&str] = &["frankfurter", "wiener", "knackwurst"];

// "frankfureter" (sic) is matched verbatim.
pub const RELATED_LABELS: &[&str] = &[
    "hot dog",
    "hotdog",
    "wiener",
    "knackwurst",
    "bratwurst",
    "frankfureter",
    "sausage",
    "hot dog bun",
    "vienna sausage",
];

/// Expects an already lower-cased description.
pub fn tier_for(normalized: &str) -> Option<Tier> {
    if DIRECT_LABELS.contains(&normalized) {
        Some(Tier::Direct)
    } else if CLOSE_LABELS.contains(&normalized) {
        Some(Tier::Close)
    } else if RELATED_LABELS.contains(&normalized) {
        Some(Tier::Related)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_match_shadows_related_set() {
        assert_eq!(tier_for("hot dog"), Some(Tier::Direct));
        assert_eq!(tier_for("hotdog"), Some(Tier::Direct));
    }

    #[test]
    fn close_match_shadows_related_set() {
        assert_eq!(tier_for("wiener"), Some(Tier::Close));
        assert_eq!(tier_for("knackwurst"), Some(Tier::Close));
        assert_eq!(tier_for("frankfurter"), Some(Tier::Close));
    }

    #[test]
    fn related_only_terms() {
        for label in ["bratwurst", "frankfureter", "sausage", "hot dog bun", "vienna sausage"] {
            assert_eq!(tier_for(label), Some(Tier::Related), "{label}");
        }
    }

    #[test]
    fn matching_is_exact() {
        assert_eq!(tier_for("hot dogs"), None);
        assert_eq!(tier_for(" hot dog"), None);
        assert_eq!(tier_for("Hot Dog"), None);
        assert_eq!(tier_for("food"), None);
    }
}
