/// Outcome of a recognition query.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchVerdict {
    /// Best match scored strictly above the threshold.
    Recognized { name: String, score: f64 },
    /// The store has records but none scored above the threshold.
    Unrecognized { best_score: f64 },
    /// The store holds no records.
    Empty,
    /// The query was empty, non-finite, or of the wrong dimension.
    Invalid,
}

impl MatchVerdict {
    pub fn name(&self) -> Option<&str> {
        match self {
            MatchVerdict::Recognized { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn score(&self) -> Option<f64> {
        match self {
            MatchVerdict::Recognized { score, .. } => Some(*score),
            MatchVerdict::Unrecognized { best_score } => Some(*best_score),
            MatchVerdict::Empty | MatchVerdict::Invalid => None,
        }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, MatchVerdict::Recognized { .. })
    }
}

impl std::fmt::Display for MatchVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchVerdict::Recognized { name, score } => write!(f, "{name} ({score:.3})"),
            MatchVerdict::Unrecognized { best_score } => {
                write!(f, "Unknown (best {best_score:.3})")
            }
            MatchVerdict::Empty => write!(f, "Unknown (no enrolled faces)"),
            MatchVerdict::Invalid => write!(f, "Invalid query"),
        }
    }
}
