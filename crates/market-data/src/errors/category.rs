/// Classification of a failure by where it originated.
///
/// Every failure is isolated to the single ticker or mount it concerns; the
/// category only decides how it is logged and whether a fallback applies.
///
/// | Category | Origin | Outcome |
/// |----------|--------|---------|
/// | `Input` | Missing or malformed ticker / mount reference | Item skipped |
/// | `Lookup` | Network failure or non-success HTTP status | Default exchange |
/// | `Mapping` | Venue label outside the fixed table | Default exchange |
/// | `Environment` | Rendering engine never became available | No widgets this session |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FailureCategory {
    /// Missing or malformed input for one item.
    Input,

    /// The instrument lookup failed or returned a non-success status.
    Lookup,

    /// The venue label could not be mapped to an exchange code.
    Mapping,

    /// The surrounding runtime is not usable (e.g. engine script never loaded).
    Environment,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Lookup => "lookup",
            Self::Mapping => "mapping",
            Self::Environment => "environment",
        }
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
