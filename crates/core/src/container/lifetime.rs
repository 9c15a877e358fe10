/// Instance-sharing policy attached to a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// A fresh instance on every resolution.
    Transient,
    /// One instance shared by every scope built from the same builder.
    Singleton,
    /// One instance per scope, reset for every new scope.
    Scoped,
}

impl Lifetime {
    /// Get the lifetime name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Lifetime::Transient => "transient",
            Lifetime::Singleton => "singleton",
            Lifetime::Scoped => "scoped",
        }
    }
}

impl std::fmt::Display for Lifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Lifetime::Transient), "transient");
        assert_eq!(format!("{}", Lifetime::Singleton), "singleton");
        assert_eq!(format!("{}", Lifetime::Scoped), "scoped");
    }
}
