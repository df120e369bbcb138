use std::fmt;

/// The two phases every trial of the experiment runs through.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    Study,
    Test,
}

impl SessionPhase {
    /// Test phase collects keyboard responses; study phase only times the display.
    pub fn collects_responses(&self) -> bool {
        matches!(self, Self::Test)
    }

    pub fn shows_instructions(&self) -> bool {
        matches!(self, Self::Test)
    }

    /// File stem of the table written at the end of the phase.
    pub fn table_stem(&self) -> &'static str {
        match self {
            Self::Study => "study_phase",
            Self::Test => "test_phase",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Study => f.write_str("study"),
            Self::Test => f.write_str("test"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_test_collects_responses() {
        assert!(!SessionPhase::Study.collects_responses());
        assert!(SessionPhase::Test.collects_responses());
        assert_eq!(SessionPhase::Test.table_stem(), "test_phase");
    }
}
