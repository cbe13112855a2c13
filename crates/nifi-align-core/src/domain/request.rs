use std::fmt;
use std::num::NonZeroUsize;

use super::group::GroupId;
use crate::error::{AlignError, AlignResult};

/// How many levels below the starting group the engine may descend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Descend until a level has no child groups or holds flow elements
    Unlimited,
    /// Descend at most this many levels; zero means do nothing
    Limited(u32),
}

impl Depth {
    /// Convert the command line value: -1 is unlimited, anything below is rejected
    pub fn from_signed(value: i64) -> AlignResult<Self> {
        match value {
            -1 => Ok(Depth::Unlimited),
            v if v < -1 => Err(AlignError::Configuration(format!(
                "Invalid depth ({}) provided. Use -1 for unlimited.",
                v
            ))),
            v => u32::try_from(v)
                .map(Depth::Limited)
                .map_err(|_| AlignError::Configuration(format!("Depth ({}) is too large.", v))),
        }
    }

    /// Depth zero never touches the server
    pub fn is_zero(&self) -> bool {
        matches!(self, Depth::Limited(0))
    }

    /// Depth available one level further down
    pub fn descend(&self) -> Depth {
        match self {
            Depth::Unlimited => Depth::Unlimited,
            Depth::Limited(n) => Depth::Limited(n.saturating_sub(1)),
        }
    }

    /// Whether children of a group at this depth are aligned recursively
    pub fn recurses(&self) -> bool {
        !self.descend().is_zero()
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Unlimited => write!(f, "unlimited"),
            Depth::Limited(n) => write!(f, "{}", n),
        }
    }
}

/// Parameters of one alignment run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRequest {
    /// Starting group
    pub root: GroupId,
    /// Depth budget
    pub max_depth: Depth,
    /// Grid width
    pub max_columns: NonZeroUsize,
}

impl AlignmentRequest {
    /// Create a request
    pub fn new(root: GroupId, max_depth: Depth, max_columns: NonZeroUsize) -> Self {
        Self {
            root,
            max_depth,
            max_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_from_signed() {
        assert_eq!(Depth::from_signed(-1).unwrap(), Depth::Unlimited);
        assert_eq!(Depth::from_signed(0).unwrap(), Depth::Limited(0));
        assert_eq!(Depth::from_signed(5).unwrap(), Depth::Limited(5));
        assert!(matches!(Depth::from_signed(-2), Err(AlignError::Configuration(_))));
    }

    #[test]
    fn test_recursion_rule() {
        // depth 1 aligns the children of the start group but does not descend
        assert!(!Depth::Limited(1).recurses());
        assert!(Depth::Limited(2).recurses());
        assert!(Depth::Unlimited.recurses());
        assert_eq!(Depth::Limited(2).descend(), Depth::Limited(1));
    }
}
