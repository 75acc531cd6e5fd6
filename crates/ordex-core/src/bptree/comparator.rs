use crate::error::Error;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Bound applied by a range search relative to the query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::LessOrEqual => "<=",
            Comparator::Equal => "==",
            Comparator::GreaterOrEqual => ">=",
        }
    }

    /// Whether an entry key whose ordering against the query key is
    /// `ordering` falls inside the bound.
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Comparator::LessOrEqual => ordering != Ordering::Greater,
            Comparator::Equal => ordering == Ordering::Equal,
            Comparator::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<=" => Ok(Comparator::LessOrEqual),
            "==" => Ok(Comparator::Equal),
            ">=" => Ok(Comparator::GreaterOrEqual),
            other => Err(Error::UnknownComparator(other.to_string())),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("<=".parse::<Comparator>(), Ok(Comparator::LessOrEqual));
        assert_eq!("==".parse::<Comparator>(), Ok(Comparator::Equal));
        assert_eq!(">=".parse::<Comparator>(), Ok(Comparator::GreaterOrEqual));
    }

    #[test]
    fn test_parse_unknown() {
        for s in ["<", ">", "=", "!=", " <=", ""] {
            assert_eq!(
                s.parse::<Comparator>(),
                Err(Error::UnknownComparator(s.to_string()))
            );
        }
    }

    #[test]
    fn test_display_round_trip() {
        for c in [Comparator::LessOrEqual, Comparator::Equal, Comparator::GreaterOrEqual] {
            assert_eq!(c.to_string().parse::<Comparator>(), Ok(c));
        }
    }

    #[test]
    fn test_accepts() {
        assert!(Comparator::LessOrEqual.accepts(Ordering::Less));
        assert!(Comparator::LessOrEqual.accepts(Ordering::Equal));
        assert!(!Comparator::LessOrEqual.accepts(Ordering::Greater));
        assert!(Comparator::Equal.accepts(Ordering::Equal));
        assert!(!Comparator::Equal.accepts(Ordering::Less));
        assert!(!Comparator::GreaterOrEqual.accepts(Ordering::Less));
        assert!(Comparator::GreaterOrEqual.accepts(Ordering::Greater));
    }
}
