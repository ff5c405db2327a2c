use std::{fmt, str::FromStr};

/// Clause operators.
///
/// The operator's family (comparison, membership, range, pattern) decides
/// which object grammar follows it in filter text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Comparison
    /// Equal (`eq`)
    Eq,
    /// Not equal (`neq`)
    Neq,
    /// Greater than (`gt`)
    Gt,
    /// Greater than or equal (`gte`)
    Gte,
    /// Less than (`lt`)
    Lt,
    /// Less than or equal (`lte`)
    Lte,

    // Membership
    /// In array (`in`)
    In,
    /// Not in array (`nin`)
    Nin,

    // Range
    /// Inclusive range (`between`)
    Between,
    /// Outside inclusive range (`nbetween`)
    NBetween,

    // Pattern
    /// Wildcard search (`like`)
    Like,
    /// Negated wildcard search (`nlike`)
    NLike,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Operator::Eq,
        Operator::Neq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::In,
        Operator::Nin,
        Operator::Between,
        Operator::NBetween,
        Operator::Like,
        Operator::NLike,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::In => "in",
            Operator::Nin => "nin",
            Operator::Between => "between",
            Operator::NBetween => "nbetween",
            Operator::Like => "like",
            Operator::NLike => "nlike",
        }
    }

    /// Whether this is the negated form of its family's operator.
    pub fn is_negated(self) -> bool {
        matches!(
            self,
            Operator::Neq | Operator::Nin | Operator::NBetween | Operator::NLike
        )
    }
}

impl FromStr for Operator {
    type Err = ();

    /// Exact, case-sensitive keyword lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operator::ALL
            .into_iter()
            .find(|op| op.keyword() == s)
            .ok_or(())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Connective placed before a statement in a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conjunction {
    /// Logical AND (`and`)
    And,
    /// Logical OR (`or`)
    Or,
}

impl Conjunction {
    pub fn keyword(self) -> &'static str {
        match self {
            Conjunction::And => "and",
            Conjunction::Or => "or",
        }
    }

    /// The other connective.
    pub fn opposite(self) -> Self {
        match self {
            Conjunction::And => Conjunction::Or,
            Conjunction::Or => Conjunction::And,
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
