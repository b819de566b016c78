//! Operator Table
//!
//! Every operator that can appear in an expression tree together with its
//! priority tier. A smaller tier binds looser and is collapsed later.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BslOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    And,
    Or,
    Not,
    UnaryMinus,
    UnaryPlus,
    /// Property or method access, `Target.Name`
    Dereference,
    /// Subscript access, `Target[Index]`
    IndexAccess,
    /// `?(condition, a, b)`
    Conditional,
}

impl BslOperator {
    pub fn priority(self) -> u8 {
        match self {
            BslOperator::Add | BslOperator::Subtract => 1,
            BslOperator::Multiply | BslOperator::Divide | BslOperator::Modulo => 2,
            BslOperator::Equal
            | BslOperator::Less
            | BslOperator::LessOrEqual
            | BslOperator::Greater
            | BslOperator::GreaterOrEqual
            | BslOperator::NotEqual => 3,
            BslOperator::And => 4,
            BslOperator::Or => 5,
            BslOperator::Not => 6,
            BslOperator::UnaryMinus | BslOperator::UnaryPlus => 7,
            BslOperator::Dereference | BslOperator::IndexAccess => 8,
            BslOperator::Conditional => 9,
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(
            self,
            BslOperator::Not | BslOperator::UnaryMinus | BslOperator::UnaryPlus
        )
    }

    /// Access operators encode chains, not arithmetic
    pub fn is_access(self) -> bool {
        matches!(self, BslOperator::Dereference | BslOperator::IndexAccess)
    }

    pub fn is_comparison(self) -> bool {
        self.priority() == 3
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BslOperator::And | BslOperator::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BslOperator::Add | BslOperator::UnaryPlus => "+",
            BslOperator::Subtract | BslOperator::UnaryMinus => "-",
            BslOperator::Multiply => "*",
            BslOperator::Divide => "/",
            BslOperator::Modulo => "%",
            BslOperator::Equal => "=",
            BslOperator::NotEqual => "<>",
            BslOperator::Less => "<",
            BslOperator::LessOrEqual => "<=",
            BslOperator::Greater => ">",
            BslOperator::GreaterOrEqual => ">=",
            BslOperator::And => "AND",
            BslOperator::Or => "OR",
            BslOperator::Not => "NOT",
            BslOperator::Dereference => ".",
            BslOperator::IndexAccess => "[]",
            BslOperator::Conditional => "?",
        }
    }
}

impl std::fmt::Display for BslOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
