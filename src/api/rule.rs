//! Rule keys
//!
//! Grammars declare their rules as `RuleKey` constants:
//!
//! ```
//! use flr::api::RuleKey;
//!
//! pub const EXPRESSION: RuleKey = RuleKey::new("EXPRESSION");
//! assert_eq!(EXPRESSION.name(), "EXPRESSION");
//! ```

use std::fmt;

/// Identifier of a grammar rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleKey {
    name: &'static str,
}

impl RuleKey {
    pub const fn new(name: &'static str) -> Self {
        RuleKey { name }
    }

    /// Rule name, also used as AST node name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: RuleKey = RuleKey::new("A");

    #[test]
    fn test_display_is_name() {
        assert_eq!(A.to_string(), "A");
        assert_eq!(A, RuleKey::new("A"));
        assert_ne!(A, RuleKey::new("B"));
    }
}
