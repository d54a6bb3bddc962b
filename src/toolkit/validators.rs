//! Stock validators for configuration properties

use super::property::ValidationCallback;
use crate::charset::Charset;
use crate::error::{Error, Result};

/// Accepts names of supported charsets
#[derive(Debug, Clone, Copy, Default)]
pub struct CharsetValidator;

impl ValidationCallback for CharsetValidator {
    fn validate(&self, candidate: &str) -> std::result::Result<(), String> {
        Charset::for_name(candidate).map(|_| ()).map_err(|e| e.to_string())
    }
}

/// Accepts integers within inclusive bounds
#[derive(Debug, Clone, Copy)]
pub struct IntegerRangeValidator {
    lower_bound: i32,
    upper_bound: i32,
}

impl IntegerRangeValidator {
    pub fn new(lower_bound: i32, upper_bound: i32) -> Result<Self> {
        if lower_bound > upper_bound {
            return Err(Error::Config(format!(
                "lowerBound({}) <= upperBound({})",
                lower_bound, upper_bound
            )));
        }
        Ok(IntegerRangeValidator {
            lower_bound,
            upper_bound,
        })
    }

    fn out_of_range_message(&self, value: i32) -> String {
        let (lower, upper) = (self.lower_bound, self.upper_bound);
        if lower == upper {
            format!("Must be equal to {}: {}", lower, value)
        } else if upper == i32::MAX {
            match lower {
                0 => format!("Must be positive or 0: {}", value),
                1 => format!("Must be strictly positive: {}", value),
                _ => format!("Must be greater or equal to {}: {}", lower, value),
            }
        } else if lower == i32::MIN {
            match upper {
                0 => format!("Must be negative or 0: {}", value),
                -1 => format!("Must be strictly negative: {}", value),
                _ => format!("Must be lower or equal to {}: {}", upper, value),
            }
        } else {
            format!("Must be between {} and {}: {}", lower, upper, value)
        }
    }
}

impl ValidationCallback for IntegerRangeValidator {
    fn validate(&self, candidate: &str) -> std::result::Result<(), String> {
        let value: i32 = candidate
            .parse()
            .map_err(|_| format!("Not an integer: {}", candidate))?;
        if value < self.lower_bound || value > self.upper_bound {
            Err(self.out_of_range_message(value))
        } else {
            Ok(())
        }
    }
}

/// Accepts exactly `true` or `false`
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanValidator;

impl ValidationCallback for BooleanValidator {
    fn validate(&self, candidate: &str) -> std::result::Result<(), String> {
        match candidate {
            "true" | "false" => Ok(()),
            _ => Err(format!("Must be either \"true\" or \"false\": {}", candidate)),
        }
    }
}

pub fn charset() -> CharsetValidator {
    CharsetValidator
}

pub fn integer_range(lower_bound: i32, upper_bound: i32) -> Result<IntegerRangeValidator> {
    IntegerRangeValidator::new(lower_bound, upper_bound)
}

pub fn boolean() -> BooleanValidator {
    BooleanValidator
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(validator: &dyn ValidationCallback, candidate: &str) -> String {
        validator.validate(candidate).err().unwrap_or_default()
    }

    #[test]
    fn test_charset() {
        let validator = charset();
        assert!(validator.validate("UTF-8").is_ok());
        assert!(validator.validate("iso-8859-1").is_ok());
        assert_eq!(message(&validator, "foo"), "Unsupported charset: foo");
        assert_eq!(message(&validator, "?"), "Illegal charset: ?");
    }

    #[test]
    fn test_boolean() {
        let validator = boolean();
        assert!(validator.validate("true").is_ok());
        assert!(validator.validate("false").is_ok());
        assert_eq!(message(&validator, "TRUE"), "Must be either \"true\" or \"false\": TRUE");
        assert_eq!(message(&validator, ""), "Must be either \"true\" or \"false\": ");
    }

    #[test]
    fn test_integer_range_bounds() {
        let validator = integer_range(0, 10).unwrap();
        assert!(validator.validate("0").is_ok());
        assert!(validator.validate("10").is_ok());
        assert_eq!(message(&validator, "11"), "Must be between 0 and 10: 11");
        assert_eq!(message(&validator, "-1"), "Must be between 0 and 10: -1");
        assert_eq!(message(&validator, "foo"), "Not an integer: foo");
    }

    #[test]
    fn test_integer_range_messages() {
        let cases = [
            (42, 42, "43", "Must be equal to 42: 43"),
            (0, i32::MAX, "-1", "Must be positive or 0: -1"),
            (1, i32::MAX, "0", "Must be strictly positive: 0"),
            (5, i32::MAX, "4", "Must be greater or equal to 5: 4"),
            (i32::MIN, 0, "1", "Must be negative or 0: 1"),
            (i32::MIN, -1, "0", "Must be strictly negative: 0"),
            (i32::MIN, 5, "6", "Must be lower or equal to 5: 6"),
        ];
        for (lower, upper, candidate, expected) in cases {
            let validator = integer_range(lower, upper).unwrap();
            assert_eq!(message(&validator, candidate), expected);
        }
    }

    #[test]
    fn test_integer_range_inverted_bounds() {
        let err = integer_range(1, 0).unwrap_err();
        assert_eq!(err.to_string(), "lowerBound(1) <= upperBound(0)");
    }
}
