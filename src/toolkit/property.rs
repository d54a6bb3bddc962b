//! Configuration properties exposed by a language to the toolkit

use std::fmt;

use crate::error::{Error, Result};

/// Checks a candidate value, returning the reason it is rejected
pub trait ValidationCallback: Send + Sync {
    fn validate(&self, candidate: &str) -> std::result::Result<(), String>;
}

impl<F> ValidationCallback for F
where
    F: Fn(&str) -> std::result::Result<(), String> + Send + Sync,
{
    fn validate(&self, candidate: &str) -> std::result::Result<(), String> {
        self(candidate)
    }
}

struct NoValidation;

impl ValidationCallback for NoValidation {
    fn validate(&self, _candidate: &str) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// A named, validated string setting
pub struct ConfigurationProperty {
    name: String,
    description: String,
    value: String,
    validator: Box<dyn ValidationCallback>,
}

impl ConfigurationProperty {
    /// Property accepting any value
    pub fn new(name: impl Into<String>, description: impl Into<String>, default_value: impl Into<String>) -> Self {
        ConfigurationProperty {
            name: name.into(),
            description: description.into(),
            value: default_value.into(),
            validator: Box::new(NoValidation),
        }
    }

    /// Property whose values, the default included, must pass `validator`
    pub fn with_validator(
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<String>,
        validator: impl ValidationCallback + 'static,
    ) -> Result<Self> {
        let default_value = default_value.into();
        if let Err(message) = validator.validate(&default_value) {
            return Err(Error::Config(format!(
                "The default value \"{}\" did not pass validation: {}",
                default_value, message
            )));
        }
        Ok(ConfigurationProperty {
            name: name.into(),
            description: description.into(),
            value: default_value,
            validator: Box::new(validator),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn validate(&self, candidate: &str) -> std::result::Result<(), String> {
        self.validator.validate(candidate)
    }

    /// Replaces the value; a rejected value leaves the property unchanged
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        if let Err(message) = self.validate(&value) {
            return Err(Error::Config(format!(
                "The value \"{}\" did not pass validation: {}",
                value, message
            )));
        }
        self.value = value;
        Ok(())
    }
}

impl fmt::Debug for ConfigurationProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationProperty")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}
