//! Configuration models: how the toolkit obtains parsers for a language

use tracing::{debug, info};

use super::property::ConfigurationProperty;
use super::validators;
use crate::charset::Charset;
use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::lexer::Lexer;
use crate::parser::{ParserAdapter, SourceParser};

/// Name of the charset property of the stock configurations
pub const CHARSET_PROPERTY: &str = "Charset";

/// Language plugged into the toolkit
pub trait ConfigurationModel {
    /// Properties, in display order
    fn properties(&self) -> &[ConfigurationProperty];

    fn properties_mut(&mut self) -> &mut [ConfigurationProperty];

    /// Called each time a property value changes
    fn set_updated_flag(&mut self);

    fn charset(&self) -> Charset {
        Charset::default()
    }

    /// Parser reflecting the current configuration
    fn parser(&mut self) -> Result<&dyn SourceParser>;

    /// Lexer reflecting the current configuration, for lexerful languages
    fn lexer(&mut self) -> Result<Option<&Lexer>> {
        Ok(None)
    }

    fn property(&self, name: &str) -> Option<&ConfigurationProperty> {
        self.properties().iter().find(|p| p.name() == name)
    }

    /// Validates and stores a property value, then flags the model as updated
    fn set_property(&mut self, name: &str, value: &str) -> Result<()> {
        let property = self
            .properties_mut()
            .iter_mut()
            .find(|p| p.name() == name)
            .ok_or_else(|| Error::Config(format!("No such configuration property: {}", name)))?;
        property.set_value(value)?;
        info!(property = name, value, "configuration property changed");
        self.set_updated_flag();
        Ok(())
    }
}

/// Builds parsers from the current property values
pub trait ParserFactory {
    fn properties(&self) -> &[ConfigurationProperty];

    fn properties_mut(&mut self) -> &mut [ConfigurationProperty];

    fn charset(&self) -> Charset {
        Charset::default()
    }

    /// Not called twice in a row without a configuration change
    fn create_parser(&self) -> Result<Box<dyn SourceParser>>;

    /// Not called twice in a row without a configuration change
    fn create_lexer(&self) -> Result<Option<Lexer>> {
        Ok(None)
    }
}

/// Configuration model that rebuilds its parser only after a change
pub struct CachedConfigurationModel<F> {
    factory: F,
    updated: bool,
    parser: Option<Box<dyn SourceParser>>,
    lexer: Option<Lexer>,
}

impl<F: ParserFactory> CachedConfigurationModel<F> {
    pub fn new(factory: F) -> Self {
        CachedConfigurationModel {
            factory,
            updated: true,
            parser: None,
            lexer: None,
        }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    fn ensure_up_to_date(&mut self) -> Result<()> {
        if self.updated {
            self.parser = Some(self.factory.create_parser()?);
            self.lexer = self.factory.create_lexer()?;
            self.updated = false;
            debug!(charset = %self.factory.charset(), "parser rebuilt from configuration");
        }
        Ok(())
    }
}

impl<F: ParserFactory> ConfigurationModel for CachedConfigurationModel<F> {
    fn properties(&self) -> &[ConfigurationProperty] {
        self.factory.properties()
    }

    fn properties_mut(&mut self) -> &mut [ConfigurationProperty] {
        self.factory.properties_mut()
    }

    fn set_updated_flag(&mut self) {
        self.updated = true;
    }

    fn charset(&self) -> Charset {
        self.factory.charset()
    }

    fn parser(&mut self) -> Result<&dyn SourceParser> {
        self.ensure_up_to_date()?;
        self.parser
            .as_deref()
            .ok_or_else(|| Error::Config("No parser available".to_string()))
    }

    fn lexer(&mut self) -> Result<Option<&Lexer>> {
        self.ensure_up_to_date()?;
        Ok(self.lexer.as_ref())
    }
}

/// Charset property accepting supported charset names
pub fn charset_property(default: Charset) -> Result<ConfigurationProperty> {
    ConfigurationProperty::with_validator(
        CHARSET_PROPERTY,
        "Charset used when opening files.",
        default.name(),
        validators::charset(),
    )
}

/// Charset named by the `Charset` property of `properties`, if valid
pub fn charset_of(properties: &[ConfigurationProperty]) -> Charset {
    properties
        .iter()
        .find(|p| p.name() == CHARSET_PROPERTY)
        .and_then(|p| Charset::for_name(p.value()).ok())
        .unwrap_or_default()
}

/// Parser factory for a lexerless grammar, configurable by charset
pub struct LexerlessConfiguration {
    grammar: fn() -> Result<Grammar>,
    properties: Vec<ConfigurationProperty>,
}

impl LexerlessConfiguration {
    pub fn new(grammar: fn() -> Result<Grammar>) -> Result<Self> {
        Ok(LexerlessConfiguration {
            grammar,
            properties: vec![charset_property(Charset::Utf8)?],
        })
    }
}

impl ParserFactory for LexerlessConfiguration {
    fn properties(&self) -> &[ConfigurationProperty] {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut [ConfigurationProperty] {
        &mut self.properties
    }

    fn charset(&self) -> Charset {
        charset_of(&self.properties)
    }

    fn create_parser(&self) -> Result<Box<dyn SourceParser>> {
        Ok(Box::new(ParserAdapter::new(self.charset(), (self.grammar)()?)?))
    }
}
