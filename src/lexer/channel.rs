//! Channels and the dispatcher that drives them

use std::fmt;

use tracing::trace;

use super::code_reader::CodeReader;
use crate::api::{Token, Trivia};
use crate::error::{Error, Result};

/// Tokens and pending trivia produced while lexing
#[derive(Debug, Default)]
pub struct LexerOutput {
    tokens: Vec<Token>,
    trivia: Vec<Trivia>,
}

impl LexerOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a token; pending trivia are attached to it
    pub fn add_token(&mut self, token: Token) {
        if self.trivia.is_empty() {
            self.tokens.push(token);
        } else {
            let mut trivia = std::mem::take(&mut self.trivia);
            trivia.extend_from_slice(token.trivia());
            self.tokens.push(token.with_trivia(trivia));
        }
    }

    pub fn add_trivia(&mut self, trivia: Trivia) {
        self.trivia.push(trivia);
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

/// A channel consumes a recognizable piece of input at the cursor
pub trait Channel: fmt::Debug + Send + Sync {
    /// Returns whether something was consumed
    fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool>;
}

/// Offers the input to each channel in turn until it is exhausted
#[derive(Debug, Default)]
pub struct ChannelDispatcher {
    channels: Vec<Box<dyn Channel>>,
    fail_if_no_channel_to_consume_one_character: bool,
}

impl ChannelDispatcher {
    pub fn builder() -> ChannelDispatcherBuilder {
        ChannelDispatcherBuilder::default()
    }

    pub fn channels(&self) -> &[Box<dyn Channel>] {
        &self.channels
    }
}

impl Channel for ChannelDispatcher {
    fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool> {
        while let Some(next) = code.peek() {
            let mut consumed = false;
            for channel in &self.channels {
                if channel.consume(code, output)? {
                    consumed = true;
                    break;
                }
            }
            if !consumed {
                if self.fail_if_no_channel_to_consume_one_character {
                    return Err(Error::Lexer(format!(
                        "None of the channel has been able to handle character '{}' (decimal value {}) at line {}, column {}",
                        next,
                        next as u32,
                        code.line(),
                        code.column()
                    )));
                }
                trace!(character = %next, line = code.line(), "character skipped");
                code.pop();
            }
        }
        Ok(true)
    }
}

#[derive(Debug, Default)]
pub struct ChannelDispatcherBuilder {
    channels: Vec<Box<dyn Channel>>,
    fail_if_no_channel_to_consume_one_character: bool,
}

impl ChannelDispatcherBuilder {
    pub fn add_channel(mut self, channel: impl Channel + 'static) -> Self {
        self.channels.push(Box::new(channel));
        self
    }

    pub fn add_boxed_channels(mut self, channels: impl IntoIterator<Item = Box<dyn Channel>>) -> Self {
        self.channels.extend(channels);
        self
    }

    pub fn fail_if_no_channel_to_consume_one_character(mut self) -> Self {
        self.fail_if_no_channel_to_consume_one_character = true;
        self
    }

    pub fn build(self) -> ChannelDispatcher {
        ChannelDispatcher {
            channels: self.channels,
            fail_if_no_channel_to_consume_one_character: self.fail_if_no_channel_to_consume_one_character,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenericTokenType;

    /// Consumes one given character and emits it as an identifier
    #[derive(Debug)]
    struct SingleChar(char);

    impl Channel for SingleChar {
        fn consume(&self, code: &mut CodeReader<'_>, output: &mut LexerOutput) -> Result<bool> {
            if code.peek() != Some(self.0) {
                return Ok(false);
            }
            let (line, column) = (code.line(), code.column());
            code.pop();
            output.add_token(
                Token::builder()
                    .token_type(GenericTokenType::IDENTIFIER)
                    .value_and_original_value(self.0.to_string())
                    .line(line)
                    .column(column)
                    .build()?,
            );
            Ok(true)
        }
    }

    #[test]
    fn test_channels_are_tried_in_order() {
        let dispatcher = ChannelDispatcher::builder()
            .add_channel(SingleChar('a'))
            .add_channel(SingleChar('b'))
            .build();
        let mut code = CodeReader::new("abba");
        let mut output = LexerOutput::new();
        assert!(dispatcher.consume(&mut code, &mut output).unwrap());
        let values: Vec<_> = output.tokens().iter().map(|t| t.value()).collect();
        assert_eq!(values, ["a", "b", "b", "a"]);
    }

    #[test]
    fn test_unhandled_character_is_skipped() {
        let dispatcher = ChannelDispatcher::builder().add_channel(SingleChar('a')).build();
        let mut code = CodeReader::new("xa");
        let mut output = LexerOutput::new();
        dispatcher.consume(&mut code, &mut output).unwrap();
        assert_eq!(output.tokens().len(), 1);
        assert_eq!(output.tokens()[0].column(), 1);
    }

    #[test]
    fn test_fail_if_no_channel_consumes() {
        let dispatcher = ChannelDispatcher::builder()
            .add_channel(SingleChar('a'))
            .fail_if_no_channel_to_consume_one_character()
            .build();
        let mut code = CodeReader::new("a\nb");
        let mut output = LexerOutput::new();
        let err = dispatcher.consume(&mut code, &mut output).unwrap_err();
        assert_eq!(
            err.to_string(),
            "None of the channel has been able to handle character '\n' (decimal value 10) at line 1, column 1"
        );
    }
}
