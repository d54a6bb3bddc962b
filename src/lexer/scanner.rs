//! Lexer: runs the channels over a source and terminates the stream with EOF

use std::path::Path;

use tracing::debug;

use super::channel::{Channel, ChannelDispatcher, LexerOutput};
use super::code_reader::{CodeReader, DEFAULT_TAB_WIDTH};
use crate::api::{GenericTokenType, Token};
use crate::charset::Charset;
use crate::error::{Error, Result};

#[derive(Debug)]
pub struct Lexer {
    charset: Charset,
    tab_width: usize,
    dispatcher: ChannelDispatcher,
}

impl Lexer {
    pub fn builder() -> LexerBuilder {
        LexerBuilder::default()
    }

    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Columns a tab character advances token positions by
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Tokens of `source`, the last one being EOF
    pub fn lex(&self, source: &str) -> Result<Vec<Token>> {
        let mut code = CodeReader::with_tab_width(source, self.tab_width);
        let mut output = LexerOutput::new();
        if let Err(e) = self.dispatcher.consume(&mut code, &mut output) {
            return Err(Error::Lexing {
                line: code.line(),
                column: code.column(),
                source: Box::new(e),
            });
        }
        output.add_token(
            Token::builder()
                .token_type(GenericTokenType::EOF)
                .value_and_original_value("EOF")
                .line(code.line())
                .column(code.column())
                .build()?,
        );
        let tokens = output.into_tokens();
        debug!(tokens = tokens.len(), lines = code.line(), "source lexed");
        Ok(tokens)
    }

    pub fn lex_file(&self, path: &Path) -> Result<Vec<Token>> {
        if !path.is_file() {
            return Err(Error::Lexer(format!("file \"{}\" must be a file", path.display())));
        }
        let source = self.charset.read_file(path)?;
        self.lex(&source).map_err(|e| match e {
            Error::Lexer(_) | Error::Lexing { .. } => {
                Error::Lexer(format!("Unable to lex file \"{}\": {}", path.display(), e))
            }
            other => other,
        })
    }
}

pub struct LexerBuilder {
    charset: Charset,
    tab_width: usize,
    channels: Vec<Box<dyn Channel>>,
    fail_if_no_channel_to_consume_one_character: bool,
}

impl Default for LexerBuilder {
    fn default() -> Self {
        LexerBuilder {
            charset: Charset::default(),
            tab_width: DEFAULT_TAB_WIDTH,
            channels: Vec::new(),
            fail_if_no_channel_to_consume_one_character: false,
        }
    }
}

impl LexerBuilder {
    pub fn with_charset(mut self, charset: Charset) -> Self {
        self.charset = charset;
        self
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn with_channel(mut self, channel: impl Channel + 'static) -> Self {
        self.channels.push(Box::new(channel));
        self
    }

    pub fn with_fail_if_no_channel_to_consume_one_character(mut self, fail: bool) -> Self {
        self.fail_if_no_channel_to_consume_one_character = fail;
        self
    }

    pub fn build(self) -> Lexer {
        let mut dispatcher = ChannelDispatcher::builder().add_boxed_channels(self.channels);
        if self.fail_if_no_channel_to_consume_one_character {
            dispatcher = dispatcher.fail_if_no_channel_to_consume_one_character();
        }
        Lexer {
            charset: self.charset,
            tab_width: self.tab_width,
            dispatcher: dispatcher.build(),
        }
    }
}
