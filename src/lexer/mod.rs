//! Lexer Module - channel based tokenization
//!
//! A `Lexer` hands the input to its channels in order; the first channel
//! that consumes something wins. Comments become trivia attached to the
//! next token and the stream always ends with an EOF token.

pub mod channel;
pub mod channels;
pub mod code_reader;
pub mod regexp_channel_builder;
pub mod scanner;

pub use channel::{Channel, ChannelDispatcher, ChannelDispatcherBuilder, LexerOutput};
pub use channels::{
    BlackHoleChannel, BomCharacterChannel, CommentRegexpChannel, IdentifierAndKeywordChannel,
    PunctuatorChannel, RegexpChannel, UnknownCharacterChannel,
};
pub use code_reader::{anchored, CodeReader, Cursor, DEFAULT_TAB_WIDTH};
pub use scanner::{Lexer, LexerBuilder};
