//! Assertions on lexer channels and code readers

use crate::lexer::{Channel, CodeReader, LexerOutput};

pub struct ChannelAssert<'c> {
    channel: &'c dyn Channel,
}

impl<'c> ChannelAssert<'c> {
    pub fn new(channel: &'c dyn Channel) -> Self {
        ChannelAssert { channel }
    }

    fn check_if_consume(&self, reader: &mut CodeReader<'_>, output: &mut LexerOutput) -> bool {
        match self.channel.consume(reader, output) {
            Ok(consumed) => consumed,
            Err(e) => panic!("Channel failed on '{}': {}", reader.peek_n(30), e),
        }
    }

    #[track_caller]
    pub fn consume(self, source: &str, output: &mut LexerOutput) -> Self {
        self.consume_from(&mut CodeReader::new(source), output)
    }

    /// Like `consume`, from the current position of `reader`
    #[track_caller]
    pub fn consume_from(self, reader: &mut CodeReader<'_>, output: &mut LexerOutput) -> Self {
        let snippet = reader.peek_n(30);
        if !self.check_if_consume(reader, output) {
            panic!("Channel did not consume '{}'", snippet);
        }
        self
    }

    #[track_caller]
    pub fn does_not_consume(self, source: &str, output: &mut LexerOutput) -> Self {
        self.does_not_consume_from(&mut CodeReader::new(source), output)
    }

    #[track_caller]
    pub fn does_not_consume_from(self, reader: &mut CodeReader<'_>, output: &mut LexerOutput) -> Self {
        let snippet = reader.peek_n(30);
        if self.check_if_consume(reader, output) {
            panic!("Channel did consume '{}' but it should not", snippet);
        }
        self
    }
}

pub struct CodeReaderAssert<'r, 'a> {
    reader: &'r CodeReader<'a>,
}

impl<'r, 'a> CodeReaderAssert<'r, 'a> {
    pub fn new(reader: &'r CodeReader<'a>) -> Self {
        CodeReaderAssert { reader }
    }

    #[track_caller]
    pub fn has_next_char(self, next: char) -> Self {
        if self.reader.peek() != Some(next) {
            panic!("Expected next char to be '{}' but was {:?}", next, self.reader.peek());
        }
        self
    }

    #[track_caller]
    pub fn does_not_have_next_char(self, next: char) -> Self {
        if self.reader.peek() == Some(next) {
            panic!("Expected next char not to be '{}' but was", next);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{BlackHoleChannel, CommentRegexpChannel};

    #[test]
    fn test_black_hole() {
        let channel = BlackHoleChannel::new("[ \\t]+").unwrap();
        let mut output = LexerOutput::new();
        ChannelAssert::new(&channel)
            .consume("  x", &mut output)
            .does_not_consume("x  ", &mut output);
        assert!(output.tokens().is_empty());
    }

    #[test]
    fn test_consume_from_reader() {
        let channel = CommentRegexpChannel::new("//[^\\n]*").unwrap();
        let mut reader = CodeReader::new("// note\nnext");
        let mut output = LexerOutput::new();
        ChannelAssert::new(&channel).consume_from(&mut reader, &mut output);
        CodeReaderAssert::new(&reader)
            .has_next_char('\n')
            .does_not_have_next_char('n');
    }

    #[test]
    #[should_panic(expected = "Channel did not consume 'x'")]
    fn test_consume_failure() {
        let channel = BlackHoleChannel::new("\\s+").unwrap();
        ChannelAssert::new(&channel).consume("x", &mut LexerOutput::new());
    }
}
