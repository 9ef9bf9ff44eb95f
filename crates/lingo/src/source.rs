use std::fmt::Debug;

/// Character cursor consumed by the parse engine.
///
/// Positions are saved with [`Source::mark`] and restored with [`Source::reset`],
/// a mark is only meaningful for the source that produced it.
pub trait Source {
    type Mark: Copy + Eq + Debug;

    /// Reads the next character without advancing.
    fn peek(&self) -> Option<char>;
    /// Reads the next character and advances past it, `None` at the end of input.
    fn consume(&mut self) -> Option<char>;
    fn mark(&self) -> Self::Mark;
    fn reset(&mut self, mark: Self::Mark);

    fn name(&self) -> &str;
    /// 1-based line of the cursor.
    fn row(&self) -> u32;
    /// 1-based column of the cursor, counted in characters.
    fn col(&self) -> u32;

    fn is_eof(&self) -> bool {
        self.peek().is_none()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourcePosition {
    offset: usize,
    row: u32,
    col: u32,
}

impl SourcePosition {
    pub fn start() -> SourcePosition {
        SourcePosition {
            offset: 0,
            row: 1,
            col: 1,
        }
    }
    /// Byte offset from the start of the input.
    pub fn offset(self) -> usize {
        self.offset
    }
    pub fn row(self) -> u32 {
        self.row
    }
    pub fn col(self) -> u32 {
        self.col
    }
    fn advance(&mut self, c: char, size: usize) {
        self.offset += size;
        if c == '\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
    }
}

const DEFAULT_NAME: &str = "<input>";

pub struct StrSource<'a> {
    name: &'a str,
    text: &'a str,
    position: SourcePosition,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> StrSource<'a> {
        StrSource {
            name: DEFAULT_NAME,
            text,
            position: SourcePosition::start(),
        }
    }
    pub fn with_name(mut self, name: &'a str) -> StrSource<'a> {
        self.name = name;
        self
    }
    pub fn offset(&self) -> usize {
        self.position.offset
    }
    pub fn len(&self) -> usize {
        self.text.len()
    }
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
    pub fn remaining(&self) -> &'a str {
        &self.text[self.position.offset..]
    }
}

impl Source for StrSource<'_> {
    type Mark = SourcePosition;

    fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }
    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position.advance(c, c.len_utf8());
        Some(c)
    }
    fn mark(&self) -> SourcePosition {
        self.position
    }
    fn reset(&mut self, mark: SourcePosition) {
        debug_assert!(
            mark.offset <= self.text.len(),
            "Mark is out of bounds. Was it produced by another source?"
        );
        self.position = mark;
    }
    fn name(&self) -> &str {
        self.name
    }
    fn row(&self) -> u32 {
        self.position.row
    }
    fn col(&self) -> u32 {
        self.position.col
    }
}

/// Source over raw bytes, decoded as UTF-8.
///
/// Invalid sequences read as U+FFFD and consume the bytes of the maximal invalid prefix.
pub struct BytesSource<'a> {
    name: &'a str,
    bytes: &'a [u8],
    position: SourcePosition,
}

impl<'a> BytesSource<'a> {
    pub fn new(bytes: &'a [u8]) -> BytesSource<'a> {
        BytesSource {
            name: DEFAULT_NAME,
            bytes,
            position: SourcePosition::start(),
        }
    }
    pub fn with_name(mut self, name: &'a str) -> BytesSource<'a> {
        self.name = name;
        self
    }
    pub fn offset(&self) -> usize {
        self.position.offset
    }
    pub fn len(&self) -> usize {
        self.bytes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
    fn decode(&self) -> Option<(char, usize)> {
        let (c, size) = bstr::decode_utf8(&self.bytes[self.position.offset..]);
        match (c, size) {
            (_, 0) => None,
            (Some(c), size) => Some((c, size)),
            (None, size) => Some((char::REPLACEMENT_CHARACTER, size)),
        }
    }
}

impl Source for BytesSource<'_> {
    type Mark = SourcePosition;

    fn peek(&self) -> Option<char> {
        self.decode().map(|(c, _)| c)
    }
    fn consume(&mut self) -> Option<char> {
        let (c, size) = self.decode()?;
        self.position.advance(c, size);
        Some(c)
    }
    fn mark(&self) -> SourcePosition {
        self.position
    }
    fn reset(&mut self, mark: SourcePosition) {
        debug_assert!(
            mark.offset <= self.bytes.len(),
            "Mark is out of bounds. Was it produced by another source?"
        );
        self.position = mark;
    }
    fn name(&self) -> &str {
        self.name
    }
    fn row(&self) -> u32 {
        self.position.row
    }
    fn col(&self) -> u32 {
        self.position.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_rows_and_columns() {
        let mut src = StrSource::new("ab\ncd");
        assert_eq!((src.row(), src.col()), (1, 1));
        assert_eq!(src.consume(), Some('a'));
        assert_eq!(src.consume(), Some('b'));
        assert_eq!((src.row(), src.col()), (1, 3));
        assert_eq!(src.consume(), Some('\n'));
        assert_eq!((src.row(), src.col()), (2, 1));
        assert_eq!(src.consume(), Some('c'));
        assert_eq!((src.row(), src.col()), (2, 2));
    }

    #[test]
    fn mark_and_reset() {
        let mut src = StrSource::new("xyz").with_name("test");
        assert_eq!(src.name(), "test");
        src.consume();
        let mark = src.mark();
        src.consume();
        src.consume();
        assert!(src.is_eof());
        assert_eq!(src.consume(), None);
        src.reset(mark);
        assert_eq!(src.offset(), 1);
        assert_eq!(src.peek(), Some('y'));
        assert_eq!(src.col(), 2);
    }

    #[test]
    fn peek_does_not_advance() {
        let mut src = StrSource::new("é!");
        assert_eq!(src.peek(), Some('é'));
        assert_eq!(src.peek(), Some('é'));
        assert_eq!(src.consume(), Some('é'));
        assert_eq!(src.offset(), 2);
        assert_eq!(src.remaining(), "!");
    }

    #[test]
    fn bytes_agree_with_str() {
        let text = "héllo\nwörld";
        let mut a = StrSource::new(text);
        let mut b = BytesSource::new(text.as_bytes());
        loop {
            assert_eq!(a.mark(), b.mark());
            let (x, y) = (a.consume(), b.consume());
            assert_eq!(x, y);
            if x.is_none() {
                break;
            }
        }
    }

    #[test]
    fn bytes_replace_invalid_utf8() {
        let mut src = BytesSource::new(b"a\xFFb");
        assert_eq!(src.consume(), Some('a'));
        assert_eq!(src.consume(), Some(char::REPLACEMENT_CHARACTER));
        assert_eq!(src.offset(), 2);
        assert_eq!(src.consume(), Some('b'));
        assert_eq!(src.consume(), None);
        assert_eq!(src.offset(), src.len());
    }
}
