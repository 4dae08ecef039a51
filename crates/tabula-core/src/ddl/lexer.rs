//! DDL tokenizer.
//!
//! Engine dumps only need a handful of token classes to be split safely:
//! words, quoted identifiers, string literals, numbers and the punctuation
//! that nests or separates column definitions. Every token keeps its byte
//! span so extractors can slice the original spelling back out.

/// Represents a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// DDL token kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Bare identifier or keyword.
    Word(String),
    /// Quoted identifier with its opening quote and unescaped content.
    Quoted {
        /// Opening quote character: `` ` ``, `"` or `[`.
        quote: char,
        /// Identifier text without quotes.
        name: String,
    },
    /// Single-quoted string literal. The raw text is in the span.
    String,
    /// Numeric literal.
    Number,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
    /// `::`
    DoubleColon,
    /// `;`
    Semicolon,
    /// Any other punctuation.
    Symbol(char),
    /// End of input.
    Eof,
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token kind.
    pub kind: TokenKind,
    /// Byte span in the source text.
    pub span: Span,
}

impl Token {
    /// Returns true if this is the bare word `word`, ignoring case.
    #[must_use]
    pub fn is_word(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(word))
    }

    /// Returns the identifier text for bare words and quoted identifiers.
    #[must_use]
    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Word(w) => Some(w),
            TokenKind::Quoted { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns true for quoted identifiers.
    #[must_use]
    pub const fn is_quoted(&self) -> bool {
        matches!(self.kind, TokenKind::Quoted { .. })
    }
}

/// A lexer that tokenizes DDL text.
pub struct Lexer<'a> {
    /// The input source text.
    input: &'a str,
    /// The current byte position.
    pos: usize,
    /// The byte position of the start of the current token.
    start: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            start: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while self.peek().is_some_and(char::is_whitespace) {
                self.advance();
            }

            if self.peek() == Some('-') && self.peek_next() == Some('-') {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                continue;
            }

            if self.peek() == Some('/') && self.peek_next() == Some('*') {
                self.advance();
                self.advance();
                loop {
                    match self.advance() {
                        Some('*') if self.peek() == Some('/') => {
                            self.advance();
                            break;
                        }
                        None => break,
                        _ => {}
                    }
                }
                continue;
            }

            break;
        }
    }

    const fn make_token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            span: Span::new(self.start, self.pos),
        }
    }

    fn scan_word(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '#')
        {
            self.advance();
        }
        let text = &self.input[self.start..self.pos];
        self.make_token(TokenKind::Word(String::from(text)))
    }

    /// Scans a quoted identifier. An unterminated identifier runs to the
    /// end of input.
    fn scan_quoted_identifier(&mut self, open: char, close: char) -> Token {
        let mut name = String::new();
        loop {
            match self.advance() {
                Some(c) if c == close => {
                    if self.peek() == Some(close) {
                        name.push(close);
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(c) => name.push(c),
                None => break,
            }
        }
        self.make_token(TokenKind::Quoted { quote: open, name })
    }

    /// Scans a single-quoted string, honoring doubled quotes and
    /// backslash escapes.
    fn scan_string(&mut self) -> Token {
        loop {
            match self.advance() {
                Some('\\') => {
                    self.advance();
                }
                Some('\'') => {
                    if self.peek() == Some('\'') {
                        self.advance();
                    } else {
                        break;
                    }
                }
                Some(_) => {}
                None => break,
            }
        }
        self.make_token(TokenKind::String)
    }

    fn scan_number(&mut self) -> Token {
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || c == '.')
        {
            self.advance();
        }
        if self.peek().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        self.make_token(TokenKind::Number)
    }

    /// Scans the next token.
    #[must_use]
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match c {
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            ':' if self.peek() == Some(':') => {
                self.advance();
                self.make_token(TokenKind::DoubleColon)
            }
            '\'' => self.scan_string(),
            '"' => self.scan_quoted_identifier('"', '"'),
            '`' => self.scan_quoted_identifier('`', '`'),
            // `[]` is an array suffix, not a bracket identifier.
            '[' if self.peek() == Some(']') => self.make_token(TokenKind::Symbol('[')),
            '[' => self.scan_quoted_identifier('[', ']'),
            c if c.is_ascii_digit() => self.scan_number(),
            c if c.is_alphabetic() || c == '_' => self.scan_word(),
            c => self.make_token(TokenKind::Symbol(c)),
        }
    }

    /// Tokenizes the entire input. The last token is always [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}

/// Tokenizes `input`.
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize()
}

/// Returns the column section of a `CREATE TABLE ... ( ... )` statement.
///
/// Text without a `CREATE` keyword is treated as a bare column list. A
/// `CREATE` with no opening paren has no column section.
#[must_use]
pub fn table_body(tokens: &[Token]) -> &[Token] {
    let tokens = match tokens.last() {
        Some(last) if last.kind == TokenKind::Eof => &tokens[..tokens.len() - 1],
        _ => tokens,
    };

    let Some(create) = tokens.iter().position(|t| t.is_word("CREATE")) else {
        return tokens;
    };
    let Some(open) = tokens[create..]
        .iter()
        .position(|t| t.kind == TokenKind::LeftParen)
        .map(|i| create + i)
    else {
        return &[];
    };

    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => {
                depth -= 1;
                if depth == 0 {
                    return &tokens[open + 1..i];
                }
            }
            _ => {}
        }
    }
    &tokens[open + 1..]
}

/// Splits tokens on commas outside parentheses. Empty items are dropped.
#[must_use]
pub fn split_items(tokens: &[Token]) -> Vec<&[Token]> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => depth = depth.saturating_sub(1),
            TokenKind::Comma if depth == 0 => {
                if i > start {
                    items.push(&tokens[start..i]);
                }
                start = i + 1;
            }
            _ => {}
        }
    }
    if tokens.len() > start {
        items.push(&tokens[start..]);
    }
    items
}

/// Finds the first run of bare words equal to `words` outside parentheses.
#[must_use]
pub fn find_words(tokens: &[Token], words: &[&str]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LeftParen => depth += 1,
            TokenKind::RightParen => depth = depth.saturating_sub(1),
            _ if depth == 0 => {
                let matches = words.len() <= tokens.len() - i
                    && words
                        .iter()
                        .zip(&tokens[i..])
                        .all(|(word, t)| t.is_word(word));
                if matches {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
