//! Recursive-descent NHX parser with line/column error locations.

use super::{ParseError, TaggedNode};

/// Characters that terminate a name or length token.
const DELIMITERS: &[char] = &['(', ')', ',', ':', ';', '[', ']'];

/// Parse one NHX tree, terminated by `;`.
///
/// # Errors
///
/// Returns a located [`ParseError`] on any syntax violation, including
/// trailing garbage after the terminating semicolon.
pub fn parse(text: &str) -> Result<TaggedNode, ParseError> {
    let mut cursor = Cursor::new(text);
    cursor.skip_whitespace();
    let root = cursor.node()?;
    cursor.skip_whitespace();
    cursor.expect(';')?;
    cursor.skip_whitespace();
    if let Some(stray) = cursor.peek() {
        return Err(cursor.error(format!("unexpected '{stray}' after tree terminator")));
    }
    Ok(root)
}

struct Cursor {
    chars: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let next = self.peek()?;
        self.position += 1;
        if next == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(next)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(found) if found == wanted => {
                self.bump();
                Ok(())
            }
            Some(found) => Err(self.error(format!("expected '{wanted}', found '{found}'"))),
            None => Err(self.error(format!("expected '{wanted}', found end of input"))),
        }
    }

    /// node := [ '(' node (',' node)* ')' ] name [':' length] [tags]
    fn node(&mut self) -> Result<TaggedNode, ParseError> {
        let mut node = TaggedNode::default();

        if self.peek() == Some('(') {
            self.bump();
            loop {
                self.skip_whitespace();
                node.children.push(self.node()?);
                self.skip_whitespace();
                match self.peek() {
                    Some(',') => {
                        self.bump();
                    }
                    Some(')') => {
                        self.bump();
                        break;
                    }
                    Some(found) => {
                        return Err(
                            self.error(format!("expected ',' or ')', found '{found}'"))
                        );
                    }
                    None => {
                        return Err(self.error("unclosed '(' in tree"));
                    }
                }
            }
        }

        node.name = self.token();

        if self.peek() == Some(':') {
            self.bump();
            let length = self.token();
            if length.is_empty() {
                return Err(self.error("expected a branch length after ':'"));
            }
            node.length = Some(length);
        }

        if self.peek() == Some('[') {
            node.tags = self.tags()?;
        }

        Ok(node)
    }

    /// A run of non-delimiter characters, trimmed of surrounding
    /// whitespace. May be empty.
    fn token(&mut self) -> String {
        let mut text = String::new();
        while let Some(next) = self.peek() {
            if DELIMITERS.contains(&next) {
                break;
            }
            text.push(next);
            self.bump();
        }
        text.trim().to_owned()
    }

    /// tags := '[' '&&NHX' (':' key '=' value)* ']'
    fn tags(&mut self) -> Result<Vec<(String, String)>, ParseError> {
        self.expect('[')?;
        for wanted in "&&NHX".chars() {
            match self.bump() {
                Some(found) if found == wanted => {}
                _ => return Err(self.error("expected '&&NHX' after '['")),
            }
        }

        let mut tags = Vec::new();
        loop {
            match self.peek() {
                Some(']') => {
                    self.bump();
                    return Ok(tags);
                }
                Some(':') => {
                    self.bump();
                    tags.push(self.tag()?);
                }
                Some(found) => {
                    return Err(self.error(format!("expected ':' or ']' in tags, found '{found}'")));
                }
                None => return Err(self.error("unclosed '[' in tags")),
            }
        }
    }

    /// tag := key '=' value
    fn tag(&mut self) -> Result<(String, String), ParseError> {
        let mut key = String::new();
        while let Some(next) = self.peek() {
            if next == '=' || next == ':' || next == ']' {
                break;
            }
            key.push(next);
            self.bump();
        }
        if key.trim().is_empty() {
            return Err(self.error("empty tag key"));
        }
        self.expect('=')?;

        let mut value = String::new();
        while let Some(next) = self.peek() {
            if next == ':' || next == ']' {
                break;
            }
            value.push(next);
            self.bump();
        }
        Ok((key.trim().to_owned(), value.trim().to_owned()))
    }
}
