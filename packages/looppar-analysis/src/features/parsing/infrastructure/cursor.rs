//! Character cursor over a single IR line

use crate::errors::{LoopParError, Result};

pub struct Cursor<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(src: &'a str, line: usize) -> Self {
        Self { src, pos: 0, line }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn error(&self, message: impl Into<String>) -> LoopParError {
        LoopParError::parse(self.line, message)
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    pub fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    pub fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.src.len()
    }

    pub fn peek_char(&mut self) -> Option<char> {
        self.skip_ws();
        self.rest().chars().next()
    }

    /// Whether the remaining input starts with `s` (after whitespace)
    pub fn starts_with(&mut self, s: &str) -> bool {
        self.skip_ws();
        self.rest().starts_with(s)
    }

    /// Consume `s` if present
    pub fn eat(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, s: &str) -> Result<()> {
        if self.eat(s) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}` near `{}`", s, self.rest())))
        }
    }

    /// Consume the keyword `kw` when followed by a non-identifier character
    pub fn eat_keyword(&mut self, kw: &str) -> bool {
        self.skip_ws();
        let rest = self.rest();
        if !rest.starts_with(kw) {
            return false;
        }
        let boundary = rest[kw.len()..]
            .chars()
            .next()
            .map_or(true, |c| !is_ident_char(c));
        if boundary {
            self.pos += kw.len();
        }
        boundary
    }

    /// Identifier: letters, digits, `_`, `$`, `.` (qualified names)
    pub fn ident(&mut self) -> Result<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let mut len = rest
            .char_indices()
            .find(|(_, c)| !is_ident_char(*c))
            .map_or(rest.len(), |(i, _)| i);
        // `r0.<A: int f>` ends the local before the dot
        while len > 0 && rest[..len].ends_with('.') {
            len -= 1;
        }
        if len == 0 || rest.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error(format!("expected identifier near `{}`", rest)));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Type name with optional `[]` suffixes
    pub fn type_name(&mut self) -> Result<&'a str> {
        self.skip_ws();
        let start = self.pos;
        self.ident()?;
        while self.rest().starts_with("[]") {
            self.pos += 2;
        }
        Ok(&self.src[start..self.pos])
    }

    /// Method name, allowing `<init>` and `<clinit>`
    pub fn method_name(&mut self) -> Result<&'a str> {
        for special in ["<init>", "<clinit>"] {
            if self.eat(special) {
                return Ok(special);
            }
        }
        self.ident()
    }

    /// Numeric literal token including sign and `L`/`F` suffix
    pub fn number(&mut self) -> Result<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let mut len = 0;
        for (i, c) in rest.char_indices() {
            let ok = c.is_ascii_alphanumeric() || c == '.' || (i == 0 && c == '-');
            if !ok {
                break;
            }
            len = i + c.len_utf8();
        }
        if len == 0 {
            return Err(self.error(format!("expected number near `{}`", rest)));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    /// Double-quoted string literal with `\"` and `\\` escapes
    pub fn string(&mut self) -> Result<String> {
        self.expect("\"")?;
        let mut out = String::new();
        let mut chars = self.rest().char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => match chars.next() {
                    Some((_, 'n')) => out.push('\n'),
                    Some((_, esc)) => out.push(esc),
                    None => break,
                },
                other => out.push(other),
            }
        }
        Err(self.error("unterminated string literal"))
    }

    /// Text up to the matching `>` of an already-consumed `<`, honoring nesting
    pub fn angle_body(&mut self) -> Result<&'a str> {
        let rest = self.rest();
        let mut depth = 1usize;
        for (i, c) in rest.char_indices() {
            match c {
                '<' => depth += 1,
                '>' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += i + 1;
                        return Ok(&rest[..i]);
                    }
                }
                _ => {}
            }
        }
        Err(self.error("unterminated `<...>` reference"))
    }
}

pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '.'
}
