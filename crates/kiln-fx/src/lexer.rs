use crate::error::{codes, ParseError};
use crate::model::ShaderStage;

// ── Token ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    Ident(String),
    /// Shader-profile literal such as `vs_5_0`, classified by stage.
    Profile { stage: ShaderStage, text: String },
    // Keywords
    Technique,
    Pass,
    /// One of the six `Set<Stage>Shader` keywords.
    SetShader(ShaderStage),
    CompileShader,
    /// Legacy lowercase `compile` keyword.
    Compile,
    // Punctuation
    LBrace,
    RBrace,
    LParen,
    RParen,
    Comma,
    Semicolon,
    // Sentinel
    Eof,
}

/// A token together with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    pub token: Token,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub col: usize,
    /// Absolute byte offset.
    pub pos: usize,
    /// Length in bytes.
    pub len: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────

pub struct Lexer<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
    col: usize,
    errors: Vec<ParseError>,
}

impl<'s> Lexer<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0, line: 1, col: 1, errors: Vec::new() }
    }

    /// Scans the whole source.
    ///
    /// The lexer is tolerant: unexpected characters are recorded as
    /// diagnostics and scanning continues, so a token stream (ending in
    /// `Eof`) is always produced.
    pub fn tokenize(mut self) -> (Vec<Lexeme>, Vec<ParseError>) {
        let mut lexemes = Vec::new();
        loop {
            let lexeme = self.next_lexeme();
            let eof = lexeme.token == Token::Eof;
            lexemes.push(lexeme);
            if eof {
                break;
            }
        }
        (lexemes, self.errors)
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                self.advance();
            }
            // skip `//` line comments
            if self.src[self.pos..].starts_with("//") {
                while !matches!(self.peek(), None | Some('\n')) {
                    self.advance();
                }
            // skip `/* */` block comments
            } else if self.src[self.pos..].starts_with("/*") {
                let (line, col, start) = (self.line, self.col, self.pos);
                self.advance();
                self.advance(); // consume `/*`
                loop {
                    if self.src[self.pos..].starts_with("*/") {
                        self.advance();
                        self.advance(); // consume `*/`
                        break;
                    }
                    if self.advance().is_none() {
                        self.errors.push(ParseError::new(
                            "unterminated block comment",
                            codes::UNTERMINATED_COMMENT,
                            line,
                            col,
                            start,
                            2,
                        ));
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn next_lexeme(&mut self) -> Lexeme {
        loop {
            self.skip_whitespace_and_comments();

            let (line, col, start) = (self.line, self.col, self.pos);

            let ch = match self.peek() {
                None => {
                    return Lexeme { token: Token::Eof, line, col, pos: start, len: 0 };
                }
                Some(c) => c,
            };

            let token = match ch {
                '{' => { self.advance(); Some(Token::LBrace) }
                '}' => { self.advance(); Some(Token::RBrace) }
                '(' => { self.advance(); Some(Token::LParen) }
                ')' => { self.advance(); Some(Token::RParen) }
                ',' => { self.advance(); Some(Token::Comma) }
                ';' => { self.advance(); Some(Token::Semicolon) }
                c if c.is_alphabetic() || c == '_' => Some(self.lex_word()),
                other => {
                    self.advance();
                    self.errors.push(ParseError::new(
                        format!("unexpected character {:?}", other),
                        codes::UNEXPECTED_CHAR,
                        line,
                        col,
                        start,
                        other.len_utf8(),
                    ));
                    None // recover: drop the character and rescan
                }
            };

            if let Some(token) = token {
                return Lexeme { token, line, col, pos: start, len: self.pos - start };
            }
        }
    }

    fn lex_word(&mut self) -> Token {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance();
        }
        let word = &self.src[start..self.pos];

        if let Some(stage) = classify_profile(word) {
            return Token::Profile { stage, text: word.to_string() };
        }

        match word {
            "technique" => Token::Technique,
            "pass" => Token::Pass,
            "SetVertexShader" => Token::SetShader(ShaderStage::Vertex),
            "SetPixelShader" => Token::SetShader(ShaderStage::Pixel),
            "SetGeometryShader" => Token::SetShader(ShaderStage::Geometry),
            "SetDomainShader" => Token::SetShader(ShaderStage::Domain),
            "SetHullShader" => Token::SetShader(ShaderStage::Hull),
            "SetComputeShader" => Token::SetShader(ShaderStage::Compute),
            "CompileShader" => Token::CompileShader,
            "compile" => Token::Compile,
            _ => Token::Ident(word.to_string()),
        }
    }
}

/// Classifies `xs_M_m` words (e.g. `vs_5_0`, `ps_4_1`) as shader profiles.
fn classify_profile(word: &str) -> Option<ShaderStage> {
    let bytes = word.as_bytes();
    if bytes.len() != 6 || bytes[2] != b'_' || bytes[4] != b'_' {
        return None;
    }
    if !bytes[3].is_ascii_digit() || !bytes[5].is_ascii_digit() {
        return None;
    }
    match &word[..2] {
        "vs" => Some(ShaderStage::Vertex),
        "ps" => Some(ShaderStage::Pixel),
        "gs" => Some(ShaderStage::Geometry),
        "ds" => Some(ShaderStage::Domain),
        "hs" => Some(ShaderStage::Hull),
        "cs" => Some(ShaderStage::Compute),
        _ => None,
    }
}
