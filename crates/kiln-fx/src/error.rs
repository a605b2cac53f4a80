use std::fmt;

/// Diagnostic codes emitted by the lexer and parser.
///
/// Codes are stable across releases so downstream tooling can match on them.
pub mod codes {
    /// Character the lexer could not start any token with.
    pub const UNEXPECTED_CHAR: u32 = 0x1001;
    /// Block comment still open at end of input.
    pub const UNTERMINATED_COMMENT: u32 = 0x1002;

    /// Token that no grammar production accepts at this point.
    pub const UNEXPECTED_TOKEN: u32 = 0x2001;
    /// A required token (brace, paren, semicolon, ...) was absent.
    pub const MISSING_TOKEN: u32 = 0x2002;
    /// A shader-profile token of the wrong stage, or none at all.
    pub const BAD_PROFILE: u32 = 0x2003;
}

/// A parse diagnostic from the effect language front end.
///
/// Records are append-only: they are created during lexing/parsing and never
/// mutated afterwards. Evaluation does not produce diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub code: u32,
    /// 1-based source line where the error occurred.
    pub line: usize,
    /// 1-based source column where the error occurred.
    pub col: usize,
    /// Absolute byte offset into the source.
    pub pos: usize,
    /// Length in bytes of the offending region.
    pub length: usize,
}

impl ParseError {
    pub(crate) fn new(
        msg: impl Into<String>,
        code: u32,
        line: usize,
        col: usize,
        pos: usize,
        length: usize,
    ) -> Self {
        Self { message: msg.into(), code, line, col, pos, length }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fx parse error at {}:{}: {} (code {:#06x})",
            self.line, self.col, self.message, self.code
        )
    }
}

impl std::error::Error for ParseError {}
