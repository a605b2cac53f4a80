use crate::error::{codes, ParseError};
use crate::lexer::{Lexeme, Lexer, Token};
use crate::model::ShaderStage;
use crate::tree::{NodeId, NodeKind, ParseTree, Span};

// ── Parser ────────────────────────────────────────────────────────────────

/// Recursive-descent parser for the effect language.
///
/// The parser is tolerant: grammar violations are appended to the tree's
/// diagnostics and parsing continues after skipping the offending token, so
/// callers always receive a tree to evaluate.
pub struct Parser<'s> {
    src: &'s str,
    lexemes: Vec<Lexeme>,
    pos: usize,
}

impl<'s> Parser<'s> {
    pub fn new(src: &'s str, lexemes: Vec<Lexeme>) -> Self {
        Self { src, lexemes, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.lexemes.get(self.pos).map(|l| &l.token).unwrap_or(&Token::Eof)
    }

    fn here(&self) -> Lexeme {
        self.lexemes
            .get(self.pos)
            .or_else(|| self.lexemes.last())
            .cloned()
            .unwrap_or(Lexeme { token: Token::Eof, line: 1, col: 1, pos: 0, len: 0 })
    }

    fn advance(&mut self) -> Lexeme {
        let lexeme = self.here();
        if self.pos < self.lexemes.len() {
            self.pos += 1;
        }
        lexeme
    }

    fn error(&self, tree: &mut ParseTree, code: u32, msg: impl Into<String>) {
        let at = self.here();
        tree.errors.push(ParseError::new(msg, code, at.line, at.col, at.pos, at.len));
    }

    /// Consumes the current token and appends it under `parent` as a
    /// generic terminal node.
    fn bump(&mut self, tree: &mut ParseTree, parent: NodeId) {
        let lexeme = self.advance();
        let span = Span::new(lexeme.pos, lexeme.len);
        let text = &self.src[lexeme.pos..lexeme.pos + lexeme.len];
        tree.push_node(parent, NodeKind::Token, span, text);
    }

    /// Consumes `expected` if present, otherwise records a diagnostic
    /// without consuming anything.
    fn expect(&mut self, tree: &mut ParseTree, parent: NodeId, expected: Token, what: &str) {
        if self.peek() == &expected {
            self.bump(tree, parent);
        } else {
            self.error(
                tree,
                codes::MISSING_TOKEN,
                format!("expected {what}, got {:?}", self.peek()),
            );
        }
    }

    /// Consumes an identifier into an `Identifier` node if one is present.
    fn take_ident(&mut self, tree: &mut ParseTree, parent: NodeId) -> bool {
        if let Token::Ident(name) = self.peek() {
            let name = name.clone();
            let lexeme = self.advance();
            tree.push_node(parent, NodeKind::Identifier, Span::new(lexeme.pos, lexeme.len), name);
            true
        } else {
            false
        }
    }

    // ── Document ──────────────────────────────────────────────────────────

    pub fn parse_document(&mut self, tree: &mut ParseTree) {
        let root = tree.root();
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::Technique => self.parse_technique(tree, root),
                Token::Pass => self.parse_pass(tree, root),
                tok => {
                    self.error(
                        tree,
                        codes::UNEXPECTED_TOKEN,
                        format!("expected 'technique' or 'pass', got {tok:?}"),
                    );
                    self.advance(); // recover: skip and rescan
                }
            }
        }
    }

    // ── Technique ─────────────────────────────────────────────────────────

    fn parse_technique(&mut self, tree: &mut ParseTree, parent: NodeId) {
        let at = self.here();
        let node = tree.push_node(
            parent,
            NodeKind::TechniqueDecl,
            Span::new(at.pos, at.len),
            "",
        );
        self.bump(tree, node); // 'technique'
        self.take_ident(tree, node);
        self.expect(tree, node, Token::LBrace, "'{'");

        loop {
            match self.peek() {
                Token::Pass => self.parse_pass(tree, node),
                Token::RBrace => {
                    self.bump(tree, node);
                    break;
                }
                Token::Eof => {
                    self.error(tree, codes::MISSING_TOKEN, "expected '}' to close technique");
                    break;
                }
                tok => {
                    self.error(
                        tree,
                        codes::UNEXPECTED_TOKEN,
                        format!("expected 'pass' or '}}' inside technique, got {tok:?}"),
                    );
                    self.advance();
                }
            }
        }
    }

    // ── Pass ──────────────────────────────────────────────────────────────

    fn parse_pass(&mut self, tree: &mut ParseTree, parent: NodeId) {
        let at = self.here();
        let node = tree.push_node(parent, NodeKind::PassDecl, Span::new(at.pos, at.len), "");
        self.bump(tree, node); // 'pass'
        self.take_ident(tree, node);
        self.expect(tree, node, Token::LBrace, "'{'");

        loop {
            match self.peek() {
                Token::SetShader(stage) => {
                    let stage = *stage;
                    self.parse_set_shader(tree, node, stage);
                }
                Token::RBrace => {
                    self.bump(tree, node);
                    break;
                }
                Token::Eof => {
                    self.error(tree, codes::MISSING_TOKEN, "expected '}' to close pass");
                    break;
                }
                tok => {
                    self.error(
                        tree,
                        codes::UNEXPECTED_TOKEN,
                        format!("expected a Set*Shader expression or '}}' inside pass, got {tok:?}"),
                    );
                    self.advance();
                }
            }
        }
    }

    // ── Set-shader expression ─────────────────────────────────────────────

    /// `Set<Stage>Shader( CompileShader( profile, Entry() ) );`
    /// or the legacy `Set<Stage>Shader( compile profile Entry() );`
    fn parse_set_shader(&mut self, tree: &mut ParseTree, parent: NodeId, stage: ShaderStage) {
        let at = self.here();
        let node = tree.push_node(
            parent,
            NodeKind::set_shader(stage),
            Span::new(at.pos, at.len),
            "",
        );
        self.bump(tree, node); // the Set*Shader keyword
        self.expect(tree, node, Token::LParen, "'('");

        match self.peek() {
            Token::CompileShader => {
                self.bump(tree, node);
                self.expect(tree, node, Token::LParen, "'('");
                self.take_profile(tree, node, stage);
                self.expect(tree, node, Token::Comma, "','");
                if !self.take_ident(tree, node) {
                    self.error(tree, codes::MISSING_TOKEN, "expected an entry-point name");
                }
                self.expect(tree, node, Token::LParen, "'('");
                self.expect(tree, node, Token::RParen, "')'");
                self.expect(tree, node, Token::RParen, "')'");
            }
            Token::Compile => {
                self.bump(tree, node);
                self.take_profile(tree, node, stage);
                if !self.take_ident(tree, node) {
                    self.error(tree, codes::MISSING_TOKEN, "expected an entry-point name");
                }
                self.expect(tree, node, Token::LParen, "'('");
                self.expect(tree, node, Token::RParen, "')'");
            }
            tok => {
                self.error(
                    tree,
                    codes::UNEXPECTED_TOKEN,
                    format!("expected 'CompileShader' or 'compile', got {tok:?}"),
                );
            }
        }

        self.expect(tree, node, Token::RParen, "')'");
        self.expect(tree, node, Token::Semicolon, "';'");
    }

    /// Consumes a shader-profile token into its per-stage terminal node.
    ///
    /// A profile of a different stage is still attached (under its own
    /// kind) so the tree reflects the source; the mismatch is diagnosed
    /// here and the expression later reduces to nothing because the
    /// evaluator only looks for the expression's own stage.
    fn take_profile(&mut self, tree: &mut ParseTree, parent: NodeId, expected: ShaderStage) {
        if let Token::Profile { stage, text } = self.peek() {
            let (stage, text) = (*stage, text.clone());
            let lexeme = self.advance();
            tree.push_node(
                parent,
                NodeKind::profile(stage),
                Span::new(lexeme.pos, lexeme.len),
                text.clone(),
            );
            if stage != expected {
                tree.errors.push(ParseError::new(
                    format!("shader profile '{text}' does not match the expression's stage"),
                    codes::BAD_PROFILE,
                    lexeme.line,
                    lexeme.col,
                    lexeme.pos,
                    lexeme.len,
                ));
            }
        } else {
            self.error(
                tree,
                codes::BAD_PROFILE,
                format!("expected a shader profile, got {:?}", self.peek()),
            );
        }
    }
}

// ── Public parse entry point ──────────────────────────────────────────────

/// Lexes and parses effect source into a [`ParseTree`].
///
/// Always returns a tree; lexical and grammatical problems are collected in
/// [`ParseTree::errors`].
pub fn parse_str(src: &str) -> ParseTree {
    let (lexemes, lex_errors) = Lexer::new(src).tokenize();
    let mut tree = ParseTree::new();
    tree.errors = lex_errors;
    Parser::new(src, lexemes).parse_document(&mut tree);
    tree
}
