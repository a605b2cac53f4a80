//! Lexer, parser, and effect-model evaluator for **Kiln effect files** (`.fx`).
//!
//! This crate is intentionally dependency-free so it can be consumed by
//! asset pipelines, editors, and linters without pulling in any engine or
//! GPU code.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | `ParseError`, diagnostic codes |
//! | [`lexer`] | `Lexer`, `Token`, `Lexeme` |
//! | [`tree`] | `ParseTree`, `Node` arena, `NodeKind`, `Span` |
//! | [`parser`] | `parse_str` entry point |
//! | [`model`] | `EffectDesc`, `ShaderGroupDesc`, `ShaderDesc`, `ShaderStage` |
//! | [`eval`] | `evaluate` — tree-to-model reduction |
//!
//! # Quick start
//!
//! ```rust
//! use kiln_fx::compile_str;
//!
//! let src = r#"
//!     technique Main {
//!         pass Opaque {
//!             SetVertexShader( CompileShader( vs_5_0, MainVS() ) );
//!             SetPixelShader( CompileShader( ps_5_0, MainPS() ) );
//!         }
//!     }
//! "#;
//!
//! let compiled = compile_str(src);
//! assert!(compiled.errors.is_empty());
//! assert_eq!(compiled.effect.groups()[0].name, "Main-Opaque");
//! ```
//!
//! Techniques and passes are flattened into a single list of shader groups;
//! group names are resolved from the technique/pass names (joined with `-`),
//! falling back to the pass index only when neither side provides one.

pub mod error;
pub mod eval;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod tree;

pub use error::ParseError;
pub use eval::evaluate;
pub use model::{EffectDesc, ShaderDesc, ShaderGroupDesc, ShaderStage};
pub use parser::parse_str;
pub use tree::ParseTree;

/// Result of compiling effect source: the model plus every diagnostic the
/// front end collected.
///
/// Diagnostics never abort evaluation — the model reflects whatever the
/// recovered tree yields, and the caller decides how strict to be.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledEffect {
    pub effect: EffectDesc,
    pub errors: Vec<ParseError>,
}

/// Lexes, parses, and evaluates effect source in one step.
pub fn compile_str(src: &str) -> CompiledEffect {
    let tree = parser::parse_str(src);
    let effect = eval::evaluate(&tree);
    CompiledEffect { effect, errors: tree.errors }
}

#[cfg(test)]
mod compile_tests {
    use super::*;

    fn ok(src: &str) -> EffectDesc {
        let compiled = compile_str(src);
        assert!(compiled.errors.is_empty(), "diagnostics: {:?}", compiled.errors);
        compiled.effect
    }
    fn err(src: &str) -> CompiledEffect {
        let compiled = compile_str(src);
        assert!(!compiled.errors.is_empty());
        compiled
    }

    #[test] fn empty_source() { assert!(ok("").is_empty()); }
    #[test] fn empty_technique() { assert!(ok("technique T { }").is_empty()); }
    #[test] fn empty_pass() { assert_eq!(ok("technique T { pass { } }").len(), 1); }
    #[test] fn comments_everywhere() {
        ok("/* header */ technique T { // inline\n pass /* mid */ { } }");
    }
    #[test] fn all_six_stages() {
        let effect = ok("technique All { pass { \
            SetVertexShader( CompileShader( vs_5_0, VS() ) ); \
            SetPixelShader( CompileShader( ps_5_0, PS() ) ); \
            SetGeometryShader( CompileShader( gs_5_0, GS() ) ); \
            SetDomainShader( CompileShader( ds_5_0, DS() ) ); \
            SetHullShader( CompileShader( hs_5_0, HS() ) ); \
            SetComputeShader( CompileShader( cs_5_0, CS() ) ); \
        } }");
        assert_eq!(effect.groups()[0].shader_count(), 6);
    }
    #[test] fn two_techniques() {
        let effect = ok("technique A { pass { } } technique B { pass { } pass { } }");
        assert_eq!(effect.len(), 3);
        assert!(effect.group_by_name("B-1").is_some());
    }
    #[test] fn err_missing_semicolon() {
        err("technique T { pass { SetVertexShader( CompileShader( vs_5_0, VS() ) ) } }");
    }
    #[test] fn err_unclosed_technique() { err("technique T { pass { }"); }
    #[test] fn err_stray_token_at_top_level() { err("shader T { }"); }
    #[test] fn err_bad_profile_stage() {
        let compiled = err("technique T { pass { SetVertexShader( CompileShader( ps_5_0, VS() ) ); } }");
        assert!(compiled.errors.iter().any(|e| e.code == error::codes::BAD_PROFILE));
        // Tolerance: the group still exists, just without the shader.
        assert_eq!(compiled.effect.groups()[0].shader_count(), 0);
    }
    #[test] fn err_positions_point_into_source() {
        let compiled = err("technique T {\n  pass { ? } }");
        let e = &compiled.errors[0];
        assert_eq!((e.line, e.col), (2, 10));
        assert_eq!(e.pos, 23);
    }
}
