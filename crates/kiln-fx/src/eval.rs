//! Parse-tree evaluator: reduces a [`ParseTree`] to an [`EffectDesc`].
//!
//! Each node kind has one reduction rule, dispatched through a single
//! exhaustive match. Rules communicate downwards through an explicit
//! accumulator and upwards through an optional fragment; `None` means
//! "nothing to contribute" and covers both terminals consumed elsewhere and
//! constructs that fail validation (a deliberate tolerance policy, not an
//! error path).

use crate::model::{EffectDesc, ShaderDesc, ShaderGroupDesc, ShaderStage};
use crate::tree::{NodeId, NodeKind, ParseTree};

/// Accumulator threaded down through evaluation calls.
///
/// Replaces the loosely-typed parameter list such grammars are usually
/// evaluated with: each rule states which shapes it mutates, and every
/// other shape leaves the rule inert.
enum Accum<'m> {
    None,
    Effect(&'m mut EffectDesc),
    Group(&'m mut ShaderGroupDesc),
}

/// Partial result bubbling up from a reduction rule.
enum Fragment {
    /// Terminal text (the default rule).
    Text(String),
    /// A pass reduced to a shader group, collected by its parent.
    Group(ShaderGroupDesc),
    /// The completed model, produced only by the root rule.
    Effect(EffectDesc),
}

/// Reduces a parse tree to its effect model.
///
/// Pure and single-pass: the tree is read-only, all intermediate state
/// lives in accumulators owned by the current call chain, and evaluating
/// the same tree twice yields structurally equal models.
pub fn evaluate(tree: &ParseTree) -> EffectDesc {
    match eval(tree, tree.root(), Accum::None) {
        Some(Fragment::Effect(effect)) => effect,
        // Trees created through `ParseTree::new` always carry a Start root.
        _ => EffectDesc::new(),
    }
}

fn eval(tree: &ParseTree, node: NodeId, acc: Accum<'_>) -> Option<Fragment> {
    match tree.kind(node) {
        NodeKind::Start => Some(Fragment::Effect(eval_start(tree, node))),
        NodeKind::TechniqueDecl => eval_technique(tree, node, acc),
        NodeKind::PassDecl => Some(Fragment::Group(eval_pass(tree, node))),
        NodeKind::SetVertexShader => eval_set_shader(tree, node, ShaderStage::Vertex, acc),
        NodeKind::SetPixelShader => eval_set_shader(tree, node, ShaderStage::Pixel, acc),
        NodeKind::SetGeometryShader => eval_set_shader(tree, node, ShaderStage::Geometry, acc),
        NodeKind::SetDomainShader => eval_set_shader(tree, node, ShaderStage::Domain, acc),
        NodeKind::SetHullShader => eval_set_shader(tree, node, ShaderStage::Hull, acc),
        NodeKind::SetComputeShader => eval_set_shader(tree, node, ShaderStage::Compute, acc),
        // Default rule: terminals reduce to their literal text.
        NodeKind::Identifier
        | NodeKind::VsProfile
        | NodeKind::PsProfile
        | NodeKind::GsProfile
        | NodeKind::DsProfile
        | NodeKind::HsProfile
        | NodeKind::CsProfile
        | NodeKind::Token => Some(Fragment::Text(tree.text(node).to_string())),
    }
}

fn eval_start(tree: &ParseTree, node: NodeId) -> EffectDesc {
    let mut effect = EffectDesc::new();
    for &child in tree.children(node) {
        // Child rules register themselves into the model; fragments that
        // bubble up here (e.g. a top-level pass) are ignored.
        let _ = eval(tree, child, Accum::Effect(&mut effect));
    }
    effect
}

fn eval_technique(tree: &ParseTree, node: NodeId, acc: Accum<'_>) -> Option<Fragment> {
    let tech_name = child_value(tree, node, NodeKind::Identifier, 0).unwrap_or_default();

    // Collect the technique's passes in document order; children that do
    // not reduce to a shader group contribute nothing.
    let mut passes = Vec::new();
    for &child in tree.children(node) {
        if let Some(Fragment::Group(group)) = eval(tree, child, Accum::None) {
            passes.push(group);
        }
    }

    resolve_group_names(&tech_name, &mut passes);

    if let Accum::Effect(effect) = acc {
        for group in passes {
            effect.add_group(group);
        }
    }

    None
}

fn eval_pass(tree: &ParseTree, node: NodeId) -> ShaderGroupDesc {
    let name = child_value(tree, node, NodeKind::Identifier, 0).unwrap_or_default();
    let mut group = ShaderGroupDesc::new(name);

    for &child in tree.children(node) {
        let _ = eval(tree, child, Accum::Group(&mut group));
    }

    group
}

fn eval_set_shader(
    tree: &ParseTree,
    node: NodeId,
    stage: ShaderStage,
    acc: Accum<'_>,
) -> Option<Fragment> {
    let entry_point = child_value(tree, node, NodeKind::Identifier, 0);
    let profile = child_value(tree, node, NodeKind::profile(stage), 0);

    let (Some(entry_point), Some(profile)) = (entry_point, profile) else {
        return None;
    };
    if entry_point.is_empty() || profile.is_empty() {
        return None;
    }

    // Legal under either a pass body or a future shader-group body; any
    // other accumulator leaves the assignment inert.
    if let Accum::Group(group) = acc {
        group.set_shader(ShaderDesc { stage, entry_point, profile });
    }

    None
}

/// Finds the `index`-th immediate child of `kind` (zero-based, document
/// order) and reduces it to its text value.
fn child_value(tree: &ParseTree, node: NodeId, kind: NodeKind, index: usize) -> Option<String> {
    let mut remaining = index;

    // left to right
    for &child in tree.children(node) {
        if tree.kind(child) != kind {
            continue;
        }
        if remaining == 0 {
            return match eval(tree, child, Accum::None) {
                Some(Fragment::Text(text)) => Some(text),
                _ => None,
            };
        }
        remaining -= 1;
    }

    None
}

/// Renames a technique's collected passes into flat shader-group names.
///
/// Precedence: tech name + pass name joins as `tech-pass`; tech name alone
/// becomes `tech-i` when the technique has more than one pass, else `tech`;
/// neither name falls back to the bare index; a pass name alone is kept
/// verbatim. The index is only ever a last-resort disambiguator, and
/// same-named results are kept as-is.
fn resolve_group_names(tech_name: &str, groups: &mut [ShaderGroupDesc]) {
    let has_tech_name = !tech_name.is_empty();
    let multi_pass = groups.len() > 1;

    for (i, group) in groups.iter_mut().enumerate() {
        let has_pass_name = !group.name.is_empty();

        if has_tech_name && has_pass_name {
            group.name = format!("{tech_name}-{}", group.name);
        } else if has_tech_name {
            group.name = if multi_pass {
                format!("{tech_name}-{i}")
            } else {
                tech_name.to_string()
            };
        } else if !has_pass_name {
            group.name = i.to_string();
        }
        // else: the pass's own name is used verbatim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use crate::tree::Span;

    const VS: &str = "SetVertexShader( CompileShader( vs_5_0, MainVS() ) );";
    const PS: &str = "SetPixelShader( CompileShader( ps_5_0, MainPS() ) );";

    fn compile(src: &str) -> EffectDesc {
        let tree = parse_str(src);
        assert!(tree.errors.is_empty(), "unexpected diagnostics: {:?}", tree.errors);
        evaluate(&tree)
    }

    fn names(effect: &EffectDesc) -> Vec<&str> {
        effect.groups().iter().map(|g| g.name.as_str()).collect()
    }

    // ── naming resolution ─────────────────────────────────────────────────

    #[test]
    fn named_tech_single_unnamed_pass_uses_tech_name() {
        let effect = compile(&format!("technique Glow {{ pass {{ {VS} }} }}"));
        assert_eq!(names(&effect), vec!["Glow"]);
    }

    #[test]
    fn named_tech_multiple_unnamed_passes_get_indices() {
        let effect = compile(&format!(
            "technique Glow {{ pass {{ {VS} }} pass {{ {PS} }} pass {{ {PS} }} }}"
        ));
        assert_eq!(names(&effect), vec!["Glow-0", "Glow-1", "Glow-2"]);
    }

    #[test]
    fn unnamed_tech_unnamed_passes_use_bare_indices() {
        let effect = compile(&format!("technique {{ pass {{ {VS} }} pass {{ {PS} }} }}"));
        assert_eq!(names(&effect), vec!["0", "1"]);
    }

    #[test]
    fn tech_and_pass_names_join_with_dash() {
        let effect = compile(&format!("technique Main {{ pass Opaque {{ {VS} }} }}"));
        assert_eq!(names(&effect), vec!["Main-Opaque"]);
    }

    #[test]
    fn pass_name_without_tech_name_is_verbatim() {
        let effect = compile(&format!("technique {{ pass Glow {{ {VS} }} }}"));
        assert_eq!(names(&effect), vec!["Glow"]);
    }

    #[test]
    fn same_named_passes_are_not_deduplicated() {
        let effect = compile(&format!(
            "technique {{ pass Glow {{ {VS} }} pass Glow {{ {PS} }} }}"
        ));
        assert_eq!(names(&effect), vec!["Glow", "Glow"]);
    }

    #[test]
    fn legacy_and_flattened_passes_mix() {
        // Named tech, pass 0 named, pass 1 unnamed: both rules in one body.
        let effect = compile(&format!(
            "technique Main {{ pass Opaque {{ {VS} {PS} }} pass {{ {PS} }} }}"
        ));
        assert_eq!(names(&effect), vec!["Main-Opaque", "Main-1"]);

        let second = effect.group_by_name("Main-1").unwrap();
        assert_eq!(second.shader_count(), 1);
        assert!(second.shader(ShaderStage::Pixel).is_some());
    }

    // ── shader assignment ─────────────────────────────────────────────────

    #[test]
    fn vertex_and_pixel_fill_exactly_two_slots() {
        let effect = compile(&format!("technique T {{ pass {{ {VS} {PS} }} }}"));
        let group = &effect.groups()[0];

        assert_eq!(group.shader_count(), 2);
        let vs = group.shader(ShaderStage::Vertex).unwrap();
        assert_eq!((vs.entry_point.as_str(), vs.profile.as_str()), ("MainVS", "vs_5_0"));
        assert!(group.shader(ShaderStage::Geometry).is_none());
        assert!(group.shader(ShaderStage::Domain).is_none());
        assert!(group.shader(ShaderStage::Hull).is_none());
        assert!(group.shader(ShaderStage::Compute).is_none());
    }

    #[test]
    fn repeated_stage_assignment_last_wins() {
        let effect = compile(
            "technique T { pass { \
                SetVertexShader( CompileShader( vs_4_0, First() ) ); \
                SetVertexShader( CompileShader( vs_5_0, Second() ) ); \
             } }",
        );
        let vs = effect.groups()[0].shader(ShaderStage::Vertex).unwrap();
        assert_eq!((vs.entry_point.as_str(), vs.profile.as_str()), ("Second", "vs_5_0"));
    }

    #[test]
    fn legacy_compile_form_is_accepted() {
        let effect =
            compile("technique T { pass { SetPixelShader( compile ps_2_0 Main() ); } }");
        let ps = effect.groups()[0].shader(ShaderStage::Pixel).unwrap();
        assert_eq!((ps.entry_point.as_str(), ps.profile.as_str()), ("Main", "ps_2_0"));
    }

    #[test]
    fn compute_stage_round_trips() {
        let effect =
            compile("technique T { pass { SetComputeShader( CompileShader( cs_5_0, Simulate() ) ); } }");
        let cs = effect.groups()[0].shader(ShaderStage::Compute).unwrap();
        assert_eq!(cs.stage, ShaderStage::Compute);
        assert_eq!(cs.entry_point, "Simulate");
    }

    // ── validation no-ops ─────────────────────────────────────────────────

    #[test]
    fn missing_profile_contributes_no_shader() {
        let mut tree = ParseTree::new();
        let pass = tree.push_node(tree.root(), NodeKind::PassDecl, Span::default(), "");
        let set = tree.push_node(pass, NodeKind::SetVertexShader, Span::default(), "");
        tree.push_node(set, NodeKind::Identifier, Span::default(), "MainVS");

        let group = eval_pass(&tree, pass);
        assert_eq!(group.shader_count(), 0);
    }

    #[test]
    fn empty_profile_contributes_no_shader() {
        let mut tree = ParseTree::new();
        let pass = tree.push_node(tree.root(), NodeKind::PassDecl, Span::default(), "");
        let set = tree.push_node(pass, NodeKind::SetVertexShader, Span::default(), "");
        tree.push_node(set, NodeKind::Identifier, Span::default(), "MainVS");
        tree.push_node(set, NodeKind::VsProfile, Span::default(), "");

        let group = eval_pass(&tree, pass);
        assert!(group.shader(ShaderStage::Vertex).is_none());
    }

    #[test]
    fn missing_entry_point_contributes_no_shader() {
        let mut tree = ParseTree::new();
        let pass = tree.push_node(tree.root(), NodeKind::PassDecl, Span::default(), "");
        let set = tree.push_node(pass, NodeKind::SetPixelShader, Span::default(), "");
        tree.push_node(set, NodeKind::PsProfile, Span::default(), "ps_5_0");

        let group = eval_pass(&tree, pass);
        assert_eq!(group.shader_count(), 0);
    }

    #[test]
    fn mismatched_profile_stage_contributes_no_shader() {
        // The parser flags this, but evaluation alone must already treat it
        // as absent: the vertex rule only looks for a vertex profile.
        let tree = parse_str("technique T { pass { SetVertexShader( CompileShader( ps_5_0, Main() ) ); } }");
        assert!(!tree.errors.is_empty());

        let effect = evaluate(&tree);
        assert_eq!(effect.groups()[0].shader_count(), 0);
    }

    #[test]
    fn set_shader_into_effect_accumulator_is_inert() {
        // A set-shader expression directly under the root receives the
        // effect accumulator, which it must ignore without failing.
        let mut tree = ParseTree::new();
        let set = tree.push_node(tree.root(), NodeKind::SetVertexShader, Span::default(), "");
        tree.push_node(set, NodeKind::Identifier, Span::default(), "MainVS");
        tree.push_node(set, NodeKind::VsProfile, Span::default(), "vs_5_0");

        let effect = evaluate(&tree);
        assert!(effect.is_empty());
    }

    // ── top-level passes ──────────────────────────────────────────────────

    #[test]
    fn top_level_pass_keeps_name_verbatim() {
        let tree = parse_str(&format!("pass P {{ {VS} }}"));
        assert!(tree.errors.is_empty());

        let pass = tree.children(tree.root())[0];
        let group = eval_pass(&tree, pass);
        assert_eq!(group.name, "P");
        assert_eq!(group.shader_count(), 1);
    }

    #[test]
    fn top_level_pass_is_not_registered() {
        let tree = parse_str(&format!("pass P {{ {VS} }}"));
        let effect = evaluate(&tree);
        assert!(effect.is_empty());
    }

    // ── helper and determinism ────────────────────────────────────────────

    #[test]
    fn child_value_walks_in_document_order() {
        let mut tree = ParseTree::new();
        let node = tree.push_node(tree.root(), NodeKind::PassDecl, Span::default(), "");
        tree.push_node(node, NodeKind::Token, Span::default(), "pass");
        tree.push_node(node, NodeKind::Identifier, Span::default(), "first");
        tree.push_node(node, NodeKind::Identifier, Span::default(), "second");

        assert_eq!(child_value(&tree, node, NodeKind::Identifier, 0).as_deref(), Some("first"));
        assert_eq!(child_value(&tree, node, NodeKind::Identifier, 1).as_deref(), Some("second"));
        assert_eq!(child_value(&tree, node, NodeKind::Identifier, 2), None);
        assert_eq!(child_value(&tree, node, NodeKind::VsProfile, 0), None);
    }

    #[test]
    fn evaluation_is_idempotent() {
        let tree = parse_str(&format!(
            "technique Main {{ pass Opaque {{ {VS} {PS} }} pass {{ {PS} }} }} \
             technique {{ pass {{ {VS} }} }}"
        ));
        assert!(tree.errors.is_empty());

        let first = evaluate(&tree);
        let second = evaluate(&tree);
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }
}
