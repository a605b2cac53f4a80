//! Backend-agnostic effect model produced by evaluation.
//!
//! The model is deliberately plain data: names, entry points and profile
//! strings. Compiling the referenced shaders against a real GPU API is the
//! caller's concern.

/// The six fixed pipeline stages a shader can be assigned to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Pixel,
    Geometry,
    Domain,
    Hull,
    Compute,
}

impl ShaderStage {
    /// All stages, in slot order.
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Vertex,
        ShaderStage::Pixel,
        ShaderStage::Geometry,
        ShaderStage::Domain,
        ShaderStage::Hull,
        ShaderStage::Compute,
    ];

    #[inline]
    pub(crate) fn slot(self) -> usize {
        match self {
            ShaderStage::Vertex => 0,
            ShaderStage::Pixel => 1,
            ShaderStage::Geometry => 2,
            ShaderStage::Domain => 3,
            ShaderStage::Hull => 4,
            ShaderStage::Compute => 5,
        }
    }
}

/// One shader assignment: stage, entry-point name, target profile.
///
/// Immutable after construction. Both `entry_point` and `profile` are
/// non-empty in any shader that reaches the model; set-shader constructs
/// missing either reduce to nothing instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDesc {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub profile: String,
}

/// A flattened pass/technique variant: a resolved name plus at most one
/// shader per pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShaderGroupDesc {
    pub name: String,
    shaders: [Option<ShaderDesc>; 6],
}

impl ShaderGroupDesc {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), shaders: Default::default() }
    }

    /// Assigns a shader at its stage slot. Last assignment wins.
    pub fn set_shader(&mut self, shader: ShaderDesc) {
        let slot = shader.stage.slot();
        self.shaders[slot] = Some(shader);
    }

    pub fn shader(&self, stage: ShaderStage) -> Option<&ShaderDesc> {
        self.shaders[stage.slot()].as_ref()
    }

    /// Assigned shaders, in stage-slot order.
    pub fn shaders(&self) -> impl Iterator<Item = &ShaderDesc> {
        self.shaders.iter().filter_map(|s| s.as_ref())
    }

    /// Number of populated stage slots.
    pub fn shader_count(&self) -> usize {
        self.shaders.iter().filter(|s| s.is_some()).count()
    }
}

/// The evaluated effect: an ordered collection of shader groups.
///
/// Names are resolved by the technique naming pass; the collection itself
/// never deduplicates, so same-named groups can coexist in appended order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectDesc {
    groups: Vec<ShaderGroupDesc>,
}

impl EffectDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_group(&mut self, group: ShaderGroupDesc) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[ShaderGroupDesc] {
        &self.groups
    }

    /// First group with the given resolved name, if any.
    pub fn group_by_name(&self, name: &str) -> Option<&ShaderGroupDesc> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shader(stage: ShaderStage, entry: &str, profile: &str) -> ShaderDesc {
        ShaderDesc { stage, entry_point: entry.into(), profile: profile.into() }
    }

    #[test]
    fn one_shader_per_stage_last_wins() {
        let mut group = ShaderGroupDesc::new("g");
        group.set_shader(shader(ShaderStage::Vertex, "First", "vs_4_0"));
        group.set_shader(shader(ShaderStage::Vertex, "Second", "vs_5_0"));

        assert_eq!(group.shader_count(), 1);
        assert_eq!(group.shader(ShaderStage::Vertex).unwrap().entry_point, "Second");
    }

    #[test]
    fn stages_are_independent_slots() {
        let mut group = ShaderGroupDesc::new("g");
        group.set_shader(shader(ShaderStage::Vertex, "VS", "vs_5_0"));
        group.set_shader(shader(ShaderStage::Compute, "CS", "cs_5_0"));

        assert_eq!(group.shader_count(), 2);
        assert!(group.shader(ShaderStage::Pixel).is_none());
        assert!(group.shader(ShaderStage::Compute).is_some());
    }

    #[test]
    fn group_lookup_finds_first_match() {
        let mut effect = EffectDesc::new();
        let mut a = ShaderGroupDesc::new("dup");
        a.set_shader(shader(ShaderStage::Vertex, "A", "vs_5_0"));
        effect.add_group(a);
        effect.add_group(ShaderGroupDesc::new("dup"));

        assert_eq!(effect.len(), 2);
        let found = effect.group_by_name("dup").unwrap();
        assert_eq!(found.shader_count(), 1);
    }
}
