//! Screen-space line pipeline.
//!
//! Interface of `shaders/line.wgsl`:
//! - group 0 / binding 0: `ViewUniform { view_proj, resolution }`
//! - vertex locations: 0 = position, 1 = color, 2 = norm
//! - varying: color at location 1
//! - fragment output: location 0
//!
//! The vertex stage places each vertex at `position + norm * resolution`
//! before projecting, so a `norm` measured in pixels becomes a constant
//! on-screen offset whatever the zoom.

mod records;
mod renderer;
mod stage;

pub use records::{view_bind_group_layout_entry, LineVertex, ViewUniform};
pub use renderer::{LineRenderer, LineRendererConfig};
pub use stage::{fragment_stage, interpolate, vertex_stage, VertexOutput};

/// WGSL source of the line shader (`vs_main` / `fs_main`).
pub const SHADER_SOURCE: &str = include_str!("shaders/line.wgsl");

#[cfg(test)]
mod tests {
    use super::*;

    fn parse() -> naga::Module {
        naga::front::wgsl::parse_str(SHADER_SOURCE).unwrap()
    }

    fn struct_named<'m>(module: &'m naga::Module, name: &str) -> &'m naga::Type {
        module
            .types
            .iter()
            .map(|(_, ty)| ty)
            .find(|ty| ty.name.as_deref() == Some(name))
            .unwrap_or_else(|| panic!("struct {name} not found"))
    }

    fn members(ty: &naga::Type) -> &[naga::StructMember] {
        match &ty.inner {
            naga::TypeInner::Struct { members, .. } => members,
            other => panic!("not a struct: {other:?}"),
        }
    }

    fn location(binding: &Option<naga::Binding>) -> Option<u32> {
        match binding {
            Some(naga::Binding::Location { location, .. }) => Some(*location),
            _ => None,
        }
    }

    #[test]
    fn shader_validates() {
        let module = parse();
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        validator.validate(&module).unwrap();

        let entry_points: Vec<(&str, naga::ShaderStage)> = module
            .entry_points
            .iter()
            .map(|e| (e.name.as_str(), e.stage))
            .collect();
        assert!(entry_points.contains(&("vs_main", naga::ShaderStage::Vertex)));
        assert!(entry_points.contains(&("fs_main", naga::ShaderStage::Fragment)));
    }

    #[test]
    fn uniform_is_group0_binding0_with_host_layout() {
        let module = parse();
        let (_, global) = module
            .global_variables
            .iter()
            .find(|(_, g)| g.name.as_deref() == Some("view"))
            .unwrap();

        assert!(matches!(global.space, naga::AddressSpace::Uniform));
        assert_eq!(
            global.binding,
            Some(naga::ResourceBinding {
                group: 0,
                binding: 0
            })
        );

        let ty = &module.types[global.ty];
        let naga::TypeInner::Struct { members, span } = &ty.inner else {
            panic!("uniform is not a struct");
        };
        assert_eq!(*span as usize, std::mem::size_of::<ViewUniform>());

        let offsets: Vec<(&str, u32)> = members
            .iter()
            .map(|m| (m.name.as_deref().unwrap_or(""), m.offset))
            .collect();
        assert_eq!(offsets, vec![("view_proj", 0), ("resolution", 64)]);
    }

    #[test]
    fn vertex_inputs_match_buffer_layout() {
        let module = parse();
        let input = members(struct_named(&module, "VertexInput"));

        let locations: Vec<(&str, Option<u32>)> = input
            .iter()
            .map(|m| (m.name.as_deref().unwrap_or(""), location(&m.binding)))
            .collect();
        assert_eq!(
            locations,
            vec![("position", Some(0)), ("color", Some(1)), ("norm", Some(2))]
        );

        let host: Vec<u32> = LineVertex::layout()
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(host, vec![0, 1, 2]);
    }

    #[test]
    fn stage_interface_locations() {
        let module = parse();
        let output = members(struct_named(&module, "VertexOutput"));

        assert!(matches!(
            output[0].binding,
            Some(naga::Binding::BuiltIn(naga::BuiltIn::Position { .. }))
        ));
        assert_eq!(location(&output[1].binding), Some(1));

        let fs = module
            .entry_points
            .iter()
            .find(|e| e.name == "fs_main")
            .unwrap();
        let result = fs.function.result.as_ref().unwrap();
        assert_eq!(location(&result.binding), Some(0));
    }
}
