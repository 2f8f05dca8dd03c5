//! Render Tests - Uniform Layout and Shader Validation
//!
//! GPU-facing structs must match what the WGSL declares, and both shaders
//! must parse and validate without a device.

use std::fs;
use std::mem::{offset_of, size_of};
use std::path::Path;

use meadow_engine::config::MeadowConfig;
use meadow_engine::render::GrassUniforms;
use meadow_engine::vegetation::{GrassVertex, GroundVertex};

fn load_module(name: &str) -> naga::Module {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("shaders").join(name);
    let source =
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {:?}: {e}", path));
    naga::front::wgsl::parse_str(&source)
        .unwrap_or_else(|e| panic!("Failed to parse {name}:\n{}", e.emit_to_string(&source)))
}

/// `(struct size, member offsets by name)` of a struct declared in WGSL.
fn wgsl_struct_layout(module: &naga::Module, struct_name: &str) -> (u32, Vec<(String, u32)>) {
    let ty = module
        .types
        .iter()
        .map(|(_, ty)| ty)
        .find(|ty| ty.name.as_deref() == Some(struct_name))
        .unwrap_or_else(|| panic!("Struct {struct_name} not found"));

    match &ty.inner {
        naga::TypeInner::Struct { members, span } => (
            *span,
            members
                .iter()
                .filter_map(|m| m.name.clone().map(|n| (n, m.offset)))
                .collect(),
        ),
        _ => panic!("Type {struct_name} is not a struct"),
    }
}

fn offset_in(layout: &[(String, u32)], name: &str) -> usize {
    layout
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, o)| *o as usize)
        .unwrap_or_else(|| panic!("Member {name} missing from WGSL struct"))
}

// ============================================================================
// Shader Validation Tests
// ============================================================================

#[test]
fn test_shaders_validate() {
    for name in ["grass.wgsl", "ground.wgsl"] {
        let module = load_module(name);
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        );
        if let Err(e) = validator.validate(&module) {
            panic!("Failed to validate {name}: {e:?}");
        }

        let entry_points: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(entry_points.contains(&"vs_main"), "{name} lacks vs_main");
        assert!(entry_points.contains(&"fs_main"), "{name} lacks fs_main");
    }
}

/// Struct members the fragment entry point reads, from either the uniform
/// block or its own input struct.
fn fragment_member_reads(module: &naga::Module) -> Vec<String> {
    let entry = module
        .entry_points
        .iter()
        .find(|e| e.stage == naga::ShaderStage::Fragment)
        .unwrap_or_else(|| panic!("No fragment entry point"));
    let function = &entry.function;

    function
        .expressions
        .iter()
        .filter_map(|(_, expr)| {
            let naga::Expression::AccessIndex { base, index } = *expr else {
                return None;
            };
            let ty = match function.expressions[base] {
                naga::Expression::GlobalVariable(g) => module.global_variables[g].ty,
                naga::Expression::FunctionArgument(i) => function.arguments[i as usize].ty,
                _ => return None,
            };
            match &module.types[ty].inner {
                naga::TypeInner::Struct { members, .. } => {
                    members.get(index as usize).and_then(|m| m.name.clone())
                }
                _ => None,
            }
        })
        .collect()
}

#[test]
fn test_fragment_shading_is_view_dependent() {
    for name in ["grass.wgsl", "ground.wgsl"] {
        let reads = fragment_member_reads(&load_module(name));
        assert!(
            reads.iter().any(|m| m == "camera_pos"),
            "{name} fs_main ignores camera_pos: {reads:?}"
        );
        assert!(
            reads.iter().any(|m| m == "world_pos"),
            "{name} fs_main ignores world_pos: {reads:?}"
        );
    }
}

// ============================================================================
// GrassUniforms Tests
// ============================================================================

#[test]
fn test_grass_uniforms_match_wgsl() {
    for name in ["grass.wgsl", "ground.wgsl"] {
        let module = load_module(name);
        let (size, members) = wgsl_struct_layout(&module, "GrassUniforms");
        assert_eq!(size as usize, size_of::<GrassUniforms>(), "{name}");

        let expected = [
            ("view_proj", offset_of!(GrassUniforms, view_proj)),
            ("camera_pos", offset_of!(GrassUniforms, camera_pos)),
            ("time", offset_of!(GrassUniforms, time)),
            ("sun_color", offset_of!(GrassUniforms, sun_color)),
            ("mirror", offset_of!(GrassUniforms, mirror)),
            ("grass_color", offset_of!(GrassUniforms, grass_color)),
            ("impact_life", offset_of!(GrassUniforms, impact_life)),
            ("ground_color", offset_of!(GrassUniforms, ground_color)),
            ("ripple_falloff", offset_of!(GrassUniforms, ripple_falloff)),
            ("wind", offset_of!(GrassUniforms, wind)),
            ("ripple", offset_of!(GrassUniforms, ripple)),
            ("impacts", offset_of!(GrassUniforms, impacts)),
        ];
        for (member, offset) in expected {
            assert_eq!(offset_in(&members, member), offset, "{name}: {member}");
        }
    }
}

#[test]
fn test_grass_uniforms_bytes() {
    let uniforms = GrassUniforms::default();
    let bytes: &[u8] = bytemuck::bytes_of(&uniforms);
    assert_eq!(bytes.len(), 256);
    assert_eq!(bytes.len() % 16, 0);
}

#[test]
fn test_grass_uniforms_from_config() {
    let config = MeadowConfig::default();
    let u = GrassUniforms::from_config(&config);
    assert_eq!(u.sun_color, config.visual.sun_color);
    assert_eq!(u.impact_life, config.ripple.lifetime);
    assert_eq!(u.wind[0], config.visual.wind_speed);
    assert_eq!(u.ripple[1], config.ripple.amplitude);
    assert_eq!(u.mirror, 0.0);
    assert!(u.impacts.iter().all(|slot| slot[3] == 0.0));
}

#[test]
fn test_grass_uniforms_builders() {
    let u = GrassUniforms::default()
        .with_time(3.5)
        .with_mirror(true)
        .with_camera(glam::Mat4::IDENTITY.to_cols_array_2d(), [1.0, 2.0, 3.0]);
    assert_eq!(u.time, 3.5);
    assert_eq!(u.mirror, 1.0);
    assert_eq!(u.camera_pos, [1.0, 2.0, 3.0]);
    assert_eq!(u.with_mirror(false).mirror, 0.0);
}

// ============================================================================
// Vertex Layout Tests
// ============================================================================

#[test]
fn test_vertex_strides() {
    assert_eq!(size_of::<GrassVertex>(), 40);
    assert_eq!(offset_of!(GrassVertex, normal), 12);
    assert_eq!(offset_of!(GrassVertex, uv), 24);
    assert_eq!(offset_of!(GrassVertex, vert_index), 32);
    assert_eq!(offset_of!(GrassVertex, blade_center_y), 36);

    assert_eq!(size_of::<GroundVertex>(), 32);
    assert_eq!(offset_of!(GroundVertex, normal), 12);
    assert_eq!(offset_of!(GroundVertex, uv), 24);
}
