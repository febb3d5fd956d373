//! The water shader parses, validates and agrees with the Rust uniform layout.
//! Runs on naga alone, no GPU needed.

use std::mem::{offset_of, size_of};

use naga::valid::{Capabilities, ValidationFlags, Validator};
use ragingsea::rendering::WaterUniforms;

const SHADER: &str = include_str!("../src/shader.wgsl");

fn parse() -> naga::Module {
    naga::front::wgsl::parse_str(SHADER).unwrap_or_else(|e| panic!("{}", e.emit_to_string(SHADER)))
}

fn water_struct(module: &naga::Module) -> (Vec<(String, u32)>, u32) {
    let (_, ty) = module
        .types
        .iter()
        .find(|(_, ty)| ty.name.as_deref() == Some("Water"))
        .expect("struct Water");

    match &ty.inner {
        naga::TypeInner::Struct { members, span } => (
            members
                .iter()
                .map(|m| (m.name.clone().unwrap_or_default(), m.offset))
                .collect(),
            *span,
        ),
        other => panic!("Water is not a struct: {:?}", other),
    }
}

#[test]
fn test_shader_validates() {
    let module = parse();
    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .expect("shader validates");
}

#[test]
fn test_entry_points() {
    let module = parse();
    let find = |name: &str| module.entry_points.iter().find(|ep| ep.name == name);

    assert_eq!(find("vs_main").map(|ep| ep.stage), Some(naga::ShaderStage::Vertex));
    assert_eq!(find("fs_main").map(|ep| ep.stage), Some(naga::ShaderStage::Fragment));
}

fn binary_ops(module: &naga::Module, function: &str) -> Vec<naga::BinaryOperator> {
    let (_, f) = module
        .functions
        .iter()
        .find(|(_, f)| f.name.as_deref() == Some(function))
        .unwrap_or_else(|| panic!("missing function {}", function));

    f.expressions
        .iter()
        .filter_map(|(_, expr)| match expr {
            naga::Expression::Binary { op, .. } => Some(*op),
            _ => None,
        })
        .collect()
}

#[test]
fn test_lattice_wrap_is_integer_remainder() {
    // A float divide-and-floor wrap can land on 289 for far coordinates
    let module = parse();
    let ops = binary_ops(&module, "lattice_cell");
    assert!(ops.contains(&naga::BinaryOperator::Modulo));
    assert!(!ops.contains(&naga::BinaryOperator::Divide));
}

#[test]
fn test_uniform_block_matches_rust() {
    let module = parse();
    let (members, span) = water_struct(&module);
    assert_eq!(span as usize, size_of::<WaterUniforms>());

    let offset = |name: &str| {
        members
            .iter()
            .find(|(member, _)| member == name)
            .map(|(_, offset)| *offset as usize)
            .unwrap_or_else(|| panic!("missing member {}", name))
    };

    assert_eq!(offset("view_proj"), offset_of!(WaterUniforms, view_proj));
    assert_eq!(offset("depth_color"), offset_of!(WaterUniforms, depth_color));
    assert_eq!(offset("color_offset"), offset_of!(WaterUniforms, color_offset));
    assert_eq!(offset("surface_color"), offset_of!(WaterUniforms, surface_color));
    assert_eq!(offset("color_multiplier"), offset_of!(WaterUniforms, color_multiplier));
    assert_eq!(offset("big_wave_frequency"), offset_of!(WaterUniforms, big_wave_frequency));
    assert_eq!(offset("big_wave_elevation"), offset_of!(WaterUniforms, big_wave_elevation));
    assert_eq!(offset("big_wave_speed"), offset_of!(WaterUniforms, big_wave_speed));
    assert_eq!(offset("small_wave_elevation"), offset_of!(WaterUniforms, small_wave_elevation));
    assert_eq!(offset("small_wave_frequency"), offset_of!(WaterUniforms, small_wave_frequency));
    assert_eq!(offset("small_wave_speed"), offset_of!(WaterUniforms, small_wave_speed));
    assert_eq!(offset("small_wave_octaves"), offset_of!(WaterUniforms, small_wave_octaves));
    assert_eq!(offset("time"), offset_of!(WaterUniforms, time));
}
