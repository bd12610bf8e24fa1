//! Integration tests for building volumetric renders and handing them to a backend.

use proptest::prelude::*;
use volren::*;

/// Backend that records what it was asked to upload and release.
#[derive(Default)]
struct RecordingBackend {
    next_id: u32,
    live: Vec<u32>,
    uploads: Vec<(Vec<u8>, VolumeUniforms, usize)>,
    fail: bool,
}

impl VolumeBackend for RecordingBackend {
    type Handle = u32;

    fn upload(&mut self, descriptor: &RenderDescriptor, grid: &VolumetricGrid) -> Result<u32> {
        if self.fail {
            return Err(VolrenError::Backend("out of memory".into()));
        }
        self.next_id += 1;
        self.live.push(self.next_id);
        self.uploads.push((
            descriptor.transfer().as_bytes().to_vec(),
            descriptor.uniforms(),
            grid.data().len(),
        ));
        Ok(self.next_id)
    }

    fn release(&mut self, handle: u32) {
        self.live.retain(|&h| h != handle);
    }
}

fn ramp_spec_json() -> &'static str {
    r##"{
        "transferfn": [
            {"value": 1.0, "color": [1, 1, 1], "opacity": 1.0},
            {"value": 0.0, "color": "#000000", "opacity": 0.0}
        ],
        "subsamples": 8
    }"##
}

fn lattice_grid() -> VolumetricGrid {
    let data = (0..27).map(|v| v as f32 / 26.0).collect();
    VolumetricGrid::axis_aligned(UVec3::splat(3), Vec3::splat(-1.0), Vec3::ONE, data).unwrap()
}

#[test]
fn test_build_from_json() {
    let render = build_from_json(lattice_grid(), ramp_spec_json()).unwrap();
    let d = render.descriptor();

    assert_eq!(d.transfer().as_bytes().len(), TABLE_SIZE * 4);
    assert_eq!(d.transfer().entries()[0], [0, 0, 0, 0]);
    assert_eq!(d.transfer().entries()[TABLE_SIZE - 1], [255, 255, 255, 255]);
    assert_eq!(d.subsamples(), 8.0);

    let uniforms = render.uniforms();
    assert_eq!(uniforms.transfer_min, 0.0);
    assert_eq!(uniforms.transfer_max, 1.0);
    assert_eq!(uniforms.extent_min, [-1.0, -1.0, -1.0, 0.0]);
    assert_eq!(uniforms.extent_max, [2.0, 2.0, 2.0, 0.0]);
    assert_eq!(uniforms.min_unit, 1.0);
    assert_eq!(uniforms.as_bytes().len(), 128);
}

#[test]
fn test_texture_matrix_maps_extent_to_unit_cube() {
    let render = build_from_json(lattice_grid(), ramp_spec_json()).unwrap();
    let t = render.descriptor().transform();
    let lo = t.to_texture(t.extent.min);
    let hi = t.to_texture(t.extent.max);
    assert!(lo.abs().max_element() < 1e-5);
    assert!((hi - Vec3::ONE).abs().max_element() < 1e-5);

    let m = Mat4::from_cols_array_2d(&render.uniforms().texture_matrix);
    assert_eq!(m, t.texture_matrix);
}

#[test]
fn test_affine_grid_render() {
    let matrix = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0))
        * Mat4::from_rotation_x(0.4)
        * Mat4::from_scale(Vec3::new(0.5, 1.0, 2.0));
    let grid = VolumetricGrid::affine(UVec3::new(4, 4, 4), matrix, vec![0.0; 64]).unwrap();
    let render = build_from_json(grid, ramp_spec_json()).unwrap();

    let t = render.descriptor().transform();
    assert!((t.min_unit - 0.5).abs() < 1e-6);
    assert!((t.max_depth - (t.extent.max - t.extent.min).length()).abs() < 1e-5);

    let sphere = render.descriptor().bounding_sphere();
    assert_eq!(sphere.radius, t.max_depth / 2.0);
    for corner in render.bounding_box_corners() {
        assert!(sphere.center.distance(corner) <= sphere.radius + 1e-4);
    }
    assert_eq!(render.bounding_box_edges().len(), 12);
}

#[test]
fn test_selection_from_json() {
    let json = r##"{
        "transferfn": [
            {"value": 0.0, "color": "black", "opacity": 0.0},
            {"value": 1.0, "color": "white", "opacity": 1.0}
        ],
        "coords": [{"x": 0, "y": 0, "z": 0}],
        "seldist": 1.5
    }"##;
    let original = lattice_grid();
    let render = build_from_json(original.clone(), json).unwrap();

    for i in 0..3 {
        for j in 0..3 {
            for k in 0..3 {
                let idx = original.flatten_index(i, j, k);
                let kept = original.lattice_position(i, j, k).length() < 1.5;
                let value = render.grid().data()[idx];
                if kept {
                    assert_eq!(value, original.data()[idx]);
                } else {
                    assert_eq!(value, EXCLUDED_VALUE);
                    assert_eq!(render.descriptor().transfer().lookup(value), None);
                }
            }
        }
    }
}

#[test]
fn test_attach_detach_lifecycle() {
    let render = build_from_json(lattice_grid(), ramp_spec_json()).unwrap();
    let mut backend = RecordingBackend::default();

    let handle = render.attach(&mut backend).unwrap().expect("visible render uploads");
    assert_eq!(backend.live, vec![handle]);
    assert_eq!(backend.uploads.len(), 1);
    assert_eq!(backend.uploads[0].0, render.descriptor().transfer().as_bytes());
    assert_eq!(backend.uploads[0].1, render.uniforms());
    assert_eq!(backend.uploads[0].2, 27);

    let handle = render.reattach(&mut backend, Some(handle)).unwrap().unwrap();
    assert_eq!(backend.live, vec![handle]);
    assert_eq!(backend.uploads.len(), 2);

    render.detach(&mut backend, handle);
    assert!(backend.live.is_empty());
}

#[test]
fn test_hidden_render_is_not_uploaded() {
    let mut spec = VolumetricRenderSpec::from_json_str(ramp_spec_json()).unwrap();
    spec.hidden = true;
    let mut render = VolumetricRender::new(lattice_grid(), &spec).unwrap();
    let mut backend = RecordingBackend::default();

    assert!(render.attach(&mut backend).unwrap().is_none());
    assert!(backend.uploads.is_empty());

    render.set_hidden(false);
    assert!(render.attach(&mut backend).unwrap().is_some());
}

#[test]
fn test_backend_failure_propagates() {
    let render = build_from_json(lattice_grid(), ramp_spec_json()).unwrap();
    let mut backend = RecordingBackend {
        fail: true,
        ..RecordingBackend::default()
    };
    assert!(matches!(
        render.attach(&mut backend),
        Err(VolrenError::Backend(_))
    ));
}

#[test]
fn test_construction_errors() {
    // Unknown color name.
    let json = r#"{"transferfn": [{"value": 0, "color": "chartreuse-ish", "opacity": 1}]}"#;
    assert!(matches!(
        build_from_json(lattice_grid(), json),
        Err(VolrenError::UnknownColor(_))
    ));

    // Malformed JSON.
    assert!(matches!(
        build_from_json(lattice_grid(), "{"),
        Err(VolrenError::JsonError(_))
    ));
}

#[test]
fn test_init_logging_is_idempotent() {
    init_logging();
    init_logging();
}

proptest! {
    #[test]
    fn prop_uniforms_match_descriptor(
        origin in prop::array::uniform3(-50.0_f32..50.0),
        unit in prop::array::uniform3(0.1_f32..4.0),
        size in prop::array::uniform3(1_u32..6),
        subsamples in 1.0_f32..16.0,
    ) {
        let size = UVec3::from_array(size);
        let count = (size.x * size.y * size.z) as usize;
        let grid = VolumetricGrid::axis_aligned(
            size,
            Vec3::from_array(origin),
            Vec3::from_array(unit),
            vec![0.0; count],
        )
        .unwrap();
        let mut spec = VolumetricRenderSpec::from_json_str(ramp_spec_json()).unwrap();
        spec.subsamples = subsamples;
        let render = VolumetricRender::new(grid, &spec).unwrap();

        let d = render.descriptor();
        let t = d.transform();
        let u = render.uniforms();
        prop_assert_eq!(Mat4::from_cols_array_2d(&u.texture_matrix), t.texture_matrix);
        prop_assert_eq!(u.extent_min, t.extent.min.extend(0.0).to_array());
        prop_assert_eq!(u.extent_max, t.extent.max.extend(0.0).to_array());
        prop_assert_eq!(u.max_depth, t.max_depth);
        prop_assert_eq!(u.min_unit, t.min_unit);
        prop_assert_eq!(u.subsamples, subsamples);
        prop_assert_eq!(u.transfer_min, d.transfer().value_min());
        prop_assert_eq!(u.transfer_max, d.transfer().value_max());

        let lo = t.to_texture(t.extent.min);
        let hi = t.to_texture(t.extent.max);
        prop_assert!(lo.abs().max_element() < 1e-3, "{:?}", lo);
        prop_assert!((hi - Vec3::ONE).abs().max_element() < 1e-3, "{:?}", hi);
        prop_assert_eq!(d.bounding_sphere().radius, t.max_depth / 2.0);
    }
}
