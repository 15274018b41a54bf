//! GM328A case and battery box

use approx::assert_abs_diff_eq;
use enclosure_cad::{CadKernel, MeshKernel};
use enclosure_core::{
    Enclosure, Gm328aBattery, Gm328aCase, PartKind, VariantKind, build, presets,
};

#[test]
fn test_case_wall_anchor() {
    let kernel = MeshKernel::new();
    let case = Gm328aCase::new(presets::gm328a_case()).unwrap();
    let wall = case.parametric_box().wall_solid(&kernel).unwrap();
    let anchor = case.wall_anchor(&kernel, &wall).unwrap();

    assert_abs_diff_eq!(anchor.center.x, -42.55, epsilon = 1e-6);
    assert_abs_diff_eq!(anchor.center.y, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(anchor.normal.x, -1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(anchor.height, 18.22, epsilon = 1e-6);
    // flat part of the side between the rounded corners
    assert_abs_diff_eq!(anchor.width, 70.2 - 2.0 * 5.5, epsilon = 1e-6);
}

#[test]
fn test_case_bottom_anchor() {
    let kernel = MeshKernel::new();
    let config = presets::gm328a_case();
    let case = Gm328aCase::new(config.clone()).unwrap();
    let wall = case.parametric_box().wall_solid(&kernel).unwrap();
    let bottom = case.parametric_box().bottom_shell_solid(&kernel).unwrap();
    let wall_anchor = case.wall_anchor(&kernel, &wall).unwrap();
    let anchor = case.bottom_anchor(&kernel, &bottom, &wall_anchor).unwrap();

    let edge = -(config.dim_bottom.x / 2.0 - config.fillet_dim_bottom.x - config.clearance.x);
    assert_abs_diff_eq!(anchor.x, edge + wall_anchor.height / 2.0, epsilon = 1e-6);
    assert_abs_diff_eq!(anchor.y, 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(anchor.z, 0.0, epsilon = 1e-9);
}

#[test]
fn test_case_lid_carries_socket_flange() {
    let kernel = MeshKernel::new();
    let case = Gm328aCase::new(presets::gm328a_case()).unwrap();
    let plain = case.parametric_box().top_solid(&kernel).unwrap();
    let lid = case.top_solid(&kernel).unwrap();

    let plain_bounds = kernel.bounding_box(&plain).unwrap();
    let bounds = kernel.bounding_box(&lid).unwrap();
    assert_abs_diff_eq!(bounds.max.z, plain_bounds.max.z, epsilon = 1e-6);
    assert_abs_diff_eq!(bounds.size().x, plain_bounds.size().x, epsilon = 1e-6);
    let flange_bottom = case.parametric_box().height() - 2.0 + 0.2 - Gm328aCase::INTERNAL_FLANGE_HEIGHT;
    assert_abs_diff_eq!(bounds.min.z, flange_bottom, epsilon = 1e-6);
}

#[test]
fn test_case_wall_keeps_its_envelope() {
    let kernel = MeshKernel::new();
    let case = Gm328aCase::new(presets::gm328a_case()).unwrap();
    let plain = case.parametric_box().wall_solid(&kernel).unwrap();
    let wall = case.wall_solid(&kernel).unwrap();

    let plain_bounds = kernel.bounding_box(&plain).unwrap();
    let bounds = kernel.bounding_box(&wall).unwrap();
    assert_abs_diff_eq!(bounds.min.x, plain_bounds.min.x, epsilon = 1e-6);
    assert_abs_diff_eq!(bounds.max.z, plain_bounds.max.z, epsilon = 1e-6);
    assert!(kernel.volume(&wall).unwrap() < kernel.volume(&plain).unwrap());
}

#[test]
fn test_case_board_height() {
    let kernel = MeshKernel::new();
    let case = Gm328aCase::new(presets::gm328a_case()).unwrap();
    let bounds = kernel
        .bounding_box(&case.board_solid(&kernel).unwrap())
        .unwrap();
    assert_abs_diff_eq!(bounds.center().z, 2.0 + 4.0 + 0.76, epsilon = 1e-6);
    assert_abs_diff_eq!(bounds.size().x, 78.7, epsilon = 1e-6);
}

#[test]
fn test_battery_pegs_stand_out_of_the_wall() {
    let kernel = MeshKernel::new();
    let battery = Gm328aBattery::new(presets::gm328a_battery()).unwrap();
    let wall = battery.wall_solid(&kernel).unwrap();
    let anchor = battery
        .wall_anchor(&kernel, &battery.parametric_box().wall_solid(&kernel).unwrap())
        .unwrap();
    assert_abs_diff_eq!(anchor.center.x, 18.6, epsilon = 1e-6);

    let bounds = kernel.bounding_box(&wall).unwrap();
    assert_abs_diff_eq!(bounds.max.x, 18.6 + 2.5, epsilon = 1e-6);
    assert_abs_diff_eq!(bounds.min.x, -18.6, epsilon = 1e-6);
}

#[test]
fn test_case_parts() {
    let kernel = MeshKernel::new();
    let case = build(VariantKind::Case, presets::gm328a_case()).unwrap();
    let parts = case.parts(&kernel).unwrap();
    let kinds: Vec<PartKind> = parts.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(
        kinds,
        vec![
            PartKind::Lid,
            PartKind::Base,
            PartKind::Wall,
            PartKind::TopFillet,
            PartKind::BottomFillet,
        ]
    );
    for (kind, solid) in &parts {
        assert!(kernel.volume(solid).unwrap() > 0.0, "{kind} is empty");
    }
}
