//! Behavioural guarantees of the renderer facade

use approx::assert_relative_eq;

use super::{wire_stage, Harness};
use crate::render::backends::headless::BackendCommand;
use crate::render::api::{Image, MeshData, VideoMode};
use crate::render::RenderError;

fn translation(call: &crate::render::DrawCall) -> (f32, f32) {
    (call.mvp[(0, 2)], call.mvp[(1, 2)])
}

#[test]
fn test_every_pool_reuses_released_ids() {
    let mut h = Harness::new();

    let mesh = h.mesh();
    h.renderer.destroy_mesh(mesh).unwrap();
    assert_eq!(h.mesh(), mesh);

    let texture = h.texture();
    h.renderer.destroy_texture(texture).unwrap();
    assert_eq!(h.texture(), texture);

    let program = h.renderer.create_default_program().unwrap();
    h.renderer.destroy_program(program).unwrap();
    assert_eq!(h.renderer.create_default_program().unwrap(), program);

    let property = h.renderer.create_property(mesh, texture).unwrap();
    h.renderer.destroy_property(property).unwrap();
    assert_eq!(h.renderer.create_property(mesh, texture).unwrap(), property);

    let scene = h.renderer.create_scene().unwrap();
    h.renderer.destroy_scene(scene).unwrap();
    assert_eq!(h.renderer.create_scene().unwrap(), scene);

    let object = h.renderer.create_object(scene, property).unwrap();
    h.renderer.destroy_object(scene, object).unwrap();
    assert_eq!(h.renderer.create_object(scene, property).unwrap(), object);

    let camera = h.renderer.create_camera().unwrap();
    h.renderer.destroy_camera(camera).unwrap();
    assert_eq!(h.renderer.create_camera().unwrap(), camera);

    let viewport = h.renderer.create_viewport().unwrap();
    h.renderer.destroy_viewport(viewport).unwrap();
    assert_eq!(h.renderer.create_viewport().unwrap(), viewport);

    let window = h.renderer.create_window(VideoMode::new(64, 64), "a").unwrap();
    h.renderer.destroy_window(window).unwrap();
    assert_eq!(h.renderer.create_window(VideoMode::new(64, 64), "b").unwrap(), window);

    let stage = h.renderer.create_stage(window, viewport, scene, camera, program).unwrap();
    h.renderer.destroy_stage(stage).unwrap();
    assert_eq!(h.renderer.create_stage(window, viewport, scene, camera, program).unwrap(), stage);

    let render_texture = h.renderer.create_render_texture(32, 32).unwrap();
    h.renderer.destroy_render_texture(render_texture).unwrap();
    assert_eq!(h.renderer.create_render_texture(32, 32).unwrap(), render_texture);
}

#[test]
fn test_interpolation_factor_is_clamped() {
    let mut h = Harness::new();
    h.renderer.update_time(h.at(100), h.at(200));

    assert_relative_eq!(h.renderer.interpolation_at(h.start), 0.0);
    assert_relative_eq!(h.renderer.interpolation_at(h.at(150)), 0.5, epsilon = 1e-5);
    assert_relative_eq!(h.renderer.interpolation_at(h.at(60_000)), 1.0);

    for millis in (0..400).step_by(7) {
        let factor = h.renderer.interpolation_at(h.at(millis));
        assert!((0.0..=1.0).contains(&factor), "factor {factor} at {millis}ms");
    }
}

#[test]
fn test_step_draws_between_samples() {
    let mut h = Harness::new();
    let window = h.window("main", 60.0);
    let wiring = wire_stage(&mut h, window);
    let property = h.property();
    let object = h.renderer.create_object(wiring.scene, property).unwrap();

    h.renderer.update_time(h.at(0), h.at(100));
    h.renderer.set_object_position(wiring.scene, object, 10.0, 0.0, true).unwrap();
    h.renderer.step(h.at(50));

    let draws = h.log.draws();
    assert_eq!(draws.len(), 1);
    let (x, y) = translation(&draws[0]);
    assert_relative_eq!(x, 5.0, epsilon = 1e-4);
    assert_relative_eq!(y, 0.0);
}

#[test]
fn test_long_stall_draws_once() {
    let mut h = Harness::new();
    h.window("main", 10.0);

    h.renderer.step(h.at(0));
    assert_eq!(h.log.swaps("main"), 1);

    h.renderer.step(h.at(10_000));
    assert_eq!(h.log.swaps("main"), 2);

    h.renderer.step(h.at(10_000));
    assert_eq!(h.log.swaps("main"), 2);
}

#[test]
fn test_missing_mesh_skips_only_that_object() {
    let mut h = Harness::new();
    let window = h.window("main", 30.0);
    let wiring = wire_stage(&mut h, window);

    let doomed_mesh = h.mesh();
    let kept_mesh = h.mesh();
    let texture = h.texture();
    let doomed = h.renderer.create_property(doomed_mesh, texture).unwrap();
    let kept = h.renderer.create_property(kept_mesh, texture).unwrap();
    h.renderer.create_object(wiring.scene, doomed).unwrap();
    let survivor = h.renderer.create_object(wiring.scene, kept).unwrap();
    h.renderer.set_object_position(wiring.scene, survivor, 3.0, 0.0, false).unwrap();

    h.renderer.destroy_mesh(doomed_mesh).unwrap();
    h.renderer.step(h.at(0));

    let draws = h.log.draws();
    assert_eq!(draws.len(), 1);
    assert_relative_eq!(translation(&draws[0]).0, 3.0, epsilon = 1e-5);

    let stats = h.renderer.stats();
    assert_eq!(stats.objects_drawn, 1);
    assert_eq!(stats.objects_skipped, 1);
    assert_eq!(stats.stages_run, 1);
}

#[test]
fn test_missing_camera_skips_stage_but_not_frame() {
    let mut h = Harness::new();
    let window = h.window("main", 30.0);
    let broken = wire_stage(&mut h, window);
    let healthy = wire_stage(&mut h, window);

    let property = h.property();
    h.renderer.create_object(broken.scene, property).unwrap();
    h.renderer.create_object(healthy.scene, property).unwrap();
    h.renderer.destroy_camera(broken.camera).unwrap();

    h.renderer.step(h.at(0));

    assert_eq!(h.log.draws().len(), 1);
    assert_eq!(h.log.swaps("main"), 1);
    let stats = h.renderer.stats();
    assert_eq!(stats.stages_skipped, 1);
    assert_eq!(stats.stages_run, 1);
}

#[test]
fn test_stages_run_in_attach_order() {
    let mut h = Harness::new();
    let window = h.window("main", 10.0);
    let first = wire_stage(&mut h, window);
    let second = wire_stage(&mut h, window);

    let property = h.property();
    let a = h.renderer.create_object(first.scene, property).unwrap();
    let b = h.renderer.create_object(second.scene, property).unwrap();
    h.renderer.set_object_layer(first.scene, a, 1.0).unwrap();
    h.renderer.set_object_layer(second.scene, b, 2.0).unwrap();

    h.renderer.step(h.at(0));
    let layers: Vec<f32> = h.log.draws().iter().map(|call| call.layer).collect();
    assert_eq!(layers, vec![1.0, 2.0]);

    // Re-attaching the first stage moves it behind the second.
    h.renderer.destroy_stage(first.stage).unwrap();
    h.renderer
        .create_stage(window, first.viewport, first.scene, first.camera, first.program)
        .unwrap();

    h.log.clear();
    h.renderer.step(h.at(100));
    let layers: Vec<f32> = h.log.draws().iter().map(|call| call.layer).collect();
    assert_eq!(layers, vec![2.0, 1.0]);
}

#[test]
fn test_fps_too_low_is_rejected_without_panicking() {
    let mut h = Harness::new();
    let window = h.renderer.create_window(VideoMode::new(320, 240), "slow").unwrap();

    for fps in [1e-20, 6e-20] {
        assert!(matches!(
            h.renderer.set_window_desired_fps_at(window, fps, h.start),
            Err(RenderError::InvalidArgument(_))
        ));
    }

    h.renderer.step(h.at(1));
    assert_eq!(h.log.swaps("slow"), 0);
}

#[test]
fn test_snapped_position_round_trips() {
    let mut h = Harness::new();
    let window = h.window("main", 30.0);
    let wiring = wire_stage(&mut h, window);
    let property = h.property();
    let object = h.renderer.create_object(wiring.scene, property).unwrap();

    h.renderer.update_time(h.at(0), h.at(100));
    h.renderer.set_object_position(wiring.scene, object, 5.0, 7.0, false).unwrap();
    h.renderer.step(h.at(0));

    let (x, y) = translation(&h.log.draws()[0]);
    assert_relative_eq!(x, 5.0, epsilon = 1e-5);
    assert_relative_eq!(y, 7.0, epsilon = 1e-5);
}

#[test]
fn test_targets_keep_their_own_rate() {
    let mut h = Harness::new();
    h.window("slow", 10.0);
    h.window("fast", 60.0);

    for millis in 0..1000 {
        h.renderer.step(h.at(millis));
    }

    assert_eq!(h.log.swaps("slow"), 10);
    assert_eq!(h.log.swaps("fast"), 60);
}

#[test]
fn test_property_texture_change_reaches_objects() {
    let mut h = Harness::new();
    let window = h.window("main", 10.0);
    let wiring = wire_stage(&mut h, window);
    let property = h.property();
    let first = h.renderer.create_object(wiring.scene, property).unwrap();
    let second = h.renderer.create_object(wiring.scene, property).unwrap();
    assert_ne!(first, second);

    h.renderer.step(h.at(0));
    let before: Vec<_> = h.log.draws().iter().map(|call| call.texture).collect();
    assert_eq!(before.len(), 2);

    let replacement = h.texture();
    let uploaded = h
        .log
        .snapshot()
        .into_iter()
        .filter_map(|command| match command {
            BackendCommand::UploadTexture(handle) => Some(handle),
            _ => None,
        })
        .last()
        .unwrap();
    h.renderer.set_property_texture(property, replacement).unwrap();

    h.log.clear();
    h.renderer.step(h.at(100));
    let after: Vec<_> = h.log.draws().iter().map(|call| call.texture).collect();
    assert_eq!(after, vec![uploaded, uploaded]);
    assert_ne!(before[0], uploaded);
}

#[test]
fn test_mismatched_tick_and_frame_rates_stay_smooth() {
    let mut h = Harness::new();
    let window = h.window("main", 60.0);
    let wiring = wire_stage(&mut h, window);
    let property = h.property();
    let object = h.renderer.create_object(wiring.scene, property).unwrap();

    // Ticks every 50ms, each moving the object one unit; frames at 60 fps.
    let mut tick = 0_u16;
    for millis in 0..500_u64 {
        if millis % 50 == 0 {
            h.renderer.update_time(h.at(millis), h.at(millis + 50));
            tick += 1;
            h.renderer
                .set_object_position(wiring.scene, object, f32::from(tick), 0.0, true)
                .unwrap();
        }
        h.renderer.step(h.at(millis));
    }

    let xs: Vec<f32> = h.log.draws().iter().map(|call| translation(call).0).collect();
    assert_eq!(xs.len(), 30);
    assert!(xs.windows(2).all(|pair| pair[1] >= pair[0] - 1e-4));
    assert!(xs.iter().all(|&x| (0.0..=10.0).contains(&x)));
    assert!(xs.iter().any(|&x| {
        let fraction = x.fract();
        fraction > 0.1 && fraction < 0.9
    }));
}

#[test]
fn test_unknown_ids_report_not_found() {
    let mut h = Harness::new();

    assert_eq!(
        h.renderer.destroy_mesh(4),
        Err(RenderError::not_found(crate::render::ResourceKind::Mesh, 4))
    );
    assert!(h.renderer.set_camera_position(1, 0.0, 0.0, true).unwrap_err().is_not_found());
    assert!(h.renderer.set_viewport_rect(1, 0, 0, 1, 1).unwrap_err().is_not_found());
    assert!(h.renderer.set_window_visibility(1, true).unwrap_err().is_not_found());
    assert!(h.renderer.create_object(1, 1).unwrap_err().is_not_found());
    assert!(h.renderer.set_property_texture(1, 1).unwrap_err().is_not_found());
    assert!(h.renderer.set_mesh_data(1, &MeshData::unit_quad()).unwrap_err().is_not_found());

    let texture = h.renderer.create_texture(&Image::new(1, 1)).unwrap();
    assert!(h.renderer.create_property(9, texture).unwrap_err().is_not_found());
}
