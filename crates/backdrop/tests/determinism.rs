//! Seeded runs replay identically, and the closed-form motion laws hold on a
//! running scene.

use std::time::Duration;

use backdrop::math::proximity_factor;
use backdrop::prelude::*;
use backdrop::scene::network::connection_count;
use backdrop::scene::wave::wave_height;

/// A scripted session: pointer sweep, two clicks, a theme change.
fn replay(seed: u64) -> Backdrop<HeadlessRenderer> {
    let mut backdrop = Backdrop::new(BackdropConfig::default().with_seed(seed));
    backdrop
        .start(|vp| Ok(HeadlessRenderer::new(vp.width, vp.height)))
        .unwrap();

    for n in 1..=90u32 {
        let x = 100.0 + n as f32 * 10.0;
        let y = 200.0 + (n as f32 * 0.1).sin() * 100.0;
        backdrop.handle_event(InputEvent::PointerMoved { x, y });
        if n == 10 || n == 40 {
            backdrop.handle_event(InputEvent::Click { x, y });
        }
        if n == 60 {
            backdrop.set_theme(Theme::Light);
        }
        backdrop.frame_at(Duration::from_millis(16 * n as u64));
    }
    backdrop
}

fn swarm_matrices(backdrop: &Backdrop<HeadlessRenderer>) -> Vec<Mat4> {
    let scene = backdrop.scene().unwrap();
    let renderer = backdrop.renderer().unwrap();
    renderer
        .get(scene.swarm().handle())
        .and_then(|e| e.instances.clone())
        .unwrap()
}

#[test]
fn same_seed_replays_identically() {
    let a = replay(1234);
    let b = replay(1234);
    let (sa, sb) = (a.scene().unwrap(), b.scene().unwrap());

    assert_eq!(a.stats(), b.stats());
    assert_eq!(sa.particles().positions(), sb.particles().positions());
    assert_eq!(sa.particles().colors(), sb.particles().colors());
    assert_eq!(sa.bursts().len(), sb.bursts().len());
    for (ba, bb) in sa.bursts().iter().zip(sb.bursts()) {
        assert_eq!(ba.positions(), bb.positions());
    }
    for (x, y) in sa.shapes().iter().zip(sb.shapes()) {
        assert_eq!(x.position(), y.position());
        assert_eq!(x.opacity(), y.opacity());
    }
    assert_eq!(swarm_matrices(&a), swarm_matrices(&b));
    assert_eq!(
        a.renderer().unwrap().last_view_proj(),
        b.renderer().unwrap().last_view_proj()
    );
}

#[test]
fn different_seeds_diverge() {
    let a = replay(1);
    let b = replay(2);
    assert_ne!(
        a.scene().unwrap().particles().positions(),
        b.scene().unwrap().particles().positions()
    );
}

#[test]
fn wave_follows_its_height_field() {
    let mut backdrop = Backdrop::new(BackdropConfig::default().with_seed(7));
    backdrop
        .start(|vp| Ok(HeadlessRenderer::new(vp.width, vp.height)))
        .unwrap();
    let elapsed = Duration::from_millis(1500);
    backdrop.frame_at(elapsed);

    let t = elapsed.as_secs_f32() * backdrop.config().animation_speed;
    let wave = backdrop.scene().unwrap().wave();
    for p in wave.positions().iter().step_by(97) {
        let expected = wave_height(p.x, p.y, t);
        assert!((p.z - expected).abs() < 1e-5, "z {} != {expected} at ({}, {})", p.z, p.x, p.y);
    }

    // The renderer saw the same heights.
    let entity = backdrop.renderer().unwrap().get(wave.handle()).unwrap();
    assert_eq!(entity.mesh.positions[123][2], wave.positions()[123].z);
}

#[test]
fn wave_height_closed_form() {
    assert_eq!(wave_height(0.0, 0.0, 0.0), 0.3);
    let (x, y, t) = (1.0_f32, 2.0_f32, 0.25_f32);
    let expected = 0.5 * (0.5 * x + 2.0 * t).sin() + 0.3 * (0.3 * y + 1.5 * t).cos();
    assert!((wave_height(x, y, t) - expected).abs() < 1e-6);
}

#[test]
fn pull_factor_is_linear_and_cut_off() {
    assert_eq!(proximity_factor(0.0, 5.0), 1.0);
    assert!((proximity_factor(2.5, 5.0) - 0.5).abs() < 1e-6);
    assert_eq!(proximity_factor(5.0, 5.0), 0.0);
    assert_eq!(proximity_factor(7.0, 5.0), 0.0);
}

#[test]
fn connections_fully_link_adjacent_layers() {
    assert_eq!(connection_count(&[5, 8, 6, 4]), 112);
    assert_eq!(connection_count(&[3]), 0);
    assert_eq!(connection_count(&[2, 2, 2]), 8);
}
