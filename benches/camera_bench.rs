use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};
use vista::camera::{Camera, CameraUniform};
use vista::input::{InputEvent, KeyCode};
use vista::options::CameraOptions;

fn update_benchmark(c: &mut Criterion) {
    let mut camera = Camera::new(Vec3::ZERO, &CameraOptions::default());
    for key in [KeyCode::KeyW, KeyCode::KeyD, KeyCode::KeyQ] {
        camera.handle_input(&InputEvent::KeyDown { key }, Vec2::ZERO);
    }

    c.bench_function("camera_update_three_flags", |b| {
        b.iter(|| camera.update(black_box(1.0 / 60.0)));
    });
}

fn aim_benchmark(c: &mut Criterion) {
    let mut camera = Camera::default();
    let mut sign = 1.0;

    c.bench_function("camera_aim", |b| {
        b.iter(|| {
            sign = -sign;
            camera.aim(black_box(Vec2::new(3.0 * sign, 2.0 * sign)));
        });
    });
}

fn uniform_benchmark(c: &mut Criterion) {
    let camera = Camera::new(Vec3::new(0.0, 2.5, 6.0), &CameraOptions::default());
    let mut uniform = CameraUniform::new();

    c.bench_function("camera_uniform_update", |b| {
        b.iter(|| uniform.update_view_proj(black_box(&camera), black_box(16.0 / 9.0)));
    });
}

criterion_group!(benches, update_benchmark, aim_benchmark, uniform_benchmark);
criterion_main!(benches);
