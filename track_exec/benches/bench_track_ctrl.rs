//! # Tracking Control Benchmark

use criterion::{criterion_group, criterion_main, Criterion};

use comms_if::{eqpt::odom::Twist, tc::track_ctrl::Waypoint};
use track_lib::{
    loc::Pose,
    track_ctrl::{Params, TrackCtrl},
};

fn track_ctrl_benchmark(c: &mut Criterion) {
    // ---- Build a controller tracking a far away point ----

    let mut track_ctrl = TrackCtrl::new(Params::default(), 0.0).unwrap();
    track_ctrl
        .on_waypoints_received(vec![Waypoint::new(1000.0, 250.0)])
        .unwrap();

    let pose = Pose::new(1.0, 1.0, 0.3);
    let twist = Twist::new(0.2, 0.05);
    let mut time_s = 0.0;

    // Bench a single control cycle
    c.bench_function("TrackCtrl::on_pose_update", |b| {
        b.iter(|| {
            time_s += 0.05;
            track_ctrl.on_pose_update(&pose, &twist, time_s)
        })
    });
}

criterion_group!(benches, track_ctrl_benchmark);
criterion_main!(benches);
