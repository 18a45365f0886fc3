//! Headless timing run: `benchmark [bodies] [steps]`.
//!
//! Steps a world of `bodies` random bodies `steps` times without opening a
//! window. Prints a one-line summary, or a JSON record with `--features serde`.

use std::time::Instant;

use clap::Parser;
use gravity_toy::physics::{Bounds, PhysicsParams, PhysicsWorld};

const BOUNDS: Bounds = Bounds {
    width: 1920.0,
    height: 1080.0,
};

#[derive(Parser, Debug)]
#[command(name = "benchmark", about = "Time headless world steps")]
struct Args {
    /// Number of random bodies in the world
    #[arg(default_value_t = 64)]
    bodies: usize,
    /// Number of steps to run
    #[arg(default_value_t = 10_000)]
    steps: u64,
}

fn main() {
    let Args { bodies, steps } = Args::parse();

    let params = PhysicsParams {
        default_body_count: bodies,
        ..gravity_toy::config::load_params()
    };
    let mut world = PhysicsWorld::with_seed(params, 42);
    world.reset(BOUNDS);

    let start = Instant::now();
    for _ in 0..steps {
        world.step(BOUNDS);
    }
    let elapsed = start.elapsed();
    let per_step_us = elapsed.as_secs_f64() * 1e6 / steps.max(1) as f64;
    let non_finite = world.non_finite_bodies().count();

    #[cfg(feature = "serde")]
    println!(
        "{}",
        serde_json::json!({
            "bodies": bodies,
            "steps": steps,
            "total_ms": elapsed.as_secs_f64() * 1e3,
            "per_step_us": per_step_us,
            "non_finite_bodies": non_finite,
        })
    );

    #[cfg(not(feature = "serde"))]
    println!(
        "bodies={bodies} steps={steps} total={:.2}ms per_step={per_step_us:.3}us non_finite={non_finite}",
        elapsed.as_secs_f64() * 1e3
    );
}
