#![allow(clippy::needless_return)]
use mdforces::{NeighborProvider, SimpleParticles, Particle, UnitCell, Vector3D, StorageMode};
use mdforces::neighbors::CellListNeighbors;

use criterion::{BenchmarkGroup, Criterion, measurement::WallTime, SamplingMode};
use criterion::{criterion_group, criterion_main};

/// Perturbed cubic lattice of `n * n * n` particles
fn particles(n: usize) -> SimpleParticles {
    let spacing = 1.1;
    let mut particles = SimpleParticles::new(UnitCell::cubic(n as f64 * spacing), &["A"]);
    let mut index = 0;
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let x = index as f64;
                let displacement = 0.1 * Vector3D::new(f64::sin(x), f64::cos(1.3 * x), f64::sin(0.7 * x));
                let position = spacing * Vector3D::new(i as f64, j as f64, k as f64) + displacement;
                particles.add_particle(Particle::new(0, position)).expect("invalid particle");
                index += 1;
            }
        }
    }
    return particles;
}

fn run_cell_list(mut group: BenchmarkGroup<WallTime>, cutoff: f64, test_mode: bool) {
    let sizes: &[usize] = if test_mode { &[8] } else { &[8, 16, 24] };

    for &n in sizes {
        let particles = particles(n);
        let n_particles = n * n * n;

        for &mode in &[StorageMode::Half, StorageMode::Full] {
            let mut neighbors = CellListNeighbors::new(cutoff, mode).expect("invalid cutoff");

            let name = format!("{} particles, {:?} list", n_particles, mode);
            group.bench_function(&name, |b| b.iter_custom(|repeat| {
                let start = std::time::Instant::now();
                for step in 0..repeat {
                    neighbors.refresh(step, &particles).expect("failed to build the list");
                }
                start.elapsed() / n_particles as u32
            }));
        }
    }
}

fn cell_list(c: &mut Criterion) {
    let test_mode = std::env::args().any(|arg| arg == "--test");

    for &cutoff in &[2.5, 3.5] {
        let mut group = c.benchmark_group(format!("Cell list (per particle)/cutoff = {}", cutoff));
        group.noise_threshold(0.05);
        group.sampling_mode(SamplingMode::Flat);
        group.sample_size(10);

        run_cell_list(group, cutoff, test_mode);
    }
}

criterion_group!(all, cell_list);
criterion_main!(all);
