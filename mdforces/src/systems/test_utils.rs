use crate::Vector3D;
use super::{UnitCell, SimpleParticles, Particle};

/// Two particles of type 0 at `distance` from each other along x, in a large
/// periodic box
pub fn dimer(distance: f64) -> SimpleParticles {
    let mut particles = SimpleParticles::new(UnitCell::cubic(20.0), &["A"]);
    particles.add_particle(Particle::new(0, Vector3D::new(1.0, 1.0, 1.0))).unwrap();
    particles.add_particle(Particle::new(0, Vector3D::new(1.0 + distance, 1.0, 1.0))).unwrap();
    return particles;
}

/// A slightly distorted simple cubic lattice with `n` particles per side, with
/// alternating types `0` and `1`, velocities along x depending on the
/// position along z, and alternating charges.
pub fn lattice(n: usize, spacing: f64) -> SimpleParticles {
    let length = n as f64 * spacing;
    let mut particles = SimpleParticles::new(UnitCell::cubic(length), &["A", "B"]);

    let mut index = 0;
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let x = index as f64;
                let jitter = 0.1 * spacing * Vector3D::new(
                    f64::sin(1.3 * x),
                    f64::sin(2.1 * x + 0.4),
                    f64::cos(0.7 * x + 1.1),
                );
                let position = spacing * Vector3D::new(i as f64, j as f64, k as f64) + jitter;

                let particle = Particle::new(index % 2, position)
                    .with_velocity(Vector3D::new(f64::cos(x), 0.5 * f64::sin(3.0 * x), 0.1))
                    .with_charge(if index % 2 == 0 { 1.0 } else { -1.0 })
                    .with_diameter(if index % 2 == 0 { 1.0 } else { 1.2 })
                    .with_mass(if index % 2 == 0 { 1.0 } else { 2.0 });

                particles.add_particle(particle).unwrap();
                index += 1;
            }
        }
    }

    return particles;
}
