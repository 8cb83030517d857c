//! External fields energies, on one and several ranks

use mdforces::{Communicator, ExternalPotential, LocalCommunicator, SingleProcess};
use mdforces::{SimpleParticles, Particle, UnitCell, Vector3D, Quaternion, Error};
use mdforces::external::{ExternalFields, LinearField, LinearFieldParameters, SphericalWall};

/// A field returning a large finite energy for trial moves only
struct TrialPenalty;

impl ExternalPotential for TrialPenalty {
    fn name(&self) -> String {
        "trial_penalty".into()
    }

    fn particle_energy(&self, _: &UnitCell, _: usize, _: Vector3D, _: Quaternion, _: f64, trial: bool) -> Result<f64, Error> {
        if trial {
            Ok(1e30)
        } else {
            Ok(0.0)
        }
    }
}

fn particles(rank: usize) -> SimpleParticles {
    let mut particles = SimpleParticles::new(UnitCell::cubic(10.0), &["A", "B"]);
    for i in 0..3 {
        let tag = (3 * rank + i) as u64;
        let position = Vector3D::new(1.0 + rank as f64, i as f64, 0.0);
        particles.add_particle(Particle::new(i % 2, position).with_tag(tag)).unwrap();
    }
    return particles;
}

#[test]
fn trial_and_current_configurations() {
    let particles = particles(0);

    let energy = TrialPenalty.total_energy(&particles, &SingleProcess, true).unwrap();
    assert_eq!(energy, 3e30);
    let energy = TrialPenalty.total_energy(&particles, &SingleProcess, false).unwrap();
    assert_eq!(energy, 0.0);

    // particles outside of the wall
    let wall = SphericalWall::new(Vector3D::new(5.0, 5.0, 5.0), 1.0).unwrap();
    assert_eq!(wall.total_energy(&particles, &SingleProcess, true).unwrap(), f64::INFINITY);
    assert_eq!(wall.total_energy(&particles, &SingleProcess, false).unwrap(), 0.0);

    // energy differences with the current configuration are well defined
    let mut fields = ExternalFields::new();
    fields.push(Box::new(wall));
    fields.push(Box::new(LinearField::new(2, Vector3D::zero(), Vector3D::new(0.0, 1.0, 0.0)).unwrap()));
    let current = fields.total_energy(&particles, &SingleProcess, false).unwrap();
    assert_eq!(current, 0.0);
    assert!(!(fields.total_energy(&particles, &SingleProcess, true).unwrap() - current).is_nan());
}

#[test]
fn sum_over_ranks() {
    let parameters = LinearFieldParameters {
        plane_origin: Vector3D::zero(),
        plane_normal: Vector3D::new(1.0, 0.0, 0.0),
        alpha: vec![1.0, 2.0],
    };

    let handles = LocalCommunicator::group(3).into_iter().map(|communicator| {
        let parameters = parameters.clone();
        std::thread::spawn(move || {
            let particles = particles(communicator.rank());
            let field = LinearField::with_parameters(parameters).unwrap();
            field.total_energy(&particles, &communicator, true).unwrap()
        })
    }).collect::<Vec<_>>();

    // on rank r, particles are at x = 1 + r, with types 0, 1, 0
    let expected = (0..3).map(|rank| 4.0 * (1.0 + rank as f64)).sum::<f64>();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn unknown_types() {
    let particles = particles(0);
    let field = LinearField::new(1, Vector3D::zero(), Vector3D::new(1.0, 0.0, 0.0)).unwrap();
    let error = field.total_energy(&particles, &SingleProcess, false).unwrap_err();
    assert!(matches!(error, Error::UnknownType { type_index: 1, types_count: 1 }));
}
