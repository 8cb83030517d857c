//! Momentum exchange flow on one and several ranks

use approx::assert_relative_eq;

use mdforces::{Communicator, LocalCommunicator, Loggable, ParticleData, Updater, Variant, ParticleGroup};
use mdforces::{SimpleParticles, Particle, UnitCell, Vector3D};
use mdforces::updaters::{Direction, FlowParameters, MomentumExchangeFlow};

fn parameters(target: Variant) -> FlowParameters {
    FlowParameters {
        flow_target: target,
        slab_direction: Direction::Z,
        flow_direction: Direction::X,
        n_slabs: 4,
        min_slab: 0,
        max_slab: 2,
        flow_epsilon: 1e-3,
        group: ParticleGroup::All,
    }
}

/// Particles spread over the whole box, with tags starting at `first_tag`
fn particles(count: usize, first_tag: u64) -> SimpleParticles {
    let mut particles = SimpleParticles::new(UnitCell::orthorhombic(4.0, 5.0, 8.0), &["A"]);
    for i in 0..count {
        let x = (first_tag as usize + i) as f64;
        let position = Vector3D::new(f64::sin(x) + 2.0, 0.37 * x, 0.61 * x);
        let velocity = Vector3D::new(f64::cos(2.3 * x), f64::sin(x), 0.0);
        let particle = Particle::new(0, position)
            .with_velocity(velocity)
            .with_mass(1.0 + 0.1 * (i % 3) as f64)
            .with_tag(first_tag + i as u64);
        particles.add_particle(particle).unwrap();
    }
    return particles;
}

fn momentum(particles: &SimpleParticles) -> Vector3D {
    let masses = particles.masses().unwrap();
    particles.velocities().unwrap().iter().zip(masses).map(|(&v, &m)| m * v).sum()
}

#[test]
fn reaches_target() {
    let mut particles = SimpleParticles::new(UnitCell::orthorhombic(4.0, 5.0, 8.0), &["A"]);
    // (z, vx): two particles in slab 0, two in slab 2 and fast particles in
    // the other slabs
    let initial = [(1.0, 0.0), (1.5, 0.1), (5.0, 0.2), (5.5, 0.3), (3.0, -5.0), (7.0, 5.0)];
    for &(z, vx) in &initial {
        let particle = Particle::new(0, Vector3D::new(1.0, 1.0, z)).with_velocity(Vector3D::new(vx, 0.0, 0.0));
        particles.add_particle(particle).unwrap();
    }

    // one exchange of the slowest particle in slab 0 with the fastest in
    // slab 2 is enough to reach the target
    let area = 4.0 * 5.0;
    let mut parameters = parameters(Variant::from(0.3 / area));
    parameters.flow_epsilon = 1e-6;
    let mut flow = MomentumExchangeFlow::new(parameters).unwrap();
    flow.update(0, &mut particles).unwrap();

    assert_relative_eq!(flow.log_value("mueller_plathe_exchanged_momentum").unwrap(), 0.3);
    let velocities = particles.velocities().unwrap().iter().map(|v| v[0]).collect::<Vec<_>>();
    assert_eq!(velocities, [0.3, 0.1, 0.2, 0.0, -5.0, 5.0]);

    // going back to a zero target reverses the exchange
    flow.set_flow_target(Variant::from(0.0)).unwrap();
    flow.update(1, &mut particles).unwrap();

    assert_eq!(flow.log_value("mueller_plathe_exchanged_momentum").unwrap(), 0.0);
    let velocities = particles.velocities().unwrap().iter().map(|v| v[0]).collect::<Vec<_>>();
    assert_eq!(velocities, [0.0, 0.1, 0.2, 0.3, -5.0, 5.0]);
}

#[test]
fn conserves_momentum() {
    let mut particles = particles(200, 0);
    let initial = momentum(&particles);

    let target = Variant::Ramp { a: 0.0, b: 0.5, t_start: 0, t_ramp: 100 };
    let mut flow = MomentumExchangeFlow::new(parameters(target)).unwrap();
    for step in 0..20 {
        flow.update(step, &mut particles).unwrap();
    }

    assert_relative_eq!(momentum(&particles), initial, epsilon = 1e-10);
}

#[test]
fn several_ranks() {
    let target = Variant::from(0.05);

    // the same particles, all on one rank or split over three ranks
    let mut reference = particles(90, 0);
    let mut flow = MomentumExchangeFlow::new(parameters(target.clone())).unwrap();
    flow.update(0, &mut reference).unwrap();
    let expected = flow.summed_exchanged_momentum();

    let handles = LocalCommunicator::group(3).into_iter().map(|communicator| {
        let target = target.clone();
        std::thread::spawn(move || {
            let first_tag = 30 * communicator.rank() as u64;
            let mut particles = particles(30, first_tag);
            let mut flow = MomentumExchangeFlow::with_communicator(
                parameters(target), Box::new(communicator)
            ).unwrap();
            flow.update(0, &mut particles).unwrap();
            (flow.summed_exchanged_momentum(), particles)
        })
    }).collect::<Vec<_>>();

    let reference_velocities = reference.velocities().unwrap();
    for (rank, handle) in handles.into_iter().enumerate() {
        let (exchanged, particles) = handle.join().unwrap();
        assert_eq!(exchanged, expected);

        let velocities = particles.velocities().unwrap();
        for (i, velocity) in velocities.iter().enumerate() {
            assert_eq!(*velocity, reference_velocities[30 * rank + i]);
        }
    }
}

#[test]
fn triclinic_box() {
    let mut particles = particles(20, 0);
    particles.set_cell(UnitCell::triclinic(4.0, 5.0, 8.0, 0.0, 0.2, 0.0));

    let mut flow = MomentumExchangeFlow::new(parameters(Variant::from(0.01))).unwrap();
    let error = flow.update(0, &mut particles).unwrap_err();
    assert!(matches!(error, mdforces::Error::UnsupportedBox(_)));
}
