//! Properties of the pairwise force engine on small systems, using the
//! public API only.

use approx::assert_relative_eq;

use mdforces::{Loggable, ForceCompute, Error, ParticleData};
use mdforces::{SimpleParticles, Particle, UnitCell, Vector3D, StorageMode};
use mdforces::neighbors::{CellListNeighbors, ExplicitNeighbors};
use mdforces::potentials::{PairPotential, EnergyShiftMode, ForceAccumulators};
use mdforces::potentials::evaluators::{LennardJones, LennardJonesParameters};
use mdforces::potentials::evaluators::{InversePower, InversePowerParameters};
use mdforces::potentials::evaluators::{Gaussian, GaussianParameters};
use mdforces::potentials::evaluators::{Yukawa, YukawaParameters};
use mdforces::potentials::evaluators::{ShiftedLennardJones, ShiftedLennardJonesParameters};
use mdforces::potentials::evaluators::{ScreenedCoulomb, ScreenedCoulombParameters};

/// A small liquid-like configuration with two particle types, in a cubic box
fn liquid(n: usize, spacing: f64) -> SimpleParticles {
    let mut particles = SimpleParticles::new(UnitCell::cubic(n as f64 * spacing), &["A", "B"]);
    let mut index = 0;
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let x = index as f64;
                let displacement = 0.08 * spacing * Vector3D::new(
                    f64::sin(0.9 * x + 0.3),
                    f64::cos(1.7 * x),
                    f64::sin(2.3 * x + 1.0),
                );
                let position = spacing * Vector3D::new(i as f64, j as f64, k as f64) + displacement;
                let particle = Particle::new(index % 2, position)
                    .with_charge(if index % 3 == 0 { 1.0 } else { -0.5 })
                    .with_diameter(if index % 2 == 0 { 1.0 } else { 0.8 });
                particles.add_particle(particle).unwrap();
                index += 1;
            }
        }
    }
    return particles;
}

fn pair(distance: f64, box_length: f64) -> SimpleParticles {
    let mut particles = SimpleParticles::new(UnitCell::cubic(box_length), &["A", "B"]);
    particles.add_particle(Particle::new(0, Vector3D::new(1.0, 1.0, 1.0)).with_charge(1.0)).unwrap();
    particles.add_particle(Particle::new(1, Vector3D::new(1.0 + distance, 1.0, 1.0)).with_charge(-1.0)).unwrap();
    return particles;
}

fn lennard_jones(rcut: f64) -> PairPotential<LennardJones> {
    let mut potential = PairPotential::new(2);
    potential.set_params(0, 0, LennardJonesParameters { epsilon: 1.0, sigma: 1.0 }).unwrap();
    potential.set_params(0, 1, LennardJonesParameters { epsilon: 0.8, sigma: 0.9 }).unwrap();
    potential.set_params(1, 1, LennardJonesParameters { epsilon: 0.5, sigma: 1.1 }).unwrap();
    for (a, b) in [(0, 0), (0, 1), (1, 1)] {
        potential.set_r_cut(a, b, rcut).unwrap();
    }
    return potential;
}

fn compute<E>(potential: &mut PairPotential<E>, particles: &SimpleParticles, mode: StorageMode) -> ForceAccumulators
    where E: mdforces::potentials::PairEvaluator
{
    let mut neighbors = CellListNeighbors::new(potential.max_r_cut(), mode).unwrap();
    potential.compute(0, particles, &mut neighbors).unwrap();
    return potential.accumulators().clone();
}

#[test]
fn symmetric_parameters() {
    let mut potential = lennard_jones(2.5);
    potential.set_params(1, 0, LennardJonesParameters { epsilon: 0.3, sigma: 0.7 }).unwrap();
    potential.set_r_cut(1, 0, 2.0).unwrap();
    potential.set_r_on(0, 1, 1.5).unwrap();

    assert_eq!(potential.params(0, 1).unwrap(), potential.params(1, 0).unwrap());
    assert_eq!(potential.params(0, 1).unwrap(), &LennardJonesParameters { epsilon: 0.3, sigma: 0.7 });
    assert_eq!(potential.r_cut(0, 1).unwrap(), 2.0);
    assert_eq!(potential.r_on(1, 0).unwrap(), 1.5);
}

#[test]
fn shifted_energy_is_zero_at_cutoff() {
    let rcut = 2.5;
    let distance = rcut * (1.0 - 1e-12);

    macro_rules! check_shift {
        ($evaluator: ty, $parameters: expr) => {
            let mut potential = PairPotential::<$evaluator>::new(2);
            for (a, b) in [(0, 0), (0, 1), (1, 1)] {
                potential.set_params(a, b, $parameters).unwrap();
                potential.set_r_cut(a, b, rcut).unwrap();
            }
            potential.set_shift_mode(EnergyShiftMode::Shift);

            let particles = pair(distance, 10.0);
            let mut neighbors = ExplicitNeighbors::all_pairs(2, StorageMode::Half);
            potential.compute(0, &particles, &mut neighbors).unwrap();
            let energy = potential.log_value(&potential.log_name()).unwrap();
            assert!(energy.abs() < 1e-8, "{}: energy at cutoff is {}", stringify!($evaluator), energy);

            // without shift, the energy does not vanish
            potential.set_shift_mode(EnergyShiftMode::NoShift);
            potential.compute(1, &particles, &mut neighbors).unwrap();
            assert!(potential.accumulators().total_energy().abs() > 1e-6);
        };
    }

    check_shift!(LennardJones, LennardJonesParameters { epsilon: 1.0, sigma: 1.0 });
    check_shift!(InversePower, InversePowerParameters { epsilon: 2.0, sigma: 1.0, n: 8.0 });
    check_shift!(Gaussian, GaussianParameters { epsilon: 1.0, sigma: 1.0 });
    check_shift!(Yukawa, YukawaParameters { epsilon: 1.0, kappa: 0.5 });
    check_shift!(ShiftedLennardJones, ShiftedLennardJonesParameters { epsilon: 1.0, sigma: 1.0 });
    check_shift!(ScreenedCoulomb, ScreenedCoulombParameters { kappa: 0.5 });
}

#[test]
fn xplor_continuity() {
    let (r_on, r_cut) = (2.0, 3.0);
    let parameters = InversePowerParameters { epsilon: 1.0, sigma: 1.0, n: 6.0 };

    let mut potential = PairPotential::<InversePower>::new(2);
    for (a, b) in [(0, 0), (0, 1), (1, 1)] {
        potential.set_params(a, b, parameters).unwrap();
        potential.set_r_cut(a, b, r_cut).unwrap();
        potential.set_r_on(a, b, r_on).unwrap();
    }
    potential.set_shift_mode(EnergyShiftMode::Xplor);

    // energy and force along x on the second particle
    let mut evaluate = |distance: f64| {
        let particles = pair(distance, 20.0);
        let mut neighbors = ExplicitNeighbors::all_pairs(2, StorageMode::Half);
        potential.compute(0, &particles, &mut neighbors).unwrap();
        let accumulators = potential.accumulators();
        (accumulators.total_energy(), accumulators.forces[1][0])
    };

    let delta = 1e-7;
    let (energy_below, force_below) = evaluate(r_on - delta);
    let (energy_above, force_above) = evaluate(r_on + delta);
    assert_relative_eq!(energy_below, energy_above, max_relative = 1e-5);
    assert_relative_eq!(force_below, force_above, max_relative = 1e-5);

    // the unmodified potential below r_on
    let (energy, force) = evaluate(1.5);
    assert_relative_eq!(energy, f64::powi(1.5, -6), max_relative = 1e-12);
    assert_relative_eq!(force, 6.0 * f64::powi(1.5, -7), max_relative = 1e-12);

    let (energy, force) = evaluate(r_cut - delta);
    assert!(energy.abs() < 1e-12);
    assert!(force.abs() < 1e-10);

    // force is minus the derivative of the energy in the switching region
    for &r in &[2.1, 2.4, 2.8] {
        let h = 1e-6;
        let (energy_plus, _) = evaluate(r + h);
        let (energy_minus, _) = evaluate(r - h);
        let (_, force) = evaluate(r);
        assert_relative_eq!(force, -(energy_plus - energy_minus) / (2.0 * h), max_relative = 1e-5);
    }
}

#[test]
fn half_and_full_lists_energies() {
    let particles = liquid(6, 1.2);
    let mut potential = lennard_jones(2.5);

    let half = compute(&mut potential, &particles, StorageMode::Half);
    let full = compute(&mut potential, &particles, StorageMode::Full);

    assert_relative_eq!(half.total_energy(), full.total_energy(), max_relative = 1e-10);
    assert_relative_eq!(half.total_virial(), full.total_virial(), max_relative = 1e-10);
    for i in 0..particles.size().unwrap() {
        assert_relative_eq!(half.forces[i], full.forces[i], epsilon = 1e-8);
        assert_relative_eq!(half.energies[i], full.energies[i], epsilon = 1e-10);
    }
}

#[test]
fn third_law() {
    let particles = liquid(5, 1.1);
    let mut potential = lennard_jones(2.5);

    let accumulators = compute(&mut potential, &particles, StorageMode::Half);
    let total = accumulators.total_force();
    assert!(total.norm() < 1e-8, "total force is {:?}", total);

    // each pair gives opposite forces to its two particles
    for i in 0..4 {
        for j in (i + 1)..4 {
            let mut two = SimpleParticles::new(particles.cell().unwrap(), &["A", "B"]);
            for &index in &[i, j] {
                let position = particles.positions().unwrap()[index];
                two.add_particle(Particle::new(particles.types().unwrap()[index], position)).unwrap();
            }

            let mut neighbors = ExplicitNeighbors::all_pairs(2, StorageMode::Half);
            potential.compute(0, &two, &mut neighbors).unwrap();
            let forces = &potential.accumulators().forces;
            assert_eq!(forces[0], -forces[1]);
        }
    }
}

#[test]
fn periodic_wrap() {
    let mut particles = SimpleParticles::new(UnitCell::cubic(10.0), &["A"]);
    particles.add_particle(Particle::new(0, Vector3D::new(0.1, 5.0, 5.0))).unwrap();
    particles.add_particle(Particle::new(0, Vector3D::new(9.9, 5.0, 5.0))).unwrap();

    let parameters = GaussianParameters { epsilon: 1.0, sigma: 0.5 };
    let mut potential = PairPotential::<Gaussian>::new(1);
    potential.set_params(0, 0, parameters).unwrap();

    let mut neighbors = ExplicitNeighbors::all_pairs(2, StorageMode::Half);

    // wrapped distance is 0.2, the raw distance is 9.8
    potential.set_r_cut(0, 0, 1.0).unwrap();
    potential.compute(0, &particles, &mut neighbors).unwrap();
    let accumulators = potential.accumulators();
    let force = accumulators.forces[0];
    assert!(force[0] > 0.0, "force should push the first particle towards +x, got {:?}", force);
    assert_eq!(accumulators.forces[1], -force);
    assert_relative_eq!(
        accumulators.total_energy(),
        f64::exp(-0.5 * 0.2 * 0.2 / (0.5 * 0.5)),
        max_relative = 1e-10
    );

    // no interaction with a cutoff smaller than the wrapped distance
    potential.set_r_cut(0, 0, 0.15).unwrap();
    potential.compute(1, &particles, &mut neighbors).unwrap();
    let accumulators = potential.accumulators();
    assert_eq!(accumulators.forces[0], Vector3D::zero());
    assert_eq!(accumulators.total_energy(), 0.0);
}

#[test]
fn out_of_range_types() {
    let mut potential = lennard_jones(2.5);
    let parameters = LennardJonesParameters { epsilon: 1.0, sigma: 1.0 };

    for error in [
        potential.set_params(2, 0, parameters).unwrap_err(),
        potential.set_r_cut(0, 7, 1.0).unwrap_err(),
        potential.set_r_on(2, 2, 1.0).unwrap_err(),
        potential.r_cut(0, 2).unwrap_err(),
    ] {
        assert!(matches!(error, Error::UnknownType { types_count: 2, .. }));
    }

    // particles with a type outside of the potential table
    let mut particles = SimpleParticles::new(UnitCell::cubic(10.0), &["A", "B", "C"]);
    particles.add_particle(Particle::new(2, Vector3D::zero())).unwrap();
    particles.add_particle(Particle::new(0, Vector3D::new(1.0, 0.0, 0.0))).unwrap();

    let mut neighbors = ExplicitNeighbors::all_pairs(2, StorageMode::Half);
    let error = potential.compute(0, &particles, &mut neighbors).unwrap_err();
    assert_eq!(error.to_string(), "unknown particle type 2, there are only 2 types");
}

#[test]
fn parallel_matches_sequential() {
    let particles = liquid(7, 1.15);

    for mode in [StorageMode::Half, StorageMode::Full] {
        let mut potential = lennard_jones(2.5);
        let sequential = compute(&mut potential, &particles, mode);

        potential.set_parallel(true);
        let parallel = compute(&mut potential, &particles, mode);

        assert_relative_eq!(sequential.total_energy(), parallel.total_energy(), max_relative = 1e-10);
        for i in 0..particles.size().unwrap() {
            assert_relative_eq!(sequential.forces[i], parallel.forces[i], epsilon = 1e-8);
            assert_relative_eq!(sequential.virials[i], parallel.virials[i], epsilon = 1e-8);
        }
    }
}

#[test]
fn diameters_and_charges() {
    let particles = liquid(4, 1.3);

    let mut slj = PairPotential::<ShiftedLennardJones>::new(2);
    let mut coulomb = PairPotential::<ScreenedCoulomb>::new(2);
    for (a, b) in [(0, 0), (0, 1), (1, 1)] {
        slj.set_params(a, b, ShiftedLennardJonesParameters { epsilon: 1.0, sigma: 1.0 }).unwrap();
        slj.set_r_cut(a, b, 2.5).unwrap();
        coulomb.set_params(a, b, ScreenedCoulombParameters { kappa: 1.0 }).unwrap();
        coulomb.set_r_cut(a, b, 2.5).unwrap();
    }

    let slj = compute(&mut slj, &particles, StorageMode::Full);
    let coulomb = compute(&mut coulomb, &particles, StorageMode::Full);
    assert!(slj.total_energy().is_finite());
    assert!(coulomb.total_energy().is_finite());
    assert!(slj.total_force().norm() < 1e-8);
    assert!(coulomb.total_force().norm() < 1e-8);
}

#[test]
fn virial() {
    let particles = liquid(5, 1.2);
    let mut potential = lennard_jones(2.5);
    let accumulators = compute(&mut potential, &particles, StorageMode::Half);

    let tensor = accumulators.total_virial_tensor();
    assert_relative_eq!(tensor.trace(), 3.0 * accumulators.total_virial(), max_relative = 1e-10);
    // the virial tensor is symmetric
    for i in 0..3 {
        for j in 0..3 {
            assert_relative_eq!(tensor[i][j], tensor[j][i], max_relative = 1e-10, epsilon = 1e-12);
        }
    }
}

#[test]
fn registry() {
    let particles = liquid(5, 1.2);
    let parameters = r#"{
        "shift_mode": "xplor",
        "parallel": true,
        "pairs": [
            {"types": [0, 0], "r_cut": 2.5, "r_on": 2.0, "parameters": {"epsilon": 1.0, "sigma": 1.0}},
            {"types": [0, 1], "r_cut": 2.5, "r_on": 2.0, "parameters": {"epsilon": 0.8, "sigma": 0.9}},
            {"types": [1, 1], "r_cut": 2.5, "r_on": 2.0, "parameters": {"epsilon": 0.5, "sigma": 1.1}}
        ]
    }"#;
    let mut force_compute = ForceCompute::new("lj", 2, parameters).unwrap();

    let mut potential = lennard_jones(2.5);
    for (a, b) in [(0, 0), (0, 1), (1, 1)] {
        potential.set_r_on(a, b, 2.0).unwrap();
    }
    potential.set_shift_mode(EnergyShiftMode::Xplor);
    let expected = compute(&mut potential, &particles, StorageMode::Half);

    let mut neighbors = CellListNeighbors::new(force_compute.max_cutoff(), StorageMode::Half).unwrap();
    force_compute.compute(0, &particles, &mut neighbors).unwrap();

    let energy = force_compute.log_value("pair_lj_energy").unwrap();
    assert_relative_eq!(energy, expected.total_energy(), max_relative = 1e-10);
    assert_eq!(force_compute.accumulators().len(), particles.size().unwrap());
}
