use mdforces::{ForceCompute, Loggable, ParticleData, Updater, Variant};
use mdforces::{SimpleParticles, Particle, UnitCell, Vector3D, StorageMode};
use mdforces::neighbors::CellListNeighbors;
use mdforces::updaters::{Direction, FlowParameters, MomentumExchangeFlow};
use mdforces::updaters::{ActiveRotationalDiffusion, RotationalDiffusionParameters};

/// Run a short simulation of a Lennard-Jones liquid, with a momentum exchange
/// flow and rotational diffusion of the particles orientation
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // enable collection of profiling data
    time_graph::enable_data_collection(true);
    time_graph::clear_collected_data();

    let mut particles = liquid(10, 1.1)?;
    let parameters = r#"{
        "shift_mode": "xplor",
        "parallel": true,
        "pairs": [
            {"types": [0, 0], "r_cut": 2.5, "r_on": 2.0, "parameters": {"epsilon": 1.0, "sigma": 1.0}},
            {"types": [0, 1], "r_cut": 2.5, "r_on": 2.0, "parameters": {"epsilon": 1.0, "sigma": 0.9}},
            {"types": [1, 1], "r_cut": 2.5, "r_on": 2.0, "parameters": {"epsilon": 0.5, "sigma": 0.8}}
        ]
    }"#;
    let mut forces = ForceCompute::new("lj", 2, parameters)?;
    let mut neighbors = CellListNeighbors::with_buffer(forces.max_cutoff(), 0.3, StorageMode::Half)?;

    let mut flow = MomentumExchangeFlow::new(FlowParameters {
        flow_target: Variant::Ramp { a: 0.0, b: 1.0, t_start: 0, t_ramp: 1000 },
        slab_direction: Direction::Z,
        flow_direction: Direction::X,
        n_slabs: 10,
        min_slab: 0,
        max_slab: 5,
        flow_epsilon: 1e-2,
        group: Default::default(),
    })?;

    let mut diffusion = ActiveRotationalDiffusion::new(RotationalDiffusionParameters {
        rotational_diffusion: Variant::from(0.1),
        time_step: 0.005,
        seed: 12345,
        dimensions: 3,
        active_directions: vec![Vector3D::new(1.0, 0.0, 0.0); 2],
        group: Default::default(),
    })?;

    let time_step = 0.005;
    forces.compute(0, &particles, &mut neighbors)?;
    for step in 1..=200 {
        time_graph::spanned!("integration", {
            velocity_verlet(&mut particles, &mut forces, &mut neighbors, step, time_step)?;
        });

        flow.update(step, &mut particles)?;
        diffusion.update(step, &mut particles)?;

        if step % 50 == 0 {
            println!(
                "step {}: potential energy = {:.4}, exchanged momentum = {:.4}",
                step,
                forces.log_value("pair_lj_energy")?,
                flow.log_value("mueller_plathe_exchanged_momentum")?,
            );
        }
    }

    // this requires the "table" feature for the time_graph crate
    let graph = time_graph::get_full_graph();
    println!("{}", graph.as_short_table());

    Ok(())
}

fn liquid(n: usize, spacing: f64) -> Result<SimpleParticles, mdforces::Error> {
    let mut particles = SimpleParticles::new(UnitCell::cubic(n as f64 * spacing), &["A", "B"]);
    let mut index = 0;
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let position = spacing * Vector3D::new(i as f64, j as f64, k as f64);
                particles.add_particle(Particle::new(index % 2, position))?;
                index += 1;
            }
        }
    }
    Ok(particles)
}

/// One velocity Verlet step, using the forces from the previous step
fn velocity_verlet(
    particles: &mut SimpleParticles,
    forces: &mut ForceCompute,
    neighbors: &mut CellListNeighbors,
    step: u64,
    time_step: f64,
) -> Result<(), mdforces::Error> {
    let masses = particles.masses()?.to_vec();
    let cell = particles.cell()?;

    let half_kick = |particles: &mut SimpleParticles, forces: &ForceCompute| -> Result<(), mdforces::Error> {
        let velocities = particles.velocities_mut()?;
        for (i, velocity) in velocities.iter_mut().enumerate() {
            *velocity += 0.5 * time_step / masses[i] * forces.accumulators().forces[i];
        }
        Ok(())
    };

    half_kick(particles, forces)?;

    let velocities = particles.velocities()?.to_vec();
    for (position, velocity) in particles.positions_mut().iter_mut().zip(&velocities) {
        *position += time_step * velocity;
        cell.wrap_vector(position);
    }

    forces.compute(step, &*particles, neighbors)?;
    half_kick(particles, forces)?;

    Ok(())
}
