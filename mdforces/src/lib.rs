#![warn(clippy::all, clippy::pedantic)]

// disable some style lints
#![allow(clippy::needless_return, clippy::must_use_candidate, clippy::comparison_chain)]
#![allow(clippy::redundant_field_names, clippy::redundant_closure_for_method_calls)]
#![allow(clippy::unreadable_literal, clippy::option_if_let_else, clippy::range_plus_one)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc, clippy::module_name_repetitions)]

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap, clippy::cast_lossless, clippy::cast_sign_loss)]
#![allow(clippy::default_trait_access, clippy::many_single_char_names)]

// Tests lints
#![cfg_attr(test, allow(clippy::float_cmp))]

pub mod types;
pub use types::*;

mod errors;
pub use self::errors::Error;
pub(crate) use self::errors::check_type;

pub mod systems;
pub use systems::{ParticleData, SimpleParticles, Particle, UnitCell};

pub mod neighbors;
pub use neighbors::{NeighborProvider, StorageMode};

mod communicator;
pub use communicator::{Communicator, SingleProcess, LocalCommunicator, Extremum};

mod variant;
pub use variant::Variant;

mod loggable;
pub use loggable::Loggable;

pub mod potentials;

mod force_compute;
pub use force_compute::{ForceCompute, ForceComputeBase};

pub mod external;
pub use external::ExternalPotential;

pub mod updaters;
pub use updaters::{Updater, ParticleGroup};
