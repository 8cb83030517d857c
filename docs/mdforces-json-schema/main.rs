use std::path::PathBuf;

use schemars::schema::{RootSchema, SchemaObject};
use schemars::visit::Visitor;

use mdforces::Variant;
use mdforces::potentials::PairPotentialParameters;
use mdforces::potentials::evaluators::{LennardJonesParameters, InversePowerParameters};
use mdforces::potentials::evaluators::{GaussianParameters, YukawaParameters};
use mdforces::potentials::evaluators::{ShiftedLennardJonesParameters, ScreenedCoulombParameters};
use mdforces::external::{LinearFieldParameters, SphericalWall};
use mdforces::updaters::{FlowParameters, RotationalDiffusionParameters};


macro_rules! generate_schema {
    ($Type: ty) => {
        generate_schema!(stringify!($Type), $Type)
    };
    ($name: expr, $Type: ty) => {
        save_schema($name, schemars::schema_for!($Type))
    };
}

/// Generic types get names like `PairEntry_for_LennardJonesParameters` in the
/// generated schema. Each schema is saved in a separate file, so we can use
/// the shorter name instead.
#[derive(Clone)]
struct RemoveGenericSuffix;

impl RemoveGenericSuffix {
    fn rename(name: &str) -> Option<String> {
        name.find("_for_").map(|position| name[..position].to_owned())
    }
}

impl Visitor for RemoveGenericSuffix {
    fn visit_schema_object(&mut self, schema: &mut SchemaObject) {
        if let Some(reference) = &schema.reference {
            if let Some(definition) = reference.strip_prefix("#/definitions/") {
                if let Some(renamed) = RemoveGenericSuffix::rename(definition) {
                    schema.reference = Some(format!("#/definitions/{}", renamed));
                }
            }
        }
        schemars::visit::visit_schema_object(self, schema);
    }
}

fn save_schema(name: &str, mut schema: RootSchema) {
    // Step 1: rename the definitions
    let generics = schema.definitions.keys()
        .filter(|name| RemoveGenericSuffix::rename(name).is_some())
        .cloned()
        .collect::<Vec<_>>();

    for in_code in generics {
        let in_docs = RemoveGenericSuffix::rename(&in_code).expect("this name should contain a suffix");
        let value = schema.definitions.remove(&in_code).expect("missing definition");
        assert!(!schema.definitions.contains_key(&in_docs));
        schema.definitions.insert(in_docs, value);
    }

    // Step 2: rename the references to these definitions
    RemoveGenericSuffix.visit_root_schema(&mut schema);
    schema.schema.metadata().title = Some(name.into());

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.push("build");
    path.push("json-schemas");
    std::fs::create_dir_all(&path).expect("failed to create JSON schema directory");

    path.push(format!("{}.json", name));

    let schema = serde_json::to_string_pretty(&schema).expect("failed to create JSON schema");
    std::fs::write(path, schema).expect("failed to save JSON schema to file");
}

fn main() {
    generate_schema!("lj", PairPotentialParameters<LennardJonesParameters>);
    generate_schema!("inverse_power", PairPotentialParameters<InversePowerParameters>);
    generate_schema!("gauss", PairPotentialParameters<GaussianParameters>);
    generate_schema!("yukawa", PairPotentialParameters<YukawaParameters>);
    generate_schema!("slj", PairPotentialParameters<ShiftedLennardJonesParameters>);
    generate_schema!("screened_coulomb", PairPotentialParameters<ScreenedCoulombParameters>);

    generate_schema!(LinearFieldParameters);
    generate_schema!(SphericalWall);
    generate_schema!(FlowParameters);
    generate_schema!(RotationalDiffusionParameters);
    generate_schema!(Variant);
}
