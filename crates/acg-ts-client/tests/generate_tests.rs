use acg_core::reporter::SilentReporter;
use acg_core::transform::extract;
use acg_core::{CodeGenerator, WritePolicy, parse};
use acg_ts_client::{EmitConfig, TsClientGenerator};

const PETSTORE: &str = include_str!("fixtures/petstore.yaml");

fn config(force: bool) -> EmitConfig {
    EmitConfig {
        generated_at: "2024-01-01T00:00:00Z".to_string(),
        force,
        ..EmitConfig::default()
    }
}

fn generate(config: &EmitConfig) -> Vec<acg_core::GeneratedFile> {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let ops = extract(&spec, &SilentReporter);
    TsClientGenerator.generate(&ops, config).unwrap()
}

fn file<'a>(files: &'a [acg_core::GeneratedFile], path: &str) -> &'a str {
    &files.iter().find(|f| f.path == path).unwrap().content
}

#[test]
fn generates_all_modules_with_policies() {
    let files = generate(&config(false));
    let layout: Vec<(&str, WritePolicy)> =
        files.iter().map(|f| (f.path.as_str(), f.policy)).collect();
    assert_eq!(
        layout,
        vec![
            ("operations.ts", WritePolicy::Always),
            ("errors.ts", WritePolicy::Always),
            ("instance.ts", WritePolicy::Always),
            ("helpers.ts", WritePolicy::IfMissing),
            ("client.ts", WritePolicy::IfMissing),
            ("index.ts", WritePolicy::Always),
        ]
    );
}

#[test]
fn force_rewrites_editable_files() {
    let files = generate(&config(true));
    assert!(files.iter().all(|f| f.policy == WritePolicy::Always));
}

#[test]
fn petstore_accessors_in_extraction_order() {
    let files = generate(&config(false));
    let ops = file(&files, "operations.ts");

    let positions: Vec<usize> = [
        "    listPets: ",
        "    createPet: ",
        "    getPet: ",
        "    touchPet: ",
        "    uploadPetPhoto: ",
        "    assignPet: ",
    ]
    .iter()
    .map(|key| ops.find(key).unwrap_or_else(|| panic!("missing {key}")))
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(!ops.contains("petsOptions"));

    assert!(ops.contains(
        r#"client.patch<TouchPetResponse>("/pets/{pet_id}", undefined, pathParams, config)"#
    ));
    assert!(ops.contains(
        "export type AssignPetPathParams = { ownerId: string | number; petId: string | number };"
    ));
    assert!(ops.contains(
        r#""post /pets/{pet_id}/photos": { profileImage: "file", extraPhotos: "files" },"#
    ));
    assert!(ops.contains("    /** Bump the pet's updated-at */\n    touchPet: "));
    assert!(ops.contains("    /** Move a pet to another owner. */\n    assignPet: "));
}

#[test]
fn output_is_deterministic_for_a_frozen_timestamp() {
    let a = generate(&config(false));
    let b = generate(&config(false));
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.content, y.content, "{} differs", x.path);
    }
}

#[test]
fn timestamp_is_the_only_varying_content() {
    let a = generate(&config(false));
    let mut later = config(false);
    later.generated_at = "2030-12-31T23:59:59Z".to_string();
    let b = generate(&later);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(
            x.content.replace("2024-01-01T00:00:00Z", "<ts>"),
            y.content.replace("2030-12-31T23:59:59Z", "<ts>"),
            "{}",
            x.path
        );
    }
}
