//! File round trips through the CLI command implementations.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bonemirror-tests --test cli_roundtrip
//! ```

use std::process::ExitCode;

use bonemirror_cli::commands::{mirror, pairs, rules};
use bonemirror_cli::input::{load_pose, load_skeleton, PoseDocument};
use bonemirror_core::MirrorPlane;
use bonemirror_tests::{arm_rig, authored_rig, FileFixture};
use glam::Vec3;
use pretty_assertions::assert_eq;

const ARM_POSE: &str = r#"{
    "bones": {
        "Arm_L": { "translation": [0.6, 0.0, 0.2] }
    },
    "curves": { "Smile_L": 0.8, "Smile_R": 0.2 }
}"#;

#[test]
fn skeleton_document_roundtrip() {
    let fixture = FileFixture::new();
    let path = fixture.write_skeleton("rig.json", &authored_rig());
    assert_eq!(load_skeleton(&path).unwrap(), authored_rig());
}

#[test]
fn mirror_writes_output_file() {
    let fixture = FileFixture::new();
    let skeleton = fixture.write_skeleton("rig.json", &arm_rig());
    let pose = fixture.write("pose.json", ARM_POSE);
    let config = fixture.write("mirror.yaml", "search_replace_pairs: \"_L,_R\"\n");
    let out = fixture.path("out.json");

    let code = mirror::run(
        skeleton.to_str().unwrap(),
        pose.to_str().unwrap(),
        Some(config.to_str().unwrap()),
        None,
        Some(out.to_str().unwrap()),
        true,
    )
    .unwrap();
    assert_eq!(code, ExitCode::SUCCESS);

    let mirrored = load_pose(&out).unwrap();
    assert!(mirrored.bones["Arm_R"]
        .translation
        .abs_diff_eq(Vec3::new(-0.6, 0.0, 0.2), 1.0e-5));
    assert!(mirrored.bones["Arm_L"]
        .translation
        .abs_diff_eq(Vec3::new(0.5, 0.0, 0.2), 1.0e-5));
    assert_eq!(mirrored.curves.get("Smile_L"), Some(0.2));
    assert_eq!(mirrored.curves.get("Smile_R"), Some(0.8));
    assert_eq!(mirrored.bones.len(), 4);
}

#[test]
fn mirror_output_mirrors_back() {
    let fixture = FileFixture::new();
    let skeleton = fixture.write_skeleton("rig.json", &arm_rig());
    let pose = fixture.write("pose.json", ARM_POSE);
    let once = fixture.path("once.json");
    let twice = fixture.path("twice.json");

    for (input, output) in [(&pose, &once), (&once, &twice)] {
        mirror::run(
            skeleton.to_str().unwrap(),
            input.to_str().unwrap(),
            None,
            Some(MirrorPlane::Yz),
            Some(output.to_str().unwrap()),
            false,
        )
        .unwrap();
    }

    let original: PoseDocument = serde_json::from_str(ARM_POSE).unwrap();
    let restored = load_pose(&twice).unwrap();
    assert!(restored.bones["Arm_L"]
        .approx_eq(&original.bones["Arm_L"], 1.0e-5));
    assert_eq!(restored.curves, original.curves);
}

#[test]
fn commands_report_missing_files() {
    let fixture = FileFixture::new();
    let missing = fixture.path("missing.json");
    let err = pairs::run(missing.to_str().unwrap(), None, None, true).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load skeleton"));

    let skeleton = fixture.write_skeleton("rig.json", &arm_rig());
    let err = rules::run(
        skeleton.to_str().unwrap(),
        Some(missing.to_str().unwrap()),
        None,
        false,
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to load config"));
}

#[test]
fn pairs_and_rules_succeed() {
    let fixture = FileFixture::new();
    let skeleton = fixture.write_skeleton("rig.json", &authored_rig());
    let path = skeleton.to_str().unwrap();

    assert_eq!(pairs::run(path, None, None, false).unwrap(), ExitCode::SUCCESS);
    assert_eq!(pairs::run(path, None, Some(MirrorPlane::Xz), true).unwrap(), ExitCode::SUCCESS);
    assert_eq!(rules::run(path, None, None, true).unwrap(), ExitCode::SUCCESS);
}

#[test]
fn invalid_skeleton_is_rejected() {
    let fixture = FileFixture::new();
    let path = fixture.write(
        "bad.json",
        r#"{ "bones": [ { "name": "a", "parent": 3 } ] }"#,
    );
    let err = load_skeleton(&path).unwrap_err();
    assert!(err.to_string().contains("invalid parent"), "{err}");
}
