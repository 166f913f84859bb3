//! End-to-end tests for planetgen and the pg binary

use std::io::Write;
use std::sync::Arc;

use approx::assert_relative_eq;
use assert_cmd::Command;
use exodata::{ExoplanetTable, MASS_COLUMN, PERIOD_COLUMN};
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

use planetgen::physics::SamplerSource;
use planetgen::transcript::read_transcript;
use planetgen::{
    FeatureTags, FixedClassifier, MidpointSampler, PlanetAssistant, PlanetError, PlanetType, SessionManager,
    SessionOptions, Size, Temperature, TranscriptEvent, TranscriptLogger,
};

// Upper quartiles: mass [8, 12], period [400, 800] days
const MASSES: [f64; 5] = [1.0, 2.0, 3.0, 8.0, 12.0];
const PERIODS: [f64; 5] = [100.0, 200.0, 300.0, 400.0, 800.0];

fn table() -> ExoplanetTable {
    ExoplanetTable::from_columns([(MASS_COLUMN, MASSES.to_vec()), (PERIOD_COLUMN, PERIODS.to_vec())])
}

fn blue_ice_giant() -> FeatureTags {
    FeatureTags::new(Size::Large, Temperature::Cold, PlanetType::Icy, "blue")
}

fn dataset_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "pl_name,{},{}", MASS_COLUMN, PERIOD_COLUMN).unwrap();
    for (i, (mass, period)) in MASSES.iter().zip(PERIODS.iter()).enumerate() {
        writeln!(file, "p{},{},{}", i, mass, period).unwrap();
    }
    file
}

/// pg with config, data and logs isolated in `home`
fn pg(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pg").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("NO_COLOR", "1")
        .env_remove("OPENAI_API_KEY");
    cmd
}

#[tokio::test]
async fn test_midpoint_scenario_end_to_end() {
    let classifier = Arc::new(FixedClassifier::new(blue_ice_giant()));
    let mut assistant = PlanetAssistant::new(classifier, Box::new(MidpointSampler));

    let params = assistant
        .start_conversation("a big frozen blue world", &table())
        .await
        .unwrap()
        .clone();

    assert_relative_eq!(params.mass_earth_masses, 10.0);
    assert_relative_eq!(params.orbital_period_years, 1.64);
    assert_relative_eq!(params.gravity_g, 2.16, epsilon = 0.011);
    assert!(params.orbital_distance_au > 1000.0);
    assert!(!params.habitable);

    assistant.continue_conversation("a thin ring system").unwrap();
    assistant.continue_conversation("two small moons.").unwrap();

    let prompt = assistant.finalize_conversation().unwrap();
    assert!(prompt.starts_with("Generate an artistic and realistic image of a large icy planet."));
    assert!(prompt.contains("The planet is blue"));
    assert!(prompt.contains("<250K"));
    assert!(prompt.contains("The planet is outside the habitable zone."));
    assert!(prompt.ends_with("It also includes a thin ring system, two small moons."));
    assert!(!prompt.contains("1.64"));
    assert!(!prompt.contains("10"));

    // Finalizing does not end the conversation
    assert_eq!(assistant.finalize_conversation().unwrap(), prompt);
}

#[tokio::test]
async fn test_continue_before_start_fails() {
    let classifier = Arc::new(FixedClassifier::new(blue_ice_giant()));
    let mut assistant = PlanetAssistant::new(classifier, Box::new(MidpointSampler));

    assert!(matches!(
        assistant.continue_conversation("rings"),
        Err(PlanetError::NoActiveConversation)
    ));
    assert!(matches!(
        assistant.finalize_conversation(),
        Err(PlanetError::NoActiveConversation)
    ));
}

#[tokio::test]
async fn test_session_manager_writes_transcript() {
    let dir = TempDir::new().unwrap();
    let options = SessionOptions {
        samplers: SamplerSource::from_seed(Some(42)),
        transcript: Some(TranscriptLogger::new(dir.path())),
        ..SessionOptions::default()
    };
    let manager = SessionManager::spawn(
        Arc::new(table()),
        Arc::new(FixedClassifier::new(blue_ice_giant())),
        options,
    );

    let id = manager.create_session().await.unwrap();
    let params = manager.start(&id, "an ice giant").await.unwrap();
    assert!((8.0..=12.0).contains(&params.mass_earth_masses));
    manager.continue_session(&id, "aurora at the poles").await.unwrap();
    let prompt = manager.finalize(&id).await.unwrap();
    assert!(prompt.contains("It also includes aurora at the poles."));
    manager.shutdown().await.unwrap();

    let entries = read_transcript(dir.path(), &id).unwrap();
    let kinds: Vec<_> = entries.iter().map(|e| e.event.event_type()).collect();
    assert_eq!(kinds, vec!["started", "continued", "finalized"]);
    match &entries[2].event {
        TranscriptEvent::Finalized { prompt: logged } => assert_eq!(logged, &prompt),
        other => panic!("unexpected event: {:?}", other),
    }
}

#[test]
fn test_estimate_prints_prompt_offline() {
    let home = TempDir::new().unwrap();
    let data = dataset_file();
    pg(&home)
        .args(["estimate", "--size", "large", "--temperature", "cold", "--type", "icy"])
        .args(["--color", "blue", "-a", "rings", "--seed", "3", "--dataset"])
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Planet: large icy planet, blue"))
        .stdout(predicate::str::contains("image of a large icy planet"))
        .stdout(predicate::str::contains("It also includes rings."));
}

#[test]
fn test_estimate_json_output() {
    let home = TempDir::new().unwrap();
    let data = dataset_file();
    let output = pg(&home)
        .args(["estimate", "--size", "small", "--type", "rocky", "--format", "json", "--dataset"])
        .arg(data.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["parameters"]["size"], "small");
    assert_eq!(report["parameters"]["type"], "rocky");
    assert_eq!(report["parameters"]["color"], "unknown");
    assert_eq!(report["parameters"]["temperature_band"], "250K-350K");
    let mass = report["parameters"]["mass_earth_masses"].as_f64().unwrap();
    assert!((1.0..=2.0).contains(&mass));
    assert!(report["prompt"].as_str().unwrap().contains("small rocky planet"));
    assert!(report.get("image").is_none());
}

#[test]
fn test_estimate_missing_dataset_fails() {
    let home = TempDir::new().unwrap();
    pg(&home)
        .args(["estimate", "--size", "small", "--type", "rocky", "--dataset", "nope.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load dataset"));
}

#[test]
fn test_generate_requires_api_key() {
    let home = TempDir::new().unwrap();
    pg(&home)
        .args(["generate", "a red desert world"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_generate_with_image_records_transcript() {
    let home = TempDir::new().unwrap();
    let data = dataset_file();
    let transcripts = home.path().join("transcripts");

    let mut server = mockito::Server::new();
    let reply = serde_json::json!({"planet_size": "large", "temperature": "cold", "type": "icy", "color": "blue"});
    let chat = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": reply.to_string()}, "finish_reason": "stop"}],
                "usage": {"prompt_tokens": 30, "completion_tokens": 20}
            })
            .to_string(),
        )
        .create();
    let images = server
        .mock("POST", "/v1/images/generations")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data":[{"url":"https://img.example/ice-giant.png"}]}"#)
        .create();

    let config = home.path().join("planetgen.yml");
    std::fs::write(
        &config,
        format!(
            "llm:\n  base-url: {}\n  max-retries: 0\ntranscript:\n  enabled: true\n  dir: {}\n",
            server.url(),
            transcripts.display()
        ),
    )
    .unwrap();

    pg(&home)
        .env("OPENAI_API_KEY", "test-key")
        .args(["generate", "a big frozen blue world", "--image", "--seed", "1", "--config"])
        .arg(&config)
        .arg("--dataset")
        .arg(data.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("image of a large icy planet"))
        .stdout(predicate::str::contains("Image: https://img.example/ice-giant.png"));

    chat.assert();
    images.assert();

    let files: Vec<_> = std::fs::read_dir(&transcripts).unwrap().map(|e| e.unwrap().path()).collect();
    assert_eq!(files.len(), 1);
    let id = files[0].file_stem().unwrap().to_string_lossy().to_string();
    let entries = read_transcript(&transcripts, &id).unwrap();
    let kinds: Vec<_> = entries.iter().map(|e| e.event.event_type()).collect();
    assert_eq!(kinds, vec!["started", "finalized", "image_generated"]);
    match (&entries[1].event, &entries[2].event) {
        (TranscriptEvent::Finalized { prompt }, TranscriptEvent::ImageGenerated { prompt: imaged, image_url }) => {
            assert_eq!(prompt, imaged);
            assert_eq!(image_url, "https://img.example/ice-giant.png");
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[test]
fn test_zone_verdicts() {
    let home = TempDir::new().unwrap();
    pg(&home)
        .args(["zone", "1.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 AU is habitable"));

    pg(&home)
        .args(["zone", "5.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5.2 AU is not habitable"));
}
