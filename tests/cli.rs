use std::fs;

use assert_cmd::Command;
use tempfile::tempdir;

const CONFIG: &str = r#"{
    "grid_width": 10,
    "grid_height": 10,
    "density": 1.0,
    "initial_infected": 1.0,
    "recovery_period": 1,
    "infect_rate": 0.1,
    "critical_rate": 0.0,
    "hospital_capacity_rate": 0.5,
    "immunity_chance": 1.0,
    "quarantine_rate": 0.0,
    "hospital_period": 10,
    "die_in_hospital_rate": 0.0,
    "lockdown_policy": {"kind": "never"},
    "cycles": 3
}"#;

#[test]
fn runs_and_writes_report() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("params.json");
    fs::write(&config, CONFIG).unwrap();
    let output_dir = temp_dir.path().join("output");

    Command::cargo_bin("epigrid")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success()
        .stdout("Population: 100\nFree beds in the hospital: 10\nTotal deaths: 0\n");

    let report = fs::read_to_string(output_dir.join("history.csv")).unwrap();
    assert_eq!(
        report,
        "cycle,active_cases,deaths,immune,hospitalized,lockdown\n\
         0,100,0,0,0,false\n\
         1,0,0,100,0,false\n\
         2,0,0,100,0,false\n"
    );
}

#[test]
fn existing_report_requires_force_overwrite() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("params.json");
    fs::write(&config, CONFIG).unwrap();
    fs::write(temp_dir.path().join("history.csv"), "").unwrap();

    let run = |force: bool| {
        let mut command = Command::cargo_bin("epigrid").unwrap();
        command
            .arg("-c")
            .arg(&config)
            .arg("-o")
            .arg(temp_dir.path());
        if force {
            command.arg("--force-overwrite");
        }
        command.assert()
    };
    run(false).failure();
    run(true).success();
}

#[test]
fn invalid_parameters_fail_before_running() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("params.json");
    fs::write(&config, CONFIG.replace("\"infect_rate\": 0.1", "\"infect_rate\": 1.1")).unwrap();

    let assert = Command::cargo_bin("epigrid")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("invalid parameter `infect_rate`"), "{stderr}");
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn missing_parameter_is_named() {
    let temp_dir = tempdir().unwrap();
    let config = temp_dir.path().join("params.json");
    fs::write(&config, CONFIG.replace("\"hospital_period\": 10,", "")).unwrap();

    let assert = Command::cargo_bin("epigrid")
        .unwrap()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("missing parameter `hospital_period`"), "{stderr}");
}
