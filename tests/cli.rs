use std::process::Command;

fn is_lower_hex_64(value: &str) -> bool {
    value.len() == 64
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[test]
fn test_cli_prints_fingerprint() {
    let output = Command::new(env!("CARGO_BIN_EXE_machine-fingerprint"))
        .env_remove("MACHINE_FINGERPRINT_DEBUG")
        .output()
        .expect("failed to run binary");

    assert!(output.status.success(), "binary exited with {}", output.status);
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert!(stdout.ends_with('\n'));
    let fingerprint = stdout.trim_end();
    assert!(is_lower_hex_64(fingerprint), "unexpected output: {:?}", stdout);
}

#[test]
fn test_cli_is_stable_across_runs() {
    let run = || {
        let output = Command::new(env!("CARGO_BIN_EXE_machine-fingerprint"))
            .output()
            .expect("failed to run binary");
        String::from_utf8_lossy(&output.stdout).to_string()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_cli_version_flag() {
    let output = Command::new(env!("CARGO_BIN_EXE_machine-fingerprint"))
        .arg("--version")
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_rejects_unknown_arguments() {
    let output = Command::new(env!("CARGO_BIN_EXE_machine-fingerprint"))
        .arg("--salt")
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}
