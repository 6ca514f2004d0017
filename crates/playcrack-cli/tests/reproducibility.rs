use std::fs;
use std::process::Command;

// Two cracks with the same RNG seed must report the same key and score.
#[test]
fn seeded_cracks_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("plain.txt");
    fs::write(
        &plain,
        "Whenever I find myself growing grim about the mouth, whenever it \
         is a damp drizzly November in my soul, I account it high time to \
         get to sea as soon as I can.",
    )
    .unwrap();

    let out = Command::new(env!("CARGO_BIN_EXE_playcrack"))
        .args(["encrypt", "--keyword", "whale"])
        .args(["--input", plain.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let cipher = dir.path().join("cipher.txt");
    fs::write(&cipher, String::from_utf8_lossy(&out.stdout).trim()).unwrap();

    let table = dir.path().join("bigrams.txt");
    let out = Command::new(env!("CARGO_BIN_EXE_playcrack"))
        .args(["ngrams", "-n", "2"])
        .args(["--input", plain.to_str().unwrap()])
        .args(["--output", table.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(out.status.success());

    let run = || {
        let out = Command::new(env!("CARGO_BIN_EXE_playcrack"))
            .args(["crack", "-n", "2"])
            .args(["--cipher", cipher.to_str().unwrap()])
            .args(["--reference", table.to_str().unwrap()])
            .args(["--population", "24", "--num-children", "12"])
            .args(["--new-random", "3", "--kill-worst", "5", "--keep-best", "2"])
            .args(["--generations", "5", "--seed", "31415"])
            .output()
            .unwrap();
        assert!(
            out.status.success(),
            "crack failed: {}",
            String::from_utf8_lossy(&out.stderr)
        );
        let stdout = String::from_utf8_lossy(&out.stdout).to_string();
        let pick = |prefix: &str| {
            stdout
                .lines()
                .find(|l| l.starts_with(prefix))
                .unwrap_or_else(|| panic!("no `{prefix}` line in output:\n{stdout}"))
                .to_string()
        };
        (pick("Key: "), pick("Score: "))
    };

    let first = run();
    let second = run();
    assert_eq!(first, second, "seeded runs reported different results");
}
