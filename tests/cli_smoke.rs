use std::process::Command;

#[test]
fn help_displays_overview() {
    let binary = env!("CARGO_BIN_EXE_token-pulse");
    let output = Command::new(binary)
        .arg("--help")
        .output()
        .expect("invoke token-pulse --help");

    assert!(output.status.success(), "help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Live token listing simulator"),
        "expected overview text in help output"
    );
}

#[test]
fn snapshot_json_is_filtered_and_sorted() {
    let binary = env!("CARGO_BIN_EXE_token-pulse");
    let output = Command::new(binary)
        .args([
            "snapshot", "--seed", "7", "--tab", "migrated", "--sort", "price", "--direction",
            "asc", "--json",
        ])
        .output()
        .expect("invoke token-pulse snapshot");

    assert!(output.status.success(), "snapshot command should succeed");
    let rows: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("snapshot emits a JSON array");

    assert_eq!(rows.len(), 10, "30 tokens split evenly over three tabs");
    assert!(rows.iter().all(|row| row["category"] == "migrated"));
    let prices: Vec<f64> = rows
        .iter()
        .map(|row| row["price"].as_f64().expect("numeric price"))
        .collect();
    assert!(prices.windows(2).all(|pair| pair[0] <= pair[1]));
}
