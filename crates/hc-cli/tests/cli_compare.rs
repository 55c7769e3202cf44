use hc_core::Hist1D;
use hc_viz::{ContainerEntry, PlotContainer};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn bin_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_hepcmp"))
}

fn tmp_dir(name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("hepcmp_cli_{name}_{nanos}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(bin_path())
        .current_dir(dir)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("failed to run {:?} {:?}: {}", bin_path(), args, e))
}

fn write_source(path: &Path, names: &[&str], scale: f64) {
    let mut c = PlotContainer::default();
    for name in names {
        let contents = vec![0.0, 2.0 * scale, 80.0 * scale, 1.0 * scale];
        c.put(ContainerEntry::Histogram(Hist1D::uniform(*name, *name, 0.0, 4.0, contents).unwrap()));
    }
    c.write(path).unwrap();
}

#[test]
fn compare_writes_containers_and_pdf() {
    let dir = tmp_dir("compare");
    write_source(&dir.join("a.json"), &["higgs_pt", "xd_eta", "only_first"], 1.0);
    write_source(&dir.join("b.json"), &["xd_eta", "higgs_pt"], 2.0);
    write_source(&dir.join("c.json"), &["higgs_pt", "xd_eta"], 3.0);

    let out = run(
        &dir,
        &["compare", "--input", "a.json", "b.json", "c.json", "--out-dir", "out"],
    );
    assert!(
        out.status.success(),
        "compare should succeed, stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Saved comparison for histogram 'higgs_pt'."), "stdout={stdout}");
    assert!(stdout.contains("Skipping 'only_first': not found in all files."), "stdout={stdout}");
    assert!(!stdout.contains("histogram 'only_first'"));
    assert!(stdout.contains("Modified histograms saved to"), "stdout={stdout}");

    let out_dir = dir.join("out");
    let first = PlotContainer::read(out_dir.join("histogram_tan_comparison.json")).unwrap();
    assert_eq!(first.composites().count(), 2);
    assert!(first.get("only_first").is_none());

    let modified =
        PlotContainer::read(out_dir.join("modified_histogram_tan_comparison.json")).unwrap();
    let names: Vec<&str> = modified.composites().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["higgs_pt", "xd_eta"]);

    let raw = std::fs::read(out_dir.join("modified_histogram_tan_comparison.json")).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(v["schema_version"], "hepcmp_plot_container_v1");

    let pdf = std::fs::read(out_dir.join("output_tan_norm.pdf")).unwrap();
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&pdf).contains("/Count 2"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn compare_missing_input_exits_with_status_1() {
    let dir = tmp_dir("compare_missing");
    write_source(&dir.join("a.json"), &["higgs_pt"], 1.0);
    let out = run(&dir, &["compare", "--input", "a.json", "b.json", "c.json"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.join("output_tan_norm.pdf").exists());
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn compare_malformed_container_exits_with_status_1() {
    let dir = tmp_dir("compare_malformed");
    write_source(&dir.join("a.json"), &["higgs_pt"], 1.0);
    write_source(&dir.join("c.json"), &["higgs_pt"], 1.0);
    std::fs::write(
        dir.join("b.json"),
        r#"{"schema_version":"hepcmp_plot_container_v1","entries":[
            {"kind":"histogram","name":"higgs_pt","bin_edges":[],"bin_content":[1.0,2.0]}
        ]}"#,
    )
    .unwrap();

    let out = run(&dir, &["compare", "--input", "a.json", "b.json", "c.json"]);
    assert_eq!(out.status.code(), Some(1), "stderr={}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stderr).contains("higgs_pt"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn compare_rejects_unknown_preset() {
    let dir = tmp_dir("compare_preset");
    let out = run(&dir, &["compare", "--preset", "mass-scan"]);
    assert!(!out.status.success());
    let _ = std::fs::remove_dir_all(&dir);
}
