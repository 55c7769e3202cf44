//! Comparison pipeline into a real multi-page PDF.

use std::path::PathBuf;

use hc_core::Hist1D;
use hc_viz::{ComparisonConfig, ContainerEntry, PlotContainer, run_comparison, run_postprocess};
use hc_viz_render::MultiPageDocument;
use hc_viz_render::config::VizConfig;

fn tmp_path(name: &str, ext: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("hc_render_e2e_{name}_{nanos}.{ext}"))
}

fn write_input(tag: &str, scale: f64) -> PathBuf {
    let mut c = PlotContainer::default();
    for name in ["higgs_pt", "xd_eta", "h1_m"] {
        let contents = vec![0.0, 4.0 * scale, 60.0 * scale, 2.0 * scale, 0.0];
        c.put(ContainerEntry::Histogram(Hist1D::uniform(name, name, 0.0, 500.0, contents).unwrap()));
    }
    let path = tmp_path(tag, "json");
    c.write(&path).unwrap();
    path
}

#[test]
fn every_restyled_composite_becomes_a_page() {
    let inputs = [write_input("a", 1.0), write_input("b", 2.0), write_input("c", 0.5)];
    let comparison = tmp_path("comparison", "json");
    let modified = tmp_path("modified", "json");
    let pdf = tmp_path("pages", "pdf");
    let cfg = ComparisonConfig::higgs_mass_scan();

    let report = run_comparison(&inputs, &comparison, &cfg).unwrap();
    assert_eq!(report.saved.len(), 3);

    let mut doc = MultiPageDocument::create(&pdf, &VizConfig::default()).unwrap();
    let post = run_postprocess(&comparison, &modified, &mut doc, &cfg.post).unwrap();
    assert_eq!(post.pages, 3);
    assert_eq!(post.style_failures, 0);
    assert_eq!(doc.len(), 3);

    let written = doc.close().unwrap();
    let bytes = std::fs::read(&written).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(String::from_utf8_lossy(&bytes).contains("/Count 3"));

    for p in inputs.iter().chain([&comparison, &modified, &pdf]) {
        let _ = std::fs::remove_file(p);
    }
}

#[test]
fn composite_read_back_from_json_renders() {
    let cfg = ComparisonConfig::tan_beta_scan();
    let h = || Hist1D::uniform("xd_eta", "xd_eta", -5.0, 5.0, vec![1.0, 8.0, 3.0]).unwrap();
    let plot = hc_viz::build_composite("xd_eta", [h(), h(), h()], &cfg).unwrap();
    let json = serde_json::to_string(&plot).unwrap();
    let back: hc_viz::CompositePlot = serde_json::from_str(&json).unwrap();

    let svg = hc_viz_render::plots::overlay::render(&back, &VizConfig::default()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<polyline").count(), 3);

    let path = tmp_path("xd_eta", "bmp");
    assert!(matches!(
        hc_viz_render::save(svg, &path, &VizConfig::default()),
        Err(hc_viz_render::RenderError::UnsupportedFormat(f)) if f == "bmp"
    ));
    assert!(!path.exists());
}
