use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn basic_fixture() -> PathBuf {
    let fixture = repo_root().join("fixtures").join("outline").join("basic.md");
    assert!(fixture.exists(), "fixture missing: {}", fixture.display());
    fixture
}

fn flashmap() -> Command {
    Command::new(assert_cmd::cargo_bin!("flashmap"))
}

#[test]
fn cli_parses_outline_json_from_stdin() {
    let output = flashmap()
        .args(["parse", "--title", "Fallback"])
        .write_stdin("# Topic\n## Cat A\n- leaf 1\n- leaf 2\n## Cat B\n- leaf 3\n")
        .output()
        .expect("run flashmap");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["text"], "Topic");
    assert_eq!(json["level"], 0);
    let children = json["children"].as_array().expect("children");
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["text"], "Cat A");
    assert_eq!(children[0]["children"].as_array().map(Vec::len), Some(2));
    assert_eq!(children[1]["children"].as_array().map(Vec::len), Some(1));
}

#[test]
fn cli_uses_file_stem_as_fallback_title() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("roadmap.md");
    fs::write(&input, "- alpha\n- beta\n").expect("write input");

    let output = flashmap()
        .arg(input.to_string_lossy().as_ref())
        .output()
        .expect("run flashmap");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["text"], "roadmap");
}

#[test]
fn cli_prints_layout_json() {
    let output = flashmap()
        .args(["layout", "--pretty"])
        .arg(basic_fixture())
        .output()
        .expect("run flashmap");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(json["width"].as_f64().is_some_and(|w| w >= 1400.0));
    assert!(json["height"].as_f64().is_some_and(|h| h >= 1000.0));
    let nodes = json["nodes"].as_array().expect("nodes");
    let edges = json["edges"].as_array().expect("edges");
    assert!(!nodes.is_empty());
    assert_eq!(edges.len(), nodes.len() - 1);
}

#[test]
fn cli_layout_honors_config_overrides() {
    let output = flashmap()
        .args(["layout", "--set", "layout.minCanvasWidth=3000"])
        .arg(basic_fixture())
        .output()
        .expect("run flashmap");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert!(json["width"].as_f64().is_some_and(|w| w >= 3000.0));
}

#[test]
fn cli_renders_svg_to_stdout() {
    let output = flashmap()
        .args(["render", "--id", "my map"])
        .write_stdin("# A & B\n## <Cat>\n- leaf\n")
        .output()
        .expect("run flashmap");
    assert!(output.status.success());

    let svg = String::from_utf8(output.stdout).expect("utf8");
    let doc = roxmltree::Document::parse(&svg).expect("well-formed svg");
    let root = doc.root_element();
    assert!(root.has_tag_name("svg"));
    assert_eq!(root.attribute("id"), Some("my-map"));
    assert!(
        doc.descendants()
            .any(|n| n.is_text() && n.text() == Some("A & B"))
    );
}

#[test]
fn cli_renders_png_smoke() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("out.png");

    flashmap()
        .args([
            "render",
            "--format",
            "png",
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .arg(basic_fixture())
        .assert()
        .success();

    let bytes = fs::read(&out).expect("read png");
    assert!(
        bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
        "output is not a PNG"
    );

    let decoder = png::Decoder::new(std::io::Cursor::new(bytes));
    let reader = decoder.read_info().expect("png header");
    let info = reader.info();
    assert!(info.width >= 1400);
    assert!(info.height >= 1000);
}

#[test]
fn cli_renders_png_with_default_out_path_for_file_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let tmp_fixture = tmp.path().join("basic.md");
    fs::copy(basic_fixture(), &tmp_fixture).expect("copy fixture");

    let expected_out = tmp_fixture.with_extension("png");

    flashmap()
        .args([
            "render",
            "--format",
            "png",
            tmp_fixture.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let bytes = fs::read(&expected_out).expect("read png");
    assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
}

#[test]
fn cli_rejects_translucent_jpeg_background() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("out.jpg");

    flashmap()
        .args([
            "render",
            "--format",
            "jpg",
            "--background",
            "transparent",
            "--out",
            out.to_string_lossy().as_ref(),
        ])
        .arg(basic_fixture())
        .assert()
        .code(1);
    assert!(!out.exists());
}

#[test]
fn cli_usage_errors_exit_with_code_2() {
    flashmap().args(["render", "--format", "gif"]).assert().code(2);
    flashmap().arg("--help").assert().code(2);
}

#[test]
fn cli_reports_missing_input_file() {
    flashmap()
        .arg("does/not/exist.md")
        .assert()
        .code(1);
}

#[test]
fn cli_reports_invalid_config_file() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let config = tmp.path().join("config.json");
    fs::write(&config, "[1, 2, 3]").expect("write config");

    flashmap()
        .args(["parse", "--config", config.to_string_lossy().as_ref()])
        .write_stdin("- a\n")
        .assert()
        .code(1);
}
