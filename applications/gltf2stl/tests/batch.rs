//! Runs whole batches against generated model trees.

use std::{
    fs,
    path::{Path, PathBuf},
};

use application_gltf2stl::{batch, ApplicationError, Config};
use approx::assert_abs_diff_eq;
use lib_stl::StlFormat;

/// `(0,0,0) (1,0,0) (0,1,0)` as little-endian `f32`s
const TRIANGLE_BASE64: &str = "AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA";

/// A single triangle `(0,0,0) (1,0,0) (0,1,0)` in meters, Y-up, drawn from `vertex_count`
/// vertices of the buffer `buffer_uri`.
fn triangle_document(buffer_uri: &str, vertex_count: usize) -> String {
    format!(
        r#"{{
            "asset": {{ "version": "2.0" }},
            "scene": 0,
            "scenes": [{{ "nodes": [0] }}],
            "nodes": [{{ "mesh": 0 }}],
            "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }} }}] }}],
            "accessors": [{{
                "bufferView": 0,
                "componentType": 5126,
                "count": {vertex_count},
                "type": "VEC3",
                "min": [0.0, 0.0, 0.0],
                "max": [1.0, 1.0, 0.0]
            }}],
            "bufferViews": [{{ "buffer": 0, "byteLength": 36 }}],
            "buffers": [{{ "byteLength": 36, "uri": "{buffer_uri}" }}]
        }}"#
    )
}

/// The triangle with its positions in a sibling `.bin` file.
fn write_triangle_model(directory: &Path, stem: &str) -> PathBuf {
    fs::create_dir_all(directory).unwrap();

    let positions: Vec<u8> = [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        .iter()
        .flat_map(|component| component.to_le_bytes())
        .collect();
    fs::write(directory.join(format!("{stem}.bin")), positions).unwrap();

    let path = directory.join(format!("{stem}.gltf"));
    fs::write(&path, triangle_document(&format!("{stem}.bin"), 3)).unwrap();
    path
}

/// The triangle with its positions embedded as a base64 data URI.
fn write_embedded_triangle_model(directory: &Path, stem: &str, vertex_count: usize) -> PathBuf {
    fs::create_dir_all(directory).unwrap();

    let uri = format!("data:application/octet-stream;base64,{TRIANGLE_BASE64}");
    let path = directory.join(format!("{stem}.gltf"));
    fs::write(&path, triangle_document(&uri, vertex_count)).unwrap();
    path
}

fn config(root: &Path) -> Config {
    Config {
        root: root.to_owned(),
        ..Config::default()
    }
}

fn read_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

#[test]
fn converts_nested_model_next_to_its_source() {
    let directory = tempfile::tempdir().unwrap();
    let root = directory.path();
    write_triangle_model(&root.join("parts"), "triangle");

    let mut out = Vec::new();
    let summary = batch::run(&config(root), &mut out).unwrap();

    let expected_source = root.join("parts/triangle.gltf");
    assert_eq!(summary.converted, [expected_source]);
    assert!(summary.failed.is_empty());

    let output = String::from_utf8(out).unwrap();
    let converting = format!(
        "Converting {} -> {}",
        Path::new("parts").join("triangle.gltf").display(),
        Path::new("parts").join("triangle.stl").display()
    );
    assert_eq!(
        output.lines().collect::<Vec<_>>(),
        [converting.as_str(), "Done. Converted 1 file(s)."]
    );

    let stl = fs::read(root.join("parts/triangle.stl")).unwrap();
    assert_eq!(stl.len(), 84 + 50);
    assert_eq!(u32::from_le_bytes(stl[80..84].try_into().unwrap()), 1);

    // normal, then the corners: Y-up meters became Z-up millimeters
    let facet = read_f32s(&stl[84..84 + 48]);
    let expected: [f32; 12] = [
        0.0, -1.0, 0.0, //
        0.0, 0.0, 0.0, //
        1000.0, 0.0, 0.0, //
        0.0, 0.0, 1000.0,
    ];
    for (actual, expected) in facet.iter().zip(expected) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-2);
    }
}

#[test]
fn converts_model_with_embedded_buffer() {
    let directory = tempfile::tempdir().unwrap();
    let root = directory.path();
    write_embedded_triangle_model(root, "embedded", 3);

    let summary = batch::run(&config(root), &mut Vec::new()).unwrap();

    assert_eq!(summary.converted, [root.join("embedded.gltf")]);
    let stl = fs::read(root.join("embedded.stl")).unwrap();
    assert_eq!(stl.len(), 84 + 50);

    let corners = read_f32s(&stl[84 + 12..84 + 48]);
    let expected: [f32; 9] = [
        0.0, 0.0, 0.0, //
        1000.0, 0.0, 0.0, //
        0.0, 0.0, 1000.0,
    ];
    for (actual, expected) in corners.iter().zip(expected) {
        assert_abs_diff_eq!(*actual, expected, epsilon = 1e-2);
    }
}

#[test]
fn writes_ascii_when_asked() {
    let directory = tempfile::tempdir().unwrap();
    let root = directory.path();
    write_triangle_model(root, "wedge");

    let config = Config {
        format: StlFormat::Ascii,
        ..config(root)
    };
    batch::run(&config, &mut Vec::new()).unwrap();

    let text = fs::read_to_string(root.join("wedge.stl")).unwrap();
    assert!(text.starts_with("solid wedge\n"));
    assert!(text.trim_end().ends_with("endsolid wedge"));
    assert_eq!(text.matches("vertex").count(), 3);
}

#[test]
fn empty_tree_reports_nothing_found() {
    let directory = tempfile::tempdir().unwrap();
    fs::write(directory.path().join("notes.txt"), "no models here").unwrap();

    let mut out = Vec::new();
    let summary = batch::run(&config(directory.path()), &mut out).unwrap();

    assert_eq!(summary.total(), 0);
    assert_eq!(String::from_utf8(out).unwrap(), "No glTF/GLB files found.\n");
}

#[test]
fn first_failure_aborts_the_batch() {
    let directory = tempfile::tempdir().unwrap();
    let root = directory.path();
    fs::write(root.join("a_broken.gltf"), "{ not json").unwrap();
    write_triangle_model(root, "b_good");

    let mut out = Vec::new();
    let result = batch::run(&config(root), &mut out);

    let error = match result {
        Err(ApplicationError::Conversion(error)) => error,
        other => panic!("expected a conversion error, got {other:?}"),
    };
    assert!(format!("{error:#}").contains("a_broken.gltf"));
    assert!(!root.join("b_good.stl").exists());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Converting a_broken.gltf -> a_broken.stl\n"
    );
}

#[test]
fn keep_going_skips_failures() {
    let directory = tempfile::tempdir().unwrap();
    let root = directory.path();
    fs::write(root.join("a_broken.glb"), b"glTF garbage").unwrap();
    write_triangle_model(root, "b_good");

    let config = Config {
        keep_going: true,
        ..config(root)
    };
    let mut out = Vec::new();
    let result = batch::run(&config, &mut out);

    assert!(matches!(
        result,
        Err(ApplicationError::Failed {
            failed: 1,
            total: 2
        })
    ));
    assert!(root.join("b_good.stl").exists());
    assert!(!root.join("a_broken.stl").exists());
    assert!(String::from_utf8(out)
        .unwrap()
        .ends_with("Done. Converted 1 file(s), 1 failed.\n"));
}

#[test]
fn keep_going_skips_empty_accessors() {
    let directory = tempfile::tempdir().unwrap();
    let root = directory.path();
    write_embedded_triangle_model(root, "a_empty", 0);
    write_triangle_model(root, "b_good");

    let config = Config {
        keep_going: true,
        ..config(root)
    };
    let result = batch::run(&config, &mut Vec::new());

    assert!(matches!(
        result,
        Err(ApplicationError::Failed {
            failed: 1,
            total: 2
        })
    ));
    assert!(root.join("b_good.stl").exists());
    assert!(!root.join("a_empty.stl").exists());
}

#[test]
fn missing_root_fails_discovery() {
    let directory = tempfile::tempdir().unwrap();
    let root = directory.path().join("absent");

    let result = batch::run(&config(&root), &mut Vec::new());

    assert!(matches!(result, Err(ApplicationError::Discovery { .. })));
}
