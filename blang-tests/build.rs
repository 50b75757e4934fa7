// Copyright 2025-2026 Neil Henderson

//! Build script to generate integration test cases based on files in the `tests/valid` and
//! `tests/invalid` directories.

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use std::path::PathBuf;

use glob::glob;

const VALID_TEST_CASES_FILENAME: &str = "generated_valid_program_tests.rs";
const INVALID_TEST_CASES_FILENAME: &str = "generated_invalid_program_tests.rs";

const EXPECTED_RESULTS_JSON_FILENAME: &str = "expected_results.json";

fn main() {
    generate_valid_program_tests();
    generate_invalid_program_tests();

    // We want cargo to rerun our build.rs script if any of the integration test files change.
    println!("cargo:rerun-if-changed=tests");
}

/// Generate test functions for cases we expect to compile cleanly. When a sibling `.ir` file
/// exists for a test case, the generated test also compares the produced report against it.
fn generate_valid_program_tests() {
    let out_dir = std::env::var("OUT_DIR").unwrap(); // Set by cargo when running `cargo test`
    let generated_rs_filename = Path::new(&out_dir).join(VALID_TEST_CASES_FILENAME);
    let mut writer = BufWriter::new(File::create(generated_rs_filename).expect("Failed to create file"));

    let valid_tests_dir_path = get_tests_directory_path("valid");

    for entry in glob(&format!("{}/**/*.b", valid_tests_dir_path)).expect("Failed to read glob pattern") {
        match entry {
            Ok(source_file_path) => {
                let test_case_name = make_test_case_name(&valid_tests_dir_path, &source_file_path);

                let golden_file_path = source_file_path.with_extension("ir");
                let golden = if golden_file_path.exists() {
                    format!("Some(\"{}\")", golden_file_path.display())
                } else {
                    "None".to_string()
                };

                let source_filename = source_file_path.into_os_string().into_string().expect("Invalid path");

                let test_case_code = &format!(
                    r#"
                        #[test]
                        #[allow(non_snake_case)]
                        fn {test_case_name}() {{
                            compile_valid_program("{source_filename}", {golden});
                        }}
                    "#
                );

                let res = writer.write_all(test_case_code.as_bytes());
                assert!(res.is_ok());
            }
            Err(e) => println!("{:?}", e),
        }
    }
}

/// Generate test functions for cases we expect to fail with diagnostics because the source file
/// has lexical, syntax, or semantic errors. Expected error counts come from the
/// `expected_results.json` file next to the test cases.
fn generate_invalid_program_tests() {
    let out_dir = std::env::var("OUT_DIR").unwrap(); // Set by cargo when running `cargo test`
    let generated_rs_filename = Path::new(&out_dir).join(INVALID_TEST_CASES_FILENAME);
    let mut writer = BufWriter::new(File::create(generated_rs_filename).expect("Failed to create file"));

    let invalid_tests_dir_path = get_tests_directory_path("invalid");

    let expected_counts_json = Path::new(&invalid_tests_dir_path).join(EXPECTED_RESULTS_JSON_FILENAME);
    let expected_counts = read_expected_error_counts(&expected_counts_json).unwrap_or_default();

    for entry in glob(&format!("{}/**/*.b", invalid_tests_dir_path)).expect("Failed to read glob pattern") {
        match entry {
            Ok(source_file_path) => {
                let test_case_name = make_test_case_name(&invalid_tests_dir_path, &source_file_path);

                let base_name = source_file_path
                    .file_name()
                    .expect("Did not get base file name for test case source file")
                    .to_str()
                    .unwrap();
                let expected = match expected_counts.get(base_name) {
                    Some(count) => format!("Some({count})"),
                    None => "None".to_string(),
                };

                let source_filename = source_file_path.into_os_string().into_string().expect("Invalid path");

                let test_case_code = &format!(
                    r#"
                        #[test]
                        #[allow(non_snake_case)]
                        fn {test_case_name}() {{
                            compile_invalid_program("{source_filename}", {expected});
                        }}
                    "#
                );

                let res = writer.write_all(test_case_code.as_bytes());
                assert!(res.is_ok());
            }
            Err(e) => println!("{:?}", e),
        }
    }
}

fn read_expected_error_counts(json_filename: &Path) -> Option<HashMap<String, u64>> {
    let reader = BufReader::new(File::open(json_filename).ok()?);

    let v: serde_json::Value = serde_json::from_reader(reader).ok()?;

    let map: HashMap<String, u64> = v
        .as_object()?
        .iter()
        .filter_map(|(test_case, count)| Some((test_case.clone(), count.as_u64()?)))
        .collect();

    Some(map)
}

fn make_test_case_name(root_dir_path: &str, source_file_path: &Path) -> String {
    let root = Path::new(root_dir_path);
    let rel = match source_file_path.strip_prefix(root) {
        Ok(r) => r,
        Err(_) => source_file_path,
    };

    // Replace '/' with '_'
    let name = rel.with_extension("").iter().map(|s| s.to_string_lossy()).collect::<Vec<_>>().join("_");

    name.replace('-', "_")
}

fn get_tests_directory_path(directory: &str) -> String {
    let mut resource_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")); // Only set when using `cargo ...`
    resource_path.push("tests/");
    resource_path.push(directory);
    resource_path.into_os_string().into_string().expect("Invalid path")
}
