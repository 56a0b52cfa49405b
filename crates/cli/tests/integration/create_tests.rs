use std::fs;

use predicates::prelude::*;

use super::common::{LIBTORCH_ENTRIES, TestEnv};

#[test]
fn create_from_archive_stages_layout() {
  let env = TestEnv::new();
  let archive = env.write_archive("libtorch.zip", LIBTORCH_ENTRIES);
  let out = env.temp.path().join("out");

  env
    .torchpkg_cmd()
    .args(["create", "--os", "Linux", "--arch", "x86_64", "--archive"])
    .arg(&archive)
    .arg("--output-dir")
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::contains("Package created"))
    .stdout(predicate::str::contains("torch, c10"));

  assert!(out.join("include/torch/torch.h").is_file());
  assert!(out.join("include/torch/csrc/api/include/torch/all.h").is_file());
  assert!(out.join("lib/libtorch.so").is_file());
  assert!(out.join("lib/torch.lib").is_file());
  assert!(out.join("lib/libtorch.dylib").is_file());
  assert!(out.join("bin/torch.dll").is_file());
  assert!(out.join("package_info.json").is_file());
}

#[test]
fn create_defaults_to_package_root() {
  let env = TestEnv::new();
  let archive = env.write_archive("libtorch.zip", LIBTORCH_ENTRIES);

  env
    .torchpkg_cmd()
    .args(["create", "--os", "Windows", "--arch", "x86_64", "--cuda", "--archive"])
    .arg(&archive)
    .assert()
    .success();

  let package = env.packages_path().join("libtorch-1.9.0-windows-cu111");
  assert!(package.join("bin/torch.dll").is_file());
}

#[test]
fn create_json_output_reports_metadata() {
  let env = TestEnv::new();
  let archive = env.write_archive("libtorch.zip", LIBTORCH_ENTRIES);
  let out = env.temp.path().join("out");

  let output = env
    .torchpkg_cmd()
    .args(["create", "--os", "Linux", "--arch", "x86_64", "--cuda", "-o", "json", "--archive"])
    .arg(&archive)
    .arg("--output-dir")
    .arg(&out)
    .output()
    .unwrap();

  assert!(output.status.success());
  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(
    json["cpp_info"]["libs"],
    serde_json::json!(["torch", "c10", "torch_cuda", "c10_cuda"])
  );
  assert_eq!(
    json["url"],
    "https://download.pytorch.org/libtorch/cu111/libtorch-cxx11-abi-shared-with-deps-1.9.0+cu111.zip"
  );
  assert_eq!(json["stage"]["passes"][0]["matched"], 2);
}

#[test]
fn create_twice_is_idempotent() {
  let env = TestEnv::new();
  let archive = env.write_archive("libtorch.zip", LIBTORCH_ENTRIES);
  let out = env.temp.path().join("out");

  let run = || {
    let output = env
      .torchpkg_cmd()
      .args(["create", "--os", "Macos", "--arch", "aarch64", "-o", "json", "--archive"])
      .arg(&archive)
      .arg("--output-dir")
      .arg(&out)
      .output()
      .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    json["content_hash"].clone()
  };

  assert_eq!(run(), run());
}

#[test]
fn create_warns_on_empty_copy_pass() {
  let env = TestEnv::new();
  let archive = env.write_archive("headers.zip", &[("libtorch/include/torch/torch.h", "// torch")]);

  env
    .torchpkg_cmd()
    .args(["create", "--os", "Linux", "--arch", "x86_64", "--archive"])
    .arg(&archive)
    .assert()
    .success()
    .stderr(predicate::str::contains("No files matched: *.lib, *.dll, *.so, *.dylib"));
}

#[test]
fn create_strict_fails_on_empty_copy_pass() {
  let env = TestEnv::new();
  let archive = env.write_archive("headers.zip", &[("libtorch/include/torch/torch.h", "// torch")]);

  env
    .torchpkg_cmd()
    .args(["create", "--os", "Linux", "--arch", "x86_64", "--strict", "--archive"])
    .arg(&archive)
    .assert()
    .failure()
    .stderr(predicate::str::contains("no files matched '*.lib'"));
}

#[test]
fn create_refuses_non_package_output_dir() {
  let env = TestEnv::new();
  let archive = env.write_archive("libtorch.zip", LIBTORCH_ENTRIES);
  let out = env.temp.path().join("documents");
  fs::create_dir_all(&out).unwrap();
  fs::write(out.join("notes.txt"), "mine").unwrap();

  env
    .torchpkg_cmd()
    .args(["create", "--os", "Linux", "--arch", "x86_64", "--archive"])
    .arg(&archive)
    .arg("--output-dir")
    .arg(&out)
    .assert()
    .failure()
    .stderr(predicate::str::contains("refusing to replace"));

  assert_eq!(fs::read_to_string(out.join("notes.txt")).unwrap(), "mine");
}

#[test]
fn create_unsupported_os_fails() {
  let env = TestEnv::new();
  let archive = env.write_archive("libtorch.zip", LIBTORCH_ENTRIES);

  env
    .torchpkg_cmd()
    .args(["create", "--os", "Haiku", "--archive"])
    .arg(&archive)
    .assert()
    .failure()
    .stderr(predicate::str::contains("OS Haiku is not supported"));
}

#[test]
fn info_reads_created_package() {
  let env = TestEnv::new();
  let archive = env.write_archive("libtorch.zip", LIBTORCH_ENTRIES);
  let out = env.temp.path().join("out");

  env
    .torchpkg_cmd()
    .args(["create", "--os", "Linux", "--arch", "x86_64", "--cuda", "--archive"])
    .arg(&archive)
    .arg("--output-dir")
    .arg(&out)
    .assert()
    .success();

  env
    .torchpkg_cmd()
    .arg("info")
    .arg("--package")
    .arg(&out)
    .arg("--cargo")
    .assert()
    .success()
    .stdout(predicate::str::contains("cargo:rustc-link-lib=dylib=c10_cuda"));

  let raw = fs::read_to_string(out.join("package_info.json")).unwrap();
  assert!(raw.contains("\"with_cuda\": true"));
}
