use std::env;
use std::path::{Path, PathBuf};

// Headers the bindings are generated from, relative to `<obs-studio>/libobs`.
const TRACKED_HEADERS: &[&str] = &[
  "obs-module.h",
  "obs-source.h",
  "obs-data.h",
  "obs-properties.h",
  "graphics/graphics.h",
  "util/base.h",
  "util/bmem.h",
];

fn main() {
  for var in ["OBS_SYS_HEADERS", "OBS_APP_BUNDLE", "BINDGEN_EXTRA_CLANG_ARGS"] {
    println!("cargo:rerun-if-env-changed={var}");
  }
  println!("cargo:rerun-if-changed=wrapper.h");
  println!("cargo:rerun-if-changed=include/obsconfig.h");

  let manifest_dir =
    PathBuf::from(env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"));
  let libobs = match locate_libobs(&manifest_dir) {
    Ok(dir) => dir,
    Err(msg) => panic!("obs-sys: {msg}"),
  };

  for header in TRACKED_HEADERS {
    println!("cargo:rerun-if-changed={}", libobs.join(header).display());
  }

  write_bindings(&manifest_dir, &libobs);

  if env::var("TARGET").is_ok_and(|t| t.contains("apple-darwin")) {
    if let Err(msg) = link_bundled_framework() {
      println!("cargo:warning=obs-sys: {msg}");
    }
  }
}

/// Finds `<obs-studio>/libobs`, either from `OBS_SYS_HEADERS` or from a
/// checkout under `vendor/obs-studio` at the workspace root.
fn locate_libobs(manifest_dir: &Path) -> Result<PathBuf, String> {
  let (root, from_env) = match env::var_os("OBS_SYS_HEADERS") {
    Some(dir) => (PathBuf::from(dir), true),
    None => {
      let workspace = manifest_dir
        .ancestors()
        .nth(2)
        .ok_or("crates/obs-sys is expected two levels below the workspace root")?;
      (workspace.join("vendor/obs-studio"), false)
    }
  };

  let libobs = root.join("libobs");
  if libobs.is_dir() {
    return Ok(libobs);
  }

  let source = if from_env {
    format!("OBS_SYS_HEADERS={}", root.display())
  } else {
    format!(
      "{} (run `git submodule update --init --recursive`)",
      root.display()
    )
  };
  Err(format!(
    "no libobs headers under {source}.\n  Point OBS_SYS_HEADERS at an obs-studio source tree to override."
  ))
}

fn write_bindings(manifest_dir: &Path, libobs: &Path) {
  let mut builder = bindgen::Builder::default()
    .header(manifest_dir.join("wrapper.h").to_string_lossy())
    .clang_args([
      format!("-I{}", manifest_dir.join("include").display()),
      format!("-I{}", libobs.display()),
      "-std=c11".to_string(),
    ])
    .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
    .derive_default(true)
    .layout_tests(false)
    .generate_comments(false);

  for pattern in ["obs_.*", "gs_.*", "blog", "bfree"] {
    builder = builder.allowlist_function(pattern);
  }
  for pattern in ["obs_.*", "gs_.*"] {
    builder = builder.allowlist_type(pattern);
  }
  for pattern in ["LIBOBS_API_.*", "LOG_.*", "GS_.*", "OBS_.*"] {
    builder = builder.allowlist_var(pattern);
  }

  if let Ok(extra) = env::var("BINDGEN_EXTRA_CLANG_ARGS") {
    builder = builder.clang_args(extra.split_whitespace());
  }

  let out_dir = env::var("OUT_DIR").expect("OUT_DIR is set by cargo");
  let out = PathBuf::from(out_dir).join("bindings.rs");
  builder
    .generate()
    .expect("obs-sys: bindgen failed")
    .write_to_file(&out)
    .expect("obs-sys: failed to write bindings");
}

/// Links `libobs.framework` from an installed OBS.app so test binaries can
/// resolve libobs on macOS.
fn link_bundled_framework() -> Result<(), String> {
  let bundle = env::var_os("OBS_APP_BUNDLE")
    .map(PathBuf::from)
    .unwrap_or_else(|| PathBuf::from("/Applications/OBS.app"));
  let frameworks = bundle.join("Contents/Frameworks");

  if !frameworks.join("libobs.framework").is_dir() {
    return Err(format!(
      "libobs.framework not found in {}; set OBS_APP_BUNDLE to an OBS.app to link against it",
      frameworks.display()
    ));
  }

  println!("cargo:rustc-link-search=framework={}", frameworks.display());
  println!("cargo:rustc-link-lib=framework=libobs");
  println!("cargo:rustc-link-arg=-Wl,-rpath,{}", frameworks.display());
  Ok(())
}
