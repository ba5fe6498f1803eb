#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use tempfile::TempDir;

/// Stand-in for npm: honors `--prefix`, fails `missing-*` with a registry 404,
/// and records every install in `npm-calls.log` under the prefix.
const FAKE_NPM: &str = r#"#!/bin/sh
root="$3"
eval "spec=\${$#}"
echo "$spec" >> "$root/npm-calls.log"
case "$spec" in
  missing-*)
    echo "npm ERR! code E404" >&2
    echo "npm ERR! 404 Not Found - GET https://registry.npmjs.org/$spec" >&2
    exit 1
    ;;
  *://*)
    name=coollib
    printf '{"dependencies":{"coollib":"%s"}}\n' "$spec" > "$root/package.json"
    ;;
  *)
    name="$spec"
    ;;
esac
mkdir -p "$root/node_modules/$name"
printf '{"name":"%s","version":"1.0.0","main":"index.js"}\n' "$name" > "$root/node_modules/$name/package.json"
echo "module.exports = {};" > "$root/node_modules/$name/index.js"
"#;

pub struct Sandbox {
    pub dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let npm = dir.path().join("fake-npm");
        fs::write(&npm, FAKE_NPM).expect("write fake npm");
        let mut perms = fs::metadata(&npm).expect("metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&npm, perms).expect("chmod fake npm");
        Self { dir }
    }

    pub fn cache_root(&self) -> PathBuf {
        self.dir.path().join("cache")
    }

    pub fn installed(&self) -> PathBuf {
        self.cache_root().join("node_modules")
    }

    pub fn npm_calls(&self) -> Vec<String> {
        fs::read_to_string(self.cache_root().join("npm-calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Command with the cache, npm and REPL pinned inside the sandbox.
    pub fn trymodule(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("trymodule");
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("TRYMODULE_PATH", self.cache_root())
            .env("TRYMODULE_NPM", self.dir.path().join("fake-npm"))
            .env("TRYMODULE_NONINTERACTIVE", "1")
            .env_remove("TRYMODULE_HISTORY_PATH")
            .env_remove("RUST_LOG");
        cmd
    }
}

pub fn parse_json(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).expect("json output")
}

pub fn write_package(root: &Path, name: &str) {
    let dir = root.join(name);
    fs::create_dir_all(&dir).expect("package dir");
    fs::write(
        dir.join("package.json"),
        format!(r#"{{"name":"{name}","version":"0.0.1","main":"index.js"}}"#),
    )
    .expect("package.json");
    fs::write(dir.join("index.js"), "module.exports = {};").expect("index.js");
}
