//! A shell-script stand-in for the terraform binary.
//!
//! The script logs every invocation to `<module>/calls.log`, remembers the
//! `resource_suffix` passed to `apply`, and reports `jokester<suffix>` (or a
//! fixed override) as the `function_name` output.

#![allow(clippy::expect_used, dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;

const SCRIPT: &str = r#"#!/bin/sh
dir=""
for a in "$@"; do
  case "$a" in -chdir=*) dir="${a#-chdir=}" ;; esac
done
echo "$2" >> "$dir/calls.log"
case "$2" in
  init) exit 0 ;;
  apply)
    if [ -f "$dir/fail_apply" ]; then echo "Error: creating Lambda Function: AccessDenied" >&2; exit 1; fi
    for a in "$@"; do
      case "$a" in resource_suffix=*) echo "${a#resource_suffix=}" > "$dir/suffix" ;; esac
    done
    exit 0 ;;
  output)
    if [ -f "$dir/name_override" ]; then printf '"%s"\n' "$(cat "$dir/name_override")"; exit 0; fi
    printf '"jokester%s"\n' "$(cat "$dir/suffix")"
    exit 0 ;;
  destroy) rm -f "$dir/suffix"; exit 0 ;;
esac
exit 1
"#;

/// A temporary module directory plus the fake binary and a config file
/// pointing at it.
pub struct FakeTerraform {
    tmp: TempDir,
}

impl FakeTerraform {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let module = tmp.path().join("module");
        std::fs::create_dir_all(&module).expect("module dir");
        std::fs::write(module.join("main.tf"), "# fake module\n").expect("main.tf");

        let binary = tmp.path().join("terraform");
        std::fs::write(&binary, SCRIPT).expect("script");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(0o755))
                .expect("chmod");
        }

        let config = format!(
            "environment: test\nterraform:\n  dir: {}\n  binary: {}\n  max_retries: 0\n",
            module.display(),
            binary.display()
        );
        std::fs::write(tmp.path().join("jokester-e2e.yaml"), config).expect("config");
        Self { tmp }
    }

    pub fn module(&self) -> PathBuf {
        self.tmp.path().join("module")
    }

    pub fn config(&self) -> PathBuf {
        self.tmp.path().join("jokester-e2e.yaml")
    }

    /// Make `output` report `name` regardless of the applied suffix.
    pub fn report_name(&self, name: &str) {
        std::fs::write(self.module().join("name_override"), name).expect("override");
    }

    /// Make `apply` fail with a non-retryable error.
    pub fn fail_apply(&self) {
        std::fs::write(self.module().join("fail_apply"), "").expect("fail flag");
    }

    /// Subcommands invoked so far, in order.
    pub fn calls(&self) -> Vec<String> {
        read_lines(&self.module().join("calls.log"))
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(String::from)
        .collect()
}
