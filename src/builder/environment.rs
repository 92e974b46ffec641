//! Build-environment composition.
//!
//! The environment a project builds under is the ambient process
//! environment plus search-path merges for every project in its dependency
//! closure: pkg-config metadata paths, library paths, optionally
//! executable paths, each adapter's own tweaks, and finally the env
//! templates declared in the manifest. Never persisted; recomputed every
//! invocation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::manifest::Manifest;
use crate::core::project::Project;
use crate::core::workspace::Workspace;
use crate::resolver::dependency_closure;

/// A composed process environment.
pub type EnvMap = BTreeMap<String, String>;

/// Merge path-like entries into `var` using `:` syntax. New entries are
/// prepended; entries already present are skipped; the relative order of
/// prior entries is preserved.
pub fn merge_var(env: &mut EnvMap, var: &str, entries: &[String]) {
    let existing: Vec<String> = match env.get(var) {
        Some(current) => current.split(':').map(str::to_string).collect(),
        None => Vec::new(),
    };

    let mut merged: Vec<String> = Vec::new();
    for entry in entries {
        if !existing.iter().any(|e| e == entry) && !merged.iter().any(|e| e == entry) {
            merged.push(entry.clone());
        }
    }
    if merged.is_empty() && !env.contains_key(var) {
        return;
    }
    merged.extend(existing);
    env.insert(var.to_string(), merged.join(":"));
}

/// Expand a `${VAR}` template against each entry of `expansions` and join
/// the results PATH-style, suppressing duplicate results. For example
/// `${ABC}/stuff` with expansions `[a, b]` becomes `a/stuff:b/stuff`.
pub fn expand_var(template: &str, var: &str, expansions: &[String]) -> String {
    let needle = format!("${{{var}}}");
    let mut results: Vec<String> = Vec::new();
    for expansion in expansions {
        let result = template.replace(&needle, expansion);
        if !results.contains(&result) {
            results.push(result);
        }
    }
    results.join(":")
}

/// Compose the full build environment for a project across its dependency
/// closure. `include_exec_paths` additionally merges each dependency's
/// build directory and installed binary paths into `PATH` (used by the
/// `env` command, not by builds).
pub fn compose(
    ws: &Workspace,
    manifest: &Manifest,
    project: &str,
    include_exec_paths: bool,
) -> Result<EnvMap> {
    let mut env: EnvMap = std::env::vars().collect();

    let closure = dependency_closure(manifest, &[project.to_string()])
        .with_context(|| format!("cannot compose environment for {project}"))?;
    for name in &closure {
        let dep = manifest.get(name)?;
        merge_project(ws, dep, &mut env, include_exec_paths);
    }

    Ok(env)
}

/// Merge one project's contribution into the accumulating environment.
fn merge_project(ws: &Workspace, project: &Project, env: &mut EnvMap, include_exec_paths: bool) {
    let name = project.name.as_str();
    let lib_paths = path_strings(ws.lib_paths(name));
    let pkgconfig_paths = path_strings(ws.pkgconfig_paths(name));

    merge_var(env, "PKG_CONFIG_PATH", &pkgconfig_paths);
    merge_var(env, "LD_LIBRARY_PATH", &lib_paths);
    if include_exec_paths {
        let mut exec_paths = vec![ws.build_dir(name).to_string_lossy().into_owned()];
        exec_paths.extend(path_strings(ws.bin_paths(name)));
        merge_var(env, "PATH", &exec_paths);
    }

    let install_dir = ws.install_dir(name);
    project
        .build
        .adapter()
        .env(name, &install_dir, &ws.build_dir(name), env);

    // Manifest-declared variables: built-in placeholders first, then every
    // variable already composed, so user templates can reference both.
    let prefix = vec![install_dir.to_string_lossy().into_owned()];
    for (var, template) in &project.env {
        let mut val = expand_var(template, "LIBDIR", &lib_paths);
        val = expand_var(&val, "PREFIX", &prefix);
        for (k, v) in env.clone() {
            val = expand_var(&val, &k, std::slice::from_ref(&v));
        }
        merge_var(env, var, std::slice::from_ref(&val));
    }
}

fn path_strings(paths: Vec<PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_merge_var_prepends_new_entries() {
        let mut env = EnvMap::new();
        env.insert("PATH".to_string(), "/usr/bin:/bin".to_string());

        merge_var(
            &mut env,
            "PATH",
            &["/opt/tool/bin".to_string(), "/usr/bin".to_string()],
        );
        assert_eq!(env["PATH"], "/opt/tool/bin:/usr/bin:/bin");
    }

    #[test]
    fn test_merge_var_is_idempotent() {
        let mut env = EnvMap::new();
        let entries = vec!["/a".to_string(), "/b".to_string()];

        merge_var(&mut env, "PATH", &entries);
        merge_var(&mut env, "PATH", &entries);
        assert_eq!(env["PATH"], "/a:/b");
    }

    #[test]
    fn test_merge_var_starts_variable_when_absent() {
        let mut env = EnvMap::new();
        merge_var(&mut env, "LD_LIBRARY_PATH", &["/lib".to_string()]);
        assert_eq!(env["LD_LIBRARY_PATH"], "/lib");
    }

    #[test]
    fn test_expand_var_fans_out() {
        let result = expand_var(
            "${ABC}/stuff",
            "ABC",
            &["a".to_string(), "b".to_string(), "c".to_string()],
        );
        assert_eq!(result, "a/stuff:b/stuff:c/stuff");
    }

    #[test]
    fn test_expand_var_suppresses_duplicate_results() {
        // Without the placeholder every expansion yields the same string.
        let result = expand_var(
            "plain",
            "ABC",
            &["a".to_string(), "b".to_string()],
        );
        assert_eq!(result, "plain");
    }

    fn fixture() -> (TempDir, Workspace, Manifest) {
        let tmp = TempDir::new().unwrap();
        let manifest_path = tmp.path().join("flotilla.yaml");
        std::fs::write(
            &manifest_path,
            "projects:\n  libfoo:\n    build: cmake\n    env:\n      FOO_HOME: \"${PREFIX}\"\n  app:\n    build: meson\n    deps: [libfoo]\n",
        )
        .unwrap();
        let root = tmp.path().join(".flotilla");
        let manifest = Manifest::load(Path::new(&root), &manifest_path).unwrap();
        let ws = Workspace::at(root, "ws");
        (tmp, ws, manifest)
    }

    #[test]
    fn test_compose_merges_dependency_paths() {
        let (_tmp, ws, manifest) = fixture();

        let env = compose(&ws, &manifest, "app", false).unwrap();

        let libfoo_lib = ws.lib_paths("libfoo")[0].to_string_lossy().into_owned();
        let app_lib = ws.lib_paths("app")[0].to_string_lossy().into_owned();
        let ld = &env["LD_LIBRARY_PATH"];
        assert!(ld.contains(&libfoo_lib));
        assert!(ld.contains(&app_lib));

        let pkg = &env["PKG_CONFIG_PATH"];
        let libfoo_pc = ws.pkgconfig_paths("libfoo")[0].to_string_lossy().into_owned();
        assert!(pkg.contains(&libfoo_pc));
    }

    #[test]
    fn test_compose_expands_manifest_env_templates() {
        let (_tmp, ws, manifest) = fixture();

        let env = compose(&ws, &manifest, "app", false).unwrap();
        assert_eq!(
            env["FOO_HOME"],
            ws.install_dir("libfoo").to_string_lossy().into_owned()
        );
    }

    #[test]
    fn test_compose_exec_paths_only_on_request() {
        let (_tmp, ws, manifest) = fixture();
        let build_dir = ws.build_dir("libfoo").to_string_lossy().into_owned();

        let without = compose(&ws, &manifest, "libfoo", false).unwrap();
        assert!(!without
            .get("PATH")
            .map(|p| p.contains(&build_dir))
            .unwrap_or(false));

        let with = compose(&ws, &manifest, "libfoo", true).unwrap();
        assert!(with["PATH"].contains(&build_dir));
    }

    #[test]
    fn test_compose_is_idempotent_per_invocation() {
        let (_tmp, ws, manifest) = fixture();

        let first = compose(&ws, &manifest, "app", false).unwrap();
        let second = compose(&ws, &manifest, "app", false).unwrap();
        assert_eq!(first, second);
    }
}
