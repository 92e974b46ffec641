//! The build driver: per project in dependency order, decide staleness,
//! set up directories, delegate to the adapter, and persist checksums.

use anyhow::{bail, Context, Result};
use rayon::prelude::*;

use crate::builder::environment::compose;
use crate::builder::{AdapterFailure, Step};
use crate::checksum;
use crate::core::config::{ConfigError, ConfigHandle};
use crate::core::manifest::Manifest;
use crate::core::project::Project;
use crate::core::workspace::Workspace;
use crate::ops::resolve_requested;
use crate::resolver::dependency_closure;
use crate::util::fs::{remove_dir_all_if_exists, symlink};

/// Options for the build command.
#[derive(Debug, Default)]
pub struct BuildOptions {
    /// Projects to build; empty means every project.
    pub projects: Vec<String>,

    /// Build even when checksums are current.
    pub force: bool,
}

/// Build the requested projects and their dependency closures, in
/// dependency order, failing fast on the first project that does not
/// build.
pub fn build(
    ws: &Workspace,
    manifest: &Manifest,
    config: &mut ConfigHandle,
    opts: &BuildOptions,
) -> Result<()> {
    // A tainted workspace means a global config change invalidated every
    // prior build; refuse before touching any project.
    if config.get().taint {
        return Err(ConfigError::Tainted.into());
    }

    let requested = resolve_requested(manifest, &opts.projects)?;
    let order = dependency_closure(manifest, &requested)?;
    let projects: Vec<&Project> = order
        .iter()
        .map(|name| manifest.get(name))
        .collect::<Result<_, _>>()?;

    // Checksum computation is read-only and dominates a no-op build, so
    // run it for the whole closure up front in a worker pool. This cannot
    // change build order or outcome.
    let checksums: Vec<String> = projects
        .par_iter()
        .map(|project| checksum::calculate(&project.path))
        .collect::<Result<_, _>>()?;

    for (project, current) in projects.iter().zip(&checksums) {
        tracing::info!("building {}", project.name);
        build_one(ws, manifest, config, project, current, opts.force)?;
    }

    Ok(())
}

fn build_one(
    ws: &Workspace,
    manifest: &Manifest,
    config: &ConfigHandle,
    project: &Project,
    current: &str,
    force: bool,
) -> Result<()> {
    let name = project.name.as_str();
    let overlay = config.get().project(name);
    if !overlay.enabled {
        tracing::warn!("not building manually disabled project {name}");
        return Ok(());
    }

    if !checksum::is_stale(force, checksum::stored(ws, name).as_deref(), current) {
        tracing::info!("checksum for {name} is current; skipping");
        return Ok(());
    }
    if force {
        tracing::info!("forcing a build of {name}");
    }

    std::fs::create_dir_all(ws.project_dir(name))
        .with_context(|| format!("failed to create project directory for {name}"))?;

    // Build-directory creation decides whether configure runs: a
    // pre-existing directory means the project was configured before.
    let build_dir = ws.build_dir(name);
    let needs_configure = match std::fs::create_dir(&build_dir) {
        Ok(()) => true,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => false,
        Err(e) => {
            return Err(e)
                .with_context(|| format!("failed to create build directory for {name}"))
        }
    };

    let source_link = ws.source_link(name);
    if !source_link.exists() {
        symlink(&project.path, &source_link).with_context(|| {
            format!("failed to link {} to sources", source_link.display())
        })?;
    }

    let env = compose(ws, manifest, name, false)?;
    let adapter = project.build.adapter();
    let prefix = ws.install_dir(name);
    let mut extra_args = project.args.clone();
    extra_args.extend(overlay.args);

    if needs_configure {
        let outcome = adapter.conf(
            name,
            &prefix,
            &project.path,
            &build_dir,
            &env,
            config.get().build_type,
            &extra_args,
        )?;
        if !outcome.success {
            // Remove the build directory so the next invocation re-runs
            // configure instead of reusing partial state.
            remove_dir_all_if_exists(&build_dir)?;
            return Err(AdapterFailure {
                project: name.to_string(),
                step: Step::Configure,
                command: outcome.command,
            }
            .into());
        }
    }

    let outcome = adapter.build(
        name,
        &prefix,
        &project.path,
        &build_dir,
        &env,
        &project.targets,
        &extra_args,
    )?;
    if !outcome.success {
        return Err(AdapterFailure {
            project: name.to_string(),
            step: Step::Build,
            command: outcome.command,
        }
        .into());
    }

    // The rebuild changed this project's installed artifacts, so every
    // downstream project must rebuild; their own staleness is detected at
    // their build time.
    for downstream in &project.downstream {
        checksum::invalidate(ws, downstream)?;
    }
    checksum::store(ws, name, current)?;

    Ok(())
}

/// Shared precondition for commands that need an already-built project.
pub(crate) fn require_build_dir(ws: &Workspace, project: &str) -> Result<std::path::PathBuf> {
    let build_dir = ws.build_dir(project);
    if !build_dir.is_dir() {
        bail!(
            "build directory for {project} doesn't exist; have you built it yet?"
        );
    }
    Ok(build_dir)
}

/// Expand `${VAR}` templates in test/command strings against the composed
/// environment plus the `BUILD_DIR` and `PREFIX` built-ins.
pub(crate) fn expand_template(
    template: &str,
    ws: &Workspace,
    project: &str,
    env: &crate::builder::environment::EnvMap,
) -> String {
    use crate::builder::environment::expand_var;

    let mut result = expand_var(
        template,
        "BUILD_DIR",
        &[ws.build_dir(project).to_string_lossy().into_owned()],
    );
    result = expand_var(
        &result,
        "PREFIX",
        &[ws.install_dir(project).to_string_lossy().into_owned()],
    );
    for (k, v) in env {
        result = expand_var(&result, k, std::slice::from_ref(v));
    }
    result
}
