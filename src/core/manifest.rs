//! Manifest parsing, include merging, and validation.
//!
//! A manifest is a YAML file with optional `include` and `search-path`
//! lists and a `projects` mapping. Includes are merged breadth-first; a
//! global already-included set keyed by canonicalized path guarantees each
//! physical file is merged at most once, which keeps diamond-shaped and
//! cyclic include graphs terminating. Two merged manifests may never
//! declare the same project.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use thiserror::Error;

use crate::builder::BuildTool;
use crate::core::project::{Project, TestSuite, DEFAULT_TARGETS};
use crate::core::workspace;
use crate::util::fs::normalize_path;

/// Malformed or invalid manifest structure.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest {path} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("manifest {path} is not valid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("manifest {path} must be a YAML mapping")]
    NotAMapping { path: PathBuf },

    #[error("\"{key}\" key in {path} is not a list of strings")]
    KeyNotAList { path: PathBuf, key: &'static str },

    #[error("\"{key}\" key in {path} is an empty list")]
    KeyEmptyList { path: PathBuf, key: &'static str },

    #[error("\"projects\" key missing in manifest {path}")]
    MissingProjects { path: PathBuf },

    #[error("project {project} in manifest must be a mapping")]
    ProjectNotAMapping { project: String },

    #[error("\"{key}\" key missing from project {project} in manifest")]
    MissingKey { project: String, key: &'static str },

    #[error("unknown key \"{key}\" for project {project} specified in manifest")]
    UnknownKey { project: String, key: String },

    #[error("\"{key}\" key in project {project} must be {expected}")]
    WrongShape {
        project: String,
        key: &'static str,
        expected: &'static str,
    },

    #[error("project {project} has duplicate dependency {dep}")]
    DuplicateDep { project: String, dep: String },

    #[error("unknown build tool \"{tool}\" for project {project}")]
    UnknownBuildTool { project: String, tool: String },

    #[error(
        "cannot find manifest {include} included by {path}\nsearch paths: {searched:?}"
    )]
    IncludeNotFound {
        include: String,
        path: PathBuf,
        searched: Vec<PathBuf>,
    },

    #[error("cannot include {child} from {parent}, as the two share projects {projects:?}")]
    ProjectConflict {
        child: PathBuf,
        parent: PathBuf,
        projects: Vec<String>,
    },

    #[error("project {project} dependency {dep} not found in the manifest")]
    UnknownDependency { project: String, dep: String },

    #[error("unknown project {name}")]
    UnknownProject { name: String },
}

/// The fully merged project graph.
#[derive(Debug, Clone)]
pub struct Manifest {
    projects: BTreeMap<String, Project>,
    order: Vec<String>,
}

impl Manifest {
    /// Parse the manifest at `manifest_path`, merge its includes, and
    /// validate the result. `root` is the root directory; project source
    /// paths are computed as siblings of it.
    pub fn load(root: &Path, manifest_path: &Path) -> Result<Manifest, ManifestError> {
        let top = parse_file(root, manifest_path)?;

        let mut projects: BTreeMap<String, Project> = BTreeMap::new();
        let mut order: Vec<String> = Vec::new();
        let top_includes = include_paths(&top)?;
        for (name, project) in top.projects {
            order.push(name.clone());
            projects.insert(name, project);
        }

        // Breadth-first include merge. Seeding the set with the top
        // manifest itself keeps self-referential include graphs
        // terminating too.
        let mut included: HashSet<PathBuf> = HashSet::new();
        included.insert(normalize_path(manifest_path));
        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        for path in top_includes {
            if included.insert(path.clone()) {
                queue.push_back(path);
            }
        }

        while let Some(path) = queue.pop_front() {
            let raw = parse_file(root, &path)?;
            tracing::debug!(
                "merging manifest {} into {}",
                path.display(),
                manifest_path.display()
            );

            let conflicts: Vec<String> = raw
                .projects
                .iter()
                .map(|(name, _)| name.clone())
                .filter(|name| projects.contains_key(name))
                .collect();
            if !conflicts.is_empty() {
                return Err(ManifestError::ProjectConflict {
                    child: path,
                    parent: manifest_path.to_path_buf(),
                    projects: conflicts,
                });
            }

            let raw_includes = include_paths(&raw)?;
            for (name, project) in raw.projects {
                order.push(name.clone());
                projects.insert(name, project);
            }
            for include in raw_includes {
                if included.insert(include.clone()) {
                    queue.push_back(include);
                }
            }
        }

        // Compute the reverse-dependency lists.
        for name in &order {
            let deps = projects[name].deps.clone();
            for dep in deps {
                match projects.get_mut(&dep) {
                    Some(target) => target.downstream.push(name.clone()),
                    None => {
                        return Err(ManifestError::UnknownDependency {
                            project: name.clone(),
                            dep,
                        })
                    }
                }
            }
        }

        Ok(Manifest { projects, order })
    }

    /// Look up a project by name.
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    /// Look up a project by name, failing with `UnknownProject`.
    pub fn get(&self, name: &str) -> Result<&Project, ManifestError> {
        self.projects
            .get(name)
            .ok_or_else(|| ManifestError::UnknownProject {
                name: name.to_string(),
            })
    }

    /// Whether a project with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.projects.contains_key(name)
    }

    /// Project names in declaration order (first manifest first, then
    /// includes in merge order).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of declared projects.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the manifest declares no projects.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

struct RawManifest {
    path: PathBuf,
    includes: Vec<String>,
    search_paths: Vec<String>,
    projects: Vec<(String, Project)>,
}

const PROJECT_KEYS: &[&str] = &["build", "deps", "env", "args", "targets", "tests"];

fn parse_file(root: &Path, path: &Path) -> Result<RawManifest, ManifestError> {
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_yaml::from_str(&text).map_err(|source| ManifestError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    let map = doc.as_mapping().ok_or_else(|| ManifestError::NotAMapping {
        path: path.to_path_buf(),
    })?;

    let includes = string_list(map, "include", path)?;
    let search_paths = string_list(map, "search-path", path)?;

    let mut projects = Vec::new();
    match map.get("projects") {
        None => {
            if includes.is_empty() {
                return Err(ManifestError::MissingProjects {
                    path: path.to_path_buf(),
                });
            }
        }
        Some(value) => {
            let mapping = value.as_mapping().ok_or_else(|| ManifestError::NotAMapping {
                path: path.to_path_buf(),
            })?;
            for (key, props) in mapping {
                let name = key
                    .as_str()
                    .ok_or_else(|| ManifestError::NotAMapping {
                        path: path.to_path_buf(),
                    })?
                    .to_string();
                let project = parse_project(root, &name, props)?;
                projects.push((name, project));
            }
        }
    }

    Ok(RawManifest {
        path: path.to_path_buf(),
        includes,
        search_paths,
        projects,
    })
}

/// Read an optional top-level key that, when present, must be a non-empty
/// list of strings.
fn string_list(
    map: &serde_yaml::Mapping,
    key: &'static str,
    path: &Path,
) -> Result<Vec<String>, ManifestError> {
    let value = match map.get(key) {
        None => return Ok(Vec::new()),
        Some(value) => value,
    };
    let seq = value.as_sequence().ok_or_else(|| ManifestError::KeyNotAList {
        path: path.to_path_buf(),
        key,
    })?;
    if seq.is_empty() {
        return Err(ManifestError::KeyEmptyList {
            path: path.to_path_buf(),
            key,
        });
    }
    seq.iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| ManifestError::KeyNotAList {
                    path: path.to_path_buf(),
                    key,
                })
        })
        .collect()
}

fn parse_project(root: &Path, name: &str, value: &Value) -> Result<Project, ManifestError> {
    let props = value
        .as_mapping()
        .ok_or_else(|| ManifestError::ProjectNotAMapping {
            project: name.to_string(),
        })?;

    for key in props.keys() {
        let key = key.as_str().unwrap_or_default();
        if !PROJECT_KEYS.contains(&key) {
            return Err(ManifestError::UnknownKey {
                project: name.to_string(),
                key: key.to_string(),
            });
        }
    }

    let build = match props.get("build") {
        None => {
            return Err(ManifestError::MissingKey {
                project: name.to_string(),
                key: "build",
            })
        }
        Some(value) => {
            let tag = value.as_str().ok_or_else(|| ManifestError::WrongShape {
                project: name.to_string(),
                key: "build",
                expected: "a string",
            })?;
            tag.parse::<BuildTool>()
                .map_err(|_| ManifestError::UnknownBuildTool {
                    project: name.to_string(),
                    tool: tag.to_string(),
                })?
        }
    };

    let deps = parse_deps(name, props.get("deps"))?;
    let env = parse_env(name, props.get("env"))?;
    let args = parse_args(name, props.get("args"))?;
    let targets = parse_targets(name, props.get("targets"))?;
    let tests = parse_tests(name, props.get("tests"))?;

    Ok(Project {
        name: name.to_string(),
        build,
        deps,
        env,
        args,
        targets,
        tests,
        path: workspace::source_parent(root).join(name),
        downstream: Vec::new(),
    })
}

fn parse_deps(project: &str, value: Option<&Value>) -> Result<Vec<String>, ManifestError> {
    let value = match value {
        None => return Ok(Vec::new()),
        Some(value) => value,
    };
    let seq = value.as_sequence().ok_or_else(|| ManifestError::WrongShape {
        project: project.to_string(),
        key: "deps",
        expected: "a list of strings",
    })?;

    let mut deps = Vec::new();
    let mut seen = HashSet::new();
    for entry in seq {
        let dep = entry
            .as_str()
            .ok_or_else(|| ManifestError::WrongShape {
                project: project.to_string(),
                key: "deps",
                expected: "a list of strings",
            })?
            .to_string();
        if !seen.insert(dep.clone()) {
            return Err(ManifestError::DuplicateDep {
                project: project.to_string(),
                dep,
            });
        }
        deps.push(dep);
    }
    Ok(deps)
}

fn parse_env(
    project: &str,
    value: Option<&Value>,
) -> Result<Vec<(String, String)>, ManifestError> {
    let value = match value {
        None => return Ok(Vec::new()),
        Some(value) => value,
    };
    let mapping = value.as_mapping().ok_or_else(|| ManifestError::WrongShape {
        project: project.to_string(),
        key: "env",
        expected: "a mapping of strings to strings",
    })?;

    let mut env = Vec::new();
    for (k, v) in mapping {
        let (Some(k), Some(v)) = (k.as_str(), v.as_str()) else {
            return Err(ManifestError::WrongShape {
                project: project.to_string(),
                key: "env",
                expected: "a mapping of strings to strings",
            });
        };
        env.push((k.to_string(), v.to_string()));
    }
    Ok(env)
}

fn parse_args(project: &str, value: Option<&Value>) -> Result<Vec<String>, ManifestError> {
    let value = match value {
        None => return Ok(Vec::new()),
        Some(value) => value,
    };
    let seq = value.as_sequence().ok_or_else(|| ManifestError::WrongShape {
        project: project.to_string(),
        key: "args",
        expected: "a list of strings",
    })?;

    // Each entry is whitespace-split so "-D foo" becomes separate tokens,
    // which is what process execution requires.
    let mut args = Vec::new();
    for entry in seq {
        let arg = entry.as_str().ok_or_else(|| ManifestError::WrongShape {
            project: project.to_string(),
            key: "args",
            expected: "a list of strings",
        })?;
        args.extend(arg.split_whitespace().map(str::to_string));
    }
    Ok(args)
}

fn parse_targets(project: &str, value: Option<&Value>) -> Result<Vec<String>, ManifestError> {
    match value {
        None => Ok(DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect()),
        // An explicit null means "no targets".
        Some(Value::Null) => Ok(Vec::new()),
        Some(value) => {
            let seq = value.as_sequence().ok_or_else(|| ManifestError::WrongShape {
                project: project.to_string(),
                key: "targets",
                expected: "a list of strings",
            })?;
            seq.iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| ManifestError::WrongShape {
                            project: project.to_string(),
                            key: "targets",
                            expected: "a list of strings",
                        })
                })
                .collect()
        }
    }
}

fn parse_tests(project: &str, value: Option<&Value>) -> Result<Vec<TestSuite>, ManifestError> {
    let wrong_shape = || ManifestError::WrongShape {
        project: project.to_string(),
        key: "tests",
        expected: "a list of mappings with \"cwd\" and \"cmds\" keys",
    };

    let value = match value {
        None => return Ok(Vec::new()),
        Some(value) => value,
    };
    let seq = value.as_sequence().ok_or_else(wrong_shape)?;

    let mut tests = Vec::new();
    for entry in seq {
        let props = entry.as_mapping().ok_or_else(wrong_shape)?;
        let cwd = props
            .get("cwd")
            .and_then(Value::as_str)
            .ok_or_else(wrong_shape)?
            .to_string();
        let cmds = props
            .get("cmds")
            .and_then(Value::as_sequence)
            .ok_or_else(wrong_shape)?
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(wrong_shape))
            .collect::<Result<Vec<_>, _>>()?;
        tests.push(TestSuite { cwd, cmds });
    }
    Ok(tests)
}

/// Resolve the absolute paths included by a parsed manifest. Relative
/// entries are searched in the manifest's own directory first and then in
/// each `search-path` entry; directories expand to their `*.yaml`/`*.yml`
/// regular files, sorted for deterministic merge order.
fn include_paths(raw: &RawManifest) -> Result<Vec<PathBuf>, ManifestError> {
    if raw.includes.is_empty() {
        return Ok(Vec::new());
    }

    let manifest_dir = normalize_path(raw.path.parent().unwrap_or_else(|| Path::new(".")));
    let mut search: Vec<PathBuf> = vec![manifest_dir.clone()];
    for entry in &raw.search_paths {
        search.push(normalize_path(&manifest_dir.join(entry)));
    }

    let mut resolved = Vec::new();
    for include in &raw.includes {
        let path = if Path::new(include).is_absolute() {
            PathBuf::from(include)
        } else {
            match search
                .iter()
                .map(|dir| normalize_path(&dir.join(include)))
                .find(|candidate| candidate.exists())
            {
                Some(path) => path,
                None => {
                    return Err(ManifestError::IncludeNotFound {
                        include: include.clone(),
                        path: raw.path.clone(),
                        searched: search,
                    })
                }
            }
        };

        if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&path)
                .map_err(|source| ManifestError::Unreadable {
                    path: path.clone(),
                    source,
                })?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| {
                    p.is_file()
                        && matches!(
                            p.extension().and_then(|e| e.to_str()),
                            Some("yaml") | Some("yml")
                        )
                })
                .collect();
            files.sort();
            resolved.extend(files);
        } else {
            resolved.push(path);
        }
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn root_of(tmp: &TempDir) -> PathBuf {
        tmp.path().join(".flotilla")
    }

    #[test]
    fn test_parse_basic_manifest() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  libfoo:\n    build: cmake\n  app:\n    build: meson\n    deps: [libfoo]\n    args: [\"-D opt=1\"]\n",
        );

        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        assert_eq!(m.names().collect::<Vec<_>>(), vec!["libfoo", "app"]);

        let libfoo = m.project("libfoo").unwrap();
        assert_eq!(libfoo.downstream, vec!["app"]);
        assert_eq!(libfoo.targets, vec!["install"]);
        assert_eq!(libfoo.path, tmp.path().join("libfoo"));

        let app = m.project("app").unwrap();
        assert_eq!(app.deps, vec!["libfoo"]);
        assert_eq!(app.args, vec!["-D", "opt=1"]);
    }

    #[test]
    fn test_missing_build_key() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(tmp.path(), "flotilla.yaml", "projects:\n  a:\n    deps: []\n");

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::MissingKey { key: "build", .. }));
    }

    #[test]
    fn test_unknown_project_key() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: cmake\n    bogus: 1\n",
        );

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownKey { .. }));
    }

    #[test]
    fn test_unknown_build_tool() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: bazel\n",
        );

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownBuildTool { .. }));
    }

    #[test]
    fn test_duplicate_dependency() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: cmake\n  b:\n    build: cmake\n    deps: [a, a]\n",
        );

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::DuplicateDep { .. }));
    }

    #[test]
    fn test_deps_wrong_shape() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: cmake\n    deps: a-string\n",
        );

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::WrongShape { key: "deps", .. }));
    }

    #[test]
    fn test_unknown_dependency_after_merge() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: cmake\n    deps: [ghost]\n",
        );

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::UnknownDependency { .. }));
    }

    #[test]
    fn test_targets_null_means_no_targets() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: cmake\n    targets: null\n  b:\n    build: cmake\n    targets: [all, check]\n",
        );

        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        assert!(m.project("a").unwrap().targets.is_empty());
        assert_eq!(m.project("b").unwrap().targets, vec!["all", "check"]);
    }

    #[test]
    fn test_env_preserves_declaration_order() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: cmake\n    env:\n      ZVAR: z\n      AVAR: a\n",
        );

        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        let env = &m.project("a").unwrap().env;
        assert_eq!(env[0].0, "ZVAR");
        assert_eq!(env[1].0, "AVAR");
    }

    #[test]
    fn test_include_merge() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "extra.yaml", "projects:\n  libbar:\n    build: meson\n");
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "include: [extra.yaml]\nprojects:\n  app:\n    build: cmake\n    deps: [libbar]\n",
        );

        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        assert_eq!(m.names().collect::<Vec<_>>(), vec!["app", "libbar"]);
        assert_eq!(m.project("libbar").unwrap().downstream, vec!["app"]);
    }

    #[test]
    fn test_include_conflict_names_project() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "extra.yaml", "projects:\n  app:\n    build: meson\n");
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "include: [extra.yaml]\nprojects:\n  app:\n    build: cmake\n",
        );

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        match err {
            ManifestError::ProjectConflict { projects, .. } => {
                assert_eq!(projects, vec!["app"]);
            }
            other => panic!("expected ProjectConflict, got {other}"),
        }
    }

    #[test]
    fn test_diamond_include_merges_once() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "shared.yaml", "projects:\n  base:\n    build: cmake\n");
        write(tmp.path(), "left.yaml", "include: [shared.yaml]\nprojects:\n  left:\n    build: cmake\n");
        write(tmp.path(), "right.yaml", "include: [shared.yaml]\nprojects:\n  right:\n    build: cmake\n");
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "include: [left.yaml, right.yaml]\nprojects:\n  app:\n    build: cmake\n",
        );

        // shared.yaml is reachable twice; a second merge would be a
        // project conflict with itself.
        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        assert_eq!(m.len(), 4);
        assert!(m.contains("base"));
    }

    #[test]
    fn test_include_directory_expands_yaml_files() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("manifests");
        std::fs::create_dir(&dir).unwrap();
        write(&dir, "one.yaml", "projects:\n  one:\n    build: cmake\n");
        write(&dir, "two.yml", "projects:\n  two:\n    build: cmake\n");
        write(&dir, "notes.txt", "not a manifest");
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "include: [manifests]\nprojects:\n  app:\n    build: cmake\n",
        );

        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        assert!(m.contains("one"));
        assert!(m.contains("two"));
        assert_eq!(m.len(), 3);
    }

    #[test]
    fn test_search_path_resolution() {
        let tmp = TempDir::new().unwrap();
        let vendor = tmp.path().join("vendor");
        std::fs::create_dir(&vendor).unwrap();
        write(&vendor, "dep.yaml", "projects:\n  dep:\n    build: cmake\n");
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "include: [dep.yaml]\nsearch-path: [vendor]\nprojects:\n  app:\n    build: cmake\n",
        );

        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        assert!(m.contains("dep"));
    }

    #[test]
    fn test_include_not_found() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "include: [missing.yaml]\nprojects:\n  app:\n    build: cmake\n",
        );

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(err, ManifestError::IncludeNotFound { .. }));
    }

    #[test]
    fn test_include_must_be_nonempty_list() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(tmp.path(), "flotilla.yaml", "include: []\n");

        let err = Manifest::load(&root_of(&tmp), &manifest).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::KeyEmptyList { key: "include", .. }
        ));
    }

    #[test]
    fn test_tests_key_parses() {
        let tmp = TempDir::new().unwrap();
        let manifest = write(
            tmp.path(),
            "flotilla.yaml",
            "projects:\n  a:\n    build: meson\n    tests:\n      - cwd: \"${BUILD_DIR}\"\n        cmds: [\"ninja test\"]\n",
        );

        let m = Manifest::load(&root_of(&tmp), &manifest).unwrap();
        let tests = &m.project("a").unwrap().tests;
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].cwd, "${BUILD_DIR}");
        assert_eq!(tests[0].cmds, vec!["ninja test"]);
    }

    #[test]
    fn test_unreadable_manifest() {
        let tmp = TempDir::new().unwrap();
        let err =
            Manifest::load(&root_of(&tmp), &tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ManifestError::Unreadable { .. }));
    }
}
