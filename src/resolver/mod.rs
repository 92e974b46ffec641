//! Dependency resolution: topological ordering over the project graph.

use thiserror::Error;

use crate::core::manifest::Manifest;

/// Error during dependency resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("projects {upstream} and {downstream} circularly depend on each other")]
    Cycle { upstream: String, downstream: String },

    #[error("project {name} is not defined in the manifest")]
    Unknown { name: String },
}

enum Frame<'a> {
    Enter { name: &'a str, parent: Option<&'a str> },
    Exit { name: &'a str },
}

/// Compute the transitive dependency closure of the requested projects as a
/// single topological order: every dependency precedes its dependents, and
/// each project appears exactly once even when reachable via multiple
/// paths.
///
/// The traversal is a depth-first post-order, driven by an explicit work
/// stack rather than call-stack recursion, so large graphs cannot overflow
/// the stack. Dependencies are visited in declaration order and requested
/// projects in request order, which makes the result stable across runs.
pub fn dependency_closure(
    manifest: &Manifest,
    requested: &[String],
) -> Result<Vec<String>, ResolveError> {
    let mut order: Vec<String> = Vec::new();
    let mut done: std::collections::HashSet<&str> = std::collections::HashSet::new();
    // Projects entered but not yet post-ordered. Reaching one of these
    // again means the graph has a cycle; reaching a `done` project is just
    // a diamond.
    let mut open: std::collections::HashSet<&str> = std::collections::HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    for name in requested {
        if done.contains(name.as_str()) {
            continue;
        }
        stack.push(Frame::Enter {
            name: name.as_str(),
            parent: None,
        });

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter { name, parent } => {
                    if done.contains(name) {
                        continue;
                    }
                    if open.contains(name) {
                        return Err(ResolveError::Cycle {
                            upstream: name.to_string(),
                            downstream: parent.unwrap_or(name).to_string(),
                        });
                    }
                    let project = manifest.project(name).ok_or_else(|| ResolveError::Unknown {
                        name: name.to_string(),
                    })?;

                    open.insert(name);
                    stack.push(Frame::Exit { name });
                    // Reversed so the first-declared dependency is visited
                    // first.
                    for dep in project.deps.iter().rev() {
                        stack.push(Frame::Enter {
                            name: dep,
                            parent: Some(name),
                        });
                    }
                }
                Frame::Exit { name } => {
                    open.remove(name);
                    done.insert(name);
                    order.push(name.to_string());
                }
            }
        }
    }

    Ok(order)
}
