//! Shared test scaffolding: a scripted in-memory docker.

use command_runner::{Command, ExitResult, ExitStatus, OutputMode, ProcessRunner};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A [`ProcessRunner`] that simulates the docker CLI against in-memory
/// state (images, containers, running containers) and records every
/// invocation, so orchestration sequencing can be asserted without a
/// docker daemon.
#[derive(Default)]
pub struct FakeDocker {
    state: Mutex<DockerState>,
}

#[derive(Default)]
struct DockerState {
    images: BTreeSet<String>,
    containers: BTreeSet<String>,
    running: BTreeSet<String>,
    log: Vec<String>,
}

impl FakeDocker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command line run so far, in order.
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    /// The recorded command lines starting with `prefix`.
    pub fn commands(&self, prefix: &str) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|line| line.starts_with(prefix))
            .collect()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().log.clear();
    }

    pub fn has_image(&self, tag: &str) -> bool {
        self.state.lock().unwrap().images.contains(tag)
    }

    pub fn has_container(&self, name: &str) -> bool {
        self.state.lock().unwrap().containers.contains(name)
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.state.lock().unwrap().running.contains(name)
    }
}

fn ok(stdout: String) -> command_runner::Result<ExitResult> {
    Ok(ExitResult {
        status: ExitStatus {
            code: Some(0),
            signal: None,
        },
        stdout,
        stderr: String::new(),
    })
}

fn fail(stderr: &str) -> command_runner::Result<ExitResult> {
    Ok(ExitResult {
        status: ExitStatus {
            code: Some(1),
            signal: None,
        },
        stdout: String::new(),
        stderr: stderr.to_string(),
    })
}

/// The value following `flag`, if present.
fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

impl ProcessRunner for FakeDocker {
    fn run(&self, command: &Command, _output: OutputMode) -> command_runner::Result<ExitResult> {
        let mut state = self.state.lock().unwrap();
        state.log.push(command.display());

        assert_eq!(command.get_program(), "docker", "only docker is scripted");
        let args: Vec<String> = command
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        match args[0].as_str() {
            "images" => {
                // docker images -q <tag>
                let tag = args.last().unwrap();
                let listed = if state.images.contains(tag) { "f00d\n" } else { "" };
                ok(listed.to_string())
            }
            "ps" => {
                let include_stopped = args.iter().any(|a| a == "-a");
                let filter = value_after(&args, "--filter")
                    .and_then(|f| f.strip_prefix("name="))
                    .unwrap_or("");
                let pool = if include_stopped {
                    &state.containers
                } else {
                    &state.running
                };
                let names: Vec<&str> = pool
                    .iter()
                    .filter(|name| name.contains(filter))
                    .map(String::as_str)
                    .collect();
                ok(names.join("\n"))
            }
            "build" => {
                let tag = value_after(&args, "-t").unwrap().to_string();
                state.images.insert(tag);
                ok(String::new())
            }
            "pull" => {
                state.images.insert(args[1].clone());
                ok(String::new())
            }
            "create" => {
                let name = value_after(&args, "--name").unwrap().to_string();
                let tag = args.last().unwrap();
                if !state.images.contains(tag) {
                    return fail(&format!("Unable to find image '{}'", tag));
                }
                if !state.containers.insert(name.clone()) {
                    return fail(&format!("Conflict. The container name \"{}\" is already in use", name));
                }
                ok(String::new())
            }
            "start" => {
                let name = args.last().unwrap().clone();
                if !state.containers.contains(&name) {
                    return fail(&format!("No such container: {}", name));
                }
                state.running.insert(name);
                ok(String::new())
            }
            "stop" => {
                let name = args.last().unwrap().clone();
                state.running.remove(&name);
                ok(String::new())
            }
            "rm" => {
                let name = args.last().unwrap().clone();
                if state.running.contains(&name) {
                    return fail(&format!("cannot remove a running container: {}", name));
                }
                state.containers.remove(&name);
                ok(String::new())
            }
            "rmi" => {
                state.images.remove(&args[1]);
                ok(String::new())
            }
            other => panic!("unscripted docker subcommand: {other}"),
        }
    }
}

/// Create a service directory with the given `service.json` content.
pub fn write_service(root: &Path, dir_name: &str, json: &str) -> PathBuf {
    let dir = root.join(dir_name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("service.json"), json).unwrap();
    dir
}
