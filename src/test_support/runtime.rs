use anyhow::{bail, Result};
use std::env;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Ensure a container runtime socket is available for testcontainers.
///
/// testcontainers talks to the Docker API; Podman works too once
/// `DOCKER_HOST` points at its socket.
///
/// # Errors
/// Returns an error if no Docker/Podman socket can be found.
pub fn ensure_container_runtime() -> Result<()> {
    static INIT: OnceLock<Result<(), String>> = OnceLock::new();
    match INIT.get_or_init(init_container_runtime) {
        Ok(()) => Ok(()),
        Err(message) => bail!("{message}"),
    }
}

fn init_container_runtime() -> Result<(), String> {
    if let Ok(docker_host) = env::var("DOCKER_HOST") {
        return validate_docker_host(&docker_host);
    }

    if socket_connectable(Path::new("/var/run/docker.sock")) {
        return Ok(());
    }

    if let Some(path) = find_podman_socket() {
        if socket_connectable(&path) {
            env::set_var("DOCKER_HOST", format!("unix://{}", path.display()));
            return Ok(());
        }
    }

    Err(
        "No container runtime socket found or reachable. Start the Docker daemon, \
         start `podman.socket`, or set `DOCKER_HOST`."
            .to_string(),
    )
}

fn validate_docker_host(docker_host: &str) -> Result<(), String> {
    let path = docker_host.strip_prefix("unix://").unwrap_or(docker_host);
    if !path.starts_with('/') {
        // Remote hosts (tcp://...) cannot be probed here.
        return Ok(());
    }
    if socket_connectable(Path::new(path)) {
        return Ok(());
    }
    Err(format!(
        "`DOCKER_HOST` points to `{docker_host}`, but the socket is not accepting connections. \
         Start `podman.socket` or the Docker daemon."
    ))
}

fn find_podman_socket() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(runtime_dir) = env::var("XDG_RUNTIME_DIR") {
        candidates.push(PathBuf::from(runtime_dir).join("podman/podman.sock"));
    }
    candidates.push(PathBuf::from("/var/run/podman/podman.sock"));
    candidates.push(PathBuf::from("/run/podman/podman.sock"));

    candidates.into_iter().find(|path| path.exists())
}

fn socket_connectable(path: &Path) -> bool {
    path.exists() && UnixStream::connect(path).is_ok()
}
