//! Dev-server lifecycle guard: probing, spawning, and stopping the local
//! application server around a test suite run

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, TestingError};

/// Guards the lifecycle of the local development server for one suite run.
///
/// The guard only ever stops a server it started itself: when the probe
/// finds a server already listening on the configured pair, the guard defers
/// to it and owns nothing. Ownership and the process handle are one field,
/// so signaling a server someone else started is not representable.
pub struct ServerGuard {
    config: ServerConfig,
    process: Option<Child>,
}

impl ServerGuard {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            process: None,
        }
    }

    /// Whether something is accepting connections on the configured pair.
    ///
    /// A liveness probe only: a successful TCP connect counts as running and
    /// the connection is dropped immediately, with no protocol-level health
    /// check. A port value that does not parse counts as not running.
    pub fn is_server_running(&self) -> bool {
        let Some(port) = self.config.port_number() else {
            debug!(port = %self.config.port, "port does not parse, treating server as not running");
            return false;
        };

        let addrs = match (self.config.host.as_str(), port).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(_) => return false,
        };

        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.config.probe_timeout()).is_ok() {
                return true;
            }
        }
        false
    }

    /// Start the server unless one is already reachable.
    ///
    /// Spawns `<entrypoint> serve` with the application base path as working
    /// directory and streams the child's stdout and stderr to our own stdout
    /// as they arrive. Does not wait for the server to become ready; callers
    /// that need readiness poll [`ServerGuard::wait_until_running`].
    ///
    /// Calling `start` again while a process is owned is a no-op, so an
    /// accidental double-call cannot double-launch.
    pub fn start(&mut self) -> Result<()> {
        if self.process.is_some() {
            return Ok(());
        }

        if self.is_server_running() {
            info!(
                host = %self.config.host,
                port = %self.config.port,
                "server already running, deferring to it"
            );
            return Ok(());
        }

        let entrypoint = self.config.entrypoint_path();
        info!(entrypoint = %entrypoint.display(), "starting dev server");

        let mut child = Command::new(&entrypoint)
            .arg("serve")
            .current_dir(&self.config.base_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TestingError::ServerStartup(format!(
                    "failed to spawn {}: {}",
                    entrypoint.display(),
                    e
                ))
            })?;

        if let Some(stdout) = child.stdout.take() {
            forward_output(stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            forward_output(stderr);
        }

        self.process = Some(child);
        Ok(())
    }

    /// Stop the server if this guard started it.
    ///
    /// Sends SIGTERM and returns: there is no wait for exit and no SIGKILL
    /// escalation, so a server that ignores the signal outlives the suite.
    /// A guard that deferred to an external server sends nothing.
    pub fn stop(&mut self) {
        let Some(child) = self.process.take() else {
            return;
        };

        info!(pid = child.id(), "stopping dev server");

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(child.id() as i32);
            if let Err(e) = kill(pid, Signal::SIGTERM) {
                warn!(pid = child.id(), "failed to signal server: {}", e);
            }
        }

        #[cfg(not(unix))]
        {
            let mut child = child;
            let _ = child.kill();
        }
    }

    /// Poll the liveness probe until it succeeds or `timeout` elapses.
    pub fn wait_until_running(&self, timeout: Duration) -> bool {
        let start = Instant::now();
        while start.elapsed() < timeout {
            if self.is_server_running() {
                return true;
            }
            thread::sleep(Duration::from_millis(100));
        }
        false
    }

    /// Whether this guard owns the running server process.
    pub fn owns_process(&self) -> bool {
        self.process.is_some()
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Stream a child output pipe to our own stdout, chunk by chunk.
fn forward_output(mut pipe: impl Read + Send + 'static) {
    thread::spawn(move || {
        let mut buf = [0u8; 4096];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    let _ = out.write_all(&buf[..n]);
                    let _ = out.flush();
                }
            }
        }
    });
}
