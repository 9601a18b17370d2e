use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::config::LauncherConfig;
use crate::error::LaunchError;

#[cfg(windows)]
const SCRIPTS_DIR: &str = "Scripts";
#[cfg(not(windows))]
const SCRIPTS_DIR: &str = "bin";

/// How the external program ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl Completion {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// The renderer as seen from the menu: prepare its environment, then run it to completion.
pub trait Launcher {
    fn activate(&mut self) -> Result<(), LaunchError>;

    /// Blocks until the program exits. There is no timeout.
    fn run(&mut self) -> Result<Completion, LaunchError>;
}

#[derive(Debug, Clone)]
struct ActivatedEnv {
    root: PathBuf,
    path: OsString,
}

/// Runs the configured program inside a Python virtual environment.
#[derive(Debug)]
pub struct ExternalLauncher {
    config: LauncherConfig,
    env: Option<ActivatedEnv>,
}

impl ExternalLauncher {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config, env: None }
    }

    fn search_path(&self) -> Option<OsString> {
        match &self.env {
            Some(env) => Some(env.path.clone()),
            None => env::var_os("PATH"),
        }
    }
}

impl Launcher for ExternalLauncher {
    /// Does what `activate` does for a venv: point `VIRTUAL_ENV` at it and put its
    /// scripts directory first on `PATH`.
    fn activate(&mut self) -> Result<(), LaunchError> {
        let scripts = self.config.env_path().join(SCRIPTS_DIR);
        if !scripts.is_dir() {
            return Err(LaunchError::EnvMissing(scripts));
        }
        let scripts = scripts
            .canonicalize()
            .map_err(|_| LaunchError::EnvMissing(scripts.clone()))?;
        let root = scripts
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| scripts.clone());

        let mut paths = vec![scripts];
        if let Some(current) = env::var_os("PATH") {
            paths.extend(env::split_paths(&current));
        }
        let path = env::join_paths(paths)?;

        log::info!("activated environment {}", root.display());
        self.env = Some(ActivatedEnv { root, path });
        Ok(())
    }

    fn run(&mut self) -> Result<Completion, LaunchError> {
        let cwd = &self.config.base_dir;
        let program = which::which_in(&self.config.program, self.search_path(), cwd).map_err(
            |source| LaunchError::ProgramNotFound {
                program: self.config.program.clone(),
                source,
            },
        )?;

        let mut command = Command::new(&program);
        command.args(&self.config.args).current_dir(cwd);
        if let Some(env) = &self.env {
            command
                .env("VIRTUAL_ENV", &env.root)
                .env("PATH", &env.path)
                .env_remove("PYTHONHOME");
        }

        log::info!("running {} {:?}", program.display(), self.config.args);
        let status = command.status().map_err(|source| LaunchError::Spawn {
            program: self.config.program.clone(),
            source,
        })?;

        let completion = Completion {
            code: status.code(),
        };
        if completion.success() {
            log::info!("{} finished", self.config.program);
        } else {
            log::warn!("{} exited with {:?}", self.config.program, completion.code);
        }
        Ok(completion)
    }
}
