use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{program} not found (is it installed and on PATH?)")]
    NotFound { program: String },

    #[error("Failed to run {program}: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with status {}: {stderr}", describe_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{program} produced no output at {}", .path.display())]
    MissingOutput {
        program: String,
        path: PathBuf,
        stdout: String,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

/// Where a tool's standard output goes
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StdoutTarget {
    /// Keep it in [`ToolOutput::stdout`]
    #[default]
    Capture,
    /// Redirect into a file, created or truncated before the run
    File(PathBuf),
    Discard,
}

/// A fully specified external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub working_dir: Option<PathBuf>,
    pub stdout: StdoutTarget,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            stdout: StdoutTarget::Capture,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn stdout(mut self, target: StdoutTarget) -> Self {
        self.stdout = target;
        self
    }

    /// Shell-like rendering for log messages
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Exit code and captured streams of a finished tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into `ToolError::Failed`
    ///
    /// # Errors
    ///
    /// Returns `ToolError::Failed` carrying stderr if the exit code is not 0.
    pub fn check(self, program: &str) -> Result<Self, ToolError> {
        if self.success() {
            Ok(self)
        } else {
            Err(ToolError::Failed {
                program: program.to_string(),
                code: self.code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Runs external tools. Implementations must not interpret exit codes;
/// callers decide what counts as success.
pub trait ToolRunner {
    /// # Errors
    ///
    /// Returns `ToolError::NotFound` if the program cannot be located, or
    /// `ToolError::Io` if it cannot be started or its output file cannot be created.
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError>;
}

/// [`ToolRunner`] backed by `std::process::Command`
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Searched before `PATH`
    bin_dir: Option<PathBuf>,
}

impl ProcessRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bin_dir(bin_dir: Option<PathBuf>) -> Self {
        Self { bin_dir }
    }

    /// Executable path for `program`: inside `bin_dir` if present there, else the
    /// bare name for a `PATH` lookup.
    #[must_use]
    pub fn resolve(&self, program: &str) -> PathBuf {
        if let Some(dir) = &self.bin_dir {
            let candidate = dir.join(program);
            if candidate.exists() {
                return candidate;
            }
        }
        PathBuf::from(program)
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
        let program = &invocation.program;
        let executable = self.resolve(program);
        let io_error = |source: std::io::Error| ToolError::Io {
            program: program.clone(),
            source,
        };

        let mut cmd = Command::new(&executable);
        cmd.args(&invocation.args).stderr(Stdio::piped());
        if let Some(dir) = &invocation.working_dir {
            cmd.current_dir(dir);
        }
        match &invocation.stdout {
            StdoutTarget::Capture => {
                cmd.stdout(Stdio::piped());
            }
            StdoutTarget::File(path) => {
                cmd.stdout(Stdio::from(File::create(path).map_err(io_error)?));
            }
            StdoutTarget::Discard => {
                cmd.stdout(Stdio::null());
            }
        }

        debug!("Running '{}'", invocation.command_line());

        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound {
                    program: executable.display().to_string(),
                }
            } else {
                io_error(e)
            }
        })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// `path` with `suffix` appended to its file name (`a.fasta` + `.gb` = `a.fasta.gb`)
#[must_use]
pub fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted runner for exercising stages without external binaries.

    use std::cell::RefCell;

    use super::{ToolError, ToolInvocation, ToolOutput, ToolRunner};

    type Script = Box<dyn Fn(&ToolInvocation) -> Result<ToolOutput, ToolError>>;

    /// Records every invocation and answers with a per-test closure
    pub struct FakeRunner {
        pub calls: RefCell<Vec<ToolInvocation>>,
        script: Script,
    }

    impl FakeRunner {
        pub fn new(
            script: impl Fn(&ToolInvocation) -> Result<ToolOutput, ToolError> + 'static,
        ) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                script: Box::new(script),
            }
        }

        pub fn programs(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.program.clone()).collect()
        }
    }

    impl ToolRunner for FakeRunner {
        fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ToolError> {
            self.calls.borrow_mut().push(invocation.clone());
            (self.script)(invocation)
        }
    }

    pub fn ok() -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput {
            code: Some(0),
            ..ToolOutput::default()
        })
    }
}
