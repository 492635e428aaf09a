use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StreamMode {
    Inherit,
    Capture,
}

impl StreamMode {
    fn stdio(self) -> Stdio {
        match self {
            StreamMode::Inherit => Stdio::inherit(),
            StreamMode::Capture => Stdio::piped(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
    pub current_dir: Option<PathBuf>,
    pub stdout: StreamMode,
    pub stderr: StreamMode,
}

impl CommandSpec {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            stdout: StreamMode::Inherit,
            stderr: StreamMode::Inherit,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    pub fn capture(mut self, stdout: StreamMode, stderr: StreamMode) -> Self {
        self.stdout = stdout;
        self.stderr = stderr;
        self
    }

    /// Command line as a single display string, e.g. `terraform output -json`.
    pub fn display(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug)]
pub struct CommandOutput {
    pub status: ExitStatus,
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
}

/// Runs the command to completion. Streams in `Capture` mode are returned as
/// buffers; `Inherit` streams go straight to this process's handles.
pub fn run(spec: &CommandSpec) -> io::Result<CommandOutput> {
    let mut command = Command::new(&spec.program);
    command.args(&spec.args);
    if let Some(dir) = &spec.current_dir {
        command.current_dir(dir);
    }
    command
        .stdin(Stdio::null())
        .stdout(spec.stdout.stdio())
        .stderr(spec.stderr.stdio());

    let output = command.output()?;
    Ok(CommandOutput {
        status: output.status,
        stdout: (spec.stdout == StreamMode::Capture).then_some(output.stdout),
        stderr: (spec.stderr == StreamMode::Capture).then_some(output.stderr),
    })
}
