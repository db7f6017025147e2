//! Child process execution and output relaying.

use crate::{
    config::Settings,
    error::{LauncherError, Result},
    provisioner::Provisioner,
};
use std::{
    ffi::OsStr,
    io,
    path::Path,
    process::{ExitStatus, Stdio},
};
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt},
    process::Command,
};

/// Runs the cached ws4sql executable, provisioning it first when needed.
#[derive(Clone, Debug)]
pub struct Launcher {
    provisioner: Provisioner,
}

impl Launcher {
    /// Creates a launcher for the given settings.
    pub fn new(settings: Settings) -> Result<Self> {
        Ok(Self::from_provisioner(Provisioner::new(settings)?))
    }

    /// Creates a launcher around an existing provisioner.
    pub fn from_provisioner(provisioner: Provisioner) -> Self {
        Self { provisioner }
    }

    /// The provisioner used before each launch.
    pub fn provisioner(&self) -> &Provisioner {
        &self.provisioner
    }

    /// Path of the cached executable.
    pub fn executable_path(&self) -> &Path {
        self.provisioner.executable_path()
    }

    /// Provisions ws4sql and runs it with `args`, relaying its output to
    /// this process's stdout and stderr.
    ///
    /// Resolves once the child exits: `Ok(())` for exit code 0,
    /// [`LauncherError::NonZeroExit`] with the child's code otherwise.
    pub async fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut stdout = tokio::io::stdout();
        let mut stderr = tokio::io::stderr();
        self.run_with_output(args, &mut stdout, &mut stderr).await
    }

    /// Like [`run`](Self::run), but relays the child's output to the given writers.
    pub async fn run_with_output<I, S, O, E>(
        &self,
        args: I,
        stdout: &mut O,
        stderr: &mut E,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
        O: AsyncWrite + Unpin,
        E: AsyncWrite + Unpin,
    {
        let executable = self.provisioner.ensure_executable().await?;
        spawn_and_wait(&executable, args, stdout, stderr).await
    }
}

/// Spawns `executable` with `args` and waits for it to exit.
///
/// stdin is inherited. stdout and stderr are piped and relayed concurrently,
/// chunk by chunk as the child produces them, so interleaving with the
/// child's own timing is preserved as closely as pipes allow.
pub async fn spawn_and_wait<I, S, O, E>(
    executable: &Path,
    args: I,
    stdout: &mut O,
    stderr: &mut E,
) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    O: AsyncWrite + Unpin,
    E: AsyncWrite + Unpin,
{
    log::debug!("Starting {}", executable.display());

    let mut child = Command::new(executable)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| LauncherError::Spawn {
            path: executable.to_path_buf(),
            source,
        })?;

    // Both pipes must be drained together or a chatty child blocks on the other one
    let (stdout_result, stderr_result) = tokio::join!(
        relay(child.stdout.take(), stdout),
        relay(child.stderr.take(), stderr)
    );
    stdout_result?;
    stderr_result?;

    let status = child.wait().await?;
    log::debug!("{} exited with {}", executable.display(), status);
    exit_result(status)
}

/// Maps a child's exit status onto the launcher result.
pub fn exit_result(status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    if let Some(code) = status.code() {
        return Err(LauncherError::NonZeroExit { code });
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Err(LauncherError::Signaled { signal });
        }
    }

    Err(LauncherError::NonZeroExit { code: 1 })
}

async fn relay<R, W>(source: Option<R>, sink: &mut W) -> io::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let Some(mut source) = source else {
        return Ok(());
    };

    let mut buffer = vec![0u8; 8192];
    loop {
        let n = source.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        sink.write_all(&buffer[..n]).await?;
        sink.flush().await?;
    }
    Ok(())
}
