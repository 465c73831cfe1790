//! # Command Execution Module / 命令执行模块
//!
//! Runs a test's command line as a child process and captures its output.
//!
//! 将测试的命令行作为子进程运行并捕获其输出。

use anyhow::{Context, Result, anyhow};
use std::path::Path;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::infra::t;

/// How a command run ended.
/// 命令运行的结束方式。
#[derive(Debug)]
pub enum CommandStatus {
    /// The process exited; the status may or may not be success.
    Exited(ExitStatus),
    /// The process was killed after exceeding its timeout.
    TimedOut(Duration),
}

/// The result of running one command.
/// 运行一个命令的结果。
#[derive(Debug)]
pub struct CommandOutcome {
    pub status: CommandStatus,
    /// Combined stdout and stderr, line by line.
    /// 逐行合并的 stdout 和 stderr。
    pub output: String,
    pub elapsed: Duration,
}

/// Expands and splits `command_line`, then runs it in `cwd`.
///
/// The line goes through `shellexpand` (`~`, `$VAR`) and `shlex` word
/// splitting; it is not interpreted by a shell. Use `sh -c '...'` for
/// pipelines.
///
/// 展开并拆分 `command_line`，然后在 `cwd` 中运行。
/// 该行经过 `shellexpand`（`~`、`$VAR`）和 `shlex` 分词；不会由 shell 解释。
///
/// # Errors / 错误
/// Returns an error if the line cannot be expanded or parsed, is empty, or
/// the process cannot be spawned.
pub async fn run_command(
    command_line: &str,
    cwd: &Path,
    timeout: Option<Duration>,
) -> Result<CommandOutcome> {
    let expanded = shellexpand::full(command_line)
        .with_context(|| format!("Failed to expand command: {command_line}"))?
        .to_string();

    let parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow!("Failed to parse command: {}", expanded))?;
    let Some((program, args)) = parts.split_first() else {
        return Err(anyhow!("Empty command after parsing."));
    };

    debug!(program = %program, ?args, cwd = %cwd.display(), "spawning test command");

    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args).kill_on_drop(true).current_dir(cwd);

    let start = Instant::now();
    // Shared with the readers so a killed process keeps what it printed.
    let sink: OutputSink = Arc::new(tokio::sync::Mutex::new(String::new()));
    let captured = spawn_and_capture(cmd, Arc::clone(&sink));
    let (status, output) = match timeout {
        Some(limit) => match tokio::time::timeout(limit, captured).await {
            Ok((status, output)) => (
                CommandStatus::Exited(status.context("Failed to get process status")?),
                output,
            ),
            Err(_) => {
                debug!(?limit, "test command timed out");
                let partial = sink.lock().await.clone();
                (CommandStatus::TimedOut(limit), partial)
            }
        },
        None => {
            let (status, output) = captured.await;
            (
                CommandStatus::Exited(status.context("Failed to get process status")?),
                output,
            )
        }
    };

    Ok(CommandOutcome {
        status,
        output,
        elapsed: start.elapsed(),
    })
}

/// Buffer the stdout and stderr readers append to, line by line.
/// stdout 和 stderr 读取任务逐行追加的缓冲区。
pub type OutputSink = Arc<tokio::sync::Mutex<String>>;

/// Spawns a command, captures its stdout and stderr.
/// The output streams are read concurrently and combined into `output`, which
/// the caller may read even if this future is dropped before it completes.
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
/// * `output` - Where captured lines are appended.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The combined stdout and stderr as a `String`.
///
/// 派生一个命令，捕获其 stdout 和 stderr。
/// 输出流被并发读取并合并到一个字符串中。
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
    output: OutputSink,
) -> (std::io::Result<ExitStatus>, String) {
    // 配置命令以捕获 stdout 和 stderr。
    let mut child = match cmd
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let Some(stdout) = child.stdout.take() else {
        return (
            Err(std::io::Error::other(t!("command.capture_stdout_failed").to_string())),
            String::new(),
        );
    };
    let Some(stderr) = child.stderr.take() else {
        return (
            Err(std::io::Error::other(t!("command.capture_stderr_failed").to_string())),
            String::new(),
        );
    };

    let stdout_output = Arc::clone(&output);
    let stdout_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut output = stdout_output.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    });

    let stderr_output = Arc::clone(&output);
    let stderr_handle = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let mut output = stderr_output.lock().await;
            output.push_str(&line);
            output.push('\n');
        }
    });

    let status = child.wait().await;

    // 等待 stdout 和 stderr 读取任务完成，以确保所有输出都被捕获。
    if let Err(e) = stdout_handle.await {
        debug!("failed to join stdout task: {e}");
    }
    if let Err(e) = stderr_handle.await {
        debug!("failed to join stderr task: {e}");
    }

    let captured = output.lock().await.clone();
    (status, captured)
}
