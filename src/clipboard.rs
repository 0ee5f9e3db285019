/*!
 * System clipboard sink
 *
 * Detects a clipboard command for the current platform and pipes the text
 * into its stdin.
 */

use std::env;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use log::debug;

use crate::error::SinkError;
use crate::sink::Sink;

/// Known clipboard commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardProvider {
    /// tmux paste buffer
    Tmux,
    /// X11 clipboard with xclip
    Xclip,
    /// X11 clipboard with xsel
    Xsel,
    /// Wayland clipboard
    Wayland,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (via WSL)
    Wsl,
    /// Termux clipboard
    Termux,
}

impl ClipboardProvider {
    /// Command and arguments that read the clipboard text from stdin
    fn command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Tmux => ("tmux", &["load-buffer", "-w", "-"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["-b", "-i"]),
            Self::Wayland => ("wl-copy", &[]),
            Self::MacOS => ("pbcopy", &[]),
            Self::Wsl => ("clip.exe", &[]),
            Self::Termux => ("termux-clipboard-set", &[]),
        }
    }
}

/// Delivers text to the first usable clipboard provider
#[derive(Debug, Clone)]
pub struct ClipboardSink {
    providers: Vec<ClipboardProvider>,
}

impl ClipboardSink {
    /// Probe the system for clipboard commands
    pub fn detect() -> Self {
        Self {
            providers: determine_clipboard_providers(),
        }
    }

    /// Use an explicit provider list, in order of preference
    pub fn with_providers(providers: Vec<ClipboardProvider>) -> Self {
        Self { providers }
    }
}

impl Sink for ClipboardSink {
    fn name(&self) -> String {
        match self.providers.first() {
            Some(p) => format!("clipboard ({})", p.command().0),
            None => "clipboard".to_string(),
        }
    }

    fn deliver(&self, text: &str) -> Result<(), SinkError> {
        let provider = self
            .providers
            .first()
            .copied()
            .ok_or(SinkError::NoClipboardFound)?;
        let (cmd, args) = provider.command();
        debug!("copying {} bytes with {}", text.len(), cmd);
        execute_clipboard_command(cmd, args, text)
    }
}

/// Check if a command exists on the system
pub fn command_exists(command: &str) -> bool {
    if let Some(paths) = env::var_os("PATH") {
        if env::split_paths(&paths).any(|dir| Path::new(&dir).join(command).is_file()) {
            return true;
        }
    }

    Command::new(command)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Spawn the command, write the text to its stdin and wait for it
fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<(), SinkError> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .spawn()
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SinkError::CommandNotFound(cmd.to_string()),
            _ => SinkError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)),
        })?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            SinkError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin
            .write_all(text.as_bytes())
            .and_then(|_| stdin.write_all(b"\n"))
            .map_err(|e| SinkError::CommandFailed(format!("Failed to write to {}: {}", cmd, e)))?;
    }
    // Close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child
        .wait()
        .map_err(|e| SinkError::CommandFailed(format!("Failed to wait for {}: {}", cmd, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(SinkError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

static PLATFORM: OnceLock<&'static str> = OnceLock::new();

fn get_platform() -> &'static str {
    PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            "macos"
        } else if cfg!(target_os = "windows") {
            "windows"
        } else if cfg!(target_os = "linux") {
            if env::var("WSL_DISTRO_NAME").is_ok() {
                "wsl"
            } else {
                "linux"
            }
        } else if cfg!(target_os = "android") {
            "android"
        } else {
            "unknown"
        }
    })
}

/// Providers to try, best first
fn determine_clipboard_providers() -> Vec<ClipboardProvider> {
    let mut providers = Vec::with_capacity(3);

    match get_platform() {
        "macos" => {
            if command_exists("pbcopy") {
                providers.push(ClipboardProvider::MacOS);
            }
        }
        "windows" | "wsl" => {
            if command_exists("clip.exe") {
                providers.push(ClipboardProvider::Wsl);
            }
        }
        "linux" => {
            if env::var_os("WAYLAND_DISPLAY").is_some() && command_exists("wl-copy") {
                providers.push(ClipboardProvider::Wayland);
            }
            if env::var_os("DISPLAY").is_some() {
                if command_exists("xsel") {
                    providers.push(ClipboardProvider::Xsel);
                }
                if command_exists("xclip") {
                    providers.push(ClipboardProvider::Xclip);
                }
            }
        }
        "android" => {
            if command_exists("termux-clipboard-set") {
                providers.push(ClipboardProvider::Termux);
            }
        }
        _ => {}
    }

    // Inside tmux with no desktop clipboard, fall back to the paste buffer
    if env::var_os("TMUX").is_some() && command_exists("tmux") {
        providers.push(ClipboardProvider::Tmux);
    }

    providers
}
