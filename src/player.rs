//! # External Player
//!
//! The terminal cannot show video, so clips and rendered output are handed to
//! an external player (`mpv` by default, configurable in `config.json`).
//!
//! The player string is split on whitespace, so extra flags can be given:
//!
//! ```text
//! "player": "mpv --loop --no-terminal"
//! ```
//!
//! The player runs with all stdio nulled so it cannot draw over the TUI. A
//! background thread waits on it so no zombie is left when it exits.

use anyhow::{bail, Context, Result};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

/// Build the command that plays `url` with `player`.
pub fn player_command(player: &str, url: &str) -> Result<Command> {
    let mut parts = player.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("No media player configured");
    };

    let mut command = Command::new(program);
    command
        .args(parts)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    Ok(command)
}

/// Launch `player` on `url` without blocking the caller.
///
/// The returned handle finishes once the player has exited and been reaped.
pub fn play(player: &str, url: &str) -> Result<JoinHandle<()>> {
    let mut command = player_command(player, url)?;
    let mut child = command
        .spawn()
        .with_context(|| format!("Failed to launch player '{}' for {}", player, url))?;
    let pid = child.id();
    tracing::info!(player, url, pid, "launched player");

    let reaper = thread::Builder::new()
        .name(format!("player-{pid}"))
        .spawn(move || match child.wait() {
            Ok(status) => tracing::debug!(pid, %status, "player exited"),
            Err(e) => tracing::warn!(pid, "failed to wait for player: {}", e),
        })
        .context("Failed to start player watcher")?;
    Ok(reaper)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_command_appends_url() {
        let command = player_command("mpv --loop", "http://x/temp_videos/a.mp4").unwrap();
        assert_eq!(command.get_program(), "mpv");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["--loop", "http://x/temp_videos/a.mp4"]);
    }

    #[test]
    fn test_empty_player_is_an_error() {
        let err = player_command("   ", "http://x").unwrap_err();
        assert!(err.to_string().contains("No media player configured"));
    }

    #[cfg(target_os = "linux")]
    fn zombie_children() -> usize {
        let me = std::process::id().to_string();
        let Ok(entries) = std::fs::read_dir("/proc") else {
            return 0;
        };
        entries
            .flatten()
            .filter_map(|entry| std::fs::read_to_string(entry.path().join("stat")).ok())
            .filter(|stat| {
                // "pid (comm) state ppid ..."; comm may contain spaces
                let Some(rest) = stat.rsplit_once(')').map(|(_, rest)| rest) else {
                    return false;
                };
                let mut fields = rest.split_whitespace();
                fields.next() == Some("Z") && fields.next() == Some(me.as_str())
            })
            .count()
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_exited_players_are_reaped() {
        let handles: Vec<_> = (0..5)
            .map(|_| play("true", "http://x/final_videos/out.mp4").unwrap())
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(zombie_children(), 0);
    }

    #[test]
    fn test_play_missing_binary_errors() {
        let result = play("clipdeck-player-that-does-not-exist", "http://x");
        assert!(result.is_err());
    }
}
