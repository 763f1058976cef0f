//! vagrant CLI wrapper
//!
//! Runs vagrant inside one cluster's state directory and parses its
//! `--machine-readable` output. The machine-readable format is
//! comma-separated records: `timestamp,target,type,data...`.

use crate::error::{Result, VagrantError};
use clusterlab_provision::{HostRecord, HostState};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// vagrant CLI wrapper, scoped to one state directory.
pub struct Vagrant {
    state_dir: PathBuf,
}

impl Vagrant {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Check that vagrant is installed.
    pub async fn check_installed() -> Result<()> {
        let which = Command::new("which").arg("vagrant").output().await?;
        if !which.status.success() {
            return Err(VagrantError::VagrantNotFound);
        }
        Ok(())
    }

    /// Run a vagrant command in the state directory and return stdout.
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        run_in(Some(&self.state_dir), args).await
    }

    /// Run a vagrant command with the terminal inherited (for `ssh`).
    async fn run_interactive(&self, args: &[&str]) -> Result<()> {
        tracing::debug!(
            "Running interactively: vagrant {} (in {})",
            args.join(" "),
            self.state_dir.display()
        );

        let status = Command::new("vagrant")
            .args(args)
            .current_dir(&self.state_dir)
            .status()
            .await?;

        if !status.success() {
            return Err(VagrantError::CommandFailed(format!(
                "vagrant {} exited with {}",
                args.join(" "),
                status
            )));
        }
        Ok(())
    }

    /// Create and boot a machine. Idempotent: an already-running machine is
    /// left as is.
    pub async fn up(&self, machine: &str) -> Result<()> {
        self.run_command(&["up", machine]).await?;
        Ok(())
    }

    /// Gracefully power off a machine.
    pub async fn halt(&self, machine: &str) -> Result<()> {
        self.run_command(&["halt", machine]).await?;
        Ok(())
    }

    /// Destroy a machine without confirmation.
    pub async fn destroy(&self, machine: &str) -> Result<()> {
        self.run_command(&["destroy", "-f", machine]).await?;
        Ok(())
    }

    /// Open an interactive SSH session to a machine.
    pub async fn ssh(&self, machine: &str) -> Result<()> {
        self.run_interactive(&["ssh", machine]).await
    }

    /// Query one machine's state.
    pub async fn status(&self, machine: &str) -> Result<HostState> {
        let output = self
            .run_command(&["status", machine, "--machine-readable"])
            .await?;
        parse_status(&output)
            .into_iter()
            .find(|r| r.name == machine)
            .map(|r| r.state)
            .ok_or_else(|| {
                VagrantError::ParseError(format!("no state reported for '{}'", machine))
            })
    }

    /// Backend-wide machine list across all Vagrant environments on this
    /// operator machine.
    pub async fn global_status(&self) -> Result<Vec<HostRecord>> {
        // global-status is directory-independent; run it from the process
        // cwd so no state directory has to exist for a pure query.
        let output = run_in(None, &["global-status"]).await?;
        Ok(parse_global_status(&output))
    }
}

/// Run a vagrant command, optionally inside a state directory, and return
/// stdout.
async fn run_in(dir: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new("vagrant");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
        tracing::debug!("Running: vagrant {} (in {})", args.join(" "), dir.display());
    } else {
        tracing::debug!("Running: vagrant {}", args.join(" "));
    }
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VagrantError::CommandFailed(stderr.trim().to_string()));
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Whether a token is one of vagrant's machine state words. Used to tell
/// table rows apart from the explanatory prose global-status appends.
fn is_state_word(token: &str) -> bool {
    matches!(
        token,
        "running" | "poweroff" | "saved" | "aborted" | "shutoff" | "not_created" | "stopping"
    )
}

/// Map a vagrant state word to a host state.
fn map_state(state: &str) -> HostState {
    match state {
        "running" => HostState::Running,
        "poweroff" | "saved" | "aborted" | "shutoff" => HostState::Stopped,
        "not_created" | "not created" => HostState::NotCreated,
        _ => HostState::Unknown,
    }
}

/// Parse `vagrant status --machine-readable` output into host records.
fn parse_status(output: &str) -> Vec<HostRecord> {
    let mut records = Vec::new();
    for line in output.lines() {
        // timestamp,target,type,data
        let fields: Vec<&str> = line.splitn(4, ',').collect();
        if fields.len() < 4 || fields[2] != "state" {
            continue;
        }
        let target = fields[1];
        if target.is_empty() {
            continue;
        }
        records.push(HostRecord {
            name: target.to_string(),
            state: map_state(fields[3].trim()),
            origin: None,
        });
    }
    records
}

/// Parse the `vagrant global-status` table.
///
/// The table has a header row, a dashed separator, one row per machine
/// (`id name provider state directory`), and a blank line before the
/// trailing explanation text.
fn parse_global_status(output: &str) -> Vec<HostRecord> {
    let mut records = Vec::new();
    let mut in_rows = false;
    for line in output.lines() {
        let trimmed = line.trim();
        if !in_rows {
            if trimmed.starts_with('-') {
                in_rows = true;
            }
            continue;
        }
        if trimmed.is_empty() {
            break;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < 5 || !is_state_word(fields[3]) {
            continue;
        }
        records.push(HostRecord {
            name: fields[1].to_string(),
            state: map_state(fields[3]),
            origin: Some(fields[4..].join(" ")),
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_state() {
        assert_eq!(map_state("running"), HostState::Running);
        assert_eq!(map_state("poweroff"), HostState::Stopped);
        assert_eq!(map_state("saved"), HostState::Stopped);
        assert_eq!(map_state("not_created"), HostState::NotCreated);
        assert_eq!(map_state("weird"), HostState::Unknown);
    }

    #[test]
    fn test_parse_status() {
        let output = "\
1692000000,lab,metadata,provider,virtualbox
1692000000,lab,provider-name,virtualbox
1692000000,lab,state,running
1692000000,lab,state-human-short,running
1692000001,lab-seg1,state,poweroff
1692000002,lab-standby,state,not_created
1692000003,,ui,info,some table text";

        let records = parse_status(output);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "lab");
        assert_eq!(records[0].state, HostState::Running);
        assert_eq!(records[1].name, "lab-seg1");
        assert_eq!(records[1].state, HostState::Stopped);
        assert_eq!(records[2].name, "lab-standby");
        assert_eq!(records[2].state, HostState::NotCreated);
    }

    #[test]
    fn test_parse_global_status() {
        let output = "\
id       name       provider   state    directory
-------------------------------------------------------------------
1a2b3c4  lab        virtualbox running  /home/dev/.local/share/clusterlab/lab
5d6e7f8  other-vm   virtualbox poweroff /home/dev/projects/other

The above shows information about all known Vagrant environments
on this machine.";

        let records = parse_global_status(output);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "lab");
        assert_eq!(records[0].state, HostState::Running);
        assert_eq!(
            records[0].origin.as_deref(),
            Some("/home/dev/.local/share/clusterlab/lab")
        );
        assert_eq!(records[1].name, "other-vm");
        assert_eq!(records[1].state, HostState::Stopped);
    }

    #[test]
    fn test_parse_global_status_empty() {
        let output = "\
id       name   provider state  directory
--------------------------------------------------------------------
There are no active Vagrant environments on this computer.";

        // The trailing prose has no blank line before it; rows without a
        // machine state word are skipped.
        let records = parse_global_status(output);
        assert!(records.is_empty());
    }
}
