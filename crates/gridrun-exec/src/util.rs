use tokio::process::{Child, Command};

use gridrun_model::ExecSpec;

/// Build a command from a resolved spec. Each arg is one argv entry; no shell.
pub fn cmd_program(spec: &ExecSpec) -> Command {
    let mut cmd = Command::new(&spec.program);
    cmd.args(spec.args.iter().map(|s| s.as_str()));
    if let Some(cwd) = &spec.cwd {
        cmd.current_dir(cwd);
    }
    for (k, v) in &spec.env {
        cmd.env(k, v);
    }

    // Own process group, so a wrapper and whatever it launches die together.
    #[cfg(unix)]
    cmd.process_group(0);

    cmd
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        /// SIGTERM the child's process group, then SIGKILL and reap the child.
        pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
            if let Some(id) = child.id() {
                // SAFETY: signal delivery only; the group was created by `cmd_program`.
                unsafe {
                    libc::kill(-(id as libc::pid_t), libc::SIGTERM);
                }
            }
            child.kill().await
        }
    } else {
        pub async fn kill_graceful(child: &mut Child) -> std::io::Result<()> {
            child.kill().await
        }
    }
}
