//! Process liveness: "is the game running?"

use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

pub trait ProcessProbe: Send {
    /// PID of the first process matching the target, if any.
    fn find(&mut self) -> Option<u32>;

    fn is_running(&mut self) -> bool {
        self.find().is_some()
    }
}

/// Scans the OS process table on every call.
pub struct SysinfoProbe {
    system: System,
    target: String,
}

impl SysinfoProbe {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            system: System::new(),
            target: target.into(),
        }
    }
}

impl ProcessProbe for SysinfoProbe {
    fn find(&mut self) -> Option<u32> {
        // exe paths need the full refresh kind
        self.system
            .refresh_processes_specifics(ProcessesToUpdate::All, ProcessRefreshKind::everything());

        self.system
            .processes()
            .iter()
            .find(|(_, process)| matches_target(process, &self.target))
            .map(|(pid, _)| pid.as_u32())
    }
}

fn matches_target(process: &sysinfo::Process, target: &str) -> bool {
    if process.name().to_string_lossy().eq_ignore_ascii_case(target) {
        return true;
    }

    // Wine/Proton and some launchers rename the process; the exe path still carries the name.
    process
        .exe()
        .map(|exe| exe.to_string_lossy().contains(target))
        .unwrap_or(false)
}
