use crate::runtime::command::Command;
use std::collections::HashMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerCommand {
    EmitAfter {
        key: String,
        delay: Duration,
        command: Command,
    },
    /// Like `EmitAfter`, but drops whatever was still pending under `key`.
    Debounce {
        key: String,
        delay: Duration,
        command: Command,
    },
    Cancel {
        key: String,
    },
}

#[derive(Debug, Clone)]
struct Guard {
    key: String,
    version: u64,
}

#[derive(Debug, Clone)]
struct DelayedTask {
    due_at: Instant,
    guard: Guard,
    command: Command,
}

/// Timer wheel for delayed commands. Every key has a version; cancelling or
/// debouncing a key bumps it, and tasks armed under an older version are
/// discarded instead of fired.
#[derive(Debug, Default)]
pub struct Scheduler {
    delayed: Vec<DelayedTask>,
    key_versions: HashMap<String, u64>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, command: SchedulerCommand, now: Instant) {
        match command {
            SchedulerCommand::EmitAfter {
                key,
                delay,
                command,
            } => {
                let version = *self.key_versions.entry(key.clone()).or_insert(0);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    command,
                });
            }
            SchedulerCommand::Debounce {
                key,
                delay,
                command,
            } => {
                let version = self.bump_version(&key);
                self.delayed.push(DelayedTask {
                    due_at: now + delay,
                    guard: Guard { key, version },
                    command,
                });
            }
            SchedulerCommand::Cancel { key } => {
                self.bump_version(&key);
            }
        }
    }

    /// Removes every task due at `now`, returning the still-valid ones in due
    /// order.
    pub fn drain_ready(&mut self, now: Instant) -> Vec<Command> {
        let mut due = Vec::new();
        let mut idx = 0usize;
        while idx < self.delayed.len() {
            if self.delayed[idx].due_at <= now {
                let task = self.delayed.swap_remove(idx);
                if self.task_is_valid(&task) {
                    due.push(task);
                }
            } else {
                idx += 1;
            }
        }
        due.sort_by_key(|task| task.due_at);
        due.into_iter().map(|task| task.command).collect()
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.delayed
            .iter()
            .map(|task| task.due_at.saturating_duration_since(now))
            .fold(default_timeout, Duration::min)
    }

    pub fn pending(&self) -> usize {
        self.delayed
            .iter()
            .filter(|task| self.task_is_valid(task))
            .count()
    }

    fn task_is_valid(&self, task: &DelayedTask) -> bool {
        let current = self.key_versions.get(&task.guard.key).copied().unwrap_or(0);
        current == task.guard.version
    }

    fn bump_version(&mut self, key: &str) -> u64 {
        let entry = self.key_versions.entry(key.to_string()).or_insert(0);
        *entry = entry.saturating_add(1);
        *entry
    }
}
