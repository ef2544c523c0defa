use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub agent_id: String,
    pub level: u8,
    pub joined_at: DateTime<Utc>,
}

/// Eligibility facts the caller already knows and the queue cannot. The
/// queue itself never tracks battles or request rates.
#[derive(Debug, Clone, Copy, Default)]
pub struct JoinGate {
    pub in_battle: bool,
    pub rate_limited: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Queued,
    AlreadyQueued,
    AlreadyInBattle,
    RateLimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    Removed,
    NotQueued,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub agent_a: String,
    pub agent_b: String,
    pub level_diff: u8,
}

/// Aggregate queue statistics for operators. Zeroed when empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QueueSnapshot {
    pub size: usize,
    pub min_level: u8,
    pub avg_level: f64,
    pub max_level: u8,
    pub min_wait_secs: i64,
    pub avg_wait_secs: f64,
    pub max_wait_secs: i64,
}

/// Acceptable level distance for a waiter, widening with time in queue.
/// None means any level is acceptable.
fn level_window(wait_secs: i64) -> Option<u8> {
    match wait_secs {
        ..=30 => Some(5),
        31..=60 => Some(10),
        61..=90 => Some(20),
        _ => None,
    }
}

fn within_window(waiter: &QueueEntry, candidate: &QueueEntry, now: DateTime<Utc>) -> bool {
    let wait_secs = (now - waiter.joined_at).num_seconds();
    match level_window(wait_secs) {
        Some(window) => waiter.level.abs_diff(candidate.level) <= window,
        None => true,
    }
}

/// FIFO matchmaking queue. A plain owned value: the caller holds whatever
/// lock or transaction makes a join-check-match sequence atomic, and all
/// mutation goes through `&mut self`.
#[derive(Debug, Clone, Default)]
pub struct MatchQueue {
    entries: Vec<QueueEntry>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.entries.iter().any(|e| e.agent_id == agent_id)
    }

    pub fn join(
        &mut self,
        agent_id: &str,
        level: u8,
        now: DateTime<Utc>,
        gate: JoinGate,
    ) -> JoinOutcome {
        if gate.in_battle {
            return JoinOutcome::AlreadyInBattle;
        }
        if gate.rate_limited {
            return JoinOutcome::RateLimited;
        }
        if self.contains(agent_id) {
            return JoinOutcome::AlreadyQueued;
        }
        self.entries.push(QueueEntry {
            agent_id: agent_id.to_string(),
            level,
            joined_at: now,
        });
        tracing::debug!(agent_id, level, queue_size = self.entries.len(), "agent queued");
        JoinOutcome::Queued
    }

    pub fn leave(&mut self, agent_id: &str) -> LeaveOutcome {
        let before = self.entries.len();
        self.entries.retain(|e| e.agent_id != agent_id);
        if self.entries.len() < before {
            tracing::debug!(agent_id, "agent left queue");
            LeaveOutcome::Removed
        } else {
            LeaveOutcome::NotQueued
        }
    }

    /// Best eligible opponent for one waiting agent, without pairing.
    /// Closest level inside the waiter's window; ties go to the agent
    /// queued longest.
    pub fn find_match(&self, agent_id: &str, now: DateTime<Utc>) -> Option<&QueueEntry> {
        let waiter = self.entries.iter().find(|e| e.agent_id == agent_id)?;
        self.entries
            .iter()
            .filter(|candidate| {
                candidate.agent_id != waiter.agent_id && within_window(waiter, candidate, now)
            })
            .min_by_key(|candidate| {
                (
                    waiter.level.abs_diff(candidate.level),
                    candidate.joined_at,
                )
            })
    }

    /// One greedy pass over the queue in join order: each still-unmatched
    /// waiter takes the closest-level eligible opponent. Matched agents
    /// are removed; no agent appears in two pairs.
    pub fn process_queue(&mut self, now: DateTime<Utc>) -> Vec<MatchedPair> {
        let mut matched = vec![false; self.entries.len()];
        let mut pairs = Vec::new();

        for i in 0..self.entries.len() {
            if matched[i] {
                continue;
            }
            let waiter = &self.entries[i];
            let best = self
                .entries
                .iter()
                .enumerate()
                .filter(|(j, candidate)| {
                    *j != i && !matched[*j] && within_window(waiter, candidate, now)
                })
                .min_by_key(|(j, candidate)| {
                    (waiter.level.abs_diff(candidate.level), *j)
                })
                .map(|(j, _)| j);

            if let Some(j) = best {
                matched[i] = true;
                matched[j] = true;
                let pair = MatchedPair {
                    agent_a: self.entries[i].agent_id.clone(),
                    agent_b: self.entries[j].agent_id.clone(),
                    level_diff: self.entries[i].level.abs_diff(self.entries[j].level),
                };
                tracing::info!(
                    agent_a = %pair.agent_a,
                    agent_b = %pair.agent_b,
                    level_diff = pair.level_diff,
                    "match found"
                );
                pairs.push(pair);
            }
        }

        let mut keep = matched.iter().map(|m| !m);
        self.entries.retain(|_| keep.next().unwrap_or(true));
        pairs
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> QueueSnapshot {
        if self.entries.is_empty() {
            return QueueSnapshot::default();
        }

        let levels: Vec<u8> = self.entries.iter().map(|e| e.level).collect();
        let waits: Vec<i64> = self
            .entries
            .iter()
            .map(|e| (now - e.joined_at).num_seconds())
            .collect();
        let size = self.entries.len();

        QueueSnapshot {
            size,
            min_level: levels.iter().copied().min().unwrap_or(0),
            avg_level: levels.iter().map(|&l| l as f64).sum::<f64>() / size as f64,
            max_level: levels.iter().copied().max().unwrap_or(0),
            min_wait_secs: waits.iter().copied().min().unwrap_or(0),
            avg_wait_secs: waits.iter().map(|&w| w as f64).sum::<f64>() / size as f64,
            max_wait_secs: waits.iter().copied().max().unwrap_or(0),
        }
    }
}
