//! Resolution of channel synchronizations among processes.
//!
//! Every process sending on a channel is paired with every process
//! receiving on it.
//! Channels used in only one direction produce no constraint.

use crate::{Direction, Process};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A sender process and a receiver process synchronizing on a channel.
///
/// The derived ordering sorts by channel, then sender, then receiver.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SyncConstraint {
    /// The channel.
    pub channel: String,
    /// The process sending on the channel.
    pub sender: String,
    /// The process receiving from the channel.
    pub receiver: String,
}

impl fmt::Display for SyncConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}:{}@{}",
            self.sender, self.channel, self.receiver, self.channel
        )
    }
}

type Endpoints<'a> = BTreeMap<&'a str, BTreeSet<&'a str>>;

fn endpoints(processes: &[Process]) -> (Endpoints<'_>, Endpoints<'_>) {
    let mut senders = Endpoints::new();
    let mut receivers = Endpoints::new();
    for process in processes {
        for sync in process.transitions().iter().filter_map(|t| t.sync.as_ref()) {
            let side = match sync.direction {
                Direction::Send => &mut senders,
                Direction::Receive => &mut receivers,
            };
            side.entry(sync.channel.as_str())
                .or_default()
                .insert(process.name());
        }
    }
    (senders, receivers)
}

/// Computes the synchronization constraints among the given processes,
/// sorted by channel, sender and receiver.
pub fn resolve(processes: &[Process]) -> Vec<SyncConstraint> {
    let (senders, receivers) = endpoints(processes);
    let mut constraints = Vec::new();
    for (channel, channel_senders) in &senders {
        // Channels without receivers are skipped.
        let Some(channel_receivers) = receivers.get(channel) else {
            continue;
        };
        for sender in channel_senders {
            for receiver in channel_receivers {
                constraints.push(SyncConstraint {
                    channel: channel.to_string(),
                    sender: sender.to_string(),
                    receiver: receiver.to_string(),
                });
            }
        }
    }
    constraints
}

/// Channels that are used only to send or only to receive,
/// with the direction they are used in.
pub fn unmatched_channels(processes: &[Process]) -> Vec<(&str, Direction)> {
    let (senders, receivers) = endpoints(processes);
    let only_send = senders
        .keys()
        .filter(|channel| !receivers.contains_key(*channel))
        .map(|channel| (*channel, Direction::Send));
    let only_receive = receivers
        .keys()
        .filter(|channel| !senders.contains_key(*channel))
        .map(|channel| (*channel, Direction::Receive));
    let mut unmatched: Vec<_> = only_send.chain(only_receive).collect();
    unmatched.sort();
    unmatched
}
