//! Channel state derived from the server's notifications.
//!
//! Only the dispatch layer mutates this state; consumers get read-only
//! access through [`Client::channels`](crate::Client::channels).

mod roster;

use std::collections::BTreeMap;

pub use self::roster::{Member, Roster, SyncState};

/// A joined channel: its topic and membership.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channel {
    pub name: String,
    pub topic: Option<String>,
    pub roster: Roster,
}

impl Channel {
    pub fn new(name: impl Into<String>) -> Self {
        Channel {
            name: name.into(),
            topic: None,
            roster: Roster::new(),
        }
    }
}

/// Every channel the client currently knows about, ordered by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Channels {
    channels: BTreeMap<String, Channel>,
}

impl Channels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    /// The channel named `name`, created on first use.
    pub(crate) fn entry(&mut self, name: &str) -> &mut Channel {
        self.channels
            .entry(name.to_owned())
            .or_insert_with(|| Channel::new(name))
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<Channel> {
        self.channels.remove(name)
    }

    pub(crate) fn clear(&mut self) {
        self.channels.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Channel> {
        self.channels.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Names of the channels whose roster lists `nick`.
    pub fn containing(&self, nick: &str) -> Vec<String> {
        self.channels
            .values()
            .filter(|c| c.roster.contains(nick))
            .map(|c| c.name.clone())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Channels {
    type Item = &'a Channel;
    type IntoIter = std::collections::btree_map::Values<'a, String, Channel>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.values()
    }
}
