//! Per-channel membership and the NAMES synchronization state machine.
//!
//! A roster is either [`SyncState::Idle`] (stable membership) or
//! [`SyncState::Syncing`] (a `353` sequence is in progress):
//!
//! ```text
//!            353 (clear, ingest)          353 (ingest)
//!   Idle ───────────────────────▶ Syncing ◀──────────┐
//!    ▲                              │  └─────────────┘
//!    └──────────── 366 ─────────────┘
//! ```
//!
//! Members are kept sorted by operator, then voice, then case-insensitive
//! name after every mutation.

use std::cmp::Ordering;

use crate::casemap::irc_cmp;
use crate::mode::MemberMode;

/// One member of a channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// Nickname, unique within the roster.
    pub name: String,
    /// Channel operator (`@`).
    pub is_operator: bool,
    /// Voiced (`+`).
    pub has_voice: bool,
}

impl Member {
    /// A member without any flags.
    pub fn new(name: impl Into<String>) -> Self {
        Member {
            name: name.into(),
            is_operator: false,
            has_voice: false,
        }
    }

    /// Parse a NAMES entry such as `@alice`, `+bob` or `@+carol`.
    ///
    /// `@` and `+` become flags; the other common status sigils (`~`, `&`,
    /// `%`) are stripped without setting a flag.
    pub fn from_names_entry(entry: &str) -> Self {
        let mut member = Member::new("");
        let mut name = entry;
        while let Some(c) = name.chars().next() {
            match c {
                '@' => member.is_operator = true,
                '+' => member.has_voice = true,
                '~' | '&' | '%' => {}
                _ => break,
            }
            name = &name[c.len_utf8()..];
        }
        member.name = name.to_owned();
        member
    }

    fn set_mode(&mut self, mode: MemberMode, enabled: bool) {
        match mode {
            MemberMode::Operator => self.is_operator = enabled,
            MemberMode::Voice => self.has_voice = enabled,
        }
    }

    /// Roster ordering: operators first, then voiced, then by name.
    fn roster_cmp(&self, other: &Member) -> Ordering {
        other
            .is_operator
            .cmp(&self.is_operator)
            .then_with(|| other.has_voice.cmp(&self.has_voice))
            .then_with(|| irc_cmp(&self.name, &other.name))
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_operator {
            f.write_str("@")?;
        }
        if self.has_voice {
            f.write_str("+")?;
        }
        f.write_str(&self.name)
    }
}

/// Where a roster is in the NAMES cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncState {
    /// Membership is stable.
    #[default]
    Idle,
    /// A NAMES list is being received.
    Syncing,
}

/// Sorted membership of one channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    members: Vec<Member>,
    state: SyncState,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn is_syncing(&self) -> bool {
        self.state == SyncState::Syncing
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Number of channel operators.
    pub fn operator_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_operator).count()
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Feed one `353` fragment.
    ///
    /// The first fragment after an idle period replaces the membership;
    /// later fragments accumulate into it.
    pub fn ingest_names<'a, I>(&mut self, names: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if self.state == SyncState::Idle {
            self.members.clear();
            self.state = SyncState::Syncing;
        }
        for entry in names {
            let member = Member::from_names_entry(entry);
            if member.name.is_empty() {
                continue;
            }
            self.upsert(member);
        }
        self.sort();
    }

    /// Handle `366`: the accumulated list becomes the membership.
    pub fn end_of_names(&mut self) {
        self.state = SyncState::Idle;
    }

    /// Add a member without flags. Returns `false` if already present.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.members.push(Member::new(name));
        self.sort();
        true
    }

    /// Remove a member by exact name.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.name != name);
        let removed = self.members.len() != before;
        if removed {
            self.sort();
        }
        removed
    }

    /// Rename a member, keeping its flags.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old == new || !self.contains(old) {
            return false;
        }
        self.members.retain(|m| m.name != new);
        for member in self.members.iter_mut().filter(|m| m.name == old) {
            member.name = new.to_owned();
        }
        self.sort();
        true
    }

    /// Set or clear a flag on a member.
    pub fn set_mode(&mut self, name: &str, mode: MemberMode, enabled: bool) -> bool {
        let mut changed = false;
        for member in self.members.iter_mut().filter(|m| m.name == name) {
            member.set_mode(mode, enabled);
            changed = true;
        }
        if changed {
            self.sort();
        }
        changed
    }

    fn upsert(&mut self, member: Member) {
        match self.members.iter_mut().find(|m| m.name == member.name) {
            Some(existing) => *existing = member,
            None => self.members.push(member),
        }
    }

    fn sort(&mut self) {
        self.members.sort_by(Member::roster_cmp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(roster: &Roster) -> Vec<String> {
        roster.members().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_names_entry_sigils() {
        assert_eq!(
            Member::from_names_entry("@alice"),
            Member {
                name: "alice".into(),
                is_operator: true,
                has_voice: false
            }
        );
        let carol = Member::from_names_entry("@+carol");
        assert!(carol.is_operator && carol.has_voice);
        assert_eq!(carol.name, "carol");
        assert_eq!(Member::from_names_entry("%dave").name, "dave");
        assert_eq!(Member::from_names_entry("eve"), Member::new("eve"));
    }

    #[test]
    fn test_names_cycle_accumulates_fragments() {
        let mut roster = Roster::new();
        roster.ingest_names(["@alice", "+bob"]);
        assert!(roster.is_syncing());
        roster.ingest_names(["carol"]);
        roster.end_of_names();

        assert_eq!(roster.state(), SyncState::Idle);
        assert_eq!(names(&roster), vec!["@alice", "+bob", "carol"]);
    }

    #[test]
    fn test_new_names_cycle_replaces_membership() {
        let mut roster = Roster::new();
        roster.ingest_names(["alice", "bob"]);
        roster.end_of_names();
        roster.ingest_names(["carol"]);
        roster.end_of_names();
        assert_eq!(names(&roster), vec!["carol"]);
    }

    #[test]
    fn test_sort_order() {
        let mut roster = Roster::new();
        roster.ingest_names(["zed", "+Yan", "@xavier", "+bob", "Alice", "@Walt"]);
        roster.end_of_names();
        assert_eq!(
            names(&roster),
            vec!["@Walt", "@xavier", "+bob", "+Yan", "Alice", "zed"]
        );
        assert_eq!(roster.operator_count(), 2);
    }

    #[test]
    fn test_join_mode_part_leaves_no_residue() {
        let mut roster = Roster::new();
        roster.ingest_names(["alice"]);
        roster.end_of_names();
        let before = roster.clone();

        assert!(roster.add("dave"));
        assert!(roster.set_mode("dave", MemberMode::Operator, true));
        assert_eq!(names(&roster), vec!["@dave", "alice"]);
        assert!(roster.remove("dave"));

        assert!(!roster.contains("dave"));
        assert_eq!(roster, before);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut roster = Roster::new();
        assert!(roster.add("alice"));
        assert!(!roster.add("alice"));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_rename_keeps_flags() {
        let mut roster = Roster::new();
        roster.ingest_names(["+bob", "alice"]);
        roster.end_of_names();
        assert!(roster.rename("bob", "aaron"));
        let aaron = roster.get("aaron").unwrap();
        assert!(aaron.has_voice);
        assert!(!roster.contains("bob"));
        assert_eq!(names(&roster), vec!["+aaron", "alice"]);
    }

    #[test]
    fn test_lookups_are_exact_match() {
        let mut roster = Roster::new();
        roster.add("Alice");
        assert!(!roster.remove("alice"));
        assert!(roster.contains("Alice"));
    }

    #[test]
    fn test_mode_on_unknown_member() {
        let mut roster = Roster::new();
        assert!(!roster.set_mode("ghost", MemberMode::Voice, true));
    }

    #[test]
    fn test_voice_reorders() {
        let mut roster = Roster::new();
        roster.ingest_names(["alice", "bob"]);
        roster.end_of_names();
        roster.set_mode("bob", MemberMode::Voice, true);
        assert_eq!(names(&roster), vec!["+bob", "alice"]);
        roster.set_mode("bob", MemberMode::Voice, false);
        assert_eq!(names(&roster), vec!["alice", "bob"]);
    }
}
