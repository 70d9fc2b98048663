// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt::Debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Pending,
    Success,
    Failure,
}

/// Handle for one issued request. The response must be handed back to
/// [`Loader::apply`] together with this generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Discarded,
}

/// Generation-tagged state for one logical remote query.
///
/// Only the response of the newest issued request may change visible state.
/// Responses for older generations, or arriving after [`Loader::unmount`],
/// are dropped. There is no de-duplication: every issue bumps the
/// generation, even for an unchanged key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader<K, T> {
    generation: u64,
    key: Option<K>,
    mounted: bool,
    status: LoadStatus,
    data: Option<T>,
    error: Option<String>,
}

impl<K, T> Default for Loader<K, T> {
    fn default() -> Self {
        Self {
            generation: 0,
            key: None,
            mounted: false,
            status: LoadStatus::Idle,
            data: None,
            error: None,
        }
    }
}

impl<K: Clone + PartialEq + Debug, T> Loader<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a request when the loader is not mounted yet or `key` differs
    /// from the current dependency key.
    pub fn sync(&mut self, key: K) -> Option<Ticket> {
        if self.mounted && self.key.as_ref() == Some(&key) {
            return None;
        }
        Some(self.issue(key))
    }

    /// Unconditionally issues a request for `key`.
    pub fn issue(&mut self, key: K) -> Ticket {
        if self.key.as_ref() != Some(&key) {
            // Data for another key must not stay on screen.
            self.data = None;
        }
        self.generation = self.generation.wrapping_add(1);
        self.key = Some(key);
        self.mounted = true;
        self.status = LoadStatus::Pending;
        self.error = None;
        tracing::debug!(generation = self.generation, key = ?self.key, "load issued");
        Ticket {
            generation: self.generation,
        }
    }

    /// Re-issues with the current key, keeping the previous data visible
    /// until the new response lands. `None` if nothing was ever issued.
    pub fn reload(&mut self) -> Option<Ticket> {
        let key = self.key.clone()?;
        Some(self.issue(key))
    }

    pub fn apply(&mut self, generation: u64, result: Result<T, String>) -> LoadOutcome {
        if !self.mounted || generation != self.generation || self.status != LoadStatus::Pending {
            tracing::debug!(
                generation,
                current = self.generation,
                mounted = self.mounted,
                "stale load response discarded"
            );
            return LoadOutcome::Discarded;
        }

        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.status = LoadStatus::Success;
            }
            Err(error) => {
                tracing::warn!(generation, %error, "load failed");
                self.error = Some(error);
                self.status = LoadStatus::Failure;
            }
        }
        LoadOutcome::Applied
    }

    /// Teardown: anything still in flight is treated as superseded.
    pub fn unmount(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.key = None;
        self.mounted = false;
        self.status = LoadStatus::Idle;
        self.data = None;
        self.error = None;
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn loading(&self) -> bool {
        self.status == LoadStatus::Pending
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn data_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadOutcome, LoadStatus, Loader, Ticket};

    fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut out = Vec::new();
        for (index, item) in items.iter().enumerate() {
            let mut rest = items.to_vec();
            rest.remove(index);
            for mut tail in permutations(&rest) {
                tail.insert(0, *item);
                out.push(tail);
            }
        }
        out
    }

    #[test]
    fn sync_issues_on_mount_and_key_change_only() {
        let mut loader: Loader<&str, u32> = Loader::new();

        let first = loader.sync("a").expect("mount should issue");
        assert_eq!(first.generation, 1);
        assert!(loader.sync("a").is_none());

        let second = loader.sync("b").expect("key change should issue");
        assert_eq!(second.generation, 2);
        assert!(loader.loading());
    }

    #[test]
    fn superseded_response_never_overwrites_newer_state() {
        let mut loader: Loader<&str, &str> = Loader::new();
        let a = loader.sync("A").expect("issue A");
        let b = loader.sync("B").expect("issue B");

        assert_eq!(loader.apply(b.generation, Ok("B data")), LoadOutcome::Applied);
        assert_eq!(loader.apply(a.generation, Ok("A data")), LoadOutcome::Discarded);

        assert_eq!(loader.data(), Some(&"B data"));
        assert!(!loader.loading());
        assert_eq!(loader.key(), Some(&"B"));
    }

    #[test]
    fn stale_response_does_not_end_loading() {
        let mut loader: Loader<&str, &str> = Loader::new();
        let a = loader.sync("A").expect("issue A");
        let _b = loader.sync("B").expect("issue B");

        loader.apply(a.generation, Err("boom".to_owned()));
        assert!(loader.loading());
        assert_eq!(loader.error(), None);
    }

    #[test]
    fn newest_issue_wins_for_every_arrival_order() {
        for order in permutations(&[0, 1, 2, 3]) {
            let mut loader: Loader<u8, usize> = Loader::new();
            let tickets: Vec<Ticket> = vec![
                loader.issue(1),
                loader.reload().expect("reload"),
                loader.issue(2),
                loader.reload().expect("reload"),
            ];

            for index in &order {
                loader.apply(tickets[*index].generation, Ok(*index));
            }

            assert_eq!(loader.data(), Some(&3), "arrival order {order:?}");
            assert_eq!(loader.status(), LoadStatus::Success);
        }
    }

    #[test]
    fn same_key_reissue_is_not_coalesced() {
        let mut loader: Loader<&str, u32> = Loader::new();
        let first = loader.issue("A");
        let second = loader.issue("A");
        assert_ne!(first, second);

        assert_eq!(loader.apply(first.generation, Ok(1)), LoadOutcome::Discarded);
        assert_eq!(loader.apply(second.generation, Ok(2)), LoadOutcome::Applied);
    }

    #[test]
    fn failure_reports_message_and_reload_retries() {
        let mut loader: Loader<&str, u32> = Loader::new();
        let ticket = loader.sync("A").expect("issue");
        loader.apply(ticket.generation, Err("connection refused".to_owned()));

        assert_eq!(loader.status(), LoadStatus::Failure);
        assert_eq!(loader.error(), Some("connection refused"));

        let retry = loader.reload().expect("reload after failure");
        assert!(loader.loading());
        assert_eq!(loader.error(), None);
        loader.apply(retry.generation, Ok(9));
        assert_eq!(loader.data(), Some(&9));
    }

    #[test]
    fn reload_keeps_data_but_key_change_clears_it() {
        let mut loader: Loader<&str, u32> = Loader::new();
        let ticket = loader.sync("A").expect("issue");
        loader.apply(ticket.generation, Ok(1));

        loader.reload();
        assert_eq!(loader.data(), Some(&1));

        loader.sync("B");
        assert_eq!(loader.data(), None);
    }

    #[test]
    fn response_after_unmount_is_discarded() {
        let mut loader: Loader<&str, u32> = Loader::new();
        let ticket = loader.sync("A").expect("issue");
        loader.unmount();

        assert_eq!(loader.apply(ticket.generation, Ok(1)), LoadOutcome::Discarded);
        assert_eq!(loader.data(), None);
        assert!(!loader.loading());
        assert!(loader.reload().is_none());

        assert!(loader.sync("A").is_some(), "remount should issue again");
    }

    #[test]
    fn duplicate_delivery_applies_once() {
        let mut loader: Loader<&str, u32> = Loader::new();
        let ticket = loader.sync("A").expect("issue");
        assert_eq!(loader.apply(ticket.generation, Ok(1)), LoadOutcome::Applied);
        assert_eq!(loader.apply(ticket.generation, Ok(2)), LoadOutcome::Discarded);
        assert_eq!(loader.data(), Some(&1));
    }
}
