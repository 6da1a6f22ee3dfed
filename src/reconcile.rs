//! Level reconciliation.
//!
//! Compares the online snapshot against the last recorded levels of every
//! monitored character and decides what to store and what to announce.
//!
//! ```text
//!   current vs previous      record        announcement
//!   ───────────────────      ──────        ────────────
//!   not online               untouched     none
//!   current > previous       = current     only if previous != 0 and +1
//!   current < previous       = current     none
//!   current == previous      untouched     none
//! ```

use levelwatch_types::{LevelRecord, LevelTransition, MonitoredSet, OnlineSnapshot};

/// Outcome of reconciling one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// The full updated record; names not touched this cycle keep their entry.
    pub record: LevelRecord,
    /// One transition per monitored character that is online, in monitored order.
    pub transitions: Vec<LevelTransition>,
    /// Broadcast texts, in monitored order.
    pub notifications: Vec<String>,
}

impl Reconciliation {
    /// Check if the record has to be written.
    pub fn changed(&self) -> bool {
        self.transitions.iter().any(LevelTransition::is_change)
    }

    /// Iterate over the transitions that moved a level.
    pub fn changes(&self) -> impl Iterator<Item = &LevelTransition> {
        self.transitions.iter().filter(|t| t.is_change())
    }
}

/// Reconcile `snapshot` against `last` for every name in `monitored`.
pub fn reconcile(
    snapshot: &OnlineSnapshot,
    monitored: &MonitoredSet,
    last: &LevelRecord,
) -> Reconciliation {
    let mut record = last.clone();
    let mut transitions = Vec::new();
    let mut notifications = Vec::new();

    for name in monitored.iter() {
        let Some(current) = snapshot.level(name) else {
            continue;
        };

        let transition = LevelTransition::new(name, last.level(name), current);
        if transition.is_change() {
            record.set(name, current);
        }
        if let Some(text) = transition.announcement() {
            notifications.push(text);
        }
        transitions.push(transition);
    }

    Reconciliation {
        record,
        transitions,
        notifications,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelwatch_types::Direction;

    fn record(entries: &[(&str, u32)]) -> LevelRecord {
        entries.iter().map(|(n, l)| (*n, *l)).collect()
    }

    fn monitored(names: &[&str]) -> MonitoredSet {
        names.iter().copied().collect()
    }

    fn snapshot(entries: &[(&str, u32)]) -> OnlineSnapshot {
        entries
            .iter()
            .fold(OnlineSnapshot::builder(), |b, (n, l)| b.player(*n, *l))
            .build()
    }

    #[test]
    fn test_single_level_up_is_announced() {
        let result = reconcile(
            &snapshot(&[("Knight", 51)]),
            &monitored(&["Knight"]),
            &record(&[("Knight", 50)]),
        );

        assert_eq!(result.record, record(&[("Knight", 51)]));
        assert_eq!(
            result.notifications,
            vec!["📈 **Knight** subiu de nível: 50 ➡️ 51".to_string()]
        );
        assert!(result.changed());
    }

    #[test]
    fn test_multi_level_jump_is_silent() {
        let result = reconcile(
            &snapshot(&[("Knight", 55)]),
            &monitored(&["Knight"]),
            &record(&[("Knight", 50)]),
        );

        assert_eq!(result.record, record(&[("Knight", 55)]));
        assert!(result.notifications.is_empty());
    }

    #[test]
    fn test_first_sighting_is_silent() {
        let result = reconcile(
            &snapshot(&[("Mage", 10)]),
            &monitored(&["Mage"]),
            &LevelRecord::new(),
        );

        assert_eq!(result.record, record(&[("Mage", 10)]));
        assert!(result.notifications.is_empty());
    }

    #[test]
    fn test_first_sighting_at_level_one_is_silent() {
        let result = reconcile(
            &snapshot(&[("Mage", 1)]),
            &monitored(&["Mage"]),
            &LevelRecord::new(),
        );
        assert!(result.notifications.is_empty());
        assert_eq!(result.record.level("Mage"), 1);
    }

    #[test]
    fn test_level_down_updates_silently() {
        let result = reconcile(
            &snapshot(&[("Knight", 48)]),
            &monitored(&["Knight"]),
            &record(&[("Knight", 50)]),
        );

        assert_eq!(result.record, record(&[("Knight", 48)]));
        assert!(result.notifications.is_empty());
        assert_eq!(result.transitions[0].direction, Direction::Down);
    }

    #[test]
    fn test_offline_characters_are_untouched() {
        let last = record(&[("Knight", 50), ("Mage", 10)]);
        let result = reconcile(
            &snapshot(&[("Stranger", 99)]),
            &monitored(&["Knight", "Mage"]),
            &last,
        );

        assert_eq!(result.record, last);
        assert!(result.transitions.is_empty());
        assert!(!result.changed());
    }

    #[test]
    fn test_empty_snapshot_preserves_record() {
        let last = record(&[("Knight", 50)]);
        let result = reconcile(&OnlineSnapshot::default(), &monitored(&["Knight"]), &last);
        assert_eq!(result.record, last);
        assert!(result.notifications.is_empty());
    }

    #[test]
    fn test_unmonitored_entries_are_preserved() {
        let result = reconcile(
            &snapshot(&[("Knight", 51), ("Old", 3)]),
            &monitored(&["Knight"]),
            &record(&[("Knight", 50), ("Old", 70)]),
        );
        assert_eq!(result.record.level("Old"), 70);
    }

    #[test]
    fn test_unchanged_level_is_not_a_change() {
        let last = record(&[("Knight", 50)]);
        let result = reconcile(&snapshot(&[("Knight", 50)]), &monitored(&["Knight"]), &last);

        assert_eq!(result.transitions.len(), 1);
        assert_eq!(result.transitions[0].direction, Direction::None);
        assert!(!result.changed());
        assert_eq!(result.changes().count(), 0);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let online = snapshot(&[("Knight", 51)]);
        let names = monitored(&["Knight"]);

        let first = reconcile(&online, &names, &record(&[("Knight", 50)]));
        let second = reconcile(&online, &names, &first.record);

        assert_eq!(second.record, first.record);
        assert!(second.notifications.is_empty());
        assert!(!second.changed());
    }

    #[test]
    fn test_notifications_follow_monitored_order() {
        let result = reconcile(
            &snapshot(&[("Archer", 21), ("Knight", 51)]),
            &monitored(&["Knight", "Archer"]),
            &record(&[("Knight", 50), ("Archer", 20)]),
        );

        assert_eq!(result.notifications.len(), 2);
        assert!(result.notifications[0].contains("Knight"));
        assert!(result.notifications[1].contains("Archer"));
    }

    #[test]
    fn test_level_up_policy_grid() {
        for previous in 0..6u32 {
            for current in (previous + 1)..(previous + 4) {
                let result = reconcile(
                    &snapshot(&[("X", current)]),
                    &monitored(&["X"]),
                    &record(&[("X", previous)]),
                );
                let expected = previous != 0 && current - previous == 1;
                assert_eq!(result.record.level("X"), current);
                assert_eq!(
                    !result.notifications.is_empty(),
                    expected,
                    "previous={previous} current={current}"
                );
            }
        }
    }
}
