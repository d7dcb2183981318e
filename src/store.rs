use std::collections::HashSet;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::config::CorruptDataPolicy;
use crate::error::{PlannerError, Result};
use crate::metrics::balance_score;
use crate::model::{Activity, ActivityId, NewActivity, StoredActivity};
use crate::storage::KeyValueStorage;

/// The in-memory list of activities, mirrored in full to one storage slot.
pub struct ActivityStore<S> {
    storage: S,
    key: String,
    activities: Vec<Activity>,
}

impl<S: KeyValueStorage> ActivityStore<S> {
    /// Read the activities saved under `key`. An empty slot starts an
    /// empty list.
    pub fn load(storage: S, key: &str, policy: CorruptDataPolicy) -> Result<Self> {
        let activities = match storage.get(key)? {
            None => Vec::new(),
            Some(payload) => decode(key, &payload, policy)?,
        };
        debug!(key, count = activities.len(), "loaded activities");
        Ok(ActivityStore {
            storage,
            key: key.to_string(),
            activities,
        })
    }

    /// All activities, in insertion order.
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn get(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Append a new activity created now and save the list.
    pub fn add(&mut self, candidate: NewActivity) -> Result<Activity> {
        self.add_at(candidate, Utc::now())
    }

    /// Append a new activity stamped with `created_at` and save the list.
    /// Nothing is kept in memory if saving fails.
    pub fn add_at(
        &mut self,
        candidate: NewActivity,
        created_at: DateTime<Utc>,
    ) -> Result<Activity> {
        candidate.validate()?;
        let id = self.next_id(created_at)?;
        let activity = candidate.into_activity(id, created_at);
        self.activities.push(activity.clone());
        if let Err(err) = self.save() {
            self.activities.pop();
            return Err(err);
        }
        debug!(id = %activity.id, name = %activity.name, "added activity");
        Ok(activity)
    }

    /// Remove every activity with the given id and save the list. Returns
    /// how many were removed; an unknown id changes nothing.
    pub fn delete(&mut self, id: ActivityId) -> Result<usize> {
        let before = self.activities.clone();
        self.activities.retain(|a| a.id != id);
        let removed = before.len() - self.activities.len();
        if removed == 0 {
            debug!(%id, "no activity to delete");
            return Ok(0);
        }
        if let Err(err) = self.save() {
            self.activities = before;
            return Err(err);
        }
        debug!(%id, removed, "deleted activity");
        Ok(removed)
    }

    /// Activities created on the current local day.
    ///
    /// This looks at `created_at`, not at the scheduled `time`: an activity
    /// entered yesterday for today does not show up here.
    pub fn today(&self) -> Vec<&Activity> {
        self.created_on(Local::now().date_naive())
    }

    /// Activities created on `date`, in local time.
    pub fn created_on(&self, date: NaiveDate) -> Vec<&Activity> {
        self.activities
            .iter()
            .filter(|a| a.created_on() == date)
            .collect()
    }

    pub fn balance_score(&self) -> u32 {
        balance_score(self.activities.len())
    }

    /// Epoch milliseconds of `now`, bumped past the largest id in use so
    /// that adds within the same millisecond stay distinct. When the largest
    /// id is `i64::MAX` the first free id from `now` upwards is used instead.
    fn next_id(&self, now: DateTime<Utc>) -> Result<ActivityId> {
        let stamp = now.timestamp_millis();
        match self.activities.iter().map(|a| a.id.0).max() {
            None => Ok(ActivityId(stamp)),
            Some(max) if max < stamp => Ok(ActivityId(stamp)),
            Some(max) => match max.checked_add(1) {
                Some(next) => Ok(ActivityId(next)),
                None => {
                    let taken: HashSet<i64> = self.activities.iter().map(|a| a.id.0).collect();
                    (stamp..=i64::MAX)
                        .find(|id| !taken.contains(id))
                        .map(ActivityId)
                        .ok_or_else(|| {
                            PlannerError::Validation("no free activity id left".to_string())
                        })
                }
            },
        }
    }

    fn save(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.activities)
            .map_err(|err| PlannerError::Persistence {
                message: "failed to serialize activities".to_string(),
                source: Some(Box::new(err)),
            })?;
        self.storage.set(&self.key, &payload)
    }
}

fn decode(key: &str, payload: &str, policy: CorruptDataPolicy) -> Result<Vec<Activity>> {
    let stored: Vec<StoredActivity> = match serde_json::from_str(payload) {
        Ok(stored) => stored,
        Err(source) => match policy {
            CorruptDataPolicy::Fail => {
                return Err(PlannerError::CorruptData {
                    key: key.to_string(),
                    source,
                })
            }
            CorruptDataPolicy::Discard => {
                warn!(key, error = %source, "stored activities are corrupt, starting empty");
                return Ok(Vec::new());
            }
        },
    };

    let mut activities = Vec::with_capacity(stored.len());
    for record in stored {
        let id = record.id;
        match Activity::try_from(record) {
            Ok(activity) => activities.push(activity),
            Err(err) if policy == CorruptDataPolicy::Discard => {
                warn!(%id, error = %err, "dropping stored activity");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(activities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::storage::MemoryStorage;
    use chrono::{Duration, TimeZone};

    const KEY: &str = "lifeflow_activities";

    /// Storage whose writes always fail, like a browser over its quota.
    struct FullStorage {
        inner: MemoryStorage,
    }

    impl KeyValueStorage for FullStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(PlannerError::persistence("quota exceeded"))
        }
    }

    fn empty_store() -> ActivityStore<MemoryStorage> {
        ActivityStore::load(MemoryStorage::new(), KEY, CorruptDataPolicy::Fail).unwrap()
    }

    fn run() -> NewActivity {
        NewActivity {
            name: "Run".to_string(),
            time: "07:00".to_string(),
            duration: 30,
            category: Category::Outdoor,
            note: Some(String::new()),
        }
    }

    fn named(name: &str, time: &str) -> NewActivity {
        NewActivity {
            name: name.to_string(),
            time: time.to_string(),
            ..run()
        }
    }

    fn reload(store: &ActivityStore<MemoryStorage>) -> ActivityStore<MemoryStorage> {
        ActivityStore::load(store.storage().clone(), KEY, CorruptDataPolicy::Fail).unwrap()
    }

    #[test]
    fn empty_slot_loads_as_empty_list() {
        let store = empty_store();
        assert!(store.is_empty());
        assert_eq!(store.balance_score(), 45);
    }

    #[test]
    fn add_then_delete_scenario() {
        let mut store = empty_store();
        let added = store.add(run()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.balance_score(), 50);
        assert!(store.today().iter().any(|a| a.id == added.id));

        assert_eq!(store.delete(added.id).unwrap(), 1);
        assert_eq!(store.len(), 0);
        assert_eq!(store.balance_score(), 45);
    }

    #[test]
    fn length_tracks_adds_minus_deletes() {
        let mut store = empty_store();
        let mut ids = Vec::new();
        for i in 0..6 {
            ids.push(store.add(named(&format!("task {}", i), "09:00")).unwrap().id);
        }
        store.delete(ids[1]).unwrap();
        store.delete(ids[4]).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(reload(&store).len(), 4);
    }

    #[test]
    fn deleting_an_unknown_id_changes_nothing() {
        let mut store = empty_store();
        store.add(run()).unwrap();
        let before = store.activities().to_vec();
        assert_eq!(store.delete(ActivityId(-1)).unwrap(), 0);
        assert_eq!(store.activities(), &before[..]);
    }

    #[test]
    fn reload_gives_back_the_same_activities() {
        let mut store = empty_store();
        store.add(run()).unwrap();
        store
            .add(NewActivity {
                note: Some("bring water".to_string()),
                category: Category::Family,
                ..named("Picnic", "13:30")
            })
            .unwrap();
        assert_eq!(reload(&store).activities(), store.activities());
    }

    #[test]
    fn adds_in_the_same_millisecond_get_distinct_ids() {
        let mut store = empty_store();
        let now = Utc::now();
        let first = store.add_at(run(), now).unwrap();
        let second = store.add_at(run(), now).unwrap();
        assert_eq!(first.id, ActivityId(now.timestamp_millis()));
        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[test]
    fn invalid_candidates_are_not_stored() {
        let mut store = empty_store();
        let err = store.add(named("", "07:00")).unwrap_err();
        assert!(matches!(err, PlannerError::Validation(_)));
        assert!(store.is_empty());
        assert_eq!(store.storage().get(KEY).unwrap(), None);
    }

    #[test]
    fn today_ignores_activities_created_yesterday() {
        let mut store = empty_store();
        let yesterday = Utc::now() - Duration::days(1);
        let old = store.add_at(named("Yesterday's plan", "23:00"), yesterday).unwrap();
        let fresh = store.add(named("Lunch", "12:00")).unwrap();

        let today: Vec<ActivityId> = store.today().iter().map(|a| a.id).collect();
        assert_eq!(today, vec![fresh.id]);
        assert!(!today.contains(&old.id));
    }

    #[test]
    fn created_on_uses_the_local_calendar_day() {
        let mut store = empty_store();
        let noon = Local.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        store.add_at(run(), noon.with_timezone(&Utc)).unwrap();
        assert_eq!(store.created_on(noon.date_naive()).len(), 1);
        assert!(store.created_on(noon.date_naive().pred_opt().unwrap()).is_empty());
    }

    #[test]
    fn failed_add_is_rolled_back() {
        let mut store = ActivityStore::load(
            FullStorage { inner: MemoryStorage::new() },
            KEY,
            CorruptDataPolicy::Fail,
        )
        .unwrap();
        let err = store.add(run()).unwrap_err();
        assert!(matches!(err, PlannerError::Persistence { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn failed_delete_is_rolled_back() {
        let mut seeded = empty_store();
        let added = seeded.add(run()).unwrap();
        let mut store = ActivityStore::load(
            FullStorage { inner: seeded.storage().clone() },
            KEY,
            CorruptDataPolicy::Fail,
        )
        .unwrap();
        assert!(store.delete(added.id).is_err());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn corrupt_payload_fails_under_the_fail_policy() {
        let storage = MemoryStorage::with_slot(KEY, "{not json");
        match ActivityStore::load(storage, KEY, CorruptDataPolicy::Fail) {
            Err(PlannerError::CorruptData { key, .. }) => assert_eq!(key, KEY),
            other => panic!("unexpected result: {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn corrupt_payload_is_empty_under_the_discard_policy() {
        let storage = MemoryStorage::with_slot(KEY, "{not json");
        let store = ActivityStore::load(storage, KEY, CorruptDataPolicy::Discard).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.storage().get(KEY).unwrap().as_deref(), Some("{not json"));
    }

    #[test]
    fn unknown_categories_follow_the_policy() {
        let payload = r#"[
            {"id":1,"name":"Chess","time":"20:00","duration":60,"category":"games","note":"","createdAt":"2026-10-16T07:00:00.000Z"},
            {"id":2,"name":"Run","time":"07:00","duration":30,"category":"outdoor","note":"","createdAt":"2026-10-16T07:00:00.000Z"}
        ]"#;

        let storage = MemoryStorage::with_slot(KEY, payload);
        let strict = ActivityStore::load(storage, KEY, CorruptDataPolicy::Fail);
        assert!(matches!(strict, Err(PlannerError::UnknownCategory(_))));

        let storage = MemoryStorage::with_slot(KEY, payload);
        let lenient = ActivityStore::load(storage, KEY, CorruptDataPolicy::Discard).unwrap();
        assert_eq!(lenient.len(), 1);
        assert_eq!(lenient.activities()[0].id, ActivityId(2));
    }

    #[test]
    fn reads_payloads_written_with_timestamp_ids() {
        let payload = r#"[{"id":1760598000123,"name":"Read","time":"21:00","duration":45,"category":"learning","note":"chapter 3","createdAt":"2026-10-16T07:00:00.123Z"}]"#;
        let storage = MemoryStorage::with_slot(KEY, payload);
        let mut store = ActivityStore::load(storage, KEY, CorruptDataPolicy::Fail).unwrap();
        let read = store.get(ActivityId(1760598000123)).unwrap();
        assert_eq!(read.category, Category::Learning);
        assert_eq!(
            read.created_at,
            Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap() + Duration::milliseconds(123)
        );

        let earlier = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let added = store.add_at(run(), earlier).unwrap();
        assert_eq!(added.id, ActivityId(1760598000124));
    }

    #[test]
    fn durations_are_stored_without_range_checks() {
        let mut store = empty_store();
        for duration in [0, -5, i64::MAX] {
            let added = store.add(NewActivity { duration, ..run() }).unwrap();
            assert_eq!(added.duration, duration);
        }
        let reloaded = reload(&store);
        let durations: Vec<i64> = reloaded.activities().iter().map(|a| a.duration).collect();
        assert_eq!(durations, vec![0, -5, i64::MAX]);
    }

    #[test]
    fn a_negative_stored_duration_keeps_the_whole_list() {
        let payload = r#"[
            {"id":1,"name":"Run","time":"07:00","duration":30,"category":"outdoor","note":"","createdAt":"2026-10-16T07:00:00.000Z"},
            {"id":2,"name":"Nap","time":"14:00","duration":-5,"category":"leisure","note":"","createdAt":"2026-10-16T07:00:00.000Z"}
        ]"#;
        for policy in [CorruptDataPolicy::Fail, CorruptDataPolicy::Discard] {
            let store = ActivityStore::load(MemoryStorage::with_slot(KEY, payload), KEY, policy)
                .unwrap();
            assert_eq!(store.len(), 2);
            assert_eq!(store.get(ActivityId(2)).unwrap().duration, -5);
            assert_eq!(store.balance_score(), 55);
        }
    }

    #[test]
    fn stored_category_keys_are_not_rewritten() {
        let payload = r#"[{"id":1,"name":"Run","time":"07:00","duration":30,"category":"Outdoor","note":"","createdAt":"2026-10-16T07:00:00.000Z"}]"#;
        let strict = ActivityStore::load(
            MemoryStorage::with_slot(KEY, payload),
            KEY,
            CorruptDataPolicy::Fail,
        );
        assert!(matches!(strict, Err(PlannerError::UnknownCategory(key)) if key == "Outdoor"));
    }

    #[test]
    fn largest_possible_id_does_not_overflow() {
        let payload = r#"[{"id":9223372036854775807,"name":"Run","time":"07:00","duration":30,"category":"outdoor","note":"","createdAt":"2026-10-16T07:00:00.000Z"}]"#;
        let storage = MemoryStorage::with_slot(KEY, payload);
        let mut store = ActivityStore::load(storage, KEY, CorruptDataPolicy::Fail).unwrap();
        let now = Utc::now();
        let first = store.add_at(run(), now).unwrap();
        let second = store.add_at(run(), now).unwrap();
        assert_eq!(first.id, ActivityId(now.timestamp_millis()));
        assert_eq!(second.id, ActivityId(now.timestamp_millis() + 1));

        let ids: HashSet<ActivityId> = store.activities().iter().map(|a| a.id).collect();
        assert_eq!(ids.len(), 3);
    }
}
