use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::{
    feelings::{entities::FeelingRecord, Feeling},
    utils::{clock::Clock, time::start_of_local_day},
};

use super::{error::PersistenceError, key_value::KeyValueStore};

/// The single key the whole history is stored under.
pub const RECORDS_KEY: &str = "feeling_records";

fn parse_records(value: Option<String>) -> Result<Vec<FeelingRecord>, PersistenceError> {
    match value {
        Some(v) => Ok(serde_json::from_str(&v)?),
        None => Ok(vec![]),
    }
}

/// Stores every logged feeling as one JSON array, in the order they were logged.
///
/// [RecordStore::load_today] and [RecordStore::append] never fail: storage problems are logged
/// and the caller gets an empty list or `None`. The `load_all` and `try_append` variants expose
/// the errors.
pub struct RecordStore<S: KeyValueStore> {
    store: S,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> RecordStore<S> {
    pub fn new(store: S, clock: Box<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Every record ever stored, in storage order.
    pub async fn load_all(&self) -> Result<Vec<FeelingRecord>, PersistenceError> {
        parse_records(self.store.get(RECORDS_KEY).await?)
    }

    /// Records logged since local midnight, in storage order.
    pub async fn load_today(&self) -> Vec<FeelingRecord> {
        let day_start = start_of_local_day(self.clock.time());
        match self.load_all().await {
            Ok(records) => {
                let today = records
                    .into_iter()
                    .filter(|v| v.timestamp >= day_start)
                    .collect::<Vec<_>>();
                debug!("Loaded {} records since {day_start}", today.len());
                today
            }
            Err(e) => {
                error!("Failed to load records {e}");
                vec![]
            }
        }
    }

    /// Creates a record for `feeling` at the current time and appends it to the stored history.
    /// The whole history is read, extended and written back as one atomic update of the store.
    pub async fn try_append(&self, feeling: Feeling) -> Result<FeelingRecord, PersistenceError> {
        let timestamp = self.clock.time();
        let (created, mut receive_created) = oneshot::channel();

        self.store
            .update(
                RECORDS_KEY,
                Box::new(move |current: Option<String>| -> Result<String, PersistenceError> {
                    let mut records = parse_records(current)?;
                    let record = FeelingRecord::create(feeling, timestamp, |id| {
                        records.iter().any(|v| v.id == id)
                    });
                    records.push(record.clone());
                    let value = serde_json::to_string(&records)?;
                    let _ = created.send(record);
                    Ok(value)
                }),
            )
            .await?;

        receive_created.try_recv().map_err(|_| {
            PersistenceError::Io(std::io::Error::other(
                "store reported an update that never happened",
            ))
        })
    }

    /// Same as [RecordStore::try_append], but storage problems are only logged.
    pub async fn append(&self, feeling: Feeling) -> Option<FeelingRecord> {
        match self.try_append(feeling).await {
            Ok(record) => {
                info!("Recorded {} as {}", record.feeling, record.id);
                Some(record)
            }
            Err(e) => {
                error!("Failed to record {feeling} {e}");
                None
            }
        }
    }
}
