use chrono::{DateTime, Utc};
use model::{
    feature::FeatureCollection, fix::Fix, fix::TrackRequest, query::PathQuery,
    window::TimeWindow,
};

use crate::{
    assembler,
    database::{Database, TrackRepo},
    validation, window, RequestError, RequestResult,
};

#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database + Send + Sync + Sized + 'static,
{
    id: String,
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new<S>(id: S, database: D) -> Self
    where
        S: Into<String>,
    {
        Self {
            id: id.into(),
            database,
        }
    }

    /// Validates and stores one fix. Nothing reaches the store if validation
    /// fails.
    pub async fn track(&self, request: TrackRequest) -> RequestResult<Fix> {
        let timestamp =
            validation::validate_fix(&request.device_id, request.timestamp.as_ref())?;
        let fix = Fix {
            device_id: request.device_id,
            latitude: request.latitude,
            longitude: request.longitude,
            timestamp,
        };

        self.database
            .auto()
            .append(fix.clone())
            .await
            .map_err(|why| {
                log::error!("[{}] could not store fix of {}: {}", self.id, fix.device_id, why);
                RequestError::InsertFailed(why)
            })?;

        log::debug!("[{}] stored fix of {} at {}", self.id, fix.device_id, fix.timestamp);
        Ok(fix)
    }

    /// Resolves the selectors of `query` against `now` and returns the
    /// trajectory of the requested device.
    pub async fn path(
        &self,
        query: &PathQuery,
        now: DateTime<Utc>,
    ) -> RequestResult<FeatureCollection> {
        let device_id = validation::require_device_id(query.device_id())?;
        let window = window::resolve(query, now)?;
        self.trajectory(device_id, window).await
    }

    pub async fn trajectory(
        &self,
        device_id: &str,
        window: TimeWindow,
    ) -> RequestResult<FeatureCollection> {
        assembler::assemble(&self.database, device_id, window).await
    }
}
