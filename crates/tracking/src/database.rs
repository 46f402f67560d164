use std::{error, fmt::Debug, result};

use async_trait::async_trait;
use model::{fix::Fix, window::TimeWindow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("store unavailable")]
    Unavailable,

    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<T: error::Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Durable storage of device fixes.
///
/// Implementations own the spatial representation of a fix and the building
/// of lines from fixes. Callers only ever forward the line geometry.
#[async_trait]
pub trait TrackRepo {
    /// Durably records one fix, keyed for ordered retrieval by device and
    /// timestamp.
    async fn append(&mut self, fix: Fix) -> Result<()>;

    /// All fixes of the device inside `window`, ascending by timestamp. Fixes
    /// sharing a timestamp come back in insertion order.
    async fn ordered_fixes(
        &mut self,
        device_id: &str,
        window: TimeWindow,
    ) -> Result<Vec<Fix>>;

    /// A GeoJSON line connecting the fixes returned by `ordered_fixes` in the
    /// same order, or `None` if there are none.
    async fn aggregated_line(
        &mut self,
        device_id: &str,
        window: TimeWindow,
    ) -> Result<Option<String>>;
}

pub trait DatabaseOperations: TrackRepo + Send {}

pub trait DatabaseAutocommit: DatabaseOperations {}

pub trait Database: Debug + Clone + Send + Sync + Sized + 'static {
    type Autocommit: DatabaseAutocommit;

    /// A handle on which every operation commits on its own.
    fn auto(&self) -> Self::Autocommit;
}
