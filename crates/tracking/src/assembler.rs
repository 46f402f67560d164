use model::{
    feature::{Feature, FeatureCollection, FeatureKind, FeatureProperties, PointGeometry},
    fix::Fix,
    window::TimeWindow,
};
use serde_json::value::RawValue;
use utility::serde::date_time;

use crate::{
    database::{Database, TrackRepo},
    RequestError, RequestResult,
};

/// Reads the line and the fixes of a device for `window` and composes them.
///
/// Both reads are issued concurrently. If either fails, nothing is composed.
pub async fn assemble<D: Database>(
    database: &D,
    device_id: &str,
    window: TimeWindow,
) -> RequestResult<FeatureCollection> {
    let mut line_handle = database.auto();
    let mut fixes_handle = database.auto();

    let (line, fixes) = futures::try_join!(
        line_handle.aggregated_line(device_id, window),
        fixes_handle.ordered_fixes(device_id, window),
    )
    .map_err(|why| {
        log::warn!("trajectory query for {device_id} failed: {why}");
        RequestError::QueryFailed(why)
    })?;

    log::debug!(
        "composing trajectory for {device_id}: {} fixes, line: {}",
        fixes.len(),
        line.is_some()
    );

    compose(device_id, line, &fixes).map_err(RequestError::Composition)
}

/// Builds the feature collection: the path line first (only if the store
/// produced one), then one point per fix in the given order.
pub fn compose(
    device_id: &str,
    line: Option<String>,
    fixes: &[Fix],
) -> serde_json::Result<FeatureCollection> {
    let mut features = Vec::with_capacity(fixes.len() + 1);

    if let Some(line) = line {
        features.push(Feature::new(
            FeatureProperties {
                kind: FeatureKind::Path,
                device_id: device_id.to_owned(),
                time: None,
            },
            RawValue::from_string(line)?,
        ));
    }

    for fix in fixes {
        features.push(Feature::new(
            FeatureProperties {
                kind: FeatureKind::Point,
                device_id: device_id.to_owned(),
                time: Some(date_time::format_utc(&fix.timestamp)),
            },
            PointGeometry::new(fix.latitude, fix.longitude).to_raw()?,
        ));
    }

    Ok(FeatureCollection::new(features))
}
