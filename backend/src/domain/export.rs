//! CSV rendering for region exports.

use csv::WriterBuilder;
use serde::Serialize;

use crate::domain::error::Error;
use crate::domain::region::Region;

#[derive(Debug, Serialize)]
struct RegionRow<'a> {
    id: &'a str,
    name: &'a str,
    longitude: f64,
    latitude: f64,
    owner: &'a str,
    created_at: String,
}

/// Render regions as a CSV document with a header row.
pub fn regions_to_csv(regions: &[Region]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
    for region in regions {
        writer
            .serialize(RegionRow {
                id: region.id.as_ref(),
                name: &region.name,
                longitude: region.coordinates.longitude(),
                latitude: region.coordinates.latitude(),
                owner: region.owner.as_ref(),
                created_at: region.created_at.to_rfc3339(),
            })
            .map_err(|err| Error::internal(format!("csv serialisation failed: {err}")))?;
    }
    writer
        .into_inner()
        .map_err(|err| Error::internal(format!("csv buffer error: {err}")))
}
