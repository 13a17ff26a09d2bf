//! Cached per-building resource list.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheSpace;
use crate::directory::Resource;
use crate::error::Result;
use crate::sources::DirectorySource;

const RESOURCES_FILENAME: &str = "resources.json";

/// The conference rooms of one building, loaded from the disk cache when
/// fresh and refetched through `source` otherwise.
pub async fn resources_in_building(
    cache: &CacheSpace,
    source: &dyn DirectorySource,
    building_id: &str,
    max_age: Duration,
) -> Result<Vec<Resource>> {
    cache
        .get_or_create(
            building_id,
            max_age,
            |dir: PathBuf| async move {
                let file = std::fs::File::open(dir.join(RESOURCES_FILENAME))?;
                Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
            },
            |dir: PathBuf| async move {
                let mut resources: Vec<Resource> = Vec::new();
                source
                    .for_each_resource(
                        building_id,
                        Box::new(|resource| {
                            resources.push(resource);
                            Box::pin(async { Ok(()) })
                        }),
                    )
                    .await?;
                let file = std::fs::File::create(dir.join(RESOURCES_FILENAME))?;
                serde_json::to_writer(std::io::BufWriter::new(file), &resources)?;
                Ok(resources)
            },
        )
        .await
}
