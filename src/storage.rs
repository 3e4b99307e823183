use crate::errors::AppError;
use crate::models::FarmData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info};

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/farm.json")
}

pub async fn load_data(path: &Path) -> FarmData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<FarmData>(&bytes) {
            Ok(data) => {
                info!(
                    produce = data.produce.len(),
                    stock = data.stock.len(),
                    "loaded farm data"
                );
                data
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                FarmData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => FarmData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            FarmData::default()
        }
    }
}

/// Writes the snapshot next to `path` and renames it into place, so a failed
/// write never leaves a truncated data file behind.
pub async fn persist_data(path: &Path, data: &FarmData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    let staging = staging_path(path);
    fs::write(&staging, payload).await.map_err(AppError::internal)?;
    if let Err(err) = fs::rename(&staging, path).await {
        error!(path = %path.display(), "failed to replace data file: {err}");
        let _ = fs::remove_file(&staging).await;
        return Err(AppError::internal(err));
    }
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
