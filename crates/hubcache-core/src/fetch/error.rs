use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Network unreachable")]
    Unreachable,

    #[error("Asset unavailable: {path} returned status {status}")]
    AssetUnavailable { path: String, status: u16 },

    #[error("No cached entry for {0}")]
    NotCached(String),
}

impl FetchError {
    /// Install-time check: a manifest asset must come back 2xx.
    pub fn asset_unavailable(path: &str, status: u16) -> Self {
        FetchError::AssetUnavailable {
            path: path.to_string(),
            status,
        }
    }
}
