//! Errors raised while building a simulation.

use hexbots_logic::error::{CatalogError, GridError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("layout JSON: {0}")]
    Layout(#[from] serde_json::Error),
    #[error("house has no walkable cells to spawn robots on")]
    NoSpawnCells,
    #[error("home body `{0}` is not in the solar layout")]
    UnknownHome(String),
}
