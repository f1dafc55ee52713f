use std::sync::RwLock;

use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::model::dataset::Dataset;
use crate::repository::traits::DatasetRepository;

/// Session-only store. Datasets keep their insertion order.
#[derive(Default)]
pub struct InMemoryDatasetRepository {
    datasets: RwLock<Vec<Dataset>>,
}

impl InMemoryDatasetRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetRepository for InMemoryDatasetRepository {
    fn create(&self, dataset: Dataset) -> Result<Dataset> {
        let mut datasets = self.datasets.write().map_err(|_| anyhow!("Dataset store is poisoned"))?;
        datasets.push(dataset.clone());
        Ok(dataset)
    }

    fn get(&self, id: &Uuid) -> Result<Dataset> {
        let datasets = self.datasets.read().map_err(|_| anyhow!("Dataset store is poisoned"))?;
        datasets
            .iter()
            .find(|d| d.id == *id)
            .cloned()
            .ok_or_else(|| anyhow!("Dataset with ID {} not found", id))
    }

    fn list(&self) -> Result<Vec<Dataset>> {
        let datasets = self.datasets.read().map_err(|_| anyhow!("Dataset store is poisoned"))?;
        Ok(datasets.clone())
    }

    fn update(&self, dataset: &Dataset) -> Result<()> {
        let mut datasets = self.datasets.write().map_err(|_| anyhow!("Dataset store is poisoned"))?;
        if let Some(pos) = datasets.iter().position(|d| d.id == dataset.id) {
            datasets[pos] = dataset.clone();
            Ok(())
        } else {
            Err(anyhow!("Dataset with ID {} not found", dataset.id))
        }
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut datasets = self.datasets.write().map_err(|_| anyhow!("Dataset store is poisoned"))?;
        let initial_len = datasets.len();
        datasets.retain(|d| d.id != *id);

        if datasets.len() == initial_len {
            return Err(anyhow!("Dataset with ID {} not found", id));
        }
        Ok(())
    }
}
