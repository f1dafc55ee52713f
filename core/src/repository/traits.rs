use crate::model::dataset::Dataset;
use anyhow::Result;
use uuid::Uuid;

pub trait DatasetRepository {
    fn create(&self, dataset: Dataset) -> Result<Dataset>;
    fn get(&self, id: &Uuid) -> Result<Dataset>;
    fn list(&self) -> Result<Vec<Dataset>>;
    fn update(&self, dataset: &Dataset) -> Result<()>;
    fn delete(&self, id: &Uuid) -> Result<()>;
}
