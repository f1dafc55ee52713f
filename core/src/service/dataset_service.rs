use std::io::{Read, Write};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::model::dataset::{Dataset, Entry};
use crate::repository::{export_file_name, read_csv, read_entries, write_entries, DatasetRepository};
use crate::time::format_date;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Which column of an entry an edit targets.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryField {
    Date(String),
    Value(f64),
}

pub struct DatasetService<R: DatasetRepository> {
    repo: R,
}

impl<R: DatasetRepository> DatasetService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn add_dataset(&self, name: &str) -> Result<Dataset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("Dataset name is required"));
        }
        self.repo.create(Dataset::new(name.to_string()))
    }

    pub fn get_dataset(&self, id: &Uuid) -> Result<Dataset> {
        self.repo.get(id)
    }

    pub fn list_datasets(&self) -> Result<Vec<Dataset>> {
        self.repo.list()
    }

    pub fn delete_dataset(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)
    }

    pub fn rename_dataset(&self, id: &Uuid, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(anyhow!("Dataset name is required"));
        }
        self.modify(id, |ds| {
            ds.name = name.to_string();
            Ok(())
        })
    }

    pub fn toggle_collapse(&self, id: &Uuid) -> Result<()> {
        self.modify(id, |ds| {
            ds.collapsed = !ds.collapsed;
            Ok(())
        })
    }

    /// Appends a blank row dated `today`.
    pub fn add_entry(&self, id: &Uuid, today: NaiveDate) -> Result<()> {
        self.push_entry(id, Entry::new(format_date(today), 0.0))
    }

    pub fn push_entry(&self, id: &Uuid, entry: Entry) -> Result<()> {
        self.modify(id, |ds| {
            ds.entries.push(entry);
            Ok(())
        })
    }

    pub fn update_entry(&self, id: &Uuid, index: usize, field: EntryField) -> Result<()> {
        self.modify(id, |ds| {
            let entry = ds
                .entries
                .get_mut(index)
                .ok_or_else(|| anyhow!("Entry {} out of range", index))?;
            match field {
                EntryField::Date(date) => entry.date = date,
                EntryField::Value(value) => entry.value = value,
            }
            Ok(())
        })
    }

    pub fn delete_entry(&self, id: &Uuid, index: usize) -> Result<()> {
        self.modify(id, |ds| {
            if index >= ds.entries.len() {
                return Err(anyhow!("Entry {} out of range", index));
            }
            ds.entries.remove(index);
            Ok(())
        })
    }

    /// Swaps the entry with its neighbour. Moving past either end is a no-op.
    pub fn move_entry(&self, id: &Uuid, index: usize, direction: MoveDirection) -> Result<()> {
        self.modify(id, |ds| {
            let len = ds.entries.len();
            match direction {
                MoveDirection::Up if index > 0 && index < len => ds.entries.swap(index - 1, index),
                MoveDirection::Down if index + 1 < len => ds.entries.swap(index, index + 1),
                _ => {}
            }
            Ok(())
        })
    }

    /// Replaces all entries with the CSV contents and collapses the dataset.
    pub fn import_csv<Rd: Read>(&self, id: &Uuid, reader: Rd) -> Result<usize> {
        let entries = read_entries(reader)?;
        let count = entries.len();
        self.modify(id, |ds| {
            ds.entries = entries;
            ds.collapsed = true;
            Ok(())
        })?;
        Ok(count)
    }

    /// Creates a dataset from a whole CSV file. It is named after the category
    /// on the file's first data row, or `fallback_name` when that is blank, so
    /// writing it back keeps the file's category.
    pub fn import_csv_dataset<Rd: Read>(&self, fallback_name: &str, reader: Rd) -> Result<Dataset> {
        let import = read_csv(reader)?;
        let name = import.category.as_deref().unwrap_or(fallback_name);

        let mut ds = self.add_dataset(name)?;
        ds.entries = import.entries;
        ds.collapsed = true;
        self.repo.update(&ds)?;
        Ok(ds)
    }

    /// Writes the dataset as CSV and returns the suggested file name.
    pub fn export_csv<W: Write>(&self, id: &Uuid, writer: W) -> Result<String> {
        let ds = self.repo.get(id)?;
        write_entries(writer, &ds.name, &ds.entries)?;
        Ok(export_file_name(&ds.name))
    }

    fn modify<F>(&self, id: &Uuid, f: F) -> Result<()>
    where
        F: FnOnce(&mut Dataset) -> Result<()>,
    {
        let mut ds = self.repo.get(id)?;
        f(&mut ds)?;
        self.repo.update(&ds)
    }
}
