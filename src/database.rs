use crate::error::DatabaseError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// One actor's reference voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    pub name: String,
    pub vector: Vec<f32>,
}

/// Records in the order their actors were processed.
///
/// Serializes as a bare JSON array of `{"name", "vector"}` objects.
/// Deserializing goes through [`EmbeddingDatabase::push`], so ragged input
/// is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EmbeddingDatabase {
    records: Vec<EmbeddingRecord>,
}

impl EmbeddingDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, keeping every vector the same length.
    pub fn push(&mut self, record: EmbeddingRecord) -> Result<(), DatabaseError> {
        if let Some(expected) = self.dimension() {
            if record.vector.len() != expected {
                return Err(DatabaseError::DimensionMismatch {
                    expected,
                    got: record.vector.len(),
                });
            }
        }
        self.records.push(record);
        Ok(())
    }

    /// Vector length shared by all records, `None` while empty.
    pub fn dimension(&self) -> Option<usize> {
        self.records.first().map(|record| record.vector.len())
    }

    pub fn records(&self) -> &[EmbeddingRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<EmbeddingRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EmbeddingRecord> {
        self.records.iter().find(|record| record.name == name)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), DatabaseError> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatabaseError> {
        let records: Vec<EmbeddingRecord> = serde_json::from_reader(reader)?;
        Self::try_from(records)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), DatabaseError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatabaseError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }
}

impl TryFrom<Vec<EmbeddingRecord>> for EmbeddingDatabase {
    type Error = DatabaseError;

    fn try_from(records: Vec<EmbeddingRecord>) -> Result<Self, Self::Error> {
        let mut database = Self::new();
        for record in records {
            database.push(record)?;
        }
        Ok(database)
    }
}

impl<'de> Deserialize<'de> for EmbeddingDatabase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<EmbeddingRecord>::deserialize(deserializer)?;
        Self::try_from(records).map_err(serde::de::Error::custom)
    }
}
