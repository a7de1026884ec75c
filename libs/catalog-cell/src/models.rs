use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Specialization {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Disease row as stored. `specialization_id` goes null when the referenced
/// specialization is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    pub id: Uuid,
    pub name: String,
    pub specialization_id: Option<Uuid>,
    pub symptoms: Option<String>,
}

/// Disease with the specialization name embedded by the store
/// (`select=*,specialization:specializations(name)`).
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseRecord {
    pub id: Uuid,
    pub name: String,
    pub specialization_id: Option<Uuid>,
    pub symptoms: Option<String>,
    pub specialization: Option<SpecializationRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecializationRef {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiseaseResponse {
    pub id: Uuid,
    pub name: String,
    pub specialization_name: Option<String>,
    pub symptoms: Option<String>,
}

impl From<DiseaseRecord> for DiseaseResponse {
    fn from(record: DiseaseRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            specialization_name: record.specialization.map(|s| s.name),
            symptoms: record.symptoms,
        }
    }
}
