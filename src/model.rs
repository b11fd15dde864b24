use serde::{Deserialize, Serialize};

use crate::extraction::LayoutProfile;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Renavam,
    Placa,
    AnoFabricacao,
    AnoModelo,
    MarcaModeloVersao,
    CorPredominante,
    TesteChassi,
}

impl FieldKey {
    /// Output order of the record and of the tabular export columns.
    pub const ALL: [FieldKey; 7] = [
        Self::Renavam,
        Self::Placa,
        Self::AnoFabricacao,
        Self::AnoModelo,
        Self::MarcaModeloVersao,
        Self::CorPredominante,
        Self::TesteChassi,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Renavam => "renavam",
            Self::Placa => "placa",
            Self::AnoFabricacao => "ano_fabricacao",
            Self::AnoModelo => "ano_modelo",
            Self::MarcaModeloVersao => "marca_modelo_versao",
            Self::CorPredominante => "cor_predominante",
            Self::TesteChassi => "teste_chassi",
        }
    }
}

/// Field values found in one document. Every field is always present;
/// `None` is the absence marker and serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub renavam: Option<String>,
    pub placa: Option<String>,
    pub ano_fabricacao: Option<String>,
    pub ano_modelo: Option<String>,
    pub marca_modelo_versao: Option<String>,
    pub cor_predominante: Option<String>,
    pub teste_chassi: Option<String>,
}

impl ExtractionRecord {
    pub fn get(&self, field: FieldKey) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: FieldKey, value: Option<String>) {
        *self.slot_mut(field) = value;
    }

    pub fn found_count(&self) -> usize {
        FieldKey::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }

    fn slot(&self, field: FieldKey) -> &Option<String> {
        match field {
            FieldKey::Renavam => &self.renavam,
            FieldKey::Placa => &self.placa,
            FieldKey::AnoFabricacao => &self.ano_fabricacao,
            FieldKey::AnoModelo => &self.ano_modelo,
            FieldKey::MarcaModeloVersao => &self.marca_modelo_versao,
            FieldKey::CorPredominante => &self.cor_predominante,
            FieldKey::TesteChassi => &self.teste_chassi,
        }
    }

    fn slot_mut(&mut self, field: FieldKey) -> &mut Option<String> {
        match field {
            FieldKey::Renavam => &mut self.renavam,
            FieldKey::Placa => &mut self.placa,
            FieldKey::AnoFabricacao => &mut self.ano_fabricacao,
            FieldKey::AnoModelo => &mut self.ano_modelo,
            FieldKey::MarcaModeloVersao => &mut self.marca_modelo_versao,
            FieldKey::CorPredominante => &mut self.cor_predominante,
            FieldKey::TesteChassi => &mut self.teste_chassi,
        }
    }
}

/// A record tagged with the file name of the document it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub arquivo: String,
    #[serde(flatten)]
    pub record: ExtractionRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub filename: String,
    pub sha256: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub document_count: usize,
    pub documents: Vec<DocumentEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolVersions {
    pub crlv: String,
    pub pdftotext: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractPaths {
    pub input_dir: String,
    pub csv_path: String,
    pub json_path: String,
    pub manifest_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldFoundCount {
    pub field: FieldKey,
    pub found: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractCounts {
    pub document_count: usize,
    pub extracted_count: usize,
    pub failed_count: usize,
    pub complete_record_count: usize,
    pub fields_found: Vec<FieldFoundCount>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub arquivo: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub started_at: String,
    pub completed_at: String,
    pub command: String,
    pub tool_versions: ToolVersions,
    pub paths: ExtractPaths,
    pub layout_profile: LayoutProfile,
    pub counts: ExtractCounts,
    pub failures: Vec<DocumentFailure>,
}
