use std::collections::BTreeMap;

use serde::Serialize;

use super::normalize::normalize;
use crate::model::FieldKey;

/// Label text printed next to each field on the registration document.
pub const LABEL_TABLE: [(FieldKey, &str); 7] = [
    (FieldKey::Renavam, "CÓDIGO RENAVAM"),
    (FieldKey::Placa, "PLACA"),
    (FieldKey::AnoFabricacao, "ANO FABRICAÇÃO"),
    (FieldKey::AnoModelo, "ANO MODELO"),
    (FieldKey::MarcaModeloVersao, "MARCA / MODELO / VERSÃO"),
    (FieldKey::CorPredominante, "COR PREDOMINANTE"),
    (FieldKey::TesteChassi, "Chassi"),
];

/// First line index at which each field's label was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LabelIndex {
    positions: BTreeMap<FieldKey, usize>,
}

impl LabelIndex {
    pub fn get(&self, field: FieldKey) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Single pass over the normalized lines; the first line containing a
/// label wins and is never overwritten by later duplicates.
pub fn locate(normalized_lines: &[String], table: &[(FieldKey, &str)]) -> LabelIndex {
    let labels = table
        .iter()
        .map(|(field, label)| (*field, normalize(label)))
        .collect::<Vec<(FieldKey, String)>>();

    let mut positions = BTreeMap::new();
    for (index, line) in normalized_lines.iter().enumerate() {
        if positions.len() == labels.len() {
            break;
        }
        for (field, label) in &labels {
            if positions.contains_key(field) {
                continue;
            }
            if line.contains(label.as_str()) {
                positions.insert(*field, index);
            }
        }
    }

    LabelIndex { positions }
}
