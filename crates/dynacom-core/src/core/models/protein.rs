use super::model::Model;

/// A parsed structure file: its frames plus the header and remark lines that were not records.
#[derive(Debug, Clone, Default)]
pub struct Protein {
    /// Source file name or structure identifier.
    pub id: String,
    models: Vec<Model>,
    annotations: Vec<String>,
}

impl Protein {
    pub fn new(id: impl Into<String>, models: Vec<Model>, annotations: Vec<String>) -> Self {
        Self {
            id: id.into(),
            models,
            annotations,
        }
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut [Model] {
        &mut self.models
    }

    /// Returns the frame at zero-based position `index`.
    pub fn model(&self, index: usize) -> Option<&Model> {
        self.models.get(index)
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn annotations(&self) -> &[String] {
        &self.annotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::builder::ModelBuilder;

    #[test]
    fn protein_exposes_models_in_order() {
        let models = vec![ModelBuilder::new(1).build(), ModelBuilder::new(2).build()];
        let protein = Protein::new("1abc.pdb", models, vec!["HEADER".to_string()]);

        assert_eq!(protein.id, "1abc.pdb");
        assert_eq!(protein.model_count(), 2);
        assert_eq!(protein.model(1).unwrap().id, 2);
        assert!(protein.model(2).is_none());
        assert_eq!(protein.annotations(), &["HEADER".to_string()]);
    }
}
