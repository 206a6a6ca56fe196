/// Vector similarity used when a collection is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Cosine,
    Euclidean,
    DotProduct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFieldType {
    Keyword,
    Integer,
    Bool,
}

/// Payload field the store indexes so filters on it stay cheap.
#[derive(Debug, Clone)]
pub struct PayloadIndex {
    pub field_name: String,
    pub field_type: PayloadFieldType,
}

impl PayloadIndex {
    fn new(field_name: &str, field_type: PayloadFieldType) -> Self {
        Self {
            field_name: field_name.to_string(),
            field_type,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectionConfig {
    pub vector_dimensions: u64,
    pub distance_metric: DistanceMetric,
    pub payload_indexes: Vec<PayloadIndex>,
}

impl CollectionConfig {
    pub fn new(vector_dimensions: u64) -> Self {
        Self {
            vector_dimensions,
            distance_metric: DistanceMetric::Cosine,
            payload_indexes: Vec::new(),
        }
    }

    /// Layout of a per-user document collection.
    pub fn document_collection(vector_dimensions: u64) -> Self {
        Self {
            payload_indexes: vec![
                PayloadIndex::new("source", PayloadFieldType::Keyword),
                PayloadIndex::new("page", PayloadFieldType::Integer),
            ],
            ..Self::new(vector_dimensions)
        }
    }

    /// Layout of the shared feedback collection.
    pub fn feedback_collection(vector_dimensions: u64) -> Self {
        Self {
            payload_indexes: vec![
                PayloadIndex::new("user_id", PayloadFieldType::Keyword),
                PayloadIndex::new("is_positive", PayloadFieldType::Bool),
            ],
            ..Self::new(vector_dimensions)
        }
    }
}
