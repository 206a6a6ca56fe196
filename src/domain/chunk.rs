use uuid::Uuid;

/// A piece of one PDF page, as stored in a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: ChunkId,
    pub text: String,
    pub page: Option<u32>,
    pub offset: usize,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkId(Uuid);

impl ChunkId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ChunkId {
    fn default() -> Self {
        Self::new()
    }
}

impl Chunk {
    pub fn new(text: String, page: Option<u32>, offset: usize, source: String) -> Self {
        Self {
            id: ChunkId::new(),
            text,
            page,
            offset,
            source,
        }
    }
}

/// Text of a single PDF page; `number` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub text: String,
}
