use std::path::Path;

/// Document identifier: the 1-based position of the file in the input list.
pub type DocId = u32;

/// A file handed out by the [`FileQueue`](crate::FileQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document<'a> {
    pub id: DocId,
    pub path: &'a Path,
}
