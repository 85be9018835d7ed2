//! Identifier generators for one conversion session

/// First paragraph ID handed out (the counter is incremented before use)
pub const PARA_ID_BASE: u64 = 3_121_190_098;

/// First object ID for tables, pictures, fields and notes
pub const OBJECT_ID_BASE: u64 = 1_000_000;

/// Monotonic ID counters owned by a single writer
///
/// Paragraph IDs, object instance IDs and binary item names each have their
/// own sequence. Values are unique within one conversion; nothing is shared
/// between writers.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    para: u64,
    object: u64,
    image: u32,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator {
    /// Create counters at their fixed seeds
    pub fn new() -> Self {
        Self {
            para: PARA_ID_BASE,
            object: OBJECT_ID_BASE,
            image: 0,
        }
    }

    /// Next paragraph ID
    pub fn next_para_id(&mut self) -> u64 {
        self.para += 1;
        self.para
    }

    /// Next object instance ID
    pub fn next_object_id(&mut self) -> u64 {
        self.object += 1;
        self.object
    }

    /// Next binary item name, e.g. `image1`
    pub fn next_image_id(&mut self) -> String {
        self.image += 1;
        format!("image{}", self.image)
    }
}
