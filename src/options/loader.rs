use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
/// Fetch pool sizing and per-part buffer capacities for texture loading.
pub struct LoaderOptions {
    /// Background threads reading asset bytes.
    pub worker_threads: usize,
    /// Maximum fetches in flight; further sends fail immediately.
    pub max_requests: usize,
    /// Byte capacity of one encoded cubemap face.
    pub cubemap_part_capacity: usize,
    /// Byte capacity of one encoded texture-array layer.
    pub array_part_capacity: usize,
    /// Byte capacity of a single encoded 2D image.
    pub image_part_capacity: usize,
    /// Required width of every texture-array layer.
    pub array_layer_width: u32,
    /// Required height of every texture-array layer.
    pub array_layer_height: u32,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            worker_threads: 8,
            max_requests: 120,
            cubemap_part_capacity: 1024 * 1024,
            array_part_capacity: 256 * 1024,
            image_part_capacity: 1024 * 1024,
            array_layer_width: 256,
            array_layer_height: 256,
        }
    }
}
