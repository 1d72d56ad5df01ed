use glance_geometry::Size;
use indexmap::IndexMap;

/// Number of natural sizes remembered across page rebuilds.
pub const IMAGE_SIZE_CACHE_CAPACITY: usize = 50;

/// Insertion-ordered cache of resolved natural image sizes.
///
/// When full, the oldest entry is evicted first. Re-inserting an existing
/// key updates it in place without refreshing its age.
#[derive(Clone, Debug)]
pub struct ImageSizeCache {
    capacity: usize,
    entries: IndexMap<String, Size>,
}

impl ImageSizeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: IndexMap::with_capacity(capacity.max(1)),
        }
    }

    pub fn get(&self, key: &str) -> Option<Size> {
        self.entries.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, size: Size) {
        let key = key.into();
        if let Some(existing) = self.entries.get_mut(&key) {
            *existing = size;
            return;
        }
        if self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                log::trace!("image size cache evicted {evicted}");
            }
        }
        self.entries.insert(key, size);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ImageSizeCache {
    fn default() -> Self {
        Self::new(IMAGE_SIZE_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut cache = ImageSizeCache::new(2);
        cache.insert("a", Size::new(1.0, 1.0));
        cache.insert("b", Size::new(2.0, 2.0));
        cache.insert("c", Size::new(3.0, 3.0));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(Size::new(2.0, 2.0)));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn update_keeps_position() {
        let mut cache = ImageSizeCache::new(2);
        cache.insert("a", Size::new(1.0, 1.0));
        cache.insert("b", Size::new(2.0, 2.0));
        cache.insert("a", Size::new(5.0, 5.0));
        cache.insert("c", Size::new(3.0, 3.0));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("c"), Some(Size::new(3.0, 3.0)));
    }

    #[test]
    fn default_capacity() {
        let mut cache = ImageSizeCache::default();
        for index in 0..60 {
            cache.insert(format!("img-{index}"), Size::new(10.0, 10.0));
        }
        assert_eq!(cache.len(), IMAGE_SIZE_CACHE_CAPACITY);
        assert!(cache.get("img-9").is_none());
        assert!(cache.get("img-10").is_some());
    }
}
