//! Per-source, per-time-bucket face coordinate cache.
//!
//! Resolves the open question of whether to re-sample the face center per
//! clip or cache it per source: multiple candidate clips commonly share
//! overlapping source regions, so this caches by a coarse time bucket for
//! the lifetime of a single job rather than re-sampling per clip.

use std::collections::HashMap;
use std::path::Path;

use vclip_models::FaceCenter;

/// Bucket width, seconds. Clips whose midpoints land in the same bucket
/// reuse the same detected center.
const BUCKET_SECS: f64 = 30.0;

pub struct FaceCache {
    cache: HashMap<i64, FaceCenter>,
}

impl FaceCache {
    pub fn new() -> Self {
        Self { cache: HashMap::new() }
    }

    /// Get (computing and caching on first use) the face center for the
    /// bucket containing `midpoint`.
    pub async fn get_or_compute(
        &mut self,
        video_path: impl AsRef<Path>,
        midpoint: f64,
        prefer_left: bool,
        duration: f64,
    ) -> FaceCenter {
        let bucket = (midpoint / BUCKET_SECS).floor() as i64;
        if let Some(center) = self.cache.get(&bucket) {
            return *center;
        }
        let center = vclip_media::face_center(video_path, prefer_left, duration).await;
        self.cache.insert(bucket, center);
        center
    }
}

impl Default for FaceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_computation_groups_nearby_midpoints() {
        let a = (10.0_f64 / BUCKET_SECS).floor() as i64;
        let b = (15.0_f64 / BUCKET_SECS).floor() as i64;
        let c = (45.0_f64 / BUCKET_SECS).floor() as i64;
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
