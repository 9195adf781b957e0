use rand::Rng;
use sha1::{Digest, Sha1};

use crate::types::Attachment;

pub const IMAGE_TITLE: &str = "My excuse is ...";

/// Where the excuse images live and how many there are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSet {
    base_url: String,
    count: u32,
}

impl ImageSet {
    /// Returns `None` when images are not configured (no base URL or zero
    /// images), which disables attachments.
    pub fn new(base_url: &str, count: u32) -> Option<Self> {
        let base_url = base_url.trim();
        if base_url.is_empty() || count == 0 {
            return None;
        }

        let base_url = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        Some(Self { base_url, count })
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn url(&self, index: u32) -> String {
        format!("{}{}.jpg", self.base_url, image_name(index))
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Attachment {
        let index = pick_index(rng, self.count);
        Attachment::image(IMAGE_TITLE, self.url(index))
    }
}

/// Draws from `[0, count)` and remaps 0 to 1, so index 1 is twice as likely
/// as any other. Images are numbered from 1 in the bucket.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, count: u32) -> u32 {
    let index = if count == 0 { 0 } else { rng.gen_range(0..count) };
    index.max(1)
}

/// Images are stored under the hex SHA-1 of their decimal index.
pub fn image_name(index: u32) -> String {
    hex::encode(Sha1::digest(index.to_string().as_bytes()))
}
