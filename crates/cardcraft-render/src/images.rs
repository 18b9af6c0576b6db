//! Image decoding and the decoded image cache.

use crate::renderer::{RenderError, RenderResult};
use base64::Engine;
use cardcraft_core::{DecodeRequest, EditorEvent, EditorMessage, ImageRef};
use image::RgbaImage;
use std::collections::{HashMap, HashSet, VecDeque};

/// Decoded images keyed by their reference.
#[derive(Debug, Default)]
pub struct ImageStore {
    images: HashMap<ImageRef, RgbaImage>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &ImageRef) -> Option<&RgbaImage> {
        self.images.get(reference)
    }

    pub fn contains(&self, reference: &ImageRef) -> bool {
        self.images.contains_key(reference)
    }

    pub fn insert(&mut self, reference: ImageRef, image: RgbaImage) {
        self.images.insert(reference, image);
    }

    /// Drop every image not in `live` (see `EditorSession::live_images`).
    /// Returns how many were evicted.
    pub fn retain_live(&mut self, live: &HashSet<ImageRef>) -> usize {
        let before = self.images.len();
        self.images.retain(|reference, _| live.contains(reference));
        let evicted = before - self.images.len();
        if evicted > 0 {
            log::debug!("Evicted {evicted} decoded images, {} kept", self.images.len());
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Decode a `data:` URI holding a base64-encoded PNG, JPEG or WebP.
///
/// Other reference schemes (object URLs) belong to the page and are rejected.
pub fn decode_reference(reference: &ImageRef) -> RenderResult<RgbaImage> {
    let Some(rest) = reference.as_str().strip_prefix("data:") else {
        return Err(RenderError::Decode("only data URIs can be decoded".to_string()));
    };
    let Some((meta, payload)) = rest.split_once(',') else {
        return Err(RenderError::Decode("data URI has no payload".to_string()));
    };
    if !meta.ends_with(";base64") {
        return Err(RenderError::Decode(format!("unsupported data URI encoding: {meta}")));
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| RenderError::Decode(e.to_string()))?;
    let decoded = image::load_from_memory(&bytes).map_err(|e| RenderError::Decode(e.to_string()))?;
    Ok(decoded.to_rgba8())
}

/// Decode requests waiting to be served, oldest first.
///
/// The queue never touches the session: [`DecodeQueue::pump`] returns the
/// messages to feed back through `EditorSession::update`.
#[derive(Debug, Default)]
pub struct DecodeQueue {
    requests: VecDeque<DecodeRequest>,
}

impl DecodeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: DecodeRequest) {
        self.requests.push_back(request);
    }

    /// Queue every decode requested in a batch of session events.
    pub fn extend_from_events(&mut self, events: &[EditorEvent]) {
        for event in events {
            if let EditorEvent::DecodeRequested(request) = event {
                self.push(request.clone());
            }
        }
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Decode everything queued into `store`.
    pub fn pump(&mut self, store: &mut ImageStore) -> Vec<EditorMessage> {
        let mut replies = Vec::with_capacity(self.requests.len());
        while let Some(request) = self.requests.pop_front() {
            if store.contains(&request.reference) {
                replies.push(EditorMessage::ImageDecoded(request));
                continue;
            }
            match decode_reference(&request.reference) {
                Ok(image) => {
                    log::debug!(
                        "Decoded {:?} image ({}x{})",
                        request.slot,
                        image.width(),
                        image.height()
                    );
                    store.insert(request.reference.clone(), image);
                    replies.push(EditorMessage::ImageDecoded(request));
                }
                Err(e) => {
                    log::warn!("Image decode failed for {:?}: {e}", request.slot);
                    replies.push(EditorMessage::ImageDecodeFailed {
                        request,
                        reason: e.to_string(),
                    });
                }
            }
        }
        replies
    }
}

/// Encode RGBA8 pixels as a base64 PNG data URI.
pub fn png_data_uri(rgba: &[u8], width: u32, height: u32) -> RenderResult<ImageRef> {
    let png = crate::raster::encode_png(rgba, width, height)?;
    let payload = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(ImageRef::new(format!("data:image/png;base64,{payload}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardcraft_core::{CardDesign, EditorConfig, EditorSession, ImageSlot, SideId};

    fn red_square() -> ImageRef {
        let pixels = [255u8, 0, 0, 255].repeat(4);
        png_data_uri(&pixels, 2, 2).unwrap()
    }

    fn request(reference: ImageRef) -> DecodeRequest {
        DecodeRequest {
            side: SideId::Front,
            slot: ImageSlot::Logo,
            reference,
        }
    }

    #[test]
    fn test_decode_png_data_uri() {
        let image = decode_reference(&red_square()).unwrap();
        assert_eq!(image.dimensions(), (2, 2));
        assert_eq!(image.get_pixel(1, 1).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            decode_reference(&ImageRef::new("blob:https://example.com/1234")),
            Err(RenderError::Decode(_))
        ));
        assert!(decode_reference(&ImageRef::new("data:image/png,plain")).is_err());
        assert!(decode_reference(&ImageRef::new("data:image/png;base64,!!!")).is_err());
        assert!(decode_reference(&ImageRef::new("data:image/png;base64,AAAA")).is_err());
    }

    #[test]
    fn test_pump_answers_every_request() {
        let mut queue = DecodeQueue::new();
        let mut store = ImageStore::new();
        let good = request(red_square());
        let bad = request(ImageRef::new("blob:nope"));
        queue.extend_from_events(&[
            EditorEvent::SceneChanged,
            EditorEvent::DecodeRequested(good.clone()),
            EditorEvent::DecodeRequested(bad.clone()),
        ]);
        assert_eq!(queue.len(), 2);

        let replies = queue.pump(&mut store);
        assert!(queue.is_empty());
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0], EditorMessage::ImageDecoded(good.clone()));
        assert!(matches!(&replies[1], EditorMessage::ImageDecodeFailed { request, .. } if *request == bad));
        assert!(store.contains(&good.reference));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_superseded_decode_is_evicted() {
        let mut session = EditorSession::new(CardDesign::default(), EditorConfig::default());
        let mut queue = DecodeQueue::new();
        let mut store = ImageStore::new();
        let stale = red_square();
        let blue = png_data_uri(&[0u8, 0, 255, 255].repeat(4), 2, 2).unwrap();
        for reference in [stale.clone(), blue.clone()] {
            let events = session.update(EditorMessage::ImageSelected {
                slot: ImageSlot::Background,
                reference,
            });
            queue.extend_from_events(&events);
        }
        for reply in queue.pump(&mut store) {
            session.update(reply);
        }
        assert_eq!(store.len(), 2);

        assert_eq!(store.retain_live(&session.live_images()), 1);
        assert!(store.contains(&blue));
        assert!(!store.contains(&stale));
        assert_eq!(store.retain_live(&session.live_images()), 0);
    }

    #[test]
    fn test_cached_reference_is_not_decoded_again() {
        let mut store = ImageStore::new();
        let reference = ImageRef::new("blob:already-decoded");
        store.insert(reference.clone(), RgbaImage::new(1, 1));
        let mut queue = DecodeQueue::new();
        queue.push(request(reference.clone()));
        let replies = queue.pump(&mut store);
        assert_eq!(replies, vec![EditorMessage::ImageDecoded(request(reference))]);
    }
}
