use std::collections::{BTreeMap, HashSet};

use crate::dom::{Document, NodeId};

pub const LOADED_CLASS: &str = "loaded";

/// Answers whether the browser already holds a decoded image for `src`
/// (`HTMLImageElement.complete`).
pub trait ImageCache {
    fn is_complete(&self, src: &str) -> bool;
}

/// Cache that never reports a hit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColdCache;

impl ImageCache for ColdCache {
    fn is_complete(&self, _src: &str) -> bool {
        false
    }
}

impl ImageCache for HashSet<String> {
    fn is_complete(&self, src: &str) -> bool {
        self.contains(src)
    }
}

/// Showcase boxes waiting for their image to finish loading.
#[derive(Debug, Clone, Default)]
pub struct LazyImages {
    pending: BTreeMap<NodeId, NodeId>,
}

impl LazyImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `image_box` loaded now if the image is cached, otherwise once
    /// [`LazyImages::image_loaded`] reports the image.
    pub fn register(
        &mut self,
        doc: &mut Document,
        image_box: NodeId,
        image: NodeId,
        cache: &dyn ImageCache,
    ) {
        let cached = doc
            .attribute(image, "src")
            .is_some_and(|src| cache.is_complete(src));
        if cached {
            doc.add_class(image_box, LOADED_CLASS);
        } else {
            self.pending.insert(image, image_box);
        }
    }

    /// Host notification for an image `load` event.
    pub fn image_loaded(&mut self, doc: &mut Document, image: NodeId) -> bool {
        match self.pending.remove(&image) {
            Some(image_box) if doc.exists(image_box) => {
                doc.add_class(image_box, LOADED_CLASS);
                true
            }
            _ => false,
        }
    }

    /// Forgets images whose subtree has been torn down.
    pub fn prune(&mut self, doc: &Document) {
        self.pending.retain(|image, _| doc.exists(*image));
    }

    /// Images the host still has to report, with their sources.
    pub fn pending(&self, doc: &Document) -> Vec<(NodeId, String)> {
        self.pending
            .keys()
            .filter_map(|image| {
                doc.attribute(*image, "src")
                    .map(|src| (*image, src.to_string()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showcase(doc: &mut Document) -> (NodeId, NodeId) {
        let image_box = doc.create_element("div", &["showcase-box"], None);
        let image = doc.create_element("img", &["showcase-img"], None);
        doc.set_attribute(image, "src", "./dist/img/a.webp");
        doc.append(image_box, image);
        doc.append(doc.root(), image_box);
        (image_box, image)
    }

    #[test]
    fn cache_hit_marks_loaded_immediately() {
        let mut doc = Document::new();
        let (image_box, image) = showcase(&mut doc);
        let cache: HashSet<String> = ["./dist/img/a.webp".to_string()].into_iter().collect();
        let mut lazy = LazyImages::new();
        lazy.register(&mut doc, image_box, image, &cache);
        assert!(doc.has_class(image_box, LOADED_CLASS));
        assert!(lazy.is_empty());
    }

    #[test]
    fn cold_images_wait_for_load_event() {
        let mut doc = Document::new();
        let (image_box, image) = showcase(&mut doc);
        let mut lazy = LazyImages::new();
        lazy.register(&mut doc, image_box, image, &ColdCache);
        assert!(!doc.has_class(image_box, LOADED_CLASS));
        assert_eq!(lazy.pending(&doc), vec![(image, "./dist/img/a.webp".to_string())]);

        assert!(lazy.image_loaded(&mut doc, image));
        assert!(doc.has_class(image_box, LOADED_CLASS));
        assert!(!lazy.image_loaded(&mut doc, image));
    }

    #[test]
    fn prune_drops_removed_images() {
        let mut doc = Document::new();
        let (image_box, image) = showcase(&mut doc);
        let mut lazy = LazyImages::new();
        lazy.register(&mut doc, image_box, image, &ColdCache);
        doc.remove(image_box);
        lazy.prune(&doc);
        assert!(lazy.is_empty());
    }
}
