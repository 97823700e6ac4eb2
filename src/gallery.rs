use crate::extract::ImageDescriptor;

/// Navigation state over the extracted image list. Previous/next wrap at
/// both ends; direct selection wraps modulo the list length.
#[derive(Debug, Clone)]
pub struct Gallery {
    images: Vec<ImageDescriptor>,
    index: usize,
}

impl Gallery {
    pub fn new(images: Vec<ImageDescriptor>) -> Self {
        Self { images, index: 0 }
    }

    pub fn images(&self) -> &[ImageDescriptor] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&ImageDescriptor> {
        self.images.get(self.index)
    }

    pub fn select(&mut self, index: usize) {
        if !self.images.is_empty() {
            self.index = index % self.images.len();
        }
    }

    pub fn next(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.images.len();
    }

    pub fn prev(&mut self) {
        if self.images.is_empty() {
            return;
        }
        self.index = match self.index {
            0 => self.images.len() - 1,
            n => n - 1,
        };
    }
}
