//! Full-screen image preview state

use super::view::ImageView;

/// Hint shown under an open preview
pub const CLOSE_HINT: &str = "Click to close";

/// Which image, if any, is expanded to full screen
///
/// Opening replaces any open preview; a click anywhere on the overlay or
/// its close control dismisses it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    current: Option<ImageView>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, image: &ImageView) {
        tracing::trace!(src = %image.src, "Opening image preview");
        self.current = Some(image.clone());
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// The overlay to draw, while a preview is open
    pub fn overlay(&self) -> Option<LightboxOverlay> {
        self.current.as_ref().map(|image| LightboxOverlay {
            src: image.src.clone(),
            alt: image.alt.clone(),
            hint: CLOSE_HINT,
        })
    }
}

/// Full-screen preview of one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxOverlay {
    pub src: String,
    pub alt: String,
    pub hint: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(src: &str) -> ImageView {
        ImageView {
            src: src.to_string(),
            alt: String::new(),
            align: None,
        }
    }

    #[test]
    fn test_open_replace_and_dismiss() {
        let mut lightbox = Lightbox::new();
        assert!(lightbox.overlay().is_none());

        lightbox.open(&image("a.png"));
        lightbox.open(&image("b.png"));
        let overlay = lightbox.overlay().unwrap();
        assert_eq!(overlay.src, "b.png");
        assert_eq!(overlay.hint, CLOSE_HINT);

        lightbox.dismiss();
        assert!(!lightbox.is_open());
    }
}
