use std::ffi::CString;

use crate::context;
use crate::engine::FontParameters;
use crate::error::BridgeError;
use crate::host::FontId;

/// Engine-side font: an optional host font id.
///
/// Creation and release go through the host bound on the current thread.
/// Each created id is destroyed exactly once: `release` takes it.
#[derive(Debug, Default)]
pub struct Font {
    id: Option<FontId>,
}

impl Font {
    pub const fn new() -> Self {
        Self { id: None }
    }

    pub fn id(&self) -> Option<FontId> {
        self.id
    }

    pub fn is_created(&self) -> bool {
        self.id.is_some()
    }

    /// Request a host font for `params`. A null host result leaves the font
    /// unset; the engine then measures and draws with the host's fallback.
    pub fn create(&mut self, params: &FontParameters) {
        log::debug!(
            "Font::create({}, {:.3}, {}, {})",
            params.face_name,
            params.size,
            params.italic,
            params.weight
        );
        // Font weight and italics are not part of the host contract.
        self.release();

        let name = match CString::new(params.face_name.as_str()) {
            Ok(name) => name,
            Err(_) => {
                let err = BridgeError::InteriorNul(params.face_name.clone());
                log::warn!("Font::create: {err}");
                return;
            }
        };

        self.id = context::with_current(|host| host.create_font(&name, params.size));
        if self.id.is_none() {
            log::warn!("host returned no font for {:?}", params.face_name);
        }
    }

    /// Hand the font back to the host. No-op when unset.
    pub fn release(&mut self) {
        if let Some(id) = self.id.take() {
            context::with_current(|host| host.destroy_font(id));
        }
    }
}

impl Drop for Font {
    fn drop(&mut self) {
        if self.id.is_none() {
            return;
        }
        if context::is_bound() {
            self.release();
        } else {
            log::warn!("font {:?} dropped outside a bridge call; host font leaked", self.id);
        }
    }
}
