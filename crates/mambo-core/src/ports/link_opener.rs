//! External link opener port.

/// Port for opening a URL in the platform's default handler.
///
/// Fire-and-forget: no result is observed. Implementations log failures and
/// drop them.
pub trait LinkOpener: Send + Sync {
    fn open(&self, url: &str);
}
