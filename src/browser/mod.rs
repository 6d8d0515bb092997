//! Browser implementations of the engine boundaries.
//!
//! - [`LocalStore`] - `localStorage` as the persistent cache backend
//! - [`WindowHistory`] - `window.history` and the address bar
//! - [`DocumentSurface`] - the page shell mounts

mod history;
mod storage;
mod surface;

pub use history::WindowHistory;
pub use storage::LocalStore;
pub use surface::DocumentSurface;
