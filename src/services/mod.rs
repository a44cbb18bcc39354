pub mod catalog;
pub mod color_mixer;
pub mod mix_store;
pub mod session;

pub use catalog::{BrandInfo, PaintCatalog};
pub use color_mixer::{ColorMixerHandle, ResilientColorMixer, WorkerOptions};
pub use mix_store::{InMemoryMixStore, MixStore};
pub use session::ColorMixerSession;
