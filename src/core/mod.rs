pub mod engine;
pub mod pipeline;
pub mod poem;
pub mod speech;
pub mod tts;
pub mod weather;

pub use crate::domain::model::{Forecast, Poem};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
