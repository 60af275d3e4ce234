mod batch;
mod completion;
mod message;
mod model_config;

pub use batch::*;
pub use completion::*;
pub use message::*;
pub use model_config::*;
