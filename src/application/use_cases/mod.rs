mod batch_chat;
mod chat;

pub use batch_chat::*;
pub use chat::*;
