pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{BatchChatUseCase, ChatClient, ChatUseCase};

pub use connector::{MockChatClient, OpenAiCompatibleClient, RecordedCall};

pub use domain::{
    BatchOutcome, BatchRequest, CompletionOptions, CompletionResult, DomainError, Message,
    ModelConfig, Role,
};
