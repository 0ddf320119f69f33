pub mod chat_llm;
pub mod demo_llm;
pub mod file_slot;
pub mod pg_slot;
pub mod records;

pub use chat_llm::OpenAiChatAdapter;
pub use demo_llm::DemoCompletionAdapter;
pub use file_slot::FileSlotAdapter;
pub use pg_slot::PgSlotAdapter;
