//! Core RAG services: chunking, indexing, retrieval and conversation logging

pub mod chunker;
pub mod conversation_logger;
pub mod retriever;
pub mod vector_index;

pub use chunker::Chunker;
pub use conversation_logger::{ConversationLogger, PersistenceReport};
pub use retriever::Retriever;
pub use vector_index::VectorIndex;
