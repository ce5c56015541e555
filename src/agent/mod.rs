pub mod agent_types;
pub mod gateway;
pub mod prompts;
pub mod stateless_llm_factory;
pub mod transformers;

pub mod stateless_llm;

pub use agent_types::*;
pub use gateway::*;
pub use stateless_llm_factory::*;
pub use stateless_llm::*;
