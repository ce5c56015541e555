pub mod main;
pub mod session;
pub mod stateless_llm;
pub mod system;
pub mod utils;

pub use main::Config;
pub use session::SessionConfig;
pub use stateless_llm::LlmConfig;
pub use system::SystemConfig;
