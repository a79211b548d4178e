//! Domain Layer - 领域层
//!
//! 纯函数领域逻辑：
//! - chunker: 书文按句切分
//! - template: `{{key}}` 占位符替换

mod chunker;
mod template;

pub use chunker::split_into_chunks;
pub use template::{render, TemplateValues};
