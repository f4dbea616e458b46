//! REST 디스패처
//!
//! HTTP 메서드별로 핸들러를 분기합니다.

mod config;
mod handler;

pub use config::RestConfig;
pub use handler::{Rest, RestMethod};
