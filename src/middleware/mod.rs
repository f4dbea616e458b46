pub mod auth;
pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod error_guard;
pub mod factory;
pub mod guard;
pub mod manager;
pub mod request_log;
pub mod response;
pub mod rest;
pub mod traits;

pub use chain::{chain, Chain};
pub use config::{Options, CATCH_KEY};
pub use context::{RequestContext, ResponseContext, UserId};
pub use error::MiddlewareError;
pub use error_guard::ErrorGuard;
pub use factory::MiddlewareFactory;
pub use manager::MiddlewareManager;
pub use request_log::RequestLogMiddleware;
pub use response::handle_error;
pub use rest::{Rest, RestMethod};
pub use traits::{
    catch_fn, handler_fn, middleware_fn, BoxError, BoxedHandler, CatchHandler, ErrorHandler,
    Handler, HandlerResult, Middleware,
};
