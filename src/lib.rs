//! Handler Chain은 hyper 요청 처리를 위한 미들웨어 조합 라이브러리입니다.
//!
//! # 주요 기능
//!
//! - 이름이 있는 미들웨어를 순서대로 조합하는 체인
//! - 미들웨어 이름별 설정 병합과 공통 에러 처리(`catch`)
//! - 인증, 가드, REST 디스패처, 요청 로그 내장 미들웨어
//!
//! # 예제
//!
//! ```
//! use handler_chain::middleware::{chain, handler_fn, middleware_fn, Options};
//! use hyper::StatusCode;
//!
//! let trace = middleware_fn("trace", |next, _options| next);
//! let handler = handler_fn(|_req, res| Box::pin(async move {
//!     res.status(StatusCode::OK).send("hello");
//!     Ok(())
//! }));
//!
//! let handler = chain(vec![trace], handler, Options::new()).unwrap();
//! ```
//!
//! # 에러 처리
//!
//! ```
//! use handler_chain::middleware::{catch_fn, chain, handler_fn, Options};
//! use hyper::StatusCode;
//!
//! let catch = catch_fn(|_req, res, _err| Box::pin(async move {
//!     res.status(StatusCode::SERVICE_UNAVAILABLE).send("An unknown error occurred");
//!     Ok(())
//! }));
//! let failing = handler_fn(|_req, _res| Box::pin(async move { Err("boom".into()) }));
//!
//! let handler = chain(Vec::new(), failing, Options::new().with_catch(catch)).unwrap();
//! ```

pub mod logging;
pub mod middleware;
pub mod service;
pub mod settings;
