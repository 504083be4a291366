//! Deep-link parsing
//!
//! Validates inbound custom-scheme URIs (such as the OAuth redirect
//! `starlight://oauth?code=...`) and turns them into typed payloads. Parsing is
//! a pure function of its input: no I/O, no state.
//!
//! ```
//! use chica_common::deeplink::{Deeplink, DeeplinkParser};
//!
//! let parser = DeeplinkParser::new("myapp");
//! let link = parser.parse("myapp://oauth?code=abc")?;
//! assert_eq!(link, Deeplink::OAuthCode("abc".to_string()));
//! # Ok::<(), chica_common::deeplink::DeeplinkError>(())
//! ```

pub mod error;
pub mod parser;
pub mod types;

pub use error::DeeplinkError;
pub use parser::DeeplinkParser;
pub use types::{Deeplink, DeeplinkKind};
