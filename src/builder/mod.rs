//! Artifact translation and the hand-off to the native toolchain.

pub mod invoker;
pub mod translate;

pub use invoker::{AutotoolsInvoker, BuildInvoker, ConfigureCommand};
pub use translate::{translate, Encoding, TranslateError};
