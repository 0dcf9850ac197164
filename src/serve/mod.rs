//! Request resolution core of the development server.
//!
//! | Module     | Role                                                  |
//! |------------|-------------------------------------------------------|
//! | `resolver` | request path -> content source, trailing-slash rule   |
//! | `trigger`  | synchronous build inside a scoped reporter            |
//! | `locator`  | build result or sandboxed join -> filesystem path     |
//! | `artifact` | the three above combined into `resolve_artifact`      |
//! | `router`   | admin/content split and prefix stripping              |
//! | `admin`    | the admin app mounted below the prefix                |
//! | `dispatch` | per-request state machine feeding the transport       |

mod admin;
mod artifact;
mod dispatch;
mod error;
mod locator;
mod resolver;
mod router;
mod trigger;

#[cfg(test)]
mod testing;

pub use admin::{AdminApp, Dashboard, Reply};
pub use dispatch::{Outcome, dispatch};
pub use router::{AdminView, RequestRouter};

#[cfg(test)]
pub use error::ResolveError;
