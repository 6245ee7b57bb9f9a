//! Diagram embedding for rendered documentation pages.
//!
//! Post-processes page HTML after the site build: finds draw.io diagram
//! references (`<img src="flow.drawio">` and `<drawio-embed>` elements),
//! resolves them against the page's location, loads and validates the
//! diagram XML, and replaces each marker with an interactive embed fragment
//! the client-side viewer script picks up.
//!
//! The entry point is [`Rewriter::transform`], called once per page with a
//! [`PageContext`] describing where the page lives.

mod context;
mod error;
mod fragment;
mod loader;
mod options;
mod path;
mod report;
mod rewriter;

pub use context::PageContext;
pub use error::{EmbedError, TransformError};
pub use fragment::{ERROR_CLASS, FRAGMENT_CLASS, PAYLOAD_ATTR};
pub use loader::{DiagramDocument, DiagramPage, load};
pub use options::{EffectiveConfig, EmbedDefaults, EmbedOverrides, merge};
pub use path::{Reference, ResolvedRef, resolve};
pub use rewriter::{DIAGRAM_EXTENSION, Rewriter};
