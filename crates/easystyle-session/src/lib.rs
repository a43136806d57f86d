//! Explicit application state: the signed-in session, the server-owned
//! cart, and the local managers, composed in [`AppState`].
//!
//! All writes to the token/user pair go through [`SessionStore`]; the cart
//! is only changed by [`CartStore`] methods.

mod app;
mod cart;
mod error;
mod session;

pub use app::AppState;
pub use cart::CartStore;
pub use error::SessionError;
pub use session::SessionStore;
