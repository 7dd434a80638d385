//! Static bindings between handler accessors and the execution context.
//!
//! Handlers exchange values through the context's scratch map. This module
//! gives that exchange a contract:
//!
//! - [`ScratchKey`] is a typed key. A read takes no argument and returns an
//!   `Option<T>`; a write takes exactly one `T`. The compiler enforces both.
//! - [`BindingTable`] declares named accessors for a handler, each either a
//!   read or a write of one key, and rejects contradictory declarations when
//!   the handler is constructed.
//!
//! A read returns the value most recently written under its key in the same
//! execution, or `None` if nothing was written.

mod key;
mod table;

pub use key::ScratchKey;
pub use table::{Binding, BindingTable, BindingTableBuilder, Direction};
