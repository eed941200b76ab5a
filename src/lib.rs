//! Form schema extraction and population.
//!
//! [`extract`] describes a document's input, textarea and select elements as
//! sparse [`FieldDescriptor`] records; [`populate`] writes a
//! [`FilledFieldMap`] back into the matching controls and fires bubbling
//! `input` and `change` events so reactive frameworks notice. Both work on an
//! in-memory [`Document`], and on live Chrome pages through [`Page`].

pub mod browser;
pub mod config;
pub mod dom;
pub mod element;
pub mod error;
pub mod extract;
mod html;
pub mod page;
pub mod populate;
pub mod schema;
pub mod scripts;

pub use browser::FormFillBrowser;
pub use config::{BrowserBuilder, BrowserConfig};
pub use dom::{DispatchedEvent, Document, EventKind, NodeId};
pub use error::{Error, Result};
pub use extract::extract;
pub use page::Page;
pub use populate::{populate, populate_with, FillPolicy};
pub use schema::{FieldDescriptor, FillResponse, FilledFieldMap};
