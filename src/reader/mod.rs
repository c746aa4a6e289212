//! Reader state types shared between the API and the database layer

mod types;

pub use types::{
    parse_current_location, Bookmark, CurrentLocation, Highlight, ReaderUpdate,
};
