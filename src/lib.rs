// Library root
// -----------
// The binary (`main.rs`) wires these modules into the interactive CLI.
//
// Module responsibilities:
// - `storage`: the catalog file, as JSON or CSV, behind one trait.
// - `catalog` / `fuzzy`: search, sort, filter and statistics over a
//   loaded catalog.
// - `api`: movie-information lookups used when adding a movie.
// - `report`: histogram image and static website.
// - `ui`: the numbered menu and its command handlers.
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fuzzy;
pub mod logging;
pub mod movie;
pub mod report;
pub mod storage;
pub mod ui;
