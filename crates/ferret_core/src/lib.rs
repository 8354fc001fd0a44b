//! Ferret core: protocol decoding and the pure navigation model.
pub mod address;
mod decode;
mod effect;
mod filename;
mod msg;
mod node;
mod state;
mod update;
mod view_model;

pub use address::{Address, AddressError};
pub use decode::{decode_line, finish_menu, finish_text, parse_menu, parse_menu_line, parse_text};
pub use effect::Effect;
pub use filename::download_file_name;
pub use msg::Msg;
pub use node::{DisplayType, Link, Node, NodeKind};
pub use state::{AppState, RequestId};
pub use update::update;
pub use view_model::PageView;
