//! Project discovery: canister manifest, init argument templates and test scripts

pub mod manifest;
pub mod scripts;
pub mod templates;

pub use manifest::{load_manifest, Canister, CanisterInfo, Canisters};
pub use scripts::list_scripts;
pub use templates::{locate_templates, template_candidate};
