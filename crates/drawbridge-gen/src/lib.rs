#![forbid(unsafe_code)]

//! Lab-automation artifact generation.
//!
//! Consumes `drawbridge-core` extraction output and emits Ansible playbooks
//! that create the corresponding nodes and links on a GNS3 server. The
//! playbooks are emitted as YAML data; nothing here ever talks to GNS3.

pub mod machines;
pub mod playbook;
pub mod server;

pub use machines::{TemplateCatalog, load_template_catalog, machine_names_listing, machines_playbook};
pub use playbook::links_playbook;
pub use server::Gns3Server;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid GNS3 server details: {message}")]
    ServerDetails { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
