#![forbid(unsafe_code)]

//! `drawbridge` turns draw.io network-diagram exports into GNS3 lab-automation
//! artifacts: a connections manifest, machine listings, and Ansible playbooks
//! that create the corresponding nodes and links. It never talks to a GNS3
//! server itself.
//!
//! # Features
//!
//! - `gen`: enable playbook/list generation (`drawbridge::generate`)

pub use drawbridge_core::*;

#[cfg(feature = "gen")]
pub mod generate {
    pub use drawbridge_gen::{
        Error as GenError, Gns3Server, TemplateCatalog, links_playbook, load_template_catalog,
        machine_names_listing, machines_playbook,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum PipelineError {
        #[error(transparent)]
        Extract(#[from] drawbridge_core::Error),
        #[error(transparent)]
        Generate(#[from] drawbridge_gen::Error),
    }

    pub type Result<T> = std::result::Result<T, PipelineError>;

    /// Extracts a document and renders its link-creation playbook in one call.
    pub fn links_playbook_sync(
        engine: &drawbridge_core::Engine,
        text: &str,
        server: &Gns3Server,
        project_name: &str,
    ) -> Result<String> {
        let extraction = engine.extract_sync(text)?;
        Ok(links_playbook(&extraction.connections, server, project_name)?)
    }

    /// Extracts a document and renders its node-creation playbook in one call.
    pub fn machines_playbook_sync(
        engine: &drawbridge_core::Engine,
        text: &str,
        templates: &TemplateCatalog,
        server: &Gns3Server,
        project_name: &str,
    ) -> Result<String> {
        let extraction = engine.extract_sync(text)?;
        let machine_names: Vec<String> = extraction
            .devices
            .iter()
            .map(|d| d.unique_name.clone())
            .collect();
        Ok(machines_playbook(
            &machine_names,
            templates,
            server,
            project_name,
        )?)
    }
}
