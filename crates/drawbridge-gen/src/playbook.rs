//! Link-creation playbook.
//!
//! Emits one play that resolves the target project by name, opens it if
//! needed, fetches its nodes, and then issues one link-creation task per
//! connection. Device-name-to-node-id lookups happen inside the playbook via
//! the `device_map` Jinja expression; a lookup miss degrades to an empty node
//! id instead of failing the whole batch.

use crate::{Gns3Server, Result};
use drawbridge_core::Connection;
use serde_json::{Value, json};

/// Devices whose name marks them as an Ethernet switch or hub consume ports
/// on adapter 0; everything else consumes adapters with port 0.
fn is_switch_or_hub(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    ["atm_switch", "hub"].iter().any(|k| lower.contains(k))
}

fn adapter_and_port(name: &str, slot: u32) -> (u32, u32) {
    if is_switch_or_hub(name) {
        (0, slot)
    } else {
        (slot, 0)
    }
}

fn link_endpoint(name: &str, slot: u32) -> Value {
    let (adapter, port) = adapter_and_port(name, slot);
    json!({
        "node_id": format!("{{{{ device_map['{name}'] | default('') }}}}"),
        "adapter_number": adapter,
        "port_number": port,
    })
}

fn link_task(conn: &Connection) -> Value {
    json!({
        "name": format!("Create link {} to {}", conn.from, conn.to),
        "vars": {
            "device_map": "{{ gns3_nodes.json | items2dict(key_name='name', value_name='node_id') }}",
        },
        "uri": {
            "url": "{{ gns3_server }}/v2/projects/{{ project_id }}/links",
            "method": "POST",
            "body_format": "json",
            "headers": { "Content-Type": "application/json" },
            "status_code": [200, 201],
            "body": {
                "nodes": [
                    link_endpoint(&conn.from, conn.from_adapter_number),
                    link_endpoint(&conn.to, conn.to_adapter_number),
                ],
            },
        },
    })
}

fn project_tasks() -> Vec<Value> {
    vec![
        json!({
            "name": "Get all projects from GNS3",
            "uri": {
                "url": "{{ gns3_server }}/v2/projects",
                "method": "GET",
                "return_content": true,
            },
            "register": "gns3_projects",
        }),
        json!({
            "name": "Set project ID based on project name",
            "set_fact": {
                "project_id": "{{ (gns3_projects.json | selectattr('name', 'equalto', project_name) | list)[0].project_id }}",
            },
            "when": "gns3_projects.json | selectattr('name', 'equalto', project_name) | list | length > 0",
        }),
        json!({
            "name": "Check if the project is opened",
            "uri": {
                "url": "{{ gns3_server }}/v2/projects/{{ project_id }}",
                "method": "GET",
                "return_content": true,
            },
            "register": "project_status",
        }),
        json!({
            "name": "Open the project if it is not already opened",
            "uri": {
                "url": "{{ gns3_server }}/v2/projects/{{ project_id }}/open",
                "method": "POST",
                "return_content": true,
                "status_code": [200, 201],
            },
            "when": "project_status.json.status != \"opened\"",
        }),
        json!({
            "name": "Retrieve device node IDs from the GNS3 project",
            "uri": {
                "url": "{{ gns3_server }}/v2/projects/{{ project_id }}/nodes",
                "method": "GET",
                "return_content": true,
            },
            "register": "gns3_nodes",
        }),
    ]
}

/// Renders the link-creation playbook for one extracted topology.
pub fn links_playbook(
    connections: &[Connection],
    server: &Gns3Server,
    project_name: &str,
) -> Result<String> {
    let mut tasks = project_tasks();
    tasks.extend(connections.iter().map(link_task));

    let play = json!([{
        "name": "Create links in GNS3 project based on connections manifest",
        "hosts": "localhost",
        "gather_facts": false,
        "vars": {
            "gns3_server": server.base_url(),
            "project_name": project_name,
        },
        "tasks": tasks,
    }]);

    Ok(format!("---\n{}", serde_yaml::to_string(&play)?))
}
