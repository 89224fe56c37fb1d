//! Node-creation playbook and machine listings.
//!
//! Machine names are matched against a GNS3 template catalog by normalized
//! name containment, and placed on the canvas in a square-ish grid from
//! (100, 100) in 50-unit steps. Machines without a matching template are
//! skipped with a warning; they never fail the whole playbook.

use crate::{Gns3Server, Result};
use drawbridge_core::ResolvedDevice;
use regex::Regex;
use serde_json::{Map, Value, json};
use std::sync::OnceLock;

const X_START: i64 = 100;
const Y_START: i64 = 100;
const X_STEP: i64 = 50;
const Y_STEP: i64 = 50;

/// Template catalog shape: template name -> GNS3 template object.
pub type TemplateCatalog = Map<String, Value>;

pub fn load_template_catalog(text: &str) -> Result<TemplateCatalog> {
    Ok(serde_json::from_str(text)?)
}

fn re_front_view_tail() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"ONFrontView.*$").unwrap())
}

/// Normalizes a device or template name for matching: strips the Visio
/// `ONFrontView…` tail, drops everything non-alphanumeric, lowercases.
pub fn normalize_name(name: &str) -> String {
    let stripped = re_front_view_tail().replace(name, "");
    stripped
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Finds the first catalog template whose normalized name contains, or is
/// contained in, the normalized machine name.
pub fn find_template<'a>(
    machine_name: &str,
    templates: &'a TemplateCatalog,
) -> Option<(&'a str, &'a Value)> {
    let machine = normalize_name(machine_name);
    templates
        .iter()
        .find(|(template_name, _)| {
            let template = normalize_name(template_name);
            machine.contains(&template) || template.contains(&machine)
        })
        .map(|(name, value)| (name.as_str(), value))
}

fn nearest_square_number(count: usize) -> usize {
    let sqrt = (count as f64).sqrt();
    let lower = (sqrt.floor() as usize).pow(2);
    let upper = (sqrt.ceil() as usize).pow(2);
    if count - lower < upper - count {
        lower
    } else {
        upper
    }
}

fn grid_row_len(count: usize) -> usize {
    (nearest_square_number(count) as f64).sqrt().max(1.0) as usize
}

fn node_body(machine_name: &str, template: &Value, x: i64, y: i64) -> Value {
    let mut body = Map::new();
    body.insert("name".to_string(), json!(machine_name));
    body.insert("x".to_string(), json!(x));
    body.insert("y".to_string(), json!(y));
    if let Value::Object(fields) = template {
        for (key, value) in fields {
            if matches!(key.as_str(), "name" | "x" | "y") {
                continue;
            }
            body.insert(key.clone(), value.clone());
        }
    }
    Value::Object(body)
}

fn node_tasks(machine_names: &[String], templates: &TemplateCatalog) -> Vec<Value> {
    let row_len = grid_row_len(machine_names.len());
    let mut tasks = Vec::new();
    let mut x = X_START;
    let mut y = Y_START;
    let mut placed = 0usize;

    for machine_name in machine_names {
        let Some((template_name, template)) = find_template(machine_name, templates) else {
            tracing::warn!(machine = %machine_name, "no GNS3 template matches, skipping node");
            continue;
        };
        tracing::debug!(machine = %machine_name, template = %template_name, "matched template");

        tasks.push(json!({
            "name": format!("Add {machine_name} to the project"),
            "uri": {
                "url": "{{ gns3_url }}/v2/projects/{{ project_result.json.project_id }}/nodes",
                "method": "POST",
                "headers": { "Content-Type": "application/json" },
                "body": node_body(machine_name, template, x, y),
                "body_format": "json",
                "return_content": true,
                "status_code": 201,
            },
            "register": "machine_result",
        }));
        tasks.push(json!({
            "name": format!("Debug {machine_name} creation result"),
            "debug": { "var": "machine_result" },
        }));

        x += X_STEP;
        placed += 1;
        if placed % row_len == 0 {
            x = X_START;
            y += Y_STEP;
        }
    }

    tasks
}

/// Renders the node-creation playbook: create the project, then add one node
/// per machine that has a matching template.
pub fn machines_playbook(
    machine_names: &[String],
    templates: &TemplateCatalog,
    server: &Gns3Server,
    project_name: &str,
) -> Result<String> {
    let mut tasks = vec![
        json!({
            "name": "Create a new GNS3 project",
            "uri": {
                "url": "{{ gns3_url }}/v2/projects",
                "method": "POST",
                "headers": { "Content-Type": "application/json" },
                "body": { "name": project_name },
                "body_format": "json",
                "return_content": true,
                "status_code": 201,
            },
            "register": "project_result",
        }),
        json!({
            "name": "Debug project creation result",
            "debug": { "var": "project_result" },
        }),
    ];
    tasks.extend(node_tasks(machine_names, templates));

    let play = json!([{
        "hosts": "localhost",
        "gather_facts": false,
        "vars": {
            "gns3_url": server.base_url(),
            "ansible_python_interpreter": "/usr/bin/python3",
        },
        "tasks": tasks,
    }]);

    Ok(format!("---\n{}", serde_yaml::to_string(&play)?))
}

/// Plain-text machine listing: one unique name per line.
pub fn machine_names_listing(devices: &[ResolvedDevice]) -> String {
    let mut out = String::new();
    for device in devices {
        out.push_str(&device.unique_name);
        out.push('\n');
    }
    out
}
