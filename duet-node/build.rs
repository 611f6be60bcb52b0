//! Build script for duet-node
//!
//! Validates node.toml at compile time so a broken embedded default never
//! reaches the binary.

use std::fs;
use std::net::SocketAddrV4;
use std::path::Path;

/// Longest header label the display can show
const MAX_NAME_LEN: usize = 8;

/// Keys accepted in [node.timing]
const TIMING_KEYS: &[&str] = &[
    "pair_interval_ms",
    "demo_duration_ms",
    "ball_step_ms",
    "banner_ms",
    "icon_interval_ms",
    "icon_send_anim_ms",
    "icon_recv_anim_ms",
    "counter_interval_ms",
    "seesaw_send_ms",
    "seesaw_period_ms",
    "morse_symbol_ms",
    "snake_step_ms",
    "eye_send_ms",
    "eye_blink_interval_ms",
    "eye_blink_ms",
    "eye_phase_ms",
    "eye_period_ms",
];

fn main() {
    validate_config();
}

/// Validate node.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=node.toml");
    println!("cargo:rerun-if-changed=build.rs");

    let config_path = Path::new("node.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: node.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The node embeds node.toml as its default configuration.         ║\n\
            ║  Please create one in the duet-node directory.                   ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read node.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in node.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_node(&config, &mut errors);
    validate_timing(&config, &mut errors);
    validate_link(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in node.toml                       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=node.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Validate [node]: role and name
fn validate_node(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(node) = config.get("node") else {
        errors.push("Missing [node] section".to_string());
        return;
    };

    match node.get("role").and_then(|v| v.as_str()) {
        Some("master") | Some("slave") => {}
        Some(other) => errors.push(format!("node.role '{}' must be master or slave", other)),
        None => errors.push("node.role is required".to_string()),
    }

    if let Some(name) = node.get("name") {
        match name.as_str() {
            Some(s) if s.len() > MAX_NAME_LEN => errors.push(format!(
                "node.name '{}' is longer than {} characters",
                s, MAX_NAME_LEN
            )),
            Some(s) if !s.is_ascii() => {
                errors.push(format!("node.name '{}' must be ASCII", s))
            }
            Some(_) => {}
            None => errors.push("node.name must be a string".to_string()),
        }
    }
}

/// Validate [node.timing]: known keys, positive integers
fn validate_timing(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(timing) = config.get("node").and_then(|n| n.get("timing")) else {
        return;
    };
    let Some(table) = timing.as_table() else {
        errors.push("[node.timing] must be a table".to_string());
        return;
    };

    for (key, value) in table {
        if !TIMING_KEYS.contains(&key.as_str()) {
            errors.push(format!("Unknown timing key '{}'", key));
            continue;
        }
        match value.as_integer() {
            Some(ms) if ms > 0 && ms <= u32::MAX as i64 => {}
            _ => errors.push(format!("timing.{} must be a positive integer", key)),
        }
    }
}

/// Validate [link]: both endpoints are IPv4 socket addresses
fn validate_link(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(link) = config.get("link") else {
        errors.push("Missing [link] section".to_string());
        return;
    };

    for key in ["bind", "discovery"] {
        match link.get(key).and_then(|v| v.as_str()) {
            Some(addr) if addr.parse::<SocketAddrV4>().is_ok() => {}
            Some(addr) => errors.push(format!("link.{} '{}' is not an IPv4 address:port", key, addr)),
            None => errors.push(format!("link.{} is required", key)),
        }
    }
}
