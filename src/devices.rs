//! Simulated device status table and the tool definition that exposes it.

use serde_json::{Value, json};

pub const STATUS_TOOL_NAME: &str = "check_system_status";

/// Returned for any identifier missing from [`DEVICE_STATUS`].
pub const DEVICE_NOT_FOUND: &str = "Device not found.";

pub const DEVICE_STATUS: [(&str, &str); 15] = [
    ("printer01", "Online and functioning normally."),
    ("router23", "Offline, requires maintenance."),
    ("server07", "Online but high CPU usage detected."),
    ("laptop45", "Online and functioning normally."),
    ("desktop12", "Offline, power supply issue detected."),
    ("switch05", "Online, all ports active."),
    ("firewall02", "Online, last rule update: 2 hours ago."),
    ("scanner09", "Online, low toner warning."),
    ("tablet21", "Online, battery at 80%."),
    ("monitor33", "Online, no issues detected."),
    ("phone88", "Offline, network unreachable."),
    ("projector14", "Online, lamp replacement recommended soon."),
    ("nas01", "Online, disk usage at 75%."),
    ("camera17", "Online, recording active."),
    ("accesspoint03", "Online, 12 users connected."),
];

/// Look up a device by exact identifier.
pub fn check_system_status(device_id: &str) -> &'static str {
    DEVICE_STATUS
        .iter()
        .find(|(id, _)| *id == device_id)
        .map(|(_, status)| *status)
        .unwrap_or(DEVICE_NOT_FOUND)
}

/// Function schema advertised to the chat model.
pub fn status_tool() -> Value {
    json!({
        "name": STATUS_TOOL_NAME,
        "description": "Check the status of a device",
        "parameters": {
            "type": "object",
            "properties": {
                "device_id": {
                    "type": "string",
                    "description": "The ID of the device to check"
                }
            },
            "required": ["device_id"]
        }
    })
}
