//! Static tools. Each one maps a short text input to a fixed, templated
//! answer; none of them call out or keep state.

use serde_json::{json, Value};

use crate::models::tools::{Tool, ToolRegistry};

pub const GET_NAME: &str = "get_name";
pub const ACROBATIC_DISTRACTION_DISPLAY: &str = "acrobatic_distraction_display";
pub const CAMOUFLAGE_AND_WAIT: &str = "camouflage_and_wait";
pub const RAPID_GRAB_AND_SCURRY: &str = "rapid_grab_and_scurry";
pub const DECOY_DROP: &str = "decoy_drop";
pub const INTEL_BRIEFING: &str = "badger_garden_intel_briefing_tool";
pub const WEB_SEARCH: &str = "web_search_tool";

/// Names used by the strategist, in the order they are offered.
pub const STRATEGIST_TOOLS: [&str; 4] = [
    ACROBATIC_DISTRACTION_DISPLAY,
    CAMOUFLAGE_AND_WAIT,
    RAPID_GRAB_AND_SCURRY,
    DECOY_DROP,
];

pub fn squirrel_name(characteristic: &str) -> String {
    format!("{characteristic}Squirrel")
}

/// String argument `key`, or an error naming it.
fn string_arg(args: &Value, key: &str) -> Result<String, String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| format!("Missing '{key}' parameter"))
}

/// The single-tool registry: `get_name(characteristic)`.
pub fn name_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_tool(
        Tool::function(GET_NAME, "Get a name for a squirrel based on a characteristic.")
            .with_param("characteristic", "string", "A characteristic of the squirrel.", true),
        |args| Ok(json!(squirrel_name(&string_arg(&args, "characteristic")?))),
    );
    registry
}

const ACROBATIC_SOLUTION: &str = "SOLUTION: Initiate an 'Acrobatic Distraction Display'. Perform flashy tail flicks \
and quick, unpredictable movements to confuse the rival. When they are momentarily distracted, \
swiftly secure the acorn and make a getaway.";

const CAMOUFLAGE_SOLUTION: &str = "SOLUTION: Employ 'Camouflage and Wait'. Silently move to the closest bush or dense leaves. \
Stay perfectly still and observe the dog. Once the dog loses interest or moves further away, \
quickly and quietly retrieve the acorn.";

const RAPID_GRAB_SOLUTION: &str = "SOLUTION: Use 'Rapid Grab and Scurry'. Calculate the quickest path. \
Dash in, grab the acorn with lightning speed, and immediately bolt up the nearest tree \
before the cat can react.";

const DECOY_SOLUTION: &str = "SOLUTION: Implement 'Decoy Drop'. Find a small pebble. As you move, \
'accidentally' and somewhat noisily drop the pebble a short distance away from the prize acorn, then freeze. \
If the human investigates the pebble, use the opportunity to grab the real acorn.";

fn strategy_tool(name: &str, description: &str) -> Tool {
    Tool::function(name, description).with_param(
        "hazard_description",
        "string",
        "The full hazard as a plain string",
        true,
    )
}

/// The strategist's four tactics.
pub fn strategist_registry() -> ToolRegistry {
    let tactics = [
        (
            ACROBATIC_DISTRACTION_DISPLAY,
            "Perform flashy tail flicks and quick, unpredictable movements to confuse a rival. \
             Best for non-aggressive threats like rival squirrels or humans.",
            ACROBATIC_SOLUTION,
        ),
        (
            CAMOUFLAGE_AND_WAIT,
            "Hide under leaves or behind cover and stay still until the threat passes. \
             Best for slow-moving threats like dogs or persistent humans.",
            CAMOUFLAGE_SOLUTION,
        ),
        (
            RAPID_GRAB_AND_SCURRY,
            "Dash in quickly, grab the acorn, and scurry up the nearest tree. \
             Ideal for fast, decisive action when there is little time or cover.",
            RAPID_GRAB_SOLUTION,
        ),
        (
            DECOY_DROP,
            "Drop a decoy like a pebble to misdirect a curious threat. \
             Best used for humans or non-aggressive animals.",
            DECOY_SOLUTION,
        ),
    ];

    let mut registry = ToolRegistry::new();
    for (name, description, solution) in tactics {
        registry.register_tool(strategy_tool(name, description), move |_| Ok(json!(solution)));
    }
    registry
}

pub const INTEL_REPORT: &str = "\
INTEL REPORT: BADGER'S GARDEN - GOLDEN ACORN
---------------------------------------------
TARGET: Golden Acorn, located under the large, creaky oak tree in the garden's center.
OCCUPANT: 'Grumples' the Badger. Known Napping Cycle: 13:00-16:00 hours (local time). Temperament: Extremely territorial.
KNOWN HAZARDS:
1. Noisy Gravel Perimeter: Surrounds the entire garden.
2. Automated Sprinkler System: West lawn, unpredictable schedule.
3. 'FiFi' the Poodle: Small, loud, south fence patrol. Distractions: High-pitched noises, sudden movements.
POTENTIAL ENTRY POINTS:
- North Fence Gap: Behind compost bin.
- Overhanging Maple Branch: West side, into rose bushes (thorny).
NOTES: Last structural check: 2 days ago. Location: Fort Erie, Ontario vicinity.
---------------------------------------------";

pub const WEATHER_REPORT: &str = "Weather Report: Fort Erie, Ontario - Currently 18°C, partly cloudy, \
wind from North at 5 km/h. Chance of light showers later.";

pub fn web_search(query: &str) -> String {
    if query.to_lowercase().contains("weather") {
        WEATHER_REPORT.to_string()
    } else {
        format!("Searched for: {query}. No specific results available.")
    }
}

/// Commander Chip's intel sources.
pub fn intel_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register_tool(
        Tool::function(
            INTEL_BRIEFING,
            "Provides a static intelligence briefing about Badger's Garden including entry points, hazards, and local fauna.",
        ),
        |_| Ok(json!(INTEL_REPORT)),
    );
    registry.register_tool(
        Tool::function(
            WEB_SEARCH,
            "Searches the web for current weather or other dynamic data.",
        )
        .with_param("query", "string", "What to search for", true),
        |args| Ok(json!(web_search(&string_arg(&args, "query")?))),
    );
    registry
}
