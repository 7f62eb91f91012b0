use std::collections::HashMap;

pub fn builtin_scenarios() -> HashMap<&'static str, &'static str> {
    HashMap::from([(
        "border_skirmish",
        include_str!("../content/scenarios/border_skirmish.json"),
    )])
}
