use super::declarations::{VARIABLE, names, variables};
use super::{is_identifier, report};
use lazy_static::lazy_static;
use log::{debug, trace, warn};
use regex::Regex;
use xtaconv_core::{Direction, ProcessId, Sync, Transition, XtaModelBuilder};

lazy_static! {
    static ref NAME: Regex = Regex::new(r"^process\s+(\w+)\s*\(").expect("process name regex");
    static ref CLOCK: Regex = Regex::new(r"\bclock\s+([^;]+);").expect("clock regex");
    static ref STATE: Regex = Regex::new(r"(?s)\bstate\s+(.*?)\b(?:urgent|init|trans)\b").expect("state regex");
    static ref URGENT: Regex = Regex::new(r"(?s)\burgent\s+(.*?)\b(?:init|trans|state)\b").expect("urgent regex");
    static ref INIT: Regex = Regex::new(r"\binit\s+(\w+)\s*;").expect("init regex");
    static ref TRANS: Regex = Regex::new(r"(?s)\btrans\s+(.*)").expect("trans regex");
    static ref TRANSITION: Regex = Regex::new(r"(\w+)\s*->\s*(\w+)\s*\{([^}]*)\}").expect("transition regex");
    static ref GUARD: Regex = Regex::new(r"\bguard\s+([^;]+);").expect("guard regex");
    static ref SYNC: Regex = Regex::new(r"\bsync\s+(\w+)\s*([!?])\s*;").expect("sync regex");
    static ref ASSIGN: Regex = Regex::new(r"\bassign\s+([^;]+);").expect("assign regex");
}

/// Extracts a process from the text of its block.
///
/// Blocks without a recognisable name, or repeating the name of a previous process,
/// are skipped.
pub(super) fn extract(block: &str, builder: &mut XtaModelBuilder) -> Option<ProcessId> {
    let Some(name) = NAME.captures(block).and_then(|cap| cap.get(1)) else {
        warn!(target: "parser", "skipping process block without a name");
        return None;
    };
    let name = name.as_str();
    let (_, body) = block.strip_suffix("\n}")?.split_once('{')?;
    let process_id = match builder.new_process(name) {
        Ok(process_id) => process_id,
        Err(err) => {
            warn!(target: "parser", "skipping process block: {err}");
            return None;
        }
    };
    debug!(target: "parser", "parsing process '{name}'");

    for cap in CLOCK.captures_iter(body) {
        for clock in names(&cap[1]) {
            trace!(target: "parser", "clock '{clock}' of '{name}'");
            report(builder.new_clock(process_id, clock));
        }
    }

    for cap in VARIABLE.captures_iter(body) {
        for var in variables(&cap) {
            trace!(target: "parser", "variable '{}' of '{name}'", var.name);
            report(builder.new_var(process_id, var));
        }
    }

    if let Some(cap) = STATE.captures(body) {
        let states = cap[1].trim().trim_end_matches(';').trim();
        for item in split_locations(states) {
            match location(item) {
                Some((location, invariant)) => {
                    trace!(target: "parser", "location '{location}' of '{name}'");
                    report(builder.new_location(process_id, location, invariant));
                }
                None => debug!(target: "parser", "skipping location declaration '{item}'"),
            }
        }
    } else {
        debug!(target: "parser", "process '{name}' has no state section");
    }

    // `urgent chan` and `urgent broadcast chan` declare channels, not locations.
    for cap in URGENT.captures_iter(body) {
        let section = cap[1].split(';').next().unwrap_or_default();
        if matches!(
            section.split_whitespace().next(),
            Some("chan" | "broadcast")
        ) {
            continue;
        }
        for location in names(section) {
            report(builder.add_urgent(process_id, location));
        }
    }

    if let Some(cap) = INIT.captures(body) {
        report(builder.set_initial(process_id, &cap[1]));
    }

    if let Some(cap) = TRANS.captures(body) {
        for cap in TRANSITION.captures_iter(&cap[1]) {
            let edge = transition(&cap[1], &cap[2], &cap[3]);
            trace!(
                target: "parser",
                "transition '{}' -> '{}' of '{name}'",
                edge.source,
                edge.target
            );
            report(builder.add_transition(process_id, edge));
        }
    }

    Some(process_id)
}

/// Splits a list of location declarations at the commas outside braces.
fn split_locations(states: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in states.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(states[start..idx].trim());
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }
    items.push(states[start..].trim());
    items.retain(|item| !item.is_empty());
    items
}

/// Parses `name` or `name { invariant }`.
fn location(item: &str) -> Option<(&str, Option<&str>)> {
    let (name, invariant) = match item.split_once('{') {
        Some((name, rest)) => {
            let (invariant, _) = rest.rsplit_once('}')?;
            let invariant = invariant.trim();
            (name.trim(), (!invariant.is_empty()).then_some(invariant))
        }
        None => (item.trim_end_matches(';').trim(), None),
    };
    is_identifier(name).then_some((name, invariant))
}

fn attribute(regex: &Regex, attributes: &str) -> Option<String> {
    let cap = regex.captures(attributes)?;
    let text = cap[1].trim();
    (!text.is_empty()).then(|| text.to_owned())
}

fn transition(source: &str, target: &str, attributes: &str) -> Transition {
    Transition {
        source: source.to_owned(),
        target: target.to_owned(),
        guard: attribute(&GUARD, attributes),
        sync: SYNC.captures(attributes).and_then(|cap| {
            let direction = cap[2].chars().next().and_then(Direction::from_marker)?;
            Some(Sync {
                channel: cap[1].to_owned(),
                direction,
            })
        }),
        assign: attribute(&ASSIGN, attributes),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn locations_with_invariants() {
        let states = "idle, busy { x <= 5 }, odd { f(a, b) <= {1, 2} }, done";
        assert_eq!(
            split_locations(states),
            vec!["idle", "busy { x <= 5 }", "odd { f(a, b) <= {1, 2} }", "done"]
        );
        assert_eq!(location("busy { x <= 5 }"), Some(("busy", Some("x <= 5"))));
        assert_eq!(
            location("odd { f(a, b) <= {1, 2} }"),
            Some(("odd", Some("f(a, b) <= {1, 2}")))
        );
        assert_eq!(location("idle;"), Some(("idle", None)));
        assert_eq!(location("empty { }"), Some(("empty", None)));
        assert_eq!(location("bad name"), None);
        assert_eq!(location("broken { x < 1"), None);
    }

    #[test]
    fn transition_attributes() {
        let t = transition("a", "b", " guard x >= 2 and n == 1; sync go !; assign x := 0, n = n + 1; ");
        assert_eq!(t.guard.as_deref(), Some("x >= 2 and n == 1"));
        assert_eq!(
            t.sync,
            Some(Sync {
                channel: "go".to_string(),
                direction: Direction::Send
            })
        );
        assert_eq!(t.assign.as_deref(), Some("x := 0, n = n + 1"));

        let t = transition("a", "b", "");
        assert_eq!((t.guard, t.sync, t.assign), (None, None, None));
    }

    #[test]
    fn whole_block() {
        let block = "process P(const int id) {\n\
            clock x;\n\
            int[0,3] n = 1;\n\
            state\n  s0 { x <= 5 },\n  s1,\n  s2;\n\
            urgent s1, s2;\n\
            init s0;\n\
            trans\n  s0 -> s1 { guard x >= 2; sync go?; assign x := 0; },\n\
              s1 -> s2 { },\n\
              s2 -> s0 garbage,\n\
              s2 -> s0 { assign n := n + 1; };\n}";
        let mut builder = XtaModelBuilder::new();
        assert!(extract(block, &mut builder).is_some());
        let model = builder.build();
        let p = model.process("P").expect("process P");
        assert_eq!(p.clocks(), ["x"]);
        assert_eq!(p.variables().len(), 1);
        let locations: Vec<&str> = p.locations().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(locations, vec!["s0", "s1", "s2"]);
        assert_eq!(p.locations()[0].invariant.as_deref(), Some("x <= 5"));
        assert_eq!(p.initial(), Some("s0"));
        assert!(p.is_urgent("s1") && p.is_urgent("s2") && !p.is_urgent("s0"));
        assert_eq!(p.transitions().len(), 3);
        assert_eq!(p.transitions()[2].assign.as_deref(), Some("n := n + 1"));
    }

    #[test]
    fn urgent_channels_are_not_locations() {
        let block = "process P() {\n\
            urgent chan c;\n\
            urgent broadcast chan d;\n\
            state\n  a,\n  b;\n\
            urgent b;\n\
            init a;\n}";
        let mut builder = XtaModelBuilder::new();
        assert!(extract(block, &mut builder).is_some());
        let model = builder.build();
        let p = model.process("P").expect("process P");
        assert!(p.is_urgent("b"));
        assert_eq!(p.urgent().len(), 1);
    }

    #[test]
    fn nameless_and_duplicate_blocks() {
        let mut builder = XtaModelBuilder::new();
        assert!(extract("process {\n}", &mut builder).is_none());
        assert!(extract("process P() {\n}", &mut builder).is_some());
        assert!(extract("process P() {\n}", &mut builder).is_none());
        assert_eq!(builder.build().processes().len(), 1);
    }
}
