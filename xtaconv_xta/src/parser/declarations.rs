use super::is_identifier;
use super::spans::ProcessSpans;
use lazy_static::lazy_static;
use log::{debug, trace};
use regex::{Captures, Regex};
use xtaconv_core::{Channel, VarType, Variable, XtaModelBuilder};

lazy_static! {
    static ref CONSTANT: Regex = Regex::new(r"\bconst\s+int\s+(\w+)\s*=\s*([^;]+);").expect("constant regex");
    static ref CLOCK: Regex = Regex::new(r"(?m)^[ \t]*clock\s+([^;]+);").expect("clock regex");
    pub(super) static ref VARIABLE: Regex = Regex::new(r"(?m)^[ \t]*(bool|int)\b[ \t]*(?:\[([^\]]*)\])?\s*([^;]+);").expect("variable regex");
    static ref CHANNEL: Regex = Regex::new(r"((?:\b(?:urgent|broadcast)\s+)*)\bchan\s+([^;]+);").expect("channel regex");
    static ref SYSTEM: Regex = Regex::new(r"\bsystem\s+([^;]+);").expect("system regex");
}

/// Extracts the file-scope declarations.
///
/// Clocks and variables are global only when declared outside every process block;
/// constants and channels are global wherever they are declared.
pub(super) fn extract(text: &str, spans: &ProcessSpans, builder: &mut XtaModelBuilder) {
    for cap in CONSTANT.captures_iter(text) {
        trace!(target: "parser", "constant '{}' = '{}'", &cap[1], cap[2].trim());
        builder.new_constant(&cap[1], &cap[2]);
    }

    for cap in CLOCK.captures_iter(text) {
        let Some(decl) = cap.get(0) else { continue };
        if spans.contains(decl.start()) {
            continue;
        }
        for clock in names(&cap[1]) {
            trace!(target: "parser", "global clock '{clock}'");
            builder.new_global_clock(clock);
        }
    }

    for cap in VARIABLE.captures_iter(text) {
        let Some(decl) = cap.get(0) else { continue };
        if spans.contains(decl.start()) {
            continue;
        }
        for var in variables(&cap) {
            trace!(target: "parser", "global variable '{}'", var.name);
            builder.new_global_var(var);
        }
    }

    for cap in CHANNEL.captures_iter(text) {
        let qualifiers = &cap[1];
        for name in names(&cap[2]) {
            trace!(target: "parser", "channel '{name}'");
            builder.new_channel(Channel {
                name: name.to_owned(),
                urgent: qualifiers.contains("urgent"),
                broadcast: qualifiers.contains("broadcast"),
            });
        }
    }

    if let Some(cap) = SYSTEM.captures(text) {
        for instance in names(&cap[1]) {
            builder.new_instance(instance);
        }
    }
}

/// Splits a comma-separated list of names, skipping items that are not plain identifiers.
pub(super) fn names(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|name| {
        let valid = is_identifier(name);
        if !valid && !name.is_empty() {
            debug!(target: "parser", "skipping declaration '{name}'");
        }
        valid
    })
}

/// Builds the variables declared by a match of [`VARIABLE`].
pub(super) fn variables(cap: &Captures<'_>) -> Vec<Variable> {
    let var_type = match &cap[1] {
        "bool" => VarType::Bool,
        _ => VarType::Int {
            bounds: cap.get(2).and_then(|range| {
                range
                    .as_str()
                    .split_once(',')
                    .map(|(lo, hi)| (lo.trim().to_owned(), hi.trim().to_owned()))
            }),
        },
    };
    cap[3]
        .split(',')
        .filter_map(|item| {
            let (name, init) = match item.split_once('=') {
                Some((name, init)) => (name.trim(), Some(init.trim().to_owned())),
                None => (item.trim(), None),
            };
            if is_identifier(name) {
                Some(Variable {
                    name: name.to_owned(),
                    var_type: var_type.clone(),
                    init,
                })
            } else {
                debug!(target: "parser", "skipping variable declaration '{}'", item.trim());
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn model(text: &str) -> xtaconv_core::XtaModel {
        let spans = ProcessSpans::new(text);
        let mut builder = XtaModelBuilder::new();
        extract(text, &spans, &mut builder);
        builder.build()
    }

    #[test]
    fn globals() {
        let model = model(
            "const int N = 4;\nconst int M=N*2 ;\nclock x, y;\nint[0,N] a, b = 2;\nbool done = true;\n\
             urgent chan go;\nbroadcast chan all, many[3];\nchan c;\n\
             process P() {\nclock z;\nint local;\n}\nsystem P;",
        );
        let constants: Vec<(&str, &str)> = model
            .constants()
            .iter()
            .map(|c| (c.name.as_str(), c.value.as_str()))
            .collect();
        assert_eq!(constants, vec![("N", "4"), ("M", "N*2")]);
        assert_eq!(model.clocks(), ["x", "y"]);
        let vars: Vec<&str> = model.variables().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(vars, vec!["a", "b", "done"]);
        assert_eq!(
            model.variables()[1].var_type,
            VarType::Int {
                bounds: Some(("0".to_string(), "N".to_string()))
            }
        );
        assert_eq!(model.variables()[1].init.as_deref(), Some("2"));
        assert_eq!(model.variables()[2].var_type, VarType::Bool);
        let channels: Vec<(&str, bool, bool)> = model
            .channels()
            .iter()
            .map(|c| (c.name.as_str(), c.urgent, c.broadcast))
            .collect();
        assert_eq!(
            channels,
            vec![("go", true, false), ("all", false, true), ("c", false, false)]
        );
        assert_eq!(model.instances(), ["P"]);
    }

    #[test]
    fn local_declarations_are_not_global() {
        let model = model("process P() {\nclock x;\n    int n;\n}\nclock g;\n");
        assert_eq!(model.clocks(), ["g"]);
        assert!(model.variables().is_empty());
    }

    #[test]
    fn not_variables() {
        let model = model("int f(int a) { return a; }\ninteger q;\nconst int K = 1;\n");
        assert!(model.variables().is_empty());
    }
}
