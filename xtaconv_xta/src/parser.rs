mod declarations;
mod process;
mod spans;

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use spans::ProcessSpans;
use xtaconv_core::{Direction, ModelError, XtaModel, XtaModelBuilder, sync};

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"(?s)/\*.*?\*/|//[^\n]*").expect("comment regex");
}

/// Removes `// ...` and `/* ... */` comments.
pub fn strip_comments(source: &str) -> String {
    COMMENT.replace_all(source, "").into_owned()
}

/// Parses XTA source text into an [`XtaModel`].
pub fn parse(source: &str) -> XtaModel {
    let text = strip_comments(source);
    // Spans have to be known before classifying any declaration as global.
    let spans = ProcessSpans::new(&text);
    let mut builder = XtaModelBuilder::new();
    declarations::extract(&text, &spans, &mut builder);
    for span in spans.iter() {
        process::extract(&text[span.clone()], &mut builder);
    }
    let model = builder.build();
    diagnose(&model);
    info!(target: "parser", "parsed {} processes", model.processes().len());
    model
}

// Recoverable failures only show up in the log.
fn report(result: Result<(), ModelError>) {
    if let Err(err) = result {
        warn!(target: "parser", "{err}");
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn diagnose(model: &XtaModel) {
    for instance in model.instances() {
        if model.process(instance).is_none() {
            warn!(target: "parser", "system instance '{instance}' is not a defined process");
        }
    }
    for process in model.processes() {
        match process.initial() {
            None => warn!(target: "parser", "process '{}' has no initial location", process.name()),
            Some(init) if !process.locations().iter().any(|l| l.name == init) => warn!(
                target: "parser",
                "initial location '{init}' of process '{}' is not declared",
                process.name()
            ),
            Some(_) => {}
        }
        for channel in process.channels() {
            if !model.channels().iter().any(|c| c.name == channel) {
                warn!(
                    target: "parser",
                    "process '{}' synchronizes on undeclared channel '{channel}'",
                    process.name()
                );
            }
        }
    }
    for (channel, direction) in sync::unmatched_channels(model.processes()) {
        let side = match direction {
            Direction::Send => "sent on",
            Direction::Receive => "received from",
        };
        warn!(target: "parser", "channel '{channel}' is only {side}, its transitions do not synchronize");
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn comments() {
        let source = "int a; // one\n/* two\n three */int b;\n// last";
        assert_eq!(strip_comments(source), "int a; \nint b;\n");
        // A line comment marker inside a block comment does not hide its end.
        assert_eq!(strip_comments("/* http://x */clock x;"), "clock x;");
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("_s0"));
        assert!(is_identifier("L1"));
        assert!(!is_identifier("1L"));
        assert!(!is_identifier("a[2]"));
        assert!(!is_identifier(""));
    }
}
