use std::path::PathBuf;
use xtaconv_xta::xtaconv_core::{Direction, VarType, XtaModel};

fn load(name: &str) -> anyhow::Result<XtaModel> {
    xtaconv_xta::load(&PathBuf::from("./tests/models").join(name))
}

#[test]
fn pair() -> anyhow::Result<()> {
    let model = load("pair.xta")?;
    assert_eq!(model.constants().len(), 1);
    assert_eq!(model.clocks(), ["g"]);
    assert_eq!(model.variables().len(), 1);
    assert_eq!(model.instances(), ["A", "B"]);

    let names: Vec<&str> = model.processes().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let a = model.process("A").expect("process A");
    assert_eq!(a.clocks(), ["x"]);
    assert_eq!(a.initial(), Some("s0"));
    assert_eq!(a.locations()[0].invariant.as_deref(), Some("x <= N"));
    let first = &a.transitions()[0];
    assert_eq!(first.guard.as_deref(), Some("x >= 2 and n < N"));
    assert_eq!(
        first.sync.as_ref().map(|s| (s.channel.as_str(), s.direction)),
        Some(("go", Direction::Send))
    );
    assert_eq!(first.assign.as_deref(), Some("x := 0, n := n + 1"));
    let second = &a.transitions()[1];
    assert_eq!((&second.guard, &second.sync, &second.assign), (&None, &None, &None));

    let b = model.process("B").expect("process B");
    assert!(b.is_urgent("t1"));
    assert!(b.clocks().is_empty());

    let syncs: Vec<String> = model.synchronizations().iter().map(|s| s.to_string()).collect();
    assert_eq!(syncs, vec!["A@go:B@go"]);
    Ok(())
}

#[test]
fn shadowing() -> anyhow::Result<()> {
    let model = load("shadow.xta")?;
    assert_eq!(model.clocks(), ["x"]);
    let globals: Vec<&str> = model.variables().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(globals, vec!["ready", "level"]);
    assert_eq!(
        model.variables()[1].var_type,
        VarType::Int {
            bounds: Some(("0".to_string(), "MAX".to_string()))
        }
    );
    let tick = &model.channels()[0];
    assert!(tick.urgent && tick.broadcast);

    let sensor = model.process("Sensor").expect("process Sensor");
    assert!(sensor.is_clock("x"));
    assert!(sensor.is_local("level"));
    assert_eq!(sensor.qualified("x"), "Sensor_x");
    assert_eq!(
        sensor.locations()[1].invariant.as_deref(),
        Some("x <= 2 && level < MAX")
    );
    assert!(sensor.is_urgent("sampling"));
    // The transition without attribute block is skipped.
    assert_eq!(sensor.transitions().len(), 3);

    // Processes survive undeclared initial locations and missing instances.
    let idle = model.process("Idle").expect("process Idle");
    assert_eq!(idle.initial(), Some("nowhere"));
    assert!(idle.transitions().is_empty());
    assert_eq!(model.instances(), ["Sensor", "Idle", "Missing"]);

    let syncs: Vec<String> = model.synchronizations().iter().map(|s| s.to_string()).collect();
    assert_eq!(syncs, vec!["Sensor@tick:Sensor@tick"]);
    Ok(())
}

#[test]
fn missing_file() {
    let err = load("missing.xta").expect_err("missing file");
    assert!(err.to_string().contains("missing.xta"));
}

#[test]
fn empty_source() {
    let model = xtaconv_xta::parse("");
    assert!(model.processes().is_empty());
    assert!(model.synchronizations().is_empty());
    assert!(model.events().is_empty());
}
