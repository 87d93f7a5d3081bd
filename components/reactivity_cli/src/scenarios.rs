//! Named scenarios exercising the reactivity engine
//!
//! Every scenario installs its own tracker, performs a few operations
//! through wrappers and checks what it observed. The report carries the
//! checks and the tracker log in order.

use crate::error::{CliError, CliResult};
use builtins::JsValue;
use reactivity::{
    clear_tracker, is_reactive, is_readonly, is_ref, reactive, readonly, set_tracker,
    shallow_reactive, shallow_readonly, to_raw, EffectRunner, RecordingTracker, REF_FLAG,
};
use std::fmt;
use std::rc::Rc;
use tracing::info;

/// A runnable scenario
#[derive(Clone, Copy)]
pub struct Scenario {
    /// Name accepted by `--scenario`
    pub name: &'static str,
    /// One-line summary shown by `--list`
    pub description: &'static str,
    run: fn(&mut ScenarioReport) -> CliResult<()>,
}

/// Output of one scenario run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Scenario name
    pub scenario: &'static str,
    /// Report lines in the order they were produced
    pub lines: Vec<String>,
}

impl ScenarioReport {
    fn new(scenario: &'static str) -> Self {
        ScenarioReport {
            scenario,
            lines: Vec::new(),
        }
    }

    fn check(&mut self, label: &str, passed: bool) -> CliResult<()> {
        if !passed {
            return Err(CliError::CheckFailed {
                scenario: self.scenario,
                check: label.to_string(),
            });
        }
        self.lines.push(format!("ok      {}", label));
        Ok(())
    }

    fn log(&mut self, recorder: &RecordingTracker) {
        self.lines
            .extend(recorder.take().iter().map(|event| event.to_string()));
    }
}

/// Every scenario, in display order
pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "identity",
        description: "one wrapper per target and mode; raw round-trips",
        run: identity,
    },
    Scenario {
        name: "readonly",
        description: "readonly views refuse writes and never report",
        run: readonly_writes,
    },
    Scenario {
        name: "array-search",
        description: "includes/indexOf track every index and retry with raw arguments",
        run: array_search,
    },
    Scenario {
        name: "push-loop",
        description: "effects that push onto the same array do not re-run each other",
        run: push_loop,
    },
    Scenario {
        name: "ref-unwrap",
        description: "refs unwrap on properties, stay boxed on indices, resist downgrades",
        run: ref_unwrap,
    },
];

/// Look up a scenario by name
pub fn find(name: &str) -> CliResult<&'static Scenario> {
    SCENARIOS
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| CliError::UnknownScenario(name.to_string()))
}

impl fmt::Debug for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scenario")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}

impl Scenario {
    /// Run the scenario on the current thread
    pub fn run(&self) -> CliResult<ScenarioReport> {
        info!(scenario = self.name, "running scenario");
        let mut report = ScenarioReport::new(self.name);
        let result = (self.run)(&mut report);
        clear_tracker();
        result.map(|()| report)
    }
}

fn make_ref(inner: JsValue) -> JsValue {
    JsValue::object_from([(REF_FLAG, JsValue::boolean(true)), ("value", inner)])
}

fn identity(report: &mut ScenarioReport) -> CliResult<()> {
    let o = JsValue::object_from([("nested", JsValue::object())]);
    let wrappers = [
        reactive(&o),
        readonly(&o),
        shallow_reactive(&o),
        shallow_readonly(&o),
    ];

    report.check("reactive(o) === reactive(o)", reactive(&o).equals(&wrappers[0]))?;
    report.check(
        "four modes give four wrappers",
        wrappers
            .iter()
            .enumerate()
            .all(|(i, a)| wrappers.iter().skip(i + 1).all(|b| !a.equals(b))),
    )?;
    report.check(
        "reactive(reactive(o)) === reactive(o)",
        reactive(&wrappers[0]).equals(&wrappers[0]),
    )?;
    let view = readonly(&wrappers[0]);
    report.check("toRaw(readonly(reactive(o))) === o", to_raw(&view).equals(&o))?;
    report.check("isReactive(readonly(reactive(o)))", is_reactive(&view))?;

    let first = wrappers[0].get_property("nested")?;
    let second = wrappers[0].get_property("nested")?;
    report.check("nested reads share one wrapper", first.equals(&second))?;
    Ok(())
}

fn readonly_writes(report: &mut ScenarioReport) -> CliResult<()> {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());

    let view = readonly(&JsValue::object_from([("a", JsValue::number(1.0))]));
    report.check("r.a = 2 is refused", !view.set_property("a", JsValue::number(2.0))?)?;
    report.check("r.a is still 1", view.get_property("a")? == JsValue::number(1.0))?;
    report.check("delete r.a is refused", !view.delete_property("a")?)?;
    report.check("isReadonly(r)", is_readonly(&view))?;
    report.check("nothing was tracked or triggered", recorder.events().is_empty())?;
    Ok(())
}

fn array_search(report: &mut ScenarioReport) -> CliResult<()> {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());

    let obj = JsValue::object();
    let arr = reactive(&JsValue::array_from(vec![
        JsValue::number(1.0),
        JsValue::number(2.0),
        obj.clone(),
    ]));
    let wrapped = arr.get_property("2")?;
    recorder.take();

    let found = JsValue::boolean(true);
    report.check(
        "arr.includes(arr[2])",
        arr.call_method("includes", vec![wrapped])? == found,
    )?;
    report.log(&recorder);
    report.check(
        "arr.includes(toRaw(arr[2]))",
        arr.call_method("includes", vec![obj])? == found,
    )?;
    Ok(())
}

fn push_loop(report: &mut ScenarioReport) -> CliResult<()> {
    let runner = Rc::new(EffectRunner::with_max_runs(100));
    set_tracker(runner.clone());

    let arr = reactive(&JsValue::array());
    let mut ids = Vec::new();
    for value in [1.0, 2.0] {
        let arr = arr.clone();
        ids.push(runner.effect(move || {
            arr.call_method("push", vec![JsValue::number(value)])?;
            Ok(())
        })?);
    }

    report.check(
        "each pushing effect ran exactly once",
        ids.iter().all(|&id| runner.run_count(id) == 1),
    )?;
    report.check("array holds both pushes", to_raw(&arr).array_length() == 2)?;
    report.lines.push(format!("effect runs: {}", runner.total_runs()));
    Ok(())
}

fn ref_unwrap(report: &mut ScenarioReport) -> CliResult<()> {
    let recorder = Rc::new(RecordingTracker::new());
    set_tracker(recorder.clone());

    let state = reactive(&JsValue::object_from([
        ("count", make_ref(JsValue::number(0.0))),
        ("locked", readonly(&make_ref(JsValue::number(5.0)))),
    ]));
    report.check(
        "state.count yields the inner value",
        state.get_property("count")? == JsValue::number(0.0),
    )?;

    let arr = reactive(&JsValue::array_from(vec![make_ref(JsValue::number(0.0))]));
    report.check("arr[0] yields the box", is_ref(&arr.get_property("0")?))?;

    report.check(
        "state.locked = 10 is refused",
        !state.set_property("locked", JsValue::number(10.0))?,
    )?;
    report.check(
        "state.locked still resolves to 5",
        state.get_property("locked")? == JsValue::number(5.0),
    )?;
    report.log(&recorder);
    Ok(())
}
