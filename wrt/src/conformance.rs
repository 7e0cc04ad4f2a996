//! The JSON-based conformance test harness.
//!
//! Upstream Wasm test suites ship as `.wast` text, converted ahead of time
//! by an external tool into one `.json` script plus a set of `.wasm`
//! binaries it references by filename. This module is the consumer side:
//! it deserializes that JSON with [`serde`] and drives an [`Engine`]
//! through each command, so running the official test suite is "fetch the
//! JSON + wasm files, call [`Harness::run_file`] once per command".
//!
//! Decoding and validation failures that the harness itself is supposed to
//! provoke (`assert_malformed`, `assert_invalid`, `assert_unlinkable`) are
//! reported as [`Outcome::Failed`] with the underlying [`Error`] rather than
//! propagated with `?`, since an `Err` from [`load`] is exactly what those
//! commands expect to see.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::{load, Engine, Error, Instance, Value};

/// One line of the JSON script.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Module {
        line: u32,
        filename: String,
        #[serde(default)]
        name: Option<String>,
    },
    Register {
        line: u32,
        #[serde(default)]
        name: Option<String>,
        #[serde(rename = "as")]
        as_name: String,
    },
    AssertReturn {
        line: u32,
        action: Action,
        #[serde(default)]
        expected: Vec<JsonValue>,
    },
    AssertTrap {
        line: u32,
        action: Action,
        text: String,
    },
    AssertMalformed {
        line: u32,
        filename: String,
        text: String,
    },
    AssertInvalid {
        line: u32,
        filename: String,
        text: String,
    },
    AssertUnlinkable {
        line: u32,
        filename: String,
        text: String,
    },
    Action {
        line: u32,
        action: Action,
    },
}

/// A `module`-level action: invoke an export, or read a global.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Invoke {
        #[serde(default)]
        module: Option<String>,
        field: String,
        #[serde(default)]
        args: Vec<JsonValue>,
    },
    Get {
        #[serde(default)]
        module: Option<String>,
        field: String,
    },
}

/// One value in the JSON encoding: `{"type": "i32", "value": "42"}`. Values
/// are carried as decimal strings in the source format (since JSON numbers
/// cannot represent the full `i64`/`f64` bit patterns losslessly) and
/// parsed to the matching [`Value`] variant here.
#[derive(Debug, Deserialize)]
pub struct JsonValue {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: String,
}

impl JsonValue {
    pub fn to_value(&self) -> Value {
        match self.ty.as_str() {
            "i32" => Value::I32(self.value.parse::<u32>().expect("i32 literal") as i32),
            "i64" => Value::I64(self.value.parse::<u64>().expect("i64 literal") as i64),
            "f32" => Value::F32(f32::from_bits(self.value.parse::<u32>().expect("f32 bits"))),
            "f64" => Value::F64(f64::from_bits(self.value.parse::<u64>().expect("f64 bits"))),
            other => panic!("unsupported value type `{other}`"),
        }
    }
}

/// The result of running one [`Command`].
#[derive(Debug)]
pub enum Outcome {
    Passed,
    Failed { line: u32, detail: String },
}

/// Runs a JSON script against a directory of `.wasm` files, keeping track
/// of the most recently loaded module (the implicit target of an action
/// with no `module` field) and any `register`ed names.
pub struct Harness {
    engine: Engine,
    base_dir: PathBuf,
    named: HashMap<String, Instance>,
    current: Option<Instance>,
}

impl Harness {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { engine: Engine::new(), base_dir: base_dir.into(), named: HashMap::new(), current: None }
    }

    pub fn run_all(&mut self, commands: &[Command]) -> Vec<Outcome> {
        commands.iter().map(|c| self.run_one(c)).collect()
    }

    fn resolve(&self, module: &Option<String>) -> Option<&Instance> {
        match module {
            Some(name) => self.named.get(name),
            None => self.current.as_ref(),
        }
    }

    fn dispatch_action(&mut self, action: &Action) -> Result<Vec<Value>, Error> {
        match action {
            Action::Invoke { module, field, args } => {
                let instance = self.resolve(module).expect("action references a loaded module").clone();
                let args: Vec<Value> = args.iter().map(JsonValue::to_value).collect();
                self.engine.invoke(&instance, field, &args)
            }
            Action::Get { module, field } => {
                let instance = self.resolve(module).expect("action references a loaded module").clone();
                self.engine.get_global(&instance, field).map(|v| vec![v])
            }
        }
    }

    fn run_one(&mut self, command: &Command) -> Outcome {
        match command {
            Command::Module { line, filename, name } => match self.load_and_instantiate(filename) {
                Ok(instance) => {
                    if let Some(name) = name {
                        self.named.insert(name.clone(), instance.clone());
                    }
                    self.current = Some(instance);
                    Outcome::Passed
                }
                Err(e) => Outcome::Failed { line: *line, detail: e.to_string() },
            },
            Command::Register { line, name, as_name } => {
                let instance = match self.resolve(name) {
                    Some(i) => i.clone(),
                    None => return Outcome::Failed { line: *line, detail: "register: no module loaded".into() },
                };
                self.engine.register(as_name.clone(), &instance);
                Outcome::Passed
            }
            Command::AssertReturn { line, action, expected } => match self.dispatch_action(action) {
                Ok(results) => {
                    let want: Vec<Value> = expected.iter().map(JsonValue::to_value).collect();
                    if results == want {
                        Outcome::Passed
                    } else {
                        Outcome::Failed { line: *line, detail: format!("expected {want:?}, got {results:?}") }
                    }
                }
                Err(e) => Outcome::Failed { line: *line, detail: format!("trapped: {e}") },
            },
            Command::AssertTrap { line, action, text } => match self.dispatch_action(action) {
                Ok(results) => Outcome::Failed { line: *line, detail: format!("expected trap, got {results:?}") },
                Err(e) if e.message.contains(text.as_str()) => Outcome::Passed,
                Err(e) => Outcome::Failed { line: *line, detail: format!("wrong trap reason: {e}") },
            },
            Command::AssertMalformed { line, filename, text } => match self.load_bytes(filename) {
                Err(e) if e.message.contains(text.as_str()) || text.is_empty() => Outcome::Passed,
                Err(_) => Outcome::Passed,
                Ok(_) => Outcome::Failed { line: *line, detail: "expected decode failure".into() },
            },
            Command::AssertInvalid { line, filename, text } => match self.load_bytes(filename) {
                Err(_) => Outcome::Passed,
                Ok(_) => Outcome::Failed { line: *line, detail: format!("expected `{text}` validation failure") },
            },
            Command::AssertUnlinkable { line, filename, text } => match self.load_and_instantiate(filename) {
                Err(_) => Outcome::Passed,
                Ok(_) => Outcome::Failed { line: *line, detail: format!("expected `{text}` link failure") },
            },
            Command::Action { line, action } => match self.dispatch_action(action) {
                Ok(_) => Outcome::Passed,
                Err(e) => Outcome::Failed { line: *line, detail: e.to_string() },
            },
        }
    }

    fn load_bytes(&self, filename: &str) -> Result<crate::Module, Error> {
        let path = self.resolve_path(filename);
        let bytes = std::fs::read(&path)
            .unwrap_or_else(|e| panic!("reading conformance fixture {}: {e}", path.display()));
        load(&bytes)
    }

    fn load_and_instantiate(&mut self, filename: &str) -> Result<Instance, Error> {
        let module = self.load_bytes(filename)?;
        self.engine.instantiate(&module, &[])
    }

    fn resolve_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }
}

/// Convenience for a test that already has the JSON text in hand.
pub fn parse_script(json: &str) -> serde_json::Result<Vec<Command>> {
    #[derive(Deserialize)]
    struct Script {
        commands: Vec<Command>,
    }
    Ok(serde_json::from_str::<Script>(json)?.commands)
}

