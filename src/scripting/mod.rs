//! Level scripting: native enemy classes exposed to Rhai, plus a host that runs a level script.

mod bindings;
mod objects;

pub use bindings::{
    register_eato, register_enemy_members, BindingError, BindingTable, ClassBinding, EatoHandle, EnemyHandle,
};
pub use objects::{Enemy, EnemyKind, ObjectId, ObjectManager, SharedObjects};

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;

use anyhow::{anyhow, Context, Result};
use rand::Rng;
use rhai::{CallFnOptions, Dynamic, Engine, Scope, AST, FLOAT};

const SCRIPT_LOG_CAPACITY: usize = 256;

pub type ScriptLog = Rc<RefCell<VecDeque<String>>>;

/// Engine with every native class and helper function registered against `objects`.
pub fn build_engine(objects: &SharedObjects) -> Result<(Engine, BindingTable, ScriptLog)> {
    let mut engine = Engine::new();
    engine.set_fast_operators(true);
    let mut table = BindingTable::new();
    register_eato(&mut engine, &mut table, objects)?;

    let logs: ScriptLog = Rc::new(RefCell::new(VecDeque::new()));
    let sink = logs.clone();
    engine.register_fn("log", move |message: &str| push_log(&sink, message));
    let sink = logs.clone();
    engine.on_print(move |message| push_log(&sink, message));
    engine.register_fn("rand", random_range);
    Ok((engine, table, logs))
}

fn push_log(logs: &ScriptLog, message: &str) {
    log::info!(target: "script", "{message}");
    let mut logs = logs.borrow_mut();
    logs.push_back(message.to_string());
    while logs.len() > SCRIPT_LOG_CAPACITY {
        logs.pop_front();
    }
}

fn random_range(min: FLOAT, max: FLOAT) -> FLOAT {
    if !(min < max) || !(max - min).is_finite() {
        return min;
    }
    rand::thread_rng().gen_range(min..max)
}

/// Runs a level script: top-level code once per load, then `init()` once and `update(dt)` every frame.
pub struct ScriptHost {
    engine: Engine,
    bindings: BindingTable,
    ast: Option<AST>,
    scope: Scope<'static>,
    script_path: PathBuf,
    last_modified: Option<SystemTime>,
    error: Option<String>,
    enabled: bool,
    initialized: bool,
    objects: SharedObjects,
    logs: ScriptLog,
}

impl ScriptHost {
    pub fn new(path: impl AsRef<Path>, objects: SharedObjects) -> Result<Self> {
        let (engine, bindings, logs) = build_engine(&objects)?;
        Ok(Self {
            engine,
            bindings,
            ast: None,
            scope: Scope::new(),
            script_path: path.as_ref().to_path_buf(),
            last_modified: None,
            error: None,
            enabled: true,
            initialized: false,
            objects,
            logs,
        })
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enable: bool) {
        self.enabled = enable;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn script_path(&self) -> &Path {
        &self.script_path
    }

    pub fn bindings(&self) -> &BindingTable {
        &self.bindings
    }

    pub fn objects(&self) -> &SharedObjects {
        &self.objects
    }

    pub fn take_logs(&mut self) -> Vec<String> {
        self.logs.borrow_mut().drain(..).collect()
    }

    pub fn force_reload(&mut self) -> Result<()> {
        let result = self.load_script();
        if let Err(err) = &result {
            self.error = Some(format!("{err:#}"));
        }
        result
    }

    pub fn update(&mut self, dt: f32) {
        if let Err(err) = self.reload_if_needed() {
            self.error = Some(format!("{err:#}"));
            return;
        }
        if !self.enabled {
            return;
        }
        let Some(ast) = &self.ast else {
            return;
        };
        if !self.initialized {
            if has_function(ast, "init", 0) {
                let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
                if let Err(err) = self.engine.call_fn_with_options::<()>(options, &mut self.scope, ast, "init", ()) {
                    self.error = Some(err.to_string());
                    return;
                }
            }
            self.initialized = true;
        }

        if has_function(ast, "update", 1) {
            let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
            match self.engine.call_fn_with_options::<()>(options, &mut self.scope, ast, "update", (dt as FLOAT,)) {
                Ok(()) => self.error = None,
                Err(err) => self.error = Some(err.to_string()),
            }
        }
    }

    /// Evaluates a one-off command against the script scope; `None` for unit results.
    pub fn eval(&mut self, source: &str) -> Result<Option<String>> {
        let value = self
            .engine
            .eval_with_scope::<Dynamic>(&mut self.scope, source)
            .map_err(|err| anyhow!("{err}"))?;
        Ok(if value.is_unit() { None } else { Some(value.to_string()) })
    }

    fn reload_if_needed(&mut self) -> Result<()> {
        let metadata = fs::metadata(&self.script_path).map_err(|err| anyhow!("Script file not accessible: {err}"))?;
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if self.last_modified.map_or(true, |prev| modified > prev) {
            self.load_script()?;
        }
        Ok(())
    }

    /// Records the file's mtime up front so a broken script is retried only after the next edit.
    fn load_script(&mut self) -> Result<()> {
        self.last_modified = fs::metadata(&self.script_path).ok().and_then(|meta| meta.modified().ok());
        let source = fs::read_to_string(&self.script_path)
            .with_context(|| format!("Reading {}", self.script_path.display()))?;
        let ast = self
            .engine
            .compile(source)
            .map_err(|err| anyhow!("Compiling {}: {err}", self.script_path.display()))?;
        self.scope = Scope::new();
        self.initialized = false;
        self.error = None;
        self.engine
            .run_ast_with_scope(&mut self.scope, &ast)
            .map_err(|err| anyhow!("Running {}: {err}", self.script_path.display()))?;
        self.ast = Some(ast);
        Ok(())
    }
}

fn has_function(ast: &AST, name: &str, arity: usize) -> bool {
    ast.iter_functions().any(|func| func.name == name && func.params.len() == arity)
}
